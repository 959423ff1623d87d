//! Decorative hex-dump stream.
//!
//! Produces an endless run of random, meaningless dump lines together with
//! the pacing to apply after each one. Pacing follows three regimes picked
//! once per line: an occasional burst pause, multi-line slow runs, and the
//! fast default.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Bytes shown per dump line.
pub const BYTES_PER_LINE: usize = 16;

/// Chance per line of a long pause before the next one.
pub const BURST_PAUSE_PROBABILITY: f64 = 0.01;
pub const BURST_PAUSE_SECS: RangeInclusive<f64> = 0.5..=1.5;

/// Chance per line of entering slow mode while in fast mode.
pub const SLOW_MODE_ENTRY_PROBABILITY: f64 = 1.0 / 250.0;
pub const SLOW_MODE_RUN_LINES: RangeInclusive<u32> = 10..=30;
pub const SLOW_DELAY_SECS: RangeInclusive<f64> = 0.08..=0.25;

pub const FAST_DELAY_SECS: RangeInclusive<f64> = 0.001..=0.01;

/// One synthetic dump line: an address and a row of random bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorativeLine {
    pub address: u32,
    pub bytes: [u8; BYTES_PER_LINE],
}

impl DecorativeLine {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; BYTES_PER_LINE];
        rng.fill(&mut bytes[..]);
        Self {
            address: rng.gen_range(0..=u32::MAX),
            bytes,
        }
    }

    /// `DEADBEEF`
    pub fn address_text(&self) -> String {
        format!("{:08X}", self.address)
    }

    /// `DE AD BE EF …`
    pub fn hex_text(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Printable ASCII as-is, everything else as `.`.
    pub fn ascii_text(&self) -> String {
        self.bytes
            .iter()
            .map(|&b| {
                if (0x20..=0x7e).contains(&b) {
                    char::from(b)
                } else {
                    '.'
                }
            })
            .collect()
    }
}

impl fmt::Display for DecorativeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  |{}|",
            self.address_text(),
            self.hex_text(),
            self.ascii_text()
        )
    }
}

/// Emission speed in effect for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Fast,
    /// `remaining` lines left in the slow run, this one included.
    Slow { remaining: u32 },
}

/// Delays to apply after emitting a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Burst pause, if one was rolled this line.
    pub pause: Option<Duration>,
    pub regime: Regime,
    pub delay: Duration,
}

impl Pacing {
    pub fn total(&self) -> Duration {
        self.pause.unwrap_or_default() + self.delay
    }
}

/// Pacing state machine: burst-pause check, then slow-mode entry or
/// continuation, else fast.
#[derive(Debug, Clone, Default)]
pub struct Cadence {
    slow_remaining: u32,
}

impl Cadence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_slow_mode(&self) -> bool {
        self.slow_remaining > 0
    }

    pub fn next_pacing<R: Rng>(&mut self, rng: &mut R) -> Pacing {
        let pause = rng
            .gen_bool(BURST_PAUSE_PROBABILITY)
            .then(|| Duration::from_secs_f64(rng.gen_range(BURST_PAUSE_SECS)));

        if self.slow_remaining == 0 && rng.gen_bool(SLOW_MODE_ENTRY_PROBABILITY) {
            self.slow_remaining = rng.gen_range(SLOW_MODE_RUN_LINES);
            debug!(lines = self.slow_remaining, "hex stream entering slow mode");
        }

        if self.slow_remaining > 0 {
            let regime = Regime::Slow {
                remaining: self.slow_remaining,
            };
            self.slow_remaining -= 1;
            Pacing {
                pause,
                regime,
                delay: Duration::from_secs_f64(rng.gen_range(SLOW_DELAY_SECS)),
            }
        } else {
            Pacing {
                pause,
                regime: Regime::Fast,
                delay: Duration::from_secs_f64(rng.gen_range(FAST_DELAY_SECS)),
            }
        }
    }
}

/// A line plus the pacing that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub line: DecorativeLine,
    pub pacing: Pacing,
}

/// Endless stream of decorative lines. Never yields `None`.
pub struct HexStream<R = StdRng> {
    rng: R,
    cadence: Cadence,
}

impl HexStream<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HexStream<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            cadence: Cadence::new(),
        }
    }
}

impl<R: Rng> Iterator for HexStream<R> {
    type Item = Emission;

    fn next(&mut self) -> Option<Emission> {
        let line = DecorativeLine::random(&mut self.rng);
        let pacing = self.cadence.next_pacing(&mut self.rng);
        Some(Emission { line, pacing })
    }
}
