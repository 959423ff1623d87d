//! Data side of `ftop`: everything between the host and the terminal.
//!
//! - **[`SnapshotBuilder`]**: pulls one coherent [`Snapshot`] per tick out of
//!   a [`MetricsProvider`], deriving network rates from the previous
//!   counter reading and dropping processes that could not be read.
//!
//! - **[`RingHistory`]**: bounded FIFO of recent [`Sample`]s per metric;
//!   also used for the decorative rolling window.
//!
//! - **[`sparkline`]**: encodes a history into a fixed-width braille trace.
//!
//! - **[`HexStream`]**: endless decorative hex-dump lines with their
//!   burst / slow / fast pacing.
//!
//! - **[`SysinfoProvider`]**: production [`MetricsProvider`] and
//!   [`PlatformProvider`] backed by `sysinfo`.

pub mod decor;
pub mod error;
pub mod platform;
pub mod provider;
pub mod ring;
pub mod snapshot;
pub mod sparkline;
pub mod system;

// ── Primary re-exports ──────────────────────────────────────────────
pub use decor::{Cadence, DecorativeLine, Emission, HexStream, Pacing, Regime};
pub use error::ProcessReadError;
pub use platform::{PlatformInfo, PlatformProvider};
pub use provider::{
    LoadAverage, MetricsProvider, NetworkCounters, ProcessRecord, UNKNOWN_USER, Usage,
};
pub use ring::{RingHistory, Sample};
pub use snapshot::{NetworkRates, ProcessEntry, Snapshot, SnapshotBuilder};
pub use system::SysinfoProvider;
