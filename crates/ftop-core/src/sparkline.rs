//! Sparkline encoding: scalar history to a fixed-width glyph row.
//!
//! Each cell is a braille character whose filled dot rows grow from the
//! bottom, giving four vertical steps per cell plus the empty cell.

/// Reference maximum used when the caller passes a non-positive one.
pub const DEFAULT_MAX: f64 = 100.0;

/// Highest quantization level.
pub const MAX_LEVEL: u8 = 4;

/// Glyph per level, level 0 is a blank cell.
pub const GLYPHS: [char; 5] = [' ', '⣀', '⣤', '⣶', '⣿'];

pub const BLANK: char = ' ';

/// Quantize `value` against `max` into `0..=MAX_LEVEL`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn level(value: f64, max: f64) -> u8 {
    let max = effective_max(max);
    let scaled = (value / max * f64::from(MAX_LEVEL)).floor();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, f64::from(MAX_LEVEL)) as u8
}

/// Encode `samples` (oldest to newest) into exactly `width` cells.
///
/// Column `i` shows sample `floor(i * len / width)`, so short histories are
/// stretched and long ones are decimated. An empty history gives `width`
/// blanks.
pub fn encode(samples: &[f64], width: usize, max: f64) -> String {
    let len = samples.len();
    (0..width)
        .map(|i| {
            let idx = i * len / width;
            samples
                .get(idx)
                .map_or(BLANK, |&v| GLYPHS[usize::from(level(v, max))])
        })
        .collect()
}

/// Whether a sparkline of `width` cells can be drawn in `available` cells.
///
/// Callers skip the draw entirely when this is false; truncating would
/// misrepresent the time axis and can spill into neighbouring text.
pub fn fits(width: usize, available: usize) -> bool {
    width > 0 && width <= available
}

fn effective_max(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max
    } else {
        DEFAULT_MAX
    }
}
