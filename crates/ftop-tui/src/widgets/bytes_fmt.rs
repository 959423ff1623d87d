//! Human-readable rate, duration and bar formatting helpers.

use std::time::Duration;

/// Format a byte rate compactly (e.g., "512B/s", "12.4K/s", "3.1M/s").
pub fn fmt_rate(bytes_per_sec: f64) -> String {
    let rate = bytes_per_sec.max(0.0);
    if rate >= 1_000_000_000.0 {
        format!("{:.1}G/s", rate / 1_000_000_000.0)
    } else if rate >= 1_000_000.0 {
        format!("{:.1}M/s", rate / 1_000_000.0)
    } else if rate >= 1_000.0 {
        format!("{:.1}K/s", rate / 1_000.0)
    } else {
        format!("{rate:.0}B/s")
    }
}

/// Format an uptime compactly (e.g., "47d 3h", "4h 23m", "12m").
pub fn fmt_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Render a percentage bar split into filled and empty portions.
///
/// Returns `(filled, empty)` strings of `█` and `░` characters that together
/// span `width` character positions. Caller applies styling per segment.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn fmt_pct_bar(pct: f64, width: u16) -> (String, String) {
    let clamped = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    let filled_count = ((clamped / 100.0) * f64::from(width)).round() as u16;
    let empty_count = width.saturating_sub(filled_count);
    (
        "█".repeat(usize::from(filled_count)),
        "░".repeat(usize::from(empty_count)),
    )
}

/// Cut `value` to at most `max_chars`, marking the cut with `…`.
pub fn truncate_text(value: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if value.chars().count() <= max_chars {
        return value.to_owned();
    }
    if max_chars == 1 {
        return "…".into();
    }
    let mut out: String = value.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Hard cut to `max_chars`, no marker. For fixed-format rows.
pub fn clip(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rate_units() {
        assert_eq!(fmt_rate(0.0), "0B/s");
        assert_eq!(fmt_rate(-5.0), "0B/s");
        assert_eq!(fmt_rate(999.0), "999B/s");
        assert_eq!(fmt_rate(12_400.0), "12.4K/s");
        assert_eq!(fmt_rate(3_100_000.0), "3.1M/s");
        assert_eq!(fmt_rate(2_000_000_000.0), "2.0G/s");
    }

    #[test]
    fn uptime_units() {
        assert_eq!(fmt_uptime(Duration::from_secs(59)), "0m");
        assert_eq!(fmt_uptime(Duration::from_secs(12 * 60)), "12m");
        assert_eq!(fmt_uptime(Duration::from_secs(4 * 3600 + 23 * 60)), "4h 23m");
        assert_eq!(fmt_uptime(Duration::from_secs(47 * 86400 + 3 * 3600)), "47d 3h");
    }

    #[test]
    fn pct_bar_spans_width() {
        let (filled, empty) = fmt_pct_bar(50.0, 10);
        assert_eq!(filled.chars().count(), 5);
        assert_eq!(empty.chars().count(), 5);

        let (filled, empty) = fmt_pct_bar(180.0, 4);
        assert_eq!((filled.as_str(), empty.as_str()), ("████", ""));

        let (filled, empty) = fmt_pct_bar(f64::NAN, 3);
        assert_eq!((filled.as_str(), empty.as_str()), ("", "░░░"));
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_text("systemd", 10), "systemd");
        assert_eq!(truncate_text("systemd-journald", 8), "systemd…");
        assert_eq!(truncate_text("abc", 1), "…");
        assert_eq!(truncate_text("abc", 0), "");
        assert_eq!(clip("abcdef", 4), "abcd");
    }
}
