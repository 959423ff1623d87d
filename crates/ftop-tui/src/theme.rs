//! Terminal-green palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const TITLE_CYAN: Color = Color::Cyan;
pub const BAR_GREEN: Color = Color::Green;
pub const BORDER_DIM: Color = Color::Indexed(242);
pub const TEXT: Color = Color::Gray;
pub const WARN_YELLOW: Color = Color::Yellow;
pub const HOT_RED: Color = Color::Red;

// ── Hex Dump Greens ───────────────────────────────────────────────────

pub const HEX_ADDRESS: Color = Color::LightGreen;
pub const HEX_BYTES: Color = Color::Green;
pub const HEX_ASCII: Color = Color::Indexed(22);

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for panels.
pub fn title_style() -> Style {
    Style::default().fg(TITLE_CYAN).add_modifier(Modifier::BOLD)
}

/// Panel borders.
pub fn border_style() -> Style {
    Style::default().fg(BORDER_DIM)
}

/// Labels and plain values.
pub fn text() -> Style {
    Style::default().fg(TEXT)
}

/// Dimmed secondary text (units, separators).
pub fn dim() -> Style {
    Style::default().fg(BORDER_DIM)
}

/// Process table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(TITLE_CYAN)
        .add_modifier(Modifier::BOLD)
}

/// Sparkline traces.
pub fn sparkline() -> Style {
    Style::default().fg(BAR_GREEN)
}

/// Bar fill colour by load: green, yellow past 60%, red past 85%.
pub fn load_color(pct: f64) -> Color {
    if pct >= 85.0 {
        HOT_RED
    } else if pct >= 60.0 {
        WARN_YELLOW
    } else {
        BAR_GREEN
    }
}
