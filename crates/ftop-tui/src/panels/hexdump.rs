use ratatui::style::Style;
use ratatui::text::{Line, Span};

use ftop_core::{DecorativeLine, RingHistory};

use crate::theme;

/// Newest lines at the bottom. Overlong lines are cut by the panel edge.
pub fn lines(window: &RingHistory<DecorativeLine>, height: usize) -> Vec<Line<'static>> {
    let skip = window.len().saturating_sub(height);
    window.iter().skip(skip).map(styled).collect()
}

fn styled(line: &DecorativeLine) -> Line<'static> {
    Line::from(vec![
        Span::styled(line.address_text(), Style::default().fg(theme::HEX_ADDRESS)),
        Span::raw("  "),
        Span::styled(line.hex_text(), Style::default().fg(theme::HEX_BYTES)),
        Span::raw("  "),
        Span::styled(format!("|{}|", line.ascii_text()), Style::default().fg(theme::HEX_ASCII)),
    ])
}
