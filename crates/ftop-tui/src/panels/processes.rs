use ratatui::text::{Line, Span};

use ftop_core::{ProcessEntry, Snapshot};

use crate::theme;
use crate::widgets::bytes_fmt::clip;

/// Header plus rule line above the rows.
const HEADER_ROWS: usize = 2;

pub fn header() -> String {
    format!(" {:>6} {:<12} {:>6} {:>6} COMMAND", "PID", "USER", "CPU%", "MEM%")
}

pub fn row(entry: &ProcessEntry) -> String {
    format!(
        " {:>6} {:<12.12} {:>6.1} {:>6.1} {}",
        entry.pid, entry.user, entry.cpu_percent, entry.mem_percent, entry.command
    )
}

/// Top processes by CPU, as many as fit, each clipped to `width`.
pub fn process_rows(snapshot: &Snapshot, max_rows: usize, width: usize) -> Vec<String> {
    snapshot
        .processes
        .iter()
        .take(max_rows)
        .map(|entry| clip(&row(entry), width))
        .collect()
}

pub fn lines(snapshot: &Snapshot, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(clip(&header(), width), theme::table_header())),
        Line::from(Span::styled("─".repeat(width), theme::dim())),
    ];
    lines.extend(
        process_rows(snapshot, height.saturating_sub(HEADER_ROWS), width)
            .into_iter()
            .map(|text| Line::from(Span::styled(text, theme::text()))),
    );
    lines.truncate(height);
    lines
}
