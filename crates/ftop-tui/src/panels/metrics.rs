//! Metrics panel: usage bars with sparkline traces under the ones that
//! carry history, then network rates and per-core rows as space allows.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use ftop_core::{RingHistory, Sample, Snapshot, sparkline};

use crate::canvas::Histories;
use crate::theme;
use crate::widgets::bytes_fmt::{clip, fmt_pct_bar, fmt_rate};

/// Columns to the left of every bar and sparkline (` CPU `).
pub const SPARK_INDENT: u16 = 5;

/// Columns to the right of every bar (` 100.0%`).
const PCT_SUFFIX: usize = 7;

pub fn lines(
    snapshot: &Snapshot,
    histories: &Histories,
    width: usize,
    height: usize,
) -> Vec<Line<'static>> {
    let indent = usize::from(SPARK_INDENT);
    let bar_w = u16::try_from(width.saturating_sub(indent + PCT_SUFFIX)).unwrap_or(0);
    let spark_room = width.saturating_sub(indent);

    let mut lines = vec![
        bar_line("CPU", snapshot.cpu_percent, bar_w),
        spark_line("", &histories.cpu, sparkline::DEFAULT_MAX, spark_room),
        bar_line("MEM", snapshot.memory.percent, bar_w),
        spark_line("", &histories.memory, sparkline::DEFAULT_MAX, spark_room),
        bar_line("SWP", snapshot.swap.percent, bar_w),
        bar_line("DSK", snapshot.disk.percent, bar_w),
        Line::from(vec![
            Span::styled(" NET ", theme::dim()),
            Span::styled(
                clip(
                    &format!(
                        "↑ {}  ↓ {}",
                        fmt_rate(snapshot.network.sent_per_sec),
                        fmt_rate(snapshot.network.recv_per_sec)
                    ),
                    spark_room,
                ),
                theme::text(),
            ),
        ]),
        spark_line("↑", &histories.net_sent, histories.net_sent.peak(), spark_room),
        spark_line("↓", &histories.net_recv, histories.net_recv.peak(), spark_room),
    ];

    // Per-core rows fill whatever is left; the rest are dropped.
    let room = height.saturating_sub(lines.len());
    lines.extend(
        snapshot
            .per_core
            .iter()
            .take(room)
            .enumerate()
            .map(|(core, &pct)| bar_line(&format!("C{core}"), pct, bar_w)),
    );
    lines.truncate(height);
    lines
}

fn bar_line(label: &str, pct: f64, bar_w: u16) -> Line<'static> {
    let (filled, empty) = fmt_pct_bar(pct, bar_w);
    Line::from(vec![
        Span::styled(format!(" {label:<4}"), theme::dim()),
        Span::styled(filled, Style::default().fg(theme::load_color(pct))),
        Span::styled(empty, theme::dim()),
        Span::styled(format!(" {pct:>5.1}%"), theme::text()),
    ])
}

/// A sparkline row, or a blank row when the trace does not fit.
fn spark_line(
    marker: &str,
    history: &RingHistory<Sample>,
    max: f64,
    available: usize,
) -> Line<'static> {
    let width = history.capacity();
    if !sparkline::fits(width, available) {
        return Line::default();
    }
    let trace = sparkline::encode(&history.scalars(), width, max);
    Line::from(vec![
        Span::styled(format!(" {marker:>3} "), theme::dim()),
        Span::styled(trace, theme::sparkline()),
    ])
}
