use bytesize::ByteSize;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use ftop_core::{PlatformInfo, Snapshot};

use crate::theme;
use crate::widgets::bytes_fmt::{fmt_uptime, truncate_text};

/// Border title carrying the wall clock of the latest snapshot.
pub fn title(snapshot: &Snapshot) -> String {
    format!(
        " ftop ── {} ",
        snapshot.wall_time.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Host identity, uptime and a one-line load summary.
pub fn lines(
    platform: &PlatformInfo,
    snapshot: Option<&Snapshot>,
    width: usize,
) -> Vec<Line<'static>> {
    let content_w = width.saturating_sub(1);
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {label:<5}"), theme::dim()),
            Span::styled(
                truncate_text(&value, content_w.saturating_sub(6)),
                theme::text(),
            ),
        ])
    };

    let mut lines = vec![
        row(
            "OS",
            format!(
                "{} · kernel {} · {}",
                platform.os, platform.kernel, platform.host
            ),
        ),
    ];

    let uptime = snapshot.map_or_else(String::new, |s| {
        format!(" · up {}", fmt_uptime(platform.uptime_at(s.wall_time)))
    });
    lines.push(row(
        "CPU",
        format!("{} · {} cores{uptime}", platform.processor, platform.cores),
    ));

    if let Some(s) = snapshot {
        let load = &s.load;
        let mut summary = format!(
            "{:.2} {:.2} {:.2} · mem {} / {} · {} procs",
            load.one,
            load.five,
            load.fifteen,
            ByteSize::b(s.memory.used),
            ByteSize::b(s.memory.total),
            s.processes.len(),
        );
        if s.skipped_processes > 0 {
            summary.push_str(&format!(" ({} unreadable)", s.skipped_processes));
        }
        let color = theme::load_color(load.one / core_count(platform) * 100.0);
        lines.push(Line::from(vec![
            Span::styled(" Load ", theme::dim()),
            Span::styled(
                truncate_text(&summary, content_w.saturating_sub(6)),
                Style::default().fg(color),
            ),
        ]));
    }
    lines
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn core_count(platform: &PlatformInfo) -> f64 {
    platform.cores.max(1) as f64
}
