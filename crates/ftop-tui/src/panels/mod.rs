//! Panel renderers. Each panel turns retained state into lines; this module
//! draws the bordered frame around them.

pub mod hexdump;
pub mod metrics;
pub mod processes;
pub mod system;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use ftop_core::{DecorativeLine, PlatformInfo, RingHistory, Snapshot};

use crate::canvas::Histories;
use crate::layout::{DashboardLayout, Panel, PanelId};
use crate::theme;

/// Borrowed view of everything a frame needs.
pub struct View<'a> {
    pub layout: &'a DashboardLayout,
    pub histories: &'a Histories,
    pub hex_window: &'a RingHistory<DecorativeLine>,
    pub platform: &'a PlatformInfo,
    pub snapshot: Option<&'a Snapshot>,
}

/// Draw every panel. Areas are clipped to the frame so a layout computed
/// for a stale size can never write outside the terminal.
pub fn render(frame: &mut Frame, view: &View<'_>) {
    let screen = frame.area();
    for panel in view.layout.panels() {
        let area = panel.area.intersection(screen);
        if area.is_empty() {
            continue;
        }
        render_panel(frame, *panel, area, view);
    }
}

fn render_panel(frame: &mut Frame, panel: Panel, area: Rect, view: &View<'_>) {
    let title = match (panel.id, view.snapshot) {
        (PanelId::System, Some(snapshot)) => system::title(snapshot),
        _ => panel.id.title().to_owned(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_type(panel.border)
        .border_style(theme::border_style());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.is_empty() {
        return;
    }

    let width = usize::from(inner.width);
    let height = usize::from(inner.height);
    let lines: Vec<Line<'static>> = match (panel.id, view.snapshot) {
        (PanelId::HexDump, _) => hexdump::lines(view.hex_window, height),
        (PanelId::System, _) => system::lines(view.platform, view.snapshot, width),
        (_, None) => vec![Line::styled(" waiting for first sample…", theme::dim())],
        (PanelId::Metrics, Some(snapshot)) => {
            metrics::lines(snapshot, view.histories, width, height)
        }
        (PanelId::Processes, Some(snapshot)) => processes::lines(snapshot, width, height),
    };
    frame.render_widget(Paragraph::new(lines), inner);
}
