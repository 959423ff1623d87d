//! Canvas coordinator, the one place that touches the terminal.
//!
//! Holds the terminal together with every piece of state a repaint reads:
//! layout, metric histories, the decorative rolling window and the latest
//! snapshot. The scheduler wraps it in a single mutex, so whoever holds the
//! lock owns both the state and the right to paint.
//!
//! Each repaint renders every panel from retained state. ratatui diffs
//! against the previous frame, so a repaint triggered by a new hex line
//! only writes the hex panel's cells to the terminal.

use color_eyre::eyre::{Result, eyre};
use ratatui::{Terminal, backend::Backend};
use tracing::debug;

use ftop_core::{DecorativeLine, PlatformInfo, RingHistory, Sample, Snapshot};

use crate::layout::{DashboardLayout, PanelId};
use crate::panels::{self, View};

/// Per-metric sample histories, all sized to the sparkline width.
#[derive(Debug, Clone)]
pub struct Histories {
    pub cpu: RingHistory<Sample>,
    pub memory: RingHistory<Sample>,
    pub net_sent: RingHistory<Sample>,
    pub net_recv: RingHistory<Sample>,
}

impl Histories {
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: RingHistory::new(capacity),
            memory: RingHistory::new(capacity),
            net_sent: RingHistory::new(capacity),
            net_recv: RingHistory::new(capacity),
        }
    }

    /// Discard everything; the new capacity comes from the new layout.
    pub fn reset(&mut self, capacity: usize) {
        for history in self.all_mut() {
            history.resize(capacity);
        }
    }

    pub fn record(&mut self, snapshot: &Snapshot) {
        let at = snapshot.taken_at;
        self.cpu.push(Sample::percent(snapshot.cpu_percent, at));
        self.memory.push(Sample::percent(snapshot.memory.percent, at));
        self.net_sent
            .push(Sample::rate(snapshot.network.sent_per_sec, at));
        self.net_recv
            .push(Sample::rate(snapshot.network.recv_per_sec, at));
    }

    pub fn capacity(&self) -> usize {
        self.cpu.capacity()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
            && self.memory.is_empty()
            && self.net_sent.is_empty()
            && self.net_recv.is_empty()
    }

    fn all_mut(&mut self) -> [&mut RingHistory<Sample>; 4] {
        [
            &mut self.cpu,
            &mut self.memory,
            &mut self.net_sent,
            &mut self.net_recv,
        ]
    }
}

/// Sparkline width (and so history length) for a layout.
pub fn history_capacity(layout: &DashboardLayout) -> usize {
    let inner = layout.get(PanelId::Metrics).inner_width();
    usize::from(inner.saturating_sub(panels::metrics::SPARK_INDENT))
}

/// Rolling window length for the hex panel of a layout.
pub fn hex_window_capacity(layout: &DashboardLayout) -> usize {
    usize::from(layout.get(PanelId::HexDump).inner_height())
}

/// Terminal plus everything painted onto it.
pub struct Canvas<B: Backend> {
    terminal: Terminal<B>,
    layout: DashboardLayout,
    histories: Histories,
    hex_window: RingHistory<DecorativeLine>,
    platform: PlatformInfo,
    latest: Option<Snapshot>,
    decorative_emitted: u64,
}

impl<B: Backend> Canvas<B> {
    /// Wrap a terminal, laying panels out for its current size.
    pub fn new(terminal: Terminal<B>, platform: PlatformInfo) -> Result<Self> {
        let size = terminal
            .size()
            .map_err(|err| eyre!("failed to read terminal size: {err}"))?;
        let layout = DashboardLayout::compute(size.height, size.width);
        debug!(rows = size.height, cols = size.width, "initial layout");

        Ok(Self {
            terminal,
            histories: Histories::new(history_capacity(&layout)),
            hex_window: RingHistory::new(hex_window_capacity(&layout)),
            layout,
            platform,
            latest: None,
            decorative_emitted: 0,
        })
    }

    /// Recompute all panels for a new terminal size, then reset every
    /// width-derived buffer. Always in that order.
    pub fn relayout(&mut self, rows: u16, cols: u16) {
        self.layout = DashboardLayout::compute(rows, cols);
        self.histories.reset(history_capacity(&self.layout));
        self.hex_window.resize(hex_window_capacity(&self.layout));
        debug!(
            rows,
            cols,
            history = self.histories.capacity(),
            hex_rows = self.hex_window.capacity(),
            "relayout"
        );
    }

    /// Fold a fresh snapshot into the histories and keep it for painting.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.histories.record(&snapshot);
        self.latest = Some(snapshot);
    }

    pub fn push_decorative(&mut self, line: DecorativeLine) {
        self.hex_window.push(line);
        self.decorative_emitted += 1;
    }

    /// Draw every panel from retained state.
    pub fn repaint(&mut self) -> Result<()> {
        let Self {
            terminal,
            layout,
            histories,
            hex_window,
            platform,
            latest,
            ..
        } = self;
        let view = View {
            layout,
            histories,
            hex_window,
            platform,
            snapshot: latest.as_ref(),
        };
        terminal
            .draw(|frame| panels::render(frame, &view))
            .map_err(|err| eyre!("failed to draw frame: {err}"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn histories(&self) -> &Histories {
        &self.histories
    }

    #[cfg(test)]
    pub fn hex_window(&self) -> &RingHistory<DecorativeLine> {
        &self.hex_window
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Total decorative lines pushed since start.
    #[cfg(test)]
    pub fn decorative_emitted(&self) -> u64 {
        self.decorative_emitted
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }
}
