//! Panel geometry as a pure function of terminal size.
//!
//! ```text
//! ┌─ System (fixed height) ─────────────────────────────┐
//! ├─ Metrics ─────────────┬─ Processes (55% of cols) ───┤
//! │                       │                             │
//! ├─ Hex Dump (2/5 of the rows below System) ───────────┤
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Panels tile the whole terminal with no margins. Below the minimum
//! viable size they are clamped to 1×1 and may overlap rather than vanish.

use ratatui::layout::Rect;
use ratatui::widgets::BorderType;

/// Height of the system-info panel (border + three rows).
pub const SYSTEM_PANEL_HEIGHT: u16 = 5;

/// Share of the rows below the system panel given to the hex dump.
pub const DECOR_ROWS_NUM: u16 = 2;
pub const DECOR_ROWS_DEN: u16 = 5;

/// Share of the columns given to the process panel.
pub const PROCESS_COLS_PCT: u16 = 55;

/// Smallest terminal that fits every panel without overlap.
pub const MIN_ROWS: u16 = 3;
pub const MIN_COLS: u16 = 2;

/// Identifies each panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    System,
    Metrics,
    Processes,
    HexDump,
}

impl PanelId {
    /// Border title.
    pub fn title(self) -> &'static str {
        match self {
            Self::System => " System ",
            Self::Metrics => " Metrics ",
            Self::Processes => " Processes ",
            Self::HexDump => " Hex Dump ",
        }
    }
}

/// A named rectangular region of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub id: PanelId,
    pub area: Rect,
    pub border: BorderType,
}

impl Panel {
    fn new(id: PanelId, area: Rect) -> Self {
        Self {
            id,
            area,
            border: BorderType::Rounded,
        }
    }

    /// Width inside a one-cell border.
    pub fn inner_width(&self) -> u16 {
        self.area.width.saturating_sub(2)
    }

    /// Height inside a one-cell border.
    pub fn inner_height(&self) -> u16 {
        self.area.height.saturating_sub(2)
    }
}

/// The full set of panels for one terminal size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    panels: [Panel; 4],
}

impl DashboardLayout {
    /// Compute panels for a `rows` × `cols` terminal. Never fails; zero
    /// dimensions are treated as 1.
    pub fn compute(rows: u16, cols: u16) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);

        let (system_h, middle_h, decor_h) = split_rows(rows);
        let (metrics_w, process_w) = split_cols(cols);

        let middle_y = if rows >= MIN_ROWS { system_h } else { rows - 1 };
        let decor_y = rows - decor_h;
        let process_x = if cols >= MIN_COLS { metrics_w } else { 0 };

        let panels = [
            Panel::new(PanelId::System, Rect::new(0, 0, cols, system_h)),
            Panel::new(PanelId::Metrics, Rect::new(0, middle_y, metrics_w, middle_h)),
            Panel::new(
                PanelId::Processes,
                Rect::new(process_x, middle_y, process_w, middle_h),
            ),
            Panel::new(PanelId::HexDump, Rect::new(0, decor_y, cols, decor_h)),
        ];

        Self { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn get(&self, id: PanelId) -> Panel {
        match id {
            PanelId::System => self.panels[0],
            PanelId::Metrics => self.panels[1],
            PanelId::Processes => self.panels[2],
            PanelId::HexDump => self.panels[3],
        }
    }
}

/// `(system, middle, decorative)` heights, each at least 1.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn split_rows(rows: u16) -> (u16, u16, u16) {
    if rows < MIN_ROWS {
        return (1, 1, 1);
    }
    let system = SYSTEM_PANEL_HEIGHT.min(rows - 2);
    let body = rows - system;
    let decor = (u32::from(body) * u32::from(DECOR_ROWS_NUM) / u32::from(DECOR_ROWS_DEN)) as u16;
    let decor = decor.clamp(1, body - 1);
    (system, body - decor, decor)
}

/// `(metrics, processes)` widths, each at least 1.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn split_cols(cols: u16) -> (u16, u16) {
    if cols < MIN_COLS {
        return (1, 1);
    }
    let process = (u32::from(cols) * u32::from(PROCESS_COLS_PCT) / 100) as u16;
    let process = process.clamp(1, cols - 1);
    (cols - process, process)
}
