//! Hover behavior for the rendered cells.
//!
//! The handler owns the cell metadata and tracks which cell, if any, is under
//! the pointer. Hovering outlines the cell and shows a tooltip near the
//! pointer; leaving restores the cell and hides the tooltip. Only one cell is
//! highlighted at a time: a hover on a new cell replaces the previous one even
//! if its leave event never arrived.

use tracing::trace;

use crate::color::Rgba;
use crate::config::ChartConfig;
use crate::geometry::Point;
use crate::plots::CellMeta;

/// Stroke applied to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellVisual {
    /// Outline color; `None` means no outline.
    pub stroke: Option<Rgba>,
    /// Outline width.
    pub stroke_width: f64,
}

/// Shared tooltip state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    visible: bool,
    lines: Vec<String>,
    position: Point,
}

impl Tooltip {
    /// Whether the tooltip is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Text lines of the last hovered cell.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `<br>`, escaped for use as HTML content.
    #[must_use]
    pub fn html(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;"))
            .collect::<Vec<_>>()
            .join("<br>")
    }

    /// Page position of the tooltip's top-left corner.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }
}

/// Tracks the hovered cell and drives the tooltip.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    cells: Vec<CellMeta>,
    hovered: Option<usize>,
    tooltip: Tooltip,
    highlight: CellVisual,
    config: ChartConfig,
}

impl InteractionHandler {
    /// Create a handler over the cells returned by the renderer.
    #[must_use]
    pub fn new(cells: Vec<CellMeta>, config: &ChartConfig) -> Self {
        let highlight = CellVisual {
            stroke: Some(config.highlight_color().unwrap_or(Rgba::BLACK)),
            stroke_width: config.highlight.width,
        };
        Self {
            cells,
            hovered: None,
            tooltip: Tooltip::default(),
            highlight,
            config: config.clone(),
        }
    }

    /// Pointer entered cell `index` at page position `pointer`.
    ///
    /// Returns the updated tooltip, or `None` for an unknown index.
    pub fn pointer_enter(&mut self, index: usize, pointer: Point) -> Option<&Tooltip> {
        let cell = self.cells.get(index)?;
        if let Some(previous) = self.hovered.filter(|&p| p != index) {
            trace!(previous, "highlight moved without a leave event");
        }

        self.hovered = Some(index);
        self.tooltip = Tooltip {
            visible: true,
            lines: cell.tooltip_lines().to_vec(),
            position: self.config.tooltip_position(pointer),
        };
        Some(&self.tooltip)
    }

    /// Pointer left cell `index`.
    ///
    /// Leaving a cell that is not the hovered one changes nothing.
    pub fn pointer_leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
            self.tooltip.visible = false;
        }
    }

    /// How cell `index` should currently be stroked.
    #[must_use]
    pub fn cell_visual(&self, index: usize) -> CellVisual {
        if self.hovered == Some(index) {
            self.highlight
        } else {
            CellVisual::default()
        }
    }

    /// Index of the highlighted cell.
    #[must_use]
    pub const fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// The shared tooltip.
    #[must_use]
    pub const fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Cell metadata in record order.
    #[must_use]
    pub fn cells(&self) -> &[CellMeta] {
        &self.cells
    }
}
