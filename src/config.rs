//! Chart configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard 800x400 chart. Precedence: file > defaults.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::fetch::DATASET_URL;
use crate::geometry::{Margin, Point, Rect};
use crate::scale::{BandKind, ColorPolicy};

/// Legend geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Width of the color bar.
    pub width: f64,
    /// Height of the color bar.
    pub height: f64,
    /// Gap between the bottom of the plot and the legend group; the bar sits the same gap lower.
    pub offset: f64,
    /// Requested number of axis ticks.
    pub ticks: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 30.0,
            offset: 20.0,
            ticks: 10,
        }
    }
}

/// Tooltip placement relative to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Horizontal offset from the pointer.
    pub offset_x: f64,
    /// Vertical offset from the pointer (negative is up).
    pub offset_y: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 10.0,
            offset_y: -28.0,
        }
    }
}

/// Outline drawn around the hovered cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Stroke color, `#RRGGBB`.
    pub color: String,
    /// Stroke width.
    pub width: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
        }
    }
}

/// Everything that shapes the rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Where the dataset is fetched from.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Page heading for HTML output.
    #[serde(default = "default_title")]
    pub title: String,

    /// Canvas width.
    #[serde(default = "default_width")]
    pub width: f64,

    /// Canvas height.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Space around the plotting area.
    #[serde(default)]
    pub margin: Margin,

    /// Legend geometry.
    #[serde(default)]
    pub legend: LegendConfig,

    /// Requested number of year ticks.
    #[serde(default = "default_x_ticks")]
    pub x_ticks: usize,

    /// Font size for axis labels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Continuous or bucketed color mapping.
    #[serde(default)]
    pub color_policy: ColorPolicy,

    /// Month axis layout.
    #[serde(default)]
    pub month_scale: BandKind,

    /// Tooltip placement.
    #[serde(default)]
    pub tooltip: TooltipConfig,

    /// Hover outline.
    #[serde(default)]
    pub highlight: HighlightConfig,
}

fn default_source_url() -> String {
    DATASET_URL.to_string()
}
fn default_title() -> String {
    "Monthly Global Land-Surface Temperature".to_string()
}
fn default_width() -> f64 {
    800.0
}
fn default_height() -> f64 {
    400.0
}
fn default_x_ticks() -> usize {
    10
}
fn default_font_size() -> f64 {
    10.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            title: default_title(),
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            legend: LegendConfig::default(),
            x_ticks: default_x_ticks(),
            font_size: default_font_size(),
            color_policy: ColorPolicy::default(),
            month_scale: BandKind::default(),
            tooltip: TooltipConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::Config {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring chart configuration");
                Self::default()
            }
        }
    }

    /// Check that the chart has room to draw and the colors parse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::Config { line: 0, message });

        let area = self.plot_area();
        if !(area.width > 0.0 && area.height > 0.0) {
            return invalid(format!(
                "margins leave no plotting area in a {}x{} canvas",
                self.width, self.height
            ));
        }
        if !(self.legend.width > 0.0 && self.legend.height > 0.0) {
            return invalid("legend must have a positive size".to_string());
        }
        if self.highlight.width < 0.0 {
            return invalid("highlight width must not be negative".to_string());
        }
        self.highlight_color()?;
        Ok(())
    }

    /// Plotting area inside the margins.
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        self.margin.plot_area(self.width, self.height)
    }

    /// Parsed hover outline color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured color is not a hex color.
    pub fn highlight_color(&self) -> Result<Rgba> {
        Rgba::from_hex(&self.highlight.color)
    }

    /// Where the tooltip goes for a pointer at `pointer`.
    #[must_use]
    pub fn tooltip_position(&self, pointer: Point) -> Point {
        pointer.offset(self.tooltip.offset_x, self.tooltip.offset_y)
    }
}
