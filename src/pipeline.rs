//! Fetch, normalize, scale, render: the whole chart in one pass.
//!
//! The only suspension point is the fetch. Every failure happens before the
//! first element is drawn, so a caller-supplied canvas is left untouched on
//! error.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::color::Rgba;
use crate::config::ChartConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::fetch::fetch_json;
use crate::interaction::InteractionHandler;
use crate::output::{HtmlExporter, SvgEncoder};
use crate::plots::{CellMeta, VarianceHeatmap};

/// Normalize `document` and draw it into `canvas`.
///
/// # Errors
///
/// [`crate::Error::Schema`], [`crate::Error::EmptyDataset`] or
/// [`crate::Error::Config`]; `canvas` is not modified in that case.
pub fn render_into(
    document: Value,
    config: &ChartConfig,
    canvas: &mut SvgEncoder,
) -> Result<(VarianceHeatmap, Vec<CellMeta>)> {
    let dataset = Dataset::from_value(document)?;
    debug!(
        records = dataset.len(),
        base_temperature = dataset.base_temperature(),
        "dataset normalized"
    );

    let heatmap = VarianceHeatmap::new(dataset, config.clone())?;
    let cells = heatmap.render(canvas);
    Ok((heatmap, cells))
}

/// A rendered chart with its hover state.
#[derive(Debug, Clone)]
pub struct Chart {
    heatmap: VarianceHeatmap,
    canvas: SvgEncoder,
    interaction: InteractionHandler,
}

impl Chart {
    /// Fetch the configured source and render it.
    ///
    /// # Errors
    ///
    /// Any pipeline error; see [`crate::Error`].
    pub async fn load(client: &reqwest::Client, config: &ChartConfig) -> Result<Self> {
        let document = fetch_json(client, &config.source_url).await?;
        Self::from_value(document, config)
    }

    /// Render a JSON body that has already been downloaded.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Parse`] for malformed JSON, otherwise as [`Chart::from_value`].
    pub fn from_json(body: &str, config: &ChartConfig) -> Result<Self> {
        let document = serde_json::from_str(body).map_err(Error::Parse)?;
        Self::from_value(document, config)
    }

    /// Render a parsed JSON document.
    ///
    /// # Errors
    ///
    /// As [`render_into`].
    pub fn from_value(document: Value, config: &ChartConfig) -> Result<Self> {
        let mut canvas = SvgEncoder::new(config.width.round() as u32, config.height.round() as u32);
        let (heatmap, cells) = render_into(document, config, &mut canvas)?;
        let interaction = InteractionHandler::new(cells, config);
        Ok(Self {
            heatmap,
            canvas,
            interaction,
        })
    }

    /// The drawn canvas.
    #[must_use]
    pub const fn canvas(&self) -> &SvgEncoder {
        &self.canvas
    }

    /// The heat map the canvas was drawn from.
    #[must_use]
    pub const fn heatmap(&self) -> &VarianceHeatmap {
        &self.heatmap
    }

    /// Hover state over the drawn cells.
    #[must_use]
    pub const fn interaction(&self) -> &InteractionHandler {
        &self.interaction
    }

    /// Mutable hover state, for pointer events.
    pub fn interaction_mut(&mut self) -> &mut InteractionHandler {
        &mut self.interaction
    }

    /// `"<min> - <max>: base temperature <base>°C"`.
    #[must_use]
    pub fn subtitle(&self) -> String {
        self.heatmap.subtitle()
    }

    /// The chart as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.canvas.render()
    }

    fn exporter(&self) -> HtmlExporter {
        let config = self.heatmap.config();
        // Validated when the heat map was built.
        let highlight = config.highlight_color().unwrap_or(Rgba::BLACK);
        HtmlExporter::new(&config.title)
            .description(&self.subtitle())
            .highlight(highlight, config.highlight.width)
    }

    /// Write SVG for a `.svg` path, an HTML page otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            self.canvas.write_to_file(path)?;
        } else {
            self.exporter().write_to_file(&self.canvas, path)?;
        }
        info!(path = %path.display(), cells = self.interaction.cells().len(), "chart written");
        Ok(())
    }
}
