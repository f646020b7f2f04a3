//! # variance-heatmap
//!
//! Heat map of monthly global land-surface temperature variance.
//!
//! One JSON document is fetched, normalized into a [`dataset::Dataset`], mapped
//! through position and color scales and drawn as SVG: year and month axes, one
//! colored cell per record, and a color legend with its own temperature axis.
//! Hovering a cell outlines it and shows a tooltip.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use variance_heatmap::prelude::*;
//!
//! let config = ChartConfig::default();
//! let chart = Chart::load(&reqwest::Client::new(), &config).await?;
//! chart.write_to_file("heatmap.html")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `variance-heatmap` binary
//! - `wasm`: browser binding that mounts the chart into a page
//!
//! ## References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Bostock, M., Ogievetsky, V., & Heer, J. (2011). "D3: Data-Driven Documents."
//!   IEEE Transactions on Visualization and Computer Graphics.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and the temperature palette.
pub mod color;

/// Geometric primitives (points, rectangles, margins).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Temperature records and their normalization.
pub mod dataset;

// ============================================================================
// Pipeline Modules
// ============================================================================

/// Dataset retrieval over HTTP.
pub mod fetch;

/// Chart configuration.
pub mod config;

/// High-level plot types.
pub mod plots;

/// Output encoders (SVG, HTML).
pub mod output;

/// Hover highlight and tooltip state.
pub mod interaction;

/// Fetch-to-canvas pipeline.
pub mod pipeline;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for the heat map pipeline.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use variance_heatmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Rgba, TEMPERATURE_PALETTE};
    pub use crate::config::ChartConfig;
    pub use crate::dataset::{Dataset, Month, TemperatureRecord};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Margin, Point, Rect};
    pub use crate::interaction::{CellVisual, InteractionHandler, Tooltip};
    pub use crate::output::{HtmlExporter, SvgEncoder};
    pub use crate::pipeline::Chart;
    pub use crate::plots::{CellMeta, HeatmapScales, VarianceHeatmap};
    pub use crate::scale::{BandKind, BandScale, ColorPolicy, ColorScale, LinearScale, Scale};
}
