//! High-level plot types.
//!
//! Provides ready-to-use visualizations over a [`crate::dataset::Dataset`].

mod heatmap;

pub use heatmap::{format_celsius, CellMeta, HeatmapScales, VarianceHeatmap, LEGEND_GRADIENT_ID};
