//! Output encoders (SVG, HTML).

mod html;
mod svg;

pub use html::HtmlExporter;
pub use svg::{Paint, SvgElement, SvgEncoder, TextAnchor};
