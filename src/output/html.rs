//! Standalone HTML page around a rendered chart.
//!
//! Without script the page still shows the cell `<title>` tooltips and a CSS
//! hover outline; the wasm build drives the `#tooltip` element instead.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::svg::{escape, fmt_num, rgba_to_css, SvgEncoder};
use crate::color::Rgba;
use crate::error::Result;

/// Builds the page: `#title`, `#description`, `#chart` and `#tooltip`.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    title: String,
    description: String,
    highlight: Rgba,
    highlight_width: f64,
}

impl HtmlExporter {
    /// Create an exporter with a page heading.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: String::new(),
            highlight: Rgba::BLACK,
            highlight_width: 1.0,
        }
    }

    /// Set the subtitle shown under the heading.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the hover outline.
    #[must_use]
    pub fn highlight(mut self, color: Rgba, width: f64) -> Self {
        self.highlight = color;
        self.highlight_width = width;
        self
    }

    /// Render the page around `chart`.
    #[must_use]
    pub fn render(&self, chart: &SvgEncoder) -> String {
        let mut html = String::with_capacity(chart.elements().len() * 200 + 2048);
        let title = escape(&self.title);

        let _ = writeln!(html, "<!DOCTYPE html>");
        let _ = writeln!(html, r#"<html lang="en">"#);
        let _ = writeln!(html, "<head>");
        let _ = writeln!(html, r#"<meta charset="utf-8">"#);
        let _ = writeln!(html, "<title>{title}</title>");
        let _ = writeln!(html, "<style>");
        let _ = writeln!(html, "body {{ font-family: sans-serif; }}");
        let _ = writeln!(
            html,
            ".cell:hover {{ stroke: {}; stroke-width: {}; }}",
            rgba_to_css(&self.highlight),
            fmt_num(self.highlight_width)
        );
        let _ = writeln!(
            html,
            "#tooltip {{ position: absolute; opacity: 0; pointer-events: none; background-color: black; \
             color: white; border: solid 1px; border-radius: 5px; padding: 10px; transition: opacity 0.2s; }}"
        );
        let _ = writeln!(html, "</style>");
        let _ = writeln!(html, "</head>");
        let _ = writeln!(html, "<body>");
        let _ = writeln!(html, r#"<h1 id="title">{title}</h1>"#);
        let _ = writeln!(html, r#"<h3 id="description">{}</h3>"#, escape(&self.description));
        let _ = writeln!(html, r#"<div id="chart">"#);
        html.push_str(&chart.render());
        let _ = writeln!(html, "</div>");
        let _ = writeln!(html, r#"<div id="tooltip"></div>"#);
        let _ = writeln!(html, "</body>");
        let _ = writeln!(html, "</html>");
        html
    }

    /// Write the page to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, chart: &SvgEncoder, path: P) -> Result<()> {
        std::fs::write(path, self.render(chart))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_page_structure() {
        let chart = SvgEncoder::new(100, 100);
        let html = HtmlExporter::new("Monthly Global Land-Surface Temperature")
            .description("1753 - 2015: base temperature 8.66°C")
            .render(&chart);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<h1 id="title">Monthly Global Land-Surface Temperature</h1>"#));
        assert!(html.contains(r#"<h3 id="description">1753 - 2015: base temperature 8.66°C</h3>"#));
        assert!(html.contains(r#"<div id="chart">"#));
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"<div id="tooltip"></div>"#));
    }

    #[test]
    fn test_html_highlight_css() {
        let html = HtmlExporter::new("t")
            .highlight(Rgba::rgb(255, 0, 0), 2.0)
            .render(&SvgEncoder::new(10, 10));
        assert!(html.contains(".cell:hover { stroke: rgb(255,0,0); stroke-width: 2; }"));
    }

    #[test]
    fn test_html_escapes_title() {
        let html = HtmlExporter::new("<b>").render(&SvgEncoder::new(10, 10));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_html_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        HtmlExporter::new("t").write_to_file(&SvgEncoder::new(10, 10), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("</html>"));
    }
}
