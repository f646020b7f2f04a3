//! SVG canvas.
//!
//! Elements are kept as a tree so tests can look them up by id, class or
//! `data-*` attribute before (or instead of) serializing to text.

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG canvas: dimensions, background and an ordered element tree.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Top-level elements in paint order
    elements: Vec<SvgElement>,
}

/// How a shape is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Solid color.
    Color(Rgba),
    /// Reference to a paint server such as a gradient, by element id.
    Url(String),
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Self::Color(color)
    }
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle, optionally carrying extra attributes and a `<title>` child
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Paint,
        stroke: Option<Rgba>,
        stroke_width: f64,
        attrs: Vec<(String, String)>,
        title: Option<String>,
    },
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f64,
    },
    /// Text; `dy` is a baseline shift in em (0 for none)
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
        dy: f64,
    },
    /// Group with optional id, class and translation
    Group {
        id: Option<String>,
        class: Option<String>,
        translate: Option<(f64, f64)>,
        children: Vec<SvgElement>,
    },
    /// Horizontal linear gradient, rendered inside `<defs>`; stops are (offset 0-1, color)
    LinearGradient { id: String, stops: Vec<(f64, Rgba)> },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl SvgElement {
    /// An empty group with the given id.
    #[must_use]
    pub fn group(id: Option<&str>, class: Option<&str>, translate: Option<(f64, f64)>) -> Self {
        Self::Group {
            id: id.map(str::to_string),
            class: class.map(str::to_string),
            translate,
            children: Vec::new(),
        }
    }

    /// Append a child; no-op on anything but a group.
    pub fn push(&mut self, child: SvgElement) {
        if let Self::Group { children, .. } = self {
            children.push(child);
        }
    }

    /// Children of a group (empty for other elements).
    #[must_use]
    pub fn children(&self) -> &[SvgElement] {
        match self {
            Self::Group { children, .. } => children,
            _ => &[],
        }
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Group { id, .. } => id.as_deref(),
            Self::LinearGradient { id, .. } => Some(id),
            _ => self.attr("id"),
        }
    }

    /// Value of an extra attribute on a rectangle, or the class of a group.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Rect { attrs, .. } => attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
            Self::Group { class, .. } if name == "class" => class.as_deref(),
            _ => None,
        }
    }

    /// Whether the element's class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// Depth-first visit of this element and all descendants.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a SvgElement>) {
        out.push(self);
        for child in self.children() {
            child.walk(out);
        }
    }
}

impl SvgEncoder {
    /// Create an empty canvas with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Top-level elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Whether nothing has been drawn yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements, depth first.
    #[must_use]
    pub fn descendants(&self) -> Vec<&SvgElement> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.walk(&mut out);
        }
        out
    }

    /// First element with the given id, searching the whole tree.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&SvgElement> {
        self.descendants().into_iter().find(|e| e.id() == Some(id))
    }

    /// All elements carrying `class`, in paint order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<&SvgElement> {
        self.descendants()
            .into_iter()
            .filter(|e| e.has_class(class))
            .collect()
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 160);

        // SVG header
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        // Background
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            rgba_to_css(&Rgba::WHITE)
        );

        // Elements
        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        // Close SVG
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Convert RGBA to CSS color string.
pub(crate) fn rgba_to_css(color: &Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0
        )
    }
}

/// Shortest decimal form, rounded to 1/1000 of a unit.
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Escape XML special characters for text content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn paint_to_css(paint: &Paint) -> String {
    match paint {
        Paint::Color(c) => rgba_to_css(c),
        Paint::Url(id) => format!("url(#{})", escape(id)),
    }
}

fn stroke_attr(stroke: Option<Rgba>, stroke_width: f64) -> String {
    stroke
        .map(|s| {
            format!(
                r#" stroke="{}" stroke-width="{}""#,
                rgba_to_css(&s),
                fmt_num(stroke_width)
            )
        })
        .unwrap_or_default()
}

fn write_element(svg: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
            attrs,
            title,
        } => {
            let extra: String = attrs
                .iter()
                .map(|(k, v)| format!(r#" {}="{}""#, escape(k), escape(v)))
                .collect();
            let head = format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}{extra}"#,
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*width),
                fmt_num(*height),
                paint_to_css(fill),
                stroke_attr(*stroke, *stroke_width),
            );
            match title {
                Some(title) => {
                    let _ = writeln!(svg, "{indent}{head}><title>{}</title></rect>", escape(title));
                }
                None => {
                    let _ = writeln!(svg, "{indent}{head}/>");
                }
            }
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = writeln!(
                svg,
                r#"{indent}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt_num(*x1),
                fmt_num(*y1),
                fmt_num(*x2),
                fmt_num(*y2),
                rgba_to_css(stroke),
                fmt_num(*stroke_width)
            );
        }
        SvgElement::Path {
            d,
            fill,
            stroke,
            stroke_width,
        } => {
            let fill_attr = fill
                .map(|f| rgba_to_css(&f))
                .unwrap_or_else(|| "none".to_string());
            let _ = writeln!(
                svg,
                r#"{indent}<path d="{}" fill="{fill_attr}"{}/>"#,
                escape(d),
                stroke_attr(*stroke, *stroke_width)
            );
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            dy,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let dy_attr = if *dy == 0.0 {
                String::new()
            } else {
                format!(r#" dy="{}em""#, fmt_num(*dy))
            };
            let _ = writeln!(
                svg,
                r#"{indent}<text x="{}" y="{}"{dy_attr} font-size="{}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{}</text>"#,
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*font_size),
                rgba_to_css(fill),
                escape(text)
            );
        }
        SvgElement::Group {
            id,
            class,
            translate,
            children,
        } => {
            let mut head = String::from("<g");
            if let Some(id) = id {
                let _ = write!(head, r#" id="{}""#, escape(id));
            }
            if let Some(class) = class {
                let _ = write!(head, r#" class="{}""#, escape(class));
            }
            if let Some((tx, ty)) = translate {
                let _ = write!(head, r#" transform="translate({},{})""#, fmt_num(*tx), fmt_num(*ty));
            }
            let _ = writeln!(svg, "{indent}{head}>");
            for child in children {
                write_element(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</g>");
        }
        SvgElement::LinearGradient { id, stops } => {
            let _ = writeln!(svg, r#"{indent}<defs><linearGradient id="{}">"#, escape(id));
            for (offset, color) in stops {
                let _ = writeln!(
                    svg,
                    r#"{indent}  <stop offset="{}%" stop-color="{}"/>"#,
                    fmt_num(offset * 100.0),
                    rgba_to_css(color)
                );
            }
            let _ = writeln!(svg, "{indent}</linearGradient></defs>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(year: &str) -> SvgElement {
        SvgElement::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            fill: Paint::Color(Rgba::BLACK),
            stroke: None,
            stroke_width: 0.0,
            attrs: vec![
                ("class".to_string(), "cell".to_string()),
                ("data-year".to_string(), year.to_string()),
            ],
            title: Some("1753 - January".to_string()),
        }
    }

    #[test]
    fn test_svg_encoder_new() {
        let encoder = SvgEncoder::new(800, 600);
        let svg = encoder.render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(encoder.is_empty());
    }

    fn text(text: &str, anchor: TextAnchor, dy: f64) -> SvgElement {
        SvgElement::Text {
            x: 50.0,
            y: 50.0,
            text: text.to_string(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor,
            dy,
        }
    }

    #[test]
    fn test_svg_rect() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(cell("1753"));
        let svg = encoder.render();

        assert!(svg.contains("<rect x=\"1\" y=\"2\" width=\"3\" height=\"4\" fill=\"rgb(0,0,0)\""));
        // Background plus the cell.
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_svg_line() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(SvgElement::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 6.0,
            stroke: Rgba::BLACK,
            stroke_width: 2.0,
        });
        let svg = encoder.render();

        assert!(svg.contains("<line"));
        assert!(svg.contains("y2=\"6\""));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(text("<script>alert('xss')</script>", TextAnchor::Start, 0.0));
        let svg = encoder.render();

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_svg_text_anchor_and_dy() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(text("January", TextAnchor::End, 0.32));
        encoder.add_element(text("1900", TextAnchor::Middle, 0.0));
        let svg = encoder.render();

        assert!(svg.contains(r#"dy="0.32em" font-size="12" fill="rgb(0,0,0)" text-anchor="end""#));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert_eq!(svg.matches("dy=").count(), 1);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(&Rgba::new(255, 0, 0, 128));
        assert!(css.contains("rgba"));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(624.150_943_396), "624.151");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(-6.0), "-6");
    }

    #[test]
    fn test_group_rendering_and_lookup() {
        let mut group = SvgElement::group(Some("x-axis"), None, Some((0.0, 300.0)));
        group.push(cell("1753"));
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(group);

        let svg = encoder.render();
        assert!(svg.contains(r#"<g id="x-axis" transform="translate(0,300)">"#));
        assert!(svg.contains("</g>"));

        let found = encoder.find_by_id("x-axis").unwrap();
        assert_eq!(found.children().len(), 1);
        assert!(encoder.find_by_id("y-axis").is_none());
    }

    #[test]
    fn test_rect_attributes_and_title() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(cell("1753"));
        let svg = encoder.render();

        assert!(svg.contains(r#"class="cell" data-year="1753""#));
        assert!(svg.contains("><title>1753 - January</title></rect>"));

        let cells = encoder.find_by_class("cell");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].attr("data-year"), Some("1753"));
    }

    #[test]
    fn test_linear_gradient() {
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(SvgElement::LinearGradient {
            id: "legend-gradient".to_string(),
            stops: vec![(0.0, Rgba::BLACK), (1.0, Rgba::WHITE)],
        });
        encoder.add_element(SvgElement::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            fill: Paint::Url("legend-gradient".to_string()),
            stroke: None,
            stroke_width: 0.0,
            attrs: Vec::new(),
            title: None,
        });
        let svg = encoder.render();

        assert!(svg.contains(r#"<linearGradient id="legend-gradient">"#));
        assert!(svg.contains(r#"<stop offset="0%" stop-color="rgb(0,0,0)"/>"#));
        assert!(svg.contains(r#"<stop offset="100%" stop-color="rgb(255,255,255)"/>"#));
        assert!(svg.contains(r#"fill="url(#legend-gradient)""#));
        assert!(encoder.find_by_id("legend-gradient").is_some());
    }

    #[test]
    fn test_push_on_non_group_is_noop() {
        let mut line = SvgElement::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            stroke: Rgba::BLACK,
            stroke_width: 1.0,
        };
        line.push(cell("1753"));
        assert!(line.children().is_empty());
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let mut encoder = SvgEncoder::new(100, 100);
        encoder.add_element(cell("1753"));
        encoder.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("</svg>"));
    }
}
