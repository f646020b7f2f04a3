//! WebAssembly bindings for variance-heatmap.
//!
//! Mounts the chart into an existing page and wires hover events to the
//! interaction handler.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount_heatmap, MountOptions } from 'variance-heatmap';
//!
//! await init();
//! await mount_heatmap('chart', 'description', new MountOptions().policy('quantize'));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use crate::config::ChartConfig;
use crate::geometry::Point;
use crate::interaction::{CellVisual, InteractionHandler, Tooltip};
use crate::pipeline::Chart;
use crate::scale::{BandKind, ColorPolicy};

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // WASM module initialized
}

// ============================================================================
// Mount Options
// ============================================================================

/// Options for the mounted chart.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    config: ChartConfig,
}

#[wasm_bindgen]
impl MountOptions {
    /// Default chart options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the dataset URL.
    #[wasm_bindgen]
    pub fn source(mut self, url: &str) -> Self {
        self.config.source_url = url.to_string();
        self
    }

    /// Set the canvas size in pixels.
    #[wasm_bindgen]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Color policy: `"interpolate"` or `"quantize"`.
    #[wasm_bindgen]
    pub fn policy(mut self, policy: &str) -> Self {
        self.config.color_policy = match policy {
            "quantize" => ColorPolicy::Quantize,
            _ => ColorPolicy::Interpolate,
        };
        self
    }

    /// Month axis layout: `"band"` or `"point"`.
    #[wasm_bindgen]
    pub fn month_scale(mut self, kind: &str) -> Self {
        self.config.month_scale = match kind {
            "point" => BandKind::Point,
            _ => BandKind::Band,
        };
        self
    }
}

// ============================================================================
// Mounting
// ============================================================================

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| js_error(format!("no element with id `{id}`")))
}

/// The page's `#tooltip` div, created if the page has none.
fn tooltip_element(document: &Document) -> Result<HtmlElement, JsValue> {
    let tooltip = match document.get_element_by_id("tooltip") {
        Some(existing) => existing,
        None => {
            let div = document.create_element("div")?;
            div.set_id("tooltip");
            let body = document.body().ok_or_else(|| js_error("document has no body"))?;
            body.append_child(&div)?;
            div
        }
    };
    let tooltip: HtmlElement = tooltip.dyn_into()?;
    let style = tooltip.style();
    style.set_property("position", "absolute")?;
    style.set_property("opacity", "0")?;
    style.set_property("pointer-events", "none")?;
    Ok(tooltip)
}

fn apply_visual(cell: &Element, visual: CellVisual) -> Result<(), JsValue> {
    match visual.stroke {
        Some(stroke) => {
            cell.set_attribute("stroke", &stroke.to_hex())?;
            cell.set_attribute("stroke-width", &visual.stroke_width.to_string())?;
        }
        None => {
            cell.remove_attribute("stroke")?;
            cell.remove_attribute("stroke-width")?;
        }
    }
    Ok(())
}

fn show_tooltip(tooltip: &HtmlElement, state: &Tooltip) -> Result<(), JsValue> {
    tooltip.set_inner_html(&state.html());
    let style = tooltip.style();
    style.set_property("left", &format!("{}px", state.position().x))?;
    style.set_property("top", &format!("{}px", state.position().y))?;
    style.set_property("opacity", "0.9")
}

/// Event handlers have no caller to return to; failures go to the console.
fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        web_sys::console::error_1(&e);
    }
}

fn cell_index(event: &MouseEvent) -> Option<(Element, usize)> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let class = target.get_attribute("class")?;
    if !class.split_whitespace().any(|c| c == "cell") {
        return None;
    }
    let index = target.get_attribute("data-index")?.parse().ok()?;
    Some((target, index))
}

fn find_cell(chart: &Element, index: usize) -> Option<Element> {
    chart
        .query_selector(&format!(r#"[data-index="{index}"]"#))
        .ok()
        .flatten()
}

/// Fetch the dataset and render it into `#<chart_id>`, writing the subtitle into
/// `#<description_id>`.
///
/// Errors are logged to the console and returned; nothing is drawn on failure.
#[wasm_bindgen]
pub async fn mount_heatmap(
    chart_id: String,
    description_id: String,
    options: Option<MountOptions>,
) -> Result<(), JsValue> {
    let config = options.unwrap_or_default().config;
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let chart_el = element(&document, &chart_id)?;
    let description_el = element(&document, &description_id)?;

    let client = reqwest::Client::new();
    let chart = match Chart::load(&client, &config).await {
        Ok(chart) => chart,
        Err(e) => {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
            return Err(js_error(e));
        }
    };

    chart_el.set_inner_html(&chart.to_svg());
    description_el.set_text_content(Some(&chart.subtitle()));

    let tooltip = tooltip_element(&document)?;
    let handler: Rc<RefCell<InteractionHandler>> = Rc::new(RefCell::new(chart.interaction().clone()));

    let over = {
        let handler = Rc::clone(&handler);
        let chart_el = chart_el.clone();
        let tooltip = tooltip.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some((cell, index)) = cell_index(&event) else {
                return;
            };
            let mut handler = handler.borrow_mut();
            let previous = handler.hovered();
            let pointer = Point::new(f64::from(event.page_x()), f64::from(event.page_y()));
            let Some(state) = handler.pointer_enter(index, pointer) else {
                return;
            };
            report(show_tooltip(&tooltip, state));

            if let Some(prev) = previous.filter(|&p| p != index) {
                if let Some(prev_cell) = find_cell(&chart_el, prev) {
                    report(apply_visual(&prev_cell, handler.cell_visual(prev)));
                }
            }
            report(apply_visual(&cell, handler.cell_visual(index)));
        })
    };

    let out = {
        let handler = Rc::clone(&handler);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some((cell, index)) = cell_index(&event) else {
                return;
            };
            let mut handler = handler.borrow_mut();
            handler.pointer_leave(index);
            report(apply_visual(&cell, handler.cell_visual(index)));
            if !handler.tooltip().is_visible() {
                report(tooltip.style().set_property("opacity", "0"));
            }
        })
    };

    chart_el.add_event_listener_with_callback("mouseover", over.as_ref().unchecked_ref())?;
    chart_el.add_event_listener_with_callback("mouseout", out.as_ref().unchecked_ref())?;
    // The listeners live as long as the page.
    over.forget();
    out.forget();

    Ok(())
}
