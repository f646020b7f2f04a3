//! Year-by-month temperature heat map.
//!
//! Years run along the horizontal axis, months down the vertical axis
//! (January at the top), and each cell is colored by its absolute temperature.
//! A color legend with its own temperature axis sits below the plot.
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Bostock, M. et al. (2011). "D3: Data-Driven Documents." IEEE TVCG.

use tracing::debug;

use crate::color::{Rgba, TEMPERATURE_PALETTE};
use crate::config::ChartConfig;
use crate::dataset::{Dataset, Month, TemperatureRecord};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::output::{Paint, SvgElement, SvgEncoder, TextAnchor};
use crate::scale::{BandScale, ColorPolicy, ColorScale, LinearScale, Scale};

/// Id of the gradient that fills the continuous legend bar.
pub const LEGEND_GRADIENT_ID: &str = "legend-gradient";

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Position and color scales derived from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapScales {
    /// Year onto the plotting width, padded by one year on each side.
    pub x: LinearScale,
    /// The 12 months onto the plotting height, January at the top.
    pub y: BandScale,
    /// Absolute temperature onto the palette.
    pub color: ColorScale,
    /// Absolute temperature onto the legend bar width.
    pub legend: LinearScale,
    /// Width of one cell: plotting width over the number of distinct years.
    /// Cells near the right edge are clipped to it, see [`Self::cell_bounds`].
    pub cell_width: f64,
}

impl HeatmapScales {
    /// Build the scales for `dataset` laid out per `config`.
    ///
    /// All temperatures being equal widens the temperature domain by 0.5 each way.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyDataset`] if the dataset has no records.
    pub fn build(dataset: &Dataset, config: &ChartConfig) -> Result<Self> {
        let (min_year, max_year) = dataset.year_extent().ok_or(Error::EmptyDataset)?;
        let (lo, hi) = dataset.temperature_extent().ok_or(Error::EmptyDataset)?;

        // Handle case where all values are the same
        let (lo, hi) = if (hi - lo).abs() < f64::EPSILON {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        };

        let area = config.plot_area();
        let x = LinearScale::new(
            (f64::from(min_year) - 1.0, f64::from(max_year) + 1.0),
            (area.x, area.right()),
        );
        let y = BandScale::new(Month::ALL.len(), (area.y, area.bottom()), config.month_scale);
        let color = ColorScale::new(TEMPERATURE_PALETTE.to_vec(), (lo, hi), config.color_policy);
        let legend = LinearScale::new((lo, hi), (0.0, config.legend.width));
        let cell_width = area.width / dataset.distinct_years() as f64;

        debug!(
            years = ?(min_year, max_year),
            temperatures = ?(lo, hi),
            policy = ?config.color_policy,
            "scales built"
        );

        Ok(Self {
            x,
            y,
            color,
            legend,
            cell_width,
        })
    }

    /// Canvas rectangle of the cell for `record`.
    ///
    /// The width never reaches past the right end of the year scale, so a
    /// sparse or single-year dataset stays inside the plotting area.
    #[must_use]
    pub fn cell_bounds(&self, record: &TemperatureRecord) -> Rect {
        let (top, height) = self.y.cell_span(record.month.index());
        let x = self.x.scale(f64::from(record.year));
        let width = self.cell_width.min(self.x.range().1 - x).max(0.0);
        Rect::new(x, top, width, height)
    }
}

/// Everything known about one drawn cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMeta {
    /// Position of the source record in the dataset.
    pub index: usize,
    /// Year of the record.
    pub year: i32,
    /// Month of the record.
    pub month: Month,
    /// Absolute temperature, base plus variance.
    pub temperature: f64,
    /// Variance from the base temperature.
    pub variance: f64,
    /// Where the cell was drawn.
    pub bounds: Rect,
    /// Fill color.
    pub fill: Rgba,
}

impl CellMeta {
    /// Tooltip lines: `"<year> - <Month>"`, temperature and variance to one decimal.
    #[must_use]
    pub fn tooltip_lines(&self) -> [String; 3] {
        [
            format!("{} - {}", self.year, self.month),
            format_celsius(self.temperature),
            format_celsius(self.variance),
        ]
    }

    /// Tooltip lines joined by newlines.
    #[must_use]
    pub fn tooltip_text(&self) -> String {
        self.tooltip_lines().join("\n")
    }
}

/// One decimal place with the unit, never printing `-0.0`.
#[must_use]
pub fn format_celsius(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}°C")
}

/// The configured heat map over one dataset.
#[derive(Debug, Clone)]
pub struct VarianceHeatmap {
    dataset: Dataset,
    scales: HeatmapScales,
    config: ChartConfig,
}

impl VarianceHeatmap {
    /// Validate the configuration and build the scales.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an unusable configuration, [`Error::EmptyDataset`]
    /// if there is nothing to draw.
    pub fn new(dataset: Dataset, config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let scales = HeatmapScales::build(&dataset, &config)?;
        Ok(Self {
            dataset,
            scales,
            config,
        })
    }

    /// The dataset being drawn.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The derived scales.
    #[must_use]
    pub const fn scales(&self) -> &HeatmapScales {
        &self.scales
    }

    /// The chart configuration.
    #[must_use]
    pub const fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Subtitle text for the chart description element.
    #[must_use]
    pub fn subtitle(&self) -> String {
        self.dataset.subtitle().unwrap_or_default()
    }

    /// An empty canvas of the configured size.
    #[must_use]
    pub fn canvas(&self) -> SvgEncoder {
        SvgEncoder::new(
            self.config.width.round() as u32,
            self.config.height.round() as u32,
        )
    }

    /// Cell metadata in record order, without drawing anything.
    #[must_use]
    pub fn cells(&self) -> Vec<CellMeta> {
        self.dataset
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let temperature = self.dataset.temperature(record);
                CellMeta {
                    index,
                    year: record.year,
                    month: record.month,
                    temperature,
                    variance: record.variance,
                    bounds: self.scales.cell_bounds(record),
                    fill: self.scales.color.scale(temperature),
                }
            })
            .collect()
    }

    /// Draw axes, cells and legend into `canvas`.
    ///
    /// The canvas must be empty: drawing twice into the same canvas duplicates
    /// every element. Clearing it is the caller's job.
    pub fn render(&self, canvas: &mut SvgEncoder) -> Vec<CellMeta> {
        let cells = self.cells();

        canvas.add_element(self.x_axis());
        canvas.add_element(self.y_axis());

        let mut group = SvgElement::group(Some("cells"), None, None);
        for cell in &cells {
            group.push(cell_element(cell));
        }
        canvas.add_element(group);

        if self.config.color_policy == ColorPolicy::Interpolate {
            canvas.add_element(self.legend_gradient());
        }
        canvas.add_element(self.legend());

        debug!(cells = cells.len(), "heat map rendered");
        cells
    }

    fn text(&self, x: f64, y: f64, text: String, anchor: TextAnchor, dy: f64) -> SvgElement {
        SvgElement::Text {
            x,
            y,
            text,
            font_size: self.config.font_size,
            fill: Rgba::BLACK,
            anchor,
            dy,
        }
    }

    /// Bottom axis: one tick per whole year the tick generator picks.
    fn x_axis(&self) -> SvgElement {
        let area = self.config.plot_area();
        let (r0, r1) = self.scales.x.range();
        let mut axis = SvgElement::group(Some("x-axis"), None, Some((0.0, area.bottom())));

        axis.push(domain_path(&format!("M{},{TICK_SIZE}V0H{}V{TICK_SIZE}", r0, r1)));
        for year in self.scales.x.ticks(self.config.x_ticks) {
            if year.fract() != 0.0 {
                continue;
            }
            let mut tick = SvgElement::group(None, Some("tick"), Some((self.scales.x.scale(year), 0.0)));
            tick.push(tick_line(0.0, TICK_SIZE));
            tick.push(self.text(0.0, TICK_SIZE + TICK_PADDING, format!("{year:.0}"), TextAnchor::Middle, 0.71));
            axis.push(tick);
        }
        axis
    }

    /// Left axis: the month names, centred on their bands.
    fn y_axis(&self) -> SvgElement {
        let area = self.config.plot_area();
        let (r0, r1) = self.scales.y.range();
        let mut axis = SvgElement::group(Some("y-axis"), None, Some((area.x, 0.0)));

        axis.push(domain_path(&format!("M-{TICK_SIZE},{r0}H0V{r1}H-{TICK_SIZE}")));
        for month in Month::ALL {
            let mut tick =
                SvgElement::group(None, Some("tick"), Some((0.0, self.scales.y.center(month.index()))));
            tick.push(SvgElement::Line {
                x1: -TICK_SIZE,
                y1: 0.0,
                x2: 0.0,
                y2: 0.0,
                stroke: Rgba::BLACK,
                stroke_width: 1.0,
            });
            tick.push(self.text(
                -(TICK_SIZE + TICK_PADDING),
                0.0,
                month.name().to_string(),
                TextAnchor::End,
                0.32,
            ));
            axis.push(tick);
        }
        axis
    }

    /// Gradient with one evenly spaced stop per palette color.
    fn legend_gradient(&self) -> SvgElement {
        let colors = self.scales.color.colors();
        let last = colors.len().saturating_sub(1).max(1) as f64;
        SvgElement::LinearGradient {
            id: LEGEND_GRADIENT_ID.to_string(),
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64 / last, *c))
                .collect(),
        }
    }

    fn legend(&self) -> SvgElement {
        let area = self.config.plot_area();
        let legend = &self.config.legend;
        let mut group = SvgElement::group(
            Some("legend"),
            None,
            Some((area.x, area.bottom() + legend.offset)),
        );

        match self.config.color_policy {
            ColorPolicy::Interpolate => group.push(SvgElement::Rect {
                x: 0.0,
                y: legend.offset,
                width: legend.width,
                height: legend.height,
                fill: Paint::Url(LEGEND_GRADIENT_ID.to_string()),
                stroke: None,
                stroke_width: 0.0,
                attrs: vec![("class".to_string(), "legend-bar".to_string())],
                title: None,
            }),
            ColorPolicy::Quantize => {
                let colors = self.scales.color.colors();
                let swatch = legend.width / colors.len().max(1) as f64;
                for (i, color) in colors.iter().enumerate() {
                    group.push(SvgElement::Rect {
                        x: swatch * i as f64,
                        y: legend.offset,
                        width: swatch,
                        height: legend.height,
                        fill: Paint::Color(*color),
                        stroke: None,
                        stroke_width: 0.0,
                        attrs: vec![("class".to_string(), "legend-swatch".to_string())],
                        title: None,
                    });
                }
            }
        }

        group.push(self.legend_axis());
        group
    }

    /// Temperature axis under the legend bar, spanning the color domain.
    fn legend_axis(&self) -> SvgElement {
        let legend = &self.config.legend;
        let scale = &self.scales.legend;
        let precision = scale.tick_precision(legend.ticks);
        let mut axis = SvgElement::group(
            Some("legend-axis"),
            None,
            Some((0.0, legend.offset + legend.height)),
        );

        axis.push(domain_path(&format!(
            "M0,{TICK_SIZE}V0H{}V{TICK_SIZE}",
            legend.width
        )));
        for value in scale.ticks(legend.ticks) {
            let mut tick = SvgElement::group(None, Some("tick"), Some((scale.scale(value), 0.0)));
            tick.push(tick_line(0.0, TICK_SIZE));
            tick.push(self.text(
                0.0,
                TICK_SIZE + TICK_PADDING,
                format!("{value:.precision$}°C"),
                TextAnchor::Middle,
                0.71,
            ));
            axis.push(tick);
        }
        axis
    }
}

fn domain_path(d: &str) -> SvgElement {
    SvgElement::Path {
        d: d.to_string(),
        fill: None,
        stroke: Some(Rgba::BLACK),
        stroke_width: 1.0,
    }
}

fn tick_line(y1: f64, y2: f64) -> SvgElement {
    SvgElement::Line {
        x1: 0.0,
        y1,
        x2: 0.0,
        y2,
        stroke: Rgba::BLACK,
        stroke_width: 1.0,
    }
}

fn cell_element(cell: &CellMeta) -> SvgElement {
    SvgElement::Rect {
        x: cell.bounds.x,
        y: cell.bounds.y,
        width: cell.bounds.width,
        height: cell.bounds.height,
        fill: Paint::Color(cell.fill),
        stroke: None,
        stroke_width: 0.0,
        attrs: vec![
            ("class".to_string(), "cell".to_string()),
            ("data-index".to_string(), cell.index.to_string()),
            ("data-year".to_string(), cell.year.to_string()),
            ("data-month".to_string(), cell.month.name().to_string()),
            ("data-temp".to_string(), cell.temperature.to_string()),
        ],
        title: Some(cell.tooltip_text()),
    }
}
