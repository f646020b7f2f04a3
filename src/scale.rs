//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
///
/// A degenerate domain (min == max) maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Human-friendly tick values covering the domain, roughly `count` of them.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain_min, self.domain_max);
        ticks(lo, hi, count)
    }

    /// Number of decimals needed to print the ticks of [`Self::ticks`].
    #[must_use]
    pub fn tick_precision(&self, count: usize) -> usize {
        let (lo, hi) = ordered(self.domain_min, self.domain_max);
        tick_precision(tick_step(lo, hi, count))
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        let t = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_min) / span
        };
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Tick increment: positive means a step of `inc`, negative means a step of `1 / -inc`.
///
/// Steps are 1, 2 or 5 times a power of ten. Thresholds sit at the geometric
/// means sqrt(50), sqrt(10), sqrt(2) so the chosen step is the closest to the raw one.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Tick step size for an ascending domain.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if stop <= start || start.is_nan() || stop.is_nan() {
        return 0.0;
    }
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Generate nicely rounded tick values within `[start, stop]`.
///
/// Values are computed as integer multiples of the step so they print cleanly.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    if start > stop {
        let mut reversed = ticks(stop, start, count);
        reversed.reverse();
        return reversed;
    }

    let inc = tick_increment(start, stop, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let (mut i1, mut i2);
    if inc < 0.0 {
        let inv = -inc;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        if i2 < i1 {
            return Vec::new();
        }
        (0..=((i2 - i1) as usize)).map(|i| (i1 + i as f64) / inv).collect()
    } else {
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        if i2 < i1 {
            return Vec::new();
        }
        (0..=((i2 - i1) as usize)).map(|i| (i1 + i as f64) * inc).collect()
    }
}

/// Decimal places needed to print ticks spaced by `step` without noise.
#[must_use]
pub fn tick_precision(step: f64) -> usize {
    if step <= 0.0 || !step.is_finite() {
        return 0;
    }
    // The epsilon keeps exact powers of ten from gaining a digit through log10 noise.
    (-step.log10() - 1e-9).ceil().max(0.0) as usize
}

/// How a [`BandScale`] lays its categories out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandKind {
    /// Equal contiguous intervals covering the whole range.
    #[default]
    Band,
    /// Evenly spaced single coordinates; first and last sit on the range ends.
    Point,
}

/// Ordinal scale mapping category indices `0..count` onto a screen interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range_start: f64,
    range_end: f64,
    kind: BandKind,
}

impl BandScale {
    /// Create a band scale over `count` categories.
    #[must_use]
    pub const fn new(count: usize, range: (f64, f64), kind: BandKind) -> Self {
        Self {
            count,
            range_start: range.0,
            range_end: range.1,
            kind,
        }
    }

    /// Distance between the positions of adjacent categories.
    #[must_use]
    pub fn step(&self) -> f64 {
        let span = self.range_end - self.range_start;
        match self.kind {
            BandKind::Band if self.count > 0 => span / self.count as f64,
            BandKind::Point if self.count > 1 => span / (self.count - 1) as f64,
            _ => 0.0,
        }
    }

    /// Width of one band; zero for point scales.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self.kind {
            BandKind::Band => self.step(),
            BandKind::Point => 0.0,
        }
    }

    /// Start of the band (or the point) for category `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> f64 {
        if self.kind == BandKind::Point && self.count == 1 {
            return (self.range_start + self.range_end) / 2.0;
        }
        self.range_start + self.step() * index as f64
    }

    /// Centre of category `index`, where its axis tick goes.
    #[must_use]
    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.bandwidth() / 2.0
    }

    /// Interval `(start, length)` a cell in category `index` occupies.
    ///
    /// Point scales give each category one step, centred on its point.
    #[must_use]
    pub fn cell_span(&self, index: usize) -> (f64, f64) {
        match self.kind {
            BandKind::Band => (self.position(index), self.bandwidth()),
            BandKind::Point => {
                let step = self.step();
                (self.position(index) - step / 2.0, step)
            }
        }
    }

    /// Range extent.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }
}

/// How a [`ColorScale`] turns a value into one of its colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPolicy {
    /// Linear blend between adjacent palette colors; stops spread evenly across the domain.
    #[default]
    Interpolate,
    /// Equal-width buckets, one palette color each, hard boundaries.
    Quantize,
}

/// Color scale for mapping values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f64,
    domain_max: f64,
    policy: ColorPolicy,
}

impl ColorScale {
    /// Create a new color scale. Values outside the domain are clamped.
    ///
    /// An empty color list maps everything to black.
    #[must_use]
    pub fn new(colors: Vec<Rgba>, domain: (f64, f64), policy: ColorPolicy) -> Self {
        Self {
            colors,
            domain_min: domain.0,
            domain_max: domain.1,
            policy,
        }
    }

    /// Palette colors, in domain order.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    fn normalize(&self, value: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        if span == 0.0 {
            return 0.5;
        }
        ((value - self.domain_min) / span).clamp(0.0, 1.0)
    }
}

impl Scale<f64, Rgba> for ColorScale {
    fn scale(&self, value: f64) -> Rgba {
        let n = self.colors.len();
        match n {
            0 => return Rgba::BLACK,
            1 => return self.colors[0],
            _ => {}
        }

        let t = self.normalize(value);

        match self.policy {
            ColorPolicy::Quantize => {
                let bucket = ((t * n as f64).floor() as usize).min(n - 1);
                self.colors[bucket]
            }
            ColorPolicy::Interpolate => {
                let segment_count = n - 1;
                let segment = ((t * segment_count as f64).floor() as usize).min(segment_count - 1);
                let local_t = t * segment_count as f64 - segment as f64;
                self.colors[segment].lerp(self.colors[segment + 1], local_t)
            }
        }
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (
            *self.colors.first().unwrap_or(&Rgba::BLACK),
            *self.colors.last().unwrap_or(&Rgba::BLACK),
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::color::TEMPERATURE_PALETTE;
    use proptest::prelude::*;

    fn palette_position(color: Rgba, scale: &ColorScale) -> f64 {
        // Position along the palette polyline, recovered from the nearest segment.
        let colors = scale.colors();
        let mut best = (f64::INFINITY, 0.0);
        for (i, pair) in colors.windows(2).enumerate() {
            for step in 0..=100 {
                let t = f64::from(step) / 100.0;
                let c = pair[0].lerp(pair[1], t);
                let d = (i32::from(c.r) - i32::from(color.r)).abs()
                    + (i32::from(c.g) - i32::from(color.g)).abs()
                    + (i32::from(c.b) - i32::from(color.b)).abs();
                if f64::from(d) < best.0 {
                    best = (f64::from(d), i as f64 + t);
                }
            }
        }
        best.1
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Linear scales hit both range ends exactly at the domain ends.
        #[test]
        fn prop_linear_scale_boundaries(
            lo in -5000.0f64..5000.0,
            span in 1.0f64..500.0,
            r0 in 0.0f64..100.0,
            r1 in 200.0f64..1000.0
        ) {
            let scale = LinearScale::new((lo, lo + span), (r0, r1));
            prop_assert!((scale.scale(lo) - r0).abs() < 1e-9);
            prop_assert!((scale.scale(lo + span) - r1).abs() < 1e-6);
        }

        /// Ticks stay inside the domain and ascend.
        #[test]
        fn prop_ticks_within_domain(lo in -1000.0f64..1000.0, span in 0.01f64..1000.0, count in 1usize..20) {
            let t = ticks(lo, lo + span, count);
            for pair in t.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for v in &t {
                prop_assert!(*v >= lo - 1e-9 && *v <= lo + span + 1e-9);
            }
        }

        /// Interpolated colors move forward along the palette as temperature rises.
        #[test]
        fn prop_interpolate_monotonic(a in 0.0f64..10.0, b in 0.0f64..10.0) {
            let scale = ColorScale::new(TEMPERATURE_PALETTE.to_vec(), (0.0, 10.0), ColorPolicy::Interpolate);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = palette_position(scale.scale(lo), &scale);
            let p_hi = palette_position(scale.scale(hi), &scale);
            // Rounding to 8-bit channels costs at most one sample step.
            prop_assert!(p_lo <= p_hi + 0.05, "{} -> {}, {} -> {}", lo, p_lo, hi, p_hi);
        }

        /// Quantized colors always come from the palette.
        #[test]
        fn prop_quantize_outputs_palette(v in -20.0f64..40.0) {
            let scale = ColorScale::new(TEMPERATURE_PALETTE.to_vec(), (0.0, 20.0), ColorPolicy::Quantize);
            prop_assert!(TEMPERATURE_PALETTE.contains(&scale.scale(v)));
        }
    }
}
