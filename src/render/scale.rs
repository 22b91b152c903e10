use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};

use crate::config::SymLogParams;

// ---------------------------------------------------------------------------
// Symmetric-log transform
// ---------------------------------------------------------------------------

/// Linear within `±linthresh`, logarithmic beyond, continuous at the
/// threshold. Same parameterisation as matplotlib's `symlog` scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymLog {
    base: f64,
    linthresh: f64,
    linscale_adj: f64,
}

impl SymLog {
    pub fn new(params: SymLogParams) -> Self {
        Self {
            base: params.base,
            linthresh: params.linthresh,
            linscale_adj: params.linscale / (1.0 - params.base.recip()),
        }
    }

    pub fn forward(&self, value: f64) -> f64 {
        let abs = value.abs();
        if abs <= self.linthresh {
            value * self.linscale_adj
        } else {
            value.signum()
                * self.linthresh
                * (self.linscale_adj + (abs / self.linthresh).log(self.base))
        }
    }
}

// ---------------------------------------------------------------------------
// Axis coordinate for plotters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    Linear,
    SymLog(SymLog),
}

impl AxisScale {
    fn forward(&self, value: f64) -> f64 {
        match self {
            AxisScale::Linear => value,
            AxisScale::SymLog(s) => s.forward(value),
        }
    }
}

/// A fixed-range `f64` axis with explicit tick positions.
///
/// The range is inclusive at both ends and never adapts to the data.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCoord {
    range: Range<f64>,
    scale: AxisScale,
    ticks: Vec<f64>,
}

impl AxisCoord {
    pub fn new(range: (f64, f64), scale: AxisScale, ticks: &[f64]) -> Self {
        Self {
            range: range.0..range.1,
            scale,
            ticks: ticks.to_vec(),
        }
    }

    /// Ticks inside the axis range, in the order given.
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks
            .iter()
            .copied()
            .filter(|t| *t >= self.range.start && *t <= self.range.end)
    }

    /// Position of `value` along the axis as a fraction of its length.
    pub fn fraction(&self, value: f64) -> f64 {
        let lo = self.scale.forward(self.range.start);
        let hi = self.scale.forward(self.range.end);
        (self.scale.forward(value) - lo) / (hi - lo)
    }
}

impl Ranged for AxisCoord {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = f64::from(limit.1 - limit.0);
        limit.0 + (span * self.fraction(*value)).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        self.ticks().collect()
    }

    fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

// ---------------------------------------------------------------------------
// Tick labels
// ---------------------------------------------------------------------------

/// `10ⁿ` for exact powers of ten, plain decimal otherwise.
pub fn power_of_ten_label(value: f64) -> String {
    const SUPERSCRIPTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

    if value > 0.0 {
        let exponent = value.log10().round();
        if (10f64.powf(exponent) - value).abs() <= value * 1e-9 {
            let digits = (exponent as i64).unsigned_abs().to_string();
            let mut label = String::from("10");
            if exponent < 0.0 {
                label.push('⁻');
            }
            label.extend(
                digits
                    .bytes()
                    .map(|d| SUPERSCRIPTS[usize::from(d - b'0')]),
            );
            return label;
        }
    }
    format!("{value}")
}
