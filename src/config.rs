use std::path::PathBuf;

use serde::Serialize;

use crate::color::Gray;
use crate::data::model::SeriesKind;

// ---------------------------------------------------------------------------
// Styling records
// ---------------------------------------------------------------------------

/// Scatter marker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    Square,
    TriangleDown,
    TriangleUp,
    Diamond,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub shape: MarkerShape,
    pub shade: Gray,
    /// Marker area in square points.
    pub area: f64,
}

/// A stroked line with an on/off dash pattern, lengths in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub shade: Gray,
    pub alpha: f32,
    pub width: f64,
    /// `None` draws a solid line.
    pub dash: Option<(f64, f64)>,
}

/// Symmetric-log parameters; see [`crate::render::scale::SymLog`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymLogParams {
    pub base: f64,
    pub linthresh: f64,
    pub linscale: f64,
}

/// Figure size and the axes placement inside it, as figure fractions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub width_in: f64,
    pub height_in: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// Drawing units per point; plotters positions are integral, so the
    /// canvas is drawn finer than one unit per point.
    pub units_per_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSizes {
    pub title: f64,
    pub tick_label: f64,
    pub era_label: f64,
    pub legend: f64,
    pub credits: f64,
}

// ---------------------------------------------------------------------------
// ChartConfig
// ---------------------------------------------------------------------------

/// Every constant of the chart. Built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_stem: String,

    pub title: String,
    pub t_start: f64,
    pub t_multicore: f64,
    pub t_end: f64,

    /// Horizontal inset of each era band from the era boundaries.
    pub band_x_margin: f64,
    /// Vertical inset of the bands from the `[-1, 1]` strip.
    pub band_y_margin: f64,
    pub band_shade: Gray,

    pub era_label_y: f64,
    pub era_label_shade: Gray,
    pub single_core_label: String,
    pub multi_core_label: String,

    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub y_scale: SymLogParams,

    pub figure: FigureLayout,
    pub fonts: FontSizes,
    pub dpi: f64,
    pub pad_inches: f64,

    pub divider: LineStyle,
    pub grid: LineStyle,
    pub axis_width: f64,
    pub tick_length: f64,

    /// Legend top-left corner, as fractions of the axes box from its top-left.
    pub legend_anchor: (f64, f64),
    pub legend_border_width: f64,

    /// Anchor of the first credit line, in data coordinates.
    pub credits_at: (f64, f64),
    pub credits: Vec<String>,

    pub series: Vec<(SeriesKind, SeriesStyle)>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let t_start = 1970.0;
        let t_end = 2021.0;
        let black_quarter = |width: f64, dash: (f64, f64)| LineStyle {
            shade: Gray::BLACK,
            alpha: 0.25,
            width,
            dash: Some(dash),
        };
        let style = |shape, shade| SeriesStyle {
            shape,
            shade: Gray(shade),
            area: 5.0,
        };

        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            output_stem: "processor_trends".to_string(),

            title: "Microprocessor Trends".to_string(),
            t_start,
            t_multicore: 2004.25,
            t_end,

            band_x_margin: 0.75,
            band_y_margin: 0.35,
            band_shade: Gray(0.7),

            era_label_y: -0.05,
            era_label_shade: Gray(0.2),
            single_core_label: "Single-core era".to_string(),
            multi_core_label: "Multi-core era".to_string(),

            x_range: (t_start, t_end),
            y_range: (-1.0, 1e8),
            x_ticks: (0..6).map(|i| 1970.0 + 10.0 * f64::from(i)).collect(),
            y_ticks: (0..=8).map(|p| 10f64.powi(p)).collect(),
            y_scale: SymLogParams {
                base: 10.0,
                linthresh: 2.0,
                linscale: 1.0,
            },

            figure: FigureLayout {
                width_in: 5.0,
                height_in: 4.0,
                left: 0.17,
                right: 0.985,
                top: 0.95,
                bottom: 0.3,
                units_per_point: 4.0,
            },
            fonts: FontSizes {
                title: 8.0,
                tick_label: 8.0,
                era_label: 7.0,
                legend: 7.0,
                credits: 4.5,
            },
            dpi: 300.0,
            pad_inches: 0.1,

            // Matplotlib's "--" at 1pt and the (1, 4) dotted grid at 0.8pt.
            divider: black_quarter(1.0, (3.7, 1.6)),
            grid: black_quarter(0.8, (0.8, 3.2)),
            axis_width: 0.8,
            tick_length: 3.5,

            legend_anchor: (0.025, 0.025),
            legend_border_width: 0.8,

            credits_at: (t_start, -5.0),
            credits: vec![
                "Data up to year 2010 collected by M. Horowitz, F. Labonte, O. Shacham, \
                 K. Olukotun, L. Hammond, and C. Batten."
                    .to_string(),
                "Data spanning 2010-2017 collected by K. Rupp. \
                 Data spanning 2017-2020 collected by A. Segura."
                    .to_string(),
            ],

            series: vec![
                (SeriesKind::Transistors, style(MarkerShape::Square, 0.5)),
                (SeriesKind::Specint, style(MarkerShape::TriangleDown, 0.1)),
                (SeriesKind::Frequency, style(MarkerShape::TriangleUp, 0.625)),
                (SeriesKind::Watts, style(MarkerShape::Diamond, 0.3)),
                (SeriesKind::Cores, style(MarkerShape::Circle, 0.8)),
            ],
        }
    }
}

impl ChartConfig {
    /// Path of an output artifact with the given extension.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{extension}", self.output_stem))
    }

    /// Canvas size in drawing units.
    pub fn canvas_size(&self) -> (u32, u32) {
        let f = &self.figure;
        (
            (f.width_in * 72.0 * f.units_per_point).round() as u32,
            (f.height_in * 72.0 * f.units_per_point).round() as u32,
        )
    }

    /// Convert a length in points to drawing units.
    pub fn units(&self, points: f64) -> f64 {
        points * self.figure.units_per_point
    }

    /// Single-core era band as `(x0, x1, y0, y1)` in data coordinates.
    pub fn single_core_band(&self) -> (f64, f64, f64, f64) {
        self.band(self.t_start, self.t_multicore)
    }

    pub fn multi_core_band(&self) -> (f64, f64, f64, f64) {
        self.band(self.t_multicore, self.t_end)
    }

    fn band(&self, from: f64, to: f64) -> (f64, f64, f64, f64) {
        (
            from + self.band_x_margin,
            to - self.band_x_margin,
            -1.0 + self.band_y_margin,
            1.0 - self.band_y_margin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_inset_from_era_boundaries() {
        let config = ChartConfig::default();

        let (x0, x1, y0, y1) = config.single_core_band();
        assert_eq!((x0, x1), (1970.75, 2003.5));
        assert!((y0 + 0.65).abs() < 1e-12 && (y1 - 0.65).abs() < 1e-12);

        let (x0, x1, _, _) = config.multi_core_band();
        assert_eq!((x0, x1), (2005.0, 2020.25));
    }

    #[test]
    fn every_series_has_a_distinct_style() {
        let config = ChartConfig::default();
        let kinds: Vec<SeriesKind> = config.series.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, SeriesKind::ALL.to_vec());

        let mut shapes: Vec<String> = config
            .series
            .iter()
            .map(|(_, s)| format!("{:?}", s.shape))
            .collect();
        shapes.sort();
        shapes.dedup();
        assert_eq!(shapes.len(), 5);
    }

    #[test]
    fn canvas_matches_figure_inches() {
        let config = ChartConfig::default();
        assert_eq!(config.canvas_size(), (1440, 1152));
        assert_eq!(
            config.output_path("png"),
            PathBuf::from("./processor_trends.png")
        );
    }

    #[test]
    fn serializes_for_logging() {
        let json = serde_json::to_value(ChartConfig::default()).unwrap();
        assert_eq!(json["y_range"][1], 1e8);
        assert_eq!(json["series"][0][0], "Transistors");
    }
}
