use log::debug;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::scale::{power_of_ten_label, AxisCoord, AxisScale, SymLog};
use crate::color::Gray;
use crate::config::{ChartConfig, LineStyle, MarkerShape, SeriesStyle};
use crate::data::model::{SeriesKind, TrendData};
use crate::error::TrendsError;

// ---------------------------------------------------------------------------
// Layer plan
// ---------------------------------------------------------------------------

/// One scatter layer as it will be drawn.
#[derive(Debug, Clone)]
pub struct ScatterLayer {
    pub kind: SeriesKind,
    pub label: &'static str,
    pub style: SeriesStyle,
    /// Every loaded point, in file order. Points outside the axes are
    /// clipped at draw time, not here.
    pub points: Vec<(f64, f64)>,
}

/// Scatter layers in drawing order, one per configured series.
pub fn scatter_layers(data: &TrendData, config: &ChartConfig) -> Vec<ScatterLayer> {
    config
        .series
        .iter()
        .map(|(kind, style)| ScatterLayer {
            kind: *kind,
            label: kind.label(),
            style: style.clone(),
            points: data.series(*kind).points().collect(),
        })
        .collect()
}

/// The x (linear) and y (symmetric-log) axes. Their ranges come from the
/// configuration only.
pub fn axes(config: &ChartConfig) -> (AxisCoord, AxisCoord) {
    (
        AxisCoord::new(config.x_range, AxisScale::Linear, &config.x_ticks),
        AxisCoord::new(
            config.y_range,
            AxisScale::SymLog(SymLog::new(config.y_scale)),
            &config.y_ticks,
        ),
    )
}

// ---------------------------------------------------------------------------
// SVG drawing
// ---------------------------------------------------------------------------

/// Draw the complete chart into an SVG document held in memory.
///
/// The canvas has no background fill so the exporter can find the drawn
/// content by its opacity.
pub fn draw_svg(data: &TrendData, config: &ChartConfig) -> Result<String, TrendsError> {
    let layers = scatter_layers(data, config);
    for layer in &layers {
        debug!("{} layer: {} points", layer.kind, layer.points.len());
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, config.canvas_size()).into_drawing_area();
        draw_chart(&root, &layers, config).map_err(|e| TrendsError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| TrendsError::Render(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_chart<'a, DB>(
    root: &'a DrawingArea<DB, Shift>,
    layers: &[ScatterLayer],
    config: &ChartConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend + 'a,
{
    let (width, height) = config.canvas_size();
    let (w, h) = (f64::from(width), f64::from(height));
    let fig = &config.figure;
    let units = |points: f64| config.units(points).round() as i32;
    let font = |points: f64| {
        FontDesc::new(FontFamily::SansSerif, config.units(points), FontStyle::Normal)
    };

    let (x_axis, y_axis) = axes(config);
    let (x_lo, x_hi) = config.x_range;
    let (y_lo, y_hi) = config.y_range;

    let mut chart = ChartBuilder::on(root)
        .margin_top((h * (1.0 - fig.top)).round() as i32)
        .margin_right((w * (1.0 - fig.right)).round() as i32)
        .set_label_area_size(LabelAreaPosition::Left, (w * fig.left).round() as i32)
        .set_label_area_size(LabelAreaPosition::Bottom, (h * fig.bottom).round() as i32)
        .build_cartesian_2d(x_axis.clone(), y_axis.clone())?;

    // Axis lines and tick labels only; grid and tick marks are drawn below.
    chart
        .configure_mesh()
        .disable_mesh()
        .set_all_tick_mark_size(0)
        .x_labels(config.x_ticks.len())
        .y_labels(config.y_ticks.len())
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| power_of_ten_label(*v))
        .label_style(font(config.fonts.tick_label))
        .axis_style(BLACK.stroke_width(units(config.axis_width).max(1) as u32))
        .draw()?;

    let (left, top) = chart.backend_coord(&(x_lo, y_hi));
    let (right, bottom) = chart.backend_coord(&(x_hi, y_lo));

    // Era divider.
    let divider_top = chart.backend_coord(&(config.t_multicore, y_hi));
    let divider_bottom = chart.backend_coord(&(config.t_multicore, y_lo));
    draw_line(root, divider_bottom, divider_top, &config.divider, config)?;

    // Dotted grid at the major ticks.
    for x in x_axis.ticks() {
        let (px, _) = chart.backend_coord(&(x, y_lo));
        draw_line(root, (px, bottom), (px, top), &config.grid, config)?;
    }
    for y in y_axis.ticks() {
        let (_, py) = chart.backend_coord(&(x_lo, y));
        draw_line(root, (left, py), (right, py), &config.grid, config)?;
    }

    // Era bands.
    let band_style = config.band_shade.rgb().filled();
    chart.draw_series(
        [config.single_core_band(), config.multi_core_band()]
            .into_iter()
            .map(|(x0, x1, y0, y1)| Rectangle::new([(x0, y1), (x1, y0)], band_style)),
    )?;

    // Scatter layers. Points outside the axes are skipped.
    let inside = |&(x, y): &(f64, f64)| x >= x_lo && x <= x_hi && y >= y_lo && y <= y_hi;
    for layer in layers {
        let radius = marker_radius(config, layer.style.area);
        let style = layer.style.shade.rgb().filled();
        let points = layer.points.iter().copied().filter(inside);

        let anno = match marker_outline(layer.style.shape, radius) {
            None => chart
                .draw_series(
                    points.map(|p| EmptyElement::at(p) + Circle::new((0, 0), radius, style)),
                )?
                .legend(move |at| EmptyElement::at(at) + Circle::new((0, 0), radius, style)),
            Some(outline) => {
                let legend_outline = outline.clone();
                chart
                    .draw_series(
                        points.map(|p| EmptyElement::at(p) + Polygon::new(outline.clone(), style)),
                    )?
                    .legend(move |at| {
                        EmptyElement::at(at) + Polygon::new(legend_outline.clone(), style)
                    })
            }
        };
        anno.label(layer.label);
    }

    // Axes frame and inward tick marks.
    let frame = BLACK.stroke_width(units(config.axis_width).max(1) as u32);
    root.draw(&Rectangle::new([(left, top), (right, bottom)], frame))?;
    let tick = units(config.tick_length);
    for x in x_axis.ticks() {
        let (px, _) = chart.backend_coord(&(x, y_lo));
        root.draw(&PathElement::new(vec![(px, bottom), (px, bottom - tick)], frame))?;
    }
    for y in y_axis.ticks() {
        let (_, py) = chart.backend_coord(&(x_lo, y));
        root.draw(&PathElement::new(vec![(left, py), (left + tick, py)], frame))?;
    }

    // Title, era labels and credits.
    let centered = Pos::new(HPos::Center, VPos::Center);
    root.draw(&Text::new(
        config.title.as_str(),
        ((left + right) / 2, top - units(6.0)),
        font(config.fonts.title)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))?;

    let era_style = font(config.fonts.era_label)
        .color(&config.era_label_shade.rgb())
        .pos(centered);
    let eras = [
        (config.t_start, config.t_multicore, &config.single_core_label),
        (config.t_multicore, config.t_end, &config.multi_core_label),
    ];
    for (from, to, label) in eras {
        let at = chart.backend_coord(&(from + (to - from) / 2.0, config.era_label_y));
        root.draw(&Text::new(label.as_str(), at, era_style.clone()))?;
    }

    let credit_style = font(config.fonts.credits)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let line_height = config.units(config.fonts.credits * 1.2);
    let (cx, cy) = chart.backend_coord(&config.credits_at);
    let first_line = f64::from(cy) - line_height * (config.credits.len() as f64 - 1.0) / 2.0;
    for (i, line) in config.credits.iter().enumerate() {
        let y = (first_line + line_height * i as f64).round() as i32;
        root.draw(&Text::new(line.as_str(), (cx, y), credit_style.clone()))?;
    }

    // Legend, anchored inside the upper-left corner of the axes.
    let (ax, ay) = config.legend_anchor;
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::Coordinate(
            (f64::from(right - left) * ax).round() as i32,
            (f64::from(bottom - top) * ay).round() as i32,
        ))
        .margin(units(3.0))
        .legend_area_size(units(8.0))
        .label_font(font(config.fonts.legend))
        .background_style(Gray::WHITE.rgb().filled())
        .border_style(BLACK.stroke_width(units(config.legend_border_width).max(1) as u32))
        .draw()?;

    Ok(())
}

/// Marker half-size in drawing units for a marker of `area` square points.
fn marker_radius(config: &ChartConfig, area: f64) -> i32 {
    (config.units(area.sqrt()) / 2.0).round().max(1.0) as i32
}

/// Vertices of a polygon marker relative to its centre, or `None` for a
/// circle.
fn marker_outline(shape: MarkerShape, r: i32) -> Option<Vec<(i32, i32)>> {
    match shape {
        MarkerShape::Circle => None,
        MarkerShape::Square => Some(vec![(-r, -r), (r, -r), (r, r), (-r, r)]),
        MarkerShape::TriangleUp => Some(vec![(0, -r), (r, r), (-r, r)]),
        MarkerShape::TriangleDown => Some(vec![(0, r), (r, -r), (-r, -r)]),
        MarkerShape::Diamond => Some(vec![(0, -r), (r, 0), (0, r), (-r, 0)]),
    }
}

/// Stroke a straight line in backend coordinates, dashed if the style asks.
fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    from: (i32, i32),
    to: (i32, i32),
    line: &LineStyle,
    config: &ChartConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = line
        .shade
        .with_alpha(line.alpha)
        .stroke_width(config.units(line.width).round().max(1.0) as u32);

    match line.dash {
        Some((on, off)) => {
            let on = (config.units(on).round() as i32).max(1);
            let off = config.units(off).round() as i32;
            root.draw(&DashedPathElement::new(vec![from, to], on, off, style))
        }
        None => root.draw(&PathElement::new(vec![from, to], style)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::coord::ranged1d::Ranged;

    fn sample_data() -> TrendData {
        let mut data = TrendData::default();
        data.cores = [(1971.0, 1.0), (1978.0, 2.0), (2006.0, 2.0), (2020.0, 64.0)]
            .into_iter()
            .collect();
        data.transistors = [(1971.0, 2.3)].into_iter().collect();
        data.specint = [(1978.0, 0.001)].into_iter().collect();
        data.frequency = [(1971.0, 0.74)].into_iter().collect();
        data
    }

    #[test]
    fn layers_follow_drawing_order_and_keep_all_points() {
        let config = ChartConfig::default();
        let layers = scatter_layers(&sample_data(), &config);

        let kinds: Vec<SeriesKind> = layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, SeriesKind::ALL.to_vec());

        let cores = layers.iter().find(|l| l.kind == SeriesKind::Cores).unwrap();
        assert_eq!(
            cores.points,
            vec![(1971.0, 1.0), (1978.0, 2.0), (2006.0, 2.0), (2020.0, 64.0)]
        );
        assert_eq!(cores.style.shape, MarkerShape::Circle);

        let watts = layers.iter().find(|l| l.kind == SeriesKind::Watts).unwrap();
        assert!(watts.points.is_empty());
    }

    #[test]
    fn axis_ranges_ignore_data_magnitude() {
        let config = ChartConfig::default();
        let (x, y) = axes(&config);
        assert_eq!(x.range(), 1970.0..2021.0);
        assert_eq!(y.range(), -1.0..1e8);
        assert_eq!(y.ticks().count(), 9);
        assert_eq!(
            x.ticks().collect::<Vec<_>>(),
            vec![1970.0, 1980.0, 1990.0, 2000.0, 2010.0, 2020.0]
        );
    }

    #[test]
    fn svg_contains_annotations_and_markers() {
        let config = ChartConfig::default();
        let svg = draw_svg(&sample_data(), &config).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Microprocessor Trends"));
        assert!(svg.contains("Single-core era"));
        assert!(svg.contains("Multi-core era"));
        assert!(svg.contains("Logical Cores"));
        assert!(svg.contains("10⁸"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn points_outside_the_axes_draw_no_markers() {
        let config = ChartConfig::default();
        let inside = sample_data();
        let mut outside = sample_data();
        for (year, value) in [(1960.0, 8.0), (2030.0, 8.0), (1991.0, 1e12), (1992.0, -50.0)] {
            outside.cores.insert(year, value);
        }
        outside.watts.insert(2030.0, 1e12);

        let layers = scatter_layers(&outside, &config);
        let cores = layers.iter().find(|l| l.kind == SeriesKind::Cores).unwrap();
        assert_eq!(cores.points.len(), 8);
        assert!(cores.points.contains(&(1960.0, 8.0)));

        // Same markers as with in-range data only; the axes do not stretch.
        let svg = draw_svg(&outside, &config).unwrap();
        assert_eq!(svg, draw_svg(&inside, &config).unwrap());
    }

    #[test]
    fn svg_is_deterministic() {
        let config = ChartConfig::default();
        let data = sample_data();
        assert_eq!(draw_svg(&data, &config).unwrap(), draw_svg(&data, &config).unwrap());
    }
}
