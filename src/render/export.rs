use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbaImage};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use usvg::fontdb::Database;

use crate::config::ChartConfig;
use crate::error::TrendsError;

/// Families tried, in order, for the generic `sans-serif` font.
const SANS_SERIF_PREFERENCE: [&str; 4] = ["DejaVu Sans", "Arial", "Helvetica", "Liberation Sans"];

lazy_static! {
    static ref FONT_DB: Arc<Database> = Arc::new(init_font_db());
}

fn init_font_db() -> Database {
    let mut font_database = Database::new();
    font_database.load_system_fonts();

    let available = |family: &str| {
        font_database
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    };
    match SANS_SERIF_PREFERENCE.into_iter().find(|&family| available(family)) {
        Some(family) => {
            debug!("using {family} for sans-serif text");
            font_database.set_sans_serif_family(family);
        }
        None => warn!("none of {SANS_SERIF_PREFERENCE:?} installed; chart text may be missing"),
    }
    font_database
}

fn render_error(stage: &str, cause: impl std::fmt::Display) -> TrendsError {
    TrendsError::Render(format!("{stage}: {cause}"))
}

// ---------------------------------------------------------------------------
// Rasterising
// ---------------------------------------------------------------------------

fn parse_svg(svg: &str) -> Result<usvg::Tree, TrendsError> {
    let opts = usvg::Options {
        fontdb: FONT_DB.clone(),
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts).map_err(|e| render_error("parsing SVG", e))
}

/// Render an SVG document onto a transparent pixmap, `scale` pixels per
/// SVG unit.
pub fn rasterize(svg: &str, scale: f32) -> Result<RgbaImage, TrendsError> {
    let tree = parse_svg(svg)?;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| render_error("allocating pixmap", format!("{width}x{height}")))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| render_error("converting pixmap", "buffer size mismatch"))
}

/// Pixel box `(x, y, width, height)` of everything not fully transparent.
pub fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

// ---------------------------------------------------------------------------
// Tight cropping
// ---------------------------------------------------------------------------

/// A rectangle in SVG units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Wrap `svg` in an outer document showing only `view`, on a white
/// background. The outer size is unitless and counts points, which is what
/// both the rasteriser scale and the PDF page size assume.
pub fn crop_svg(svg: &str, view: ViewBox, units_per_point: f64) -> String {
    let body = svg
        .trim_start()
        .strip_prefix("<?xml")
        .and_then(|rest| rest.split_once("?>").map(|(_, body)| body))
        .unwrap_or(svg);
    let ViewBox { x, y, width, height } = view;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {width} {height}"><rect x="{x}" y="{y}" width="{width}" height="{height}" fill="white"/>{body}</svg>"#,
        w = width / units_per_point,
        h = height / units_per_point,
    )
}

/// The drawn content of `svg` plus the configured padding, in SVG units.
pub fn tight_view(svg: &str, config: &ChartConfig) -> Result<ViewBox, TrendsError> {
    let scale = raster_scale(config);
    let probe = rasterize(svg, scale as f32)?;
    let (canvas_w, canvas_h) = config.canvas_size();

    let Some((px, py, pw, ph)) = content_bounds(&probe) else {
        warn!("chart has no visible content; exporting the full canvas");
        return Ok(ViewBox {
            x: 0.0,
            y: 0.0,
            width: f64::from(canvas_w),
            height: f64::from(canvas_h),
        });
    };

    let pad = config.units(config.pad_inches * 72.0);
    let x0 = (f64::from(px) / scale).floor() - pad;
    let y0 = (f64::from(py) / scale).floor() - pad;
    let x1 = (f64::from(px + pw) / scale).ceil() + pad;
    let y1 = (f64::from(py + ph) / scale).ceil() + pad;
    Ok(ViewBox {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Raster pixels per drawing unit at the configured DPI.
fn raster_scale(config: &ChartConfig) -> f64 {
    config.dpi / 72.0 / config.figure.units_per_point
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Both output artifacts, fully encoded in memory.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub png: Vec<u8>,
    pub pdf: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

pub fn encode_png(svg: &str, dpi: f64) -> Result<(Vec<u8>, u32, u32), TrendsError> {
    // The cropped document is sized in points.
    let image = rasterize(svg, (dpi / 72.0) as f32)?;
    let (width, height) = image.dimensions();

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(image)
        .to_rgb8()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| render_error("encoding PNG", e))?;
    Ok((png, width, height))
}

pub fn encode_pdf(svg: &str) -> Result<Vec<u8>, TrendsError> {
    let tree = parse_svg(svg)?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| render_error("converting to PDF", e))
}

/// Crop the chart to its content and encode both artifacts.
pub fn render_outputs(svg: &str, config: &ChartConfig) -> Result<RenderedChart, TrendsError> {
    let view = tight_view(svg, config)?;
    debug!("tight view box: {view:?}");
    let cropped = crop_svg(svg, view, config.figure.units_per_point);

    let (png, width_px, height_px) = encode_png(&cropped, config.dpi)?;
    let pdf = encode_pdf(&cropped)?;
    Ok(RenderedChart {
        png,
        pdf,
        width_px,
        height_px,
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub pdf: PathBuf,
    pub png: PathBuf,
}

/// Write both artifacts. Each goes to a temporary sibling first and is then
/// renamed over the target, so a failed write never leaves a truncated file
/// under the final name.
pub fn write_outputs(
    rendered: &RenderedChart,
    config: &ChartConfig,
) -> Result<OutputPaths, TrendsError> {
    let paths = OutputPaths {
        pdf: config.output_path("pdf"),
        png: config.output_path("png"),
    };
    write_atomic(&paths.pdf, &rendered.pdf)?;
    write_atomic(&paths.png, &rendered.png)?;
    info!(
        "wrote {} and {} ({}x{} px)",
        paths.pdf.display(),
        paths.png.display(),
        rendered.width_px,
        rendered.height_px
    );
    Ok(paths)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), TrendsError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|source| TrendsError::OutputWrite {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        TrendsError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
