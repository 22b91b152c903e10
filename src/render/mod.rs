/// Chart rendering: layout and drawing, then export.
///
/// ```text
///  TrendData + ChartConfig
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  plotters → SVG string (symmetric-log y via `scale`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  tight crop → PNG (resvg) + PDF (svg2pdf) → disk
///   └──────────┘
/// ```
pub mod chart;
pub mod export;
pub mod scale;

use log::{debug, info, warn};

use crate::config::ChartConfig;
use crate::data::loader;
use crate::error::TrendsError;
use export::OutputPaths;

/// Load the five series, draw the chart and write both outputs.
///
/// Everything is parsed and encoded in memory before the first output is
/// written; an input or drawing error leaves existing outputs untouched.
pub fn render(config: &ChartConfig) -> Result<OutputPaths, TrendsError> {
    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string(config) {
            Ok(json) => debug!("chart config: {json}"),
            Err(e) => debug!("chart config not serializable: {e}"),
        }
    }

    let data = loader::load_all(&config.data_dir)?;
    if data.is_empty() {
        warn!("every series in {} is empty", config.data_dir.display());
    }
    info!(
        "loaded {} points from {}",
        data.len(),
        config.data_dir.display()
    );

    let svg = chart::draw_svg(&data, config)?;
    let rendered = export::render_outputs(&svg, config)?;
    export::write_outputs(&rendered, config)
}
