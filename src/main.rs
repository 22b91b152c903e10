mod color;
mod config;
mod data;
mod error;
mod render;

use anyhow::Context;

use config::ChartConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ChartConfig::default();
    render::render(&config).with_context(|| {
        format!(
            "rendering {} from {}",
            config.output_stem,
            config.data_dir.display()
        )
    })?;

    Ok(())
}
