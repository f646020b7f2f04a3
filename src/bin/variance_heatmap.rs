//! variance-heatmap - render the global temperature variance heat map.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use variance_heatmap::config::ChartConfig;
use variance_heatmap::pipeline::Chart;

/// Render the monthly global land-surface temperature heat map.
///
/// The dataset is fetched once and written as a standalone SVG (for a `.svg`
/// output path) or as an HTML page with title, subtitle and tooltip.
#[derive(Parser, Debug)]
#[command(name = "variance-heatmap")]
#[command(version)]
#[command(about = "Render the global temperature variance heat map", long_about = None)]
struct Cli {
    /// Output file; `.svg` writes the bare chart, anything else an HTML page
    #[arg(default_value = "heatmap.html")]
    output: PathBuf,

    /// Config file path (default: <config dir>/variance-heatmap/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|p| p.join("variance-heatmap/config.yaml"))
                .unwrap_or_default()
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = ChartConfig::load_or_default(cli.config_path());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    info!(url = %config.source_url, "loading dataset");
    let client = reqwest::Client::new();
    let chart = match runtime.block_on(Chart::load(&client, &config)) {
        Ok(chart) => chart,
        Err(e) => {
            error!(error = %e, "chart not rendered");
            return Err(e.into());
        }
    };

    info!(subtitle = %chart.subtitle(), "dataset rendered");
    chart.write_to_file(&cli.output)?;
    Ok(())
}
