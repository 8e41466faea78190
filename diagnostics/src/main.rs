use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use diagnostics::export::write_json;
use diagnostics::loader::{load_report, project_root, RunConfig};
use diagnostics::{configure_style, ReportAssembler};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("run.json"));
    let config_path = project_root().join(config_path);
    info!("Starting diagnostics report from {}", config_path.display());

    let config = RunConfig::from_file(&config_path)
        .with_context(|| format!("reading run configuration {}", config_path.display()))?;

    let style = configure_style(config.style.as_deref());
    if style.status.is_degraded() {
        warn!("Style file unusable, continuing with defaults");
    }

    let report = load_report(&config).context("loading report inputs")?;
    let assembler = ReportAssembler::from_style(style, config.probe).with_overview(config.overview);
    let report = assembler.assemble(report).context("assembling report")?;

    write_json(&report, &config.output).with_context(|| format!("writing {}", config.output.display()))?;
    info!("Done");
    Ok(())
}
