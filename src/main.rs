//! Ridership Charts
//!
//! Renders the configured dashboard into the headless backend and prints the
//! resulting chart options as JSON, one document per panel.

use std::sync::Arc;

use ridership_charts::charts::{
    ChartRenderer, Dashboard, HttpDataSource, MemoryDocument, MemoryPlot,
};
use ridership_charts::config::{generate_default_config, Config};
use ridership_charts::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, report) = Config::load_default();
    logging::init(&config.logging)?;
    report.log();

    tracing::info!("Ridership Charts v{}", env!("CARGO_PKG_VERSION"));

    let dashboard = Dashboard::new(config.charts.panels.clone());
    if dashboard.is_empty() {
        tracing::warn!("No panels configured; example configuration follows");
        println!("{}", generate_default_config());
        return Ok(());
    }

    let document = Arc::new(MemoryDocument::with_surfaces(
        dashboard.panels().iter().map(|p| p.container_id.clone()),
    ));
    let plot = Arc::new(MemoryPlot::new());
    let source = Arc::new(HttpDataSource::new(&config.api)?);
    let renderer = ChartRenderer::new(document, plot.clone(), source);

    let handles = dashboard.render(&renderer).await;

    for (panel, handle) in dashboard.panels().iter().zip(handles) {
        let Some(handle) = handle else {
            continue;
        };
        let Some(option) = plot.chart(handle).and_then(|state| state.option) else {
            continue;
        };

        tracing::info!(
            container_id = %panel.container_id,
            kind = %panel.kind,
            failed = option.is_failed(),
            "Panel ready"
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "container": panel.container_id,
                "kind": panel.kind,
                "option": option,
            }))?
        );
    }

    Ok(())
}
