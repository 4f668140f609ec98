//! # Ridership Charts
//!
//! Fetches bike-share statistics from an API, shapes them into chart series
//! and drives a plotting backend.
//!
//! ## Charts
//!
//! - **Bike / Station**: one line per metric across the years present
//! - **Trip month**: one line per year over January–December
//! - **Trip hour**: one line per year over hours 0–23
//!
//! ## Modules
//!
//! - [`charts`]: data source, shaping, chart options and the render lifecycle
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ridership_charts::charts::*;
//! use ridership_charts::config::ApiConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = Arc::new(MemoryDocument::with_surfaces(["chart-container"]));
//!     let plot = Arc::new(MemoryPlot::new());
//!     let source = Arc::new(HttpDataSource::new(&ApiConfig::default())?);
//!
//!     let renderer = ChartRenderer::new(document, plot.clone(), source);
//!     renderer
//!         .render_trip_month(ChartRequest::new("/api/trip/monthly"))
//!         .await;
//!
//!     if let Some(option) = plot.option_on("chart-container") {
//!         println!("{}", serde_json::to_string_pretty(&option)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod config;
pub mod logging;

pub use charts::{
    ChartHandle, ChartKind, ChartOption, ChartRenderer, ChartRequest, Dashboard, DataSource,
    Document, FetchError, HttpDataSource, Panel, PlotBackend, Row, SurfaceRegistry,
};

pub use config::{ApiConfig, ChartsConfig, Config, ConfigError, ConfigReport, LoggingConfig};
