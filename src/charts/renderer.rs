//! Chart Renderer
//!
//! Runs the fetch-then-render sequence for one chart:
//!
//! 1. Resolve the surface; missing surfaces are logged and skipped
//! 2. Dispose whatever chart the surface already holds and create a new one
//! 3. Show the loading indicator
//! 4. Fetch rows and shape them, or fall back to the failure option
//! 5. Apply the option and hide the loading indicator
//! 6. Register the surface's single resize handler

use std::sync::Arc;

use super::option::ChartOption;
use super::registry::SurfaceRegistry;
use super::source::DataSource;
use super::surface::{ChartHandle, Document, PlotBackend};
use super::types::{ChartKind, ChartRequest};

/// Text shown while data is loading
pub const LOADING_TEXT: &str = "Loading…";

/// Renders charts into surfaces of a document
#[derive(Clone)]
pub struct ChartRenderer {
    document: Arc<dyn Document>,
    plot: Arc<dyn PlotBackend>,
    source: Arc<dyn DataSource>,
    registry: SurfaceRegistry,
}

/// Hides the loading indicator when dropped, whichever way rendering ends
struct LoadingGuard<'a> {
    plot: &'a dyn PlotBackend,
    chart: ChartHandle,
}

impl<'a> LoadingGuard<'a> {
    fn show(plot: &'a dyn PlotBackend, chart: ChartHandle) -> Self {
        plot.show_loading(chart, LOADING_TEXT);
        Self { plot, chart }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.plot.hide_loading(self.chart);
    }
}

impl ChartRenderer {
    pub fn new(
        document: Arc<dyn Document>,
        plot: Arc<dyn PlotBackend>,
        source: Arc<dyn DataSource>,
    ) -> Self {
        Self {
            document,
            plot,
            source,
            registry: SurfaceRegistry::new(),
        }
    }

    /// Per-surface bookkeeping shared by all renders
    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Bike count per year
    pub async fn render_bike(&self, request: ChartRequest) -> Option<ChartHandle> {
        self.render(ChartKind::Bike, request).await
    }

    /// Station count per year
    pub async fn render_station(&self, request: ChartRequest) -> Option<ChartHandle> {
        self.render(ChartKind::Station, request).await
    }

    /// Monthly trip pattern, one line per year
    pub async fn render_trip_month(&self, request: ChartRequest) -> Option<ChartHandle> {
        self.render(ChartKind::TripMonth, request).await
    }

    /// Hourly trip pattern, one line per year
    pub async fn render_trip_hour(&self, request: ChartRequest) -> Option<ChartHandle> {
        self.render(ChartKind::TripHour, request).await
    }

    /// Render a chart of the given kind.
    ///
    /// Returns `None` only when the target surface does not exist. Fetch and
    /// payload failures still produce a chart, drawn in its failed state.
    pub async fn render(&self, kind: ChartKind, request: ChartRequest) -> Option<ChartHandle> {
        let container_id = request.container_id.as_str();
        let title = request.title_or(kind.default_title());

        if !self.document.has_surface(container_id) {
            tracing::warn!(container_id = %container_id, %kind, "Container not found");
            return None;
        }

        let existing = self.plot.instance_for(container_id);
        if let Some(existing) = existing {
            tracing::debug!(
                container_id = %container_id,
                chart = %existing,
                "Disposing existing chart"
            );
            self.plot.dispose(existing);
        }

        let chart = self.plot.init(container_id);
        if let Some(stale) = self.registry.bind(container_id, chart).await {
            // Backends without instance lookup still get their old chart torn down.
            if Some(stale) != existing {
                self.plot.dispose(stale);
            }
        }

        {
            let _loading = LoadingGuard::show(self.plot.as_ref(), chart);

            let option = match self.source.fetch_rows(&request.url).await {
                Ok(rows) => {
                    tracing::debug!(
                        container_id = %container_id,
                        url = %request.url,
                        rows = rows.len(),
                        "Fetched chart data"
                    );
                    ChartOption::build(kind, title, &request.url, &rows)
                }
                Err(e) => {
                    tracing::error!(
                        container_id = %container_id,
                        url = %request.url,
                        error = %e,
                        "Failed to render chart"
                    );
                    ChartOption::failed(title)
                }
            };

            self.plot.set_option(chart, &option);
        }

        self.registry
            .replace_resize_handler(container_id, chart)
            .await;

        tracing::info!(container_id = %container_id, %kind, %chart, "Chart rendered");
        Some(chart)
    }

    /// Read the selected chart kind from a select control
    pub fn selected_chart(&self, selector_id: &str) -> Option<String> {
        match self.document.select_value(selector_id) {
            Some(value) => {
                tracing::debug!(selector_id = %selector_id, value = %value, "Selected chart");
                Some(value)
            }
            None => {
                tracing::warn!(selector_id = %selector_id, "Select element not found");
                None
            }
        }
    }

    /// Render whichever chart kind the selector currently names
    pub async fn render_selected(
        &self,
        selector_id: &str,
        request: ChartRequest,
    ) -> Option<ChartHandle> {
        let value = self.selected_chart(selector_id)?;
        match value.parse::<ChartKind>() {
            Ok(kind) => self.render(kind, request).await,
            Err(e) => {
                tracing::warn!(
                    selector_id = %selector_id,
                    error = %e,
                    "Unsupported chart selection"
                );
                None
            }
        }
    }

    /// Forward a viewport resize to every registered resize handler
    pub async fn on_viewport_resize(&self) -> usize {
        let handlers = self.registry.resize_handlers().await;
        for handler in &handlers {
            self.plot.resize(handler.chart);
        }
        handlers.len()
    }
}
