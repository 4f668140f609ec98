//! Headless Backend
//!
//! In-memory [`Document`] and [`PlotBackend`] implementations. They record
//! everything the renderer does to a chart, which makes them usable both for
//! driving the renderer outside a browser and for asserting on its behavior.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::option::ChartOption;
use super::surface::{ChartHandle, Document, PlotBackend};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Page with a fixed set of surfaces and select controls
#[derive(Debug, Default)]
pub struct MemoryDocument {
    surfaces: Mutex<HashSet<String>>,
    selects: Mutex<HashMap<String, String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document that already contains the given surfaces
    pub fn with_surfaces<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let doc = Self::new();
        for id in ids {
            doc.add_surface(id);
        }
        doc
    }

    pub fn add_surface(&self, id: impl Into<String>) {
        lock(&self.surfaces).insert(id.into());
    }

    pub fn remove_surface(&self, id: &str) -> bool {
        lock(&self.surfaces).remove(id)
    }

    /// Add or update a select control
    pub fn set_select(&self, id: impl Into<String>, value: impl Into<String>) {
        lock(&self.selects).insert(id.into(), value.into());
    }
}

impl Document for MemoryDocument {
    fn has_surface(&self, id: &str) -> bool {
        lock(&self.surfaces).contains(id)
    }

    fn select_value(&self, id: &str) -> Option<String> {
        lock(&self.selects).get(id).cloned()
    }
}

/// Recorded state of one chart instance
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub surface: String,
    pub option: Option<ChartOption>,
    /// Loading text while the indicator is visible
    pub loading: Option<String>,
    pub disposed: bool,
    pub resize_count: u32,
}

/// Plot backend that keeps chart state in memory
#[derive(Debug, Default)]
pub struct MemoryPlot {
    next_id: AtomicU64,
    charts: Mutex<HashMap<ChartHandle, ChartState>>,
}

impl MemoryPlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a chart's state
    pub fn chart(&self, chart: ChartHandle) -> Option<ChartState> {
        lock(&self.charts).get(&chart).cloned()
    }

    /// Live (not disposed) charts bound to a surface
    pub fn live_charts_on(&self, surface: &str) -> Vec<ChartHandle> {
        let mut live: Vec<ChartHandle> = lock(&self.charts)
            .iter()
            .filter(|(_, state)| !state.disposed && state.surface == surface)
            .map(|(handle, _)| *handle)
            .collect();
        live.sort();
        live
    }

    /// Option currently shown on a surface
    pub fn option_on(&self, surface: &str) -> Option<ChartOption> {
        let handle = self.instance_for(surface)?;
        self.chart(handle).and_then(|state| state.option)
    }

    /// Total number of chart instances ever created
    pub fn created(&self) -> usize {
        lock(&self.charts).len()
    }

    fn update(&self, chart: ChartHandle, action: &str, f: impl FnOnce(&mut ChartState)) {
        match lock(&self.charts).get_mut(&chart) {
            Some(state) if !state.disposed => f(state),
            Some(_) => tracing::debug!(%chart, action, "Ignored call on disposed chart"),
            None => tracing::warn!(%chart, action, "Unknown chart instance"),
        }
    }
}

impl PlotBackend for MemoryPlot {
    fn instance_for(&self, surface: &str) -> Option<ChartHandle> {
        self.live_charts_on(surface).pop()
    }

    fn dispose(&self, chart: ChartHandle) {
        self.update(chart, "dispose", |state| {
            state.disposed = true;
            state.loading = None;
        });
    }

    fn init(&self, surface: &str) -> ChartHandle {
        let handle = ChartHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        lock(&self.charts).insert(
            handle,
            ChartState {
                surface: surface.to_string(),
                option: None,
                loading: None,
                disposed: false,
                resize_count: 0,
            },
        );
        handle
    }

    fn set_option(&self, chart: ChartHandle, option: &ChartOption) {
        self.update(chart, "set_option", |state| state.option = Some(option.clone()));
    }

    fn show_loading(&self, chart: ChartHandle, text: &str) {
        self.update(chart, "show_loading", |state| {
            state.loading = Some(text.to_string())
        });
    }

    fn hide_loading(&self, chart: ChartHandle) {
        self.update(chart, "hide_loading", |state| state.loading = None);
    }

    fn resize(&self, chart: ChartHandle) {
        self.update(chart, "resize", |state| state.resize_count += 1);
    }
}
