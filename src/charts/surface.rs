//! Display Collaborators
//!
//! The renderer never touches a page or a charting engine directly. It talks
//! to a [`Document`] to find surfaces and read form controls, and to a
//! [`PlotBackend`] to create, configure and dispose chart instances.

use serde::Serialize;
use std::fmt;

use super::option::ChartOption;

/// Opaque reference to a live chart instance owned by a plot backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChartHandle(pub u64);

impl fmt::Display for ChartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// The page hosting the charts
pub trait Document: Send + Sync {
    /// Whether a surface with this identifier exists
    fn has_surface(&self, id: &str) -> bool;

    /// Current value of a select control, `None` if no such select exists
    fn select_value(&self, id: &str) -> Option<String>;
}

/// The charting engine
pub trait PlotBackend: Send + Sync {
    /// Chart instance currently bound to a surface
    fn instance_for(&self, surface: &str) -> Option<ChartHandle>;

    /// Tear down a chart instance
    fn dispose(&self, chart: ChartHandle);

    /// Create a chart instance bound to a surface
    fn init(&self, surface: &str) -> ChartHandle;

    /// Replace the chart's configuration
    fn set_option(&self, chart: ChartHandle, option: &ChartOption);

    fn show_loading(&self, chart: ChartHandle, text: &str);

    fn hide_loading(&self, chart: ChartHandle);

    /// Reflow the chart to its surface's current size
    fn resize(&self, chart: ChartHandle);
}
