//! Ridership Charts
//!
//! Fetches tabular ridership data and turns it into charts.
//!
//! ## Architecture
//!
//! - **DataSource**: fetches `{ "data": [...] }` payloads and decodes rows
//! - **Shape**: pure row → series transforms over complete category axes
//! - **ChartOption**: declarative chart configuration for the plotting backend
//! - **ChartRenderer**: fetch-then-render lifecycle for one surface
//! - **SurfaceRegistry**: last chart and resize handler per surface
//! - **Dashboard**: several panels rendered concurrently
//!
//! ## Data Flow
//!
//! 1. The renderer resolves the surface and creates a fresh chart on it
//! 2. The data source fetches rows for the request URL
//! 3. Rows are shaped into series and wrapped in a chart option
//! 4. The option is applied; failures fall back to a "failed to load" option

mod dashboard;
mod memory;
mod option;
mod registry;
mod renderer;
mod shape;
mod source;
mod surface;
mod types;

pub use dashboard::{Dashboard, Panel};
pub use memory::{ChartState, MemoryDocument, MemoryPlot};
pub use option::{
    Axis, AxisLabel, AxisTick, AxisType, ChartOption, Legend, Series, SeriesLabel, SeriesType,
    Title, Tooltip, FAILED_SUBTITLE,
};
pub use registry::{ResizeHandler, ResizeHandlerId, SurfaceRegistry};
pub use renderer::{ChartRenderer, LOADING_TEXT};
pub use shape::{period_series, year_series, Period, PeriodSeries, SeriesSpec, YearSeries};
pub use source::{parse_payload, DataSource, FetchError, HttpDataSource};
pub use surface::{ChartHandle, Document, PlotBackend};
pub use types::{coerce_number, ChartKind, ChartRequest, CountField, Row, DEFAULT_CONTAINER_ID};
