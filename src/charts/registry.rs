//! Surface Registry
//!
//! Tracks, per surface, the chart instance last bound to it and the resize
//! handler that reflows it. Entries are replaced on every render, never merged,
//! so a surface has at most one chart and one resize handler at a time.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::surface::ChartHandle;

/// Unique identifier for a registered resize handler
pub type ResizeHandlerId = String;

/// Resize subscription for one surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeHandler {
    pub id: ResizeHandlerId,
    pub chart: ChartHandle,
}

#[derive(Debug, Clone)]
struct SurfaceBinding {
    chart: ChartHandle,
    resize_handler: Option<ResizeHandler>,
}

/// Per-surface chart and resize-handler bookkeeping
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    /// Bound surfaces: surface id → binding
    bindings: Arc<RwLock<HashMap<String, SurfaceBinding>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a freshly created chart to a surface.
    ///
    /// Returns the chart previously bound there, if any. The previous resize
    /// handler is dropped with it since it pointed at the old chart.
    pub async fn bind(&self, surface: &str, chart: ChartHandle) -> Option<ChartHandle> {
        let previous = self.bindings.write().await.insert(
            surface.to_string(),
            SurfaceBinding {
                chart,
                resize_handler: None,
            },
        );

        if let Some(prev) = &previous {
            if let Some(handler) = &prev.resize_handler {
                tracing::debug!(
                    container_id = %surface,
                    handler_id = %handler.id,
                    "Removed resize handler"
                );
            }
        }

        previous.map(|b| b.chart)
    }

    /// Register the resize handler for a surface, replacing any existing one.
    ///
    /// Returns `None` if the surface is no longer bound to `chart` (a later
    /// render took it over).
    pub async fn replace_resize_handler(
        &self,
        surface: &str,
        chart: ChartHandle,
    ) -> Option<ResizeHandlerId> {
        let mut bindings = self.bindings.write().await;
        let binding = bindings.get_mut(surface).filter(|b| b.chart == chart)?;

        let id = Uuid::new_v4().to_string();
        let replaced = binding.resize_handler.replace(ResizeHandler {
            id: id.clone(),
            chart,
        });

        tracing::debug!(
            container_id = %surface,
            handler_id = %id,
            replaced = replaced.is_some(),
            "Registered resize handler"
        );
        Some(id)
    }

    /// Remove a surface's binding entirely
    pub async fn release(&self, surface: &str) -> Option<ChartHandle> {
        self.bindings.write().await.remove(surface).map(|b| b.chart)
    }

    /// Chart currently bound to a surface
    pub async fn chart_for(&self, surface: &str) -> Option<ChartHandle> {
        self.bindings.read().await.get(surface).map(|b| b.chart)
    }

    /// Resize handler currently registered for a surface
    pub async fn resize_handler_for(&self, surface: &str) -> Option<ResizeHandler> {
        self.bindings
            .read()
            .await
            .get(surface)
            .and_then(|b| b.resize_handler.clone())
    }

    /// All active resize handlers
    pub async fn resize_handlers(&self) -> Vec<ResizeHandler> {
        self.bindings
            .read()
            .await
            .values()
            .filter_map(|b| b.resize_handler.clone())
            .collect()
    }

    /// Number of active resize handlers across all surfaces
    pub async fn resize_handler_count(&self) -> usize {
        self.bindings
            .read()
            .await
            .values()
            .filter(|b| b.resize_handler.is_some())
            .count()
    }

    /// Number of bound surfaces
    pub async fn len(&self) -> usize {
        self.bindings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bindings.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_replaces_previous() {
        let registry = SurfaceRegistry::new();

        assert_eq!(registry.bind("main", ChartHandle(1)).await, None);
        assert_eq!(registry.bind("main", ChartHandle(2)).await, Some(ChartHandle(1)));
        assert_eq!(registry.chart_for("main").await, Some(ChartHandle(2)));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_single_resize_handler_per_surface() {
        let registry = SurfaceRegistry::new();
        registry.bind("main", ChartHandle(1)).await;

        let first = registry
            .replace_resize_handler("main", ChartHandle(1))
            .await
            .unwrap();
        let second = registry
            .replace_resize_handler("main", ChartHandle(1))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.resize_handler_count().await, 1);
        assert_eq!(registry.resize_handler_for("main").await.unwrap().id, second);
    }

    #[tokio::test]
    async fn test_rebind_drops_stale_handler() {
        let registry = SurfaceRegistry::new();
        registry.bind("main", ChartHandle(1)).await;
        registry.replace_resize_handler("main", ChartHandle(1)).await;

        registry.bind("main", ChartHandle(2)).await;
        assert_eq!(registry.resize_handler_count().await, 0);

        // The first chart lost the surface, so it cannot register a handler.
        assert!(registry
            .replace_resize_handler("main", ChartHandle(1))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_surface() {
        let registry = SurfaceRegistry::new();

        assert!(registry.is_empty().await);
        assert!(registry
            .replace_resize_handler("missing", ChartHandle(7))
            .await
            .is_none());
        assert_eq!(registry.release("missing").await, None);
    }

    #[tokio::test]
    async fn test_handlers_across_surfaces() {
        let registry = SurfaceRegistry::new();
        registry.bind("left", ChartHandle(1)).await;
        registry.bind("right", ChartHandle(2)).await;
        registry.replace_resize_handler("left", ChartHandle(1)).await;
        registry.replace_resize_handler("right", ChartHandle(2)).await;

        let mut charts: Vec<_> = registry
            .resize_handlers()
            .await
            .into_iter()
            .map(|h| h.chart)
            .collect();
        charts.sort();
        assert_eq!(charts, vec![ChartHandle(1), ChartHandle(2)]);

        registry.release("left").await;
        assert_eq!(registry.resize_handler_count().await, 1);
    }
}
