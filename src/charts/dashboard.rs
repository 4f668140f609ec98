//! Dashboard
//!
//! A set of chart panels rendered together, the way a page fills several
//! containers at load time. Panels render concurrently and independently.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use super::renderer::ChartRenderer;
use super::surface::ChartHandle;
use super::types::{ChartKind, ChartRequest, DEFAULT_CONTAINER_ID};

/// One chart on a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub kind: ChartKind,
    pub url: String,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

impl Panel {
    pub fn new(kind: ChartKind, request: ChartRequest) -> Self {
        Self {
            kind,
            url: request.url,
            container_id: request.container_id,
            title: request.title,
        }
    }

    /// The render request this panel stands for
    pub fn request(&self) -> ChartRequest {
        ChartRequest {
            url: self.url.clone(),
            container_id: self.container_id.clone(),
            title: self.title.clone(),
        }
    }
}

/// Ordered collection of panels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    panels: Vec<Panel>,
}

impl Dashboard {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Render every panel, returning one result per panel in input order
    pub async fn render(&self, renderer: &ChartRenderer) -> Vec<Option<ChartHandle>> {
        tracing::info!(panels = self.panels.len(), "Rendering dashboard");

        let results = join_all(
            self.panels
                .iter()
                .map(|panel| renderer.render(panel.kind, panel.request())),
        )
        .await;

        let rendered = results.iter().filter(|r| r.is_some()).count();
        if rendered < results.len() {
            tracing::warn!(
                rendered,
                skipped = results.len() - rendered,
                "Some dashboard panels had no container"
            );
        }

        results
    }
}
