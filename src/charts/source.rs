//! Chart Data Source
//!
//! Fetches `{ "data": [...] }` payloads over HTTP and decodes them into rows.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::types::Row;
use crate::config::ApiConfig;

/// Something that can turn a URL into rows
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch and decode the rows behind `url`
    async fn fetch_rows(&self, url: &str) -> Result<Vec<Row>, FetchError>;
}

/// HTTP data source backed by reqwest
pub struct HttpDataSource {
    client: Client,
    base_url: Option<Url>,
}

impl HttpDataSource {
    /// Create a data source from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base_url = match config.base_url.as_deref() {
            Some(base) if !base.is_empty() => {
                Some(Url::parse(base).map_err(|e| FetchError::InvalidUrl {
                    url: base.to_string(),
                    reason: e.to_string(),
                })?)
            }
            _ => None,
        };

        Ok(Self { client, base_url })
    }

    /// Resolve `url` against the base URL when it is relative
    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute);
        }

        match &self.base_url {
            Some(base) => base.join(url).map_err(|e| FetchError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            None => Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "relative URL without a configured base".to_string(),
            }),
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_rows(&self, url: &str) -> Result<Vec<Row>, FetchError> {
        let target = self.resolve(url)?;
        tracing::debug!(url = %target, "Fetching chart data");

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify)?;
        parse_payload(&body)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Unavailable
    } else {
        FetchError::Request(e)
    }
}

/// Decode a payload body into rows.
///
/// The body must be a JSON object. A missing or non-array `data` member reads
/// as no rows; a `data` array holding non-objects is malformed.
pub fn parse_payload(body: &str) -> Result<Vec<Row>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let Value::Object(mut payload) = value else {
        return Err(FetchError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    match payload.remove("data") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(serde_json::from_value::<Row>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FetchError::Malformed(e.to_string())),
        _ => Ok(Vec::new()),
    }
}

/// Errors that can occur while fetching chart data
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Data source unavailable")]
    Unavailable,

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source_for(base: &str) -> HttpDataSource {
        HttpDataSource::new(&ApiConfig {
            base_url: Some(base.to_string()),
            request_timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_payload() {
        let rows = parse_payload(
            r#"{"data": [
                {"dim_year": 2020, "bike_count": "5000"},
                {"dim_year": 2019, "bike_count": 6000}
            ]}"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Row::year(2020).bikes(5000.0));
        assert_eq!(rows[1], Row::year(2019).bikes(6000.0));
    }

    #[test]
    fn test_parse_payload_without_data_array() {
        assert!(parse_payload(r#"{"data": null}"#).unwrap().is_empty());
        assert!(parse_payload(r#"{"rows": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_payload_malformed() {
        assert!(matches!(
            parse_payload("<html>oops</html>"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(parse_payload("[1, 2]"), Err(FetchError::Malformed(_))));
        assert!(matches!(
            parse_payload(r#"{"data": [1, 2]}"#),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_resolve_relative_url() {
        let source = source_for("http://localhost:8000/dashboard/");

        assert_eq!(
            source.resolve("/api/bikes").unwrap().as_str(),
            "http://localhost:8000/api/bikes"
        );
        assert_eq!(
            source.resolve("http://other:9000/x").unwrap().as_str(),
            "http://other:9000/x"
        );
    }

    #[test]
    fn test_resolve_without_base() {
        let source = HttpDataSource::new(&ApiConfig {
            base_url: None,
            request_timeout_secs: None,
        })
        .unwrap();

        assert!(matches!(
            source.resolve("/api/bikes"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rows_success() {
        let app = Router::new().route(
            "/api/trips",
            get(|| async { r#"{"data": [{"dim_year": 2021, "dim_month": 3, "trip_count": 42}]}"# }),
        );
        let base = serve(app).await;

        let rows = source_for(&base).fetch_rows("/api/trips").await.unwrap();
        assert_eq!(rows, vec![Row::year(2021).month(3).trips(42.0)]);
    }

    #[tokio::test]
    async fn test_fetch_rows_error_status() {
        let app = Router::new().route(
            "/api/trips",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let err = source_for(&base).fetch_rows("/api/trips").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500 }));
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_fetch_rows_malformed_body() {
        let app = Router::new().route("/api/trips", get(|| async { "not json" }));
        let base = serve(app).await;

        let err = source_for(&base).fetch_rows("/api/trips").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
