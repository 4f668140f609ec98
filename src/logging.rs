//! Logging Setup
//!
//! Installs the global tracing subscriber from [`LoggingConfig`]. `RUST_LOG`
//! takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Output formats accepted in `logging.format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::Format(s.to_string())),
        }
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let format: LogFormat = config.format.parse()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::Filter(e.to_string()))?;

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::File {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init(),
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}

/// Logging setup errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Unknown log format {0:?} (expected \"pretty\" or \"json\")")]
    Format(String),

    #[error("Failed to open log file {path}: {error}")]
    File { path: String, error: String },

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}
