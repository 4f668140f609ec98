//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::charts::Panel;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub charts: ChartsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL that relative chart URLs resolve against
    #[serde(default = "default_base_url")]
    pub base_url: Option<String>,

    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> Option<String> {
    Some("http://localhost:8000".to_string())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Chart page configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartsConfig {
    /// Panels rendered at startup
    #[serde(default)]
    pub panels: Vec<Panel>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Runs before the subscriber exists, so nothing is logged here; call
    /// [`ConfigReport::log`] once logging is up.
    pub fn load_default() -> (Self, ConfigReport) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("ridership-charts").join("config.toml")),
            Some(PathBuf::from("/etc/ridership-charts/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing candidate that parses, skipping broken ones
    pub fn load_first(paths: &[PathBuf]) -> (Self, ConfigReport) {
        let mut report = ConfigReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.path = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.errors.push(e),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(url) = std::env::var("RIDERSHIP_API_BASE_URL") {
            self.api.base_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Ok(timeout) = std::env::var("RIDERSHIP_API_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = Some(secs);
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("RIDERSHIP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RIDERSHIP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of [`Config::load_default`]
#[derive(Debug, Default)]
pub struct ConfigReport {
    /// File the configuration came from; `None` means built-in defaults
    pub path: Option<PathBuf>,

    /// Candidates that existed but failed to load
    pub errors: Vec<ConfigError>,
}

impl ConfigReport {
    /// Emit what happened during loading
    pub fn log(&self) {
        for error in &self.errors {
            tracing::warn!("Skipping config: {}", error);
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Ridership Charts Configuration
#
# Environment variables override these settings:
# - RIDERSHIP_API_BASE_URL
# - RIDERSHIP_API_TIMEOUT_SECS
# - RIDERSHIP_LOG_LEVEL
# - RIDERSHIP_LOG_FORMAT

[api]
# Relative chart URLs resolve against this base
base_url = "http://localhost:8000"

# Request timeout in seconds (omit to wait indefinitely)
# request_timeout_secs = 30

# Panels rendered at startup.
# kind: bike, station, trip_month, trip_hour
[[charts.panels]]
kind = "bike"
url = "/api/bike/yearly"
container_id = "bike-chart"

[[charts.panels]]
kind = "station"
url = "/api/station/yearly"
container_id = "station-chart"

[[charts.panels]]
kind = "trip_month"
url = "/api/trip/monthly"
container_id = "trip-month-chart"

[[charts.panels]]
kind = "trip_hour"
url = "/api/trip/hourly"
container_id = "trip-hour-chart"
title = "Hourly Pattern - Annual Member"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/ridership-charts/charts.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.api.request_timeout_secs, None);
        assert!(config.charts.panels.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        let kinds: Vec<_> = config.charts.panels.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, ChartKind::all());
        assert_eq!(config.charts.panels[0].container_id, "bike-chart");
        assert_eq!(
            config.charts.panels[3].title.as_deref(),
            Some("Hourly Pattern - Annual Member")
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::parse(
            r#"
            [api]
            request_timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.api.request_timeout_secs, Some(10));
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://rides.example.org"

[[charts.panels]]
kind = "station"
url = "/stations"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("https://rides.example.org"));
        assert_eq!(config.charts.panels.len(), 1);
        assert_eq!(config.charts.panels[0].container_id, "chart-container");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[charts\npanels = 1").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_skips_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let bad = dir.path().join("bad.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&bad, "[api\nbase_url = ").unwrap();
        std::fs::write(&good, "[logging]\nlevel = \"debug\"\n").unwrap();

        let (config, report) = Config::load_first(&[missing, bad.clone(), good.clone()]);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(report.path.as_deref(), Some(good.as_path()));
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            ConfigError::Parse { path, .. } if path == &bad
        ));
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "not = [valid").unwrap();

        let (config, report) = Config::load_first(&[bad, dir.path().join("missing.toml")]);

        assert!(report.path.is_none());
        assert_eq!(report.errors.len(), 1);
        assert!(config.charts.panels.is_empty());
    }

    #[test]
    fn test_unknown_chart_keys_ignored() {
        let config = Config::parse(
            r#"
            [charts]
            selector_id = "year-selector"
            "#,
        )
        .unwrap();

        assert!(config.charts.panels.is_empty());
    }
}
