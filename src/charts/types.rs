//! Core data types for chart rendering
//!
//! - `Row`: one record of the fetched `data` array
//! - `ChartRequest`: what to fetch, where to draw it and what to call it
//! - `ChartKind`: the four chart shapes the renderer knows about
//! - `CountField`: which numeric column a series is read from

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Container used when a request does not name one
pub const DEFAULT_CONTAINER_ID: &str = "chart-container";

/// A single record from the API payload
///
/// Every field is optional on the wire. Counts are coerced the way a browser
/// coerces `Number(x)`, and anything non-numeric ends up as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub dim_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub dim_month: Option<u8>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub dim_hour: Option<u8>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bike_count: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub station_count: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub trip_count: f64,
}

impl Row {
    /// Create a row for the given year with all counts at zero
    pub fn year(year: i32) -> Self {
        Self {
            dim_year: Some(year),
            ..Default::default()
        }
    }

    /// Builder method: set month (1-12)
    pub fn month(mut self, month: u8) -> Self {
        self.dim_month = Some(month);
        self
    }

    /// Builder method: set hour (0-23)
    pub fn hour(mut self, hour: u8) -> Self {
        self.dim_hour = Some(hour);
        self
    }

    pub fn bikes(mut self, count: f64) -> Self {
        self.bike_count = count;
        self
    }

    pub fn stations(mut self, count: f64) -> Self {
        self.station_count = count;
        self
    }

    pub fn trips(mut self, count: f64) -> Self {
        self.trip_count = count;
        self
    }
}

/// Coerce a JSON value to a number using browser `Number(...)` rules.
///
/// Strings accept decimal and exponent notation, `0x`/`0o`/`0b` prefixes and
/// `Infinity`. Returns `None` for values that would become `NaN`. Arrays and
/// objects are always `None`, including the single-element arrays a browser
/// would unwrap.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_string(s.trim()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_numeric_string(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // No sign allowed after a radix prefix
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // f64::from_str also takes "inf" and "nan", which are NaN in a browser
    if !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        return None;
    }
    s.parse().ok()
}

fn lenient_count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0))
}

fn lenient_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .filter(|n| n.is_finite() && n.fract() == 0.0)
        .and_then(|n| T::try_from(n as i64).ok()))
}

/// Parameters for a single render call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    /// Data source URL, absolute or relative to the configured API base
    pub url: String,
    /// Identifier of the surface to draw into
    #[serde(default = "default_container_id", alias = "container_id")]
    pub container_id: String,
    /// Display title; each chart kind has its own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

impl ChartRequest {
    /// Create a request for `url` targeting the default container
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            container_id: default_container_id(),
            title: None,
        }
    }

    /// Builder method: set the target container
    pub fn container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    /// Builder method: set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The requested title, or `default` when none was given
    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }
}

/// Chart shapes supported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Bike count per year, single line
    Bike,
    /// Station count per year, single line
    Station,
    /// Trips per month, one line per year
    TripMonth,
    /// Trips per hour of day, one line per year
    TripHour,
}

impl ChartKind {
    /// Get all chart kinds for iteration
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Bike,
            ChartKind::Station,
            ChartKind::TripMonth,
            ChartKind::TripHour,
        ]
    }

    /// Title used when the request does not carry one
    pub fn default_title(&self) -> &'static str {
        match self {
            ChartKind::Bike => "Bike Count Over Years",
            ChartKind::Station => "Station Count Over Years",
            ChartKind::TripMonth => "Monthly Pattern - Annual Member",
            ChartKind::TripHour => "Hourly Pattern - Annual Member",
        }
    }

    /// Identifier used in config files and selector values
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bike => "bike",
            ChartKind::Station => "station",
            ChartKind::TripMonth => "trip_month",
            ChartKind::TripHour => "trip_hour",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bike" => Ok(ChartKind::Bike),
            "station" => Ok(ChartKind::Station),
            "trip_month" | "trip-month" | "month" => Ok(ChartKind::TripMonth),
            "trip_hour" | "trip-hour" | "hour" => Ok(ChartKind::TripHour),
            _ => Err(format!("Unknown chart kind: {}", s)),
        }
    }
}

/// Numeric column a series is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Bike,
    Station,
    Trip,
}

impl CountField {
    /// Read this field from a row
    pub fn value(&self, row: &Row) -> f64 {
        match self {
            CountField::Bike => row.bike_count,
            CountField::Station => row.station_count,
            CountField::Trip => row.trip_count,
        }
    }
}
