//! Chart Option Model
//!
//! Declarative chart configuration handed to the plotting backend. Serializes
//! to the ECharts option dialect (camelCase keys, `type` discriminators) so a
//! browser-side backend can pass it straight to `setOption`.

use serde::Serialize;
use serde_json::Value;

use super::shape::{period_series, year_series, Period, PeriodSeries, YearSeries};
use super::types::{ChartKind, CountField, Row};

/// Subtitle shown when data could not be loaded
pub const FAILED_SUBTITLE: &str = "Failed to load data";

/// Month labels for the month axis
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Complete chart configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub trigger: String,
}

impl Tooltip {
    fn axis() -> Self {
        Self {
            trigger: "axis".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub data: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category labels; numbers or strings depending on the axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_gap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_label: Option<AxisLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_tick: Option<AxisTick>,
}

impl Axis {
    /// Category axis over the given labels
    pub fn category(data: Vec<Value>) -> Self {
        Self {
            axis_type: AxisType::Category,
            name: None,
            data: Some(data),
            min: None,
            max: None,
            boundary_gap: None,
            axis_label: None,
            axis_tick: None,
        }
    }

    /// Unbounded value axis
    pub fn value() -> Self {
        Self {
            axis_type: AxisType::Value,
            name: None,
            data: None,
            min: None,
            max: None,
            boundary_gap: None,
            axis_label: None,
            axis_tick: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Category labels as plain values, empty for value axes
    pub fn labels(&self) -> &[Value] {
        self.data.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub align_with_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<SeriesLabel>,
}

impl Series {
    fn line(name: Option<String>, data: Vec<f64>) -> Self {
        Self {
            name,
            series_type: SeriesType::Line,
            data,
            smooth: None,
            symbol: None,
            symbol_size: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLabel {
    pub show: bool,
    pub position: String,
}

impl ChartOption {
    /// Option drawn when the data fetch failed: empty axes, failure subtitle
    pub fn failed(title: &str) -> Self {
        Self {
            title: Title {
                text: title.to_string(),
                subtext: Some(FAILED_SUBTITLE.to_string()),
                left: Some("center".to_string()),
            },
            tooltip: None,
            legend: None,
            x_axis: Axis::category(Vec::new()),
            y_axis: Axis::value(),
            series: vec![Series::line(None, Vec::new())],
        }
    }

    /// Whether this option is the failure placeholder
    pub fn is_failed(&self) -> bool {
        self.title.subtext.as_deref() == Some(FAILED_SUBTITLE)
    }

    /// Build the option for `kind` from freshly fetched rows
    pub fn build(kind: ChartKind, title: &str, url: &str, rows: &[Row]) -> Self {
        match kind {
            ChartKind::Bike => Self::year_line(
                title,
                url,
                &year_series(rows, CountField::Bike),
                "Bike Count",
                (4500.0, 7500.0),
            ),
            ChartKind::Station => Self::year_line(
                title,
                url,
                &year_series(rows, CountField::Station),
                "Station Count",
                (450.0, 750.0),
            ),
            ChartKind::TripMonth => Self::period_lines(
                title,
                url,
                period_series(rows, Period::Month, CountField::Trip),
                Period::Month,
            ),
            ChartKind::TripHour => Self::period_lines(
                title,
                url,
                period_series(rows, Period::Hour, CountField::Trip),
                Period::Hour,
            ),
        }
    }

    fn year_line(
        title: &str,
        url: &str,
        shaped: &YearSeries,
        value_name: &str,
        (min, max): (f64, f64),
    ) -> Self {
        let mut x_axis = Axis::category(shaped.years.iter().map(|y| Value::from(*y)).collect())
            .named("Year");
        x_axis.axis_label = Some(AxisLabel {
            interval: Some(0),
            rotate: None,
        });
        x_axis.boundary_gap = Some(false);

        let mut series = Series::line(Some(value_name.to_string()), shaped.values.clone());
        series.label = Some(SeriesLabel {
            show: true,
            position: "top".to_string(),
        });

        Self {
            title: source_title(title, url),
            tooltip: Some(Tooltip::axis()),
            legend: None,
            x_axis,
            y_axis: Axis::value().named(value_name).range(min, max),
            series: vec![series],
        }
    }

    fn period_lines(title: &str, url: &str, shaped: PeriodSeries, period: Period) -> Self {
        let names: Vec<String> = shaped.years.iter().map(|y| y.to_string()).collect();

        let (mut x_axis, legend) = match period {
            Period::Month => {
                let labels = MONTH_LABELS.iter().map(|m| Value::from(*m)).collect();
                let mut axis = Axis::category(labels).named("Month");
                axis.axis_label = Some(AxisLabel {
                    interval: None,
                    rotate: Some(30),
                });
                let legend = Legend {
                    data: names,
                    bottom: Some(30),
                    right: None,
                };
                (axis, legend)
            }
            Period::Hour => {
                let hours = (0..period.slots()).map(|h| Value::from(h as u64)).collect();
                let legend = Legend {
                    data: names,
                    bottom: None,
                    right: Some(24),
                };
                (Axis::category(hours).named("Hour"), legend)
            }
        };
        x_axis.axis_tick = Some(AxisTick {
            align_with_label: true,
        });

        let series = shaped
            .series
            .into_iter()
            .map(|spec| {
                let mut line = Series::line(Some(spec.name), spec.data);
                line.smooth = Some(true);
                line.symbol = Some("circle".to_string());
                line.symbol_size = Some(6);
                line
            })
            .collect();

        Self {
            title: source_title(title, url),
            tooltip: Some(Tooltip::axis()),
            legend: Some(legend),
            x_axis,
            y_axis: Axis::value().named("Trips"),
            series,
        }
    }
}

fn source_title(title: &str, url: &str) -> Title {
    Title {
        text: title.to_string(),
        subtext: Some(format!("API: {}", url)),
        left: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bike_option() {
        let rows = vec![Row::year(2020).bikes(5000.0), Row::year(2019).bikes(6000.0)];
        let option = ChartOption::build(ChartKind::Bike, "Bikes", "/api/bikes", &rows);

        assert_eq!(option.title.text, "Bikes");
        assert_eq!(option.title.subtext.as_deref(), Some("API: /api/bikes"));
        assert_eq!(option.x_axis.labels(), &[json!(2019), json!(2020)]);
        assert_eq!(option.y_axis.min, Some(4500.0));
        assert_eq!(option.y_axis.max, Some(7500.0));
        assert_eq!(option.series.len(), 1);
        assert_eq!(option.series[0].data, vec![6000.0, 5000.0]);
        assert!(!option.is_failed());
    }

    #[test]
    fn test_station_option_range() {
        let option = ChartOption::build(ChartKind::Station, "Stations", "/s", &[]);

        assert_eq!(option.y_axis.name.as_deref(), Some("Station Count"));
        assert_eq!(option.y_axis.min, Some(450.0));
        assert_eq!(option.y_axis.max, Some(750.0));
        assert!(option.series[0].data.is_empty());
    }

    #[test]
    fn test_month_option() {
        let rows = vec![Row::year(2021).month(3).trips(42.0)];
        let option = ChartOption::build(ChartKind::TripMonth, "Monthly", "/m", &rows);

        assert_eq!(option.x_axis.labels().len(), 12);
        assert_eq!(option.x_axis.labels()[8], json!("Sept"));
        assert_eq!(option.legend.as_ref().unwrap().data, vec!["2021"]);
        assert_eq!(option.series.len(), 1);
        assert_eq!(option.series[0].name.as_deref(), Some("2021"));
        assert_eq!(option.series[0].data[2], 42.0);
    }

    #[test]
    fn test_hour_option_axis() {
        let option = ChartOption::build(ChartKind::TripHour, "Hourly", "/h", &[]);

        let labels = option.x_axis.labels();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], json!(0));
        assert_eq!(labels[23], json!(23));
        assert!(option.series.is_empty());
        assert_eq!(option.legend.as_ref().unwrap().right, Some(24));
    }

    #[test]
    fn test_failed_option() {
        let option = ChartOption::failed("Bike Count Over Years");

        assert!(option.is_failed());
        assert_eq!(option.title.left.as_deref(), Some("center"));
        assert!(option.x_axis.labels().is_empty());
        assert_eq!(option.series.len(), 1);
        assert!(option.series[0].data.is_empty());
    }

    #[test]
    fn test_serializes_to_echarts_shape() {
        let option = ChartOption::build(
            ChartKind::TripMonth,
            "Monthly",
            "/m",
            &[Row::year(2022).month(1).trips(3.0)],
        );
        let value = serde_json::to_value(&option).unwrap();

        assert_eq!(value["xAxis"]["type"], "category");
        assert_eq!(value["xAxis"]["axisTick"]["alignWithLabel"], true);
        assert_eq!(value["xAxis"]["axisLabel"]["rotate"], 30);
        assert_eq!(value["yAxis"]["type"], "value");
        assert_eq!(value["series"][0]["type"], "line");
        assert_eq!(value["series"][0]["symbolSize"], 6);
        assert_eq!(value["tooltip"]["trigger"], "axis");
        assert!(value["yAxis"].get("min").is_none());
    }
}
