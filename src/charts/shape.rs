//! Row Shaping
//!
//! Pure transforms from fetched rows to axis-aligned series. Category axes are
//! always complete: every year present, all 12 months, all 24 hours. Gaps are
//! filled with zero so that every series lines up with the axis.

use std::collections::BTreeMap;

use super::types::{CountField, Row};

/// A named sequence of values aligned to a category axis
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub name: String,
    pub data: Vec<f64>,
}

/// Single series plotted against the sorted distinct years
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSeries {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

/// One series per year over a fixed period domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSeries {
    pub years: Vec<i32>,
    pub series: Vec<SeriesSpec>,
}

/// Fixed category domain for multi-year charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Months 1-12
    Month,
    /// Hours 0-23
    Hour,
}

impl Period {
    /// Number of slots on the axis
    pub fn slots(&self) -> usize {
        match self {
            Period::Month => 12,
            Period::Hour => 24,
        }
    }

    /// Axis slot for a row, or `None` if the row's key is outside the domain
    fn slot(&self, row: &Row) -> Option<usize> {
        match self {
            Period::Month => row
                .dim_month
                .filter(|m| (1..=12).contains(m))
                .map(|m| usize::from(m) - 1),
            Period::Hour => row.dim_hour.filter(|h| *h < 24).map(usize::from),
        }
    }
}

/// Shape rows into a single year series.
///
/// Rows are ordered by year. A year that appears more than once keeps the
/// value of its last row so the axis never repeats. Rows without a year are
/// dropped.
pub fn year_series(rows: &[Row], field: CountField) -> YearSeries {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows {
        match row.dim_year {
            Some(year) => {
                by_year.insert(year, field.value(row));
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Dropped rows without dim_year");
    }

    let (years, values) = by_year.into_iter().unzip();
    YearSeries { years, values }
}

/// Shape rows into one series per year over `period`.
///
/// A year gets a series as soon as any row mentions it, even if none of its
/// rows has a usable month or hour. Duplicate (year, slot) pairs keep the last
/// value seen.
pub fn period_series(rows: &[Row], period: Period, field: CountField) -> PeriodSeries {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();

    for row in rows {
        let Some(year) = row.dim_year else {
            continue;
        };

        let slots = by_year
            .entry(year)
            .or_insert_with(|| vec![0.0; period.slots()]);

        if let Some(slot) = period.slot(row) {
            slots[slot] = field.value(row);
        }
    }

    let years: Vec<i32> = by_year.keys().copied().collect();
    let series = by_year
        .into_iter()
        .map(|(year, data)| SeriesSpec {
            name: year.to_string(),
            data,
        })
        .collect();

    PeriodSeries { years, series }
}
