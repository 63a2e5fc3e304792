//! Date-indexed numeric series and the operations used to explore them:
//! slicing, filtering, summary statistics, resampling and rolling windows.

pub mod calendar;
pub mod frame;
pub mod resample;
pub mod rolling;
pub mod stats;

use chrono::NaiveDate;

use crate::error::SeriesError;

pub use frame::Frame;
pub use resample::{Aggregation, Frequency, Rule};
pub use stats::Summary;

/// A named series of `(date, value)` points.
///
/// Dates are non-decreasing and values are finite; both are checked on
/// construction so every operation can rely on them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    name: String,
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn new(
        name: impl Into<String>,
        points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, SeriesError> {
        for window in points.windows(2) {
            if window[1].0 < window[0].0 {
                return Err(SeriesError::Unordered {
                    previous: window[0].0,
                    next: window[1].0,
                });
            }
        }
        if let Some((date, _)) = points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite(*date));
        }

        Ok(TimeSeries {
            name: name.into(),
            points,
        })
    }

    /// Sorts `points` by date (stable) before building the series.
    pub fn from_unsorted(
        name: impl Into<String>,
        mut points: Vec<(NaiveDate, f64)>,
    ) -> Result<Self, SeriesError> {
        points.sort_by_key(|(date, _)| *date);
        TimeSeries::new(name, points)
    }

    // Only for results derived from an already valid series
    fn derived(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        TimeSeries {
            name: name.into(),
            points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Points with `start <= date <= end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> TimeSeries {
        let lo = self.points.partition_point(|(d, _)| *d < start);
        let hi = self.points.partition_point(|(d, _)| *d <= end);
        let points = if lo < hi {
            self.points[lo..hi].to_vec()
        } else {
            Vec::new()
        };

        TimeSeries::derived(self.name.clone(), points)
    }

    /// Points from the first day of `from` to the last day of `to`, both
    /// years included.
    pub fn slice_years(&self, from: i32, to: i32) -> TimeSeries {
        match (calendar::year_start(from), calendar::year_end(to)) {
            (Some(start), Some(end)) => self.between(start, end),
            _ => TimeSeries::derived(self.name.clone(), Vec::new()),
        }
    }

    /// Points whose value satisfies `predicate`.
    pub fn filter<F>(&self, predicate: F) -> TimeSeries
    where
        F: Fn(f64) -> bool,
    {
        let points = self
            .points
            .iter()
            .copied()
            .filter(|(_, v)| predicate(*v))
            .collect();

        TimeSeries::derived(self.name.clone(), points)
    }

    pub fn sum(&self) -> f64 {
        stats::sum(&self.values())
    }

    pub fn mean(&self) -> Option<f64> {
        stats::mean(&self.values())
    }

    /// Smallest value and the first date it occurs on.
    pub fn min(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.1 < best.1 { p } else { best })
    }

    /// Largest value and the first date it occurs on.
    pub fn max(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .copied()
            .reduce(|best, p| if p.1 > best.1 { p } else { best })
    }

    pub fn describe(&self) -> Option<Summary> {
        Summary::from_values(&self.values())
    }
}

// -- Tests -------------------------------------------------------------------
