//! Fixed-size moving windows over consecutive points.

use crate::{
    error::SeriesError,
    series::{stats, Aggregation, TimeSeries},
};

/// A moving window of `window` points. Only full windows produce a value.
#[derive(Debug, Clone, Copy)]
pub struct Rolling<'a> {
    series: &'a TimeSeries,
    window: usize,
    center: bool,
}

impl TimeSeries {
    pub fn rolling(&self, window: usize) -> Rolling<'_> {
        Rolling {
            series: self,
            window,
            center: false,
        }
    }
}

impl<'a> Rolling<'a> {
    /// Label each window by its middle point instead of its last.
    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn mean(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(1, stats::mean)
    }

    pub fn sum(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(1, |w| Some(stats::sum(w)))
    }

    pub fn min(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(1, stats::min)
    }

    pub fn max(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(1, stats::max)
    }

    /// Sample variance of each window.
    pub fn var(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(2, stats::variance)
    }

    pub fn std(&self) -> Result<TimeSeries, SeriesError> {
        self.apply(2, stats::std_dev)
    }

    /// Any aggregation over each window.
    pub fn aggregate(&self, aggregation: Aggregation) -> Result<TimeSeries, SeriesError> {
        match aggregation {
            Aggregation::Mean => self.mean(),
            Aggregation::Sum => self.sum(),
            Aggregation::Min => self.min(),
            Aggregation::Max => self.max(),
            Aggregation::Var => self.var(),
            Aggregation::Std => self.std(),
            Aggregation::Median => self.apply(1, stats::median),
            Aggregation::Count => self.apply(1, |w| Some(w.len() as f64)),
        }
    }

    fn apply<F>(&self, minimum: usize, f: F) -> Result<TimeSeries, SeriesError>
    where
        F: Fn(&[f64]) -> Option<f64>,
    {
        if self.window < minimum {
            return Err(SeriesError::WindowTooSmall {
                window: self.window,
                minimum,
            });
        }

        let points = self.series.points();
        let values = self.series.values();
        let offset = if self.center {
            self.window / 2
        } else {
            self.window - 1
        };

        let rolled = values
            .windows(self.window)
            .enumerate()
            .filter_map(|(start, window)| Some((points[start + offset].0, f(window)?)))
            .collect();

        Ok(TimeSeries::derived(self.series.name(), rolled))
    }
}

// -- Tests -------------------------------------------------------------------
