//! Re-aggregating a series onto a coarser calendar grid.
//!
//! Rules follow the usual offset aliases: `W` (weeks ending Sunday), `SM`
//! (15th and month end), `M`, `Q`, `A`/`Y`, optionally prefixed by a
//! multiplier such as `3A`. Bins are closed on the right and labelled with
//! the last day they cover, except `SM` bins, which start on an anchor day and
//! are labelled with it. The first bin ends with the period of the first
//! observation, so `3A` from 1950 gives bins ending 1950, 1953, 1956.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    error::SeriesError,
    series::{calendar, frame::Column, stats, Frame, TimeSeries},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Week,
    SemiMonth,
    Month,
    Quarter,
    Year,
}

// Any Sunday works as the origin for week numbering
const WEEK_ANCHOR: (i32, u32, u32) = (1970, 1, 4);

impl Frequency {
    /// Sequential number of the period containing `date`. Semi-month periods
    /// run from one anchor day (15th or month end) up to the next.
    pub fn period(&self, date: NaiveDate) -> i64 {
        let year = date.year() as i64;
        let month0 = date.month0() as i64;

        match self {
            Frequency::Year => year,
            Frequency::Quarter => year * 4 + month0 / 3,
            Frequency::Month => year * 12 + month0,
            Frequency::SemiMonth => {
                let month_index = year * 12 + month0;
                if Some(date) == calendar::month_end(date.year(), date.month()) {
                    month_index * 2 + 1
                } else if date.day() >= 15 {
                    month_index * 2
                } else {
                    month_index * 2 - 1
                }
            }
            Frequency::Week => {
                let anchor = week_anchor();
                (calendar::week_end(date) - anchor).num_days().div_euclid(7)
            }
        }
    }

    /// Day labelling period number `period`: its last day, or its anchor day
    /// for semi-months.
    pub fn period_end(&self, period: i64) -> Option<NaiveDate> {
        match self {
            Frequency::Year => calendar::year_end(i32::try_from(period).ok()?),
            Frequency::Quarter => {
                let year = i32::try_from(period.div_euclid(4)).ok()?;
                let quarter = period.rem_euclid(4) as u32;
                calendar::month_end(year, quarter * 3 + 3)
            }
            Frequency::Month => {
                let year = i32::try_from(period.div_euclid(12)).ok()?;
                calendar::month_end(year, period.rem_euclid(12) as u32 + 1)
            }
            Frequency::SemiMonth => {
                let month_index = period.div_euclid(2);
                let year = i32::try_from(month_index.div_euclid(12)).ok()?;
                let month = month_index.rem_euclid(12) as u32 + 1;
                if period.rem_euclid(2) == 0 {
                    NaiveDate::from_ymd_opt(year, month, 15)
                } else {
                    calendar::month_end(year, month)
                }
            }
            Frequency::Week => week_anchor().checked_add_signed(Duration::days(period * 7)),
        }
    }

    /// Bins start on, and are labelled by, their first anchor day.
    fn is_left_labelled(&self) -> bool {
        matches!(self, Frequency::SemiMonth)
    }

    fn noun(&self) -> &'static str {
        match self {
            Frequency::Week => "week",
            Frequency::SemiMonth => "half-month",
            Frequency::Month => "month",
            Frequency::Quarter => "quarter",
            Frequency::Year => "year",
        }
    }
}

fn week_anchor() -> NaiveDate {
    let (y, m, d) = WEEK_ANCHOR;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// A frequency and how many of its periods make up one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub frequency: Frequency,
    pub multiple: u32,
}

impl Rule {
    pub fn new(frequency: Frequency, multiple: u32) -> Self {
        Rule {
            frequency,
            multiple: multiple.max(1),
        }
    }

    /// Adjective used in figure titles, e.g. "Annual" or "3yr".
    pub fn describe(&self) -> String {
        match (self.frequency, self.multiple) {
            (Frequency::Year, 1) => "Annual".to_string(),
            (Frequency::Quarter, 1) => "Quarterly".to_string(),
            (Frequency::Month, 1) => "Monthly".to_string(),
            (Frequency::SemiMonth, 1) => "Semi-monthly".to_string(),
            (Frequency::Week, 1) => "Weekly".to_string(),
            (Frequency::Year, n) => format!("{}yr", n),
            (frequency, n) => format!("{}-{}", n, frequency.noun()),
        }
    }

    /// First period of bin 0, given the period of the first observation.
    fn origin(&self, first: i64) -> i64 {
        if self.frequency.is_left_labelled() {
            first
        } else {
            first - (self.multiple as i64 - 1)
        }
    }

    /// Bin number of `period`, counted from the period `origin`.
    fn bin(&self, origin: i64, period: i64) -> i64 {
        (period - origin).div_euclid(self.multiple as i64)
    }

    fn bin_label(&self, origin: i64, bin: i64) -> Option<NaiveDate> {
        let n = self.multiple as i64;
        let start = origin + bin * n;
        if self.frequency.is_left_labelled() {
            self.frequency.period_end(start)
        } else {
            self.frequency.period_end(start + n - 1)
        }
    }
}

impl FromStr for Rule {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
        let (count, alias) = s.split_at(digits);

        let multiple = if count.is_empty() {
            1
        } else {
            count
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| SeriesError::UnknownRule(s.to_string()))?
        };

        let frequency = match alias.to_uppercase().as_str() {
            "W" | "W-SUN" => Frequency::Week,
            "SM" => Frequency::SemiMonth,
            "M" | "ME" => Frequency::Month,
            "Q" | "QE" | "Q-DEC" => Frequency::Quarter,
            "A" | "Y" | "YE" | "A-DEC" => Frequency::Year,
            _ => return Err(SeriesError::UnknownRule(s.to_string())),
        };

        Ok(Rule::new(frequency, multiple))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alias = match self.frequency {
            Frequency::Week => "W",
            Frequency::SemiMonth => "SM",
            Frequency::Month => "M",
            Frequency::Quarter => "Q",
            Frequency::Year => "A",
        };
        if self.multiple == 1 {
            write!(f, "{}", alias)
        } else {
            write!(f, "{}{}", self.multiple, alias)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Median,
    Min,
    Max,
    Sum,
    Count,
    Std,
    Var,
}

impl Aggregation {
    /// Aggregate of one bin. `None` when undefined for the bin, which drops
    /// it from the result.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Aggregation::Mean => stats::mean(values),
            Aggregation::Median => stats::median(values),
            Aggregation::Min => stats::min(values),
            Aggregation::Max => stats::max(values),
            Aggregation::Sum => Some(stats::sum(values)),
            Aggregation::Count => Some(values.len() as f64),
            Aggregation::Std => stats::std_dev(values),
            Aggregation::Var => stats::variance(values),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Median => "median",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
            Aggregation::Std => "std",
            Aggregation::Var => "var",
        }
    }
}

impl FromStr for Aggregation {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "avg" => Ok(Aggregation::Mean),
            "median" => Ok(Aggregation::Median),
            "min" | "amin" => Ok(Aggregation::Min),
            "max" | "amax" => Ok(Aggregation::Max),
            "sum" | "total" => Ok(Aggregation::Sum),
            "count" => Ok(Aggregation::Count),
            "std" => Ok(Aggregation::Std),
            "var" => Ok(Aggregation::Var),
            _ => Err(SeriesError::UnknownAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values of `series` grouped into consecutive bins. Every bin from the
/// first to the last observation is present, empty ones included.
fn bins(series: &TimeSeries, rule: &Rule) -> Vec<(NaiveDate, Vec<f64>)> {
    let points = series.points();
    let Some((first, _)) = points.first() else {
        return Vec::new();
    };
    let origin = rule.origin(rule.frequency.period(*first));

    let mut grouped: Vec<Vec<f64>> = Vec::new();
    for (date, value) in points {
        let bin = rule.bin(origin, rule.frequency.period(*date)) as usize;
        if grouped.len() <= bin {
            grouped.resize_with(bin + 1, Vec::new);
        }
        grouped[bin].push(*value);
    }

    grouped
        .into_iter()
        .enumerate()
        .filter_map(|(bin, values)| Some((rule.bin_label(origin, bin as i64)?, values)))
        .collect()
}

impl TimeSeries {
    /// Aggregates each bin of `rule` with `aggregation`. Empty bins yield 0
    /// for sum and count and are left out otherwise.
    pub fn resample(&self, rule: &Rule, aggregation: Aggregation) -> TimeSeries {
        let points = bins(self, rule)
            .into_iter()
            .filter_map(|(end, values)| Some((end, aggregation.apply(&values)?)))
            .collect();

        TimeSeries::derived(self.name(), points)
    }

    /// Several aggregations of the same bins side by side. Empty bins are
    /// left out.
    pub fn resample_many(&self, rule: &Rule, aggregations: &[Aggregation]) -> Frame {
        let bins: Vec<_> = bins(self, rule)
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .collect();

        let index = bins.iter().map(|(end, _)| *end).collect();
        let columns = aggregations
            .iter()
            .map(|agg| Column {
                name: agg.name().to_string(),
                values: bins.iter().map(|(_, values)| agg.apply(values)).collect(),
            })
            .collect();

        Frame::new(self.name(), index, columns)
    }
}

// -- Tests -------------------------------------------------------------------
