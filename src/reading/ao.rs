//! Monthly Arctic Oscillation index.
//!
//! The CPC file has whitespace separated `year month value` rows; local
//! copies are comma separated with the same three columns and no header.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::{
    error::ReadingError,
    reading::{parse_field, Record},
    series::{calendar::month_end, TimeSeries},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AoReading {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

impl Record for AoReading {
    fn from_line(line: &str) -> Result<Self, ReadingError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(ReadingError::InvalidField {
                field: "AO row",
                value: line.to_string(),
            });
        }

        Ok(AoReading {
            year: parse_field("year", fields[0])?,
            month: parse_field("month", fields[1])?,
            value: parse_field("AO index", fields[2])?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DelimitedRow(f64, f64, f64);

/// Loads a comma separated `year,month,value` file.
pub fn load_delimited(path: &Path) -> Result<Vec<AoReading>, ReadingError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut readings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.len() != 3 {
            return Err(ReadingError::ColumnCount {
                line,
                expected: 3,
                found: record.len(),
            });
        }

        let DelimitedRow(year, month, value) =
            record
                .deserialize(None)
                .map_err(|e: csv::Error| ReadingError::Line {
                    line,
                    message: e.to_string(),
                })?;

        readings.push(AoReading {
            year: whole_number("year", year, line)? as i32,
            month: whole_number("month", month, line)? as u32,
            value,
        });
    }

    Ok(readings)
}

// Files written from float arrays store `1950.0` for the year
fn whole_number(field: &str, v: f64, line: usize) -> Result<i64, ReadingError> {
    if v.fract() == 0.0 && v.is_finite() {
        Ok(v as i64)
    } else {
        Err(ReadingError::Line {
            line,
            message: format!("{} `{}` is not a whole number", field, v),
        })
    }
}

/// Builds the index series, each value dated at the last day of its month.
/// Rows are sorted by date first.
pub fn monthly_series(name: &str, readings: &[AoReading]) -> Result<TimeSeries, ReadingError> {
    let points = readings
        .iter()
        .map(|r| {
            month_end(r.year, r.month)
                .map(|date| (date, r.value))
                .ok_or_else(|| ReadingError::InvalidField {
                    field: "month",
                    value: format!("{}-{}", r.year, r.month),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimeSeries::from_unsorted(name, points)?)
}

// -- Tests -------------------------------------------------------------------
