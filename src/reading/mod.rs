//! Parsers for the GHCN-Daily and AO index text formats.

pub mod ao;
pub mod daily;
pub mod station;

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use crate::error::ReadingError;

pub use ao::{load_delimited, AoReading};
pub use daily::{DailyReading, Element, StationObservations};
pub use station::{BoundingBox, Station, StationFilter};

/// A record that can be parsed from one line of a text file.
pub trait Record: Sized {
    fn from_line(line: &str) -> Result<Self, ReadingError>;
}

/// Parses every non-blank line of `path` as an `R`. Errors carry the 1-based
/// line number.
pub fn read_records<R: Record>(path: &Path) -> Result<Vec<R>, ReadingError> {
    let file = File::open(path).map_err(|e| ReadingError::Io(path.to_path_buf(), e))?;
    let reader = io::BufReader::new(file);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ReadingError::Io(path.to_path_buf(), e))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = R::from_line(&line).map_err(|e| ReadingError::Line {
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Returns `line[start..end]`, clipped to the line length.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Like [`column`] but fails when the line does not reach `end`.
fn required_column(line: &str, start: usize, end: usize) -> Result<&str, ReadingError> {
    if line.len() < end {
        return Err(ReadingError::LineTooShort {
            expected: end,
            found: line.len(),
        });
    }
    line.get(start..end).ok_or(ReadingError::InvalidField {
        field: "column",
        value: line.to_string(),
    })
}

fn parse_field<T: std::str::FromStr>(field: &'static str, s: &str) -> Result<T, ReadingError> {
    s.trim().parse::<T>().map_err(|_| ReadingError::InvalidField {
        field,
        value: s.trim().to_string(),
    })
}

fn optional_str(s: &str) -> Option<String> {
    Some(s.trim().to_string()).filter(|v| !v.is_empty())
}

// -- Tests -------------------------------------------------------------------
