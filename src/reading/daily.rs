//! GHCN-Daily `.dly` station files.
//!
//! Each line holds one station, month and element with 31 day slots of
//! `VALUE(5) MFLAG(1) QFLAG(1) SFLAG(1)`.

use std::{collections::BTreeMap, convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDate;

use crate::{
    constants::MISSING_DAILY_VALUE,
    error::{ReadingError, SeriesError},
    reading::{parse_field, required_column, Record},
    series::TimeSeries,
};

const VALUES_START: usize = 21;
const SLOT_LENGTH: usize = 8;
const SLOTS: usize = 31;

/// GHCN-Daily element code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Prcp,
    Snow,
    Snwd,
    Tmax,
    Tmin,
    Other(String),
}

impl Element {
    /// Factor turning the stored integer into physical units.
    pub fn scale(&self) -> f64 {
        match self {
            Element::Prcp | Element::Tmax | Element::Tmin => 0.1,
            Element::Snow | Element::Snwd | Element::Other(_) => 1.0,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Element::Prcp => "precipitation".to_string(),
            Element::Snow => "snowfall".to_string(),
            Element::Snwd => "snow depth".to_string(),
            Element::Tmax => "maximum temperature".to_string(),
            Element::Tmin => "minimum temperature".to_string(),
            Element::Other(code) => code.clone(),
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Element::Prcp | Element::Snow | Element::Snwd => "mm",
            Element::Tmax | Element::Tmin => "°C",
            Element::Other(_) => "",
        }
    }
}

impl FromStr for Element {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Ok(match code.as_str() {
            "PRCP" => Element::Prcp,
            "SNOW" => Element::Snow,
            "SNWD" => Element::Snwd,
            "TMAX" => Element::Tmax,
            "TMIN" => Element::Tmin,
            _ => Element::Other(code),
        })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Prcp => write!(f, "PRCP"),
            Element::Snow => write!(f, "SNOW"),
            Element::Snwd => write!(f, "SNWD"),
            Element::Tmax => write!(f, "TMAX"),
            Element::Tmin => write!(f, "TMIN"),
            Element::Other(code) => write!(f, "{}", code),
        }
    }
}

/// One day slot of a `.dly` line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayValue {
    pub value: Option<i32>,
    pub mflag: Option<char>,
    pub qflag: Option<char>,
    pub sflag: Option<char>,
}

#[derive(Debug, Clone)]
pub struct DailyReading {
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub element: Element,
    pub values: Vec<DayValue>,
}

/// A single valid daily value in physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
    pub mflag: Option<char>,
    pub qflag: Option<char>,
    pub sflag: Option<char>,
}

impl Record for DailyReading {
    fn from_line(line: &str) -> Result<Self, ReadingError> {
        let id = required_column(line, 0, 11)?.to_string();
        let year = parse_field("year", required_column(line, 11, 15)?)?;
        let month = parse_field("month", required_column(line, 15, 17)?)?;
        let element = required_column(line, 17, 21)?
            .parse::<Element>()
            .unwrap_or_else(|e| match e {});
        let values = parse_daily_values(line)?;

        Ok(DailyReading {
            id,
            year,
            month,
            element,
            values,
        })
    }
}

impl DailyReading {
    /// Valid observations of this month. Missing values and slots past the
    /// end of the month are skipped.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        let scale = self.element.scale();

        self.values.iter().enumerate().filter_map(move |(idx, day)| {
            let value = day.value?;
            let date = NaiveDate::from_ymd_opt(self.year, self.month, idx as u32 + 1)?;

            Some(Observation {
                date,
                value: value as f64 * scale,
                mflag: day.mflag,
                qflag: day.qflag,
                sflag: day.sflag,
            })
        })
    }
}

// Trailing blanks are sometimes stripped, so short lines are padded
fn parse_daily_values(line: &str) -> Result<Vec<DayValue>, ReadingError> {
    let full_length = VALUES_START + SLOTS * SLOT_LENGTH;
    let padded = format!("{:<width$}", line, width = full_length);

    (0..SLOTS)
        .map(|i| {
            let start = VALUES_START + i * SLOT_LENGTH;
            let slot = padded
                .get(start..start + SLOT_LENGTH)
                .ok_or_else(|| ReadingError::InvalidField {
                    field: "day slot",
                    value: line.to_string(),
                })?;

            let raw = slot[..5].trim();
            let value = if raw.is_empty() {
                None
            } else {
                match parse_field::<i32>("daily value", raw)? {
                    MISSING_DAILY_VALUE => None,
                    v => Some(v),
                }
            };

            let mut flags = slot[5..].chars().map(|c| Some(c).filter(|c| *c != ' '));
            Ok(DayValue {
                value,
                mflag: flags.next().flatten(),
                qflag: flags.next().flatten(),
                sflag: flags.next().flatten(),
            })
        })
        .collect()
}

/// All daily observations of one station, grouped by element.
#[derive(Debug, Clone, Default)]
pub struct StationObservations {
    pub id: String,
    pub elements: BTreeMap<Element, Vec<Observation>>,
}

impl StationObservations {
    /// Groups the readings of station `id`. Readings of other stations are
    /// ignored.
    pub fn from_readings(id: &str, readings: Vec<DailyReading>) -> Self {
        let mut elements: BTreeMap<Element, Vec<Observation>> = BTreeMap::new();

        for reading in readings.iter().filter(|r| r.id.trim() == id) {
            elements
                .entry(reading.element.clone())
                .or_default()
                .extend(reading.observations());
        }

        for observations in elements.values_mut() {
            observations.sort_by_key(|o| o.date);
        }

        StationObservations {
            id: id.to_string(),
            elements,
        }
    }

    pub fn element_codes(&self) -> Vec<String> {
        self.elements.keys().map(|e| e.to_string()).collect()
    }

    /// Date-indexed values of `element`. With `drop_flagged`, values carrying
    /// a quality flag are left out.
    pub fn series(&self, element: &Element, drop_flagged: bool) -> Result<TimeSeries, SeriesError> {
        let points = self
            .elements
            .get(element)
            .map(|observations| {
                observations
                    .iter()
                    .filter(|o| !(drop_flagged && o.qflag.is_some()))
                    .map(|o| (o.date, o.value))
                    .collect()
            })
            .unwrap_or_default();

        TimeSeries::new(format!("{} {}", self.id, element), points)
    }
}

// -- Tests ----------------------------------------------------------------------------
