//! GHCN-Daily station inventory.
//!
//! See "GHCN-Daily readme.txt Section IV" for the fixed-width layout.

use std::{fmt, str::FromStr};

use crate::{
    constants::MISSING_STATION_VALUE,
    error::ReadingError,
    reading::{column, optional_str, parse_field, required_column, Record},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    pub id: String,
    pub latitude: f32,
    pub longitude: f32,
    pub elevation: Option<f32>,
    pub state: Option<String>,
    pub name: String,
    pub gsn_flag: Option<String>,
    pub hcn_crn_flag: Option<String>,
    pub wmo_id: Option<String>,
}

impl Station {
    /// FIPS country code, the first two characters of the identifier.
    pub fn country(&self) -> &str {
        self.id.get(0..2).unwrap_or("")
    }
}

impl Record for Station {
    fn from_line(line: &str) -> Result<Self, ReadingError> {
        let id = required_column(line, 0, 11)?.trim().to_string();
        let latitude = parse_field("latitude", required_column(line, 12, 20)?)?;
        let longitude = parse_field("longitude", required_column(line, 21, 30)?)?;
        let elevation = parse_and_filter_f32(column(line, 31, 37));
        let state = optional_str(column(line, 38, 40));
        let name = column(line, 41, 71).trim().to_string();
        let gsn_flag = optional_str(column(line, 72, 75));
        let hcn_crn_flag = optional_str(column(line, 76, 79));
        let wmo_id = optional_str(column(line, 80, 85));

        Ok(Station {
            id,
            latitude,
            longitude,
            elevation,
            state,
            name,
            gsn_flag,
            hcn_crn_flag,
            wmo_id,
        })
    }
}

fn parse_and_filter_f32(s: &str) -> Option<f32> {
    s.trim()
        .parse::<f32>()
        .ok()
        .filter(|&v| v != MISSING_STATION_VALUE)
}

/// Geographic box in decimal degrees, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_longitude: f32,
    pub min_latitude: f32,
    pub max_longitude: f32,
    pub max_latitude: f32,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f32, longitude: f32) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

impl FromStr for BoundingBox {
    type Err = ReadingError;

    /// Parses `min_lon,min_lat,max_lon,max_lat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| parse_field::<f32>("bounding box", p))
            .collect::<Result<Vec<_>, _>>()?;

        match parts[..] {
            [min_longitude, min_latitude, max_longitude, max_latitude]
                if min_longitude <= max_longitude && min_latitude <= max_latitude =>
            {
                Ok(BoundingBox {
                    min_longitude,
                    min_latitude,
                    max_longitude,
                    max_latitude,
                })
            }
            _ => Err(ReadingError::InvalidField {
                field: "bounding box",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.min_longitude, self.min_latitude, self.max_longitude, self.max_latitude
        )
    }
}

/// Criteria a station must meet to be kept. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct StationFilter {
    pub country: Option<String>,
    pub state: Option<String>,
    pub bbox: Option<BoundingBox>,
    pub name: Option<String>,
}

impl StationFilter {
    pub fn matches(&self, station: &Station) -> bool {
        if let Some(country) = &self.country {
            if !station.country().eq_ignore_ascii_case(country) {
                return false;
            }
        }

        if let Some(state) = &self.state {
            match &station.state {
                Some(s) if s.eq_ignore_ascii_case(state) => {}
                _ => return false,
            }
        }

        if let Some(bbox) = &self.bbox {
            if !bbox.contains(station.latitude, station.longitude) {
                return false;
            }
        }

        if let Some(name) = &self.name {
            if !station
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, stations: Vec<Station>) -> Vec<Station> {
        stations.into_iter().filter(|s| self.matches(s)).collect()
    }
}

// -- Tests -------------------------------------------------------------------
