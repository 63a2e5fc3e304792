//! Replays the whole session: US stations, annual precipitation of two
//! example stations, then the Arctic Oscillation exploration.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::{
    config::Config,
    constants::{TEXAS_STATION, WASHINGTON_STATION},
    reading::{Element, StationFilter},
    series::{Aggregation, Frequency, Rule},
};

use super::{ao, daily, stations, DailyRequest};

const AO_THRESHOLD: f64 = 3.0;
const AO_WINDOW: usize = 12;

/// Stations and the title of their annual precipitation figure.
pub fn session_requests() -> Vec<(&'static str, DailyRequest)> {
    [
        (TEXAS_STATION, "Annual precipitation in Southwestern Texas"),
        (WASHINGTON_STATION, "Annual precipitation in Central Washington"),
    ]
    .into_iter()
    .map(|(station_id, title)| {
        let request = DailyRequest {
            element: Element::Prcp,
            from: Some(1990),
            to: Some(2020),
            rule: Rule::new(Frequency::Year, 1),
            aggregation: Aggregation::Sum,
            rolling: None,
            rolling_aggregation: Aggregation::Mean,
            drop_flagged: false,
            parquet: false,
            title: Some(title.to_string()),
        };
        (station_id, request)
    })
    .collect()
}

pub async fn explore(config: &Config) -> Result<Vec<PathBuf>> {
    let us = StationFilter {
        country: Some("US".to_string()),
        ..StationFilter::default()
    };
    let mut written = stations(config, &us, false).await?;

    for (station_id, request) in session_requests() {
        info!("Exploring station {}", station_id);
        written.extend(daily(config, &[station_id.to_string()], &request).await?);
    }

    written.extend(ao(config, None, AO_THRESHOLD, AO_WINDOW, false, false).await?);

    Ok(written)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_request_annual_totals_for_both_stations() {
        let requests = session_requests();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "USC00412679");
        assert_eq!(
            requests[1].1.resampled_title(requests[1].0),
            "Annual precipitation in Central Washington"
        );
        assert!(requests
            .iter()
            .all(|(_, r)| r.aggregation == Aggregation::Sum && r.from == Some(1990)));
    }
}
