//! Download the daily observations of GHCN-Daily stations, plot them and
//! their resampled totals.
//!
//! See "GHCN-Daily readme.txt Section III" for format.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use log::{info, warn};

use crate::{
    config::Config,
    display::render_series,
    download::fetch_cached,
    parquet,
    plot::{Figure, LineStyle},
    reading::{read_records, DailyReading, Element, StationObservations},
    series::{Aggregation, Rule, TimeSeries},
};

use super::make_parquet_file_name;

/// What to extract from each station and how to resample it.
#[derive(Debug, Clone)]
pub struct DailyRequest {
    pub element: Element,
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub rule: Rule,
    pub aggregation: Aggregation,
    /// Rolling window over the resampled bins, drawn over them.
    pub rolling: Option<usize>,
    pub rolling_aggregation: Aggregation,
    pub drop_flagged: bool,
    pub parquet: bool,
    /// Title of the resampled figure, derived from the request when unset.
    pub title: Option<String>,
}

impl DailyRequest {
    pub fn resampled_title(&self, station_id: &str) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!(
                "{} {} of {} at {}",
                self.rule.describe(),
                self.aggregation,
                self.element.description(),
                station_id
            ),
        }
    }

    /// Rolling values of the resampled series, when a window was requested.
    pub fn rolling_overlay(&self, resampled: &TimeSeries) -> Result<Option<TimeSeries>> {
        let Some(window) = self.rolling else {
            return Ok(None);
        };
        let rolled = resampled
            .rolling(window)
            .aggregate(self.rolling_aggregation)?
            .renamed(format!("{}-bin rolling {}", window, self.rolling_aggregation));

        Ok(Some(rolled))
    }

    fn figure(&self, title: String, series: TimeSeries) -> Figure {
        let figure = Figure::new(title).line(series, LineStyle::default());
        match self.element.units() {
            "" => figure,
            units => figure.y_label(units),
        }
    }
}

pub async fn daily(
    config: &Config,
    station_ids: &[String],
    request: &DailyRequest,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for station_id in station_ids {
        written.extend(station_daily(config, station_id, request).await?);
    }

    Ok(written)
}

/// Parses the cached `.dly` file of one station.
pub async fn load_observations(config: &Config, station_id: &str) -> Result<StationObservations> {
    let file_path = fetch_cached(
        config,
        &config.daily_url(station_id),
        &format!("{}.dly", station_id),
    )
    .await
    .with_context(|| format!("Failed to fetch daily data of station {}", station_id))?;

    let readings = read_records::<DailyReading>(&file_path)
        .with_context(|| format!("Failed to parse `{}`", file_path.display()))?;

    Ok(StationObservations::from_readings(station_id, readings))
}

async fn station_daily(
    config: &Config,
    station_id: &str,
    request: &DailyRequest,
) -> Result<Vec<PathBuf>> {
    let observations = load_observations(config, station_id).await?;
    info!(
        "Station {} reports {}",
        station_id,
        observations.element_codes().join(", ")
    );

    let series = observations.series(&request.element, request.drop_flagged)?;
    if series.is_empty() {
        bail!(
            "Station {} has no {} observations",
            station_id,
            request.element
        );
    }
    println!("{}\n", render_series(&series, config.max_rows));

    let mut written = Vec::new();
    let title = format!("{} {}", station_id, request.element.description());
    written.push(request.figure(title, series.clone()).render(&config.output_dir)?);

    let resampled = resample_range(&series, request);
    if resampled.is_empty() {
        warn!(
            "No {} observations at {} in the requested years",
            request.element, station_id
        );
    } else {
        println!("{}\n", render_series(&resampled, config.max_rows));
        let title = request.resampled_title(station_id);
        let rolled = request.rolling_overlay(&resampled)?;
        let mut figure = request.figure(title, resampled);
        match rolled {
            Some(rolled) if !rolled.is_empty() => {
                figure = figure.line(rolled, "b--".parse()?);
            }
            Some(_) => warn!("Too few bins at {} for the rolling window", station_id),
            None => {}
        }
        written.push(figure.render(&config.output_dir)?);
    }

    if request.parquet {
        let parquet_file_name = make_parquet_file_name(config, &format!("ghcnd-{}", station_id))?;
        parquet::save_observations(&observations, &parquet_file_name)?;
        written.push(parquet_file_name);
    }

    Ok(written)
}

/// Resamples the requested years, which default to those the series covers.
pub fn resample_range(series: &TimeSeries, request: &DailyRequest) -> TimeSeries {
    let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
        return series.clone();
    };
    let from = request.from.unwrap_or(first.year());
    let to = request.to.unwrap_or(last.year());

    series
        .slice_years(from, to)
        .resample(&request.rule, request.aggregation)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::series::tests::date;

    fn request() -> DailyRequest {
        DailyRequest {
            element: Element::Prcp,
            from: None,
            to: None,
            rule: "A".parse().unwrap(),
            aggregation: Aggregation::Sum,
            rolling: None,
            rolling_aggregation: Aggregation::Mean,
            drop_flagged: false,
            parquet: false,
            title: None,
        }
    }

    fn series() -> TimeSeries {
        TimeSeries::new(
            "USC00412679 PRCP",
            vec![
                (date(1989, 12, 31), 1.0),
                (date(1990, 6, 1), 2.0),
                (date(1990, 7, 1), 3.0),
                (date(1991, 1, 1), 4.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn should_resample_whole_series_by_default() {
        let annual = resample_range(&series(), &request());

        assert_eq!(
            annual.points(),
            &[
                (date(1989, 12, 31), 1.0),
                (date(1990, 12, 31), 5.0),
                (date(1991, 12, 31), 4.0),
            ]
        );
    }

    #[test]
    fn should_resample_requested_years() {
        let request = DailyRequest {
            from: Some(1990),
            to: Some(1990),
            ..request()
        };

        assert_eq!(
            resample_range(&series(), &request).points(),
            &[(date(1990, 12, 31), 5.0)]
        );
    }

    #[test]
    fn should_title_resampled_figure() {
        assert_eq!(
            request().resampled_title("USC00412679"),
            "Annual sum of precipitation at USC00412679"
        );

        let titled = DailyRequest {
            title: Some("Annual precipitation in Southwestern Texas".to_string()),
            ..request()
        };
        assert_eq!(
            titled.resampled_title("USC00412679"),
            "Annual precipitation in Southwestern Texas"
        );
    }

    #[test]
    fn should_roll_over_resampled_bins() {
        let annual = resample_range(&series(), &request());
        assert_eq!(request().rolling_overlay(&annual).unwrap(), None);

        let request = DailyRequest {
            rolling: Some(2),
            ..request()
        };
        let rolled = request.rolling_overlay(&annual).unwrap().unwrap();

        assert_eq!(rolled.name(), "2-bin rolling mean");
        assert_eq!(
            rolled.points(),
            &[(date(1990, 12, 31), 3.0), (date(1991, 12, 31), 4.5)]
        );
    }

    #[tokio::test]
    async fn should_load_cached_observations() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_dirs(dir.path().to_path_buf(), dir.path().join("out"));
        config.daily_url_root = "http://127.0.0.1:9/all".to_string();
        fs::write(
            dir.path().join("USC00412679.dly"),
            "USC00412679199001PRCP   25  7  113 G7-9999   \n",
        )
        .unwrap();

        let observations = load_observations(&config, "USC00412679").await.unwrap();

        let all = observations.series(&Element::Prcp, false).unwrap();
        assert_eq!(all.len(), 2);
        assert!((all.sum() - 13.8).abs() < 1e-9);

        let unflagged = observations.series(&Element::Prcp, true).unwrap();
        assert_eq!(unflagged.points(), &[(date(1990, 1, 1), 2.5)]);
    }
}
