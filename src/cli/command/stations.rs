//! Download the GHCN-Daily station inventory, filter it and print it.
//!
//! See "GHCN-Daily readme.txt Section IV" for format.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::create_spinner,
    config::Config,
    display::render_station_table,
    download::{fetch_cached, file_name_from_url},
    parquet,
    reading::{read_records, Station, StationFilter},
};

use super::make_parquet_file_name;

pub async fn stations(config: &Config, filter: &StationFilter, save: bool) -> Result<Vec<PathBuf>> {
    let stations = load_stations(config, filter).await?;
    println!("{}", render_station_table(&stations, config.max_rows));

    let mut written = Vec::new();
    if save {
        let parquet_file_name = make_parquet_file_name(config, "ghcnd-stations")?;
        parquet::save_stations(&stations, &parquet_file_name)?;
        written.push(parquet_file_name);
    }

    Ok(written)
}

/// Parses the cached inventory and keeps the stations matching `filter`.
pub async fn load_stations(config: &Config, filter: &StationFilter) -> Result<Vec<Station>> {
    let url = &config.stations_url;
    let file_path = fetch_cached(config, url, file_name_from_url(url)).await?;

    let bar = create_spinner("Parsing stations...".to_string());
    let stations = read_records::<Station>(&file_path)
        .with_context(|| format!("Failed to parse `{}`", file_path.display()))?;
    bar.finish_with_message(format!("{} stations parsed", stations.len()));

    let total = stations.len();
    let stations = filter.apply(stations);
    info!("{} of {} stations match", stations.len(), total);

    Ok(stations)
}
