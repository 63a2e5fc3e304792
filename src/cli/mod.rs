//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    constants::DEFAULT_MAX_ROWS,
    reading::{BoundingBox, Element},
    series::{Aggregation, Rule},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Explore GHCN-Daily stations and the Arctic Oscillation index
pub struct Cli {
    /// Where downloads are cached [default: user cache dir]/climex
    #[arg(long, global = true, env = "CLIMEX_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Where figures and exports are written
    #[arg(long, global = true, env = "CLIMEX_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rows printed per table
    #[arg(long, global = true, env = "CLIMEX_MAX_ROWS", default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,

    /// Download again even when a cached copy exists
    #[arg(long, global = true)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List GHCN-Daily stations
    Stations {
        /// FIPS country code
        #[arg(long, default_value = "US")]
        country: String,
        /// State or province code
        #[arg(long)]
        state: Option<String>,
        /// min_lon,min_lat,max_lon,max_lat in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
        /// Case-insensitive substring of the station name
        #[arg(long)]
        name: Option<String>,
        /// Also save the table as parquet
        #[arg(long)]
        parquet: bool,
    },
    /// Get daily observations of one or more stations
    Daily {
        #[arg(required = true)]
        station_ids: Vec<String>,
        #[arg(long, default_value = "PRCP")]
        element: Element,
        /// First year of the resampled range
        #[arg(long)]
        from: Option<i32>,
        /// Last year of the resampled range
        #[arg(long)]
        to: Option<i32>,
        /// Resample rule such as W, SM, M, Q, A or 3A
        #[arg(long, default_value = "A")]
        rule: Rule,
        #[arg(long, default_value = "sum")]
        agg: Aggregation,
        /// Also draw a rolling window of this many resampled bins
        #[arg(long)]
        rolling: Option<usize>,
        /// Aggregation of the rolling window
        #[arg(long, default_value = "mean")]
        rolling_agg: Aggregation,
        /// Leave out values that failed a quality check
        #[arg(long)]
        drop_flagged: bool,
        /// Also save the observations as parquet
        #[arg(long)]
        parquet: bool,
    },
    /// Explore the monthly Arctic Oscillation index
    Ao {
        /// Comma separated year,month,value file instead of the NOAA download
        #[arg(long)]
        file: Option<PathBuf>,
        /// Months beyond +/- this value are intense
        #[arg(long, default_value_t = 3.0)]
        threshold: f64,
        /// Rolling window in months
        #[arg(long, default_value_t = 12)]
        window: usize,
        /// Label rolling values by the middle of their window
        #[arg(long)]
        center: bool,
        /// Also save the derived series as parquet
        #[arg(long)]
        parquet: bool,
    },
    /// Replay the whole exploration session
    Explore {},
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Style for a download of known size.
pub fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

// -- Tests -------------------------------------------------------------------
