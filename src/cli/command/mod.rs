pub mod ao;
pub mod daily;
pub mod explore;
pub mod stations;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};

use crate::config::Config;

pub use ao::ao;
pub use daily::{daily, DailyRequest};
pub use explore::explore;
pub use stations::stations;

/// Dated parquet file name in the output directory, which is created if
/// needed.
pub fn make_parquet_file_name(config: &Config, dataset: &str) -> Result<PathBuf> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory `{}`",
            config.output_dir.display()
        )
    })?;

    let today = Local::now();
    let file_name = format!(
        "{}-{}-{:02}-{:02}.parquet",
        dataset.to_lowercase(),
        today.year(),
        today.month(),
        today.day()
    );

    Ok(config.output_dir.join(file_name))
}

// -- Tests -------------------------------------------------------------------
