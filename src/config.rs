//! Runtime settings resolved from the command line and environment.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::constants::{
    AO_URL, APP_DIR, DAILY_URL_ROOT, DEFAULT_MAX_ROWS, DEFAULT_OUTPUT_DIR, STATIONS_URL,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_rows: usize,
    pub refresh: bool,
    pub stations_url: String,
    pub daily_url_root: String,
    pub ao_url: String,
}

impl Config {
    pub fn new(
        cache_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        max_rows: usize,
        refresh: bool,
    ) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Config {
            cache_dir,
            output_dir,
            max_rows,
            refresh,
            ..Config::with_dirs(PathBuf::new(), PathBuf::new())
        })
    }

    /// Config with default sources rooted at the given directories.
    pub fn with_dirs(cache_dir: PathBuf, output_dir: PathBuf) -> Self {
        Config {
            cache_dir,
            output_dir,
            max_rows: DEFAULT_MAX_ROWS,
            refresh: false,
            stations_url: STATIONS_URL.to_string(),
            daily_url_root: DAILY_URL_ROOT.to_string(),
            ao_url: AO_URL.to_string(),
        }
    }

    pub fn daily_url(&self, station_id: &str) -> String {
        format!(
            "{}/{}.dly",
            self.daily_url_root.trim_end_matches('/'),
            station_id
        )
    }
}

fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| anyhow!("Could not determine a cache directory; pass --cache-dir"))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_daily_url() {
        let config = Config::with_dirs(PathBuf::from("cache"), PathBuf::from("out"));

        assert_eq!(
            config.daily_url("USC00412679"),
            "https://www.ncei.noaa.gov/pub/data/ghcn/daily/all/USC00412679.dly"
        );
    }

    #[test]
    fn should_keep_explicit_dirs() {
        let config = Config::new(
            Some(PathBuf::from("/tmp/cache")),
            Some(PathBuf::from("/tmp/out")),
            20,
            true,
        )
        .unwrap();

        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.max_rows, 20);
        assert!(config.refresh);
        assert_eq!(config.ao_url, AO_URL);
    }

    #[test]
    fn should_default_output_dir() {
        let config = Config::new(Some(PathBuf::from("c")), None, 15, false).unwrap();

        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
