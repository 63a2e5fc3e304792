//! Explore the monthly Arctic Oscillation index: slices, intense months,
//! resampled statistics and rolling windows, each drawn as a figure.

use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    config::Config,
    constants::WIDE_PLOT_SIZE,
    display::render_series,
    download::{fetch_cached, file_name_from_url},
    error::{PlotError, SeriesError},
    parquet,
    plot::{Chart, Figure, LineStyle},
    reading::{ao::monthly_series, load_delimited, read_records, AoReading},
    series::{Aggregation, Frame, Frequency, Rule, TimeSeries},
};

use super::make_parquet_file_name;

const TITLE: &str = "Arctic Oscillation";

/// Every series derived from the index, ready to plot.
#[derive(Debug, Clone)]
pub struct AoAnalysis {
    pub series: TimeSeries,
    pub last_30_years: TimeSeries,
    pub recent: TimeSeries,
    pub intense_negative: TimeSeries,
    pub intense_positive: TimeSeries,
    pub annual_mean: TimeSeries,
    pub annual_median: TimeSeries,
    pub max_3yr: TimeSeries,
    pub min_3yr: TimeSeries,
    /// Mean, min and max per three years, 1900 to 2020.
    pub stats_3yr: Frame,
    pub rolling_mean: TimeSeries,
    pub rolling_var: TimeSeries,
}

impl AoAnalysis {
    /// With `center`, rolling values are labelled by the middle of their
    /// window instead of its end.
    pub fn compute(
        series: TimeSeries,
        threshold: f64,
        window: usize,
        center: bool,
    ) -> Result<Self, SeriesError> {
        let annual = Rule::new(Frequency::Year, 1);
        let three_years = Rule::new(Frequency::Year, 3);
        let rolling = series.rolling(window).center(center);

        Ok(AoAnalysis {
            last_30_years: series.slice_years(1990, 2022),
            recent: series.slice_years(2021, 2022),
            intense_negative: series.filter(|v| v < -threshold),
            intense_positive: series.filter(|v| v > threshold),
            annual_mean: series.resample(&annual, Aggregation::Mean),
            annual_median: series.resample(&annual, Aggregation::Median),
            max_3yr: series.resample(&three_years, Aggregation::Max),
            min_3yr: series.resample(&three_years, Aggregation::Min),
            stats_3yr: series
                .resample_many(
                    &three_years,
                    &[Aggregation::Mean, Aggregation::Min, Aggregation::Max],
                )
                .slice_years(1900, 2020),
            rolling_mean: rolling.mean()?.renamed(format!("{}-month rolling mean", window)),
            rolling_var: rolling.var()?,
            series,
        })
    }

    /// Figures in the order they are drawn.
    pub fn charts(&self) -> Result<Vec<Chart>, PlotError> {
        let titled = |suffix: &str| format!("{} - {}", TITLE, suffix);
        let line = |suffix: &str, series: &TimeSeries, style: LineStyle| {
            Chart::Lines(Figure::new(titled(suffix)).line(series.clone(), style))
        };
        let plain = LineStyle::default();
        let green: LineStyle = "-g".parse()?;

        Ok(vec![
            Chart::Lines(Figure::new(TITLE).line(self.series.clone(), plain)),
            line("last 30 yrs", &self.last_30_years, plain),
            line("recently", &self.recent, plain),
            Chart::Bars {
                title: titled("Intense Negative Months"),
                series: self.intense_negative.clone(),
            },
            Chart::Bars {
                title: titled("Intense Positive Months"),
                series: self.intense_positive.clone(),
            },
            line("Annual Mean", &self.annual_mean, "r--".parse()?),
            line("Annual Median", &self.annual_median, plain),
            line("3yr Max Values", &self.max_3yr, plain),
            line("3yr Min Values", &self.min_3yr, plain),
            Chart::Subplots {
                title: titled("Descriptive Stats"),
                frame: self.stats_3yr.clone(),
            },
            Chart::Lines(Figure::overlay(titled("Descriptive Stats"), &self.stats_3yr)),
            line("Rolling Annual Mean", &self.rolling_mean, green),
            line("Rolling Annual Variance", &self.rolling_var, green),
            Chart::Lines(
                Figure::new(format!("{} NOAA - Historical Record", TITLE))
                    .size(WIDE_PLOT_SIZE)
                    .y_label("Arctic Oscillation Index")
                    .line(self.series.clone(), "y-".parse()?)
                    .line(self.rolling_mean.clone(), "b--".parse()?),
            ),
        ])
    }

    /// Renders every figure into `dir`. Figures without data are skipped.
    pub fn render(&self, dir: &Path) -> Result<Vec<PathBuf>, PlotError> {
        let mut written = Vec::new();

        for chart in self.charts()? {
            match chart.render(dir) {
                Ok(path) => {
                    info!("Saved `{}` to {}", chart.title(), path.display());
                    written.push(path);
                }
                Err(PlotError::EmptySeries(title)) => warn!("Skipping `{}`: no data", title),
                Err(e) => return Err(e),
            }
        }

        Ok(written)
    }

    /// Mean, extremes with their months, and the summary table.
    pub fn report(&self) -> String {
        let mut out = String::new();

        if let Some(mean) = self.series.mean() {
            let _ = writeln!(out, "{} mean: {:.6}", self.series.name(), mean);
        }
        if let Some((date, min)) = self.series.min() {
            let _ = writeln!(
                out,
                "{} min: {:.6} ({})",
                self.series.name(),
                min,
                date.format("%B %Y")
            );
        }
        if let Some((date, max)) = self.series.max() {
            let _ = writeln!(
                out,
                "{} max: {:.6} ({})",
                self.series.name(),
                max,
                date.format("%B %Y")
            );
        }
        if let Some(summary) = self.series.describe() {
            let _ = write!(out, "{}", summary);
        }

        out
    }
}

pub async fn ao(
    config: &Config,
    file: Option<&Path>,
    threshold: f64,
    window: usize,
    center: bool,
    save: bool,
) -> Result<Vec<PathBuf>> {
    let series = load_ao(config, file).await?;
    println!("{}\n", render_series(&series, config.max_rows));

    let analysis = AoAnalysis::compute(series, threshold, window, center)?;
    if analysis.stats_3yr.is_empty() {
        warn!("No three-year statistics between 1900 and 2020");
    } else {
        info!(
            "{} three-year bins of {} between 1900 and 2020",
            analysis.stats_3yr.len(),
            analysis.stats_3yr.column_names().join(", ")
        );
    }
    println!("{}\n", analysis.report());

    let mut written = analysis
        .render(&config.output_dir)
        .context("Failed to draw the Arctic Oscillation figures")?;

    if save {
        let file_name = make_parquet_file_name(config, "ao-monthly")?;
        parquet::save_series(&analysis.series, &file_name)?;
        written.push(file_name);

        let file_name = make_parquet_file_name(config, "ao-annual-mean")?;
        parquet::save_series(&analysis.annual_mean, &file_name)?;
        written.push(file_name);

        let file_name = make_parquet_file_name(config, "ao-3yr-stats")?;
        parquet::save_frame(&analysis.stats_3yr, &file_name)?;
        written.push(file_name);
    }

    Ok(written)
}

/// Reads the index from `file` when given, otherwise from the cached NOAA
/// download.
pub async fn load_ao(config: &Config, file: Option<&Path>) -> Result<TimeSeries> {
    let readings = match file {
        Some(path) => load_delimited(path)
            .with_context(|| format!("Failed to load `{}`", path.display()))?,
        None => {
            let url = &config.ao_url;
            let file_path = fetch_cached(config, url, file_name_from_url(url)).await?;
            read_records::<AoReading>(&file_path)
                .with_context(|| format!("Failed to parse `{}`", file_path.display()))?
        }
    };
    info!("Loaded {} monthly AO values", readings.len());

    Ok(monthly_series("AO", &readings)?)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::series::tests::{date, monthly};

    /// 1989 to 2020 with one intense month each way.
    fn index() -> TimeSeries {
        let mut values: Vec<f64> = (0..32 * 12).map(|i| ((i % 7) as f64 - 3.0) / 2.0).collect();
        values[12] = -4.2;
        values[30] = 3.6;
        monthly(1989, &values)
    }

    #[test]
    fn should_find_intense_months() {
        let analysis = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();

        assert_eq!(analysis.intense_negative.points(), &[(date(1990, 1, 31), -4.2)]);
        assert_eq!(analysis.intense_positive.points(), &[(date(1991, 7, 31), 3.6)]);
    }

    #[test]
    fn should_slice_and_resample() {
        let analysis = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();

        assert_eq!(analysis.last_30_years.first_date(), Some(date(1990, 1, 31)));
        assert!(analysis.recent.is_empty());
        assert_eq!(analysis.annual_mean.len(), 32);
        assert_eq!(analysis.annual_mean.first_date(), Some(date(1989, 12, 31)));
        // 1989 alone, then 1990 to 1992
        assert_eq!(
            analysis.max_3yr.first_date(),
            Some(date(1989, 12, 31))
        );
        assert_eq!(analysis.max_3yr.points()[1], (date(1992, 12, 31), 3.6));
        assert_eq!(analysis.min_3yr.points()[1], (date(1992, 12, 31), -4.2));
        assert_eq!(analysis.stats_3yr.index()[1], date(1992, 12, 31));
        assert_eq!(analysis.stats_3yr.column_names(), vec!["mean", "min", "max"]);
        assert_eq!(analysis.rolling_mean.len(), 32 * 12 - 11);
        assert_eq!(analysis.rolling_var.first_date(), Some(date(1989, 12, 31)));
    }

    #[test]
    fn should_order_figures() {
        let analysis = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();
        let charts = analysis.charts().unwrap();
        let titles: Vec<&str> = charts.iter().map(|c| c.title()).collect();

        assert_eq!(
            titles,
            vec![
                "Arctic Oscillation",
                "Arctic Oscillation - last 30 yrs",
                "Arctic Oscillation - recently",
                "Arctic Oscillation - Intense Negative Months",
                "Arctic Oscillation - Intense Positive Months",
                "Arctic Oscillation - Annual Mean",
                "Arctic Oscillation - Annual Median",
                "Arctic Oscillation - 3yr Max Values",
                "Arctic Oscillation - 3yr Min Values",
                "Arctic Oscillation - Descriptive Stats",
                "Arctic Oscillation - Descriptive Stats",
                "Arctic Oscillation - Rolling Annual Mean",
                "Arctic Oscillation - Rolling Annual Variance",
                "Arctic Oscillation NOAA - Historical Record",
            ]
        );

        match charts.last() {
            Some(Chart::Lines(figure)) => assert_eq!(
                figure.file_name(),
                "arctic-oscillation-noaa-historical-record.svg"
            ),
            _ => panic!("expected a line figure"),
        }
    }

    #[test]
    fn should_report_minimum_month() {
        let analysis = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();
        let report = analysis.report();

        assert!(report.contains("AO min: -4.200000 (January 1990)"));
        assert!(report.contains("AO max: 3.600000 (July 1991)"));
        assert!(report.contains("count"));
    }

    #[test]
    fn should_centre_rolling_windows() {
        let trailing = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();
        let centred = AoAnalysis::compute(index(), 3.0, 12, true).unwrap();

        assert_eq!(centred.rolling_mean.values(), trailing.rolling_mean.values());
        assert_eq!(centred.rolling_mean.first_date(), Some(date(1989, 7, 31)));
    }

    #[test]
    fn should_render_all_figures() {
        let dir = TempDir::new().unwrap();
        // 1950 to 2022, as published
        let mut values: Vec<f64> = (0..73 * 12).map(|i| ((i % 11) as f64 - 5.0) / 2.0).collect();
        values[721] = -5.3;
        values[100] = 3.4;
        let analysis = AoAnalysis::compute(monthly(1950, &values), 3.0, 12, false).unwrap();

        let written = analysis.render(dir.path()).unwrap();

        assert_eq!(written.len(), 14);
        assert!(written.contains(&dir.path().join("arctic-oscillation-recently.svg")));
        assert!(written.contains(&dir.path().join("arctic-oscillation-descriptive-stats.svg")));
        assert!(written.contains(
            &dir.path().join("arctic-oscillation-descriptive-stats-subplots.svg")
        ));
        for path in &written {
            assert!(fs::metadata(path).unwrap().len() > 0);
        }
    }

    #[test]
    fn should_skip_figures_without_data() {
        let dir = TempDir::new().unwrap();
        let analysis = AoAnalysis::compute(index(), 3.0, 12, false).unwrap();

        let written = analysis.render(dir.path()).unwrap();

        assert_eq!(written.len(), 13);
        assert!(!dir.path().join("arctic-oscillation-recently.svg").exists());
    }

    #[test]
    fn should_reject_zero_window() {
        assert!(AoAnalysis::compute(index(), 3.0, 0, false).is_err());
    }

    #[tokio::test]
    async fn should_load_local_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ao.csv");
        fs::write(&path, "1950,1,-0.06031\n1950,2,0.6268\n\n1950,3,-0.008\n").unwrap();
        let config = Config::with_dirs(dir.path().to_path_buf(), dir.path().join("out"));

        let series = load_ao(&config, Some(&path)).await.unwrap();

        assert_eq!(series.name(), "AO");
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(date(1950, 1, 31)));
    }

    #[tokio::test]
    async fn should_load_cached_download() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_dirs(dir.path().to_path_buf(), dir.path().join("out"));
        config.ao_url = "http://127.0.0.1:9/monthly.ao.index.b50.current.ascii".to_string();
        fs::write(
            dir.path().join("monthly.ao.index.b50.current.ascii"),
            " 1950    1  -0.60310E-01\n 1950    2   0.62681E+00\n",
        )
        .unwrap();

        let series = load_ao(&config, None).await.unwrap();

        assert_eq!(series.values(), vec![-0.06031, 0.62681]);
    }
}
