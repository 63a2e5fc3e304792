//! Renders series to SVG figures.

use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{Duration, NaiveDate};
use log::debug;
use plotters::{coord::Shift, prelude::*, series::DashedLineSeries};

use crate::{
    constants::DEFAULT_PLOT_SIZE,
    error::PlotError,
    series::{Frame, TimeSeries},
};

const CAPTION_FONT: (&str, i32) = ("sans-serif", 20);

// matplotlib's default colour cycle
const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    Solid,
    Dashed,
    Dotted,
}

/// Colour and dash pattern of a line, parsed from short format strings such
/// as `r--`, `-g` or `y-`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub pattern: LinePattern,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: PALETTE[0],
            pattern: LinePattern::Solid,
        }
    }
}

impl LineStyle {
    pub fn with_color(color: RGBColor) -> Self {
        LineStyle {
            color,
            ..LineStyle::default()
        }
    }
}

impl FromStr for LineStyle {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut style = LineStyle::default();
        let mut rest = s.trim();

        while let Some(c) = rest.chars().next() {
            let (pattern, consumed) = match rest {
                r if r.starts_with("--") || r.starts_with("-.") => (Some(LinePattern::Dashed), 2),
                r if r.starts_with('-') => (Some(LinePattern::Solid), 1),
                r if r.starts_with(':') => (Some(LinePattern::Dotted), 1),
                _ => (None, c.len_utf8()),
            };

            match pattern {
                Some(p) => style.pattern = p,
                None => {
                    style.color = match c {
                        'b' => RGBColor(0, 0, 255),
                        'g' => RGBColor(0, 128, 0),
                        'r' => RGBColor(255, 0, 0),
                        'c' => RGBColor(0, 191, 191),
                        'm' => RGBColor(191, 0, 191),
                        'y' => RGBColor(191, 191, 0),
                        'k' => RGBColor(0, 0, 0),
                        'w' => RGBColor(255, 255, 255),
                        _ => return Err(PlotError::InvalidStyle(s.to_string())),
                    }
                }
            }
            rest = &rest[consumed..];
        }

        Ok(style)
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub series: TimeSeries,
    pub style: LineStyle,
}

/// A line chart of one or more series sharing a date axis.
#[derive(Debug, Clone)]
pub struct Figure {
    title: String,
    size: (u32, u32),
    y_label: Option<String>,
    layers: Vec<Layer>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Figure {
            title: title.into(),
            size: DEFAULT_PLOT_SIZE,
            y_label: None,
            layers: Vec::new(),
        }
    }

    /// Every column of `frame` in one panel, coloured from the default cycle.
    pub fn overlay(title: impl Into<String>, frame: &Frame) -> Self {
        frame
            .to_series()
            .into_iter()
            .zip(PALETTE.iter().cycle())
            .fold(Figure::new(title), |figure, (series, color)| {
                figure.line(series, LineStyle::with_color(*color))
            })
    }

    pub fn size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn line(mut self, series: TimeSeries, style: LineStyle) -> Self {
        self.layers.push(Layer { series, style });
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn file_name(&self) -> String {
        format!("{}.svg", slugify(&self.title))
    }

    /// Writes the figure into `dir`, returning the file path.
    pub fn render(&self, dir: &Path) -> Result<PathBuf, PlotError> {
        if self.layers.is_empty() || self.layers.iter().any(|l| l.series.is_empty()) {
            return Err(PlotError::EmptySeries(self.title.clone()));
        }
        let path = output_path(dir, &self.file_name())?;
        debug!("Rendering `{}` to {}", self.title, path.display());

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(|e| draw_err(&self.title, e))?;
            draw_lines(&root, &self.title, self.y_label.as_deref(), &self.layers)?;
            root.present().map_err(|e| draw_err(&self.title, e))?;
        }

        Ok(path)
    }
}

/// Horizontal bar chart with one bar per point, labelled by date.
pub fn render_barh(dir: &Path, title: &str, series: &TimeSeries) -> Result<PathBuf, PlotError> {
    if series.is_empty() {
        return Err(PlotError::EmptySeries(title.to_string()));
    }
    let path = output_path(dir, &format!("{}.svg", slugify(title)))?;

    let labels: Vec<String> = series
        .points()
        .iter()
        .map(|(d, _)| d.format("%Y-%m-%d").to_string())
        .collect();
    let count = labels.len();
    let values = series.values();
    let x_range = value_range(values.iter().copied().chain([0.0]))
        .ok_or_else(|| PlotError::EmptySeries(title.to_string()))?;

    {
        let root = SVGBackend::new(&path, DEFAULT_PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_err(title, e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, CAPTION_FONT)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range, (0..count).into_segmented())
            .map_err(|e| draw_err(title, e))?;

        let format_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(count)
            .y_label_formatter(&format_label)
            .draw()
            .map_err(|e| draw_err(title, e))?;

        let color = PALETTE[0];
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(i)), (*v, SegmentValue::Exact(i + 1))],
                    color.filled(),
                );
                bar.set_margin(2, 2, 0, 0);
                bar
            }))
            .map_err(|e| draw_err(title, e))?;

        root.present().map_err(|e| draw_err(title, e))?;
    }

    Ok(path)
}

/// One stacked panel per frame column under a shared title.
pub fn render_subplots(dir: &Path, title: &str, frame: &Frame) -> Result<PathBuf, PlotError> {
    let columns = frame.to_series();
    if columns.is_empty() || columns.iter().any(|c| c.is_empty()) {
        return Err(PlotError::EmptySeries(title.to_string()));
    }
    let path = output_path(dir, &format!("{}-subplots.svg", slugify(title)))?;

    {
        let (width, height) = DEFAULT_PLOT_SIZE;
        let root = SVGBackend::new(&path, (width, height.max(200 * columns.len() as u32)))
            .into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_err(title, e))?;
        let root = root
            .titled(title, CAPTION_FONT)
            .map_err(|e| draw_err(title, e))?;

        let panels = root.split_evenly((columns.len(), 1));
        for ((panel, series), color) in panels.iter().zip(columns).zip(PALETTE.iter().cycle()) {
            let name = format!("{} {}", frame.name(), series.name());
            let layer = Layer {
                series,
                style: LineStyle::with_color(*color),
            };
            draw_lines(panel, &name, None, &[layer])?;
        }

        root.present().map_err(|e| draw_err(title, e))?;
    }

    Ok(path)
}

/// Any of the figure kinds, so a batch of them can be rendered in order.
#[derive(Debug, Clone)]
pub enum Chart {
    Lines(Figure),
    Bars { title: String, series: TimeSeries },
    Subplots { title: String, frame: Frame },
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Lines(figure) => figure.title(),
            Chart::Bars { title, .. } | Chart::Subplots { title, .. } => title.as_str(),
        }
    }

    pub fn render(&self, dir: &Path) -> Result<PathBuf, PlotError> {
        match self {
            Chart::Lines(figure) => figure.render(dir),
            Chart::Bars { title, series } => render_barh(dir, title, series),
            Chart::Subplots { title, frame } => render_subplots(dir, title, frame),
        }
    }
}

fn draw_lines(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    title: &str,
    y_label: Option<&str>,
    layers: &[Layer],
) -> Result<(), PlotError> {
    let dates = date_range(layers).ok_or_else(|| PlotError::EmptySeries(title.to_string()))?;
    let values = value_range(
        layers
            .iter()
            .flat_map(|l| l.series.points().iter().map(|(_, v)| *v)),
    )
    .ok_or_else(|| PlotError::EmptySeries(title.to_string()))?;

    let date_format = if (dates.end - dates.start).num_days() > 3 * 365 {
        "%Y"
    } else {
        "%Y-%m"
    };
    let x_range: RangedDate<NaiveDate> = dates.into();

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, values)
        .map_err(|e| draw_err(title, e))?;

    let format_date = |d: &NaiveDate| d.format(date_format).to_string();
    {
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(8).x_label_formatter(&format_date).y_labels(8);
        if let Some(label) = y_label {
            mesh.y_desc(label);
        }
        mesh.draw().map_err(|e| draw_err(title, e))?;
    }

    for layer in layers {
        let color = layer.style.color;
        let points = layer.series.points().to_vec();
        let style = color.stroke_width(1);

        let annotation = match layer.style.pattern {
            LinePattern::Solid => chart.draw_series(LineSeries::new(points, style)),
            LinePattern::Dashed => chart.draw_series(DashedLineSeries::new(points, 6, 4, style)),
            LinePattern::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 3, style)),
        }
        .map_err(|e| draw_err(title, e))?;

        annotation
            .label(layer.series.name().to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if layers.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_err(title, e))?;
    }

    Ok(())
}

fn output_path(dir: &Path, file_name: &str) -> Result<PathBuf, PlotError> {
    fs::create_dir_all(dir).map_err(|e| PlotError::OutputDir(dir.to_path_buf(), e))?;
    Ok(dir.join(file_name))
}

fn draw_err(title: &str, e: impl std::fmt::Display) -> PlotError {
    PlotError::Draw {
        title: title.to_string(),
        message: e.to_string(),
    }
}

/// Earliest to latest date over all layers, widened by a day when they
/// coincide.
fn date_range(layers: &[Layer]) -> Option<Range<NaiveDate>> {
    let start = layers.iter().filter_map(|l| l.series.first_date()).min()?;
    let end = layers.iter().filter_map(|l| l.series.last_date()).max()?;

    if start == end {
        Some(start..end + Duration::days(1))
    } else {
        Some(start..end)
    }
}

/// Value extent padded by 5% on each side.
fn value_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (lo, hi) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    if lo == hi {
        return Some(lo - 1.0..hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    Some(lo - pad..hi + pad)
}

/// Lower-case file stem made of alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::series::{
        tests::{date, monthly},
        Aggregation,
    };

    #[test]
    fn should_parse_format_strings() {
        let red_dashed: LineStyle = "r--".parse().unwrap();
        assert_eq!(red_dashed.color, RGBColor(255, 0, 0));
        assert_eq!(red_dashed.pattern, LinePattern::Dashed);

        let green: LineStyle = "-g".parse().unwrap();
        assert_eq!(green.color, RGBColor(0, 128, 0));
        assert_eq!(green.pattern, LinePattern::Solid);

        let blue_dashed: LineStyle = "b--".parse().unwrap();
        assert_eq!(blue_dashed.color, RGBColor(0, 0, 255));

        let dotted: LineStyle = ":".parse().unwrap();
        assert_eq!(dotted.color, PALETTE[0]);
        assert_eq!(dotted.pattern, LinePattern::Dotted);
    }

    #[test]
    fn should_reject_unknown_format_character() {
        assert!(matches!(
            "q-".parse::<LineStyle>(),
            Err(PlotError::InvalidStyle(_))
        ));
    }

    #[test]
    fn should_slugify_titles() {
        assert_eq!(
            slugify("Arctic Oscillation - last 30 yrs"),
            "arctic-oscillation-last-30-yrs"
        );
        assert_eq!(
            slugify("Annual precipitation in Southwestern Texas"),
            "annual-precipitation-in-southwestern-texas"
        );
    }

    #[test]
    fn should_pad_value_range() {
        let range = value_range([-2.0, 2.0].into_iter()).unwrap();
        assert!((range.start + 2.2).abs() < 1e-12);
        assert!((range.end - 2.2).abs() < 1e-12);

        let flat = value_range([3.0].into_iter()).unwrap();
        assert_eq!(flat, 2.0..4.0);

        assert!(value_range(std::iter::empty()).is_none());
    }

    #[test]
    fn should_span_all_layers() {
        let figure = Figure::new("x")
            .line(monthly(2000, &[1.0, 2.0]), LineStyle::default())
            .line(monthly(1999, &[1.0]), LineStyle::default());

        assert_eq!(
            date_range(&figure.layers),
            Some(date(1999, 1, 31)..date(2000, 2, 29))
        );

        let single = Figure::new("y").line(monthly(2000, &[1.0]), LineStyle::default());
        assert_eq!(
            date_range(&single.layers),
            Some(date(2000, 1, 31)..date(2000, 2, 1))
        );
    }

    #[test]
    fn should_refuse_empty_figures() {
        let dir = TempDir::new().unwrap();
        let figure = Figure::new("Arctic Oscillation - recently")
            .line(TimeSeries::default(), LineStyle::default());

        assert!(matches!(
            figure.render(dir.path()),
            Err(PlotError::EmptySeries(_))
        ));
        assert!(matches!(
            render_barh(dir.path(), "none", &TimeSeries::default()),
            Err(PlotError::EmptySeries(_))
        ));
        assert!(matches!(
            render_subplots(dir.path(), "none", &Frame::default()),
            Err(PlotError::EmptySeries(_))
        ));
    }

    fn assert_svg(path: &Path) {
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.len() > 100);
    }

    #[test]
    fn should_render_line_figure() {
        let dir = TempDir::new().unwrap();
        let series = monthly(1950, &[-0.06, 0.63, -0.01, -1.2, 0.4]);
        let figure = Figure::new("Arctic Oscillation NOAA - Historical Record")
            .size((1200, 500))
            .y_label("Arctic Oscillation Index")
            .line(series.clone(), "y-".parse().unwrap())
            .line(series.rolling(2).mean().unwrap(), "b--".parse().unwrap());

        let path = figure.render(dir.path()).unwrap();

        assert_eq!(
            path,
            dir.path().join("arctic-oscillation-noaa-historical-record.svg")
        );
        assert_svg(&path);
    }

    #[test]
    fn should_render_every_chart_kind() {
        let dir = TempDir::new().unwrap();
        let values: Vec<f64> = (0..48).map(|i| (i % 9) as f64 - 4.0).collect();
        let series = monthly(1950, &values);
        let frame = series.resample_many(
            &"3A".parse().unwrap(),
            &[Aggregation::Mean, Aggregation::Min, Aggregation::Max],
        );

        let charts = vec![
            Chart::Lines(Figure::new("Dotted").line(series.clone(), ":".parse().unwrap())),
            Chart::Bars {
                title: "Intense Negative Months".to_string(),
                series: series.filter(|v| v < -3.0),
            },
            Chart::Subplots {
                title: "Descriptive Stats".to_string(),
                frame: frame.clone(),
            },
            Chart::Lines(Figure::overlay("Descriptive Stats", &frame)),
        ];

        let paths: Vec<PathBuf> = charts
            .iter()
            .map(|c| c.render(dir.path()).unwrap())
            .collect();

        assert_eq!(
            paths,
            vec![
                dir.path().join("dotted.svg"),
                dir.path().join("intense-negative-months.svg"),
                dir.path().join("descriptive-stats-subplots.svg"),
                dir.path().join("descriptive-stats.svg"),
            ]
        );
        paths.iter().for_each(|p| assert_svg(p));
    }

    #[test]
    fn should_name_file_after_title() {
        let figure = Figure::new("Arctic Oscillation - Annual Mean").size((1200, 500));

        assert_eq!(figure.file_name(), "arctic-oscillation-annual-mean.svg");
    }
}
