//! Plain text tables for the terminal.
//!
//! Long tables keep their first and last rows around a `...` marker, so at
//! most `max_rows` rows are printed.

use std::fmt::Write;

use crate::{reading::Station, series::TimeSeries};

const STATION_HEADER: [&str; 6] = ["id", "latitude", "longitude", "elevation", "state", "name"];

/// Indices of the rows to print, `None` marking the elided middle.
fn visible_rows(len: usize, max_rows: usize) -> Vec<Option<usize>> {
    if max_rows == 0 || len <= max_rows {
        return (0..len).map(Some).collect();
    }
    let tail = max_rows / 2;
    let head = max_rows - tail;

    (0..head)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((len - tail..len).map(Some))
        .collect()
}

fn format_rows(header: &[&str], rows: &[Option<Vec<String>>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows.iter().flatten() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(out, "{}", line(&header[..]));
    for row in rows {
        match row {
            Some(cells) => {
                let _ = writeln!(out, "{}", line(cells.as_slice()));
            }
            None => {
                let _ = writeln!(out, "...");
            }
        }
    }

    out
}

/// Head and tail of a station table followed by its dimensions.
pub fn render_station_table(stations: &[Station], max_rows: usize) -> String {
    let rows: Vec<Option<Vec<String>>> = visible_rows(stations.len(), max_rows)
        .into_iter()
        .map(|idx| {
            idx.map(|i| {
                let s = &stations[i];
                vec![
                    s.id.clone(),
                    format!("{:.4}", s.latitude),
                    format!("{:.4}", s.longitude),
                    s.elevation.map_or("NaN".to_string(), |e| format!("{:.1}", e)),
                    s.state.clone().unwrap_or_default(),
                    s.name.clone(),
                ]
            })
        })
        .collect();

    let mut out = format_rows(&STATION_HEADER, &rows);
    let _ = write!(
        out,
        "\n[{} rows x {} columns]",
        stations.len(),
        STATION_HEADER.len()
    );
    out
}

/// Head and tail of a series followed by its name and length.
pub fn render_series(series: &TimeSeries, max_rows: usize) -> String {
    let points = series.points();
    let rows: Vec<Option<Vec<String>>> = visible_rows(points.len(), max_rows)
        .into_iter()
        .map(|idx| {
            idx.map(|i| {
                let (date, value) = points[i];
                vec![date.to_string(), format!("{:.4}", value)]
            })
        })
        .collect();

    let mut out = format_rows(&["date", "value"], &rows);
    let _ = write!(out, "Name: {}, Length: {}", series.name(), series.len());
    out
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::monthly;

    #[test]
    fn should_elide_middle_rows() {
        assert_eq!(visible_rows(3, 15), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(
            visible_rows(10, 5),
            vec![Some(0), Some(1), Some(2), None, Some(8), Some(9)]
        );
        assert_eq!(visible_rows(4, 0).len(), 4);
    }

    #[test]
    fn should_render_short_series_in_full() {
        let text = render_series(&monthly(1950, &[-0.06, 0.627]), 15);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "date        value");
        assert_eq!(lines[1], "1950-01-31  -0.0600");
        assert_eq!(lines[2], "1950-02-28  0.6270");
        assert_eq!(lines[3], "Name: AO, Length: 2");
    }

    #[test]
    fn should_truncate_long_series() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let text = render_series(&monthly(1950, &values), 4);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "...");
        assert!(lines[5].starts_with("1958-04-30"));
        assert_eq!(lines[6], "Name: AO, Length: 100");
    }

    #[test]
    fn should_render_station_table() {
        let stations = vec![
            Station {
                id: "USC00412679".to_string(),
                latitude: 29.2,
                longitude: -100.3,
                elevation: Some(280.0),
                state: Some("TX".to_string()),
                name: "EAGLE PASS".to_string(),
                ..Station::default()
            },
            Station {
                id: "USS0020B02S".to_string(),
                latitude: 47.0,
                longitude: -121.0,
                elevation: None,
                state: Some("WA".to_string()),
                name: "BLEWETT PASS".to_string(),
                ..Station::default()
            },
        ];

        let text = render_station_table(&stations, 15);

        assert!(text.lines().next().unwrap().starts_with("id"));
        assert!(text.contains("EAGLE PASS"));
        assert!(text.contains("NaN"));
        assert!(text.ends_with("[2 rows x 6 columns]"));
    }
}
