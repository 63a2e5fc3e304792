//! Several value columns sharing one date index.

use chrono::NaiveDate;

use crate::series::{calendar, TimeSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// `None` where the value is undefined for that row.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    name: String,
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Frame {
    /// Columns must match the index in length and the index must be ordered,
    /// which holds for frames built from a resampled series.
    pub(crate) fn new(
        name: impl Into<String>,
        index: Vec<NaiveDate>,
        columns: Vec<Column>,
    ) -> Self {
        Frame {
            name: name.into(),
            index,
            columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rows from the first day of `from` to the last day of `to`.
    pub fn slice_years(&self, from: i32, to: i32) -> Frame {
        let (Some(start), Some(end)) = (calendar::year_start(from), calendar::year_end(to)) else {
            return Frame::new(self.name.clone(), Vec::new(), Vec::new());
        };
        let lo = self.index.partition_point(|d| *d < start);
        let hi = self.index.partition_point(|d| *d <= end).max(lo);

        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c.values[lo..hi].to_vec(),
            })
            .collect();

        Frame::new(self.name.clone(), self.index[lo..hi].to_vec(), columns)
    }

    /// Every column as a series, in column order, undefined rows left out.
    pub fn to_series(&self) -> Vec<TimeSeries> {
        self.columns.iter().map(|c| self.column_series(c)).collect()
    }

    fn column_series(&self, column: &Column) -> TimeSeries {
        let points = self
            .index
            .iter()
            .zip(&column.values)
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
            .collect();

        TimeSeries::derived(column.name.clone(), points)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::date;

    fn frame() -> Frame {
        Frame::new(
            "AO",
            vec![date(1952, 12, 31), date(1955, 12, 31), date(1958, 12, 31)],
            vec![
                Column {
                    name: "mean".to_string(),
                    values: vec![Some(0.1), Some(-0.2), Some(0.3)],
                },
                Column {
                    name: "std".to_string(),
                    values: vec![Some(1.0), None, Some(0.5)],
                },
            ],
        )
    }

    #[test]
    fn should_slice_rows_by_year() {
        let sliced = frame().slice_years(1953, 1958);

        assert_eq!(sliced.index(), &[date(1955, 12, 31), date(1958, 12, 31)]);
        assert_eq!(sliced.len(), 2);
        assert_eq!(sliced.columns()[1].values, vec![None, Some(0.5)]);
        assert!(frame().slice_years(1900, 1950).is_empty());
    }

    #[test]
    fn should_drop_undefined_rows_from_column_series() {
        let series = frame().to_series();

        assert_eq!(series.len(), 2);
        assert_eq!(series[1].name(), "std");
        assert_eq!(
            series[1].points(),
            &[(date(1952, 12, 31), 1.0), (date(1958, 12, 31), 0.5)]
        );
        assert_eq!(frame().column_names(), vec!["mean", "std"]);
    }
}
