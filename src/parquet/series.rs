//! Save series and frames as a date column plus one float column each.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Date32Array, Float64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};

use crate::series::{Frame, TimeSeries};

use super::{date32, write_batch};

pub fn save_frame(frame: &Frame, file_path: &Path) -> Result<()> {
    let mut fields = vec![Field::new("date", DataType::Date32, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(
        frame.index().iter().map(|d| date32(*d)).collect::<Vec<_>>(),
    ))];

    for column in frame.columns() {
        fields.push(Field::new(&column.name, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(column.values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    write_batch(file_path, schema, &batch)
}

pub fn save_series(series: &TimeSeries, file_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let dates: Vec<i32> = series.points().iter().map(|(d, _)| date32(*d)).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(dates)),
        Arc::new(Float64Array::from(series.values())),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    write_batch(file_path, schema, &batch)
}

// -- Tests -------------------------------------------------------------------
