//! Save a station's daily observations to a parquet file in long format.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};

use crate::reading::StationObservations;

use super::{date32, write_batch};

pub fn save_observations(observations: &StationObservations, file_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("element", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
        Field::new("mflag", DataType::Utf8, true),
        Field::new("qflag", DataType::Utf8, true),
        Field::new("sflag", DataType::Utf8, true),
    ]));

    let rows: usize = observations.elements.values().map(Vec::len).sum();

    let mut id_builder = StringBuilder::with_capacity(rows, rows * 11);
    let mut date_builder = Date32Builder::with_capacity(rows);
    let mut element_builder = StringBuilder::with_capacity(rows, rows * 4);
    let mut value_builder = Float64Builder::with_capacity(rows);
    let mut mflag_builder = StringBuilder::with_capacity(rows, rows);
    let mut qflag_builder = StringBuilder::with_capacity(rows, rows);
    let mut sflag_builder = StringBuilder::with_capacity(rows, rows);

    for (element, values) in &observations.elements {
        let element_str = element.to_string();

        for o in values {
            id_builder.append_value(&observations.id);
            date_builder.append_value(date32(o.date));
            element_builder.append_value(&element_str);
            value_builder.append_value(o.value);
            mflag_builder.append_option(o.mflag.map(String::from));
            qflag_builder.append_option(o.qflag.map(String::from));
            sflag_builder.append_option(o.sflag.map(String::from));
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(id_builder.finish()),
        Arc::new(date_builder.finish()),
        Arc::new(element_builder.finish()),
        Arc::new(value_builder.finish()),
        Arc::new(mflag_builder.finish()),
        Arc::new(qflag_builder.finish()),
        Arc::new(sflag_builder.finish()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    write_batch(file_path, schema, &batch)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs::File;

    use arrow::array::{Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::reading::{DailyReading, Record};

    #[test]
    fn should_write_one_row_per_observation() {
        let line = "USC00412679199001PRCP   25  7  113 G7-9999   ";
        let readings = vec![DailyReading::from_line(line).unwrap()];
        let observations = StationObservations::from_readings("USC00412679", readings);
        let file = NamedTempFile::new().unwrap();

        save_observations(&observations, file.path()).unwrap();

        let mut reader = ParquetRecordBatchReaderBuilder::try_new(File::open(file.path()).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let batch = reader.next().unwrap().unwrap();

        assert_eq!(batch.num_rows(), 2);
        let qflags = batch
            .column(5)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert!(qflags.is_null(0));
        assert_eq!(qflags.value(1), "G");
    }
}
