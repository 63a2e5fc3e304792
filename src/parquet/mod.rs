//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod daily;
pub mod series;
pub mod stations;

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{datatypes::Schema, record_batch::RecordBatch};
use chrono::{Datelike, NaiveDate};
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, ZstdLevel},
    file::properties::WriterProperties,
};

pub use daily::save_observations;
pub use series::{save_frame, save_series};
pub use stations::save_stations;

// 1970-01-01 counted from 0001-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, as stored in `Date32` columns.
fn date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

fn write_batch(file_path: &Path, schema: Arc<Schema>, batch: &RecordBatch) -> Result<()> {
    let file = File::create(file_path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .set_dictionary_enabled(true)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_count_days_from_epoch() {
        assert_eq!(date32(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(date32(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(date32(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }
}
