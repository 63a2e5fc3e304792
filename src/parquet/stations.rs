//! Save the station inventory to a parquet file.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};

use crate::reading::Station;

use super::write_batch;

pub fn save_stations(stations: &[Station], file_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("latitude", DataType::Float32, false),
        Field::new("longitude", DataType::Float32, false),
        Field::new("elevation", DataType::Float32, true),
        Field::new("state", DataType::Utf8, true),
        Field::new("name", DataType::Utf8, false),
        Field::new("gsn_flag", DataType::Utf8, true),
        Field::new("hcn_crn_flag", DataType::Utf8, true),
        Field::new("wmo_id", DataType::Utf8, true),
    ]));

    let num_rows = stations.len();

    let mut ids = Vec::with_capacity(num_rows);
    let mut countries = Vec::with_capacity(num_rows);
    let mut latitudes = Vec::with_capacity(num_rows);
    let mut longitudes = Vec::with_capacity(num_rows);
    let mut elevations = Vec::with_capacity(num_rows);
    let mut states = Vec::with_capacity(num_rows);
    let mut names = Vec::with_capacity(num_rows);
    let mut gsn_flags = Vec::with_capacity(num_rows);
    let mut hcn_crn_flags = Vec::with_capacity(num_rows);
    let mut wmo_ids = Vec::with_capacity(num_rows);

    for s in stations {
        ids.push(s.id.clone());
        countries.push(s.country().to_string());
        latitudes.push(s.latitude);
        longitudes.push(s.longitude);
        elevations.push(s.elevation);
        states.push(s.state.clone());
        names.push(s.name.clone());
        gsn_flags.push(s.gsn_flag.clone());
        hcn_crn_flags.push(s.hcn_crn_flag.clone());
        wmo_ids.push(s.wmo_id.clone());
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(StringArray::from(countries)),
        Arc::new(Float32Array::from(latitudes)),
        Arc::new(Float32Array::from(longitudes)),
        Arc::new(Float32Array::from(elevations)),
        Arc::new(StringArray::from(states)),
        Arc::new(StringArray::from(names)),
        Arc::new(StringArray::from(gsn_flags)),
        Arc::new(StringArray::from(hcn_crn_flags)),
        Arc::new(StringArray::from(wmo_ids)),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    write_batch(file_path, schema, &batch)
}

// -- Tests -------------------------------------------------------------------
