//! CSV batch prediction and evaluation against labelled data.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::algorithm::Algorithm;
use crate::assets::AssetStore;
use crate::error::{Result, SizeError};
use crate::measurements::Measurements;
use crate::pipeline;
use crate::stats::{self, ModelStats};

/// One input row: `weight,height,age`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRecord {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
}

/// One labelled row: `weight,height,age,size`.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelledRecord {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub size: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord<'a> {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub size: &'a str,
}

fn at_row(row: usize) -> impl Fn(SizeError) -> SizeError {
    move |source| SizeError::Row {
        row,
        source: Box::new(source),
    }
}

/// Read measurement rows, validating each. Rows are numbered from 1.
pub fn read_measurements<R: Read>(input: R) -> Result<Vec<Measurements>> {
    let mut rdr = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<MeasurementRecord>().enumerate() {
        let record = result.map_err(|e| at_row(i + 1)(e.into()))?;
        rows.push(
            Measurements::new(record.weight, record.height, record.age).map_err(at_row(i + 1))?,
        );
    }
    Ok(rows)
}

/// Predict every row of `input` and write it to `output` with a `size` column.
/// Returns the number of rows written.
pub fn predict_csv<R: Read, W: Write>(
    store: &AssetStore,
    algorithm: Algorithm,
    input: R,
    output: W,
) -> Result<usize> {
    let rows = read_measurements(input)?;
    let model = store.model(algorithm)?;
    let sizes = pipeline::predict_sizes(store.scaler(), store.encoder(), model, &rows)?;

    let mut wtr = csv::Writer::from_writer(output);
    for (m, size) in rows.iter().zip(sizes.iter().copied()) {
        wtr.serialize(PredictionRecord {
            weight: m.weight(),
            height: m.height(),
            age: m.age(),
            size,
        })?;
    }
    wtr.flush()?;
    info!(%algorithm, rows = rows.len(), "Batch prediction written");
    Ok(rows.len())
}

/// Score `algorithm` on labelled rows, producing stats in the bundle format.
pub fn evaluate_csv<R: Read>(
    store: &AssetStore,
    algorithm: Algorithm,
    input: R,
) -> Result<ModelStats> {
    let mut rdr = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    let mut truth = Vec::new();
    for (i, result) in rdr.deserialize::<LabelledRecord>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| at_row(row)(e.into()))?;
        let label = record.size.trim();
        let class = store
            .encoder()
            .transform(label)
            .ok_or_else(|| at_row(row)(SizeError::UnknownLabel(label.to_string())))?;
        rows.push(
            Measurements::new(record.weight, record.height, record.age).map_err(at_row(row))?,
        );
        truth.push(class);
    }

    let model = store.model(algorithm)?;
    let predicted = pipeline::predict_indices(store.scaler(), model, &rows)?;
    let stats = stats::evaluate(&truth, &predicted, store.encoder());
    info!(%algorithm, rows = rows.len(), accuracy = stats.accuracy, "Evaluation finished");
    Ok(stats)
}
