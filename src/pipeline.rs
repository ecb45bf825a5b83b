//! Measurements in, size label out.

use ndarray::{Array2, Axis};

use crate::algorithm::Algorithm;
use crate::encoder::LabelEncoder;
use crate::error::{Result, SizeError};
use crate::measurements::{ClothingItem, Measurements};
use crate::models::Model;
use crate::scaler::Scaler;

/// Outcome of one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub item: ClothingItem,
    pub algorithm: Algorithm,
    pub size: String,
    /// Stored accuracy of the model, if the stats bundle has it.
    pub accuracy: Option<f64>,
}

fn decode(encoder: &LabelEncoder, index: usize) -> Result<&str> {
    encoder
        .inverse_transform(index)
        .ok_or(SizeError::UnknownClass(index))
}

/// Scale `measurements` in the scaler's fit order, classify, decode.
pub fn predict_size<'e>(
    scaler: &Scaler,
    encoder: &'e LabelEncoder,
    model: &Model,
    measurements: &Measurements,
) -> Result<&'e str> {
    let x = scaler.transform_measurements(measurements);
    let index = model.predict_one(x.view())?;
    decode(encoder, index)
}

/// Batch form of [`predict_size`].
pub fn predict_sizes<'e>(
    scaler: &Scaler,
    encoder: &'e LabelEncoder,
    model: &Model,
    rows: &[Measurements],
) -> Result<Vec<&'e str>> {
    let indices = predict_indices(scaler, model, rows)?;
    indices.into_iter().map(|i| decode(encoder, i)).collect()
}

/// Class indices of `rows`, before decoding.
pub fn predict_indices(
    scaler: &Scaler,
    model: &Model,
    rows: &[Measurements],
) -> Result<Vec<usize>> {
    let mut x = Array2::zeros((0, scaler.feature_order().len()));
    for m in rows {
        let scaled = scaler.transform_measurements(m);
        x.push(Axis(0), scaled.view())
            .map_err(|_| SizeError::DimensionMismatch {
                algorithm: model.algorithm(),
                expected: x.ncols().to_string(),
                actual: scaled.len(),
            })?;
    }
    Ok(model.predict(x.view())?.to_vec())
}
