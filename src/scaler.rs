//! Fitted feature scaling.

use std::collections::HashSet;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::measurements::{Feature, Measurements};

/// Per-feature affine transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    /// z-score: `(x - mean) / scale`
    Standard { mean: Array1<f64>, scale: Array1<f64> },
    /// `(x - data_min) / data_range * (hi - lo) + lo`
    MinMax {
        data_min: Array1<f64>,
        data_range: Array1<f64>,
        feature_range: (f64, f64),
    },
}

/// A scaler fitted outside this crate, together with the column order it was
/// fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    /// Column order at fit time. Older artifacts leave this empty.
    #[serde(default)]
    features: Vec<Feature>,
    transform: Transform,
}

fn nonzero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}

impl Scaler {
    pub fn new(features: Vec<Feature>, transform: Transform) -> Self {
        Self {
            features,
            transform,
        }
    }

    pub fn standard(features: Vec<Feature>, mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self::new(
            features,
            Transform::Standard {
                mean: Array1::from(mean),
                scale: Array1::from(scale),
            },
        )
    }

    pub fn min_max(
        features: Vec<Feature>,
        data_min: Vec<f64>,
        data_range: Vec<f64>,
        feature_range: (f64, f64),
    ) -> Self {
        Self::new(
            features,
            Transform::MinMax {
                data_min: Array1::from(data_min),
                data_range: Array1::from(data_range),
                feature_range,
            },
        )
    }

    /// Whether the artifact recorded its fit-time column order.
    pub fn has_recorded_order(&self) -> bool {
        !self.features.is_empty()
    }

    /// Column order used to assemble inputs.
    pub fn feature_order(&self) -> &[Feature] {
        if self.features.is_empty() {
            &Feature::LEGACY_ORDER[..]
        } else {
            self.features.as_slice()
        }
    }

    pub fn n_features(&self) -> usize {
        match &self.transform {
            Transform::Standard { mean, .. } => mean.len(),
            Transform::MinMax { data_min, .. } => data_min.len(),
        }
    }

    /// Check that the recorded order names every feature once and that the
    /// parameter vectors agree in length.
    pub fn validate(&self) -> Result<(), String> {
        let order = self.feature_order();
        let unique: HashSet<_> = order.iter().collect();
        if order.len() != Feature::LEGACY_ORDER.len() || unique.len() != order.len() {
            return Err(format!(
                "feature order must name weight, age and height once each, got {order:?}"
            ));
        }
        let (a, b) = match &self.transform {
            Transform::Standard { mean, scale } => (mean.len(), scale.len()),
            Transform::MinMax {
                data_min,
                data_range,
                ..
            } => (data_min.len(), data_range.len()),
        };
        if a != b || a != order.len() {
            return Err(format!(
                "scaler parameters cover {a}/{b} features, expected {}",
                order.len()
            ));
        }
        Ok(())
    }

    /// Scale one raw feature vector.
    pub fn transform(&self, raw: ArrayView1<f64>) -> Array1<f64> {
        match &self.transform {
            Transform::Standard { mean, scale } => Zip::from(&raw)
                .and(mean)
                .and(scale)
                .map_collect(|&x, &m, &s| (x - m) / nonzero(s)),
            Transform::MinMax {
                data_min,
                data_range,
                feature_range: (lo, hi),
            } => Zip::from(&raw)
                .and(data_min)
                .and(data_range)
                .map_collect(|&x, &min, &range| (x - min) / nonzero(range) * (hi - lo) + lo),
        }
    }

    /// Assemble measurements in fit order and scale them.
    pub fn transform_measurements(&self, m: &Measurements) -> Array1<f64> {
        let raw = m.to_features(self.feature_order());
        self.transform(raw.view())
    }
}
