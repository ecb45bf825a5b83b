use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureCount, argmax_by_score};

/// Vote weighting of the nearest neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weighting {
    /// All neighbors count the same.
    #[default]
    Uniform,
    /// Closer neighbors count more (inverse distance).
    Distance,
}

/// K-nearest-neighbors classifier over the stored training set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knn {
    k: usize,
    #[serde(default)]
    weighting: Weighting,
    points: Array2<f64>,
    labels: Array1<usize>,
}

impl Knn {
    pub fn new(k: usize, weighting: Weighting, points: Array2<f64>, labels: Array1<usize>) -> Self {
        Self {
            k,
            weighting,
            points,
            labels,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Option<usize> {
        let mut neighbors: Vec<(f64, usize)> = self
            .points
            .outer_iter()
            .zip(self.labels.iter())
            .map(|(p, &label)| {
                let d2: f64 = p.iter().zip(row.iter()).map(|(a, b)| (a - b).powi(2)).sum();
                (d2.sqrt(), label)
            })
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(self.k.min(neighbors.len()));

        let mut votes: BTreeMap<usize, f64> = BTreeMap::new();
        match self.weighting {
            Weighting::Uniform => {
                for &(_, label) in &neighbors {
                    *votes.entry(label).or_insert(0.0) += 1.0;
                }
            }
            Weighting::Distance => {
                // exact matches take the whole vote
                let exact: Vec<usize> = neighbors
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|&(_, label)| label)
                    .collect();
                if exact.is_empty() {
                    for &(d, label) in &neighbors {
                        *votes.entry(label).or_insert(0.0) += 1.0 / d;
                    }
                } else {
                    for label in exact {
                        *votes.entry(label).or_insert(0.0) += 1.0;
                    }
                }
            }
        }

        argmax_by_score(votes)
    }
}

impl Classifier for Knn {
    fn feature_count(&self) -> FeatureCount {
        FeatureCount::Exactly(self.points.ncols())
    }

    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>> {
        x.outer_iter().map(|row| self.predict_row(row)).collect()
    }

    fn validate(&self) -> Result<(), String> {
        if self.k == 0 {
            return Err("k must be at least 1".to_string());
        }
        if self.points.nrows() == 0 {
            return Err("no stored training points".to_string());
        }
        if self.points.nrows() != self.labels.len() {
            return Err(format!(
                "{} training points but {} labels",
                self.points.nrows(),
                self.labels.len()
            ));
        }
        if !self.points.iter().all(|v| v.is_finite()) {
            return Err("training points must be finite".to_string());
        }
        Ok(())
    }
}
