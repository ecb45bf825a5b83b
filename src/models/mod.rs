//! Pre-trained classifiers.
//!
//! Every algorithm the dashboard offers is one variant of [`Model`]. The
//! variants share the [`Classifier`] capability: map rows of scaled features
//! to class indices of the label encoder.

mod knn;
mod logistic;
mod svm;
mod tree;

use std::fmt;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

pub use knn::{Knn, Weighting};
pub use linfa_logistic::MultiFittedLogisticRegression;
pub use linfa_trees::DecisionTree;
pub use svm::{BinaryMachine, Kernel, Svc};
pub use tree::RandomForest;

use crate::algorithm::Algorithm;
use crate::error::{Result, SizeError};

/// How many input columns a model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureCount {
    Exactly(usize),
    /// Trees only index the columns they split on.
    AtLeast(usize),
}

impl FeatureCount {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            FeatureCount::Exactly(m) => n == m,
            FeatureCount::AtLeast(m) => n >= m,
        }
    }
}

impl fmt::Display for FeatureCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureCount::Exactly(n) => write!(f, "{n}"),
            FeatureCount::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

pub trait Classifier {
    fn feature_count(&self) -> FeatureCount;

    /// One class index per row of `x`, or `None` when some row has no finite
    /// score to decide on. Callers must check [`Classifier::feature_count`]
    /// first.
    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>>;

    /// Structural checks run once after decoding an artifact.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// A loaded model artifact.
#[derive(Debug, Clone)]
pub enum Model {
    RandomForest(RandomForest),
    Knn(Knn),
    DecisionTree(DecisionTree<f64, usize>),
    LogisticRegression(MultiFittedLogisticRegression<f64, usize>),
    Svm(Svc),
}

impl Model {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Model::RandomForest(_) => Algorithm::RandomForest,
            Model::Knn(_) => Algorithm::Knn,
            Model::DecisionTree(_) => Algorithm::DecisionTree,
            Model::LogisticRegression(_) => Algorithm::LogisticRegression,
            Model::Svm(_) => Algorithm::Svm,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        match self {
            Model::RandomForest(m) => m,
            Model::Knn(m) => m,
            Model::DecisionTree(m) => m,
            Model::LogisticRegression(m) => m,
            Model::Svm(m) => m,
        }
    }

    /// Predict class indices for a batch of scaled rows.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let classifier = self.classifier();
        let expected = classifier.feature_count();
        if !expected.accepts(x.ncols()) {
            return Err(SizeError::DimensionMismatch {
                algorithm: self.algorithm(),
                expected: expected.to_string(),
                actual: x.ncols(),
            });
        }
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }
        classifier
            .predict_rows(x)
            .ok_or(SizeError::NoDecision {
                algorithm: self.algorithm(),
            })
    }

    /// Predict the class index of a single scaled vector.
    pub fn predict_one(&self, x: ArrayView1<'_, f64>) -> Result<usize> {
        let labels = self.predict(x.insert_axis(Axis(0)))?;
        Ok(labels[0])
    }
}

/// Index of the largest score. Ties go to the smallest index.
pub(crate) fn argmax_by_score<I>(scores: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, f64)>,
{
    let mut best: Option<(usize, f64)> = None;
    for (class, score) in scores {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((best_class, best_score))
                if score < best_score || (score == best_score && class > best_class) => {}
            _ => best = Some((class, score)),
        }
    }
    best.map(|(class, _)| class)
}
