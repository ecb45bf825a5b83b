use std::collections::BTreeMap;

use linfa::traits::Predict;
use linfa_trees::DecisionTree;
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureCount, argmax_by_score};

fn tree_feature_count(tree: &DecisionTree<f64, usize>) -> usize {
    tree.features().into_iter().max().map_or(0, |i| i + 1)
}

impl Classifier for DecisionTree<f64, usize> {
    fn feature_count(&self) -> FeatureCount {
        FeatureCount::AtLeast(tree_feature_count(self))
    }

    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>> {
        Some(self.predict(&x))
    }
}

/// Bagged decision trees combined by majority vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree<f64, usize>>,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree<f64, usize>>) -> Self {
        Self { trees }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn feature_count(&self) -> FeatureCount {
        FeatureCount::AtLeast(self.trees.iter().map(tree_feature_count).max().unwrap_or(0))
    }

    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>> {
        let votes: Vec<Array1<usize>> = self.trees.iter().map(|t| t.predict(&x)).collect();
        (0..x.nrows())
            .map(|row| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for tree_votes in &votes {
                    *counts.entry(tree_votes[row]).or_insert(0.0) += 1.0;
                }
                argmax_by_score(counts)
            })
            .collect()
    }

    fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("random forest has no trees".to_string());
        }
        Ok(())
    }
}
