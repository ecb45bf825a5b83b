//! Pre-computed model statistics and classification reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, title_case_key};
use crate::encoder::LabelEncoder;

pub const MACRO_AVG: &str = "macro avg";
pub const WEIGHTED_AVG: &str = "weighted avg";
pub const ACCURACY_ROW: &str = "accuracy";

/// Precision/recall/F1 of one class (or one aggregate row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score", alias = "f1")]
    pub f1_score: f64,
    pub support: f64,
}

/// One row of a classification report. Most rows carry per-class metrics;
/// the `accuracy` row is a single score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportRow {
    Metrics(ClassMetrics),
    Score(f64),
}

impl ReportRow {
    pub fn metrics(&self) -> Option<&ClassMetrics> {
        match self {
            ReportRow::Metrics(m) => Some(m),
            ReportRow::Score(_) => None,
        }
    }

    /// Value shown in column `i` (precision, recall, f1-score, support). A
    /// score fills every column.
    pub fn column(&self, i: usize) -> f64 {
        match self {
            ReportRow::Metrics(m) => match i {
                0 => m.precision,
                1 => m.recall,
                2 => m.f1_score,
                _ => m.support,
            },
            ReportRow::Score(v) => *v,
        }
    }
}

impl From<ClassMetrics> for ReportRow {
    fn from(metrics: ClassMetrics) -> Self {
        ReportRow::Metrics(metrics)
    }
}

/// Rows of a classification report keyed by class label or aggregate name.
pub type Report = BTreeMap<String, ReportRow>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Report", default)]
    pub report: Report,
}

impl ModelStats {
    /// Metrics row of `label`, if the report has one.
    pub fn row_metrics(&self, label: &str) -> Option<&ClassMetrics> {
        self.report.get(label).and_then(ReportRow::metrics)
    }
}

/// Statistics of every trained model, keyed by algorithm key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsBundle {
    models: BTreeMap<String, ModelStats>,
}

impl StatsBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, algorithm: Algorithm, stats: ModelStats) {
        self.models.insert(algorithm.key().to_string(), stats);
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&ModelStats> {
        self.models.get(algorithm.key())
    }

    pub fn accuracy(&self, algorithm: Algorithm) -> Option<f64> {
        self.get(algorithm).map(|s| s.accuracy)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// (display name, accuracy) rows in key order.
    pub fn accuracy_rows(&self) -> Vec<(String, f64)> {
        self.models
            .iter()
            .map(|(key, s)| (title_case_key(key), s.accuracy))
            .collect()
    }

    /// Report labels that are neither known classes nor aggregate rows.
    pub fn unknown_labels(&self, encoder: &LabelEncoder) -> Vec<(String, String)> {
        self.models
            .iter()
            .flat_map(|(key, s)| {
                s.report
                    .keys()
                    .filter(|label| !is_aggregate(label) && !encoder.contains(label))
                    .map(move |label| (key.clone(), label.clone()))
            })
            .collect()
    }
}

pub fn is_aggregate(label: &str) -> bool {
    matches!(label, MACRO_AVG | WEIGHTED_AVG | ACCURACY_ROW | "micro avg")
}

/// Format a fraction as a percentage with two decimals (0.873 -> "87.30%").
pub fn format_accuracy(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Accuracy and per-class report of `predicted` against `truth`. Both hold
/// class indices of `encoder`.
pub fn evaluate(truth: &[usize], predicted: &[usize], encoder: &LabelEncoder) -> ModelStats {
    let n_classes = encoder.len();
    let mut tp = vec![0.0; n_classes];
    let mut pred_count = vec![0.0; n_classes];
    let mut support = vec![0.0; n_classes];
    let mut correct = 0.0;

    for (&t, &p) in truth.iter().zip(predicted) {
        if let Some(s) = support.get_mut(t) {
            *s += 1.0;
        }
        if let Some(c) = pred_count.get_mut(p) {
            *c += 1.0;
        }
        if t == p {
            correct += 1.0;
            if let Some(hit) = tp.get_mut(t) {
                *hit += 1.0;
            }
        }
    }

    let mut report = Report::new();
    let mut macro_sum = (0.0, 0.0, 0.0);
    let mut weighted_sum = (0.0, 0.0, 0.0);
    let total: f64 = support.iter().sum();

    for (i, label) in encoder.classes().iter().enumerate() {
        let precision = ratio(tp[i], pred_count[i]);
        let recall = ratio(tp[i], support[i]);
        let f1_score = ratio(2.0 * precision * recall, precision + recall);
        macro_sum.0 += precision;
        macro_sum.1 += recall;
        macro_sum.2 += f1_score;
        weighted_sum.0 += precision * support[i];
        weighted_sum.1 += recall * support[i];
        weighted_sum.2 += f1_score * support[i];
        report.insert(
            label.clone(),
            ClassMetrics {
                precision,
                recall,
                f1_score,
                support: support[i],
            }
            .into(),
        );
    }

    let k = n_classes as f64;
    report.insert(
        MACRO_AVG.to_string(),
        ClassMetrics {
            precision: ratio(macro_sum.0, k),
            recall: ratio(macro_sum.1, k),
            f1_score: ratio(macro_sum.2, k),
            support: total,
        }
        .into(),
    );
    report.insert(
        WEIGHTED_AVG.to_string(),
        ClassMetrics {
            precision: ratio(weighted_sum.0, total),
            recall: ratio(weighted_sum.1, total),
            f1_score: ratio(weighted_sum.2, total),
            support: total,
        }
        .into(),
    );

    let accuracy = ratio(correct, truth.len().min(predicted.len()) as f64);
    report.insert(ACCURACY_ROW.to_string(), ReportRow::Score(accuracy));

    ModelStats { accuracy, report }
}
