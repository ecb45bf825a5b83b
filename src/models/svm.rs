//! One-vs-rest support vector classifier.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureCount, argmax_by_score};

/// Kernel function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kernel {
    /// K(x, y) = x · y
    Linear,
    /// K(x, y) = exp(-γ ||x - y||²)
    Rbf { gamma: f64 },
    /// K(x, y) = (γ x · y + r)^d
    Polynomial { degree: i32, gamma: f64, coef0: f64 },
}

impl Kernel {
    fn is_finite(&self) -> bool {
        match self {
            Kernel::Linear => true,
            Kernel::Rbf { gamma } => gamma.is_finite(),
            Kernel::Polynomial { gamma, coef0, .. } => gamma.is_finite() && coef0.is_finite(),
        }
    }

    fn apply(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match self {
            Kernel::Linear => a.dot(&b),
            Kernel::Rbf { gamma } => {
                let norm_sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * norm_sq).exp()
            }
            Kernel::Polynomial {
                degree,
                gamma,
                coef0,
            } => (gamma * a.dot(&b) + coef0).powi(*degree),
        }
    }
}

/// Decision function separating `class` from every other class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryMachine {
    pub class: usize,
    pub support_vectors: Array2<f64>,
    /// Dual coefficients (alpha times sign), one per support vector.
    pub coefficients: Array1<f64>,
    pub intercept: f64,
}

impl BinaryMachine {
    fn decision(&self, kernel: &Kernel, x: ArrayView1<'_, f64>) -> f64 {
        self.support_vectors
            .outer_iter()
            .zip(self.coefficients.iter())
            .map(|(sv, &c)| c * kernel.apply(sv, x))
            .sum::<f64>()
            + self.intercept
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Svc {
    kernel: Kernel,
    machines: Vec<BinaryMachine>,
}

impl Svc {
    pub fn new(kernel: Kernel, machines: Vec<BinaryMachine>) -> Self {
        Self { kernel, machines }
    }

    /// Decision value of every machine for one row, as (class, score).
    pub fn decision_function(&self, x: ArrayView1<'_, f64>) -> Vec<(usize, f64)> {
        self.machines
            .iter()
            .map(|m| (m.class, m.decision(&self.kernel, x)))
            .collect()
    }
}

impl Classifier for Svc {
    fn feature_count(&self) -> FeatureCount {
        FeatureCount::Exactly(
            self.machines
                .first()
                .map_or(0, |m| m.support_vectors.ncols()),
        )
    }

    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>> {
        x.outer_iter()
            .map(|row| argmax_by_score(self.decision_function(row)))
            .collect()
    }

    fn validate(&self) -> Result<(), String> {
        let Some(first) = self.machines.first() else {
            return Err("SVC has no decision functions".to_string());
        };
        if !self.kernel.is_finite() {
            return Err(format!("kernel parameters must be finite, got {:?}", self.kernel));
        }
        let dim = first.support_vectors.ncols();
        for m in &self.machines {
            if m.support_vectors.ncols() != dim {
                return Err(format!(
                    "class {} support vectors have {} columns, expected {dim}",
                    m.class,
                    m.support_vectors.ncols()
                ));
            }
            if m.support_vectors.nrows() != m.coefficients.len() {
                return Err(format!(
                    "class {} has {} support vectors but {} coefficients",
                    m.class,
                    m.support_vectors.nrows(),
                    m.coefficients.len()
                ));
            }
            let finite = m.intercept.is_finite()
                && m.coefficients.iter().all(|v| v.is_finite())
                && m.support_vectors.iter().all(|v| v.is_finite());
            if !finite {
                return Err(format!("class {} has non-finite parameters", m.class));
            }
        }
        Ok(())
    }
}
