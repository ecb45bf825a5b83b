use linfa::traits::Predict;
use linfa_logistic::MultiFittedLogisticRegression;
use ndarray::{Array1, ArrayView2};

use super::{Classifier, FeatureCount};

impl Classifier for MultiFittedLogisticRegression<f64, usize> {
    fn feature_count(&self) -> FeatureCount {
        FeatureCount::Exactly(self.params().nrows())
    }

    fn predict_rows(&self, x: ArrayView2<'_, f64>) -> Option<Array1<usize>> {
        Some(self.predict(&x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::prelude::{Dataset, Fit};
    use linfa_logistic::MultiLogisticRegression;
    use ndarray::array;

    #[test]
    fn multinomial_fit_predicts_training_classes() {
        let x = array![
            [-2.0, 0.0, 0.1],
            [-1.8, 0.1, 0.0],
            [-2.2, -0.1, 0.0],
            [0.0, 0.0, 0.0],
            [0.1, 0.1, -0.1],
            [-0.1, 0.0, 0.1],
            [2.0, 0.0, 0.0],
            [1.9, -0.1, 0.1],
            [2.2, 0.1, 0.0],
        ];
        let y = array![0usize, 0, 0, 1, 1, 1, 2, 2, 2];
        let model: MultiFittedLogisticRegression<f64, usize> = MultiLogisticRegression::default()
            .max_iterations(100)
            .fit(&Dataset::new(x.clone(), y))
            .unwrap();

        assert_eq!(model.feature_count(), FeatureCount::Exactly(3));
        let pred = model
            .predict_rows(array![[-2.0, 0.0, 0.0], [2.1, 0.0, 0.0]].view())
            .unwrap();
        assert_eq!(pred.to_vec(), vec![0, 2]);
        assert!(model.predict_rows(x.view()).unwrap().iter().all(|&c| c <= 2));
    }
}
