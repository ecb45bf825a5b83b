#![allow(dead_code)]

use std::path::Path;

use linfa::prelude::{Dataset, Fit};
use linfa_logistic::MultiLogisticRegression;
use ndarray::{Array1, Array2, Axis};
use stylefit::assets::{write_artifact, write_model};
use stylefit::models::{BinaryMachine, DecisionTree, Kernel, Knn, RandomForest, Svc, Weighting};
use stylefit::stats::{ClassMetrics, Report};
use stylefit::{
    Algorithm, Feature, LabelEncoder, Measurements, Model, ModelStats, Scaler, Settings,
    StatsBundle,
};

/// Alphabetical, as label encoders sort their classes.
pub const CLASSES: [&str; 4] = ["L", "M", "S", "XL"];

pub const ACCURACIES: [(Algorithm, f64); 5] = [
    (Algorithm::RandomForest, 0.9125),
    (Algorithm::Knn, 0.873),
    (Algorithm::DecisionTree, 0.85),
    (Algorithm::LogisticRegression, 0.78),
    (Algorithm::Svm, 0.8),
];

/// Ground-truth size of the synthetic population: driven by weight only.
pub fn size_for(weight: f64) -> &'static str {
    if weight < 60.0 {
        "S"
    } else if weight < 80.0 {
        "M"
    } else if weight < 105.0 {
        "L"
    } else {
        "XL"
    }
}

pub fn scaler() -> Scaler {
    Scaler::standard(
        Feature::LEGACY_ORDER.to_vec(),
        vec![90.0, 45.0, 172.5],
        vec![30.0, 20.0, 17.0],
    )
}

pub fn encoder() -> LabelEncoder {
    LabelEncoder::new(CLASSES)
}

/// Grid of measurements covering the valid input space.
pub fn population() -> Vec<Measurements> {
    let mut rows = Vec::new();
    for w in (40..=140).step_by(5) {
        for h in [150.0, 165.0, 180.0, 195.0] {
            for a in [20, 45, 70] {
                rows.push(Measurements::new(f64::from(w), h, a).unwrap());
            }
        }
    }
    rows
}

pub fn training_set() -> (Array2<f64>, Array1<usize>) {
    let scaler = scaler();
    let encoder = encoder();
    let rows = population();
    let mut x = Array2::zeros((0, 3));
    let mut y = Vec::new();
    for m in &rows {
        x.push(Axis(0), scaler.transform_measurements(m).view()).unwrap();
        y.push(encoder.transform(size_for(m.weight())).unwrap());
    }
    (x, Array1::from(y))
}

fn fit_tree(x: &Array2<f64>, y: &Array1<usize>, depth: usize) -> DecisionTree<f64, usize> {
    DecisionTree::params()
        .max_depth(Some(depth))
        .fit(&Dataset::new(x.clone(), y.clone()))
        .unwrap()
}

fn centroid_svc(x: &Array2<f64>, y: &Array1<usize>) -> Svc {
    let machines = (0..CLASSES.len())
        .map(|class| {
            let idx: Vec<usize> = (0..y.len()).filter(|&i| y[i] == class).collect();
            let centroid = x.select(Axis(0), &idx).mean_axis(Axis(0)).unwrap();
            BinaryMachine {
                class,
                support_vectors: centroid.insert_axis(Axis(0)),
                coefficients: Array1::from(vec![1.0]),
                intercept: 0.0,
            }
        })
        .collect();
    Svc::new(Kernel::Rbf { gamma: 2.0 }, machines)
}

pub fn models() -> Vec<Model> {
    let (x, y) = training_set();

    let even: Vec<usize> = (0..y.len()).step_by(2).collect();
    let odd: Vec<usize> = (1..y.len()).step_by(2).collect();
    let forest = RandomForest::new(vec![
        fit_tree(&x.select(Axis(0), &even), &y.select(Axis(0), &even), 5),
        fit_tree(&x.select(Axis(0), &odd), &y.select(Axis(0), &odd), 5),
        fit_tree(&x, &y, 4),
    ]);

    let logistic = MultiLogisticRegression::default()
        .max_iterations(100)
        .fit(&Dataset::new(x.clone(), y.clone()))
        .unwrap();

    vec![
        Model::RandomForest(forest),
        Model::Knn(Knn::new(5, Weighting::Uniform, x.clone(), y.clone())),
        Model::DecisionTree(fit_tree(&x, &y, 6)),
        Model::LogisticRegression(logistic),
        Model::Svm(centroid_svc(&x, &y)),
    ]
}

pub fn stats() -> StatsBundle {
    let mut bundle = StatsBundle::new();
    for (alg, accuracy) in ACCURACIES {
        let mut report = Report::new();
        for (i, class) in CLASSES.iter().enumerate() {
            let v = 0.7 + 0.05 * i as f64;
            report.insert(
                class.to_string(),
                ClassMetrics {
                    precision: v,
                    recall: v,
                    f1_score: v,
                    support: 20.0 + i as f64,
                }
                .into(),
            );
        }
        bundle.insert(alg, ModelStats { accuracy, report });
    }
    bundle
}

/// Write the shared artifacts only.
pub fn write_shared(dir: &Path) -> Settings {
    let settings = Settings::with_assets_dir(dir);
    write_artifact(&settings.scaler_path(), &scaler()).unwrap();
    write_artifact(&settings.encoder_path(), &encoder()).unwrap();
    write_artifact(&settings.stats_path(), &stats()).unwrap();
    settings
}

/// Write every artifact: shared ones plus one model per algorithm.
pub fn write_all(dir: &Path) -> Settings {
    let settings = write_shared(dir);
    for model in models() {
        write_model(&settings, &model).unwrap();
    }
    settings
}
