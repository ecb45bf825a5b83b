//! Integration test: loading shared artifacts in the shapes training jobs write them

mod common;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use stylefit::assets::{write_artifact, write_model};
use stylefit::dashboard::render_insights;
use stylefit::models::{BinaryMachine, Kernel, Svc};
use stylefit::stats::{ACCURACY_ROW, ReportRow};
use stylefit::{Algorithm, ArtifactError, AssetStore, Measurements, Model, Scaler, SizeError};
use tempfile::tempdir;

/// Report row as classification-report dictionaries store it: integer
/// support, and a bare float for the `accuracy` entry.
#[derive(Serialize)]
#[serde(untagged)]
enum RawRow {
    Metrics {
        precision: f64,
        recall: f64,
        #[serde(rename = "f1-score")]
        f1: f64,
        support: u64,
    },
    Score(f64),
}

#[derive(Serialize)]
struct RawStats {
    #[serde(rename = "Accuracy")]
    accuracy: f64,
    #[serde(rename = "Report")]
    report: BTreeMap<&'static str, RawRow>,
}

fn raw_bundle(extra_label: Option<&'static str>) -> BTreeMap<&'static str, RawStats> {
    common::ACCURACIES
        .iter()
        .map(|&(alg, accuracy)| {
            let mut report = BTreeMap::new();
            let labels = common::CLASSES.iter().copied().chain(extra_label);
            for label in labels.chain(["macro avg", "weighted avg"]) {
                let row = RawRow::Metrics {
                    precision: 0.8,
                    recall: 0.75,
                    f1: 0.77,
                    support: 40,
                };
                report.insert(label, row);
            }
            report.insert("accuracy", RawRow::Score(accuracy));
            (alg.key(), RawStats { accuracy, report })
        })
        .collect()
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn load_logged(settings: stylefit::Settings) -> (stylefit::Result<AssetStore>, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let store = tracing::subscriber::with_default(subscriber, || AssetStore::load(settings));
    (store, log.text())
}

#[test]
fn report_with_scalar_accuracy_row_loads() {
    let dir = tempdir().unwrap();
    let settings = common::write_all(dir.path());
    write_artifact(&settings.stats_path(), &raw_bundle(None)).unwrap();

    let store = AssetStore::load(settings).unwrap();
    let knn = store.stats().get(Algorithm::Knn).unwrap();
    assert_eq!(knn.accuracy, 0.873);
    assert_eq!(knn.report[ACCURACY_ROW], ReportRow::Score(0.873));
    assert_eq!(knn.row_metrics("M").unwrap().support, 40.0);
    assert!(store.stats().unknown_labels(store.encoder()).is_empty());

    let text = render_insights(store.stats(), Algorithm::Knn);
    assert!(text.lines().any(|l| l.starts_with(ACCURACY_ROW)));
    assert!(text.contains("87.30%"));
}

#[test]
fn scaler_without_recorded_order_falls_back_with_warning() {
    let dir = tempdir().unwrap();
    let settings = common::write_all(dir.path());
    let legacy = Scaler::standard(Vec::new(), vec![90.0, 45.0, 172.5], vec![30.0, 20.0, 17.0]);
    write_artifact(&settings.scaler_path(), &legacy).unwrap();

    let (store, log) = load_logged(settings);
    let store = store.unwrap();
    assert!(!store.scaler().has_recorded_order());
    assert!(log.contains("assuming legacy order"), "log was: {log}");

    let m = Measurements::new(70.0, 170.0, 25).unwrap();
    assert_eq!(store.predict(&m, Algorithm::Knn).unwrap(), "M");
}

#[test]
fn unknown_report_labels_only_warn() {
    let dir = tempdir().unwrap();
    let settings = common::write_all(dir.path());
    write_artifact(&settings.stats_path(), &raw_bundle(Some("XXL"))).unwrap();

    let (store, log) = load_logged(settings);
    let store = store.unwrap();
    assert!(log.contains("label encoder does not know"), "log was: {log}");
    assert!(log.contains("XXL"));
    assert!(!store.stats().unknown_labels(store.encoder()).is_empty());
}

#[test]
fn recorded_order_loads_quietly() {
    let dir = tempdir().unwrap();
    let (store, log) = load_logged(common::write_all(dir.path()));
    assert!(store.unwrap().scaler().has_recorded_order());
    assert!(!log.contains("WARN"), "log was: {log}");
}

#[test]
fn non_finite_svm_artifact_is_unavailable() {
    let dir = tempdir().unwrap();
    let settings = common::write_all(dir.path());
    let machines = (0..common::CLASSES.len())
        .map(|class| BinaryMachine {
            class,
            support_vectors: ndarray::array![[class as f64, 0.0, 0.0]],
            coefficients: ndarray::array![1.0],
            intercept: 0.0,
        })
        .collect();
    let svc = Svc::new(Kernel::Rbf { gamma: f64::NAN }, machines);
    write_model(&settings, &Model::Svm(svc)).unwrap();

    let store = AssetStore::load(settings).unwrap();
    let m = Measurements::new(70.0, 170.0, 25).unwrap();
    let err = store.predict(&m, Algorithm::Svm).unwrap_err();
    assert!(matches!(
        err,
        SizeError::ModelUnavailable {
            algorithm: Algorithm::Svm,
            source: ArtifactError::Invalid { .. },
        }
    ));
    assert!(!err.is_fatal());
    assert!(store.predict(&m, Algorithm::Knn).is_ok());
}
