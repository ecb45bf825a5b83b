//! # stylefit 👕📏
//!
//! Recommend a clothing size from body measurements using classifiers trained
//! elsewhere and shipped as MessagePack artifacts.
//!
//! A fitted scaler normalizes `(weight, age, height)` in the order it was fit
//! on, the selected classifier predicts a class index, and a label encoder
//! turns the index into a size such as `"M"`. Pre-computed accuracy scores
//! and classification reports are shown next to the prediction.
//!
//! ## Features
//! - Five interchangeable classifiers: random forest, KNN, decision tree,
//!   logistic regression and SVM (tree and logistic models from
//!   [`linfa`](https://crates.io/crates/linfa))
//! - Artifact persistence with `rmp-serde` (MessagePack)
//! - Shared artifacts cached once per process; models loaded on first use
//! - Accuracy comparison and per-class report tables
//! - CSV batch prediction and evaluation against labelled data
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```no_run
//! use stylefit::{Algorithm, AssetStore, ClothingItem, Measurements, Settings};
//!
//! let store = AssetStore::load(Settings::with_assets_dir("assets"))?;
//! let m = Measurements::new(70.0, 170.0, 25)?;
//! let rec = store.recommend(&m, Algorithm::Knn, ClothingItem::Jacket)?;
//! println!("Recommended {} size: {}", rec.item, rec.size);
//! # Ok::<(), stylefit::SizeError>(())
//! ```

pub mod algorithm;
pub mod assets;
pub mod batch;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod encoder;
pub mod error;
pub mod measurements;
pub mod models;
pub mod pipeline;
pub mod scaler;
pub mod stats;

pub use algorithm::Algorithm;
pub use assets::AssetStore;
pub use config::Settings;
pub use encoder::LabelEncoder;
pub use error::{ArtifactError, Result, SizeError};
pub use measurements::{ClothingItem, Feature, Measurements};
pub use models::{Classifier, Model};
pub use pipeline::Recommendation;
pub use scaler::Scaler;
pub use stats::{ModelStats, StatsBundle, format_accuracy};
