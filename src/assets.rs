//! Artifact persistence and the process-wide read-only cache.
//!
//! Artifacts are MessagePack files written with `rmp_serde::encode::write_named`.
//! The scaler, label encoder and stats bundle are loaded once when the store is
//! built; model artifacts are loaded on first use and kept afterwards.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;
use std::sync::OnceLock;

use rmp_serde::{decode::from_read, encode::write_named};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::algorithm::Algorithm;
use crate::config::Settings;
use crate::encoder::LabelEncoder;
use crate::error::{ArtifactError, Result, SizeError};
use crate::measurements::{ClothingItem, Measurements};
use crate::models::{Classifier, Model};
use crate::pipeline::{self, Recommendation};
use crate::scaler::Scaler;
use crate::stats::StatsBundle;

/// Saves a value to a binary `.msgpack` file.
pub fn write_artifact<T: Serialize>(
    path: &Path,
    value: &T,
) -> std::result::Result<(), ArtifactError> {
    let file = File::create(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_named(&mut writer, value).map_err(|source| ArtifactError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a value from a binary `.msgpack` file.
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    from_read(BufReader::new(file)).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn checked<C: Classifier>(path: &Path, classifier: C) -> std::result::Result<C, ArtifactError> {
    classifier
        .validate()
        .map(|()| classifier)
        .map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })
}

/// Decode the model artifact of `algorithm` into its variant.
pub fn read_model(algorithm: Algorithm, path: &Path) -> std::result::Result<Model, ArtifactError> {
    Ok(match algorithm {
        Algorithm::RandomForest => Model::RandomForest(checked(path, read_artifact(path)?)?),
        Algorithm::Knn => Model::Knn(checked(path, read_artifact(path)?)?),
        Algorithm::DecisionTree => Model::DecisionTree(checked(path, read_artifact(path)?)?),
        Algorithm::LogisticRegression => {
            Model::LogisticRegression(checked(path, read_artifact(path)?)?)
        }
        Algorithm::Svm => Model::Svm(checked(path, read_artifact(path)?)?),
    })
}

/// Write the artifact of a model variant to the path `settings` assigns it.
pub fn write_model(settings: &Settings, model: &Model) -> std::result::Result<(), ArtifactError> {
    let path = settings.model_path(model.algorithm());
    match model {
        Model::RandomForest(m) => write_artifact(&path, m),
        Model::Knn(m) => write_artifact(&path, m),
        Model::DecisionTree(m) => write_artifact(&path, m),
        Model::LogisticRegression(m) => write_artifact(&path, m),
        Model::Svm(m) => write_artifact(&path, m),
    }
}

fn invalid(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

/// Loaded artifacts. Read-only once built.
#[derive(Debug)]
pub struct AssetStore {
    settings: Settings,
    scaler: Scaler,
    encoder: LabelEncoder,
    stats: StatsBundle,
    models: [OnceLock<Model>; 5],
}

static STORE: OnceLock<AssetStore> = OnceLock::new();

impl AssetStore {
    /// Load the shared artifacts. Any failure here is fatal.
    pub fn load(settings: Settings) -> Result<Self> {
        let scaler_path = settings.scaler_path();
        let scaler: Scaler = read_artifact(&scaler_path).map_err(SizeError::Startup)?;
        scaler
            .validate()
            .map_err(|reason| SizeError::Startup(invalid(&scaler_path, reason)))?;
        if !scaler.has_recorded_order() {
            warn!(
                order = ?scaler.feature_order(),
                path = %scaler_path.display(),
                "Scaler does not record its feature order, assuming legacy order"
            );
        }

        let encoder_path = settings.encoder_path();
        let encoder: LabelEncoder = read_artifact(&encoder_path).map_err(SizeError::Startup)?;
        encoder
            .validate()
            .map_err(|reason| SizeError::Startup(invalid(&encoder_path, reason)))?;

        let stats: StatsBundle = read_artifact(&settings.stats_path()).map_err(SizeError::Startup)?;
        for (model, label) in stats.unknown_labels(&encoder) {
            warn!(%model, %label, "Report mentions a class the label encoder does not know");
        }

        info!(
            dir = %settings.assets_dir().display(),
            classes = encoder.len(),
            "Loaded shared artifacts"
        );

        Ok(Self {
            settings,
            scaler,
            encoder,
            stats,
            models: Default::default(),
        })
    }

    /// The process-wide store, built from `settings` on first access.
    ///
    /// Later calls return the same store and ignore their `settings`.
    pub fn global(settings: &Settings) -> Result<&'static AssetStore> {
        if let Some(store) = STORE.get() {
            if store.settings != *settings {
                debug!("Asset store already initialised, ignoring new settings");
            }
            return Ok(store);
        }
        let store = AssetStore::load(settings.clone())?;
        Ok(STORE.get_or_init(|| store))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn stats(&self) -> &StatsBundle {
        &self.stats
    }

    /// Model artifact of `algorithm`, loaded on first use. A failed load is not
    /// remembered; the next call tries the file again.
    pub fn model(&self, algorithm: Algorithm) -> Result<&Model> {
        let slot = &self.models[algorithm.index()];
        if let Some(model) = slot.get() {
            return Ok(model);
        }
        let path = self.settings.model_path(algorithm);
        let model = read_model(algorithm, &path).map_err(|source| {
            warn!(%algorithm, error = %source, "Model artifact unavailable");
            SizeError::ModelUnavailable { algorithm, source }
        })?;
        debug!(%algorithm, path = %path.display(), "Loaded model artifact");
        Ok(slot.get_or_init(|| model))
    }

    /// Whether the model artifact of `algorithm` exists on disk or is loaded.
    pub fn has_model(&self, algorithm: Algorithm) -> bool {
        self.models[algorithm.index()].get().is_some()
            || self.settings.model_path(algorithm).is_file()
    }

    /// Predict the size label for `measurements`.
    pub fn predict(&self, measurements: &Measurements, algorithm: Algorithm) -> Result<&str> {
        let model = self.model(algorithm)?;
        pipeline::predict_size(&self.scaler, &self.encoder, model, measurements)
    }

    /// Predict and attach the presentation details of the recommendation.
    pub fn recommend(
        &self,
        measurements: &Measurements,
        algorithm: Algorithm,
        item: ClothingItem,
    ) -> Result<Recommendation> {
        let size = self.predict(measurements, algorithm)?;
        Ok(Recommendation {
            item,
            algorithm,
            size: size.to_string(),
            accuracy: self.stats.accuracy(algorithm),
        })
    }
}
