//! Runtime settings: where artifacts live and how they are named.

use std::path::{Path, PathBuf};

use crate::algorithm::Algorithm;
use crate::measurements::ClothingItem;

pub const DEFAULT_EXTENSION: &str = "msgpack";
pub const SCALER_STEM: &str = "scaler";
pub const ENCODER_STEM: &str = "label_encoder";
pub const STATS_STEM: &str = "model_stats";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding every artifact.
    pub assets_dir: PathBuf,
    /// File extension of artifacts, without the dot.
    pub extension: String,
    pub default_algorithm: Algorithm,
    pub default_item: ClothingItem,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            default_algorithm: Algorithm::RandomForest,
            default_item: ClothingItem::TShirt,
        }
    }
}

impl Settings {
    pub fn with_assets_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: dir.into(),
            ..Self::default()
        }
    }

    fn artifact(&self, stem: &str) -> PathBuf {
        let ext = self.extension.trim_start_matches('.');
        self.assets_dir.join(format!("{stem}.{ext}"))
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.artifact(SCALER_STEM)
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.artifact(ENCODER_STEM)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.artifact(STATS_STEM)
    }

    /// `<algorithm_key>_model.<ext>`
    pub fn model_path(&self, algorithm: Algorithm) -> PathBuf {
        self.artifact(&format!("{}_model", algorithm.key()))
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        let settings = Settings::with_assets_dir("/srv/assets");
        assert_eq!(settings.scaler_path(), PathBuf::from("/srv/assets/scaler.msgpack"));
        assert_eq!(
            settings.encoder_path(),
            PathBuf::from("/srv/assets/label_encoder.msgpack")
        );
        assert_eq!(
            settings.model_path(Algorithm::LogisticRegression),
            PathBuf::from("/srv/assets/logistic_regression_model.msgpack")
        );
    }

    #[test]
    fn extension_without_leading_dot() {
        let settings = Settings {
            extension: ".mp".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.stats_path(), PathBuf::from("./model_stats.mp"));
    }
}
