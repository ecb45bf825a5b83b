//! Command-line interface.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::algorithm::Algorithm;
use crate::assets::AssetStore;
use crate::batch;
use crate::config::{Settings, DEFAULT_EXTENSION};
use crate::dashboard;
use crate::measurements::{ClothingItem, Measurements};

#[derive(Parser)]
#[command(name = "stylefit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clothing size recommendations from pre-trained classifiers")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the scaler, label encoder, stats and model artifacts
    #[arg(long, global = true, env = "STYLEFIT_ASSETS", default_value = ".")]
    pub assets: PathBuf,

    /// Artifact file extension
    #[arg(long, global = true, env = "STYLEFIT_EXT", default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Algorithm used when a command does not name one
    #[arg(long, global = true, env = "STYLEFIT_ALGORITHM", default_value = "random_forest")]
    pub default_algorithm: Algorithm,

    /// Clothing item used when a command does not name one
    #[arg(long, global = true, env = "STYLEFIT_ITEM", default_value = "T-Shirt")]
    pub default_item: ClothingItem,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            assets_dir: self.assets.clone(),
            extension: self.ext.clone(),
            default_algorithm: self.default_algorithm,
            default_item: self.default_item,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend a size for one set of measurements
    Predict {
        /// Weight in kg (30-150)
        #[arg(long)]
        weight: f64,

        /// Height in cm (100-220)
        #[arg(long)]
        height: f64,

        /// Age in years (10-100)
        #[arg(long)]
        age: u32,

        /// random_forest, knn, decision_tree, logistic_regression or svm
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// T-Shirt, Sweater, Jacket or Dress
        #[arg(short, long)]
        item: Option<ClothingItem>,
    },

    /// Show the accuracy comparison and a classification report
    Insights {
        /// Algorithm whose report is shown
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
    },

    /// Predict every row of a weight,height,age CSV
    PredictBatch {
        /// Input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        algorithm: Option<Algorithm>,
    },

    /// Score models on a labelled weight,height,age,size CSV
    Evaluate {
        /// Labelled CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Algorithm to score (every available one if omitted)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
    },

    /// List algorithms and whether their artifacts are present
    List,
}

pub fn cmd_predict(
    store: &AssetStore,
    measurements: Measurements,
    algorithm: Algorithm,
    item: ClothingItem,
) -> anyhow::Result<()> {
    let rec = store.recommend(&measurements, algorithm, item)?;
    print!("{}", dashboard::render_recommendation(&rec));
    Ok(())
}

pub fn cmd_insights(store: &AssetStore, algorithm: Algorithm) -> anyhow::Result<()> {
    print!("{}", dashboard::render_insights(store.stats(), algorithm));
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn cmd_predict_batch(
    store: &AssetStore,
    input: &Path,
    output: Option<&Path>,
    algorithm: Algorithm,
) -> anyhow::Result<()> {
    let reader = open(input)?;
    let n = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            batch::predict_csv(store, algorithm, reader, file)?
        }
        None => batch::predict_csv(store, algorithm, reader, io::stdout().lock())?,
    };
    if let Some(path) = output {
        eprintln!("Wrote {n} predictions to {}", path.display());
    }
    Ok(())
}

pub fn cmd_evaluate(
    store: &AssetStore,
    input: &Path,
    algorithm: Option<Algorithm>,
) -> anyhow::Result<()> {
    let algorithms: Vec<Algorithm> = match algorithm {
        Some(alg) => vec![alg],
        None => Algorithm::ALL
            .into_iter()
            .filter(|&alg| store.has_model(alg))
            .collect(),
    };
    if algorithms.is_empty() {
        anyhow::bail!("no model artifacts found in {}", store.settings().assets_dir().display());
    }

    let mut out = io::stdout().lock();
    for alg in algorithms {
        let stats = batch::evaluate_csv(store, alg, open(input)?)?;
        writeln!(out, "{} accuracy: {}", alg, crate::stats::format_accuracy(stats.accuracy))?;
        write!(out, "{}", dashboard::render_report(alg, &stats.report))?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn cmd_list(store: &AssetStore) -> anyhow::Result<()> {
    print!("{}", dashboard::render_algorithms(store));
    Ok(())
}

pub fn cmd_interactive(store: &AssetStore) -> anyhow::Result<()> {
    let stdin = io::stdin();
    dashboard::run_interactive(store, stdin.lock(), io::stdout())?;
    Ok(())
}
