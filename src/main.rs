use anyhow::Context;
use clap::Parser;
use stylefit::cli::{
    cmd_evaluate, cmd_insights, cmd_interactive, cmd_list, cmd_predict, cmd_predict_batch, Cli,
    Commands,
};
use stylefit::{AssetStore, Measurements};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stylefit=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let store = match AssetStore::global(&settings) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, fatal = e.is_fatal(), "Cannot start");
            return Err(e).context("upload the scaler, label encoder and model stats artifacts");
        }
    };

    match cli.command {
        Some(Commands::Predict {
            weight,
            height,
            age,
            algorithm,
            item,
        }) => {
            let measurements = Measurements::new(weight, height, age)?;
            cmd_predict(
                store,
                measurements,
                algorithm.unwrap_or(settings.default_algorithm),
                item.unwrap_or(settings.default_item),
            )?;
        }
        Some(Commands::Insights { algorithm }) => {
            cmd_insights(store, algorithm.unwrap_or(settings.default_algorithm))?;
        }
        Some(Commands::PredictBatch {
            input,
            output,
            algorithm,
        }) => {
            cmd_predict_batch(
                store,
                &input,
                output.as_deref(),
                algorithm.unwrap_or(settings.default_algorithm),
            )?;
        }
        Some(Commands::Evaluate { input, algorithm }) => {
            cmd_evaluate(store, &input, algorithm)?;
        }
        Some(Commands::List) => cmd_list(store)?,
        None => cmd_interactive(store)?,
    }

    Ok(())
}
