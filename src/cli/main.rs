//! Offline trainer: derives the labeled dataset from the raw disaster
//! table, fits the classifier, reports evaluation results, and
//! persists the model artifact for the scorer service.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wildfire_sentinel::dataset::{build_training_set, load_events};
use wildfire_sentinel::ml::trainer::{train, TrainerConfig};
use wildfire_sentinel::report;

#[derive(Parser)]
#[command(name = "wildfire-trainer")]
#[command(about = "Train the wildfire risk classifier from historical disaster records", long_about = None)]
struct Cli {
    /// Raw multi-hazard event table (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "data/wildfire_model.bin")]
    output: PathBuf,

    /// RNG seed for sampling, splitting, and bootstrapping
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of trees in the ensemble
    #[arg(long, default_value = "200")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "10")]
    max_depth: usize,

    /// Minimum summed sample weight to split a node
    #[arg(long, default_value = "5.0")]
    min_weight_split: f32,

    /// Held-out test fraction
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Optionally write the evaluation report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optionally write a feature-importance bar chart (SVG)
    #[arg(long)]
    chart: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wildfire_sentinel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let events = load_events(&cli.input)?;
    let training_set = build_training_set(&events, cli.seed)?;

    let config = TrainerConfig {
        seed: cli.seed,
        test_fraction: cli.test_fraction,
        n_trees: cli.trees,
        max_depth: cli.max_depth,
        min_weight_split: cli.min_weight_split,
    };

    let (artifact, evaluation) = train(&training_set, &config)?;

    println!("{}", report::render_text(&evaluation));

    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&evaluation)?)?;
        tracing::info!(path = %path.display(), "Evaluation report written");
    }

    if let Some(path) = &cli.chart {
        std::fs::write(
            path,
            report::render_importance_svg(&evaluation.feature_importances),
        )?;
        tracing::info!(path = %path.display(), "Importance chart written");
    }

    artifact.save(&cli.output)?;
    println!("Model saved as {}", cli.output.display());

    Ok(())
}
