//! Offline trainer for the coral bleaching classifier
//!
//! Loads the global bleaching dataset, derives the binary target,
//! imputes missing features, fits a random forest, prints an evaluation
//! report, and writes the artifact the server loads at startup.
//!
//! Usage: train [dataset.csv] [artifact.json]

use log::{error, info};
use std::path::Path;

use coral_server::dataset::{self, prepare, stratified_split};
use coral_server::error::CoralServerError;
use coral_server::model::artifact::save_model;
use coral_server::model::evaluation::{evaluate, report};
use coral_server::model::forest::FEATURE_COLUMNS;
use coral_server::model::training::{TrainParams, fit};

const DEFAULT_DATASET: &str = "global_bleaching_environmental.csv";
const DEFAULT_ARTIFACT: &str = "coral_bleaching_model_balanced.json";
const TEST_FRACTION: f64 = 0.2;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let dataset_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DATASET);
    let artifact_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_ARTIFACT);

    if let Err(e) = run(dataset_path, artifact_path) {
        error!("Training failed: {}", e);
        std::process::exit(1);
    }
}

fn run(dataset_path: &str, artifact_path: &str) -> Result<(), CoralServerError> {
    let params = TrainParams::default();

    info!("Loading dataset from {}", dataset_path);
    let rows = dataset::read_bleaching_csv(Path::new(dataset_path))?;
    info!("Dataset loaded: {} rows", rows.len());

    let dataset = prepare(&rows)?;
    let positives = dataset.labels.iter().filter(|&&label| label == 1).count();
    info!(
        "Prepared {} samples ({} bleaching, {} no bleaching)",
        dataset.len(),
        positives,
        dataset.len() - positives
    );

    let (train, test) = stratified_split(&dataset, TEST_FRACTION, params.seed);
    info!(
        "Split into {} training and {} test samples",
        train.len(),
        test.len()
    );

    info!(
        "Fitting {} trees (max depth {}, seed {})",
        params.n_trees, params.max_depth, params.seed
    );
    let result = fit(&train.features, &train.labels, &params);

    let predictions: Vec<u8> = test
        .features
        .iter()
        .map(|sample| result.model.predict(sample))
        .collect();
    let evaluation = evaluate(&test.labels, &predictions);
    println!("{}", report(&evaluation));

    println!("Feature importances:");
    let mut ranked: Vec<(&str, f64)> = FEATURE_COLUMNS
        .iter()
        .copied()
        .zip(result.importances)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (name, importance) in ranked {
        println!("{:>22}  {:.4}", name, importance);
    }

    save_model(Path::new(artifact_path), &result.model)?;
    println!("Model saved successfully as {}", artifact_path);

    Ok(())
}
