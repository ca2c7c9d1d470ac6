use crate::dataset::TrainingSet;
use crate::error::{AppError, Result};
use crate::ml::artifact::{ModelArtifact, ARTIFACT_VERSION};
use crate::ml::features::FEATURE_NAMES;
use crate::ml::forest::{BalancedForest, ForestParams};
use crate::ml::models::{
    ClassMetrics, EvaluationReport, FeatureImportance, ModelMetadata, PrPoint,
};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Training configuration. Hyperparameters are fixed per run and
/// logged into the artifact metadata for reproducibility.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Seed for the split and bootstrap RNGs
    pub seed: u64,

    /// Held-out test fraction
    pub test_fraction: f64,

    /// Ensemble hyperparameters
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_weight_split: f32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            n_trees: 200,
            max_depth: 10,
            min_weight_split: 5.0,
        }
    }
}

/// Split sample indices into train/test preserving the class ratio.
/// Deterministic given `seed`.
fn stratified_split(
    labels: &Array1<usize>,
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0usize, 1usize] {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = (indices.len() as f64 * test_fraction) as usize;
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    (train, test)
}

/// Precision-recall curve and average precision over wildfire scores.
///
/// Points are taken at every distinct score threshold, highest first;
/// AP is the step-function sum sum((R_i - R_{i-1}) * P_i).
fn precision_recall_curve(scores: &[f64], labels: &[usize]) -> (Vec<PrPoint>, f64) {
    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    if n_pos == 0 {
        return (Vec::new(), 0.0);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut curve = Vec::new();
    let mut average_precision = 0.0;
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut last_recall = 0.0;

    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        // Consume every sample tied at this threshold before emitting a point.
        while i < order.len() && scores[order[i]] == threshold {
            if labels[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let precision = tp as f64 / (tp + fp) as f64;
        let recall = tp as f64 / n_pos as f64;
        average_precision += (recall - last_recall) * precision;
        last_recall = recall;

        curve.push(PrPoint {
            threshold,
            precision,
            recall,
        });
    }

    (curve, average_precision)
}

fn class_metrics(y_true: &[usize], y_pred: &[usize], class: usize) -> ClassMetrics {
    let tp = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| **t == class && **p == class)
        .count();
    let fp = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| **p == class && **t != class)
        .count();
    let fn_count = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| **t == class && **p != class)
        .count();

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_count > 0 {
        tp as f64 / (tp + fn_count) as f64
    } else {
        0.0
    };
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    let support = y_true.iter().filter(|&&t| t == class).count();

    ClassMetrics {
        precision,
        recall,
        f1_score,
        support,
    }
}

fn evaluate(forest: &BalancedForest, x: &Array2<f64>, y: &Array1<usize>) -> Result<EvaluationReport> {
    let proba = forest.predict_proba(x)?;
    let scores: Vec<f64> = proba.to_vec();
    let y_true: Vec<usize> = y.to_vec();
    let y_pred: Vec<usize> = scores.iter().map(|&p| usize::from(p > 0.5)).collect();

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = correct as f64 / y_true.len() as f64;

    let mut per_class = HashMap::new();
    per_class.insert("wildfire".to_string(), class_metrics(&y_true, &y_pred, 1));
    per_class.insert("non_wildfire".to_string(), class_metrics(&y_true, &y_pred, 0));

    let (pr_curve, average_precision) = precision_recall_curve(&scores, &y_true);

    let feature_importances = FEATURE_NAMES
        .iter()
        .zip(forest.feature_importances())
        .map(|(name, importance)| FeatureImportance {
            name: (*name).to_string(),
            importance,
        })
        .collect();

    Ok(EvaluationReport {
        accuracy,
        per_class,
        pr_curve,
        average_precision,
        feature_importances,
        n_train: 0,
        n_test: y_true.len(),
    })
}

/// Fit the classifier on a stratified 80/20 split of the training set
/// and evaluate it on the held-out partition.
///
/// Returns the persistable artifact and the evaluation report. The
/// caller decides where the artifact is written.
pub fn train(set: &TrainingSet, config: &TrainerConfig) -> Result<(ModelArtifact, EvaluationReport)> {
    if set.is_empty() {
        return Err(AppError::InsufficientData(
            "training set is empty".to_string(),
        ));
    }

    let (x, y) = set.to_matrices();
    let (train_idx, test_idx) = stratified_split(&y, config.test_fraction, config.seed);

    if test_idx.is_empty() {
        return Err(AppError::InsufficientData(
            "training set too small to hold out a test partition".to_string(),
        ));
    }

    let x_train = x.select(Axis(0), &train_idx);
    let y_train: Array1<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let x_test = x.select(Axis(0), &test_idx);
    let y_test: Array1<usize> = test_idx.iter().map(|&i| y[i]).collect();

    let params = ForestParams {
        n_trees: config.n_trees,
        max_depth: config.max_depth,
        min_weight_split: config.min_weight_split,
        seed: config.seed,
    };

    tracing::info!(
        n_train = train_idx.len(),
        n_test = test_idx.len(),
        n_trees = params.n_trees,
        max_depth = params.max_depth,
        min_weight_split = params.min_weight_split,
        seed = params.seed,
        "Fitting classifier"
    );

    let forest = BalancedForest::fit(&x_train, &y_train, params.clone())?;

    let mut report = evaluate(&forest, &x_test, &y_test)?;
    report.n_train = train_idx.len();

    let hyperparameters: HashMap<String, String> = [
        ("n_trees".to_string(), params.n_trees.to_string()),
        ("max_depth".to_string(), params.max_depth.to_string()),
        (
            "min_weight_split".to_string(),
            params.min_weight_split.to_string(),
        ),
        ("seed".to_string(), params.seed.to_string()),
        (
            "test_fraction".to_string(),
            config.test_fraction.to_string(),
        ),
    ]
    .into_iter()
    .collect();

    let metadata = ModelMetadata {
        name: "wildfire-balanced-forest".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        trained_at: chrono::Utc::now(),
        n_training_samples: set.len(),
        n_features: x.ncols(),
        hyperparameters,
        evaluation: report.clone(),
    };

    let artifact = ModelArtifact {
        format_version: ARTIFACT_VERSION,
        metadata,
        forest,
    };

    Ok((artifact, report))
}
