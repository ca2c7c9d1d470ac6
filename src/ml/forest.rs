use crate::error::{AppError, Result};
use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hyperparameters for the bagged tree ensemble.
///
/// Bounded ensemble size and depth keep the model from overfitting the
/// small, derived dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,

    /// Maximum tree depth
    pub max_depth: usize,

    /// Minimum summed sample weight required to split a node
    pub min_weight_split: f32,

    /// RNG seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 10,
            min_weight_split: 5.0,
            seed: 42,
        }
    }
}

/// Binary classifier: a bagged ensemble of decision trees with
/// class-balanced bootstrap sampling.
///
/// Each tree trains on an equal number of rows drawn (with
/// replacement) from each class, so both classes carry equal weight
/// regardless of their raw frequency. The wildfire probability is the
/// fraction of trees voting 1.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalancedForest {
    trees: Vec<DecisionTree<f64, usize>>,
    params: ForestParams,
    n_features: usize,
}

impl BalancedForest {
    /// Fit the ensemble on a feature matrix and 0/1 label vector.
    /// Deterministic given `params.seed`.
    pub fn fit(x: &Array2<f64>, y: &Array1<usize>, params: ForestParams) -> Result<Self> {
        let positives: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == 1)
            .map(|(i, _)| i)
            .collect();
        let negatives: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == 0)
            .map(|(i, _)| i)
            .collect();

        if positives.is_empty() || negatives.is_empty() {
            return Err(AppError::InsufficientData(
                "both classes are required to fit the classifier".to_string(),
            ));
        }

        let n_features = x.ncols();
        let n_per_class = positives.len().min(negatives.len());
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let mut rows = Vec::with_capacity(n_per_class * 2);
            for _ in 0..n_per_class {
                rows.push(positives[rng.gen_range(0..positives.len())]);
                rows.push(negatives[rng.gen_range(0..negatives.len())]);
            }

            let boot_x = x.select(ndarray::Axis(0), &rows);
            let boot_y: Array1<usize> = rows.iter().map(|&i| y[i]).collect();

            let dataset = Dataset::new(boot_x, boot_y);
            let tree = DecisionTree::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(Some(params.max_depth))
                .min_weight_split(params.min_weight_split)
                .fit(&dataset)
                .map_err(|e| AppError::Internal(format!("Failed to fit tree: {}", e)))?;

            trees.push(tree);
        }

        Ok(Self {
            trees,
            params,
            n_features,
        })
    }

    /// P(wildfire) for each row: fraction of trees voting 1
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(AppError::Validation(format!(
                "expected {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }

        let mut votes = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            let predictions = tree.predict(x);
            for (i, &label) in predictions.iter().enumerate() {
                votes[i] += label as f64;
            }
        }
        votes.mapv_inplace(|v| v / self.trees.len() as f64);

        Ok(votes)
    }

    /// P(wildfire) for a single feature vector
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let x = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| AppError::Internal(format!("Failed to shape feature row: {}", e)))?;
        Ok(self.predict_proba(&x)?[0])
    }

    /// Mean per-feature importance across trees, renormalized to sum 1
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (i, importance) in tree.feature_importance().into_iter().enumerate() {
                total[i] += importance;
            }
        }

        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            for value in &mut total {
                *value /= sum;
            }
        }
        total
    }

    /// Ensemble hyperparameters
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Number of features the ensemble was fitted on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
