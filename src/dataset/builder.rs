use crate::error::{AppError, Result};
use crate::ml::features;
use crate::models::{LabeledSample, RawEvent, Readings};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Labeled, feature-augmented dataset with a fixed 1:2
/// wildfire:non-wildfire class ratio. Built once per training run.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub samples: Vec<LabeledSample>,
}

impl TrainingSet {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Count of samples with the given label
    pub fn class_count(&self, label: usize) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }

    /// Feature matrix (n_samples × 5) and label vector in sample order
    pub fn to_matrices(&self) -> (Array2<f64>, Array1<usize>) {
        let n = self.samples.len();
        let mut x = Array2::zeros((n, features::N_FEATURES));
        let mut y = Array1::zeros(n);

        for (i, sample) in self.samples.iter().enumerate() {
            let row = features::feature_vector(&sample.readings);
            for (j, &val) in row.iter().enumerate() {
                x[[i, j]] = val;
            }
            y[i] = sample.label;
        }

        (x, y)
    }
}

/// Case-insensitive substring match for fire-type disasters
pub fn is_wildfire_type(disaster_type: &str) -> bool {
    let lower = disaster_type.to_lowercase();
    lower.contains("fire")
}

fn labeled(readings: Readings, label: usize) -> LabeledSample {
    let [temp_humidity, temp_pollution] = features::interactions(&readings);
    LabeledSample {
        readings,
        label,
        temp_humidity_interaction: temp_humidity,
        temp_pollution_interaction: temp_pollution,
    }
}

/// Derive a labeled wildfire/non-wildfire dataset from raw events.
///
/// Events missing any reading are dropped from both partitions. All
/// complete wildfire rows are labeled 1; twice as many non-wildfire
/// rows are drawn without replacement (seeded, reproducible) and
/// labeled 0. Row order carries no meaning downstream.
pub fn build_training_set(events: &[RawEvent], seed: u64) -> Result<TrainingSet> {
    let mut wildfire: Vec<Readings> = Vec::new();
    let mut other: Vec<Readings> = Vec::new();

    for event in events {
        let Some(readings) = event.readings() else {
            continue;
        };
        if is_wildfire_type(&event.disaster_type) {
            wildfire.push(readings);
        } else {
            other.push(readings);
        }
    }

    if wildfire.is_empty() {
        return Err(AppError::InsufficientData(
            "no complete wildfire rows in the raw dataset".to_string(),
        ));
    }

    let sample_size = wildfire.len() * 2;
    if other.len() < sample_size {
        return Err(AppError::InsufficientData(format!(
            "non-wildfire pool has {} rows, need {} for the 2:1 ratio",
            other.len(),
            sample_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let drawn = rand::seq::index::sample(&mut rng, other.len(), sample_size);

    let mut samples: Vec<LabeledSample> =
        wildfire.into_iter().map(|r| labeled(r, 1)).collect();
    samples.extend(drawn.iter().map(|i| labeled(other[i], 0)));

    tracing::info!(
        wildfire = samples.iter().filter(|s| s.label == 1).count(),
        non_wildfire = sample_size,
        seed,
        "Built labeled training set"
    );

    Ok(TrainingSet { samples })
}
