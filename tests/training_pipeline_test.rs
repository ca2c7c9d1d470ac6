//! End-to-end trainer pipeline: raw CSV -> labeled set -> fitted
//! model -> persisted artifact -> identical predictions after reload.

use std::io::Write;
use wildfire_sentinel::dataset::{build_training_set, load_events};
use wildfire_sentinel::ml::artifact::ModelArtifact;
use wildfire_sentinel::ml::features;
use wildfire_sentinel::ml::trainer::{train, TrainerConfig};
use wildfire_sentinel::models::Readings;

const HEADER: &str = "Disaster_Type,Temperature (°C),Humidity Level (%),Pollution Level (AQI)";

fn write_disaster_csv(n_fire: usize, n_other: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..n_fire {
        writeln!(
            file,
            "Wildfire,{},{},{}",
            39.0 + (i % 7) as f64,
            11.0 + (i % 9) as f64,
            265.0 + (i * 4 % 55) as f64
        )
        .unwrap();
    }
    for i in 0..n_other {
        let kind = ["Flood", "Earthquake", "Cyclone"][i % 3];
        writeln!(
            file,
            "{kind},{},{},{}",
            15.0 + (i % 11) as f64,
            68.0 + (i % 22) as f64,
            22.0 + (i * 3 % 60) as f64
        )
        .unwrap();
    }
    // A few incomplete rows that must be dropped.
    writeln!(file, "Wildfire,44.0,,310.0").unwrap();
    writeln!(file, "Flood,,90.0,20.0").unwrap();
    file
}

fn fast_config(seed: u64) -> TrainerConfig {
    TrainerConfig {
        seed,
        test_fraction: 0.2,
        n_trees: 30,
        max_depth: 8,
        min_weight_split: 2.0,
    }
}

#[test]
fn test_full_pipeline_round_trip() {
    let csv = write_disaster_csv(20, 80);
    let events = load_events(csv.path()).unwrap();
    assert_eq!(events.len(), 102);

    let set = build_training_set(&events, 42).unwrap();
    assert_eq!(set.class_count(1), 20);
    assert_eq!(set.class_count(0), 40);

    let (artifact, report) = train(&set, &fast_config(42)).unwrap();
    assert!(report.accuracy > 0.5, "separable data should classify");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    artifact.save(&path).unwrap();
    let loaded = ModelArtifact::load(&path).unwrap();

    for readings in [
        Readings {
            temperature: 43.0,
            humidity: 12.0,
            pollution: 300.0,
        },
        Readings {
            temperature: 19.0,
            humidity: 82.0,
            pollution: 35.0,
        },
    ] {
        let row = features::feature_vector(&readings);
        assert_eq!(
            artifact.forest.predict_one(&row).unwrap(),
            loaded.forest.predict_one(&row).unwrap()
        );
    }
}

#[test]
fn test_two_runs_same_seed_bit_identical() {
    let csv = write_disaster_csv(15, 70);
    let events = load_events(csv.path()).unwrap();

    let set_a = build_training_set(&events, 9).unwrap();
    let set_b = build_training_set(&events, 9).unwrap();

    // Bit-identical training sets...
    assert_eq!(set_a.len(), set_b.len());
    for (a, b) in set_a.samples.iter().zip(set_b.samples.iter()) {
        assert_eq!(a.label, b.label);
        assert!(a.readings.temperature.to_bits() == b.readings.temperature.to_bits());
        assert!(a.temp_humidity_interaction.to_bits() == b.temp_humidity_interaction.to_bits());
        assert!(a.temp_pollution_interaction.to_bits() == b.temp_pollution_interaction.to_bits());
    }

    // ...and identical evaluation metrics.
    let (_, report_a) = train(&set_a, &fast_config(9)).unwrap();
    let (_, report_b) = train(&set_b, &fast_config(9)).unwrap();
    assert_eq!(report_a.accuracy, report_b.accuracy);
    assert_eq!(report_a.average_precision, report_b.average_precision);
    assert_eq!(
        report_a.per_class["wildfire"].recall,
        report_b.per_class["wildfire"].recall
    );
}

#[test]
fn test_different_seed_may_draw_different_pool() {
    let csv = write_disaster_csv(10, 90);
    let events = load_events(csv.path()).unwrap();

    let set_a = build_training_set(&events, 1).unwrap();
    let set_b = build_training_set(&events, 2).unwrap();

    // The wildfire partition is identical; the sampled pool generally
    // differs between seeds.
    assert_eq!(set_a.class_count(1), set_b.class_count(1));
    let pool_a: Vec<f64> = set_a
        .samples
        .iter()
        .filter(|s| s.label == 0)
        .map(|s| s.readings.pollution)
        .collect();
    let pool_b: Vec<f64> = set_b
        .samples
        .iter()
        .filter(|s| s.label == 0)
        .map(|s| s.readings.pollution)
        .collect();
    assert_ne!(pool_a, pool_b);
}

#[test]
fn test_undersized_pool_fails_through_pipeline() {
    // 10 wildfire rows need 20 non-wildfire rows; 15 is not enough.
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..10 {
        writeln!(file, "Wildfire,{},20.0,280.0", 40.0 + i as f64).unwrap();
    }
    for i in 0..15 {
        writeln!(file, "Flood,{},80.0,40.0", 18.0 + i as f64).unwrap();
    }

    let events = load_events(file.path()).unwrap();
    let err = build_training_set(&events, 42).unwrap_err();
    assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
}

#[test]
fn test_report_importances_well_formed() {
    let csv = write_disaster_csv(18, 72);
    let events = load_events(csv.path()).unwrap();
    let set = build_training_set(&events, 42).unwrap();
    let (_, report) = train(&set, &fast_config(42)).unwrap();

    assert_eq!(report.feature_importances.len(), 5);
    let names: Vec<&str> = report
        .feature_importances
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, features::FEATURE_NAMES.to_vec());

    let sum: f64 = report.feature_importances.iter().map(|f| f.importance).sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(report.feature_importances.iter().all(|f| f.importance >= 0.0));
}
