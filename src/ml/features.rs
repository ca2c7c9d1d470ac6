use crate::models::Readings;

/// Number of model features: three base readings plus two interactions
pub const N_FEATURES: usize = 5;

/// Feature names in model column order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "temperature",
    "humidity",
    "pollution",
    "temp_humidity_interaction",
    "temp_pollution_interaction",
];

/// Derived interaction features.
///
/// This is the single definition used by both the trainer and the
/// scorer; the invariant is that an identical row produces identical
/// values at training and inference time.
pub fn interactions(readings: &Readings) -> [f64; 2] {
    [
        readings.temperature * (100.0 - readings.humidity),
        readings.temperature * readings.pollution,
    ]
}

/// Full 5-dimensional feature vector in model column order
pub fn feature_vector(readings: &Readings) -> [f64; N_FEATURES] {
    let [temp_humidity, temp_pollution] = interactions(readings);
    [
        readings.temperature,
        readings.humidity,
        readings.pollution,
        temp_humidity,
        temp_pollution,
    ]
}
