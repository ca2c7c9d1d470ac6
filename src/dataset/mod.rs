pub mod builder;
pub mod loader;

pub use builder::{build_training_set, is_wildfire_type, TrainingSet};
pub use loader::load_events;
