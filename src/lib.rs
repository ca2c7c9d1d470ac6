//! Wildfire risk estimation from environmental readings.
//!
//! Two components, independently deployable: an offline trainer that
//! derives a labeled dataset from historical disaster records and fits
//! a binary classifier, and a scorer service that loads the persisted
//! model and turns three readings into a tiered risk assessment with
//! an alert decision.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod feed;
pub mod ml;
pub mod models;
pub mod notifications;
pub mod registry;
pub mod report;
pub mod scoring;

pub use error::{AppError, Result};
