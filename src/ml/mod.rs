//! Crop classification
//!
//! This module provides:
//! - The shared temperature/humidity feature definition
//! - CSV dataset loading
//! - A seeded random-forest classifier built from decision trees
//! - One-shot training at startup
//! - The predictor used by both the manual and sensor-driven paths

pub mod classifier;
pub mod dataset;
pub mod features;
pub mod models;
pub mod predictor;
pub mod trainer;

pub use classifier::{Classifier, RandomForestClassifier};
pub use dataset::{load_dataset, load_dataset_from_reader, DatasetSchema};
pub use features::FeatureVector;
pub use models::{
    ClassProbabilities, ForestConfig, ModelMetadata, ModelMetrics, TrainingRow, TrainingSet,
};
pub use predictor::Predictor;
pub use trainer::{train, train_on, TrainedModel};
