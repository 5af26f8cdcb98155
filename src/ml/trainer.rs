use crate::config::ModelConfig;
use crate::error::Result;
use crate::ml::classifier::{Classifier, RandomForestClassifier};
use crate::ml::dataset::{load_dataset, DatasetSchema};
use crate::ml::features::{self, FeatureVector};
use crate::ml::models::{ForestConfig, ModelMetadata, ModelMetrics, TrainingSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// A fitted classifier together with what it was fitted on
#[derive(Clone)]
pub struct TrainedModel {
    pub classifier: Arc<dyn Classifier>,
    pub metadata: ModelMetadata,
}

/// Load the configured dataset and fit the forest
///
/// Runs once at startup. Any dataset problem surfaces as `AppError::Dataset`.
pub fn train(config: &ModelConfig) -> Result<TrainedModel> {
    let dataset = load_dataset(&config.dataset_path, &DatasetSchema::from(config))?;
    train_on(&dataset, ForestConfig::from(config))
}

/// Fit the forest on an in-memory training set
pub fn train_on(dataset: &TrainingSet, forest_config: ForestConfig) -> Result<TrainedModel> {
    info!(
        n_samples = dataset.n_samples(),
        n_classes = dataset.n_classes(),
        n_trees = forest_config.n_trees,
        seed = forest_config.seed,
        "Training crop classifier"
    );

    let started = Instant::now();
    let forest = RandomForestClassifier::fit(dataset, forest_config.clone())?;

    let x = features::to_matrix(&dataset.features());
    let predictions = forest.predict(&x)?;
    let training_metrics = ModelMetrics::evaluate(&dataset.targets(), &predictions, &dataset.labels);

    info!(
        accuracy = training_metrics.accuracy,
        elapsed_ms = started.elapsed().as_millis() as u64,
        classes = ?dataset.labels,
        "Crop classifier trained"
    );

    let metadata = ModelMetadata {
        name: "Random Forest".to_string(),
        classes: dataset.labels.clone(),
        features: FeatureVector::COLUMNS.iter().map(|c| c.to_string()).collect(),
        trained_at: chrono::Utc::now(),
        n_training_samples: dataset.n_samples(),
        hyperparameters: forest_config,
        training_metrics,
    };

    Ok(TrainedModel {
        classifier: Arc::new(forest),
        metadata,
    })
}
