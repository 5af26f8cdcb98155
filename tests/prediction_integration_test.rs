/// Integration tests for the training and prediction path
///
/// These tests verify:
/// - Training from a CSV dataset on disk
/// - The documented rice/maize scenario
/// - Confidence bounds and label membership over a grid of inputs
/// - Determinism for a fixed seed
/// - Temperature/humidity column order from training through serving
/// - Dataset failures at startup

use crop_advisor::{
    config::ModelConfig,
    error::AppError,
    ml::{train, train_on, ForestConfig, Predictor, TrainingRow, TrainingSet},
    models::PredictionRequest,
    service::AdvisoryService,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config_for(file: &NamedTempFile) -> ModelConfig {
    ModelConfig {
        dataset_path: file.path().to_path_buf(),
        ..ModelConfig::default()
    }
}

fn rice_maize_predictor() -> Predictor {
    let file = write_dataset("temperature,humidity,label\n25,80,rice\n35,40,maize\n");
    let model = train(&config_for(&file)).unwrap();
    Predictor::new(model.classifier)
}

fn shipped_dataset() -> ModelConfig {
    ModelConfig {
        dataset_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/crop_recommendation.csv"),
        ..ModelConfig::default()
    }
}

#[test]
fn test_rice_maize_scenario() {
    let predictor = rice_maize_predictor();
    let service = AdvisoryService::new(Arc::new(predictor), None);

    let result = service
        .predict_manual(&PredictionRequest {
            temperature: 25.0,
            humidity: 80.0,
        })
        .unwrap();

    assert_eq!(result.predicted_crop, "rice");
    assert!(result.confidence >= 50.0);
    assert!(result.confidence <= 100.0);
}

#[test]
fn test_swapped_columns_change_the_answer() {
    let predictor = rice_maize_predictor();

    let forward = predictor.predict(25.0, 80.0).unwrap();
    let swapped = predictor.predict(80.0, 25.0).unwrap();

    assert_eq!(forward.predicted_crop, "rice");
    assert_eq!(swapped.predicted_crop, "maize");
}

#[test]
fn test_confidence_bounds_and_labels_over_grid() {
    let model = train(&shipped_dataset()).unwrap();
    let labels = model.metadata.classes.clone();
    let predictor = Predictor::new(model.classifier);

    for t in [-20.0, 0.0, 12.5, 18.0, 24.0, 30.0, 36.0, 50.0, 120.0] {
        for h in [-10.0, 0.0, 15.0, 40.0, 65.0, 80.0, 95.0, 100.0, 250.0] {
            let result = predictor.predict(t, h).unwrap();

            assert!(
                (0.0..=100.0).contains(&result.confidence),
                "confidence {} out of range for ({}, {})",
                result.confidence,
                t,
                h
            );
            assert!(labels.contains(&result.predicted_crop));
        }
    }
}

#[test]
fn test_shipped_dataset_trains() {
    let model = train(&shipped_dataset()).unwrap();

    assert_eq!(model.metadata.classes.len(), 19);
    assert_eq!(model.metadata.n_training_samples, 380);
    assert_eq!(model.metadata.features, vec!["temperature", "humidity"]);
    assert!(model.metadata.training_metrics.accuracy > 0.5);
}

#[test]
fn test_same_seed_same_predictions() {
    let a = Predictor::new(train(&shipped_dataset()).unwrap().classifier);
    let b = Predictor::new(train(&shipped_dataset()).unwrap().classifier);

    for (t, h) in [(23.5, 82.0), (19.0, 17.0), (31.0, 50.0), (26.0, 70.0), (45.0, 5.0)] {
        let first = a.predict(t, h).unwrap();
        assert_eq!(first, a.predict(t, h).unwrap());
        assert_eq!(first, b.predict(t, h).unwrap());
    }
}

#[test]
fn test_single_label_dataset_always_predicts_it() {
    let dataset = TrainingSet::from_rows(vec![
        TrainingRow::new(20.0, 60.0, "jute"),
        TrainingRow::new(26.0, 79.0, "jute"),
        TrainingRow::new(24.0, 81.0, "jute"),
    ]);
    let model = train_on(&dataset, ForestConfig::default()).unwrap();
    let predictor = Predictor::new(model.classifier);

    let result = predictor.predict(-5.0, 5.0).unwrap();
    assert_eq!(result.predicted_crop, "jute");
    assert_eq!(result.confidence, 100.0);
}

#[test]
fn test_custom_column_names() {
    let file = write_dataset("temp_c,rh,crop\n25,80,rice\n35,40,maize\n");
    let config = ModelConfig {
        temperature_column: "temp_c".to_string(),
        humidity_column: "rh".to_string(),
        label_column: "crop".to_string(),
        ..config_for(&file)
    };
    let model = train(&config).unwrap();

    assert_eq!(model.metadata.classes, vec!["maize", "rice"]);
}

#[test]
fn test_missing_dataset_file() {
    let config = ModelConfig {
        dataset_path: PathBuf::from("/nonexistent/crops.csv"),
        ..ModelConfig::default()
    };

    assert!(matches!(train(&config), Err(AppError::Dataset(_))));
}

#[test]
fn test_dataset_missing_humidity_column() {
    let file = write_dataset("temperature,label\n25,rice\n");

    match train(&config_for(&file)) {
        Err(AppError::Dataset(msg)) => assert!(msg.contains("humidity")),
        other => panic!("expected dataset error, got {:?}", other.map(|m| m.metadata)),
    }
}

#[test]
fn test_dataset_malformed_row() {
    let file = write_dataset("temperature,humidity,label\n25,80,rice\nwarm,40,maize\n");

    assert!(matches!(train(&config_for(&file)), Err(AppError::Dataset(_))));
}

#[test]
fn test_dataset_without_rows() {
    let file = write_dataset("temperature,humidity,label\n");

    assert!(matches!(train(&config_for(&file)), Err(AppError::Dataset(_))));
}
