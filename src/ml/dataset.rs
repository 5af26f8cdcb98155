use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::ml::models::{TrainingRow, TrainingSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column names to read from the dataset header
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSchema {
    pub temperature: String,
    pub humidity: String,
    pub label: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            temperature: "temperature".to_string(),
            humidity: "humidity".to_string(),
            label: "label".to_string(),
        }
    }
}

impl From<&ModelConfig> for DatasetSchema {
    fn from(config: &ModelConfig) -> Self {
        Self {
            temperature: config.temperature_column.clone(),
            humidity: config.humidity_column.clone(),
            label: config.label_column.clone(),
        }
    }
}

/// Load a labeled CSV dataset from disk
pub fn load_dataset(path: impl AsRef<Path>, schema: &DatasetSchema) -> Result<TrainingSet> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading training dataset");

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            AppError::Dataset(format!("Failed to open dataset '{}': {}", path.display(), e))
        })?;

    read_rows(reader, schema)
}

/// Load a labeled CSV dataset from any reader
pub fn load_dataset_from_reader<R: Read>(rdr: R, schema: &DatasetSchema) -> Result<TrainingSet> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    read_rows(reader, schema)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>, schema: &DatasetSchema) -> Result<TrainingSet> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::Dataset(format!("Failed to read dataset header: {}", e)))?
        .clone();

    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            AppError::Dataset(format!("Dataset is missing required column '{}'", name))
        })
    };
    let temperature_idx = column(&schema.temperature)?;
    let humidity_idx = column(&schema.humidity)?;
    let label_idx = column(&schema.label)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::Dataset(format!("Malformed dataset row: {}", e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let field = |idx: usize, name: &str| {
            record.get(idx).ok_or_else(|| {
                AppError::Dataset(format!("Line {}: missing value for '{}'", line, name))
            })
        };
        let number = |idx: usize, name: &str| -> Result<f64> {
            let raw = field(idx, name)?;
            let value: f64 = raw.parse().map_err(|_| {
                AppError::Dataset(format!(
                    "Line {}: '{}' is not a number in column '{}'",
                    line, raw, name
                ))
            })?;
            if !value.is_finite() {
                return Err(AppError::Dataset(format!(
                    "Line {}: non-finite value in column '{}'",
                    line, name
                )));
            }
            Ok(value)
        };

        let temperature = number(temperature_idx, &schema.temperature)?;
        let humidity = number(humidity_idx, &schema.humidity)?;
        let label = field(label_idx, &schema.label)?;
        if label.is_empty() {
            return Err(AppError::Dataset(format!("Line {}: empty label", line)));
        }

        rows.push(TrainingRow::new(temperature, humidity, label));
    }

    if rows.is_empty() {
        return Err(AppError::Dataset("Dataset contains no rows".to_string()));
    }

    let set = TrainingSet::from_rows(rows);
    debug!(
        n_samples = set.n_samples(),
        n_classes = set.n_classes(),
        class_counts = ?set.class_counts(),
        "Dataset parsed"
    );
    Ok(set)
}
