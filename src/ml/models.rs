use crate::ml::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestConfig {
    /// Number of bootstrap trees
    pub n_trees: usize,

    /// Maximum depth of each tree
    pub max_depth: u16,

    /// Seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 16,
            seed: 42,
        }
    }
}

impl From<&crate::config::ModelConfig> for ForestConfig {
    fn from(config: &crate::config::ModelConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            seed: config.seed,
        }
    }
}

/// One labeled row of the agronomic dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub temperature: f64,
    pub humidity: f64,
    pub label: String,
}

impl TrainingRow {
    pub fn new(temperature: f64, humidity: f64, label: impl Into<String>) -> Self {
        Self {
            temperature,
            humidity,
            label: label.into(),
        }
    }

    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(self.temperature, self.humidity)
    }
}

/// Training rows with their class index encoding
///
/// Labels are sorted lexicographically; class index `i` is `labels[i]`.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub rows: Vec<TrainingRow>,
    pub labels: Vec<String>,
}

impl TrainingSet {
    pub fn from_rows(rows: Vec<TrainingRow>) -> Self {
        let labels: Vec<String> = rows
            .iter()
            .map(|row| row.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self { rows, labels }
    }

    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Class index of a label
    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// Feature vectors in row order
    pub fn features(&self) -> Vec<FeatureVector> {
        self.rows.iter().map(TrainingRow::features).collect()
    }

    /// Class index of every row
    pub fn targets(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter_map(|row| self.class_index(&row.label))
            .collect()
    }

    /// Number of rows per label
    pub fn class_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for row in &self.rows {
            *counts.entry(row.label.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Per-class probability distribution for one input, in class-index order
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProbabilities(pub Vec<f64>);

impl ClassProbabilities {
    /// Index and value of the highest probability
    ///
    /// Ties resolve to the lowest class index.
    pub fn argmax(&self) -> Option<(usize, f64)> {
        self.0
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((i, p)),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Model evaluation metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Accuracy
    pub accuracy: f64,

    /// Per-class recall keyed by label
    pub per_class_recall: HashMap<String, f64>,
}

impl ModelMetrics {
    /// Compare true and predicted class indices
    pub fn evaluate(y_true: &[usize], y_pred: &[usize], labels: &[String]) -> Self {
        let n_samples = y_true.len();
        if n_samples == 0 {
            return Self::default();
        }

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();
        let accuracy = correct as f64 / n_samples as f64;

        let mut per_class_recall = HashMap::new();
        for (class_idx, label) in labels.iter().enumerate() {
            let support = y_true.iter().filter(|&&t| t == class_idx).count();
            if support == 0 {
                continue;
            }
            let tp = y_true
                .iter()
                .zip(y_pred.iter())
                .filter(|(t, p)| **t == class_idx && **p == class_idx)
                .count();
            per_class_recall.insert(label.clone(), tp as f64 / support as f64);
        }

        Self {
            accuracy,
            per_class_recall,
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Crop labels in class-index order
    pub classes: Vec<String>,

    /// Feature columns in model order
    pub features: Vec<String>,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Hyperparameters the forest was fitted with
    pub hyperparameters: ForestConfig,

    /// Metrics on the training set
    pub training_metrics: ModelMetrics,
}
