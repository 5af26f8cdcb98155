use crate::error::{AppError, Result};
use crate::ml::features::{self, N_FEATURES};
use crate::ml::models::{ForestConfig, TrainingSet};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};

/// Trait for classifiers
pub trait Classifier: Send + Sync {
    /// Predict class probabilities (n_samples × n_classes, columns in class-index order)
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>>;

    /// Class labels in class-index order
    fn classes(&self) -> &[String];

    /// Predict class indices
    ///
    /// The most probable class wins; ties go to the lowest class index.
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(features)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::MIN), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
                    .0
            })
            .collect())
    }
}

type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// A single member of the ensemble
enum Voter {
    /// CART tree fitted on a bootstrap sample
    Tree(Tree),

    /// Bootstrap sample held a single class
    Constant(usize),
}

/// Bagged ensemble of Gini decision trees
///
/// Each tree is fitted on a bootstrap resample of the training rows drawn from
/// a `StdRng` seeded with [`ForestConfig::seed`]. The probability of a class is
/// the fraction of trees voting for it.
///
/// Every split considers both features; there is no per-split feature
/// subsampling, so with two inputs this is bagging of full CART trees.
pub struct RandomForestClassifier {
    config: ForestConfig,
    classes: Vec<String>,
    voters: Vec<Voter>,
}

impl RandomForestClassifier {
    /// Fit a forest on the training set
    pub fn fit(dataset: &TrainingSet, config: ForestConfig) -> Result<Self> {
        if dataset.is_empty() {
            return Err(AppError::Dataset(
                "Cannot train on an empty dataset".to_string(),
            ));
        }
        if config.n_trees == 0 {
            return Err(AppError::Configuration(
                "Forest needs at least one tree".to_string(),
            ));
        }

        let x = features::to_matrix(&dataset.features());
        let y = dataset.targets();
        let n_samples = dataset.n_samples();

        // Draw every bootstrap up front so the forest only depends on the seed,
        // not on the order rayon schedules the fits in.
        let mut rng = StdRng::seed_from_u64(config.seed);
        let bootstraps: Vec<Vec<usize>> = (0..config.n_trees)
            .map(|_| (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect())
            .collect();

        let max_depth = config.max_depth;
        let voters = bootstraps
            .par_iter()
            .map(|indices| fit_voter(&x, &y, indices, max_depth))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            classes: dataset.labels.clone(),
            voters,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.voters.len()
    }
}

fn fit_voter(x: &Array2<f64>, y: &[usize], indices: &[usize], max_depth: u16) -> Result<Voter> {
    let labels: Vec<usize> = indices.iter().map(|&i| y[i]).collect();

    let first = labels[0];
    if labels.iter().all(|&label| label == first) {
        return Ok(Voter::Constant(first));
    }

    let sample = x.select(Axis(0), indices);
    let x = ndarray_to_densematrix(&sample);
    let y: Vec<i32> = labels.iter().map(|&label| label as i32).collect();

    let params = DecisionTreeClassifierParameters::default()
        .with_max_depth(max_depth)
        .with_criterion(SplitCriterion::Gini);

    let tree = DecisionTreeClassifier::fit(&x, &y, params)
        .map_err(|e| AppError::Internal(format!("Failed to train decision tree: {}", e)))?;

    Ok(Voter::Tree(tree))
}

fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
    let shape = arr.shape();
    let data: Vec<f64> = arr.iter().copied().collect();
    DenseMatrix::new(shape[0], shape[1], data, false)
}

impl Classifier for RandomForestClassifier {
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if features.ncols() != N_FEATURES {
            return Err(AppError::Prediction(format!(
                "Expected {} feature columns, got {}",
                N_FEATURES,
                features.ncols()
            )));
        }

        let n_samples = features.nrows();
        let n_classes = self.classes.len();
        let mut votes = Array2::<f64>::zeros((n_samples, n_classes));
        if n_samples == 0 {
            return Ok(votes);
        }

        let x = ndarray_to_densematrix(features);
        for voter in &self.voters {
            match voter {
                Voter::Constant(class_idx) => {
                    votes.column_mut(*class_idx).mapv_inplace(|v| v + 1.0);
                }
                Voter::Tree(tree) => {
                    let predictions = tree
                        .predict(&x)
                        .map_err(|e| AppError::Prediction(format!("Tree prediction failed: {}", e)))?;

                    for (i, &pred) in predictions.iter().enumerate() {
                        let class_idx = usize::try_from(pred)
                            .ok()
                            .filter(|&idx| idx < n_classes)
                            .ok_or_else(|| {
                                AppError::Prediction(format!("Unknown class index {}", pred))
                            })?;
                        votes[[i, class_idx]] += 1.0;
                    }
                }
            }
        }

        let n_voters = self.voters.len() as f64;
        votes.mapv_inplace(|v| v / n_voters);
        Ok(votes)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}
