//! Evaluation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs and report locations for an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    /// Metrics JSON output
    pub metrics_path: PathBuf,
    /// Ranked importance CSV output
    pub importances_path: PathBuf,
    /// Predicted/residual CSV output
    pub residuals_path: PathBuf,
    pub cv_folds: usize,
    /// Must match the training split
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("AI_Resume_Screening.csv"),
            model_path: PathBuf::from("model/resume_score_model.json"),
            metrics_path: PathBuf::from("model_metrics.json"),
            importances_path: PathBuf::from("top_feature_importances.csv"),
            residuals_path: PathBuf::from("model_residuals.csv"),
            cv_folds: 5,
            test_size: 0.25,
            random_state: 42,
        }
    }
}

impl EvaluationConfig {
    pub fn new(data_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Write all three reports under `dir` with their default file names
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.metrics_path = dir.join("model_metrics.json");
        self.importances_path = dir.join("top_feature_importances.csv");
        self.residuals_path = dir.join("model_residuals.csv");
        self
    }

    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }
}
