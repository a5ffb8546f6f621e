//! Training configuration

use super::{LinearRegression, MaxFeatures, RandomForestRegressor};
use crate::pipeline::Estimator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Estimator family fitted after the preprocessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    RandomForest,
    Linear,
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" | "randomforest" | "rf" => Ok(ModelType::RandomForest),
            "linear" | "linear_regression" | "ridge" => Ok(ModelType::Linear),
            other => Err(format!("unknown model type: {}", other)),
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelType::RandomForest => write!(f, "random_forest"),
            ModelType::Linear => write!(f, "linear"),
        }
    }
}

/// Configuration for a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Résumé dataset CSV
    pub data_path: PathBuf,
    /// Where the fitted pipeline is written
    pub model_path: PathBuf,
    /// Held-out fraction
    pub test_size: f64,
    /// Seed for the split and the forest
    pub random_state: u64,
    pub model_type: ModelType,
    /// Number of trees
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub max_features: MaxFeatures,
    /// L2 penalty of the linear model
    pub alpha: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("AI_Resume_Screening.csv"),
            model_path: PathBuf::from("model/resume_score_model.json"),
            test_size: 0.25,
            random_state: 42,
            model_type: ModelType::RandomForest,
            n_estimators: 100,
            max_depth: None,
            max_features: MaxFeatures::All,
            alpha: 1.0,
        }
    }
}

impl TrainingConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
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

    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Unfitted estimator described by this configuration
    pub fn build_estimator(&self) -> Estimator {
        match self.model_type {
            ModelType::RandomForest => {
                let mut forest = RandomForestRegressor::new(self.n_estimators)
                    .with_max_features(self.max_features)
                    .with_random_state(self.random_state);
                if let Some(depth) = self.max_depth {
                    forest = forest.with_max_depth(depth);
                }
                Estimator::RandomForest(forest)
            }
            ModelType::Linear => Estimator::Linear(LinearRegression::new().with_alpha(self.alpha)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.model_path, PathBuf::from("model/resume_score_model.json"));
    }

    #[test]
    fn test_build_estimator() {
        let config = TrainingConfig::default().with_n_estimators(7).with_max_depth(3);
        match config.build_estimator() {
            Estimator::RandomForest(forest) => {
                assert_eq!(forest.n_estimators, 7);
                assert_eq!(forest.max_depth, Some(3));
                assert_eq!(forest.random_state, Some(42));
            }
            other => panic!("unexpected estimator {}", other.kind()),
        }

        let linear = TrainingConfig::default().with_model_type(ModelType::Linear);
        assert_eq!(linear.build_estimator().kind(), "LinearRegression");
    }

    #[test]
    fn test_model_type_parse() {
        assert_eq!("rf".parse::<ModelType>().unwrap(), ModelType::RandomForest);
        assert_eq!("Linear".parse::<ModelType>().unwrap(), ModelType::Linear);
        assert!("svm".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = TrainingConfig::new("data.csv").with_test_size(0.2);
        let json = serde_json::to_string(&config).unwrap();
        let back: TrainingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data_path, PathBuf::from("data.csv"));
        assert_eq!(back.test_size, 0.2);
    }
}
