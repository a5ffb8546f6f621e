//! Final pipeline step

use crate::error::{Result, ScorerError};
use crate::training::{LinearRegression, RandomForestRegressor};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Regressor at the end of a [`super::Pipeline`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Estimator {
    RandomForest(RandomForestRegressor),
    Linear(LinearRegression),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::RandomForest(_) => "RandomForestRegressor",
            Estimator::Linear(_) => "LinearRegression",
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Estimator::RandomForest(model) => {
                model.fit(x, y)?;
            }
            Estimator::Linear(model) => {
                model.fit(x, y)?;
            }
        }
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Estimator::RandomForest(model) => model.predict(x),
            Estimator::Linear(model) => model.predict(x),
        }
    }

    /// One importance per encoded feature.
    ///
    /// Fails with `UnsupportedModelKind` for models with no importance
    /// vector and `NotFitted` before fit.
    pub fn feature_importances(&self) -> Result<Vec<f64>> {
        match self {
            Estimator::RandomForest(model) => model
                .feature_importances()
                .map(|imp| imp.to_vec())
                .ok_or(ScorerError::NotFitted),
            Estimator::Linear(_) => Err(ScorerError::UnsupportedModelKind(self.kind().to_string())),
        }
    }
}
