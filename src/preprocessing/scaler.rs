//! Feature scaling

use crate::error::{Result, ScorerError};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::numeric_values;

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    scale: f64,
}

/// Standard scaling (z-score): `(x - mean) / std`.
///
/// Uses the population standard deviation. Constant columns get a scale of
/// one. Missing values are ignored while fitting and stay NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<String>,
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            params: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut params = Vec::with_capacity(columns.len());
        for col_name in columns {
            let values = numeric_values(df, col_name)?;
            params.push(Self::compute_params(&values));
        }

        self.columns = columns.to_vec();
        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ScorerError::NotFitted);
        }

        let mut result = Array2::zeros((df.height(), self.columns.len()));
        for (j, (col_name, params)) in self.columns.iter().zip(&self.params).enumerate() {
            let values = numeric_values(df, col_name)?;
            for (i, v) in values.into_iter().enumerate() {
                result[[i, j]] = (v - params.mean) / params.scale;
            }
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Fitted `(mean, scale)` per column
    pub fn statistics(&self) -> Vec<(f64, f64)> {
        self.params.iter().map(|p| (p.mean, p.scale)).collect()
    }

    pub fn n_features_out(&self) -> usize {
        self.columns.len()
    }

    fn compute_params(values: &[f64]) -> ScalerParams {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            return ScalerParams { mean: 0.0, scale: 1.0 };
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();

        ScalerParams {
            mean,
            scale: if std == 0.0 { 1.0 } else { std },
        }
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}
