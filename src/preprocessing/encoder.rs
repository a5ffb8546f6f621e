//! Categorical encoding

use crate::error::{Result, ScorerError};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::string_values;

/// What to do with categories not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HandleUnknown {
    /// Encode as an all-zero block
    Ignore,
    /// Fail the transform
    Error,
}

/// One-hot encoder over one or more categorical columns.
///
/// Each input column expands to one output column per category seen during
/// fit, categories sorted lexicographically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    columns: Vec<String>,
    categories: Vec<Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self {
            handle_unknown: HandleUnknown::Ignore,
            columns: Vec::new(),
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Categories learned for each input column
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut categories = Vec::with_capacity(columns.len());
        for col_name in columns {
            let unique: BTreeSet<String> = string_values(df, col_name)?.into_iter().collect();
            categories.push(unique.into_iter().collect());
        }

        self.columns = columns.to_vec();
        self.categories = categories;
        self.is_fitted = true;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ScorerError::NotFitted);
        }

        let mut result = Array2::zeros((df.height(), self.n_features_out()));
        let mut offset = 0;

        for (col_name, categories) in self.columns.iter().zip(&self.categories) {
            let values = string_values(df, col_name)?;
            for (row, value) in values.iter().enumerate() {
                match categories.binary_search(value) {
                    Ok(pos) => result[[row, offset + pos]] = 1.0,
                    Err(_) if self.handle_unknown == HandleUnknown::Ignore => {}
                    Err(_) => {
                        return Err(ScorerError::InvalidInput(format!(
                            "unknown category '{}' in column '{}'",
                            value, col_name
                        )))
                    }
                }
            }
            offset += categories.len();
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Output column names as `{input}_{category}`.
    ///
    /// `input_features` overrides the fitted column names and must have the
    /// same length.
    pub fn feature_names_out(&self, input_features: Option<&[String]>) -> Result<Vec<String>> {
        if !self.is_fitted {
            return Err(ScorerError::NotFitted);
        }

        let inputs = match input_features {
            Some(names) if names.len() != self.columns.len() => {
                return Err(ScorerError::InvalidInput(format!(
                    "input_features has {} names, encoder was fitted on {} columns",
                    names.len(),
                    self.columns.len()
                )))
            }
            Some(names) => names,
            None => self.columns.as_slice(),
        };

        Ok(inputs
            .iter()
            .zip(&self.categories)
            .flat_map(|(input, categories)| {
                categories.iter().map(move |cat| format!("{}_{}", input, cat))
            })
            .collect())
    }

    pub fn n_features_out(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}
