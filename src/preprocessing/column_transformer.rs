//! Column transformer: named stages applied to column subsets

use crate::error::{Result, ScorerError};
use crate::feature_engineering::TfidfVectorizer;
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::{numeric_values, text_values, OneHotEncoder, StandardScaler};

/// Source columns consumed by one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSelection {
    /// One raw field, e.g. free text
    Single(String),
    /// An ordered list of raw fields
    Many(Vec<String>),
}

impl ColumnSelection {
    pub fn single(name: impl Into<String>) -> Self {
        ColumnSelection::Single(name.into())
    }

    pub fn many<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        ColumnSelection::Many(names.into_iter().map(Into::into).collect())
    }

    /// Column names in order
    pub fn names(&self) -> Vec<String> {
        match self {
            ColumnSelection::Single(name) => vec![name.clone()],
            ColumnSelection::Many(names) => names.clone(),
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ColumnSelection::Single(_) => None,
            ColumnSelection::Many(names) => Some(names),
        }
    }
}

impl fmt::Display for ColumnSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelection::Single(name) => write!(f, "{}", name),
            ColumnSelection::Many(names) => {
                let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

/// Transformer applied by a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Transformer {
    Tfidf(TfidfVectorizer),
    OneHot(OneHotEncoder),
    Standard(StandardScaler),
    /// Copy numeric columns through unchanged
    Passthrough,
}

impl Transformer {
    pub fn kind(&self) -> &'static str {
        match self {
            Transformer::Tfidf(_) => "tfidf",
            Transformer::OneHot(_) => "onehot",
            Transformer::Standard(_) => "standard_scaler",
            Transformer::Passthrough => "passthrough",
        }
    }

    fn fit(&mut self, df: &DataFrame, columns: &ColumnSelection) -> Result<()> {
        match self {
            Transformer::Tfidf(vectorizer) => {
                let docs = text_values(df, Self::text_column(columns)?)?;
                vectorizer.fit(&docs)?;
            }
            Transformer::OneHot(encoder) => {
                encoder.fit(df, &columns.names())?;
            }
            Transformer::Standard(scaler) => {
                scaler.fit(df, &columns.names())?;
            }
            Transformer::Passthrough => {
                // Validate the columns exist and are numeric
                for name in columns.names() {
                    numeric_values(df, &name)?;
                }
            }
        }
        Ok(())
    }

    fn transform(&self, df: &DataFrame, columns: &ColumnSelection) -> Result<Array2<f64>> {
        match self {
            Transformer::Tfidf(vectorizer) => {
                let docs = text_values(df, Self::text_column(columns)?)?;
                vectorizer.transform(&docs)
            }
            Transformer::OneHot(encoder) => encoder.transform(df),
            Transformer::Standard(scaler) => scaler.transform(df),
            Transformer::Passthrough => {
                let names = columns.names();
                let mut result = Array2::zeros((df.height(), names.len()));
                for (j, name) in names.iter().enumerate() {
                    for (i, v) in numeric_values(df, name)?.into_iter().enumerate() {
                        result[[i, j]] = v;
                    }
                }
                Ok(result)
            }
        }
    }

    fn text_column(columns: &ColumnSelection) -> Result<&str> {
        match columns {
            ColumnSelection::Single(name) => Ok(name),
            ColumnSelection::Many(names) => Err(ScorerError::InvalidInput(format!(
                "text vectorizer expects a single column, got {}",
                names.len()
            ))),
        }
    }
}

/// One named stage of a [`ColumnTransformer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStage {
    pub name: String,
    pub transformer: Transformer,
    pub columns: ColumnSelection,
}

impl ColumnStage {
    pub fn new(name: impl Into<String>, transformer: Transformer, columns: ColumnSelection) -> Self {
        Self {
            name: name.into(),
            transformer,
            columns,
        }
    }
}

/// Applies each stage to its source columns and concatenates the outputs
/// horizontally, in stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    stages: Vec<ColumnStage>,
    output_widths: Vec<usize>,
    is_fitted: bool,
}

impl ColumnTransformer {
    /// Build a transformer; stage names must be unique.
    pub fn new(stages: Vec<ColumnStage>) -> Result<Self> {
        let mut seen = HashSet::new();
        for stage in &stages {
            if !seen.insert(stage.name.as_str()) {
                return Err(ScorerError::DuplicateStage(stage.name.clone()));
            }
        }

        Ok(Self {
            stages,
            output_widths: Vec::new(),
            is_fitted: false,
        })
    }

    pub fn stages(&self) -> &[ColumnStage] {
        &self.stages
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Output width of each stage, known after fit
    pub fn output_widths(&self) -> &[usize] {
        &self.output_widths
    }

    pub fn n_features_out(&self) -> usize {
        self.output_widths.iter().sum()
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.fit_transform(df)?;
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ScorerError::NotFitted);
        }

        let blocks: Vec<Array2<f64>> = self
            .stages
            .par_iter()
            .map(|stage| stage.transformer.transform(df, &stage.columns))
            .collect::<Result<Vec<_>>>()?;

        Self::hstack(df.height(), &blocks)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        let blocks: Vec<Array2<f64>> = self
            .stages
            .par_iter_mut()
            .map(|stage| {
                stage.transformer.fit(df, &stage.columns)?;
                stage.transformer.transform(df, &stage.columns)
            })
            .collect::<Result<Vec<_>>>()?;

        self.output_widths = blocks.iter().map(|b| b.ncols()).collect();
        self.is_fitted = true;

        Self::hstack(df.height(), &blocks)
    }

    fn hstack(n_rows: usize, blocks: &[Array2<f64>]) -> Result<Array2<f64>> {
        if blocks.is_empty() {
            return Ok(Array2::zeros((n_rows, 0)));
        }
        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        Ok(concatenate(Axis(1), &views)?)
    }
}
