//! Fitted model pipeline
//!
//! A [`Pipeline`] is an ordered list of named steps: an optional column
//! transformer followed by exactly one estimator. It is fitted once,
//! persisted as JSON and loaded read-only by the evaluator and the API.

mod estimator;

pub use estimator::Estimator;

use crate::error::{Result, ScorerError};
use crate::feature_engineering::TfidfVectorizer;
use crate::preprocessing::{
    numeric_values, ColumnSelection, ColumnStage, ColumnTransformer, OneHotEncoder,
    StandardScaler, Transformer,
};
use crate::utils::data_loader::{CERTIFICATIONS, EDUCATION, EXPERIENCE, PROJECTS, SALARY, SKILLS};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Conventional name of the column-transformer step
pub const PREPROCESSOR_STEP: &str = "preprocessor";
/// Conventional name of the estimator step
pub const REGRESSOR_STEP: &str = "regressor";

/// What a pipeline step does
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineStep {
    Transform(ColumnTransformer),
    Estimator(Estimator),
}

/// A step and its name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedStep {
    pub name: String,
    pub step: PipelineStep,
}

impl NamedStep {
    pub fn transform(name: impl Into<String>, transformer: ColumnTransformer) -> Self {
        Self {
            name: name.into(),
            step: PipelineStep::Transform(transformer),
        }
    }

    pub fn estimator(name: impl Into<String>, estimator: Estimator) -> Self {
        Self {
            name: name.into(),
            step: PipelineStep::Estimator(estimator),
        }
    }
}

/// Transformer step(s) plus a final estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    steps: Vec<NamedStep>,
    is_fitted: bool,
}

impl Pipeline {
    /// Build a pipeline.
    ///
    /// The last step must be the estimator, at most one column transformer
    /// may precede it, and step names must be unique.
    pub fn new(steps: Vec<NamedStep>) -> Result<Self> {
        let Some((last, head)) = steps.split_last() else {
            return Err(ScorerError::InvalidInput("pipeline has no steps".to_string()));
        };

        if !matches!(last.step, PipelineStep::Estimator(_)) {
            return Err(ScorerError::InvalidInput(format!(
                "last step '{}' is not an estimator",
                last.name
            )));
        }
        if head.iter().any(|s| matches!(s.step, PipelineStep::Estimator(_))) {
            return Err(ScorerError::InvalidInput(
                "only the last step may be an estimator".to_string(),
            ));
        }
        if head.len() > 1 {
            return Err(ScorerError::InvalidInput(
                "at most one column transformer may precede the estimator".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.name.as_str()) {
                return Err(ScorerError::DuplicateStage(step.name.clone()));
            }
        }

        Ok(Self {
            steps,
            is_fitted: false,
        })
    }

    /// The résumé layout: TF-IDF skills, one-hot education and
    /// certifications, scaled numerics, then `estimator`.
    pub fn resume_default(estimator: Estimator) -> Result<Self> {
        let preprocessor = ColumnTransformer::new(vec![
            ColumnStage::new(
                "skills",
                Transformer::Tfidf(TfidfVectorizer::new()),
                ColumnSelection::single(SKILLS),
            ),
            ColumnStage::new(
                "education",
                Transformer::OneHot(OneHotEncoder::new()),
                ColumnSelection::many([EDUCATION]),
            ),
            ColumnStage::new(
                "certs",
                Transformer::OneHot(OneHotEncoder::new()),
                ColumnSelection::many([CERTIFICATIONS]),
            ),
            ColumnStage::new(
                "num",
                Transformer::Standard(StandardScaler::new()),
                ColumnSelection::many([EXPERIENCE, PROJECTS, SALARY]),
            ),
        ])?;

        Self::new(vec![
            NamedStep::transform(PREPROCESSOR_STEP, preprocessor),
            NamedStep::estimator(REGRESSOR_STEP, estimator),
        ])
    }

    /// Steps in fit order
    pub fn steps(&self) -> &[NamedStep] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&PipelineStep> {
        self.steps.iter().find(|s| s.name == name).map(|s| &s.step)
    }

    /// Column transformer registered under `name`, if any
    pub fn named_transform(&self, name: &str) -> Option<&ColumnTransformer> {
        match self.step(name) {
            Some(PipelineStep::Transform(ct)) => Some(ct),
            _ => None,
        }
    }

    fn transformer(&self) -> Option<&ColumnTransformer> {
        self.steps.iter().find_map(|s| match &s.step {
            PipelineStep::Transform(ct) => Some(ct),
            PipelineStep::Estimator(_) => None,
        })
    }

    /// Final estimator
    pub fn estimator(&self) -> &Estimator {
        match self.steps.last().map(|s| &s.step) {
            Some(PipelineStep::Estimator(est)) => est,
            // `new` guarantees the last step is an estimator
            _ => unreachable!("pipeline without a final estimator"),
        }
    }

    pub fn estimator_name(&self) -> &str {
        self.steps.last().map_or("", |s| s.name.as_str())
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit every step on `df` against target `y`
    pub fn fit(&mut self, df: &DataFrame, y: &Array1<f64>) -> Result<&mut Self> {
        if df.height() != y.len() {
            return Err(ScorerError::ShapeError {
                expected: format!("y length = {}", df.height()),
                actual: format!("y length = {}", y.len()),
            });
        }

        let mut encoded: Option<Array2<f64>> = None;
        for step in &mut self.steps {
            match &mut step.step {
                PipelineStep::Transform(ct) => {
                    let x = ct.fit_transform(df)?;
                    debug!(step = %step.name, features = x.ncols(), "Fitted transformer");
                    encoded = Some(x);
                }
                PipelineStep::Estimator(est) => {
                    let x = match encoded.take() {
                        Some(x) => x,
                        None => frame_to_matrix(df)?,
                    };
                    est.fit(&x, y)?;
                    info!(
                        step = %step.name,
                        estimator = est.kind(),
                        samples = x.nrows(),
                        features = x.ncols(),
                        "Fitted estimator"
                    );
                }
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Encode `df` with the fitted transformer
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ScorerError::NotFitted);
        }
        match self.transformer() {
            Some(ct) => ct.transform(df),
            None => frame_to_matrix(df),
        }
    }

    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.transform(df)?;
        self.estimator().predict(&x)
    }

    /// Write the fitted pipeline as JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a pipeline written by [`Pipeline::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScorerError::ModelNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let stored: Self = serde_json::from_str(&json)?;

        let mut pipeline = Self::new(stored.steps)?;
        pipeline.is_fitted = stored.is_fitted;
        Ok(pipeline)
    }
}

/// Every column of `df` as `f64`, for pipelines with no transformer
fn frame_to_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut x = Array2::zeros((df.height(), names.len()));
    for (j, name) in names.iter().enumerate() {
        for (i, v) in numeric_values(df, name)?.into_iter().enumerate() {
            x[[i, j]] = v;
        }
    }
    Ok(x)
}
