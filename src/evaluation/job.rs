//! Held-out evaluation of a persisted pipeline

use super::metrics::RegressionMetrics;
use super::EvaluationConfig;
use crate::error::{Result, ScorerError};
use crate::explainability::{FeatureNameResolver, FeatureNameTable};
use crate::pipeline::Pipeline;
use crate::training::{CVResults, KFold};
use crate::utils::data_loader::{save_csv, train_test_split, ResumeDataset};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metrics written to the metrics JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "MSE")]
    pub mse: f64,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
    #[serde(rename = "Train_R2")]
    pub train_r2: f64,
    #[serde(rename = "CV_RMSE_mean")]
    pub cv_rmse_mean: f64,
    #[serde(rename = "CV_RMSE_std")]
    pub cv_rmse_std: f64,
    #[serde(rename = "CV_Folds")]
    pub cv_folds: usize,
    /// Residual CSV, when it could be written
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub residual_report: Option<PathBuf>,
}

/// Everything an evaluation run produced
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub metrics: EvaluationMetrics,
    pub metrics_path: PathBuf,
    /// Ranked importances, when the model exposes them
    pub importances: Option<FeatureNameTable>,
    pub importances_path: Option<PathBuf>,
}

/// Recomputes accuracy metrics and the importance ranking of a saved model
#[derive(Debug, Clone)]
pub struct EvaluationJob {
    config: EvaluationConfig,
    resolver: FeatureNameResolver,
}

impl EvaluationJob {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            resolver: FeatureNameResolver::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: FeatureNameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn run(&self) -> Result<EvaluationReport> {
        info!(path = %self.config.data_path.display(), "Loading data");
        let dataset = ResumeDataset::load(&self.config.data_path)?;

        info!(path = %self.config.model_path.display(), "Loading model");
        let pipeline = Pipeline::load(&self.config.model_path)?;

        self.evaluate(&pipeline, &dataset)
    }

    /// Evaluate an in-memory pipeline and write the reports
    pub fn evaluate(&self, pipeline: &Pipeline, dataset: &ResumeDataset) -> Result<EvaluationReport> {
        if !pipeline.is_fitted() {
            return Err(ScorerError::NotFitted);
        }

        let split = train_test_split(dataset.len(), self.config.test_size, self.config.random_state)?;
        let train = dataset.take(&split.train)?;
        let test = dataset.take(&split.test)?;

        let y_pred = pipeline.predict(&test.features)?;
        let y_pred_train = pipeline.predict(&train.features)?;

        let held_out = RegressionMetrics::compute(&test.target, &y_pred)?;
        let train_metrics = RegressionMetrics::compute(&train.target, &y_pred_train)?;

        let cv = self.cross_validate(pipeline, dataset)?;

        let mut metrics = EvaluationMetrics {
            mae: held_out.mae,
            mse: held_out.mse,
            rmse: held_out.rmse,
            r2: held_out.r2,
            train_r2: train_metrics.r2,
            cv_rmse_mean: cv.mean_score,
            cv_rmse_std: cv.std_score,
            cv_folds: cv.n_folds,
            residual_report: None,
        };

        match write_residuals(&self.config.residuals_path, &test.target, &y_pred) {
            Ok(()) => metrics.residual_report = Some(self.config.residuals_path.clone()),
            Err(e) => warn!(error = %e, "Could not write residual report"),
        }

        write_metrics(&self.config.metrics_path, &metrics)?;
        info!(
            path = %self.config.metrics_path.display(),
            r2 = metrics.r2,
            rmse = metrics.rmse,
            "Saved metrics"
        );

        let (importances, importances_path) = match self.resolver.resolve(pipeline) {
            Ok(table) => {
                let mut df = table.to_dataframe()?;
                save_csv(&mut df, &self.config.importances_path)?;
                info!(
                    path = %self.config.importances_path.display(),
                    rows = table.len(),
                    "Saved feature importances"
                );
                (Some(table), Some(self.config.importances_path.clone()))
            }
            Err(e @ (ScorerError::UnsupportedModelKind(_) | ScorerError::MissingPreprocessorStage(_))) => {
                info!(reason = %e, "Feature importances not available");
                (None, None)
            }
            Err(e) => return Err(e),
        };

        Ok(EvaluationReport {
            metrics,
            metrics_path: self.config.metrics_path.clone(),
            importances,
            importances_path,
        })
    }

    /// RMSE per fold, refitting a fresh copy of `pipeline` on each
    fn cross_validate(&self, pipeline: &Pipeline, dataset: &ResumeDataset) -> Result<CVResults> {
        let splits = KFold::new(self.config.cv_folds).split(dataset.len())?;

        let mut scores = Vec::with_capacity(splits.len());
        for split in &splits {
            let train = dataset.take(&split.train_indices)?;
            let test = dataset.take(&split.test_indices)?;

            let mut fold_model = pipeline.clone();
            fold_model.fit(&train.features, &train.target)?;
            let preds = fold_model.predict(&test.features)?;

            let rmse = RegressionMetrics::compute(&test.target, &preds)?.rmse;
            info!(fold = split.fold_idx, rmse, "Cross-validation fold");
            scores.push(rmse);
        }

        Ok(CVResults::from_scores(scores))
    }
}

fn write_residuals(path: &Path, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    let residuals: Vec<f64> = y_true.iter().zip(y_pred.iter()).map(|(t, p)| t - p).collect();
    let mut df = DataFrame::new(vec![
        Column::new("predicted".into(), y_pred.to_vec()),
        Column::new("residual".into(), residuals),
    ])?;
    save_csv(&mut df, path)
}

fn write_metrics(path: &Path, metrics: &EvaluationMetrics) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(metrics)?;
    std::fs::write(path, json)?;
    Ok(())
}
