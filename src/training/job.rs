//! End-to-end training run

use super::TrainingConfig;
use crate::error::Result;
use crate::evaluation::metrics::r2_score;
use crate::pipeline::Pipeline;
use crate::utils::data_loader::{train_test_split, ResumeDataset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Outcome of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Where the pipeline was saved, if it was
    pub model_path: Option<PathBuf>,
    pub estimator: String,
    pub n_train: usize,
    pub n_test: usize,
    /// Encoded feature count seen by the estimator
    pub n_features: usize,
    pub train_r2: f64,
    pub test_r2: f64,
    pub training_time_secs: f64,
}

/// Fits the résumé pipeline on the training split and persists it
#[derive(Debug, Clone)]
pub struct TrainingJob {
    config: TrainingConfig,
}

impl TrainingJob {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Load the dataset, fit, and save the pipeline to `model_path`
    pub fn run(&self) -> Result<TrainingReport> {
        info!(path = %self.config.data_path.display(), "Loading dataset");
        let dataset = ResumeDataset::load(&self.config.data_path)?;

        let (pipeline, mut report) = self.fit(&dataset)?;
        pipeline.save(&self.config.model_path)?;
        info!(path = %self.config.model_path.display(), "Model saved");

        report.model_path = Some(self.config.model_path.clone());
        Ok(report)
    }

    /// Fit on the seeded training split of `dataset` without touching disk
    pub fn fit(&self, dataset: &ResumeDataset) -> Result<(Pipeline, TrainingReport)> {
        let split = train_test_split(dataset.len(), self.config.test_size, self.config.random_state)?;
        let train = dataset.take(&split.train)?;
        let test = dataset.take(&split.test)?;

        let mut pipeline = Pipeline::resume_default(self.config.build_estimator())?;

        let start = Instant::now();
        pipeline.fit(&train.features, &train.target)?;
        let training_time_secs = start.elapsed().as_secs_f64();

        let train_r2 = r2_score(&train.target, &pipeline.predict(&train.features)?)?;
        let test_r2 = r2_score(&test.target, &pipeline.predict(&test.features)?)?;
        let n_features = pipeline.transform(&test.features)?.ncols();

        info!(
            estimator = pipeline.estimator().kind(),
            n_train = train.len(),
            n_test = test.len(),
            n_features,
            train_r2,
            test_r2,
            secs = training_time_secs,
            "Training complete"
        );

        let report = TrainingReport {
            model_path: None,
            estimator: pipeline.estimator().kind().to_string(),
            n_train: train.len(),
            n_test: test.len(),
            n_features,
            train_r2,
            test_r2,
            training_time_secs,
        };

        Ok((pipeline, report))
    }
}
