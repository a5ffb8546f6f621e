//! Map estimator importances back to human-readable feature names

use super::importance::FeatureNameTable;
use super::stages::StageKind;
use crate::error::{Result, ScorerError};
use crate::pipeline::{Pipeline, PREPROCESSOR_STEP};
use tracing::{debug, warn};

/// Rows kept when names cannot be aligned with importances
pub const FALLBACK_LIMIT: usize = 50;

/// Default name of the free-text stage
pub const TEXT_STAGE: &str = "skills";

/// Reconstructs encoded feature names for a fitted [`Pipeline`] and pairs
/// them with the estimator's importances.
#[derive(Debug, Clone)]
pub struct FeatureNameResolver {
    preprocessor_step: String,
    text_stage: String,
    fallback_limit: usize,
}

impl Default for FeatureNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureNameResolver {
    pub fn new() -> Self {
        Self {
            preprocessor_step: PREPROCESSOR_STEP.to_string(),
            text_stage: TEXT_STAGE.to_string(),
            fallback_limit: FALLBACK_LIMIT,
        }
    }

    /// Step name of the column transformer to walk
    pub fn with_preprocessor_step(mut self, name: impl Into<String>) -> Self {
        self.preprocessor_step = name.into();
        self
    }

    /// Stage name treated as the free-text vectorizer
    pub fn with_text_stage(mut self, name: impl Into<String>) -> Self {
        self.text_stage = name.into();
        self
    }

    pub fn with_fallback_limit(mut self, limit: usize) -> Self {
        self.fallback_limit = limit;
        self
    }

    /// Resolve the ranked importance table of a fitted pipeline.
    ///
    /// Fails with `UnsupportedModelKind` when the estimator has no importance
    /// vector and `MissingPreprocessorStage` when no column transformer is
    /// registered under the preprocessor step name. Stage-level naming
    /// problems never fail; they surface as an index-mode table.
    pub fn resolve(&self, pipeline: &Pipeline) -> Result<FeatureNameTable> {
        let importances = pipeline.estimator().feature_importances()?;

        let transformer = pipeline
            .named_transform(&self.preprocessor_step)
            .ok_or_else(|| ScorerError::MissingPreprocessorStage(self.preprocessor_step.clone()))?;

        let stages: Vec<StageKind> = transformer
            .stages()
            .iter()
            .map(|stage| StageKind::from_stage(stage, &self.text_stage))
            .collect();

        Ok(self.resolve_stages(&stages, &importances))
    }

    /// Concatenate per-stage names in order and reconcile them with
    /// `importances`.
    pub fn resolve_stages(&self, stages: &[StageKind], importances: &[f64]) -> FeatureNameTable {
        let names: Vec<String> = stages
            .iter()
            .flat_map(StageKind::resolved_output_names)
            .collect();

        debug!(
            names = names.len(),
            importances = importances.len(),
            "Reconciling feature names"
        );

        let table = FeatureNameTable::reconcile(names, importances, self.fallback_limit);
        if !table.is_named() {
            warn!(
                importances = importances.len(),
                kept = table.len(),
                "Could not map indices to names, reporting indices with importances"
            );
        }
        table
    }
}
