//! Stage-kind dispatch for output feature names

use crate::error::{Result, ScorerError};
use crate::preprocessing::{ColumnSelection, ColumnStage, OneHotEncoder, Transformer};
use tracing::{debug, warn};

/// A stage that can list its learned vocabulary, in output order
pub trait VocabularySource {
    fn vocabulary(&self) -> Result<Vec<String>>;
}

/// A stage that derives its output names from its input columns
pub trait FeatureNamesOut {
    fn feature_names_out(&self, input_features: Option<&[String]>) -> Result<Vec<String>>;
}

impl VocabularySource for Transformer {
    fn vocabulary(&self) -> Result<Vec<String>> {
        match self {
            Transformer::Tfidf(vectorizer) => vectorizer.get_feature_names_out(),
            other => Err(ScorerError::InvalidInput(format!(
                "{} stage has no vocabulary",
                other.kind()
            ))),
        }
    }
}

impl FeatureNamesOut for OneHotEncoder {
    fn feature_names_out(&self, input_features: Option<&[String]>) -> Result<Vec<String>> {
        OneHotEncoder::feature_names_out(self, input_features)
    }
}

/// How one transformer stage contributes output names
pub enum StageKind<'a> {
    /// Free-text stage: one `stage__token` per vocabulary entry
    TextVectorizing {
        name: &'a str,
        vocabulary: &'a dyn VocabularySource,
    },
    /// Encoder with derived names, each prefixed `stage__`
    CategoricalEncoding {
        name: &'a str,
        encoder: &'a dyn FeatureNamesOut,
        columns: &'a [String],
    },
    /// Column list copied through as-is
    Passthrough { columns: &'a [String] },
    /// Anything else: the stringified column selection
    Unknown { columns: &'a ColumnSelection },
}

impl<'a> StageKind<'a> {
    /// Classify a fitted stage. `text_stage` names the free-text stage.
    pub fn from_stage(stage: &'a ColumnStage, text_stage: &str) -> Self {
        if stage.name == text_stage {
            return StageKind::TextVectorizing {
                name: &stage.name,
                vocabulary: &stage.transformer,
            };
        }

        match (&stage.transformer, stage.columns.as_list()) {
            (Transformer::OneHot(encoder), Some(columns)) => StageKind::CategoricalEncoding {
                name: &stage.name,
                encoder,
                columns,
            },
            (_, Some(columns)) => StageKind::Passthrough { columns },
            (_, None) => StageKind::Unknown {
                columns: &stage.columns,
            },
        }
    }

    /// Output names this stage contributes, in output order.
    ///
    /// Never fails: extraction errors are logged and degrade to fewer or
    /// synthesized names.
    pub fn resolved_output_names(&self) -> Vec<String> {
        match self {
            StageKind::TextVectorizing { name, vocabulary } => match vocabulary.vocabulary() {
                Ok(tokens) => tokens.iter().map(|t| format!("{}__{}", name, t)).collect(),
                Err(e) => {
                    warn!(stage = %name, error = %e, "Could not extract vocabulary");
                    Vec::new()
                }
            },
            StageKind::CategoricalEncoding { name, encoder, columns } => {
                let names = encoder
                    .feature_names_out(Some(*columns))
                    .or_else(|e| {
                        debug!(stage = %name, error = %e, "Retrying feature names without input columns");
                        encoder.feature_names_out(None)
                    })
                    .unwrap_or_else(|e| {
                        debug!(stage = %name, error = %e, "Synthesizing feature names from columns");
                        columns.iter().map(|c| format!("{}__{}", name, c)).collect()
                    });
                names.into_iter().map(|n| format!("{}__{}", name, n)).collect()
            }
            StageKind::Passthrough { columns } => columns.to_vec(),
            StageKind::Unknown { columns } => vec![columns.to_string()],
        }
    }
}
