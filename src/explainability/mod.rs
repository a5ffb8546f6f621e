//! Model explainability module
//!
//! Feature-importance reporting for fitted pipelines:
//! - Stage-kind dispatch deriving encoded feature names per transformer stage
//! - Reconciliation of names with the estimator's importance vector
//! - Ranked tables with an index-only fallback when names do not line up

mod importance;
mod resolver;
mod stages;

pub use importance::{FeatureNameTable, IndexedImportance, NamedImportance};
pub use resolver::{FeatureNameResolver, FALLBACK_LIMIT, TEXT_STAGE};
pub use stages::{FeatureNamesOut, StageKind, VocabularySource};
