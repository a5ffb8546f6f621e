//! Résumé scorer
//!
//! Trains a regression pipeline that scores résumés, evaluates it, and
//! explains it by mapping estimator importances back to readable feature
//! names.
//!
//! # Modules
//!
//! - [`preprocessing`] - One-hot encoding, scaling and the column transformer
//! - [`feature_engineering`] - TF-IDF text vectorization
//! - [`pipeline`] - Named preprocessing stages followed by one estimator
//! - [`training`] - Random forest and linear regressors, cross-validation
//! - [`explainability`] - Feature name resolution for importance reports
//! - [`evaluation`] - Held-out metrics and report writing
//! - [`server`] - HTTP scoring API
//! - [`cli`] - Command-line interface

pub mod error;

pub mod preprocessing;
pub mod feature_engineering;
pub mod pipeline;
pub mod training;

pub mod explainability;
pub mod evaluation;

pub mod utils;

pub mod server;
pub mod cli;

pub use error::{Result, ScorerError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, ScorerError};

    pub use crate::preprocessing::{ColumnSelection, ColumnTransformer, OneHotEncoder, StandardScaler, Transformer};
    pub use crate::feature_engineering::TfidfVectorizer;
    pub use crate::pipeline::{Estimator, NamedStep, Pipeline};
    pub use crate::training::{LinearRegression, ModelType, RandomForestRegressor, TrainingConfig, TrainingJob};

    pub use crate::explainability::{FeatureNameResolver, FeatureNameTable, StageKind};
    pub use crate::evaluation::{EvaluationConfig, EvaluationJob, RegressionMetrics};

    pub use crate::utils::data_loader::{ResumeDataset, ResumeRecord};
}
