//! Model training module
//!
//! Provides the regressors fitted at the end of a pipeline and the
//! training run that produces the persisted model:
//! - Decision trees and random forests (impurity importances)
//! - Linear regression with optional ridge penalty
//! - K-fold cross-validation
//! - Seeded train/test training job

mod config;
mod job;
pub mod cross_validation;
pub mod decision_tree;
pub mod linear_models;
pub mod random_forest;

pub use config::{ModelType, TrainingConfig};
pub use cross_validation::{CVResults, CVSplit, KFold};
pub use decision_tree::{DecisionTreeRegressor, TreeNode};
pub use job::{TrainingJob, TrainingReport};
pub use linear_models::LinearRegression;
pub use random_forest::{MaxFeatures, RandomForestRegressor};
