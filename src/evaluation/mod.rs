//! Model evaluation module
//!
//! Recreates the training split of a saved pipeline and reports held-out
//! metrics, cross-validated RMSE, residuals and ranked feature importances.

mod config;
mod job;
pub mod metrics;

pub use config::EvaluationConfig;
pub use job::{EvaluationJob, EvaluationMetrics, EvaluationReport};
pub use metrics::{r2_score, RegressionMetrics};
