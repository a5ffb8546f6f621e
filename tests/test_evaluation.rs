//! Integration test: evaluation reports for a trained model

mod common;

use resume_scorer::error::ScorerError;
use resume_scorer::evaluation::{EvaluationConfig, EvaluationJob};
use resume_scorer::explainability::FeatureNameTable;
use resume_scorer::training::{ModelType, TrainingConfig, TrainingJob};
use std::path::Path;
use tempfile::tempdir;

fn train(dir: &Path, model_type: ModelType) -> (std::path::PathBuf, std::path::PathBuf) {
    let data = common::write_resume_csv(dir, 60);
    let model = dir.join("model.json");
    let config = TrainingConfig::new(&data)
        .with_model_path(&model)
        .with_model_type(model_type)
        .with_n_estimators(10);
    TrainingJob::new(config).run().unwrap();
    (data, model)
}

#[test]
fn test_evaluate_forest_writes_all_reports() {
    let dir = tempdir().unwrap();
    let (data, model) = train(dir.path(), ModelType::RandomForest);
    let out = dir.path().join("reports");

    let config = EvaluationConfig::new(&data, &model).with_output_dir(&out);
    let report = EvaluationJob::new(config).run().unwrap();

    assert_eq!(report.metrics.cv_folds, 5);
    assert!(report.metrics.rmse >= 0.0);
    assert!((report.metrics.mse.sqrt() - report.metrics.rmse).abs() < 1e-9);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report.metrics_path).unwrap()).unwrap();
    for key in ["MAE", "MSE", "RMSE", "R2", "Train_R2", "CV_RMSE_mean", "CV_RMSE_std"] {
        assert!(json[key].is_number(), "missing {}", key);
    }

    let table = report.importances.expect("forest exposes importances");
    assert!(matches!(table, FeatureNameTable::Named(_)));

    let csv = std::fs::read_to_string(out.join("top_feature_importances.csv")).unwrap();
    assert!(csv.starts_with("feature,importance"));
    assert_eq!(csv.lines().count(), table.len() + 1);

    let residuals = std::fs::read_to_string(out.join("model_residuals.csv")).unwrap();
    assert_eq!(residuals.lines().count(), 15 + 1);
}

#[test]
fn test_evaluate_linear_skips_importances() {
    let dir = tempdir().unwrap();
    let (data, model) = train(dir.path(), ModelType::Linear);
    let out = dir.path().join("reports");

    let config = EvaluationConfig::new(&data, &model).with_output_dir(&out);
    let report = EvaluationJob::new(config).run().unwrap();

    assert!(report.importances.is_none());
    assert!(report.importances_path.is_none());
    assert!(report.metrics_path.exists());
    assert!(!out.join("top_feature_importances.csv").exists());
}

#[test]
fn test_evaluate_missing_model() {
    let dir = tempdir().unwrap();
    let data = common::write_resume_csv(dir.path(), 20);

    let config = EvaluationConfig::new(&data, dir.path().join("nope.json")).with_output_dir(dir.path());
    let result = EvaluationJob::new(config).run();
    assert!(matches!(result, Err(ScorerError::ModelNotFound(_))));
}
