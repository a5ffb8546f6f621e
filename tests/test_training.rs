//! Integration test: training job (load → split → fit → save)

mod common;

use resume_scorer::pipeline::Pipeline;
use resume_scorer::training::{ModelType, TrainingConfig, TrainingJob};
use resume_scorer::utils::data_loader::{ResumeDataset, ResumeRecord};
use tempfile::tempdir;

#[test]
fn test_train_and_save_forest() {
    let dir = tempdir().unwrap();
    let data = common::write_resume_csv(dir.path(), 80);
    let model_path = dir.path().join("model").join("resume_score_model.json");

    let config = TrainingConfig::new(&data)
        .with_model_path(&model_path)
        .with_n_estimators(20);
    let report = TrainingJob::new(config).run().unwrap();

    assert_eq!(report.model_path.as_deref(), Some(model_path.as_path()));
    assert_eq!(report.estimator, "RandomForestRegressor");
    assert_eq!(report.n_test, 20);
    assert_eq!(report.n_train, 60);
    assert!(report.train_r2 > 0.8, "train r2 {}", report.train_r2);
    assert!(model_path.exists());

    let pipeline = Pipeline::load(&model_path).unwrap();
    assert!(pipeline.is_fitted());
    let score = pipeline
        .predict(&ResumeRecord::from_text("Python, SQL").to_frame().unwrap())
        .unwrap();
    assert_eq!(score.len(), 1);
    assert!(score[0].is_finite());
}

#[test]
fn test_linear_model_fits_synthetic_scores() {
    let dataset = ResumeDataset::from_frame(&common::resume_frame(100)).unwrap();
    let config = TrainingConfig::default()
        .with_model_type(ModelType::Linear)
        .with_alpha(1e-6);

    let (pipeline, report) = TrainingJob::new(config).fit(&dataset).unwrap();
    assert_eq!(pipeline.estimator().kind(), "LinearRegression");
    assert!(report.test_r2 > 0.95, "test r2 {}", report.test_r2);
}

#[test]
fn test_same_seed_same_model() {
    let dataset = ResumeDataset::from_frame(&common::resume_frame(60)).unwrap();
    let config = TrainingConfig::default().with_n_estimators(8).with_random_state(7);

    let (first, _) = TrainingJob::new(config.clone()).fit(&dataset).unwrap();
    let (second, _) = TrainingJob::new(config).fit(&dataset).unwrap();

    assert_eq!(
        first.predict(&dataset.features).unwrap(),
        second.predict(&dataset.features).unwrap()
    );
}

#[test]
fn test_missing_dataset() {
    let dir = tempdir().unwrap();
    let config = TrainingConfig::new(dir.path().join("missing.csv"));
    assert!(TrainingJob::new(config).run().is_err());
}
