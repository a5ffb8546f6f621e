//! Integration test: mapping estimator importances back to feature names

mod common;

use resume_scorer::error::{Result, ScorerError};
use resume_scorer::explainability::{
    FeatureNameResolver, FeatureNameTable, FeatureNamesOut, IndexedImportance,
    StageKind, VocabularySource, FALLBACK_LIMIT,
};
use resume_scorer::pipeline::{Estimator, Pipeline};
use resume_scorer::preprocessing::ColumnSelection;
use resume_scorer::training::{LinearRegression, RandomForestRegressor};
use resume_scorer::utils::data_loader::ResumeDataset;

struct Vocab(Vec<&'static str>);

impl VocabularySource for Vocab {
    fn vocabulary(&self) -> Result<Vec<String>> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct Categories(Vec<&'static str>);

impl FeatureNamesOut for Categories {
    fn feature_names_out(&self, _: Option<&[String]>) -> Result<Vec<String>> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

fn fitted(estimator: Estimator) -> (Pipeline, ResumeDataset) {
    let dataset = ResumeDataset::from_frame(&common::resume_frame(60)).unwrap();
    let mut pipeline = Pipeline::resume_default(estimator).unwrap();
    pipeline.fit(&dataset.features, &dataset.target).unwrap();
    (pipeline, dataset)
}

#[test]
fn test_names_mode_sorted_with_stable_ties() {
    let vocab = Vocab(vec!["python", "sql"]);
    let encoder = Categories(vec!["BSc", "MSc"]);
    let categorical = vec!["Education".to_string()];
    let numeric = vec!["Experience (Years)".to_string()];

    let stages = [
        StageKind::TextVectorizing { name: "skills", vocabulary: &vocab },
        StageKind::CategoricalEncoding { name: "Education", encoder: &encoder, columns: &categorical },
        StageKind::Passthrough { columns: &numeric },
    ];

    let table = FeatureNameResolver::new().resolve_stages(&stages, &[0.1, 0.4, 0.2, 0.2, 0.1]);

    let expected = [
        ("skills__sql", 0.4),
        ("Education__BSc", 0.2),
        ("Education__MSc", 0.2),
        ("skills__python", 0.1),
        ("Experience (Years)", 0.1),
    ];
    let FeatureNameTable::Named(rows) = table else {
        panic!("expected named table");
    };
    let got: Vec<(&str, f64)> = rows.iter().map(|r| (r.feature.as_str(), r.importance)).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_length_mismatch_falls_back_to_indices() {
    // One vocabulary token lost: 4 names for 5 importances
    let vocab = Vocab(vec!["sql"]);
    let encoder = Categories(vec!["BSc", "MSc"]);
    let categorical = vec!["Education".to_string()];
    let numeric = vec!["Experience (Years)".to_string()];

    let stages = [
        StageKind::TextVectorizing { name: "skills", vocabulary: &vocab },
        StageKind::CategoricalEncoding { name: "Education", encoder: &encoder, columns: &categorical },
        StageKind::Passthrough { columns: &numeric },
    ];

    let table = FeatureNameResolver::new().resolve_stages(&stages, &[0.1, 0.4, 0.2, 0.2, 0.1]);

    let expected: Vec<IndexedImportance> = [(1, 0.4), (2, 0.2), (3, 0.2), (0, 0.1), (4, 0.1)]
        .into_iter()
        .map(|(feature_index, importance)| IndexedImportance { feature_index, importance })
        .collect();
    assert_eq!(table, FeatureNameTable::Indexed(expected));
}

#[test]
fn test_linear_estimator_is_unsupported() {
    let (pipeline, _) = fitted(Estimator::Linear(LinearRegression::new()));
    let result = FeatureNameResolver::new().resolve(&pipeline);
    assert!(matches!(result, Err(ScorerError::UnsupportedModelKind(_))));
}

#[test]
fn test_missing_preprocessor_stage() {
    let (pipeline, _) = fitted(Estimator::RandomForest(RandomForestRegressor::new(5)));
    let result = FeatureNameResolver::new()
        .with_preprocessor_step("columns")
        .resolve(&pipeline);
    assert!(matches!(result, Err(ScorerError::MissingPreprocessorStage(name)) if name == "columns"));
}

#[test]
fn test_no_stages_no_importances() {
    let table = FeatureNameResolver::new().resolve_stages(&[], &[]);
    assert!(table.is_named());
    assert!(table.is_empty());
}

#[test]
fn test_fallback_is_capped() {
    let selection = ColumnSelection::single("Skills");
    let stages = [StageKind::Unknown { columns: &selection }];
    let importances: Vec<f64> = (0..120).map(|i| i as f64 / 120.0).collect();

    let table = FeatureNameResolver::new().resolve_stages(&stages, &importances);
    assert!(!table.is_named());
    assert_eq!(table.len(), FALLBACK_LIMIT);

    let FeatureNameTable::Indexed(rows) = table else {
        panic!("expected indexed table");
    };
    assert_eq!(rows[0].feature_index, 119);
    assert!(rows.windows(2).all(|w| w[0].importance >= w[1].importance));
}

#[test]
fn test_resolution_is_idempotent() {
    let (pipeline, _) = fitted(Estimator::RandomForest(RandomForestRegressor::new(5)));
    let resolver = FeatureNameResolver::new();
    assert_eq!(resolver.resolve(&pipeline).unwrap(), resolver.resolve(&pipeline).unwrap());
}

#[test]
fn test_fitted_pipeline_names_match_encoded_width() {
    let (pipeline, dataset) = fitted(Estimator::RandomForest(RandomForestRegressor::new(10)));
    let width = pipeline.transform(&dataset.features).unwrap().ncols();

    let table = FeatureNameResolver::new().resolve(&pipeline).unwrap();
    assert_eq!(table.len(), width);

    let FeatureNameTable::Named(rows) = &table else {
        panic!("expected named table");
    };
    let names: Vec<&str> = rows.iter().map(|r| r.feature.as_str()).collect();
    assert!(names.contains(&"skills__python"));
    assert!(names.contains(&"education__Education_MBA"));
    assert!(names.contains(&"certs__Certifications_AWS Certified"));
    assert!(names.contains(&"Projects Count"));

    let total: f64 = table.importances().iter().sum();
    assert!((total - 1.0).abs() < 1e-9);

    // Experience and projects drive the target
    let top: Vec<&str> = names.iter().take(3).copied().collect();
    assert!(top.contains(&"Experience (Years)") || top.contains(&"Projects Count"));
}
