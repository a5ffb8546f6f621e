//! Data loading utilities

use crate::error::{Result, ScorerError};
use crate::preprocessing::numeric_values;
use ndarray::Array1;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Free-text skills field
pub const SKILLS: &str = "Skills";
pub const EXPERIENCE: &str = "Experience (Years)";
pub const EDUCATION: &str = "Education";
pub const CERTIFICATIONS: &str = "Certifications";
pub const PROJECTS: &str = "Projects Count";
pub const SALARY: &str = "Salary Expectation ($)";
/// Regression target
pub const TARGET: &str = "AI Score (0-100)";

/// Model inputs, in dataset order
pub const FEATURE_COLUMNS: [&str; 6] = [SKILLS, EXPERIENCE, EDUCATION, CERTIFICATIONS, PROJECTS, SALARY];

/// Load a CSV file with a header row
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScorerError::DataError(format!(
            "dataset not found at: {}",
            path.display()
        )));
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| ScorerError::DataError(e.to_string()))
}

/// Write a frame as CSV, creating parent directories
pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| ScorerError::DataError(e.to_string()))
}

/// Feature frame plus regression target
#[derive(Debug, Clone)]
pub struct ResumeDataset {
    pub features: DataFrame,
    pub target: Array1<f64>,
}

impl ResumeDataset {
    /// Load the résumé CSV and select the model columns
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let df = load_csv(path)?;
        Self::from_frame(&df)
    }

    /// Select feature columns and target from a raw frame
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let features = df
            .select(FEATURE_COLUMNS)
            .map_err(|e| ScorerError::FeatureNotFound(e.to_string()))?;
        let target: Array1<f64> = numeric_values(df, TARGET)?.into();

        if target.iter().any(|v| v.is_nan()) {
            return Err(ScorerError::DataError(format!(
                "target column '{}' contains missing values",
                TARGET
            )));
        }

        Ok(Self { features, target })
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let idx = IdxCa::from_vec(
            "idx".into(),
            indices.iter().map(|&i| i as IdxSize).collect(),
        );
        let features = self.features.take(&idx)?;
        let target = indices.iter().map(|&i| self.target[i]).collect();
        Ok(Self { features, target })
    }
}

/// A single résumé as submitted for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub skills: String,
    pub experience: f64,
    pub education: String,
    pub certifications: String,
    pub projects: i64,
    pub salary: f64,
}

impl ResumeRecord {
    /// Score free text with the portal's fixed profile
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            skills: text.into(),
            experience: 2.0,
            education: "B.Tech".to_string(),
            certifications: "AWS Certified".to_string(),
            projects: 3,
            salary: 60000.0,
        }
    }

    /// One-row frame with the dataset column names
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(SKILLS.into(), vec![self.skills.as_str()]),
            Column::new(EXPERIENCE.into(), vec![self.experience]),
            Column::new(EDUCATION.into(), vec![self.education.as_str()]),
            Column::new(CERTIFICATIONS.into(), vec![self.certifications.as_str()]),
            Column::new(PROJECTS.into(), vec![self.projects]),
            Column::new(SALARY.into(), vec![self.salary]),
        ])?;
        Ok(df)
    }
}

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seeded shuffle split.
///
/// The test side holds `ceil(test_size * n)` rows, the train side the rest.
/// The same `(n, test_size, seed)` always yields the same partition.
pub fn train_test_split(n_samples: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ScorerError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(ScorerError::InvalidInput(format!(
            "test_size {} leaves an empty side for {} samples",
            test_size, n_samples
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit { train, test: indices })
}
