//! Data preprocessing module
//!
//! Column-level transformers fitted on a polars [`DataFrame`] and emitting
//! dense `ndarray` matrices:
//! - One-hot encoding for categorical columns
//! - Standard scaling for numeric columns
//! - A column transformer composing named stages side by side

mod column_transformer;
mod encoder;
mod scaler;

pub use column_transformer::{ColumnSelection, ColumnStage, ColumnTransformer, Transformer};
pub use encoder::{HandleUnknown, OneHotEncoder};
pub use scaler::StandardScaler;

use crate::error::{Result, ScorerError};
use polars::prelude::*;

/// Category label used for missing values
pub const MISSING_CATEGORY: &str = "nan";

fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|column| column.as_materialized_series())
        .map_err(|_| ScorerError::FeatureNotFound(name.to_string()))
}

/// Read a column as strings, mapping nulls to [`MISSING_CATEGORY`].
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = column_series(df, name)?;
    let casted = series.cast(&DataType::String)?;
    let ca = casted.str()?;

    Ok(ca
        .into_iter()
        .map(|v| v.map_or_else(|| MISSING_CATEGORY.to_string(), str::to_string))
        .collect())
}

/// Read a column as free text, mapping nulls to the empty string.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = column_series(df, name)?;
    let casted = series.cast(&DataType::String)?;
    let ca = casted.str()?;

    Ok(ca
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

/// Read a column as `f64`, mapping nulls to NaN.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = column_series(df, name)?;
    let casted = series
        .cast(&DataType::Float64)
        .map_err(|e| ScorerError::DataError(format!("column '{}' is not numeric: {}", name, e)))?;
    let ca = casted.f64()?;

    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_values_maps_nulls() {
        let df = df!("Certifications" => &[Some("AWS Certified"), None]).unwrap();
        let values = string_values(&df, "Certifications").unwrap();
        assert_eq!(values, vec!["AWS Certified", MISSING_CATEGORY]);
    }

    #[test]
    fn test_numeric_values_casts_integers() {
        let df = df!("Projects Count" => &[3i64, 7]).unwrap();
        let values = numeric_values(&df, "Projects Count").unwrap();
        assert_eq!(values, vec![3.0, 7.0]);
    }

    #[test]
    fn test_missing_column() {
        let df = df!("a" => &[1.0]).unwrap();
        assert!(matches!(
            numeric_values(&df, "b"),
            Err(ScorerError::FeatureNotFound(_))
        ));
    }
}
