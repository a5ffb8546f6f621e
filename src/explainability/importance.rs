//! Ranked feature-importance tables

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a named encoded feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedImportance {
    pub feature: String,
    pub importance: f64,
}

/// Importance of an encoded feature known only by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedImportance {
    pub feature_index: usize,
    pub importance: f64,
}

/// Importances sorted by descending value.
///
/// `Named` when every encoded feature got a name, `Indexed` (capped) when
/// names could not be aligned with the importance vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureNameTable {
    Named(Vec<NamedImportance>),
    Indexed(Vec<IndexedImportance>),
}

/// Descending by value; ties keep their original order.
fn rank_desc<T>(rows: &mut [T], importance: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| importance(b).total_cmp(&importance(a)));
}

impl FeatureNameTable {
    /// Pair `names` with `importances` positionally when lengths match,
    /// otherwise fall back to the top `fallback_limit` raw indices.
    pub fn reconcile(names: Vec<String>, importances: &[f64], fallback_limit: usize) -> Self {
        if names.len() == importances.len() {
            let mut rows: Vec<NamedImportance> = names
                .into_iter()
                .zip(importances)
                .map(|(feature, &importance)| NamedImportance { feature, importance })
                .collect();
            rank_desc(&mut rows, |r| r.importance);
            return FeatureNameTable::Named(rows);
        }

        let mut rows: Vec<IndexedImportance> = importances
            .iter()
            .enumerate()
            .map(|(feature_index, &importance)| IndexedImportance {
                feature_index,
                importance,
            })
            .collect();
        rank_desc(&mut rows, |r| r.importance);
        rows.truncate(fallback_limit);
        FeatureNameTable::Indexed(rows)
    }

    pub fn is_named(&self) -> bool {
        matches!(self, FeatureNameTable::Named(_))
    }

    pub fn len(&self) -> usize {
        match self {
            FeatureNameTable::Named(rows) => rows.len(),
            FeatureNameTable::Indexed(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Importances in table order
    pub fn importances(&self) -> Vec<f64> {
        match self {
            FeatureNameTable::Named(rows) => rows.iter().map(|r| r.importance).collect(),
            FeatureNameTable::Indexed(rows) => rows.iter().map(|r| r.importance).collect(),
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Self {
        match self {
            FeatureNameTable::Named(rows) => {
                FeatureNameTable::Named(rows.iter().take(n).cloned().collect())
            }
            FeatureNameTable::Indexed(rows) => {
                FeatureNameTable::Indexed(rows.iter().take(n).cloned().collect())
            }
        }
    }

    /// Two-column frame: `feature,importance` or `feature_index,importance`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = match self {
            FeatureNameTable::Named(rows) => vec![
                Column::new(
                    "feature".into(),
                    rows.iter().map(|r| r.feature.as_str()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "importance".into(),
                    rows.iter().map(|r| r.importance).collect::<Vec<_>>(),
                ),
            ],
            FeatureNameTable::Indexed(rows) => vec![
                Column::new(
                    "feature_index".into(),
                    rows.iter().map(|r| r.feature_index as u64).collect::<Vec<_>>(),
                ),
                Column::new(
                    "importance".into(),
                    rows.iter().map(|r| r.importance).collect::<Vec<_>>(),
                ),
            ],
        };
        Ok(DataFrame::new(columns)?)
    }
}

impl fmt::Display for FeatureNameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (header, keys): (&str, Vec<String>) = match self {
            FeatureNameTable::Named(rows) => {
                ("feature", rows.iter().map(|r| r.feature.clone()).collect())
            }
            FeatureNameTable::Indexed(rows) => (
                "feature_index",
                rows.iter().map(|r| r.feature_index.to_string()).collect(),
            ),
        };

        let width = keys.iter().map(String::len).chain([header.len()]).max().unwrap_or(0);
        write!(f, "{:>width$}  {:>12}", header, "importance", width = width)?;
        for (key, importance) in keys.iter().zip(self.importances()) {
            write!(f, "\n{:>width$}  {:>12.6}", key, importance, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_mode_sorted_with_stable_ties() {
        let table = FeatureNameTable::reconcile(names(&["a", "b", "c"]), &[0.2, 0.5, 0.2], 50);
        assert_eq!(
            table,
            FeatureNameTable::Named(vec![
                NamedImportance { feature: "b".into(), importance: 0.5 },
                NamedImportance { feature: "a".into(), importance: 0.2 },
                NamedImportance { feature: "c".into(), importance: 0.2 },
            ])
        );
    }

    #[test]
    fn test_index_mode_is_capped() {
        let importances: Vec<f64> = (0..80).map(|i| i as f64).collect();
        let table = FeatureNameTable::reconcile(Vec::new(), &importances, 50);

        assert!(!table.is_named());
        assert_eq!(table.len(), 50);
        match table {
            FeatureNameTable::Indexed(rows) => {
                assert_eq!(rows[0].feature_index, 79);
                assert_eq!(rows[49].feature_index, 30);
            }
            FeatureNameTable::Named(_) => unreachable!(),
        }
    }

    #[test]
    fn test_head() {
        let table = FeatureNameTable::reconcile(names(&["a", "b", "c"]), &[0.1, 0.2, 0.3], 50);
        let top = table.head(2);
        assert_eq!(top.importances(), vec![0.3, 0.2]);
        assert_eq!(table.head(10).len(), 3);
    }

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_dataframe_columns() {
        let named = FeatureNameTable::reconcile(names(&["x", "y"]), &[0.4, 0.6], 50);
        let df = named.to_dataframe().unwrap();
        assert_eq!(column_names(&df), vec!["feature", "importance"]);
        assert_eq!(df.height(), 2);

        let indexed = FeatureNameTable::reconcile(names(&["x"]), &[0.4, 0.6], 50);
        let df = indexed.to_dataframe().unwrap();
        assert_eq!(column_names(&df), vec!["feature_index", "importance"]);
    }

    #[test]
    fn test_display_lists_rows() {
        let table = FeatureNameTable::reconcile(names(&["skills__python"]), &[1.0], 50);
        let rendered = table.to_string();
        assert!(rendered.contains("feature"));
        assert!(rendered.contains("skills__python"));
        assert!(rendered.contains("1.000000"));
    }
}
