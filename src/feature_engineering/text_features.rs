//! Text feature extraction

use crate::error::{ScorerError, Result};
use ndarray::{Array1, Array2};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

/// Word tokens of two or more characters
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static token pattern is valid"))
}

/// Simple text tokenizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextTokenizer {
    lowercase: bool,
    stop_words: Vec<String>,
}

impl TextTokenizer {
    pub fn new() -> Self {
        Self {
            lowercase: true,
            stop_words: Vec::new(),
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_stop_words(mut self, words: &[&str]) -> Self {
        self.stop_words = words.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let processed = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        token_pattern()
            .find_iter(&processed)
            .map(|m| m.as_str())
            .filter(|s| !self.stop_words.iter().any(|w| w == s))
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for TextTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// TF-IDF vectorizer with an alphabetically ordered vocabulary.
///
/// Output column `j` corresponds to the `j`-th term of
/// [`TfidfVectorizer::get_feature_names_out`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    tokenizer: TextTokenizer,
    /// term -> output column
    vocabulary: BTreeMap<String, usize>,
    idf: Option<Array1<f64>>,
    max_features: Option<usize>,
    min_df: usize,
    max_df: f64,
    normalize: bool,
    smooth_idf: bool,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            tokenizer: TextTokenizer::new(),
            vocabulary: BTreeMap::new(),
            idf: None,
            max_features: None,
            min_df: 1,
            max_df: 1.0,
            normalize: true,
            smooth_idf: true,
            sublinear_tf: false,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: TextTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_max_features(mut self, n: usize) -> Self {
        self.max_features = Some(n);
        self
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df.max(1);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.idf.is_some()
    }

    pub fn fit(&mut self, documents: &[String]) -> Result<&mut Self> {
        let n_docs = documents.len();
        if n_docs == 0 {
            return Err(ScorerError::InvalidInput(
                "cannot fit a vectorizer on zero documents".to_string(),
            ));
        }
        let max_df_count = (self.max_df * n_docs as f64).ceil() as usize;

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = self.tokenizer.tokenize(doc);
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<String> = tokens.into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<String> = doc_freq
            .iter()
            .filter(|(_, count)| **count >= self.min_df && **count <= max_df_count)
            .map(|(term, _)| term.clone())
            .collect();

        if kept.is_empty() {
            return Err(ScorerError::DataError(
                "empty vocabulary; documents contain no usable tokens".to_string(),
            ));
        }

        // Most frequent terms win when capped, ties broken alphabetically
        if let Some(max_n) = self.max_features {
            kept.sort_by(|a, b| term_freq[b].cmp(&term_freq[a]).then_with(|| a.cmp(b)));
            kept.truncate(max_n);
        }
        kept.sort();

        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        let n = n_docs as f64;
        let idf: Vec<f64> = self
            .vocabulary
            .keys()
            .map(|term| {
                let df = doc_freq[term] as f64;
                if self.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else {
                    (n / df).ln() + 1.0
                }
            })
            .collect();
        self.idf = Some(Array1::from_vec(idf));

        Ok(self)
    }

    pub fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        let idf = self.idf.as_ref().ok_or(ScorerError::NotFitted)?;

        let n_features = self.vocabulary.len();
        let mut result = Array2::<f64>::zeros((documents.len(), n_features));

        for (doc_idx, doc) in documents.iter().enumerate() {
            for token in self.tokenizer.tokenize(doc) {
                if let Some(&idx) = self.vocabulary.get(&token) {
                    result[[doc_idx, idx]] += 1.0;
                }
            }

            let mut row = result.row_mut(doc_idx);
            if self.sublinear_tf {
                row.mapv_inplace(|v| if v > 0.0 { 1.0 + v.ln() } else { 0.0 });
            }
            row *= idf;

            if self.normalize {
                let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row /= norm;
                }
            }
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Learned vocabulary in output-column order
    pub fn get_feature_names_out(&self) -> Result<Vec<String>> {
        if !self.is_fitted() {
            return Err(ScorerError::NotFitted);
        }
        Ok(self.vocabulary.keys().cloned().collect())
    }

    pub fn n_features_out(&self) -> usize {
        self.vocabulary.len()
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenizer() {
        let tokenizer = TextTokenizer::new();
        let tokens = tokenizer.tokenize("Python, SQL; C++ and a Machine-Learning!");
        assert_eq!(tokens, vec!["python", "sql", "and", "machine", "learning"]);
    }

    #[test]
    fn test_tokenizer_stop_words() {
        let tokenizer = TextTokenizer::new().with_stop_words(&["and"]);
        let tokens = tokenizer.tokenize("python and sql");
        assert_eq!(tokens, vec!["python", "sql"]);
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer
            .fit(&docs(&["SQL, Python", "React, Python", "Java"]))
            .unwrap();

        let names = vectorizer.get_feature_names_out().unwrap();
        assert_eq!(names, vec!["java", "python", "react", "sql"]);
    }

    #[test]
    fn test_transform_rows_are_unit_norm() {
        let corpus = docs(&["python sql", "python java", "react"]);
        let mut vectorizer = TfidfVectorizer::new();
        let x = vectorizer.fit_transform(&corpus).unwrap();

        assert_eq!(x.nrows(), 3);
        assert_eq!(x.ncols(), 4);
        for row in x.rows() {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rare_term_weighs_more() {
        let corpus = docs(&["python sql", "python java", "python react"]);
        let mut vectorizer = TfidfVectorizer::new();
        let x = vectorizer.fit_transform(&corpus).unwrap();

        // "python" appears everywhere, "sql" once
        let python = vectorizer.vocabulary["python"];
        let sql = vectorizer.vocabulary["sql"];
        assert!(x[[0, sql]] > x[[0, python]]);
    }

    #[test]
    fn test_sublinear_tf_dampens_repeats() {
        // Both terms occur in one document of two, so their idf is equal
        let corpus = docs(&["python python python sql", "java"]);
        let mut vectorizer = TfidfVectorizer::new()
            .with_sublinear_tf(true)
            .with_normalize(false);
        let x = vectorizer.fit_transform(&corpus).unwrap();

        let python = vectorizer.vocabulary["python"];
        let sql = vectorizer.vocabulary["sql"];
        let ratio = x[[0, python]] / x[[0, sql]];
        assert!((ratio - (1.0 + 3.0f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_terms_are_ignored() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&docs(&["python sql"])).unwrap();

        let x = vectorizer.transform(&docs(&["golang rust"])).unwrap();
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let corpus = docs(&["python python sql", "python java", "sql"]);
        let mut vectorizer = TfidfVectorizer::new().with_max_features(2);
        vectorizer.fit(&corpus).unwrap();

        assert_eq!(vectorizer.get_feature_names_out().unwrap(), vec!["python", "sql"]);
    }

    #[test]
    fn test_unfitted_vocabulary_fails() {
        let vectorizer = TfidfVectorizer::new();
        assert!(matches!(
            vectorizer.get_feature_names_out(),
            Err(ScorerError::NotFitted)
        ));
    }
}
