//! Feature engineering
//!
//! Text vectorization for free-text résumé fields.

mod text_features;

pub use text_features::{TextTokenizer, TfidfVectorizer};
