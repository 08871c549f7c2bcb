//! Feature extraction: stopwords, TF-IDF vectorization and term ranking.

pub mod matrix;
pub mod rank;
pub mod stopwords;
pub mod tfidf;

pub use matrix::FeatureMatrix;
pub use rank::{top_features, RankedFeature};
pub use stopwords::Stopwords;
pub use tfidf::{fit_transform, TfidfVectorizer};
