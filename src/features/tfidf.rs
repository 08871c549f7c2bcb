//! TF-IDF vectorization over the cleaned corpus.
//!
//! Weighting:
//!
//! ```text
//! tf(t, d)  = number of occurrences of t in d
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row scaled to unit L2 norm
//! ```
//!
//! Vocabulary selection keeps the `max_features` terms with the highest
//! document frequency, ties broken by ascending term. The selected terms
//! are then laid out as columns in ascending alphabetical order.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::matrix::FeatureMatrix;
use super::stopwords::Stopwords;
use crate::corpus::CleanedCorpus;
use crate::error::{PrepError, Result};

/// Default minimum token length in characters.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 2;

/// Split `text` on non-letter boundaries and lowercase each token.
///
/// Tokens shorter than `min_length` are dropped.
pub fn tokenize(text: &str, min_length: usize) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(move |t| !t.is_empty() && t.len() >= min_length)
        .map(str::to_ascii_lowercase)
}

/// Learns a vocabulary and IDF weights, then maps texts to TF-IDF rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
    min_token_length: usize,
    stop_words: Stopwords,
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    doc_freq: Vec<usize>,
    n_documents: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: None,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stop_words: Stopwords::none(),
            vocabulary: Vec::new(),
            index: HashMap::new(),
            idf: Vec::new(),
            doc_freq: Vec::new(),
            n_documents: 0,
        }
    }

    /// Cap the vocabulary at `max_features` terms.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    #[must_use]
    pub fn with_stop_words(mut self, stop_words: Stopwords) -> Self {
        self.stop_words = stop_words;
        self
    }

    #[must_use]
    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.min_token_length = min_token_length.max(1);
        self
    }

    fn terms_of<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        tokenize(text, self.min_token_length).filter(move |t| !self.stop_words.contains(t))
    }

    /// Learn the vocabulary and IDF weights from `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if self.max_features == Some(0) {
            return Err(PrepError::InvalidParameter(
                "max_features must be at least 1".to_string(),
            ));
        }
        if documents.is_empty() {
            return Err(PrepError::EmptyVocabulary(
                "the corpus has no rows".to_string(),
            ));
        }

        let mut df_map: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = self.terms_of(doc.as_ref()).collect();
            for term in unique {
                *df_map.entry(term).or_insert(0) += 1;
            }
        }

        if df_map.is_empty() {
            return Err(PrepError::EmptyVocabulary(format!(
                "no terms remain in {} rows after tokenization and stopword removal",
                documents.len()
            )));
        }

        let candidates = df_map.len();
        let mut selected: Vec<(String, usize)> = df_map.into_iter().collect();
        selected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(max) = self.max_features {
            selected.truncate(max);
        }
        selected.sort_by(|a, b| a.0.cmp(&b.0));

        let n = documents.len() as f64;
        self.n_documents = documents.len();
        self.idf = selected
            .iter()
            .map(|(_, df)| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        self.doc_freq = selected.iter().map(|(_, df)| *df).collect();
        self.vocabulary = selected.into_iter().map(|(term, _)| term).collect();
        self.index = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        info!(
            documents = self.n_documents,
            candidates,
            vocabulary = self.vocabulary.len(),
            "Fitted TF-IDF vocabulary"
        );
        Ok(())
    }

    /// Map `documents` to L2-normalized TF-IDF rows over the fitted vocabulary.
    ///
    /// Terms outside the vocabulary are ignored; a row with no known term is all zeros.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<FeatureMatrix> {
        if self.vocabulary.is_empty() {
            return Err(PrepError::EmptyVocabulary(
                "the vectorizer has not been fitted".to_string(),
            ));
        }

        let n_cols = self.vocabulary.len();
        let mut data = vec![0.0; documents.len() * n_cols];

        for (row, doc) in documents.iter().enumerate() {
            let cells = &mut data[row * n_cols..(row + 1) * n_cols];
            for term in self.terms_of(doc.as_ref()) {
                if let Some(&col) = self.index.get(&term) {
                    cells[col] += 1.0;
                }
            }
            for (cell, idf) in cells.iter_mut().zip(&self.idf) {
                *cell *= idf;
            }
            let norm = cells.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                cells.iter_mut().for_each(|v| *v /= norm);
            } else {
                debug!(row, "Row has no vocabulary terms");
            }
        }

        FeatureMatrix::new(self.vocabulary.clone(), documents.len(), data)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<FeatureMatrix> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Fitted vocabulary in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.index.get(term).map(|&i| self.doc_freq[i])
    }

    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&i| self.idf[i])
    }

    /// Number of documents seen by the last `fit`.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

/// Fit a vectorizer over the corpus `email` column and return it with the feature matrix.
pub fn fit_transform(
    corpus: &CleanedCorpus,
    max_features: usize,
    stopwords: &Stopwords,
    min_token_length: usize,
) -> Result<(TfidfVectorizer, FeatureMatrix)> {
    let mut vectorizer = TfidfVectorizer::new()
        .with_max_features(max_features)
        .with_min_token_length(min_token_length)
        .with_stop_words(stopwords.clone());
    let matrix = vectorizer.fit_transform(&corpus.texts())?;
    Ok((vectorizer, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_tokenize_boundaries_and_min_length() {
        let tokens: Vec<String> = tokenize("Hello, a WORLD!! x2yz", 2).collect();
        assert_eq!(tokens, vec!["hello", "world", "yz"]);
        let all: Vec<String> = tokenize("a b", 1).collect();
        assert_eq!(all, vec!["a", "b"]);
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let mut v = TfidfVectorizer::new();
        v.fit(&["zeta alpha", "mid alpha"]).unwrap();
        assert_eq!(v.vocabulary(), &["alpha", "mid", "zeta"]);
        assert_eq!(v.document_frequency("alpha"), Some(2));
        assert_eq!(v.n_documents(), 2);
    }

    #[test]
    fn test_max_features_keeps_highest_df_with_alphabetical_ties() {
        let docs = ["common bb aa", "common dd", "common cc"];
        let mut v = TfidfVectorizer::new().with_max_features(3);
        v.fit(&docs).unwrap();
        // common has df 3; aa, bb, cc, dd tie at 1 and the first two alphabetically win.
        assert_eq!(v.vocabulary(), &["aa", "bb", "common"]);
    }

    #[test]
    fn test_stop_words_are_excluded() {
        let mut v = TfidfVectorizer::new().with_stop_words(Stopwords::english());
        v.fit(&["the money is here", "send the money"]).unwrap();
        assert_eq!(v.vocabulary(), &["money", "send"]);
    }

    #[test]
    fn test_idf_values() {
        let mut v = TfidfVectorizer::new();
        v.fit(&["everywhere rare", "everywhere"]).unwrap();
        // present in every document: ln(3/3) + 1 = 1
        assert!((v.idf_of("everywhere").unwrap() - 1.0).abs() < EPS);
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((v.idf_of("rare").unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_rows_are_unit_norm_and_in_range() {
        let docs = ["buy now buy now", "hello world", "hello there", ""];
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&docs).unwrap();
        assert_eq!(m.n_rows(), 4);
        for r in 0..3 {
            let norm: f64 = m.row(r).iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < EPS, "row {r} norm {norm}");
            assert!(m.row(r).iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
        assert!(m.row(3).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_single_row_weights() {
        let mut v = TfidfVectorizer::new();
        let m = v.fit_transform(&["buy now buy now"]).unwrap();
        let expected = 1.0 / 2f64.sqrt();
        assert!((m.get(0, 0) - expected).abs() < EPS);
        assert!((m.get(0, 1) - expected).abs() < EPS);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let mut v = TfidfVectorizer::new();
        v.fit(&["alpha beta", "beta gamma"]).unwrap();
        let m = v.transform(&["unknown words only", "alpha"]).unwrap();
        assert!(m.row(0).iter().all(|&x| x == 0.0));
        let col = m.column_index("alpha").unwrap();
        assert!((m.get(1, col) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_empty_corpus_is_empty_vocabulary() {
        let mut v = TfidfVectorizer::new();
        let docs: [&str; 0] = [];
        assert!(matches!(v.fit(&docs), Err(PrepError::EmptyVocabulary(_))));
    }

    #[test]
    fn test_only_stop_words_is_empty_vocabulary() {
        let mut v = TfidfVectorizer::new().with_stop_words(Stopwords::english());
        let err = v.fit(&["the and of", "", "a"]).unwrap_err();
        assert!(matches!(err, PrepError::EmptyVocabulary(_)));
    }

    #[test]
    fn test_zero_max_features_is_rejected() {
        let mut v = TfidfVectorizer::new().with_max_features(0);
        assert!(matches!(
            v.fit(&["hello"]),
            Err(PrepError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let v = TfidfVectorizer::new();
        assert!(v.transform(&["hello"]).is_err());
    }

    #[test]
    fn test_fit_transform_over_cleaned_corpus() {
        use crate::corpus::clean;
        use crate::model::corpus::{CorpusRow, Label};

        let row = |text: &str, label| CorpusRow {
            email: Some(text.to_string()),
            label,
            fields: None,
            source: "mem".into(),
        };
        let (corpus, _) = clean(vec![
            row("the cheap pills", Label::Spam),
            row("the quarterly report", Label::Ham),
            row("the cheap pills", Label::Spam),
            row("go ok report", Label::Ham),
        ]);

        let (vectorizer, matrix) = fit_transform(&corpus, 3, &Stopwords::english(), 3).unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 3);
        // "report" has the highest df; "cheap" and "pills" win the tie over "quarterly".
        assert_eq!(vectorizer.vocabulary(), ["cheap", "pills", "report"]);
        assert_eq!(vectorizer.n_documents(), 3);
        // "go" and "ok" are below the minimum token length.
        assert!(vectorizer.document_frequency("go").is_none());
        assert!(matrix.row(2).iter().all(|&x| x == 0.0 || (x - 1.0).abs() < EPS));
    }
}
