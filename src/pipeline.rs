//! End-to-end pipeline: assemble → clean → extract → rank.
//!
//! Every stage consumes its input and hands a new value to the next one.
//! Nothing is kept between runs.

use tracing::info;

use crate::config::Config;
use crate::corpus::{self, AssemblyReport, CleanedCorpus, CleaningReport};
use crate::error::Result;
use crate::features::{self, top_features, FeatureMatrix, RankedFeature, Stopwords, TfidfVectorizer};
use crate::model::corpus::CorpusRow;

/// Results of the feature stages over an already assembled corpus.
#[derive(Debug, Clone)]
pub struct FeatureOutput {
    pub cleaning: CleaningReport,
    pub corpus: CleanedCorpus,
    pub vectorizer: TfidfVectorizer,
    pub matrix: FeatureMatrix,
    pub ranked: Vec<RankedFeature>,
}

/// Results of a full run, including how the corpus was assembled.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub assembly: AssemblyReport,
    pub features: FeatureOutput,
}

/// Run every stage over the directories named in `config`.
///
/// The configuration is validated before any file is read.
pub fn run(config: &Config, progress: Option<&dyn Fn(u64, u64)>) -> Result<PipelineOutput> {
    config.validate()?;
    let stopwords = config.stopwords()?;

    let assembly = corpus::assemble(
        &config.corpus.ham_dir,
        &config.corpus.spam_dir,
        config.corpus.normalize_mode,
        progress,
    )?;

    let features = extract(config, &stopwords, assembly.rows)?;

    Ok(PipelineOutput {
        assembly: assembly.report,
        features,
    })
}

/// Run clean → extract → rank over rows that were assembled or loaded elsewhere.
///
/// Only the `[features]` section is validated; the corpus directories are not read.
pub fn run_from_corpus(config: &Config, rows: Vec<CorpusRow>) -> Result<FeatureOutput> {
    config.validate_features()?;
    let stopwords = config.stopwords()?;
    extract(config, &stopwords, rows)
}

fn extract(config: &Config, stopwords: &Stopwords, rows: Vec<CorpusRow>) -> Result<FeatureOutput> {
    let (cleaned, cleaning) = corpus::clean(rows);

    let (vectorizer, matrix) = features::fit_transform(
        &cleaned,
        config.features.max_features,
        stopwords,
        config.features.min_token_length,
    )?;

    let ranked = top_features(&matrix, config.features.top_n_features);
    info!(
        rows = matrix.n_rows(),
        features = matrix.n_cols(),
        ranked = ranked.len(),
        "Feature extraction complete"
    );

    Ok(FeatureOutput {
        cleaning,
        corpus: cleaned,
        vectorizer,
        matrix,
        ranked,
    })
}
