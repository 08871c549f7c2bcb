//! Pipeline configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$SPAMPREP_CONFIG` (environment variable)
//! 2. `~/.config/spamprep/config.toml` (Linux/macOS)
//!    `%APPDATA%\spamprep\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! Command-line flags override individual values after loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::features::tfidf::DEFAULT_MIN_TOKEN_LENGTH;
use crate::features::Stopwords;
use crate::model::email::NormalizeMode;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Input directories and normalization.
    pub corpus: CorpusConfig,
    /// Vectorizer and ranking parameters.
    pub features: FeaturesConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Where the corpus lives and how messages become text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory of ham messages, one file per email.
    pub ham_dir: PathBuf,
    /// Directory of spam messages, one file per email.
    pub spam_dir: PathBuf,
    /// "labeled", "plain" or "structured".
    pub normalize_mode: NormalizeMode,
}

/// Built-in stopword choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StopwordSet {
    #[default]
    English,
    None,
}

/// Vectorizer and ranking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Maximum vocabulary size (must be at least 1).
    pub max_features: usize,
    /// Number of ranked terms to report.
    pub top_n_features: usize,
    /// Shortest token kept by the tokenizer.
    pub min_token_length: usize,
    /// Built-in stopword set.
    pub stopwords: StopwordSet,
    /// Custom stopword file; replaces the built-in set when present.
    pub stopwords_file: Option<PathBuf>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            ham_dir: PathBuf::from("data").join("ham"),
            spam_dir: PathBuf::from("data").join("spam"),
            normalize_mode: NormalizeMode::Labeled,
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            top_n_features: 20,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stopwords: StopwordSet::English,
            stopwords_file: None,
        }
    }
}

// ── Validation ──────────────────────────────────────────────────

impl Config {
    /// Check parameters and input directories before any corpus I/O.
    pub fn validate(&self) -> Result<()> {
        self.validate_features()?;
        for (name, dir) in [
            ("ham_dir", &self.corpus.ham_dir),
            ("spam_dir", &self.corpus.spam_dir),
        ] {
            if !dir.is_dir() {
                return Err(PrepError::Configuration(format!(
                    "{name} '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Check the `[features]` section only.
    pub fn validate_features(&self) -> Result<()> {
        let f = &self.features;
        if f.max_features == 0 {
            return Err(PrepError::Configuration(
                "max_features must be at least 1".to_string(),
            ));
        }
        if f.min_token_length == 0 {
            return Err(PrepError::Configuration(
                "min_token_length must be at least 1".to_string(),
            ));
        }
        if let Some(path) = &f.stopwords_file {
            if !path.is_file() {
                return Err(PrepError::Configuration(format!(
                    "stopwords_file '{}' does not exist",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// The stopword set selected by `[features]`.
    pub fn stopwords(&self) -> Result<Stopwords> {
        match &self.features.stopwords_file {
            Some(path) => Stopwords::from_file(path)
                .map_err(|e| PrepError::Configuration(format!("cannot load stopwords: {e}"))),
            None => Ok(match self.features.stopwords {
                StopwordSet::English => Stopwords::english(),
                StopwordSet::None => Stopwords::none(),
            }),
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location and return the path written.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("SPAMPREP_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("spamprep").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spamprep")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("spamprep.log")
}
