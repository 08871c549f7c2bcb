//! Corpus rows and labels.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::email::{NormalizedEmail, StructuredEmail};

/// Class of a corpus row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ham" => Ok(Self::Ham),
            "spam" => Ok(Self::Spam),
            other => Err(format!("unknown label '{other}' (expected ham or spam)")),
        }
    }
}

/// One email in the corpus table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
    /// Flattened normalized text. `None` is a missing value, e.g. an empty
    /// cell in a corpus table read back from disk.
    pub email: Option<String>,

    pub label: Label,

    /// Per-field text, present only when the corpus was built in structured mode.
    pub fields: Option<StructuredEmail>,

    /// File the row came from. Provenance only, not a data column.
    pub source: PathBuf,
}

impl CorpusRow {
    pub fn new(email: NormalizedEmail, label: Label, source: impl Into<PathBuf>) -> Self {
        Self {
            email: Some(email.flattened()),
            fields: email.fields().cloned(),
            label,
            source: source.into(),
        }
    }

    /// The `email` value, empty when missing.
    pub fn text(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}
