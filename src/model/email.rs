//! Normalized email representations.
//!
//! Normalization happens once, at construction. The stored strings are
//! already in canonical form (`a-z` and single spaces).

use serde::{Deserialize, Serialize};

use super::message::RawMessage;
use crate::normalize::normalize_text;

/// How a [`RawMessage`] is turned into corpus text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeMode {
    /// `"Subject: {s} From: {f} To: {t} {body}"`, sanitized as one string.
    #[default]
    Labeled,
    /// `"{s} {body} {f} {t}"`, sanitized as one string, no field labels.
    Plain,
    /// Each field sanitized on its own; see [`StructuredEmail`].
    Structured,
}

/// The four message fields, each normalized independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl StructuredEmail {
    pub fn from_raw(raw: &RawMessage) -> Self {
        Self {
            sender: normalize_text(&raw.sender),
            recipient: normalize_text(&raw.recipient),
            subject: normalize_text(&raw.subject),
            body: normalize_text(&raw.body),
        }
    }

    /// Join the non-empty fields (sender, recipient, subject, body) with single spaces.
    pub fn flatten(&self) -> String {
        [&self.sender, &self.recipient, &self.subject, &self.body]
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A message after normalization, in one of the two supported shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedEmail {
    Flat(String),
    Structured(StructuredEmail),
}

impl NormalizedEmail {
    pub fn from_raw(raw: &RawMessage, mode: NormalizeMode) -> Self {
        match mode {
            NormalizeMode::Labeled => Self::Flat(normalize_text(&format!(
                "Subject: {} From: {} To: {} {}",
                raw.subject, raw.sender, raw.recipient, raw.body
            ))),
            NormalizeMode::Plain => Self::Flat(normalize_text(&format!(
                "{} {} {} {}",
                raw.subject, raw.body, raw.sender, raw.recipient
            ))),
            NormalizeMode::Structured => Self::Structured(StructuredEmail::from_raw(raw)),
        }
    }

    /// The single-string form stored in the corpus `email` column.
    pub fn flattened(&self) -> String {
        match self {
            Self::Flat(text) => text.clone(),
            Self::Structured(fields) => fields.flatten(),
        }
    }

    pub fn fields(&self) -> Option<&StructuredEmail> {
        match self {
            Self::Flat(_) => None,
            Self::Structured(fields) => Some(fields),
        }
    }
}
