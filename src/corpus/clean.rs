//! Missing-value filling and duplicate removal.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::model::corpus::{CorpusRow, Label};
use crate::model::email::StructuredEmail;

/// Corpus rows with no missing `email` and no duplicate rows.
#[derive(Debug, Clone, Default)]
pub struct CleanedCorpus {
    rows: Vec<CorpusRow>,
}

impl CleanedCorpus {
    pub fn rows(&self) -> &[CorpusRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `email` column, in row order.
    pub fn texts(&self) -> Vec<&str> {
        self.rows.iter().map(CorpusRow::text).collect()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.rows.iter().map(|r| r.label).collect()
    }

    pub fn count(&self, label: Label) -> usize {
        self.rows.iter().filter(|r| r.label == label).count()
    }
}

/// Before/after counts from [`clean`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub duplicates_before: usize,
    pub duplicates_after: usize,
}

impl CleaningReport {
    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_before - self.duplicates_after
    }
}

/// Count rows that repeat an earlier row.
fn count_duplicates(rows: &[CorpusRow]) -> usize {
    let mut seen: HashSet<(Option<&str>, Label, Option<&StructuredEmail>)> = HashSet::new();
    rows.iter()
        .filter(|r| !seen.insert((r.email.as_deref(), r.label, r.fields.as_ref())))
        .count()
}

/// Fill missing `email` values with `""` and drop duplicate rows.
///
/// Rows are duplicates when `email`, `label` and the structured fields are all
/// equal. The first occurrence is kept and input order is preserved.
/// Duplicates are counted after the fill, so a missing value and an empty
/// string with the same label count as one duplicate pair.
pub fn clean(rows: Vec<CorpusRow>) -> (CleanedCorpus, CleaningReport) {
    let rows_before = rows.len();
    let missing_before = rows.iter().filter(|r| r.email.is_none()).count();

    let filled: Vec<CorpusRow> = rows
        .into_iter()
        .map(|mut row| {
            row.email.get_or_insert_with(String::new);
            row
        })
        .collect();
    let duplicates_before = count_duplicates(&filled);

    let mut seen: HashSet<(String, Label, Option<StructuredEmail>)> = HashSet::new();
    let deduped: Vec<CorpusRow> = filled
        .into_iter()
        .filter(|r| seen.insert((r.text().to_string(), r.label, r.fields.clone())))
        .collect();

    let report = CleaningReport {
        rows_before,
        rows_after: deduped.len(),
        missing_before,
        missing_after: deduped.iter().filter(|r| r.email.is_none()).count(),
        duplicates_before,
        duplicates_after: count_duplicates(&deduped),
    };

    info!(
        rows_before = report.rows_before,
        rows_after = report.rows_after,
        missing_before = report.missing_before,
        duplicates_removed = report.duplicates_removed(),
        "Cleaned corpus"
    );

    (CleanedCorpus { rows: deduped }, report)
}
