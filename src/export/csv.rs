//! Corpus and feature tables as CSV.
//!
//! Corpus tables have the columns `email,label`, followed by
//! `sender,recipient,subject,body` when the rows were built in structured
//! mode. Feature tables append one column per vocabulary term, in matrix
//! column order.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::corpus::CleanedCorpus;
use crate::error::{PrepError, Result};
use crate::features::FeatureMatrix;
use crate::model::corpus::{CorpusRow, Label};
use crate::model::email::StructuredEmail;

const STRUCTURED_COLUMNS: [&str; 4] = ["sender", "recipient", "subject", "body"];

#[derive(Debug, Deserialize)]
struct CorpusRecordIn {
    email: Option<String>,
    label: Label,
    sender: Option<String>,
    recipient: Option<String>,
    subject: Option<String>,
    body: Option<String>,
}

impl CorpusRecordIn {
    fn into_fields(self) -> StructuredEmail {
        StructuredEmail {
            sender: self.sender.unwrap_or_default(),
            recipient: self.recipient.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
        }
    }
}

/// Write `rows` as a corpus table. Missing values are written as empty cells.
///
/// The structured columns are written when any row carries per-field text.
pub fn write_corpus(rows: &[CorpusRow], output_path: &Path) -> Result<()> {
    let structured = rows.iter().any(|r| r.fields.is_some());
    let empty = StructuredEmail::default();

    let mut writer = csv::Writer::from_path(output_path)?;
    let mut header = vec!["email", "label"];
    if structured {
        header.extend(STRUCTURED_COLUMNS);
    }
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.text(), row.label.as_str()];
        if structured {
            let f = row.fields.as_ref().unwrap_or(&empty);
            record.extend([
                f.sender.as_str(),
                f.recipient.as_str(),
                f.subject.as_str(),
                f.body.as_str(),
            ]);
        }
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| PrepError::io(output_path, e))?;
    info!(
        path = %output_path.display(),
        rows = rows.len(),
        structured,
        "Wrote corpus table"
    );
    Ok(())
}

/// Read a corpus table. Empty `email` cells become missing values.
///
/// When the structured columns are present every row gets its per-field
/// text back, so deduplication matches the run that wrote the table.
/// Each row's source is recorded as `<file>:<line>`.
pub fn read_corpus(input_path: &Path) -> Result<Vec<CorpusRow>> {
    let mut reader = csv::Reader::from_path(input_path)?;
    let headers = reader.headers()?.clone();
    let structured = STRUCTURED_COLUMNS
        .iter()
        .all(|c| headers.iter().any(|h| h == *c));

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<CorpusRecordIn>().enumerate() {
        let mut record = record?;
        let email = record.email.take();
        let label = record.label;
        rows.push(CorpusRow {
            email,
            label,
            fields: structured.then(|| record.into_fields()),
            // Header is line 1.
            source: PathBuf::from(format!("{}:{}", input_path.display(), i + 2)),
        });
    }
    info!(path = %input_path.display(), rows = rows.len(), "Read corpus table");
    Ok(rows)
}

/// Write the cleaned corpus joined with its feature matrix.
pub fn write_feature_table(
    corpus: &CleanedCorpus,
    matrix: &FeatureMatrix,
    output_path: &Path,
) -> Result<()> {
    if corpus.len() != matrix.n_rows() {
        return Err(PrepError::Export(format!(
            "corpus has {} rows but the feature matrix has {}",
            corpus.len(),
            matrix.n_rows()
        )));
    }

    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = vec!["email".to_string(), "label".to_string()];
    header.extend(matrix.terms().iter().cloned());
    writer.write_record(&header)?;

    for (i, row) in corpus.rows().iter().enumerate() {
        let mut record = Vec::with_capacity(matrix.n_cols() + 2);
        record.push(row.text().to_string());
        record.push(row.label.to_string());
        record.extend(matrix.row(i).iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| PrepError::io(output_path, e))?;
    info!(
        path = %output_path.display(),
        rows = corpus.len(),
        columns = matrix.n_cols() + 2,
        "Wrote feature table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::clean;

    fn row(email: &str, label: Label) -> CorpusRow {
        CorpusRow {
            email: Some(email.to_string()),
            label,
            fields: None,
            source: PathBuf::from("mem"),
        }
    }

    #[test]
    fn test_corpus_write_then_read_keeps_missing_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("corpus.csv");
        let mut rows = vec![row("hello world", Label::Ham), row("buy now", Label::Spam)];
        rows.push(CorpusRow {
            email: None,
            ..row("", Label::Spam)
        });

        write_corpus(&rows, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("email,label\n"));
        assert!(text.contains("buy now,spam"));

        let back = read_corpus(&path).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[0].email.as_deref(), Some("hello world"));
        assert_eq!(back[1].label, Label::Spam);
        assert_eq!(back[2].email, None);
        assert!(back[2].source.to_string_lossy().ends_with(":4"));
    }

    #[test]
    fn test_structured_columns_survive_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("structured.csv");
        let fields = StructuredEmail {
            sender: "alice example com".to_string(),
            recipient: String::new(),
            subject: "alpha".to_string(),
            body: "beta gamma".to_string(),
        };
        let rows = vec![
            CorpusRow {
                email: Some(fields.flatten()),
                fields: Some(fields.clone()),
                ..row("", Label::Ham)
            },
            row("plain only", Label::Spam),
        ];

        write_corpus(&rows, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "email,label,sender,recipient,subject,body");
        assert_eq!(
            lines[1],
            "alice example com alpha beta gamma,ham,alice example com,,alpha,beta gamma"
        );
        assert_eq!(lines[2], "plain only,spam,,,,");

        let back = read_corpus(&path).unwrap();
        assert_eq!(back[0].fields.as_ref(), Some(&fields));
        assert_eq!(back[1].fields, Some(StructuredEmail::default()));
    }

    #[test]
    fn test_read_rejects_unknown_label() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.csv");
        std::fs::write(&path, "email,label\nhello,eggs\n").unwrap();
        assert!(matches!(read_corpus(&path), Err(PrepError::Csv(_))));
    }

    #[test]
    fn test_feature_table_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("features.csv");
        let (corpus, _) = clean(vec![row("alpha", Label::Ham), row("beta", Label::Spam)]);
        let matrix = FeatureMatrix::from_rows(
            vec!["alpha".to_string(), "beta".to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        write_feature_table(&corpus, &matrix, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "email,label,alpha,beta");
        assert_eq!(lines[1], "alpha,ham,1,0");
        assert_eq!(lines[2], "beta,spam,0,1");
    }

    #[test]
    fn test_feature_table_row_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let (corpus, _) = clean(vec![row("alpha", Label::Ham)]);
        let matrix = FeatureMatrix::new(vec!["alpha".to_string()], 0, Vec::new()).unwrap();
        let err = write_feature_table(&corpus, &matrix, &tmp.path().join("x.csv")).unwrap_err();
        assert!(matches!(err, PrepError::Export(_)));
    }
}
