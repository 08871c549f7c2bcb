//! Run summaries and ranked features as JSON.

use std::path::Path;

use crate::corpus::{AssemblyReport, CleaningReport};
use crate::error::{PrepError, Result};
use crate::features::RankedFeature;
use crate::model::corpus::Label;
use crate::pipeline::{FeatureOutput, PipelineOutput};

/// Summary of the feature stages: cleaning counts, matrix shape and ranking.
pub fn features_json(output: &FeatureOutput) -> serde_json::Value {
    serde_json::json!({
        "rows": output.corpus.len(),
        "rows_by_label": {
            "ham": output.corpus.count(Label::Ham),
            "spam": output.corpus.count(Label::Spam),
        },
        "cleaning": cleaning_json(&output.cleaning),
        "vocabulary_size": output.matrix.n_cols(),
        "top_features": output.ranked,
    })
}

/// Summary of a full run, including assembly counts.
pub fn summary_json(output: &PipelineOutput) -> serde_json::Value {
    let mut value = features_json(&output.features);
    value["assembly"] = assembly_json(&output.assembly);
    value
}

pub fn assembly_json(report: &AssemblyReport) -> serde_json::Value {
    serde_json::json!({
        "files": {
            "ham": report.ham_files,
            "spam": report.spam_files,
        },
        "parsed": {
            "ham": report.ham_rows,
            "spam": report.spam_rows,
        },
        "bytes_read": report.bytes_read,
        "skipped": report.skipped,
    })
}

fn cleaning_json(report: &CleaningReport) -> serde_json::Value {
    serde_json::json!({
        "rows_before": report.rows_before,
        "rows_after": report.rows_after,
        "missing_before": report.missing_before,
        "missing_after": report.missing_after,
        "duplicates_before": report.duplicates_before,
        "duplicates_after": report.duplicates_after,
    })
}

/// Write the ranked features as a pretty-printed JSON array.
pub fn write_ranked(ranked: &[RankedFeature], output_path: &Path) -> Result<()> {
    let contents =
        serde_json::to_string_pretty(ranked).map_err(|e| PrepError::Export(e.to_string()))?;
    std::fs::write(output_path, contents).map_err(|e| PrepError::io(output_path, e))
}
