//! Ranking of terms by mean TF-IDF weight.

use std::cmp::Ordering;

use serde::Serialize;

use super::matrix::FeatureMatrix;

/// A term and its mean weight across all rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    pub term: String,
    pub mean_weight: f64,
}

/// Return the `n` columns with the highest mean weight, highest first.
///
/// Ties keep column order. If `n` exceeds the column count every column is returned.
pub fn top_features(matrix: &FeatureMatrix, n: usize) -> Vec<RankedFeature> {
    let mut ranked: Vec<RankedFeature> = matrix
        .terms()
        .iter()
        .zip(matrix.column_means())
        .map(|(term, mean_weight)| RankedFeature {
            term: term.clone(),
            mean_weight,
        })
        .collect();

    // `sort_by` is stable, so equal means stay in column order.
    ranked.sort_by(|a, b| {
        b.mean_weight
            .partial_cmp(&a.mean_weight)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}
