//! Persisted artifacts: CSV tables and JSON summaries.

pub mod csv;
pub mod json;
