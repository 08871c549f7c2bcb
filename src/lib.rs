//! `spamprep`: preprocessing and feature extraction for labeled email corpora.
//!
//! The library turns two directories of raw messages (ham and spam) into a
//! cleaned, deduplicated table of normalized text and a TF-IDF feature matrix
//! ready for a downstream classifier.

pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod features;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod pipeline;
