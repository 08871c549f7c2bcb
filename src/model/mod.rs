//! Core data model: parsed messages, normalized emails and corpus rows.

pub mod corpus;
pub mod email;
pub mod message;
