//! Parse result for a single email file.

/// The four fields the pipeline reads from a message.
///
/// Built once per file by the parser and discarded after normalization.
/// Absent headers are empty strings, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    /// Decoded `Subject:` header.
    pub subject: String,

    /// Plain-text body. Multi-part segments are joined with `\n`.
    pub body: String,

    /// Rendered `From:` header (`Name <addr>`, comma separated).
    pub sender: String,

    /// Rendered `To:` header (`Name <addr>`, comma separated).
    pub recipient: String,
}
