//! Parser for individual email files (RFC 5322 messages, optionally with an mbox `From ` line).

use std::path::Path;

use mail_parser::MessageParser;
use tracing::debug;

use crate::error::ParseError;
use crate::model::message::RawMessage;
use crate::parser::{body, header};

/// Parse a single email file into a [`RawMessage`].
pub fn parse_message(path: impl AsRef<Path>) -> Result<RawMessage, ParseError> {
    parse_message_sized(path).map(|(msg, _)| msg)
}

/// Like [`parse_message`], also returning the file size in bytes.
pub fn parse_message_sized(path: impl AsRef<Path>) -> Result<(RawMessage, u64), ParseError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let msg = parse_message_bytes(&data)?;
    Ok((msg, data.len() as u64))
}

/// Parse raw message bytes.
///
/// Bytes are decoded as UTF-8; malformed sequences become U+FFFD. Missing
/// headers default to empty strings. Text that does not open with a header
/// field is taken whole as the body. Fails only on blank input or input the
/// MIME parser rejects.
pub fn parse_message_bytes(data: &[u8]) -> Result<RawMessage, ParseError> {
    let text = decode_lossy(data);
    let message_text = header::skip_from_line(&text);

    if message_text.trim().is_empty() {
        return Err(ParseError::InvalidEnvelope("empty file".to_string()));
    }
    if !header::starts_with_field(message_text) {
        debug!("No header block, using the whole text as body");
        return Ok(RawMessage {
            body: message_text.to_string(),
            ..RawMessage::default()
        });
    }

    let headers = header::unfold_headers(header::header_block(message_text));

    let msg = MessageParser::default()
        .parse(message_text.as_bytes())
        .ok_or_else(|| ParseError::InvalidEnvelope("message parser rejected input".into()))?;

    let subject = msg
        .subject()
        .map(str::to_string)
        .or_else(|| header::get_header(&headers, "subject"))
        .unwrap_or_default();

    let sender = msg
        .from()
        .map(header::render_address)
        .filter(|s| !s.is_empty())
        .or_else(|| header::get_header(&headers, "from"))
        .unwrap_or_default();

    let recipient = msg
        .to()
        .map(header::render_address)
        .filter(|s| !s.is_empty())
        .or_else(|| header::get_header(&headers, "to"))
        .unwrap_or_default();

    Ok(RawMessage {
        subject,
        body: body::extract_body(&msg),
        sender,
        recipient,
    })
}

/// Decode bytes as UTF-8, stripping a BOM and replacing malformed sequences.
fn decode_lossy(data: &[u8]) -> String {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(data);
    if had_errors {
        debug!(len = data.len(), "Replaced malformed UTF-8 sequences");
    }
    text.into_owned()
}
