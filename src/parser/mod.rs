//! Email parsing: envelope detection, header rendering and body extraction.

pub mod body;
pub mod header;
pub mod message;

pub use message::{parse_message, parse_message_bytes, parse_message_sized};
