//! Header block detection and header value rendering.

use mail_parser::{Addr, Address};

/// Skip the `From ` separator line that mbox-derived corpus files start with.
pub fn skip_from_line(text: &str) -> &str {
    if text.starts_with("From ") {
        match text.find('\n') {
            Some(pos) => &text[pos + 1..],
            None => "",
        }
    } else {
        text
    }
}

/// Whether the first line of `text` is a `name: value` header field.
pub fn starts_with_field(text: &str) -> bool {
    let first = text.lines().next().unwrap_or("");
    first
        .find(':')
        .is_some_and(|pos| is_field_name(&first[..pos]))
}

/// Return the header block: everything before the first blank line.
pub fn header_block(text: &str) -> &str {
    let lf = text.find("\n\n");
    let crlf = text.find("\r\n\r\n");
    match (lf, crlf) {
        (Some(a), Some(b)) => &text[..a.min(b)],
        (Some(a), None) => &text[..a],
        (None, Some(b)) => &text[..b],
        (None, None) => text,
    }
}

/// Unfold headers: join continuation lines (starting with space or tab) with the previous header.
///
/// Returns `(lowercase_name, raw_value)` pairs. Lines that are neither a
/// continuation nor a `name: value` field are dropped.
pub fn unfold_headers(block: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in block.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
        } else if let Some(colon_pos) = line.find(':') {
            let name = &line[..colon_pos];
            if is_field_name(name) {
                result.push((name.to_lowercase(), line[colon_pos + 1..].trim().to_string()));
            }
        }
    }

    result
}

/// RFC 5322 field names: one or more printable ASCII characters except colon and space.
fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (33..=126).contains(&b) && b != b':')
}

/// Get the first value for a header name (case-insensitive).
pub fn get_header(headers: &[(String, String)], name: &str) -> Option<String> {
    let name = name.to_lowercase();
    headers
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.clone())
}

/// Render an address header as `Name <addr>` items joined by `", "`.
pub fn render_address(address: &Address<'_>) -> String {
    let addrs: Vec<String> = match address {
        Address::List(list) => list.iter().map(render_addr).collect(),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter().map(render_addr))
            .collect(),
    };
    addrs
        .into_iter()
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_addr(addr: &Addr<'_>) -> String {
    let name = addr.name.as_deref().unwrap_or("").trim();
    let email = addr.address.as_deref().unwrap_or("").trim();
    match (name.is_empty(), email.is_empty()) {
        (false, false) => format!("{name} <{email}>"),
        (false, true) => name.to_string(),
        (true, _) => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_from_line() {
        let text = "From user@example.com Thu Jan 01 00:00:00 2024\nSubject: Test\n\nBody\n";
        assert!(skip_from_line(text).starts_with("Subject:"));
    }

    #[test]
    fn test_skip_from_line_keeps_from_header() {
        let text = "From: a@b.com\n\nBody\n";
        assert_eq!(skip_from_line(text), text);
    }

    #[test]
    fn test_header_block_lf_and_crlf() {
        assert_eq!(header_block("A: 1\nB: 2\n\nBody"), "A: 1\nB: 2");
        assert_eq!(header_block("A: 1\r\nB: 2\r\n\r\nBody"), "A: 1\r\nB: 2");
        assert_eq!(header_block("A: 1"), "A: 1");
    }

    #[test]
    fn test_unfold_headers_continuation() {
        let headers = unfold_headers("Subject: first\n  second\nFrom: a@b.com");
        assert_eq!(headers[0], ("subject".to_string(), "first second".to_string()));
        assert_eq!(get_header(&headers, "FROM").as_deref(), Some("a@b.com"));
        assert_eq!(get_header(&headers, "to"), None);
    }

    #[test]
    fn test_unfold_headers_rejects_prose() {
        let headers = unfold_headers("hello there, this is: not a header");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_starts_with_field() {
        assert!(starts_with_field("Subject: hi\n\nbody"));
        assert!(starts_with_field("X-Spam-Flag:YES\n"));
        assert!(!starts_with_field("hello world"));
        assert!(!starts_with_field("Hi Bob, note: lunch\nSubject: x\n"));
        assert!(!starts_with_field("\nSubject: late\n"));
    }
}
