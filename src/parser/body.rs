//! Body extraction: multi-part flattening and HTML-to-text conversion.

use mail_parser::{Message, MessagePart, PartType};

/// Extract the plain-text body of a parsed message.
///
/// Multi-part messages yield their `text/plain` parts in declaration order,
/// joined by `\n`. A multi-part message without any `text/plain` part falls
/// back to its HTML parts converted to text. Parts flagged with an encoding
/// problem are skipped.
pub fn extract_body(msg: &Message<'_>) -> String {
    let Some(root) = msg.parts.first() else {
        return String::new();
    };

    match &root.body {
        PartType::Multipart(_) => {
            let parts = &msg.parts[1..];
            let plain = collect_parts(parts, |part| match &part.body {
                PartType::Text(text) => Some(text.to_string()),
                PartType::Message(inner) => Some(extract_body(inner)),
                _ => None,
            });
            if !plain.is_empty() {
                return plain.join("\n");
            }
            collect_parts(parts, |part| match &part.body {
                PartType::Html(html) => Some(html_to_text(html)),
                _ => None,
            })
            .join("\n")
        }
        _ => single_part_text(root),
    }
}

fn collect_parts<F>(parts: &[MessagePart<'_>], pick: F) -> Vec<String>
where
    F: Fn(&MessagePart<'_>) -> Option<String>,
{
    parts
        .iter()
        .filter(|p| !p.is_encoding_problem)
        .filter_map(pick)
        .collect()
}

fn single_part_text(part: &MessagePart<'_>) -> String {
    if part.is_encoding_problem {
        return String::new();
    }
    match &part.body {
        PartType::Text(text) => text.to_string(),
        PartType::Html(html) => html_to_text(html),
        PartType::Binary(bytes) | PartType::InlineBinary(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        PartType::Message(inner) => extract_body(inner),
        PartType::Multipart(_) => String::new(),
    }
}

/// Convert HTML to plain text.
///
/// Block elements become line breaks, `<script>`/`<style>` blocks are
/// dropped, remaining tags are stripped and common entities decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = remove_tag_block(html, "script");
    text = remove_tag_block(&text, "style");

    for tag in ["br", "br/", "br /", "p", "div", "tr", "li", "h1", "h2", "h3"] {
        for variant in [tag.to_string(), tag.to_uppercase()] {
            text = text.replace(&format!("<{variant}>"), "\n");
            text = text.replace(&format!("</{variant}>"), "\n");
        }
    }

    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                // A tag boundary separates words just like whitespace does.
                in_tag = false;
                stripped.push(' ');
            }
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove an entire tag block (e.g. `<script>…</script>`), case-insensitively.
fn remove_tag_block(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut remaining = html;
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    // ASCII lowercasing keeps byte offsets aligned with the original.
    while let Some(start) = remaining.to_ascii_lowercase().find(&open) {
        result.push_str(&remaining[..start]);
        let after = &remaining[start..];
        match after.to_ascii_lowercase().find(&close) {
            Some(end) => remaining = &after[end + close.len()..],
            None => {
                remaining = "";
                break;
            }
        }
    }
    result.push_str(remaining);
    result
}
