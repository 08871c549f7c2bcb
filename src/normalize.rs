//! Text sanitization shared by every normalization mode.

/// Reduce arbitrary text to lowercase ASCII letters separated by single spaces.
///
/// Every maximal run of characters outside `[A-Za-z]` becomes one space,
/// letters are lowercased, and the result has no leading or trailing space.
/// The output is a fixed point: `normalize_text(&normalize_text(x)) == normalize_text(x)`.
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for ch in input.chars() {
        if ch.is_ascii_alphabetic() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Whether `text` is already in canonical form.
pub fn is_normalized(text: &str) -> bool {
    !text.starts_with(' ')
        && !text.ends_with(' ')
        && !text.contains("  ")
        && text.bytes().all(|b| b.is_ascii_lowercase() || b == b' ')
}
