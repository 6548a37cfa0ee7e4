//! Whitespace canonicalization for definition comparison.
//!
//! Two definitions are considered equal when they match after
//! [`normalize`]. Normalization is applied to comparison inputs only; the
//! remediation script always carries the raw definition text.

/// Canonicalize whitespace in a definition.
///
/// Applied in order: tabs become single spaces, runs of two or more spaces
/// collapse to one (repeatedly, until none remain), CRLF line endings become
/// LF, every line is trimmed, and the whole result is trimmed. Casing,
/// identifiers, comment text, and token order are left untouched.
///
/// The function is idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let mut result = raw.replace('\t', " ");

    while result.contains("  ") {
        result = result.replace("  ", " ");
    }

    let result = result.replace("\r\n", "\n");

    let lines: Vec<&str> = result.split('\n').map(str::trim).collect();

    lines.join("\n").trim().to_string()
}
