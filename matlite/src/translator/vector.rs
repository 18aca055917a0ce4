//! Bracketed vector literals: `[1 2 -3]` → `[1, 2, -3]`

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\s,]+").expect("separator pattern is valid"))
}

fn negative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r",\s*-").expect("negative pattern is valid"))
}

/// Pattern for one bracketed span; nested brackets are not supported
pub const VECTOR_PATTERN: &str = r"\[([^\]]+)\]";

/// Normalize the body of one bracketed literal (without the brackets)
///
/// Runs of whitespace and commas collapse to a single `, ` separator, and a separator in
/// front of a minus sign keeps the minus attached to the number after it.
pub fn normalize_vector_body(body: &str) -> String {
    let body = body.trim_matches(|c: char| c.is_whitespace() || c == ',');
    let separated = separator_pattern().replace_all(body, ", ");
    let tightened = negative_pattern().replace_all(&separated, ", -");
    format!("[{}]", tightened)
}

/// Rule production: normalize the captured body of a `[...]` span
pub(crate) fn rewrite_vector(caps: &Captures<'_>) -> String {
    normalize_vector_body(&caps[1])
}

/// Normalize every bracketed span on a line independently
pub fn normalize_vectors(line: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(VECTOR_PATTERN).expect("vector pattern is valid"))
        .replace_all(line, |caps: &Captures<'_>| rewrite_vector(caps))
        .into_owned()
}
