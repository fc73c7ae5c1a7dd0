//! Filename sanitization for untrusted upload names.

use docsentry_core::SanitizedName;
use unicode_normalization::UnicodeNormalization;

const TRAVERSAL_TOKENS: [&str; 3] = ["..", "/", "\\"];

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-')
}

/// Normalize an attacker-controlled filename into a safe display name.
///
/// Compatibility decomposition runs first so fullwidth and ligature forms
/// collapse to ASCII before filtering. Traversal tokens are removed until none
/// remain, since a single pass over `....//` would splice a new `../`.
pub fn sanitize_filename(raw: &str) -> SanitizedName {
    let mut name: String = raw.nfkd().collect();

    while TRAVERSAL_TOKENS.iter().any(|t| name.contains(t)) {
        for token in TRAVERSAL_TOKENS {
            name = name.replace(token, "");
        }
    }

    let name: String = name
        .chars()
        .map(|c| if is_allowed_char(c) { c } else { '_' })
        .take(SanitizedName::MAX_LEN)
        .collect();

    let trimmed = name.trim();
    if trimmed.is_empty() {
        SanitizedName::placeholder()
    } else {
        SanitizedName::from_sanitized(trimmed.to_string())
    }
}
