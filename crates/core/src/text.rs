//! Free-text canonicalization shared by search, filtering and sorting.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonicalize text for matching.
///
/// Lower-cases, turns `-` and `_` into spaces, collapses whitespace runs to a
/// single space and trims both ends. Idempotent.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for word in lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    out
}

/// Normalize optional text; absent input is the empty string.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

/// Sort key for titles and composers.
///
/// Like [`normalize`], then compatibility-decomposed with combining marks
/// dropped, so "Étude" files under "e" and "Ｂach" next to "bach".
pub fn collation_key(s: &str) -> String {
    normalize(s)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Derive a url-style identifier ("swan-lake") from a display title.
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
