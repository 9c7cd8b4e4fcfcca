//! Canonical storage identifiers derived from raw header text.
//!
//! Headers arrive from untrusted files, so everything that ends up in a SQL
//! statement flows through one of the two functions here: raw names are
//! rewritten into a lowercase snake_case form, and any identifier that is
//! spliced into statement text is double-quoted.

use std::sync::OnceLock;

use regex::Regex;

static NON_ALNUM: OnceLock<Regex> = OnceLock::new();

/// Rewrites a raw column header into a storage-safe identifier: lowercase,
/// every maximal run of characters outside `[a-z0-9]` collapsed to a single
/// `_`, leading and trailing `_` stripped.
///
/// Total and idempotent: any input produces a (possibly empty) result, and
/// `normalize_identifier(normalize_identifier(x)) == normalize_identifier(x)`.
/// Callers must treat an empty result as a configuration error.
pub fn normalize_identifier(raw: &str) -> String {
    let pattern = NON_ALNUM.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static pattern"));
    let lowered = raw.to_lowercase();
    pattern
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Quotes an identifier for use in statement text, doubling any embedded
/// double quotes. Never splice file-derived text into SQL without this.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
