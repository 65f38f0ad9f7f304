//! Canonical cache key derivation.

use sha2::{Digest, Sha256};

use crate::model::Query;

/// Key used when no field of the query is present.
pub const EMPTY_KEY: &str = "empty";

const SEPARATOR: char = '|';

/// Derive the cache key for a query.
///
/// Present fields are emitted as `kw:`, `loc:` and `q:` segments in that
/// fixed order and joined by `|`. Separators and backslashes inside values are
/// escaped so distinct queries can never collide.
pub fn derive_key(query: &Query) -> String {
    let segments: Vec<String> = [("kw", query.keywords()), ("loc", query.location()), ("q", query.query())]
        .into_iter()
        .filter_map(|(tag, value)| value.map(|v| format!("{tag}:{}", escape(v))))
        .collect();

    if segments.is_empty() { EMPTY_KEY.to_string() } else { segments.join(&SEPARATOR.to_string()) }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == SEPARATOR {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// SHA-256 fingerprint of a cache key, for log fields.
pub fn key_fingerprint(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
