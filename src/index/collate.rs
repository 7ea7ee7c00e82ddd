//! Locale-tolerant ordering of index keys.
//!
//! Keys are compared on their NFD decomposition with combining marks removed
//! and case folded, so `Élan` sorts with `elan`. Equal primary keys fall back
//! to comparing the original strings.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Primary comparison key of a string.
pub fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two strings by primary key, then by their original form.
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Compare ordered key lists position by position.
///
/// At each position a present key sorts before an absent one.
pub fn compare_keys(a: &[Option<&str>], b: &[Option<&str>]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x, y) {
            (Some(x), Some(y)) => compare(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Upper-case initial used for alphabetical separators.
pub fn initial(s: &str) -> Option<String> {
    let c = collation_key(s.trim_start()).chars().next()?;
    Some(c.to_uppercase().collect())
}
