// SPDX-License-Identifier: GPL-3.0-or-later

//! Text canonicalization used by every matching heuristic.

use lazy_static::lazy_static;
use regex::Regex;
use s2am_domain::CatalogCandidate;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[-()&+,.’;:]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lowercase, drop the punctuation set `- ( ) & + , . ’ ; :`, collapse
/// whitespace runs to a single space and trim both ends.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Remove ASCII apostrophes only. The typographic ’ is left for [`normalize`].
pub fn strip_apostrophes(text: &str) -> String {
    text.replace('\'', "")
}

/// First `n` characters of `text` (the whole string if shorter).
pub fn prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// `a` contains `b` or `b` contains `a`.
pub fn either_contains(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Title, artist and album in normalized form, ready for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl NormalizedTrack {
    /// Normalize fields coming from the CSV (apostrophes already removed on import).
    pub fn from_query(title: &str, artist: &str, album: &str) -> Self {
        Self {
            title: normalize(title),
            artist: normalize(artist),
            album: normalize(album),
        }
    }

    /// Normalize fields reported by the catalog.
    pub fn from_candidate(candidate: &CatalogCandidate) -> Self {
        Self {
            title: normalize(&strip_apostrophes(&candidate.title)),
            artist: normalize(&strip_apostrophes(&candidate.artist)),
            album: normalize(&strip_apostrophes(&candidate.album)),
        }
    }
}
