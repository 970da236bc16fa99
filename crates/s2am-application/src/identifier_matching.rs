// SPDX-License-Identifier: GPL-3.0-or-later

//! ISRC lookup with album/artist sanity checks (primary strategy).
//!
//! An ISRC identifies a recording, not a release, so the catalog may return
//! the same recording on several albums. The first returned song is checked
//! against the album and artist from the CSV; if it fails every rule the
//! lookup is treated as a miss and the caller falls back to text search.
//! Later songs in the response are never inspected.

use crate::catalog::SongCatalog;
use crate::normalize::{either_contains, prefix, NormalizedTrack};
use s2am_domain::CatalogCandidate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sanity-check rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRule {
    /// Album and artist equal.
    AlbumAndArtist,
    /// Album equal, one artist name contains the other.
    AlbumAndArtistContained,
    /// Album starts with the first 6 characters of the expected album and
    /// artist starts with the first 4 characters of the expected artist.
    AlbumAndArtistPrefix,
    /// Album equal.
    AlbumOnly,
}

impl IdentifierRule {
    pub const ALL: [IdentifierRule; 4] = [
        IdentifierRule::AlbumAndArtist,
        IdentifierRule::AlbumAndArtistContained,
        IdentifierRule::AlbumAndArtistPrefix,
        IdentifierRule::AlbumOnly,
    ];

    pub fn matches(self, found: &NormalizedTrack, expected: &NormalizedTrack) -> bool {
        let album_equal = found.album == expected.album;
        match self {
            IdentifierRule::AlbumAndArtist => album_equal && found.artist == expected.artist,
            IdentifierRule::AlbumAndArtistContained => {
                album_equal && either_contains(&found.artist, &expected.artist)
            }
            IdentifierRule::AlbumAndArtistPrefix => {
                found.album.starts_with(prefix(&expected.album, 6))
                    && found.artist.starts_with(prefix(&expected.artist, 4))
            }
            IdentifierRule::AlbumOnly => album_equal,
        }
    }

    /// First rule satisfied by `found`, if any.
    pub fn first_match(found: &NormalizedTrack, expected: &NormalizedTrack) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.matches(found, expected))
    }
}

impl std::fmt::Display for IdentifierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierRule::AlbumAndArtist => write!(f, "album and artist"),
            IdentifierRule::AlbumAndArtistContained => write!(f, "album and partial artist"),
            IdentifierRule::AlbumAndArtistPrefix => write!(f, "album and artist prefix"),
            IdentifierRule::AlbumOnly => write!(f, "album only"),
        }
    }
}

/// Looks tracks up by ISRC.
pub struct IdentifierMatcher {
    catalog: Arc<dyn SongCatalog>,
}

impl IdentifierMatcher {
    pub fn new(catalog: Arc<dyn SongCatalog>) -> Self {
        Self { catalog }
    }

    /// Look up `isrc` and sanity-check the first result against the expected
    /// album and artist.
    ///
    /// Returns `None` for an empty ISRC (no request is made), an empty
    /// result, a failed first candidate, or any lookup error.
    pub async fn match_by_identifier(
        &self,
        isrc: &str,
        expected_album: &str,
        expected_artist: &str,
    ) -> Option<CatalogCandidate> {
        if isrc.is_empty() {
            debug!(target: "matching", "no ISRC available, skipping identifier lookup");
            return None;
        }

        let candidates = match self.catalog.songs_by_isrc(isrc).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(target: "matching", isrc, error = %e, "ISRC lookup failed");
                return None;
            }
        };

        let Some(first) = candidates.into_iter().next() else {
            debug!(target: "matching", isrc, "ISRC lookup returned no songs");
            return None;
        };

        let found = NormalizedTrack::from_candidate(&first);
        let expected = NormalizedTrack::from_query("", expected_artist, expected_album);

        debug!(
            target: "matching",
            catalog_id = %first.id,
            found_album = %found.album,
            expected_album = %expected.album,
            found_artist = %found.artist,
            expected_artist = %expected.artist,
            "sanity checking ISRC result"
        );

        match IdentifierRule::first_match(&found, &expected) {
            Some(rule) => {
                debug!(target: "matching", catalog_id = %first.id, %rule, "ISRC match accepted");
                Some(first)
            }
            None => {
                debug!(target: "matching", catalog_id = %first.id, "ISRC result failed sanity checks");
                None
            }
        }
    }
}
