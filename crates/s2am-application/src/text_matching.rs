// SPDX-License-Identifier: GPL-3.0-or-later

//! Free-text search fallback.
//!
//! Four queries are tried from most to least specific. Each result set is
//! scanned in catalog order and every result is checked against an ordered
//! list of equality, prefix and containment rules; the first result that
//! satisfies any rule wins.

use crate::catalog::SongSearch;
use crate::normalize::{either_contains, prefix, NormalizedTrack};
use s2am_applemusic::{CatalogError, Result};
use s2am_domain::CatalogCandidate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Characters compared by the prefix rules.
const TITLE_PREFIX: usize = 8;
const ARTIST_PREFIX: usize = 8;
/// The result album is cut to 8 characters but the expected album to 5.
const FOUND_ALBUM_PREFIX: usize = 8;
const EXPECTED_ALBUM_PREFIX: usize = 5;

/// Result-selection rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    TitleArtistAlbum,
    TitleArtistAlbumPrefix,
    TitleArtist,
    TitleArtistPrefix,
    TitleAlbum,
    TitleAlbumPrefix,
    TitleArtistContained,
    TitlePrefixArtistContained,
    TitleAlbumContained,
    TitlePrefixAlbumContained,
}

impl TextRule {
    pub const ALL: [TextRule; 10] = [
        TextRule::TitleArtistAlbum,
        TextRule::TitleArtistAlbumPrefix,
        TextRule::TitleArtist,
        TextRule::TitleArtistPrefix,
        TextRule::TitleAlbum,
        TextRule::TitleAlbumPrefix,
        TextRule::TitleArtistContained,
        TextRule::TitlePrefixArtistContained,
        TextRule::TitleAlbumContained,
        TextRule::TitlePrefixAlbumContained,
    ];

    pub fn matches(self, found: &NormalizedTrack, expected: &NormalizedTrack) -> bool {
        let title = found.title == expected.title;
        let title_prefix =
            prefix(&found.title, TITLE_PREFIX) == prefix(&expected.title, TITLE_PREFIX);
        let artist = found.artist == expected.artist;
        let artist_prefix =
            prefix(&found.artist, ARTIST_PREFIX) == prefix(&expected.artist, ARTIST_PREFIX);
        let artist_contained = either_contains(&found.artist, &expected.artist);
        let album = found.album == expected.album;
        let album_prefix = prefix(&found.album, FOUND_ALBUM_PREFIX)
            == prefix(&expected.album, EXPECTED_ALBUM_PREFIX);
        let album_contained = either_contains(&found.album, &expected.album);

        match self {
            TextRule::TitleArtistAlbum => title && artist && album,
            TextRule::TitleArtistAlbumPrefix => title_prefix && artist_prefix && album_prefix,
            TextRule::TitleArtist => title && artist,
            TextRule::TitleArtistPrefix => title_prefix && artist_prefix,
            TextRule::TitleAlbum => title && album,
            TextRule::TitleAlbumPrefix => title_prefix && album_prefix,
            TextRule::TitleArtistContained => title && artist_contained,
            TextRule::TitlePrefixArtistContained => title_prefix && artist_contained,
            TextRule::TitleAlbumContained => title && album_contained,
            TextRule::TitlePrefixAlbumContained => title_prefix && album_contained,
        }
    }

    /// First rule satisfied by `found`, if any.
    pub fn first_match(found: &NormalizedTrack, expected: &NormalizedTrack) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.matches(found, expected))
    }
}

impl std::fmt::Display for TextRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            TextRule::TitleArtistAlbum => "exact title, artist and album",
            TextRule::TitleArtistAlbumPrefix => "prefix of title, artist and album",
            TextRule::TitleArtist => "exact title and artist",
            TextRule::TitleArtistPrefix => "prefix of title and artist",
            TextRule::TitleAlbum => "exact title and album",
            TextRule::TitleAlbumPrefix => "prefix of title and album",
            TextRule::TitleArtistContained => "exact title, partial artist",
            TextRule::TitlePrefixArtistContained => "prefix of title, partial artist",
            TextRule::TitleAlbumContained => "exact title, partial album",
            TextRule::TitlePrefixAlbumContained => "prefix of title, partial album",
        };
        f.write_str(description)
    }
}

/// Search terms from most to least specific. Inputs must already be normalized.
pub fn search_queries(expected: &NormalizedTrack) -> [String; 4] {
    let NormalizedTrack {
        title,
        artist,
        album,
    } = expected;
    [
        format!("{title} {artist} {album}"),
        format!("{title} {artist}"),
        format!("{title} {album}"),
        title.clone(),
    ]
}

/// A text-search hit and the rule that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub candidate: CatalogCandidate,
    pub rule: TextRule,
    /// Index into [`search_queries`] of the query that produced the hit.
    pub query_index: usize,
}

/// Searches the catalog by title, artist and album text.
pub struct TextMatcher {
    search: Arc<dyn SongSearch>,
}

impl TextMatcher {
    pub fn new(search: Arc<dyn SongSearch>) -> Self {
        Self { search }
    }

    /// Run the query cascade.
    ///
    /// Returns `Ok(None)` when no query produced an acceptable result. The
    /// only error surfaced is a TLS certificate failure, which no later
    /// query can recover from; every other failure (including 403) is
    /// logged and treated as an empty result set.
    pub async fn match_by_text(
        &self,
        album: &str,
        artist: &str,
        title: &str,
    ) -> Result<Option<TextMatch>> {
        let expected = NormalizedTrack::from_query(title, artist, album);
        debug!(
            target: "matching",
            title = %expected.title,
            artist = %expected.artist,
            album = %expected.album,
            "text search from CSV"
        );

        for (query_index, query) in search_queries(&expected).iter().enumerate() {
            let results = match self.search.search_songs(query).await {
                Ok(results) => results,
                Err(e @ CatalogError::CertificateUntrusted(_)) => return Err(e),
                Err(CatalogError::Forbidden) => {
                    warn!(target: "matching", query = %query, "403 Forbidden from text search");
                    continue;
                }
                Err(e) => {
                    warn!(target: "matching", query = %query, error = %e, "text search request failed");
                    continue;
                }
            };

            if let Some((candidate, rule)) = select(results, &expected) {
                debug!(
                    target: "matching",
                    catalog_id = %candidate.id,
                    %rule,
                    query_index,
                    "text match accepted"
                );
                return Ok(Some(TextMatch {
                    candidate,
                    rule,
                    query_index,
                }));
            }
        }

        debug!(target: "matching", title = %expected.title, "no text search result accepted");
        Ok(None)
    }
}

/// First result, in catalog order, satisfying any rule.
fn select(
    results: Vec<CatalogCandidate>,
    expected: &NormalizedTrack,
) -> Option<(CatalogCandidate, TextRule)> {
    results.into_iter().find_map(|candidate| {
        let found = NormalizedTrack::from_candidate(&candidate);
        debug!(
            target: "matching",
            title = %found.title,
            artist = %found.artist,
            album = %found.album,
            "text search result"
        );
        TextRule::first_match(&found, expected).map(|rule| (candidate, rule))
    })
}
