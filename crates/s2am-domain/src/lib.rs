// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder written to `track_id` when no catalog entry was found.
pub const NOT_FOUND_ID: &str = "NOT_FOUND";

/// Placeholder written to `added_track_id` when no add was attempted.
pub const SKIPPED_ID: &str = "SKIPPED";

// ============================================================================
// Input
// ============================================================================

/// One track read from an exported playlist CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackQuery {
    #[serde(rename = "track_name")]
    pub title: String,
    #[serde(rename = "artist_name")]
    pub artist: String,
    #[serde(rename = "album_name")]
    pub album: String,
    /// International Standard Recording Code; may be empty.
    pub isrc: String,
}

impl TrackQuery {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        isrc: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            isrc: isrc.into(),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A single lookup or search result as reported by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCandidate {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl CatalogCandidate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
        }
    }
}

// ============================================================================
// Match outcome
// ============================================================================

/// How a track was located in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Exact ISRC lookup.
    Identifier,
    /// Fuzzy text search fallback.
    Text,
    NotFound,
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMethod::Identifier => write!(f, "ISRC"),
            SearchMethod::Text => write!(f, "TEXT"),
            SearchMethod::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    Duplicate,
    NotFound,
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Ok => write!(f, "OK"),
            SearchStatus::Duplicate => write!(f, "DUPLICATE"),
            SearchStatus::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// Result of matching one [`TrackQuery`] against the catalog.
///
/// Only constructible through [`MatchOutcome::found`] and
/// [`MatchOutcome::not_found`], so `Ok` always carries a non-empty id and
/// `Duplicate` always refers to an id already in the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    catalog_id: Option<String>,
    method: SearchMethod,
    status: SearchStatus,
}

impl MatchOutcome {
    /// Outcome for an id located by `method`. An empty id is treated as not found.
    pub fn found(catalog_id: impl Into<String>, method: SearchMethod, playlist: &PlaylistState) -> Self {
        let catalog_id = catalog_id.into();
        if catalog_id.is_empty() || method == SearchMethod::NotFound {
            return Self::not_found();
        }

        let status = if playlist.contains(&catalog_id) {
            SearchStatus::Duplicate
        } else {
            SearchStatus::Ok
        };

        Self {
            catalog_id: Some(catalog_id),
            method,
            status,
        }
    }

    pub fn not_found() -> Self {
        Self {
            catalog_id: None,
            method: SearchMethod::NotFound,
            status: SearchStatus::NotFound,
        }
    }

    pub fn catalog_id(&self) -> Option<&str> {
        self.catalog_id.as_deref()
    }

    pub fn method(&self) -> SearchMethod {
        self.method
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }
}

/// Final per-track result after the add-to-playlist step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddResult {
    Added,
    Duplicate,
    Error,
    Skipped,
}

impl std::fmt::Display for AddResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddResult::Added => write!(f, "ADDED"),
            AddResult::Duplicate => write!(f, "DUPLICATE"),
            AddResult::Error => write!(f, "ERROR"),
            AddResult::Skipped => write!(f, "SKIPPED"),
        }
    }
}

// ============================================================================
// Playlist
// ============================================================================

/// Destination playlist and the catalog ids it currently holds.
///
/// Fetched once per playlist and updated in place after every successful
/// add, so duplicate detection within a run is a set lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistState {
    pub id: String,
    pub name: String,
    known_ids: HashSet<String>,
}

impl PlaylistState {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        known_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            known_ids: known_ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, catalog_id: &str) -> bool {
        self.known_ids.contains(catalog_id)
    }

    /// Record a successful add. Returns false if the id was already known.
    pub fn record_added(&mut self, catalog_id: impl Into<String>) -> bool {
        self.known_ids.insert(catalog_id.into())
    }

    pub fn len(&self) -> usize {
        self.known_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_ids.is_empty()
    }
}

// ============================================================================
// Run results
// ============================================================================

/// One entry of a [`RunResult`]. Outcome fields stay `None` until the track
/// has been processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(flatten)]
    pub query: TrackQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_method: Option<SearchMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_status: Option<SearchStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AddResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_track_id: Option<String>,
}

impl TrackRecord {
    pub fn pending(query: TrackQuery) -> Self {
        Self {
            query,
            track_id: None,
            search_method: None,
            search_status: None,
            result: None,
            added_track_id: None,
        }
    }

    /// Copy the match outcome into the record.
    pub fn apply_outcome(&mut self, outcome: &MatchOutcome) {
        self.track_id = Some(
            outcome
                .catalog_id()
                .unwrap_or(NOT_FOUND_ID)
                .to_string(),
        );
        self.search_method = Some(outcome.method());
        self.search_status = Some(outcome.status());
    }
}

/// Ordered per-track results of converting one playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResult {
    records: Vec<TrackRecord>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrackRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<TrackRecord> for RunResult {
    fn from_iter<I: IntoIterator<Item = TrackRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
