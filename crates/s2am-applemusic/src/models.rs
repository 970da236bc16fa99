// SPDX-License-Identifier: GPL-3.0-or-later

use s2am_domain::CatalogCandidate;
use serde::{Deserialize, Serialize};

/// Standard Apple Music API envelope: `{"data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Catalog song resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<SongAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub isrc: Option<String>,
}

impl Song {
    /// Convert to a candidate; `None` when the name, artist or album is missing.
    pub fn into_candidate(self) -> Option<CatalogCandidate> {
        let attributes = self.attributes?;
        Some(CatalogCandidate::new(
            self.id,
            attributes.name?,
            attributes.artist_name?,
            attributes.album_name?,
        ))
    }
}

/// Minimal resource reference (id only), used for equivalents and creation responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceRef {
    pub id: String,
}

/// Playlist in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryPlaylist {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<LibraryPlaylistAttributes>,
}

impl LibraryPlaylist {
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.name.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryPlaylistAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<PlaylistDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistDescription {
    #[serde(default)]
    pub standard: Option<String>,
}

/// Track inside a library playlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryTrack {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<LibraryTrackAttributes>,
}

impl LibraryTrack {
    /// Catalog id of the song; absent for uploaded or unavailable tracks.
    pub fn catalog_id(&self) -> Option<&str> {
        self.attributes
            .as_ref()?
            .play_params
            .as_ref()?
            .catalog_id
            .as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryTrackAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub play_params: Option<PlayParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayParams {
    #[serde(default)]
    pub catalog_id: Option<String>,
}

/// Body of a create-playlist request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub attributes: CreatePlaylistAttributes<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistAttributes<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Body of an add-tracks request.
#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest<'a> {
    pub data: Vec<TrackReference<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackReference<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// iTunes search API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesSearchResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<ItunesTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItunesTrack {
    #[serde(default)]
    pub track_id: Option<u64>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
}

impl ItunesTrack {
    /// Convert to a candidate; `None` when any field the matcher needs is missing.
    pub fn into_candidate(self) -> Option<CatalogCandidate> {
        Some(CatalogCandidate::new(
            self.track_id?.to_string(),
            self.track_name?,
            self.artist_name?,
            self.collection_name?,
        ))
    }
}
