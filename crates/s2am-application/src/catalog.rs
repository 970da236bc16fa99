// SPDX-License-Identifier: GPL-3.0-or-later

//! Seams between the matching engine and the remote catalogs.
//!
//! The matchers and the reconciler only see these traits, so they can be
//! driven by the real Apple Music clients or by in-memory fakes.

use async_trait::async_trait;
use s2am_applemusic::{AppleMusicClient, ItunesSearchClient, LibraryPlaylist, Result};
use s2am_domain::CatalogCandidate;

/// Exact-identifier lookups against the destination catalog.
#[async_trait]
pub trait SongCatalog: Send + Sync {
    /// Songs carrying `isrc`, in catalog order.
    async fn songs_by_isrc(&self, isrc: &str) -> Result<Vec<CatalogCandidate>>;

    /// Ids considered equivalent to `song_id`, canonical first.
    async fn equivalent_song_ids(&self, song_id: &str) -> Result<Vec<String>>;
}

/// Free-text song search.
#[async_trait]
pub trait SongSearch: Send + Sync {
    async fn search_songs(&self, term: &str) -> Result<Vec<CatalogCandidate>>;
}

/// The user's library playlists.
#[async_trait]
pub trait PlaylistLibrary: Send + Sync {
    async fn library_playlists(&self) -> Result<Vec<LibraryPlaylist>>;

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String>;

    async fn playlist_catalog_ids(&self, playlist_id: &str) -> Result<Vec<String>>;

    async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()>;
}

#[async_trait]
impl SongCatalog for AppleMusicClient {
    async fn songs_by_isrc(&self, isrc: &str) -> Result<Vec<CatalogCandidate>> {
        AppleMusicClient::songs_by_isrc(self, isrc).await
    }

    async fn equivalent_song_ids(&self, song_id: &str) -> Result<Vec<String>> {
        AppleMusicClient::equivalent_song_ids(self, song_id).await
    }
}

#[async_trait]
impl PlaylistLibrary for AppleMusicClient {
    async fn library_playlists(&self) -> Result<Vec<LibraryPlaylist>> {
        AppleMusicClient::library_playlists(self).await
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        AppleMusicClient::create_playlist(self, name, description).await
    }

    async fn playlist_catalog_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        AppleMusicClient::playlist_catalog_ids(self, playlist_id).await
    }

    async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        AppleMusicClient::add_song_to_playlist(self, playlist_id, song_id).await
    }
}

#[async_trait]
impl SongSearch for ItunesSearchClient {
    async fn search_songs(&self, term: &str) -> Result<Vec<CatalogCandidate>> {
        ItunesSearchClient::search_songs(self, term).await
    }
}
