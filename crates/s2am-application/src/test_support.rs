// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory catalog fakes for unit tests.

use crate::catalog::{PlaylistLibrary, SongCatalog, SongSearch};
use async_trait::async_trait;
use s2am_applemusic::models::{LibraryPlaylist, LibraryPlaylistAttributes};
use s2am_applemusic::{CatalogError, Result};
use s2am_domain::CatalogCandidate;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeCatalog {
    isrc: HashMap<String, Vec<CatalogCandidate>>,
    failing_isrc: Vec<String>,
    equivalents: HashMap<String, Vec<String>>,
    failing_equivalents: Vec<String>,
    isrc_lookups: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_isrc(mut self, isrc: &str, songs: Vec<CatalogCandidate>) -> Self {
        self.isrc.insert(isrc.to_string(), songs);
        self
    }

    pub fn failing_isrc(mut self, isrc: &str) -> Self {
        self.failing_isrc.push(isrc.to_string());
        self
    }

    pub fn with_equivalent(mut self, song_id: &str, ids: &[&str]) -> Self {
        self.equivalents
            .insert(song_id.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn failing_equivalent(mut self, song_id: &str) -> Self {
        self.failing_equivalents.push(song_id.to_string());
        self
    }

    pub fn isrc_lookups(&self) -> Vec<String> {
        self.isrc_lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SongCatalog for FakeCatalog {
    async fn songs_by_isrc(&self, isrc: &str) -> Result<Vec<CatalogCandidate>> {
        self.isrc_lookups.lock().unwrap().push(isrc.to_string());
        if self.failing_isrc.iter().any(|f| f == isrc) {
            return Err(server_error());
        }
        Ok(self.isrc.get(isrc).cloned().unwrap_or_default())
    }

    async fn equivalent_song_ids(&self, song_id: &str) -> Result<Vec<String>> {
        if self.failing_equivalents.iter().any(|f| f == song_id) {
            return Err(server_error());
        }
        // No canned answer behaves like the catalog rejecting an unknown id.
        self.equivalents
            .get(song_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(song_id.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SearchFailure {
    Forbidden,
    Server,
    Certificate,
}

impl SearchFailure {
    fn to_error(self) -> CatalogError {
        match self {
            SearchFailure::Forbidden => CatalogError::Forbidden,
            SearchFailure::Server => server_error(),
            SearchFailure::Certificate => {
                CatalogError::CertificateUntrusted("invalid peer certificate: UnknownIssuer".to_string())
            }
        }
    }
}

#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, Vec<CatalogCandidate>>,
    failures: HashMap<String, SearchFailure>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn with_results(mut self, term: &str, songs: Vec<CatalogCandidate>) -> Self {
        self.results.insert(term.to_string(), songs);
        self
    }

    pub fn failing(mut self, term: &str, failure: SearchFailure) -> Self {
        self.failures.insert(term.to_string(), failure);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SongSearch for FakeSearch {
    async fn search_songs(&self, term: &str) -> Result<Vec<CatalogCandidate>> {
        self.queries.lock().unwrap().push(term.to_string());
        if let Some(failure) = self.failures.get(term) {
            return Err(failure.to_error());
        }
        Ok(self.results.get(term).cloned().unwrap_or_default())
    }
}

/// Library fake. Adds and creations are recorded in call order.
#[derive(Default)]
pub struct FakeLibrary {
    playlists: Mutex<Vec<LibraryPlaylist>>,
    tracks: HashMap<String, Vec<String>>,
    add_status: Option<u16>,
    list_failure: Option<u16>,
    adds: Mutex<Vec<(String, String)>>,
    created: Mutex<Vec<String>>,
}

impl FakeLibrary {
    pub fn with_playlist(mut self, id: &str, name: Option<&str>, tracks: &[&str]) -> Self {
        self.playlists.get_mut().unwrap().push(playlist(id, name));
        self.tracks
            .insert(id.to_string(), tracks.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Every add answers with `status`.
    pub fn rejecting_adds(mut self, status: u16) -> Self {
        self.add_status = Some(status);
        self
    }

    /// Listing playlists answers with `status`.
    pub fn failing_listing(mut self, status: u16) -> Self {
        self.list_failure = Some(status);
        self
    }

    pub fn adds(&self) -> Vec<(String, String)> {
        self.adds.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistLibrary for FakeLibrary {
    async fn library_playlists(&self) -> Result<Vec<LibraryPlaylist>> {
        if let Some(status) = self.list_failure {
            return Err(status_error(status));
        }
        Ok(self.playlists.lock().unwrap().clone())
    }

    async fn create_playlist(&self, name: &str, _description: &str) -> Result<String> {
        let id = format!("p.created{}", self.created.lock().unwrap().len() + 1);
        self.created.lock().unwrap().push(name.to_string());
        self.playlists.lock().unwrap().push(playlist(&id, Some(name)));
        Ok(id)
    }

    async fn playlist_catalog_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        Ok(self.tracks.get(playlist_id).cloned().unwrap_or_default())
    }

    async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        self.adds
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), song_id.to_string()));
        match self.add_status {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }
}

fn playlist(id: &str, name: Option<&str>) -> LibraryPlaylist {
    LibraryPlaylist {
        id: id.to_string(),
        attributes: Some(LibraryPlaylistAttributes {
            name: name.map(str::to_string),
            description: None,
        }),
    }
}

fn server_error() -> CatalogError {
    status_error(500)
}

fn status_error(status: u16) -> CatalogError {
    match status {
        401 => CatalogError::Unauthorized,
        403 => CatalogError::Forbidden,
        _ => CatalogError::ApiError {
            status,
            message: "fake failure".to_string(),
        },
    }
}
