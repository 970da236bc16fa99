// SPDX-License-Identifier: GPL-3.0-or-later

//! Playlist conversion pipeline.
//!
//! Ties the matchers and the reconciler together:
//! - find or create the destination playlist and read its contents once
//! - match every track (ISRC first, then text search)
//! - add matched tracks that are not already present
//!
//! Tracks are processed one at a time in input order. Per-track failures are
//! recorded in the [`TrackRecord`] and never stop the run; only conditions no
//! later request can recover from surface as [`ConversionError`].

use crate::catalog::{PlaylistLibrary, SongCatalog, SongSearch};
use crate::equivalence::EquivalenceResolver;
use crate::identifier_matching::IdentifierMatcher;
use crate::reconcile::{AddOutcome, PlaylistReconciler};
use crate::text_matching::TextMatcher;
use s2am_applemusic::{AppleMusicClient, CatalogError, ItunesSearchClient, Session, Throttle};
use s2am_config::{AppConfig, Credentials};
use s2am_domain::{
    AddResult, MatchOutcome, PlaylistState, RunResult, SearchMethod, SearchStatus, TrackQuery,
    TrackRecord, SKIPPED_ID,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const AUTH_HINT: &str = "Please refer to the README and check you have entered your Bearer Token, \
Media-User-Token and session cookies.";
const CERTIFICATE_HINT: &str = "The server certificate could not be verified. Install or update \
the root certificates of your system, then rerun the conversion.";
const HOST_ERROR_HINT: &str = "Host error while getting playlist. If you recently deleted it, \
please try again in a few seconds.";

/// Conditions that abort the whole run.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("401 Unauthorized while {operation}")]
    Unauthorized { operation: &'static str },

    #[error("403 Forbidden while {operation}")]
    Forbidden { operation: &'static str },

    #[error("TLS certificate could not be verified: {0}")]
    CertificateUntrusted(String),

    #[error("Library playlist {0} has no name")]
    MalformedPlaylist(String),

    #[error("Catalog request failed while {operation}: {source}")]
    Catalog {
        operation: &'static str,
        #[source]
        source: CatalogError,
    },
}

impl ConversionError {
    /// What the user can do about it, if anything.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            ConversionError::Unauthorized { .. } | ConversionError::Forbidden { .. } => {
                Some(AUTH_HINT)
            }
            ConversionError::CertificateUntrusted(_) => Some(CERTIFICATE_HINT),
            ConversionError::MalformedPlaylist(_) => Some(HOST_ERROR_HINT),
            ConversionError::Catalog { .. } => None,
        }
    }

    fn from_catalog(operation: &'static str, source: CatalogError) -> Self {
        match source {
            CatalogError::Unauthorized => ConversionError::Unauthorized { operation },
            CatalogError::Forbidden => ConversionError::Forbidden { operation },
            CatalogError::CertificateUntrusted(reason) => ConversionError::CertificateUntrusted(reason),
            source => ConversionError::Catalog { operation, source },
        }
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Converts exported tracks into one Apple Music library playlist.
pub struct PlaylistConverter {
    library: Arc<dyn PlaylistLibrary>,
    identifier: IdentifierMatcher,
    text: TextMatcher,
    reconciler: PlaylistReconciler,
    playlist_description: String,
}

impl PlaylistConverter {
    pub fn new(
        catalog: Arc<dyn SongCatalog>,
        search: Arc<dyn SongSearch>,
        library: Arc<dyn PlaylistLibrary>,
        playlist_description: impl Into<String>,
    ) -> Self {
        let resolver = EquivalenceResolver::new(catalog.clone());
        Self {
            identifier: IdentifierMatcher::new(catalog),
            text: TextMatcher::new(search),
            reconciler: PlaylistReconciler::new(library.clone(), resolver),
            library,
            playlist_description: playlist_description.into(),
        }
    }

    /// The Apple Music client serves both catalog lookups and library edits.
    pub fn from_clients(
        apple_music: AppleMusicClient,
        itunes: ItunesSearchClient,
        playlist_description: impl Into<String>,
    ) -> Self {
        let apple_music = Arc::new(apple_music);
        Self::new(
            apple_music.clone(),
            Arc::new(itunes),
            apple_music,
            playlist_description,
        )
    }

    /// Build both HTTP clients from configuration and the user's session.
    pub fn from_config(config: &AppConfig, credentials: &Credentials) -> s2am_applemusic::Result<Self> {
        let throttle = Throttle::new(config.run.delay());
        let timeout = config.catalog.request_timeout_secs.map(Duration::from_secs);

        let apple_music = AppleMusicClient::builder()
            .base_url(config.catalog.api_base_url.as_str())
            .storefront(credentials.country_code.as_str())
            .session(Session::new(
                credentials.bearer_token.as_str(),
                credentials.media_user_token.as_str(),
                credentials.cookies.as_str(),
            ))
            .timeout(timeout)
            .throttle(throttle)
            .build()?;

        let itunes = ItunesSearchClient::builder()
            .base_url(config.catalog.search_base_url.as_str())
            .country(credentials.country_code.as_str())
            .limit(config.catalog.search_limit)
            .timeout(timeout)
            .throttle(throttle)
            .build()?;

        Ok(Self::from_clients(
            apple_music,
            itunes,
            config.catalog.playlist_description.as_str(),
        ))
    }

    /// Find the library playlist named `display_name` (creating it when
    /// missing) and load the catalog ids it already holds.
    pub async fn prepare_playlist(&self, display_name: &str) -> ConversionResult<PlaylistState> {
        let playlist_id = match self.find_playlist(display_name).await? {
            Some(id) => {
                info!(target: "conversion", playlist = display_name, %id, "playlist already exists");
                id
            }
            None => {
                let id = self
                    .library
                    .create_playlist(display_name, &self.playlist_description)
                    .await
                    .map_err(|e| ConversionError::from_catalog("creating playlist", e))?;
                info!(target: "conversion", playlist = display_name, %id, "playlist created");
                id
            }
        };

        let known_ids = self
            .library
            .playlist_catalog_ids(&playlist_id)
            .await
            .map_err(|e| ConversionError::from_catalog("reading playlist tracks", e))?;
        debug!(
            target: "conversion",
            playlist = display_name,
            tracks = known_ids.len(),
            "loaded playlist contents"
        );

        Ok(PlaylistState::new(playlist_id, display_name, known_ids))
    }

    async fn find_playlist(&self, display_name: &str) -> ConversionResult<Option<String>> {
        let playlists = match self.library.library_playlists().await {
            Ok(playlists) => playlists,
            Err(e) if e.is_auth_failure() || e.is_certificate_failure() => {
                return Err(ConversionError::from_catalog("listing playlists", e));
            }
            Err(e) => {
                // Fall through to creation, as if no playlist matched.
                warn!(target: "conversion", error = %e, "could not list library playlists");
                return Ok(None);
            }
        };

        for playlist in playlists {
            let Some(name) = playlist.name() else {
                return Err(ConversionError::MalformedPlaylist(playlist.id));
            };
            if name == display_name {
                return Ok(Some(playlist.id));
            }
        }
        Ok(None)
    }

    /// Locate `query` in the catalog: ISRC lookup first, text search second.
    pub async fn match_track(
        &self,
        query: &TrackQuery,
        playlist: &PlaylistState,
    ) -> ConversionResult<MatchOutcome> {
        debug!(
            target: "conversion",
            title = %query.title,
            artist = %query.artist,
            album = %query.album,
            isrc = %query.isrc,
            "searching"
        );

        if let Some(found) = self
            .identifier
            .match_by_identifier(&query.isrc, &query.album, &query.artist)
            .await
        {
            return Ok(MatchOutcome::found(found.id, SearchMethod::Identifier, playlist));
        }

        debug!(target: "conversion", "track not found using ISRC, trying text search");
        let hit = self
            .text
            .match_by_text(&query.album, &query.artist, &query.title)
            .await
            .map_err(|e| ConversionError::from_catalog("searching by text", e))?;

        Ok(match hit {
            Some(hit) => MatchOutcome::found(hit.candidate.id, SearchMethod::Text, playlist),
            None => MatchOutcome::not_found(),
        })
    }

    /// Match one track and add it to the playlist when the match is new.
    pub async fn process_track(
        &self,
        query: TrackQuery,
        playlist: &mut PlaylistState,
    ) -> ConversionResult<TrackRecord> {
        let outcome = self.match_track(&query, playlist).await?;
        let mut record = TrackRecord::pending(query);
        record.apply_outcome(&outcome);

        match (outcome.status(), outcome.catalog_id()) {
            (SearchStatus::Ok, Some(catalog_id)) => {
                let added = self.reconciler.add_track(catalog_id, playlist).await;
                record.result = Some(added.result());
                if let AddOutcome::Added(song_id) = added {
                    record.added_track_id = Some(song_id);
                }
            }
            (status, catalog_id) => {
                debug!(target: "conversion", %status, ?catalog_id, "not adding track");
                record.result = Some(AddResult::Skipped);
                record.added_track_id = Some(SKIPPED_ID.to_string());
            }
        }

        Ok(record)
    }

    /// Convert `tracks` into the playlist named `display_name`.
    ///
    /// `on_record` is called after each track with its 1-based position and
    /// finished record.
    pub async fn convert<F>(
        &self,
        display_name: &str,
        tracks: Vec<TrackQuery>,
        mut on_record: F,
    ) -> ConversionResult<RunResult>
    where
        F: FnMut(usize, &TrackRecord),
    {
        let mut playlist = self.prepare_playlist(display_name).await?;
        let total = tracks.len();
        let mut run = RunResult::new();

        for (index, query) in tracks.into_iter().enumerate() {
            debug!(target: "conversion", track = index + 1, total, "processing track");
            let record = self.process_track(query, &mut playlist).await?;
            on_record(index + 1, &record);
            run.push(record);
        }

        info!(
            target: "conversion",
            playlist = display_name,
            tracks = run.len(),
            playlist_size = playlist.len(),
            "finished playlist"
        );
        Ok(run)
    }
}
