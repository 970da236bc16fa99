// SPDX-License-Identifier: GPL-3.0-or-later

//! Adds matched songs to the destination playlist without duplicating
//! songs it already holds.

use crate::catalog::PlaylistLibrary;
use crate::equivalence::EquivalenceResolver;
use s2am_domain::{AddResult, PlaylistState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to one add attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Added under this (possibly equivalent) catalog id.
    Added(String),
    /// The resolved id was already in the playlist; nothing was sent.
    Duplicate(String),
    /// The add request failed; the playlist is unchanged.
    Failed(String),
}

impl AddOutcome {
    pub fn result(&self) -> AddResult {
        match self {
            AddOutcome::Added(_) => AddResult::Added,
            AddOutcome::Duplicate(_) => AddResult::Duplicate,
            AddOutcome::Failed(_) => AddResult::Error,
        }
    }

    /// Catalog id after equivalence resolution.
    pub fn catalog_id(&self) -> &str {
        match self {
            AddOutcome::Added(id) | AddOutcome::Duplicate(id) | AddOutcome::Failed(id) => id,
        }
    }
}

pub struct PlaylistReconciler {
    library: Arc<dyn PlaylistLibrary>,
    resolver: EquivalenceResolver,
}

impl PlaylistReconciler {
    pub fn new(library: Arc<dyn PlaylistLibrary>, resolver: EquivalenceResolver) -> Self {
        Self { library, resolver }
    }

    /// Resolve `candidate_id` to its equivalent and add it to `playlist`
    /// unless already present.
    ///
    /// On success the playlist's known-id set gains the added id. Failures
    /// are logged and never abort the run.
    pub async fn add_track(&self, candidate_id: &str, playlist: &mut PlaylistState) -> AddOutcome {
        let song_id = self.resolver.resolve_equivalent(candidate_id).await;
        if song_id != candidate_id {
            debug!(
                target: "reconcile",
                candidate_id,
                equivalent_id = %song_id,
                "switched to equivalent song"
            );
        }

        if playlist.contains(&song_id) {
            debug!(
                target: "reconcile",
                song_id = %song_id,
                playlist = %playlist.name,
                "song already in playlist"
            );
            return AddOutcome::Duplicate(song_id);
        }

        debug!(target: "reconcile", song_id = %song_id, "adding song to playlist");
        match self.library.add_song_to_playlist(&playlist.id, &song_id).await {
            Ok(()) => {
                info!(target: "reconcile", song_id = %song_id, playlist = %playlist.name, "song added");
                playlist.record_added(song_id.clone());
                AddOutcome::Added(song_id)
            }
            Err(e) => {
                warn!(
                    target: "reconcile",
                    song_id = %song_id,
                    playlist = %playlist.name,
                    status = ?e.status(),
                    error = %e,
                    "failed to add song"
                );
                AddOutcome::Failed(song_id)
            }
        }
    }
}
