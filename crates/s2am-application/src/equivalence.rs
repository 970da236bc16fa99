// SPDX-License-Identifier: GPL-3.0-or-later

use crate::catalog::SongCatalog;
use std::sync::Arc;
use tracing::debug;

/// Maps a catalog id to the id the storefront considers canonical
/// (remasters, regional variants).
#[derive(Clone)]
pub struct EquivalenceResolver {
    catalog: Arc<dyn SongCatalog>,
}

impl EquivalenceResolver {
    pub fn new(catalog: Arc<dyn SongCatalog>) -> Self {
        Self { catalog }
    }

    /// Return the first equivalent id, or `song_id` unchanged when there is
    /// none or the lookup fails for any reason.
    pub async fn resolve_equivalent(&self, song_id: &str) -> String {
        match self.catalog.equivalent_song_ids(song_id).await {
            Ok(ids) => match ids.into_iter().find(|id| !id.is_empty()) {
                Some(equivalent) => equivalent,
                None => song_id.to_string(),
            },
            Err(e) => {
                debug!(target: "reconcile", song_id, error = %e, "equivalent lookup failed");
                song_id.to_string()
            }
        }
    }
}
