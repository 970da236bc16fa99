// SPDX-License-Identifier: GPL-3.0-or-later

//! Apple Music catalog and library clients.
//!
//! This crate provides the authenticated Apple Music API client used for
//! ISRC lookups, equivalent-song lookups and library playlist edits, and a
//! client for the public iTunes search endpoint used for text search. All
//! requests go through a fixed-delay [`Throttle`].

pub mod client;
pub mod error;
pub mod models;
pub mod search;
pub mod throttle;

pub use client::{AppleMusicClient, AppleMusicClientBuilder, Session};
pub use error::{CatalogError, Result};
pub use models::LibraryPlaylist;
pub use search::{ItunesSearchClient, ItunesSearchClientBuilder};
pub use throttle::Throttle;
