// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{CatalogError, Result};
use crate::models::{
    AddTracksRequest, CreatePlaylistAttributes, CreatePlaylistRequest, DataResponse,
    LibraryPlaylist, LibraryTrack, ResourceRef, Song, TrackReference,
};
use crate::throttle::Throttle;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, COOKIE, ORIGIN, REFERER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use s2am_domain::CatalogCandidate;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

pub const APPLE_MUSIC_API_BASE: &str = "https://amp-api.music.apple.com/v1";
const WEB_PLAYER_ORIGIN: &str = "https://music.apple.com";
const USER_AGENT: &str = concat!(
    "s2am/",
    env!("CARGO_PKG_VERSION"),
    " ( https://github.com/therealmarius/Spotify-2-AppleMusic )"
);

/// Status codes accepted as a successful add-to-playlist.
const ADD_SUCCESS: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Web-player session values sent with every Apple Music API request.
#[derive(Clone, Default)]
pub struct Session {
    pub bearer_token: String,
    pub media_user_token: String,
    pub cookies: String,
}

impl Session {
    pub fn new(
        bearer_token: impl Into<String>,
        media_user_token: impl Into<String>,
        cookies: impl Into<String>,
    ) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            media_user_token: media_user_token.into(),
            cookies: cookies.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("authorization", self.bearer_token.as_bytes())?);
        headers.insert(
            HeaderName::from_static("media-user-token"),
            header_value("media-user-token", self.media_user_token.as_bytes())?,
        );
        headers.insert(COOKIE, header_value("cookie", self.cookies.as_bytes())?);
        headers.insert(REFERER, HeaderValue::from_static("https://music.apple.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static(WEB_PLAYER_ORIGIN));
        Ok(headers)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("bearer_token_len", &self.bearer_token.len())
            .field("media_user_token_len", &self.media_user_token.len())
            .field("cookies_len", &self.cookies.len())
            .finish()
    }
}

fn header_value(name: &str, bytes: &[u8]) -> Result<HeaderValue> {
    HeaderValue::from_bytes(bytes).map_err(|_| CatalogError::InvalidHeader(name.to_string()))
}

/// Authenticated Apple Music API client.
///
/// Every request waits on the shared [`Throttle`] first.
#[derive(Debug, Clone)]
pub struct AppleMusicClient {
    client: Client,
    base_url: String,
    storefront: String,
    throttle: Throttle,
}

impl AppleMusicClient {
    pub fn builder() -> AppleMusicClientBuilder {
        AppleMusicClientBuilder::default()
    }

    /// Look up catalog songs by ISRC, in the order the catalog returns them.
    /// Songs missing a name, artist or album are dropped.
    pub async fn songs_by_isrc(&self, isrc: &str) -> Result<Vec<CatalogCandidate>> {
        let url = self.catalog_songs_url("filter[isrc]", isrc)?;
        let response: DataResponse<Song> = self.get(url.as_str()).await?;

        Ok(response
            .data
            .into_iter()
            .filter_map(|song| {
                let id = song.id.clone();
                let candidate = song.into_candidate();
                if candidate.is_none() {
                    debug!(target: "applemusic", song = %id, "catalog song without name, artist or album");
                }
                candidate
            })
            .collect())
    }

    /// Ids the catalog considers equivalent to `song_id` in this storefront.
    pub async fn equivalent_song_ids(&self, song_id: &str) -> Result<Vec<String>> {
        let url = self.catalog_songs_url("filter[equivalents]", song_id)?;
        let response: DataResponse<ResourceRef> = self.get(url.as_str()).await?;
        Ok(response.data.into_iter().map(|r| r.id).collect())
    }

    /// Playlists in the user's library (first page only).
    pub async fn library_playlists(&self) -> Result<Vec<LibraryPlaylist>> {
        let url = format!("{}/me/library/playlists", self.base_url);
        let response: DataResponse<LibraryPlaylist> = self.get(&url).await?;
        Ok(response.data)
    }

    /// Create a library playlist and return its id.
    pub async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        let url = format!("{}/me/library/playlists", self.base_url);
        let body = CreatePlaylistRequest {
            attributes: CreatePlaylistAttributes { name, description },
        };

        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        let created: DataResponse<ResourceRef> = parse_body(response).await?;

        created
            .data
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| CatalogError::InvalidResponse("created playlist has no id".to_string()))
    }

    /// Catalog ids of the songs in a library playlist. A playlist without
    /// tracks answers 404, which is reported as an empty list.
    pub async fn playlist_catalog_ids(&self, playlist_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/me/library/playlists/{}/tracks", self.base_url, playlist_id);

        let response: DataResponse<LibraryTrack> = match self.get(&url).await {
            Ok(response) => response,
            Err(CatalogError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(response
            .data
            .iter()
            .filter_map(|track| {
                let id = track.catalog_id();
                if id.is_none() {
                    debug!(target: "applemusic", track = %track.id, "library track without catalog id");
                }
                id.map(str::to_string)
            })
            .collect())
    }

    /// Add one catalog song to a library playlist.
    ///
    /// Only 200, 201 and 204 count as success; any other status is an
    /// [`CatalogError::ApiError`].
    pub async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        let url = format!("{}/me/library/playlists/{}/tracks", self.base_url, playlist_id);
        let body = AddTracksRequest {
            data: vec![TrackReference {
                id: song_id,
                kind: "songs",
            }],
        };

        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        let status = response.status();
        if ADD_SUCCESS.contains(&status) {
            return Ok(());
        }

        Err(CatalogError::ApiError {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        })
    }

    fn catalog_songs_url(&self, filter: &str, value: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/catalog/{}/songs",
            self.base_url, self.storefront
        ))
        .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        url.query_pairs_mut().append_pair(filter, value);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(self.client.get(url), url).await?;
        parse_body(response).await
    }

    /// Throttle, send, and map error statuses.
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response> {
        self.throttle.wait().await;

        trace!(target: "applemusic", "request {}", url);
        let response = request.send().await?;

        let status = response.status();
        debug!(target: "applemusic", %status, url, "response status");

        check_status(response, url).await
    }
}

pub(crate) async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(CatalogError::Unauthorized);
    }

    if status == StatusCode::FORBIDDEN {
        return Err(CatalogError::Forbidden);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(url.to_string()));
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(CatalogError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

pub(crate) async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    trace!(target: "applemusic", "response body: {}", body);

    serde_json::from_str(&body)
        .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

pub(crate) fn build_http_client(
    timeout: Option<Duration>,
    headers: Option<HeaderMap>,
) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(headers) = headers {
        builder = builder.default_headers(headers);
    }
    Ok(builder.build()?)
}

/// Builder for configuring an Apple Music client.
#[derive(Debug)]
pub struct AppleMusicClientBuilder {
    base_url: String,
    storefront: String,
    session: Session,
    timeout: Option<Duration>,
    throttle: Throttle,
}

impl Default for AppleMusicClientBuilder {
    fn default() -> Self {
        Self {
            base_url: APPLE_MUSIC_API_BASE.to_string(),
            storefront: "us".to_string(),
            session: Session::default(),
            timeout: None,
            throttle: Throttle::default(),
        }
    }
}

impl AppleMusicClientBuilder {
    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Two-letter country code of the catalog to search.
    pub fn storefront(mut self, storefront: impl Into<String>) -> Self {
        self.storefront = storefront.into();
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Request timeout. Unset by default, so a stalled request blocks.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn build(self) -> Result<AppleMusicClient> {
        let client = build_http_client(self.timeout, Some(self.session.headers()?))?;

        Ok(AppleMusicClient {
            client,
            base_url: self.base_url,
            storefront: self.storefront,
            throttle: self.throttle,
        })
    }
}
