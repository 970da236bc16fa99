// SPDX-License-Identifier: GPL-3.0-or-later

use crate::client::{build_http_client, check_status, parse_body};
use crate::error::{CatalogError, Result};
use crate::models::ItunesSearchResponse;
use crate::throttle::Throttle;
use reqwest::Client;
use s2am_domain::CatalogCandidate;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

pub const ITUNES_SEARCH_BASE: &str = "https://itunes.apple.com/search";

/// Client for the public, unauthenticated iTunes search endpoint.
#[derive(Debug, Clone)]
pub struct ItunesSearchClient {
    client: Client,
    base_url: String,
    country: String,
    limit: u32,
    throttle: Throttle,
}

impl ItunesSearchClient {
    pub fn builder() -> ItunesSearchClientBuilder {
        ItunesSearchClientBuilder::default()
    }

    /// Search songs by free-text term. Results keep the catalog's order;
    /// entries missing an id or a name are dropped.
    pub async fn search_songs(&self, term: &str) -> Result<Vec<CatalogCandidate>> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("country", &self.country)
            .append_pair("media", "music")
            .append_pair("entity", "song")
            .append_pair("limit", &self.limit.to_string())
            .append_pair("term", term);

        self.throttle.wait().await;
        debug!(target: "itunes", url = %url, "making search request");

        let response = self.client.get(url.as_str()).send().await?;
        let response = check_status(response, url.as_str()).await?;
        let body: ItunesSearchResponse = parse_body(response).await?;

        trace!(target: "itunes", result_count = body.result_count, "search response");

        Ok(body
            .results
            .into_iter()
            .filter_map(|track| track.into_candidate())
            .collect())
    }
}

/// Builder for configuring an iTunes search client.
#[derive(Debug)]
pub struct ItunesSearchClientBuilder {
    base_url: String,
    country: String,
    limit: u32,
    timeout: Option<Duration>,
    throttle: Throttle,
}

impl Default for ItunesSearchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: ITUNES_SEARCH_BASE.to_string(),
            country: "us".to_string(),
            limit: 15,
            timeout: None,
            throttle: Throttle::default(),
        }
    }
}

impl ItunesSearchClientBuilder {
    /// Full search endpoint URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Maximum results per query.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn build(self) -> Result<ItunesSearchClient> {
        Ok(ItunesSearchClient {
            client: build_http_client(self.timeout, None)?,
            base_url: self.base_url,
            country: self.country,
            limit: self.limit,
            throttle: self.throttle,
        })
    }
}
