// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use s2am_applemusic::{client::APPLE_MUSIC_API_BASE, search::ITUNES_SEARCH_BASE};
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod credentials;

pub use credentials::{load_credentials, Credentials, CredentialsError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seconds to wait before every outbound request.
    pub delay_secs: f64,
    pub write_results: bool,
    pub results_dir: PathBuf,
}

impl RunConfig {
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            delay_secs: 0.5,
            write_results: true,
            results_dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub search_base_url: String,
    pub search_limit: u32,
    /// No timeout unless set; a stalled request blocks the run.
    pub request_timeout_secs: Option<u64>,
    pub playlist_description: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: APPLE_MUSIC_API_BASE.to_string(),
            search_base_url: ITUNES_SEARCH_BASE.to_string(),
            search_limit: 15,
            request_timeout_secs: None,
            playlist_description: concat!(
                "A new playlist created via API using s2am v",
                env!("CARGO_PKG_VERSION")
            )
            .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Directory holding token.dat, media_user_token.dat, cookies.dat and country_code.dat.
    pub dir: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            log_file: PathBuf::from("s2am.log"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub run: RunConfig,
    pub catalog: CatalogConfig,
    pub credentials: CredentialsConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: S2AM_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let config: AppConfig = figment(config_path).extract()?;
    info!(
        target: "config",
        delay_secs = config.run.delay_secs,
        write_results = config.run.write_results,
        "configuration loaded"
    );
    Ok(config)
}

fn figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(Env::prefixed("S2AM_").split("__"))
}
