// SPDX-License-Identifier: GPL-3.0-or-later

use std::error::Error as StdError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("TLS certificate could not be verified: {0}")]
    CertificateUntrusted(String),

    #[error("401 Unauthorized")]
    Unauthorized,

    #[error("403 Forbidden")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response from catalog: {0}")]
    InvalidResponse(String),

    #[error("Invalid session header {0}")]
    InvalidHeader(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CatalogError {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Unauthorized => Some(401),
            CatalogError::Forbidden => Some(403),
            CatalogError::NotFound(_) => Some(404),
            CatalogError::ApiError { status, .. } => Some(*status),
            CatalogError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 401/403: the session credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CatalogError::Unauthorized | CatalogError::Forbidden)
    }

    pub fn is_certificate_failure(&self) -> bool {
        matches!(self, CatalogError::CertificateUntrusted(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        match certificate_failure(&error) {
            Some(reason) => CatalogError::CertificateUntrusted(reason),
            None => CatalogError::RequestFailed(error),
        }
    }
}

/// Walk the source chain of a transport error looking for a rejected peer certificate.
fn certificate_failure(error: &reqwest::Error) -> Option<String> {
    let mut source: Option<&(dyn StdError + 'static)> = error.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("certificate") || lowered.contains("unknownissuer") {
            return Some(message);
        }
        source = cause.source();
    }
    None
}
