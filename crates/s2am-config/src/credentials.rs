// SPDX-License-Identifier: GPL-3.0-or-later

//! Apple Music session credentials.
//!
//! Each value is read from a file in the credentials directory when present,
//! otherwise it is prompted for on the terminal.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub const TOKEN_FILE: &str = "token.dat";
pub const MEDIA_USER_TOKEN_FILE: &str = "media_user_token.dat";
pub const COOKIES_FILE: &str = "cookies.dat";
pub const COUNTRY_CODE_FILE: &str = "country_code.dat";

const PROMPT_BEARER_TOKEN: &str = "\nPlease enter your Apple Music Authorization (Bearer token):\n";
const PROMPT_MEDIA_USER_TOKEN: &str = "\nPlease enter your media user token:\n";
const PROMPT_COOKIES: &str = "\nPlease enter your cookies:\n";
const PROMPT_COUNTRY_CODE: &str = "\nPlease enter the country code (e.g., FR, UK, US etc.): ";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed { path: String, source: io::Error },

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("Input closed before {0} was entered")]
    InputClosed(&'static str),
}

/// Opaque session values; validity is only established by HTTP response codes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bearer_token: String,
    pub media_user_token: String,
    pub cookies: String,
    pub country_code: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bearer_token", &format_args!("<{} chars>", self.bearer_token.len()))
            .field(
                "media_user_token",
                &format_args!("<{} chars>", self.media_user_token.len()),
            )
            .field("cookies", &format_args!("<{} chars>", self.cookies.len()))
            .field("country_code", &self.country_code)
            .finish()
    }
}

/// Load all four credentials from `dir`, prompting on `input`/`output` for
/// any file that does not exist.
pub fn load_credentials<R: BufRead, W: Write>(
    dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<Credentials, CredentialsError> {
    let mut read = |file: &str, label: &'static str, prompt: &str| {
        read_or_prompt(&dir.join(file), label, prompt, input, output)
    };

    let credentials = Credentials {
        bearer_token: read(TOKEN_FILE, "bearer token", PROMPT_BEARER_TOKEN)?,
        media_user_token: read(MEDIA_USER_TOKEN_FILE, "media user token", PROMPT_MEDIA_USER_TOKEN)?,
        cookies: read(COOKIES_FILE, "cookies", PROMPT_COOKIES)?,
        country_code: read(COUNTRY_CODE_FILE, "country code", PROMPT_COUNTRY_CODE)?
            .trim()
            .to_lowercase(),
    };

    info!(
        target: "config",
        country_code = %credentials.country_code,
        token_len = credentials.bearer_token.len(),
        media_user_token_len = credentials.media_user_token.len(),
        cookies_len = credentials.cookies.len(),
        "credentials loaded"
    );

    Ok(credentials)
}

fn read_or_prompt<R: BufRead, W: Write>(
    path: &Path,
    label: &'static str,
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String, CredentialsError> {
    if path.exists() {
        debug!(target: "config", path = %path.display(), "reading credential file");
        let contents = fs::read_to_string(path).map_err(|source| CredentialsError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(contents.trim_end_matches(['\n', '\r']).to_string());
    }

    // Empty answers are asked again; only a closed input ends the loop.
    loop {
        output.write_all(prompt.as_bytes())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(CredentialsError::InputClosed(label));
        }

        let value = line.trim_end_matches(['\n', '\r']);
        if !value.trim().is_empty() {
            return Ok(value.to_string());
        }
    }
}
