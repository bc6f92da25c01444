//! Access tokens and their on-disk cache.
//!
//! The Open Platform issues bearer tokens in exchange for a client ID and
//! secret (`POST /api/v1/access_token`). A token is typically valid for
//! several days, so it can be cached between runs. When token storage is
//! enabled the token is kept in a `.env` file next to the credentials:
//!
//! ```text
//! PAN123_CLIENT_ID=...
//! PAN123_CLIENT_SECRET=...
//! AIO123PAN_CACHED_ACCESS_TOKEN=eyJhbGciOi...
//! AIO123PAN_CACHED_TOKEN_EXPIRY=2025-12-31T23:59:59+08:00
//! ```
//!
//! Only the two cache lines are ever rewritten; everything else in the file
//! is preserved.

use crate::client::Pan123Client;
use crate::error::Result;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// A bearer token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub expired_at: DateTime<FixedOffset>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.expired_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Token cache backed by a `.env` file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub const TOKEN_KEY: &'static str = "AIO123PAN_CACHED_ACCESS_TOKEN";
    pub const EXPIRY_KEY: &'static str = "AIO123PAN_CACHED_TOKEN_EXPIRY";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `.env` in the current working directory.
    pub fn in_current_dir() -> Self {
        Self::new(".env")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the token, replacing earlier cache lines in place.
    pub fn save(&self, token: &AccessToken) -> Result<()> {
        let token_line = format!("{}={}", Self::TOKEN_KEY, token.access_token);
        let expiry_line = format!("{}={}", Self::EXPIRY_KEY, token.expired_at.to_rfc3339());

        let mut lines = Vec::new();
        let mut token_written = false;
        let mut expiry_written = false;

        for line in self.read_lines()? {
            if is_key_line(&line, Self::TOKEN_KEY) {
                lines.push(token_line.clone());
                token_written = true;
            } else if is_key_line(&line, Self::EXPIRY_KEY) {
                lines.push(expiry_line.clone());
                expiry_written = true;
            } else {
                lines.push(line);
            }
        }
        if !token_written {
            lines.push(token_line);
        }
        if !expiry_written {
            lines.push(expiry_line);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.write_lines(&lines)
    }

    /// Read a cached token.
    ///
    /// Returns `None` when the file or either key is missing, the expiry
    /// does not parse, or the token has already expired.
    pub fn load(&self) -> Option<AccessToken> {
        let lines = self.read_lines().ok()?;
        let value_of = |key: &str| {
            lines
                .iter()
                .rev()
                .find(|l| is_key_line(l, key))
                .and_then(|l| l.trim().split_once('='))
                .map(|(_, v)| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let access_token = value_of(Self::TOKEN_KEY)?;
        let expired_at = parse_expiry(&value_of(Self::EXPIRY_KEY)?)?;
        let token = AccessToken {
            access_token,
            expired_at,
        };
        token.is_valid().then_some(token)
    }

    /// Remove the cache lines, keeping the rest of the file.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let lines: Vec<String> = self
            .read_lines()?
            .into_iter()
            .filter(|l| !is_key_line(l, Self::TOKEN_KEY) && !is_key_line(l, Self::EXPIRY_KEY))
            .collect();
        self.write_lines(&lines)
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(data.lines().map(str::to_owned).collect())
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut data = lines.join("\n");
        if !data.is_empty() {
            data.push('\n');
        }
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.trim()
        .strip_prefix(key)
        .is_some_and(|rest| rest.starts_with('='))
}

/// Parse an RFC 3339 timestamp; a timestamp without offset is taken as UTC.
fn parse_expiry(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

impl Pan123Client {
    /// Exchange client credentials for a new access token.
    ///
    /// Endpoint: `POST /api/v1/access_token`, unauthenticated.
    ///
    /// ```json
    /// { "clientID": "...", "clientSecret": "..." }
    /// ```
    ///
    /// Response data: `{ "accessToken": "...", "expiredAt": "2025-03-23T15:48:37+08:00" }`.
    ///
    /// This does not touch the client's own token; see
    /// [`refresh_token`](Self::refresh_token) for that.
    pub async fn access_token(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        let body = json!({ "clientID": client_id, "clientSecret": client_secret });
        self.post_public("/api/v1/access_token", &body).await
    }
}
