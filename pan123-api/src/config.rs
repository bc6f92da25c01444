//! Client settings from the environment.
//!
//! Every setting is read from a `PAN123_`-prefixed variable. The process
//! environment wins over a `.env` file in the working directory; empty values
//! are treated as unset.
//!
//! ```text
//! PAN123_CLIENT_ID=...
//! PAN123_CLIENT_SECRET=...
//! PAN123_TIMEOUT=30
//! PAN123_BASE_URL=https://open-api.123pan.com
//! PAN123_ENABLE_TOKEN_STORAGE=true
//! ```

use crate::error::{Pan123Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://open-api.123pan.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_PREFIX: &str = "PAN123_";

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout: Duration,
    pub base_url: String,
    /// Persist the access token to the `.env` file.
    pub enable_token_storage: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            timeout: DEFAULT_TIMEOUT,
            base_url: DEFAULT_BASE_URL.to_owned(),
            enable_token_storage: false,
        }
    }
}

impl Settings {
    /// Load settings from the process environment and `./.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_file(Path::new(".env"))
    }

    /// Like [`from_env`](Self::from_env) with a different `.env` file.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let dotenv = read_dotenv(path)?;
        Self::from_lookup(|key| layered(std::env::var(key).ok(), dotenv.get(key)))
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// `lookup` receives the full variable name (e.g. `PAN123_TIMEOUT`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self {
            client_id: get("CLIENT_ID"),
            client_secret: get("CLIENT_SECRET"),
            ..Self::default()
        };
        if let Some(raw) = get("TIMEOUT") {
            settings.timeout = parse_timeout(&raw)?;
        }
        if let Some(url) = get("BASE_URL") {
            settings.base_url = url;
        }
        if let Some(raw) = get("ENABLE_TOKEN_STORAGE") {
            settings.enable_token_storage = parse_bool(&raw).ok_or_else(|| {
                Pan123Error::Config(format!(
                    "{ENV_PREFIX}ENABLE_TOKEN_STORAGE: expected a boolean, got {raw:?}"
                ))
            })?;
        }
        Ok(settings)
    }
}

/// The process value unless it is blank, else the `.env` value.
fn layered(process: Option<String>, file: Option<&String>) -> Option<String> {
    process
        .filter(|v| !v.trim().is_empty())
        .or_else(|| file.cloned())
}

/// Read a `.env` file into a map without touching the process environment.
///
/// A missing file yields an empty map.
pub(crate) fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| Pan123Error::Config(format!("{}: {e}", path.display())))?;
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) =
            item.map_err(|e| Pan123Error::Config(format!("{}: {e}", path.display())))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| Pan123Error::Config(format!("{ENV_PREFIX}TIMEOUT: not a number: {raw:?}")))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Pan123Error::Config(format!("{ENV_PREFIX}TIMEOUT: {e}")))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "t" | "y" => Some(true),
        "0" | "false" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}
