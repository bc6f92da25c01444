//! HTTP client for the 123pan Open Platform.
//!
//! Every request goes to `{base_url}{path}` with the `Platform: open_platform`
//! header and, for authenticated endpoints, `Authorization: Bearer <token>`.
//! The token is obtained from the client credentials on first use and renewed
//! when it expires.
//!
//! # Response format
//!
//! All API responses share this envelope:
//!
//! ```json
//! {
//!   "code": 0,
//!   "message": "ok",
//!   "data": { ...endpoint-specific fields... },
//!   "x-traceID": "..."
//! }
//! ```
//!
//! Non-zero codes are mapped to [`Pan123Error::Api`](crate::Pan123Error::Api)
//! with an [`ApiErrorKind`](crate::ApiErrorKind). A 401 on an authenticated
//! call also drops the cached token, so the next call fetches a new one.

use crate::auth::{AccessToken, TokenStore};
use crate::config::Settings;
use crate::error::{Pan123Error, Result};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub(crate) const PLATFORM: &str = "open_platform";
/// Query for endpoints that take no parameters.
pub(crate) const NO_QUERY: &[(&str, &str)] = &[];
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Async client for the 123pan Open Platform API.
///
/// Cheap to share: wrap it in an `Arc` to use it from several tasks. Token
/// refreshes are serialized so concurrent calls trigger at most one
/// `access_token` request.
///
/// API methods are implemented in separate modules (`file`, `upload`,
/// `share`, ...) as `impl Pan123Client` blocks.
pub struct Pan123Client {
    http: Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: RwLock<Option<AccessToken>>,
    refresh_lock: Mutex<()>,
    store: Option<TokenStore>,
    /// Deadline for a whole envelope call. Streamed bodies only get the
    /// connect and read timeouts of `http`.
    timeout: Duration,
    pub(crate) upload_poll_interval: Duration,
}

impl std::fmt::Debug for Pan123Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pan123Client")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("token_storage", &self.store.as_ref().map(TokenStore::path))
            .finish_non_exhaustive()
    }
}

/// Builder for [`Pan123Client`].
///
/// Values not set on the builder come from [`Settings`]
/// (environment / `.env`).
#[derive(Debug, Default)]
pub struct ClientBuilder {
    settings: Option<Settings>,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: Option<AccessToken>,
    timeout: Option<Duration>,
    base_url: Option<String>,
    token_storage: Option<bool>,
    env_file: Option<PathBuf>,
    upload_poll_interval: Option<Duration>,
}

impl ClientBuilder {
    /// Use `settings` instead of reading the environment.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Start with a known token instead of a cached or fresh one.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Persist tokens to the env file (default `./.env`).
    #[must_use]
    pub fn token_storage(mut self, enabled: bool) -> Self {
        self.token_storage = Some(enabled);
        self
    }

    /// Env file for settings and the token cache, instead of `./.env`.
    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Delay between `upload_complete` polls (default 1 s).
    #[must_use]
    pub fn upload_poll_interval(mut self, interval: Duration) -> Self {
        self.upload_poll_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<Pan123Client> {
        let settings = match (self.settings, &self.env_file) {
            (Some(s), _) => s,
            (None, Some(path)) => Settings::from_env_file(path)?,
            (None, None) => Settings::from_env()?,
        };

        let timeout = self.timeout.unwrap_or(settings.timeout);
        let base_url = self
            .base_url
            .unwrap_or(settings.base_url)
            .trim_end_matches('/')
            .to_owned();
        let storage_enabled = self.token_storage.unwrap_or(settings.enable_token_storage);
        let store = storage_enabled.then(|| match self.env_file {
            Some(path) => TokenStore::new(path),
            None => TokenStore::in_current_dir(),
        });

        let token = self.token.or_else(|| store.as_ref().and_then(TokenStore::load));
        if token.is_some() {
            debug!("starting with an existing access token");
        }

        let mut headers = HeaderMap::new();
        headers.insert("Platform", HeaderValue::from_static(PLATFORM));
        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        Ok(Pan123Client {
            http,
            base_url,
            client_id: self.client_id.or(settings.client_id),
            client_secret: self.client_secret.or(settings.client_secret),
            token: RwLock::new(token),
            refresh_lock: Mutex::new(()),
            store,
            timeout,
            upload_poll_interval: self.upload_poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        })
    }
}

/// The common response envelope.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default = "unknown_code")]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(rename = "x-traceID", default)]
    trace_id: Option<String>,
}

fn unknown_code() -> i64 {
    -1
}

impl Pan123Client {
    /// Create a client configured from the environment and `./.env`.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token store, when token persistence is enabled.
    pub fn token_store(&self) -> Option<&TokenStore> {
        self.store.as_ref()
    }

    /// A copy of the current access token, if any.
    pub fn token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    pub fn is_token_valid(&self) -> bool {
        self.token.read().as_ref().is_some_and(AccessToken::is_valid)
    }

    /// Fetch a new token now, regardless of the current one.
    pub async fn refresh_token(&self) -> Result<AccessToken> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_token().await
    }

    /// Return a valid bearer token, fetching one if needed.
    pub(crate) async fn bearer(&self) -> Result<String> {
        if let Some(token) = self.valid_token() {
            return Ok(token);
        }
        let _guard = self.refresh_lock.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(token) = self.valid_token() {
            return Ok(token);
        }
        Ok(self.fetch_token().await?.access_token)
    }

    fn valid_token(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .filter(|t| t.is_valid())
            .map(|t| t.access_token.clone())
    }

    async fn fetch_token(&self) -> Result<AccessToken> {
        let (Some(id), Some(secret)) = (self.client_id.as_deref(), self.client_secret.as_deref())
        else {
            return Err(Pan123Error::MissingCredentials);
        };

        let token = self.access_token(id, secret).await?;
        info!(expires_at = %token.expired_at, "obtained access token");
        *self.token.write() = Some(token.clone());

        if let Some(store) = &self.store {
            match store.save(&token) {
                Ok(()) => debug!(path = %store.path().display(), "cached access token"),
                Err(e) => warn!(path = %store.path().display(), "failed to cache access token: {e}"),
            }
        }
        Ok(token)
    }

    /// Drop `rejected` from memory and the cache, unless another task has
    /// already replaced it.
    fn forget_token(&self, rejected: &str) {
        {
            let mut slot = self.token.write();
            if !slot.as_ref().is_some_and(|t| t.access_token == rejected) {
                debug!("rejected token already replaced, keeping the current one");
                return;
            }
            *slot = None;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(path = %store.path().display(), "failed to clear cached token: {e}");
            }
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ── request helpers ──

    pub(crate) async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let data = self
            .execute(Method::GET, path, |req| req.query(query))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let data = self
            .execute(Method::POST, path, |req| req.json(body))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn put<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let data = self
            .execute(Method::PUT, path, |req| req.json(body))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// POST without an `Authorization` header (token endpoint).
    pub(crate) async fn post_public<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        let req = self.http.post(self.url(path)).json(body);
        let data = self.send(&Method::POST, path, req).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let data = self
            .execute(Method::POST, path, |req| req.multipart(form))
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Send an authenticated request and unwrap the envelope, returning
    /// `data`.
    async fn execute<F>(&self, method: Method, path: &str, build: F) -> Result<Value>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let token = self.bearer().await?;
        let req = build(self.http.request(method.clone(), self.url(path)).bearer_auth(&token));

        let result = self.send(&method, path, req).await;
        if let Err(Pan123Error::Api { code: 401, .. }) = &result {
            debug!(path, "token rejected, dropping it");
            self.forget_token(&token);
        }
        result
    }

    /// Send a prepared request and unwrap the envelope. Never fetches a
    /// token, so the token endpoint goes through here.
    async fn send(&self, method: &Method, path: &str, req: RequestBuilder) -> Result<Value> {
        debug!(%method, path, "sending request");
        let resp = req.timeout(self.timeout).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        parse_response(status, &body)
    }
}

/// Turn an HTTP status and body into the envelope's `data` or an error.
pub(crate) fn parse_response(status: StatusCode, body: &str) -> Result<Value> {
    let http_error = status.is_client_error() || status.is_server_error();
    let code = i64::from(status.as_u16());

    let json: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) if http_error => {
            let message = if body.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.to_owned()
            };
            return Err(Pan123Error::api(code, message, None));
        }
        Err(e) => return Err(e.into()),
    };

    if http_error {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| body.to_owned(), str::to_owned);
        let trace_id = json
            .get("x-traceID")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Err(Pan123Error::api(code, message, trace_id));
    }

    let envelope: Envelope = serde_json::from_value(json)?;
    if envelope.code == 0 {
        return Ok(match envelope.data {
            Value::Null => Value::Object(serde_json::Map::new()),
            data => data,
        });
    }

    Err(Pan123Error::api(
        envelope.code,
        envelope.message.unwrap_or_else(|| "Unknown error".to_owned()),
        envelope.trace_id,
    ))
}
