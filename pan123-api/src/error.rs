//! Error types for the 123pan Open Platform client.

use thiserror::Error;

/// Classification of a non-zero `code` returned by the Open Platform.
///
/// The server reports failures as a numeric `code` plus a free-form
/// `message`; the kind is derived from both (see [`ApiErrorKind::classify`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401 without a more specific hint in the message.
    Authentication,
    /// 401, the access token has expired.
    TokenExpired,
    /// 401, the client ID / secret pair was rejected.
    InvalidCredentials,
    /// 401, too many tokens issued for this client.
    TokenLimitExceeded,
    /// 403.
    PermissionDenied,
    /// 404 mentioning a file.
    FileNotFound,
    /// 404 mentioning a share.
    ShareNotFound,
    /// 404 mentioning a task.
    TaskNotFound,
    /// Any other 404. Several optional endpoints (paid shares, image
    /// hosting, direct-link logs) answer 404 when the account lacks the
    /// feature.
    ResourceNotFound,
    /// 429 without a QPS hint.
    RateLimit,
    /// 429, per-endpoint QPS limit hit.
    QpsLimit,
    /// 500.
    InternalServer,
    /// 503.
    ServiceUnavailable,
    /// 504.
    GatewayTimeout,
    /// Any other 5xx.
    Server,
    /// Not enough free space for the operation.
    InsufficientStorage,
    /// Account quota exceeded.
    QuotaExceeded,
    /// Everything else.
    Other,
}

impl ApiErrorKind {
    /// Derive the kind from an API `code` and `message`.
    ///
    /// Message matching is case-insensitive.
    pub fn classify(code: i64, message: &str) -> Self {
        let msg = message.to_lowercase();
        let has = |needle: &str| msg.contains(needle);

        match code {
            401 => {
                if has("expired") {
                    Self::TokenExpired
                } else if has("invalid") && (has("client") || has("credential")) {
                    Self::InvalidCredentials
                } else if has("token") && has("exceeded") {
                    Self::TokenLimitExceeded
                } else {
                    Self::Authentication
                }
            }
            403 => Self::PermissionDenied,
            404 => {
                if has("file") {
                    Self::FileNotFound
                } else if has("share") {
                    Self::ShareNotFound
                } else if has("task") {
                    Self::TaskNotFound
                } else {
                    Self::ResourceNotFound
                }
            }
            429 if has("qps") => Self::QpsLimit,
            429 => Self::RateLimit,
            500 => Self::InternalServer,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            c if c >= 500 => Self::Server,
            _ if has("storage") || has("space") => {
                if has("insufficient") || has("not enough") {
                    Self::InsufficientStorage
                } else if has("quota") || has("exceed") {
                    Self::QuotaExceeded
                } else {
                    Self::Other
                }
            }
            _ => Self::Other,
        }
    }

    /// Whether this kind invalidates the cached access token.
    pub fn is_auth(self) -> bool {
        matches!(
            self,
            Self::Authentication
                | Self::TokenExpired
                | Self::InvalidCredentials
                | Self::TokenLimitExceeded
        )
    }

    pub fn is_not_found(self) -> bool {
        matches!(
            self,
            Self::FileNotFound | Self::ShareNotFound | Self::TaskNotFound | Self::ResourceNotFound
        )
    }

    pub fn is_rate_limited(self) -> bool {
        matches!(self, Self::RateLimit | Self::QpsLimit)
    }

    pub fn is_server(self) -> bool {
        matches!(
            self,
            Self::InternalServer | Self::ServiceUnavailable | Self::GatewayTimeout | Self::Server
        )
    }
}

/// Errors that can occur when interacting with the 123pan API.
#[derive(Debug, Error)]
pub enum Pan123Error {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-zero `code` (or an HTTP error status).
    #[error("{message} (code: {code}){}", trace_suffix(.trace_id.as_deref()))]
    Api {
        kind: ApiErrorKind,
        /// Open Platform status code, or the HTTP status for transport-level
        /// failures that carry no envelope.
        code: i64,
        message: String,
        /// Value of the `x-traceID` field, useful when contacting support.
        trace_id: Option<String>,
    },

    /// A response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file I/O (upload source, download target, token cache).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid setting in the environment or `.env` file.
    #[error("configuration error: {0}")]
    Config(String),

    /// An authenticated call was made without a valid token and without
    /// client credentials to obtain one.
    #[error("client ID and secret required for authentication")]
    MissingCredentials,

    /// A request parameter was rejected before sending.
    #[error("{0}")]
    Validation(String),

    #[error("share expiry must be one of 0, 1, 7, 30 days, got {0}")]
    InvalidSharePeriod(u32),

    #[error("cannot share more than 100 files, got {0}")]
    ShareLimitExceeded(usize),

    #[error("only HTTP/HTTPS URLs are supported, got: {0}")]
    UnsupportedProtocol(String),

    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("download failed: {0}")]
    Download(String),
}

impl Pan123Error {
    pub(crate) fn api(code: i64, message: impl Into<String>, trace_id: Option<String>) -> Self {
        let message = message.into();
        Self::Api {
            kind: ApiErrorKind::classify(code, &message),
            code,
            message,
            trace_id,
        }
    }

    /// The API error kind, if this is a server-reported failure.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The API (or HTTP) status code, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Api { trace_id, .. } => trace_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::MissingCredentials) || self.kind().is_some_and(ApiErrorKind::is_auth)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind().is_some_and(ApiErrorKind::is_not_found)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind().is_some_and(ApiErrorKind::is_rate_limited)
    }

    pub fn is_server_error(&self) -> bool {
        self.kind().is_some_and(ApiErrorKind::is_server)
    }
}

fn trace_suffix(trace_id: Option<&str>) -> String {
    match trace_id {
        Some(id) if !id.is_empty() => format!(" [trace_id: {id}]"),
        _ => String::new(),
    }
}

/// Convenience alias for `Result<T, Pan123Error>`.
pub type Result<T> = std::result::Result<T, Pan123Error>;
