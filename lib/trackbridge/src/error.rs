use shared::{
    platform::{EntityKind, Platform},
    session::ErrorFrame,
};
use thiserror::Error;

/// Failures talking to a single streaming platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("resource not found")]
    NotFound,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("client is not configured")]
    NotConfigured,

    #[error("authorization failed: {0}")]
    Auth(String),
}

impl PlatformError {
    /// Transient failures worth another attempt: timeouts, connection
    /// problems, rate limiting and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlatformError::Timeout(_) => true,
            PlatformError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PlatformError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T, E = PlatformError> = std::result::Result<T, E>;

/// Errors surfaced by the reconciliation engines.
///
/// `UpstreamSearch` never reaches a client: failed counterpart searches are
/// absorbed by the engines.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unsupported link '{0}'")]
    UnsupportedHost(String),

    #[error("malformed {platform} link '{url}': {reason}")]
    MalformedUrl {
        platform: Platform,
        url: String,
        reason: String,
    },

    #[error("could not fetch {kind} from {platform}: {source}")]
    UpstreamFetch {
        platform: Platform,
        kind: EntityKind,
        #[source]
        source: PlatformError,
    },

    #[error("search on {platform} failed: {source}")]
    UpstreamSearch {
        platform: Platform,
        #[source]
        source: PlatformError,
    },

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("no user registered with platform id '{0}'")]
    UserNotFound(String),

    #[error("could not create playlist on {platform}: {message}")]
    UpstreamCreate { platform: Platform, message: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl BridgeError {
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::UnsupportedHost(_) => "unsupported_host",
            BridgeError::MalformedUrl { .. } => "malformed_url",
            BridgeError::UpstreamFetch { .. } => "upstream_fetch",
            BridgeError::UpstreamSearch { .. } => "upstream_search",
            BridgeError::MalformedMessage(_) => "malformed_message",
            BridgeError::UserNotFound(_) => "user_not_found",
            BridgeError::UpstreamCreate { .. } => "upstream_create",
            BridgeError::Storage(_) => "storage",
        }
    }

    pub fn to_frame(&self) -> ErrorFrame {
        ErrorFrame {
            desc: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Error)]
#[error("counter store error: {0}")]
pub struct CounterError(pub String);
