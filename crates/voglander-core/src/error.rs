// ── Core error types ──
//
// User-facing errors for the session, store and routing layer.
// API errors are translated into domain variants here; callers of
// voglander-core never match on `voglander_api::Error` directly.

use thiserror::Error;

use crate::router::RouterError;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not authenticated: {message}")]
    Unauthorized { message: String },

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rejected by backend (code {code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("Backend error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Routing ──────────────────────────────────────────────────────
    #[error(transparent)]
    Router(#[from] RouterError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the session token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

fn message_of(err: &voglander_api::Error, fallback: &str) -> String {
    err.server_message().unwrap_or_else(|| fallback.to_owned())
}

impl From<voglander_api::Error> for CoreError {
    fn from(err: voglander_api::Error) -> Self {
        use voglander_api::Error as E;

        match err {
            E::Status { status: 401, .. } => CoreError::Unauthorized {
                message: message_of(&err, "session token missing or expired"),
            },
            E::Status { status: 403, .. } => CoreError::Forbidden {
                message: message_of(&err, "access to this resource is forbidden"),
            },
            E::Status { status: 404, .. } => CoreError::NotFound {
                message: message_of(&err, "resource does not exist"),
            },
            E::Status { status, .. } if status >= 500 => CoreError::ServerError {
                status,
                message: message_of(&err, "internal server error"),
            },
            E::Status { status, .. } => CoreError::Api {
                message: message_of(&err, &format!("request failed with HTTP {status}")),
                status: Some(status),
            },
            E::Envelope { code, message } => CoreError::Rejected { code, message },
            E::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            E::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            E::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            E::ClientBuild(reason) => CoreError::Config {
                message: format!("Cannot build HTTP client: {reason}"),
            },
            E::Interceptor { message } | E::TokenStore { message } => CoreError::Api {
                message,
                status: None,
            },
            E::InvalidQuery { message } => CoreError::Internal(format!("Invalid filter: {message}")),
            E::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            E::Encode(e) => CoreError::Internal(format!("Encoding error: {e}")),
        }
    }
}
