use thiserror::Error;

/// Top-level error type for the `voglander-api` crate.
///
/// Server-responded failures arrive as [`Error::Status`] after the status
/// policy table has run its side effects; everything else is a transport,
/// encoding or local-storage failure. `voglander-core` maps these into
/// user-facing variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request exceeded the client's fixed timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Server responses ────────────────────────────────────────────
    /// Non-success HTTP status. `body` is the decoded response payload
    /// (a JSON string when the body was not JSON, `null` when empty).
    #[error("HTTP {status}: {}", preview(body))]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// The backend envelope reported a non-zero `code`.
    #[error("Backend rejected request (code {code}): {message}")]
    Envelope { code: i32, message: String },

    // ── Interceptors / storage ──────────────────────────────────────
    /// A request interceptor refused to prepare the outgoing request.
    #[error("Request interceptor failed: {message}")]
    Interceptor { message: String },

    /// Reading or writing the session token failed.
    #[error("Token store error: {message}")]
    TokenStore { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body or filter could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// A filter entity was not a JSON object.
    #[error("Invalid query filter: {message}")]
    InvalidQuery { message: String },
}

fn preview(body: &serde_json::Value) -> String {
    let text = match body {
        serde_json::Value::Null => return "(empty body)".into(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.chars().take(200).collect()
}

impl Error {
    /// The HTTP status carried by a server-responded error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if the request never produced a server response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Backend message for server-responded errors, if any.
    ///
    /// Looks for the envelope's `msg` field first, then falls back to
    /// the raw string body.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => match body {
                serde_json::Value::Object(map) => map
                    .get("msg")
                    .or_else(|| map.get("message"))
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            },
            Self::Envelope { message, .. } => Some(message.clone()),
            _ => None,
        }
    }
}
