// Request interceptors and response status policies
//
// Outgoing requests pass through every `RequestInterceptor` in order.
// Failed responses are dispatched to the `StatusPolicy` registered for
// their status code (or the fallback), and the error is then returned to
// the caller unchanged. Policies only produce side effects.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use tracing::{error, trace, warn};
use url::Url;

use crate::error::Error;
use crate::navigator::{LOGIN_PATH, Navigator};
use crate::token::TokenStore;

// ── Request side ────────────────────────────────────────────────────

/// Hook applied to every outgoing request before it is sent.
///
/// Returning an error rejects the request; nothing reaches the network.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error>;
}

/// Attaches `Authorization: Bearer <token>` when a session token is stored.
pub struct AuthInterceptor {
    tokens: Arc<dyn TokenStore>,
}

impl AuthInterceptor {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl RequestInterceptor for AuthInterceptor {
    fn intercept(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.tokens.get().map_err(|e| Error::Interceptor {
            message: format!("could not read session token: {e}"),
        })?;
        Ok(match token {
            Some(token) => {
                trace!("attaching bearer token");
                request.bearer_auth(token.expose_secret())
            }
            None => request,
        })
    }
}

// ── Response side ───────────────────────────────────────────────────

/// A server-responded failure, as seen by status policies.
#[derive(Debug)]
pub struct FailedResponse<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: StatusCode,
    pub body: &'a serde_json::Value,
}

/// Side effect run for a failed response with a given status.
pub trait StatusPolicy: Send + Sync {
    fn handle(&self, failure: &FailedResponse<'_>);
}

/// 401: drop the stored session and send the user to the login screen.
pub struct ClearSessionPolicy {
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ClearSessionPolicy {
    pub fn new(tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { tokens, navigator }
    }
}

impl StatusPolicy for ClearSessionPolicy {
    fn handle(&self, failure: &FailedResponse<'_>) {
        warn!(url = %failure.url, "session rejected, clearing stored token");
        if let Err(e) = self.tokens.remove() {
            warn!(error = %e, "failed to clear session token");
        }
        self.navigator.navigate(LOGIN_PATH);
    }
}

/// 403: log an access-forbidden diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForbiddenPolicy;

impl StatusPolicy for ForbiddenPolicy {
    fn handle(&self, failure: &FailedResponse<'_>) {
        error!(method = %failure.method, url = %failure.url, "access forbidden");
    }
}

/// 500: log a server-error diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServerErrorPolicy;

impl StatusPolicy for ServerErrorPolicy {
    fn handle(&self, failure: &FailedResponse<'_>) {
        error!(method = %failure.method, url = %failure.url, "server error");
    }
}

/// Any other status: log the request error with the response payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericErrorPolicy;

impl StatusPolicy for GenericErrorPolicy {
    fn handle(&self, failure: &FailedResponse<'_>) {
        error!(
            method = %failure.method,
            url = %failure.url,
            status = failure.status.as_u16(),
            body = %failure.body,
            "request error"
        );
    }
}

/// Status code → policy table with a fallback for unlisted codes.
#[derive(Clone)]
pub struct StatusPolicies {
    handlers: HashMap<StatusCode, Arc<dyn StatusPolicy>>,
    fallback: Arc<dyn StatusPolicy>,
}

impl StatusPolicies {
    /// An empty table that routes everything to `fallback`.
    pub fn new(fallback: Arc<dyn StatusPolicy>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// The standard table: 401 clears the session, 403 and 500 log
    /// dedicated diagnostics, anything else logs a generic error.
    pub fn standard(tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let mut policies = Self::new(Arc::new(GenericErrorPolicy));
        policies.insert(
            StatusCode::UNAUTHORIZED,
            Arc::new(ClearSessionPolicy::new(tokens, navigator)),
        );
        policies.insert(StatusCode::FORBIDDEN, Arc::new(ForbiddenPolicy));
        policies.insert(StatusCode::INTERNAL_SERVER_ERROR, Arc::new(ServerErrorPolicy));
        policies
    }

    /// Register `policy` for `status`, returning the one it replaced.
    pub fn insert(
        &mut self,
        status: StatusCode,
        policy: Arc<dyn StatusPolicy>,
    ) -> Option<Arc<dyn StatusPolicy>> {
        self.handlers.insert(status, policy)
    }

    pub fn set_fallback(&mut self, policy: Arc<dyn StatusPolicy>) {
        self.fallback = policy;
    }

    /// Whether `status` has a dedicated policy.
    pub fn handles(&self, status: StatusCode) -> bool {
        self.handlers.contains_key(&status)
    }

    /// Run the policy for the failure's status.
    pub fn dispatch(&self, failure: &FailedResponse<'_>) {
        self.handlers
            .get(&failure.status)
            .unwrap_or(&self.fallback)
            .handle(failure);
    }
}
