// HTTP client for the Voglander REST backend
//
// Wraps `reqwest::Client` with base-URL joining, the request interceptor
// chain and the status policy table. Callers only ever see the decoded
// response body; failed responses run their status policy first and are
// then returned as `Error::Status`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::interceptor::{
    AuthInterceptor, FailedResponse, RequestInterceptor, StatusPolicies, StatusPolicy,
};
use crate::navigator::Navigator;
use crate::token::TokenStore;
use crate::transport::TransportConfig;

/// Shared client for every resource API.
///
/// Built once and handed to [`DeviceApi`](crate::DeviceApi) and
/// [`UserApi`](crate::UserApi); there is no process-wide instance.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    tokens: Arc<dyn TokenStore>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    policies: StatusPolicies,
}

impl ApiClient {
    /// Build a client with the standard interceptor chain (bearer token)
    /// and the standard status policies.
    pub fn new(
        transport: &TransportConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            transport.base_url.clone(),
            transport.timeout,
            tokens,
            navigator,
        ))
    }

    /// Build around a pre-configured `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let policies = StatusPolicies::standard(Arc::clone(&tokens), navigator);
        let auth: Arc<dyn RequestInterceptor> =
            Arc::new(AuthInterceptor::new(Arc::clone(&tokens)));
        Self {
            http,
            base_url,
            timeout,
            interceptors: vec![auth],
            tokens,
            policies,
        }
    }

    /// Append a request interceptor; it runs after the built-in ones.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Register or replace the policy for `status`.
    #[must_use]
    pub fn with_policy(mut self, status: StatusCode, policy: Arc<dyn StatusPolicy>) -> Self {
        self.policies.insert(status, policy);
        self
    }

    /// Replace the policy used for statuses without a dedicated entry.
    #[must_use]
    pub fn with_fallback_policy(mut self, policy: Arc<dyn StatusPolicy>) -> Self {
        self.policies.set_fallback(policy);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store consulted by the auth interceptor.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}{path}`, keeping any path prefix present in the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `GET path?query`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        self.execute(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE path` without a body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute(Method::DELETE, path, &[], None).await
    }

    /// `DELETE path` with a JSON body.
    pub async fn delete_with_body<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, Error> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::DELETE, path, &[], Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(ref body) = body {
            builder = builder.json(body);
        }
        for interceptor in &self.interceptors {
            builder = interceptor.intercept(builder)?;
        }

        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let body = error_body(&text);
            self.policies.dispatch(&FailedResponse {
                method: &method,
                url: &url,
                status,
                body: &body,
            });
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode(&text)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Decode a failed response body: JSON if possible, the raw text otherwise.
fn error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// Decode a successful response body; an empty body decodes as `null`.
fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let result = if text.trim().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_str(text)
    };
    result.map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: text.to_owned(),
        }
    })
}
