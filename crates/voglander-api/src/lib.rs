// voglander-api: Async Rust client for the Voglander device-management REST API
//
// One explicitly constructed `ApiClient` carries the transport settings,
// the request interceptor chain (bearer-token injection) and the status
// policy table consulted on failed responses. `DeviceApi` and `UserApi`
// map each backend operation onto exactly one request.

pub mod client;
pub mod device;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod navigator;
pub mod query;
pub mod token;
pub mod transport;
pub mod user;

pub use client::ApiClient;
pub use device::DeviceApi;
pub use error::Error;
pub use interceptor::{
    AuthInterceptor, ClearSessionPolicy, FailedResponse, ForbiddenPolicy, GenericErrorPolicy,
    RequestInterceptor, ServerErrorPolicy, StatusPolicies, StatusPolicy,
};
pub use models::{
    AjaxResult, Device, DeviceId, LoginRequest, LoginResponse, Page, RegisterRequest, User,
};
pub use navigator::{LOGIN_PATH, LogNavigator, Navigator, RecordingNavigator};
pub use token::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TransportConfig};
pub use user::UserApi;

/// Unwrapped response payload as handed to callers.
pub type Payload = serde_json::Value;
