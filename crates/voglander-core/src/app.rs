// ── Application facade ──
//
// Wires one `ApiClient` to the resource APIs, the two stores and the
// route table. Session and device-list flows live here so the CLI and
// the views share a single implementation.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info};

use voglander_api::{
    AjaxResult, ApiClient, Device, DeviceApi, LoginRequest, LoginResponse, Navigator, Page,
    RegisterRequest, TokenStore, TransportConfig, User, UserApi,
};

use crate::config::AppConfig;
use crate::error::CoreError;
use crate::router::RouteTable;
use crate::store::{DeviceStore, UserStore};

// ── LoadedPage ───────────────────────────────────────────────────

/// Result of [`App::load_devices`]: the stored list plus paging metadata.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// The list now held by the device store.
    pub devices: Arc<Vec<Device>>,
    pub total: u64,
    pub current: u64,
    pub pages: u64,
}

// ── App ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<AppInner>`.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: AppConfig,
    client: Arc<ApiClient>,
    device_api: DeviceApi,
    user_api: UserApi,
    user_store: UserStore,
    device_store: DeviceStore,
    routes: RouteTable,
}

impl App {
    /// Build the HTTP client from `config` and wire everything to it.
    pub fn new(
        config: AppConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let transport =
            TransportConfig::new(config.api_base_url.clone()).with_timeout(config.timeout);
        let client = ApiClient::new(&transport, tokens, navigator)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Wire around an already built client.
    pub fn with_client(config: AppConfig, client: Arc<ApiClient>) -> Self {
        Self {
            inner: Arc::new(AppInner {
                device_api: DeviceApi::new(Arc::clone(&client)),
                user_api: UserApi::new(Arc::clone(&client)),
                client,
                config,
                user_store: UserStore::new(),
                device_store: DeviceStore::new(),
                routes: RouteTable::standard(),
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.inner.client
    }

    pub fn device_api(&self) -> &DeviceApi {
        &self.inner.device_api
    }

    pub fn user_api(&self) -> &UserApi {
        &self.inner.user_api
    }

    pub fn user_store(&self) -> &UserStore {
        &self.inner.user_store
    }

    pub fn device_store(&self) -> &DeviceStore {
        &self.inner.device_store
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    // ── Session ──────────────────────────────────────────────────

    /// Log in, persist the returned access token and load the user.
    pub async fn login(&self, username: &str, password: SecretString) -> Result<User, CoreError> {
        let payload = self
            .inner
            .user_api
            .login(&LoginRequest::new(username, password))
            .await?;
        let login: LoginResponse = unwrap_data(payload)?.ok_or_else(|| CoreError::Rejected {
            code: 0,
            message: "login response carried no access token".into(),
        })?;

        self.inner.client.tokens().set(login.access_token)?;
        info!(username, "logged in");
        self.refresh_user().await
    }

    /// Register a new account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<Value>, CoreError> {
        let payload = self.inner.user_api.register(request).await?;
        let data = unwrap_data(payload)?;
        info!(username = %request.username, "registered");
        Ok(data)
    }

    /// Fetch the current user and store it.
    pub async fn refresh_user(&self) -> Result<User, CoreError> {
        let payload = self.inner.user_api.get_user_info().await?;
        let user: User = unwrap_data(payload)?.ok_or_else(|| CoreError::Unauthorized {
            message: "no user information returned".into(),
        })?;
        self.inner.user_store.set_user(user.clone());
        Ok(user)
    }

    /// Drop the session token and clear the user store.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.inner.client.tokens().remove()?;
        self.inner.user_store.logout();
        debug!("logged out");
        Ok(())
    }

    /// Whether a session token is currently stored.
    pub fn has_token(&self) -> Result<bool, CoreError> {
        Ok(self.inner.client.tokens().get()?.is_some())
    }

    // ── Devices ──────────────────────────────────────────────────

    /// Fetch one page into the device store. The loading flag is set for
    /// the duration of the request and cleared whatever the outcome.
    pub async fn load_devices(&self, page: u64, size: u64) -> Result<LoadedPage, CoreError> {
        let store = &self.inner.device_store;
        store.set_loading(true);
        let result = self.inner.device_api.get_page_list(page, size).await;
        store.set_loading(false);

        let page = into_page(unwrap_data(result?)?.unwrap_or(Value::Null))?;
        let devices = store.set_devices(page.records);
        Ok(LoadedPage {
            devices,
            total: page.total,
            current: page.current,
            pages: page.pages,
        })
    }

    /// Fetch the (optionally filtered) full list into the device store.
    pub async fn load_device_list(
        &self,
        filter: Option<&Device>,
    ) -> Result<Arc<Vec<Device>>, CoreError> {
        let store = &self.inner.device_store;
        store.set_loading(true);
        let result = self.inner.device_api.get_list(filter).await;
        store.set_loading(false);

        let page = into_page(unwrap_data(result?)?.unwrap_or(Value::Null))?;
        Ok(store.set_devices(page.records))
    }

    // ── Navigation ───────────────────────────────────────────────

    /// Resolve `path` through the route table and render its view.
    pub async fn navigate(&self, path: &str) -> Result<String, CoreError> {
        let view = self.inner.routes.resolve(path).await?;
        debug!(path, view = view.name(), "navigating");
        view.render(self).await
    }
}

// ── Payload helpers ──────────────────────────────────────────────

/// Decode the backend envelope and return its `data`.
fn unwrap_data<T: serde::de::DeserializeOwned>(payload: Value) -> Result<Option<T>, CoreError> {
    Ok(AjaxResult::<T>::from_payload(payload)?.into_data()?)
}

/// Accept either a `Page` object or a bare array of devices.
fn into_page(data: Value) -> Result<Page<Device>, CoreError> {
    match data {
        Value::Null => Ok(empty_page(Vec::new())),
        Value::Array(_) => {
            let records: Vec<Device> = serde_json::from_value(data)
                .map_err(|e| CoreError::Internal(format!("Unexpected device list: {e}")))?;
            Ok(empty_page(records))
        }
        other => serde_json::from_value(other)
            .map_err(|e| CoreError::Internal(format!("Unexpected device page: {e}"))),
    }
}

fn empty_page(records: Vec<Device>) -> Page<Device> {
    let total = u64::try_from(records.len()).unwrap_or(u64::MAX);
    Page {
        records,
        total,
        size: total,
        current: 1,
        pages: 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn into_page_accepts_page_object_array_and_null() {
        let page = into_page(json!({
            "records": [{ "id": 1 }, { "id": 2 }],
            "total": 12, "size": 2, "current": 3, "pages": 6
        }))
        .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!((page.total, page.current, page.pages), (12, 3, 6));

        let page = into_page(json!([{ "id": 1 }])).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.current, 1);

        assert!(into_page(Value::Null).unwrap().records.is_empty());
    }

    #[test]
    fn into_page_rejects_scalars() {
        assert!(matches!(into_page(json!(5)), Err(CoreError::Internal(_))));
    }
}
