// User / authentication endpoints
//
// Login and registration only talk to the backend; persisting the returned
// token and updating session state is the caller's job.

use std::sync::Arc;

use tracing::debug;

use crate::Payload;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, RegisterRequest};

/// User session operations.
#[derive(Clone)]
pub struct UserApi {
    client: Arc<ApiClient>,
}

impl UserApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `POST /api/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<Payload, Error> {
        debug!(username = %request.username, "logging in");
        self.client.post("/api/login", request).await
    }

    /// `POST /api/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<Payload, Error> {
        debug!(username = %request.username, "registering user");
        self.client.post("/api/register", request).await
    }

    /// `GET /api/user/info`
    pub async fn get_user_info(&self) -> Result<Payload, Error> {
        self.client.get("/api/user/info", &[]).await
    }
}
