// Device resource endpoints
//
// One method per backend operation under `/api/v1/device`. Path
// parameters are substituted verbatim, filters travel as query
// parameters, bodies as JSON. Batch operations use the backend's own
// batch endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::Payload;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Device, DeviceId};
use crate::query::entity_query;

const BASE: &str = "/api/v1/device";

/// Device management operations.
#[derive(Clone)]
pub struct DeviceApi {
    client: Arc<ApiClient>,
}

impl DeviceApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// `GET /api/v1/device/get/{id}`
    pub async fn get_by_id(&self, id: &DeviceId) -> Result<Payload, Error> {
        debug!(%id, "fetching device");
        self.client.get(&format!("{BASE}/get/{id}"), &[]).await
    }

    /// `GET /api/v1/device/get?<device>`
    pub async fn get_by_entity(&self, device: &Device) -> Result<Payload, Error> {
        let query = entity_query(device)?;
        self.client.get(&format!("{BASE}/get"), &query).await
    }

    /// `GET /api/v1/device/list?<filter>`; `None` sends no filter.
    pub async fn get_list(&self, filter: Option<&Device>) -> Result<Payload, Error> {
        let query = match filter {
            Some(device) => entity_query(device)?,
            None => Vec::new(),
        };
        self.client.get(&format!("{BASE}/list"), &query).await
    }

    /// `GET /api/v1/device/pageListByEntity/{page}/{size}?<filter>`
    pub async fn get_page_list_by_entity(
        &self,
        page: u64,
        size: u64,
        filter: Option<&Device>,
    ) -> Result<Payload, Error> {
        let query = match filter {
            Some(device) => entity_query(device)?,
            None => Vec::new(),
        };
        self.client
            .get(&format!("{BASE}/pageListByEntity/{page}/{size}"), &query)
            .await
    }

    /// `GET /api/v1/device/pageList/{page}/{size}`
    pub async fn get_page_list(&self, page: u64, size: u64) -> Result<Payload, Error> {
        self.client
            .get(&format!("{BASE}/pageList/{page}/{size}"), &[])
            .await
    }

    /// `GET /api/v1/device/count`
    pub async fn get_count(&self) -> Result<Payload, Error> {
        self.client.get(&format!("{BASE}/count"), &[]).await
    }

    /// `GET /api/v1/device/countByEntity?<device>`
    pub async fn get_count_by_entity(&self, device: &Device) -> Result<Payload, Error> {
        let query = entity_query(device)?;
        self.client
            .get(&format!("{BASE}/countByEntity"), &query)
            .await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// `POST /api/v1/device/insert`
    pub async fn insert(&self, device: &Device) -> Result<Payload, Error> {
        self.client.post(&format!("{BASE}/insert"), device).await
    }

    /// `POST /api/v1/device/insertBatch`
    pub async fn insert_batch(&self, devices: &[Device]) -> Result<Payload, Error> {
        debug!(count = devices.len(), "inserting devices");
        self.client
            .post(&format!("{BASE}/insertBatch"), devices)
            .await
    }

    /// `PUT /api/v1/device/update`
    pub async fn update(&self, device: &Device) -> Result<Payload, Error> {
        self.client.put(&format!("{BASE}/update"), device).await
    }

    /// `PUT /api/v1/device/updateBatch`
    pub async fn update_batch(&self, devices: &[Device]) -> Result<Payload, Error> {
        debug!(count = devices.len(), "updating devices");
        self.client
            .put(&format!("{BASE}/updateBatch"), devices)
            .await
    }

    // ── Deletes ──────────────────────────────────────────────────────

    /// `DELETE /api/v1/device/delete/{id}`
    pub async fn delete_by_id(&self, id: &DeviceId) -> Result<Payload, Error> {
        debug!(%id, "deleting device");
        self.client.delete(&format!("{BASE}/delete/{id}")).await
    }

    /// `DELETE /api/v1/device/deleteByEntity` with the entity as body.
    pub async fn delete_by_entity(&self, device: &Device) -> Result<Payload, Error> {
        self.client
            .delete_with_body(&format!("{BASE}/deleteByEntity"), device)
            .await
    }

    /// `DELETE /api/v1/device/deleteIds` with the id array as body.
    pub async fn delete_batch(&self, ids: &[DeviceId]) -> Result<Payload, Error> {
        debug!(count = ids.len(), "deleting devices");
        self.client
            .delete_with_body(&format!("{BASE}/deleteIds"), ids)
            .await
    }
}
