use serde_json::json;

use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ServiceError;
use crate::models::{CreateDevice, Device, DeviceId, Page, RoomId, UpdateDevice};

/// Page size used when listing a room's devices.
pub const DEVICE_PAGE_SIZE: u32 = 100;

const CREATE_FAILED: &str = "Failed to create device. Please try again.";
const WRITE_FAILED: &str = "Failed to write device data. Please try again.";
const GET_FAILED: &str = "Failed to get device. Please try again.";
const UPDATE_FAILED: &str = "Failed to update device. Please try again.";
const DELETE_FAILED: &str = "Failed to delete device. Please try again.";
const LIST_FAILED: &str = "Failed to fetch devices for this room. Please try again.";

/// Paging for a room's device listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceQuery {
    pub page: u32,
    pub size: u32,
}

impl Default for DeviceQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEVICE_PAGE_SIZE,
        }
    }
}

impl DeviceQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Devices<'a> {
    client: &'a ApiClient,
}

impl<'a> Devices<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, device: &CreateDevice) -> Result<Device, ServiceError> {
        self.client
            .post(endpoints::devices::CREATE, device)
            .await
            .map_err(|e| ServiceError::normalize(e, CREATE_FAILED))
    }

    /// Send a raw value to the device (`PUT .../write?data=<value>`).
    ///
    /// The response carries nothing useful; re-fetch the device to observe
    /// the new state.
    pub async fn write_data(&self, id: DeviceId, value: &str) -> Result<(), ServiceError> {
        self.client
            .put_params_no_response(&endpoints::devices::write(id), &[("data", value.to_owned())])
            .await
            .map_err(|e| ServiceError::normalize(e, WRITE_FAILED))
    }

    pub async fn get(&self, id: DeviceId) -> Result<Device, ServiceError> {
        self.client
            .get(&endpoints::devices::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, GET_FAILED))
    }

    pub async fn update(&self, id: DeviceId, device: &UpdateDevice) -> Result<Device, ServiceError> {
        self.client
            .put(&endpoints::devices::by_id(id), device)
            .await
            .map_err(|e| ServiceError::normalize(e, UPDATE_FAILED))
    }

    pub async fn delete(&self, id: DeviceId) -> Result<(), ServiceError> {
        self.client
            .delete(&endpoints::devices::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, DELETE_FAILED))
    }

    /// One page of devices in `room_id`; `DeviceQuery::default()` asks for
    /// the first [`DEVICE_PAGE_SIZE`] devices.
    pub async fn list_by_room(
        &self,
        room_id: RoomId,
        query: &DeviceQuery,
    ) -> Result<Page<Device>, ServiceError> {
        let body = json!({ "params": { "page": query.page, "size": query.size } });
        self.client
            .post_with_params(
                &endpoints::devices::all_by_room(room_id),
                &body,
                &[("page", query.page.to_string()), ("size", query.size.to_string())],
            )
            .await
            .map_err(|e| ServiceError::normalize(e, LIST_FAILED))
    }
}
