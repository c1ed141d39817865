use super::ListQuery;
use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ServiceError;
use crate::models::{CreateGateway, Gateway, GatewayId, Page, UpdateGateway};

const CREATE_FAILED: &str = "Failed to create ESP32 device. Please try again.";
const GET_FAILED: &str = "Failed to get ESP32 device. Please try again.";
const UPDATE_FAILED: &str = "Failed to update ESP32 device. Please try again.";
const DELETE_FAILED: &str = "Failed to delete ESP32 device. Please try again.";
const LIST_FAILED: &str = "Failed to fetch ESP32 devices. Please try again.";

/// ESP32 gateway (controller) endpoints under `/api/v1/esp32`.
#[derive(Debug, Clone, Copy)]
pub struct Gateways<'a> {
    client: &'a ApiClient,
}

impl<'a> Gateways<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Register a gateway; the server generates its token.
    pub async fn create(&self, gateway: &CreateGateway) -> Result<Gateway, ServiceError> {
        self.client
            .post(endpoints::gateways::CREATE, gateway)
            .await
            .map_err(|e| ServiceError::normalize(e, CREATE_FAILED))
    }

    pub async fn get(&self, id: GatewayId) -> Result<Gateway, ServiceError> {
        self.client
            .get(&endpoints::gateways::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, GET_FAILED))
    }

    pub async fn update(
        &self,
        id: GatewayId,
        gateway: &UpdateGateway,
    ) -> Result<Gateway, ServiceError> {
        self.client
            .put(&endpoints::gateways::by_id(id), gateway)
            .await
            .map_err(|e| ServiceError::normalize(e, UPDATE_FAILED))
    }

    pub async fn delete(&self, id: GatewayId) -> Result<(), ServiceError> {
        self.client
            .delete(&endpoints::gateways::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, DELETE_FAILED))
    }

    /// One page of gateways. The filter is the whole body; paging rides in
    /// the query string only.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Gateway>, ServiceError> {
        self.client
            .post_with_params(endpoints::gateways::ALL, &query.filter, &query.query_params())
            .await
            .map_err(|e| ServiceError::normalize(e, LIST_FAILED))
    }
}
