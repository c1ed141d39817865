use serde_json::json;

use super::ListQuery;
use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ServiceError;
use crate::models::{CreateHome, Home, HomeId, Page, UpdateHome};

const CREATE_FAILED: &str = "Failed to create home. Please try again.";
const GET_FAILED: &str = "Failed to get home. Please try again.";
const UPDATE_FAILED: &str = "Failed to update home. Please try again.";
const DELETE_FAILED: &str = "Failed to delete home. Please try again.";
const LIST_FAILED: &str = "Failed to fetch homes. Please try again.";

#[derive(Debug, Clone, Copy)]
pub struct Homes<'a> {
    client: &'a ApiClient,
}

impl<'a> Homes<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, home: &CreateHome) -> Result<Home, ServiceError> {
        self.client
            .post(endpoints::homes::CREATE, home)
            .await
            .map_err(|e| ServiceError::normalize(e, CREATE_FAILED))
    }

    pub async fn get(&self, id: HomeId) -> Result<Home, ServiceError> {
        self.client
            .get(&endpoints::homes::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, GET_FAILED))
    }

    pub async fn update(&self, id: HomeId, home: &UpdateHome) -> Result<Home, ServiceError> {
        self.client
            .put(&endpoints::homes::by_id(id), home)
            .await
            .map_err(|e| ServiceError::normalize(e, UPDATE_FAILED))
    }

    pub async fn delete(&self, id: HomeId) -> Result<(), ServiceError> {
        self.client
            .delete(&endpoints::homes::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, DELETE_FAILED))
    }

    /// One page of the caller's homes.
    ///
    /// Paging goes out twice: as query parameters, and wrapped in a
    /// `{"params": {...}}` body together with the filter.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Home>, ServiceError> {
        let body = json!({ "params": query.merged() });
        self.client
            .post_with_params(endpoints::homes::ALL, &body, &query.query_params())
            .await
            .map_err(|e| ServiceError::normalize(e, LIST_FAILED))
    }
}
