use serde_json::{Map, Value};

use super::DEFAULT_PAGE_SIZE;
use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ServiceError;
use crate::models::{CreateRoom, HomeId, Page, Room, RoomId, SortOrder, UpdateRoom};

const CREATE_FAILED: &str = "Failed to create room. Please try again.";
const GET_FAILED: &str = "Failed to get room. Please try again.";
const UPDATE_FAILED: &str = "Failed to update room. Please try again.";
const DELETE_FAILED: &str = "Failed to delete room. Please try again.";
const LIST_FAILED: &str = "Failed to fetch rooms. Please try again.";

/// Paging, sorting and filtering for a home's room listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomQuery {
    pub page: u32,
    pub size: u32,
    pub sort_order: Option<SortOrder>,
    pub sort_by: Option<String>,
    pub filter: Map<String, Value>,
}

impl Default for RoomQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_order: None,
            sort_by: None,
            filter: Map::new(),
        }
    }
}

impl RoomQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(order) = self.sort_order {
            params.push(("sortOrder", order.to_string()));
        }
        if let Some(by) = &self.sort_by {
            params.push(("sortBy", by.clone()));
        }
        params
    }

    /// Filter merged with paging and sorting; explicit paging wins.
    fn body(&self) -> Map<String, Value> {
        let mut body = self.filter.clone();
        body.insert("page".into(), self.page.into());
        body.insert("size".into(), self.size.into());
        if let Some(order) = self.sort_order {
            body.insert("sortOrder".into(), order.to_string().into());
        }
        if let Some(by) = &self.sort_by {
            body.insert("sortBy".into(), by.clone().into());
        }
        body
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rooms<'a> {
    client: &'a ApiClient,
}

impl<'a> Rooms<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, room: &CreateRoom) -> Result<Room, ServiceError> {
        self.client
            .post(endpoints::rooms::CREATE, room)
            .await
            .map_err(|e| ServiceError::normalize(e, CREATE_FAILED))
    }

    pub async fn get(&self, id: RoomId) -> Result<Room, ServiceError> {
        self.client
            .get(&endpoints::rooms::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, GET_FAILED))
    }

    pub async fn update(&self, id: RoomId, room: &UpdateRoom) -> Result<Room, ServiceError> {
        self.client
            .put(&endpoints::rooms::by_id(id), room)
            .await
            .map_err(|e| ServiceError::normalize(e, UPDATE_FAILED))
    }

    pub async fn delete(&self, id: RoomId) -> Result<(), ServiceError> {
        self.client
            .delete(&endpoints::rooms::by_id(id))
            .await
            .map_err(|e| ServiceError::normalize(e, DELETE_FAILED))
    }

    /// One page of rooms belonging to `home_id`.
    ///
    /// Sorting is forwarded both as query parameters and inside the body.
    pub async fn list_by_home(
        &self,
        home_id: HomeId,
        query: &RoomQuery,
    ) -> Result<Page<Room>, ServiceError> {
        self.client
            .post_with_params(
                &endpoints::rooms::all_by_home(home_id),
                &query.body(),
                &query.query_params(),
            )
            .await
            .map_err(|e| ServiceError::normalize(e, LIST_FAILED))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unsorted_query_omits_sort_fields() {
        let query = RoomQuery::default();
        assert_eq!(
            query.query_params(),
            vec![("page", "0".to_owned()), ("size", "10".to_owned())]
        );
        assert_eq!(Value::Object(query.body()), json!({ "page": 0, "size": 10 }));
    }

    #[test]
    fn sorting_lands_in_query_and_body() {
        let mut query = RoomQuery::page(2, 5).sorted("name", SortOrder::Desc);
        query.filter.insert("name".into(), "kit".into());
        query.filter.insert("page".into(), 99.into());

        assert!(query.query_params().contains(&("sortOrder", "DESC".to_owned())));
        assert!(query.query_params().contains(&("sortBy", "name".to_owned())));
        assert_eq!(
            Value::Object(query.body()),
            json!({ "name": "kit", "page": 2, "size": 5, "sortOrder": "DESC", "sortBy": "name" })
        );
    }
}
