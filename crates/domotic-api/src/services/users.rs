use crate::client::ApiClient;
use crate::endpoints;
use crate::error::ServiceError;
use crate::models::{CreateUser, LoginUser, UserResponse};

const REGISTER_FAILED: &str = "Failed to register user. Please try again.";
const LOGIN_FAILED: &str = "Failed to login. Please check your credentials and try again.";

/// Account endpoints. Registration and login are the only user operations.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, user: &CreateUser) -> Result<UserResponse, ServiceError> {
        self.client
            .post(endpoints::users::REGISTER, user)
            .await
            .map_err(|e| ServiceError::normalize(e, REGISTER_FAILED))
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, credentials: &LoginUser) -> Result<UserResponse, ServiceError> {
        self.client
            .post(endpoints::users::LOGIN, credentials)
            .await
            .map_err(|e| ServiceError::normalize(e, LOGIN_FAILED))
    }
}
