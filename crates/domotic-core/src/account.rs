// ── Account flows ──
//
// Sign-up, login and logout on top of the session store. The widget board
// is not part of the session and survives logout.

use domotic_api::{ApiClient, CreateUser, LoginUser, UserResponse};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::error::CoreError;
use crate::session::SessionStore;

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

#[derive(Debug, Clone)]
pub struct Accounts {
    client: ApiClient,
    session: SessionStore,
}

impl Accounts {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, form: &SignUp) -> Result<UserResponse, CoreError> {
        if form.password.expose_secret() != form.confirm_password.expose_secret() {
            return Err(CoreError::validation("Passwords do not match"));
        }
        let user = self
            .client
            .users()
            .register(&CreateUser {
                username: form.username.clone(),
                email: form.email.clone(),
                password: form.password.clone(),
            })
            .await?;
        info!(email = %form.email, "account registered");
        Ok(user)
    }

    /// Log in and store the token: durable when `remember` is set, for this
    /// session only otherwise.
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
        remember: bool,
    ) -> Result<UserResponse, CoreError> {
        let user = self
            .client
            .users()
            .login(&LoginUser {
                email: email.to_owned(),
                password,
            })
            .await?;
        let token = user
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(CoreError::MissingToken)?;
        self.session.set_token(token, remember)?;
        info!(email, remember, "logged in");
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear_session();
        info!("logged out");
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
