use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::trace;

/// Something that can produce the current bearer token, if any.
///
/// Consulted on every request, so a token set after the client was built
/// (e.g. right after login) is picked up immediately.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A fixed token, for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.expose_secret().to_owned())
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Request middleware injected into [`ApiClient`](crate::ApiClient) at construction.
///
/// Every outgoing request passes through [`Interceptor::intercept`] right
/// before it is sent.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

impl<F> Interceptor for F
where
    F: Fn(RequestBuilder) -> RequestBuilder + Send + Sync,
{
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        self(request)
    }
}

/// Leaves requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Interceptor for NoAuth {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Attaches `Authorization: Bearer <token>` when the source has a token.
pub struct BearerAuth {
    source: Arc<dyn TokenSource>,
}

impl BearerAuth {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self { source }
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

impl Interceptor for BearerAuth {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        let Some(token) = self.source.token() else {
            return request;
        };
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                trace!("attaching bearer token");
                request.header(AUTHORIZATION, value)
            }
            // A token with control characters cannot be sent; go unauthenticated
            // and let the server reject the call.
            Err(_) => request,
        }
    }
}
