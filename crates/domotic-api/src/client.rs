// Shared async HTTP client for the domotic API.
//
// One instance serves every resource. Authentication is not baked into the
// reqwest client: the injected interceptor decorates each request right
// before it goes out.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Interceptor;
use crate::endpoints::combine_urls;
use crate::error::{Error, ErrorBody};
use crate::services::{Devices, Gateways, Homes, Rooms, Users};
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the home-automation API.
///
/// Cheap to clone; clones share the connection pool and interceptor.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    interceptor: Arc<dyn Interceptor>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a transport config and a request interceptor.
    ///
    /// The base URL is validated up front so a typo in the config surfaces
    /// here rather than on the first request.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http, interceptor)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        interceptor: Arc<dyn Interceptor>,
    ) -> Result<Self, Error> {
        url::Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: base_url.to_owned(),
            interceptor,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Resource facades ─────────────────────────────────────────────

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn homes(&self) -> Homes<'_> {
        Homes::new(self)
    }

    pub fn rooms(&self) -> Rooms<'_> {
        Rooms::new(self)
    }

    pub fn devices(&self) -> Devices<'_> {
        Devices::new(self)
    }

    pub fn gateways(&self) -> Gateways<'_> {
        Gateways::new(self)
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        combine_urls(&self.base_url, path)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let req = self.interceptor.intercept(self.http.get(url));
        let resp = req.send().await.map_err(Error::from_send)?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.post_with_params(path, body, &[]).await
    }

    pub(crate) async fn post_with_params<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url} params={params:?}");

        let req = self.interceptor.intercept(self.http.post(url).query(params).json(body));
        let resp = req.send().await.map_err(Error::from_send)?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let req = self.interceptor.intercept(self.http.put(url).json(body));
        let resp = req.send().await.map_err(Error::from_send)?;
        self.handle_response(resp).await
    }

    /// PUT without a body; the payload travels in the query string and
    /// whatever comes back is ignored.
    pub(crate) async fn put_params_no_response(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), Error> {
        let url = self.url(path);
        debug!("PUT {url} params={params:?}");

        let req = self.interceptor.intercept(self.http.put(url).query(params));
        let resp = req.send().await.map_err(Error::from_send)?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let req = self.interceptor.intercept(self.http.delete(url));
        let resp = req.send().await.map_err(Error::from_send)?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| Error::from_body_read(&e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&raw).ok();
        debug!(
            status = status.as_u16(),
            has_message = body.as_ref().and_then(ErrorBody::message).is_some(),
            "request failed"
        );
        Error::Status {
            status: status.as_u16(),
            body,
        }
    }
}
