use domotic_api::{ApiClient, CreateGateway, Gateway, GatewayId, ListQuery, UpdateGateway};
use tracing::info;

use super::{VIEW_PAGE_SIZE, require};
use crate::error::CoreError;
use crate::store::SortedCollection;

const NAME_REQUIRED: &str = "ESP32 name is required";

/// ESP32 controllers.
#[derive(Debug)]
pub struct GatewaysDashboard {
    client: ApiClient,
    gateways: SortedCollection<Gateway>,
}

impl GatewaysDashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            gateways: SortedCollection::new(),
        }
    }

    pub fn gateways(&self) -> &[Gateway] {
        self.gateways.items()
    }

    pub fn get(&self, id: GatewayId) -> Option<&Gateway> {
        self.gateways.get(id)
    }

    pub fn filter(&self, term: &str) -> Vec<&Gateway> {
        self.gateways.filter(term)
    }

    pub async fn fetch(&mut self) -> Result<&[Gateway], CoreError> {
        let page = self
            .client
            .gateways()
            .list(&ListQuery::page(0, VIEW_PAGE_SIZE))
            .await?;
        self.gateways.replace_all(page.into_items());
        Ok(self.gateways.items())
    }

    pub async fn create(&mut self, title: &str) -> Result<Gateway, CoreError> {
        require(title, NAME_REQUIRED)?;
        let gateway = self
            .client
            .gateways()
            .create(&CreateGateway {
                title: title.to_owned(),
            })
            .await?;
        self.gateways.apply_created(gateway.clone());
        Ok(gateway)
    }

    pub async fn rename(&mut self, id: GatewayId, title: &str) -> Result<Gateway, CoreError> {
        require(title, NAME_REQUIRED)?;
        self.put_title(id, title.to_owned()).await
    }

    /// Have the server issue a fresh token by re-submitting the current
    /// title unchanged.
    pub async fn rotate_token(&mut self, id: GatewayId) -> Result<Gateway, CoreError> {
        let title = match self.gateways.get(id) {
            Some(gateway) => gateway.title_or_default().to_owned(),
            None => self
                .client
                .gateways()
                .get(id)
                .await?
                .title
                .unwrap_or_default(),
        };
        let gateway = self.put_title(id, title).await?;
        info!(gateway_id = id, "gateway token rotated");
        Ok(gateway)
    }

    pub async fn delete(&mut self, id: GatewayId) -> Result<(), CoreError> {
        self.client.gateways().delete(id).await?;
        self.gateways.apply_removed(id);
        Ok(())
    }

    async fn put_title(&mut self, id: GatewayId, title: String) -> Result<Gateway, CoreError> {
        let gateway = self
            .client
            .gateways()
            .update(id, &UpdateGateway { title: Some(title) })
            .await?;
        if !self.gateways.apply_updated(gateway.clone()) {
            self.gateways.apply_created(gateway.clone());
        }
        Ok(gateway)
    }
}
