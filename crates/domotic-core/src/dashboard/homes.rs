use std::collections::BTreeMap;

use domotic_api::{ApiClient, CreateHome, Home, HomeId, ListQuery, RoomQuery, UpdateHome};
use tracing::warn;

use super::{VIEW_PAGE_SIZE, require};
use crate::error::CoreError;
use crate::store::SortedCollection;

const NAME_AND_ADDRESS_REQUIRED: &str = "Home name and address are required";

/// Create or edit input for a home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeForm {
    pub name: String,
    pub address: String,
}

impl HomeForm {
    fn validate(&self) -> Result<(), CoreError> {
        require(&self.name, NAME_AND_ADDRESS_REQUIRED)?;
        require(&self.address, NAME_AND_ADDRESS_REQUIRED)
    }
}

#[derive(Debug)]
pub struct HomesDashboard {
    client: ApiClient,
    homes: SortedCollection<Home>,
}

impl HomesDashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            homes: SortedCollection::new(),
        }
    }

    pub fn homes(&self) -> &[Home] {
        self.homes.items()
    }

    pub fn get(&self, id: HomeId) -> Option<&Home> {
        self.homes.get(id)
    }

    pub fn filter(&self, term: &str) -> Vec<&Home> {
        self.homes.filter(term)
    }

    pub async fn fetch(&mut self) -> Result<&[Home], CoreError> {
        let page = self.client.homes().list(&ListQuery::default()).await?;
        self.homes.replace_all(page.into_items());
        Ok(self.homes.items())
    }

    pub async fn create(&mut self, form: &HomeForm) -> Result<Home, CoreError> {
        form.validate()?;
        let home = self
            .client
            .homes()
            .create(&CreateHome {
                name: form.name.clone(),
                address: form.address.clone(),
            })
            .await?;
        self.homes.apply_created(home.clone());
        Ok(home)
    }

    pub async fn update(&mut self, id: HomeId, form: &HomeForm) -> Result<Home, CoreError> {
        form.validate()?;
        let home = self
            .client
            .homes()
            .update(
                id,
                &UpdateHome {
                    name: Some(form.name.clone()),
                    address: Some(form.address.clone()),
                },
            )
            .await?;
        if !self.homes.apply_updated(home.clone()) {
            self.homes.apply_created(home.clone());
        }
        Ok(home)
    }

    pub async fn delete(&mut self, id: HomeId) -> Result<(), CoreError> {
        self.client.homes().delete(id).await?;
        self.homes.apply_removed(id);
        Ok(())
    }

    /// Number of rooms per loaded home. A home whose rooms cannot be
    /// fetched counts as zero.
    pub async fn room_counts(&self) -> BTreeMap<HomeId, usize> {
        let query = RoomQuery::page(0, VIEW_PAGE_SIZE);
        let mut counts = BTreeMap::new();
        for home in self.homes.items() {
            let count = match self.client.rooms().list_by_home(home.id, &query).await {
                Ok(page) => page.items().len(),
                Err(e) => {
                    warn!(home_id = home.id, error = %e, "room count unavailable");
                    0
                }
            };
            counts.insert(home.id, count);
        }
        counts
    }
}
