use domotic_api::{ApiClient, CreateRoom, Home, Room, RoomId, RoomQuery, UpdateRoom};

use super::{VIEW_PAGE_SIZE, require};
use crate::error::CoreError;
use crate::store::SortedCollection;

const NAME_REQUIRED: &str = "Room name is required";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomForm {
    pub name: String,
    pub description: Option<String>,
}

/// Rooms of one home.
#[derive(Debug)]
pub struct RoomsDashboard {
    client: ApiClient,
    home: Home,
    rooms: SortedCollection<Room>,
}

impl RoomsDashboard {
    pub fn new(client: ApiClient, home: Home) -> Self {
        Self {
            client,
            home,
            rooms: SortedCollection::new(),
        }
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    pub fn rooms(&self) -> &[Room] {
        self.rooms.items()
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn filter(&self, term: &str) -> Vec<&Room> {
        self.rooms.filter(term)
    }

    pub async fn fetch(&mut self) -> Result<&[Room], CoreError> {
        let page = self
            .client
            .rooms()
            .list_by_home(self.home.id, &RoomQuery::page(0, VIEW_PAGE_SIZE))
            .await?;
        self.rooms.replace_all(page.into_items());
        Ok(self.rooms.items())
    }

    pub async fn create(&mut self, form: &RoomForm) -> Result<Room, CoreError> {
        require(&form.name, NAME_REQUIRED)?;
        let room = self
            .client
            .rooms()
            .create(&CreateRoom {
                home_id: self.home.id,
                name: form.name.clone(),
                description: form.description.clone(),
                image_url: None,
            })
            .await?;
        self.rooms.apply_created(room.clone());
        Ok(room)
    }

    pub async fn update(&mut self, id: RoomId, form: &RoomForm) -> Result<Room, CoreError> {
        require(&form.name, NAME_REQUIRED)?;
        let room = self
            .client
            .rooms()
            .update(
                id,
                &UpdateRoom {
                    name: Some(form.name.clone()),
                    description: form.description.clone(),
                    image_url: None,
                },
            )
            .await?;
        if !self.rooms.apply_updated(room.clone()) {
            self.rooms.apply_created(room.clone());
        }
        Ok(room)
    }

    pub async fn delete(&mut self, id: RoomId) -> Result<(), CoreError> {
        self.client.rooms().delete(id).await?;
        self.rooms.apply_removed(id);
        Ok(())
    }
}
