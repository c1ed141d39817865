// ── Selection wizard ──
//
// Three-step picker (home, then room, then device) that ends by handing a
// device plus its room and home names to the widget board.

use std::future::Future;

use domotic_api::{
    ApiClient, DEVICE_PAGE_SIZE, Device, DeviceId, DeviceQuery, Home, HomeId, ListQuery, Room,
    RoomId, RoomQuery, ServiceError,
};
use strum::Display;
use tracing::debug;

use crate::error::CoreError;
use crate::store::{Identified, Named, SortedCollection};

/// Where the wizard stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WizardStep {
    #[strum(to_string = "selecting a home")]
    SelectingHome,
    #[strum(to_string = "selecting a room")]
    SelectingRoom,
    #[strum(to_string = "selecting a device")]
    SelectingDevice,
    #[strum(to_string = "cancelled")]
    Cancelled,
}

/// The outcome of a confirmed wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSelection {
    pub device: Device,
    pub room_name: String,
    pub home_name: String,
}

/// Listing calls the wizard needs on entry to each step.
pub trait WizardSource {
    fn list_homes(&self) -> impl Future<Output = Result<Vec<Home>, ServiceError>> + Send;
    fn list_rooms(
        &self,
        home_id: HomeId,
    ) -> impl Future<Output = Result<Vec<Room>, ServiceError>> + Send;
    fn list_devices(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<Device>, ServiceError>> + Send;
}

impl WizardSource for ApiClient {
    async fn list_homes(&self) -> Result<Vec<Home>, ServiceError> {
        Ok(self.homes().list(&ListQuery::default()).await?.into_items())
    }

    async fn list_rooms(&self, home_id: HomeId) -> Result<Vec<Room>, ServiceError> {
        let query = RoomQuery::page(0, DEVICE_PAGE_SIZE);
        Ok(self.rooms().list_by_home(home_id, &query).await?.into_items())
    }

    async fn list_devices(&self, room_id: RoomId) -> Result<Vec<Device>, ServiceError> {
        Ok(self
            .devices()
            .list_by_room(room_id, &DeviceQuery::default())
            .await?
            .into_items())
    }
}

#[derive(Debug)]
pub struct SelectionWizard {
    step: WizardStep,
    homes: SortedCollection<Home>,
    rooms: SortedCollection<Room>,
    devices: SortedCollection<Device>,
    home: Option<Home>,
    room: Option<Room>,
    device: Option<Device>,
    error: Option<String>,
}

impl Default for SelectionWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectingHome,
            homes: SortedCollection::new(),
            rooms: SortedCollection::new(),
            devices: SortedCollection::new(),
            home: None,
            room: None,
            device: None,
            error: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn homes(&self) -> &[Home] {
        self.homes.items()
    }

    pub fn rooms(&self) -> &[Room] {
        self.rooms.items()
    }

    pub fn devices(&self) -> &[Device] {
        self.devices.items()
    }

    pub fn selected_home(&self) -> Option<&Home> {
        self.home.as_ref()
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn selected_device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    /// Message of the last failed fetch, cleared by the next successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_confirm(&self) -> bool {
        self.step == WizardStep::SelectingDevice && self.device.is_some()
    }

    /// Names in the current step's list containing `term`, ignoring case.
    pub fn filter(&self, term: &str) -> Vec<(i64, String)> {
        match self.step {
            WizardStep::SelectingHome => pairs(self.homes.filter(term)),
            WizardStep::SelectingRoom => pairs(self.rooms.filter(term)),
            WizardStep::SelectingDevice => pairs(self.devices.filter(term)),
            WizardStep::Cancelled => Vec::new(),
        }
    }

    // ── Fetch on entry ───────────────────────────────────────────────

    /// Fetch the list for the current step. On failure the message is kept
    /// in [`error`](Self::error) and the call may simply be repeated.
    pub async fn load<S: WizardSource>(&mut self, source: &S) -> Result<(), CoreError> {
        let result = match (self.step, &self.home, &self.room) {
            (WizardStep::SelectingHome, _, _) => source
                .list_homes()
                .await
                .map(|homes| self.homes.replace_all(homes)),
            (WizardStep::SelectingRoom, Some(home), _) => {
                let home_id = home.id;
                source
                    .list_rooms(home_id)
                    .await
                    .map(|rooms| self.rooms.replace_all(rooms))
            }
            (WizardStep::SelectingDevice, _, Some(room)) => {
                let room_id = room.id;
                source
                    .list_devices(room_id)
                    .await
                    .map(|devices| self.devices.replace_all(devices))
            }
            (step, _, _) => {
                return Err(CoreError::WizardStep {
                    action: "load",
                    step,
                });
            }
        };

        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                debug!(step = %self.step, error = %e, "wizard fetch failed");
                self.error = Some(e.message().to_owned());
                Err(e.into())
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Pick a home from the loaded list and move on to rooms.
    pub fn choose_home(&mut self, id: HomeId) -> Result<(), CoreError> {
        self.expect_step(WizardStep::SelectingHome, "choose a home")?;
        let home = self.homes.get(id).cloned().ok_or(CoreError::NotFound {
            entity: "home",
            id,
        })?;
        self.home = Some(home);
        self.room = None;
        self.device = None;
        self.rooms = SortedCollection::new();
        self.devices = SortedCollection::new();
        self.step = WizardStep::SelectingRoom;
        Ok(())
    }

    /// Pick a room and move on to devices.
    pub fn choose_room(&mut self, id: RoomId) -> Result<(), CoreError> {
        self.expect_step(WizardStep::SelectingRoom, "choose a room")?;
        let room = self.rooms.get(id).cloned().ok_or(CoreError::NotFound {
            entity: "room",
            id,
        })?;
        self.room = Some(room);
        self.device = None;
        self.devices = SortedCollection::new();
        self.step = WizardStep::SelectingDevice;
        Ok(())
    }

    /// Pick (or re-pick) a device. Stays on the device step.
    pub fn choose_device(&mut self, id: DeviceId) -> Result<(), CoreError> {
        self.expect_step(WizardStep::SelectingDevice, "choose a device")?;
        let device = self.devices.get(id).cloned().ok_or(CoreError::NotFound {
            entity: "device",
            id,
        })?;
        self.device = Some(device);
        Ok(())
    }

    /// Step back, discarding the current step's choice. Backing out of the
    /// first step cancels the wizard.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::SelectingDevice => {
                self.device = None;
                WizardStep::SelectingRoom
            }
            WizardStep::SelectingRoom => {
                self.room = None;
                WizardStep::SelectingHome
            }
            WizardStep::SelectingHome | WizardStep::Cancelled => WizardStep::Cancelled,
        };
        self.error = None;
        self.step
    }

    pub fn cancel(&mut self) {
        self.step = WizardStep::Cancelled;
    }

    /// Finish the wizard with the chosen device.
    pub fn confirm(&self) -> Result<WidgetSelection, CoreError> {
        match (&self.step, &self.home, &self.room, &self.device) {
            (WizardStep::SelectingDevice, Some(home), Some(room), Some(device)) => {
                Ok(WidgetSelection {
                    device: device.clone(),
                    room_name: room.name.clone(),
                    home_name: home.name.clone(),
                })
            }
            _ => Err(CoreError::WizardStep {
                action: "confirm",
                step: self.step,
            }),
        }
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), CoreError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CoreError::WizardStep {
                action,
                step: self.step,
            })
        }
    }
}

fn pairs<T: Named + Identified>(items: Vec<&T>) -> Vec<(i64, String)> {
    items
        .into_iter()
        .map(|i| (i.id(), i.name().to_owned()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use domotic_api::{ControlType, Label};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        fail_rooms: bool,
    }

    impl WizardSource for Fixture {
        async fn list_homes(&self) -> Result<Vec<Home>, ServiceError> {
            Ok(vec![
                Home {
                    id: 2,
                    name: "Villa".into(),
                    address: "Main St".into(),
                },
                Home {
                    id: 1,
                    name: "Cabin".into(),
                    address: "Lake Rd".into(),
                },
            ])
        }

        async fn list_rooms(&self, home_id: HomeId) -> Result<Vec<Room>, ServiceError> {
            if self.fail_rooms {
                return Err(ServiceError::normalize(
                    domotic_api::Error::NoResponse("refused".into()),
                    "Failed to fetch rooms. Please try again.",
                ));
            }
            Ok(vec![Room {
                id: 10,
                home_id: Some(home_id),
                name: "Kitchen".into(),
                description: None,
                image_url: None,
            }])
        }

        async fn list_devices(&self, room_id: RoomId) -> Result<Vec<Device>, ServiceError> {
            Ok(vec![Device {
                id: 100,
                room_id: Some(room_id),
                name: "Lamp".into(),
                label: Label::Light,
                control_type: ControlType::Switch,
                current_value: None,
                esp32_device_id: Some(1),
            }])
        }
    }

    async fn at_device_step(wizard: &mut SelectionWizard) {
        let source = Fixture { fail_rooms: false };
        wizard.load(&source).await.unwrap();
        wizard.choose_home(2).unwrap();
        wizard.load(&source).await.unwrap();
        wizard.choose_room(10).unwrap();
        wizard.load(&source).await.unwrap();
    }

    #[tokio::test]
    async fn happy_path_confirms_selection() {
        let mut wizard = SelectionWizard::new();
        at_device_step(&mut wizard).await;

        assert!(!wizard.can_confirm());
        wizard.choose_device(100).unwrap();
        let selection = wizard.confirm().unwrap();
        assert_eq!(selection.device.id, 100);
        assert_eq!(selection.room_name, "Kitchen");
        assert_eq!(selection.home_name, "Villa");
    }

    #[tokio::test]
    async fn homes_are_sorted() {
        let mut wizard = SelectionWizard::new();
        wizard.load(&Fixture { fail_rooms: false }).await.unwrap();
        let names: Vec<&str> = wizard.homes().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Cabin", "Villa"]);
    }

    #[tokio::test]
    async fn back_from_device_discards_choice() {
        let mut wizard = SelectionWizard::new();
        at_device_step(&mut wizard).await;
        wizard.choose_device(100).unwrap();

        assert_eq!(wizard.back(), WizardStep::SelectingRoom);
        assert!(wizard.selected_device().is_none());
        assert!(wizard.confirm().is_err());
        assert_eq!(wizard.back(), WizardStep::SelectingHome);
        assert!(wizard.selected_room().is_none());
        assert_eq!(wizard.back(), WizardStep::Cancelled);
    }

    #[test]
    fn out_of_step_choices_rejected() {
        let mut wizard = SelectionWizard::new();
        assert!(matches!(
            wizard.choose_room(10),
            Err(CoreError::WizardStep {
                step: WizardStep::SelectingHome,
                ..
            })
        ));
        assert!(matches!(wizard.choose_home(42), Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn fetch_error_is_visible_and_retryable() {
        let mut wizard = SelectionWizard::new();
        wizard.load(&Fixture { fail_rooms: false }).await.unwrap();
        wizard.choose_home(1).unwrap();

        assert!(wizard.load(&Fixture { fail_rooms: true }).await.is_err());
        assert_eq!(
            wizard.error(),
            Some("No response received from server. Please check your connection.")
        );

        wizard.load(&Fixture { fail_rooms: false }).await.unwrap();
        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.rooms().len(), 1);
    }

    #[tokio::test]
    async fn filter_applies_to_current_step() {
        let mut wizard = SelectionWizard::new();
        wizard.load(&Fixture { fail_rooms: false }).await.unwrap();
        assert_eq!(wizard.filter("vil"), vec![(2, "Villa".to_owned())]);
        assert!(wizard.filter("zzz").is_empty());
    }
}
