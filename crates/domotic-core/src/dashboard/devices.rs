use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use domotic_api::{
    ApiClient, ControlType, CreateDevice, Device, DeviceId, DeviceQuery, Gateway, GatewayId, Label,
    ListQuery, Room, UpdateDevice,
};
use tracing::{debug, warn};

use super::{BusyGuard, VIEW_PAGE_SIZE, require};
use crate::control::{Control, ControlCommand};
use crate::error::CoreError;
use crate::store::SortedCollection;

/// Pause between a write and the re-fetch that observes it, giving the
/// gateway time to apply the value.
pub const DEFAULT_COURTESY_DELAY: Duration = Duration::from_millis(500);

const NAME_REQUIRED: &str = "Device name is required";
const NO_GATEWAYS: &str =
    "No ESP32 controller available. Please add one first from the ESP32 Controllers section.";
const GATEWAY_REQUIRED: &str = "Please select an ESP32 controller for your device";

/// Create or edit input for a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceForm {
    pub name: String,
    pub label: Label,
    pub control_type: ControlType,
    pub esp32_device_id: Option<GatewayId>,
}

impl Default for DeviceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: Label::Light,
            control_type: ControlType::Switch,
            esp32_device_id: None,
        }
    }
}

/// Devices of one room, plus the control flow.
///
/// Methods take `&self` so several controls can be in flight at once; each
/// device id admits one control and one refresh at a time.
pub struct DevicesDashboard {
    client: ApiClient,
    room: Room,
    devices: Mutex<SortedCollection<Device>>,
    gateways: Mutex<Vec<Gateway>>,
    controlling: Mutex<HashSet<DeviceId>>,
    refreshing: Mutex<HashSet<DeviceId>>,
    refreshing_all: AtomicBool,
    courtesy_delay: Duration,
}

impl std::fmt::Debug for DevicesDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevicesDashboard")
            .field("room", &self.room)
            .field("courtesy_delay", &self.courtesy_delay)
            .finish_non_exhaustive()
    }
}

impl DevicesDashboard {
    pub fn new(client: ApiClient, room: Room) -> Self {
        Self {
            client,
            room,
            devices: Mutex::new(SortedCollection::new()),
            gateways: Mutex::new(Vec::new()),
            controlling: Mutex::new(HashSet::new()),
            refreshing: Mutex::new(HashSet::new()),
            refreshing_all: AtomicBool::new(false),
            courtesy_delay: DEFAULT_COURTESY_DELAY,
        }
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Snapshot of the device list, name-sorted.
    pub fn devices(&self) -> Vec<Device> {
        self.with_devices(|d| d.items().to_vec())
    }

    pub fn get(&self, id: DeviceId) -> Option<Device> {
        self.with_devices(|d| d.get(id).cloned())
    }

    pub fn filter(&self, term: &str) -> Vec<Device> {
        self.with_devices(|d| d.filter(term).into_iter().cloned().collect())
    }

    pub fn gateways(&self) -> Vec<Gateway> {
        self.gateways
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_controlling(&self, id: DeviceId) -> bool {
        self.controlling
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    pub fn is_refreshing(&self, id: DeviceId) -> bool {
        self.refreshing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    // ── Loading ──────────────────────────────────────────────────────

    pub async fn fetch(&self) -> Result<Vec<Device>, CoreError> {
        let page = self
            .client
            .devices()
            .list_by_room(self.room.id, &DeviceQuery::page(0, VIEW_PAGE_SIZE))
            .await?;
        Ok(self.with_devices_mut(|d| {
            d.replace_all(page.into_items());
            d.items().to_vec()
        }))
    }

    /// Refetch the whole room. Rejected while another refetch is running.
    pub async fn refresh_all(&self) -> Result<Vec<Device>, CoreError> {
        if self.refreshing_all.swap(true, Ordering::AcqRel) {
            return Err(CoreError::RefreshInProgress);
        }
        let _reset = ResetOnDrop(&self.refreshing_all);
        self.fetch().await
    }

    /// Background read of the available gateways. Failures are logged and
    /// leave the previous list in place.
    pub async fn load_gateways(&self) -> Vec<Gateway> {
        match self
            .client
            .gateways()
            .list(&ListQuery::page(0, VIEW_PAGE_SIZE))
            .await
        {
            Ok(page) => {
                let gateways = page.into_items();
                *self.gateways.lock().unwrap_or_else(PoisonError::into_inner) = gateways.clone();
                gateways
            }
            Err(e) => {
                warn!(error = %e, "failed to load ESP32 controllers");
                self.gateways()
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a device in this room. Requires a name, at least one loaded
    /// gateway, and a chosen gateway, checked in that order.
    pub async fn create(&self, form: &DeviceForm) -> Result<Device, CoreError> {
        require(&form.name, NAME_REQUIRED)?;
        if self.gateways().is_empty() {
            return Err(CoreError::validation(NO_GATEWAYS));
        }
        let esp32_device_id = form
            .esp32_device_id
            .ok_or_else(|| CoreError::validation(GATEWAY_REQUIRED))?;

        let device = self
            .client
            .devices()
            .create(&CreateDevice {
                room_id: self.room.id,
                name: form.name.clone(),
                label: form.label,
                control_type: form.control_type,
                current_value: None,
                esp32_device_id,
            })
            .await?;
        self.with_devices_mut(|d| d.apply_created(device.clone()));
        Ok(device)
    }

    pub async fn update(&self, id: DeviceId, form: &DeviceForm) -> Result<Device, CoreError> {
        require(&form.name, NAME_REQUIRED)?;
        let esp32_device_id = form
            .esp32_device_id
            .ok_or_else(|| CoreError::validation(GATEWAY_REQUIRED))?;

        let device = self
            .client
            .devices()
            .update(
                id,
                &UpdateDevice {
                    name: Some(form.name.clone()),
                    label: Some(form.label),
                    control_type: Some(form.control_type),
                    esp32_device_id: Some(esp32_device_id),
                    current_value: None,
                },
            )
            .await?;
        self.apply(device.clone());
        Ok(device)
    }

    pub async fn delete(&self, id: DeviceId) -> Result<(), CoreError> {
        self.client.devices().delete(id).await?;
        self.with_devices_mut(|d| d.apply_removed(id));
        Ok(())
    }

    /// Re-fetch one device.
    pub async fn refresh_device(&self, id: DeviceId) -> Result<Device, CoreError> {
        let _busy = BusyGuard::acquire(&self.refreshing, id)?;
        let device = self.client.devices().get(id).await?;
        self.apply(device.clone());
        Ok(device)
    }

    // ── Control ──────────────────────────────────────────────────────

    /// Write `value` to a device, wait the courtesy delay, then re-fetch it.
    ///
    /// Fails with [`CoreError::Busy`] if a control for the same device is
    /// already running. A failed write is returned; a failed re-fetch is
    /// only logged and yields `None`, since the write itself went through.
    pub async fn control(&self, id: DeviceId, value: &str) -> Result<Option<Device>, CoreError> {
        let _busy = BusyGuard::acquire(&self.controlling, id)?;
        self.client.devices().write_data(id, value).await?;
        debug!(device_id = id, value, "device written");

        tokio::time::sleep(self.courtesy_delay).await;

        match self.client.devices().get(id).await {
            Ok(device) => {
                self.apply(device.clone());
                Ok(Some(device))
            }
            Err(e) => {
                warn!(device_id = id, error = %e, "failed to re-fetch device after write");
                Ok(None)
            }
        }
    }

    /// Translate a command through the device's control kind, then
    /// [`control`](Self::control) it. The device is fetched first if this
    /// view has not loaded it.
    pub async fn command(
        &self,
        id: DeviceId,
        command: ControlCommand,
    ) -> Result<Option<Device>, CoreError> {
        let device = match self.get(id) {
            Some(device) => device,
            None => self.client.devices().get(id).await?,
        };
        let value = Control::for_device(&device).value_for(command)?;
        self.control(id, &value).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Swap in a fresh copy; devices this view never listed stay out.
    fn apply(&self, device: Device) {
        self.with_devices_mut(|d| d.apply_updated(device));
    }

    fn with_devices<R>(&self, f: impl FnOnce(&SortedCollection<Device>) -> R) -> R {
        f(&self.devices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn with_devices_mut<R>(&self, f: impl FnOnce(&mut SortedCollection<Device>) -> R) -> R {
        f(&mut self.devices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
