// ── Widget board ──
//
// Devices pinned to the dashboard, persisted in the durable tier under
// `dashboard_widgets`. Each widget keeps a snapshot of its device plus the
// room and home names it was pinned from.

use std::sync::Arc;

use domotic_api::{ApiClient, Device, DeviceId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::storage::KeyValueStore;

pub const WIDGETS_KEY: &str = "dashboard_widgets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub device_id: DeviceId,
    pub device: Device,
    pub room_name: String,
    pub home_name: String,
}

/// At most one widget per device id. Every mutation rewrites the whole list
/// before returning.
pub struct WidgetBoard {
    store: Arc<dyn KeyValueStore>,
    widgets: Vec<Widget>,
}

impl std::fmt::Debug for WidgetBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBoard")
            .field("widgets", &self.widgets)
            .finish_non_exhaustive()
    }
}

impl WidgetBoard {
    /// Load the persisted board. Absent or corrupt data yields an empty one.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let widgets = match store.get(WIDGETS_KEY) {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable widget list");
                Vec::new()
            }),
        };
        Self { store, widgets }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn get(&self, device_id: DeviceId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.device_id == device_id)
    }

    pub fn contains(&self, device_id: DeviceId) -> bool {
        self.get(device_id).is_some()
    }

    /// Pin a device. Returns `false`, leaving the board untouched, when the
    /// device already has a widget.
    pub fn add(
        &mut self,
        device: Device,
        room_name: impl Into<String>,
        home_name: impl Into<String>,
    ) -> Result<bool, CoreError> {
        if self.contains(device.id) {
            debug!(device_id = device.id, "widget already pinned");
            return Ok(false);
        }
        let mut next = self.widgets.clone();
        next.push(Widget {
            device_id: device.id,
            device,
            room_name: room_name.into(),
            home_name: home_name.into(),
        });
        self.commit(next)?;
        Ok(true)
    }

    /// Unpin a device. Unknown ids leave the board unchanged.
    pub fn remove(&mut self, device_id: DeviceId) -> Result<bool, CoreError> {
        if !self.contains(device_id) {
            return Ok(false);
        }
        let next = self
            .widgets
            .iter()
            .filter(|w| w.device_id != device_id)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Replace the stored snapshot of a pinned device.
    pub fn update_snapshot(&mut self, device: Device) -> Result<bool, CoreError> {
        let mut next = self.widgets.clone();
        let Some(widget) = next.iter_mut().find(|w| w.device_id == device.id) else {
            return Ok(false);
        };
        widget.device = device;
        self.commit(next)?;
        Ok(true)
    }

    /// Re-fetch a pinned device and store the fresh snapshot.
    pub async fn refresh(
        &mut self,
        client: &ApiClient,
        device_id: DeviceId,
    ) -> Result<Device, CoreError> {
        if !self.contains(device_id) {
            return Err(CoreError::NotFound {
                entity: "widget",
                id: device_id,
            });
        }
        let device = client.devices().get(device_id).await?;
        self.update_snapshot(device.clone())?;
        Ok(device)
    }

    /// Write `next` to the store, then adopt it. A failed write leaves the
    /// in-memory board as it was.
    fn commit(&mut self, next: Vec<Widget>) -> Result<(), CoreError> {
        let json = serde_json::to_string(&next).map_err(|e| CoreError::Storage {
            path: WIDGETS_KEY.into(),
            message: e.to_string(),
        })?;
        self.store.set(WIDGETS_KEY, &json)?;
        self.widgets = next;
        debug!(count = self.widgets.len(), "widget board saved");
        Ok(())
    }
}
