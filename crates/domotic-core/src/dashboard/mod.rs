// Resource dashboards.
//
// Each view owns its own name-sorted collection and validates input before
// any request goes out. Nothing is shared between views; navigating away and
// back refetches.

mod devices;
mod gateways;
mod homes;
mod rooms;

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use domotic_api::DeviceId;

pub use devices::{DEFAULT_COURTESY_DELAY, DeviceForm, DevicesDashboard};
pub use gateways::GatewaysDashboard;
pub use homes::{HomeForm, HomesDashboard};
pub use rooms::{RoomForm, RoomsDashboard};

use crate::error::CoreError;

/// Listing size used by every dashboard fetch except homes.
pub const VIEW_PAGE_SIZE: u32 = 100;

/// Marks a device id busy for as long as the guard lives.
pub(crate) struct BusyGuard<'a> {
    set: &'a Mutex<HashSet<DeviceId>>,
    id: DeviceId,
}

impl<'a> BusyGuard<'a> {
    /// Claim `id`, or fail with [`CoreError::Busy`] if someone holds it.
    pub(crate) fn acquire(set: &'a Mutex<HashSet<DeviceId>>, id: DeviceId) -> Result<Self, CoreError> {
        let mut busy = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(id) {
            return Err(CoreError::Busy { device_id: id });
        }
        Ok(Self { set, id })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

pub(crate) fn require(value: &str, message: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(message));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn busy_guard_releases_on_drop() {
        let set = Mutex::new(HashSet::new());
        let guard = BusyGuard::acquire(&set, 7).unwrap();
        assert!(matches!(
            BusyGuard::acquire(&set, 7),
            Err(CoreError::Busy { device_id: 7 })
        ));
        assert!(BusyGuard::acquire(&set, 8).is_ok());
        drop(guard);
        assert!(BusyGuard::acquire(&set, 7).is_ok());
    }

    #[test]
    fn blank_is_rejected() {
        assert!(require("  ", "Room name is required").is_err());
        assert!(require("Kitchen", "Room name is required").is_ok());
    }
}
