// ── Core error types ──
//
// Everything a view can fail with. Request failures arrive already
// normalized by `domotic-api`; validation failures never reach the network.

use domotic_api::{DeviceId, ServiceError};
use thiserror::Error;

use crate::wizard::WizardStep;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Rejected before any request was made.
    #[error("{message}")]
    Validation { message: String },

    /// A control or refresh for this device is already in flight.
    #[error("Device {device_id} is busy, wait for the current operation to finish")]
    Busy { device_id: DeviceId },

    #[error("A refresh is already running")]
    RefreshInProgress,

    /// A wizard action that the current step does not accept.
    #[error("Cannot {action} while {step}")]
    WizardStep { action: &'static str, step: WizardStep },

    /// A control command the device's control type does not support.
    #[error("{control} controls do not accept {command}")]
    UnsupportedCommand { control: String, command: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Login succeeded but the server returned no token")]
    MissingToken,

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Storage error at {path}: {message}")]
    Storage { path: String, message: String },

    // ── Remote errors (already normalized) ───────────────────────────
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
