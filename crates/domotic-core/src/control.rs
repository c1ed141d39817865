// ── Control kinds ──
//
// How a device's `currentValue` is read and what value a user action
// writes back, per control type.

use std::fmt;

use domotic_api::{ControlType, Device, Label};

use crate::error::CoreError;

pub const SLIDER_DEFAULT: i64 = 50;
pub const NUMERIC_DEFAULT: i64 = 24;
pub const NO_VALUE: &str = "No value";

/// A user action against a device control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Toggle,
    On,
    Off,
    Set(i64),
    Increment,
    Decrement,
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => f.write_str("toggle"),
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Set(v) => write!(f, "set {v}"),
            Self::Increment => f.write_str("increment"),
            Self::Decrement => f.write_str("decrement"),
        }
    }
}

/// Current state of a device as its control type interprets it.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// On exactly when the value is `"1"`.
    Switch { on: bool },
    /// Percentage, 50 when unset.
    Slider { level: i64 },
    /// Setpoint, 24 when unset.
    NumericInput { value: i64 },
    /// Temperature or humidity sensor reading.
    Sensor { reading: f64, unit: &'static str },
    /// Any other kind: the raw value, read-only.
    Display { text: Option<String> },
}

impl Control {
    pub fn for_device(device: &Device) -> Self {
        let value = device.current_value.as_deref().filter(|v| !v.is_empty());
        match device.control_type {
            ControlType::Switch => Self::Switch {
                on: value == Some("1"),
            },
            ControlType::Slider => Self::Slider {
                level: value.and_then(parse_int_prefix).unwrap_or(SLIDER_DEFAULT),
            },
            ControlType::NumericInput => Self::NumericInput {
                value: value.and_then(parse_int_prefix).unwrap_or(NUMERIC_DEFAULT),
            },
            _ => match device.label {
                Label::TemperatureSensor | Label::HumiditySensor => Self::Sensor {
                    reading: value.and_then(|v| v.trim().parse().ok()).unwrap_or(0.0),
                    unit: if device.label == Label::TemperatureSensor {
                        "°C"
                    } else {
                        "%"
                    },
                },
                _ => Self::Display {
                    text: value.map(str::to_owned),
                },
            },
        }
    }

    /// Whether the control accepts commands at all.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            Self::Switch { .. } | Self::Slider { .. } | Self::NumericInput { .. }
        )
    }

    /// Decrement is offered only above zero.
    pub fn can_decrement(&self) -> bool {
        matches!(self, Self::NumericInput { value } if *value > 0)
    }

    /// The value to write for `command`, or why the command does not apply.
    pub fn value_for(&self, command: ControlCommand) -> Result<String, CoreError> {
        let value = match (self, command) {
            (Self::Switch { on }, ControlCommand::Toggle) => (if *on { "0" } else { "1" }).to_owned(),
            (Self::Switch { .. }, ControlCommand::On) => "1".to_owned(),
            (Self::Switch { .. }, ControlCommand::Off) => "0".to_owned(),
            (Self::Slider { .. }, ControlCommand::Set(level)) => {
                if !(0..=100).contains(&level) {
                    return Err(CoreError::validation("Slider level must be between 0 and 100"));
                }
                level.to_string()
            }
            (Self::NumericInput { .. }, ControlCommand::Set(value)) => value.to_string(),
            (Self::NumericInput { value }, ControlCommand::Increment) => value
                .checked_add(1)
                .ok_or_else(|| CoreError::validation("Value is already at its maximum"))?
                .to_string(),
            (Self::NumericInput { value }, ControlCommand::Decrement) => {
                if !self.can_decrement() {
                    return Err(CoreError::validation("Value cannot go below 0"));
                }
                (value - 1).to_string()
            }
            _ => {
                return Err(CoreError::UnsupportedCommand {
                    control: self.kind().to_owned(),
                    command: command.to_string(),
                });
            }
        };
        Ok(value)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Switch { .. } => "Switch",
            Self::Slider { .. } => "Slider",
            Self::NumericInput { .. } => "Numeric input",
            Self::Sensor { .. } => "Sensor",
            Self::Display { .. } => "Read-only",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch { on: true } => f.write_str("On"),
            Self::Switch { on: false } => f.write_str("Off"),
            Self::Slider { level } => write!(f, "{level}%"),
            Self::NumericInput { value } => write!(f, "{value}°C"),
            Self::Sensor { reading, unit } => write!(f, "{reading:.1}{unit}"),
            Self::Display { text } => f.write_str(text.as_deref().unwrap_or(NO_VALUE)),
        }
    }
}

/// Leading integer of `raw`, ignoring anything after it ("75.5" reads 75).
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let digits_end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(raw.len(), |(i, _)| i);
    raw[..digits_end].parse().ok()
}
