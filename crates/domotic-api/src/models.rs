// Wire models exchanged verbatim with the API.
//
// Read models (`Home`, `Room`, ...) mirror server responses; `Create*` and
// `Update*` are request bodies. Field names are camelCase on the wire.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumIter, EnumString};

pub type HomeId = i64;
pub type RoomId = i64;
pub type DeviceId = i64;
pub type GatewayId = i64;

// ── Page envelope ────────────────────────────────────────────────────

/// Spring-style page envelope. Only `content` is guaranteed by the API,
/// and even that may be missing on empty pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    #[serde(default)]
    pub content: Option<Vec<T>>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl<T> Page<T> {
    /// Items on this page; absent content reads as empty.
    pub fn items(&self) -> &[T] {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn into_items(self) -> Vec<T> {
        self.content.unwrap_or_default()
    }
}

// ── Homes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateHome {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateHome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_id: Option<HomeId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    pub home_id: HomeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Sort direction accepted by the room listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    Desc,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device category label.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Label {
    // Lighting
    Light,
    Dimmer,
    RgbLight,
    MotionLight,
    // Climate & environment sensors
    TemperatureSensor,
    HumiditySensor,
    PressureSensor,
    #[strum(serialize = "CO2_SENSOR")]
    Co2Sensor,
    AirQualitySensor,
    UvSensor,
    LightSensor,
    RainSensor,
    WindSensor,
    // Climate control
    Ac,
    Heater,
    Thermostat,
    Fan,
    Humidifier,
    Dehumidifier,
    AirPurifier,
    // Security & access
    DoorLock,
    WindowLock,
    GarageDoor,
    Gate,
    SecurityCamera,
    Doorbell,
    MotionSensor,
    // Appliances
    Refrigerator,
    Dishwasher,
    WashingMachine,
    Dryer,
    Oven,
    // Window & blinds
    Curtain,
    Blind,
    Window,
    // Entertainment
    Tv,
    Speaker,
    MediaPlayer,
    // Other systems
    Irrigation,
    PoolSystem,
    VacuumRobot,
    EnergyMeter,
    WaterLeakSensor,
    SmokeDetector,
    GasDetector,
    // Power management
    SmartPlug,
    PowerStrip,
    SolarPanel,
    BatterySystem,
    // Weather station
    WeatherStation,
    Barometer,
    Anemometer,
    RainGauge,
    // Water management
    WaterMeter,
    WaterQualitySensor,
    WaterTemperatureSensor,
    // Soil monitoring
    SoilMoistureSensor,
    SoilPhSensor,
    SoilTemperatureSensor,
    /// Any label this client does not know yet.
    #[default]
    #[serde(other)]
    Other,
}

/// Coarse grouping of labels, used to pick an icon or glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LabelGroup {
    Lighting,
    Temperature,
    Air,
    Humidity,
    Power,
    Generic,
}

impl Label {
    pub fn group(self) -> LabelGroup {
        match self {
            Self::Light | Self::Dimmer | Self::RgbLight | Self::MotionLight => LabelGroup::Lighting,
            Self::TemperatureSensor | Self::Thermostat | Self::Heater => LabelGroup::Temperature,
            Self::Ac | Self::Fan | Self::AirPurifier => LabelGroup::Air,
            Self::HumiditySensor | Self::Humidifier | Self::Dehumidifier => LabelGroup::Humidity,
            Self::SmartPlug | Self::PowerStrip => LabelGroup::Power,
            _ => LabelGroup::Generic,
        }
    }
}

/// UI control archetype; decides how `currentValue` is read and written.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ControlType {
    Switch,
    Slider,
    RgbPicker,
    ButtonGroup,
    NumericInput,
    TextDisplay,
    Dropdown,
    Schedule,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub label: Label,
    #[serde(default)]
    pub control_type: ControlType,
    #[serde(default)]
    pub current_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esp32_device_id: Option<GatewayId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevice {
    pub room_id: RoomId,
    pub name: String,
    #[serde(rename = "type")]
    pub label: Label,
    pub control_type: ControlType,
    /// Always sent, `null` for a fresh device.
    pub current_value: Option<String>,
    pub esp32_device_id: GatewayId,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esp32_device_id: Option<GatewayId>,
}

// ── Gateways (ESP32) ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: GatewayId,
    #[serde(default)]
    pub title: Option<String>,
    /// Credential the controller uses against the API. Server-generated.
    #[serde(default)]
    pub token: Option<String>,
}

impl Gateway {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGateway {
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGateway {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginUser {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

// ── Permissions ──────────────────────────────────────────────────────

/// Fine-grained permission. Declared for display; enforcement is server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Permission {
    #[serde(rename = "create:home")]
    #[strum(serialize = "create:home")]
    CreateHome,
    #[serde(rename = "create:room")]
    #[strum(serialize = "create:room")]
    CreateRoom,
    #[serde(rename = "invite:user")]
    #[strum(serialize = "invite:user")]
    InviteUser,
    #[serde(rename = "remove:user")]
    #[strum(serialize = "remove:user")]
    RemoveUser,
    #[serde(rename = "delete:home")]
    #[strum(serialize = "delete:home")]
    DeleteHome,
    #[serde(rename = "delete:room")]
    #[strum(serialize = "delete:room")]
    DeleteRoom,
    #[serde(rename = "add:product")]
    #[strum(serialize = "add:product")]
    AddProduct,
    #[serde(rename = "remove:product")]
    #[strum(serialize = "remove:product")]
    RemoveProduct,
    #[serde(rename = "update:product")]
    #[strum(serialize = "update:product")]
    UpdateProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Role {
    #[serde(rename = "HOME_ADMIN")]
    #[strum(serialize = "HOME_ADMIN")]
    HomeAdmin,
}

impl Role {
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Self::HomeAdmin => &[
                Permission::CreateHome,
                Permission::CreateRoom,
                Permission::InviteUser,
                Permission::RemoveUser,
                Permission::DeleteHome,
                Permission::DeleteRoom,
                Permission::AddProduct,
                Permission::RemoveProduct,
                Permission::UpdateProduct,
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn device_reads_camel_case_and_type() {
        let device: Device = serde_json::from_value(json!({
            "id": 4,
            "name": "Desk Lamp",
            "type": "RGB_LIGHT",
            "controlType": "SWITCH",
            "currentValue": "1",
            "esp32DeviceId": 2
        }))
        .unwrap();

        assert_eq!(device.label, Label::RgbLight);
        assert_eq!(device.control_type, ControlType::Switch);
        assert_eq!(device.current_value.as_deref(), Some("1"));
        assert_eq!(device.esp32_device_id, Some(2));
        assert_eq!(device.room_id, None);
    }

    #[test]
    fn unknown_enums_fall_back_to_other() {
        let device: Device = serde_json::from_value(json!({
            "id": 1,
            "name": "Mystery",
            "type": "TELEPORTER",
            "controlType": "HOLOGRAM",
            "currentValue": null
        }))
        .unwrap();
        assert_eq!(device.label, Label::Other);
        assert_eq!(device.control_type, ControlType::Other);
    }

    #[test]
    fn create_device_sends_null_current_value() {
        let body = serde_json::to_value(CreateDevice {
            room_id: 3,
            name: "Fan".into(),
            label: Label::Fan,
            control_type: ControlType::Slider,
            current_value: None,
            esp32_device_id: 9,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "roomId": 3,
                "name": "Fan",
                "type": "FAN",
                "controlType": "SLIDER",
                "currentValue": null,
                "esp32DeviceId": 9
            })
        );
    }

    #[test]
    fn update_skips_unset_fields() {
        let body = serde_json::to_value(UpdateHome {
            name: Some("Cabin".into()),
            address: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "name": "Cabin" }));
    }

    #[test]
    fn page_without_content_is_empty() {
        let page: Page<Home> = serde_json::from_value(json!({ "totalElements": 0 })).unwrap();
        assert!(page.items().is_empty());
        assert!(page.into_items().is_empty());
    }

    #[test]
    fn login_serializes_password() {
        let body = serde_json::to_value(LoginUser {
            email: "a@b.c".into(),
            password: SecretString::from("hunter2".to_string()),
        })
        .unwrap();
        assert_eq!(body, json!({ "email": "a@b.c", "password": "hunter2" }));
    }

    #[test]
    fn labels_round_trip_through_strum() {
        assert_eq!(Label::from_str("smart_plug").unwrap(), Label::SmartPlug);
        assert_eq!(Label::Co2Sensor.to_string(), "CO2_SENSOR");
        assert_eq!(Label::iter().count(), 60);
        assert_eq!(Label::Dimmer.group(), LabelGroup::Lighting);
        assert_eq!(Label::Oven.group(), LabelGroup::Generic);
    }

    #[test]
    fn home_admin_has_every_permission() {
        assert_eq!(
            Role::HomeAdmin.permissions().len(),
            Permission::iter().count()
        );
        assert_eq!(Permission::AddProduct.to_string(), "add:product");
    }
}
