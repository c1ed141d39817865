#![allow(clippy::unwrap_used)]
// End-to-end flows against a mocked API.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domotic_api::{ApiClient, BearerAuth, ControlType, Label, TransportConfig};
use domotic_core::navigation::{Route, restore_home};
use domotic_core::{
    Accounts, ControlCommand, CoreError, DeviceForm, DevicesDashboard, GatewaysDashboard,
    HomeForm, HomesDashboard, JsonFileStore, RoomForm, RoomsDashboard, SessionStore, WidgetBoard,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient, SessionStore) {
    let server = MockServer::start().await;
    let session = SessionStore::in_memory();
    session.set_token("tok", true).unwrap();
    let auth = BearerAuth::new(Arc::new(session.clone()));
    let client = ApiClient::new(&server.uri(), &TransportConfig::default(), Arc::new(auth)).unwrap();
    (server, client, session)
}

fn device_json(id: i64, name: &str, value: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "roomId": 10,
        "name": name,
        "type": "LIGHT",
        "controlType": "SWITCH",
        "currentValue": value,
        "esp32DeviceId": 3
    })
}

// ── Flows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_home_room_device_write_flow() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/homes"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 4, "name": "Villa", "address": "Main St" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/rooms"))
        .and(body_partial_json(json!({ "homeId": 4, "name": "Kitchen" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 10, "homeId": 4, "name": "Kitchen" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/esp32/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 3, "title": "Hallway", "token": "esp-tok" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_partial_json(json!({ "roomId": 10, "esp32DeviceId": 3, "currentValue": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(device_json(9, "Lamp", None)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/devices/9/write"))
        .and(query_param("data", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_json(9, "Lamp", Some("1"))))
        .mount(&server)
        .await;

    let mut homes = HomesDashboard::new(client.clone());
    let home = homes
        .create(&HomeForm {
            name: "Villa".into(),
            address: "Main St".into(),
        })
        .await
        .unwrap();

    let mut rooms = RoomsDashboard::new(client.clone(), home);
    let room = rooms
        .create(&RoomForm {
            name: "Kitchen".into(),
            description: None,
        })
        .await
        .unwrap();

    let devices = DevicesDashboard::new(client.clone(), room).with_courtesy_delay(Duration::from_millis(10));
    assert_eq!(devices.load_gateways().await.len(), 1);
    let device = devices
        .create(&DeviceForm {
            name: "Lamp".into(),
            label: Label::Light,
            control_type: ControlType::Switch,
            esp32_device_id: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(device.current_value, None);

    let updated = devices.command(9, ControlCommand::Toggle).await.unwrap().unwrap();
    assert_eq!(updated.current_value.as_deref(), Some("1"));
    assert_eq!(devices.get(9).unwrap().current_value.as_deref(), Some("1"));
    assert!(!devices.is_controlling(9));
}

#[tokio::test]
async fn test_fetch_sorts_by_name() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices/all/10"))
        .and(query_param("size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                device_json(1, "Lamp B", None),
                device_json(2, "Lamp A", None),
                device_json(3, "Lamp C", None)
            ]
        })))
        .mount(&server)
        .await;

    let room = domotic_api::Room {
        id: 10,
        home_id: Some(4),
        name: "Kitchen".into(),
        description: None,
        image_url: None,
    };
    let devices = DevicesDashboard::new(client, room);
    let names: Vec<String> = devices.fetch().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Lamp A", "Lamp B", "Lamp C"]);
}

#[tokio::test]
async fn test_second_control_is_rejected_while_busy() {
    let (server, client, _session) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/devices/9/write"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_json(9, "Lamp", Some("1"))))
        .mount(&server)
        .await;

    let room = domotic_api::Room {
        id: 10,
        home_id: None,
        name: "Kitchen".into(),
        description: None,
        image_url: None,
    };
    let devices = DevicesDashboard::new(client, room).with_courtesy_delay(Duration::from_millis(50));

    let (first, second) = tokio::join!(devices.control(9, "1"), devices.control(9, "0"));
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(CoreError::Busy { device_id: 9 })))
    );
    assert!(!devices.is_controlling(9));
}

#[tokio::test]
async fn test_validation_happens_before_network() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/homes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut homes = HomesDashboard::new(client.clone());
    let err = homes
        .create(&HomeForm {
            name: "Villa".into(),
            address: "  ".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Home name and address are required");

    let room = domotic_api::Room {
        id: 10,
        home_id: None,
        name: "Kitchen".into(),
        description: None,
        image_url: None,
    };
    let devices = DevicesDashboard::new(client, room);
    let err = devices
        .create(&DeviceForm {
            name: "Lamp".into(),
            ..DeviceForm::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No ESP32 controller available. Please add one first from the ESP32 Controllers section."
    );
}

#[tokio::test]
async fn test_gateway_list_failure_is_swallowed() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/esp32/all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let room = domotic_api::Room {
        id: 10,
        home_id: None,
        name: "Kitchen".into(),
        description: None,
        image_url: None,
    };
    let devices = DevicesDashboard::new(client, room);
    assert!(devices.load_gateways().await.is_empty());
}

#[tokio::test]
async fn test_rotate_token_resubmits_title() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/esp32/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 3, "title": "Hallway", "token": "old" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/esp32/3"))
        .and(body_partial_json(json!({ "title": "Hallway" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "title": "Hallway", "token": "new"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut gateways = GatewaysDashboard::new(client);
    gateways.fetch().await.unwrap();
    let rotated = gateways.rotate_token(3).await.unwrap();
    assert_eq!(rotated.token.as_deref(), Some("new"));
    assert_eq!(gateways.get(3).unwrap().token.as_deref(), Some("new"));
}

#[tokio::test]
async fn test_room_counts_tolerate_failures() {
    let (server, client, _session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/homes/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "id": 1, "name": "A", "address": "x" },
                { "id": 2, "name": "B", "address": "y" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/rooms/all/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "id": 10, "name": "Kitchen" }, { "id": 11, "name": "Bath" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/rooms/all/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut homes = HomesDashboard::new(client);
    homes.fetch().await.unwrap();
    let counts = homes.room_counts().await;
    assert_eq!(counts.get(&1), Some(&2));
    assert_eq!(counts.get(&2), Some(&0));
}

// ── Session flows ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_remember_and_logout_keeps_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let durable = Arc::new(JsonFileStore::new(dir.path().join("local.json")));
    let volatile = Arc::new(JsonFileStore::new(dir.path().join("session.json")));
    let session = SessionStore::new(durable, volatile);

    let server = MockServer::start().await;
    let auth = BearerAuth::new(Arc::new(session.clone()));
    let client = ApiClient::new(&server.uri(), &TransportConfig::default(), Arc::new(auth)).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt" })))
        .mount(&server)
        .await;

    let accounts = Accounts::new(client, session.clone());
    accounts
        .login("a@b.c", "pw".to_owned().into(), true)
        .await
        .unwrap();
    assert!(session.session().durable);
    assert_eq!(session.get_token().as_deref(), Some("jwt"));

    let mut board = WidgetBoard::load(session.durable_store());
    let device: domotic_api::Device = serde_json::from_value(device_json(9, "Lamp", None)).unwrap();
    board.add(device, "Kitchen", "Villa").unwrap();

    accounts.logout();
    assert_eq!(session.get_token(), None);
    assert_eq!(WidgetBoard::load(session.durable_store()).widgets().len(), 1);
}

#[tokio::test]
async fn test_login_without_token_is_an_error() {
    let (server, client, session) = setup().await;
    session.clear_session();

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "a@b.c" })))
        .mount(&server)
        .await;

    let accounts = Accounts::new(client, session.clone());
    let err = accounts
        .login("a@b.c", "pw".to_owned().into(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::MissingToken));
    assert_eq!(session.get_token(), None);
}

#[tokio::test]
async fn test_restore_home_prefers_matching_cache() {
    let (server, client, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/homes/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "name": "Fetched", "address": "z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    session
        .remember_home(&domotic_api::Home {
            id: 4,
            name: "Cached".into(),
            address: "x".into(),
        })
        .unwrap();

    let cached = restore_home(Route::parse("/homes/4/rooms"), &session, &client)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.name, "Cached");

    let fetched = restore_home(Route::parse("/homes/5/rooms"), &session, &client)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "Fetched");
    assert_eq!(session.cached_home().unwrap().id, 5);
}
