// domotic-api: Async Rust client for the domotic home-automation API

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod services;
pub mod transport;

pub use auth::{BearerAuth, Interceptor, NoAuth, StaticToken, TokenSource};
pub use client::ApiClient;
pub use error::{Error, ErrorBody, FailureKind, ServiceError};
pub use models::{
    ControlType, CreateDevice, CreateGateway, CreateHome, CreateRoom, CreateUser, Device,
    DeviceId, Gateway, GatewayId, Home, HomeId, Label, LabelGroup, LoginUser, Page, Permission,
    Role, Room, RoomId, SortOrder, UpdateDevice, UpdateGateway, UpdateHome, UpdateRoom,
    UserResponse,
};
pub use services::devices::{DEVICE_PAGE_SIZE, DeviceQuery};
pub use services::{DEFAULT_PAGE_SIZE, ListQuery, RoomQuery};
pub use transport::{TlsMode, TransportConfig};
