// Per-resource facades over the shared `ApiClient`.
//
// Every operation funnels raw failures through `ServiceError::normalize`
// with its own default message.

pub mod devices;
pub mod gateways;
pub mod homes;
pub mod rooms;
pub mod users;

use serde_json::{Map, Value};

pub use devices::Devices;
pub use gateways::Gateways;
pub use homes::Homes;
pub use rooms::{RoomQuery, Rooms};
pub use users::Users;

/// Page size used by the home, room and gateway listings when the caller
/// does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page, size and free-form filter for a paged listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    /// Extra filter fields, forwarded to the server untouched.
    pub filter: Map<String, Value>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            filter: Map::new(),
        }
    }
}

impl ListQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    pub(crate) fn query_params(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }

    /// `{ page, size, ...filter }`; filter keys win over page/size, as the
    /// server merges them the same way.
    pub(crate) fn merged(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("page".into(), self.page.into());
        body.insert("size".into(), self.size.into());
        body.extend(self.filter.clone());
        body
    }
}
