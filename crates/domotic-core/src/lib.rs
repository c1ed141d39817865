//! Client-side state between `domotic-api` and the command line.
//!
//! - **[`SessionStore`]**: bearer token and cached selections split across a
//!   durable and a volatile [`KeyValueStore`]. Plugs into
//!   [`BearerAuth`](domotic_api::BearerAuth) as its token source.
//!
//! - **[`WidgetBoard`]**: pinned device snapshots persisted under
//!   `dashboard_widgets`, at most one per device.
//!
//! - **[`SelectionWizard`]**: the home, room, device picker used to pin a
//!   widget.
//!
//! - **Dashboards** ([`dashboard`]): one view per resource owning a
//!   name-sorted [`SortedCollection`], with input validation ahead of any
//!   request and the device control flow (busy set, courtesy delay,
//!   re-fetch).
//!
//! - **[`Control`]**: how each [`ControlType`](domotic_api::ControlType)
//!   reads and writes a device's `currentValue`.
//!
//! - **[`Route`]** / **[`History`]**: path-addressed views and the cached
//!   home/room restore that backs them.

pub mod account;
pub mod control;
pub mod dashboard;
pub mod error;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod store;
pub mod widgets;
pub mod wizard;

// ── Primary re-exports ──────────────────────────────────────────────
pub use account::{Accounts, SignUp};
pub use control::{Control, ControlCommand};
pub use dashboard::{
    DeviceForm, DevicesDashboard, GatewaysDashboard, HomeForm, HomesDashboard, RoomForm,
    RoomsDashboard,
};
pub use error::CoreError;
pub use navigation::{History, Route};
pub use session::{Session, SessionStore};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{Identified, Named, SortedCollection};
pub use widgets::{Widget, WidgetBoard};
pub use wizard::{SelectionWizard, WidgetSelection, WizardSource, WizardStep};
