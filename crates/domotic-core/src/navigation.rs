// ── Routes and history ──
//
// Views are addressed by path, e.g. `/homes/4/rooms/10/devices`. The home
// and room a path names are restored from the volatile snapshot when it
// matches, otherwise refetched. The snapshot is never trusted over the path.

use std::fmt;

use domotic_api::{ApiClient, Home, HomeId, Room, RoomId};
use tracing::debug;

use crate::error::CoreError;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Homes,
    Rooms {
        home_id: HomeId,
    },
    Devices {
        home_id: HomeId,
        room_id: RoomId,
    },
    Gateways,
}

impl Route {
    /// Parse a path. Anything unrecognised lands on the homes view.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["esp32", ..] => Self::Gateways,
            ["homes", home, "rooms", room, "devices", ..] => {
                match (home.parse(), room.parse()) {
                    (Ok(home_id), Ok(room_id)) => Self::Devices { home_id, room_id },
                    (Ok(home_id), Err(_)) => Self::Rooms { home_id },
                    _ => Self::Homes,
                }
            }
            ["homes", home, "rooms", ..] => home
                .parse()
                .map_or(Self::Homes, |home_id| Self::Rooms { home_id }),
            _ => Self::Homes,
        }
    }

    pub fn home_id(self) -> Option<HomeId> {
        match self {
            Self::Rooms { home_id } | Self::Devices { home_id, .. } => Some(home_id),
            Self::Homes | Self::Gateways => None,
        }
    }

    pub fn room_id(self) -> Option<RoomId> {
        match self {
            Self::Devices { room_id, .. } => Some(room_id),
            _ => None,
        }
    }

    /// One level up: devices to rooms, rooms to homes.
    pub fn parent(self) -> Self {
        match self {
            Self::Devices { home_id, .. } => Self::Rooms { home_id },
            Self::Rooms { .. } | Self::Gateways | Self::Homes => Self::Homes,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homes => f.write_str("/"),
            Self::Rooms { home_id } => write!(f, "/homes/{home_id}/rooms"),
            Self::Devices { home_id, room_id } => {
                write!(f, "/homes/{home_id}/rooms/{room_id}/devices")
            }
            Self::Gateways => f.write_str("/esp32"),
        }
    }
}

// ── History ─────────────────────────────────────────────────────────

/// Back/forward stack of visited routes.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Homes)
    }
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
            index: 0,
        }
    }

    pub fn current(&self) -> Route {
        self.entries.get(self.index).copied().unwrap_or_default()
    }

    /// Visit `route`, dropping any forward entries.
    pub fn push(&mut self, route: Route) {
        if self.current() == route {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(route);
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<Route> {
        self.index = self.index.checked_sub(1)?;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<Route> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

// ── Restore ─────────────────────────────────────────────────────────

/// The home a route points at: the cached snapshot when its id matches,
/// else a fetch (which then refreshes the snapshot).
pub async fn restore_home(
    route: Route,
    session: &SessionStore,
    client: &ApiClient,
) -> Result<Option<Home>, CoreError> {
    let Some(home_id) = route.home_id() else {
        return Ok(None);
    };
    home_by_id(home_id, session, client).await.map(Some)
}

/// A home by id, from the session cache when it holds that home.
pub async fn home_by_id(
    home_id: HomeId,
    session: &SessionStore,
    client: &ApiClient,
) -> Result<Home, CoreError> {
    if let Some(home) = session.cached_home().filter(|h| h.id == home_id) {
        debug!(home_id, "home restored from session cache");
        return Ok(home);
    }
    let home = client.homes().get(home_id).await?;
    session.remember_home(&home)?;
    Ok(home)
}

/// The room a route points at, restored the same way as
/// [`restore_home`].
pub async fn restore_room(
    route: Route,
    session: &SessionStore,
    client: &ApiClient,
) -> Result<Option<Room>, CoreError> {
    let Some(room_id) = route.room_id() else {
        return Ok(None);
    };
    room_by_id(room_id, session, client).await.map(Some)
}

pub async fn room_by_id(
    room_id: RoomId,
    session: &SessionStore,
    client: &ApiClient,
) -> Result<Room, CoreError> {
    if let Some(room) = session.cached_room().filter(|r| r.id == room_id) {
        debug!(room_id, "room restored from session cache");
        return Ok(room);
    }
    let room = client.rooms().get(room_id).await?;
    session.remember_room(&room)?;
    Ok(room)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Homes);
        assert_eq!(Route::parse("/esp32"), Route::Gateways);
        assert_eq!(Route::parse("/homes/4/rooms"), Route::Rooms { home_id: 4 });
        assert_eq!(
            Route::parse("/homes/4/rooms/10/devices/"),
            Route::Devices {
                home_id: 4,
                room_id: 10
            }
        );
    }

    #[test]
    fn parse_is_total() {
        assert_eq!(Route::parse("/homes/abc/rooms"), Route::Homes);
        assert_eq!(Route::parse("/nowhere"), Route::Homes);
        assert_eq!(Route::parse(""), Route::Homes);
        assert_eq!(Route::parse("/homes/4/rooms/x/devices"), Route::Rooms { home_id: 4 });
    }

    #[test]
    fn display_round_trips() {
        for route in [
            Route::Homes,
            Route::Gateways,
            Route::Rooms { home_id: 3 },
            Route::Devices {
                home_id: 3,
                room_id: 9,
            },
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn history_back_and_forward() {
        let mut history = History::default();
        history.push(Route::Rooms { home_id: 1 });
        history.push(Route::Devices {
            home_id: 1,
            room_id: 2,
        });

        assert_eq!(history.back(), Some(Route::Rooms { home_id: 1 }));
        assert_eq!(history.back(), Some(Route::Homes));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(Route::Rooms { home_id: 1 }));

        history.push(Route::Gateways);
        assert_eq!(history.forward(), None);
        assert_eq!(history.current(), Route::Gateways);
    }
}
