// ── Session store ──
//
// Bearer token and cached selections split across two tiers: durable
// (survives restarts, used for "remember me") and volatile (this login
// only). Token lookup prefers the durable tier.

use std::sync::Arc;

use domotic_api::{Home, HomeId, Room, TokenSource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::storage::{KeyValueStore, MemoryStore};

pub const TOKEN_KEY: &str = "token";
pub const SELECTED_HOME_ID_KEY: &str = "selectedHomeId";
pub const SELECTED_HOME_DATA_KEY: &str = "selectedHomeData";
pub const SELECTED_ROOM_DATA_KEY: &str = "selectedRoomData";

/// Where the current token lives, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    /// `true` when the token came from the durable tier.
    pub durable: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn KeyValueStore>,
    volatile: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, volatile: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, volatile }
    }

    /// Both tiers in memory. Nothing outlives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// The durable tier, shared with the widget board.
    pub fn durable_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.durable)
    }

    // ── Token ────────────────────────────────────────────────────────

    pub fn get_token(&self) -> Option<String> {
        self.session().token
    }

    pub fn session(&self) -> Session {
        let non_empty = |t: String| (!t.is_empty()).then_some(t);
        if let Some(token) = self.durable.get(TOKEN_KEY).and_then(non_empty) {
            return Session {
                token: Some(token),
                durable: true,
            };
        }
        Session {
            token: self.volatile.get(TOKEN_KEY).and_then(non_empty),
            durable: false,
        }
    }

    /// Store the token in one tier and drop it from the other, so a stale
    /// durable token can never shadow a fresh volatile one.
    pub fn set_token(&self, token: &str, durable: bool) -> Result<(), CoreError> {
        let (keep, drop) = if durable {
            (&self.durable, &self.volatile)
        } else {
            (&self.volatile, &self.durable)
        };
        keep.set(TOKEN_KEY, token)?;
        drop.remove(TOKEN_KEY)?;
        debug!(durable, "session token stored");
        Ok(())
    }

    /// Log out: remove the token from both tiers plus the cached home and
    /// room selection. Idempotent and infallible.
    pub fn clear_session(&self) {
        let removals = [
            (&self.durable, TOKEN_KEY),
            (&self.volatile, TOKEN_KEY),
            (&self.durable, SELECTED_HOME_ID_KEY),
            (&self.volatile, SELECTED_HOME_DATA_KEY),
            (&self.volatile, SELECTED_ROOM_DATA_KEY),
        ];
        for (store, key) in removals {
            if let Err(e) = store.remove(key) {
                warn!(key, error = %e, "failed to clear session key");
            }
        }
        debug!("session cleared");
    }

    // ── Cached selections ────────────────────────────────────────────

    pub fn remember_home(&self, home: &Home) -> Result<(), CoreError> {
        self.durable.set(SELECTED_HOME_ID_KEY, &home.id.to_string())?;
        self.put_json(SELECTED_HOME_DATA_KEY, home)
    }

    pub fn forget_home(&self) {
        for (store, key) in [
            (&self.durable, SELECTED_HOME_ID_KEY),
            (&self.volatile, SELECTED_HOME_DATA_KEY),
        ] {
            if let Err(e) = store.remove(key) {
                warn!(key, error = %e, "failed to forget home");
            }
        }
    }

    pub fn remember_room(&self, room: &Room) -> Result<(), CoreError> {
        self.put_json(SELECTED_ROOM_DATA_KEY, room)
    }

    pub fn forget_room(&self) {
        if let Err(e) = self.volatile.remove(SELECTED_ROOM_DATA_KEY) {
            warn!(error = %e, "failed to forget room");
        }
    }

    pub fn selected_home_id(&self) -> Option<HomeId> {
        self.durable.get(SELECTED_HOME_ID_KEY)?.parse().ok()
    }

    /// Snapshot written by [`remember_home`](Self::remember_home). A
    /// snapshot that fails to parse reads as absent.
    pub fn cached_home(&self) -> Option<Home> {
        self.get_json(SELECTED_HOME_DATA_KEY)
    }

    pub fn cached_room(&self) -> Option<Room> {
        self.get_json(SELECTED_ROOM_DATA_KEY)
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value).map_err(|e| CoreError::Storage {
            path: key.to_owned(),
            message: e.to_string(),
        })?;
        self.volatile.set(key, &json)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.volatile.get(key)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| debug!(key, error = %e, "ignoring unparseable cached selection"))
            .ok()
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        self.get_token()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn home() -> Home {
        Home {
            id: 4,
            name: "Villa".into(),
            address: "Main St".into(),
        }
    }

    #[test]
    fn no_token_anywhere() {
        let session = SessionStore::in_memory();
        assert_eq!(session.get_token(), None);
        assert!(!session.session().is_authenticated());
    }

    #[test]
    fn durable_tier_wins() {
        let durable = Arc::new(MemoryStore::new());
        let volatile = Arc::new(MemoryStore::new());
        durable.set(TOKEN_KEY, "A").unwrap();
        volatile.set(TOKEN_KEY, "B").unwrap();

        let session = SessionStore::new(durable, volatile);
        assert_eq!(session.get_token().as_deref(), Some("A"));
        assert!(session.session().durable);
    }

    #[test]
    fn set_token_moves_between_tiers() {
        let session = SessionStore::in_memory();
        session.set_token("A", true).unwrap();
        session.set_token("B", false).unwrap();

        let current = session.session();
        assert_eq!(current.token.as_deref(), Some("B"));
        assert!(!current.durable);
    }

    #[test]
    fn clear_session_is_idempotent() {
        let session = SessionStore::in_memory();
        session.set_token("A", true).unwrap();
        session.remember_home(&home()).unwrap();

        session.clear_session();
        session.clear_session();

        assert_eq!(session.get_token(), None);
        assert_eq!(session.selected_home_id(), None);
        assert_eq!(session.cached_home(), None);
    }

    #[test]
    fn cached_home_round_trip_and_corruption() {
        let volatile = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::new(MemoryStore::new()), volatile.clone());

        session.remember_home(&home()).unwrap();
        assert_eq!(session.cached_home(), Some(home()));
        assert_eq!(session.selected_home_id(), Some(4));

        volatile.set(SELECTED_HOME_DATA_KEY, "{broken").unwrap();
        assert_eq!(session.cached_home(), None);
    }

    #[test]
    fn session_is_a_token_source() {
        let session = SessionStore::in_memory();
        session.set_token("jwt", false).unwrap();
        let source: &dyn TokenSource = &session;
        assert_eq!(source.token().as_deref(), Some("jwt"));
    }
}
