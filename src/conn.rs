//! Connection binding table: maps a live connection to the room and player
//! it represents, so disconnect handling is a single O(1) lookup instead of
//! a scan over every room's player list.

use dashmap::DashMap;

use crate::events::ConnectionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_id: String,
    pub player_name: String,
}

/// Process-wide table of live bindings. A player holds at most one active
/// binding per room; a later bind for the same `(room, player)` supersedes
/// the earlier connection (reconnect semantics).
#[derive(Default)]
pub struct ConnectionTable {
    bindings: DashMap<ConnectionId, Binding>,
    by_player: DashMap<(String, String), ConnectionId>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert. Returns the connection this bind superseded, if
    /// the player was already bound elsewhere in the room.
    pub fn bind(
        &self,
        conn: ConnectionId,
        room_id: &str,
        player_name: &str,
    ) -> Option<ConnectionId> {
        let key = (room_id.to_string(), player_name.to_string());
        let superseded = self
            .by_player
            .insert(key, conn)
            .filter(|old| *old != conn);
        if let Some(old) = superseded {
            self.bindings.remove(&old);
        }
        self.bindings.insert(
            conn,
            Binding {
                room_id: room_id.to_string(),
                player_name: player_name.to_string(),
            },
        );
        superseded
    }

    /// Removes and returns the binding for `conn`. Returns `None` when the
    /// connection was never bound or was superseded by a reconnect, so the
    /// caller must not mark the player disconnected.
    pub fn unbind(&self, conn: ConnectionId) -> Option<Binding> {
        let (_, binding) = self.bindings.remove(&conn)?;
        let key = (binding.room_id.clone(), binding.player_name.clone());
        // Only clear the reverse entry if it still points at this
        // connection; a newer bind may own it.
        self.by_player.remove_if(&key, |_, current| *current == conn);
        Some(binding)
    }

    pub fn get(&self, conn: ConnectionId) -> Option<Binding> {
        self.bindings.get(&conn).map(|b| b.clone())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
