//! ID utilities (room codes, connection ids).

use rand::{distributions::Alphanumeric, Rng};
use ulid::Ulid;

use crate::events::ConnectionId;

/// Length of a room code.
pub const ROOM_ID_LEN: usize = 6;

/// Generate a random room code. Uniqueness against live and persisted rooms
/// is the registry's job; this is just the raw material.
pub fn new_room_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_ID_LEN)
        .map(char::from)
        .collect()
}

/// Generate a connection id for a freshly accepted socket.
pub fn new_connection_id() -> ConnectionId {
    Ulid::new()
}
