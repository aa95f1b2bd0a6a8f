//! Persistence gateway: durable room snapshots keyed by room id.
//!
//! Saves are best-effort side effects scheduled by the router after a
//! state-changing transition; they are idempotent full-snapshot upserts
//! (last writer wins) and never block the in-memory transition. The same
//! contract backs rehydration on lookup and the scheduled time-based purge.

mod file;
mod memory;

use std::time::Duration;

use thiserror::Error;

use crate::room::state::RoomSnapshot;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt snapshot for room {room_id}: {source}")]
    Corrupt {
        room_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The save/load/purge contract every backend honors. Implementations are
/// synchronous and cheap; callers offload them off the room's serialization
/// point.
pub trait SnapshotStore: Send + Sync {
    /// Full-snapshot upsert keyed by the snapshot's room id.
    fn save(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError>;

    fn load(&self, room_id: &str) -> Result<Option<RoomSnapshot>, StoreError>;

    /// Deletes rows whose last update is older than `older_than`, returning
    /// the purged room ids.
    fn purge(&self, older_than: Duration) -> Result<Vec<String>, StoreError>;
}
