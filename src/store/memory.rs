//! In-memory snapshot store, used in tests and for ephemeral deployments.

use std::time::{Duration, SystemTime};

use dashmap::DashMap;

use crate::room::state::RoomSnapshot;
use crate::store::{SnapshotStore, StoreError};

/// Rows carry their save time, mirroring what the file store gets from
/// modification timestamps.
#[derive(Default)]
pub struct MemoryStore {
    rows: DashMap<String, (SystemTime, RoomSnapshot)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError> {
        self.rows
            .insert(snapshot.id.clone(), (SystemTime::now(), snapshot.clone()));
        Ok(())
    }

    fn load(&self, room_id: &str) -> Result<Option<RoomSnapshot>, StoreError> {
        Ok(self.rows.get(room_id).map(|r| r.1.clone()))
    }

    fn purge(&self, older_than: Duration) -> Result<Vec<String>, StoreError> {
        let cutoff = SystemTime::now() - older_than;
        let mut purged = Vec::new();
        self.rows.retain(|id, (saved_at, _)| {
            if *saved_at < cutoff {
                purged.push(id.clone());
                false
            } else {
                true
            }
        });
        Ok(purged)
    }
}
