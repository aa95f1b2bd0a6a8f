//! Room registry: the only way in or out of a room session. Creates rooms
//! with collision-free ids, rehydrates evicted rooms from the snapshot
//! store, and runs the scheduled purge.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::catalog::Catalog;
use crate::error::GameError;
use crate::room::session::RoomSession;
use crate::room::state::RoomConfig;
use crate::store::SnapshotStore;
use crate::util::id::new_room_id;

pub struct RoomRegistry {
    rooms: DashMap<String, Arc<RoomSession>>,
    catalog: Arc<Catalog>,
    store: Arc<dyn SnapshotStore>,
}

impl RoomRegistry {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            rooms: DashMap::new(),
            catalog,
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        self.store.clone()
    }

    /// Creates a room in `Waiting` with a fresh id, colliding with neither
    /// resident rooms nor persisted snapshots, and persists the initial
    /// snapshot.
    pub fn create_room(&self, config: RoomConfig) -> Result<Arc<RoomSession>, GameError> {
        let id = loop {
            let candidate = new_room_id();
            if self.rooms.contains_key(&candidate) {
                continue;
            }
            let persisted = self
                .store
                .load(&candidate)
                .map_err(|e| GameError::PersistenceFailure(e.to_string()))?;
            if persisted.is_none() {
                break candidate;
            }
        };

        let session = Arc::new(RoomSession::new(id.clone(), config, self.catalog.clone()));
        // Initial checkpoint is best-effort, like every other save.
        if let Err(err) = self.store.save(&session.snapshot()) {
            tracing::warn!(room_id = %id, error = %err, "initial snapshot save failed");
        }
        self.rooms.insert(id.clone(), session.clone());
        tracing::info!(room_id = %id, "room created");
        Ok(session)
    }

    /// Resident room, or rehydrated from the store and cached.
    pub fn get_room(&self, id: &str) -> Result<Arc<RoomSession>, GameError> {
        if let Some(session) = self.rooms.get(id) {
            return Ok(session.clone());
        }
        let snapshot = self
            .store
            .load(id)
            .map_err(|e| GameError::PersistenceFailure(e.to_string()))?
            .ok_or_else(|| GameError::RoomNotFound(id.to_string()))?;

        // entry() keeps two concurrent rehydrations from racing to two
        // different sessions for the same room.
        let session = self
            .rooms
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::info!(room_id = %id, "room rehydrated from store");
                Arc::new(RoomSession::from_snapshot(snapshot, self.catalog.clone()))
            })
            .clone();
        Ok(session)
    }

    /// Evicts rooms idle longer than `older_than` and purges their
    /// persisted rows. Run from a scheduled task, never inline with a
    /// player action.
    pub fn purge_stale(&self, older_than: Duration) -> Vec<String> {
        let cutoff = std::time::SystemTime::now() - older_than;
        let mut evicted = Vec::new();
        self.rooms.retain(|id, session| {
            if session.updated_at() < cutoff {
                evicted.push(id.clone());
                false
            } else {
                true
            }
        });
        for id in &evicted {
            tracing::info!(room_id = %id, "stale room evicted");
        }

        match self.store.purge(older_than) {
            Ok(purged) => {
                for id in purged {
                    if !evicted.contains(&id) {
                        evicted.push(id);
                    }
                }
            }
            Err(err) => tracing::warn!(error = %err, "snapshot purge failed"),
        }
        evicted
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
