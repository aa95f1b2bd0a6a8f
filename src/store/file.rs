//! JSON-file-per-room snapshot store: one `<room_id>.json` per room under a
//! data directory. Purge uses file modification times, which track the
//! snapshot's last save.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::room::state::RoomSnapshot;
use crate::store::{SnapshotStore, StoreError};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the data directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn row_path(&self, room_id: &str) -> PathBuf {
        self.dir.join(format!("{room_id}.json"))
    }
}

fn room_id_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(snapshot).map_err(|source| StoreError::Corrupt {
            room_id: snapshot.id.clone(),
            source,
        })?;
        fs::write(self.row_path(&snapshot.id), body)?;
        Ok(())
    }

    fn load(&self, room_id: &str) -> Result<Option<RoomSnapshot>, StoreError> {
        let raw = match fs::read_to_string(self.row_path(room_id)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            room_id: room_id.to_string(),
            source,
        })?;
        Ok(Some(snapshot))
    }

    fn purge(&self, older_than: Duration) -> Result<Vec<String>, StoreError> {
        let cutoff = SystemTime::now() - older_than;
        let mut purged = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(room_id) = room_id_of(&path) else {
                continue;
            };
            let modified = entry.metadata()?.modified()?;
            if modified < cutoff {
                fs::remove_file(&path)?;
                purged.push(room_id);
            }
        }
        Ok(purged)
    }
}
