//! JSON-lines file history store.
//!
//! One event per line, appended on save. Lines that fail to parse are
//! skipped with a warning so a single bad write cannot hide the rest of
//! the history.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use trove_common::MapId;

use crate::error::StoreResult;
use crate::event::TreasureCollectionEvent;
use crate::HistoryStore;

/// Default history file name.
pub const HISTORY_FILE: &str = "trove_history.jsonl";

/// History persisted to an append-only JSON-lines file.
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<Vec<TreasureCollectionEvent>> {
        if !self.path.exists() {
            debug!("History file {} not found, treating as empty", self.path.display());
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut events = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(
                    "Skipping corrupt history record at {}:{}: {e}",
                    self.path.display(),
                    line_no + 1
                ),
            }
        }
        Ok(events)
    }
}

impl HistoryStore for JsonLinesStore {
    fn save(&mut self, event: &TreasureCollectionEvent) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn query_by_map(&self, map: &MapId) -> StoreResult<Vec<TreasureCollectionEvent>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| &e.map_id == map)
            .collect())
    }
}
