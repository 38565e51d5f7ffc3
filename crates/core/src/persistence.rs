//! Persistence snapshot: a single blob capturing `{domain, viewState,
//! scopeId, timestamp}`, written on every committed change and mirrored
//! in a secondary store (spec §4.10, §6 "Persistence layout").

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Domain, NodeId};
use crate::viewstate::ViewState;

/// Fixed key the snapshot is stored under, whatever the backing store.
pub const STORAGE_KEY: &str = "canvas-snapshot-v1";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single persisted snapshot (spec §4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub domain: Domain,
    pub view_state: ViewState,
    pub scope_id: NodeId,
    pub timestamp_unix_secs: u64,
}

impl Snapshot {
    pub fn new(domain: Domain, view_state: ViewState, scope_id: NodeId, timestamp_unix_secs: u64) -> Self {
        Self {
            domain,
            view_state,
            scope_id,
            timestamp_unix_secs,
        }
    }

    fn age(&self, now_unix_secs: u64) -> Duration {
        Duration::from_secs(now_unix_secs.saturating_sub(self.timestamp_unix_secs))
    }

    /// A snapshot is usable iff it's younger than `ttl` (spec: "older
    /// than 24 hours" ⇒ discard).
    pub fn is_fresh(&self, now_unix_secs: u64, ttl: Duration) -> bool {
        self.age(now_unix_secs) < ttl
    }
}

pub fn now_unix_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Storage backend for a single `Snapshot` keyed by [`STORAGE_KEY`].
///
/// Implementations need only honour the key; they don't need to support
/// more than one entry, matching the spec's "single blob" model.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// In-memory store standing in for the browser's primary/secondary
/// storage pair in tests and CLI demos.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<&'static str, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match self.entries.get(STORAGE_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(snapshot)?;
        self.entries.insert(STORAGE_KEY, raw);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.entries.remove(STORAGE_KEY);
        Ok(())
    }
}

/// File-backed store for the CLI's `--snapshot-dir` flag: one JSON file
/// per session.
pub struct FsStore {
    path: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }
}

impl SnapshotStore for FsStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Loads the current snapshot, discarding it (returning `None`) if
/// missing, corrupted, or older than `ttl`.
///
/// A corrupted snapshot (bad JSON) is treated as "missing" rather than
/// propagated, matching spec §4.10's "missing, corrupted, ... return
/// null" — there's no sensible recovery for a caller here.
pub fn load_snapshot(store: &dyn SnapshotStore, ttl: Duration, now_unix_secs: u64) -> Option<Snapshot> {
    let snapshot = match store.load() {
        Ok(Some(s)) => s,
        Ok(None) | Err(_) => return None,
    };
    if snapshot.is_fresh(now_unix_secs, ttl) {
        Some(snapshot)
    } else {
        None
    }
}

/// Whether a fresh snapshot's mere presence should block a URL-specified
/// load (spec: "the presence of the snapshot key alone suffices").
pub fn blocks_url_load(store: &dyn SnapshotStore, ttl: Duration, now_unix_secs: u64) -> bool {
    load_snapshot(store, ttl, now_unix_secs).is_some()
}
