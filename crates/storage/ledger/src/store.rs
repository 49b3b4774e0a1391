use crate::LedgerError;
use herald_types_events::EventId;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Flat mapping of feed name to the last published id
pub type LedgerSnapshot = BTreeMap<String, EventId>;

/// Backing store of the dedup ledger. Always read and written as a whole.
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> Result<LedgerSnapshot, LedgerError>;

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Box<T> {
    fn load(&self) -> Result<LedgerSnapshot, LedgerError> {
        (**self).load()
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        (**self).save(snapshot)
    }
}

/// `{ "feed_name": last_id, ... }` in a small JSON file
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io { path: self.path.clone(), source }
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<LedgerSnapshot, LedgerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LedgerError::NotFound(self.path.clone())),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&contents).map_err(|source| LedgerError::Corrupt { path: self.path.clone(), source })
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_vec_pretty(snapshot).map_err(|source| LedgerError::Corrupt { path: self.path.clone(), source })?;

        // a crash mid-write must never leave a truncated ledger behind
        let temp_path = self.temp_path();
        fs::write(&temp_path, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), feeds = snapshot.len(), "Ledger written");
        Ok(())
    }
}

/// Ledger store kept in memory. Used for dry runs, where nothing may be persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<LedgerSnapshot>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: LedgerSnapshot) -> Self {
        Self { entries: Mutex::new(entries), fail_writes: AtomicBool::new(false) }
    }

    /// Make every following `save` fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<LedgerSnapshot, LedgerError> {
        self.entries.lock().map(|entries| entries.clone()).map_err(|_| LedgerError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("writes disabled".to_string()));
        }
        let mut entries = self.entries.lock().map_err(|_| LedgerError::Unavailable("memory store lock poisoned".to_string()))?;
        *entries = snapshot.clone();
        Ok(())
    }
}
