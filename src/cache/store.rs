// Durable key/value store for cached pages.
// Handles atomic file writes, reads and write timestamps.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::Result;

use super::paths::entry_path;

/// Persistent mapping from string key to byte payload.
///
/// Reads never touch the network. A successful `put` replaces the whole value
/// and is durable once it returns. Implementations must be safe to share
/// between tasks writing different keys.
pub trait KvStore: Send + Sync {
    /// Write a value, replacing any previous one.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Read a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// When the current value for `key` was written.
    fn modified_at(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Check if a key holds a value.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KvStore for FileStore {
    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = entry_path(&self.dir, key);

        // Write atomically via a temp file unique to this writer
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        trace!(key, path = %path.display(), size = value.len(), "Wrote store entry");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(entry_path(&self.dir, key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn modified_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        match fs::metadata(entry_path(&self.dir, key)) {
            Ok(meta) => Ok(Some(DateTime::<Utc>::from(meta.modified()?))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> Result<bool> {
        match fs::metadata(entry_path(&self.dir, key)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, used for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), (value.to_vec(), Utc::now()));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).map(|(value, _)| value.clone()))
    }

    fn modified_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.entries.read().get(key).map(|(_, at)| *at))
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().contains_key(key))
    }
}
