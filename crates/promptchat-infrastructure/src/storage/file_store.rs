//! File-backed key-value storage with atomic writes.
//!
//! Each key lives in its own file under a single directory:
//!
//! ```text
//! store_dir/
//! ├── gpt-prompts.json
//! ├── gpt-conversations.json
//! ├── current-conversation-id.json
//! └── .store.lock
//! ```

use fs2::FileExt;
use promptchat_core::error::{ChatError, Result};
use promptchat_core::storage::{KeyValueStore, StorageKey};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".store.lock";

/// A directory of raw values, one file per [`StorageKey`].
///
/// Provides:
/// - **Atomicity**: writes go to a temp file that is renamed over the target
/// - **Isolation**: an exclusive advisory lock serializes writers, including
///   writers in other processes (the last writer still wins)
/// - **Durability**: explicit fsync before rename
///
/// Does NOT:
/// - Know about prompts or conversations (values are opaque strings)
/// - Recover from failures (callers decide)
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    fn temp_path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key.as_str()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn acquire_lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(&self.dir.join(LOCK_FILE_NAME))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let _lock = self.acquire_lock()?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path_for(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, self.path_for(key))?;

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        let _lock = self.acquire_lock()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Exclusive lock guard; the lock is released when the handle is dropped.
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn acquire(lock_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        file.lock_exclusive()
            .map_err(|e| ChatError::storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
