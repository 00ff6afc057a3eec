//! Key-value collaborators the [`Store`](crate::hud::store::Store) persists into.
//!
//! The store only needs `get`/`set` of a string blob under one key, so the
//! contract is a small trait. [`SledKvStore`] keeps the blob on disk;
//! [`MemoryKvStore`] keeps it in process and can simulate an unavailable store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::hud::errors::LifeHudError;

const TREE_STATE: &str = "lifehud";

/// Synchronous string blob storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, LifeHudError>;
    fn set(&self, key: &str, value: &str) -> Result<(), LifeHudError>;
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct SledKvStoreBuilder {
    path: PathBuf,
}

impl SledKvStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<SledKvStore, LifeHudError> {
        SledKvStore::open(self.path)
    }
}

/// Sled-backed persistence for the state blob.
pub struct SledKvStore {
    _db: sled::Db,
    tree: sled::Tree,
}

impl SledKvStore {
    /// Open (or create) the database rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LifeHudError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let tree = db.open_tree(TREE_STATE)?;
        Ok(Self { _db: db, tree })
    }
}

impl KeyValueStore for SledKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, LifeHudError> {
        let Some(bytes) = self.tree.get(key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8(bytes.to_vec())?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LifeHudError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }
}

/// In-process store. `fail_writes`/`fail_reads` make the matching call return
/// [`LifeHudError::StorageUnavailable`].
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<HashMap<String, String>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Raw stored value, bypassing the failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, LifeHudError> {
        if self.fail_reads {
            return Err(LifeHudError::StorageUnavailable("read refused".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), LifeHudError> {
        if self.fail_writes {
            return Err(LifeHudError::StorageUnavailable("quota exceeded".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
