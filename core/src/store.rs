//! Byte-oriented key-value storage.
//!
//! # Design
//! `KeyValueStore` is the narrow seam between the repository and whatever
//! holds the bytes. Keys live in a single flat namespace with no hierarchy.
//! `keys()` enumerates whatever the backend knows about at the moment of the
//! call; there is no snapshot isolation, so keys added or removed while the
//! iterator is being consumed may or may not be observed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Flat string-keyed byte storage.
///
/// `put` upserts: writing an existing key silently overwrites it. Uniqueness
/// is the repository's concern, not the store's.
pub trait KeyValueStore {
    /// Read the blob stored under `key`. Fails with [`StoreError::NotFound`]
    /// when the key is absent.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write `value` under `key`, replacing any existing blob.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Fails with [`StoreError::NotFound`] when absent.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Lazily enumerate the keys known at call time.
    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_>;
}

/// One-file-per-key store rooted at a base directory.
///
/// The file name IS the key; there is no transformation or sharding.
#[derive(Debug)]
pub struct DiskStore {
    base: PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `base`, creating the directory if needed.
    pub fn open(base: impl AsRef<Path>) -> io::Result<Self> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value).map_err(Into::into)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        // Unreadable entries are skipped rather than failing the whole
        // enumeration; the contract is best-effort, not a snapshot.
        let entries = fs::read_dir(&self.base).ok();
        Box::new(
            entries
                .into_iter()
                .flatten()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok()),
        )
    }
}
