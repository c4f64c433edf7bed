//! Session-scoped key-value storage.
//!
//! The gate never touches ambient global state: it is handed a
//! [`SessionStorage`] and reads/writes its two string entries through it.
//!
//! - `MemoryStorage`: per-process map, lost on exit (tests, embedded hosts)
//! - `FileStorage`: JSON map file, shared across runs of the same user

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub trait SessionStorage: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: SessionStorage + ?Sized> SessionStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
