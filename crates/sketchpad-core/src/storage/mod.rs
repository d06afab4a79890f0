//! Key-value text stores used for persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for key-value text stores.
///
/// Implementations can keep values in memory, in files on disk, or in the
/// browser's `localStorage`. All calls complete synchronously.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if `key` holds a value.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Trait for key-value text stores (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if `key` holds a value.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Create the default store for the current platform.
///
/// Native builds use a [`FileStorage`] under `dir` (or the platform data
/// directory), falling back to memory if the directory cannot be created.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage(dir: Option<std::path::PathBuf>) -> Box<dyn KeyValueStore> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    match storage {
        Ok(storage) => {
            log::info!("Using file storage at {}", storage.base_path().display());
            Box::new(storage)
        }
        Err(e) => {
            log::warn!("File storage unavailable ({}), falling back to memory", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Create the default store for the current platform.
///
/// WASM builds use the browser's `localStorage`, falling back to memory when
/// it is disabled (e.g. some private browsing modes).
#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> Box<dyn KeyValueStore> {
    match LocalStorage::new() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Box::new(MemoryStorage::new())
        }
    }
}
