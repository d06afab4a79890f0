//! Browser `localStorage` implementation for WebAssembly.

use super::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;

/// Key-value storage backed by `window.localStorage`.
///
/// Note: This is intentionally not Send/Sync since WASM is single-threaded
/// and DOM handles are not thread-safe.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the origin's `localStorage`.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

/// Browsers report a full store as a `QuotaExceededError` DOMException.
fn write_error(e: JsValue) -> StorageError {
    let message = format!("{:?}", e);
    if message.contains("QuotaExceeded") {
        StorageError::QuotaExceeded(message)
    } else {
        StorageError::Other(format!("setItem failed: {}", message))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("getItem failed: {:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(write_error)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("removeItem failed: {:?}", e)))
    }
}
