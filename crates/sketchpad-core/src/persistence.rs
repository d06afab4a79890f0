//! Saving and loading the scene through a key-value store.

use crate::scene::{Scene, SceneError};
use crate::storage::{KeyValueStore, StorageError};
use thiserror::Error;

/// Key the scene is stored under.
pub const SCENE_KEY: &str = "drawingAppData";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored scene replaced the current one; holds its shape count.
    Loaded(usize),
    /// Nothing was stored; the current scene is untouched.
    Missing,
}

/// Saves and restores a scene under a single key.
pub struct ScenePersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ScenePersistence<S> {
    /// Persist under [`SCENE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, SCENE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize `scene` and overwrite the stored value.
    /// Returns the number of shapes written.
    pub fn save(&self, scene: &Scene) -> PersistenceResult<usize> {
        let json = scene.to_json().map_err(SceneError::from)?;
        self.store.set(&self.key, &json)?;
        log::info!("Saved {} shapes under '{}'", scene.len(), self.key);
        Ok(scene.len())
    }

    /// Replace `scene` with the stored one.
    ///
    /// On any error, or when nothing is stored, `scene` is left unchanged.
    pub fn load(&self, scene: &mut Scene) -> PersistenceResult<LoadOutcome> {
        let Some(json) = self.store.get(&self.key)? else {
            log::info!("No saved drawing under '{}'", self.key);
            return Ok(LoadOutcome::Missing);
        };
        let loaded = Scene::from_json(&json)?;
        let count = loaded.len();
        *scene = loaded;
        log::info!("Loaded {} shapes from '{}'", count, self.key);
        Ok(LoadOutcome::Loaded(count))
    }
}
