//! Sketchpad Core Library
//!
//! Platform-agnostic shapes, scene, interaction and persistence for the
//! Sketchpad drawing surface.

pub mod canvas;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod persistence;
pub mod scene;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use canvas::Canvas;
pub use input::{MouseButton, PointerEvent};
pub use interaction::{Gesture, InteractionController};
pub use persistence::{LoadOutcome, PersistenceError, PersistenceResult, SCENE_KEY, ScenePersistence};
pub use scene::{Scene, SceneError};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, StorageResult};
pub use tools::ToolSettings;
