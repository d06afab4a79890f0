//! Sketchpad Application
//!
//! The application shell providing windowing, input handling,
//! and integration of all components.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, DATA_DIR_ENV};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{render_ui, Notice, NoticeKind, UiAction, UiState};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
