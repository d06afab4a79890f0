//! Sketchpad Render Library
//!
//! Renderer abstraction and implementations for Sketchpad.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod paint;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use paint::ShapePaint;
pub use renderer::{RenderContext, Renderer};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
