//! Tool settings: the drawing mode and the style applied to new shapes.

use crate::shapes::{SerializableColor, ShapeKind, ShapeStyle};
use serde::{Deserialize, Serialize};

/// Smallest and largest stroke width the settings panel offers.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 50.0;

/// Current tool settings, read whenever a shape is created.
///
/// Changing these never touches shapes that already exist: each shape takes
/// a snapshot of the style when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Kind of shape the next gesture draws.
    pub mode: ShapeKind,
    pub fill_color: SerializableColor,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub dashed: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mode: ShapeKind::Rectangle,
            fill_color: SerializableColor::white(),
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            dashed: false,
        }
    }
}

impl ToolSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drawing mode.
    pub fn set_mode(&mut self, mode: ShapeKind) {
        if self.mode != mode {
            log::debug!("Drawing mode: {}", mode.name());
        }
        self.mode = mode;
    }

    /// Set the stroke width, clamped to the supported range.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = if width.is_finite() {
            width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
        } else {
            MIN_STROKE_WIDTH
        };
    }

    /// Flip between solid and dashed strokes.
    pub fn toggle_dashed(&mut self) {
        self.dashed = !self.dashed;
    }

    /// Snapshot the style for a shape created now.
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            stroke_width: self.stroke_width,
            dashed: self.dashed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_snapshot() {
        let mut settings = ToolSettings::new();
        settings.fill_color = SerializableColor::rgb(255, 0, 0);
        settings.dashed = true;
        let style = settings.style();
        assert_eq!(style.fill_color, SerializableColor::rgb(255, 0, 0));
        assert!(style.dashed);

        settings.fill_color = SerializableColor::rgb(0, 255, 0);
        assert_eq!(style.fill_color, SerializableColor::rgb(255, 0, 0));
    }

    #[test]
    fn test_stroke_width_clamped() {
        let mut settings = ToolSettings::new();
        settings.set_stroke_width(0.0);
        assert!((settings.stroke_width - MIN_STROKE_WIDTH).abs() < f64::EPSILON);
        settings.set_stroke_width(500.0);
        assert!((settings.stroke_width - MAX_STROKE_WIDTH).abs() < f64::EPSILON);
        settings.set_stroke_width(f64::NAN);
        assert!((settings.stroke_width - MIN_STROKE_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_dashed() {
        let mut settings = ToolSettings::new();
        settings.toggle_dashed();
        assert!(settings.dashed);
        settings.toggle_dashed();
        assert!(!settings.dashed);
    }
}
