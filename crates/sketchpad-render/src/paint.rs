//! Backend-neutral paint description for a single shape.

use kurbo::{BezPath, Cap, Join, Stroke};
use peniko::Color;
use sketchpad_core::shapes::{Shape, ShapeKind};

/// What a backend needs to paint one shape: a fresh path, an optional
/// fill and a stroke.
///
/// Every shape gets its own path so no geometry leaks from one shape into
/// the next.
#[derive(Debug, Clone)]
pub struct ShapePaint {
    pub path: BezPath,
    /// Only rectangles and circles are filled.
    pub fill: Option<Color>,
    pub stroke_color: Color,
    pub stroke: Stroke,
}

impl ShapePaint {
    /// Describe how to paint `shape`.
    pub fn from_shape(shape: &Shape) -> Self {
        let style = shape.style();
        let fill = match shape.kind() {
            ShapeKind::Rectangle | ShapeKind::Circle => Some(style.fill()),
            ShapeKind::Line | ShapeKind::Freehand => None,
        };

        let mut stroke = Stroke::new(style.stroke_width)
            .with_caps(Cap::Butt)
            .with_join(Join::Miter);
        if let Some(pattern) = style.dash_pattern() {
            stroke = stroke.with_dashes(0.0, pattern);
        }

        Self {
            path: shape.to_path(),
            fill,
            stroke_color: style.stroke(),
            stroke,
        }
    }
}
