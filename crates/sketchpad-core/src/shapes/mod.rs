//! Shape definitions for the drawing surface.

mod circle;
mod freehand;
mod line;
mod rectangle;

pub use circle::Circle;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;

use kurbo::{BezPath, Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Dash pattern used for dashed strokes (drawn length, gap length).
pub const DASH_PATTERN: [f64; 2] = [5.0, 5.0];

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color string: {0:?}")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8).
///
/// Stored on disk as a CSS hex string so saved scenes stay human-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties captured when a shape is created.
///
/// Flattened into each shape record as `fill`, `stroke`, `width` and
/// `style` (`"dashed"` or `"solid"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    #[serde(rename = "stroke")]
    pub stroke_color: SerializableColor,
    /// Fill color. Ignored when painting lines and freehand strokes.
    #[serde(rename = "fill")]
    pub fill_color: SerializableColor,
    /// Stroke width in surface pixels.
    #[serde(rename = "width")]
    pub stroke_width: f64,
    /// Dashed (`DASH_PATTERN`) instead of solid stroke.
    #[serde(rename = "style", default, with = "dash_style")]
    pub dashed: bool,
}

/// The dash flag as the `"dashed"` / `"solid"` strings of a line style.
mod dash_style {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const DASHED: &str = "dashed";
    const SOLID: &str = "solid";

    pub fn serialize<S: Serializer>(dashed: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *dashed { DASHED } else { SOLID })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            DASHED => Ok(true),
            SOLID => Ok(false),
            other => Err(D::Error::unknown_variant(other, &[DASHED, SOLID])),
        }
    }
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Color {
        self.fill_color.into()
    }

    /// Dash pattern to apply to the stroke, if any.
    pub fn dash_pattern(&self) -> Option<[f64; 2]> {
        self.dashed.then_some(DASH_PATTERN)
    }

    /// A usable stroke width is finite and strictly positive.
    pub fn has_valid_width(&self) -> bool {
        self.stroke_width.is_finite() && self.stroke_width > 0.0
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::white(),
            stroke_width: 2.0,
            dashed: false,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// On-disk layout shared by the two-point shapes: anchor `x,y`, secondary
/// point `x2,y2` and the flattened style. Records saved without an `id` get
/// a fresh one.
#[derive(Serialize, Deserialize)]
pub(crate) struct TwoPointRecord {
    #[serde(default = "Uuid::new_v4")]
    id: ShapeId,
    x: f64,
    y: f64,
    x2: f64,
    y2: f64,
    #[serde(flatten)]
    style: ShapeStyle,
}

impl TwoPointRecord {
    fn new(id: ShapeId, anchor: Point, other: Point, style: ShapeStyle) -> Self {
        Self {
            id,
            x: anchor.x,
            y: anchor.y,
            x2: other.x,
            y2: other.y,
            style,
        }
    }

    fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn other(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// The four kinds of shape that can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    #[default]
    #[serde(rename = "rect")]
    Rectangle,
    Circle,
    #[serde(rename = "free")]
    Freehand,
}

impl ShapeKind {
    /// All kinds, in toolbar order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Freehand,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Freehand => "Freehand",
        }
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Check if a point lies within (or, for lines, near) this shape.
    fn contains_point(&self, point: Point) -> bool;

    /// Get a freshly built path for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// The point a drag offset is measured from.
    fn anchor(&self) -> Point;

    /// Move every defining point by `delta`.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all shape types, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "line")]
    Line(Line),
    #[serde(rename = "rect")]
    Rectangle(Rectangle),
    #[serde(rename = "circle")]
    Circle(Circle),
    #[serde(rename = "free")]
    Freehand(Freehand),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Line(s) => s.id(),
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Freehand(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(_) => ShapeKind::Line,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Freehand(_) => ShapeKind::Freehand,
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        match self {
            Shape::Line(s) => s.contains_point(point),
            Shape::Rectangle(s) => s.contains_point(point),
            Shape::Circle(s) => s.contains_point(point),
            Shape::Freehand(s) => s.contains_point(point),
        }
    }

    /// Whether this kind has a containment rule (and can therefore be dragged).
    pub fn is_hit_testable(&self) -> bool {
        !matches!(self, Shape::Freehand(_))
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Freehand(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Line(s) => s.style(),
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Freehand(s) => s.style(),
        }
    }

    pub fn anchor(&self) -> Point {
        match self {
            Shape::Line(s) => s.anchor(),
            Shape::Rectangle(s) => s.anchor(),
            Shape::Circle(s) => s.anchor(),
            Shape::Freehand(s) => s.anchor(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Line(s) => s.translate(delta),
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Circle(s) => s.translate(delta),
            Shape::Freehand(s) => s.translate(delta),
        }
    }

    /// Build a two-point shape of the given kind. Freehand strokes are not
    /// defined by two points, so `None` is returned for them.
    pub fn from_points(kind: ShapeKind, start: Point, end: Point, style: ShapeStyle) -> Option<Self> {
        match kind {
            ShapeKind::Line => Some(Shape::Line(Line::new(start, end).with_style(style))),
            ShapeKind::Rectangle => Some(Shape::Rectangle(Rectangle::new(start, end).with_style(style))),
            ShapeKind::Circle => Some(Shape::Circle(Circle::new(start, end).with_style(style))),
            ShapeKind::Freehand => None,
        }
    }

    /// Get the freehand stroke if this shape is one.
    pub fn as_freehand_mut(&mut self) -> Option<&mut Freehand> {
        match self {
            Shape::Freehand(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = SerializableColor::from_hex("#ff8000").unwrap();
        assert_eq!(color, SerializableColor::rgb(255, 128, 0));
        assert_eq!(color.to_hex(), "#ff8000");
    }

    #[test]
    fn test_color_short_and_alpha_forms() {
        assert_eq!(
            SerializableColor::from_hex("#f00").unwrap(),
            SerializableColor::rgb(255, 0, 0)
        );
        let translucent = SerializableColor::from_hex("#00000080").unwrap();
        assert_eq!(translucent.a, 128);
        assert_eq!(translucent.to_hex(), "#00000080");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(SerializableColor::from_hex("red").is_err());
        assert!(SerializableColor::from_hex("#12345").is_err());
        assert!(SerializableColor::from_hex("#gg0000").is_err());
        assert!(SerializableColor::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_shape_serializes_flat_record() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(0.0, 5.0), Point::new(10.0, 20.0)));
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "rect");
        assert_eq!(json["x"], 0.0);
        assert_eq!(json["y"], 5.0);
        assert_eq!(json["x2"], 10.0);
        assert_eq!(json["y2"], 20.0);
        assert_eq!(json["stroke"], "#000000");
        assert_eq!(json["fill"], "#ffffff");
        assert_eq!(json["width"], 2.0);
        assert_eq!(json["style"], "solid");
        assert!(json["id"].is_string());

        let mut free = Freehand::new(Point::new(1.0, 2.0), ShapeStyle::default());
        free.add_point(Point::new(3.0, 4.0));
        free.style.dashed = true;
        let json = serde_json::to_value(Shape::Freehand(free)).unwrap();
        assert_eq!(json["type"], "free");
        assert_eq!(json["path"], serde_json::json!([[1.0, 2.0], [3.0, 4.0]]));
        assert_eq!(json["style"], "dashed");
    }

    #[test]
    fn test_loads_records_without_id() {
        let json = r##"[
            {"type":"line","x":0,"y":0,"x2":100,"y2":0,"fill":"#ffffff","stroke":"#0000ff","style":"dashed","width":4},
            {"type":"circle","x":100,"y":100,"x2":130,"y2":100,"fill":"#00ff00","stroke":"#000000","style":"solid","width":1,
             "offsetX":3,"offsetY":4,"dragging":false},
            {"type":"free","path":[[1,1],[2,3]],"fill":"#ffffff","stroke":"#000000","style":"solid","width":2}
        ]"##;
        let shapes: Vec<Shape> = serde_json::from_str(json).unwrap();
        assert_eq!(shapes.len(), 3);

        let Shape::Line(line) = &shapes[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.start, Point::new(0.0, 0.0));
        assert_eq!(line.end, Point::new(100.0, 0.0));
        assert!(line.style.dashed);
        assert_eq!(line.style.stroke_color, SerializableColor::rgb(0, 0, 255));
        assert!((line.style.stroke_width - 4.0).abs() < f64::EPSILON);

        let Shape::Circle(circle) = &shapes[1] else {
            panic!("expected a circle");
        };
        assert_eq!(circle.center, Point::new(100.0, 100.0));
        assert_eq!(circle.rim, Point::new(130.0, 100.0));
        assert!(!circle.style.dashed);

        let Shape::Freehand(free) = &shapes[2] else {
            panic!("expected a freehand stroke");
        };
        assert_eq!(free.points, vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0)]);

        assert_ne!(shapes[0].id(), shapes[1].id());
    }

    #[test]
    fn test_missing_dash_style_means_solid() {
        let json = r##"{"type":"rect","x":1,"y":1,"x2":2,"y2":2,"fill":"#ffffff","stroke":"#000000","width":1}"##;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert!(!shape.style().dashed);
    }

    #[test]
    fn test_unknown_dash_style_rejected() {
        let json = r##"{"type":"rect","x":1,"y":1,"x2":2,"y2":2,"fill":"#ffffff","stroke":"#000000","style":"dotted","width":1}"##;
        assert!(serde_json::from_str::<Shape>(json).is_err());
    }

    #[test]
    fn test_from_points_kinds() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 5.0);
        for kind in ShapeKind::ALL {
            let shape = Shape::from_points(kind, a, b, ShapeStyle::default());
            match kind {
                ShapeKind::Freehand => assert!(shape.is_none()),
                _ => assert_eq!(shape.unwrap().kind(), kind),
            }
        }
    }

    #[test]
    fn test_freehand_not_hit_testable() {
        let free = Shape::Freehand(Freehand::new(Point::new(1.0, 1.0), ShapeStyle::default()));
        assert!(!free.is_hit_testable());
        assert!(!free.contains_point(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_dash_pattern() {
        let mut style = ShapeStyle::default();
        assert_eq!(style.dash_pattern(), None);
        style.dashed = true;
        assert_eq!(style.dash_pattern(), Some([5.0, 5.0]));
    }
}
