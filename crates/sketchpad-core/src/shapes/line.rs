//! Line shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, TwoPointRecord};
use crate::geometry;
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment, saved as `x,y` (start) and `x2,y2` (end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TwoPointRecord", into = "TwoPointRecord")]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point (the drag anchor).
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    /// Replace the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

impl From<TwoPointRecord> for Line {
    fn from(record: TwoPointRecord) -> Self {
        Self {
            id: record.id,
            start: record.anchor(),
            end: record.other(),
            style: record.style,
        }
    }
}

impl From<Line> for TwoPointRecord {
    fn from(line: Line) -> Self {
        TwoPointRecord::new(line.id, line.start, line.end, line.style)
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn contains_point(&self, point: Point) -> bool {
        geometry::point_near_segment(point, self.start, self.end, self.style.stroke_width)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn anchor(&self) -> Point {
        self.start
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_one_segment() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let elements = line.to_path().elements().to_vec();
        assert_eq!(
            elements,
            vec![
                kurbo::PathEl::MoveTo(Point::new(0.0, 0.0)),
                kurbo::PathEl::LineTo(Point::new(100.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_contains_uses_stroke_width() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        line.style.stroke_width = 2.0;
        assert!(line.contains_point(Point::new(50.0, 0.0)));
        assert!(line.contains_point(Point::new(50.0, 7.0)));
        assert!(!line.contains_point(Point::new(50.0, 8.0)));

        line.style.stroke_width = 10.0;
        assert!(line.contains_point(Point::new(50.0, 15.0)));
    }

    #[test]
    fn test_contains_beyond_endpoints() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.contains_point(Point::new(104.0, 0.0)));
        assert!(!line.contains_point(Point::new(110.0, 0.0)));
    }

    #[test]
    fn test_translate_keeps_length() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        line.translate(Vec2::new(5.0, -5.0));
        assert_eq!(line.start, Point::new(5.0, -5.0));
        assert_eq!(line.end, Point::new(35.0, 35.0));
        assert!((line.start.distance(line.end) - 50.0).abs() < 1e-9);
    }
}
