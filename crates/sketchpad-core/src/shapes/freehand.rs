//! Freehand drawing shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (series of points), saved as `path: [[x, y], ...]`.
///
/// Freehand strokes have no containment rule, so they cannot be picked up
/// and dragged once drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FreehandRecord", into = "FreehandRecord")]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Points in the stroke, never empty.
    pub points: Vec<Point>,
    /// Style properties. The fill color is kept but never painted.
    pub style: ShapeStyle,
}

impl Freehand {
    /// Start a new stroke at `first`.
    pub fn new(first: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![first],
            style,
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct FreehandRecord {
    #[serde(default = "Uuid::new_v4")]
    id: ShapeId,
    path: Vec<[f64; 2]>,
    #[serde(flatten)]
    style: ShapeStyle,
}

impl From<FreehandRecord> for Freehand {
    fn from(record: FreehandRecord) -> Self {
        Self {
            id: record.id,
            points: record.path.into_iter().map(|[x, y]| Point::new(x, y)).collect(),
            style: record.style,
        }
    }
}

impl From<Freehand> for FreehandRecord {
    fn from(freehand: Freehand) -> Self {
        Self {
            id: freehand.id,
            path: freehand.points.iter().map(|p| [p.x, p.y]).collect(),
            style: freehand.style,
        }
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn contains_point(&self, _point: Point) -> bool {
        false
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }

        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn anchor(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_freehand_starts_with_one_point() {
        let freehand = Freehand::new(Point::new(3.0, 4.0), ShapeStyle::default());
        assert_eq!(freehand.len(), 1);
        assert!(!freehand.is_empty());
    }

    #[test]
    fn test_record_path_pairs() {
        let json = r##"{"path":[[5,1],[-2,8]],"fill":"#ffffff","stroke":"#000000","style":"solid","width":3}"##;
        let freehand: Freehand = serde_json::from_str(json).unwrap();
        assert_eq!(freehand.points, vec![Point::new(5.0, 1.0), Point::new(-2.0, 8.0)]);
        assert!((freehand.style.stroke_width - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_follows_points() {
        let mut freehand = Freehand::new(Point::new(0.0, 0.0), ShapeStyle::default());
        freehand.add_point(Point::new(10.0, 0.0));
        freehand.add_point(Point::new(10.0, 10.0));

        let elements: Vec<PathEl> = freehand.to_path().elements().to_vec();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(elements[2], PathEl::LineTo(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_never_contains() {
        let freehand = Freehand::new(Point::new(0.0, 0.0), ShapeStyle::default());
        assert!(!freehand.contains_point(Point::new(0.0, 0.0)));
    }
}
