//! Point-to-segment distance and point-in-shape tests.

use kurbo::Point;

/// Extra slack, in pixels, added to a line's stroke width when hit-testing it.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Distance from a point to the segment `a`→`b`.
///
/// The projection onto the infinite line is clamped to the segment, so points
/// beyond either end measure to that endpoint. A degenerate segment (`a == b`)
/// is treated as a single point.
pub fn distance_point_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Axis-aligned containment for the rectangle spanned by two opposite corners.
/// Corner order does not matter; the boundary is inclusive.
pub fn point_in_corners(point: Point, a: Point, b: Point) -> bool {
    point.x >= a.x.min(b.x)
        && point.x <= a.x.max(b.x)
        && point.y >= a.y.min(b.y)
        && point.y <= a.y.max(b.y)
}

/// Containment for the circle centered at `center` passing through `rim`.
/// The boundary is inclusive.
pub fn point_in_circle(point: Point, center: Point, rim: Point) -> bool {
    point.distance(center) <= center.distance(rim)
}

/// Whether `point` is within `stroke_width + HIT_TOLERANCE` of the segment.
pub fn point_near_segment(point: Point, a: Point, b: Point, stroke_width: f64) -> bool {
    distance_point_to_segment(point, a, b) <= stroke_width + HIT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_segment_midpoint_is_zero() {
        let a = Point::new(3.0, 7.0);
        let b = Point::new(-11.0, 42.0);
        let mid = a.midpoint(b);
        assert!(distance_point_to_segment(mid, a, b).abs() < EPS);
    }

    #[test]
    fn test_perpendicular_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((distance_point_to_segment(Point::new(50.0, 8.0), a, b) - 8.0).abs() < EPS);
    }

    #[test]
    fn test_clamps_to_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Infinite-line distance would be 3, the segment distance is 5.
        let p = Point::new(14.0, 3.0);
        assert!((distance_point_to_segment(p, a, b) - 5.0).abs() < EPS);
        let q = Point::new(-4.0, -3.0);
        assert!((distance_point_to_segment(q, a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        assert!((distance_point_to_segment(Point::new(5.0, 6.0), a, a) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_corners_orientation_independent() {
        let (x1, y1, x2, y2) = (10.0, 10.0, 50.0, 40.0);
        let corners = [
            (Point::new(x1, y1), Point::new(x2, y2)),
            (Point::new(x2, y2), Point::new(x1, y1)),
            (Point::new(x1, y2), Point::new(x2, y1)),
            (Point::new(x2, y1), Point::new(x1, y2)),
        ];
        let samples = [
            (Point::new(20.0, 20.0), true),
            (Point::new(10.0, 40.0), true),
            (Point::new(5.0, 5.0), false),
            (Point::new(51.0, 20.0), false),
        ];
        for (a, b) in corners {
            for (p, expected) in samples {
                assert_eq!(point_in_corners(p, a, b), expected, "{a:?} {b:?} {p:?}");
            }
        }
    }

    #[test]
    fn test_circle_boundary() {
        let center = Point::new(100.0, 100.0);
        let rim = Point::new(130.0, 100.0);
        assert!(point_in_circle(Point::new(100.0, 130.0), center, rim));
        assert!(!point_in_circle(Point::new(100.0, 130.0 + 1e-6), center, rim));
        assert!(!point_in_circle(Point::new(100.0, 131.0), center, rim));
    }

    #[test]
    fn test_near_segment_tolerance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(point_near_segment(Point::new(50.0, 7.0), a, b, 2.0));
        assert!(!point_near_segment(Point::new(50.0, 7.5), a, b, 2.0));
    }
}
