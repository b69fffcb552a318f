//! Points and vectors used throughout the geometry layer.

use glam::DVec3;

/// A 3-D point or direction vector.
///
/// Thin wrapper over `glam::DVec3` kept distinct from [`crate::geometry::Ball`]
/// so the two don't get confused at call sites that accept either.
pub type Point = DVec3;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

/// Unit vector from `a` towards `b`.
///
/// Returns `None` if `a` and `b` coincide to numerical precision, since the
/// direction is then undefined.
pub fn unit_vector(a: Point, b: Point) -> Option<Point> {
    let d = b - a;
    let len = d.length();
    if len < 1e-12 {
        None
    } else {
        Some(d / len)
    }
}

/// Midpoint of two points.
#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    (a + b) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(3.0, 4.0, 0.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-12);
    }

    #[test]
    fn unit_vector_of_coincident_points_is_none() {
        let a = Point::new(1.0, 1.0, 1.0);
        assert!(unit_vector(a, a).is_none());
    }

    #[test]
    fn unit_vector_has_unit_length() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(2.0, 0.0, 0.0);
        let u = unit_vector(a, b).unwrap();
        assert!((u.length() - 1.0).abs() < 1e-12);
        assert_eq!(u, Point::new(1.0, 0.0, 0.0));
    }
}
