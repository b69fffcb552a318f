//! The additively-weighted bisector ("hyperboloid") between two balls, and
//! the projection/intersection operations the contour builder needs on it.
//!
//! The bisector of balls `a` and `c` is the locus `d(x,a) = d(x,c)` where
//! `d(x,b) = |x - center(b)| - radius(b)`; for two balls of different radii
//! this is one sheet of a hyperboloid of revolution about the axis through
//! their centers. All operations here reduce the 3-D problem to a 1-D root
//! along a caller-supplied line (never a 2-D or 3-D search), so precision is
//! controlled purely by the number of bisection halvings, not by any
//! heuristic step size.

use super::ball::Ball;
use super::point::{midpoint, Point};

const ROOT_ITERATIONS: u32 = 60;

/// Signed "which side of the hyperboloid" value: negative means closer to
/// `a` (in the additively-weighted sense), positive means closer to `c`.
pub fn hyperboloid_value(p: Point, a: &Ball, c: &Ball) -> f64 {
    a.weighted_distance_to_point(p) - c.weighted_distance_to_point(p)
}

/// Projects `p` onto the `(a,c)` hyperboloid along the line through `p` and
/// the midpoint of the two centers.
///
/// Returns `p` unchanged if the line direction is degenerate (p already at
/// the midpoint).
pub fn project_onto_hyperboloid(p: Point, a: &Ball, c: &Ball) -> Point {
    let m = midpoint(a.center, c.center);
    let dir = match super::point::unit_vector(p, m) {
        Some(d) => d,
        None => return p,
    };
    match bracket_and_bisect(p, dir, a, c) {
        Some(t) => p + dir * t,
        None => p,
    }
}

/// Finds `t` such that a bracket `[p, p + dir*t]` contains a sign change of
/// `hyperboloid_value`, then bisects down to `ROOT_ITERATIONS` precision.
fn bracket_and_bisect(p: Point, dir: Point, a: &Ball, c: &Ball) -> Option<f64> {
    let f = |t: f64| hyperboloid_value(p + dir * t, a, c);
    let f0 = f(0.0);
    if f0.abs() < 1e-12 {
        return Some(0.0);
    }

    let mut lo = 0.0;
    let mut hi = 0.0;
    let mut step = 1.0;
    let mut found = false;
    for _ in 0..64 {
        let forward = f(step);
        if forward.signum() != f0.signum() {
            lo = 0.0;
            hi = step;
            found = true;
            break;
        }
        let backward = f(-step);
        if backward.signum() != f0.signum() {
            lo = -step;
            hi = 0.0;
            found = true;
            break;
        }
        step *= 2.0;
    }
    if !found {
        return None;
    }

    let (mut lo, mut hi) = (lo, hi);
    let mut f_lo = f(lo);
    for _ in 0..ROOT_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        let f_mid = f(mid);
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some((lo + hi) * 0.5)
}

/// Intersects the segment `p0 -> p1` with the `(a,c)` hyperboloid, returning
/// the signed distance along the segment (0 at `p0`, `|p1-p0|` at `p1`) if
/// the segment crosses it, `None` otherwise.
pub fn intersect_segment_with_hyperboloid(p0: Point, p1: Point, a: &Ball, c: &Ball) -> Option<f64> {
    let len = (p1 - p0).length();
    if len < 1e-12 {
        return None;
    }
    let dir = (p1 - p0) / len;
    let f0 = hyperboloid_value(p0, a, c);
    let f1 = hyperboloid_value(p1, a, c);
    if f0.signum() == f1.signum() && f0.abs() > 1e-12 && f1.abs() > 1e-12 {
        return None;
    }
    let mut lo = 0.0;
    let mut hi = len;
    let mut f_lo = f0;
    for _ in 0..ROOT_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        let f_mid = hyperboloid_value(p0 + dir * mid, a, c);
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some((lo + hi) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projected_point_is_on_bisector() {
        let a = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let c = Ball::new(Point::new(4.0, 0.0, 0.0), 1.5);
        let p = Point::new(1.0, 3.0, 0.0);
        let projected = project_onto_hyperboloid(p, &a, &c);
        assert!(hyperboloid_value(projected, &a, &c).abs() < 1e-6);
    }

    #[test]
    fn equal_radii_bisector_is_the_perpendicular_plane() {
        let a = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let c = Ball::new(Point::new(4.0, 0.0, 0.0), 1.0);
        let p = Point::new(-2.0, 5.0, 1.0);
        let projected = project_onto_hyperboloid(p, &a, &c);
        assert!((projected.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn segment_intersection_finds_crossing() {
        let a = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let c = Ball::new(Point::new(4.0, 0.0, 0.0), 1.0);
        let p0 = Point::new(-1.0, 0.0, 0.0);
        let p1 = Point::new(5.0, 0.0, 0.0);
        let t = intersect_segment_with_hyperboloid(p0, p1, &a, &c).unwrap();
        let hit = p0 + (p1 - p0).normalize() * t;
        assert!((hit.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn segment_not_crossing_returns_none() {
        let a = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let c = Ball::new(Point::new(4.0, 0.0, 0.0), 1.0);
        let p0 = Point::new(-1.0, 0.0, 0.0);
        let p1 = Point::new(-0.5, 0.0, 0.0);
        assert!(intersect_segment_with_hyperboloid(p0, p1, &a, &c).is_none());
    }
}
