//! Area summation (L5): fan area for contact contours, triangle-sum area for
//! contact remainders.

use crate::contour::Contour;
use crate::geometry::{project_onto_hyperboloid, Ball, Point};

/// A single mesh triangle, as produced by [`crate::remainder::contact_remainder`].
pub type Triangle = [Point; 3];

pub fn triangle_area(triangle: &Triangle) -> f64 {
    0.5 * (triangle[1] - triangle[0])
        .cross(triangle[2] - triangle[0])
        .length()
}

/// Fans `contour` around its hyperboloid-projected centroid and sums the
/// resulting triangle areas.
pub fn contour_area(contour: &Contour, a: &Ball, b: &Ball) -> f64 {
    let n = contour.points.len();
    if n < 3 {
        return 0.0;
    }
    let apex = project_onto_hyperboloid(contour.centroid(), a, b);
    (0..n)
        .map(|i| {
            let p0 = contour.points[i];
            let p1 = contour.points[(i + 1) % n];
            triangle_area(&[apex, p0, p1])
        })
        .sum()
}

/// Sum over several contours, the total inter-ball contact area of `(a,b)`.
pub fn total_contour_area(contours: &[Contour], a: &Ball, b: &Ball) -> f64 {
    contours.iter().map(|c| contour_area(c, a, b)).sum()
}

/// Sum of triangle areas, the solvent-accessible area of a single ball.
pub fn remainder_area(triangles: &[Triangle]) -> f64 {
    triangles.iter().map(triangle_area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point as P;

    #[test]
    fn triangle_area_of_unit_right_triangle() {
        let tri = [P::new(0.0, 0.0, 0.0), P::new(1.0, 0.0, 0.0), P::new(0.0, 1.0, 0.0)];
        assert!((triangle_area(&tri) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn contour_area_of_a_square_fan() {
        let contour = Contour {
            points: vec![
                P::new(1.0, 0.0, 0.0),
                P::new(0.0, 1.0, 0.0),
                P::new(-1.0, 0.0, 0.0),
                P::new(0.0, -1.0, 0.0),
            ],
        };
        let a = Ball::new(P::new(0.0, 0.0, -5.0), 1.0);
        let b = Ball::new(P::new(0.0, 0.0, 5.0), 1.0);
        let area = contour_area(&contour, &a, &b);
        assert!((area - 2.0).abs() < 1e-6);
    }

    #[test]
    fn remainder_area_sums_triangles() {
        let triangles = vec![
            [P::new(0.0, 0.0, 0.0), P::new(1.0, 0.0, 0.0), P::new(0.0, 1.0, 0.0)],
            [P::new(0.0, 0.0, 0.0), P::new(1.0, 0.0, 0.0), P::new(0.0, 2.0, 0.0)],
        ];
        assert!((remainder_area(&triangles) - 1.5).abs() < 1e-12);
    }
}
