//! Constrained contact remainder construction (L4b): the solvent-accessible
//! cap of a single ball, clipped against its touching neighbors.

use crate::area::Triangle;
use crate::geometry::{safe_quadratic_roots, Ball, Point, Quadruple};
use crate::icosahedron::SubdividedIcosahedron;

/// Builds the solvent-accessible triangle mesh of ball `a_id` at probe
/// radius `probe`, clipped against every neighbor found in the quadruples
/// listed by `vertex_ids_around_ball`.
pub fn contact_remainder(
    balls: &[Ball],
    vertices_vector: &[(Quadruple, Ball)],
    vertex_ids_around_ball: &[usize],
    a_id: usize,
    probe: f64,
    sih_depth: usize,
) -> Vec<Triangle> {
    let expanded_a = balls[a_id].inflated(probe);

    let mut neighbor_ids: Vec<usize> = Vec::new();
    for &vertex_id in vertex_ids_around_ball {
        if let Some((quad, _)) = vertices_vector.get(vertex_id) {
            if !quad.contains(a_id) {
                continue;
            }
            for &id in quad.as_slice() {
                if id != a_id && !neighbor_ids.contains(&id) {
                    neighbor_ids.push(id);
                }
            }
        }
    }

    let mesh = SubdividedIcosahedron::new(sih_depth).fit_into_sphere(expanded_a.center, expanded_a.radius);
    let mut triangles: Vec<Triangle> = mesh
        .triples()
        .iter()
        .map(|&[i, j, k]| [mesh.vertices()[i], mesh.vertices()[j], mesh.vertices()[k]])
        .collect();

    for &neighbor_id in &neighbor_ids {
        let expanded_c = balls[neighbor_id].inflated(probe);
        triangles = clip_against_sphere(triangles, expanded_c.center, expanded_c.radius);
        if triangles.is_empty() {
            break;
        }
    }

    triangles
}

fn clip_against_sphere(triangles: Vec<Triangle>, center: Point, radius: f64) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(triangles.len());
    for triangle in triangles {
        let inside = [
            is_inside(center, radius, triangle[0]),
            is_inside(center, radius, triangle[1]),
            is_inside(center, radius, triangle[2]),
        ];
        let inside_count = inside.iter().filter(|&&v| v).count();
        match inside_count {
            3 => {}
            0 => out.push(triangle),
            2 => {
                let outside_idx = inside.iter().position(|&v| !v).unwrap();
                let outside = triangle[outside_idx];
                let in1 = triangle[(outside_idx + 1) % 3];
                let in2 = triangle[(outside_idx + 2) % 3];
                let p1 = intersect_segment_with_sphere(in1, outside, center, radius);
                let p2 = intersect_segment_with_sphere(in2, outside, center, radius);
                out.push([outside, p1, p2]);
            }
            1 => {
                let inside_idx = inside.iter().position(|&v| v).unwrap();
                let inner = triangle[inside_idx];
                let out1 = triangle[(inside_idx + 1) % 3];
                let out2 = triangle[(inside_idx + 2) % 3];
                let p1 = intersect_segment_with_sphere(inner, out1, center, radius);
                let p2 = intersect_segment_with_sphere(inner, out2, center, radius);
                out.push([p1, out1, out2]);
                out.push([p1, out2, p2]);
            }
            _ => unreachable!(),
        }
    }
    out
}

fn is_inside(center: Point, radius: f64, p: Point) -> bool {
    (p - center).length() < radius
}

/// The point where segment `p0 -> p1` crosses the sphere `(center, radius)`,
/// solved as the quadratic root along the segment (the closed-form
/// equivalent of a sine-rule construction in the endpoint/center triangle),
/// falling back to direct signed-distance interpolation in the degenerate
/// near-collinear case where the quadratic is singular.
fn intersect_segment_with_sphere(p0: Point, p1: Point, center: Point, radius: f64) -> Point {
    let d = p1 - p0;
    let len = d.length();
    if len < 1e-12 {
        return p0;
    }
    let dir = d / len;
    let to_center = p0 - center;
    let a = 1.0;
    let b = 2.0 * dir.dot(to_center);
    let c = to_center.length_squared() - radius * radius;
    for r in safe_quadratic_roots(a, b, c) {
        if r >= -1e-9 && r <= len + 1e-9 {
            return p0 + dir * r.clamp(0.0, len);
        }
    }
    let d0 = (p0 - center).length() - radius;
    let d1 = (p1 - center).length() - radius;
    let denom = (d0.abs() + d1.abs()).max(1e-12);
    p0 + d * (d0.abs() / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::remainder_area;
    use std::f64::consts::PI;

    #[test]
    fn isolated_ball_keeps_the_whole_cap() {
        let balls = vec![Ball::new(Point::new(0.0, 0.0, 0.0), 1.0)];
        let triangles = contact_remainder(&balls, &[], &[], 0, 0.5, 3);
        let area = remainder_area(&triangles);
        let expected = 4.0 * PI * 1.5 * 1.5;
        assert!((area - expected).abs() / expected < 0.02);
    }

    #[test]
    fn a_touching_neighbor_removes_a_cap() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(4.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1000.0, 0.0, 0.0), 0.01),
            Ball::new(Point::new(-1000.0, 0.0, 0.0), 0.01),
        ];
        let quad = Quadruple::new([0, 1, 2, 3]);
        let vertices = vec![(quad, Ball::new(Point::new(2.0, 0.0, 0.0), 0.1))];
        let full = contact_remainder(&balls, &[], &[], 0, 0.5, 3);
        let clipped = contact_remainder(&balls, &vertices, &[0], 0, 0.5, 3);
        assert!(remainder_area(&clipped) < remainder_area(&full));
    }
}
