//! A subdivided icosahedron, used as the starting mesh for a ball's solvent
//! cap (L4b). Not part of the public geometric surface; consumed only by
//! [`crate::remainder`].

use crate::geometry::Point;

const PHI: f64 = 1.618_033_988_749_895; // (1 + sqrt(5)) / 2

/// A triangle mesh on (or fit to) a sphere.
#[derive(Debug, Clone)]
pub struct SubdividedIcosahedron {
    vertices: Vec<Point>,
    triples: Vec<[usize; 3]>,
}

impl SubdividedIcosahedron {
    /// Builds the unit icosahedron and subdivides it `depth` times.
    pub fn new(depth: usize) -> Self {
        let mut mesh = unit_icosahedron();
        for _ in 0..depth {
            mesh = mesh.subdivide_once();
        }
        mesh
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn triples(&self) -> &[[usize; 3]] {
        &self.triples
    }

    /// Splits every triangle into four by bisecting its edges and
    /// re-normalizing the new midpoints onto the unit sphere.
    fn subdivide_once(&self) -> Self {
        let mut vertices = self.vertices.clone();
        let mut midpoint_cache: std::collections::HashMap<(usize, usize), usize> =
            std::collections::HashMap::new();
        let mut midpoint_of = |a: usize, b: usize, vertices: &mut Vec<Point>| -> usize {
            let key = if a < b { (a, b) } else { (b, a) };
            if let Some(&id) = midpoint_cache.get(&key) {
                return id;
            }
            let m = ((vertices[a] + vertices[b]) * 0.5).normalize();
            let id = vertices.len();
            vertices.push(m);
            midpoint_cache.insert(key, id);
            id
        };

        let mut triples = Vec::with_capacity(self.triples.len() * 4);
        for &[i0, i1, i2] in &self.triples {
            let m01 = midpoint_of(i0, i1, &mut vertices);
            let m12 = midpoint_of(i1, i2, &mut vertices);
            let m20 = midpoint_of(i2, i0, &mut vertices);
            triples.push([i0, m01, m20]);
            triples.push([i1, m12, m01]);
            triples.push([i2, m20, m12]);
            triples.push([m01, m12, m20]);
        }
        SubdividedIcosahedron { vertices, triples }
    }

    /// Translates and scales every vertex from the unit sphere onto the
    /// sphere `(center, radius)`. Does not re-subdivide.
    pub fn fit_into_sphere(&self, center: Point, radius: f64) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|&v| center + v * radius)
            .collect();
        SubdividedIcosahedron {
            vertices,
            triples: self.triples.clone(),
        }
    }
}

fn unit_icosahedron() -> SubdividedIcosahedron {
    let raw = [
        (-1.0, PHI, 0.0),
        (1.0, PHI, 0.0),
        (-1.0, -PHI, 0.0),
        (1.0, -PHI, 0.0),
        (0.0, -1.0, PHI),
        (0.0, 1.0, PHI),
        (0.0, -1.0, -PHI),
        (0.0, 1.0, -PHI),
        (PHI, 0.0, -1.0),
        (PHI, 0.0, 1.0),
        (-PHI, 0.0, -1.0),
        (-PHI, 0.0, 1.0),
    ];
    let vertices: Vec<Point> = raw
        .iter()
        .map(|&(x, y, z)| Point::new(x, y, z).normalize())
        .collect();

    let triples = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    SubdividedIcosahedron { vertices, triples }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_icosahedron_has_twelve_vertices_on_unit_sphere() {
        let mesh = SubdividedIcosahedron::new(0);
        assert_eq!(mesh.vertices().len(), 12);
        assert_eq!(mesh.triples().len(), 20);
        for v in mesh.vertices() {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn subdivision_quadruples_faces_and_stays_on_unit_sphere() {
        let mesh = SubdividedIcosahedron::new(2);
        assert_eq!(mesh.triples().len(), 20 * 4 * 4);
        for v in mesh.vertices() {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fit_into_sphere_translates_and_scales_without_resubdividing() {
        let mesh = SubdividedIcosahedron::new(1);
        let triple_count = mesh.triples().len();
        let fitted = mesh.fit_into_sphere(Point::new(2.0, 0.0, 0.0), 3.0);
        assert_eq!(fitted.triples().len(), triple_count);
        for v in fitted.vertices() {
            assert!((crate::geometry::distance(*v, Point::new(2.0, 0.0, 0.0)) - 3.0).abs() < 1e-9);
        }
    }
}
