//! Geometric primitives (L0): points, balls, tangent roots, tangent planes,
//! and hyperboloid projection.

mod ball;
mod hyperboloid;
mod point;
mod rotation;
mod tangent;

pub use ball::{equal_balls, hides, intersects, touches, Ball, Pair, Quadruple, Triple};
pub use hyperboloid::{hyperboloid_value, intersect_segment_with_hyperboloid, project_onto_hyperboloid};
pub use point::{distance, midpoint, unit_vector, Point};
pub use tangent::{
    halfspace, minimal_tangent_sphere_of_three_balls, safe_quadratic_roots,
    tangent_planes_of_three_balls, tangent_sphere_of_four_balls,
    tangent_spheres_of_three_balls_with_radius,
};
