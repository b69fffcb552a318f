//! Tangent-sphere and tangent-plane root-finding.
//!
//! These are the numeric primitives the triangulator depends on. All three
//! share the same derivation shape: pairwise-subtracting the sphere/plane
//! equations removes the quadratic cross term and leaves the unknown center
//! as an affine function of one remaining scalar, which is then pinned down
//! by a single quadratic equation solved with a numerically safe root
//! formula.

use super::ball::Ball;
use super::point::Point;
use super::rotation::{rotate_backward, rotate_forward, MAX_ROTATION_STEPS};
use glam::DMat3;

/// Solves `a*x^2 + b*x + c = 0` with the cancellation-safe substitution
/// `q = -(b + sign(b)*sqrt(b^2-4ac))/2`, `x1 = q/a`, `x2 = c/q`.
///
/// A discriminant that is slightly negative due to roundoff is treated as
/// zero (a repeated root); a more negative discriminant means no real root.
pub fn safe_quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    const DISCRIMINANT_EPSILON: f64 = 1e-9;
    if a.abs() < 1e-12 {
        // Degenerate to a linear equation b*x + c = 0.
        return if b.abs() < 1e-12 {
            Vec::new()
        } else {
            vec![-c / b]
        };
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -DISCRIMINANT_EPSILON {
        return Vec::new();
    }
    let discriminant = discriminant.max(0.0);
    let sign_b = if b < 0.0 { -1.0 } else { 1.0 };
    let q = -(b + sign_b * discriminant.sqrt()) / 2.0;
    if q.abs() < 1e-12 {
        // Both roots coincide at zero through the c/q branch; fall back to
        // the direct formula for the a branch only.
        return vec![-b / (2.0 * a)];
    }
    let mut roots = vec![q / a, c / q];
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap());
    roots
}

/// Finds every sphere externally tangent to all four balls.
///
/// Returns 0, 1, or 2 candidate spheres that pass the four-touch check
/// within `epsilon`. Centers are internally re-centered around the
/// smallest-radius ball before linearization for numeric conditioning, and
/// translated back afterwards; if the lifted linear system is singular the
/// whole input frame is rotated about a fixed axis and retried.
pub fn tangent_sphere_of_four_balls(balls: &[Ball; 4], epsilon: f64) -> Vec<Ball> {
    // Move the smallest-radius ball into slot 0: this is the stability trick
    // noted in the design notes and must stay bit-for-bit compatible with
    // the rotation-retry loop, which depends on the same ordering.
    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&i, &j| balls[i].radius.partial_cmp(&balls[j].radius).unwrap());
    let ordered: [Ball; 4] = [
        balls[order[0]],
        balls[order[1]],
        balls[order[2]],
        balls[order[3]],
    ];

    for step in 0..MAX_ROTATION_STEPS {
        if let Some(candidates) = try_tangent_sphere_of_four_balls(&ordered, step) {
            let valid: Vec<Ball> = candidates
                .into_iter()
                .filter(|t| balls.iter().all(|b| super::ball::touches(t, b, epsilon)))
                .collect();
            if !valid.is_empty() {
                return dedup_spheres(valid, epsilon);
            }
        }
    }
    Vec::new()
}

fn try_tangent_sphere_of_four_balls(balls: &[Ball; 4], step: u32) -> Option<Vec<Ball>> {
    let origin = balls[0].center;
    let centers: Vec<Point> = balls
        .iter()
        .map(|b| rotate_forward(b.center - origin, step))
        .collect();
    let radii: Vec<f64> = balls.iter().map(|b| b.radius).collect();

    // Build the 3x3 linear system from subtracting sphere-0's equation from
    // spheres 1, 2, 3: rows of `mat` are 2*(C_i - C_0), and `lin`/`cst` give
    // the R-dependence of the right-hand side: rhs_i = cst_i - R*lin_i.
    let mut mat_rows = [Point::ZERO; 3];
    let mut cst = [0.0; 3];
    let mut lin = [0.0; 3];
    for i in 1..4 {
        mat_rows[i - 1] = 2.0 * centers[i];
        cst[i - 1] = centers[i].length_squared() - radii[i] * radii[i] + radii[0] * radii[0];
        lin[i - 1] = 2.0 * (radii[i] - radii[0]);
    }
    let mat = DMat3::from_cols(
        Point::new(mat_rows[0].x, mat_rows[1].x, mat_rows[2].x),
        Point::new(mat_rows[0].y, mat_rows[1].y, mat_rows[2].y),
        Point::new(mat_rows[0].z, mat_rows[1].z, mat_rows[2].z),
    );
    let det = mat.determinant();
    if det.abs() < 1e-9 {
        return None;
    }
    let inv = mat.inverse();
    // X(R) = x0 + R * v
    let x0 = inv * Point::new(cst[0], cst[1], cst[2]);
    let v = inv * Point::new(-lin[0], -lin[1], -lin[2]);

    let d = x0; // x0 - centers[0], but centers[0] is the origin here.
    let a = v.length_squared() - 1.0;
    let b = 2.0 * (d.dot(v) - radii[0]);
    let c = d.length_squared() - radii[0] * radii[0];

    let roots = safe_quadratic_roots(a, b, c);
    let mut out = Vec::new();
    for r in roots {
        if r < -1e-9 {
            continue;
        }
        let r = r.max(0.0);
        let center_local = x0 + v * r;
        let center_world = rotate_backward(center_local, step) + origin;
        out.push(Ball::new(center_world, r));
    }
    Some(out)
}

fn dedup_spheres(mut spheres: Vec<Ball>, epsilon: f64) -> Vec<Ball> {
    let mut result: Vec<Ball> = Vec::new();
    spheres.sort_by(|a, b| a.radius.partial_cmp(&b.radius).unwrap());
    for s in spheres.drain(..) {
        if !result.iter().any(|r| super::ball::equal_balls(r, &s, epsilon)) {
            result.push(s);
        }
    }
    result.truncate(2);
    result
}

/// In-plane affine frame for a triple of ball centers, shared by the
/// fixed-radius and minimal tangent-sphere-of-three routines.
struct TripleFrame {
    origin: Point,
    ex: Point, // unit vector from a towards b
    ey: Point, // unit vector completing the plane's orthonormal basis
    d: f64,    // distance from a to b
    bx: f64,   // b's coordinate along ex (equals d)
    cx: f64,
    cy: f64,
}

fn triple_frame(a: &Ball, b: &Ball, c: &Ball) -> Option<TripleFrame> {
    let origin = a.center;
    let ab = b.center - origin;
    let d = ab.length();
    if d < 1e-12 {
        return None;
    }
    let ex = ab / d;
    let ac = c.center - origin;
    let proj = ac.dot(ex);
    let perp = ac - ex * proj;
    let perp_len = perp.length();
    if perp_len < 1e-12 {
        return None; // collinear centers: no tangent plane/minimal sphere.
    }
    let ey = perp / perp_len;
    Some(TripleFrame {
        origin,
        ex,
        ey,
        d,
        bx: d,
        cx: proj,
        cy: perp_len,
    })
}

/// Finds every sphere of radius `p` externally tangent to three balls.
pub fn tangent_spheres_of_three_balls_with_radius(
    a: &Ball,
    b: &Ball,
    c: &Ball,
    p: f64,
    epsilon: f64,
) -> Vec<Ball> {
    let frame = match triple_frame(a, b, c) {
        Some(f) => f,
        None => return Vec::new(),
    };
    let ra = a.radius + p;
    let rb = b.radius + p;
    let rc = c.radius + p;

    let u = (frame.d * frame.d + ra * ra - rb * rb) / (2.0 * frame.d);
    let v = (frame.cx * frame.cx + frame.cy * frame.cy + ra * ra - rc * rc
        - 2.0 * frame.cx * u)
        / (2.0 * frame.cy);
    let w2 = ra * ra - u * u - v * v;

    let mut out = Vec::new();
    if w2 < -epsilon {
        return out;
    }
    let w2 = w2.max(0.0);
    let ws: Vec<f64> = if w2 < epsilon {
        vec![0.0]
    } else {
        let w = w2.sqrt();
        vec![w, -w]
    };
    for w in ws {
        let center = frame.origin + frame.ex * u + frame.ey * v + frame.ex.cross(frame.ey) * w;
        let candidate = Ball::new(center, p);
        if [a, b, c]
            .iter()
            .all(|ball| super::ball::touches(&candidate, ball, epsilon))
        {
            out.push(candidate);
        }
    }
    out
}

/// Finds the single smallest-radius sphere externally tangent to three
/// balls, with no prescribed radius. Used as the Face middle-region
/// heuristic (§4.4) and as the disk construction for initial contours.
pub fn minimal_tangent_sphere_of_three_balls(a: &Ball, b: &Ball, c: &Ball) -> Option<Ball> {
    let frame = triple_frame(a, b, c)?;
    let ra = a.radius;
    let rb = b.radius;
    let rc = c.radius;

    // u(r) = u0 + r*u1, v(r) = v0 + r*v1 (affine in the unknown radius r).
    let u1 = (ra - rb) / frame.d;
    let u0 = (frame.d * frame.d + ra * ra - rb * rb) / (2.0 * frame.d);

    let v1 = ((ra - rc) - frame.cx * u1) / frame.cy;
    let v0 = (frame.cx * frame.cx + frame.cy * frame.cy + ra * ra - rc * rc - 2.0 * frame.cx * u0)
        / (2.0 * frame.cy);

    let qa = u1 * u1 + v1 * v1 - 1.0;
    let qb = 2.0 * (u0 * u1 + v0 * v1 - ra);
    let qc = u0 * u0 + v0 * v0 - ra * ra;

    let mut best: Option<f64> = None;
    for r in safe_quadratic_roots(qa, qb, qc) {
        if r < -1e-9 {
            continue;
        }
        let r = r.max(0.0);
        if best.map_or(true, |b| r < b) {
            best = Some(r);
        }
    }
    let r = best?;
    let u = u0 + r * u1;
    let v = v0 + r * v1;
    let center = frame.origin + frame.ex * u + frame.ey * v;
    Some(Ball::new(center, r))
}

/// Finds the (up to two) planes tangent to three balls, as a `(point on
/// plane, outward unit normal)` pair. Returns an empty vector if the three
/// centers are collinear (no common tangent plane).
pub fn tangent_planes_of_three_balls(a: &Ball, b: &Ball, c: &Ball) -> Vec<(Point, Point)> {
    let ab = b.center - a.center;
    let ac = c.center - a.center;
    let axis = ab.cross(ac);
    let axis_len = axis.length();
    if axis_len < 1e-12 {
        return Vec::new();
    }
    let axis_unit = axis / axis_len;
    let rb = b.radius - a.radius;
    let rc = c.radius - a.radius;

    let mat = DMat3::from_cols(
        Point::new(ab.x, ac.x, axis_unit.x),
        Point::new(ab.y, ac.y, axis_unit.y),
        Point::new(ab.z, ac.z, axis_unit.z),
    )
    .transpose();
    let det = mat.determinant();
    if det.abs() < 1e-12 {
        return Vec::new();
    }
    let n_particular = mat.inverse() * Point::new(rb, rc, 0.0);

    let qa = 1.0;
    let qb = 2.0 * n_particular.dot(axis_unit);
    let qc = n_particular.length_squared() - 1.0;

    let mut out = Vec::new();
    for t in safe_quadratic_roots(qa, qb, qc) {
        let n = n_particular + axis_unit * t;
        let d = n.dot(a.center) - a.radius;
        let point_on_plane = n * d;
        // Outward here means "away from the balls": the balls sit on the
        // +n side of the plane since center = point_on_plane + radius*n.
        out.push((point_on_plane, -n));
    }
    out
}

/// Signed distance of a point from a plane given as `(point_on_plane,
/// outward_normal)`; positive means on the side the outward normal points
/// towards.
pub fn halfspace(plane: &(Point, Point), p: Point) -> f64 {
    (p - plane.0).dot(plane.1)
}
