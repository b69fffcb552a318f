//! Text interchange and output validation, used by tests only — never by the
//! geometric core at runtime.

use crate::bsh::Bsh;
use crate::collision::all_overlapping;
use crate::error::{ApollotaError, Result};
use crate::geometry::{touches, Ball, Point, Quadruple};

/// Parses ball lines of the form `x y z r`, one per input line.
pub fn read_balls(text: &str) -> Vec<Ball> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let x: f64 = fields.next()?.parse().ok()?;
            let y: f64 = fields.next()?.parse().ok()?;
            let z: f64 = fields.next()?.parse().ok()?;
            let r: f64 = fields.next()?.parse().ok()?;
            Some(Ball::new(Point::new(x, y, z), r))
        })
        .collect()
}

/// Renders balls back to `x y z r` lines, 15 significant digits.
pub fn write_balls(balls: &[Ball]) -> String {
    balls
        .iter()
        .map(|b| {
            format!(
                "{:.15e} {:.15e} {:.15e} {:.15e}",
                b.center.x, b.center.y, b.center.z, b.radius
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses triangulation-vertex lines of the form `q0 q1 q2 q3 tx ty tz tr`.
pub fn read_vertices(text: &str) -> Vec<(Quadruple, Ball)> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let q0: usize = fields.next()?.parse().ok()?;
            let q1: usize = fields.next()?.parse().ok()?;
            let q2: usize = fields.next()?.parse().ok()?;
            let q3: usize = fields.next()?.parse().ok()?;
            let tx: f64 = fields.next()?.parse().ok()?;
            let ty: f64 = fields.next()?.parse().ok()?;
            let tz: f64 = fields.next()?.parse().ok()?;
            let tr: f64 = fields.next()?.parse().ok()?;
            Some((
                Quadruple::new([q0, q1, q2, q3]),
                Ball::new(Point::new(tx, ty, tz), tr),
            ))
        })
        .collect()
}

/// Renders triangulation vertices back to `q0 q1 q2 q3 tx ty tz tr` lines.
pub fn write_vertices(vertices: &[(Quadruple, Ball)]) -> String {
    vertices
        .iter()
        .map(|(quad, sphere)| {
            let ids = quad.as_slice();
            format!(
                "{} {} {} {} {:.15e} {:.15e} {:.15e} {:.15e}",
                ids[0], ids[1], ids[2], ids[3], sphere.center.x, sphere.center.y, sphere.center.z, sphere.radius
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks the touching and emptiness invariants (Testable Properties 1 and
/// 2) for every produced vertex against the full input ball set.
pub fn check_quadruples(balls: &[Ball], vertices: &[(Quadruple, Ball)], epsilon: f64) -> Result<()> {
    let bsh = Bsh::build(balls, 3.5);
    for (quad, sphere) in vertices {
        for &id in quad.as_slice() {
            if id >= balls.len() {
                return Err(ApollotaError::InvariantViolation(format!(
                    "quadruple references out-of-range ball id {}",
                    id
                )));
            }
            if !touches(sphere, &balls[id], epsilon) {
                return Err(ApollotaError::InvariantViolation(format!(
                    "tangent sphere for quadruple {:?} does not touch ball {}",
                    quad.as_slice(),
                    id
                )));
            }
        }
        let overlapping: Vec<usize> = all_overlapping(&bsh, sphere, epsilon)
            .into_iter()
            .filter(|id| !quad.contains(*id))
            .collect();
        if !overlapping.is_empty() {
            return Err(ApollotaError::InvariantViolation(format!(
                "tangent sphere for quadruple {:?} overlaps ball(s) {:?}",
                quad.as_slice(),
                overlapping
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_text_round_trips() {
        let balls = vec![Ball::new(Point::new(1.0, 2.0, 3.0), 0.5)];
        let text = write_balls(&balls);
        let parsed = read_balls(&text);
        assert_eq!(parsed.len(), 1);
        assert!((parsed[0].center.x - 1.0).abs() < 1e-12);
        assert!((parsed[0].radius - 0.5).abs() < 1e-12);
    }

    #[test]
    fn vertex_text_round_trips() {
        let vertices = vec![(
            Quadruple::new([0, 1, 2, 3]),
            Ball::new(Point::new(1.0, 1.0, 1.0), 2.0),
        )];
        let text = write_vertices(&vertices);
        let parsed = read_vertices(&text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(*parsed[0].0.as_slice(), [0, 1, 2, 3]);
    }

    #[test]
    fn check_quadruples_accepts_a_valid_tangent_sphere() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 6.75f64.sqrt(), 0.0), 1.0),
            Ball::new(
                Point::new(1.5, 6.75f64.sqrt() / 3.0, (9.0 - 12.0 / 3.0f64).sqrt()),
                1.0,
            ),
        ];
        let tangent = crate::geometry::tangent_sphere_of_four_balls(
            &[balls[0], balls[1], balls[2], balls[3]],
            1e-6,
        );
        assert_eq!(tangent.len(), 1);
        let vertices = vec![(Quadruple::new([0, 1, 2, 3]), tangent[0])];
        assert!(check_quadruples(&balls, &vertices, 1e-4).is_ok());
    }

    #[test]
    fn check_quadruples_rejects_an_overlapping_sphere() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 3.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 1.0, 0.0), 1.0),
        ];
        let vertices = vec![(
            Quadruple::new([0, 1, 2, 3]),
            Ball::new(Point::new(0.0, 0.0, 0.0), 0.01),
        )];
        assert!(check_quadruples(&balls, &vertices, 1e-6).is_err());
    }
}
