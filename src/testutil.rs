//! Seeded random ball fixtures for tests, `cfg(test)` only.
//!
//! Kept deterministic across runs the same way the teacher's fibonacci-sphere
//! sampler was: a `ChaCha8Rng` seeded from a fixed `u64`, never the thread
//! RNG.

use crate::geometry::{distance, Ball, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generates `count` non-overlapping balls of radius `radius` inside a cube
/// of side `cube_side` centered at the origin, retrying placements that
/// would overlap an already-placed ball.
pub fn random_non_overlapping_balls(seed: u64, count: usize, radius: f64, cube_side: f64) -> Vec<Ball> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half = cube_side / 2.0;
    let mut balls: Vec<Ball> = Vec::with_capacity(count);
    let max_attempts_per_ball = 10_000;

    while balls.len() < count {
        let mut placed = false;
        for _ in 0..max_attempts_per_ball {
            let center = Point::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            );
            let candidate = Ball::new(center, radius);
            if balls
                .iter()
                .all(|b: &Ball| distance(b.center, candidate.center) >= b.radius + candidate.radius)
            {
                balls.push(candidate);
                placed = true;
                break;
            }
        }
        if !placed {
            break; // the cube is too crowded to fit another ball; stop short.
        }
    }
    balls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_identical_fixtures() {
        let a = random_non_overlapping_balls(42, 16, 1.0, 10.0);
        let b = random_non_overlapping_balls(42, 16, 1.0, 10.0);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.center, y.center);
            assert_eq!(x.radius, y.radius);
        }
    }

    #[test]
    fn generated_balls_do_not_overlap() {
        let balls = random_non_overlapping_balls(7, 32, 1.0, 10.0);
        for i in 0..balls.len() {
            for j in (i + 1)..balls.len() {
                assert!(distance(balls[i].center, balls[j].center) >= balls[i].radius + balls[j].radius - 1e-9);
            }
        }
    }
}
