//! Balls and the small ordered-index tuples used to identify Voronoi facets.

use super::point::{distance, Point};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An input ball: a center and a non-negative radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub center: Point,
    pub radius: f64,
}

impl Ball {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns this ball inflated by `amount` (used for probe-expanded spheres).
    pub fn inflated(&self, amount: f64) -> Ball {
        Ball::new(self.center, self.radius + amount)
    }

    /// Additively-weighted ("power") distance from a point to this ball's surface.
    pub fn weighted_distance_to_point(&self, p: Point) -> f64 {
        distance(self.center, p) - self.radius
    }
}

/// `true` iff sphere `t` touches ball `b` within `epsilon` (the Touching
/// invariant used throughout the triangulator and by Testable Property 1).
pub fn touches(t: &Ball, b: &Ball, epsilon: f64) -> bool {
    (distance(t.center, b.center) - (t.radius + b.radius)).abs() <= epsilon
}

/// `true` iff sphere `t` overlaps ball `b` by more than `epsilon` (the
/// Emptiness invariant check used by Testable Property 2 and by collision
/// search).
pub fn intersects(t: &Ball, b: &Ball, epsilon: f64) -> bool {
    distance(t.center, b.center) - (t.radius + b.radius) < -epsilon
}

/// `true` iff two balls are numerically identical within `epsilon`.
pub fn equal_balls(a: &Ball, b: &Ball, epsilon: f64) -> bool {
    distance(a.center, b.center) <= epsilon && (a.radius - b.radius).abs() <= epsilon
}

/// `true` iff ball `b` is fully contained in ball `a` (`a` hides `b`).
pub fn hides(a: &Ball, b: &Ball) -> bool {
    distance(a.center, b.center) + b.radius <= a.radius
}

macro_rules! ordered_tuple {
    ($name:ident, $n:expr) => {
        /// Ascending, non-repeating tuple of ball indices.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([usize; $n]);

        impl $name {
            /// Builds a tuple from the given indices, sorting them ascending.
            ///
            /// Panics if any two indices are equal: a well-formed call site
            /// never passes a repeated ball index.
            pub fn new(mut ids: [usize; $n]) -> Self {
                ids.sort_unstable();
                for w in ids.windows(2) {
                    assert!(w[0] != w[1], "repeated index in {}", stringify!($name));
                }
                Self(ids)
            }

            pub fn get(&self, i: usize) -> usize {
                self.0[i]
            }

            pub fn as_slice(&self) -> &[usize; $n] {
                &self.0
            }

            pub fn contains(&self, id: usize) -> bool {
                self.0.contains(&id)
            }
        }
    };
}

ordered_tuple!(Pair, 2);
ordered_tuple!(Triple, 3);
ordered_tuple!(Quadruple, 4);

impl Quadruple {
    /// The triple formed by excluding the `k`-th member (0-indexed into the
    /// ascending tuple).
    pub fn exclude(&self, k: usize) -> Triple {
        let mut out = [0usize; 3];
        let mut j = 0;
        for (i, &id) in self.0.iter().enumerate() {
            if i != k {
                out[j] = id;
                j += 1;
            }
        }
        Triple::new(out)
    }

    /// Index (0..4) of `id` within this quadruple, if present.
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.0.iter().position(|&x| x == id)
    }
}

impl Triple {
    /// The pair formed by excluding the `k`-th member.
    pub fn exclude(&self, k: usize) -> Pair {
        let mut out = [0usize; 2];
        let mut j = 0;
        for (i, &id) in self.0.iter().enumerate() {
            if i != k {
                out[j] = id;
                j += 1;
            }
        }
        Pair::new(out)
    }

    /// Combine this triple with a fourth index into an ascending quadruple.
    pub fn with(&self, id: usize) -> Quadruple {
        Quadruple::new([self.0[0], self.0[1], self.0[2], id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_checks_within_epsilon() {
        let a = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = Ball::new(Point::new(2.0, 0.0, 0.0), 1.0);
        assert!(touches(&a, &b, 1e-6));
    }

    #[test]
    fn hides_detects_concentric_containment() {
        let outer = Ball::new(Point::new(0.0, 0.0, 0.0), 2.0);
        let inner = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        assert!(hides(&outer, &inner));
        assert!(!hides(&inner, &outer));
    }

    #[test]
    fn quadruple_sorts_and_excludes() {
        let q = Quadruple::new([3, 1, 0, 2]);
        assert_eq!(*q.as_slice(), [0, 1, 2, 3]);
        assert_eq!(q.exclude(0), Triple::new([1, 2, 3]));
        assert_eq!(q.index_of(2), Some(2));
        assert_eq!(q.index_of(9), None);
    }

    #[test]
    fn triple_excludes_and_extends() {
        let t = Triple::new([1, 2, 3]);
        assert_eq!(t.exclude(1), Pair::new([1, 3]));
        assert_eq!(t.with(4), Quadruple::new([1, 2, 3, 4]));
    }

    #[test]
    #[should_panic]
    fn quadruple_rejects_repeats() {
        Quadruple::new([1, 1, 2, 3]);
    }
}
