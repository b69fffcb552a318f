//! Collision search (L2): specializations of the BSH's generic traversal.

use crate::bsh::{Bsh, LeafChecker, NodeChecker};
use crate::geometry::{distance, hides, intersects, touches, Ball};
use std::collections::HashSet;

struct OverlapNodeChecker<'a> {
    query: &'a Ball,
    epsilon: f64,
}

impl<'a> NodeChecker for OverlapNodeChecker<'a> {
    fn accept_node(&self, bounding: &Ball) -> bool {
        distance(self.query.center, bounding.center)
            <= self.query.radius + bounding.radius + self.epsilon
    }
}

struct CollectOverlapping<'a> {
    query: &'a Ball,
    epsilon: f64,
    stop_at_first: bool,
    ids: Vec<usize>,
}

impl<'a> LeafChecker for CollectOverlapping<'a> {
    fn consume_leaf(&mut self, id: usize, ball: &Ball) -> (bool, bool) {
        if intersects(self.query, ball, self.epsilon) {
            self.ids.push(id);
            (true, self.stop_at_first)
        } else {
            (false, false)
        }
    }
}

/// Every input ball whose bounding intersects `query` beyond `epsilon`.
pub fn all_overlapping(bsh: &Bsh, query: &Ball, epsilon: f64) -> Vec<usize> {
    let node_checker = OverlapNodeChecker { query, epsilon };
    let mut leaf_checker = CollectOverlapping {
        query,
        epsilon,
        stop_at_first: false,
        ids: Vec::new(),
    };
    bsh.search(&node_checker, &mut leaf_checker)
}

/// The first input ball overlapping `query` beyond `epsilon`, if any.
pub fn any_overlapping(bsh: &Bsh, query: &Ball, epsilon: f64) -> Option<usize> {
    let node_checker = OverlapNodeChecker { query, epsilon };
    let mut leaf_checker = CollectOverlapping {
        query,
        epsilon,
        stop_at_first: true,
        ids: Vec::new(),
    };
    bsh.search(&node_checker, &mut leaf_checker).into_iter().next()
}

struct TouchNodeChecker<'a> {
    query: &'a Ball,
    inflation: f64,
}

impl<'a> NodeChecker for TouchNodeChecker<'a> {
    fn accept_node(&self, bounding: &Ball) -> bool {
        distance(self.query.center, bounding.center)
            <= self.query.radius + bounding.radius + self.inflation
    }
}

struct CollectTouching<'a> {
    query: &'a Ball,
    epsilon: f64,
    ids: Vec<usize>,
}

impl<'a> LeafChecker for CollectTouching<'a> {
    fn consume_leaf(&mut self, id: usize, ball: &Ball) -> (bool, bool) {
        if touches(self.query, ball, self.epsilon) {
            self.ids.push(id);
        }
        (false, false)
    }
}

/// All input balls touching `query`'s surface within `epsilon` (used by the
/// triangulator's surplus/co-spherical pass, which inflates the query by
/// `3*epsilon` before calling this).
pub fn all_touching(bsh: &Bsh, query: &Ball, epsilon: f64) -> Vec<usize> {
    let node_checker = TouchNodeChecker {
        query,
        inflation: epsilon,
    };
    let mut leaf_checker = CollectTouching { query, epsilon, ids: Vec::new() };
    bsh.search(&node_checker, &mut leaf_checker)
}

/// Ball ids that are fully contained in some other input ball.
pub fn find_hidden_balls(balls: &[Ball]) -> HashSet<usize> {
    let mut hidden = HashSet::new();
    for (b_id, b) in balls.iter().enumerate() {
        for (a_id, a) in balls.iter().enumerate() {
            if a_id != b_id && hides(a, b) {
                hidden.insert(b_id);
                break;
            }
        }
    }
    hidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn all_overlapping_finds_intersecting_balls() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 0.0, 0.0), 1.0),
            Ball::new(Point::new(10.0, 0.0, 0.0), 1.0),
        ];
        let bsh = Bsh::build(&balls, 3.0);
        let query = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let hits = all_overlapping(&bsh, &query, 1e-6);
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn any_overlapping_stops_on_first_hit() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 0.0, 0.0), 1.0),
        ];
        let bsh = Bsh::build(&balls, 3.0);
        let query = Ball::new(Point::new(0.0, 0.0, 0.0), 1.0);
        assert_eq!(any_overlapping(&bsh, &query, 1e-6), Some(1));
    }

    #[test]
    fn hidden_balls_detects_concentric_containment() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(0.0, 0.0, 0.0), 2.0),
        ];
        let hidden = find_hidden_balls(&balls);
        assert!(hidden.contains(&0));
        assert!(!hidden.contains(&1));
    }

    #[test]
    fn no_hidden_balls_when_none_overlap() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(10.0, 0.0, 0.0), 1.0),
        ];
        assert!(find_hidden_balls(&balls).is_empty());
    }
}
