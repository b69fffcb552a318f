//! Bounding-Sphere Hierarchy (L1): a multilevel bucket structure over input
//! balls with a generic, predicate-driven depth-first search.

use crate::geometry::{distance, Ball};
use std::collections::HashMap;

/// Invoked on every bounding ball the search visits (including the level-0
/// bucket bounding balls); returning `false` prunes the whole subtree.
pub trait NodeChecker {
    fn accept_node(&self, bounding: &Ball) -> bool;
}

/// Invoked once per non-ignored leaf (input ball). Returns `(consumed,
/// stop)`: `consumed` records the leaf's id in the search result, `stop`
/// ends the search immediately.
pub trait LeafChecker {
    fn consume_leaf(&mut self, id: usize, ball: &Ball) -> (bool, bool);
}

struct Node {
    bounding: Ball,
    /// Level 0: raw ball indices. Level k>0: indices into `levels[k-1]`.
    children: Vec<usize>,
}

struct Level {
    nodes: Vec<Node>,
}

/// Hierarchical bounding-ball index over a borrowed ball slice.
pub struct Bsh<'a> {
    balls: &'a [Ball],
    levels: Vec<Level>,
    ignored: Vec<bool>,
}

type Cell = (i64, i64, i64);

fn cell_of(center: crate::geometry::Point, edge: f64) -> Cell {
    (
        (center.x / edge).floor() as i64,
        (center.y / edge).floor() as i64,
        (center.z / edge).floor() as i64,
    )
}

fn bounding_ball<'a>(members: impl Iterator<Item = &'a Ball>) -> Ball {
    let members: Vec<&Ball> = members.collect();
    let n = members.len() as f64;
    let centroid = members
        .iter()
        .fold(crate::geometry::Point::ZERO, |acc, b| acc + b.center)
        / n;
    let radius = members
        .iter()
        .map(|b| distance(centroid, b.center) + b.radius)
        .fold(0.0_f64, f64::max);
    Ball::new(centroid, radius)
}

impl<'a> Bsh<'a> {
    /// Builds the hierarchy. `r0` is the level-0 bucket edge length; higher
    /// levels double it (`R_k = r0 * 2^k`) until a level collapses to a
    /// single bucket.
    pub fn build(balls: &'a [Ball], r0: f64) -> Self {
        assert!(r0 > 0.0, "bsh_radius_r0 must be positive");
        let mut levels = Vec::new();

        // Level 0: bucket raw ball indices by grid cell.
        let mut buckets: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (id, ball) in balls.iter().enumerate() {
            buckets.entry(cell_of(ball.center, r0)).or_default().push(id);
        }
        let mut level0_nodes = Vec::new();
        for (_, members) in buckets {
            let bounding = bounding_ball(members.iter().map(|&i| &balls[i]));
            level0_nodes.push(Node {
                bounding,
                children: members,
            });
        }
        if level0_nodes.is_empty() {
            level0_nodes.push(Node {
                bounding: Ball::new(crate::geometry::Point::ZERO, 0.0),
                children: Vec::new(),
            });
        }
        levels.push(Level { nodes: level0_nodes });

        // Higher levels: bucket the previous level's bounding balls.
        let mut k = 1;
        loop {
            let prev_len = levels[k - 1].nodes.len();
            if prev_len <= 1 {
                break;
            }
            let edge = r0 * (1u64 << k) as f64;
            let mut buckets: HashMap<Cell, Vec<usize>> = HashMap::new();
            for (idx, node) in levels[k - 1].nodes.iter().enumerate() {
                buckets
                    .entry(cell_of(node.bounding.center, edge))
                    .or_default()
                    .push(idx);
            }
            let mut nodes = Vec::new();
            for (_, members) in buckets {
                let bounding =
                    bounding_ball(members.iter().map(|&i| &levels[k - 1].nodes[i].bounding));
                nodes.push(Node {
                    bounding,
                    children: members,
                });
            }
            let collapsed = nodes.len() <= 1;
            levels.push(Level { nodes });
            k += 1;
            if collapsed {
                break;
            }
        }

        log::debug!("bsh built: {} balls, {} levels (r0={})", balls.len(), levels.len(), r0);

        let ignored = vec![false; balls.len()];
        Self {
            balls,
            levels,
            ignored,
        }
    }

    /// Marks a leaf inert: it is skipped by every subsequent search.
    pub fn ignore(&mut self, id: usize) {
        if id < self.ignored.len() {
            self.ignored[id] = true;
        }
    }

    pub fn is_ignored(&self, id: usize) -> bool {
        self.ignored.get(id).copied().unwrap_or(true)
    }

    /// Runs a generic depth-first search, returning the ids the leaf
    /// checker consumed, in consumption order.
    pub fn search<N: NodeChecker, L: LeafChecker>(
        &self,
        node_checker: &N,
        leaf_checker: &mut L,
    ) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(top) = self.levels.last() {
            let top_level = self.levels.len() - 1;
            for idx in 0..top.nodes.len() {
                if self.visit(top_level, idx, node_checker, leaf_checker, &mut out) {
                    break;
                }
            }
        }
        out
    }

    fn visit<N: NodeChecker, L: LeafChecker>(
        &self,
        level: usize,
        node_idx: usize,
        node_checker: &N,
        leaf_checker: &mut L,
        out: &mut Vec<usize>,
    ) -> bool {
        let node = &self.levels[level].nodes[node_idx];
        if !node_checker.accept_node(&node.bounding) {
            return false;
        }
        if level == 0 {
            for &ball_id in &node.children {
                if self.is_ignored(ball_id) {
                    continue;
                }
                let (consumed, stop) = leaf_checker.consume_leaf(ball_id, &self.balls[ball_id]);
                if consumed {
                    out.push(ball_id);
                }
                if stop {
                    return true;
                }
            }
            false
        } else {
            for &child in &node.children {
                if self.visit(level - 1, child, node_checker, leaf_checker, out) {
                    return true;
                }
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    struct AcceptAll;
    impl NodeChecker for AcceptAll {
        fn accept_node(&self, _bounding: &Ball) -> bool {
            true
        }
    }

    struct CollectAll {
        found: Vec<usize>,
    }
    impl LeafChecker for CollectAll {
        fn consume_leaf(&mut self, id: usize, _ball: &Ball) -> (bool, bool) {
            self.found.push(id);
            (true, false)
        }
    }

    fn grid_balls(n: i64) -> Vec<Ball> {
        let mut v = Vec::new();
        for x in 0..n {
            for y in 0..n {
                v.push(Ball::new(Point::new(x as f64 * 5.0, y as f64 * 5.0, 0.0), 1.0));
            }
        }
        v
    }

    #[test]
    fn search_visits_every_ball_once() {
        let balls = grid_balls(4);
        let bsh = Bsh::build(&balls, 3.5);
        let mut leaf = CollectAll { found: Vec::new() };
        let found = bsh.search(&AcceptAll, &mut leaf);
        assert_eq!(found.len(), balls.len());
        let mut sorted = found.clone();
        sorted.sort();
        assert_eq!(sorted, (0..balls.len()).collect::<Vec<_>>());
    }

    #[test]
    fn ignored_leaves_are_skipped() {
        let balls = grid_balls(3);
        let mut bsh = Bsh::build(&balls, 3.5);
        bsh.ignore(0);
        let mut leaf = CollectAll { found: Vec::new() };
        let found = bsh.search(&AcceptAll, &mut leaf);
        assert!(!found.contains(&0));
        assert_eq!(found.len(), balls.len() - 1);
    }

    struct RejectAll;
    impl NodeChecker for RejectAll {
        fn accept_node(&self, _bounding: &Ball) -> bool {
            false
        }
    }

    #[test]
    fn rejecting_root_yields_nothing() {
        let balls = grid_balls(3);
        let bsh = Bsh::build(&balls, 3.5);
        let mut leaf = CollectAll { found: Vec::new() };
        let found = bsh.search(&RejectAll, &mut leaf);
        assert!(found.is_empty());
    }

    #[test]
    fn single_ball_builds_single_level() {
        let balls = vec![Ball::new(Point::new(0.0, 0.0, 0.0), 1.0)];
        let bsh = Bsh::build(&balls, 1.0);
        let mut leaf = CollectAll { found: Vec::new() };
        let found = bsh.search(&AcceptAll, &mut leaf);
        assert_eq!(found, vec![0]);
    }
}
