//! The Apollonius triangulator (L3): face-growing enumeration of every
//! empty tangent sphere of a quadruple of balls.

mod face;

use crate::bsh::Bsh;
use crate::collision::{all_touching, find_hidden_balls};
use crate::config::TriangulationConfig;
use crate::error::{ApollotaError, Result};
use crate::geometry::{distance, touches, Ball, Quadruple, Triple};
use face::Face;
use std::collections::{HashMap, HashSet};

/// The full output of [`triangulate`].
pub struct Triangulation {
    vertices: Vec<(Quadruple, Ball)>,
    graph: Vec<[Option<usize>; 4]>,
    hidden_ids: HashSet<usize>,
    ignored_ids: HashSet<usize>,
    stats: TriangulationStats,
}

/// Run diagnostics, informational only (never part of the correctness
/// invariants in §8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangulationStats {
    pub faces_processed: usize,
    pub prefaces_pushed: usize,
    pub restarts: usize,
    pub surplus_quadruples_added: usize,
}

impl Triangulation {
    pub fn vertices(&self) -> &[(Quadruple, Ball)] {
        &self.vertices
    }

    /// Four neighbor vertex ids for vertex `i`, one per excluded ball,
    /// `None` marking the outer (unbounded) face.
    pub fn neighbors(&self, vertex_id: usize) -> [Option<usize>; 4] {
        self.graph[vertex_id]
    }

    pub fn hidden_ids(&self) -> &HashSet<usize> {
        &self.hidden_ids
    }

    pub fn ignored_ids(&self) -> &HashSet<usize> {
        &self.ignored_ids
    }

    pub fn stats(&self) -> TriangulationStats {
        self.stats
    }
}

/// Flattens the triangulation's quadruples map into `[(Quadruple,
/// TangentSphere), ...]`; index into the returned slice is the canonical
/// vertex id.
pub fn vertices_vector(triangulation: &Triangulation) -> &[(Quadruple, Ball)] {
    triangulation.vertices()
}

/// Computes the additively-weighted Voronoi diagram of `balls`.
pub fn triangulate(balls: &[Ball], config: &TriangulationConfig) -> Result<Triangulation> {
    log::debug!(
        "triangulating {} balls (bsh_radius_r0={}, epsilon={})",
        balls.len(),
        config.bsh_radius_r0,
        config.epsilon
    );
    let epsilon = config.epsilon;
    let hidden_ids = find_hidden_balls(balls);
    if !hidden_ids.is_empty() {
        log::debug!("{} ball(s) hidden inside a larger ball", hidden_ids.len());
    }
    let mut bsh = Bsh::build(balls, config.bsh_radius_r0);
    for &id in &hidden_ids {
        bsh.ignore(id);
    }

    let mut quadruples: HashMap<Quadruple, Vec<Ball>> = HashMap::new();
    let mut used: HashSet<usize> = HashSet::new();
    let mut processed: HashSet<Triple> = HashSet::new();
    let mut stack: Vec<Triple> = Vec::new();
    let mut stats = TriangulationStats::default();

    let candidates: Vec<usize> = (0..balls.len()).filter(|id| !hidden_ids.contains(id)).collect();

    let seed = find_seed_triple_anywhere(balls, &candidates, &bsh, epsilon);
    match seed {
        Some(triple) => {
            stack.push(triple);
            processed.insert(triple);
        }
        None => {
            // Fewer than 4 usable balls can never admit a tangent sphere
            // (Scenario C: three collinear balls have no tangent plane at
            // all); that is a legitimate empty result, not a failure. With
            // 4 or more candidates and still no seed across every anchor
            // tried, something is structurally wrong with the input.
            if candidates.len() >= 4 {
                log::warn!(
                    "could not seed a triangulation from any of {} candidate anchors",
                    candidates.len()
                );
                return Err(ApollotaError::UnseedableTriangulation { anchor: candidates[0] });
            }
            log::debug!("{} candidate(s) too few to ever admit a tangent sphere", candidates.len());
            let ignored_ids = candidates.into_iter().collect();
            return Ok(Triangulation {
                vertices: Vec::new(),
                graph: Vec::new(),
                hidden_ids,
                ignored_ids,
                stats,
            });
        }
    }

    run_face_growing(
        balls,
        &bsh,
        epsilon,
        &mut quadruples,
        &mut used,
        &mut processed,
        &mut stack,
        &mut stats,
    );

    // Restart from any ball never recorded in a quadruple, to cover
    // disconnected components; bounded by max_traversal_radius attempts.
    let mut restart_attempts = 0;
    loop {
        if restart_attempts >= config.max_traversal_radius {
            break;
        }
        let orphan = candidates
            .iter()
            .copied()
            .find(|id| !used.contains(id) && !processed.iter().any(|t| t.contains(*id)));
        let orphan = match orphan {
            Some(o) => o,
            None => break,
        };
        restart_attempts += 1;
        log::trace!("restarting traversal from orphan ball {} (attempt {})", orphan, restart_attempts);
        let others: Vec<usize> = candidates.iter().copied().filter(|&id| id != orphan).collect();
        let seed = find_seed_triple_from_anchor(balls, orphan, &others, &bsh, epsilon);
        match seed {
            Some(triple) => {
                if processed.insert(triple) {
                    stack.push(triple);
                    stats.restarts += 1;
                    run_face_growing(
                        balls,
                        &bsh,
                        epsilon,
                        &mut quadruples,
                        &mut used,
                        &mut processed,
                        &mut stack,
                        &mut stats,
                    );
                }
            }
            None => {
                // This ball genuinely participates in no quadruple (e.g.
                // three collinear balls, Scenario C); not an error.
                continue;
            }
        }
    }

    if config.include_surplus {
        run_surplus_pass(balls, &bsh, epsilon, &mut quadruples, &mut stats);
        log::debug!("surplus pass added {} extra quadruple(s)", stats.surplus_quadruples_added);
    }

    let ignored_ids: HashSet<usize> = candidates
        .iter()
        .copied()
        .filter(|id| !used.contains(id))
        .collect();

    let (vertices, graph) = build_vertices_and_graph(quadruples);
    log::debug!(
        "triangulation done: {} vertices, {} faces processed, {} restarts, {} ignored",
        vertices.len(),
        stats.faces_processed,
        stats.restarts,
        ignored_ids.len()
    );

    Ok(Triangulation {
        vertices,
        graph,
        hidden_ids,
        ignored_ids,
        stats,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_face_growing(
    balls: &[Ball],
    bsh: &Bsh,
    epsilon: f64,
    quadruples: &mut HashMap<Quadruple, Vec<Ball>>,
    used: &mut HashSet<usize>,
    processed: &mut HashSet<Triple>,
    stack: &mut Vec<Triple>,
    stats: &mut TriangulationStats,
) {
    while let Some(triple) = stack.pop() {
        stats.faces_processed += 1;
        let mut face = Face::new(triple, balls);
        // A collinear triple has no tangent planes at all ("cannot-have-d"),
        // but it can still carry a valid `e`, so it is not skipped outright —
        // `find_best_d` is simply a no-op on it (`Face::candidate_for_d`
        // rejects every candidate once `sides` is `None`).
        if !face.can_have_d() {
            log::trace!("face {:?} has no tangent planes, trying e only", triple.as_slice());
        }

        for k in 0..2 {
            if let Some((d_id, sphere)) = find_best_d(&face, k, balls, bsh, epsilon) {
                face.set_d(k, (d_id, sphere));
                emit_quadruple(
                    triple, d_id, sphere, balls, quadruples, used, processed, stack, stats,
                );
            }
        }

        // The `e` search runs independently of `d0`/`d1`: it covers a region
        // of the face the `d` search does not, so a face with a valid `d` can
        // still have a distinct valid `e`.
        if face.can_have_e() {
            if let Some((e_id, sphere)) = find_best_e(&face, balls, bsh, epsilon) {
                emit_quadruple(
                    triple, e_id, sphere, balls, quadruples, used, processed, stack, stats,
                );
            }
        }
    }
}

fn find_best_d(face: &Face, k: usize, balls: &[Ball], bsh: &Bsh, epsilon: f64) -> Option<(usize, Ball)> {
    let mut best: Option<(usize, Ball)> = None;
    for d_id in 0..balls.len() {
        if bsh.is_ignored(d_id) {
            continue;
        }
        if let Some(candidate) = face.candidate_for_d(d_id, k, balls, bsh, epsilon) {
            best = Some(match best {
                Some(current) if current.1.radius <= candidate.1.radius => current,
                _ => candidate,
            });
        }
    }
    best
}

fn find_best_e(face: &Face, balls: &[Ball], bsh: &Bsh, epsilon: f64) -> Option<(usize, Ball)> {
    for e_id in 0..balls.len() {
        if bsh.is_ignored(e_id) {
            continue;
        }
        if let Some(candidate) = face.candidate_for_e(e_id, balls, bsh, epsilon) {
            return Some(candidate);
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn emit_quadruple(
    triple: Triple,
    new_id: usize,
    sphere: Ball,
    balls: &[Ball],
    quadruples: &mut HashMap<Quadruple, Vec<Ball>>,
    used: &mut HashSet<usize>,
    processed: &mut HashSet<Triple>,
    stack: &mut Vec<Triple>,
    stats: &mut TriangulationStats,
) {
    let quadruple = triple.with(new_id);
    let epsilon = 1e-8;
    let entry = quadruples.entry(quadruple).or_default();
    if !entry.iter().any(|s| crate::geometry::equal_balls(s, &sphere, epsilon)) {
        entry.push(sphere);
        entry.truncate(2);
    }
    for &id in quadruple.as_slice() {
        used.insert(id);
    }
    let _ = balls;

    for k in 0..4 {
        let preface = quadruple.exclude(k);
        if preface != triple && processed.insert(preface) {
            stack.push(preface);
            stats.prefaces_pushed += 1;
        }
    }
}

/// Tries several candidates as the starting anchor before giving up, so a
/// single locally-degenerate anchor doesn't mask a seed reachable from
/// another one.
fn find_seed_triple_anywhere(balls: &[Ball], candidates: &[usize], bsh: &Bsh, epsilon: f64) -> Option<Triple> {
    for &anchor in candidates.iter().take(8) {
        let rest: Vec<usize> = candidates.iter().copied().filter(|&id| id != anchor).collect();
        if let Some(triple) = find_seed_triple_from_anchor(balls, anchor, &rest, bsh, epsilon) {
            return Some(triple);
        }
    }
    None
}

/// Scans balls by increasing distance from `anchor` and tries successive
/// triples `(anchor, nearest, d-th nearest)` until one yields a face with a
/// valid empty tangent sphere on either side.
fn find_seed_triple_from_anchor(
    balls: &[Ball],
    anchor: usize,
    others: &[usize],
    bsh: &Bsh,
    epsilon: f64,
) -> Option<Triple> {
    if others.len() < 2 {
        return None;
    }
    let mut sorted = others.to_vec();
    sorted.sort_by(|&a, &b| {
        distance(balls[anchor].center, balls[a].center)
            .partial_cmp(&distance(balls[anchor].center, balls[b].center))
            .unwrap()
    });

    let limit = sorted.len().min(24);
    for i in 0..limit {
        for j in (i + 1)..limit {
            let triple = Triple::new([anchor, sorted[i], sorted[j]]);
            let face = Face::new(triple, balls);
            for k in 0..2 {
                if find_best_d(&face, k, balls, bsh, epsilon).is_some() {
                    return Some(triple);
                }
            }
            if face.can_have_e() && find_best_e(&face, balls, bsh, epsilon).is_some() {
                return Some(triple);
            }
        }
    }
    None
}

fn run_surplus_pass(
    balls: &[Ball],
    bsh: &Bsh,
    epsilon: f64,
    quadruples: &mut HashMap<Quadruple, Vec<Ball>>,
    stats: &mut TriangulationStats,
) {
    let inflation = 3.0 * epsilon;
    let mut seen_spheres: Vec<Ball> = Vec::new();
    for spheres in quadruples.values() {
        for s in spheres {
            if !seen_spheres.iter().any(|x| crate::geometry::equal_balls(x, s, epsilon)) {
                seen_spheres.push(*s);
            }
        }
    }

    let mut additions: Vec<(Quadruple, Ball)> = Vec::new();
    for sphere in &seen_spheres {
        let query = sphere.inflated(inflation);
        let touching = all_touching(bsh, &query, epsilon);
        if touching.len() <= 4 {
            continue;
        }
        for combo in combinations_of_four(&touching) {
            let quad = Quadruple::new(combo);
            if quad
                .as_slice()
                .iter()
                .all(|&id| touches(sphere, &balls[id], epsilon))
            {
                additions.push((quad, *sphere));
            }
        }
    }

    for (quad, sphere) in additions {
        let entry = quadruples.entry(quad).or_default();
        if !entry.iter().any(|s| crate::geometry::equal_balls(s, &sphere, epsilon)) {
            entry.push(sphere);
            entry.truncate(2);
            stats.surplus_quadruples_added += 1;
        }
    }
}

fn combinations_of_four(ids: &[usize]) -> Vec<[usize; 4]> {
    let mut out = Vec::new();
    let n = ids.len();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    out.push([ids[a], ids[b], ids[c], ids[d]]);
                }
            }
        }
    }
    out
}

fn build_vertices_and_graph(
    quadruples: HashMap<Quadruple, Vec<Ball>>,
) -> (Vec<(Quadruple, Ball)>, Vec<[Option<usize>; 4]>) {
    let mut sorted: Vec<(Quadruple, Vec<Ball>)> = quadruples.into_iter().collect();
    sorted.sort_by(|a, b| a.0.as_slice().cmp(b.0.as_slice()));

    let mut vertices: Vec<(Quadruple, Ball)> = Vec::new();
    for (quad, spheres) in &sorted {
        for sphere in spheres {
            vertices.push((*quad, *sphere));
        }
    }

    let mut triple_to_vertices: HashMap<Triple, Vec<usize>> = HashMap::new();
    for (i, (quad, _)) in vertices.iter().enumerate() {
        for k in 0..4 {
            triple_to_vertices.entry(quad.exclude(k)).or_default().push(i);
        }
    }

    let mut graph = vec![[None; 4]; vertices.len()];
    for (i, (quad, _)) in vertices.iter().enumerate() {
        for k in 0..4 {
            let triple = quad.exclude(k);
            let neighbor = triple_to_vertices[&triple].iter().copied().find(|&j| j != i);
            graph[i][k] = neighbor;
        }
    }

    (vertices, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn default_config() -> TriangulationConfig {
        TriangulationConfig::builder()
            .bsh_radius_r0(3.5)
            .unwrap()
            .epsilon(1e-6)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn tetrahedron_yields_one_quadruple() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 6.75f64.sqrt(), 0.0), 1.0),
            Ball::new(
                Point::new(1.5, 6.75f64.sqrt() / 3.0, (9.0 - 12.0 / 3.0f64).sqrt()),
                1.0,
            ),
        ];
        let result = triangulate(&balls, &default_config()).unwrap();
        assert_eq!(result.vertices().len(), 1);
        let (quad, sphere) = result.vertices()[0];
        assert_eq!(*quad.as_slice(), [0, 1, 2, 3]);
        for b in &balls {
            assert!(touches(&sphere, b, 1e-4));
        }
    }

    #[test]
    fn concentric_balls_hide_the_inner_one() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(0.0, 0.0, 0.0), 2.0),
        ];
        let result = triangulate(&balls, &default_config()).unwrap();
        assert!(result.hidden_ids().contains(&0));
        assert!(result.vertices().is_empty());
    }

    #[test]
    fn collinear_balls_produce_no_quadruples() {
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(6.0, 0.0, 0.0), 1.0),
        ];
        let result = triangulate(&balls, &default_config()).unwrap();
        assert!(result.vertices().is_empty());
        assert!(result.ignored_ids().contains(&0));
        assert!(result.ignored_ids().contains(&2));
    }

    #[test]
    fn vertex_graph_is_symmetric() {
        // Two tetrahedra sharing a face: five balls, enough to exercise
        // shared-triple neighbor links.
        let balls = vec![
            Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
            Ball::new(Point::new(1.5, 6.75f64.sqrt(), 0.0), 1.0),
            Ball::new(
                Point::new(1.5, 6.75f64.sqrt() / 3.0, (9.0 - 12.0 / 3.0f64).sqrt()),
                1.0,
            ),
            Ball::new(
                Point::new(1.5, 6.75f64.sqrt() / 3.0, -(9.0 - 12.0 / 3.0f64).sqrt()),
                1.0,
            ),
        ];
        let result = triangulate(&balls, &default_config()).unwrap();
        for (i, _) in result.vertices().iter().enumerate() {
            for k in 0..4 {
                if let Some(j) = result.neighbors(i)[k] {
                    let back = result.neighbors(j);
                    assert!(back.contains(&Some(i)));
                }
            }
        }
    }
}
