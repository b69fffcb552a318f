//! The `Face` concept: a working object over one ball triple, tracking the
//! tangent planes that split its exterior into two half-spaces and the
//! tangent-sphere candidates recorded for each side.

use crate::bsh::Bsh;
use crate::collision::all_overlapping;
use crate::geometry::{
    halfspace, minimal_tangent_sphere_of_three_balls, tangent_planes_of_three_balls,
    tangent_sphere_of_four_balls, touches, Ball, Triple,
};

/// One plane of a face, plus the matching "central plane" used to break
/// ties between the two tangent spheres of a quadruple: the plane through
/// the three ball centers, oriented to match this tangent plane's normal.
struct Side {
    tangent_plane: (crate::geometry::Point, crate::geometry::Point),
    central_plane: (crate::geometry::Point, crate::geometry::Point),
}

pub struct Face {
    pub triple: Triple,
    sides: Option<[Side; 2]>,
    pub middle_ball: Option<Ball>,
    pub d: [Option<(usize, Ball)>; 2],
    pub e: Vec<(usize, Ball)>,
    can_have_e: bool,
}

/// Below this radius a ball is considered too small to ever require the `e`
/// fallback search on a face it anchors; matches the original's
/// `min_sphere_radius` threshold with its usual default of zero.
const MIN_SPHERE_RADIUS_FOR_E: f64 = 0.0;

impl Face {
    /// Builds a face for `triple`. If the three centers are collinear the
    /// face has no tangent planes ("cannot-have-d") but can still carry an
    /// `e` candidate if the caller chooses to search for one.
    pub fn new(triple: Triple, balls: &[Ball]) -> Self {
        let [a, b, c] = [
            &balls[triple.get(0)],
            &balls[triple.get(1)],
            &balls[triple.get(2)],
        ];
        let planes = tangent_planes_of_three_balls(a, b, c);
        let can_have_d = planes.len() == 2;
        let sides = if can_have_d {
            let central_normal_base = {
                let ab = b.center - a.center;
                let ac = c.center - a.center;
                ab.cross(ac).normalize()
            };
            let mut sides = Vec::with_capacity(2);
            for plane in &planes {
                let orientation = if plane.1.dot(central_normal_base) >= 0.0 {
                    central_normal_base
                } else {
                    -central_normal_base
                };
                sides.push(Side {
                    tangent_plane: *plane,
                    central_plane: (a.center, orientation),
                });
            }
            Some([sides.remove(0), sides.remove(0)])
        } else {
            None
        };
        let middle_ball = minimal_tangent_sphere_of_three_balls(a, b, c);
        let can_have_e = !can_have_d
            || a.radius > MIN_SPHERE_RADIUS_FOR_E
            || b.radius > MIN_SPHERE_RADIUS_FOR_E
            || c.radius > MIN_SPHERE_RADIUS_FOR_E;
        Face {
            triple,
            sides,
            middle_ball,
            d: [None, None],
            e: Vec::new(),
            can_have_e,
        }
    }

    pub fn can_have_d(&self) -> bool {
        self.sides.is_some()
    }

    /// Whether the `e` fallback search is worth running on this face at all:
    /// always true when the face has no tangent planes to begin with, and
    /// otherwise true unless every one of its three balls is vanishingly
    /// small. Independent of whether `d0`/`d1` were already found — the `e`
    /// search is not redundant with `d`.
    pub fn can_have_e(&self) -> bool {
        self.can_have_e
    }

    /// Evaluates ball `d_id` as a candidate for half-space `k`, per the
    /// candidate-for-d algorithm: wrong-side rejection, tangent-sphere
    /// computation, central-plane tie-break, and an emptiness check against
    /// every other input ball via the BSH.
    pub fn candidate_for_d(
        &self,
        d_id: usize,
        k: usize,
        balls: &[Ball],
        bsh: &Bsh,
        epsilon: f64,
    ) -> Option<(usize, Ball)> {
        let sides = self.sides.as_ref()?;
        if self.triple.contains(d_id) {
            return None;
        }
        if let Some((existing_id, _)) = self.d[k] {
            if existing_id == d_id {
                return None;
            }
        }
        let side = &sides[k];
        if halfspace(&side.tangent_plane, balls[d_id].center) < -epsilon {
            return None;
        }

        let quad_balls = [
            balls[self.triple.get(0)],
            balls[self.triple.get(1)],
            balls[self.triple.get(2)],
            balls[d_id],
        ];
        let candidates = tangent_sphere_of_four_balls(&quad_balls, epsilon);
        if candidates.is_empty() {
            return None;
        }

        let chosen = select_by_central_plane(&candidates, &side.central_plane);
        let chosen = chosen?;

        if self.overlaps_recorded(&chosen, epsilon) {
            return None;
        }
        if self.is_occupied(&chosen, &[self.triple.get(0), self.triple.get(1), self.triple.get(2), d_id], balls, bsh, epsilon) {
            return None;
        }
        Some((d_id, chosen))
    }

    /// Evaluates ball `e_id` as a fallback "e" candidate: below both planes,
    /// intersecting the middle-region ball, and with an empty tangent
    /// sphere.
    pub fn candidate_for_e(
        &self,
        e_id: usize,
        balls: &[Ball],
        bsh: &Bsh,
        epsilon: f64,
    ) -> Option<(usize, Ball)> {
        if self.triple.contains(e_id) {
            return None;
        }
        if let Some(sides) = &self.sides {
            for side in sides {
                if halfspace(&side.tangent_plane, balls[e_id].center) > epsilon {
                    return None;
                }
            }
        }
        if let Some(mid) = &self.middle_ball {
            let d = crate::geometry::distance(mid.center, balls[e_id].center);
            if d > mid.radius + balls[e_id].radius + epsilon {
                return None;
            }
        }
        let quad_balls = [
            balls[self.triple.get(0)],
            balls[self.triple.get(1)],
            balls[self.triple.get(2)],
            balls[e_id],
        ];
        let candidates = tangent_sphere_of_four_balls(&quad_balls, epsilon);
        for cand in candidates {
            if self.is_occupied(&cand, &[self.triple.get(0), self.triple.get(1), self.triple.get(2), e_id], balls, bsh, epsilon) {
                continue;
            }
            return Some((e_id, cand));
        }
        None
    }

    pub fn set_d(&mut self, k: usize, candidate: (usize, Ball)) {
        self.d[k] = Some(candidate);
    }

    fn overlaps_recorded(&self, candidate: &Ball, epsilon: f64) -> bool {
        for d in self.d.iter().flatten() {
            if touches(candidate, &d.1, epsilon) && candidate.radius > d.1.radius + epsilon {
                continue;
            }
            if crate::geometry::intersects(candidate, &d.1, epsilon) {
                return true;
            }
        }
        false
    }

    fn is_occupied(
        &self,
        candidate: &Ball,
        quadruple_ids: &[usize; 4],
        _balls: &[Ball],
        bsh: &Bsh,
        epsilon: f64,
    ) -> bool {
        all_overlapping(bsh, candidate, epsilon)
            .into_iter()
            .any(|id| !quadruple_ids.contains(&id))
    }
}

/// Picks the candidate tangent sphere on the correct side of the central
/// plane, with the tie-break rule from §4.4: smaller radius if both land on
/// the "positive" side, larger radius if both land on the "negative" side.
fn select_by_central_plane(
    candidates: &[Ball],
    central_plane: &(crate::geometry::Point, crate::geometry::Point),
) -> Option<Ball> {
    if candidates.len() == 1 {
        return Some(candidates[0]);
    }
    let signs: Vec<f64> = candidates
        .iter()
        .map(|c| halfspace(central_plane, c.center))
        .collect();
    match (signs[0] >= 0.0, signs[1] >= 0.0) {
        (true, false) => Some(candidates[0]),
        (false, true) => Some(candidates[1]),
        (false, false) => {
            // both negative: smaller radius... sign convention below matches
            // the positive/negative tie-break from the spec.
            Some(if candidates[0].radius <= candidates[1].radius {
                candidates[0]
            } else {
                candidates[1]
            })
        }
        (true, true) => Some(if candidates[0].radius >= candidates[1].radius {
            candidates[0]
        } else {
            candidates[1]
        }),
    }
}
