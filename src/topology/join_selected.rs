use crate::error::TopologyError;
use crate::math::intersect_2d::line_intersection;
use crate::math::{Point2, TOLERANCE};
use crate::plan::{Plan, Wall, WallId};

use super::joined_wall::{join_walls, JoinedWall, WallEnd};

/// Walls whose directions differ by less than this angle are considered parallel.
const PARALLEL_ANGLE: f64 = std::f64::consts::PI / 180.0;

/// Joins the two closest free ends among a set of walls.
///
/// When the walls aren't parallel, both ends move to the intersection of
/// the wall lines, picking the pair of free ends that moves the least.
/// Parallel walls are joined by moving the free end of the second wall on
/// the closest free end of the first one.
#[derive(Debug, Clone)]
pub struct JoinSelectedWalls {
    walls: Vec<WallId>,
}

/// Result of a join, able to undo and redo it.
#[derive(Debug, Clone)]
pub struct WallJoin {
    before: [JoinedWall; 2],
    after: [JoinedWall; 2],
    point: Point2,
}

struct Candidate {
    a: WallId,
    a_end: WallEnd,
    b: WallId,
    b_end: WallEnd,
}

impl JoinSelectedWalls {
    #[must_use]
    pub fn new(walls: Vec<WallId>) -> Self {
        Self { walls }
    }

    /// Joins the walls. Returns `None` when no pair of free ends can be
    /// joined without making a wall degenerate.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if a wall disappears while
    /// being joined.
    pub fn execute(&self, plan: &mut Plan) -> Result<Option<WallJoin>, TopologyError> {
        let Some(candidate) = self.closest_free_ends(plan) else {
            tracing::debug!("no free wall ends to join");
            return Ok(None);
        };
        let (Some(wall_a), Some(wall_b)) = (plan.wall(candidate.a), plan.wall(candidate.b)) else {
            return Err(TopologyError::ItemNotFound("wall"));
        };
        let Some((a_end, b_end, point)) = join_point(wall_a, wall_b, &candidate) else {
            tracing::debug!(a = ?candidate.a, b = ?candidate.b, "join would collapse a wall");
            return Ok(None);
        };
        let before = [
            JoinedWall::capture(plan, candidate.a).ok_or(TopologyError::ItemNotFound("wall"))?,
            JoinedWall::capture(plan, candidate.b).ok_or(TopologyError::ItemNotFound("wall"))?,
        ];
        plan.update_wall(candidate.a, |wall| a_end.set_point(wall, point))?;
        join_walls(plan, candidate.a, a_end, candidate.b, b_end)?;
        let after = [
            JoinedWall::capture(plan, candidate.a).ok_or(TopologyError::ItemNotFound("wall"))?,
            JoinedWall::capture(plan, candidate.b).ok_or(TopologyError::ItemNotFound("wall"))?,
        ];
        tracing::debug!(a = ?candidate.a, b = ?candidate.b, ?point, "walls joined");
        Ok(Some(WallJoin {
            before,
            after,
            point,
        }))
    }

    fn closest_free_ends(&self, plan: &Plan) -> Option<Candidate> {
        let free_ends: Vec<(WallId, WallEnd, Point2)> = self
            .walls
            .iter()
            .filter_map(|&id| plan.wall(id).map(|w| (id, w)))
            .flat_map(|(id, wall)| {
                [WallEnd::Start, WallEnd::End]
                    .into_iter()
                    .filter(|end| end.joined(wall).is_none())
                    .map(move |end| (id, end, end.point(wall)))
            })
            .collect();
        let mut best: Option<(f64, Candidate)> = None;
        for (i, &(a, a_end, a_point)) in free_ends.iter().enumerate() {
            for &(b, b_end, b_point) in &free_ends[i + 1..] {
                if a == b {
                    continue;
                }
                let distance = (a_point - b_point).norm();
                if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                    best = Some((
                        distance,
                        Candidate {
                            a,
                            a_end,
                            b,
                            b_end,
                        },
                    ));
                }
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}

/// Ends of both walls to join and their common point.
fn join_point(a: &Wall, b: &Wall, candidate: &Candidate) -> Option<(WallEnd, WallEnd, Point2)> {
    let angle_difference = (a.angle() - b.angle()).sin().abs();
    let intersection = if angle_difference < PARALLEL_ANGLE.sin() {
        None
    } else {
        line_intersection(&a.start, &a.end, &b.start, &b.end)
    };
    let Some(point) = intersection else {
        let point = candidate.a_end.point(a);
        return keeps_length(b, candidate.b_end, &point)
            .then_some((candidate.a_end, candidate.b_end, point));
    };
    let free = |wall: &Wall| {
        [WallEnd::Start, WallEnd::End]
            .into_iter()
            .filter(|end| end.joined(wall).is_none() && keeps_length(wall, *end, &point))
            .collect::<Vec<_>>()
    };
    let mut best: Option<(f64, WallEnd, WallEnd)> = None;
    for a_end in free(a) {
        for b_end in free(b) {
            let movement = (a_end.point(a) - point).norm() + (b_end.point(b) - point).norm();
            if best.is_none_or(|(m, _, _)| movement < m) {
                best = Some((movement, a_end, b_end));
            }
        }
    }
    best.map(|(_, a_end, b_end)| (a_end, b_end, point))
}

/// Returns `true` if moving `end` of `wall` to `point` leaves a wall of non-zero length.
fn keeps_length(wall: &Wall, end: WallEnd, point: &Point2) -> bool {
    (end.opposite().point(wall) - point).norm() > TOLERANCE
}

impl WallJoin {
    /// Common point of the joined walls.
    #[must_use]
    pub fn point(&self) -> Point2 {
        self.point
    }

    #[must_use]
    pub fn walls(&self) -> [WallId; 2] {
        [self.before[0].id(), self.before[1].id()]
    }

    /// Puts both walls back where they were, unjoined.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the plan lost one of the walls.
    pub fn undo(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        for snapshot in &self.before {
            snapshot.restore(plan)?;
        }
        Ok(())
    }

    /// Joins the walls again.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the plan lost one of the walls.
    pub fn redo(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        for snapshot in &self.after {
            snapshot.restore(plan)?;
        }
        Ok(())
    }
}
