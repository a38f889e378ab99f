use crate::error::{GeometryError, Result, TopologyError};
use crate::math::arc_2d::arc_circle_center;
use crate::math::Point2;
use crate::plan::{Plan, Wall, WallId};

use super::joined_wall::JoinedWall;

/// Splits a wall in two joined walls.
///
/// The first wall keeps the join at the start of the original wall, the
/// second one the join at its end. Sloping walls get the height
/// interpolated at the split point.
#[derive(Debug, Clone)]
pub struct SplitWall {
    wall: WallId,
    ratio: f64,
}

/// Result of a wall split, able to undo and redo it.
#[derive(Debug, Clone)]
pub struct WallSplit {
    original: JoinedWall,
    original_index: usize,
    first: JoinedWall,
    first_index: usize,
    second: JoinedWall,
    second_index: usize,
}

impl SplitWall {
    /// Splits `wall` at `ratio` of its length, `0.5` splitting it in its middle.
    #[must_use]
    pub fn new(wall: WallId, ratio: f64) -> Self {
        Self { wall, ratio }
    }

    /// Replaces the wall by its two halves.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the ratio isn't strictly
    /// between 0 and 1, or `TopologyError::ItemNotFound` if the wall isn't
    /// in the plan.
    pub fn execute(&self, plan: &mut Plan) -> Result<WallSplit> {
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(GeometryError::Degenerate(format!(
                "split ratio {} out of (0, 1)",
                self.ratio
            ))
            .into());
        }
        let original = JoinedWall::capture(plan, self.wall).ok_or(TopologyError::ItemNotFound("wall"))?;
        let wall = plan
            .wall(self.wall)
            .ok_or(TopologyError::ItemNotFound("wall"))?
            .clone();
        let split_point = point_at(&wall, self.ratio);
        let start_height = wall.height.unwrap_or_else(|| plan.wall_height());
        let split_height = wall
            .height_at_end
            .map(|end| start_height + (end - start_height) * self.ratio);

        let mut first = wall.clone();
        first.end = split_point;
        first.wall_at_end = None;
        first.arc_extent = wall.arc_extent.map(|e| e * self.ratio);
        if split_height.is_some() {
            first.height_at_end = split_height;
        }
        let mut second = wall.clone();
        second.start = split_point;
        second.wall_at_start = None;
        second.arc_extent = wall.arc_extent.map(|e| e * (1.0 - self.ratio));
        if split_height.is_some() {
            second.height = split_height;
        }

        let original_index = plan.delete_wall(self.wall)?;
        let first_id = plan.add_wall(first);
        let second_id = plan.add_wall(second);
        plan.update_wall(first_id, |w| w.wall_at_end = Some(second_id))?;
        plan.update_wall(second_id, |w| w.wall_at_start = Some(first_id))?;
        // Neighbours of the original wall now refer to the halves.
        let [at_start, at_end] = original.neighbours();
        for (joined, half) in [(at_start, first_id), (at_end, second_id)] {
            if let Some((neighbour, end)) = joined {
                plan.update_wall(neighbour, |n| end.set_joined(n, Some(half)))?;
            }
        }
        let split = WallSplit {
            original,
            original_index,
            first: JoinedWall::capture(plan, first_id).ok_or(TopologyError::ItemNotFound("wall"))?,
            first_index: plan.walls().index_of(first_id).unwrap_or_default(),
            second: JoinedWall::capture(plan, second_id)
                .ok_or(TopologyError::ItemNotFound("wall"))?,
            second_index: plan.walls().index_of(second_id).unwrap_or_default(),
        };
        tracing::debug!(wall = ?self.wall, first = ?first_id, second = ?second_id, "wall split");
        Ok(split)
    }
}

impl WallSplit {
    #[must_use]
    pub fn original(&self) -> WallId {
        self.original.id()
    }

    #[must_use]
    pub fn first(&self) -> WallId {
        self.first.id()
    }

    #[must_use]
    pub fn second(&self) -> WallId {
        self.second.id()
    }

    /// Puts the original wall back in place of its halves.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the plan lost one of the walls.
    pub fn undo(&self, plan: &mut Plan) -> std::result::Result<(), TopologyError> {
        plan.delete_wall(self.second.id())?;
        plan.delete_wall(self.first.id())?;
        plan.restore_wall(self.original.id(), self.original_index);
        self.original.restore(plan)
    }

    /// Splits the original wall again.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the plan lost one of the walls.
    pub fn redo(&self, plan: &mut Plan) -> std::result::Result<(), TopologyError> {
        plan.delete_wall(self.original.id())?;
        plan.restore_wall(self.first.id(), self.first_index);
        plan.restore_wall(self.second.id(), self.second_index);
        self.first.restore(plan)?;
        self.second.restore(plan)
    }
}

/// Point at `ratio` of the wall, measured along its arc when curved.
fn point_at(wall: &Wall, ratio: f64) -> Point2 {
    match wall.effective_arc_extent() {
        Some(extent) => {
            let center = arc_circle_center(&wall.start, &wall.end, extent);
            let radius = (wall.start - center).norm();
            let start_angle = (wall.start.y - center.y).atan2(wall.start.x - center.x);
            let angle = start_angle - extent * ratio;
            Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        }
        None => wall.start + (wall.end - wall.start) * ratio,
    }
}
