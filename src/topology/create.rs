use crate::error::{GeometryError, Result};
use crate::math::{Point2, TOLERANCE};
use crate::plan::{Plan, Wall, WallId};

use super::joined_wall::{join_walls, WallEnd};

/// Creates a straight wall at the selected level, optionally joined to
/// existing walls at its ends.
#[derive(Debug, Clone)]
pub struct CreateWall {
    start: Point2,
    end: Point2,
    thickness: f64,
    height: Option<f64>,
    join_start: Option<(WallId, WallEnd)>,
    join_end: Option<(WallId, WallEnd)>,
}

impl CreateWall {
    #[must_use]
    pub fn new(start: Point2, end: Point2, thickness: f64, height: Option<f64>) -> Self {
        Self {
            start,
            end,
            thickness,
            height,
            join_start: None,
            join_end: None,
        }
    }

    /// Joins the start of the new wall to the end `end` of `wall`.
    #[must_use]
    pub fn join_start(mut self, wall: WallId, end: WallEnd) -> Self {
        self.join_start = Some((wall, end));
        self
    }

    /// Joins the end of the new wall to the end `end` of `wall`.
    #[must_use]
    pub fn join_end(mut self, wall: WallId, end: WallEnd) -> Self {
        self.join_end = Some((wall, end));
        self
    }

    /// Adds the wall to the plan.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroLengthSegment` if start and end are equal,
    /// or a topology error if a requested join is invalid.
    pub fn execute(&self, plan: &mut Plan) -> Result<WallId> {
        if (self.end - self.start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroLengthSegment {
                x0: self.start.x,
                y0: self.start.y,
                x1: self.end.x,
                y1: self.end.y,
            }
            .into());
        }
        let mut wall = Wall::new(self.start, self.end, self.thickness, self.height);
        wall.level = plan.selected_level();
        let id = plan.add_wall(wall);
        // Existing walls keep their coordinates: the new wall is aligned on them.
        if let Some((other, other_end)) = self.join_start {
            join_walls(plan, other, other_end, id, WallEnd::Start)?;
        }
        if let Some((other, other_end)) = self.join_end {
            join_walls(plan, other, other_end, id, WallEnd::End)?;
        }
        tracing::debug!(?id, start = ?self.start, end = ?self.end, "wall created");
        Ok(id)
    }
}
