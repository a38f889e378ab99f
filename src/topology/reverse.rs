use std::mem;

use crate::error::TopologyError;
use crate::plan::{Plan, Wall, WallId};

/// Reverses the direction of walls.
///
/// Start and end are swapped with their joins, sloping heights and side
/// styles, and the arc extent changes sign, so that the wall looks the same
/// once reversed. Reversing twice gives back the original wall, except that
/// a sloping wall without its own height gets the plan wall height.
#[derive(Debug, Clone)]
pub struct ReverseWalls {
    walls: Vec<WallId>,
}

impl ReverseWalls {
    #[must_use]
    pub fn new(walls: Vec<WallId>) -> Self {
        Self { walls }
    }

    /// Reverses every wall.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` for an unknown wall.
    pub fn execute(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        let default_height = plan.wall_height();
        for &id in &self.walls {
            plan.update_wall(id, |wall| reverse_wall(wall, default_height))?;
        }
        tracing::debug!(count = self.walls.len(), "walls reversed");
        Ok(())
    }
}

/// Reverses a single wall in place.
///
/// The start height of a sloping wall falls back to `default_height`, as
/// the end of a wall can't express the plan height.
pub fn reverse_wall(wall: &mut Wall, default_height: f64) {
    mem::swap(&mut wall.start, &mut wall.end);
    mem::swap(&mut wall.wall_at_start, &mut wall.wall_at_end);
    mem::swap(&mut wall.left_side, &mut wall.right_side);
    wall.arc_extent = wall.arc_extent.map(|extent| -extent);
    if wall.height_at_end.is_some() {
        wall.height.get_or_insert(default_height);
        mem::swap(&mut wall.height, &mut wall.height_at_end);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::topology::{join_walls, WallEnd};

    #[test]
    fn reversed_wall_keeps_its_joins() {
        let mut plan = Plan::new();
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, Some(250.0)));
        let b = plan.add_wall(Wall::new(pt(100.0, 0.0), pt(100.0, 100.0), 10.0, None));
        join_walls(&mut plan, a, WallEnd::End, b, WallEnd::Start).unwrap();
        plan.update_wall(a, |w| {
            w.height_at_end = Some(300.0);
            w.arc_extent = Some(0.5);
            w.left_side.color = Some(0xff0000);
        })
        .unwrap();
        ReverseWalls::new(vec![a]).execute(&mut plan).unwrap();
        let wall = plan.wall(a).unwrap();
        assert_eq!(wall.start, pt(100.0, 0.0));
        assert_eq!(wall.wall_at_start, Some(b));
        assert_eq!(wall.wall_at_end, None);
        assert_eq!(wall.height, Some(300.0));
        assert_eq!(wall.height_at_end, Some(250.0));
        assert_eq!(wall.arc_extent, Some(-0.5));
        assert_eq!(wall.right_side.color, Some(0xff0000));
        assert_eq!(plan.wall(b).unwrap().wall_at_start, Some(a));
    }

    #[test]
    fn sloping_wall_without_height_slopes_from_the_plan_height() {
        let mut plan = Plan::new();
        plan.set_wall_height(250.0);
        let mut sloping = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None);
        sloping.height_at_end = Some(300.0);
        let wall = plan.add_wall(sloping);

        ReverseWalls::new(vec![wall]).execute(&mut plan).unwrap();
        let reversed = plan.wall(wall).unwrap();
        assert_eq!(reversed.height, Some(300.0));
        assert_eq!(reversed.height_at_end, Some(250.0));

        ReverseWalls::new(vec![wall]).execute(&mut plan).unwrap();
        let restored = plan.wall(wall).unwrap();
        assert_eq!(restored.height, Some(250.0));
        assert_eq!(restored.height_at_end, Some(300.0));
        assert_eq!(restored.start, pt(0.0, 0.0));
    }

    #[test]
    fn flat_wall_keeps_its_height() {
        let mut wall = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, Some(220.0));
        reverse_wall(&mut wall, 250.0);
        assert_eq!(wall.height, Some(220.0));
        assert_eq!(wall.height_at_end, None);
        let mut default_height = Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None);
        reverse_wall(&mut default_height, 250.0);
        assert_eq!(default_height.height, None);
        assert_eq!(default_height.height_at_end, None);
    }
}
