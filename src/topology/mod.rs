//! Wall topology: joins between wall ends and the operations that keep
//! them consistent.
//!
//! Joins are mutual. If the start of wall A is joined to wall B, then B is
//! joined to A at one of its ends, and both ends share the same point.
//! Every operation of this module preserves that invariant.

pub mod create;
pub mod flip;
pub mod join_selected;
pub mod joined_wall;
pub mod movement;
pub mod reverse;
pub mod split;

pub use create::CreateWall;
pub use flip::FlipItems;
pub use join_selected::{JoinSelectedWalls, WallJoin};
pub use joined_wall::{detach_wall, join_walls, joined_end, JoinedWall, WallEnd};
pub use movement::{move_piece, move_wall_end_point, move_wall_point, move_wall_start_point, MoveItems};
pub use reverse::{reverse_wall, ReverseWalls};
pub use split::{SplitWall, WallSplit};

use crate::plan::{Plan, WallId};

/// Returns `true` if every join of the given walls is mutual and joined
/// ends share the same point.
#[must_use]
pub fn joins_are_consistent(plan: &Plan, walls: &[WallId]) -> bool {
    walls.iter().all(|&id| {
        let Some(wall) = plan.wall(id) else {
            return true;
        };
        [WallEnd::Start, WallEnd::End].into_iter().all(|end| {
            let Some(neighbour_id) = end.joined(wall) else {
                return true;
            };
            plan.wall(neighbour_id).is_some_and(|neighbour| {
                joined_end(neighbour, id, &end.point(wall))
                    .is_some_and(|neighbour_end| neighbour_end.point(neighbour) == end.point(wall))
            })
        })
    })
}
