//! One module per family of controller states.

pub mod camera;
pub mod compass;
pub mod dimension_line;
pub mod drag_and_drop;
pub mod label;
pub mod piece;
pub mod polyline;
pub mod room;
pub mod selection;
pub mod wall;

use crate::error::Result;
use crate::math::{direction_angle, normalize_angle, Point2, Vector2};
use crate::placement::{adjust_piece_elevation, adjust_piece_on_wall_at, adjust_piece_side_by_side_at};
use crate::plan::{ItemId, PieceId, Plan};

use super::snapshot::{modification_edit, restore_all, ItemSnapshot};
use super::state::{ControllerState, StateContext};
use super::Mode;

pub use camera::{CameraElevationState, CameraPitchRotationState, CameraYawRotationState};
pub use compass::{CompassResizeState, CompassRotationState};
pub use dimension_line::{
    DimensionLineCreationState, DimensionLineDrawingState, DimensionLineOffsetState,
    DimensionLineResizeState,
};
pub use drag_and_drop::DragAndDropState;
pub use label::{LabelCreationState, LabelElevationState, LabelRotationState};
pub use piece::{
    PieceElevationState, PieceHeightState, PieceNameOffsetState, PiecePitchRotationState,
    PieceResizeState, PieceRollRotationState, PieceRotationState,
};
pub use polyline::{PolylineCreationState, PolylineDrawingState, PolylineResizeState};
pub use room::{
    RoomAreaOffsetState, RoomCreationState, RoomDrawingState, RoomNameOffsetState,
    RoomResizeState,
};
pub use selection::{PanningState, RectangleSelectionState, SelectionMoveState, SelectionState};
pub use wall::{WallArcExtentState, WallCreationState, WallDrawingState, WallResizeState};

/// Idle state of a mode.
#[must_use]
pub fn mode_state(mode: Mode) -> Box<dyn ControllerState> {
    match mode {
        Mode::Selection => Box::new(SelectionState),
        Mode::Panning => Box::new(PanningState::default()),
        Mode::WallCreation => Box::new(WallCreationState),
        Mode::RoomCreation => Box::new(RoomCreationState),
        Mode::PolylineCreation => Box::new(PolylineCreationState),
        Mode::DimensionLineCreation => Box::new(DimensionLineCreationState),
        Mode::LabelCreation => Box::new(LabelCreationState),
    }
}

/// Angle in degrees of the direction from `from` to `to`, counterclockwise
/// on screen, in `[0, 360)`.
#[must_use]
pub fn screen_angle_degrees(from: &Point2, to: &Point2) -> f64 {
    normalize_angle(-direction_angle(from, to)).to_degrees()
}

/// Point at `length` from `from` in the direction `angle` given in degrees
/// counterclockwise on screen.
#[must_use]
pub fn point_at(from: &Point2, length: f64, angle: f64) -> Point2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    Point2::new(from.x + length * cos, from.y - length * sin)
}

/// Keeps the largest component of `delta` only.
#[must_use]
pub fn along_main_axis(delta: Vector2) -> Vector2 {
    if delta.x.abs() >= delta.y.abs() {
        Vector2::new(delta.x, 0.0)
    } else {
        Vector2::new(0.0, delta.y)
    }
}

/// Copies of the items changed by a gesture, taken when it starts.
///
/// Gestures restore these copies before recomputing the items from the
/// pointer location, so feedback never accumulates rounding.
#[derive(Debug, Default)]
pub struct Captured {
    before: Vec<ItemSnapshot>,
}

impl Captured {
    /// Captures `items` and the items they drag along.
    #[must_use]
    pub fn new(plan: &Plan, items: &[ItemId]) -> Self {
        Self {
            before: ItemSnapshot::capture_affected(plan, items),
        }
    }

    /// Puts the captured items back as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if an item disappeared from the plan.
    pub fn restore(&self, plan: &mut Plan) -> Result<()> {
        Ok(restore_all(plan, &self.before)?)
    }

    /// Posts an edit going from the captured items to their current state.
    /// Returns `false` without posting anything when nothing changed.
    pub fn commit(&self, ctx: &mut StateContext<'_>, name: &str) -> bool {
        let after: Vec<ItemSnapshot> = self
            .before
            .iter()
            .filter_map(|snapshot| ItemSnapshot::capture(ctx.plan, snapshot.item()))
            .collect();
        if after == self.before {
            tracing::debug!(name, "unchanged items, no edit posted");
            return false;
        }
        ctx.post_edit(modification_edit(name, self.before.clone(), after));
        true
    }
}

/// Sticks a moved piece to the wall or the piece it's dropped on, then
/// raises it on the piece it stands on.
///
/// # Errors
///
/// Returns an error if the piece disappeared from the plan.
pub fn magnetize_piece(ctx: &mut StateContext<'_>, id: PieceId) -> Result<()> {
    let Some(piece) = ctx.plan.piece(id).cloned() else {
        return Ok(());
    };
    let margin = ctx.preferences.furniture_magnetism_margin;
    let placement = adjust_piece_on_wall_at(ctx.plan, &piece, &piece.center(), false, margin);
    if let Some(placement) = placement {
        ctx.plan.update_piece(id, |p| {
            p.x = placement.center.x;
            p.y = placement.center.y;
            p.angle = placement.angle;
            if let Some(depth) = placement.depth {
                p.depth = depth;
            }
            if let Some(door) = p.door_or_window.as_mut() {
                door.bound_to_wall = placement.bound_to_wall;
            }
        })?;
    } else {
        if piece.is_bound_to_wall() {
            ctx.plan.update_piece(id, |p| {
                if let Some(door) = p.door_or_window.as_mut() {
                    door.bound_to_wall = false;
                }
            })?;
        }
        if let Some(center) = adjust_piece_side_by_side_at(ctx.plan, ctx.cache, &piece, &[id], margin) {
            ctx.plan.update_piece(id, |p| {
                p.x = center.x;
                p.y = center.y;
            })?;
        }
    }
    let moved = ctx.plan.piece(id).cloned();
    if let Some(elevation) = moved.and_then(|p| adjust_piece_elevation(ctx.plan, &p, &[id])) {
        ctx.plan.update_piece(id, |p| p.elevation = elevation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use approx::assert_relative_eq;

    #[test]
    fn screen_angles_turn_counterclockwise() {
        assert_relative_eq!(screen_angle_degrees(&pt(0.0, 0.0), &pt(0.0, -10.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(screen_angle_degrees(&pt(0.0, 0.0), &pt(0.0, 10.0)), 270.0, epsilon = 1e-9);
        let end = point_at(&pt(0.0, 0.0), 10.0, 90.0);
        assert_relative_eq!(end.y, -10.0, epsilon = 1e-9);
    }
}
