//! Gestures started on the indicators of a selected piece.
//!
//! Every gesture recomputes the piece from its copy taken at the press, so
//! the pointer location alone decides the result. Groups carry their
//! children along: each child keeps its place in the group frame, scaled
//! with the group.

use nalgebra::Rotation2;

use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::{EditableProperty, StateId};
use crate::error::Result;
use crate::math::{direction_angle, normalize_angle, Point2, Vector2};
use crate::plan::{ItemId, Piece, PieceId, Plan};
use crate::snap::round_angle;
use crate::view::CursorType;

use super::{screen_angle_degrees, Captured};

/// Ratio of `new` to `old`, 1 for a degenerate `old`.
fn ratio(new: f64, old: f64) -> f64 {
    if old.abs() <= f64::EPSILON {
        1.0
    } else {
        new / old
    }
}

/// Moves, turns and scales the children of a group changed from `old` to
/// `new`.
fn transform_children(plan: &mut Plan, children: &[PieceId], old: &Piece, new: &Piece) -> Result<()> {
    let (old_width, old_depth, old_height) = old.size_in_plan();
    let (new_width, new_depth, new_height) = new.size_in_plan();
    let sx = ratio(new_width, old_width);
    let sy = ratio(new_depth, old_depth);
    let sz = ratio(new_height, old_height);
    let to_group = Rotation2::new(-old.angle);
    let from_group = Rotation2::new(new.angle);
    for &child in children {
        let Some(before) = plan.piece(child).cloned() else {
            continue;
        };
        let local = to_group * (before.center() - old.center());
        let center = new.center() + from_group * Vector2::new(local.x * sx, local.y * sy);
        let mut after = before.clone();
        after.x = center.x;
        after.y = center.y;
        after.angle = normalize_angle(before.angle + new.angle - old.angle);
        after.width *= sx;
        after.depth *= sy;
        after.height *= sz;
        after.elevation = new.elevation + (before.elevation - old.elevation) * sz;
        let updated = after.clone();
        plan.update_piece(child, |piece| *piece = updated)?;
        transform_children(plan, &before.children, &before, &after)?;
    }
    Ok(())
}

/// State shared by the piece gestures.
#[derive(Debug)]
struct PieceGesture {
    piece: PieceId,
    /// The piece as it was at the press.
    original: Option<Piece>,
    captured: Captured,
}

impl PieceGesture {
    fn new(piece: PieceId) -> Self {
        Self {
            piece,
            original: None,
            captured: Captured::default(),
        }
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>, cursor: CursorType) {
        self.original = ctx.plan.piece(self.piece).cloned();
        self.captured = Captured::new(ctx.plan, &[ItemId::Piece(self.piece)]);
        ctx.view.set_cursor(cursor);
    }

    /// Replaces the piece with `changed`, computed from the original piece.
    fn apply(&self, ctx: &mut StateContext<'_>, changed: Piece) -> Result<()> {
        let Some(original) = &self.original else {
            return Ok(());
        };
        self.captured.restore(ctx.plan)?;
        let updated = changed.clone();
        ctx.plan.update_piece(self.piece, |piece| *piece = updated)?;
        transform_children(ctx.plan, &original.children, original, &changed)
    }

    /// Pointer move in pixels since the press.
    fn pixel_delta(ctx: &StateContext<'_>, point: &Point2) -> Vector2 {
        (point - ctx.input.press) / ctx.view.pixel_length()
    }
}

macro_rules! piece_gesture_state {
    ($state:ident, $id:ident, $cursor:expr, $edit:literal) => {
        impl $state {
            #[must_use]
            pub fn new(piece: PieceId) -> Self {
                Self {
                    gesture: PieceGesture::new(piece),
                }
            }
        }

        impl ControllerState for $state {
            fn id(&self) -> StateId {
                StateId::$id
            }

            fn is_modification_state(&self) -> bool {
                true
            }

            fn is_base_plan_modification_state(&self) -> bool {
                self.gesture.original.as_ref().is_some_and(Piece::is_part_of_base_plan)
            }

            fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
                self.gesture.enter(ctx, $cursor);
                Ok(())
            }

            fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
                let Some(original) = self.gesture.original.clone() else {
                    return Ok(None);
                };
                let changed = self.transformed(ctx, original, &point);
                self.gesture.apply(ctx, changed)?;
                Ok(None)
            }

            fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
                self.gesture.captured.commit(ctx, $edit);
                Ok(Some(ctx.mode_state()))
            }

            fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
                self.gesture.captured.restore(ctx.plan)?;
                Ok(Some(ctx.mode_state()))
            }

            fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
                let mouse = ctx.input.mouse;
                self.move_mouse(ctx, mouse)
            }

            fn set_duplication_activated(
                &mut self,
                ctx: &mut StateContext<'_>,
                _activated: bool,
            ) -> Result<Transition> {
                let mouse = ctx.input.mouse;
                self.move_mouse(ctx, mouse)
            }
        }
    };
}

/// Turns the selected piece around its center.
#[derive(Debug)]
pub struct PieceRotationState {
    gesture: PieceGesture,
}

impl PieceRotationState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let center = piece.center();
        let turn = direction_angle(&center, point) - direction_angle(&center, &ctx.input.press);
        let mut angle = normalize_angle(piece.angle + turn);
        if ctx.magnetism_enabled() {
            angle = normalize_angle(round_angle(angle, ctx.preferences.angle_step()));
        }
        if angle != piece.angle {
            if let Some(door) = piece.door_or_window.as_mut() {
                door.bound_to_wall = false;
            }
        }
        piece.angle = angle;
        let degrees = screen_angle_degrees(&center, &(center + Vector2::new(angle.cos(), angle.sin())));
        ctx.view.set_tool_tip_edited_properties(&[(EditableProperty::Angle, degrees)], point);
        piece
    }
}

piece_gesture_state!(PieceRotationState, PieceRotation, CursorType::Rotation, "Rotate piece");

/// Turns the selected piece around its width axis, one degree per pixel.
#[derive(Debug)]
pub struct PiecePitchRotationState {
    gesture: PieceGesture,
}

impl PiecePitchRotationState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let delta = PieceGesture::pixel_delta(ctx, point);
        let mut pitch = normalize_angle(piece.pitch + delta.y.to_radians());
        if ctx.magnetism_enabled() {
            pitch = normalize_angle(round_angle(pitch, ctx.preferences.angle_step()));
        }
        piece.pitch = pitch;
        piece
    }
}

piece_gesture_state!(PiecePitchRotationState, PiecePitchRotation, CursorType::Rotation, "Rotate piece");

/// Turns the selected piece around its depth axis, one degree per pixel.
#[derive(Debug)]
pub struct PieceRollRotationState {
    gesture: PieceGesture,
}

impl PieceRollRotationState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let delta = PieceGesture::pixel_delta(ctx, point);
        let mut roll = normalize_angle(piece.roll + delta.x.to_radians());
        if ctx.magnetism_enabled() {
            roll = normalize_angle(round_angle(roll, ctx.preferences.angle_step()));
        }
        piece.roll = roll;
        piece
    }
}

piece_gesture_state!(PieceRollRotationState, PieceRollRotation, CursorType::Rotation, "Rotate piece");

/// Raises or lowers the selected piece, never below its level.
#[derive(Debug)]
pub struct PieceElevationState {
    gesture: PieceGesture,
}

impl PieceElevationState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let mut elevation = (piece.elevation + ctx.input.press.y - point.y).max(0.0);
        if ctx.magnetism_enabled() {
            elevation = ctx.unit().magnetized_length(elevation, ctx.view.pixel_length());
        }
        piece.elevation = elevation;
        piece
    }
}

piece_gesture_state!(PieceElevationState, PieceElevation, CursorType::Elevation, "Modify piece elevation");

/// Changes the height of the selected piece. A piece that isn't deformable
/// keeps its proportions.
#[derive(Debug)]
pub struct PieceHeightState {
    gesture: PieceGesture,
}

impl PieceHeightState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let minimum = ctx.unit().minimum_length();
        let mut height = (piece.height + ctx.input.press.y - point.y).max(minimum);
        if ctx.magnetism_enabled() {
            height = ctx.unit().magnetized_length(height, ctx.view.pixel_length()).max(minimum);
        }
        if !piece.deformable {
            let scale = ratio(height, piece.height);
            piece.width *= scale;
            piece.depth *= scale;
        }
        piece.height = height;
        piece
    }
}

piece_gesture_state!(PieceHeightState, PieceHeight, CursorType::Height, "Resize piece");

/// Resizes the selected piece in the plan, its back left corner staying in
/// place.
///
/// While duplication is activated only the width changes. A door or window
/// bound to a wall keeps the depth of its wall. A piece that isn't
/// deformable keeps its proportions.
#[derive(Debug)]
pub struct PieceResizeState {
    gesture: PieceGesture,
}

impl PieceResizeState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        let unit = ctx.unit();
        let minimum = unit.minimum_length();
        let (sin, cos) = piece.angle.sin_cos();
        let width_axis = Vector2::new(cos, sin);
        let depth_axis = Vector2::new(-sin, cos);
        let back_left = piece.points()[0];
        let offset = point - back_left;
        let (old_width, old_depth, _) = piece.size_in_plan();
        let mut width = offset.dot(&width_axis).max(minimum);
        let mut depth = offset.dot(&depth_axis).max(minimum);
        if ctx.magnetism_enabled() {
            let max_delta = ctx.view.pixel_length();
            width = unit.magnetized_length(width, max_delta).max(minimum);
            depth = unit.magnetized_length(depth, max_delta).max(minimum);
        }
        if ctx.input.duplication_activated || piece.is_bound_to_wall() {
            depth = old_depth;
        }
        let (mut sx, mut sy, mut sz) = (ratio(width, old_width), ratio(depth, old_depth), 1.0);
        if !piece.deformable {
            let scale = if ctx.input.duplication_activated || piece.is_bound_to_wall() {
                sx
            } else {
                sx.max(sy)
            };
            (sx, sy, sz) = (scale, scale, scale);
        }
        piece.width *= sx;
        piece.depth *= sy;
        piece.height *= sz;
        let center = back_left + width_axis * (old_width * sx / 2.0) + depth_axis * (old_depth * sy / 2.0);
        piece.x = center.x;
        piece.y = center.y;
        ctx.view
            .set_tool_tip_edited_properties(&[(EditableProperty::Length, old_width * sx)], point);
        piece
    }
}

piece_gesture_state!(PieceResizeState, PieceResize, CursorType::Resize, "Resize piece");

/// Moves the name of the selected piece.
#[derive(Debug)]
pub struct PieceNameOffsetState {
    gesture: PieceGesture,
}

impl PieceNameOffsetState {
    fn transformed(&self, ctx: &mut StateContext<'_>, mut piece: Piece, point: &Point2) -> Piece {
        piece.name_offset += point - ctx.input.press;
        piece
    }
}

piece_gesture_state!(PieceNameOffsetState, PieceNameOffset, CursorType::Move, "Move piece name");
