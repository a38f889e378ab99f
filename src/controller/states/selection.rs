//! Selection mode: picking, moving and rubber band selection of items, and
//! the hand tool.

use crate::controller::snapshot::{addition_edit, delete_item, modification_edit, restore_all, ItemSnapshot};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::StateId;
use crate::error::Result;
use crate::hit_test::{items_in_rectangle, selectable_item_at};
use crate::math::arc_2d::arc_circle_center;
use crate::math::{Point2, Vector2};
use crate::plan::{DimensionLineId, ItemId, LabelId, PieceId, PolylineId, RoomId, Wall, WallId};
use crate::topology::{MoveItems, WallEnd};
use crate::view::CursorType;

use super::{
    along_main_axis, magnetize_piece, CameraElevationState, CameraPitchRotationState,
    CameraYawRotationState, CompassResizeState, CompassRotationState, DimensionLineOffsetState,
    DimensionLineResizeState, LabelElevationState, LabelRotationState, PieceElevationState,
    PieceHeightState, PieceNameOffsetState, PiecePitchRotationState, PieceResizeState,
    PieceRollRotationState, PieceRotationState, PolylineResizeState, RoomAreaOffsetState,
    RoomNameOffsetState, RoomResizeState, WallArcExtentState, WallResizeState,
};

/// Handle of the single selected item under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Indicator {
    WallEnd(WallId, WallEnd),
    WallArc(WallId),
    RoomPoint(RoomId, usize),
    RoomName(RoomId),
    RoomArea(RoomId),
    PolylinePoint(PolylineId, usize),
    DimensionLineEnd(DimensionLineId, bool),
    DimensionLineOffset(DimensionLineId),
    LabelRotation(LabelId),
    LabelElevation(LabelId),
    PieceRotation(PieceId),
    PieceElevation(PieceId),
    PieceHeight(PieceId),
    PieceResize(PieceId),
    PiecePitch(PieceId),
    PieceRoll(PieceId),
    PieceName(PieceId),
    CameraYaw,
    CameraPitch,
    CameraElevation,
    CompassRotation,
    CompassResize,
}

impl Indicator {
    fn cursor(self) -> CursorType {
        match self {
            Self::RoomName(_) | Self::RoomArea(_) | Self::DimensionLineOffset(_) | Self::PieceName(_) => {
                CursorType::Move
            }
            Self::LabelRotation(_)
            | Self::PieceRotation(_)
            | Self::PiecePitch(_)
            | Self::PieceRoll(_)
            | Self::CameraYaw
            | Self::CameraPitch
            | Self::CompassRotation => CursorType::Rotation,
            Self::LabelElevation(_) | Self::PieceElevation(_) | Self::CameraElevation => CursorType::Elevation,
            Self::PieceHeight(_) => CursorType::Height,
            Self::WallEnd(..)
            | Self::WallArc(_)
            | Self::RoomPoint(..)
            | Self::PolylinePoint(..)
            | Self::DimensionLineEnd(..)
            | Self::PieceResize(_)
            | Self::CompassResize => CursorType::Resize,
        }
    }

    fn state(self) -> Box<dyn ControllerState> {
        match self {
            Self::WallEnd(id, end) => Box::new(WallResizeState::new(id, end)),
            Self::WallArc(id) => Box::new(WallArcExtentState::new(id)),
            Self::RoomPoint(id, index) => Box::new(RoomResizeState::new(id, index)),
            Self::RoomName(id) => Box::new(RoomNameOffsetState::new(id)),
            Self::RoomArea(id) => Box::new(RoomAreaOffsetState::new(id)),
            Self::PolylinePoint(id, index) => Box::new(PolylineResizeState::new(id, index)),
            Self::DimensionLineEnd(id, start) => Box::new(DimensionLineResizeState::new(id, start)),
            Self::DimensionLineOffset(id) => Box::new(DimensionLineOffsetState::new(id)),
            Self::LabelRotation(id) => Box::new(LabelRotationState::new(id)),
            Self::LabelElevation(id) => Box::new(LabelElevationState::new(id)),
            Self::PieceRotation(id) => Box::new(PieceRotationState::new(id)),
            Self::PieceElevation(id) => Box::new(PieceElevationState::new(id)),
            Self::PieceHeight(id) => Box::new(PieceHeightState::new(id)),
            Self::PieceResize(id) => Box::new(PieceResizeState::new(id)),
            Self::PiecePitch(id) => Box::new(PiecePitchRotationState::new(id)),
            Self::PieceRoll(id) => Box::new(PieceRollRotationState::new(id)),
            Self::PieceName(id) => Box::new(PieceNameOffsetState::new(id)),
            Self::CameraYaw => Box::new(CameraYawRotationState::default()),
            Self::CameraPitch => Box::new(CameraPitchRotationState::default()),
            Self::CameraElevation => Box::new(CameraElevationState::default()),
            Self::CompassRotation => Box::new(CompassRotationState::default()),
            Self::CompassResize => Box::new(CompassResizeState::default()),
        }
    }
}

fn middle(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Point in the middle of the wall, on its arc when curved.
#[must_use]
pub fn wall_middle_point(wall: &Wall) -> Point2 {
    match wall.effective_arc_extent() {
        Some(extent) => {
            let center = arc_circle_center(&wall.start, &wall.end, extent);
            let radius = (wall.start - center).norm();
            let angle = (wall.start.y - center.y).atan2(wall.start.x - center.x) - extent / 2.0;
            Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        }
        None => middle(&wall.start, &wall.end),
    }
}

/// Returns the indicator under `point`, when a single editable item is
/// selected.
fn indicator_at(ctx: &StateContext<'_>, point: &Point2) -> Option<Indicator> {
    let &[item] = ctx.plan.selected_items() else {
        return None;
    };
    if !ctx.plan.is_item_editable(item) || !ctx.plan.is_item_at_selected_level(item) {
        return None;
    }
    let margin = ctx.indicator_margin();
    let near = |p: &Point2| (p - point).norm() <= margin;
    match item {
        ItemId::Wall(id) => {
            let wall = ctx.plan.wall(id)?;
            if near(&wall.start) {
                Some(Indicator::WallEnd(id, WallEnd::Start))
            } else if near(&wall.end) {
                Some(Indicator::WallEnd(id, WallEnd::End))
            } else if near(&wall_middle_point(wall)) {
                Some(Indicator::WallArc(id))
            } else {
                None
            }
        }
        ItemId::Room(id) => {
            let room = ctx.plan.room(id)?;
            if let Some(index) = room.point_index_at(point, margin) {
                Some(Indicator::RoomPoint(id, index))
            } else if room.name.is_some() && near(&room.name_location()) {
                Some(Indicator::RoomName(id))
            } else if room.area_visible && near(&room.area_location()) {
                Some(Indicator::RoomArea(id))
            } else {
                None
            }
        }
        ItemId::Polyline(id) => {
            let polyline = ctx.plan.polyline(id)?;
            polyline
                .point_index_at(point, margin)
                .map(|index| Indicator::PolylinePoint(id, index))
        }
        ItemId::DimensionLine(id) => {
            let line = ctx.plan.dimension_line(id)?;
            if line.is_start_at(point, margin) {
                Some(Indicator::DimensionLineEnd(id, true))
            } else if line.is_end_at(point, margin) {
                Some(Indicator::DimensionLineEnd(id, false))
            } else if line.is_middle_point_at(point, margin) {
                Some(Indicator::DimensionLineOffset(id))
            } else {
                None
            }
        }
        ItemId::Label(id) => {
            let label = ctx.plan.label(id)?;
            let bounds = ctx
                .view
                .text_bounds(&label.text, &label.style, &label.location(), label.angle);
            if near(&middle(&bounds[0], &bounds[1])) {
                Some(Indicator::LabelRotation(id))
            } else if label.pitch.is_some() && near(&bounds[2]) {
                Some(Indicator::LabelElevation(id))
            } else {
                None
            }
        }
        ItemId::Piece(id) => piece_indicator_at(ctx, id, point, margin),
        ItemId::Camera => {
            let points = ctx.plan.camera().points();
            if near(&points[0]) || near(&points[1]) {
                Some(Indicator::CameraYaw)
            } else if near(&points[2]) || near(&points[3]) {
                Some(Indicator::CameraPitch)
            } else if near(&ctx.plan.camera().location()) {
                Some(Indicator::CameraElevation)
            } else {
                None
            }
        }
        ItemId::Compass => {
            let compass = ctx.plan.compass();
            if compass.is_rotation_indicator_at(point, margin) {
                Some(Indicator::CompassRotation)
            } else if compass.is_resize_indicator_at(point, margin) {
                Some(Indicator::CompassResize)
            } else {
                None
            }
        }
    }
}

fn piece_indicator_at(ctx: &StateContext<'_>, id: PieceId, point: &Point2, margin: f64) -> Option<Indicator> {
    let piece = ctx.plan.piece(id)?;
    let near = |p: &Point2| (p - point).norm() <= margin;
    let points = piece.points();
    if piece.movable && near(&points[0]) {
        return Some(Indicator::PieceRotation(id));
    }
    if piece.movable && near(&points[1]) {
        return Some(Indicator::PieceElevation(id));
    }
    if piece.resizable && near(&points[3]) {
        return Some(Indicator::PieceHeight(id));
    }
    if piece.resizable && near(&points[2]) {
        return Some(Indicator::PieceResize(id));
    }
    if piece.horizontally_rotatable && !piece.is_door_or_window() {
        if near(&middle(&points[1], &points[2])) {
            return Some(Indicator::PiecePitch(id));
        }
        if near(&middle(&points[2], &points[3])) {
            return Some(Indicator::PieceRoll(id));
        }
    }
    (piece.name_visible && near(&piece.name_location())).then_some(Indicator::PieceName(id))
}

/// Idle state of the selection mode.
#[derive(Debug, Default)]
pub struct SelectionState;

impl ControllerState for SelectionState {
    fn id(&self) -> StateId {
        StateId::Selection
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        let point = ctx.input.mouse;
        let indicator = indicator_at(ctx, &point);
        ctx.view.set_cursor(indicator.map_or(CursorType::Selection, Indicator::cursor));
        ctx.view.set_resize_indicator_visible(indicator.is_some());
        Ok(())
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_resize_indicator_visible(false);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let indicator = indicator_at(ctx, &point);
        ctx.view.set_cursor(indicator.map_or(CursorType::Selection, Indicator::cursor));
        ctx.view.set_resize_indicator_visible(indicator.is_some());
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if ctx.input.click_count != 1 {
            return Ok(None);
        }
        if let Some(indicator) = indicator_at(ctx, &point) {
            return Ok(Some(indicator.state()));
        }
        let margin = ctx.margin();
        if selectable_item_at(ctx.plan, &*ctx.view, &point, margin).is_some() {
            Ok(Some(Box::new(SelectionMoveState::default())))
        } else {
            Ok(Some(Box::new(RectangleSelectionState::default())))
        }
    }
}

/// Moves the selected items with the pointer, or copies of them while
/// duplication is active.
#[derive(Debug, Default)]
pub struct SelectionMoveState {
    clicked: Option<ItemId>,
    selected_before: Vec<ItemId>,
    moved_items: Vec<ItemId>,
    before: Vec<ItemSnapshot>,
    copies: Option<Vec<ItemId>>,
    copies_before: Vec<ItemSnapshot>,
    mouse_moved: bool,
    base_plan: bool,
}

impl SelectionMoveState {
    fn targets(&self) -> &[ItemId] {
        self.copies.as_deref().unwrap_or(&self.moved_items)
    }

    /// Puts the moved items back at their initial place, then moves them by
    /// the current pointer offset.
    fn apply(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        let mut delta: Vector2 = ctx.input.mouse - ctx.input.press;
        if ctx.input.alignment_activated {
            delta = along_main_axis(delta);
        }
        restore_all(ctx.plan, &self.before)?;
        restore_all(ctx.plan, &self.copies_before)?;
        let targets = self.targets().to_vec();
        MoveItems::new(targets.clone(), delta.x, delta.y).execute(ctx.plan)?;
        if ctx.magnetism_enabled() && !ctx.input.alignment_activated {
            if let [ItemId::Piece(id)] = targets.as_slice() {
                magnetize_piece(ctx, *id)?;
            }
        }
        ctx.view.set_cursor(if self.copies.is_some() {
            CursorType::Duplication
        } else {
            CursorType::Move
        });
        Ok(())
    }

    fn duplicate(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        if self.copies.is_some() || self.moved_items.is_empty() {
            return Ok(());
        }
        restore_all(ctx.plan, &self.before)?;
        let copies = ctx.plan.copy_items(&self.moved_items);
        let added = ctx.plan.add_items(&copies);
        self.copies_before = ItemSnapshot::capture_affected(ctx.plan, &added);
        ctx.plan.select_items(added.clone());
        tracing::debug!(count = added.len(), "moved items duplicated");
        self.copies = Some(added);
        self.apply(ctx)
    }

    fn remove_copies(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        let Some(copies) = self.copies.take() else {
            return Ok(());
        };
        for &copy in copies.iter().rev() {
            if ctx.plan.contains_item(copy) {
                delete_item(ctx.plan, copy)?;
            }
        }
        self.copies_before.clear();
        ctx.plan.select_items(self.moved_items.clone());
        Ok(())
    }
}

impl ControllerState for SelectionMoveState {
    fn id(&self) -> StateId {
        StateId::SelectionMove
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        self.base_plan
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        let press = ctx.input.press;
        let margin = ctx.margin();
        self.clicked = selectable_item_at(ctx.plan, &*ctx.view, &press, margin);
        self.selected_before = ctx.plan.selected_items().to_vec();
        if let Some(clicked) = self.clicked {
            if !self.selected_before.contains(&clicked) {
                let selection = if ctx.input.shift_down {
                    let mut selection = self.selected_before.clone();
                    selection.push(clicked);
                    selection
                } else {
                    vec![clicked]
                };
                ctx.plan.select_items(selection);
            }
        }
        self.moved_items = ctx
            .plan
            .selected_items()
            .iter()
            .copied()
            .filter(|&item| ctx.plan.is_item_movable(item) && ctx.plan.is_item_editable(item))
            .collect();
        self.before = ItemSnapshot::capture_affected(ctx.plan, &self.moved_items);
        self.base_plan = self
            .moved_items
            .iter()
            .any(|&item| ctx.plan.is_item_part_of_base_plan(item));
        ctx.view.set_cursor(CursorType::Move);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if point == ctx.input.press && !self.mouse_moved {
            return Ok(None);
        }
        self.mouse_moved = true;
        if ctx.input.duplication_activated && self.copies.is_none() {
            self.duplicate(ctx)?;
        } else {
            self.apply(ctx)?;
        }
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if !self.mouse_moved {
            if let Some(clicked) = self.clicked {
                let selection = if ctx.input.shift_down {
                    let mut selection = self.selected_before.clone();
                    match selection.iter().position(|&item| item == clicked) {
                        Some(index) => {
                            selection.remove(index);
                        }
                        None => selection.push(clicked),
                    }
                    selection
                } else {
                    vec![clicked]
                };
                ctx.plan.select_items(selection);
            }
            return Ok(Some(ctx.mode_state()));
        }
        if let Some(copies) = &self.copies {
            let edit = addition_edit(ctx.plan, "Duplicate", copies, Vec::new());
            ctx.post_edit(edit);
        } else {
            let after: Vec<ItemSnapshot> = self
                .before
                .iter()
                .filter_map(|snapshot| ItemSnapshot::capture(ctx.plan, snapshot.item()))
                .collect();
            if after == self.before {
                tracing::debug!("move without displacement skipped");
            } else {
                ctx.post_edit(modification_edit("Move", self.before.clone(), after));
            }
        }
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.remove_copies(ctx)?;
        restore_all(ctx.plan, &self.before)?;
        ctx.plan.select_items(self.selected_before.clone());
        Ok(Some(ctx.mode_state()))
    }

    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
        if self.mouse_moved {
            self.apply(ctx)?;
        }
        Ok(None)
    }

    fn set_alignment_activated(&mut self, ctx: &mut StateContext<'_>, _activated: bool) -> Result<Transition> {
        if self.mouse_moved {
            self.apply(ctx)?;
        }
        Ok(None)
    }

    fn set_duplication_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        if !self.mouse_moved {
            return Ok(None);
        }
        if activated {
            self.duplicate(ctx)?;
        } else {
            self.remove_copies(ctx)?;
            self.apply(ctx)?;
        }
        Ok(None)
    }
}

/// Selects the items intersecting the rectangle dragged from the press
/// point.
#[derive(Debug, Default)]
pub struct RectangleSelectionState {
    selection_before: Vec<ItemId>,
    mouse_moved: bool,
}

impl ControllerState for RectangleSelectionState {
    fn id(&self) -> StateId {
        StateId::RectangleSelection
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.selection_before = ctx.plan.selected_items().to_vec();
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let press = ctx.input.press;
        self.mouse_moved = true;
        let inside = items_in_rectangle(ctx.plan, &*ctx.view, &press, &point);
        let selection = if ctx.input.shift_down {
            // Shift inverts the selection state of the items in the rectangle.
            let mut selection: Vec<ItemId> = self
                .selection_before
                .iter()
                .copied()
                .filter(|item| !inside.contains(item))
                .collect();
            selection.extend(inside.iter().filter(|item| !self.selection_before.contains(item)));
            selection
        } else {
            inside
        };
        ctx.plan.select_items(selection);
        ctx.view.set_rectangle_feedback(Some((press, point)));
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if !self.mouse_moved && !ctx.input.shift_down {
            ctx.plan.deselect_all();
        }
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        ctx.plan.select_items(self.selection_before.clone());
        Ok(Some(ctx.mode_state()))
    }
}

/// Scrolls the view with the pointer.
#[derive(Debug, Default)]
pub struct PanningState {
    pressed: Option<Point2>,
}

impl ControllerState for PanningState {
    fn id(&self) -> StateId {
        StateId::Panning
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Panning);
        Ok(())
    }

    fn press_mouse(&mut self, _ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        self.pressed = Some(point);
        Ok(None)
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if let Some(pressed) = self.pressed {
            ctx.view.move_view(pressed.x - point.x, pressed.y - point.y);
        }
        Ok(None)
    }

    fn release_mouse(&mut self, _ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.pressed = None;
        Ok(None)
    }

    fn escape(&mut self, _ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.pressed = None;
        Ok(None)
    }
}
