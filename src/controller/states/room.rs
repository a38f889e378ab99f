//! Room creation mode and the gestures reshaping a selected room.

use crate::controller::snapshot::{addition_edit, delete_item};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::{EditableProperty, StateId};
use crate::error::Result;
use crate::math::{Point2, Vector2};
use crate::plan::{ItemId, Room, RoomId};
use crate::rooms::create_room_at;
use crate::snap::{point_with_alignment, PointMagnetizedToClosestWallOrRoomPoint, PointWithAngleMagnetism};
use crate::view::{AlignmentFeedback, AngleFeedback, CursorType, FeedbackKind};

use super::{point_at, screen_angle_degrees, Captured};

/// Length of the side created when the user starts typing values.
const DEFAULT_EDITED_LENGTH: f64 = 100.0;

/// Point of a room outline for a pointer at `point`, magnetized toward wall
/// and room points, or by angle around `previous`.
fn room_point(
    ctx: &mut StateContext<'_>,
    point: &Point2,
    previous: Option<&Point2>,
    edited: Option<(RoomId, usize)>,
) -> Point2 {
    if ctx.input.alignment_activated {
        if let Some(previous) = previous {
            return point_with_alignment(previous, point);
        }
    }
    if !ctx.magnetism_enabled() {
        return *point;
    }
    let margin = ctx.margin();
    let closest = PointMagnetizedToClosestWallOrRoomPoint::new(ctx.plan, ctx.cache, point, margin, edited);
    if closest.is_magnetized() {
        return closest.point();
    }
    match previous {
        Some(previous) => {
            PointWithAngleMagnetism::new(previous, point, ctx.unit(), margin, ctx.step_count()).point()
        }
        None => *point,
    }
}

/// Idle state of the room creation mode.
#[derive(Debug, Default)]
pub struct RoomCreationState;

impl ControllerState for RoomCreationState {
    fn id(&self) -> StateId {
        StateId::RoomCreation
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Draw);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let magnetized = room_point(ctx, &point, None, None);
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Room,
            item: None,
            point: magnetized,
            show_point: magnetized != point,
        }));
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        match ctx.input.click_count {
            1 => Ok(Some(Box::new(RoomDrawingState::default()))),
            2 => {
                create_room_from_walls_at(ctx, &point);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn set_edition_activated(&mut self, _ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(activated.then(|| Box::new(RoomDrawingState::default()) as Box<dyn ControllerState>))
    }
}

/// Adds the room enclosed by the walls around `point`.
fn create_room_from_walls_at(ctx: &mut StateContext<'_>, point: &Point2) {
    let Some(mut room) = create_room_at(ctx.plan, ctx.cache, point) else {
        tracing::debug!(x = point.x, y = point.y, "no closed walls around point");
        return;
    };
    room.floor_visible = ctx.preferences.new_room_floor_visible;
    room.ceiling_visible = ctx.preferences.new_room_ceiling_visible;
    let id = ctx.plan.add_room(room);
    ctx.plan.select_items(vec![ItemId::Room(id)]);
    let edit = addition_edit(ctx.plan, "Create room", &[ItemId::Room(id)], Vec::new());
    ctx.post_edit(edit);
}

/// Traces a room outline, one point per click.
#[derive(Debug, Default)]
pub struct RoomDrawingState {
    /// Points fixed by a click.
    points: Vec<Point2>,
    /// Room drawn so far, its last point following the pointer.
    room: Option<RoomId>,
    last_commit: Option<u64>,
    edition: bool,
}

impl RoomDrawingState {
    fn moving_point(&self, ctx: &StateContext<'_>) -> Option<Point2> {
        let room = ctx.plan.room(self.room?)?;
        (room.points.len() > self.points.len()).then(|| room.points.last().copied()).flatten()
    }

    fn set_moving_point(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<()> {
        if self.points.last() == Some(&point) {
            return Ok(());
        }
        let mut points = self.points.clone();
        points.push(point);
        match self.room {
            Some(id) => ctx.plan.update_room(id, |room| room.points = points)?,
            None => {
                let mut room = Room::new(points);
                room.level = ctx.plan.selected_level();
                room.floor_visible = ctx.preferences.new_room_floor_visible;
                room.ceiling_visible = ctx.preferences.new_room_ceiling_visible;
                self.room = Some(ctx.plan.add_room(room));
            }
        }
        self.show_feedback(ctx, point);
        Ok(())
    }

    fn show_feedback(&self, ctx: &mut StateContext<'_>, point: Point2) {
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Room,
            item: self.room.map(ItemId::Room),
            point,
            show_point: false,
        }));
        let count = self.points.len();
        if let Some(previous) = self.points.last().copied() {
            let before_previous = count
                .checked_sub(2)
                .map_or(previous + Vector2::new(1.0, 0.0), |index| self.points[index]);
            ctx.view.set_angle_feedback(Some(AngleFeedback {
                center: previous,
                first: before_previous,
                second: point,
            }));
            let mut properties = Vec::with_capacity(4);
            if self.edition && count == 1 {
                properties.push((EditableProperty::X, previous.x));
                properties.push((EditableProperty::Y, previous.y));
            }
            properties.push((EditableProperty::Length, (point - previous).norm()));
            properties.push((EditableProperty::Angle, screen_angle_degrees(&previous, &point)));
            ctx.view.set_tool_tip_edited_properties(&properties, &point);
        }
    }

    /// Fixes the moving point. Returns `true` when it closes the outline.
    fn commit_point(&mut self, ctx: &mut StateContext<'_>) -> Result<bool> {
        let Some(point) = self.moving_point(ctx) else {
            return Ok(false);
        };
        self.last_commit = Some(ctx.clock.now_ms());
        let closes = self.points.len() >= 3
            && self.points.first().is_some_and(|first| (first - point).norm() <= ctx.margin());
        if closes {
            return Ok(true);
        }
        self.points.push(point);
        if let Some(id) = self.room {
            let points = self.points.clone();
            ctx.plan.update_room(id, |room| room.points = points)?;
        }
        Ok(false)
    }

    /// Keeps the fixed points as a room, or drops the room when it has less
    /// than three points.
    fn validate(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        let Some(id) = self.room else {
            return Ok(Some(ctx.mode_state()));
        };
        if self.points.len() < 3 {
            delete_item(ctx.plan, ItemId::Room(id))?;
            tracing::debug!("room with less than 3 points dropped");
            return Ok(Some(ctx.mode_state()));
        }
        let points = self.points.clone();
        ctx.plan.update_room(id, |room| room.points = points)?;
        ctx.plan.select_items(vec![ItemId::Room(id)]);
        let edit = addition_edit(ctx.plan, "Create room", &[ItemId::Room(id)], Vec::new());
        ctx.post_edit(edit);
        Ok(Some(ctx.mode_state()))
    }

    fn start_edition(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.edition = true;
        if self.moving_point(ctx).is_none() {
            if let Some(last) = self.points.last().copied() {
                self.set_moving_point(ctx, point_at(&last, DEFAULT_EDITED_LENGTH, 0.0))?;
            }
        }
        Ok(())
    }
}

impl ControllerState for RoomDrawingState {
    fn id(&self) -> StateId {
        StateId::RoomDrawing
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        let point = if ctx.input.edition_activated {
            ctx.input.mouse
        } else {
            ctx.input.press
        };
        let first = room_point(ctx, &point, None, None);
        self.points.push(first);
        ctx.view.set_cursor(CursorType::Draw);
        if ctx.input.edition_activated {
            self.start_edition(ctx)?;
        }
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if self.edition {
            return Ok(None);
        }
        let previous = self.points.last().copied();
        let edited = self.room.map(|id| (id, self.points.len()));
        let moved = room_point(ctx, &point, previous.as_ref(), edited);
        self.set_moving_point(ctx, moved)?;
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if ctx.input.click_count >= 2 || self.commit_point(ctx)? {
            return self.validate(ctx);
        }
        Ok(None)
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.validate(ctx)
    }

    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }

    fn set_alignment_activated(&mut self, ctx: &mut StateContext<'_>, _activated: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }

    fn set_edition_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        if activated {
            self.start_edition(ctx)?;
            return Ok(None);
        }
        if ctx.is_double_input(self.last_commit) {
            return self.validate(ctx);
        }
        let previous = self.points.last().copied();
        let moving = self.moving_point(ctx);
        if self.commit_point(ctx)? {
            return self.validate(ctx);
        }
        // The next side continues with the same length and direction.
        if let (Some(previous), Some(moving)) = (previous, moving) {
            let next = point_at(&moving, (moving - previous).norm(), screen_angle_degrees(&previous, &moving));
            self.set_moving_point(ctx, next)?;
        }
        Ok(None)
    }

    fn update_editable_property(
        &mut self,
        ctx: &mut StateContext<'_>,
        property: EditableProperty,
        value: Option<f64>,
    ) -> Result<Transition> {
        let (Some(previous), Some(moving)) = (self.points.last().copied(), self.moving_point(ctx)) else {
            return Ok(None);
        };
        let value = property.clamp(value, ctx.unit());
        let length = (moving - previous).norm();
        let angle = screen_angle_degrees(&previous, &moving);
        match property {
            EditableProperty::X | EditableProperty::Y if self.points.len() == 1 => {
                let delta = if property == EditableProperty::X {
                    Vector2::new(value - previous.x, 0.0)
                } else {
                    Vector2::new(0.0, value - previous.y)
                };
                self.points[0] = previous + delta;
                self.set_moving_point(ctx, moving + delta)?;
            }
            EditableProperty::Length => self.set_moving_point(ctx, point_at(&previous, value, angle))?,
            EditableProperty::Angle => self.set_moving_point(ctx, point_at(&previous, length, value))?,
            _ => {}
        }
        Ok(None)
    }
}

/// Moves one point of the selected room.
#[derive(Debug)]
pub struct RoomResizeState {
    room: RoomId,
    index: usize,
    captured: Captured,
}

impl RoomResizeState {
    #[must_use]
    pub fn new(room: RoomId, index: usize) -> Self {
        Self {
            room,
            index,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for RoomResizeState {
    fn id(&self) -> StateId {
        StateId::RoomResize
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::Room(self.room)]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        let Some(room) = ctx.plan.room(self.room) else {
            return Ok(None);
        };
        let count = room.points.len();
        if self.index >= count {
            return Ok(None);
        }
        let previous = room.points[(self.index + count - 1) % count];
        let moved = room_point(ctx, &point, Some(&previous), Some((self.room, self.index)));
        let index = self.index;
        ctx.plan.update_room(self.room, |room| room.points[index] = moved)?;
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Room,
            item: Some(ItemId::Room(self.room)),
            point: moved,
            show_point: moved != point,
        }));
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Resize room");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }

    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }
}

/// Which text of a room an offset state moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomText {
    Name,
    Area,
}

/// Moves a room text with the pointer.
#[derive(Debug)]
struct RoomTextOffset {
    room: RoomId,
    text: RoomText,
    offset: Vector2,
    captured: Captured,
}

impl RoomTextOffset {
    fn new(room: RoomId, text: RoomText) -> Self {
        Self {
            room,
            text,
            offset: Vector2::zeros(),
            captured: Captured::default(),
        }
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(room) = ctx.plan.room(self.room) {
            self.offset = match self.text {
                RoomText::Name => room.name_offset,
                RoomText::Area => room.area_offset,
            };
        }
        self.captured = Captured::new(ctx.plan, &[ItemId::Room(self.room)]);
        ctx.view.set_cursor(CursorType::Move);
    }

    fn move_mouse(&self, ctx: &mut StateContext<'_>, point: Point2) -> Result<()> {
        let offset = self.offset + (point - ctx.input.press);
        let text = self.text;
        ctx.plan.update_room(self.room, |room| match text {
            RoomText::Name => room.name_offset = offset,
            RoomText::Area => room.area_offset = offset,
        })?;
        Ok(())
    }
}

/// Moves the name of the selected room.
#[derive(Debug)]
pub struct RoomNameOffsetState(RoomTextOffset);

impl RoomNameOffsetState {
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self(RoomTextOffset::new(room, RoomText::Name))
    }
}

/// Moves the area text of the selected room.
#[derive(Debug)]
pub struct RoomAreaOffsetState(RoomTextOffset);

impl RoomAreaOffsetState {
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self(RoomTextOffset::new(room, RoomText::Area))
    }
}

macro_rules! room_text_state {
    ($state:ty, $id:ident, $edit:literal) => {
        impl ControllerState for $state {
            fn id(&self) -> StateId {
                StateId::$id
            }

            fn is_modification_state(&self) -> bool {
                true
            }

            fn is_base_plan_modification_state(&self) -> bool {
                true
            }

            fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
                self.0.enter(ctx);
                Ok(())
            }

            fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
                self.0.move_mouse(ctx, point)?;
                Ok(None)
            }

            fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
                self.0.captured.commit(ctx, $edit);
                Ok(Some(ctx.mode_state()))
            }

            fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
                self.0.captured.restore(ctx.plan)?;
                Ok(Some(ctx.mode_state()))
            }
        }
    };
}

room_text_state!(RoomNameOffsetState, RoomNameOffset, "Move room name");
room_text_state!(RoomAreaOffsetState, RoomAreaOffset, "Move room area");
