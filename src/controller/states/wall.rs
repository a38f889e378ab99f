//! Wall creation mode and the gestures reshaping a selected wall.

use crate::controller::snapshot::{addition_edit, delete_item, ItemSnapshot};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::{EditableProperty, StateId};
use crate::error::Result;
use crate::math::arc_2d::arc_extent_through;
use crate::math::{Point2, Vector2};
use crate::plan::{ItemId, Plan, Wall, WallId};
use crate::rooms::create_walls_around_room;
use crate::snap::{
    point_with_alignment, round_angle, PointMagnetizedToClosestWallOrRoomPoint,
    WallPointWithAngleMagnetism,
};
use crate::topology::{join_walls, move_wall_point, CreateWall, WallEnd};
use crate::view::{AlignmentFeedback, AngleFeedback, CursorType, FeedbackKind};

use super::{point_at, screen_angle_degrees, Captured};

/// Length given to the wall created when the user starts typing values.
const DEFAULT_EDITED_LENGTH: f64 = 100.0;

/// Returns the free end of a wall of the selected level under `point`.
fn free_wall_end_at(plan: &Plan, point: &Point2, margin: f64, ignored: &[WallId]) -> Option<(WallId, WallEnd)> {
    let level = plan.selected_level();
    plan.walls()
        .iter()
        .filter(|(id, wall)| !ignored.contains(id) && plan.is_wall_at_level(wall, level))
        .find_map(|(id, wall)| {
            [WallEnd::Start, WallEnd::End]
                .into_iter()
                .find(|end| end.joined(wall).is_none() && (end.point(wall) - point).norm() <= margin)
                .map(|end| (id, end))
        })
}

fn wall_properties(wall: &Wall, edition: bool) -> Vec<(EditableProperty, f64)> {
    let mut properties = Vec::with_capacity(6);
    if edition {
        properties.push((EditableProperty::X, wall.start.x));
        properties.push((EditableProperty::Y, wall.start.y));
    }
    properties.push((EditableProperty::Length, (wall.end - wall.start).norm()));
    properties.push((EditableProperty::Angle, screen_angle_degrees(&wall.start, &wall.end)));
    properties.push((EditableProperty::Thickness, wall.thickness));
    if edition {
        properties.push((
            EditableProperty::ArcExtent,
            wall.arc_extent.map_or(0.0, f64::to_degrees),
        ));
    }
    properties
}

/// Idle state of the wall creation mode.
#[derive(Debug, Default)]
pub struct WallCreationState;

impl ControllerState for WallCreationState {
    fn id(&self) -> StateId {
        StateId::WallCreation
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Draw);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let feedback = if ctx.magnetism_enabled() {
            let margin = ctx.margin();
            let magnetized = PointMagnetizedToClosestWallOrRoomPoint::new(ctx.plan, ctx.cache, &point, margin, None);
            AlignmentFeedback {
                kind: FeedbackKind::Wall,
                item: None,
                point: magnetized.point(),
                show_point: magnetized.is_magnetized(),
            }
        } else {
            AlignmentFeedback {
                kind: FeedbackKind::Wall,
                item: None,
                point,
                show_point: false,
            }
        };
        ctx.view.set_alignment_feedback(Some(feedback));
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        match ctx.input.click_count {
            1 => Ok(Some(Box::new(WallDrawingState::default()))),
            2 => {
                surround_room_at(ctx, &point)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn set_edition_activated(&mut self, _ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(activated.then(|| Box::new(WallDrawingState::default()) as Box<dyn ControllerState>))
    }
}

/// Surrounds the room under `point` with new walls.
fn surround_room_at(ctx: &mut StateContext<'_>, point: &Point2) -> Result<()> {
    let level = ctx.plan.selected_level();
    let room_points = ctx
        .plan
        .rooms()
        .iter()
        .rev()
        .find(|(_, room)| room.level == level && room.contains_point(point, 0.0))
        .map(|(_, room)| room.points.clone());
    let Some(room_points) = room_points else {
        return Ok(());
    };
    let thickness = ctx.preferences.new_wall_thickness;
    let height = Some(ctx.preferences.new_wall_height);
    let walls = create_walls_around_room(ctx.plan, &room_points, thickness, height)?;
    if walls.is_empty() {
        tracing::debug!("room too small to be surrounded by walls");
        return Ok(());
    }
    let items: Vec<ItemId> = walls.into_iter().map(ItemId::Wall).collect();
    ctx.plan.select_items(items.clone());
    let edit = addition_edit(ctx.plan, "Create walls", &items, Vec::new());
    ctx.post_edit(edit);
    Ok(())
}

/// Draws a chain of joined walls, one wall per click.
#[derive(Debug, Default)]
pub struct WallDrawingState {
    /// Start of the wall following the pointer.
    start: Point2,
    /// Existing wall the first drawn wall starts on.
    joined_at_start: Option<(WallId, WallEnd)>,
    pending: Option<WallId>,
    created: Vec<WallId>,
    modified_before: Vec<ItemSnapshot>,
    last_commit: Option<u64>,
    edition: bool,
}

impl WallDrawingState {
    /// End of the pending wall for a pointer at `point`.
    fn end_point(&self, ctx: &mut StateContext<'_>, point: &Point2) -> Point2 {
        if ctx.input.alignment_activated {
            return point_with_alignment(&self.start, point);
        }
        if !ctx.magnetism_enabled() {
            return *point;
        }
        if let Some(first) = self.closable_first_wall(ctx) {
            if (first.start - point).norm() <= ctx.margin() {
                return first.start;
            }
        }
        let mut ignored = self.created.clone();
        ignored.extend(self.pending);
        if let Some((id, end)) = free_wall_end_at(ctx.plan, point, ctx.wall_ends_margin(), &ignored) {
            if let Some(wall) = ctx.plan.wall(id) {
                return end.point(wall);
            }
        }
        WallPointWithAngleMagnetism::new(
            ctx.plan,
            self.pending,
            &self.start,
            point,
            ctx.unit(),
            ctx.margin(),
            ctx.step_count(),
        )
        .point()
    }

    /// First drawn wall, when the pending wall may close the chain on its
    /// start.
    fn closable_first_wall(&self, ctx: &StateContext<'_>) -> Option<Wall> {
        if self.created.len() < 2 {
            return None;
        }
        let first = ctx.plan.wall(*self.created.first()?)?;
        first.wall_at_start.is_none().then(|| first.clone())
    }

    /// Moves the end of the pending wall, creating it when needed.
    fn update_pending_end(&mut self, ctx: &mut StateContext<'_>, end: Point2) -> Result<()> {
        match self.pending {
            Some(id) => {
                if end != self.start {
                    ctx.plan.update_wall(id, |wall| wall.end = end)?;
                }
            }
            None => {
                if end == self.start {
                    return Ok(());
                }
                let thickness = ctx.preferences.new_wall_thickness;
                let mut create = CreateWall::new(self.start, end, thickness, Some(ctx.preferences.new_wall_height));
                if let Some(&previous) = self.created.last() {
                    create = create.join_start(previous, WallEnd::End);
                } else if let Some((wall, wall_end)) = self.joined_at_start {
                    create = create.join_start(wall, wall_end);
                }
                self.pending = Some(create.execute(ctx.plan)?);
            }
        }
        self.show_feedback(ctx);
        Ok(())
    }

    fn show_feedback(&self, ctx: &mut StateContext<'_>) {
        let Some(wall) = self.pending.and_then(|id| ctx.plan.wall(id)).cloned() else {
            return;
        };
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Wall,
            item: self.pending.map(ItemId::Wall),
            point: wall.end,
            show_point: false,
        }));
        let previous_start = self.created.last().and_then(|&id| ctx.plan.wall(id)).map(|w| w.start);
        ctx.view.set_angle_feedback(Some(AngleFeedback {
            center: wall.start,
            first: previous_start.unwrap_or(wall.start + Vector2::new(1.0, 0.0)),
            second: wall.end,
        }));
        ctx.view
            .set_tool_tip_edited_properties(&wall_properties(&wall, self.edition), &wall.end);
    }

    /// Keeps the pending wall and starts the next one at its end. Returns
    /// `true` when the chain got closed and drawing is over.
    fn commit_pending(&mut self, ctx: &mut StateContext<'_>) -> Result<bool> {
        let Some(id) = self.pending else {
            return Ok(false);
        };
        let Some(wall) = ctx.plan.wall(id).cloned() else {
            return Ok(false);
        };
        let closes = self
            .closable_first_wall(ctx)
            .is_some_and(|first| (first.start - wall.end).norm() <= ctx.margin());
        self.pending = None;
        self.last_commit = Some(ctx.clock.now_ms());
        self.start = wall.end;
        if closes {
            if let Some(&first) = self.created.first() {
                join_walls(ctx.plan, first, WallEnd::Start, id, WallEnd::End)?;
                self.created.push(id);
                return Ok(true);
            }
        }
        self.created.push(id);
        if ctx.magnetism_enabled() {
            let margin = ctx.wall_ends_margin();
            if let Some((other, other_end)) = free_wall_end_at(ctx.plan, &wall.end, margin, &self.created) {
                if let Some(snapshot) = ItemSnapshot::capture(ctx.plan, ItemId::Wall(other)) {
                    self.modified_before.push(snapshot);
                }
                join_walls(ctx.plan, other, other_end, id, WallEnd::End)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn delete_pending(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        if let Some(id) = self.pending.take() {
            delete_item(ctx.plan, ItemId::Wall(id))?;
        }
        Ok(())
    }

    /// Posts the drawn walls as a single edit and selects them.
    fn validate(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.delete_pending(ctx)?;
        if self.created.is_empty() {
            tracing::debug!("no wall drawn");
            return Ok(Some(ctx.mode_state()));
        }
        let items: Vec<ItemId> = self.created.iter().copied().map(ItemId::Wall).collect();
        ctx.plan.select_items(items.clone());
        let edit = addition_edit(ctx.plan, "Create walls", &items, std::mem::take(&mut self.modified_before));
        ctx.post_edit(edit);
        tracing::debug!(count = items.len(), "walls drawn");
        Ok(Some(ctx.mode_state()))
    }

    /// Creates a pending wall the typed values apply to.
    fn start_edition(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.edition = true;
        if self.pending.is_none() {
            let end = point_at(&self.start, DEFAULT_EDITED_LENGTH, 0.0);
            self.update_pending_end(ctx, end)?;
        }
        self.show_feedback(ctx);
        Ok(())
    }
}

impl ControllerState for WallDrawingState {
    fn id(&self) -> StateId {
        StateId::WallDrawing
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
        self.start = point;
        if ctx.magnetism_enabled() {
            let margin = ctx.wall_ends_margin();
            if let Some((id, end)) = free_wall_end_at(ctx.plan, &point, margin, &[]) {
                if let Some(wall) = ctx.plan.wall(id) {
                    self.start = end.point(wall);
                    self.joined_at_start = Some((id, end));
                }
                if let Some(snapshot) = ItemSnapshot::capture(ctx.plan, ItemId::Wall(id)) {
                    self.modified_before.push(snapshot);
                }
            } else {
                let margin = ctx.margin();
                self.start = PointMagnetizedToClosestWallOrRoomPoint::new(ctx.plan, ctx.cache, &point, margin, None)
                    .point();
            }
        }
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
        let end = self.end_point(ctx, &point);
        self.update_pending_end(ctx, end)?;
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if ctx.input.click_count >= 2 {
            return self.validate(ctx);
        }
        if self.commit_pending(ctx)? {
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
        let previous = self.pending.and_then(|id| ctx.plan.wall(id)).cloned();
        if self.commit_pending(ctx)? {
            return self.validate(ctx);
        }
        // The next wall continues with the same length and direction.
        if let Some(previous) = previous {
            let length = (previous.end - previous.start).norm();
            let angle = screen_angle_degrees(&previous.start, &previous.end);
            let end = point_at(&self.start, length, angle);
            self.update_pending_end(ctx, end)?;
            if let Some(id) = self.pending {
                ctx.plan.update_wall(id, |wall| wall.thickness = previous.thickness)?;
            }
        }
        Ok(None)
    }

    fn update_editable_property(
        &mut self,
        ctx: &mut StateContext<'_>,
        property: EditableProperty,
        value: Option<f64>,
    ) -> Result<Transition> {
        let Some(id) = self.pending else {
            return Ok(None);
        };
        let Some(wall) = ctx.plan.wall(id).cloned() else {
            return Ok(None);
        };
        let value = property.clamp(value, ctx.unit());
        let length = (wall.end - wall.start).norm();
        let angle = screen_angle_degrees(&wall.start, &wall.end);
        match property {
            EditableProperty::X | EditableProperty::Y => {
                // The start can only move while it isn't joined to a drawn wall.
                if self.created.is_empty() && self.joined_at_start.is_none() {
                    let delta = if property == EditableProperty::X {
                        Vector2::new(value - wall.start.x, 0.0)
                    } else {
                        Vector2::new(0.0, value - wall.start.y)
                    };
                    self.start = wall.start + delta;
                    ctx.plan.update_wall(id, |w| {
                        w.start += delta;
                        w.end += delta;
                    })?;
                }
            }
            EditableProperty::Length => {
                let end = point_at(&wall.start, value, angle);
                ctx.plan.update_wall(id, |w| w.end = end)?;
            }
            EditableProperty::Angle => {
                let end = point_at(&wall.start, length, value);
                ctx.plan.update_wall(id, |w| w.end = end)?;
            }
            EditableProperty::Thickness => ctx.plan.update_wall(id, |w| w.thickness = value)?,
            EditableProperty::ArcExtent => ctx.plan.update_wall(id, |w| {
                w.arc_extent = (value != 0.0).then(|| value.to_radians());
            })?,
            EditableProperty::Offset => {}
        }
        self.show_feedback(ctx);
        Ok(None)
    }
}

/// Moves one end of the selected wall, dragging the joined wall along.
#[derive(Debug)]
pub struct WallResizeState {
    wall: WallId,
    end: WallEnd,
    fixed: Point2,
    captured: Captured,
}

impl WallResizeState {
    #[must_use]
    pub fn new(wall: WallId, end: WallEnd) -> Self {
        Self {
            wall,
            end,
            fixed: Point2::origin(),
            captured: Captured::default(),
        }
    }
}

impl ControllerState for WallResizeState {
    fn id(&self) -> StateId {
        StateId::WallResize
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        if let Some(wall) = ctx.plan.wall(self.wall) {
            self.fixed = self.end.opposite().point(wall);
        }
        self.captured = Captured::new(ctx.plan, &[ItemId::Wall(self.wall)]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        let moved = if ctx.input.alignment_activated {
            point_with_alignment(&self.fixed, &point)
        } else if ctx.magnetism_enabled() {
            WallPointWithAngleMagnetism::new(
                ctx.plan,
                Some(self.wall),
                &self.fixed,
                &point,
                ctx.unit(),
                ctx.margin(),
                ctx.step_count(),
            )
            .point()
        } else {
            point
        };
        if (moved - self.fixed).norm() <= f64::EPSILON {
            return Ok(None);
        }
        move_wall_point(ctx.plan, self.wall, self.end, moved, &[])?;
        if let Some(wall) = ctx.plan.wall(self.wall).cloned() {
            ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
                kind: FeedbackKind::Wall,
                item: Some(ItemId::Wall(self.wall)),
                point: moved,
                show_point: false,
            }));
            ctx.view
                .set_tool_tip_edited_properties(&wall_properties(&wall, false), &moved);
        }
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Resize wall");
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

    fn set_alignment_activated(&mut self, ctx: &mut StateContext<'_>, _activated: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }
}

/// Bends the selected wall so that it goes through the pointer.
#[derive(Debug)]
pub struct WallArcExtentState {
    wall: WallId,
    captured: Captured,
}

impl WallArcExtentState {
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self {
            wall,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for WallArcExtentState {
    fn id(&self) -> StateId {
        StateId::WallArcExtent
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::Wall(self.wall)]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        let Some(wall) = ctx.plan.wall(self.wall).cloned() else {
            return Ok(None);
        };
        let mut extent = arc_extent_through(&wall.start, &wall.end, &point);
        if ctx.magnetism_enabled() {
            extent = extent
                .map(|e| round_angle(e, 1f64.to_radians()))
                .filter(|e| *e != 0.0);
        }
        ctx.plan.update_wall(self.wall, |w| w.arc_extent = extent)?;
        ctx.view.set_tool_tip_edited_properties(
            &[(EditableProperty::ArcExtent, extent.map_or(0.0, f64::to_degrees))],
            &point,
        );
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Modify arc extent");
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
