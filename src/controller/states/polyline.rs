//! Polyline creation mode and the point dragging of a selected polyline.

use crate::controller::snapshot::{addition_edit, delete_item};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::{EditableProperty, StateId};
use crate::error::Result;
use crate::math::Point2;
use crate::plan::{ItemId, Polyline, PolylineId};
use crate::snap::{point_with_alignment, PointWithAngleMagnetism};
use crate::view::{AlignmentFeedback, CursorType, FeedbackKind};

use super::{point_at, screen_angle_degrees, Captured};

fn polyline_point(ctx: &StateContext<'_>, point: &Point2, previous: Option<&Point2>) -> Point2 {
    let Some(previous) = previous else {
        return *point;
    };
    if ctx.input.alignment_activated {
        point_with_alignment(previous, point)
    } else if ctx.magnetism_enabled() {
        PointWithAngleMagnetism::new(previous, point, ctx.unit(), ctx.margin(), ctx.step_count()).point()
    } else {
        *point
    }
}

/// Idle state of the polyline creation mode.
#[derive(Debug, Default)]
pub struct PolylineCreationState;

impl ControllerState for PolylineCreationState {
    fn id(&self) -> StateId {
        StateId::PolylineCreation
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Draw);
        Ok(())
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if ctx.input.click_count == 1 {
            return Ok(Some(Box::new(PolylineDrawingState::default())));
        }
        Ok(None)
    }

    fn set_edition_activated(&mut self, _ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(activated.then(|| Box::new(PolylineDrawingState::default()) as Box<dyn ControllerState>))
    }
}

/// Draws a polyline, one point per click, until a double click or a click
/// on its first point.
#[derive(Debug, Default)]
pub struct PolylineDrawingState {
    points: Vec<Point2>,
    polyline: Option<PolylineId>,
    last_commit: Option<u64>,
    edition: bool,
}

impl PolylineDrawingState {
    fn moving_point(&self, ctx: &StateContext<'_>) -> Option<Point2> {
        let polyline = ctx.plan.polyline(self.polyline?)?;
        (polyline.points.len() > self.points.len())
            .then(|| polyline.points.last().copied())
            .flatten()
    }

    fn set_moving_point(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<()> {
        let mut points = self.points.clone();
        points.push(point);
        match self.polyline {
            Some(id) => ctx.plan.update_polyline(id, |polyline| polyline.points = points)?,
            None => {
                let mut polyline = Polyline::new(points, ctx.preferences.new_polyline_thickness);
                polyline.level = ctx.plan.selected_level();
                self.polyline = Some(ctx.plan.add_polyline(polyline));
            }
        }
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Polyline,
            item: self.polyline.map(ItemId::Polyline),
            point,
            show_point: false,
        }));
        if let Some(previous) = self.points.last() {
            let properties = [
                (EditableProperty::Length, (point - previous).norm()),
                (EditableProperty::Angle, screen_angle_degrees(previous, &point)),
            ];
            ctx.view.set_tool_tip_edited_properties(&properties, &point);
        }
        Ok(())
    }

    /// Fixes the moving point. Returns `true` when it lands on the first
    /// point and closes the polyline.
    fn commit_point(&mut self, ctx: &mut StateContext<'_>) -> Result<bool> {
        let Some(point) = self.moving_point(ctx) else {
            return Ok(false);
        };
        self.last_commit = Some(ctx.clock.now_ms());
        if self.points.len() >= 3 && self.points.first().is_some_and(|first| (first - point).norm() <= ctx.margin()) {
            if let Some(id) = self.polyline {
                ctx.plan.update_polyline(id, |polyline| polyline.closed = true)?;
            }
            return Ok(true);
        }
        self.points.push(point);
        Ok(false)
    }

    fn validate(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        let Some(id) = self.polyline else {
            return Ok(Some(ctx.mode_state()));
        };
        if self.points.len() < 2 {
            delete_item(ctx.plan, ItemId::Polyline(id))?;
            return Ok(Some(ctx.mode_state()));
        }
        let points = self.points.clone();
        ctx.plan.update_polyline(id, |polyline| polyline.points = points)?;
        ctx.plan.select_items(vec![ItemId::Polyline(id)]);
        let edit = addition_edit(ctx.plan, "Create polyline", &[ItemId::Polyline(id)], Vec::new());
        ctx.post_edit(edit);
        Ok(Some(ctx.mode_state()))
    }
}

impl ControllerState for PolylineDrawingState {
    fn id(&self) -> StateId {
        StateId::PolylineDrawing
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.points.push(if ctx.input.edition_activated {
            ctx.input.mouse
        } else {
            ctx.input.press
        });
        ctx.view.set_cursor(CursorType::Draw);
        if ctx.input.edition_activated {
            self.edition = true;
            let first = self.points[0];
            self.set_moving_point(ctx, point_at(&first, 100.0, 0.0))?;
        }
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if !self.edition {
            let moved = polyline_point(ctx, &point, self.points.last());
            self.set_moving_point(ctx, moved)?;
        }
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

    fn set_alignment_activated(&mut self, ctx: &mut StateContext<'_>, _activated: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }

    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }

    fn set_edition_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        if activated {
            self.edition = true;
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
        match property {
            EditableProperty::Length => {
                let angle = screen_angle_degrees(&previous, &moving);
                self.set_moving_point(ctx, point_at(&previous, value, angle))?;
            }
            EditableProperty::Angle => {
                let length = (moving - previous).norm();
                self.set_moving_point(ctx, point_at(&previous, length, value))?;
            }
            _ => {}
        }
        Ok(None)
    }
}

/// Moves one point of the selected polyline.
#[derive(Debug)]
pub struct PolylineResizeState {
    polyline: PolylineId,
    index: usize,
    captured: Captured,
}

impl PolylineResizeState {
    #[must_use]
    pub fn new(polyline: PolylineId, index: usize) -> Self {
        Self {
            polyline,
            index,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for PolylineResizeState {
    fn id(&self) -> StateId {
        StateId::PolylineResize
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::Polyline(self.polyline)]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let Some(polyline) = ctx.plan.polyline(self.polyline) else {
            return Ok(None);
        };
        let previous = match self.index {
            0 if polyline.closed => polyline.points.last().copied(),
            0 => polyline.points.get(1).copied(),
            index => polyline.points.get(index - 1).copied(),
        };
        let moved = polyline_point(ctx, &point, previous.as_ref());
        let index = self.index;
        ctx.plan.update_polyline(self.polyline, |polyline| {
            if let Some(p) = polyline.points.get_mut(index) {
                *p = moved;
            }
        })?;
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::Polyline,
            item: Some(ItemId::Polyline(self.polyline)),
            point: moved,
            show_point: false,
        }));
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Resize polyline");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }
}
