//! Dimension line creation mode and the gestures reshaping a selected
//! dimension line.

use crate::controller::snapshot::{addition_edit, delete_item};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::{EditableProperty, StateId};
use crate::error::Result;
use crate::math::{direction_angle, Point2, Vector2};
use crate::plan::{DimensionLine, DimensionLineId, ItemId};
use crate::snap::{point_with_alignment, PointWithAngleMagnetism};
use crate::view::{AlignmentFeedback, CursorType, FeedbackKind};

use super::{point_at, screen_angle_degrees, Captured};

/// Signed distance from the measured segment to `point`, along the offset
/// direction of a dimension line going from `start` to `end`.
fn offset_at(start: &Point2, end: &Point2, point: &Point2) -> f64 {
    let (sin, cos) = direction_angle(start, end).sin_cos();
    (point - start).dot(&Vector2::new(-sin, cos))
}

fn measured_point(ctx: &StateContext<'_>, fixed: &Point2, point: &Point2) -> Point2 {
    if ctx.input.alignment_activated {
        point_with_alignment(fixed, point)
    } else if ctx.magnetism_enabled() {
        PointWithAngleMagnetism::new(fixed, point, ctx.unit(), ctx.margin(), ctx.step_count()).point()
    } else {
        *point
    }
}

/// Idle state of the dimension line creation mode.
#[derive(Debug, Default)]
pub struct DimensionLineCreationState;

impl ControllerState for DimensionLineCreationState {
    fn id(&self) -> StateId {
        StateId::DimensionLineCreation
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Draw);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::DimensionLine,
            item: None,
            point,
            show_point: false,
        }));
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        match ctx.input.click_count {
            1 => Ok(Some(Box::new(DimensionLineDrawingState::default()))),
            2 => {
                measure_wall_at(ctx, &point);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn set_edition_activated(&mut self, _ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(activated.then(|| Box::new(DimensionLineDrawingState::default()) as Box<dyn ControllerState>))
    }
}

/// Adds a dimension line measuring the length of the wall under `point`,
/// drawn on the side of the wall where the user double clicked.
fn measure_wall_at(ctx: &mut StateContext<'_>, point: &Point2) {
    let level = ctx.plan.selected_level();
    let margin = ctx.margin();
    let measured = ctx
        .plan
        .walls()
        .iter()
        .rev()
        .filter(|(_, wall)| ctx.plan.is_wall_at_level(wall, level))
        .find(|(id, _)| ctx.plan.item_contains_point(ItemId::Wall(*id), point, margin))
        .map(|(_, wall)| (wall.start, wall.end, wall.thickness));
    let Some((start, end, thickness)) = measured else {
        return;
    };
    let side = if offset_at(&start, &end, point) >= 0.0 { 1.0 } else { -1.0 };
    let offset = side * (thickness / 2.0 + ctx.preferences.new_dimension_line_offset);
    let mut line = DimensionLine::new(start, end, offset);
    line.level = level;
    let id = ctx.plan.add_dimension_line(line);
    ctx.plan.select_items(vec![ItemId::DimensionLine(id)]);
    let edit = addition_edit(ctx.plan, "Create dimension line", &[ItemId::DimensionLine(id)], Vec::new());
    ctx.post_edit(edit);
}

/// Phase of a dimension line being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    /// The end follows the pointer.
    #[default]
    Length,
    /// The measured segment is fixed and the offset follows the pointer.
    Offset,
}

/// Draws a dimension line: a first click fixes its start, a second its end,
/// a third its offset.
#[derive(Debug, Default)]
pub struct DimensionLineDrawingState {
    start: Point2,
    line: Option<DimensionLineId>,
    phase: Phase,
    last_commit: Option<u64>,
    edition: bool,
}

impl DimensionLineDrawingState {
    fn current(&self, ctx: &StateContext<'_>) -> Option<DimensionLine> {
        ctx.plan.dimension_line(self.line?).cloned()
    }

    fn update_line(&mut self, ctx: &mut StateContext<'_>, end: Point2, offset: f64) -> Result<()> {
        let start = self.start;
        match self.line {
            Some(id) => ctx.plan.update_dimension_line(id, |line| {
                line.start = start;
                line.end = end;
                line.offset = offset;
            })?,
            None => {
                let mut line = DimensionLine::new(start, end, offset);
                line.level = ctx.plan.selected_level();
                self.line = Some(ctx.plan.add_dimension_line(line));
            }
        }
        let mut properties = Vec::with_capacity(5);
        if self.edition {
            properties.push((EditableProperty::X, start.x));
            properties.push((EditableProperty::Y, start.y));
        }
        properties.push((EditableProperty::Length, (end - start).norm()));
        properties.push((EditableProperty::Angle, screen_angle_degrees(&start, &end)));
        properties.push((EditableProperty::Offset, offset));
        ctx.view.set_tool_tip_edited_properties(&properties, &end);
        ctx.view.set_alignment_feedback(Some(AlignmentFeedback {
            kind: FeedbackKind::DimensionLine,
            item: self.line.map(ItemId::DimensionLine),
            point: end,
            show_point: false,
        }));
        Ok(())
    }

    fn validate(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        let Some(id) = self.line else {
            return Ok(Some(ctx.mode_state()));
        };
        if self.current(ctx).is_none_or(|line| line.length() <= 0.0) {
            delete_item(ctx.plan, ItemId::DimensionLine(id))?;
            return Ok(Some(ctx.mode_state()));
        }
        ctx.plan.select_items(vec![ItemId::DimensionLine(id)]);
        let edit = addition_edit(ctx.plan, "Create dimension line", &[ItemId::DimensionLine(id)], Vec::new());
        ctx.post_edit(edit);
        Ok(Some(ctx.mode_state()))
    }

    /// Moves to the next phase, or validates after the offset.
    fn commit(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.last_commit = Some(ctx.clock.now_ms());
        match self.phase {
            Phase::Length if self.current(ctx).is_some_and(|line| line.length() > 0.0) => {
                self.phase = Phase::Offset;
                Ok(None)
            }
            Phase::Length => Ok(None),
            Phase::Offset => self.validate(ctx),
        }
    }
}

impl ControllerState for DimensionLineDrawingState {
    fn id(&self) -> StateId {
        StateId::DimensionLineDrawing
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.start = if ctx.input.edition_activated {
            ctx.input.mouse
        } else {
            ctx.input.press
        };
        ctx.view.set_cursor(CursorType::Draw);
        if ctx.input.edition_activated {
            self.edition = true;
            let end = point_at(&self.start, 100.0, 0.0);
            let offset = ctx.preferences.new_dimension_line_offset;
            self.update_line(ctx, end, offset)?;
        }
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if self.edition {
            return Ok(None);
        }
        match self.phase {
            Phase::Length => {
                let end = measured_point(ctx, &self.start, &point);
                self.update_line(ctx, end, 0.0)?;
            }
            Phase::Offset => {
                if let Some(line) = self.current(ctx) {
                    let offset = offset_at(&line.start, &line.end, &point);
                    self.update_line(ctx, line.end, offset)?;
                }
            }
        }
        Ok(None)
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if ctx.input.click_count >= 2 {
            return self.validate(ctx);
        }
        self.commit(ctx)
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
        // Typed values give the whole line at once.
        self.validate(ctx)
    }

    fn update_editable_property(
        &mut self,
        ctx: &mut StateContext<'_>,
        property: EditableProperty,
        value: Option<f64>,
    ) -> Result<Transition> {
        let Some(line) = self.current(ctx) else {
            return Ok(None);
        };
        let value = property.clamp(value, ctx.unit());
        let length = line.length();
        let angle = screen_angle_degrees(&line.start, &line.end);
        match property {
            EditableProperty::X => {
                self.start.x = value;
                let end = point_at(&self.start, length, angle);
                self.update_line(ctx, end, line.offset)?;
            }
            EditableProperty::Y => {
                self.start.y = value;
                let end = point_at(&self.start, length, angle);
                self.update_line(ctx, end, line.offset)?;
            }
            EditableProperty::Length => self.update_line(ctx, point_at(&self.start, value, angle), line.offset)?,
            EditableProperty::Angle => self.update_line(ctx, point_at(&self.start, length, value), line.offset)?,
            EditableProperty::Offset => self.update_line(ctx, line.end, value)?,
            EditableProperty::Thickness | EditableProperty::ArcExtent => {}
        }
        Ok(None)
    }
}

/// Moves the start or the end of the selected dimension line.
#[derive(Debug)]
pub struct DimensionLineResizeState {
    line: DimensionLineId,
    start: bool,
    captured: Captured,
}

impl DimensionLineResizeState {
    #[must_use]
    pub fn new(line: DimensionLineId, start: bool) -> Self {
        Self {
            line,
            start,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for DimensionLineResizeState {
    fn id(&self) -> StateId {
        StateId::DimensionLineResize
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::DimensionLine(self.line)]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let Some(line) = ctx.plan.dimension_line(self.line).cloned() else {
            return Ok(None);
        };
        // The indicator is drawn on the offset line, not on the measured point.
        let point = point - line.offset_vector();
        let fixed = if self.start { line.end } else { line.start };
        let moved = measured_point(ctx, &fixed, &point);
        if moved == fixed {
            return Ok(None);
        }
        let start = self.start;
        ctx.plan.update_dimension_line(self.line, |line| {
            if start {
                line.start = moved;
            } else {
                line.end = moved;
            }
        })?;
        let properties = [(EditableProperty::Length, (moved - fixed).norm())];
        ctx.view.set_tool_tip_edited_properties(&properties, &moved);
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Resize dimension line");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }
}

/// Moves the selected dimension line away from the segment it measures.
#[derive(Debug)]
pub struct DimensionLineOffsetState {
    line: DimensionLineId,
    captured: Captured,
}

impl DimensionLineOffsetState {
    #[must_use]
    pub fn new(line: DimensionLineId) -> Self {
        Self {
            line,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for DimensionLineOffsetState {
    fn id(&self) -> StateId {
        StateId::DimensionLineOffset
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::DimensionLine(self.line)]);
        ctx.view.set_cursor(CursorType::Height);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let Some(line) = ctx.plan.dimension_line(self.line) else {
            return Ok(None);
        };
        let offset = offset_at(&line.start, &line.end, &point);
        ctx.plan.update_dimension_line(self.line, |line| line.offset = offset)?;
        ctx.view.set_tool_tip_edited_properties(&[(EditableProperty::Offset, offset)], &point);
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Modify dimension line offset");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use approx::assert_relative_eq;

    #[test]
    fn offset_grows_on_the_offset_side_of_the_line() {
        let start = pt(0.0, 0.0);
        let end = pt(100.0, 0.0);
        assert_relative_eq!(offset_at(&start, &end, &pt(40.0, 25.0)), 25.0, epsilon = 1e-9);
        assert_relative_eq!(offset_at(&start, &end, &pt(40.0, -5.0)), -5.0, epsilon = 1e-9);
        let line = DimensionLine::new(start, end, 25.0);
        assert!(line.is_middle_point_at(&pt(50.0, 25.0), 0.1));
    }
}
