//! Gestures on the indicators of the compass.

use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::StateId;
use crate::error::Result;
use crate::math::{normalize_angle, Point2};
use crate::plan::ItemId;
use crate::snap::round_angle;
use crate::view::CursorType;

use super::Captured;

/// Smallest diameter given to the compass.
const MINIMUM_DIAMETER: f64 = 10.0;

/// Points the north of the compass toward the pointer.
#[derive(Debug, Default)]
pub struct CompassRotationState {
    captured: Captured,
}

impl ControllerState for CompassRotationState {
    fn id(&self) -> StateId {
        StateId::CompassRotation
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::Compass]);
        ctx.view.set_cursor(CursorType::Rotation);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let mut north = normalize_angle(ctx.plan.compass().north_direction_toward(&point));
        if ctx.magnetism_enabled() {
            north = normalize_angle(round_angle(north, ctx.preferences.angle_step()));
        }
        ctx.plan.update_compass(|compass| compass.north_direction = north);
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Rotate compass");
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

/// Resizes the compass so that its edge follows the pointer.
#[derive(Debug, Default)]
pub struct CompassResizeState {
    captured: Captured,
}

impl ControllerState for CompassResizeState {
    fn id(&self) -> StateId {
        StateId::CompassResize
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.captured = Captured::new(ctx.plan, &[ItemId::Compass]);
        ctx.view.set_cursor(CursorType::Resize);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let mut diameter = (2.0 * (point - ctx.plan.compass().center()).norm()).max(MINIMUM_DIAMETER);
        if ctx.magnetism_enabled() {
            diameter = ctx
                .unit()
                .magnetized_length(diameter, ctx.view.pixel_length())
                .max(MINIMUM_DIAMETER);
        }
        ctx.plan.update_compass(|compass| compass.diameter = diameter);
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Resize compass");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }
}
