//! Label creation mode and the gestures of a selected label.

use crate::controller::snapshot::addition_edit;
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::StateId;
use crate::error::Result;
use crate::math::{direction_angle, normalize_angle, Point2};
use crate::plan::{ItemId, Label, LabelId};
use crate::snap::round_angle;
use crate::view::CursorType;

use super::Captured;

/// Centimeters of elevation per pixel dragged.
const ELEVATION_PER_PIXEL: f64 = 1.0;

/// Idle state of the label creation mode. A click asks the text of a new
/// label placed at the clicked point.
#[derive(Debug, Default)]
pub struct LabelCreationState;

impl ControllerState for LabelCreationState {
    fn id(&self) -> StateId {
        StateId::LabelCreation
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.set_cursor(CursorType::Draw);
        Ok(())
    }

    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        if ctx.input.click_count != 1 {
            return Ok(None);
        }
        let default_text = ctx.preferences.new_label_text.clone();
        let text = ctx.view.request_label_text(&default_text);
        let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
            tracing::debug!("label creation cancelled");
            return Ok(None);
        };
        let mut label = Label::new(text, point.x, point.y);
        label.level = ctx.plan.selected_level();
        let id = ctx.plan.add_label(label);
        ctx.plan.select_items(vec![ItemId::Label(id)]);
        let edit = addition_edit(ctx.plan, "Create label", &[ItemId::Label(id)], Vec::new());
        ctx.post_edit(edit);
        Ok(None)
    }
}

/// Turns the selected label around its location.
#[derive(Debug)]
pub struct LabelRotationState {
    label: LabelId,
    angle: f64,
    press_angle: f64,
    captured: Captured,
}

impl LabelRotationState {
    #[must_use]
    pub fn new(label: LabelId) -> Self {
        Self {
            label,
            angle: 0.0,
            press_angle: 0.0,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for LabelRotationState {
    fn id(&self) -> StateId {
        StateId::LabelRotation
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        if let Some(label) = ctx.plan.label(self.label) {
            self.angle = label.angle;
            self.press_angle = direction_angle(&label.location(), &ctx.input.press);
        }
        self.captured = Captured::new(ctx.plan, &[ItemId::Label(self.label)]);
        ctx.view.set_cursor(CursorType::Rotation);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let Some(label) = ctx.plan.label(self.label) else {
            return Ok(None);
        };
        let mut angle = normalize_angle(self.angle + direction_angle(&label.location(), &point) - self.press_angle);
        if ctx.magnetism_enabled() {
            angle = normalize_angle(round_angle(angle, ctx.preferences.angle_step()));
        }
        ctx.plan.update_label(self.label, |label| label.angle = angle)?;
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Rotate label");
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

/// Raises or lowers the selected label, when it's displayed in 3D.
#[derive(Debug)]
pub struct LabelElevationState {
    label: LabelId,
    elevation: f64,
    captured: Captured,
}

impl LabelElevationState {
    #[must_use]
    pub fn new(label: LabelId) -> Self {
        Self {
            label,
            elevation: 0.0,
            captured: Captured::default(),
        }
    }
}

impl ControllerState for LabelElevationState {
    fn id(&self) -> StateId {
        StateId::LabelElevation
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.elevation = ctx.plan.label(self.label).map_or(0.0, |label| label.elevation);
        self.captured = Captured::new(ctx.plan, &[ItemId::Label(self.label)]);
        ctx.view.set_cursor(CursorType::Elevation);
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        let pixels = (ctx.input.press.y - point.y) / ctx.view.pixel_length();
        let mut elevation = (self.elevation + pixels * ELEVATION_PER_PIXEL).max(0.0);
        if ctx.magnetism_enabled() {
            elevation = ctx.unit().magnetized_length(elevation, ctx.view.pixel_length());
        }
        ctx.plan.update_label(self.label, |label| label.elevation = elevation)?;
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        self.captured.commit(ctx, "Modify label elevation");
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.captured.restore(ctx.plan)?;
        Ok(Some(ctx.mode_state()))
    }
}
