use crate::config::{LengthUnit, Preferences};
use crate::edit::{PlanEdit, UndoSupport};
use crate::error::Result;
use crate::math::Point2;
use crate::plan::Plan;
use crate::rooms::GeometryCache;
use crate::view::{Clock, PlanView};

use super::states::mode_state;
use super::{EditableProperty, Mode, StateId};

/// State to switch to after an event, `None` to stay in the current one.
pub type Transition = Option<Box<dyn ControllerState>>;

/// Pointer location and modifier keys known when an event is handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Location of the last mouse press.
    pub press: Point2,
    /// Location of the last mouse press or move.
    pub mouse: Point2,
    pub click_count: u32,
    pub shift_down: bool,
    pub alignment_activated: bool,
    pub duplication_activated: bool,
    /// `true` while the user inverts the magnetism preference.
    pub magnetism_toggled: bool,
    pub edition_activated: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            press: Point2::origin(),
            mouse: Point2::origin(),
            click_count: 0,
            shift_down: false,
            alignment_activated: false,
            duplication_activated: false,
            magnetism_toggled: false,
            edition_activated: false,
        }
    }
}

/// Everything a state may read or change while handling an event.
pub struct StateContext<'a> {
    pub plan: &'a mut Plan,
    pub view: &'a mut dyn PlanView,
    pub undo: &'a mut dyn UndoSupport,
    pub cache: &'a mut GeometryCache,
    pub preferences: &'a Preferences,
    pub clock: &'a dyn Clock,
    pub input: InputState,
    pub mode: Mode,
}

impl StateContext<'_> {
    #[must_use]
    pub fn unit(&self) -> LengthUnit {
        self.preferences.unit
    }

    /// Hit and magnetism tolerance converted to centimeters.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.preferences.pixel_margin * self.view.pixel_length()
    }

    /// Tolerance around the indicators of the selected item.
    #[must_use]
    pub fn indicator_margin(&self) -> f64 {
        self.preferences.indicator_pixel_margin * self.view.pixel_length()
    }

    /// Tolerance around free wall ends.
    #[must_use]
    pub fn wall_ends_margin(&self) -> f64 {
        self.preferences.wall_ends_pixel_margin * self.view.pixel_length()
    }

    /// Magnetism preference, inverted while the user toggles it.
    #[must_use]
    pub fn magnetism_enabled(&self) -> bool {
        self.preferences.magnetism_enabled != self.input.magnetism_toggled
    }

    #[must_use]
    pub fn step_count(&self) -> u32 {
        self.preferences.angle_step_count
    }

    /// State of the current mode, where finished gestures return.
    #[must_use]
    pub fn mode_state(&self) -> Box<dyn ControllerState> {
        mode_state(self.mode)
    }

    /// Returns `true` if `last_commit` happened so recently that a new
    /// input is a double click rather than a new point.
    #[must_use]
    pub fn is_double_input(&self, last_commit: Option<u64>) -> bool {
        let now = self.clock.now_ms();
        last_commit.is_some_and(|time| now.saturating_sub(time) <= self.preferences.double_click_delay_ms)
    }

    pub fn post_edit(&mut self, edit: PlanEdit) {
        self.undo.post_edit(edit);
    }
}

/// Behavior of one controller state.
///
/// Handlers return the state the controller must switch to. The default
/// implementations ignore the event.
#[allow(unused_variables)]
pub trait ControllerState {
    fn id(&self) -> StateId;

    /// Returns `true` while the state changes the plan.
    fn is_modification_state(&self) -> bool {
        false
    }

    /// Returns `true` while the state changes items of the base plan.
    fn is_base_plan_modification_state(&self) -> bool {
        false
    }

    /// Sets up the feedback of the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Removes the feedback of the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn exit(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        ctx.view.delete_feedback();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn press_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        Ok(None)
    }

    /// Cancels the gesture and restores what it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be restored.
    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, toggled: bool) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn set_alignment_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn set_duplication_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(None)
    }

    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn set_edition_activated(&mut self, ctx: &mut StateContext<'_>, activated: bool) -> Result<Transition> {
        Ok(None)
    }

    /// Applies a value typed by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn update_editable_property(
        &mut self,
        ctx: &mut StateContext<'_>,
        property: EditableProperty,
        value: Option<f64>,
    ) -> Result<Transition> {
        Ok(None)
    }

    /// Multiplies the view scale by `factor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be updated.
    fn zoom(&mut self, ctx: &mut StateContext<'_>, factor: f64) -> Result<Transition> {
        let scale = (ctx.view.scale() * factor).clamp(MIN_SCALE, MAX_SCALE);
        ctx.view.set_scale(scale);
        Ok(None)
    }
}

/// Smallest scale accepted by [`ControllerState::zoom`].
pub const MIN_SCALE: f64 = 0.01;
/// Largest scale accepted by [`ControllerState::zoom`].
pub const MAX_SCALE: f64 = 10.0;
