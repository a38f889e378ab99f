use crate::config::Preferences;
use crate::edit::{EditHistory, UndoSupport};
use crate::error::Result;
use crate::math::Point2;
use crate::plan::Plan;
use crate::rooms::GeometryCache;
use crate::view::{Clock, PlanView, SystemClock};

use super::state::{ControllerState, InputState, StateContext, Transition};
use super::states::{mode_state, SelectionState};
use super::{ControllerEvent, EditableProperty, Mode, StateId};

/// Owner of a plan and of the state machine editing it.
///
/// Input events update the [`InputState`] then go to the active state.
/// When the state answers with another state, the controller exits the
/// first, enters the second, and raises events when the modification flags
/// flip.
pub struct PlanController<V: PlanView> {
    pub(super) plan: Plan,
    pub(super) view: V,
    pub(super) undo: Box<dyn UndoSupport>,
    pub(super) clock: Box<dyn Clock>,
    pub(super) preferences: Preferences,
    pub(super) cache: GeometryCache,
    pub(super) input: InputState,
    pub(super) mode: Mode,
    pub(super) state: Box<dyn ControllerState>,
    pub(super) events: Vec<ControllerEvent>,
    /// Set while a base plan modification state unlocked a locked base
    /// plan, which is locked again once the state is left.
    pub(super) relock_base_plan: bool,
}

impl<V: PlanView> PlanController<V> {
    /// Creates a controller in selection mode, recording its edits in an
    /// [`EditHistory`] and reading the system clock.
    #[must_use]
    pub fn new(plan: Plan, view: V, preferences: Preferences) -> Self {
        Self {
            plan,
            view,
            undo: Box::new(EditHistory::new()),
            clock: Box::new(SystemClock::new()),
            preferences,
            cache: GeometryCache::new(),
            input: InputState::default(),
            mode: Mode::Selection,
            state: Box::new(SelectionState),
            events: Vec::new(),
            relock_base_plan: false,
        }
    }

    /// Records edits in `undo` instead of the default history.
    #[must_use]
    pub fn with_undo_support(mut self, undo: Box<dyn UndoSupport>) -> Self {
        self.undo = undo;
        self
    }

    /// Reads time from `clock`, used to tell double inputs apart.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Gives direct access to the plan. Changes made here aren't undoable.
    pub fn plan_mut(&mut self) -> &mut Plan {
        &mut self.plan
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Identifier of the active state.
    #[must_use]
    pub fn state_id(&self) -> StateId {
        self.state.id()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Returns `true` while the active state changes the plan.
    #[must_use]
    pub fn is_modification_state(&self) -> bool {
        self.state.is_modification_state()
    }

    /// Drains the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Switches to the idle state of `mode`, cancelling the gesture in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the cancelled gesture can't restore the plan.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        if self.state.is_modification_state() {
            self.escape()?;
        }
        self.mode = mode;
        self.set_state(mode_state(mode))?;
        self.events.push(ControllerEvent::ModeChanged(mode));
        tracing::debug!(?mode, "mode changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn press_mouse(
        &mut self,
        x: f64,
        y: f64,
        click_count: u32,
        shift_down: bool,
        duplication_activated: bool,
    ) -> Result<()> {
        let point = Point2::new(x, y);
        self.input.press = point;
        self.input.mouse = point;
        self.input.click_count = click_count;
        self.input.shift_down = shift_down;
        self.input.alignment_activated = shift_down;
        self.input.duplication_activated = duplication_activated;
        self.dispatch(|state, ctx| state.press_mouse(ctx, point))
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn move_mouse(&mut self, x: f64, y: f64) -> Result<()> {
        let point = Point2::new(x, y);
        self.input.mouse = point;
        self.dispatch(|state, ctx| state.move_mouse(ctx, point))
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn release_mouse(&mut self, x: f64, y: f64) -> Result<()> {
        let point = Point2::new(x, y);
        self.input.mouse = point;
        self.dispatch(|state, ctx| state.release_mouse(ctx, point))
    }

    /// Cancels the gesture in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan can't be restored.
    pub fn escape(&mut self) -> Result<()> {
        self.dispatch(|state, ctx| state.escape(ctx))
    }

    /// Inverts the magnetism preference while `toggled` is `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn toggle_magnetism(&mut self, toggled: bool) -> Result<()> {
        self.input.magnetism_toggled = toggled;
        self.dispatch(|state, ctx| state.toggle_magnetism(ctx, toggled))
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn set_alignment_activated(&mut self, activated: bool) -> Result<()> {
        self.input.alignment_activated = activated;
        self.dispatch(|state, ctx| state.set_alignment_activated(ctx, activated))
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn set_duplication_activated(&mut self, activated: bool) -> Result<()> {
        self.input.duplication_activated = activated;
        self.dispatch(|state, ctx| state.set_duplication_activated(ctx, activated))
    }

    /// Starts or stops typing the values of the drawn item.
    ///
    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn set_edition_activated(&mut self, activated: bool) -> Result<()> {
        self.input.edition_activated = activated;
        self.dispatch(|state, ctx| state.set_edition_activated(ctx, activated))
    }

    /// Applies a typed value. `None` stands for a value that couldn't be
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn update_editable_property(&mut self, property: EditableProperty, value: Option<f64>) -> Result<()> {
        self.dispatch(|state, ctx| state.update_editable_property(ctx, property, value))
    }

    /// # Errors
    ///
    /// Returns an error if the active state can't update the plan.
    pub fn zoom(&mut self, factor: f64) -> Result<()> {
        self.dispatch(|state, ctx| state.zoom(ctx, factor))
    }

    /// Borrows the active state and the context it works on.
    pub(super) fn split(&mut self) -> (&mut dyn ControllerState, StateContext<'_>) {
        let Self {
            plan,
            view,
            undo,
            clock,
            preferences,
            cache,
            input,
            mode,
            state,
            ..
        } = self;
        let ctx = StateContext {
            plan,
            view,
            undo: undo.as_mut(),
            cache,
            preferences,
            clock: &**clock,
            input: *input,
            mode: *mode,
        };
        (state.as_mut(), ctx)
    }

    /// Runs `handler` on the active state and applies the transition it
    /// returns.
    pub(super) fn dispatch<F>(&mut self, handler: F) -> Result<()>
    where
        F: FnOnce(&mut dyn ControllerState, &mut StateContext<'_>) -> Result<Transition>,
    {
        let transition = {
            let (state, mut ctx) = self.split();
            handler(state, &mut ctx)?
        };
        match transition {
            Some(next) => self.set_state(next),
            None => Ok(()),
        }
    }

    /// Exits the active state and enters `next`.
    ///
    /// # Errors
    ///
    /// Returns an error if a state can't update the plan.
    pub(super) fn set_state(&mut self, next: Box<dyn ControllerState>) -> Result<()> {
        let was_modifying = self.state.is_modification_state();
        let was_base_plan = self.state.is_base_plan_modification_state();
        {
            let (state, mut ctx) = self.split();
            state.exit(&mut ctx)?;
        }
        let previous = std::mem::replace(&mut self.state, next);
        {
            let (state, mut ctx) = self.split();
            state.enter(&mut ctx)?;
        }
        // Flags are read once entered: some states only know what they
        // modify after looking at the plan.
        let modifying = self.state.is_modification_state();
        let base_plan = self.state.is_base_plan_modification_state();
        if base_plan && !was_base_plan && self.plan.is_base_plan_locked() {
            self.plan.set_base_plan_locked(false);
            self.relock_base_plan = true;
        } else if !base_plan && self.relock_base_plan {
            self.plan.set_base_plan_locked(true);
            self.relock_base_plan = false;
        }
        if modifying != was_modifying {
            self.events.push(ControllerEvent::ModificationStateChanged(modifying));
        }
        if base_plan != was_base_plan {
            self.events
                .push(ControllerEvent::BasePlanModificationStateChanged(base_plan));
        }
        tracing::debug!(
            from = previous.id().name(),
            to = self.state.id().name(),
            "controller state changed"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::{ItemId, Wall};
    use crate::view::{HeadlessView, ManualClock};

    fn controller() -> PlanController<HeadlessView> {
        PlanController::new(Plan::new(), HeadlessView::new(1.0), Preferences::default())
            .with_clock(ManualClock::new())
    }

    #[test]
    fn modification_events_are_raised_on_flips_only() {
        let mut controller = controller();
        controller.set_mode(Mode::WallCreation).unwrap();
        assert_eq!(controller.take_events(), vec![ControllerEvent::ModeChanged(Mode::WallCreation)]);

        controller.press_mouse(0.0, 0.0, 1, false, false).unwrap();
        assert_eq!(controller.state_id(), StateId::WallDrawing);
        let events = controller.take_events();
        assert!(events.contains(&ControllerEvent::ModificationStateChanged(true)));
        assert!(events.contains(&ControllerEvent::BasePlanModificationStateChanged(true)));

        controller.move_mouse(100.0, 0.0).unwrap();
        assert!(controller.take_events().is_empty());

        controller.escape().unwrap();
        assert_eq!(controller.state_id(), StateId::WallCreation);
        assert!(controller
            .take_events()
            .contains(&ControllerEvent::ModificationStateChanged(false)));
    }

    #[test]
    fn locked_base_plan_is_unlocked_during_a_base_plan_gesture() {
        let mut controller = controller();
        controller.plan_mut().set_base_plan_locked(true);
        controller.set_mode(Mode::WallCreation).unwrap();
        controller.press_mouse(0.0, 0.0, 1, false, false).unwrap();
        assert!(!controller.plan().is_base_plan_locked());
        controller.move_mouse(200.0, 0.0).unwrap();
        controller.press_mouse(200.0, 0.0, 1, false, false).unwrap();
        controller.move_mouse(200.0, 100.0).unwrap();
        controller.escape().unwrap();
        assert!(controller.plan().is_base_plan_locked());
        assert_eq!(controller.plan().walls().len(), 1);
    }

    #[test]
    fn changing_mode_cancels_the_gesture_in_progress() {
        let mut controller = controller();
        let id = controller
            .plan_mut()
            .add_wall(Wall::new(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 10.0, None));
        controller.plan_mut().select_items(vec![ItemId::Wall(id)]);
        controller.press_mouse(25.0, 0.0, 1, false, false).unwrap();
        controller.move_mouse(25.0, 40.0).unwrap();
        assert_eq!(controller.state_id(), StateId::SelectionMove);
        controller.set_mode(Mode::Panning).unwrap();
        assert_eq!(controller.state_id(), StateId::Panning);
        let wall = controller.plan().wall(id).unwrap();
        assert_eq!(wall.start, Point2::new(0.0, 0.0));
        assert!(!controller.can_undo());
    }
}
