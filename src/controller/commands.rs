//! Commands run outside the state machine, from menus or shortcuts.

use crate::edit::PlanEdit;
use crate::error::{PlanError, Result, StateError};
use crate::math::Point2;
use crate::plan::{ItemId, Plan, PlanItem, WallId};
use crate::topology::{FlipItems, JoinSelectedWalls, ReverseWalls, SplitWall};
use crate::view::PlanView;

use super::plan_controller::PlanController;
use super::snapshot::{addition_edit, delete_items, modification_edit, ItemSnapshot};
use super::states::DragAndDropState;
use super::StateId;

impl<V: PlanView> PlanController<V> {
    fn selected_walls(&self) -> Vec<WallId> {
        self.plan
            .selected_items()
            .iter()
            .filter_map(|item| item.as_wall())
            .collect()
    }

    /// Selected items the base plan lock lets the user change.
    fn editable_selection(&self) -> Vec<ItemId> {
        self.plan
            .selected_items()
            .iter()
            .copied()
            .filter(|&item| self.plan.is_item_editable(item))
            .collect()
    }

    /// Deletes the selected items, except the compass, the camera and the
    /// items of a locked base plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan changes while deleting.
    pub fn delete_selection(&mut self) -> Result<()> {
        if self.state.is_modification_state() {
            return Ok(());
        }
        let items = self.editable_selection();
        if let Some(edit) = delete_items(&mut self.plan, &items, "Delete")? {
            self.plan.deselect_all();
            self.undo.post_edit(edit);
        }
        Ok(())
    }

    /// Selects every viewable item of the selected level. Items of a locked
    /// base plan are left out.
    pub fn select_all(&mut self) {
        let items: Vec<ItemId> = self
            .plan
            .selectable_viewable_items()
            .into_iter()
            .filter(|&item| self.plan.is_item_editable(item))
            .collect();
        self.plan.select_items(items);
    }

    /// Joins the two closest free ends of the selected walls.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected wall disappears while being joined.
    pub fn join_selected_walls(&mut self) -> Result<()> {
        let walls = self.selected_walls();
        if walls.len() < 2 {
            return Ok(());
        }
        let Some(join) = JoinSelectedWalls::new(walls).execute(&mut self.plan)? else {
            return Ok(());
        };
        let redo = join.clone();
        self.undo.post_edit(PlanEdit::new(
            "Join walls",
            move |plan: &mut Plan| Ok(join.undo(plan)?),
            move |plan: &mut Plan| Ok(redo.redo(plan)?),
        ));
        Ok(())
    }

    /// Splits the selected wall in its middle and selects both halves.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall can't be split.
    pub fn split_selected_wall(&mut self) -> Result<()> {
        let walls = self.selected_walls();
        let &[wall] = walls.as_slice() else {
            return Ok(());
        };
        if self.plan.selected_items().len() != 1 {
            return Ok(());
        }
        let split = SplitWall::new(wall, 0.5).execute(&mut self.plan)?;
        let halves = vec![ItemId::Wall(split.first()), ItemId::Wall(split.second())];
        self.plan.select_items(halves.clone());
        let redo = split.clone();
        let selection = vec![ItemId::Wall(split.original())];
        self.undo.post_edit(PlanEdit::new(
            "Split wall",
            move |plan: &mut Plan| {
                split.undo(plan)?;
                plan.select_items(selection.clone());
                Ok(())
            },
            move |plan: &mut Plan| {
                redo.redo(plan)?;
                plan.select_items(halves.clone());
                Ok(())
            },
        ));
        Ok(())
    }

    /// Swaps the start and end of the selected walls.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected wall disappears.
    pub fn reverse_selected_walls(&mut self) -> Result<()> {
        let walls = self.selected_walls();
        if walls.is_empty() {
            return Ok(());
        }
        let undo_walls = walls.clone();
        ReverseWalls::new(walls.clone()).execute(&mut self.plan)?;
        self.undo.post_edit(PlanEdit::new(
            "Reverse walls",
            move |plan: &mut Plan| Ok(ReverseWalls::new(undo_walls.clone()).execute(plan)?),
            move |plan: &mut Plan| Ok(ReverseWalls::new(walls.clone()).execute(plan)?),
        ));
        Ok(())
    }

    /// Mirrors the selected items about the vertical axis of their bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected item disappears.
    pub fn flip_horizontally(&mut self) -> Result<()> {
        self.flip_selection(true, "Flip horizontally")
    }

    /// Mirrors the selected items about the horizontal axis of their bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected item disappears.
    pub fn flip_vertically(&mut self) -> Result<()> {
        self.flip_selection(false, "Flip vertically")
    }

    fn flip_selection(&mut self, horizontal: bool, name: &str) -> Result<()> {
        let items = self.editable_selection();
        if items.is_empty() {
            return Ok(());
        }
        let before = ItemSnapshot::capture_affected(&self.plan, &items);
        FlipItems::new(items, horizontal).execute(&mut self.plan)?;
        let after: Vec<ItemSnapshot> = before
            .iter()
            .filter_map(|snapshot| ItemSnapshot::capture(&self.plan, snapshot.item()))
            .collect();
        self.undo.post_edit(modification_edit(name, before, after));
        Ok(())
    }

    /// Protects the base plan from changes and deselects its items.
    pub fn lock_base_plan(&mut self) {
        if self.plan.is_base_plan_locked() {
            return;
        }
        let selection = self.plan.selected_items().to_vec();
        self.plan.set_base_plan_locked(true);
        let kept: Vec<ItemId> = selection
            .iter()
            .copied()
            .filter(|&item| !self.plan.is_item_part_of_base_plan(item))
            .collect();
        self.plan.select_items(kept.clone());
        self.relock_base_plan = false;
        self.undo.post_edit(PlanEdit::new(
            "Lock base plan",
            move |plan: &mut Plan| {
                plan.set_base_plan_locked(false);
                plan.select_items(selection.clone());
                Ok(())
            },
            move |plan: &mut Plan| {
                plan.set_base_plan_locked(true);
                plan.select_items(kept.clone());
                Ok(())
            },
        ));
    }

    pub fn unlock_base_plan(&mut self) {
        if !self.plan.is_base_plan_locked() {
            return;
        }
        self.plan.set_base_plan_locked(false);
        self.undo.post_edit(PlanEdit::new(
            "Unlock base plan",
            |plan: &mut Plan| {
                plan.set_base_plan_locked(true);
                Ok(())
            },
            |plan: &mut Plan| {
                plan.set_base_plan_locked(false);
                Ok(())
            },
        ));
    }

    /// Reverts the last edit, cancelling the gesture in progress first.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit can't be reverted.
    pub fn undo(&mut self) -> Result<()> {
        if self.state.is_modification_state() {
            self.escape()?;
        }
        if self.undo.undo(&mut self.plan)? {
            self.cache.clear();
        }
        Ok(())
    }

    /// Replays the last undone edit, cancelling the gesture in progress
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit can't be replayed.
    pub fn redo(&mut self) -> Result<()> {
        if self.state.is_modification_state() {
            self.escape()?;
        }
        if self.undo.redo(&mut self.plan)? {
            self.cache.clear();
        }
        Ok(())
    }

    /// Shows `items` under the pointer at `(x, y)` while they are dragged
    /// over the plan. The items are located relative to the pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current gesture can't be cancelled.
    pub fn start_dragged_items(&mut self, items: Vec<PlanItem>, x: f64, y: f64) -> Result<()> {
        if self.state.is_modification_state() {
            self.escape()?;
        }
        self.input.mouse = Point2::new(x, y);
        self.set_state(Box::new(DragAndDropState::new(items)))
    }

    /// Removes the dragged items when the drag leaves the plan.
    ///
    /// # Errors
    ///
    /// Returns `StateError::InvalidControllerState` when no items are being
    /// dragged.
    pub fn stop_dragged_items(&mut self) -> Result<()> {
        let state = self.state.id();
        if state != StateId::DragAndDrop {
            return Err(PlanError::State(StateError::InvalidControllerState {
                operation: "stop_dragged_items",
                state: state.name(),
            }));
        }
        self.escape()
    }

    /// Adds `items` translated by `(x, y)` and selects them.
    ///
    /// # Errors
    ///
    /// Returns an error if the current gesture can't be cancelled.
    pub fn drop_items(&mut self, items: &[PlanItem], x: f64, y: f64) -> Result<()> {
        if self.state.is_modification_state() {
            self.escape()?;
        }
        let mut items = items.to_vec();
        for item in &mut items {
            item.translate(x, y);
        }
        let added = self.plan.add_items(&items);
        if added.is_empty() {
            return Ok(());
        }
        self.plan.select_items(added.clone());
        let edit = addition_edit(&self.plan, "Drop", &added, Vec::new());
        self.undo.post_edit(edit);
        tracing::debug!(count = added.len(), "items dropped");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::Preferences;
    use crate::controller::{PlanController, StateId};
    use crate::error::{PlanError, StateError};
    use crate::math::pt;
    use crate::plan::{ItemId, Piece, PieceCopy, Plan, PlanItem, Wall};
    use crate::view::{HeadlessView, ManualClock};

    fn controller() -> PlanController<HeadlessView> {
        PlanController::new(Plan::new(), HeadlessView::new(1.0), Preferences::default())
            .with_clock(ManualClock::new())
    }

    fn chair() -> PlanItem {
        PlanItem::Piece(PieceCopy {
            piece: Piece::new("chair", 0.0, 0.0, 40.0, 40.0, 90.0),
            children: Vec::new(),
        })
    }

    #[test]
    fn stopping_a_drag_outside_drag_and_drop_is_a_contract_error() {
        let mut controller = controller();
        let error = controller.stop_dragged_items().unwrap_err();
        assert!(matches!(
            error,
            PlanError::State(StateError::InvalidControllerState {
                operation: "stop_dragged_items",
                ..
            })
        ));
    }

    #[test]
    fn stopped_drag_leaves_the_plan_unchanged() {
        let mut controller = controller();
        controller.start_dragged_items(vec![chair()], 300.0, 300.0).unwrap();
        assert_eq!(controller.state_id(), StateId::DragAndDrop);
        assert_eq!(controller.plan().furniture().len(), 1);
        controller.stop_dragged_items().unwrap();
        assert_eq!(controller.state_id(), StateId::Selection);
        assert_eq!(controller.plan().furniture().len(), 0);
        assert!(!controller.can_undo());
    }

    #[test]
    fn dropped_items_are_translated_and_undoable() {
        let mut controller = controller();
        controller.drop_items(&[chair()], 120.0, 80.0).unwrap();
        let (_, piece) = controller.plan().furniture().iter().next().unwrap();
        assert_eq!(piece.center(), pt(120.0, 80.0));
        assert_eq!(controller.plan().selected_items().len(), 1);
        controller.undo().unwrap();
        assert_eq!(controller.plan().furniture().len(), 0);
        controller.redo().unwrap();
        assert_eq!(controller.plan().furniture().len(), 1);
    }

    #[test]
    fn locking_the_base_plan_deselects_its_items() {
        let mut controller = controller();
        let wall = controller
            .plan_mut()
            .add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let chair = controller
            .plan_mut()
            .add_piece(Piece::new("chair", 200.0, 0.0, 40.0, 40.0, 90.0));
        controller
            .plan_mut()
            .select_items(vec![ItemId::Wall(wall), ItemId::Piece(chair)]);
        controller.lock_base_plan();
        assert_eq!(controller.plan().selected_items(), &[ItemId::Piece(chair)]);
        controller.delete_selection().unwrap();
        assert!(controller.plan().wall(wall).is_some());
        assert!(controller.plan().piece(chair).is_none());
        controller.undo().unwrap();
        assert!(controller.plan().piece(chair).is_some());
        controller.undo().unwrap();
        assert!(!controller.plan().is_base_plan_locked());
    }

    #[test]
    fn splitting_selects_both_halves() {
        let mut controller = controller();
        let wall = controller
            .plan_mut()
            .add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        controller.plan_mut().select_items(vec![ItemId::Wall(wall)]);
        controller.split_selected_wall().unwrap();
        assert_eq!(controller.plan().walls().len(), 2);
        assert_eq!(controller.plan().selected_items().len(), 2);
        controller.undo().unwrap();
        assert_eq!(controller.plan().walls().len(), 1);
        assert_eq!(controller.plan().selected_items(), &[ItemId::Wall(wall)]);
    }
}
