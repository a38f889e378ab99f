//! Items dragged from outside the plan, such as pieces picked in a catalog.

use crate::controller::snapshot::{addition_edit, delete_item};
use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::StateId;
use crate::error::Result;
use crate::math::{Point2, Vector2};
use crate::plan::{ItemId, PlanItem};
use crate::topology::MoveItems;
use crate::view::CursorType;

use super::{magnetize_piece, Captured};

/// Shows dragged items in the plan under the pointer until they're dropped
/// or the drag leaves the view.
///
/// The copies are expressed relative to the pointer: they are added
/// translated by its location.
#[derive(Debug)]
pub struct DragAndDropState {
    items: Vec<PlanItem>,
    added: Vec<ItemId>,
    /// Pointer location when the items were added.
    origin: Point2,
    captured: Captured,
}

impl DragAndDropState {
    #[must_use]
    pub fn new(items: Vec<PlanItem>) -> Self {
        Self {
            items,
            added: Vec::new(),
            origin: Point2::origin(),
            captured: Captured::default(),
        }
    }

    fn remove_items(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        for item in self.added.drain(..).rev() {
            delete_item(ctx.plan, item)?;
        }
        ctx.plan.deselect_all();
        Ok(())
    }

    fn move_items_to(&self, ctx: &mut StateContext<'_>, point: Point2) -> Result<()> {
        self.captured.restore(ctx.plan)?;
        let delta: Vector2 = point - self.origin;
        MoveItems::new(self.added.clone(), delta.x, delta.y).execute(ctx.plan)?;
        if ctx.magnetism_enabled() {
            if let [ItemId::Piece(id)] = self.added.as_slice() {
                magnetize_piece(ctx, *id)?;
            }
        }
        Ok(())
    }
}

impl ControllerState for DragAndDropState {
    fn id(&self) -> StateId {
        StateId::DragAndDrop
    }

    fn is_modification_state(&self) -> bool {
        true
    }

    fn is_base_plan_modification_state(&self) -> bool {
        self.items
            .iter()
            .any(|item| !matches!(item, PlanItem::Piece(copy) if !copy.piece.is_part_of_base_plan()))
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
        self.origin = ctx.input.mouse;
        let mut items = self.items.clone();
        for item in &mut items {
            item.translate(self.origin.x, self.origin.y);
        }
        self.added = ctx.plan.add_items(&items);
        self.captured = Captured::new(ctx.plan, &self.added);
        ctx.plan.select_items(self.added.clone());
        ctx.view.set_cursor(CursorType::Move);
        let origin = self.origin;
        self.move_items_to(ctx, origin)?;
        tracing::debug!(count = self.added.len(), "dragged items entered the plan");
        Ok(())
    }

    fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
        self.move_items_to(ctx, point)?;
        Ok(None)
    }

    fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
        if !self.added.is_empty() {
            ctx.plan.select_items(self.added.clone());
            let edit = addition_edit(ctx.plan, "Drop", &self.added, Vec::new());
            ctx.post_edit(edit);
            self.added.clear();
        }
        Ok(Some(ctx.mode_state()))
    }

    fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
        self.remove_items(ctx)?;
        Ok(Some(ctx.mode_state()))
    }

    fn toggle_magnetism(&mut self, ctx: &mut StateContext<'_>, _toggled: bool) -> Result<Transition> {
        let mouse = ctx.input.mouse;
        self.move_mouse(ctx, mouse)
    }
}
