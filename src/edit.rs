//! Reversible edits posted by the controller once a gesture is committed.
//!
//! Each edit keeps the closures that revert and replay it on the plan. The
//! controller posts edits through the [`UndoSupport`] trait, so a host
//! application can plug its own ledger in place of [`EditHistory`].

use std::collections::VecDeque;
use std::fmt;

use crate::error::Result;
use crate::plan::Plan;

/// Closure applying one side of an edit.
pub type EditAction = Box<dyn Fn(&mut Plan) -> Result<()>>;

enum EditKind {
    Single { undo: EditAction, redo: EditAction },
    Compound(Vec<PlanEdit>),
}

/// A named change of the plan that can be undone and redone.
pub struct PlanEdit {
    name: String,
    kind: EditKind,
}

impl fmt::Debug for PlanEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("PlanEdit");
        debug.field("name", &self.name);
        if let EditKind::Compound(edits) = &self.kind {
            debug.field("edits", edits);
        }
        debug.finish()
    }
}

impl PlanEdit {
    pub fn new<U, R>(name: impl Into<String>, undo: U, redo: R) -> Self
    where
        U: Fn(&mut Plan) -> Result<()> + 'static,
        R: Fn(&mut Plan) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            kind: EditKind::Single {
                undo: Box::new(undo),
                redo: Box::new(redo),
            },
        }
    }

    /// Groups `edits` in a single edit undone in reverse order.
    #[must_use]
    pub fn compound(name: impl Into<String>, edits: Vec<PlanEdit>) -> Self {
        Self {
            name: name.into(),
            kind: EditKind::Compound(edits),
        }
    }

    /// Presentation name of the edit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reverts the edit.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the undo closures.
    pub fn undo(&self, plan: &mut Plan) -> Result<()> {
        match &self.kind {
            EditKind::Single { undo, .. } => undo(plan),
            EditKind::Compound(edits) => edits.iter().rev().try_for_each(|edit| edit.undo(plan)),
        }
    }

    /// Applies the edit again after an undo.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the redo closures.
    pub fn redo(&self, plan: &mut Plan) -> Result<()> {
        match &self.kind {
            EditKind::Single { redo, .. } => redo(plan),
            EditKind::Compound(edits) => edits.iter().try_for_each(|edit| edit.redo(plan)),
        }
    }
}

/// Ledger receiving the edits committed by the controller.
pub trait UndoSupport {
    /// Records an edit already applied to the plan.
    fn post_edit(&mut self, edit: PlanEdit);

    /// Starts grouping the following edits in one edit.
    fn begin_compound(&mut self, name: &str);

    /// Ends the innermost group started with [`UndoSupport::begin_compound`].
    fn end_compound(&mut self);

    /// Reverts the last edit. Returns `false` when there was none.
    ///
    /// # Errors
    ///
    /// Returns the error raised while reverting the edit.
    fn undo(&mut self, plan: &mut Plan) -> Result<bool>;

    /// Replays the last undone edit. Returns `false` when there was none.
    ///
    /// # Errors
    ///
    /// Returns the error raised while replaying the edit.
    fn redo(&mut self, plan: &mut Plan) -> Result<bool>;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;
}

/// Default number of edits kept by an [`EditHistory`].
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Bounded undo and redo stacks.
#[derive(Debug)]
pub struct EditHistory {
    done: VecDeque<PlanEdit>,
    undone: Vec<PlanEdit>,
    compounds: Vec<(String, Vec<PlanEdit>)>,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Creates a history keeping at most `limit` edits.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            compounds: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Name of the edit the next undo would revert.
    #[must_use]
    pub fn undo_name(&self) -> Option<&str> {
        self.done.back().map(PlanEdit::name)
    }

    /// Name of the edit the next redo would replay.
    #[must_use]
    pub fn redo_name(&self) -> Option<&str> {
        self.undone.last().map(PlanEdit::name)
    }

    fn push_done(&mut self, edit: PlanEdit) {
        if self.done.len() == self.limit {
            self.done.pop_front();
        }
        self.done.push_back(edit);
    }
}

impl UndoSupport for EditHistory {
    fn post_edit(&mut self, edit: PlanEdit) {
        tracing::debug!(name = edit.name(), "edit posted");
        if let Some((_, edits)) = self.compounds.last_mut() {
            edits.push(edit);
            return;
        }
        self.undone.clear();
        self.push_done(edit);
    }

    fn begin_compound(&mut self, name: &str) {
        self.compounds.push((name.to_owned(), Vec::new()));
    }

    fn end_compound(&mut self) {
        let Some((name, edits)) = self.compounds.pop() else {
            tracing::warn!("compound edit ended without being started");
            return;
        };
        if !edits.is_empty() {
            self.post_edit(PlanEdit::compound(name, edits));
        }
    }

    fn undo(&mut self, plan: &mut Plan) -> Result<bool> {
        let Some(edit) = self.done.pop_back() else {
            return Ok(false);
        };
        tracing::debug!(name = edit.name(), "undo");
        edit.undo(plan)?;
        self.undone.push(edit);
        Ok(true)
    }

    fn redo(&mut self, plan: &mut Plan) -> Result<bool> {
        let Some(edit) = self.undone.pop() else {
            return Ok(false);
        };
        tracing::debug!(name = edit.name(), "redo");
        edit.redo(plan)?;
        self.push_done(edit);
        Ok(true)
    }

    fn can_undo(&self) -> bool {
        !self.done.is_empty() && self.compounds.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.undone.is_empty() && self.compounds.is_empty()
    }
}
