//! Copies of plan items taken before and after a gesture, and the edits
//! built from them.

use crate::edit::PlanEdit;
use crate::error::{Result, TopologyError};
use crate::plan::{
    Camera, Compass, DimensionLine, DimensionLineId, ItemId, Label, LabelId, Piece, PieceId, Plan,
    Polyline, PolylineId, Room, RoomId, Wall, WallId,
};
use crate::topology::detach_wall;

/// Data of one item at a given time.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSnapshot {
    Wall(WallId, Wall),
    Room(RoomId, Room),
    Piece(PieceId, Piece),
    Polyline(PolylineId, Polyline),
    DimensionLine(DimensionLineId, DimensionLine),
    Label(LabelId, Label),
    Compass(Compass),
    Camera(Camera),
}

impl ItemSnapshot {
    /// Copies the current data of `item`.
    #[must_use]
    pub fn capture(plan: &Plan, item: ItemId) -> Option<Self> {
        Some(match item {
            ItemId::Wall(id) => Self::Wall(id, plan.wall(id)?.clone()),
            ItemId::Room(id) => Self::Room(id, plan.room(id)?.clone()),
            ItemId::Piece(id) => Self::Piece(id, plan.piece(id)?.clone()),
            ItemId::Polyline(id) => Self::Polyline(id, plan.polyline(id)?.clone()),
            ItemId::DimensionLine(id) => Self::DimensionLine(id, plan.dimension_line(id)?.clone()),
            ItemId::Label(id) => Self::Label(id, plan.label(id)?.clone()),
            ItemId::Compass => Self::Compass(plan.compass().clone()),
            ItemId::Camera => Self::Camera(plan.camera().clone()),
        })
    }

    /// Copies `items` with everything a change of them may drag along: the
    /// walls joined to their walls and the pieces of their groups.
    #[must_use]
    pub fn capture_affected(plan: &Plan, items: &[ItemId]) -> Vec<Self> {
        affected_items(plan, items)
            .into_iter()
            .filter_map(|item| Self::capture(plan, item))
            .collect()
    }

    #[must_use]
    pub fn item(&self) -> ItemId {
        match self {
            Self::Wall(id, _) => ItemId::Wall(*id),
            Self::Room(id, _) => ItemId::Room(*id),
            Self::Piece(id, _) => ItemId::Piece(*id),
            Self::Polyline(id, _) => ItemId::Polyline(*id),
            Self::DimensionLine(id, _) => ItemId::DimensionLine(*id),
            Self::Label(id, _) => ItemId::Label(*id),
            Self::Compass(_) => ItemId::Compass,
            Self::Camera(_) => ItemId::Camera,
        }
    }

    /// Writes the copied data back in the plan.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` if the plan lost the item.
    pub fn restore(&self, plan: &mut Plan) -> std::result::Result<(), TopologyError> {
        match self {
            Self::Wall(id, wall) => plan.update_wall(*id, |w| w.clone_from(wall)),
            Self::Room(id, room) => plan.update_room(*id, |r| r.clone_from(room)),
            Self::Piece(id, piece) => plan.update_piece(*id, |p| p.clone_from(piece)),
            Self::Polyline(id, polyline) => plan.update_polyline(*id, |p| p.clone_from(polyline)),
            Self::DimensionLine(id, line) => plan.update_dimension_line(*id, |d| d.clone_from(line)),
            Self::Label(id, label) => plan.update_label(*id, |l| l.clone_from(label)),
            Self::Compass(compass) => {
                plan.update_compass(|c| c.clone_from(compass));
                Ok(())
            }
            Self::Camera(camera) => {
                plan.update_camera(|c| c.clone_from(camera));
                Ok(())
            }
        }
    }
}

/// Restores every snapshot in order.
///
/// # Errors
///
/// Returns the first `TopologyError` met.
pub fn restore_all(plan: &mut Plan, snapshots: &[ItemSnapshot]) -> std::result::Result<(), TopologyError> {
    snapshots.iter().try_for_each(|snapshot| snapshot.restore(plan))
}

/// `items` followed by the walls joined to their walls, the groups owning
/// their pieces and the pieces these groups contain.
#[must_use]
pub fn affected_items(plan: &Plan, items: &[ItemId]) -> Vec<ItemId> {
    let mut affected: Vec<ItemId> = Vec::with_capacity(items.len());
    let mut push = |item: ItemId, affected: &mut Vec<ItemId>| {
        if !affected.contains(&item) {
            affected.push(item);
        }
    };
    for &item in items {
        push(item, &mut affected);
    }
    for &item in items {
        match item {
            ItemId::Wall(id) => {
                if let Some(wall) = plan.wall(id) {
                    for neighbour in [wall.wall_at_start, wall.wall_at_end].into_iter().flatten() {
                        push(ItemId::Wall(neighbour), &mut affected);
                    }
                }
            }
            ItemId::Piece(id) => {
                let mut group = plan.piece_group(id);
                while let Some(owner) = group {
                    push(ItemId::Piece(owner), &mut affected);
                    group = plan.piece_group(owner);
                }
                let mut pending = plan.piece(id).map(|p| p.children.clone()).unwrap_or_default();
                while let Some(child) = pending.pop() {
                    push(ItemId::Piece(child), &mut affected);
                    if let Some(piece) = plan.piece(child) {
                        pending.extend(piece.children.iter().copied());
                    }
                }
            }
            _ => {}
        }
    }
    affected
}

/// Edit restoring `before` on undo and `after` on redo.
#[must_use]
pub fn modification_edit(name: &str, before: Vec<ItemSnapshot>, after: Vec<ItemSnapshot>) -> PlanEdit {
    PlanEdit::new(
        name,
        move |plan: &mut Plan| Ok(restore_all(plan, &before)?),
        move |plan: &mut Plan| Ok(restore_all(plan, &after)?),
    )
}

/// Removes an item from the plan and returns its index in the draw order,
/// `None` for a piece owned by a group, which is taken out of its group.
///
/// # Errors
///
/// Returns `TopologyError::ItemNotFound` if the item isn't in the plan.
pub fn delete_item(plan: &mut Plan, item: ItemId) -> std::result::Result<Option<usize>, TopologyError> {
    match item {
        ItemId::Wall(id) => {
            detach_wall(plan, id)?;
            plan.delete_wall(id).map(Some)
        }
        ItemId::Room(id) => plan.delete_room(id).map(Some),
        ItemId::Piece(id) => match plan.piece_group(id) {
            Some(group) => {
                plan.update_piece(group, |g| g.children.retain(|&child| child != id))?;
                plan.discard_detached_piece(id);
                plan.select_items(
                    plan.selected_items()
                        .iter()
                        .copied()
                        .filter(|&selected| selected != item)
                        .collect(),
                );
                Ok(None)
            }
            None => plan.delete_piece(id).map(Some),
        },
        ItemId::Polyline(id) => plan.delete_polyline(id).map(Some),
        ItemId::DimensionLine(id) => plan.delete_dimension_line(id).map(Some),
        ItemId::Label(id) => plan.delete_label(id).map(Some),
        ItemId::Compass | ItemId::Camera => Err(TopologyError::ItemNotFound(item.kind())),
    }
}

/// Puts back an item removed by [`delete_item`] at `index`.
pub fn restore_item(plan: &mut Plan, item: ItemId, index: usize) {
    match item {
        ItemId::Wall(id) => plan.restore_wall(id, index),
        ItemId::Room(id) => plan.restore_room(id, index),
        ItemId::Piece(id) => plan.restore_piece(id, index),
        ItemId::Polyline(id) => plan.restore_polyline(id, index),
        ItemId::DimensionLine(id) => plan.restore_dimension_line(id, index),
        ItemId::Label(id) => plan.restore_label(id, index),
        ItemId::Compass | ItemId::Camera => {}
    }
}

/// Deletes `items` and returns the edit able to bring them back, `None`
/// when none of them could be deleted.
///
/// # Errors
///
/// Returns a `TopologyError` if the plan is changed while deleting.
pub fn delete_items(plan: &mut Plan, items: &[ItemId], name: &str) -> Result<Option<PlanEdit>> {
    let deletable: Vec<ItemId> = items
        .iter()
        .copied()
        .filter(|&item| !matches!(item, ItemId::Compass | ItemId::Camera) && plan.contains_item(item))
        .collect();
    if deletable.is_empty() {
        return Ok(None);
    }
    let affected = affected_items(plan, &deletable);
    let before = ItemSnapshot::capture_affected(plan, &affected);
    let selection = plan.selected_items().to_vec();
    let mut removed: Vec<(ItemId, Option<usize>)> = Vec::with_capacity(deletable.len());
    for &item in &deletable {
        if plan.contains_item(item) {
            removed.push((item, delete_item(plan, item)?));
        }
    }
    let remaining: Vec<ItemId> = affected
        .into_iter()
        .filter(|item| !deletable.contains(item))
        .collect();
    let after: Vec<ItemSnapshot> = remaining
        .iter()
        .filter_map(|&item| ItemSnapshot::capture(plan, item))
        .collect();
    tracing::debug!(count = removed.len(), name, "items deleted");

    let undo_removed = removed.clone();
    let edit = PlanEdit::new(
        name,
        move |plan: &mut Plan| {
            for &(item, index) in undo_removed.iter().rev() {
                match (item, index) {
                    (_, Some(index)) => restore_item(plan, item, index),
                    (ItemId::Piece(id), None) => plan.revive_detached_piece(id),
                    _ => {}
                }
            }
            restore_all(plan, &before)?;
            plan.select_items(selection.clone());
            Ok(())
        },
        move |plan: &mut Plan| {
            for &(item, index) in &removed {
                match (item, index) {
                    (_, Some(_)) => delete_plain(plan, item)?,
                    (ItemId::Piece(id), None) => plan.discard_detached_piece(id),
                    _ => {}
                }
            }
            restore_all(plan, &after)?;
            Ok(())
        },
    );
    Ok(Some(edit))
}

/// Edit for items just added to the plan.
///
/// `modified_before` holds copies of the existing items the addition
/// changed, taken before the change, like a wall the new walls are joined
/// to.
#[must_use]
pub fn addition_edit(plan: &Plan, name: &str, added: &[ItemId], modified_before: Vec<ItemSnapshot>) -> PlanEdit {
    let mut indices: Vec<(ItemId, usize)> = added
        .iter()
        .filter_map(|&item| item_index(plan, item).map(|index| (item, index)))
        .collect();
    indices.sort_by_key(|&(_, index)| index);
    let mut after: Vec<ItemSnapshot> = added
        .iter()
        .filter_map(|&item| ItemSnapshot::capture(plan, item))
        .collect();
    after.extend(
        modified_before
            .iter()
            .filter_map(|snapshot| ItemSnapshot::capture(plan, snapshot.item())),
    );
    let selection_after = plan.selected_items().to_vec();
    let undo_indices = indices.clone();
    PlanEdit::new(
        name,
        move |plan: &mut Plan| {
            for &(item, _) in undo_indices.iter().rev() {
                delete_plain(plan, item)?;
            }
            restore_all(plan, &modified_before)?;
            Ok(())
        },
        move |plan: &mut Plan| {
            for &(item, index) in &indices {
                restore_item(plan, item, index);
            }
            restore_all(plan, &after)?;
            plan.select_items(selection_after.clone());
            Ok(())
        },
    )
}

/// Removes an item from the draw order without touching its joins, which
/// are restored from snapshots by the callers.
fn delete_plain(plan: &mut Plan, item: ItemId) -> std::result::Result<(), TopologyError> {
    match item {
        ItemId::Wall(id) => plan.delete_wall(id).map(drop),
        ItemId::Room(id) => plan.delete_room(id).map(drop),
        ItemId::Piece(id) => plan.delete_piece(id).map(drop),
        ItemId::Polyline(id) => plan.delete_polyline(id).map(drop),
        ItemId::DimensionLine(id) => plan.delete_dimension_line(id).map(drop),
        ItemId::Label(id) => plan.delete_label(id).map(drop),
        ItemId::Compass | ItemId::Camera => Ok(()),
    }
}

fn item_index(plan: &Plan, item: ItemId) -> Option<usize> {
    match item {
        ItemId::Wall(id) => plan.walls().index_of(id),
        ItemId::Room(id) => plan.rooms().index_of(id),
        ItemId::Piece(id) => plan.furniture().index_of(id),
        ItemId::Polyline(id) => plan.polylines().index_of(id),
        ItemId::DimensionLine(id) => plan.dimension_lines().index_of(id),
        ItemId::Label(id) => plan.labels().index_of(id),
        ItemId::Compass | ItemId::Camera => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::topology::{joins_are_consistent, CreateWall, WallEnd};

    #[test]
    fn deleted_wall_comes_back_joined() {
        let mut plan = Plan::new();
        let a = CreateWall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None)
            .execute(&mut plan)
            .unwrap();
        let b = CreateWall::new(pt(400.0, 0.0), pt(400.0, 300.0), 10.0, None)
            .join_start(a, WallEnd::End)
            .execute(&mut plan)
            .unwrap();
        let edit = delete_items(&mut plan, &[ItemId::Wall(b)], "Delete").unwrap().unwrap();
        assert_eq!(plan.wall(a).unwrap().wall_at_end, None);
        assert_eq!(plan.walls().len(), 1);

        edit.undo(&mut plan).unwrap();
        assert_eq!(plan.walls().ids(), &[a, b]);
        assert_eq!(plan.wall(a).unwrap().wall_at_end, Some(b));
        assert!(joins_are_consistent(&plan, &[a, b]));

        edit.redo(&mut plan).unwrap();
        assert_eq!(plan.walls().len(), 1);
        assert_eq!(plan.wall(a).unwrap().wall_at_end, None);
    }

    #[test]
    fn added_items_are_removed_on_undo() {
        let mut plan = Plan::new();
        let a = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(400.0, 0.0), 10.0, None));
        let before = vec![ItemSnapshot::capture(&plan, ItemId::Wall(a)).unwrap()];
        let b = CreateWall::new(pt(400.0, 0.0), pt(400.0, 300.0), 10.0, None)
            .join_start(a, WallEnd::End)
            .execute(&mut plan)
            .unwrap();
        let edit = addition_edit(&plan, "Create walls", &[ItemId::Wall(b)], before);
        edit.undo(&mut plan).unwrap();
        assert_eq!(plan.walls().ids(), &[a]);
        assert_eq!(plan.wall(a).unwrap().wall_at_end, None);
        edit.redo(&mut plan).unwrap();
        assert_eq!(plan.wall(a).unwrap().wall_at_end, Some(b));
        assert!(joins_are_consistent(&plan, &[a, b]));
    }

    #[test]
    fn affected_items_follow_joins_and_groups() {
        let mut plan = Plan::new();
        let chair = plan.insert_detached_piece(Piece::new("chair", 0.0, 0.0, 40.0, 40.0, 80.0));
        let mut group = Piece::new("set", 0.0, 0.0, 80.0, 40.0, 80.0);
        group.children.push(chair);
        let group = plan.add_piece(group);
        let affected = affected_items(&plan, &[ItemId::Piece(group)]);
        assert_eq!(affected, vec![ItemId::Piece(group), ItemId::Piece(chair)]);
        let affected = affected_items(&plan, &[ItemId::Piece(chair)]);
        assert_eq!(affected, vec![ItemId::Piece(chair), ItemId::Piece(group)]);
    }

    #[test]
    fn deleted_group_piece_is_gone_until_undo() {
        let mut plan = Plan::new();
        let chair = plan.insert_detached_piece(Piece::new("chair", 0.0, 0.0, 40.0, 40.0, 80.0));
        let mut group = Piece::new("set", 0.0, 0.0, 80.0, 40.0, 80.0);
        group.children.push(chair);
        let group = plan.add_piece(group);
        let edit = delete_items(&mut plan, &[ItemId::Piece(chair)], "Delete").unwrap().unwrap();
        assert!(plan.piece(chair).is_none());
        assert!(plan.piece(group).unwrap().children.is_empty());

        edit.undo(&mut plan).unwrap();
        assert!(plan.piece(chair).is_some());
        assert_eq!(plan.piece(group).unwrap().children, vec![chair]);

        edit.redo(&mut plan).unwrap();
        assert!(plan.piece(chair).is_none());
    }
}
