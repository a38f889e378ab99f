//! Plan data model.
//!
//! A [`Plan`] owns one [`ItemStore`] per item kind. Every mutation goes
//! through a `Plan` method, which bumps the revision counter of the mutated
//! kind and calls the registered change hooks synchronously, so caches and
//! listeners never miss a change made in the same turn.

pub mod camera;
pub mod compass;
pub mod dimension_line;
pub mod furniture;
pub mod item;
pub mod label;
pub mod level;
pub mod polyline;
pub mod room;
pub mod selection;
pub mod store;
pub mod wall;

use std::fmt;

use crate::error::TopologyError;
use crate::math::Point2;

pub use camera::Camera;
pub use compass::Compass;
pub use dimension_line::{DimensionLine, DimensionLineId};
pub use furniture::{DoorOrWindow, Piece, PieceId};
pub use item::{ItemId, PieceCopy, PlanItem, Selectable};
pub use label::{Label, LabelId, TextAlignment, TextStyle};
pub use level::{Level, LevelId};
pub use polyline::{Polyline, PolylineId};
pub use room::{Room, RoomId};
pub use selection::Selection;
pub use store::ItemStore;
pub use wall::{Baseboard, Wall, WallId, WallSide};

/// Default height of walls without their own height.
pub const DEFAULT_WALL_HEIGHT: f64 = 250.0;

/// Change notified to the plan hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanChange {
    ItemAdded(ItemId),
    ItemDeleted(ItemId),
    ItemUpdated(ItemId),
    SelectionChanged,
    LevelChanged,
    SelectedLevelChanged,
    BasePlanLockChanged(bool),
}

/// Counters bumped by every mutation of the matching item kind.
///
/// Derived data computed from the plan stores the counters it was built
/// with and is stale as soon as one of them differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revisions {
    pub walls: u64,
    pub rooms: u64,
    pub furniture: u64,
    pub levels: u64,
    pub others: u64,
    pub selection: u64,
}

type ChangeHook = Box<dyn FnMut(&PlanChange)>;

/// The edited plan: walls, rooms, furniture, polylines, dimension lines,
/// labels, levels, the compass and the observer camera.
pub struct Plan {
    walls: ItemStore<WallId, Wall>,
    rooms: ItemStore<RoomId, Room>,
    furniture: ItemStore<PieceId, Piece>,
    polylines: ItemStore<PolylineId, Polyline>,
    dimension_lines: ItemStore<DimensionLineId, DimensionLine>,
    labels: ItemStore<LabelId, Label>,
    levels: ItemStore<LevelId, Level>,
    selected_level: Option<LevelId>,
    compass: Compass,
    camera: Camera,
    selection: Selection,
    base_plan_locked: bool,
    wall_height: f64,
    revisions: Revisions,
    hooks: Vec<ChangeHook>,
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("walls", &self.walls.len())
            .field("rooms", &self.rooms.len())
            .field("furniture", &self.furniture.len())
            .field("polylines", &self.polylines.len())
            .field("dimension_lines", &self.dimension_lines.len())
            .field("labels", &self.labels.len())
            .field("levels", &self.levels.len())
            .field("selection", &self.selection)
            .field("base_plan_locked", &self.base_plan_locked)
            .field("revisions", &self.revisions)
            .finish_non_exhaustive()
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! item_accessors {
    (
        $field:ident, $id:ty, $item:ty, $variant:ident, $revision:ident, $kind:literal,
        $get:ident, $add:ident, $delete:ident, $restore:ident, $update:ident
    ) => {
        #[doc = concat!("Returns the ", $kind, " data, `None` once it's deleted.")]
        #[must_use]
        pub fn $get(&self, id: $id) -> Option<&$item> {
            self.$field.get(id)
        }

        #[doc = concat!("Adds a ", $kind, " at the end of the draw order.")]
        pub fn $add(&mut self, item: $item) -> $id {
            let id = self.$field.insert(item);
            self.revisions.$revision += 1;
            self.notify(PlanChange::ItemAdded(ItemId::$variant(id)));
            id
        }

        #[doc = concat!("Removes a ", $kind, " from the plan and the selection.")]
        ///
        /// Returns the former index of the item, to restore it on undo.
        ///
        /// # Errors
        ///
        /// Returns `TopologyError::ItemNotFound` if the item isn't in the plan.
        pub fn $delete(&mut self, id: $id) -> Result<usize, TopologyError> {
            let index = self
                .$field
                .remove(id)
                .ok_or(TopologyError::ItemNotFound($kind))?;
            self.revisions.$revision += 1;
            self.deselect(ItemId::$variant(id));
            self.notify(PlanChange::ItemDeleted(ItemId::$variant(id)));
            Ok(index)
        }

        #[doc = concat!("Puts back a deleted ", $kind, " at `index`.")]
        pub fn $restore(&mut self, id: $id, index: usize) {
            self.$field.restore(id, index);
            self.revisions.$revision += 1;
            self.notify(PlanChange::ItemAdded(ItemId::$variant(id)));
        }

        #[doc = concat!("Applies `update` to a ", $kind, ".")]
        ///
        /// # Errors
        ///
        /// Returns `TopologyError::ItemNotFound` for an unknown id.
        pub fn $update<F>(&mut self, id: $id, update: F) -> Result<(), TopologyError>
        where
            F: FnOnce(&mut $item),
        {
            let item = self
                .$field
                .get_mut(id)
                .ok_or(TopologyError::ItemNotFound($kind))?;
            update(item);
            self.revisions.$revision += 1;
            self.notify(PlanChange::ItemUpdated(ItemId::$variant(id)));
            Ok(())
        }
    };
}

impl Plan {
    /// Creates an empty plan without levels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            walls: ItemStore::new(),
            rooms: ItemStore::new(),
            furniture: ItemStore::new(),
            polylines: ItemStore::new(),
            dimension_lines: ItemStore::new(),
            labels: ItemStore::new(),
            levels: ItemStore::new(),
            selected_level: None,
            compass: Compass::default(),
            camera: Camera::default(),
            selection: Selection::default(),
            base_plan_locked: false,
            wall_height: DEFAULT_WALL_HEIGHT,
            revisions: Revisions::default(),
            hooks: Vec::new(),
        }
    }

    /// Registers a hook called synchronously after each change.
    pub fn add_change_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&PlanChange) + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    fn notify(&mut self, change: PlanChange) {
        for hook in &mut self.hooks {
            hook(&change);
        }
    }

    #[must_use]
    pub fn revisions(&self) -> Revisions {
        self.revisions
    }

    item_accessors!(walls, WallId, Wall, Wall, walls, "wall",
        wall, add_wall, delete_wall, restore_wall, update_wall);
    item_accessors!(rooms, RoomId, Room, Room, rooms, "room",
        room, add_room, delete_room, restore_room, update_room);
    item_accessors!(furniture, PieceId, Piece, Piece, furniture, "piece",
        piece, add_piece, delete_piece, restore_piece, update_piece);
    item_accessors!(polylines, PolylineId, Polyline, Polyline, others, "polyline",
        polyline, add_polyline, delete_polyline, restore_polyline, update_polyline);
    item_accessors!(dimension_lines, DimensionLineId, DimensionLine, DimensionLine, others,
        "dimension line", dimension_line, add_dimension_line, delete_dimension_line,
        restore_dimension_line, update_dimension_line);
    item_accessors!(labels, LabelId, Label, Label, others, "label",
        label, add_label, delete_label, restore_label, update_label);

    #[must_use]
    pub fn walls(&self) -> &ItemStore<WallId, Wall> {
        &self.walls
    }

    #[must_use]
    pub fn rooms(&self) -> &ItemStore<RoomId, Room> {
        &self.rooms
    }

    /// Top-level pieces of the plan. Pieces owned by groups are reachable
    /// through [`Plan::piece`] only.
    #[must_use]
    pub fn furniture(&self) -> &ItemStore<PieceId, Piece> {
        &self.furniture
    }

    #[must_use]
    pub fn polylines(&self) -> &ItemStore<PolylineId, Polyline> {
        &self.polylines
    }

    #[must_use]
    pub fn dimension_lines(&self) -> &ItemStore<DimensionLineId, DimensionLine> {
        &self.dimension_lines
    }

    #[must_use]
    pub fn labels(&self) -> &ItemStore<LabelId, Label> {
        &self.labels
    }

    /// Stores a piece owned by a group, outside of the draw order.
    pub fn insert_detached_piece(&mut self, piece: Piece) -> PieceId {
        let id = self.furniture.insert_detached(piece);
        self.revisions.furniture += 1;
        id
    }

    /// Takes a piece owned by a group out of the plan, once its group no
    /// longer lists it.
    pub fn discard_detached_piece(&mut self, id: PieceId) {
        if self.furniture.discard_detached(id) {
            self.revisions.furniture += 1;
        }
    }

    /// Brings back a piece removed with [`Plan::discard_detached_piece`].
    pub fn revive_detached_piece(&mut self, id: PieceId) {
        self.furniture.revive_detached(id);
        self.revisions.furniture += 1;
    }

    /// Moves a piece in the draw order.
    pub fn reorder_piece(&mut self, id: PieceId, index: usize) {
        self.furniture.reorder(id, index);
        self.revisions.furniture += 1;
    }

    /// Returns the group directly containing `id`.
    #[must_use]
    pub fn piece_group(&self, id: PieceId) -> Option<PieceId> {
        fn find(plan: &Plan, group: PieceId, id: PieceId) -> Option<PieceId> {
            let piece = plan.piece(group)?;
            if piece.children.contains(&id) {
                return Some(group);
            }
            piece.children.iter().find_map(|&child| find(plan, child, id))
        }
        self.furniture
            .ids()
            .iter()
            .find_map(|&group| find(self, group, id))
    }

    /// Every piece of the plan, groups and their descendants included.
    #[must_use]
    pub fn all_pieces(&self) -> Vec<PieceId> {
        fn collect(plan: &Plan, id: PieceId, pieces: &mut Vec<PieceId>) {
            pieces.push(id);
            if let Some(piece) = plan.piece(id) {
                for &child in &piece.children {
                    collect(plan, child, pieces);
                }
            }
        }
        let mut pieces = Vec::new();
        for &id in self.furniture.ids() {
            collect(self, id, &mut pieces);
        }
        pieces
    }

    // Levels

    #[must_use]
    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(id)
    }

    #[must_use]
    pub fn levels(&self) -> &ItemStore<LevelId, Level> {
        &self.levels
    }

    /// Adds a level. The first level added becomes the selected one.
    pub fn add_level(&mut self, level: Level) -> LevelId {
        let id = self.levels.insert(level);
        self.revisions.levels += 1;
        self.notify(PlanChange::LevelChanged);
        if self.selected_level.is_none() {
            self.set_selected_level(Some(id));
        }
        id
    }

    /// Applies `update` to a level.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` for an unknown id.
    pub fn update_level<F>(&mut self, id: LevelId, update: F) -> Result<(), TopologyError>
    where
        F: FnOnce(&mut Level),
    {
        let level = self
            .levels
            .get_mut(id)
            .ok_or(TopologyError::ItemNotFound("level"))?;
        update(level);
        self.revisions.levels += 1;
        self.notify(PlanChange::LevelChanged);
        Ok(())
    }

    #[must_use]
    pub fn selected_level(&self) -> Option<LevelId> {
        self.selected_level
    }

    pub fn set_selected_level(&mut self, level: Option<LevelId>) {
        if self.selected_level != level {
            self.selected_level = level;
            self.revisions.levels += 1;
            self.notify(PlanChange::SelectedLevelChanged);
        }
    }

    /// Returns the level just below `level`, ordered by elevation then
    /// elevation index.
    #[must_use]
    pub fn level_below(&self, level: LevelId) -> Option<LevelId> {
        let reference = self.level(level)?;
        let key = (reference.elevation, reference.elevation_index);
        self.levels
            .iter()
            .filter(|(id, l)| *id != level && (l.elevation, l.elevation_index) < key)
            .max_by(|(_, a), (_, b)| {
                (a.elevation, a.elevation_index)
                    .partial_cmp(&(b.elevation, b.elevation_index))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(id, _)| id)
    }

    /// Elevation of a level, zero without level.
    #[must_use]
    pub fn level_elevation(&self, level: Option<LevelId>) -> f64 {
        level
            .and_then(|id| self.level(id))
            .map_or(0.0, |l| l.elevation)
    }

    /// Returns `true` if an item of `item_level` whose top is `item_top`
    /// above its level is visible at `level`.
    fn is_at_level(&self, item_level: Option<LevelId>, item_top: f64, level: Option<LevelId>) -> bool {
        if item_level == level {
            return true;
        }
        let (Some(item_level), Some(level)) = (
            item_level.and_then(|id| self.level(id)),
            level.and_then(|id| self.level(id)),
        ) else {
            return false;
        };
        ((item_level.elevation - level.elevation).abs() < f64::EPSILON
            && item_level.elevation_index < level.elevation_index)
            || (item_level.elevation < level.elevation
                && item_level.elevation + item_top > level.elevation)
    }

    /// Returns `true` if the wall is drawn at `level`: it belongs to it or
    /// crosses it from a lower level.
    #[must_use]
    pub fn is_wall_at_level(&self, wall: &Wall, level: Option<LevelId>) -> bool {
        self.is_at_level(wall.level, wall.max_height(self.wall_height), level)
    }

    #[must_use]
    pub fn is_piece_at_level(&self, piece: &Piece, level: Option<LevelId>) -> bool {
        self.is_at_level(piece.level, piece.top(), level)
    }

    /// Level of any item.
    #[must_use]
    pub fn item_level(&self, item: ItemId) -> Option<LevelId> {
        match item {
            ItemId::Wall(id) => self.wall(id).and_then(|w| w.level),
            ItemId::Room(id) => self.room(id).and_then(|r| r.level),
            ItemId::Piece(id) => self.piece(id).and_then(|p| p.level),
            ItemId::Polyline(id) => self.polyline(id).and_then(|p| p.level),
            ItemId::DimensionLine(id) => self.dimension_line(id).and_then(|d| d.level),
            ItemId::Label(id) => self.label(id).and_then(|l| l.level),
            ItemId::Compass | ItemId::Camera => None,
        }
    }

    /// Returns `true` if the item is displayed at the selected level.
    #[must_use]
    pub fn is_item_at_selected_level(&self, item: ItemId) -> bool {
        let level = self.selected_level;
        match item {
            ItemId::Wall(id) => self.wall(id).is_some_and(|w| self.is_wall_at_level(w, level)),
            ItemId::Piece(id) => self.piece(id).is_some_and(|p| self.is_piece_at_level(p, level)),
            ItemId::Compass | ItemId::Camera => true,
            _ => self.item_level(item) == level,
        }
    }

    /// Returns `true` if the item still belongs to the plan.
    #[must_use]
    pub fn contains_item(&self, item: ItemId) -> bool {
        match item {
            ItemId::Wall(id) => self.walls.contains(id),
            ItemId::Room(id) => self.rooms.contains(id),
            ItemId::Piece(id) => self.furniture.contains(id) || self.piece_group(id).is_some(),
            ItemId::Polyline(id) => self.polylines.contains(id),
            ItemId::DimensionLine(id) => self.dimension_lines.contains(id),
            ItemId::Label(id) => self.labels.contains(id),
            ItemId::Compass => self.compass.visible,
            ItemId::Camera => self.camera.visible,
        }
    }

    // Walls

    /// Height used by walls without their own height.
    #[must_use]
    pub fn wall_height(&self) -> f64 {
        self.wall_height
    }

    pub fn set_wall_height(&mut self, height: f64) {
        self.wall_height = height;
        self.revisions.walls += 1;
    }

    /// Footprint of a wall mitered against its joined walls.
    #[must_use]
    pub fn wall_points(&self, id: WallId) -> Vec<Point2> {
        let Some(wall) = self.wall(id) else {
            return Vec::new();
        };
        let at_start = wall.wall_at_start.and_then(|w| self.wall(w));
        let at_end = wall.wall_at_end.and_then(|w| self.wall(w));
        wall.points(id, at_start, at_end)
    }

    // Compass and camera

    #[must_use]
    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    pub fn update_compass<F: FnOnce(&mut Compass)>(&mut self, update: F) {
        update(&mut self.compass);
        self.revisions.others += 1;
        self.notify(PlanChange::ItemUpdated(ItemId::Compass));
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn update_camera<F: FnOnce(&mut Camera)>(&mut self, update: F) {
        update(&mut self.camera);
        self.revisions.others += 1;
        self.notify(PlanChange::ItemUpdated(ItemId::Camera));
    }

    // Selection

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn selected_items(&self) -> &[ItemId] {
        self.selection.items()
    }

    /// Replaces the selected items.
    pub fn select_items(&mut self, items: Vec<ItemId>) {
        if self.selection.items() != items.as_slice() {
            self.selection.set_items(items);
            self.revisions.selection += 1;
            self.notify(PlanChange::SelectionChanged);
        }
    }

    pub fn set_all_levels_selection(&mut self, all_levels: bool) {
        if self.selection.is_all_levels() != all_levels {
            self.selection.set_all_levels(all_levels);
            self.revisions.selection += 1;
            self.notify(PlanChange::SelectionChanged);
        }
    }

    pub fn deselect_all(&mut self) {
        self.select_items(Vec::new());
    }

    fn deselect(&mut self, item: ItemId) {
        if self.selection.remove(item) {
            self.revisions.selection += 1;
            self.notify(PlanChange::SelectionChanged);
        }
    }

    // Base plan

    #[must_use]
    pub fn is_base_plan_locked(&self) -> bool {
        self.base_plan_locked
    }

    pub fn set_base_plan_locked(&mut self, locked: bool) {
        if self.base_plan_locked != locked {
            self.base_plan_locked = locked;
            self.notify(PlanChange::BasePlanLockChanged(locked));
        }
    }

    /// Returns `true` if the item belongs to the base plan, the part of the
    /// plan protected by the base plan lock.
    #[must_use]
    pub fn is_item_part_of_base_plan(&self, item: ItemId) -> bool {
        match item {
            ItemId::Piece(id) => self.piece(id).is_some_and(Piece::is_part_of_base_plan),
            ItemId::Camera => false,
            _ => true,
        }
    }

    /// Returns `true` if the item can be moved by the user.
    #[must_use]
    pub fn is_item_movable(&self, item: ItemId) -> bool {
        match item {
            ItemId::Piece(id) => self.piece(id).is_some_and(|p| p.movable),
            _ => true,
        }
    }

    /// Returns `true` if the item can be edited while the base plan lock is
    /// in its current state.
    #[must_use]
    pub fn is_item_editable(&self, item: ItemId) -> bool {
        !self.base_plan_locked || !self.is_item_part_of_base_plan(item)
    }

    // Geometry of any item

    /// Outline of any item; walls are mitered against their neighbours.
    #[must_use]
    pub fn item_points(&self, item: ItemId) -> Vec<Point2> {
        match item {
            ItemId::Wall(id) => self.wall_points(id),
            ItemId::Compass => Selectable::points(&self.compass),
            ItemId::Camera => Selectable::points(&self.camera),
            _ => self.selectable(item).map(|s| s.points()).unwrap_or_default(),
        }
    }

    /// Returns `true` if `point` is on the item, within `margin`.
    #[must_use]
    pub fn item_contains_point(&self, item: ItemId, point: &Point2, margin: f64) -> bool {
        match item {
            ItemId::Wall(id) => Wall::footprint_contains(&self.wall_points(id), point, margin),
            _ => self
                .selectable(item)
                .is_some_and(|s| s.contains_point(point, margin)),
        }
    }

    #[must_use]
    pub fn item_intersects_rectangle(&self, item: ItemId, c0: &Point2, c1: &Point2) -> bool {
        match item {
            ItemId::Wall(id) => Wall::footprint_intersects_rectangle(&self.wall_points(id), c0, c1),
            _ => self
                .selectable(item)
                .is_some_and(|s| s.intersects_rectangle(c0, c1)),
        }
    }

    fn selectable(&self, item: ItemId) -> Option<&dyn Selectable> {
        match item {
            ItemId::Wall(id) => self.wall(id).map(|w| w as &dyn Selectable),
            ItemId::Room(id) => self.room(id).map(|r| r as &dyn Selectable),
            ItemId::Piece(id) => self.piece(id).map(|p| p as &dyn Selectable),
            ItemId::Polyline(id) => self.polyline(id).map(|p| p as &dyn Selectable),
            ItemId::DimensionLine(id) => self.dimension_line(id).map(|d| d as &dyn Selectable),
            ItemId::Label(id) => self.label(id).map(|l| l as &dyn Selectable),
            ItemId::Compass => Some(&self.compass as &dyn Selectable),
            ItemId::Camera => Some(&self.camera as &dyn Selectable),
        }
    }

    /// Every item of the plan at the selected level, in draw order by kind.
    #[must_use]
    pub fn selectable_viewable_items(&self) -> Vec<ItemId> {
        let level = self.selected_level;
        let mut items: Vec<ItemId> = Vec::new();
        items.extend(
            self.walls
                .iter()
                .filter(|(_, w)| self.is_wall_at_level(w, level))
                .map(|(id, _)| ItemId::Wall(id)),
        );
        items.extend(
            self.rooms
                .iter()
                .filter(|(_, r)| r.level == level)
                .map(|(id, _)| ItemId::Room(id)),
        );
        items.extend(
            self.furniture
                .iter()
                .filter(|(_, p)| p.visible && self.is_piece_at_level(p, level))
                .map(|(id, _)| ItemId::Piece(id)),
        );
        items.extend(
            self.polylines
                .iter()
                .filter(|(_, p)| p.level == level)
                .map(|(id, _)| ItemId::Polyline(id)),
        );
        items.extend(
            self.dimension_lines
                .iter()
                .filter(|(_, d)| d.level == level)
                .map(|(id, _)| ItemId::DimensionLine(id)),
        );
        items.extend(
            self.labels
                .iter()
                .filter(|(_, l)| l.level == level)
                .map(|(id, _)| ItemId::Label(id)),
        );
        if self.compass.visible {
            items.push(ItemId::Compass);
        }
        items
    }
}
