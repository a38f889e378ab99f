use std::collections::HashMap;

use crate::math::Point2;

use super::camera::Camera;
use super::compass::Compass;
use super::dimension_line::{DimensionLine, DimensionLineId};
use super::furniture::{Piece, PieceId};
use super::label::{Label, LabelId};
use super::level::LevelId;
use super::polyline::{Polyline, PolylineId};
use super::room::{Room, RoomId};
use super::wall::{Wall, WallId};
use super::Plan;

/// Handle on any item of a plan that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemId {
    Wall(WallId),
    Room(RoomId),
    Piece(PieceId),
    Polyline(PolylineId),
    DimensionLine(DimensionLineId),
    Label(LabelId),
    Compass,
    Camera,
}

impl ItemId {
    #[must_use]
    pub fn as_wall(self) -> Option<WallId> {
        match self {
            Self::Wall(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_piece(self) -> Option<PieceId> {
        match self {
            Self::Piece(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_room(self) -> Option<RoomId> {
        match self {
            Self::Room(id) => Some(id),
            _ => None,
        }
    }

    /// Name of the item kind, used in logs and errors.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Wall(_) => "wall",
            Self::Room(_) => "room",
            Self::Piece(_) => "piece",
            Self::Polyline(_) => "polyline",
            Self::DimensionLine(_) => "dimension line",
            Self::Label(_) => "label",
            Self::Compass => "compass",
            Self::Camera => "camera",
        }
    }
}

/// Geometry shared by every selectable item.
pub trait Selectable {
    /// Outline of the item in the plan.
    fn points(&self) -> Vec<Point2>;

    /// Returns `true` if `point` is on the item, with a `margin` tolerance.
    fn contains_point(&self, point: &Point2, margin: f64) -> bool;

    /// Returns `true` if the item intersects the rectangle of corners `c0` and `c1`.
    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool;

    /// Level the item belongs to.
    fn level(&self) -> Option<LevelId> {
        None
    }
}

impl Selectable for Wall {
    fn points(&self) -> Vec<Point2> {
        self.unjoined_points()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Wall::footprint_contains(&self.unjoined_points(), point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Wall::footprint_intersects_rectangle(&self.unjoined_points(), c0, c1)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

impl Selectable for Room {
    fn points(&self) -> Vec<Point2> {
        self.points.clone()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Room::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Room::intersects_rectangle(self, c0, c1)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

impl Selectable for Piece {
    fn points(&self) -> Vec<Point2> {
        Piece::points(self).to_vec()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Piece::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Piece::intersects_rectangle(self, c0, c1)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

impl Selectable for Polyline {
    fn points(&self) -> Vec<Point2> {
        self.points.clone()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Polyline::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Polyline::intersects_rectangle(self, c0, c1)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

impl Selectable for DimensionLine {
    fn points(&self) -> Vec<Point2> {
        DimensionLine::points(self).to_vec()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        DimensionLine::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        DimensionLine::intersects_rectangle(self, c0, c1)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

/// Labels are reduced to their anchor; text bounds are measured by the view.
impl Selectable for Label {
    fn points(&self) -> Vec<Point2> {
        vec![self.location()]
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        (self.location() - point).norm() <= margin
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        let location = self.location();
        location.x >= c0.x.min(c1.x)
            && location.x <= c0.x.max(c1.x)
            && location.y >= c0.y.min(c1.y)
            && location.y <= c0.y.max(c1.y)
    }

    fn level(&self) -> Option<LevelId> {
        self.level
    }
}

impl Selectable for Compass {
    fn points(&self) -> Vec<Point2> {
        Compass::points(self).to_vec()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Compass::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Compass::intersects_rectangle(self, c0, c1)
    }
}

impl Selectable for Camera {
    fn points(&self) -> Vec<Point2> {
        Camera::points(self).to_vec()
    }

    fn contains_point(&self, point: &Point2, margin: f64) -> bool {
        Camera::contains_point(self, point, margin)
    }

    fn intersects_rectangle(&self, c0: &Point2, c1: &Point2) -> bool {
        Camera::intersects_rectangle(self, c0, c1)
    }
}

/// A piece copied out of a plan with the copies of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceCopy {
    pub piece: Piece,
    pub children: Vec<PieceCopy>,
}

/// Owned copy of a plan item, detached from any plan.
///
/// Wall joins are kept as indices of other walls in the same copy list, so
/// that a group of joined walls stays joined once added again.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanItem {
    Wall {
        wall: Wall,
        at_start: Option<usize>,
        at_end: Option<usize>,
    },
    Room(Room),
    Piece(PieceCopy),
    Polyline(Polyline),
    DimensionLine(DimensionLine),
    Label(Label),
}

impl PlanItem {
    /// Translates the copied item.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Wall { wall, .. } => {
                wall.start.x += dx;
                wall.start.y += dy;
                wall.end.x += dx;
                wall.end.y += dy;
            }
            Self::Room(room) => {
                for point in &mut room.points {
                    point.x += dx;
                    point.y += dy;
                }
            }
            Self::Piece(copy) => copy.translate(dx, dy),
            Self::Polyline(polyline) => {
                for point in &mut polyline.points {
                    point.x += dx;
                    point.y += dy;
                }
            }
            Self::DimensionLine(line) => {
                line.start.x += dx;
                line.start.y += dy;
                line.end.x += dx;
                line.end.y += dy;
            }
            Self::Label(label) => {
                label.x += dx;
                label.y += dy;
            }
        }
    }
}

impl PieceCopy {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.piece.x += dx;
        self.piece.y += dy;
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }
}

impl Plan {
    /// Copies the given items out of the plan. The compass and the camera
    /// can't be copied and are ignored.
    #[must_use]
    pub fn copy_items(&self, items: &[ItemId]) -> Vec<PlanItem> {
        let wall_ids: Vec<WallId> = items.iter().filter_map(|i| i.as_wall()).collect();
        let wall_index = |id: Option<WallId>| id.and_then(|id| wall_ids.iter().position(|&w| w == id));
        items
            .iter()
            .filter_map(|&item| match item {
                ItemId::Wall(id) => self.wall(id).map(|wall| {
                    let mut wall = wall.clone();
                    let at_start = wall_index(wall.wall_at_start);
                    let at_end = wall_index(wall.wall_at_end);
                    wall.wall_at_start = None;
                    wall.wall_at_end = None;
                    PlanItem::Wall {
                        wall,
                        at_start,
                        at_end,
                    }
                }),
                ItemId::Room(id) => self.room(id).cloned().map(PlanItem::Room),
                ItemId::Piece(id) => self.copy_piece(id).map(PlanItem::Piece),
                ItemId::Polyline(id) => self.polyline(id).cloned().map(PlanItem::Polyline),
                ItemId::DimensionLine(id) => {
                    self.dimension_line(id).cloned().map(PlanItem::DimensionLine)
                }
                ItemId::Label(id) => self.label(id).cloned().map(PlanItem::Label),
                ItemId::Compass | ItemId::Camera => None,
            })
            .collect()
    }

    fn copy_piece(&self, id: PieceId) -> Option<PieceCopy> {
        let piece = self.piece(id)?;
        let children = piece
            .children
            .iter()
            .filter_map(|&child| self.copy_piece(child))
            .collect();
        let mut piece = piece.clone();
        piece.children.clear();
        Some(PieceCopy { piece, children })
    }

    /// Adds copies of items to the plan at the selected level and returns
    /// the ids of the new items, in the order of `items`.
    pub fn add_items(&mut self, items: &[PlanItem]) -> Vec<ItemId> {
        let level = self.selected_level();
        let mut walls: HashMap<usize, WallId> = HashMap::new();
        let mut added = Vec::with_capacity(items.len());
        let mut wall_count = 0;
        for item in items {
            let id = match item {
                PlanItem::Wall { wall, .. } => {
                    let mut wall = wall.clone();
                    wall.level = level;
                    let id = self.add_wall(wall);
                    walls.insert(wall_count, id);
                    wall_count += 1;
                    ItemId::Wall(id)
                }
                PlanItem::Room(room) => {
                    let mut room = room.clone();
                    room.level = level;
                    ItemId::Room(self.add_room(room))
                }
                PlanItem::Piece(copy) => {
                    let id = self.add_piece_copy(copy, level, false);
                    ItemId::Piece(id)
                }
                PlanItem::Polyline(polyline) => {
                    let mut polyline = polyline.clone();
                    polyline.level = level;
                    ItemId::Polyline(self.add_polyline(polyline))
                }
                PlanItem::DimensionLine(line) => {
                    let mut line = line.clone();
                    line.level = level;
                    ItemId::DimensionLine(self.add_dimension_line(line))
                }
                PlanItem::Label(label) => {
                    let mut label = label.clone();
                    label.level = level;
                    ItemId::Label(self.add_label(label))
                }
            };
            added.push(id);
        }
        // Joins are restored once every wall exists.
        let mut wall_count = 0;
        for item in items {
            if let PlanItem::Wall {
                at_start, at_end, ..
            } = item
            {
                let at_start = at_start.and_then(|i| walls.get(&i).copied());
                let at_end = at_end.and_then(|i| walls.get(&i).copied());
                if let Some(wall) = walls.get(&wall_count).and_then(|&id| self.walls.get_mut(id)) {
                    wall.wall_at_start = at_start;
                    wall.wall_at_end = at_end;
                }
                wall_count += 1;
            }
        }
        if wall_count > 0 {
            self.revisions.walls += 1;
        }
        added
    }

    fn add_piece_copy(&mut self, copy: &PieceCopy, level: Option<LevelId>, detached: bool) -> PieceId {
        let children: Vec<PieceId> = copy
            .children
            .iter()
            .map(|child| self.add_piece_copy(child, level, true))
            .collect();
        let mut piece = copy.piece.clone();
        piece.level = level;
        piece.children = children;
        if detached {
            self.insert_detached_piece(piece)
        } else {
            self.add_piece(piece)
        }
    }
}
