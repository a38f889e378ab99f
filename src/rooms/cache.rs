use std::collections::HashMap;

use crate::geometry::Area;
use crate::math::polygon_2d::{rectangle_points, with_positive_area};
use crate::math::Point2;
use crate::plan::{PieceId, Plan};

/// Plan revisions a wall-derived cache entry was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WallsKey {
    walls: u64,
    levels: u64,
}

impl WallsKey {
    fn of(plan: &Plan) -> Self {
        let revisions = plan.revisions();
        Self {
            walls: revisions.walls,
            levels: revisions.levels,
        }
    }
}

/// Geometry derived from the plan, shared by every query of an interaction
/// frame.
///
/// Entries remember the plan revisions they were built with and are rebuilt
/// on the first read following a change of walls, levels or furniture.
#[derive(Debug, Default)]
pub struct GeometryCache {
    walls_area: Option<(WallsKey, Area)>,
    walls_area_with_baseboards: Option<(WallsKey, Area)>,
    inside_walls_area: Option<(WallsKey, Area)>,
    room_paths: Option<(WallsKey, Vec<Vec<Point2>>)>,
    piece_contours: HashMap<(PieceId, u64), (u64, Vec<Point2>)>,
}

impl GeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Union of the footprints of the walls at the selected level.
    pub fn walls_area(&mut self, plan: &Plan) -> &Area {
        let key = WallsKey::of(plan);
        if self.walls_area.as_ref().is_some_and(|(k, _)| *k != key) {
            self.walls_area = None;
        }
        &self
            .walls_area
            .get_or_insert_with(|| {
                tracing::trace!(?key, "rebuilding walls area");
                (key, compute_walls_area(plan, false))
            })
            .1
    }

    /// Union of the footprints of the walls at the selected level, widened
    /// by their baseboards.
    pub fn walls_area_with_baseboards(&mut self, plan: &Plan) -> &Area {
        let key = WallsKey::of(plan);
        if self
            .walls_area_with_baseboards
            .as_ref()
            .is_some_and(|(k, _)| *k != key)
        {
            self.walls_area_with_baseboards = None;
        }
        &self
            .walls_area_with_baseboards
            .get_or_insert_with(|| (key, compute_walls_area(plan, true)))
            .1
    }

    /// Closed outlines of the walls area, each with a positive signed area.
    pub fn room_paths(&mut self, plan: &Plan) -> &[Vec<Point2>] {
        let key = WallsKey::of(plan);
        if self.room_paths.as_ref().is_some_and(|(k, _)| *k != key) {
            self.room_paths = None;
        }
        if self.room_paths.is_none() {
            let paths = self
                .walls_area(plan)
                .paths()
                .map(with_positive_area)
                .collect();
            self.room_paths = Some((key, paths));
        }
        self.room_paths.as_ref().map_or(&[], |(_, paths)| paths.as_slice())
    }

    /// Surfaces enclosed by walls, walls excluded.
    pub fn inside_walls_area(&mut self, plan: &Plan) -> &Area {
        let key = WallsKey::of(plan);
        if self.inside_walls_area.as_ref().is_some_and(|(k, _)| *k != key) {
            self.inside_walls_area = None;
        }
        if self.inside_walls_area.is_none() {
            let walls_area = self.walls_area(plan).clone();
            let paths = self.room_paths(plan);
            let enclosed = Area::union_all(paths.iter().map(Vec::as_slice));
            self.inside_walls_area = Some((key, enclosed.subtract(&walls_area)));
        }
        &self
            .inside_walls_area
            .get_or_insert_with(|| (key, Area::new()))
            .1
    }

    /// Returns `true` if `point` is enclosed by walls without being in a wall,
    /// where floors and ceilings are visible.
    pub fn is_floor_visible_at(&mut self, plan: &Plan, point: &Point2) -> bool {
        self.inside_walls_area(plan).contains(point)
    }

    /// Footprint of a piece enlarged by `margin` on each side.
    pub fn piece_contour(&mut self, plan: &Plan, id: PieceId, margin: f64) -> &[Point2] {
        let revision = plan.revisions().furniture;
        let entry = self
            .piece_contours
            .entry((id, margin.to_bits()))
            .or_insert_with(|| (u64::MAX, Vec::new()));
        if entry.0 != revision {
            entry.1 = plan.piece(id).map_or_else(Vec::new, |piece| {
                let (width, depth, _) = piece.size_in_plan();
                rectangle_points(
                    &piece.center(),
                    width + 2.0 * margin,
                    depth + 2.0 * margin,
                    piece.angle,
                )
                .to_vec()
            });
            entry.0 = revision;
        }
        &entry.1
    }
}

fn compute_walls_area(plan: &Plan, with_baseboards: bool) -> Area {
    let level = plan.selected_level();
    let footprints: Vec<Vec<Point2>> = plan
        .walls()
        .iter()
        .filter(|(_, wall)| plan.is_wall_at_level(wall, level))
        .map(|(id, wall)| {
            if with_baseboards
                && (wall.left_side.baseboard.is_some() || wall.right_side.baseboard.is_some())
            {
                wall.points_with_baseboards()
            } else {
                plan.wall_points(id)
            }
        })
        .collect();
    Area::union_all(footprints.iter().map(Vec::as_slice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pt;
    use crate::plan::Wall;
    use approx::assert_relative_eq;

    #[test]
    fn walls_area_follows_wall_changes() {
        let mut plan = Plan::new();
        let wall = plan.add_wall(Wall::new(pt(0.0, 0.0), pt(100.0, 0.0), 10.0, None));
        let mut cache = GeometryCache::new();
        assert_relative_eq!(cache.walls_area(&plan).area(), 1000.0, epsilon = 1e-6);
        plan.update_wall(wall, |w| w.thickness = 20.0).ok();
        assert_relative_eq!(cache.walls_area(&plan).area(), 2000.0, epsilon = 1e-6);
    }

    #[test]
    fn piece_contour_is_rebuilt_after_a_move() {
        let mut plan = Plan::new();
        let piece = plan.add_piece(crate::plan::Piece::new("box", 0.0, 0.0, 10.0, 10.0, 10.0));
        let mut cache = GeometryCache::new();
        assert_relative_eq!(cache.piece_contour(&plan, piece, 1.0)[0].x, -6.0);
        plan.update_piece(piece, |p| p.x = 100.0).ok();
        assert_relative_eq!(cache.piece_contour(&plan, piece, 1.0)[0].x, 94.0);
    }
}
