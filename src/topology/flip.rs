use std::f64::consts::PI;
use std::mem;

use crate::error::TopologyError;
use crate::math::polygon_2d::bounding_box;
use crate::math::{normalize_angle, Point2};
use crate::plan::{ItemId, PieceId, Plan, WallId};

use super::joined_wall::{joined_end, WallEnd};

/// Mirrors items about a vertical axis (horizontal flip) or a horizontal
/// axis (vertical flip).
///
/// The axis goes through the middle of the items bounds unless given with
/// [`FlipItems::about`]. The observer camera is never flipped.
#[derive(Debug, Clone)]
pub struct FlipItems {
    items: Vec<ItemId>,
    horizontal: bool,
    axis: Option<f64>,
}

impl FlipItems {
    #[must_use]
    pub fn new(items: Vec<ItemId>, horizontal: bool) -> Self {
        Self {
            items,
            horizontal,
            axis: None,
        }
    }

    /// Flips about the line `x = axis` (or `y = axis` for a vertical flip).
    #[must_use]
    pub fn about(mut self, axis: f64) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Applies the flip.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ItemNotFound` for an unknown item.
    pub fn execute(&self, plan: &mut Plan) -> Result<(), TopologyError> {
        let Some(axis) = self.axis.or_else(|| self.bounds_axis(plan)) else {
            return Ok(());
        };
        let horizontal = self.horizontal;
        let mirror = move |p: Point2| {
            if horizontal {
                Point2::new(2.0 * axis - p.x, p.y)
            } else {
                Point2::new(p.x, 2.0 * axis - p.y)
            }
        };
        let mirror_angle = move |angle: f64| {
            if horizontal {
                normalize_angle(-angle)
            } else {
                normalize_angle(PI - angle)
            }
        };
        let walls: Vec<WallId> = self.items.iter().filter_map(|i| i.as_wall()).collect();
        for &item in &self.items {
            match item {
                ItemId::Wall(id) => Self::flip_wall(plan, id, &walls, mirror)?,
                ItemId::Room(id) => plan.update_room(id, |room| {
                    for point in &mut room.points {
                        *point = mirror(*point);
                    }
                    if horizontal {
                        room.name_offset.x = -room.name_offset.x;
                        room.area_offset.x = -room.area_offset.x;
                    } else {
                        room.name_offset.y = -room.name_offset.y;
                        room.area_offset.y = -room.area_offset.y;
                    }
                    room.name_angle = normalize_angle(-room.name_angle);
                    room.area_angle = normalize_angle(-room.area_angle);
                })?,
                ItemId::Piece(id) => flip_piece(plan, id, &mirror, &mirror_angle)?,
                ItemId::Polyline(id) => plan.update_polyline(id, |polyline| {
                    for point in &mut polyline.points {
                        *point = mirror(*point);
                    }
                })?,
                ItemId::DimensionLine(id) => plan.update_dimension_line(id, |line| {
                    // Swapping the ends keeps the measure on the same side.
                    let start = mirror(line.start);
                    line.start = mirror(line.end);
                    line.end = start;
                })?,
                ItemId::Label(id) => plan.update_label(id, |label| {
                    let location = mirror(label.location());
                    label.x = location.x;
                    label.y = location.y;
                    label.angle = normalize_angle(-label.angle);
                    if horizontal {
                        label.style.alignment = label.style.alignment.mirrored();
                    }
                })?,
                ItemId::Compass => plan.update_compass(|compass| {
                    let center = mirror(compass.center());
                    compass.x = center.x;
                    compass.y = center.y;
                    compass.north_direction = mirror_angle(compass.north_direction);
                }),
                ItemId::Camera => {}
            }
        }
        tracing::debug!(count = self.items.len(), horizontal, axis, "items flipped");
        Ok(())
    }

    fn bounds_axis(&self, plan: &Plan) -> Option<f64> {
        let points: Vec<Point2> = self
            .items
            .iter()
            .filter(|&&item| item != ItemId::Camera)
            .flat_map(|&item| plan.item_points(item))
            .collect();
        let (min, max) = bounding_box(&points)?;
        Some(if self.horizontal {
            (min.x + max.x) / 2.0
        } else {
            (min.y + max.y) / 2.0
        })
    }

    fn flip_wall(
        plan: &mut Plan,
        id: WallId,
        flipped: &[WallId],
        mirror: impl Fn(Point2) -> Point2,
    ) -> Result<(), TopologyError> {
        let wall = plan.wall(id).ok_or(TopologyError::ItemNotFound("wall"))?.clone();
        for end in [WallEnd::Start, WallEnd::End] {
            let Some(neighbour) = end.joined(&wall).filter(|n| !flipped.contains(n)) else {
                continue;
            };
            let neighbour_end = plan
                .wall(neighbour)
                .and_then(|n| joined_end(n, id, &end.point(&wall)));
            if let Some(neighbour_end) = neighbour_end {
                let point = mirror(end.point(&wall));
                plan.update_wall(neighbour, |n| neighbour_end.set_point(n, point))?;
            }
        }
        plan.update_wall(id, |wall| {
            wall.start = mirror(wall.start);
            wall.end = mirror(wall.end);
            wall.arc_extent = wall.arc_extent.map(|extent| -extent);
            mem::swap(&mut wall.left_side, &mut wall.right_side);
        })
    }
}

fn flip_piece(
    plan: &mut Plan,
    id: PieceId,
    mirror: &impl Fn(Point2) -> Point2,
    mirror_angle: &impl Fn(f64) -> f64,
) -> Result<(), TopologyError> {
    let children = plan
        .piece(id)
        .ok_or(TopologyError::ItemNotFound("piece"))?
        .children
        .clone();
    plan.update_piece(id, |piece| {
        let center = mirror(piece.center());
        piece.x = center.x;
        piece.y = center.y;
        piece.angle = mirror_angle(piece.angle);
        piece.model_mirrored = !piece.model_mirrored;
    })?;
    for child in children {
        flip_piece(plan, child, mirror, mirror_angle)?;
    }
    Ok(())
}
