//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestPlanBuilder` - Builder pattern for creating test plans with walls, rooms and pieces
//! - `controller()` - A headless controller on a deterministic clock
//! - `init_tracing()` - Log output for failing tests, filtered with `RUST_LOG`

#![allow(dead_code)]

use planwright::config::Preferences;
use planwright::math::Point2;
use planwright::plan::{Piece, PieceId, Plan, Room, RoomId, Wall, WallId};
use planwright::topology::{join_walls, WallEnd};
use planwright::view::{HeadlessView, ManualClock};
use planwright::PlanController;

/// Plan built by [`TestPlanBuilder`] with the ids of what it added.
pub struct TestPlan {
    pub plan: Plan,
    pub walls: Vec<WallId>,
    pub rooms: Vec<RoomId>,
    pub pieces: Vec<PieceId>,
}

/// Builder for creating test plans.
///
/// # Example
/// ```ignore
/// let test_plan = TestPlanBuilder::new()
///     .with_rectangle_walls((0.0, 0.0), (400.0, 300.0), 10.0)
///     .with_piece(Piece::new("Table", 200.0, 150.0, 80.0, 80.0, 75.0))
///     .build();
/// ```
#[derive(Default)]
pub struct TestPlanBuilder {
    walls: Vec<Vec<Wall>>,
    rooms: Vec<Room>,
    pieces: Vec<Piece>,
}

impl TestPlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single free wall.
    pub fn with_wall(mut self, start: (f64, f64), end: (f64, f64), thickness: f64) -> Self {
        self.walls.push(vec![Wall::new(
            Point2::new(start.0, start.1),
            Point2::new(end.0, end.1),
            thickness,
            None,
        )]);
        self
    }

    /// Add four walls joined in a loop along the sides of a rectangle,
    /// drawn clockwise on screen from `min`.
    pub fn with_rectangle_walls(mut self, min: (f64, f64), max: (f64, f64), thickness: f64) -> Self {
        let corners = [
            Point2::new(min.0, min.1),
            Point2::new(max.0, min.1),
            Point2::new(max.0, max.1),
            Point2::new(min.0, max.1),
        ];
        let walls = (0..4)
            .map(|i| Wall::new(corners[i], corners[(i + 1) % 4], thickness, None))
            .collect();
        self.walls.push(walls);
        self
    }

    pub fn with_room(mut self, points: &[(f64, f64)]) -> Self {
        self.rooms
            .push(Room::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect()));
        self
    }

    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push(piece);
        self
    }

    pub fn build(self) -> TestPlan {
        let mut plan = Plan::new();
        let mut walls = Vec::new();
        for chain in self.walls {
            let ids: Vec<WallId> = chain.into_iter().map(|wall| plan.add_wall(wall)).collect();
            if ids.len() > 1 {
                for i in 0..ids.len() {
                    join_walls(&mut plan, ids[i], WallEnd::End, ids[(i + 1) % ids.len()], WallEnd::Start)
                        .unwrap();
                }
            }
            walls.extend(ids);
        }
        let rooms = self.rooms.into_iter().map(|room| plan.add_room(room)).collect();
        let pieces = self.pieces.into_iter().map(|piece| plan.add_piece(piece)).collect();
        TestPlan {
            plan,
            walls,
            rooms,
            pieces,
        }
    }
}

/// Preferences with magnetism off, so that points land where they're clicked.
pub fn exact_preferences() -> Preferences {
    Preferences {
        magnetism_enabled: false,
        ..Preferences::default()
    }
}

/// Installs a subscriber writing to the test output. Later calls are no-ops.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// Controller on `plan` with a headless view at scale 1 and a manual clock.
pub fn controller(plan: Plan, preferences: Preferences) -> PlanController<HeadlessView> {
    init_tracing();
    PlanController::new(plan, HeadlessView::new(1.0), preferences).with_clock(ManualClock::new())
}

/// Moves then clicks once at `(x, y)`.
pub fn click(controller: &mut PlanController<HeadlessView>, x: f64, y: f64) {
    controller.move_mouse(x, y).unwrap();
    controller.press_mouse(x, y, 1, false, false).unwrap();
    controller.release_mouse(x, y).unwrap();
}

/// Presses at `from`, drags to `to` and releases.
pub fn drag(controller: &mut PlanController<HeadlessView>, from: (f64, f64), to: (f64, f64)) {
    controller.move_mouse(from.0, from.1).unwrap();
    controller.press_mouse(from.0, from.1, 1, false, false).unwrap();
    controller.move_mouse(to.0, to.1).unwrap();
    controller.release_mouse(to.0, to.1).unwrap();
}

pub fn assert_close(actual: Point2, expected: (f64, f64)) {
    assert!(
        (actual.x - expected.0).abs() < 1e-6 && (actual.y - expected.1).abs() < 1e-6,
        "expected ({}, {}), got ({}, {})",
        expected.0,
        expected.1,
        actual.x,
        actual.y
    );
}
