//! Interaction and geometry core of a 2D floor-plan editor.
//!
//! A [`controller::PlanController`] turns pointer and keyboard events into
//! undoable edits of a [`plan::Plan`] made of walls, rooms, furniture,
//! polylines, dimension lines and labels. The geometry modules keep wall
//! joins consistent, derive rooms from walls and compute the magnetized
//! points and placements used while drawing.

pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod math;
pub mod placement;
pub mod plan;
pub mod rooms;
pub mod snap;
pub mod topology;
pub mod view;

pub use controller::{ControllerEvent, Mode, PlanController};
pub use error::{PlanError, Result};
