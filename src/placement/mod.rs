//! Magnetism applied to moved furniture.
//!
//! Each adjustment only computes where a piece should go. The caller
//! applies it, and skips all of them when magnetism is disabled.

pub mod elevation;
pub mod on_wall;
pub mod side_by_side;

pub use elevation::adjust_piece_elevation;
pub use on_wall::{adjust_piece_on_wall_at, WallPlacement};
pub use side_by_side::adjust_piece_side_by_side_at;
