//! Magnetism applied to the points entered by the user.
//!
//! Every function of this module only reads the plan: called twice with the
//! same arguments on the same plan, it returns the same point.

pub mod angle;
pub mod closest_point;
pub mod wall_point;

pub use angle::{point_with_alignment, round_angle, PointWithAngleMagnetism};
pub use closest_point::PointMagnetizedToClosestWallOrRoomPoint;
pub use wall_point::WallPointWithAngleMagnetism;
