//! Rooms derived from the wall network.
//!
//! The walls of the selected level are merged in a single area whose
//! outlines are the candidate room paths. A click inside one of them
//! creates a room following the inner faces of the surrounding walls.

pub mod cache;
pub mod derivation;

pub use cache::GeometryCache;
pub use derivation::{create_room_at, create_walls_around_room};
