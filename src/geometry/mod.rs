//! Planar regions and the boolean operations between them.

pub mod area;

pub use area::Area;
