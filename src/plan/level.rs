slotmap::new_key_type! {
    /// Unique identifier for a level in the plan.
    pub struct LevelId;
}

/// A storey of the building.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    pub elevation: f64,
    pub floor_thickness: f64,
    pub height: f64,
    /// Orders levels sharing the same elevation.
    pub elevation_index: i32,
    pub viewable: bool,
}

impl Level {
    /// Creates a viewable level.
    #[must_use]
    pub fn new(name: impl Into<String>, elevation: f64, floor_thickness: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
            floor_thickness,
            height,
            elevation_index: 0,
            viewable: true,
        }
    }

    /// Elevation of the top of this level.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.elevation + self.height
    }
}
