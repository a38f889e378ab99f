use thiserror::Error;

/// Top-level error type for the plan editing core.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length segment between ({x0}, {y0}) and ({x1}, {y1})")]
    ZeroLengthSegment { x0: f64, y0: f64, x1: f64, y1: f64 },

    #[error("coordinate {0} is not finite")]
    NotFinite(f64),
}

/// Errors related to the item stores and wall joins.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("item not found: {0}")]
    ItemNotFound(&'static str),

    #[error("invalid wall join: {0}")]
    InvalidJoin(String),
}

/// Errors raised when the controller is driven outside of its contract.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid controller state: {operation} called in {state} state")]
    InvalidControllerState {
        operation: &'static str,
        state: &'static str,
    },
}

/// Errors related to editor preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid preferences: {0}")]
    Invalid(String),

    #[error("cannot parse preferences: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Convenience type alias for results using [`PlanError`].
pub type Result<T> = std::result::Result<T, PlanError>;
