pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type. Plan coordinates are expressed in centimeters with the
/// y axis pointing down, like screen coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Shorthand constructor used throughout the crate.
#[must_use]
pub fn pt(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

/// Returns the angle of the direction from `from` to `to`, in `(-π, π]`.
#[must_use]
pub fn direction_angle(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Normalizes an angle in radians into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let normalized = angle.rem_euclid(tau);
    if (normalized - tau).abs() < TOLERANCE {
        0.0
    } else {
        normalized
    }
}

/// Rotates `point` around `center` by `angle` radians.
#[must_use]
pub fn rotate_point(point: &Point2, center: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point2::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}
