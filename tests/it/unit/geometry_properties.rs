//! Geometry Helper Properties

use planwright::config::LengthUnit;
use planwright::controller::states::{point_at, screen_angle_degrees};
use planwright::controller::EditableProperty;
use planwright::math::polygon_2d::{rectangle_points, signed_area, with_positive_area};
use planwright::math::{normalize_angle, Point2};
use planwright::plan::{Plan, Wall};
use planwright::snap::{point_with_alignment, PointWithAngleMagnetism, WallPointWithAngleMagnetism};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = f64> {
    -5000.0..5000.0f64
}

fn step_count() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![4u32, 8, 12, 24, 36, 72])
}

/// Distance between two angles in degrees, taking the wrap at 360 into account.
fn degrees_apart(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

proptest! {
    #[test]
    fn normalized_angles_stay_in_one_turn(angle in -100.0..100.0f64) {
        let normalized = normalize_angle(angle);
        prop_assert!((0.0..std::f64::consts::TAU).contains(&normalized));
        prop_assert!(degrees_apart(normalized.to_degrees(), angle.to_degrees()) < 1e-6);
    }

    #[test]
    fn screen_angle_reads_back_the_angle_of_point_at(
        x in coordinate(),
        y in coordinate(),
        length in 1.0..2000.0f64,
        angle in 0.0..360.0f64,
    ) {
        let from = Point2::new(x, y);
        let to = point_at(&from, length, angle);
        prop_assert!(((to - from).norm() - length).abs() < 1e-6);
        prop_assert!(degrees_apart(screen_angle_degrees(&from, &to), angle) < 1e-6);
    }

    #[test]
    fn typed_values_are_clamped_in_range(value in proptest::option::of(-1e9..1e9f64)) {
        let unit = LengthUnit::Centimeter;
        let length = EditableProperty::Length.clamp(value, unit);
        prop_assert!(length >= unit.minimum_length() && length <= unit.maximum_length());
        let angle = EditableProperty::Angle.clamp(value, unit);
        prop_assert!((0.0..360.0).contains(&angle));
        let thickness = EditableProperty::Thickness.clamp(value, unit);
        prop_assert!(thickness >= unit.minimum_length() && thickness <= unit.maximum_thickness());
        let extent = EditableProperty::ArcExtent.clamp(value, unit);
        prop_assert!((-270.0..=270.0).contains(&extent));
    }

    #[test]
    fn magnetized_lengths_stay_positive(length in 0.01..10_000.0f64, pixel in 0.1..50.0f64) {
        for unit in [LengthUnit::Centimeter, LengthUnit::Millimeter, LengthUnit::Meter, LengthUnit::Inch] {
            let magnetized = unit.magnetized_length(length, pixel);
            prop_assert!(magnetized.is_finite() && magnetized > 0.0);
        }
    }

    #[test]
    fn rectangle_points_keep_their_size(
        x in coordinate(),
        y in coordinate(),
        width in 1.0..500.0f64,
        depth in 1.0..500.0f64,
        angle in 0.0..std::f64::consts::TAU,
    ) {
        let points = rectangle_points(&Point2::new(x, y), width, depth, angle);
        prop_assert!(((points[1] - points[0]).norm() - width).abs() < 1e-6);
        prop_assert!(((points[3] - points[0]).norm() - depth).abs() < 1e-6);
        prop_assert!((signed_area(&points).abs() - width * depth).abs() < 1e-6 * width * depth);
    }

    #[test]
    fn oriented_polygons_have_a_positive_area(
        points in proptest::collection::vec((coordinate(), coordinate()), 3..12),
    ) {
        let points: Vec<Point2> = points.into_iter().map(|(x, y)| Point2::new(x, y)).collect();
        let oriented = with_positive_area(&points);
        prop_assert!(signed_area(&oriented) >= 0.0);
        prop_assert!((signed_area(&oriented) - signed_area(&points).abs()).abs() < 1e-6);
    }

    #[test]
    fn aligned_points_lie_on_a_multiple_of_45_degrees(
        dx in -1000.0..1000.0f64,
        dy in -1000.0..1000.0f64,
    ) {
        prop_assume!(dx.abs() > 1e-3 || dy.abs() > 1e-3);
        let pivot = Point2::new(100.0, -50.0);
        let aligned = point_with_alignment(&pivot, &Point2::new(pivot.x + dx, pivot.y + dy));
        let angle = screen_angle_degrees(&pivot, &aligned);
        let step = (angle / 45.0).round() * 45.0;
        prop_assert!(degrees_apart(angle, step) < 1e-6);
    }

    #[test]
    fn angle_magnetism_is_deterministic_and_lands_on_steps(
        x in coordinate(),
        y in coordinate(),
        dx in -2000.0..2000.0f64,
        dy in -2000.0..2000.0f64,
        margin in 0.5..20.0f64,
        steps in step_count(),
    ) {
        let pivot = Point2::new(x, y);
        let point = Point2::new(x + dx, y + dy);
        let first = PointWithAngleMagnetism::new(&pivot, &point, LengthUnit::Centimeter, margin, steps);
        let second = PointWithAngleMagnetism::new(&pivot, &point, LengthUnit::Centimeter, margin, steps);
        prop_assert_eq!(first, second);

        let step = 360.0 / f64::from(steps);
        let angle = first.angle().to_degrees();
        prop_assert!(degrees_apart(angle, (angle / step).round() * step) < 1e-6);
        let offset = first.point() - pivot;
        if offset.norm() > 1e-6 {
            prop_assert!(degrees_apart(screen_angle_degrees(&pivot, &first.point()), angle) < 1e-6);
        }
    }

    #[test]
    fn wall_points_stay_on_the_magnetized_direction(
        dx in -2000.0..2000.0f64,
        dy in -2000.0..2000.0f64,
        wall_x in coordinate(),
        wall_y in coordinate(),
        steps in step_count(),
    ) {
        prop_assume!(dx.abs() > 1e-3 || dy.abs() > 1e-3);
        let mut plan = Plan::new();
        plan.add_wall(Wall::new(
            Point2::new(wall_x, wall_y),
            Point2::new(wall_x + 300.0, wall_y + 1.0),
            10.0,
            None,
        ));
        let pivot = Point2::new(0.0, 0.0);
        let point = Point2::new(dx, dy);
        let snapped = |plan: &Plan| {
            WallPointWithAngleMagnetism::new(plan, None, &pivot, &point, LengthUnit::Centimeter, 4.0, steps)
        };
        let first = snapped(&plan);
        prop_assert_eq!(first, snapped(&plan));

        let angle = first.angle();
        let offset = first.point() - pivot;
        let cross = offset.x * -angle.sin() - offset.y * angle.cos();
        prop_assert!(cross.abs() < 1e-6 * (1.0 + offset.norm()), "off direction by {}", cross);
    }
}
