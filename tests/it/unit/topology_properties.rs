//! Wall Topology Properties

use crate::helpers::TestPlanBuilder;
use planwright::plan::{Plan, Wall};
use planwright::topology::{joins_are_consistent, ReverseWalls, SplitWall};
use proptest::prelude::*;

fn corner() -> impl Strategy<Value = (f64, f64)> {
    (-2000.0..-10.0f64, -2000.0..-10.0f64)
}

fn opposite_corner() -> impl Strategy<Value = (f64, f64)> {
    (10.0..2000.0f64, 10.0..2000.0f64)
}

/// Start and end heights: flat, sloping, or sloping from the plan height.
fn heights() -> impl Strategy<Value = (Option<f64>, Option<f64>)> {
    (
        proptest::option::of(100.0..400.0f64),
        proptest::option::of(100.0..400.0f64),
    )
}

/// The wall as reversing it twice gives it back.
fn with_explicit_start_height(plan: &Plan, mut wall: Wall) -> Wall {
    if wall.height_at_end.is_some() {
        wall.height.get_or_insert(plan.wall_height());
    }
    wall
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reversing_walls_twice_restores_them(
        min in corner(),
        max in opposite_corner(),
        (height, height_at_end) in heights(),
    ) {
        let test_plan = TestPlanBuilder::new().with_rectangle_walls(min, max, 10.0).build();
        let mut plan = test_plan.plan;
        plan.update_wall(test_plan.walls[0], |wall| {
            wall.height = height;
            wall.height_at_end = height_at_end;
        }).unwrap();
        let before: Vec<_> = test_plan
            .walls
            .iter()
            .map(|&id| plan.wall(id).cloned().map(|wall| with_explicit_start_height(&plan, wall)))
            .collect();

        ReverseWalls::new(test_plan.walls.clone()).execute(&mut plan).unwrap();
        prop_assert!(joins_are_consistent(&plan, &test_plan.walls));
        ReverseWalls::new(test_plan.walls.clone()).execute(&mut plan).unwrap();

        let after: Vec<_> = test_plan.walls.iter().map(|&id| plan.wall(id).cloned()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn undone_split_restores_the_joined_wall(
        min in corner(),
        max in opposite_corner(),
        ratio in 0.05..0.95f64,
        side in 0usize..4,
    ) {
        let test_plan = TestPlanBuilder::new().with_rectangle_walls(min, max, 10.0).build();
        let mut plan = test_plan.plan;
        let id = test_plan.walls[side];
        let before: Vec<_> = test_plan.walls.iter().map(|&id| plan.wall(id).cloned()).collect();

        let split = SplitWall::new(id, ratio).execute(&mut plan).unwrap();
        prop_assert_eq!(plan.walls().len(), 5);
        let ids: Vec<_> = plan.walls().ids().to_vec();
        prop_assert!(joins_are_consistent(&plan, &ids));

        split.undo(&mut plan).unwrap();
        prop_assert_eq!(plan.walls().len(), 4);
        let after: Vec<_> = test_plan.walls.iter().map(|&id| plan.wall(id).cloned()).collect();
        prop_assert_eq!(before, after);
    }
}
