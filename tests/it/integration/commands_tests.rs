//! Command Integration Tests

use crate::helpers::{assert_close, controller, exact_preferences, TestPlanBuilder};
use planwright::plan::{ItemId, Piece};
use planwright::topology::joins_are_consistent;

#[test]
fn test_join_selected_walls_meets_at_their_lines_intersection() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (100.0, 0.0), 10.0)
        .with_wall((120.0, 20.0), (120.0, 200.0), 10.0)
        .build();
    let (a, b) = (test_plan.walls[0], test_plan.walls[1]);
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller
        .plan_mut()
        .select_items(vec![ItemId::Wall(a), ItemId::Wall(b)]);

    controller.join_selected_walls().unwrap();
    let plan = controller.plan();
    assert_close(plan.wall(a).unwrap().end, (120.0, 0.0));
    assert_close(plan.wall(b).unwrap().start, (120.0, 0.0));
    assert_eq!(plan.wall(a).unwrap().wall_at_end, Some(b));
    assert_eq!(plan.wall(b).unwrap().wall_at_start, Some(a));
    assert!(joins_are_consistent(plan, &[a, b]));

    controller.undo().unwrap();
    let plan = controller.plan();
    assert_close(plan.wall(a).unwrap().end, (100.0, 0.0));
    assert_close(plan.wall(b).unwrap().start, (120.0, 20.0));
    assert_eq!(plan.wall(a).unwrap().wall_at_end, None);
    assert_eq!(plan.wall(b).unwrap().wall_at_start, None);
}

#[test]
fn test_split_wall_then_undo_restores_the_original() {
    let test_plan = TestPlanBuilder::new()
        .with_rectangle_walls((0.0, 0.0), (200.0, 100.0), 10.0)
        .build();
    let original = test_plan.walls[0];
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller.plan_mut().select_items(vec![ItemId::Wall(original)]);

    controller.split_selected_wall().unwrap();
    let plan = controller.plan();
    assert_eq!(plan.walls().len(), 5);
    assert!(!plan.walls().contains(original));
    let halves: Vec<_> = plan.selected_items().iter().filter_map(|i| i.as_wall()).collect();
    assert_eq!(halves.len(), 2);
    let (first, second) = (plan.wall(halves[0]).unwrap(), plan.wall(halves[1]).unwrap());
    assert_close(first.start, (0.0, 0.0));
    assert_close(first.end, (100.0, 0.0));
    assert_close(second.end, (200.0, 0.0));
    assert_eq!(first.wall_at_end, Some(halves[1]));
    let ids: Vec<_> = plan.walls().ids().to_vec();
    assert!(joins_are_consistent(plan, &ids));

    controller.undo().unwrap();
    let plan = controller.plan();
    assert_eq!(plan.walls().len(), 4);
    let wall = plan.wall(original).unwrap();
    assert_close(wall.start, (0.0, 0.0));
    assert_close(wall.end, (200.0, 0.0));
    assert_eq!(plan.selected_items(), &[ItemId::Wall(original)]);
    let ids: Vec<_> = plan.walls().ids().to_vec();
    assert!(joins_are_consistent(plan, &ids));

    controller.redo().unwrap();
    assert_eq!(controller.plan().walls().len(), 5);
}

#[test]
fn test_reverse_walls_twice_is_identity() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (100.0, 0.0), 10.0)
        .build();
    let id = test_plan.walls[0];
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller.plan_mut().select_items(vec![ItemId::Wall(id)]);

    controller.reverse_selected_walls().unwrap();
    let wall = controller.plan().wall(id).unwrap();
    assert_close(wall.start, (100.0, 0.0));
    assert_close(wall.end, (0.0, 0.0));

    controller.reverse_selected_walls().unwrap();
    let wall = controller.plan().wall(id).unwrap();
    assert_close(wall.start, (0.0, 0.0));
    assert_close(wall.end, (100.0, 0.0));
}

#[test]
fn test_flip_horizontally_mirrors_pieces_about_the_selection_middle() {
    let test_plan = TestPlanBuilder::new()
        .with_piece(Piece::new("Chair", 100.0, 0.0, 50.0, 50.0, 90.0))
        .with_piece(Piece::new("Table", 300.0, 40.0, 50.0, 50.0, 75.0))
        .build();
    let (chair, table) = (test_plan.pieces[0], test_plan.pieces[1]);
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller
        .plan_mut()
        .select_items(vec![ItemId::Piece(chair), ItemId::Piece(table)]);

    controller.flip_horizontally().unwrap();
    let plan = controller.plan();
    assert_close(plan.piece(chair).unwrap().center(), (300.0, 0.0));
    assert_close(plan.piece(table).unwrap().center(), (100.0, 40.0));
    assert!(plan.piece(chair).unwrap().model_mirrored);

    controller.undo().unwrap();
    let plan = controller.plan();
    assert_close(plan.piece(chair).unwrap().center(), (100.0, 0.0));
    assert!(!plan.piece(chair).unwrap().model_mirrored);
}

#[test]
fn test_delete_selection_skips_locked_base_plan() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (100.0, 0.0), 10.0)
        .with_piece(Piece::new("Sofa", 50.0, 100.0, 200.0, 90.0, 80.0))
        .build();
    let (wall, sofa) = (test_plan.walls[0], test_plan.pieces[0]);
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller
        .plan_mut()
        .select_items(vec![ItemId::Wall(wall), ItemId::Piece(sofa)]);
    controller.plan_mut().set_base_plan_locked(true);

    controller.delete_selection().unwrap();
    let plan = controller.plan();
    assert!(plan.walls().contains(wall));
    assert!(!plan.furniture().contains(sofa));

    controller.undo().unwrap();
    assert!(controller.plan().furniture().contains(sofa));
}

#[test]
fn test_lock_base_plan_keeps_only_free_items_selected() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (100.0, 0.0), 10.0)
        .with_piece(Piece::new("Lamp", 50.0, 100.0, 30.0, 30.0, 150.0))
        .build();
    let (wall, lamp) = (test_plan.walls[0], test_plan.pieces[0]);
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller
        .plan_mut()
        .select_items(vec![ItemId::Wall(wall), ItemId::Piece(lamp)]);

    controller.lock_base_plan();
    assert!(controller.plan().is_base_plan_locked());
    assert_eq!(controller.plan().selected_items(), &[ItemId::Piece(lamp)]);

    controller.undo().unwrap();
    assert!(!controller.plan().is_base_plan_locked());
    assert_eq!(controller.plan().selected_items().len(), 2);
}
