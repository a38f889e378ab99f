//! Drawing Workflow Integration Tests

use crate::helpers::{assert_close, click, controller, drag, exact_preferences, TestPlanBuilder};
use planwright::config::Preferences;
use planwright::controller::StateId;
use planwright::plan::{ItemId, Plan};
use planwright::topology::joins_are_consistent;
use planwright::Mode;

#[test]
fn test_closing_a_wall_chain_joins_every_wall() {
    let mut controller = controller(Plan::new(), Preferences::default());
    controller.set_mode(Mode::WallCreation).unwrap();

    click(&mut controller, 0.0, 0.0);
    assert_eq!(controller.state_id(), StateId::WallDrawing);
    click(&mut controller, 400.0, 0.0);
    click(&mut controller, 400.0, 300.0);
    click(&mut controller, 0.0, 300.0);
    click(&mut controller, 0.0, 0.0);

    assert_eq!(controller.state_id(), StateId::WallCreation);
    let plan = controller.plan();
    assert_eq!(plan.walls().len(), 4);
    let ids: Vec<_> = plan.walls().ids().to_vec();
    assert!(joins_are_consistent(plan, &ids));
    let lengths: Vec<f64> = plan.walls().iter().map(|(_, wall)| wall.length()).collect();
    for (length, expected) in lengths.iter().zip([400.0, 300.0, 400.0, 300.0]) {
        assert!((length - expected).abs() < 1e-6, "length {length}");
    }
    for (_, wall) in plan.walls().iter() {
        assert!(wall.wall_at_start.is_some());
        assert!(wall.wall_at_end.is_some());
        let direction = wall.end - wall.start;
        assert!(direction.x.abs() < 1e-6 || direction.y.abs() < 1e-6);
    }
    assert_eq!(plan.selected_items().len(), 4);
}

#[test]
fn test_wall_snaps_to_angle_steps_away_from_distant_walls() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((2000.0, 3.0), (2500.0, 3.0), 10.0)
        .build();
    let mut controller = controller(test_plan.plan, Preferences::default());
    controller.set_mode(Mode::WallCreation).unwrap();
    click(&mut controller, 0.0, 0.0);
    click(&mut controller, 300.0, 1.0);
    controller.escape().unwrap();

    let plan = controller.plan();
    assert_eq!(plan.walls().len(), 2);
    let (_, drawn) = plan.walls().iter().last().unwrap();
    assert_close(drawn.start, (0.0, 0.0));
    assert_close(drawn.end, (300.0, 0.0));
}

#[test]
fn test_drawn_walls_are_undone_in_one_step() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller.set_mode(Mode::WallCreation).unwrap();
    click(&mut controller, 0.0, 0.0);
    click(&mut controller, 300.0, 0.0);
    click(&mut controller, 300.0, 200.0);
    controller.escape().unwrap();
    assert_eq!(controller.plan().walls().len(), 2);

    controller.undo().unwrap();
    assert!(controller.plan().walls().is_empty());
    assert!(controller.can_redo());

    controller.redo().unwrap();
    assert_eq!(controller.plan().walls().len(), 2);
}

#[test]
fn test_escape_keeps_committed_walls_only() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller.set_mode(Mode::WallCreation).unwrap();
    click(&mut controller, 0.0, 0.0);
    controller.move_mouse(150.0, 0.0).unwrap();
    controller.escape().unwrap();

    assert!(controller.plan().walls().is_empty());
    assert!(!controller.can_undo());
}

#[test]
fn test_double_click_in_closed_walls_creates_a_room() {
    let test_plan = TestPlanBuilder::new()
        .with_rectangle_walls((0.0, 0.0), (400.0, 300.0), 10.0)
        .build();
    let mut controller = controller(test_plan.plan, Preferences::default());
    controller.set_mode(Mode::RoomCreation).unwrap();
    controller.press_mouse(200.0, 150.0, 2, false, false).unwrap();

    let plan = controller.plan();
    assert_eq!(plan.rooms().len(), 1);
    let (id, room) = plan.rooms().iter().next().unwrap();
    // Walls are 10 thick, so the room stops 5 inside each wall line.
    assert!((room.area() - 390.0 * 290.0).abs() < 1.0, "area {}", room.area());
    assert_eq!(plan.selected_items(), &[ItemId::Room(id)]);

    controller.undo().unwrap();
    assert!(controller.plan().rooms().is_empty());
}

#[test]
fn test_double_click_outside_walls_creates_nothing() {
    let test_plan = TestPlanBuilder::new()
        .with_rectangle_walls((0.0, 0.0), (400.0, 300.0), 10.0)
        .build();
    let mut controller = controller(test_plan.plan, Preferences::default());
    controller.set_mode(Mode::RoomCreation).unwrap();
    controller.press_mouse(600.0, 150.0, 2, false, false).unwrap();

    assert!(controller.plan().rooms().is_empty());
    assert!(!controller.can_undo());
}

#[test]
fn test_double_click_in_a_room_surrounds_it_with_walls() {
    let test_plan = TestPlanBuilder::new()
        .with_room(&[(0.0, 0.0), (300.0, 0.0), (300.0, 200.0), (0.0, 200.0)])
        .build();
    let mut controller = controller(test_plan.plan, Preferences::default());
    controller.set_mode(Mode::WallCreation).unwrap();
    controller.press_mouse(150.0, 100.0, 2, false, false).unwrap();

    let plan = controller.plan();
    assert_eq!(plan.walls().len(), 4);
    let ids: Vec<_> = plan.walls().ids().to_vec();
    assert!(joins_are_consistent(plan, &ids));
    for (_, wall) in plan.walls().iter() {
        // Walls stand outside of the room.
        let middle = wall.start + (wall.end - wall.start) / 2.0;
        assert!(!(middle.x > 0.0 && middle.x < 300.0 && middle.y > 0.0 && middle.y < 200.0));
    }
}

#[test]
fn test_room_drawn_point_by_point_closes_on_its_first_point() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller.set_mode(Mode::RoomCreation).unwrap();
    click(&mut controller, 0.0, 0.0);
    assert_eq!(controller.state_id(), StateId::RoomDrawing);
    click(&mut controller, 200.0, 0.0);
    click(&mut controller, 200.0, 100.0);
    click(&mut controller, 0.0, 100.0);
    click(&mut controller, 0.0, 0.0);

    assert_eq!(controller.state_id(), StateId::RoomCreation);
    let plan = controller.plan();
    assert_eq!(plan.rooms().len(), 1);
    let (_, room) = plan.rooms().iter().next().unwrap();
    assert_eq!(room.points.len(), 4);
    assert!((room.area() - 20_000.0).abs() < 1e-6);
}

#[test]
fn test_room_with_two_points_is_dropped() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller.set_mode(Mode::RoomCreation).unwrap();
    click(&mut controller, 0.0, 0.0);
    click(&mut controller, 200.0, 0.0);
    controller.move_mouse(200.0, 100.0).unwrap();
    controller.escape().unwrap();

    assert!(controller.plan().rooms().is_empty());
    assert!(!controller.can_undo());
}

#[test]
fn test_moving_a_selected_wall_is_undoable() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (100.0, 0.0), 10.0)
        .build();
    let id = test_plan.walls[0];
    let mut controller = controller(test_plan.plan, exact_preferences());
    controller.plan_mut().select_items(vec![ItemId::Wall(id)]);

    drag(&mut controller, (25.0, 0.0), (25.0, 40.0));
    assert_eq!(controller.state_id(), StateId::Selection);
    let wall = controller.plan().wall(id).unwrap();
    assert_close(wall.start, (0.0, 40.0));
    assert_close(wall.end, (100.0, 40.0));

    controller.undo().unwrap();
    let wall = controller.plan().wall(id).unwrap();
    assert_close(wall.start, (0.0, 0.0));
}
