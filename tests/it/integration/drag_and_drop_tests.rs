//! Drag and Drop Integration Tests

use crate::helpers::{controller, exact_preferences, TestPlanBuilder};
use planwright::config::Preferences;
use planwright::controller::StateId;
use planwright::error::StateError;
use planwright::plan::{DoorOrWindow, ItemId, Piece, PieceCopy, Plan, PlanItem};
use planwright::PlanError;

fn door_item() -> PlanItem {
    PlanItem::Piece(PieceCopy {
        piece: Piece::door_or_window("Door", 0.0, 0.0, 80.0, 10.0, 210.0, DoorOrWindow::default()),
        children: Vec::new(),
    })
}

fn table_item() -> PlanItem {
    PlanItem::Piece(PieceCopy {
        piece: Piece::new("Table", 0.0, 0.0, 120.0, 80.0, 75.0),
        children: Vec::new(),
    })
}

#[test]
fn test_door_dragged_onto_a_wall_gets_bound_to_it() {
    let test_plan = TestPlanBuilder::new()
        .with_wall((0.0, 0.0), (300.0, 0.0), 20.0)
        .build();
    let mut controller = controller(test_plan.plan, Preferences::default());

    controller.start_dragged_items(vec![door_item()], 150.0, 200.0).unwrap();
    assert_eq!(controller.state_id(), StateId::DragAndDrop);
    controller.move_mouse(150.0, 3.0).unwrap();
    controller.release_mouse(150.0, 3.0).unwrap();
    assert_eq!(controller.state_id(), StateId::Selection);

    let plan = controller.plan();
    assert_eq!(plan.furniture().len(), 1);
    let (id, door) = plan.furniture().iter().next().unwrap();
    assert!(door.is_bound_to_wall());
    // Depth fits the wall thickness and the door sits in the wall middle.
    assert!((door.depth - 20.0).abs() < 1e-9);
    assert!((door.x - 150.0).abs() < 1e-9);
    assert!(door.y.abs() < 1e-9);
    assert_eq!(plan.selected_items(), &[ItemId::Piece(id)]);

    controller.undo().unwrap();
    assert!(controller.plan().furniture().is_empty());
}

#[test]
fn test_stopping_a_drag_removes_the_dragged_items() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller
        .start_dragged_items(vec![table_item()], 100.0, 100.0)
        .unwrap();
    assert_eq!(controller.plan().furniture().len(), 1);
    assert!(controller.is_modification_state());

    controller.stop_dragged_items().unwrap();
    assert!(controller.plan().furniture().is_empty());
    assert!(controller.plan().selected_items().is_empty());
    assert!(!controller.can_undo());
}

#[test]
fn test_stop_dragged_items_outside_a_drag_is_rejected() {
    let mut controller = controller(Plan::new(), exact_preferences());
    let error = controller.stop_dragged_items().unwrap_err();
    assert!(matches!(
        error,
        PlanError::State(StateError::InvalidControllerState { operation: "stop_dragged_items", .. })
    ));
}

#[test]
fn test_dropped_items_are_translated_and_selected() {
    let mut controller = controller(Plan::new(), exact_preferences());
    controller
        .drop_items(&[table_item(), table_item()], 250.0, 40.0)
        .unwrap();

    let plan = controller.plan();
    assert_eq!(plan.furniture().len(), 2);
    for (_, piece) in plan.furniture().iter() {
        assert!((piece.x - 250.0).abs() < 1e-9);
        assert!((piece.y - 40.0).abs() < 1e-9);
    }
    assert_eq!(plan.selected_items().len(), 2);

    controller.undo().unwrap();
    assert!(controller.plan().furniture().is_empty());
}
