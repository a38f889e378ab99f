mod commands_tests;
mod drag_and_drop_tests;
mod drawing_tests;
