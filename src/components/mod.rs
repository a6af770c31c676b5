pub mod app;
pub mod board_view;
pub mod camera_controls;
pub mod charset_dialog;
