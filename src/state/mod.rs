pub mod camera;
pub mod touch;

pub use camera::{Camera, ViewportState, WheelInput};
