//! On-screen controls
//!
//! Input widgets that turn pointer gestures into movement signals. They do
//! not touch game state; hosts subscribe through callbacks.

pub mod joystick;
pub mod visual;

pub use joystick::{
    clamp_offset, power_of, velocity_of, ChangeHook, Direction, DragState, EndHook, Joystick,
    JoystickChangeEvent, JoystickError, JoystickSettings, PointerInput, StartHook,
};
pub use visual::{CircleVisual, Painter, Visual};
