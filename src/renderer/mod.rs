//! Rendering module
//!
//! `scene` decides what to draw through the `Painter` trait; `canvas` is the
//! browser backend.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::draw_scene;
