//! Platform abstraction layer
//!
//! Browser input plumbing. Listener lifetimes are tied to the values that
//! register them, so several widgets can be bound and torn down independently.

pub mod pointer;

pub use pointer::PointerTracker;

#[cfg(target_arch = "wasm32")]
pub use pointer::PointerBinding;
