//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{
    Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player,
};
pub use tick::{TickInput, advance_phase, tick};
