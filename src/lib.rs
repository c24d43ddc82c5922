//! Dodge Stick - a 2D dodge-and-collect arcade game
//!
//! Core modules:
//! - `control`: Virtual joystick widget (drag gestures → direction/power/velocity)
//! - `sim`: Deterministic simulation (player, obstacles, collectibles, score)
//! - `renderer`: Canvas 2D drawing
//! - `platform`: Browser input binding
//! - `settings`: Persisted player preferences

pub mod control;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use control::{Direction, Joystick, JoystickChangeEvent, JoystickSettings};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player movement (pixels per tick)
    pub const MAX_SPEED: f32 = 5.0;
    pub const ACCELERATION: f32 = 0.2;
    pub const DECELERATION: f32 = 0.1;

    /// Player sprite half-extents
    pub const PLAYER_HALF_SIZE: f32 = 24.0;
    /// Rotation while drifting sideways (radians, ~20 degrees)
    pub const PLAYER_TILT: f32 = 0.349;
    /// Fraction of the remaining rotation applied per tick
    pub const TILT_LERP: f32 = 0.1;
    /// Red tint duration after a hit (200 ms)
    pub const HIT_FLASH_TICKS: u32 = 12;

    /// Falling objects
    pub const OBSTACLE_COUNT: usize = 10;
    pub const COLLECTIBLE_COUNT: usize = 5;
    pub const OBSTACLE_HALF_SIZE: f32 = 19.0;
    pub const COLLECTIBLE_HALF_SIZE: f32 = 14.0;
    /// Obstacle speed increase and its interval (5 s)
    pub const SPEED_RAMP: f32 = 0.1;
    pub const SPEED_RAMP_TICKS: u64 = 300;

    /// Scoring
    pub const SCORE_PER_TICK: f32 = 0.1;
    pub const COLLISION_PENALTY: f32 = 5.0;
    pub const COLLECT_REWARD: f32 = 5.0;

    /// Joystick defaults
    pub const JOYSTICK_SIZE: f32 = 120.0;
    pub const JOYSTICK_MARGIN: f32 = 20.0;
    /// outer_radius = width / JOYSTICK_RADIUS_DIVISOR
    pub const JOYSTICK_RADIUS_DIVISOR: f32 = 2.5;
    pub const JOYSTICK_OUTER_RADIUS: f32 = 60.0;
    pub const JOYSTICK_INNER_RADIUS: f32 = 35.0;
    pub const JOYSTICK_OUTER_ALPHA: f32 = 0.5;
    pub const JOYSTICK_INNER_ALPHA_STANDBY: f32 = 0.5;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Linear interpolation from `start` toward `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Move `value` toward zero by `step` without overshooting
#[inline]
pub fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, PI / 2.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_approach_zero_does_not_overshoot() {
        assert_eq!(approach_zero(0.05, 0.1), 0.0);
        assert_eq!(approach_zero(-0.05, 0.1), 0.0);
        assert!((approach_zero(1.0, 0.1) - 0.9).abs() < 1e-6);
        assert!((approach_zero(-1.0, 0.1) + 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.1), 1.0);
    }
}
