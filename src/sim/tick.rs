//! Fixed timestep simulation tick
//!
//! Advances the game by one 60 Hz frame. All speeds are in pixels per tick.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, spawn_below};
use crate::consts::*;
use crate::{approach_zero, lerp};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Arrow keys currently held
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Start / pause / resume toggle (Enter)
    pub advance: bool,
    /// Latest joystick velocity, if it changed since the last tick
    pub stick_velocity: Option<Vec2>,
    /// The joystick was released since the last tick
    pub stick_released: bool,
}

impl TickInput {
    /// Clear one-shot inputs after they have been consumed
    pub fn clear_one_shots(&mut self) {
        self.advance = false;
        self.stick_velocity = None;
        self.stick_released = false;
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if input.advance {
        advance_phase(state);
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    state.play_ticks += 1;

    steer_player(state, input);
    move_player(state);

    state.score += SCORE_PER_TICK;

    update_obstacles(state);
    update_collectibles(state);

    if state.score < 0.0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over after {} ticks", state.play_ticks);
        return;
    }

    if state.play_ticks % SPEED_RAMP_TICKS == 0 {
        state.obstacle_speed += SPEED_RAMP;
        log::debug!("Obstacle speed now {:.1}", state.obstacle_speed);
    }
}

/// Enter-key phase cycle
pub fn advance_phase(state: &mut GameState) {
    state.phase = match state.phase {
        GamePhase::Start => GamePhase::Playing,
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
        GamePhase::GameOver => {
            state.reset_round();
            GamePhase::Start
        }
    };
    log::info!("Phase: {:?}", state.phase);
}

/// Apply joystick and keyboard input to the player's velocity
fn steer_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if let Some(velocity) = input.stick_velocity {
        player.vel = velocity;
        player.coasting = false;
    }
    if input.stick_released {
        player.coasting = true;
    }

    let vel = &mut player.vel;
    if input.up {
        vel.y = (vel.y - ACCELERATION).max(-MAX_SPEED);
    }
    if input.down {
        vel.y = (vel.y + ACCELERATION).min(MAX_SPEED);
    }
    if input.left {
        vel.x = (vel.x - ACCELERATION).max(-MAX_SPEED);
    }
    if input.right {
        vel.x = (vel.x + ACCELERATION).min(MAX_SPEED);
    }

    if !input.up && !input.down {
        vel.y = approach_zero(vel.y, DECELERATION);
    }
    if !input.left && !input.right {
        vel.x = approach_zero(vel.x, DECELERATION);
    }

    if player.coasting {
        player.vel.x = approach_zero(player.vel.x, DECELERATION);
        player.vel.y = approach_zero(player.vel.y, DECELERATION);
        if player.vel == Vec2::ZERO {
            player.coasting = false;
        }
    }
}

/// Integrate position, keep the player on screen, tilt toward the drift
fn move_player(state: &mut GameState) {
    let arena = state.arena;
    let player = &mut state.player;

    player.pos += player.vel;
    let min = player.half_size;
    let max = (arena - player.half_size).max(min);
    player.pos = player.pos.clamp(min, max);

    let target_rotation = if player.vel.x < 0.0 {
        PLAYER_TILT
    } else if player.vel.x > 0.0 {
        -PLAYER_TILT
    } else {
        0.0
    };
    player.rotation = lerp(player.rotation, target_rotation, TILT_LERP);

    player.hit_flash = player.hit_flash.saturating_sub(1);
}

fn update_obstacles(state: &mut GameState) {
    let GameState {
        rng,
        arena,
        player,
        obstacles,
        obstacle_speed,
        score,
        events,
        ..
    } = state;

    for obstacle in obstacles.iter_mut() {
        obstacle.pos.y -= *obstacle_speed;

        // Recycle once fully above the top edge
        if obstacle.pos.y < -obstacle.half_size * 2.0 {
            obstacle.pos = spawn_below(rng, *arena);
        }

        if player.bounds().overlaps(&obstacle.bounds()) {
            player.vel *= 0.5;
            player.hit_flash = HIT_FLASH_TICKS;
            *score -= COLLISION_PENALTY;
            events.push(GameEvent::Collision {
                obstacle_id: obstacle.id,
            });
            log::debug!("Collision with obstacle {}", obstacle.id);
        }
    }
}

fn update_collectibles(state: &mut GameState) {
    let GameState {
        rng,
        arena,
        player,
        collectibles,
        obstacle_speed,
        score,
        events,
        ..
    } = state;

    for collectible in collectibles.iter_mut() {
        collectible.pos.y -= *obstacle_speed;

        if collectible.pos.y < -collectible.half_size * 2.0 {
            collectible.pos = spawn_below(rng, *arena);
        }

        if player.bounds().overlaps(&collectible.bounds()) {
            *score += COLLECT_REWARD;
            events.push(GameEvent::Collected {
                collectible_id: collectible.id,
                kind: collectible.kind,
            });
            log::debug!("Collected {:?} {}", collectible.kind, collectible.id);
            collectible.pos = spawn_below(rng, *arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    /// Playing state with every falling object parked far below the screen
    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345, ARENA);
        state.phase = GamePhase::Playing;
        for obstacle in &mut state.obstacles {
            obstacle.pos = Vec2::new(400.0, 1.0e6);
        }
        for collectible in &mut state.collectibles {
            collectible.pos = Vec2::new(400.0, 1.0e6);
        }
        state
    }

    fn advance() -> TickInput {
        TickInput {
            advance: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_cycle() {
        let mut state = GameState::new(1, ARENA);
        assert_eq!(state.phase, GamePhase::Start);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0.0);

        tick(&mut state, &advance());
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, &advance());
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.score;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, frozen);

        tick(&mut state, &advance());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_returns_to_fresh_start() {
        let mut state = quiet_state();
        state.phase = GamePhase::GameOver;
        state.score = -4.0;

        tick(&mut state, &advance());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_score_accrues_while_playing() {
        let mut state = quiet_state();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!((state.score - 1.0).abs() < 1e-4);
        assert_eq!(state.display_score(), 1);
    }

    #[test]
    fn test_keyboard_acceleration_is_capped() {
        let mut state = quiet_state();
        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!((state.player.vel.x - ACCELERATION).abs() < 1e-6);
        assert!((state.player.vel.y + ACCELERATION).abs() < 1e-6);

        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.vel.x, MAX_SPEED);
        assert_eq!(state.player.vel.y, -MAX_SPEED);
        assert!(state.player.rotation < 0.0);
    }

    #[test]
    fn test_released_keys_decelerate() {
        let mut state = quiet_state();
        state.player.vel = Vec2::new(-1.0, 0.25);

        tick(&mut state, &TickInput::default());
        assert!((state.player.vel.x + 0.9).abs() < 1e-6);
        assert!((state.player.vel.y - 0.15).abs() < 1e-6);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_stick_velocity_drives_player() {
        let mut state = quiet_state();
        let start = state.player.pos;

        let input = TickInput {
            stick_velocity: Some(Vec2::new(5.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &input);

        // Replaced, then one deceleration step with no keys held
        assert!((state.player.vel.x - 4.9).abs() < 1e-6);
        assert!((state.player.pos.x - (start.x + 4.9)).abs() < 1e-4);
        assert!(state.player.rotation < 0.0);
    }

    #[test]
    fn test_top_speed_is_pixels_per_tick() {
        let mut state = quiet_state();
        state.player.vel = Vec2::new(MAX_SPEED, 0.0);
        let start = state.player.pos;
        let input = TickInput {
            right: true,
            ..Default::default()
        };

        for _ in 0..10 {
            tick(&mut state, &input);
        }
        assert!((state.player.pos.x - (start.x + 10.0 * MAX_SPEED)).abs() < 1e-3);
    }

    #[test]
    fn test_stick_release_coasts_to_stop() {
        let mut state = quiet_state();
        tick(
            &mut state,
            &TickInput {
                stick_velocity: Some(Vec2::new(0.0, -3.0)),
                ..Default::default()
            },
        );
        tick(
            &mut state,
            &TickInput {
                stick_released: true,
                ..Default::default()
            },
        );
        assert!(state.player.coasting);
        // Two steps per tick while coasting
        assert!((state.player.vel.y + 2.7).abs() < 1e-5);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.player.coasting);
    }

    #[test]
    fn test_player_stays_in_arena() {
        let mut state = quiet_state();
        state.player.pos = Vec2::new(30.0, 30.0);
        let input = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..50 {
            tick(&mut state, &input);
        }
        assert_eq!(state.player.pos, Vec2::splat(PLAYER_HALF_SIZE));
    }

    #[test]
    fn test_obstacle_collision_penalizes() {
        let mut state = quiet_state();
        state.score = 10.0;
        state.player.vel = Vec2::new(2.0, 0.0);
        let speed = state.obstacle_speed;
        // Will rise onto the player this tick
        state.obstacles[0].pos = state.player.pos + Vec2::new(2.0, speed);
        let id = state.obstacles[0].id;

        tick(&mut state, &TickInput::default());

        assert!((state.score - (10.0 + SCORE_PER_TICK - COLLISION_PENALTY)).abs() < 1e-4);
        assert!((state.player.vel.x - 0.95).abs() < 1e-6);
        assert_eq!(state.player.hit_flash, HIT_FLASH_TICKS);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Collision { obstacle_id: id }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_collectible_pickup_rewards_and_respawns() {
        let mut state = quiet_state();
        let speed = state.obstacle_speed;
        state.collectibles[2].pos = state.player.pos + Vec2::new(0.0, speed);
        let id = state.collectibles[2].id;
        let kind = state.collectibles[2].kind;

        tick(&mut state, &TickInput::default());

        assert!((state.score - (SCORE_PER_TICK + COLLECT_REWARD)).abs() < 1e-4);
        assert!(state.collectibles[2].pos.y >= ARENA.y);
        assert_eq!(
            state.events,
            vec![GameEvent::Collected {
                collectible_id: id,
                kind
            }]
        );
    }

    #[test]
    fn test_negative_score_ends_game() {
        let mut state = quiet_state();
        let speed = state.obstacle_speed;
        state.obstacles[0].pos = state.player.pos + Vec2::new(0.0, speed);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events.last(), Some(&GameEvent::GameOver));

        // Frozen until the player advances
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_objects_recycle_below_screen() {
        let mut state = quiet_state();
        state.obstacles[3].pos = Vec2::new(700.0, -2.0 * OBSTACLE_HALF_SIZE + 1.0);

        tick(&mut state, &TickInput::default());

        let pos = state.obstacles[3].pos;
        assert!(pos.y >= ARENA.y && pos.y <= ARENA.y * 2.0);
    }

    #[test]
    fn test_obstacle_speed_ramps() {
        let mut state = quiet_state();
        let base = state.obstacle_speed;

        for _ in 0..SPEED_RAMP_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.obstacle_speed, base);

        tick(&mut state, &TickInput::default());
        assert!((state.obstacle_speed - (base + SPEED_RAMP)).abs() < 1e-6);
    }

    #[test]
    fn test_clear_one_shots_keeps_held_keys() {
        let mut input = TickInput {
            left: true,
            advance: true,
            stick_velocity: Some(Vec2::ONE),
            stick_released: true,
            ..Default::default()
        };
        input.clear_one_shots();
        assert!(input.left);
        assert!(!input.advance);
        assert!(input.stick_velocity.is_none());
        assert!(!input.stick_released);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, ARENA);
        let mut state2 = GameState::new(99999, ARENA);
        let start_pos = state1.player.pos;
        let start_obstacles: Vec<Vec2> = state1.obstacles.iter().map(|o| o.pos).collect();

        tick(&mut state1, &advance());
        tick(&mut state2, &advance());
        assert_eq!(state1.phase, GamePhase::Playing);

        let inputs = [
            TickInput {
                stick_velocity: Some(Vec2::new(3.0, -4.0)),
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        // The run actually played
        assert!(state1.play_ticks > 0);
        assert_ne!(state1.player.pos, start_pos);
        assert!(
            state1
                .obstacles
                .iter()
                .zip(&start_obstacles)
                .any(|(o, start)| o.pos != *start)
        );

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.play_ticks, state2.play_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.vel, state2.player.vel);
        for (a, b) in state1.obstacles.iter().zip(&state2.obstacles) {
            assert_eq!(a.pos, b.pos);
        }
        for (a, b) in state1.collectibles.iter().zip(&state2.collectibles) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
