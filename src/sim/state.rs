//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for Start
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Score dropped below zero
    GameOver,
}

/// Obstacle sprite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Tree,
    Burger,
    Ice,
    Brunch,
}

impl ObstacleKind {
    /// Spawn table (burgers are twice as likely)
    pub const SPAWN_TABLE: [ObstacleKind; 5] = [
        ObstacleKind::Tree,
        ObstacleKind::Burger,
        ObstacleKind::Ice,
        ObstacleKind::Brunch,
        ObstacleKind::Burger,
    ];

    pub fn color(&self) -> [f32; 3] {
        match self {
            ObstacleKind::Tree => [0.13, 0.55, 0.13],
            ObstacleKind::Burger => [0.80, 0.52, 0.25],
            ObstacleKind::Ice => [0.68, 0.85, 0.90],
            ObstacleKind::Brunch => [0.55, 0.27, 0.07],
        }
    }
}

/// Collectible sprite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Star,
    Coin,
    Gem,
    GemBlue,
    GemRed,
}

impl CollectibleKind {
    pub const SPAWN_TABLE: [CollectibleKind; 5] = [
        CollectibleKind::Star,
        CollectibleKind::Coin,
        CollectibleKind::Gem,
        CollectibleKind::GemBlue,
        CollectibleKind::GemRed,
    ];

    pub fn color(&self) -> [f32; 3] {
        match self {
            CollectibleKind::Star => [1.0, 0.95, 0.3],
            CollectibleKind::Coin => [1.0, 0.75, 0.1],
            CollectibleKind::Gem => [0.3, 0.95, 0.5],
            CollectibleKind::GemBlue => [0.25, 0.5, 1.0],
            CollectibleKind::GemRed => [0.95, 0.2, 0.3],
        }
    }
}

/// The player sprite
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Current tilt (radians)
    pub rotation: f32,
    pub half_size: Vec2,
    /// Ticks left of the red hit tint
    pub hit_flash: u32,
    /// Slowing down after the joystick was let go
    pub coasting: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            half_size: Vec2::splat(PLAYER_HALF_SIZE),
            hit_flash: 0,
            coasting: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_size)
    }

    pub fn is_flashing(&self) -> bool {
        self.hit_flash > 0
    }
}

/// Something to dodge
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub half_size: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.half_size))
    }
}

/// Something to pick up
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub half_size: f32,
}

impl Collectible {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.half_size))
    }
}

/// Things that happened during a tick (consumed by audio/HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Collision { obstacle_id: u32 },
    Collected { collectible_id: u32, kind: CollectibleKind },
    GameOver,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Playfield size in pixels
    pub arena: Vec2,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Upward drift of obstacles and collectibles (pixels per tick)
    pub obstacle_speed: f32,
    pub score: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks spent in `Playing` this round
    pub play_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, arena: Vec2) -> Self {
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            arena,
            player: Player::new(arena / 2.0),
            obstacles: Vec::with_capacity(OBSTACLE_COUNT),
            collectibles: Vec::with_capacity(COLLECTIBLE_COUNT),
            obstacle_speed: MAX_SPEED / 2.0,
            score: 0.0,
            time_ticks: 0,
            play_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        for _ in 0..OBSTACLE_COUNT {
            let id = state.next_entity_id();
            let kind = ObstacleKind::SPAWN_TABLE
                [state.rng.random_range(0..ObstacleKind::SPAWN_TABLE.len())];
            let pos = spawn_below(&mut state.rng, arena);
            state.obstacles.push(Obstacle {
                id,
                kind,
                pos,
                half_size: OBSTACLE_HALF_SIZE,
            });
        }

        for _ in 0..COLLECTIBLE_COUNT {
            let id = state.next_entity_id();
            let kind = CollectibleKind::SPAWN_TABLE
                [state.rng.random_range(0..CollectibleKind::SPAWN_TABLE.len())];
            let pos = spawn_below(&mut state.rng, arena);
            state.collectibles.push(Collectible {
                id,
                kind,
                pos,
                half_size: COLLECTIBLE_HALF_SIZE,
            });
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh round: score, player, speed and object positions (phase untouched)
    pub fn reset_round(&mut self) {
        self.score = 0.0;
        self.play_ticks = 0;
        self.player = Player::new(self.arena / 2.0);
        self.obstacle_speed = MAX_SPEED / 2.0;

        let arena = self.arena;
        for obstacle in &mut self.obstacles {
            obstacle.pos = spawn_below(&mut self.rng, arena);
        }
        for collectible in &mut self.collectibles {
            collectible.pos = spawn_below(&mut self.rng, arena);
        }
    }

    /// Reset and start playing ("Play again")
    pub fn restart(&mut self) {
        self.reset_round();
        self.phase = GamePhase::Playing;
        log::info!("Round restarted");
    }

    /// Resize the playfield; the player is re-centered
    pub fn set_arena(&mut self, arena: Vec2) {
        self.arena = arena;
        self.player.pos = arena / 2.0;
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Random position below the bottom edge, within one screen height
pub fn spawn_below(rng: &mut Pcg32, arena: Vec2) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * arena.x,
        arena.y + rng.random::<f32>() * arena.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let arena = Vec2::new(800.0, 600.0);
        let state = GameState::new(7, arena);

        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.obstacles.len(), OBSTACLE_COUNT);
        assert_eq!(state.collectibles.len(), COLLECTIBLE_COUNT);
        assert_eq!(state.obstacle_speed, MAX_SPEED / 2.0);

        for pos in state
            .obstacles
            .iter()
            .map(|o| o.pos)
            .chain(state.collectibles.iter().map(|c| c.pos))
        {
            assert!((0.0..=arena.x).contains(&pos.x));
            assert!((arena.y..=arena.y * 2.0).contains(&pos.y));
        }
    }

    #[test]
    fn test_entity_ids_unique() {
        let state = GameState::new(7, Vec2::new(800.0, 600.0));
        let mut ids: Vec<u32> = state
            .obstacles
            .iter()
            .map(|o| o.id)
            .chain(state.collectibles.iter().map(|c| c.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), OBSTACLE_COUNT + COLLECTIBLE_COUNT);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut state = GameState::new(7, Vec2::new(800.0, 600.0));
        state.score = -3.0;
        state.obstacle_speed = 9.0;
        state.player.vel = Vec2::new(3.0, 1.0);
        state.phase = GamePhase::GameOver;

        state.restart();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.obstacle_speed, MAX_SPEED / 2.0);
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_display_score_rounds() {
        let mut state = GameState::new(1, Vec2::new(100.0, 100.0));
        state.score = 12.5;
        assert_eq!(state.display_score(), 13);
        state.score = 12.4;
        assert_eq!(state.display_score(), 12);
    }
}
