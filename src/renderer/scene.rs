//! Scene drawing through the `Painter` abstraction
//!
//! Kept free of browser types so the draw order can be checked natively.

use glam::Vec2;

use crate::Joystick;
use crate::control::Painter;
use crate::sim::GameState;

/// Player body color
pub const PLAYER_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Player tint while hit-flashing
pub const HIT_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Draw one frame: falling objects, player, then the joystick on top
pub fn draw_scene(
    state: &GameState,
    joystick: &Joystick,
    painter: &mut dyn Painter,
    hit_flash: bool,
) {
    for obstacle in &state.obstacles {
        painter.fill_rect(
            obstacle.pos,
            Vec2::splat(obstacle.half_size),
            0.0,
            obstacle.kind.color(),
            1.0,
        );
    }

    for collectible in &state.collectibles {
        painter.fill_circle(
            collectible.pos,
            collectible.half_size,
            collectible.kind.color(),
            1.0,
        );
    }

    let player = &state.player;
    let color = if hit_flash && player.is_flashing() {
        HIT_COLOR
    } else {
        PLAYER_COLOR
    };
    painter.fill_rect(player.pos, player.half_size, player.rotation, color, 1.0);

    joystick.paint(painter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JoystickSettings;
    use crate::consts::{COLLECTIBLE_COUNT, OBSTACLE_COUNT};

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle { center: Vec2, alpha: f32 },
        Rect { center: Vec2, color: [f32; 3] },
    }

    #[derive(Default)]
    struct Recorder {
        shapes: Vec<Shape>,
    }

    impl Painter for Recorder {
        fn fill_circle(&mut self, center: Vec2, _radius: f32, _color: [f32; 3], alpha: f32) {
            self.shapes.push(Shape::Circle { center, alpha });
        }

        fn fill_rect(&mut self, center: Vec2, _: Vec2, _: f32, color: [f32; 3], _: f32) {
            self.shapes.push(Shape::Rect { center, color });
        }
    }

    fn scene() -> (GameState, Joystick) {
        let state = GameState::new(3, Vec2::new(800.0, 600.0));
        let mut joystick = Joystick::new(JoystickSettings::new(120.0, 120.0, 5.0)).unwrap();
        joystick.set_position(Vec2::new(80.0, 520.0));
        (state, joystick)
    }

    #[test]
    fn test_draw_order_ends_with_joystick() {
        let (state, mut joystick) = scene();
        joystick.press(Vec2::ZERO);
        joystick.drag_to(Vec2::new(10.0, 0.0));

        let mut painter = Recorder::default();
        draw_scene(&state, &joystick, &mut painter, true);

        let n = painter.shapes.len();
        assert_eq!(n, OBSTACLE_COUNT + COLLECTIBLE_COUNT + 1 + 2);
        assert_eq!(
            painter.shapes[n - 2],
            Shape::Circle {
                center: Vec2::new(80.0, 520.0),
                alpha: 0.5
            }
        );
        assert_eq!(
            painter.shapes[n - 1],
            Shape::Circle {
                center: Vec2::new(90.0, 520.0),
                alpha: 1.0
            }
        );
    }

    #[test]
    fn test_player_tinted_while_flashing() {
        let (mut state, joystick) = scene();
        state.player.hit_flash = 3;
        let player_index = OBSTACLE_COUNT + COLLECTIBLE_COUNT;

        let mut painter = Recorder::default();
        draw_scene(&state, &joystick, &mut painter, true);
        assert!(matches!(
            painter.shapes[player_index],
            Shape::Rect { color, .. } if color == HIT_COLOR
        ));

        let mut painter = Recorder::default();
        draw_scene(&state, &joystick, &mut painter, false);
        assert!(matches!(
            painter.shapes[player_index],
            Shape::Rect { color, .. } if color == PLAYER_COLOR
        ));
    }
}
