//! Visual handles owned by the joystick
//!
//! The joystick only needs a small capability set from whatever it draws:
//! position, scale, opacity, size and (optionally) an anchor point. Hosts can
//! plug in their own drawables; `CircleVisual` is the built-in default.

use glam::Vec2;

/// Drawing surface provided by the host
pub trait Painter {
    /// Fill a circle centered at `center`
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 3], alpha: f32);

    /// Fill a rectangle centered at `center`, rotated by `rotation` radians
    fn fill_rect(
        &mut self,
        center: Vec2,
        half_size: Vec2,
        rotation: f32,
        color: [f32; 3],
        alpha: f32,
    );
}

/// Capability set required from a joystick layer
pub trait Visual {
    fn set_position(&mut self, pos: Vec2);
    fn position(&self) -> Vec2;

    fn set_scale(&mut self, scale: Vec2);
    fn scale(&self) -> Vec2;

    fn set_alpha(&mut self, alpha: f32);
    fn alpha(&self) -> f32;

    /// Width after scaling
    fn width(&self) -> f32;
    /// Height after scaling
    fn height(&self) -> f32;

    /// Set the normalized anchor point. Returns `false` when the visual has no
    /// anchor concept (it is then assumed to be drawn around its origin).
    fn set_anchor(&mut self, _anchor: Vec2) -> bool {
        false
    }

    /// Draw relative to the parent's origin
    fn paint(&self, painter: &mut dyn Painter, origin: Vec2);
}

/// Filled circle, drawn centered on its position
#[derive(Debug, Clone, PartialEq)]
pub struct CircleVisual {
    pub radius: f32,
    pub color: [f32; 3],
    pub alpha: f32,
    pub scale: Vec2,
    pub position: Vec2,
}

impl CircleVisual {
    pub fn new(radius: f32, color: [f32; 3], alpha: f32) -> Self {
        Self {
            radius,
            color,
            alpha,
            scale: Vec2::ONE,
            position: Vec2::ZERO,
        }
    }
}

impl Visual for CircleVisual {
    fn set_position(&mut self, pos: Vec2) {
        self.position = pos;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn width(&self) -> f32 {
        self.radius * 2.0 * self.scale.x.abs()
    }

    fn height(&self) -> f32 {
        self.radius * 2.0 * self.scale.y.abs()
    }

    fn paint(&self, painter: &mut dyn Painter, origin: Vec2) {
        if self.alpha <= 0.0 {
            return;
        }
        // Non-uniform scale draws with the larger axis
        let radius = self.radius * self.scale.x.abs().max(self.scale.y.abs());
        painter.fill_circle(origin + self.position, radius, self.color, self.alpha);
    }
}
