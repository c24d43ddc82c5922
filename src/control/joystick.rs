//! Virtual joystick widget
//!
//! Converts a press → drag → release gesture into an angle, an 8-way
//! direction, a normalized power and a velocity vector, reported to the host
//! through callbacks. The widget owns two layers: the outer boundary and the
//! inner handle, which follows the (clamped) drag offset.
//!
//! Coordinates are local to the joystick's origin (its center), with y
//! growing downward as on screen.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;

use super::visual::{CircleVisual, Painter, Visual};
use crate::consts::{
    JOYSTICK_INNER_ALPHA_STANDBY, JOYSTICK_INNER_RADIUS, JOYSTICK_OUTER_ALPHA,
    JOYSTICK_OUTER_RADIUS, JOYSTICK_RADIUS_DIVISOR,
};
use crate::polar_to_cartesian;

/// Color of the default joystick layers
const DEFAULT_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// Called once when a drag session starts
pub type StartHook = Box<dyn FnMut()>;
/// Called on every drag move
pub type ChangeHook = Box<dyn FnMut(&JoystickChangeEvent)>;
/// Called once when a drag session ends
pub type EndHook = Box<dyn FnMut()>;

/// Eight compass sectors plus an idle value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// No gesture. Never produced from an offset; hosts use it for idle.
    #[default]
    None,
    Left,
    Top,
    Bottom,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Left => "left",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Right => "right",
            Direction::TopLeft => "top_left",
            Direction::TopRight => "top_right",
            Direction::BottomLeft => "bottom_left",
            Direction::BottomRight => "bottom_right",
        }
    }

    /// Bucket an `atan2` angle into a π/4-wide sector.
    ///
    /// `Right` is centered on 0. Each sector includes its lower bound and
    /// excludes its upper bound, except `Left`, which covers both sides of
    /// the ±π seam (π itself included).
    pub fn from_angle(rad: f32) -> Self {
        let s = PI / 8.0;
        if (-s..s).contains(&rad) {
            Direction::Right
        } else if (s..3.0 * s).contains(&rad) {
            Direction::BottomRight
        } else if (3.0 * s..5.0 * s).contains(&rad) {
            Direction::Bottom
        } else if (5.0 * s..7.0 * s).contains(&rad) {
            Direction::BottomLeft
        } else if rad >= 7.0 * s || rad < -7.0 * s {
            Direction::Left
        } else if (-7.0 * s..-5.0 * s).contains(&rad) {
            Direction::TopLeft
        } else if (-5.0 * s..-3.0 * s).contains(&rad) {
            Direction::Top
        } else {
            Direction::TopRight
        }
    }

    /// Direction of an offset from the joystick origin
    pub fn from_offset(offset: Vec2) -> Self {
        Self::from_angle(offset.y.atan2(offset.x))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot reported on every drag move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickChangeEvent {
    /// Angle of the clamped offset (radians)
    pub angle: f32,
    pub direction: Direction,
    /// Normalized pull, 0.0 - 1.0
    pub power: f32,
    /// Movement vector, magnitude `speed * power`
    pub velocity: Vec2,
}

/// Drag session state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// A press is held; `start` is the local press position
    Dragging { start: Vec2 },
}

/// Raw pointer input in the host's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Pointer-down / touch-start
    Press(Vec2),
    /// Pointer-move / touch-move
    Move(Vec2),
    /// Pointer-up (inside or outside), touch-end, cancel
    Release,
}

/// Invalid joystick configuration
#[derive(Debug, Clone, PartialEq)]
pub enum JoystickError {
    InvalidDimensions { width: f32, height: f32 },
    InvalidSpeed { speed: f32 },
}

impl fmt::Display for JoystickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Joystick dimensions must be positive and finite (got {}x{})",
                width, height
            ),
            Self::InvalidSpeed { speed } => {
                write!(f, "Joystick speed must be finite (got {})", speed)
            }
        }
    }
}

impl std::error::Error for JoystickError {}

/// Construction parameters for a [`Joystick`]
pub struct JoystickSettings {
    pub width: f32,
    pub height: f32,
    /// Velocity magnitude at full power
    pub speed: f32,
    /// Boundary layer (default: black circle, radius 60)
    pub outer: Option<Box<dyn Visual>>,
    /// Handle layer (default: black circle, radius 35)
    pub inner: Option<Box<dyn Visual>>,
    pub outer_scale: Vec2,
    pub inner_scale: Vec2,
    pub on_start: Option<StartHook>,
    pub on_change: Option<ChangeHook>,
    pub on_end: Option<EndHook>,
}

impl JoystickSettings {
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        Self {
            width,
            height,
            speed,
            outer: None,
            inner: None,
            outer_scale: Vec2::ONE,
            inner_scale: Vec2::ONE,
            on_start: None,
            on_change: None,
            on_end: None,
        }
    }

    pub fn with_outer(mut self, visual: impl Visual + 'static) -> Self {
        self.outer = Some(Box::new(visual));
        self
    }

    pub fn with_inner(mut self, visual: impl Visual + 'static) -> Self {
        self.inner = Some(Box::new(visual));
        self
    }

    pub fn with_outer_scale(mut self, scale: Vec2) -> Self {
        self.outer_scale = scale;
        self
    }

    pub fn with_inner_scale(mut self, scale: Vec2) -> Self {
        self.inner_scale = scale;
        self
    }

    pub fn on_start(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    pub fn on_change(mut self, hook: impl FnMut(&JoystickChangeEvent) + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    pub fn on_end(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_end = Some(Box::new(hook));
        self
    }

    fn validate(&self) -> Result<(), JoystickError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(JoystickError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.speed.is_finite() {
            return Err(JoystickError::InvalidSpeed { speed: self.speed });
        }
        Ok(())
    }
}

/// Clamp a raw drag delta to the boundary.
///
/// The test is per axis: a delta is only projected onto the circle when one
/// of its components exceeds `radius`, so diagonal deltas inside the
/// bounding square pass through unchanged.
pub fn clamp_offset(raw: Vec2, radius: f32) -> Vec2 {
    if raw.x.abs() > radius || raw.y.abs() > radius {
        polar_to_cartesian(radius, raw.y.atan2(raw.x))
    } else {
        raw
    }
}

/// Normalized distance of `offset` from the origin, capped at 1
pub fn power_of(offset: Vec2, radius: f32) -> f32 {
    (offset.length() / radius).min(1.0)
}

/// Velocity along the raw (unclamped) drag delta
pub fn velocity_of(raw: Vec2, speed: f32, power: f32) -> Vec2 {
    polar_to_cartesian(speed * power, raw.y.atan2(raw.x))
}

/// The virtual joystick
pub struct Joystick {
    width: f32,
    height: f32,
    speed: f32,
    /// Placement of the joystick origin in host space
    position: Vec2,
    /// Children in draw order: boundary, then handle
    outer: Box<dyn Visual>,
    inner: Box<dyn Visual>,
    outer_radius: f32,
    inner_radius: f32,
    inner_alpha_standby: f32,
    state: DragState,
    on_start: Option<StartHook>,
    on_change: Option<ChangeHook>,
    on_end: Option<EndHook>,
}

impl Joystick {
    pub fn new(settings: JoystickSettings) -> Result<Self, JoystickError> {
        settings.validate()?;

        let JoystickSettings {
            width,
            height,
            speed,
            outer,
            inner,
            outer_scale,
            inner_scale,
            on_start,
            on_change,
            on_end,
        } = settings;

        let mut outer = outer.unwrap_or_else(|| {
            Box::new(CircleVisual::new(
                JOYSTICK_OUTER_RADIUS,
                DEFAULT_COLOR,
                JOYSTICK_OUTER_ALPHA,
            ))
        });
        let mut inner = inner.unwrap_or_else(|| {
            Box::new(CircleVisual::new(
                JOYSTICK_INNER_RADIUS,
                DEFAULT_COLOR,
                JOYSTICK_INNER_ALPHA_STANDBY,
            ))
        });

        outer.set_scale(outer_scale);
        inner.set_scale(inner_scale);
        outer.set_anchor(Vec2::splat(0.5));
        inner.set_anchor(Vec2::splat(0.5));

        let outer_radius = width / JOYSTICK_RADIUS_DIVISOR;
        let inner_radius = inner.width() / 2.0;

        log::debug!(
            "Joystick created: {}x{}, outer radius {:.1}, inner radius {:.1}",
            width,
            height,
            outer_radius,
            inner_radius
        );

        Ok(Self {
            width,
            height,
            speed,
            position: Vec2::ZERO,
            outer,
            inner,
            outer_radius,
            inner_radius,
            inner_alpha_standby: JOYSTICK_INNER_ALPHA_STANDBY,
            state: DragState::Idle,
            on_start,
            on_change,
            on_end,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn inner_alpha_standby(&self) -> f32 {
        self.inner_alpha_standby
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Place the joystick origin in host space
    pub fn set_position(&mut self, pos: Vec2) {
        self.position = pos;
    }

    pub fn outer(&self) -> &dyn Visual {
        self.outer.as_ref()
    }

    pub fn inner(&self) -> &dyn Visual {
        self.inner.as_ref()
    }

    /// Child layers in draw order
    pub fn children(&self) -> [&dyn Visual; 2] {
        [self.outer.as_ref(), self.inner.as_ref()]
    }

    /// Host-space point to joystick-local coordinates
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        point - self.position
    }

    /// Hit test against the width x height footprint centered on the origin
    pub fn contains(&self, local: Vec2) -> bool {
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    /// Start a drag session at `local`.
    ///
    /// Returns `false` when a session is already active; the second press is
    /// ignored and the original start position is kept.
    pub fn press(&mut self, local: Vec2) -> bool {
        if self.is_dragging() {
            log::trace!("Joystick press ignored: drag already active");
            return false;
        }

        self.state = DragState::Dragging { start: local };
        self.inner.set_alpha(1.0);
        log::debug!("Joystick drag started at ({:.1}, {:.1})", local.x, local.y);

        if let Some(hook) = self.on_start.as_mut() {
            hook();
        }
        true
    }

    /// Move the active drag to `local`. Ignored (returns `None`) while idle.
    pub fn drag_to(&mut self, local: Vec2) -> Option<JoystickChangeEvent> {
        let DragState::Dragging { start } = self.state else {
            log::trace!("Joystick move ignored: not dragging");
            return None;
        };

        let raw = local - start;
        let offset = clamp_offset(raw, self.outer_radius);
        self.inner.set_position(offset);

        let power = power_of(offset, self.outer_radius);
        let event = JoystickChangeEvent {
            angle: offset.y.atan2(offset.x),
            direction: Direction::from_offset(offset),
            power,
            velocity: velocity_of(raw, self.speed, power),
        };

        if let Some(hook) = self.on_change.as_mut() {
            hook(&event);
        }
        Some(event)
    }

    /// End the active drag. A release while idle is a no-op returning `false`.
    pub fn release(&mut self) -> bool {
        if !self.is_dragging() {
            log::trace!("Joystick release ignored: not dragging");
            return false;
        }

        self.inner.set_position(Vec2::ZERO);
        self.state = DragState::Idle;
        self.inner.set_alpha(self.inner_alpha_standby);
        log::debug!("Joystick drag ended");

        if let Some(hook) = self.on_end.as_mut() {
            hook();
        }
        true
    }

    /// Route a host-space pointer input through the state machine.
    ///
    /// Presses only count inside the hit area; moves and releases are
    /// accepted anywhere so a drag can leave the widget and still end.
    pub fn handle(&mut self, input: PointerInput) {
        match input {
            PointerInput::Press(point) => {
                let local = self.to_local(point);
                if self.contains(local) {
                    self.press(local);
                }
            }
            PointerInput::Move(point) => {
                let local = self.to_local(point);
                self.drag_to(local);
            }
            PointerInput::Release => {
                self.release();
            }
        }
    }

    /// Draw both layers at the joystick's placement
    pub fn paint(&self, painter: &mut dyn Painter) {
        for child in self.children() {
            child.paint(painter, self.position);
        }
    }
}

impl fmt::Debug for Joystick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Joystick")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("speed", &self.speed)
            .field("position", &self.position)
            .field("outer_radius", &self.outer_radius)
            .field("inner_radius", &self.inner_radius)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
