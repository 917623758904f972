//! Held-direction input to velocity and facing
//!
//! Raw device polling lives outside this crate. Whatever polls the keyboard or
//! gamepad only has to answer four "is this direction held" questions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityState;

/// Direction an entity is facing (drives sprite row selection downstream)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Face {
    Up,
    #[default]
    Down,
    Right,
    Left,
}

impl Face {
    /// Unit step for this face in screen space (+y is down)
    pub fn step(&self) -> Vec2 {
        match self {
            Face::Up => Vec2::new(0.0, -1.0),
            Face::Down => Vec2::new(0.0, 1.0),
            Face::Right => Vec2::new(1.0, 0.0),
            Face::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Per-axis "direction held" queries for one controllable entity
pub trait AxisInput {
    fn is_up_held(&self) -> bool;
    fn is_down_held(&self) -> bool;
    fn is_left_held(&self) -> bool;
    fn is_right_held(&self) -> bool;
}

/// Plain held-state snapshot, filled in by whatever polls the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeldAxes {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldAxes {
    pub const NONE: HeldAxes = HeldAxes {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Snapshot with only `face` held
    pub fn only(face: Face) -> Self {
        let mut held = Self::NONE;
        match face {
            Face::Up => held.up = true,
            Face::Down => held.down = true,
            Face::Left => held.left = true,
            Face::Right => held.right = true,
        }
        held
    }
}

impl AxisInput for HeldAxes {
    fn is_up_held(&self) -> bool {
        self.up
    }

    fn is_down_held(&self) -> bool {
        self.down
    }

    fn is_left_held(&self) -> bool {
        self.left
    }

    fn is_right_held(&self) -> bool {
        self.right
    }
}

/// Movement state of an entity
///
/// `direction` components are -1, 0 or +1; `speed` components are 0 or
/// `max_speed`. Velocity is their component-wise product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Movement {
    pub direction: Vec2,
    pub speed: Vec2,
    pub max_speed: f32,
}

impl Movement {
    pub fn new(max_speed: f32) -> Self {
        Self {
            direction: Vec2::ZERO,
            speed: Vec2::ZERO,
            max_speed,
        }
    }

    /// Pixels per second
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.speed != Vec2::ZERO
    }

    pub fn stop(&mut self) {
        self.direction = Vec2::ZERO;
        self.speed = Vec2::ZERO;
    }
}

/// Map held directions into `movement` and `facing`
///
/// Up wins over Down and Left wins over Right. The horizontal axis is read
/// last, so diagonal input leaves the entity facing sideways. Dead entities
/// are stopped and keep their facing.
pub fn resolve_movement<I: AxisInput + ?Sized>(
    movement: &mut Movement,
    facing: &mut Face,
    state: EntityState,
    input: &I,
) {
    movement.stop();
    if state == EntityState::Dead {
        return;
    }

    if input.is_up_held() {
        movement.speed.y = movement.max_speed;
        movement.direction.y = -1.0;
        *facing = Face::Up;
    } else if input.is_down_held() {
        movement.speed.y = movement.max_speed;
        movement.direction.y = 1.0;
        *facing = Face::Down;
    }

    if input.is_left_held() {
        movement.speed.x = movement.max_speed;
        movement.direction.x = -1.0;
        *facing = Face::Left;
    } else if input.is_right_held() {
        movement.speed.x = movement.max_speed;
        movement.direction.x = 1.0;
        *facing = Face::Right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: HeldAxes, state: EntityState) -> (Movement, Face) {
        let mut movement = Movement::new(200.0);
        let mut facing = Face::Down;
        resolve_movement(&mut movement, &mut facing, state, &input);
        (movement, facing)
    }

    #[test]
    fn test_no_input_stops() {
        let (movement, facing) = resolve(HeldAxes::NONE, EntityState::Alive);
        assert_eq!(movement.direction, Vec2::ZERO);
        assert_eq!(movement.speed, Vec2::ZERO);
        assert!(!movement.is_moving());
        assert_eq!(facing, Face::Down);
    }

    #[test]
    fn test_single_axis() {
        let (movement, facing) = resolve(HeldAxes::only(Face::Up), EntityState::Alive);
        assert_eq!(movement.direction, Vec2::new(0.0, -1.0));
        assert_eq!(movement.speed, Vec2::new(0.0, 200.0));
        assert_eq!(movement.velocity(), Vec2::new(0.0, -200.0));
        assert_eq!(facing, Face::Up);

        let (movement, facing) = resolve(HeldAxes::only(Face::Right), EntityState::Walking);
        assert_eq!(movement.velocity(), Vec2::new(200.0, 0.0));
        assert_eq!(facing, Face::Right);
    }

    #[test]
    fn test_opposite_directions_prefer_up_and_left() {
        let input = HeldAxes {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        let (movement, _) = resolve(input, EntityState::Alive);
        assert_eq!(movement.direction, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_diagonal_faces_horizontal() {
        let input = HeldAxes {
            down: true,
            right: true,
            ..HeldAxes::NONE
        };
        let (movement, facing) = resolve(input, EntityState::Alive);
        assert_eq!(movement.direction, Vec2::new(1.0, 1.0));
        assert_eq!(movement.speed, Vec2::new(200.0, 200.0));
        assert_eq!(facing, Face::Right);
    }

    #[test]
    fn test_dead_entity_is_inert() {
        let mut movement = Movement::new(200.0);
        movement.direction = Vec2::new(1.0, 0.0);
        movement.speed = Vec2::new(200.0, 0.0);
        let mut facing = Face::Left;

        resolve_movement(&mut movement, &mut facing, EntityState::Dead, &HeldAxes::only(Face::Up));
        assert_eq!(movement.velocity(), Vec2::ZERO);
        assert_eq!(facing, Face::Left);
    }

    #[test]
    fn test_face_step() {
        assert_eq!(Face::Up.step(), Vec2::new(0.0, -1.0));
        assert_eq!(Face::Left.step(), Vec2::new(-1.0, 0.0));
    }
}
