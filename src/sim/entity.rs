//! Sprite entities: players, moveable sprites, static sprites and obstacles
//!
//! One record type for all of them. What differs between kinds (default
//! footprint, whether input drives it, draw colour) hangs off `EntityKind`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::collision::Movable;
use super::movement::{Face, Movement};
use super::quadtree::Collidable;
use super::rect::Rect;
use crate::consts::*;
use crate::{next_after, next_before};

pub type EntityId = u32;

/// RGBA colour handed to the renderer
pub type Color = [u8; 4];

/// Default colours for players 1-4
pub const PLAYER_COLORS: [Color; MAX_PLAYERS] = [
    [30, 144, 255, 255],
    [255, 0, 0, 255],
    [0, 128, 0, 255],
    [255, 255, 0, 255],
];

/// Lifecycle / pose of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityState {
    #[default]
    Alive,
    Dead,
    Standing,
    Crouching,
    Laying,
    Walking,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Input-driven, multi-frame animated
    Player { index: u8, color: Color },
    /// Moves under its own velocity, single animation frame
    Moveable,
    /// Static decoration that still blocks movement
    Sprite,
    /// Block whose visual extends `height` pixels above its footprint
    Obstacle { height: i32 },
}

/// Sprite sheet layout and collision geometry for a new entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSpec {
    /// Unscaled size of one animation frame
    pub frame_size: IVec2,
    /// One row per facing direction
    pub rows: u32,
    /// One column per animation frame
    pub columns: u32,
    /// Seconds for one full cycle of frames
    pub animation_length: f32,
    /// Unscaled footprint relative to the frame's top-left; whole frame if `None`
    pub footprint: Option<Rect>,
    pub scale: f32,
    pub facing: Face,
}

impl Default for SpriteSpec {
    fn default() -> Self {
        Self {
            frame_size: IVec2::new(32, 32),
            rows: 1,
            columns: 1,
            animation_length: 0.0,
            footprint: None,
            scale: 1.0,
            facing: Face::Down,
        }
    }
}

/// Animation frame clock
///
/// Frame selection from the sheet belongs to the renderer; this only tracks
/// which column is current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub rows: u32,
    pub columns: u32,
    time_step: f32,
    current_time: f32,
    current_frame: u32,
}

impl Animation {
    pub fn new(rows: u32, columns: u32, animation_length: f32) -> Self {
        let time_step = if columns > 0 {
            animation_length / columns as f32
        } else {
            0.0
        };
        Self {
            rows,
            columns,
            time_step,
            current_time: 0.0,
            current_frame: 0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.current_frame
    }

    /// Accumulate `dt`, stepping to the next frame once a time step has passed
    pub fn advance(&mut self, dt: f32) {
        if self.columns <= 1 {
            return;
        }
        if self.current_time > self.time_step {
            self.current_frame += 1;
            self.current_time = 0.0;
            if self.current_frame >= self.columns {
                self.current_frame = 0;
            }
        }
        self.current_time += dt;
    }

    /// Back to the idle frame
    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub state: EntityState,
    pub facing: Face,
    pub movement: Movement,
    pub animation: Animation,
    pub attributes: Attributes,
    /// Top-left of the visual rectangle
    position: Vec2,
    /// Scaled visual size
    size: IVec2,
    /// Footprint offset and size relative to `position`, fixed at construction
    footprint_geometry: Rect,
    scale: f32,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec2, spec: SpriteSpec, movement_speed: f32) -> Self {
        let size = (spec.frame_size.as_vec2() * spec.scale).as_ivec2();
        let footprint_geometry = match spec.footprint {
            Some(footprint) => footprint.scaled(spec.scale),
            None => Rect::from_origin_size(IVec2::ZERO, size),
        };
        debug_assert!(footprint_geometry.width >= 0 && footprint_geometry.height >= 0);

        Self {
            id,
            kind,
            state: EntityState::Alive,
            facing: spec.facing,
            movement: Movement::new(movement_speed),
            animation: Animation::new(spec.rows, spec.columns, spec.animation_length),
            attributes: Attributes::default(),
            position,
            size,
            footprint_geometry,
            scale: spec.scale,
        }
    }

    /// A player, footprint on the bottom third of the frame
    pub fn player(id: EntityId, index: u8, position: Vec2, color: Option<Color>) -> Self {
        debug_assert!((index as usize) < MAX_PLAYERS);
        let color = color.unwrap_or(PLAYER_COLORS[index as usize % MAX_PLAYERS]);
        let footprint_height = PLAYER_FRAME_HEIGHT / 3;
        let spec = SpriteSpec {
            frame_size: IVec2::new(PLAYER_FRAME_WIDTH, PLAYER_FRAME_HEIGHT),
            rows: PLAYER_DIRECTIONS,
            columns: PLAYER_FRAMES,
            animation_length: PLAYER_ANIMATION_TIME,
            footprint: Some(Rect::new(
                0,
                PLAYER_FRAME_HEIGHT - footprint_height,
                PLAYER_FRAME_WIDTH,
                footprint_height,
            )),
            scale: PLAYER_SCALE,
            facing: Face::Down,
        };
        Self::new(id, EntityKind::Player { index, color }, position, spec, PLAYER_SPEED)
    }

    /// A single-frame sprite that moves under its own velocity
    pub fn moveable(id: EntityId, position: Vec2, spec: SpriteSpec, movement_speed: f32) -> Self {
        let spec = SpriteSpec {
            columns: 1,
            animation_length: 0.0,
            ..spec
        };
        Self::new(id, EntityKind::Moveable, position, spec, movement_speed)
    }

    /// A static single-frame sprite
    pub fn sprite(id: EntityId, position: Vec2, spec: SpriteSpec) -> Self {
        let spec = SpriteSpec {
            columns: 1,
            animation_length: 0.0,
            ..spec
        };
        Self::new(id, EntityKind::Sprite, position, spec, 0.0)
    }

    /// An obstacle occupying `footprint`, drawn `height` pixels taller
    pub fn obstacle(id: EntityId, footprint: Rect, height: i32) -> Self {
        let spec = SpriteSpec {
            frame_size: IVec2::new(footprint.width, footprint.height + height),
            footprint: Some(Rect::new(0, height, footprint.width, footprint.height)),
            ..Default::default()
        };
        let position = Vec2::new(footprint.x as f32, (footprint.y - height) as f32);
        Self::new(id, EntityKind::Obstacle { height }, position, spec, 0.0)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn offset_position(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Visual rectangle (what the renderer draws)
    pub fn visual_rect(&self) -> Rect {
        Rect::from_origin_size(self.position.as_ivec2(), self.size)
    }

    pub fn footprint_offset(&self) -> IVec2 {
        self.footprint_geometry.origin()
    }

    /// Top-left of the footprint in world space
    pub fn footprint_position(&self) -> Vec2 {
        self.position + self.footprint_offset().as_vec2()
    }

    pub fn set_footprint_position(&mut self, position: Vec2) {
        self.position = position - self.footprint_offset().as_vec2();
    }

    pub fn player_index(&self) -> Option<u8> {
        match self.kind {
            EntityKind::Player { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Colour for the footprint debug overlay
    pub fn debug_color(&self) -> Color {
        match self.kind {
            EntityKind::Player { color, .. } => color,
            EntityKind::Obstacle { .. } => [0, 0, 0, 255],
            EntityKind::Moveable | EntityKind::Sprite => [255, 0, 0, 255],
        }
    }

    /// Players and moveable sprites move; everything else stays put
    pub fn is_movable(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. } | EntityKind::Moveable)
    }

    /// Live players respond to input
    pub fn is_controllable(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. }) && self.state != EntityState::Dead
    }

    /// Dead entities and zero-area footprints are left out of collision
    pub fn is_collidable(&self) -> bool {
        self.state != EntityState::Dead && !self.footprint().is_empty()
    }

    /// Move by the current velocity over `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        if self.is_movable() {
            self.position += self.movement.velocity() * dt;
        }
    }

    /// Tick the animation clock; moving entities idle on frame 0 when stopped
    pub fn update_animation(&mut self, dt: f32) {
        self.animation.advance(dt);
        if self.is_movable() && !self.movement.is_moving() {
            self.animation.reset();
        }
    }

    /// Draw order in (0, 1], derived from the footprint's vertical position
    ///
    /// Players are nudged one float step forward per player index so that
    /// overlapping players never tie.
    pub fn depth(&self, viewport_height: f32) -> f32 {
        debug_assert!(viewport_height > 0.0);
        let mut depth = self.footprint().top() as f32 / viewport_height;
        if let Some(index) = self.player_index() {
            for _ in 0..index {
                depth = next_before(depth);
            }
        }
        if depth > 0.0 { depth } else { next_after(0.0) }
    }

    pub fn take_damage(&mut self, kind: &str, amount: f32) -> bool {
        let died = self.attributes.take_damage(&mut self.state, kind, amount);
        if died {
            self.movement.stop();
            log::debug!("entity {} died", self.id);
        }
        died
    }
}

impl Collidable for Entity {
    fn footprint(&self) -> Rect {
        Rect::new(
            self.position.x as i32 + self.footprint_geometry.x,
            self.position.y as i32 + self.footprint_geometry.y,
            self.footprint_geometry.width,
            self.footprint_geometry.height,
        )
    }
}

impl Movable for Entity {
    fn set_footprint_x(&mut self, x: i32) {
        self.position.x = (x - self.footprint_geometry.x) as f32;
    }

    fn set_footprint_y(&mut self, y: i32) {
        self.position.y = (y - self.footprint_geometry.y) as f32;
    }
}
