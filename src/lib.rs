//! Sprite Sim - moveable, collidable sprites for a 2D tile/sprite game
//!
//! Core modules:
//! - `sim`: Footprints, quadtree index, movement and collision resolution
//! - `settings`: Data-driven configuration
//!
//! Rendering, asset loading and raw input polling belong to the host engine.
//! This crate only computes positions, footprints and collision outcomes.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Simulation constants
pub mod consts {
    /// Objects a quadtree node holds before splitting
    pub const MAX_OBJECTS: usize = 10;
    /// Deepest quadtree level; nodes here never split
    pub const MAX_LEVELS: u32 = 5;

    /// Player slots
    pub const MAX_PLAYERS: usize = 4;

    /// Player sprite sheet: 3 facing rows (left is mirrored right), 8 frames each
    pub const PLAYER_FRAME_WIDTH: i32 = 20;
    pub const PLAYER_FRAME_HEIGHT: i32 = 50;
    pub const PLAYER_DIRECTIONS: u32 = 3;
    pub const PLAYER_FRAMES: u32 = 8;
    pub const PLAYER_ANIMATION_TIME: f32 = 0.5;
    pub const PLAYER_SCALE: f32 = 2.0;

    /// Movement speeds (pixels/s)
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const MOVEABLE_SPEED: f32 = 100.0;

    /// Default arena
    pub const DEFAULT_ARENA_WIDTH: i32 = 800;
    pub const DEFAULT_ARENA_HEIGHT: i32 = 600;

    /// Random obstacle placement
    pub const OBSTACLE_MIN_SIZE: i32 = 16;
    pub const OBSTACLE_MAX_SIZE: i32 = 64;
    pub const SCATTER_ATTEMPTS: usize = 32;
}

/// Next representable f32 after `x` in the direction of `toward`
pub fn nudge(x: f32, toward: f32) -> f32 {
    if x.is_nan() || toward.is_nan() {
        return x + toward;
    }
    if x == toward {
        return toward;
    }
    if x == 0.0 {
        let tiny = f32::from_bits(1);
        return if toward > 0.0 { tiny } else { -tiny };
    }
    let bits = x.to_bits();
    let bits = if (x > 0.0) == (toward > x) { bits + 1 } else { bits - 1 };
    f32::from_bits(bits)
}

/// Smallest f32 greater than `x`
#[inline]
pub fn next_after(x: f32) -> f32 {
    nudge(x, f32::INFINITY)
}

/// Largest f32 less than `x`
#[inline]
pub fn next_before(x: f32) -> f32 {
    nudge(x, f32::NEG_INFINITY)
}
