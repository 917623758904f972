//! Simulation module
//!
//! Pure, single-threaded geometry. One `tick` per frame:
//! - Input never read from devices, only through `AxisInput`
//! - Quadtree rebuilt from scratch every frame
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attributes;
pub mod collision;
pub mod entity;
pub mod movement;
pub mod quadtree;
pub mod rect;
pub mod tick;

pub use attributes::{Attributes, Damage, GENERIC_DAMAGE, Health};
pub use collision::{Collide, Movable, check_bounds, check_collisions};
pub use entity::{Animation, Color, Entity, EntityId, EntityKind, EntityState, PLAYER_COLORS, SpriteSpec};
pub use movement::{AxisInput, Face, HeldAxes, Movement, resolve_movement};
pub use quadtree::{Collidable, Quadtree};
pub use rect::Rect;
pub use tick::{FrameInput, FrameReport, Tracked, World, tick};
