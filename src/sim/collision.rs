//! Collision response for axis-aligned footprints
//!
//! Two resolvers, run in this order every frame:
//! - `check_bounds` keeps a mover's footprint inside the arena
//! - `check_collisions` pushes a mover out of overlapping obstacles along the
//!   axis of least penetration

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use super::quadtree::Collidable;
use super::rect::Rect;

/// A collidable whose footprint can be repositioned
///
/// Setters take footprint coordinates; implementors translate them back into
/// whatever position they actually store.
pub trait Movable: Collidable {
    fn set_footprint_x(&mut self, x: i32);
    fn set_footprint_y(&mut self, y: i32);
}

impl Movable for Rect {
    fn set_footprint_x(&mut self, x: i32) {
        self.x = x;
    }

    fn set_footprint_y(&mut self, y: i32) {
        self.y = y;
    }
}

/// Bitmask of arena edges a mover was clamped against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Collide(u8);

impl Collide {
    pub const NONE: Collide = Collide(0x0);
    pub const TOP: Collide = Collide(0x1);
    pub const RIGHT: Collide = Collide(0x2);
    pub const BOTTOM: Collide = Collide(0x4);
    pub const LEFT: Collide = Collide(0x8);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: Collide) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Collide {
    type Output = Collide;

    fn bitor(self, rhs: Collide) -> Collide {
        Collide(self.0 | rhs.0)
    }
}

impl BitOrAssign for Collide {
    fn bitor_assign(&mut self, rhs: Collide) {
        self.0 |= rhs.0;
    }
}

/// Clamp `mover` so its footprint stays inside `bounds`
///
/// Vertical first, then horizontal. On each axis only one of the two opposite
/// edges can be reported.
pub fn check_bounds<M: Movable + ?Sized>(mover: &mut M, bounds: Rect) -> Collide {
    let mut collided = Collide::NONE;
    let footprint = mover.footprint();

    if footprint.top() < bounds.top() {
        mover.set_footprint_y(bounds.top());
        collided |= Collide::TOP;
    } else if footprint.bottom() > bounds.bottom() {
        mover.set_footprint_y(bounds.bottom() - footprint.height);
        collided |= Collide::BOTTOM;
    }

    if footprint.left() < bounds.left() {
        mover.set_footprint_x(bounds.left());
        collided |= Collide::LEFT;
    } else if footprint.right() > bounds.right() {
        mover.set_footprint_x(bounds.right() - footprint.width);
        collided |= Collide::RIGHT;
    }

    if !collided.is_empty() {
        log::trace!("bounds clamp {:?} -> {:?}", footprint, mover.footprint());
    }
    collided
}

/// Push `mover` out of every obstacle it overlaps, one obstacle at a time
///
/// Obstacles are tested against the mover's footprint as it was on entry; the
/// push for each one is computed from the mover's footprint at that point in
/// the sequence. Corrections accumulate and are never re-checked, so a mover
/// wedged between several obstacles can end up still overlapping one of them.
///
/// Returns how many obstacles overlapped on entry.
pub fn check_collisions<M, I>(mover: &mut M, obstacles: I) -> usize
where
    M: Movable + ?Sized,
    I: IntoIterator,
    I::Item: Collidable,
{
    let start = mover.footprint();
    let hits: Vec<Rect> = obstacles
        .into_iter()
        .map(|obstacle| obstacle.footprint())
        .filter(|footprint| footprint.intersects(&start))
        .collect();

    for obstacle in &hits {
        let current = mover.footprint();
        let Some(overlap) = current.intersection(obstacle) else {
            continue;
        };

        if overlap.width > overlap.height {
            if current.top() == overlap.top() {
                mover.set_footprint_y(current.y + overlap.height);
            } else {
                mover.set_footprint_y(current.y - overlap.height);
            }
        } else if current.left() == overlap.left() {
            mover.set_footprint_x(current.x + overlap.width);
        } else {
            mover.set_footprint_x(current.x - overlap.width);
        }

        log::trace!(
            "overlap {:?} with {:?}: {:?} -> {:?}",
            overlap,
            obstacle,
            current,
            mover.footprint()
        );
    }

    hits.len()
}
