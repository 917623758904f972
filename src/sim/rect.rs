//! Integer axis-aligned rectangles
//!
//! Footprints, arena bounds and quadtree regions are all `Rect`s. Edges follow
//! screen convention: `top` is the smallest y, `bottom = y + height`.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with an integer origin and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from an origin and a size
    pub fn from_origin_size(origin: IVec2, size: IVec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Centre point in world space
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// True when the rectangle covers no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Overlap rectangle of `self` and `other`, if they intersect
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// True when `other` lies entirely inside `self` (edges may touch)
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Copy translated by `(dx, dy)`
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Copy with origin and size multiplied by `scale`, truncating toward zero
    pub fn scaled(&self, scale: f32) -> Rect {
        Rect::new(
            (self.x as f32 * scale) as i32,
            (self.y as f32 * scale) as i32,
            (self.width as f32 * scale) as i32,
            (self.height as f32 * scale) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.left(), 10);
        assert_eq!(r.top(), 20);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
        assert_eq!(r.offset(-10, 5), Rect::new(0, 25, 30, 40));
    }

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(8, 0, 10, 10);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Some(Rect::new(8, 0, 2, 10)));
        assert_eq!(b.intersection(&a), Some(Rect::new(8, 0, 2, 10)));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn test_zero_area_never_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let line = Rect::new(5, 0, 0, 10);
        assert!(line.is_empty());
        assert!(!a.intersects(&line));
        assert!(!line.intersects(&a));
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0, 0, 100, 100);
        assert!(outer.contains(&Rect::new(0, 0, 100, 100)));
        assert!(outer.contains(&Rect::new(10, 10, 5, 5)));
        assert!(!outer.contains(&Rect::new(-1, 10, 5, 5)));
        assert!(!outer.contains(&Rect::new(96, 10, 5, 5)));
    }

    #[test]
    fn test_scaled_truncates() {
        let r = Rect::new(0, 34, 20, 16).scaled(1.5);
        assert_eq!(r, Rect::new(0, 51, 30, 24));
        assert_eq!(Rect::new(3, 3, 3, 3).scaled(0.5), Rect::new(1, 1, 1, 1));
    }
}
