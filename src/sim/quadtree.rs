//! Quadtree spatial index for collidable footprints
//!
//! Rebuilt from scratch every frame (clear, then insert everything). Items that
//! fit cleanly inside one quadrant sink to the deepest node that fully contains
//! them; items straddling a midpoint stay in the node where they stopped.
//!
//! Child order: 0 = top-right, 1 = top-left, 2 = bottom-left, 3 = bottom-right.

use super::rect::Rect;
use crate::consts::{MAX_LEVELS, MAX_OBJECTS};

/// Anything that exposes a collision footprint
pub trait Collidable {
    fn footprint(&self) -> Rect;
}

impl Collidable for Rect {
    fn footprint(&self) -> Rect {
        *self
    }
}

impl<C: Collidable + ?Sized> Collidable for &C {
    fn footprint(&self) -> Rect {
        (**self).footprint()
    }
}

/// One region of the world at one subdivision depth
#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    level: u32,
    bounds: Rect,
    objects: Vec<T>,
    children: Option<Box<[Quadtree<T>; 4]>>,
}

impl<T: Collidable> Quadtree<T> {
    /// Create an empty root covering `bounds`
    pub fn new(bounds: Rect) -> Self {
        Self::at_level(0, bounds)
    }

    /// Create an empty node at an explicit depth
    pub fn at_level(level: u32, bounds: Rect) -> Self {
        debug_assert!(bounds.width >= 0 && bounds.height >= 0);
        Self {
            level,
            bounds,
            objects: Vec::new(),
            children: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Objects held directly by this node (not its children)
    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    /// The four children, or `None` for a leaf
    pub fn children(&self) -> Option<&[Quadtree<T>; 4]> {
        self.children.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Total number of objects in this node and every descendant
    pub fn len(&self) -> usize {
        self.objects.len() + self.iter_children().map(Quadtree::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.iter_children().map(Quadtree::node_count).sum::<usize>()
    }

    /// Append the bounds of every node in this subtree (for debug overlays)
    pub fn node_bounds(&self, out: &mut Vec<Rect>) {
        out.push(self.bounds);
        for child in self.iter_children() {
            child.node_bounds(out);
        }
    }

    /// Insert an item, splitting this node if it overflows
    pub fn insert(&mut self, item: T) {
        if let Some(children) = self.children.as_mut() {
            if let Some(index) = Self::classify(self.bounds, &item.footprint()) {
                children[index].insert(item);
                return;
            }
        }

        self.objects.push(item);

        if self.objects.len() > MAX_OBJECTS && self.level < MAX_LEVELS {
            if self.children.is_none() {
                self.split();
            }
            self.redistribute();
        }
    }

    /// Insert every item in order
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.insert(item);
        }
    }

    /// Objects along the node chain `item` descends through
    ///
    /// Deeper nodes come first, then each ancestor's own objects up to the
    /// root. Neighbouring quadrants are not visited, so an item near a
    /// midpoint will not see objects that were classified into a sibling.
    /// The result may contain the queried item itself.
    pub fn candidates_for<C: Collidable + ?Sized>(&self, item: &C) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_candidates(&item.footprint(), &mut out);
        out
    }

    /// Drop every object and child, leaving an empty leaf with the same bounds
    pub fn clear(&mut self) {
        self.objects.clear();
        if let Some(mut children) = self.children.take() {
            for child in children.iter_mut() {
                child.clear();
            }
        }
    }

    /// Quadrant index that fully contains `item`, or `None` if it straddles a
    /// midpoint (or has no area)
    pub fn index_of<C: Collidable + ?Sized>(&self, item: &C) -> Option<usize> {
        Self::classify(self.bounds, &item.footprint())
    }

    fn classify(bounds: Rect, footprint: &Rect) -> Option<usize> {
        debug_assert!(footprint.width >= 0 && footprint.height >= 0);
        if footprint.is_empty() {
            return None;
        }

        let vertical_mid = bounds.x + bounds.width / 2;
        let horizontal_mid = bounds.y + bounds.height / 2;

        let top = footprint.top() < horizontal_mid && footprint.bottom() < horizontal_mid;
        let bottom = footprint.top() > horizontal_mid;

        if footprint.left() < vertical_mid && footprint.right() < vertical_mid {
            if top {
                Some(1)
            } else if bottom {
                Some(2)
            } else {
                None
            }
        } else if footprint.left() > vertical_mid {
            if top {
                Some(0)
            } else if bottom {
                Some(3)
            } else {
                None
            }
        } else {
            None
        }
    }

    fn split(&mut self) {
        let half_w = self.bounds.width / 2;
        let half_h = self.bounds.height / 2;
        let (x, y) = (self.bounds.x, self.bounds.y);
        let level = self.level + 1;

        log::debug!(
            "quadtree split at level {} ({:?}) with {} objects",
            self.level,
            self.bounds,
            self.objects.len()
        );

        self.children = Some(Box::new([
            Quadtree::at_level(level, Rect::new(x + half_w, y, half_w, half_h)),
            Quadtree::at_level(level, Rect::new(x, y, half_w, half_h)),
            Quadtree::at_level(level, Rect::new(x, y + half_h, half_w, half_h)),
            Quadtree::at_level(level, Rect::new(x + half_w, y + half_h, half_w, half_h)),
        ]));
    }

    /// Push every held object that fits a single child down into it
    fn redistribute(&mut self) {
        let Some(children) = self.children.as_mut() else {
            return;
        };
        let held = std::mem::take(&mut self.objects);
        for item in held {
            match Self::classify(self.bounds, &item.footprint()) {
                Some(index) => children[index].insert(item),
                None => self.objects.push(item),
            }
        }
    }

    fn collect_candidates<'a>(&'a self, footprint: &Rect, out: &mut Vec<&'a T>) {
        if let (Some(index), Some(children)) =
            (Self::classify(self.bounds, footprint), self.children.as_ref())
        {
            children[index].collect_candidates(footprint, out);
        }
        out.extend(self.objects.iter());
    }

    fn iter_children(&self) -> impl Iterator<Item = &Quadtree<T>> {
        self.children.iter().flat_map(|children| children.iter())
    }
}
