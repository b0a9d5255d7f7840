//! Axis-aligned rectangle collision
//!
//! Every contact test in the game (player vs platform, enemy vs platform,
//! player vs enemy, sword vs enemy) is a plain AABB overlap.

use glam::Vec2;
use serde::Serialize;

/// An axis-aligned rectangle, top-left anchored (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Platforms are static rectangles
pub type Platform = Rect;

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a top-left position and a size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Same rectangle moved to a new x
    #[inline]
    pub fn with_x(&self, x: f32) -> Self {
        Self { x, ..*self }
    }

    /// Horizontal extents overlap (open intervals)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// Standard AABB overlap test. Touching edges do not count.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Whether moving from `current` to `future` must be rejected because of `other`.
///
/// Entities may separate, but never burrow: a move is blocked when it creates
/// a new overlap, or when the two already overlap and the move brings the
/// centres closer together horizontally.
pub fn movement_blocked(current: &Rect, future: &Rect, other: &Rect) -> bool {
    let colliding = overlaps(current, other);
    let would_collide = overlaps(future, other);

    if would_collide && !colliding {
        return true;
    }
    if colliding && would_collide {
        let other_x = other.center().x;
        let current_dist = (current.center().x - other_x).abs();
        let future_dist = (future.center().x - other_x).abs();
        return future_dist < current_dist;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_new_overlap_is_blocked() {
        let enemy = Rect::new(100.0, 0.0, 30.0, 30.0);
        let current = Rect::new(50.0, 0.0, 45.0, 45.0);
        let future = current.with_x(60.0);
        assert!(movement_blocked(&current, &future, &enemy));
    }

    #[test]
    fn test_separating_is_allowed() {
        let enemy = Rect::new(100.0, 0.0, 30.0, 30.0);
        // Overlapping, centre left of the enemy, moving further left
        let current = Rect::new(70.0, 0.0, 45.0, 45.0);
        let future = current.with_x(65.0);
        assert!(!movement_blocked(&current, &future, &enemy));
    }

    #[test]
    fn test_burrowing_is_blocked() {
        let enemy = Rect::new(100.0, 0.0, 30.0, 30.0);
        let current = Rect::new(70.0, 0.0, 45.0, 45.0);
        let future = current.with_x(75.0);
        assert!(movement_blocked(&current, &future, &enemy));
    }

    #[test]
    fn test_free_movement_is_allowed() {
        let enemy = Rect::new(300.0, 0.0, 30.0, 30.0);
        let current = Rect::new(0.0, 0.0, 45.0, 45.0);
        assert!(!movement_blocked(&current, &current.with_x(10.0), &enemy));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_rect_overlaps_itself(a in rect_strategy()) {
            prop_assert!(overlaps(&a, &a));
        }
    }
}
