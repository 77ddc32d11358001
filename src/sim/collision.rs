//! Axis-aligned collision helpers
//!
//! Both frame-tick games use plain AABB tests: the ball centre against brick
//! rectangles, and the bird's bounding square against pipe slabs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding square of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict interior test (points on the edge don't count)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    /// Strict overlap test (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_is_strict() {
        let r = Rect::new(35.0, 60.0, 75.0, 20.0);
        assert!(r.contains_point(Vec2::new(50.0, 70.0)));
        assert!(!r.contains_point(Vec2::new(35.0, 70.0)));
        assert!(!r.contains_point(Vec2::new(110.0, 70.0)));
        assert!(!r.contains_point(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_around_circle() {
        let r = Rect::around_circle(Vec2::new(100.0, 200.0), 15.0);
        assert_eq!(r.left(), 85.0);
        assert_eq!(r.right(), 115.0);
        assert_eq!(r.top(), 185.0);
        assert_eq!(r.bottom(), 215.0);
        assert!(r.intersects(&Rect::new(110.0, 0.0, 60.0, 190.0)));
        assert!(!r.intersects(&Rect::new(115.0, 0.0, 60.0, 190.0)));
        assert!(!r.intersects(&Rect::new(110.0, 0.0, 60.0, 185.0)));
    }
}
