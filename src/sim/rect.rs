//! Integer axis-aligned rectangles
//!
//! Entity boxes are built by truncating float positions, so collision
//! corrections land on whole pixels.

use glam::{IVec2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect at a float position (truncated toward zero)
    pub fn from_pos(pos: Vec2, size: IVec2) -> Self {
        Self::new(pos.x as i32, pos.y as i32, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x() as f32, self.center_y() as f32)
    }

    pub fn area(&self) -> i32 {
        self.w * self.h
    }

    /// Strict overlap; rects that only share an edge do not collide
    pub fn collide_rect(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open containment test for a (truncated) point
    pub fn collide_point(&self, point: Vec2) -> bool {
        let (px, py) = (point.x as i32, point.y as i32);
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_setters() {
        let mut r = Rect::new(10, 20, 8, 15);
        assert_eq!((r.left(), r.right(), r.top(), r.bottom()), (10, 18, 20, 35));
        r.set_right(32);
        assert_eq!(r.x, 24);
        r.set_bottom(48);
        assert_eq!(r.y, 33);
        assert_eq!(r.center(), Vec2::new(28.0, 40.0));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Rect::new(0, 0, 16, 16);
        assert!(!a.collide_rect(&Rect::new(16, 0, 16, 16)));
        assert!(!a.collide_rect(&Rect::new(0, 16, 16, 16)));
        assert!(a.collide_rect(&Rect::new(15, 15, 16, 16)));
    }

    #[test]
    fn point_containment_is_half_open() {
        let r = Rect::new(0, 0, 8, 15);
        assert!(r.collide_point(Vec2::new(0.0, 0.0)));
        assert!(r.collide_point(Vec2::new(7.9, 14.5)));
        assert!(!r.collide_point(Vec2::new(8.0, 3.0)));
        assert!(!r.collide_point(Vec2::new(3.0, 15.0)));
    }

    #[test]
    fn from_pos_truncates() {
        let r = Rect::from_pos(Vec2::new(10.9, 3.2), IVec2::new(8, 15));
        assert_eq!(r, Rect::new(10, 3, 8, 15));
    }
}
