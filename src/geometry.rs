//! Integer geometry used by the clipping pipeline, plus the float vector
//! type game logic uses for motion.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Vec2> for Point {
    /// Truncating conversion, matching C-style float-to-int.
    fn from(v: Vec2) -> Self {
        Self::new(v.x as i32, v.y as i32)
    }
}

/// Float 2D vector for positions/velocities in caller logic. Not part of the
/// compositing path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned integer rectangle. Empty iff `w <= 0 || h <= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn intersects(&self, r: &Rect) -> bool {
        self.x < r.x + r.w && r.x < self.x + self.w && self.y < r.y + r.h && r.y < self.y + self.h
    }

    /// Overlap of two rects. Disjoint inputs yield non-positive `w`/`h`;
    /// callers must check [`empty`](Self::empty) rather than assume
    /// non-negative dimensions.
    pub fn intersection(&self, r: &Rect) -> Rect {
        let x = self.x.max(r.x);
        let y = self.y.max(r.y);
        Rect::new(
            x,
            y,
            (self.x + self.w).min(r.x + r.w) - x,
            (self.y + self.h).min(r.y + r.h) - y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_empty() {
        assert!(Rect::new(0, 0, 0, 10).empty());
        assert!(Rect::new(0, 0, 10, -1).empty());
        assert!(!Rect::new(-5, -5, 1, 1).empty());
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(2, 3, 4, 5);
        assert!(r.contains(Point::new(2, 3)));
        assert!(r.contains(Point::new(5, 7)));
        assert!(!r.contains(Point::new(6, 3)));
        assert!(!r.contains(Point::new(2, 8)));
    }

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(4, 4, 8, 8);
        assert_eq!(a.intersection(&b), Rect::new(4, 4, 6, 6));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersection_disjoint_is_nonpositive() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(10, 10, 4, 4);
        let i = a.intersection(&b);
        assert!(i.w <= 0 && i.h <= 0);
        assert!(i.empty());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_point_from_vec2_truncates() {
        assert_eq!(Point::from(Vec2::new(3.9, -0.5)), Point::new(3, 0));
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(1, 2) + Point::new(3, 4) - Point::new(2, 2);
        assert_eq!(p, Point::new(2, 4));
    }

    #[test]
    fn test_vec2_arithmetic() {
        let mut v = Vec2::new(1.0, 1.0);
        v += Vec2::new(0.5, -0.25);
        assert_eq!(v, Vec2::new(1.5, 0.75));
        assert_eq!(v * 2.0, Vec2::new(3.0, 1.5));
    }
}
