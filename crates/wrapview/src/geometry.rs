//! Integer geometry types shared by the layout engine and item factories.
//!
//! Pixel coordinates are `i32` (item origins can sit above or left of the
//! viewport while partially visible); extents are `u32`.

use serde::{Deserialize, Serialize};

/// A point in 2D pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Offset this point by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Whether either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Largest size with the same aspect ratio that fits inside `bounds`.
    ///
    /// Never scales up. A zero-sized input stays zero.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.is_empty() || bounds.is_empty() {
            return Size::ZERO;
        }
        if self.width <= bounds.width && self.height <= bounds.height {
            return self;
        }
        let (w, h) = (u64::from(self.width), u64::from(self.height));
        let (bw, bh) = (u64::from(bounds.width), u64::from(bounds.height));
        // Compare w/h against bw/bh without floating point.
        if w * bh >= h * bw {
            let height = (h * bw / w).max(1);
            Size::new(bounds.width, height as u32)
        } else {
            let width = (w * bh / h).max(1);
            Size::new(width as u32, bounds.height)
        }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub fn left(&self) -> i64 {
        i64::from(self.origin.x)
    }

    #[inline]
    pub fn top(&self) -> i64 {
        i64::from(self.origin.y)
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.left() + i64::from(self.size.width)
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.top() + i64::from(self.size.height)
    }

    /// Whether `point` lies inside (right and bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (i64::from(point.x), i64::from(point.y));
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }

    /// Whether the two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shrink by `amount` on every side, clamping at zero size.
    pub fn inset(&self, amount: u32) -> Rect {
        let shift = i32::try_from(amount).unwrap_or(i32::MAX);
        Rect {
            origin: self.origin.offset(shift, shift),
            size: Size::new(
                self.size.width.saturating_sub(amount.saturating_mul(2)),
                self.size.height.saturating_sub(amount.saturating_mul(2)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_landscape() {
        let fitted = Size::new(400, 200).fit_within(Size::new(100, 100));
        assert_eq!(fitted, Size::new(100, 50));
    }

    #[test]
    fn test_fit_within_portrait() {
        let fitted = Size::new(300, 600).fit_within(Size::new(100, 100));
        assert_eq!(fitted, Size::new(50, 100));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let fitted = Size::new(40, 30).fit_within(Size::new(100, 100));
        assert_eq!(fitted, Size::new(40, 30));
        assert_eq!(Size::ZERO.fit_within(Size::new(10, 10)), Size::ZERO);
    }

    #[test]
    fn test_rect_contains_excludes_far_edges() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(29, 29)));
        assert!(!rect.contains(Point::new(30, 15)));
        assert!(!rect.contains(Point::new(15, 30)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
        assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(!a.intersects(&Rect::new(-5, -5, 5, 5)));
    }

    #[test]
    fn test_inset() {
        let rect = Rect::new(0, 0, 10, 6).inset(2);
        assert_eq!(rect, Rect::new(2, 2, 6, 2));
        assert_eq!(Rect::new(0, 0, 3, 3).inset(2).size, Size::ZERO);
    }
}
