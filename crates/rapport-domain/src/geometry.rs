//! 2-D geometry primitives for layout

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A point or vector in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// The origin / zero vector
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when used as a vector
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Vector rescaled to at most `max` length
    pub fn limit(self, max: f64) -> Point {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Target canvas size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

impl CanvasBounds {
    /// Create canvas bounds
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height with degenerate values replaced by 1.0
    pub fn sanitized(&self) -> CanvasBounds {
        let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        CanvasBounds::new(fix(self.width), fix(self.height))
    }

    /// Center of the canvas
    pub fn center(&self) -> Point {
        let b = self.sanitized();
        Point::new(b.width / 2.0, b.height / 2.0)
    }

    /// Inner rectangle `(min, max)` after applying `padding`, never inverted
    pub fn inner(&self, padding: f64) -> (Point, Point) {
        let b = self.sanitized();
        let pad_x = padding.max(0.0).min(b.width / 2.0);
        let pad_y = padding.max(0.0).min(b.height / 2.0);
        (
            Point::new(pad_x, pad_y),
            Point::new(b.width - pad_x, b.height - pad_y),
        )
    }

    /// Point clamped into the padded canvas
    pub fn clamp(&self, p: Point, padding: f64) -> Point {
        let (min, max) = self.inner(padding);
        Point::new(p.x.clamp(min.x, max.x), p.y.clamp(min.y, max.y))
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self::new(1000.0, 800.0)
    }
}
