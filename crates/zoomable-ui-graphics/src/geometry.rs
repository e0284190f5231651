//! Geometric primitives: Point, Size, Rect

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A position or a displacement in logical pixels.
///
/// The same type is used for both, as the gesture math freely mixes
/// positions (pointer locations, centroids) with vectors (pan deltas,
/// translations).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Euclidean length of this point treated as a vector.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance between two points.
    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// Angle of this vector in radians, measured with `atan2`.
    ///
    /// Returns `0.0` for the zero vector.
    pub fn angle(self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    /// Builds a vector from its polar form.
    pub fn from_polar(length: f32, angle: f32) -> Self {
        Self {
            x: length * angle.cos(),
            y: length * angle.sin(),
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
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

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;

    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// The center of a box of this size whose origin is at zero.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, rhs: f32) -> Size {
        Size::new(self.width * rhs, self.height * rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn from_center_size(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.width && y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_of_zero_vector_is_zero() {
        assert_eq!(Point::ZERO.angle(), 0.0);
    }

    #[test]
    fn angle_on_vertical_axis_has_no_division_by_zero() {
        let up = Point::new(0.0, -10.0);
        assert!((up.angle() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn polar_form_round_trips_through_each_quadrant() {
        for p in [
            Point::new(3.0, 4.0),
            Point::new(-3.0, 4.0),
            Point::new(-3.0, -4.0),
            Point::new(3.0, -4.0),
        ] {
            let back = Point::from_polar(p.length(), p.angle());
            assert!((back.x - p.x).abs() < 1e-4, "{p:?} -> {back:?}");
            assert!((back.y - p.y).abs() < 1e-4, "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn rect_center_and_contains() {
        let rect = Rect::from_center_size(Point::new(50.0, 50.0), Size::new(20.0, 10.0));
        assert_eq!(rect.origin(), Point::new(40.0, 45.0));
        assert_eq!(rect.center(), Point::new(50.0, 50.0));
        assert!(rect.contains(41.0, 46.0));
        assert!(!rect.contains(39.0, 46.0));
    }
}
