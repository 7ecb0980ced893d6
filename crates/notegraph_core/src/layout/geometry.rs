//! 2D vector arithmetic shared by the simulation and viewport math.

use serde::Serialize;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Point or vector in simulation or client space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Rescales the vector so its length does not exceed `max`.
    pub fn clamp_length(self, max: f64) -> Self {
        let length = self.length();
        if length > max && length > 0.0 {
            self * (max / length)
        } else {
            self
        }
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

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn clamp_length_preserves_direction() {
        let clamped = Point::new(30.0, 40.0).clamp_length(5.0);
        assert!((clamped.x - 3.0).abs() < 1e-9);
        assert!((clamped.y - 4.0).abs() < 1e-9);
        assert_eq!(Point::new(1.0, 0.0).clamp_length(5.0), Point::new(1.0, 0.0));
        assert_eq!(Point::ZERO.clamp_length(0.0), Point::ZERO);
    }
}
