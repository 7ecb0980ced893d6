//! Client/simulation coordinate transform.

use crate::layout::geometry::Point;
use serde::Serialize;

/// Translation plus uniform scale, applied as `client = sim * scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportTransform {
    pub translation: Point,
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        translation: Point::ZERO,
        scale: 1.0,
    };

    /// Maps a client-space point into simulation space.
    pub fn to_sim(&self, client: Point) -> Point {
        (client - self.translation) / self.scale
    }

    /// Maps a simulation-space point into client space.
    pub fn to_client(&self, sim: Point) -> Point {
        sim * self.scale + self.translation
    }

    /// Shifts the view by a client-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.translation += delta;
    }

    /// Sets a new scale while keeping the simulation point under `anchor`
    /// (client space) fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, scale: f64) {
        let pinned = self.to_sim(anchor);
        self.scale = scale;
        self.translation = anchor - pinned * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportTransform;
    use crate::layout::geometry::Point;

    #[test]
    fn to_sim_inverts_to_client() {
        let transform = ViewportTransform {
            translation: Point::new(30.0, -10.0),
            scale: 2.0,
        };
        let sim = Point::new(5.0, 7.0);
        let client = transform.to_client(sim);
        assert_eq!(client, Point::new(40.0, 4.0));
        assert_eq!(transform.to_sim(client), sim);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut transform = ViewportTransform::IDENTITY;
        let anchor = Point::new(200.0, 100.0);
        let before = transform.to_sim(anchor);
        transform.zoom_at(anchor, 2.5);
        let after = transform.to_sim(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert_eq!(transform.scale, 2.5);
    }
}
