//! Reference frames drawn as axis markers.

use nalgebra::{Isometry3, Vector3};

/// An origin plus three orthonormal axes, all in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub origin: Vector3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub z_axis: Vector3<f64>,
}

impl Default for Coord {
    fn default() -> Self {
        Self::from_isometry(&Isometry3::identity())
    }
}

impl Coord {
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            origin: iso.translation.vector,
            x_axis: iso.rotation * Vector3::x(),
            y_axis: iso.rotation * Vector3::y(),
            z_axis: iso.rotation * Vector3::z(),
        }
    }

    /// Polyline visiting each axis tip and returning to the origin in between:
    /// origin, x tip, origin, y tip, origin, z tip.
    pub fn plot_points(&self, length: f64) -> Vec<Vector3<f64>> {
        vec![
            self.origin,
            self.origin + self.x_axis * length,
            self.origin,
            self.origin + self.y_axis * length,
            self.origin,
            self.origin + self.z_axis * length,
        ]
    }
}
