//! Sphere-approximated collision volumes.

use nalgebra::{Point3, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A local-space collision sphere attached to a body piece.
///
/// Sphere lists are static configuration; the simulation loop only reads
/// them, transforming centers into world space through the owning
/// segment's reconstructed transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionSphere {
    /// Sphere center in piece-local space.
    pub center: Point3<f64>,
    /// Sphere radius.
    pub radius: f64,
}

impl CollisionSphere {
    /// Create a new collision sphere.
    #[must_use]
    pub const fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Transform the sphere center into world space.
    #[must_use]
    pub fn world_center(
        &self,
        position: Point3<f64>,
        orientation: &UnitQuaternion<f64>,
    ) -> Point3<f64> {
        position + orientation * self.center.coords
    }
}
