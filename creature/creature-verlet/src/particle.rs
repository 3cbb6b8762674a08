//! Point-mass particles with verlet state.

use nalgebra::{Point3, Vector3};

bitflags::bitflags! {
    /// Per-particle state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParticleFlags: u8 {
        /// Particle is pinned (immovable by integration and constraints).
        const PINNED = 0b0000_0001;
    }
}

/// A point mass with current and previous position. Velocity is implicit
/// in the positional delta.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Current world position.
    pub position: Point3<f64>,
    /// Position at the end of the previous frame.
    pub prev_position: Point3<f64>,
    /// State flags.
    pub flags: ParticleFlags,
}

impl Particle {
    /// Create a particle at rest at the given position.
    #[must_use]
    pub const fn at(position: Point3<f64>) -> Self {
        Self {
            position,
            prev_position: position,
            flags: ParticleFlags::empty(),
        }
    }

    /// Implicit velocity: the positional delta from the previous frame.
    #[must_use]
    pub fn velocity(&self) -> Vector3<f64> {
        self.position - self.prev_position
    }

    /// Move both current and previous position by the same delta,
    /// displacing the particle without injecting velocity.
    pub fn translate(&mut self, delta: Vector3<f64>) {
        self.position += delta;
        self.prev_position += delta;
    }

    /// Pin the particle in place.
    pub fn pin(&mut self) {
        self.flags.insert(ParticleFlags::PINNED);
        self.prev_position = self.position;
    }

    /// Unpin the particle.
    pub fn unpin(&mut self) {
        self.flags.remove(ParticleFlags::PINNED);
    }

    /// Whether the particle is pinned.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.flags.contains(ParticleFlags::PINNED)
    }
}
