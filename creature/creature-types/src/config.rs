//! Physical constants for the verlet chain simulator.

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of body links in a chain.
pub const MIN_LINKS: usize = 2;

/// Hard cap on the number of body links in a chain.
pub const MAX_LINKS: usize = 50;

/// Clamp a requested link count into `[MIN_LINKS, MAX_LINKS]`.
///
/// Out-of-range requests are clamped silently at the point of mutation,
/// never rejected.
#[must_use]
pub fn clamp_link_count(requested: usize) -> usize {
    let clamped = requested.clamp(MIN_LINKS, MAX_LINKS);
    if clamped != requested {
        debug!(requested, clamped, "link count clamped");
    }
    clamped
}

/// Physical constants consumed by the verlet chain simulator.
///
/// A config is read-only during a frame; configuration changes swap the
/// whole value between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimConfig {
    /// Gravitational acceleration magnitude, applied along -Z.
    pub gravity: f64,
    /// Per-frame velocity damping factor (1 = undamped).
    pub damping: f64,
    /// Constraint relaxation iterations per frame.
    pub iterations: u32,
    /// Lerp factor pulling the dragged particle toward its target.
    pub drag_strength: f64,
    /// Maximum distance at which a particle can be picked.
    pub pick_threshold: f64,
    /// Scale on self-collision separation pushes.
    pub collision_push: f64,
    /// Scale on floor penetration pushes.
    pub floor_push: f64,
    /// Minimum chain distance between segments tested for self-collision.
    pub collision_skip: usize,
    /// Height of the floor plane.
    pub floor_z: f64,
    /// Radius used for particle-floor clamping.
    pub particle_radius: f64,
    /// Height above the floor at which a rebuilt chain is dropped.
    pub spawn_height: f64,
    /// Head steering turn rate (radians per second).
    pub steer_turn_rate: f64,
    /// Head steering translation speed (units per second).
    pub steer_move_speed: f64,
    /// Whether the yaw-limit constraint runs at all.
    pub yaw_limits_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            damping: 0.97,
            iterations: 20,
            drag_strength: 0.35,
            pick_threshold: 0.5,
            collision_push: 0.5,
            floor_push: 0.8,
            collision_skip: 2,
            floor_z: 0.0,
            particle_radius: 0.05,
            spawn_height: 3.0,
            steer_turn_rate: 2.0,
            steer_move_speed: 1.5,
            yaw_limits_enabled: true,
        }
    }
}

impl SimConfig {
    /// A slow, underwater-feeling config: weak gravity, heavy damping.
    #[must_use]
    pub fn floaty() -> Self {
        Self {
            gravity: 2.5,
            damping: 0.90,
            ..Self::default()
        }
    }

    /// A config favoring constraint accuracy over cost.
    #[must_use]
    pub fn stiff() -> Self {
        Self {
            iterations: 40,
            damping: 0.99,
            ..Self::default()
        }
    }

    /// Set the gravity magnitude.
    #[must_use]
    pub const fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the velocity damping factor.
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the relaxation iteration count.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the floor plane height.
    #[must_use]
    pub const fn with_floor(mut self, floor_z: f64) -> Self {
        self.floor_z = floor_z;
        self
    }

    /// Disable the yaw-limit constraint pass.
    #[must_use]
    pub const fn without_yaw_limits(mut self) -> Self {
        self.yaw_limits_enabled = false;
        self
    }
}
