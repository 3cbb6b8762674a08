//! Verlet particle chain simulation for articulated creature bodies.
//!
//! A creature body is a string of point masses connected by fixed-length
//! links, advanced with position-based (verlet) integration and then
//! constrained iteratively:
//!
//! ```text
//! For each frame:
//!   1. Integrate: v = (x - x_prev) * damping; x_prev = x; x += v; x.z -= g*dt^2
//!   2. For each relaxation iteration (default 20):
//!      a. Restore link rest lengths (Jakobsen half-split)
//!      b. Clamp link yaw against the joint-class limits
//!      c. Clamp particles to the floor plane
//!   3. Reconstruct per-segment world orientations from link directions
//!   4. Push segments whose collision spheres penetrate the floor
//!   5. Resolve sphere-sphere self-collision between distant segments
//!   6. Apply head-steering input
//! ```
//!
//! The chain degrades gracefully rather than failing: near-degenerate
//! vector operations skip their update for the frame, out-of-range
//! configuration is clamped at the point of mutation, and no step of the
//! numeric core returns an error.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be
//! used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Game engines

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod chain;
mod collision;
mod constraint;
mod diagnostics;
mod particle;
mod steering;

pub use chain::{SegmentTransform, StepStats, VerletChain};
pub use diagnostics::{DIAGNOSTIC_PERIOD, JointDiagnostics};
pub use particle::{Particle, ParticleFlags};
