//! Articulated-creature simulation toolkit.
//!
//! This umbrella crate re-exports all creature-* crates, providing a
//! unified API for the two simulation cores. All crates are Layer 0 (zero
//! engine dependencies) and can be used in CLI tools, WASM, servers, or
//! game engines.
//!
//! # Quick Start
//!
//! ```
//! use creature::prelude::*;
//! use nalgebra::Point3;
//!
//! // A dragon-style chain body: head, body links, tail.
//! let pieces = PieceSet {
//!     head: BodyPieceDef::new(
//!         PieceKind::Head,
//!         Point3::new(0.0, 0.0, 0.2),
//!         Point3::new(0.0, 0.0, -0.2),
//!     ),
//!     body: BodyPieceDef::new(
//!         PieceKind::Body,
//!         Point3::new(0.0, 0.0, 0.15),
//!         Point3::new(0.0, 0.0, -0.15),
//!     ),
//!     tail: BodyPieceDef::new(
//!         PieceKind::Tail,
//!         Point3::new(0.0, 0.0, 0.25),
//!         Point3::new(0.0, 0.0, -0.25),
//!     ),
//! };
//!
//! let mut chain = VerletChain::new(
//!     pieces,
//!     LimitSet::default(),
//!     SimConfig::default(),
//!     8,
//! )
//! .unwrap();
//!
//! // One frame: integrate, relax constraints, reconstruct transforms.
//! chain.step(&FrameInput::idle(1.0 / 60.0));
//! let transforms = chain.segment_transforms();
//! assert_eq!(transforms.len(), chain.num_segments());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Data model: piece descriptors, joint limits, collision
//!   spheres, simulation config, frame input, snapshots
//! - [`math`] - Attachment frames, joint-angle decomposition, soft angle
//!   limits
//! - [`verlet`] - The verlet particle chain simulator (primary creature
//!   body)
//! - [`ik`] - Angle-constrained spine, FABRIK limbs, locomotion controller
//!
//! # Feature Flags
//!
//! - `serde` - Serialization for configuration and snapshot types

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

/// Data model: pieces, limits, spheres, config, input, snapshots.
pub use creature_types as types;

/// Attachment frames and joint-angle math.
pub use creature_math as math;

/// Verlet particle chain simulation.
pub use creature_verlet as verlet;

/// Spine chain, FABRIK limbs, and locomotion.
pub use creature_ik as ik;

/// Common imports for creature simulation.
///
/// # Usage
///
/// ```
/// use creature::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use creature_types::{
        BodyPieceDef, CollisionSphere, ConnectionLimits, FrameInput, JointClass, LimitSet,
        PieceKind, PieceSet, SimConfig, SteerFlags,
    };

    // Verlet chain
    pub use creature_verlet::{SegmentTransform, VerletChain};

    // Legged rig
    pub use creature_ik::{LimbParams, LimbSide, Walker, WalkerParams, fabrik_resolve};
}
