//! Reference-frame construction and joint-angle math.
//!
//! Joints between body pieces are measured against a locally reconstructed
//! orthonormal frame, not world axes:
//!
//! ```text
//!        normal
//!          |
//!          |___ tangent      (along the parent's back-connection column)
//!         /
//!   binormal
//! ```
//!
//! Yaw rotates about the tangent, pitch about the binormal, roll about the
//! normal, always composed as `roll ∘ yaw ∘ pitch ∘ align`. The alignment
//! quaternion maps the child's local front-attachment direction onto the
//! frame, establishing the zero-rotation reference.
//!
//! All direction math is guarded against near-degenerate vectors with a
//! `1e-4` epsilon; a degenerate input skips the operation (returns `None`)
//! rather than propagating NaN.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod angles;
mod frame;

pub use angles::{JointAngles, enforce_angle_limits, joint_angles, wrap_angle};
pub use frame::{AlignmentFrame, DEGENERATE_EPS, child_transform};
