//! Angle-constrained spine chain, FABRIK limbs, and locomotion.
//!
//! The legged-creature rig is planar: a spine of joints with scalar
//! headings moving on the ground plane, plus independent three-joint legs.
//!
//! ```text
//!      o---o---o---o---o---o        spine (forward-only resolve)
//!     /|       |\
//!    o o       o o                  legs (two-pass FABRIK)
//!   /   \     /   \
//!  o     o   o     o                feet (discrete stepping targets)
//! ```
//!
//! Two solvers with deliberately different characters live here:
//!
//! - [`SpineChain::resolve`] is a single forward pass with per-joint angle
//!   clamping. The head leads, the body trails; there is no backward
//!   reaching pass, which gives the spine its whip-like follow motion.
//! - [`fabrik_resolve`] is one forward-then-backward FABRIK sweep. The
//!   chain terminates exactly at its anchor and approximately reaches its
//!   target — adequate for a visual limb, not for precision placement.
//!
//! Keep the asymmetry: making the spine backward-reach as well would
//! change its movement character entirely.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod fabrik;
mod limb;
mod spine;
mod walker;

pub use fabrik::fabrik_resolve;
pub use limb::{Limb, LimbParams, LimbSide};
pub use spine::{SpineChain, constrain_angle, heading_vector};
pub use walker::{Walker, WalkerParams};
