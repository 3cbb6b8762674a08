//! Shared data model and configuration for articulated-creature simulation.
//!
//! This crate defines the static configuration consumed by the simulation
//! crates and the structured snapshot surface they expose:
//!
//! - [`BodyPieceDef`] / [`SegmentDef`] - per-piece geometry descriptors
//! - [`ConnectionLimits`] / [`ConnectionParams`] - per-joint-class bounds
//! - [`CollisionSphere`] - sphere-approximated collision volumes
//! - [`SimConfig`] - physical constants for the verlet simulator
//! - [`FrameInput`] - explicit per-frame interaction state
//! - [`CreatureSnapshot`] - serializable joint-parameter export
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

mod collision;
mod config;
mod error;
mod input;
mod limits;
mod piece;
mod snapshot;

pub use collision::CollisionSphere;
pub use config::{MAX_LINKS, MIN_LINKS, SimConfig, clamp_link_count};
pub use error::{TopologyError, TopologyResult};
pub use input::{DragTarget, FrameInput, SteerFlags};
pub use limits::{AxisLimits, ConnectionLimits, ConnectionParams, LimitSet};
pub use piece::{
    BackColumn, BodyPieceDef, JointClass, PieceKind, PieceSet, PieceSlot, SegmentDef,
};
pub use snapshot::{CreatureSnapshot, JointSnapshot};
