//! Serializable snapshots of joint parameters and limits.
//!
//! This is the only place the simulator's configuration surfaces as
//! structured data — the export shape backing copy-to-clipboard
//! persistence in an editor frontend. With the `serde` feature enabled
//! both types round-trip through any serde format.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::limits::{ConnectionLimits, ConnectionParams};
use crate::piece::JointClass;

/// Snapshot of one joint: its class, current parameters, and bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointSnapshot {
    /// Joint class the parameters belong to.
    pub class: JointClass,
    /// Index of the joint along the chain.
    pub joint: usize,
    /// Current position/yaw/pitch/roll values.
    pub params: ConnectionParams,
    /// Configured bounds for the class.
    pub limits: ConnectionLimits,
}

/// Snapshot of every joint in a creature, in chain order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreatureSnapshot {
    /// Per-joint snapshots, index 0 nearest the head.
    pub joints: Vec<JointSnapshot>,
}

impl CreatureSnapshot {
    /// Number of joints captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}
