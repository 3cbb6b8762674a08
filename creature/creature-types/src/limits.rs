//! Per-joint-class angular and positional bounds.
//!
//! Limits come in classes (head-body, body-body, body-tail); every joint of
//! a class shares one [`ConnectionLimits`] value. The invariant `min <= max`
//! is restored by clamping the offending bound at construction, never by
//! reordering the pair.

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` bound on one scalar axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisLimits {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl AxisLimits {
    /// Create a bound, clamping `min` down to `max` if the pair is
    /// inverted. The values are never swapped.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            debug!(min, max, "inverted axis limits, clamping min to max");
            Self { min: max, max }
        } else {
            Self { min, max }
        }
    }

    /// A symmetric bound `[-half_range, half_range]`.
    #[must_use]
    pub fn symmetric(half_range: f64) -> Self {
        let h = half_range.abs();
        Self { min: -h, max: h }
    }

    /// Clamp a value into the bound.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether a value lies inside the bound.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Angular and positional bounds for one joint class.
///
/// `position` bounds the normalized attachment position along the parent's
/// back-connection column; the three angular bounds are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionLimits {
    /// Normalized attachment position along the connection column (0..1).
    pub position: AxisLimits,
    /// Yaw bound (rotation about the frame tangent).
    pub yaw: AxisLimits,
    /// Pitch bound (rotation about the frame binormal).
    pub pitch: AxisLimits,
    /// Roll bound (rotation about the frame normal).
    pub roll: AxisLimits,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            position: AxisLimits::new(0.0, 1.0),
            yaw: AxisLimits::symmetric(0.6),
            pitch: AxisLimits::symmetric(0.4),
            roll: AxisLimits::symmetric(0.2),
        }
    }
}

impl ConnectionLimits {
    /// Wide bounds for a loose, whippy joint.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            position: AxisLimits::new(0.0, 1.0),
            yaw: AxisLimits::symmetric(1.2),
            pitch: AxisLimits::symmetric(0.9),
            roll: AxisLimits::symmetric(0.5),
        }
    }

    /// Near-zero bounds that freeze the joint at its rest alignment.
    #[must_use]
    pub fn locked() -> Self {
        Self {
            position: AxisLimits::new(0.5, 0.5),
            yaw: AxisLimits::symmetric(0.0),
            pitch: AxisLimits::symmetric(0.0),
            roll: AxisLimits::symmetric(0.0),
        }
    }
}

/// Current joint parameters, the mutable counterpart of
/// [`ConnectionLimits`]. This is the §6-style export shape: one scalar per
/// limited axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectionParams {
    /// Normalized attachment position along the connection column.
    pub position: f64,
    /// Yaw in radians.
    pub yaw: f64,
    /// Pitch in radians.
    pub pitch: f64,
    /// Roll in radians.
    pub roll: f64,
}

impl ConnectionParams {
    /// Clamp every parameter into its corresponding bound.
    #[must_use]
    pub fn clamped(&self, limits: &ConnectionLimits) -> Self {
        Self {
            position: limits.position.clamp(self.position),
            yaw: limits.yaw.clamp(self.yaw),
            pitch: limits.pitch.clamp(self.pitch),
            roll: limits.roll.clamp(self.roll),
        }
    }
}

/// Limits for each of the three joint classes of a chain body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitSet {
    /// Head-to-body joint bounds.
    pub head_body: ConnectionLimits,
    /// Body-to-body joint bounds.
    pub body_body: ConnectionLimits,
    /// Body-to-tail joint bounds.
    pub body_tail: ConnectionLimits,
}

impl LimitSet {
    /// Look up the limits for a joint class.
    #[must_use]
    pub const fn class(&self, class: crate::piece::JointClass) -> &ConnectionLimits {
        match class {
            crate::piece::JointClass::HeadBody => &self.head_body,
            crate::piece::JointClass::BodyBody => &self.body_body,
            crate::piece::JointClass::BodyTail => &self.body_tail,
        }
    }
}
