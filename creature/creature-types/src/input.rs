//! Explicit per-frame interaction state.
//!
//! Pointer and keyboard interaction reach the simulator as plain values
//! passed into each frame update, never as state owned by a UI layer. The
//! dragged particle is a single index inside [`DragTarget`], so mutual
//! exclusion is by construction.

use nalgebra::Point3;

bitflags::bitflags! {
    /// Discrete key-down state for head steering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SteerFlags: u8 {
        /// Turn the head left about the body up axis.
        const YAW_LEFT = 0b0000_0001;
        /// Turn the head right about the body up axis.
        const YAW_RIGHT = 0b0000_0010;
        /// Pitch the head up about the body side axis.
        const PITCH_UP = 0b0000_0100;
        /// Pitch the head down about the body side axis.
        const PITCH_DOWN = 0b0000_1000;
        /// Translate the head along its facing.
        const FORWARD = 0b0001_0000;
        /// Translate the head against its facing.
        const BACK = 0b0010_0000;
    }
}

/// The particle currently being dragged and the cursor-projected point it
/// is pulled toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    /// Index of the dragged particle.
    pub particle: usize,
    /// Cursor-projected point on a camera-facing plane.
    pub target: Point3<f64>,
}

/// All interaction input for one frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Elapsed time since the previous frame, in seconds.
    pub dt: f64,
    /// Dragged-particle state, if any.
    pub drag: Option<DragTarget>,
    /// Active steering keys.
    pub steer: SteerFlags,
}

impl FrameInput {
    /// An input frame with no interaction.
    #[must_use]
    pub fn idle(dt: f64) -> Self {
        Self {
            dt,
            drag: None,
            steer: SteerFlags::empty(),
        }
    }

    /// Attach a drag target.
    #[must_use]
    pub const fn with_drag(mut self, particle: usize, target: Point3<f64>) -> Self {
        self.drag = Some(DragTarget { particle, target });
        self
    }

    /// Attach steering key state.
    #[must_use]
    pub const fn with_steer(mut self, steer: SteerFlags) -> Self {
        self.steer = steer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_input() {
        let input = FrameInput::idle(1.0 / 60.0);
        assert!(input.drag.is_none());
        assert!(input.steer.is_empty());
    }

    #[test]
    fn test_with_drag() {
        let input = FrameInput::idle(0.016).with_drag(3, Point3::new(1.0, 0.0, 2.0));
        let drag = input.drag.unwrap();
        assert_eq!(drag.particle, 3);
        assert_eq!(drag.target.x, 1.0);
    }

    #[test]
    fn test_steer_flags() {
        let steer = SteerFlags::YAW_LEFT | SteerFlags::FORWARD;
        assert!(steer.contains(SteerFlags::YAW_LEFT));
        assert!(!steer.contains(SteerFlags::YAW_RIGHT));
    }
}
