//! Periodic per-joint diagnostic snapshots.
//!
//! Joint angles, angular rates, and gravity torque are sampled every
//! [`DIAGNOSTIC_PERIOD`]th frame for display layers; the simulation never
//! reads them back.

use creature_types::JointClass;

/// Frames between diagnostic samples.
pub const DIAGNOSTIC_PERIOD: u64 = 6;

/// One diagnostic sample for a joint: angles against the attachment frame,
/// finite-difference angular rates, and the gravity torque decomposed onto
/// the frame axes.
#[derive(Debug, Clone, Copy)]
pub struct JointDiagnostics {
    /// Joint index along the chain (0 nearest the head).
    pub joint: usize,
    /// Class of the joint.
    pub class: JointClass,
    /// Yaw about the frame tangent.
    pub yaw: f64,
    /// Pitch about the frame binormal.
    pub pitch: f64,
    /// Roll about the frame normal.
    pub roll: f64,
    /// Yaw rate, finite-differenced between samples.
    pub yaw_rate: f64,
    /// Pitch rate, finite-differenced between samples.
    pub pitch_rate: f64,
    /// Roll rate, finite-differenced between samples.
    pub roll_rate: f64,
    /// Gravity torque about the yaw axis.
    pub torque_yaw: f64,
    /// Gravity torque about the pitch axis.
    pub torque_pitch: f64,
    /// Gravity torque about the roll axis.
    pub torque_roll: f64,
    /// Frame index the sample was taken at.
    pub frame: u64,
}

/// Most-recent diagnostic sample per joint.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticsStore {
    latest: Vec<Option<JointDiagnostics>>,
}

impl DiagnosticsStore {
    /// Resize for a new joint count, discarding stale samples.
    pub(crate) fn reset(&mut self, num_joints: usize) {
        self.latest.clear();
        self.latest.resize(num_joints, None);
    }

    /// Whether this frame index is a sampling frame.
    pub(crate) fn due(frame: u64) -> bool {
        frame % DIAGNOSTIC_PERIOD == 0
    }

    /// Latest sample for a joint, if one has been taken.
    pub(crate) fn latest(&self, joint: usize) -> Option<&JointDiagnostics> {
        self.latest.get(joint).and_then(Option::as_ref)
    }

    /// Record a sample.
    pub(crate) fn record(&mut self, sample: JointDiagnostics) {
        if sample.joint < self.latest.len() {
            self.latest[sample.joint] = Some(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_period() {
        assert!(DiagnosticsStore::due(0));
        assert!(!DiagnosticsStore::due(1));
        assert!(!DiagnosticsStore::due(5));
        assert!(DiagnosticsStore::due(6));
        assert!(DiagnosticsStore::due(12));
    }

    #[test]
    fn test_store_keeps_latest_per_joint() {
        let mut store = DiagnosticsStore::default();
        store.reset(2);
        assert!(store.latest(0).is_none());

        let sample = JointDiagnostics {
            joint: 1,
            class: JointClass::BodyBody,
            yaw: 0.1,
            pitch: 0.0,
            roll: 0.0,
            yaw_rate: 0.0,
            pitch_rate: 0.0,
            roll_rate: 0.0,
            torque_yaw: 0.0,
            torque_pitch: 0.0,
            torque_roll: 0.0,
            frame: 6,
        };
        store.record(sample);

        assert!(store.latest(0).is_none());
        let kept = store.latest(1).unwrap();
        assert_eq!(kept.frame, 6);
        assert!((kept.yaw - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_reset_discards_samples() {
        let mut store = DiagnosticsStore::default();
        store.reset(1);
        store.record(JointDiagnostics {
            joint: 0,
            class: JointClass::HeadBody,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            yaw_rate: 0.0,
            pitch_rate: 0.0,
            roll_rate: 0.0,
            torque_yaw: 0.0,
            torque_pitch: 0.0,
            torque_roll: 0.0,
            frame: 0,
        });
        store.reset(1);
        assert!(store.latest(0).is_none());
    }
}
