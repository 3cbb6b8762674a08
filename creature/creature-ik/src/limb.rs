//! A three-joint leg with discrete foot planting.

use nalgebra::Point2;
use tracing::debug;

use crate::fabrik::fabrik_resolve;
use crate::spine::heading_vector;

use std::f64::consts::FRAC_PI_2;

/// Which side of the spine a limb hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimbSide {
    /// Left of the direction of travel.
    Left,
    /// Right of the direction of travel.
    Right,
}

impl LimbSide {
    /// Sign of lateral offsets for this side.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Static configuration for one limb.
#[derive(Debug, Clone, Copy)]
pub struct LimbParams {
    /// Spine joint the limb is attached to.
    pub attach_index: usize,
    /// Side of the spine.
    pub side: LimbSide,
    /// Length of each of the three leg segments.
    pub segment_length: f64,
    /// Distance from the spine joint to the desired foot position.
    pub reach: f64,
    /// Angular offset of the desired foot position from the spine heading.
    pub angle_offset: f64,
    /// Distance the desired position must drift before the foot re-plants.
    pub step_threshold: f64,
    /// Exponential smoothing factor pulling the rendered target toward the
    /// committed one (0..1, higher is snappier).
    pub smoothing: f64,
}

impl LimbParams {
    /// A limb attached at `attach_index` on the given side, with default
    /// leg geometry.
    #[must_use]
    pub const fn new(attach_index: usize, side: LimbSide) -> Self {
        Self {
            attach_index,
            side,
            segment_length: 0.6,
            reach: 1.2,
            angle_offset: 0.7,
            step_threshold: 1.0,
            smoothing: 0.25,
        }
    }
}

/// A three-joint leg: anchored to the spine, reaching for a smoothed foot
/// target that re-plants only when the desired position drifts past the
/// step threshold.
#[derive(Debug, Clone)]
pub struct Limb {
    params: LimbParams,
    joints: [Point2<f64>; 3],
    anchor: Point2<f64>,
    desired: Point2<f64>,
    current: Point2<f64>,
    steps: u64,
    planted: bool,
}

impl Limb {
    /// Create a limb; joints settle on the first update.
    #[must_use]
    pub fn new(params: LimbParams) -> Self {
        Self {
            params,
            joints: [Point2::origin(); 3],
            anchor: Point2::origin(),
            desired: Point2::origin(),
            current: Point2::origin(),
            steps: 0,
            planted: false,
        }
    }

    /// Static configuration.
    #[must_use]
    pub const fn params(&self) -> &LimbParams {
        &self.params
    }

    /// The three joint positions, foot first.
    #[must_use]
    pub const fn joints(&self) -> &[Point2<f64>; 3] {
        &self.joints
    }

    /// Foot position (the reaching end of the chain).
    #[must_use]
    pub const fn foot(&self) -> Point2<f64> {
        self.joints[0]
    }

    /// Attachment point on the spine, recomputed every update.
    #[must_use]
    pub const fn anchor(&self) -> Point2<f64> {
        self.anchor
    }

    /// The committed desired foot target (changes only on plants).
    #[must_use]
    pub const fn desired_target(&self) -> Point2<f64> {
        self.desired
    }

    /// The smoothed target currently being reached for.
    #[must_use]
    pub const fn current_target(&self) -> Point2<f64> {
        self.current
    }

    /// Number of foot plants committed, the first placement included.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Update the limb against the owning spine joint.
    ///
    /// The anchor is offset sideways from the joint by `half_width`; the
    /// desired foot position sits at the configured reach and angular
    /// offset from the spine heading. The foot re-plants only when the
    /// desired position drifts past the step threshold, producing discrete
    /// steps rather than continuous sliding.
    pub fn update(&mut self, spine_joint: Point2<f64>, spine_heading: f64, half_width: f64) {
        let side = self.params.side.sign();
        self.anchor = spine_joint + heading_vector(spine_heading + side * FRAC_PI_2) * half_width;

        let candidate = spine_joint
            + heading_vector(spine_heading + side * self.params.angle_offset) * self.params.reach;

        if !self.planted || (candidate - self.desired).norm() > self.params.step_threshold {
            self.desired = candidate;
            self.steps += 1;
            if self.planted {
                debug!(
                    attach = self.params.attach_index,
                    x = candidate.x,
                    y = candidate.y,
                    "foot plant"
                );
            } else {
                // First placement: snap the whole leg instead of swinging
                // in from the origin.
                self.current = candidate;
                self.joints = [candidate, self.anchor, self.anchor];
                self.planted = true;
            }
        }

        self.current += (self.desired - self.current) * self.params.smoothing;

        fabrik_resolve(
            &mut self.joints,
            self.current,
            self.anchor,
            self.params.segment_length,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_limb() -> Limb {
        Limb::new(LimbParams {
            step_threshold: 1.0,
            ..LimbParams::new(0, LimbSide::Left)
        })
    }

    #[test]
    fn test_anchor_offsets_sideways() {
        let mut limb = test_limb();
        limb.update(Point2::origin(), 0.0, 0.4);

        // Heading +X, left side: anchor at +Y.
        assert_relative_eq!(limb.anchor().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(limb.anchor().y, 0.4, epsilon = 1e-12);

        let mut right = Limb::new(LimbParams::new(0, LimbSide::Right));
        right.update(Point2::origin(), 0.0, 0.4);
        assert_relative_eq!(right.anchor().y, -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_first_update_plants() {
        let mut limb = test_limb();
        assert_eq!(limb.steps(), 0);
        limb.update(Point2::origin(), 0.0, 0.4);
        assert_eq!(limb.steps(), 1);
    }

    #[test]
    fn test_foot_stays_planted_within_threshold() {
        let mut limb = test_limb();
        limb.update(Point2::origin(), 0.0, 0.4);
        let planted = limb.desired_target();

        // Move the spine joint by half the threshold: no re-plant.
        limb.update(Point2::new(0.5, 0.0), 0.0, 0.4);
        assert_eq!(limb.steps(), 1);
        assert_relative_eq!((limb.desired_target() - planted).norm(), 0.0);
    }

    #[test]
    fn test_foot_replants_once_past_threshold() {
        let mut limb = test_limb();
        limb.update(Point2::origin(), 0.0, 0.4);

        // Move past the threshold: exactly one plant.
        limb.update(Point2::new(1.5, 0.0), 0.0, 0.4);
        assert_eq!(limb.steps(), 2);

        // Holding there: still just one.
        limb.update(Point2::new(1.5, 0.0), 0.0, 0.4);
        limb.update(Point2::new(1.5, 0.0), 0.0, 0.4);
        assert_eq!(limb.steps(), 2);
    }

    #[test]
    fn test_current_target_smooths_toward_desired() {
        let mut limb = test_limb();
        limb.update(Point2::origin(), 0.0, 0.4);

        limb.update(Point2::new(1.5, 0.0), 0.0, 0.4);
        let after_one = (limb.current_target() - limb.desired_target()).norm();
        assert!(after_one > 1e-3, "smoothing should lag the plant");

        for _ in 0..60 {
            limb.update(Point2::new(1.5, 0.0), 0.0, 0.4);
        }
        let settled = (limb.current_target() - limb.desired_target()).norm();
        assert!(settled < 1e-6, "smoothed target never converged");
    }

    #[test]
    fn test_leg_terminates_at_anchor() {
        let mut limb = test_limb();
        for i in 0..10 {
            limb.update(Point2::new(f64::from(i) * 0.3, 0.0), 0.0, 0.4);
            assert_eq!(limb.joints()[2], limb.anchor());
        }
    }
}
