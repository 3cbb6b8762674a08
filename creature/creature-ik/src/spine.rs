//! Forward-only spine chain with per-joint angle constraints.

use nalgebra::{Point2, Vector2};

use creature_math::wrap_angle;

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// Unit vector pointing along a heading angle in the ground plane.
#[must_use]
pub fn heading_vector(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}

/// Clamp `angle` to within `constraint` radians of `anchor`.
///
/// The difference is normalized into `(-pi, pi]` first; when its magnitude
/// exceeds the constraint it is clipped to `anchor ± constraint`.
#[must_use]
pub fn constrain_angle(angle: f64, anchor: f64, constraint: f64) -> f64 {
    let diff = wrap_angle(angle - anchor);
    if diff.abs() <= constraint {
        wrap_angle(angle)
    } else {
        wrap_angle(anchor + diff.signum() * constraint)
    }
}

/// An ordered sequence of joints, each with a heading angle, connected at
/// a fixed segment length.
///
/// `resolve` is a forward-only pass: joint 0 is pinned to the target and
/// every subsequent joint is repositioned at exactly the segment length
/// from its predecessor along a heading clamped to within the angle
/// constraint of the predecessor's heading.
#[derive(Debug, Clone)]
pub struct SpineChain {
    joints: Vec<Point2<f64>>,
    headings: Vec<f64>,
    segment_length: f64,
    angle_constraint: f64,
}

impl SpineChain {
    /// Create a chain trailing behind `origin` against `heading`.
    #[must_use]
    pub fn new(
        origin: Point2<f64>,
        heading: f64,
        joint_count: usize,
        segment_length: f64,
        angle_constraint: f64,
    ) -> Self {
        let joint_count = joint_count.max(2);
        let heading = wrap_angle(heading);

        let mut joints = Vec::with_capacity(joint_count);
        let mut headings = Vec::with_capacity(joint_count);
        joints.push(origin);
        headings.push(heading);
        for i in 1..joint_count {
            let behind = joints[i - 1] - heading_vector(heading) * segment_length;
            joints.push(behind);
            headings.push(heading);
        }

        Self {
            joints,
            headings,
            segment_length,
            angle_constraint: angle_constraint.abs(),
        }
    }

    /// Number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the chain has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint positions, head first.
    #[must_use]
    pub fn joints(&self) -> &[Point2<f64>] {
        &self.joints
    }

    /// Joint headings, head first.
    #[must_use]
    pub fn headings(&self) -> &[f64] {
        &self.headings
    }

    /// Position of joint `index`.
    #[must_use]
    pub fn joint(&self, index: usize) -> Point2<f64> {
        self.joints[index]
    }

    /// Heading of joint `index`.
    #[must_use]
    pub fn heading(&self, index: usize) -> f64 {
        self.headings[index]
    }

    /// Configured segment length.
    #[must_use]
    pub const fn segment_length(&self) -> f64 {
        self.segment_length
    }

    /// Configured per-joint angle constraint.
    #[must_use]
    pub const fn angle_constraint(&self) -> f64 {
        self.angle_constraint
    }

    /// Pin joint 0 to `target`/`heading` and drag the rest of the chain
    /// behind it, one forward pass with per-joint clamping.
    pub fn resolve(&mut self, target: Point2<f64>, heading: f64) {
        if self.joints.is_empty() {
            return;
        }
        self.joints[0] = target;
        self.headings[0] = wrap_angle(heading);

        for i in 1..self.joints.len() {
            let toward_prev = self.joints[i - 1] - self.joints[i];
            let raw = if toward_prev.norm() < DEGENERATE_EPS {
                // Collapsed joint: fall through to the predecessor heading.
                self.headings[i - 1]
            } else {
                f64::atan2(toward_prev.y, toward_prev.x)
            };
            let clamped = constrain_angle(raw, self.headings[i - 1], self.angle_constraint);
            self.headings[i] = clamped;
            self.joints[i] = self.joints[i - 1] - heading_vector(clamped) * self.segment_length;
        }
    }
}
