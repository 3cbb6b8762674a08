//! Joint-angle decomposition and velocity-level limit enforcement.

use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, UnitVector3, Vector3};

use creature_types::{AxisLimits, BackColumn, ConnectionLimits};

use crate::frame::AlignmentFrame;

/// Normalize an angle into `(-pi, pi]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - std::f64::consts::TAU
    } else {
        wrapped
    }
}

/// Joint angles decomposed against a locally reconstructed frame, together
/// with the frame axes the angles rotate about.
#[derive(Debug, Clone, Copy)]
pub struct JointAngles {
    /// Rotation about the tangent.
    pub yaw: f64,
    /// Rotation about the binormal.
    pub pitch: f64,
    /// Rotation about the normal.
    pub roll: f64,
    /// Yaw axis.
    pub tangent: UnitVector3<f64>,
    /// Pitch axis.
    pub binormal: UnitVector3<f64>,
    /// Roll axis.
    pub normal: UnitVector3<f64>,
}

/// Decompose a child orientation relative to its parent into yaw, pitch,
/// and roll against the attachment frame.
///
/// `yaw_offset` pre-rotates the reference frame about the tangent (half a
/// turn for tail-class joints); the returned yaw is measured relative to
/// the offset reference. The decomposition is a ZYX-ordered Euler
/// extraction in frame-local coordinates, matching the
/// `roll ∘ yaw ∘ pitch ∘ align` composition order.
///
/// Returns `None` when the frame cannot be built from degenerate geometry.
#[must_use]
pub fn joint_angles(
    parent_orientation: &UnitQuaternion<f64>,
    child_orientation: &UnitQuaternion<f64>,
    column: &BackColumn,
    front: Point3<f64>,
    yaw_offset: f64,
) -> Option<JointAngles> {
    let frame = AlignmentFrame::build(parent_orientation, column, front)?;

    let reference = UnitQuaternion::from_axis_angle(&frame.tangent, yaw_offset) * frame.alignment;
    let relative = child_orientation * reference.inverse();

    // Conjugate into frame-local coordinates: x = binormal, y = tangent,
    // z = normal.
    let basis = Matrix3::from_columns(&[
        frame.binormal.into_inner(),
        frame.tangent.into_inner(),
        frame.normal.into_inner(),
    ]);
    let local = basis.transpose() * relative.to_rotation_matrix().into_inner() * basis;
    let (pitch, yaw, roll) = Rotation3::from_matrix_unchecked(local).euler_angles();

    Some(JointAngles {
        yaw,
        pitch,
        roll,
        tangent: frame.tangent,
        binormal: frame.binormal,
        normal: frame.normal,
    })
}

/// Cancel the angular-velocity component along any axis whose angle has
/// reached its limit in the direction of travel.
///
/// Velocity that would increase the violation is removed; velocity
/// returning toward the legal range is left untouched. This is a soft,
/// velocity-level limiter: it never repositions a joint already past its
/// bound.
pub fn enforce_angle_limits(
    angles: &JointAngles,
    limits: &ConnectionLimits,
    angular_velocity: &mut Vector3<f64>,
) {
    cancel_outward(angles.yaw, &angles.tangent, &limits.yaw, angular_velocity);
    cancel_outward(angles.pitch, &angles.binormal, &limits.pitch, angular_velocity);
    cancel_outward(angles.roll, &angles.normal, &limits.roll, angular_velocity);
}

fn cancel_outward(
    angle: f64,
    axis: &UnitVector3<f64>,
    bounds: &AxisLimits,
    angular_velocity: &mut Vector3<f64>,
) {
    let rate = angular_velocity.dot(axis.as_ref());
    let outward = (angle >= bounds.max && rate > 0.0) || (angle <= bounds.min && rate < 0.0);
    if outward {
        *angular_velocity -= axis.as_ref() * rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::child_transform;
    use approx::assert_relative_eq;

    fn test_column() -> BackColumn {
        BackColumn::straight(Vector3::new(0.0, 0.3, 0.1))
    }

    fn test_front() -> Point3<f64> {
        Point3::new(0.0, -0.2, 0.0)
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(wrap_angle(0.0), 0.0);
        assert_relative_eq!(wrap_angle(std::f64::consts::PI), std::f64::consts::PI);
        assert_relative_eq!(
            wrap_angle(-std::f64::consts::PI),
            std::f64::consts::PI,
            epsilon = 1e-12
        );
        assert_relative_eq!(wrap_angle(3.0 * std::f64::consts::PI), std::f64::consts::PI);
        assert_relative_eq!(wrap_angle(7.0), 7.0 - std::f64::consts::TAU, epsilon = 1e-12);
    }

    #[test]
    fn test_joint_angles_round_trip() {
        let column = test_column();
        let front = test_front();
        let parent_q = UnitQuaternion::from_axis_angle(
            &UnitVector3::new_normalize(Vector3::new(0.2, -0.5, 1.0)),
            0.4,
        );

        let (pitch, yaw, roll) = (0.25, -0.4, 0.15);
        let (_, child_q) = child_transform(
            Point3::origin(),
            &parent_q,
            &column,
            front,
            0.5,
            pitch,
            yaw,
            roll,
        )
        .unwrap();

        let angles = joint_angles(&parent_q, &child_q, &column, front, 0.0).unwrap();
        assert_relative_eq!(angles.pitch, pitch, epsilon = 1e-9);
        assert_relative_eq!(angles.yaw, yaw, epsilon = 1e-9);
        assert_relative_eq!(angles.roll, roll, epsilon = 1e-9);
    }

    #[test]
    fn test_joint_angles_yaw_offset_shifts_reference() {
        let column = test_column();
        let front = test_front();
        let parent_q = UnitQuaternion::identity();

        let (_, child_q) = child_transform(
            Point3::origin(),
            &parent_q,
            &column,
            front,
            0.5,
            0.0,
            0.3,
            0.0,
        )
        .unwrap();

        let offset = joint_angles(&parent_q, &child_q, &column, front, 0.3).unwrap();
        assert_relative_eq!(offset.yaw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_joint_angles_degenerate_skipped() {
        let column = BackColumn::straight(Vector3::zeros());
        assert!(
            joint_angles(
                &UnitQuaternion::identity(),
                &UnitQuaternion::identity(),
                &column,
                test_front(),
                0.0,
            )
            .is_none()
        );
    }

    fn fixed_axes() -> JointAngles {
        JointAngles {
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            tangent: UnitVector3::new_normalize(Vector3::y()),
            binormal: UnitVector3::new_normalize(Vector3::x()),
            normal: UnitVector3::new_normalize(Vector3::z()),
        }
    }

    #[test]
    fn test_enforce_cancels_outward_velocity_only() {
        let limits = ConnectionLimits {
            yaw: AxisLimits::new(-0.7, 0.45),
            ..ConnectionLimits::default()
        };

        // Past the upper bound, moving further out: yaw component removed.
        let mut angles = fixed_axes();
        angles.yaw = 0.5;
        let mut velocity = Vector3::new(0.0, 2.0, 0.0);
        enforce_angle_limits(&angles, &limits, &mut velocity);
        assert_relative_eq!(velocity.y, 0.0);

        // Past the upper bound, moving back in: untouched.
        let mut velocity = Vector3::new(0.0, -2.0, 0.0);
        enforce_angle_limits(&angles, &limits, &mut velocity);
        assert_relative_eq!(velocity.y, -2.0);
    }

    #[test]
    fn test_enforce_is_per_axis() {
        let limits = ConnectionLimits {
            yaw: AxisLimits::symmetric(0.1),
            pitch: AxisLimits::symmetric(1.0),
            ..ConnectionLimits::default()
        };

        let mut angles = fixed_axes();
        angles.yaw = 0.2;
        // Outward yaw rate plus an in-range pitch rate: only yaw is
        // cancelled.
        let mut velocity = Vector3::new(0.5, 1.0, 0.0);
        enforce_angle_limits(&angles, &limits, &mut velocity);
        assert_relative_eq!(velocity.y, 0.0);
        assert_relative_eq!(velocity.x, 0.5);
    }

    #[test]
    fn test_soft_limit_converges_near_bound() {
        // Drive yaw toward an unconstrained 2.0 rad with a
        // proportional rate; the limiter must pin it near the 0.45 bound
        // instead. Overshoot is at most one step of the soft limiter.
        let limits = ConnectionLimits {
            yaw: AxisLimits::new(-0.7, 0.45),
            ..ConnectionLimits::default()
        };

        let dt = 1.0 / 60.0;
        let gain = 0.8;
        let mut yaw: f64 = 0.0;
        let mut max_seen: f64 = 0.0;

        for _ in 0..600 {
            let mut angles = fixed_axes();
            angles.yaw = yaw;
            let mut velocity = Vector3::new(0.0, gain * (2.0 - yaw), 0.0);
            enforce_angle_limits(&angles, &limits, &mut velocity);
            yaw += velocity.y * dt;
            max_seen = max_seen.max(yaw);
        }

        let single_step = gain * (2.0 - 0.45) * dt;
        assert!(
            max_seen <= 0.45 + single_step + 1e-9,
            "overshoot {max_seen} beyond one limiter step"
        );
        assert!((yaw - 0.45).abs() < single_step + 1e-9);
        assert!(yaw < 0.5, "yaw {yaw} ran away toward the raw target");
    }
}
