//! Orthonormal attachment frames and child-transform solving.

use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, UnitVector3, Vector3};

use creature_types::BackColumn;

/// Guard threshold for near-degenerate direction vectors. Operations on
/// vectors shorter than this are skipped, never retried.
pub const DEGENERATE_EPS: f64 = 1e-4;

/// An orthonormal reference frame at a back-connection attachment point,
/// plus the alignment quaternion mapping the child's local front direction
/// onto the frame's forward axis.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentFrame {
    /// Frame forward axis, along the parent's rotated column height.
    pub tangent: UnitVector3<f64>,
    /// Side-flattened up axis, perpendicular to the tangent.
    pub normal: UnitVector3<f64>,
    /// Completing axis, `tangent x normal`.
    pub binormal: UnitVector3<f64>,
    /// Rotation taking the child's local basis onto the world frame.
    pub alignment: UnitQuaternion<f64>,
}

impl AlignmentFrame {
    /// Build the frame for a parent orientation, its back-connection
    /// column, and the child's local front-attachment point.
    ///
    /// Returns `None` when the rotated column height or the child's
    /// front-to-center direction is near-degenerate.
    #[must_use]
    pub fn build(
        parent_orientation: &UnitQuaternion<f64>,
        column: &BackColumn,
        front: Point3<f64>,
    ) -> Option<Self> {
        let world_height = parent_orientation * (column.rotation * column.height);
        if world_height.norm() < DEGENERATE_EPS {
            return None;
        }
        let tangent = UnitVector3::new_normalize(world_height);

        // Side-flatten world up against the tangent; near-vertical columns
        // fall back to flattening world X instead.
        let normal = flatten_against(Vector3::z(), &tangent)
            .or_else(|| flatten_against(Vector3::x(), &tangent))?;
        let binormal = UnitVector3::new_normalize(tangent.cross(normal.as_ref()));

        // The child's front-to-center direction plus a fallback up
        // reference establish its local basis.
        let to_center = -front.coords;
        if to_center.norm() < DEGENERATE_EPS {
            return None;
        }
        let front_dir = UnitVector3::new_normalize(to_center);

        let up_ref = if front_dir.z.abs() > 1.0 - DEGENERATE_EPS {
            Vector3::x()
        } else {
            Vector3::z()
        };
        let right = UnitVector3::new_normalize(front_dir.cross(&up_ref));
        let up = UnitVector3::new_normalize(right.cross(front_dir.as_ref()));

        // alignment = W * L^T maps right->binormal, front_dir->tangent,
        // up->normal.
        let world = Matrix3::from_columns(&[
            binormal.into_inner(),
            tangent.into_inner(),
            normal.into_inner(),
        ]);
        let local = Matrix3::from_columns(&[
            right.into_inner(),
            front_dir.into_inner(),
            up.into_inner(),
        ]);
        let alignment = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
            world * local.transpose(),
        ));

        Some(Self {
            tangent,
            normal,
            binormal,
            alignment,
        })
    }

    /// Interpolate the attachment point along the column for a normalized
    /// position in `[0, 1]`, mapped to `[-height/2, height/2]` along the
    /// tangent. Curvature bows the point along the normal, peaking
    /// mid-column.
    #[must_use]
    pub fn attachment_point(
        &self,
        parent_position: Point3<f64>,
        column: &BackColumn,
        position: f64,
    ) -> Point3<f64> {
        let height = column.height.norm();
        let t = position.clamp(0.0, 1.0) - 0.5;
        let bow = column.curvature * (0.25 - t * t) * height;
        parent_position + self.tangent.as_ref() * (t * height) + self.normal.as_ref() * bow
    }

    /// World orientation for a child at the given joint angles:
    /// `roll ∘ yaw ∘ pitch ∘ align`, with yaw about the tangent, pitch
    /// about the binormal, and roll about the normal.
    #[must_use]
    pub fn child_orientation(&self, pitch: f64, yaw: f64, roll: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.normal, roll)
            * UnitQuaternion::from_axis_angle(&self.tangent, yaw)
            * UnitQuaternion::from_axis_angle(&self.binormal, pitch)
            * self.alignment
    }
}

/// Flatten `v` into the plane perpendicular to `axis`; `None` when the
/// projection is near-degenerate.
fn flatten_against(v: Vector3<f64>, axis: &UnitVector3<f64>) -> Option<UnitVector3<f64>> {
    let flattened = v - axis.as_ref() * v.dot(axis.as_ref());
    if flattened.norm() < DEGENERATE_EPS {
        None
    } else {
        Some(UnitVector3::new_normalize(flattened))
    }
}

/// Solve a child's world transform so that its local front-attachment
/// point lands exactly on the column attachment point.
///
/// `position` selects the attachment point along the column; `pitch`,
/// `yaw`, `roll` are the joint angles applied on top of the alignment
/// rotation. Returns `None` for degenerate column/front geometry.
#[must_use]
pub fn child_transform(
    parent_position: Point3<f64>,
    parent_orientation: &UnitQuaternion<f64>,
    column: &BackColumn,
    front: Point3<f64>,
    position: f64,
    pitch: f64,
    yaw: f64,
    roll: f64,
) -> Option<(Point3<f64>, UnitQuaternion<f64>)> {
    let frame = AlignmentFrame::build(parent_orientation, column, front)?;
    let attach = frame.attachment_point(parent_position, column, position);
    let orientation = frame.child_orientation(pitch, yaw, roll);
    // Back-solve the child position from its rotated front offset.
    let child_position = attach - orientation * front.coords;
    Some((child_position, orientation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_column() -> BackColumn {
        BackColumn::straight(Vector3::new(0.0, 0.0, 0.4))
    }

    fn test_front() -> Point3<f64> {
        Point3::new(0.0, -0.2, 0.0)
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = AlignmentFrame::build(
            &UnitQuaternion::identity(),
            &BackColumn::straight(Vector3::new(0.1, 0.3, 0.05)),
            test_front(),
        )
        .unwrap();

        assert_relative_eq!(frame.tangent.dot(frame.normal.as_ref()), 0.0, epsilon = 1e-10);
        assert_relative_eq!(frame.tangent.dot(frame.binormal.as_ref()), 0.0, epsilon = 1e-10);
        assert_relative_eq!(frame.normal.dot(frame.binormal.as_ref()), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_alignment_maps_front_dir_to_tangent() {
        let frame =
            AlignmentFrame::build(&UnitQuaternion::identity(), &test_column(), test_front())
                .unwrap();

        // Front-to-center direction is +Y for a front point at -Y.
        let mapped = frame.alignment * Vector3::y();
        assert_relative_eq!(
            (mapped - frame.tangent.into_inner()).norm(),
            0.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_degenerate_column_skipped() {
        let column = BackColumn::straight(Vector3::zeros());
        assert!(
            AlignmentFrame::build(&UnitQuaternion::identity(), &column, test_front()).is_none()
        );
    }

    #[test]
    fn test_degenerate_front_skipped() {
        assert!(
            AlignmentFrame::build(&UnitQuaternion::identity(), &test_column(), Point3::origin())
                .is_none()
        );
    }

    #[test]
    fn test_attachment_point_spans_column() {
        let column = test_column();
        let frame =
            AlignmentFrame::build(&UnitQuaternion::identity(), &column, test_front()).unwrap();

        let bottom = frame.attachment_point(Point3::origin(), &column, 0.0);
        let middle = frame.attachment_point(Point3::origin(), &column, 0.5);
        let top = frame.attachment_point(Point3::origin(), &column, 1.0);

        assert_relative_eq!(bottom.z, -0.2, epsilon = 1e-10);
        assert_relative_eq!(middle.z, 0.0, epsilon = 1e-10);
        assert_relative_eq!(top.z, 0.2, epsilon = 1e-10);
    }

    #[test]
    fn test_attachment_position_clamped() {
        let column = test_column();
        let frame =
            AlignmentFrame::build(&UnitQuaternion::identity(), &column, test_front()).unwrap();

        let below = frame.attachment_point(Point3::origin(), &column, -3.0);
        let bottom = frame.attachment_point(Point3::origin(), &column, 0.0);
        assert_relative_eq!((below - bottom).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curvature_bows_midpoint_only() {
        let mut column = test_column();
        column.curvature = 0.5;
        let frame =
            AlignmentFrame::build(&UnitQuaternion::identity(), &column, test_front()).unwrap();

        let end = frame.attachment_point(Point3::origin(), &column, 0.0);
        let mid = frame.attachment_point(Point3::origin(), &column, 0.5);

        // Ends stay on the tangent line; the midpoint is displaced along
        // the normal.
        let end_off =
            end.coords - frame.tangent.as_ref() * end.coords.dot(frame.tangent.as_ref());
        assert_relative_eq!(end_off.norm(), 0.0, epsilon = 1e-10);
        assert!(mid.coords.dot(frame.normal.as_ref()).abs() > 1e-3);
    }

    #[test]
    fn test_child_transform_lands_front_on_attachment() {
        let column = test_column();
        let front = test_front();
        let parent_pos = Point3::new(1.0, 2.0, 3.0);
        let parent_q = UnitQuaternion::from_axis_angle(
            &UnitVector3::new_normalize(Vector3::new(0.3, 1.0, -0.2)),
            0.7,
        );

        let (child_pos, child_q) =
            child_transform(parent_pos, &parent_q, &column, front, 0.3, 0.2, -0.4, 0.1).unwrap();

        let frame = AlignmentFrame::build(&parent_q, &column, front).unwrap();
        let attach = frame.attachment_point(parent_pos, &column, 0.3);
        let world_front = child_pos + child_q * front.coords;
        assert_relative_eq!((world_front - attach).norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_child_transform_zero_angles_is_alignment() {
        let column = test_column();
        let front = test_front();

        let (_, child_q) = child_transform(
            Point3::origin(),
            &UnitQuaternion::identity(),
            &column,
            front,
            0.5,
            0.0,
            0.0,
            0.0,
        )
        .unwrap();

        let frame =
            AlignmentFrame::build(&UnitQuaternion::identity(), &column, front).unwrap();
        assert_relative_eq!(child_q.angle_to(&frame.alignment), 0.0, epsilon = 1e-10);
    }
}
