//! Body-piece descriptors and the segment topology derived from them.
//!
//! A creature body is an ordered run of pieces (head, a configurable number
//! of body links, tail). Each piece contributes a pair of local attachment
//! points; the vector between them fixes the segment's rest axis and rest
//! length. The piece occupying a slot can change (swapping geometry assets),
//! which is why [`SegmentDef`] is derived rather than stored.
//!
//! ```text
//!  head        body x N        tail
//! ●━━━━●────●━━━━●─ ... ─●━━━━●────●━━━━●
//! f    b    f    b       f    b    f    b    (front/back attachments)
//! ```

use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collision::CollisionSphere;
use crate::error::{TopologyError, TopologyResult};

/// Guard threshold for near-degenerate direction vectors.
const DEGENERATE_EPS: f64 = 1e-4;

/// Which class of body piece occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    /// The leading head piece.
    Head,
    /// A repeated mid-body piece.
    Body,
    /// The trailing tail piece.
    Tail,
}

impl PieceKind {
    /// Stable display name for this piece kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Tail => "tail",
        }
    }
}

/// A tagged identifier for one slot of the body: piece kind plus the index
/// of that kind along the chain (always 0 for head and tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceSlot {
    /// Piece class occupying the slot.
    pub kind: PieceKind,
    /// Index among pieces of the same kind.
    pub index: u16,
}

impl PieceSlot {
    /// Create a new slot identifier.
    #[must_use]
    pub const fn new(kind: PieceKind, index: u16) -> Self {
        Self { kind, index }
    }
}

/// The class of a joint between two adjacent segments.
///
/// Limits are configured per class, not per joint, so a 40-link body shares
/// one set of body-body bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointClass {
    /// Joint between the head and the first body link.
    HeadBody,
    /// Joint between two body links.
    BodyBody,
    /// Joint between the last body link and the tail.
    BodyTail,
}

impl JointClass {
    /// Yaw measurement offset for this class.
    ///
    /// The tail attaches from the opposite end of its piece, so its yaw is
    /// measured half a turn off from the other classes.
    #[must_use]
    pub fn yaw_offset(self) -> f64 {
        match self {
            Self::HeadBody | Self::BodyBody => 0.0,
            Self::BodyTail => std::f64::consts::PI,
        }
    }

    /// Classify joint `joint_index` in a chain of `num_segments` segments.
    ///
    /// Joint `j` connects segments `j` and `j + 1`; segment 0 is the head
    /// and the last segment is the tail.
    #[must_use]
    pub fn for_joint(joint_index: usize, num_segments: usize) -> Self {
        if joint_index == 0 {
            Self::HeadBody
        } else if joint_index + 2 >= num_segments {
            Self::BodyTail
        } else {
            Self::BodyBody
        }
    }
}

/// Descriptor of the curved attachment column at a piece's back connection.
///
/// The column's height vector (in piece-local space) spans the attachment
/// range; `curvature` bows the column laterally and `rotation` tilts it
/// relative to the piece.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BackColumn {
    /// Local-space height vector of the column.
    pub height: Vector3<f64>,
    /// Lateral bow factor applied along the frame normal.
    pub curvature: f64,
    /// Local rotation of the column relative to the piece.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for BackColumn {
    fn default() -> Self {
        Self {
            height: Vector3::new(0.0, 0.0, 0.2),
            curvature: 0.0,
            rotation: UnitQuaternion::identity(),
        }
    }
}

impl BackColumn {
    /// Create a straight, untilted column from a local height vector.
    #[must_use]
    pub fn straight(height: Vector3<f64>) -> Self {
        Self {
            height,
            curvature: 0.0,
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// Static definition of one body piece: attachment geometry plus collision
/// volumes. Owned by the configuration layer and only read by the
/// simulator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyPieceDef {
    /// Piece class this definition describes.
    pub kind: PieceKind,
    /// Local-space front attachment point.
    pub front: Point3<f64>,
    /// Local-space back attachment point.
    pub back: Point3<f64>,
    /// Curved-column descriptor at the back connection.
    pub column: BackColumn,
    /// Sphere-approximated collision volumes, in piece-local space.
    pub spheres: SmallVec<[CollisionSphere; 4]>,
}

impl BodyPieceDef {
    /// Create a piece definition from its attachment points, with no
    /// collision spheres and a default back column.
    #[must_use]
    pub fn new(kind: PieceKind, front: Point3<f64>, back: Point3<f64>) -> Self {
        Self {
            kind,
            front,
            back,
            column: BackColumn::default(),
            spheres: SmallVec::new(),
        }
    }

    /// Attach a collision sphere to this piece.
    #[must_use]
    pub fn with_sphere(mut self, sphere: CollisionSphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    /// Set the back-connection column descriptor.
    #[must_use]
    pub fn with_column(mut self, column: BackColumn) -> Self {
        self.column = column;
        self
    }

    /// Validate the piece geometry.
    ///
    /// # Errors
    ///
    /// Returns an error when the attachment points coincide or a collision
    /// sphere has a non-positive radius.
    pub fn validate(&self) -> TopologyResult<()> {
        if (self.back - self.front).norm() < DEGENERATE_EPS {
            return Err(TopologyError::DegenerateAttachment(self.kind.name()));
        }
        for sphere in &self.spheres {
            if sphere.radius <= 0.0 {
                return Err(TopologyError::InvalidSphereRadius {
                    piece: self.kind.name(),
                    radius: sphere.radius,
                });
            }
        }
        Ok(())
    }
}

/// The piece definitions occupying the three slot classes of a chain body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceSet {
    /// Head piece definition.
    pub head: BodyPieceDef,
    /// Body link definition, repeated for every configured link.
    pub body: BodyPieceDef,
    /// Tail piece definition.
    pub tail: BodyPieceDef,
}

impl PieceSet {
    /// Validate all three piece definitions.
    ///
    /// # Errors
    ///
    /// Propagates the first geometry error found.
    pub fn validate(&self) -> TopologyResult<()> {
        self.head.validate()?;
        self.body.validate()?;
        self.tail.validate()
    }

    /// Look up the definition for a piece kind.
    #[must_use]
    pub const fn piece(&self, kind: PieceKind) -> &BodyPieceDef {
        match kind {
            PieceKind::Head => &self.head,
            PieceKind::Body => &self.body,
            PieceKind::Tail => &self.tail,
        }
    }
}

/// Per-slot segment descriptor derived once from a [`BodyPieceDef`].
///
/// Invariant under simulation; recomputed only when the configuration
/// swaps the piece occupying a slot.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentDef {
    /// Slot this segment occupies.
    pub slot: PieceSlot,
    /// Local-space front attachment offset.
    pub front_offset: Vector3<f64>,
    /// Unit vector from front to back attachment in local space.
    pub rest_axis: UnitVector3<f64>,
    /// Distance between the attachment points in local space.
    pub rest_length: f64,
    /// Canonical local up, perpendicular to the rest axis. Used as the
    /// twist reference when reconstructing world orientation.
    pub local_up: UnitVector3<f64>,
    /// Back-connection column carried over from the piece.
    pub column: BackColumn,
    /// Collision spheres carried over from the piece.
    pub spheres: SmallVec<[CollisionSphere; 4]>,
}

impl SegmentDef {
    /// Derive a segment descriptor from a validated piece definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the piece geometry is invalid.
    pub fn from_piece(piece: &BodyPieceDef, slot: PieceSlot) -> TopologyResult<Self> {
        piece.validate()?;

        let rest = piece.back - piece.front;
        let rest_length = rest.norm();
        let rest_axis = UnitVector3::new_normalize(rest);

        // Flatten world-up into the plane perpendicular to the rest axis;
        // fall back to local X when the axis is itself near-vertical.
        let up = Vector3::z();
        let flattened = up - rest_axis.as_ref() * up.dot(rest_axis.as_ref());
        let local_up = if flattened.norm() > DEGENERATE_EPS {
            UnitVector3::new_normalize(flattened)
        } else {
            let x = Vector3::x();
            UnitVector3::new_normalize(x - rest_axis.as_ref() * x.dot(rest_axis.as_ref()))
        };

        Ok(Self {
            slot,
            front_offset: piece.front.coords,
            rest_axis,
            rest_length,
            local_up,
            column: piece.column,
            spheres: piece.spheres.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_piece(kind: PieceKind) -> BodyPieceDef {
        BodyPieceDef::new(
            kind,
            Point3::new(0.0, -0.15, 0.0),
            Point3::new(0.0, 0.15, 0.0),
        )
    }

    #[test]
    fn test_joint_class_for_joint() {
        // head + 3 body + tail = 5 segments, 4 joints
        assert_eq!(JointClass::for_joint(0, 5), JointClass::HeadBody);
        assert_eq!(JointClass::for_joint(1, 5), JointClass::BodyBody);
        assert_eq!(JointClass::for_joint(2, 5), JointClass::BodyBody);
        assert_eq!(JointClass::for_joint(3, 5), JointClass::BodyTail);
    }

    #[test]
    fn test_joint_class_yaw_offset() {
        assert_eq!(JointClass::HeadBody.yaw_offset(), 0.0);
        assert!((JointClass::BodyTail.yaw_offset() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_segment_def_from_piece() {
        let piece = test_piece(PieceKind::Body);
        let def = SegmentDef::from_piece(&piece, PieceSlot::new(PieceKind::Body, 0)).unwrap();

        assert!((def.rest_length - 0.3).abs() < 1e-12);
        assert!((def.rest_axis.y - 1.0).abs() < 1e-12);
        assert!((def.front_offset.y - (-0.15)).abs() < 1e-12);
        // local up must be perpendicular to the rest axis
        assert!(def.local_up.dot(def.rest_axis.as_ref()).abs() < 1e-10);
    }

    #[test]
    fn test_segment_def_vertical_axis_fallback() {
        let piece = BodyPieceDef::new(
            PieceKind::Body,
            Point3::new(0.0, 0.0, -0.1),
            Point3::new(0.0, 0.0, 0.1),
        );
        let def = SegmentDef::from_piece(&piece, PieceSlot::new(PieceKind::Body, 0)).unwrap();
        assert!(def.local_up.dot(def.rest_axis.as_ref()).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_attachment_rejected() {
        let piece = BodyPieceDef::new(PieceKind::Head, Point3::origin(), Point3::origin());
        let result = SegmentDef::from_piece(&piece, PieceSlot::new(PieceKind::Head, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_sphere_rejected() {
        let piece =
            test_piece(PieceKind::Tail).with_sphere(CollisionSphere::new(Point3::origin(), 0.0));
        assert!(piece.validate().is_err());
    }

    #[test]
    fn test_piece_set_lookup() {
        let set = PieceSet {
            head: test_piece(PieceKind::Head),
            body: test_piece(PieceKind::Body),
            tail: test_piece(PieceKind::Tail),
        };
        assert!(set.validate().is_ok());
        assert_eq!(set.piece(PieceKind::Tail).kind, PieceKind::Tail);
    }
}
