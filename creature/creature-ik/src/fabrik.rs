//! Two-pass FABRIK solver for fixed-length limb chains.

use nalgebra::Point2;

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// One forward-then-backward FABRIK sweep over `joints`.
///
/// The forward pass pins joint 0 to `target` and pulls each subsequent
/// joint to within `segment_length` of its already-moved predecessor; the
/// backward pass pins the last joint to `anchor` and pulls each preceding
/// joint back in, overwriting the forward placements. The chain therefore
/// always terminates exactly at `anchor` and approximates reaching
/// `target` — a single sweep, not iterated to convergence.
///
/// Coincident joints are left where they are for this call rather than
/// normalized into NaN.
pub fn fabrik_resolve(
    joints: &mut [Point2<f64>],
    target: Point2<f64>,
    anchor: Point2<f64>,
    segment_length: f64,
) {
    let n = joints.len();
    if n == 0 {
        return;
    }

    // Forward reach: head chases the target.
    joints[0] = target;
    for i in 1..n {
        let delta = joints[i] - joints[i - 1];
        let dist = delta.norm();
        if dist < DEGENERATE_EPS {
            continue;
        }
        joints[i] = joints[i - 1] + delta * (segment_length / dist);
    }

    // Backward reach: base snaps to the anchor.
    joints[n - 1] = anchor;
    for i in (0..n - 1).rev() {
        let delta = joints[i] - joints[i + 1];
        let dist = delta.norm();
        if dist < DEGENERATE_EPS {
            continue;
        }
        joints[i] = joints[i + 1] + delta * (segment_length / dist);
    }
}
