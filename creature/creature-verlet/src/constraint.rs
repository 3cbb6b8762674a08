//! Positional constraint passes run inside the relaxation loop.

use nalgebra::Vector3;

use creature_math::wrap_angle;
use creature_types::{JointClass, LimitSet, SegmentDef, SimConfig};

use crate::particle::Particle;

/// Guard threshold for near-degenerate directions; a degenerate element is
/// skipped for this frame, not retried.
const DEGENERATE_EPS: f64 = 1e-4;

/// Restore every link to its rest length, splitting the correction half
/// and half between the endpoints (Jakobsen relaxation). A pinned endpoint
/// takes no share; its partner takes the full correction.
///
/// Coincident endpoints have no direction to correct along; they separate
/// along the drop axis, which keeps the result deterministic when a chain
/// is spawned collapsed onto one point.
pub(crate) fn relax_lengths(particles: &mut [Particle], segments: &[SegmentDef]) {
    for (i, segment) in segments.iter().enumerate() {
        let delta = particles[i + 1].position - particles[i].position;
        let dist = delta.norm();

        let correction = if dist < DEGENERATE_EPS {
            // Virtual delta of -Z: the downstream particle ends up below.
            Vector3::z() * segment.rest_length
        } else {
            delta * ((dist - segment.rest_length) / dist)
        };
        let a_pinned = particles[i].is_pinned();
        let b_pinned = particles[i + 1].is_pinned();
        match (a_pinned, b_pinned) {
            (false, false) => {
                particles[i].position += correction * 0.5;
                particles[i + 1].position -= correction * 0.5;
            }
            (false, true) => particles[i].position += correction,
            (true, false) => particles[i + 1].position -= correction,
            (true, true) => {}
        }
    }
}

/// Local forward/side/up frame at joint `i` (the junction between links
/// `i - 1` and `i`), rebuilt from the previous two links with a world-up
/// fallback for the second link. `None` for degenerate geometry.
fn link_frame(
    particles: &[Particle],
    i: usize,
) -> Option<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
    let forward_raw = particles[i].position - particles[i - 1].position;
    if forward_raw.norm() < DEGENERATE_EPS {
        return None;
    }
    let forward = forward_raw.normalize();

    let up_candidate = if i >= 2 {
        let prev = particles[i - 1].position - particles[i - 2].position;
        if prev.norm() < DEGENERATE_EPS {
            Vector3::z()
        } else {
            prev.normalize()
        }
    } else {
        Vector3::z()
    };

    let mut side = forward.cross(&up_candidate);
    if side.norm() < DEGENERATE_EPS {
        side = forward.cross(&Vector3::z());
    }
    if side.norm() < DEGENERATE_EPS {
        side = forward.cross(&Vector3::x());
    }
    if side.norm() < DEGENERATE_EPS {
        return None;
    }
    let side = side.normalize();
    let up = side.cross(&forward);

    Some((forward, side, up))
}

/// Clamp the yaw of every link (except the first) against its joint
/// class's limits.
///
/// When a link is clamped, the downstream particle is rotated onto the
/// clamped direction at unchanged distance from the joint, and the lateral
/// component of its velocity is stripped so it does not immediately
/// re-violate the limit.
pub(crate) fn constrain_yaw(particles: &mut [Particle], limits: &LimitSet, num_segments: usize) {
    for i in 1..num_segments {
        if particles[i + 1].is_pinned() {
            continue;
        }
        let Some((forward, side, up)) = link_frame(particles, i) else {
            continue;
        };

        let d = particles[i + 1].position - particles[i].position;
        if d.norm() < DEGENERATE_EPS {
            continue;
        }

        let class = JointClass::for_joint(i - 1, num_segments);
        let bounds = limits.class(class).yaw;
        let offset = class.yaw_offset();
        // The tail attaches from the opposite end: its link is measured
        // reversed, with the class yaw offset compensating.
        let reversed = class == JointClass::BodyTail;
        let d_m = if reversed { -d } else { d };
        let f = d_m.dot(&forward);
        let l = d_m.dot(&side);
        let v = d_m.dot(&up);

        let measured = wrap_angle(f64::atan2(l, f) - offset);
        let clamped = bounds.clamp(measured);
        if (clamped - measured).abs() < 1e-9 {
            continue;
        }

        let target = clamped + offset;
        let horizontal = f64::hypot(f, l);
        let new_d_m =
            forward * (target.cos() * horizontal) + side * (target.sin() * horizontal) + up * v;
        let new_d = if reversed { -new_d_m } else { new_d_m };
        particles[i + 1].position = particles[i].position + new_d;

        let lateral = particles[i + 1].velocity().dot(&side);
        particles[i + 1].prev_position += side * lateral;
    }
}

/// Clamp particles to the floor plane, syncing the previous position so
/// vertical velocity is zeroed.
pub(crate) fn clamp_floor(particles: &mut [Particle], config: &SimConfig) {
    let min_z = config.floor_z + config.particle_radius;
    for particle in particles.iter_mut() {
        if particle.is_pinned() {
            continue;
        }
        if particle.position.z < min_z {
            particle.position.z = min_z;
            particle.prev_position.z = min_z;
        }
    }
}

/// Worst absolute link-length error across the chain.
pub(crate) fn max_length_error(particles: &[Particle], segments: &[SegmentDef]) -> f64 {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let dist = (particles[i + 1].position - particles[i].position).norm();
            (dist - segment.rest_length).abs()
        })
        .fold(0.0, f64::max)
}

/// Measured yaw of link `i` relative to link `i - 1`, offset-adjusted for
/// the joint class. `None` for degenerate geometry.
pub(crate) fn measured_yaw(particles: &[Particle], i: usize, num_segments: usize) -> Option<f64> {
    let (forward, side, _) = link_frame(particles, i)?;

    let d = particles[i + 1].position - particles[i].position;
    if d.norm() < DEGENERATE_EPS {
        return None;
    }
    let class = JointClass::for_joint(i - 1, num_segments);
    let d_m = if class == JointClass::BodyTail { -d } else { d };
    let f = d_m.dot(&forward);
    let l = d_m.dot(&side);
    Some(wrap_angle(f64::atan2(l, f) - class.yaw_offset()))
}
