//! Sphere-based floor and self-collision response.
//!
//! Both responses displace current and previous particle positions by the
//! same delta, so corrections never inject velocity.

use creature_types::{SegmentDef, SimConfig};
use nalgebra::Vector3;

use crate::chain::SegmentState;
use crate::particle::Particle;

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// Push the endpoints of any segment whose collision spheres penetrate the
/// floor plane. Returns the deepest penetration corrected.
pub(crate) fn floor_response(
    particles: &mut [Particle],
    segments: &[SegmentDef],
    states: &[SegmentState],
    config: &SimConfig,
) -> f64 {
    let mut deepest: f64 = 0.0;

    for (i, (segment, state)) in segments.iter().zip(states.iter()).enumerate() {
        let mut penetration: f64 = 0.0;
        for sphere in &segment.spheres {
            let center = sphere.world_center(state.position, &state.orientation);
            penetration = penetration.max(config.floor_z + sphere.radius - center.z);
        }
        if penetration <= 0.0 {
            continue;
        }
        deepest = deepest.max(penetration);

        let push = Vector3::z() * (penetration * config.floor_push);
        for particle in &mut particles[i..=i + 1] {
            if !particle.is_pinned() {
                particle.translate(push);
            }
        }
    }

    deepest
}

/// Resolve sphere-sphere overlap between segments separated by more than
/// the configured skip distance along the chain. Each overlap pushes the
/// four involved particles apart at quarter weight. Returns the number of
/// contacts resolved.
pub(crate) fn self_collision(
    particles: &mut [Particle],
    segments: &[SegmentDef],
    states: &[SegmentState],
    config: &SimConfig,
) -> usize {
    let mut contacts = 0;

    for i in 0..segments.len() {
        for j in (i + config.collision_skip + 1)..segments.len() {
            for sphere_a in &segments[i].spheres {
                let center_a = sphere_a.world_center(states[i].position, &states[i].orientation);
                for sphere_b in &segments[j].spheres {
                    let center_b =
                        sphere_b.world_center(states[j].position, &states[j].orientation);

                    let delta = center_a - center_b;
                    let dist = delta.norm();
                    if dist < DEGENERATE_EPS {
                        continue;
                    }
                    let overlap = sphere_a.radius + sphere_b.radius - dist;
                    if overlap <= 0.0 {
                        continue;
                    }
                    contacts += 1;

                    let push = delta * (overlap * config.collision_push / dist) * 0.25;
                    for particle in &mut particles[i..=i + 1] {
                        if !particle.is_pinned() {
                            particle.translate(push);
                        }
                    }
                    for particle in &mut particles[j..=j + 1] {
                        if !particle.is_pinned() {
                            particle.translate(-push);
                        }
                    }
                }
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use creature_types::{BodyPieceDef, CollisionSphere, PieceKind, PieceSlot};
    use nalgebra::{Point3, UnitQuaternion};

    fn segment_with_sphere(radius: f64) -> SegmentDef {
        let piece = BodyPieceDef::new(
            PieceKind::Body,
            Point3::new(0.0, -0.5, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        )
        .with_sphere(CollisionSphere::new(Point3::origin(), radius));
        SegmentDef::from_piece(&piece, PieceSlot::new(PieceKind::Body, 0)).unwrap()
    }

    fn state_at(z: f64) -> SegmentState {
        SegmentState {
            position: Point3::new(0.0, 0.0, z),
            orientation: UnitQuaternion::identity(),
            ref_up: Vector3::z(),
        }
    }

    #[test]
    fn test_floor_response_pushes_endpoints_up() {
        let config = SimConfig::default();
        let segments = vec![segment_with_sphere(0.2)];
        // Sphere center at z = 0.1: penetrates by 0.1 against radius 0.2.
        let states = vec![state_at(0.1)];
        let mut particles = vec![
            Particle::at(Point3::new(0.0, -0.5, 0.1)),
            Particle::at(Point3::new(0.0, 0.5, 0.1)),
        ];

        let deepest = floor_response(&mut particles, &segments, &states, &config);

        assert!((deepest - 0.1).abs() < 1e-9);
        let lift = 0.1 * config.floor_push;
        for p in &particles {
            assert!((p.position.z - (0.1 + lift)).abs() < 1e-9);
            // No velocity injected.
            assert!(p.velocity().norm() < 1e-12);
        }
    }

    #[test]
    fn test_floor_response_clear_segment_untouched() {
        let config = SimConfig::default();
        let segments = vec![segment_with_sphere(0.2)];
        let states = vec![state_at(1.0)];
        let mut particles = vec![
            Particle::at(Point3::new(0.0, -0.5, 1.0)),
            Particle::at(Point3::new(0.0, 0.5, 1.0)),
        ];

        let deepest = floor_response(&mut particles, &segments, &states, &config);
        assert_eq!(deepest, 0.0);
        assert_eq!(particles[0].position.z, 1.0);
    }

    #[test]
    fn test_self_collision_pushes_pairs_apart() {
        let config = SimConfig {
            collision_skip: 0,
            collision_push: 1.0,
            ..SimConfig::default()
        };
        let segments = vec![segment_with_sphere(0.3), segment_with_sphere(0.3)];
        // Centers 0.4 apart: overlap 0.2.
        let states = vec![state_at(1.0), state_at(1.4)];
        let mut particles = vec![
            Particle::at(Point3::new(0.0, -0.5, 1.0)),
            Particle::at(Point3::new(0.0, 0.5, 1.0)),
            Particle::at(Point3::new(0.0, -0.5, 1.4)),
            Particle::at(Point3::new(0.0, 0.5, 1.4)),
        ];

        let contacts = self_collision(&mut particles, &segments, &states, &config);
        assert_eq!(contacts, 1);

        // Quarter-weight push along -Z for the first pair, +Z for the
        // second.
        let expected = 0.2 * 0.25;
        assert!((particles[0].position.z - (1.0 - expected)).abs() < 1e-9);
        assert!((particles[2].position.z - (1.4 + expected)).abs() < 1e-9);
        for p in &particles {
            assert!(p.velocity().norm() < 1e-12);
        }
    }

    #[test]
    fn test_self_collision_respects_skip_distance() {
        let config = SimConfig {
            collision_skip: 2,
            ..SimConfig::default()
        };
        let segments = vec![segment_with_sphere(0.3), segment_with_sphere(0.3)];
        let states = vec![state_at(1.0), state_at(1.1)];
        let mut particles = vec![
            Particle::at(Point3::new(0.0, -0.5, 1.0)),
            Particle::at(Point3::new(0.0, 0.5, 1.0)),
            Particle::at(Point3::new(0.0, -0.5, 1.1)),
            Particle::at(Point3::new(0.0, 0.5, 1.1)),
        ];

        // Adjacent segments are inside the skip window; no contact tested.
        let contacts = self_collision(&mut particles, &segments, &states, &config);
        assert_eq!(contacts, 0);
    }
}
