//! Keyboard-driven head steering.
//!
//! Steering is a pure kinematic nudge: the head particle's current and
//! previous positions are rotated/offset identically, so no velocity is
//! injected. Yaw and pitch rotate the head about the neck particle within
//! a body-relative basis built from the first two segments; forward/back
//! translate along the head's current facing.

use nalgebra::{UnitQuaternion, UnitVector3, Vector3};

use creature_types::{SimConfig, SteerFlags};

use crate::particle::Particle;

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// Apply one frame of steering input to the head particle.
pub(crate) fn apply_steering(
    particles: &mut [Particle],
    config: &SimConfig,
    steer: SteerFlags,
    dt: f64,
) {
    if steer.is_empty() || particles.len() < 3 || particles[0].is_pinned() {
        return;
    }

    let neck = particles[1].position;
    let body_raw = neck - particles[2].position;
    if body_raw.norm() < DEGENERATE_EPS {
        return;
    }
    let body_forward = body_raw.normalize();

    let mut right = body_forward.cross(&Vector3::z());
    if right.norm() < DEGENERATE_EPS {
        right = body_forward.cross(&Vector3::x());
    }
    if right.norm() < DEGENERATE_EPS {
        return;
    }
    let right = right.normalize();
    let up = right.cross(&body_forward);

    let mut yaw = 0.0;
    if steer.contains(SteerFlags::YAW_LEFT) {
        yaw += config.steer_turn_rate * dt;
    }
    if steer.contains(SteerFlags::YAW_RIGHT) {
        yaw -= config.steer_turn_rate * dt;
    }

    let mut pitch = 0.0;
    if steer.contains(SteerFlags::PITCH_UP) {
        pitch += config.steer_turn_rate * dt;
    }
    if steer.contains(SteerFlags::PITCH_DOWN) {
        pitch -= config.steer_turn_rate * dt;
    }

    if yaw != 0.0 || pitch != 0.0 {
        let rotation = UnitQuaternion::from_axis_angle(&UnitVector3::new_normalize(up), yaw)
            * UnitQuaternion::from_axis_angle(&UnitVector3::new_normalize(right), pitch);
        let head = &mut particles[0];
        head.position = neck + rotation * (head.position - neck);
        head.prev_position = neck + rotation * (head.prev_position - neck);
    }

    let mut advance = 0.0;
    if steer.contains(SteerFlags::FORWARD) {
        advance += config.steer_move_speed * dt;
    }
    if steer.contains(SteerFlags::BACK) {
        advance -= config.steer_move_speed * dt;
    }
    if advance != 0.0 {
        let facing_raw = particles[0].position - neck;
        if facing_raw.norm() >= DEGENERATE_EPS {
            let facing = facing_raw.normalize();
            particles[0].translate(facing * advance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn straight_chain() -> Vec<Particle> {
        vec![
            Particle::at(Point3::new(2.0, 0.0, 1.0)),
            Particle::at(Point3::new(1.0, 0.0, 1.0)),
            Particle::at(Point3::new(0.0, 0.0, 1.0)),
        ]
    }

    #[test]
    fn test_no_input_is_noop() {
        let config = SimConfig::default();
        let mut particles = straight_chain();
        let before = particles[0].position;

        apply_steering(&mut particles, &config, SteerFlags::empty(), 1.0 / 60.0);
        assert_eq!(particles[0].position, before);
    }

    #[test]
    fn test_yaw_rotates_head_about_neck() {
        let config = SimConfig::default();
        let mut particles = straight_chain();

        apply_steering(&mut particles, &config, SteerFlags::YAW_LEFT, 0.1);

        let head = particles[0].position;
        let neck = particles[1].position;
        // Distance to the neck is preserved; the head moved laterally.
        assert!(((head - neck).norm() - 1.0).abs() < 1e-9);
        assert!(head.y.abs() > 1e-4);
        // Kinematic nudge: no velocity injected.
        assert!(particles[0].velocity().norm() < 1e-12);
    }

    #[test]
    fn test_forward_translates_along_facing() {
        let config = SimConfig::default();
        let mut particles = straight_chain();

        apply_steering(&mut particles, &config, SteerFlags::FORWARD, 0.1);

        let moved = particles[0].position.x - 2.0;
        assert!((moved - config.steer_move_speed * 0.1).abs() < 1e-9);
        assert!(particles[0].velocity().norm() < 1e-12);
    }

    #[test]
    fn test_short_chain_skipped() {
        let config = SimConfig::default();
        let mut particles = vec![
            Particle::at(Point3::origin()),
            Particle::at(Point3::new(1.0, 0.0, 0.0)),
        ];
        let before = particles[0].position;
        apply_steering(&mut particles, &config, SteerFlags::FORWARD, 0.1);
        assert_eq!(particles[0].position, before);
    }
}
