//! The locomotion controller: a spine seeking a wandering attractor,
//! carrying stepping limbs.

use nalgebra::Point2;

use crate::limb::{Limb, LimbParams, LimbSide};
use crate::spine::{SpineChain, constrain_angle, heading_vector};

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// Configuration for a legged walker.
#[derive(Debug, Clone)]
pub struct WalkerParams {
    /// Number of spine joints.
    pub joint_count: usize,
    /// Spine segment length.
    pub segment_length: f64,
    /// Per-joint spine angle constraint; also the whole-body turn budget
    /// per update.
    pub angle_constraint: f64,
    /// Half the body width; limbs anchor this far to the side.
    pub half_width: f64,
    /// Top forward speed.
    pub max_speed: f64,
    /// Distance scale of the saturating approach profile: speed is
    /// `max_speed * (1 - e^(-distance / arrive_distance))`.
    pub arrive_distance: f64,
    /// Limb configurations.
    pub limbs: Vec<LimbParams>,
}

impl Default for WalkerParams {
    fn default() -> Self {
        Self {
            joint_count: 12,
            segment_length: 0.5,
            angle_constraint: 0.25,
            half_width: 0.4,
            max_speed: 3.0,
            arrive_distance: 2.0,
            limbs: Vec::new(),
        }
    }
}

impl WalkerParams {
    /// A four-legged body: limb pairs at the shoulder and hip joints.
    #[must_use]
    pub fn quadruped() -> Self {
        Self {
            limbs: vec![
                LimbParams::new(2, LimbSide::Left),
                LimbParams::new(2, LimbSide::Right),
                LimbParams::new(7, LimbSide::Left),
                LimbParams::new(7, LimbSide::Right),
            ],
            ..Self::default()
        }
    }

    /// Set the top speed.
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Add a limb.
    #[must_use]
    pub fn with_limb(mut self, limb: LimbParams) -> Self {
        self.limbs.push(limb);
        self
    }
}

/// A spine chain plus stepping limbs, steered toward an attractor point.
#[derive(Debug)]
pub struct Walker {
    spine: SpineChain,
    limbs: Vec<Limb>,
    params: WalkerParams,
}

impl Walker {
    /// Create a walker at `origin` facing along `heading`. Limb attachment
    /// indices beyond the spine are clamped to the last joint.
    #[must_use]
    pub fn new(params: WalkerParams, origin: Point2<f64>, heading: f64) -> Self {
        let spine = SpineChain::new(
            origin,
            heading,
            params.joint_count,
            params.segment_length,
            params.angle_constraint,
        );
        let last = spine.len() - 1;
        let limbs = params
            .limbs
            .iter()
            .map(|limb| {
                let mut limb = *limb;
                limb.attach_index = limb.attach_index.min(last);
                Limb::new(limb)
            })
            .collect();

        Self {
            spine,
            limbs,
            params,
        }
    }

    /// The spine chain.
    #[must_use]
    pub const fn spine(&self) -> &SpineChain {
        &self.spine
    }

    /// The limbs, in configuration order.
    #[must_use]
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Advance one frame: seek the attractor, resolve the spine, update
    /// every limb.
    ///
    /// The turn toward the attractor is limited by the spine's angle
    /// constraint, and forward speed scales with distance through a
    /// saturating profile so the walker decelerates smoothly on approach.
    pub fn update(&mut self, dt: f64, attractor: Point2<f64>) {
        let head = self.spine.joint(0);
        let heading = self.spine.heading(0);

        let to_target = attractor - head;
        let distance = to_target.norm();

        let new_heading = if distance < DEGENERATE_EPS {
            heading
        } else {
            let desired = f64::atan2(to_target.y, to_target.x);
            constrain_angle(desired, heading, self.params.angle_constraint)
        };

        let speed = self.params.max_speed * (1.0 - (-distance / self.params.arrive_distance).exp());
        let new_head = head + heading_vector(new_heading) * (speed * dt);
        self.spine.resolve(new_head, new_heading);

        for limb in &mut self.limbs {
            let attach = limb.params().attach_index;
            limb.update(
                self.spine.joint(attach),
                self.spine.heading(attach),
                self.params.half_width,
            );
        }
    }
}
