//! The verlet chain simulator.

use nalgebra::{Point3, UnitQuaternion, UnitVector3, Vector3};
use tracing::debug;

use creature_math::joint_angles;
use creature_types::{
    ConnectionParams, CreatureSnapshot, FrameInput, JointClass, JointSnapshot, LimitSet, PieceKind,
    PieceSet, PieceSlot, SegmentDef, SimConfig, TopologyResult, clamp_link_count,
};

use crate::collision::{floor_response, self_collision};
use crate::constraint::{
    clamp_floor, constrain_yaw, max_length_error, measured_yaw, relax_lengths,
};
use crate::diagnostics::{DiagnosticsStore, JointDiagnostics};
use crate::particle::Particle;
use crate::steering::apply_steering;

/// Guard threshold for near-degenerate directions.
const DEGENERATE_EPS: f64 = 1e-4;

/// A segment's world transform, for mesh placement by a rendering layer.
#[derive(Debug, Clone, Copy)]
pub struct SegmentTransform {
    /// World position of the piece origin.
    pub position: Point3<f64>,
    /// World orientation of the piece.
    pub orientation: UnitQuaternion<f64>,
}

/// Reconstructed per-segment state, including the continuously updated
/// twist reference.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentState {
    /// World position of the piece origin.
    pub(crate) position: Point3<f64>,
    /// World orientation of the piece.
    pub(crate) orientation: UnitQuaternion<f64>,
    /// Reference up vector carried between frames for stable framing.
    pub(crate) ref_up: Vector3<f64>,
}

/// Statistics from the last frame update.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepStats {
    /// Worst absolute link-length error after relaxation.
    pub max_length_error: f64,
    /// Self-collision contacts resolved.
    pub collision_contacts: usize,
    /// Deepest floor penetration corrected.
    pub max_floor_penetration: f64,
}

/// A string of point masses forming an articulated creature body.
///
/// The chain is head + N body links + tail; segment 0 is head-adjacent and
/// the last segment is the tail. Changing the link count or the piece set
/// rebuilds the whole chain at its vertical drop position.
#[derive(Debug)]
pub struct VerletChain {
    pieces: PieceSet,
    limits: LimitSet,
    config: SimConfig,
    link_count: usize,
    particles: Vec<Particle>,
    segments: Vec<SegmentDef>,
    states: Vec<SegmentState>,
    diagnostics: DiagnosticsStore,
    stats: StepStats,
    frame_index: u64,
}

impl VerletChain {
    /// Create a chain from piece definitions, joint-class limits, physical
    /// constants, and a requested body-link count (clamped to the legal
    /// range).
    ///
    /// # Errors
    ///
    /// Returns an error when a piece definition has invalid geometry.
    pub fn new(
        pieces: PieceSet,
        limits: LimitSet,
        config: SimConfig,
        link_count: usize,
    ) -> TopologyResult<Self> {
        pieces.validate()?;

        let mut chain = Self {
            pieces,
            limits,
            config,
            link_count: clamp_link_count(link_count),
            particles: Vec::new(),
            segments: Vec::new(),
            states: Vec::new(),
            diagnostics: DiagnosticsStore::default(),
            stats: StepStats::default(),
            frame_index: 0,
        };
        chain.rebuild()?;
        Ok(chain)
    }

    /// Number of body links (head and tail excluded).
    #[must_use]
    pub const fn link_count(&self) -> usize {
        self.link_count
    }

    /// Number of segments, including head and tail.
    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Number of particles.
    #[must_use]
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Number of joints between adjacent segments.
    #[must_use]
    pub fn num_joints(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// The particles, index 0 at the head.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable particle access, for pinning.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Statistics from the last frame update.
    #[must_use]
    pub const fn stats(&self) -> &StepStats {
        &self.stats
    }

    /// Latest diagnostic sample for a joint, if one has been taken.
    #[must_use]
    pub fn joint_diagnostics(&self, joint: usize) -> Option<&JointDiagnostics> {
        self.diagnostics.latest(joint)
    }

    /// World transform of segment `index`.
    #[must_use]
    pub fn segment_transform(&self, index: usize) -> Option<SegmentTransform> {
        self.states.get(index).map(|state| SegmentTransform {
            position: state.position,
            orientation: state.orientation,
        })
    }

    /// World transforms of every segment, in chain order.
    #[must_use]
    pub fn segment_transforms(&self) -> Vec<SegmentTransform> {
        self.states
            .iter()
            .map(|state| SegmentTransform {
                position: state.position,
                orientation: state.orientation,
            })
            .collect()
    }

    /// Change the body-link count. Out-of-range values are clamped; a
    /// change rebuilds the chain at its drop position.
    pub fn set_link_count(&mut self, requested: usize) {
        let clamped = clamp_link_count(requested);
        if clamped == self.link_count {
            return;
        }
        debug!(from = self.link_count, to = clamped, "link count changed, rebuilding chain");
        self.link_count = clamped;
        // Piece geometry was validated at construction; rebuilding with the
        // same pieces cannot fail.
        let _ = self.rebuild();
    }

    /// Swap the piece definitions and rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error when the new pieces have invalid geometry; the
    /// chain keeps its previous configuration in that case.
    pub fn set_pieces(&mut self, pieces: PieceSet) -> TopologyResult<()> {
        pieces.validate()?;
        self.pieces = pieces;
        self.rebuild()
    }

    /// Replace the joint-class limits. Takes effect next frame; no
    /// rebuild.
    pub fn set_limits(&mut self, limits: LimitSet) {
        self.limits = limits;
    }

    /// Replace the physical constants. Takes effect next frame; no
    /// rebuild.
    pub fn set_config(&mut self, config: SimConfig) {
        self.config = config;
    }

    /// Rebuild segments and drop the particle chain vertically, head on
    /// top, lowest particle `spawn_height` above the floor.
    fn rebuild(&mut self) -> TopologyResult<()> {
        self.segments.clear();
        self.segments.push(SegmentDef::from_piece(
            &self.pieces.head,
            PieceSlot::new(PieceKind::Head, 0),
        )?);
        for index in 0..self.link_count {
            #[allow(clippy::cast_possible_truncation)]
            let slot = PieceSlot::new(PieceKind::Body, index as u16);
            self.segments
                .push(SegmentDef::from_piece(&self.pieces.body, slot)?);
        }
        self.segments.push(SegmentDef::from_piece(
            &self.pieces.tail,
            PieceSlot::new(PieceKind::Tail, 0),
        )?);

        let total_length: f64 = self.segments.iter().map(|s| s.rest_length).sum();
        let top = self.config.floor_z + self.config.spawn_height + total_length;

        self.particles.clear();
        self.particles.push(Particle::at(Point3::new(0.0, 0.0, top)));
        for i in 0..self.segments.len() {
            let below = self.particles[i].position - Vector3::z() * self.segments[i].rest_length;
            self.particles.push(Particle::at(below));
        }

        self.states.clear();
        self.states.resize(
            self.segments.len(),
            SegmentState {
                position: Point3::origin(),
                orientation: UnitQuaternion::identity(),
                ref_up: Vector3::x(),
            },
        );
        self.reconstruct_orientations();

        self.diagnostics.reset(self.num_joints());
        self.stats = StepStats::default();
        self.frame_index = 0;
        Ok(())
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self, input: &FrameInput) {
        self.integrate(input);

        for _ in 0..self.config.iterations {
            relax_lengths(&mut self.particles, &self.segments);
            if self.config.yaw_limits_enabled {
                constrain_yaw(&mut self.particles, &self.limits, self.segments.len());
            }
            clamp_floor(&mut self.particles, &self.config);
        }

        self.reconstruct_orientations();

        let max_floor_penetration = floor_response(
            &mut self.particles,
            &self.segments,
            &self.states,
            &self.config,
        );
        let collision_contacts = self_collision(
            &mut self.particles,
            &self.segments,
            &self.states,
            &self.config,
        );

        apply_steering(&mut self.particles, &self.config, input.steer, input.dt);

        self.stats = StepStats {
            max_length_error: max_length_error(&self.particles, &self.segments),
            collision_contacts,
            max_floor_penetration,
        };

        if DiagnosticsStore::due(self.frame_index) {
            self.sample_diagnostics(input.dt);
        }
        self.frame_index += 1;
    }

    /// Verlet integration with damping and gravity; the dragged particle
    /// is lerped toward its target instead.
    fn integrate(&mut self, input: &FrameInput) {
        let gravity_step = self.config.gravity * input.dt * input.dt;
        let dragged = input
            .drag
            .filter(|drag| drag.particle < self.particles.len());

        for (index, particle) in self.particles.iter_mut().enumerate() {
            if particle.is_pinned() {
                continue;
            }
            if let Some(drag) = dragged {
                if drag.particle == index {
                    particle.prev_position = particle.position;
                    particle.position +=
                        (drag.target - particle.position) * self.config.drag_strength;
                    continue;
                }
            }

            let velocity = (particle.position - particle.prev_position) * self.config.damping;
            particle.prev_position = particle.position;
            particle.position += velocity;
            particle.position.z -= gravity_step;
        }
    }

    /// Derive each segment's world orientation from its link direction: a
    /// minimal rotation from the local rest axis, plus a twist correction
    /// aligning the local up with the carried reference up.
    fn reconstruct_orientations(&mut self) {
        for (i, (segment, state)) in self
            .segments
            .iter()
            .zip(self.states.iter_mut())
            .enumerate()
        {
            let link = self.particles[i + 1].position - self.particles[i].position;
            if link.norm() < DEGENERATE_EPS {
                // Degenerate this frame; keep the previous transform.
                continue;
            }
            let dir = link.normalize();

            let base = UnitQuaternion::rotation_between(segment.rest_axis.as_ref(), &dir)
                .unwrap_or_else(|| {
                    // Anti-parallel: flip half a turn about the local up.
                    UnitQuaternion::from_axis_angle(&segment.local_up, std::f64::consts::PI)
                });

            // Stable framing: project the carried reference up off the new
            // direction; fall back by the direction's vertical component to
            // avoid flips near-vertical.
            let mut ref_up = state.ref_up - dir * state.ref_up.dot(&dir);
            if ref_up.norm() < DEGENERATE_EPS {
                let fallback = if dir.z.abs() > 0.9 {
                    Vector3::x()
                } else {
                    Vector3::z()
                };
                ref_up = fallback - dir * fallback.dot(&dir);
            }
            if ref_up.norm() < DEGENERATE_EPS {
                continue;
            }
            let ref_up = ref_up.normalize();

            let current_up = base * segment.local_up.into_inner();
            let twist = f64::atan2(current_up.cross(&ref_up).dot(&dir), current_up.dot(&ref_up));
            let orientation =
                UnitQuaternion::from_axis_angle(&UnitVector3::new_unchecked(dir), twist) * base;

            state.orientation = orientation;
            state.ref_up = orientation * segment.local_up.into_inner();
            // Land the local front attachment exactly on the particle.
            state.position = self.particles[i].position - orientation * segment.front_offset;
        }
    }

    /// Sample per-joint diagnostics: angles against the attachment frame,
    /// finite-difference rates, and gravity torque about the frame axes.
    fn sample_diagnostics(&mut self, dt: f64) {
        let num_segments = self.segments.len();
        let mut samples = Vec::with_capacity(self.num_joints());

        for joint in 0..self.num_joints() {
            let class = JointClass::for_joint(joint, num_segments);
            let parent = &self.states[joint];
            let child_def = &self.segments[joint + 1];

            let Some(angles) = joint_angles(
                &parent.orientation,
                &self.states[joint + 1].orientation,
                &self.segments[joint].column,
                Point3::from(child_def.front_offset),
                class.yaw_offset(),
            ) else {
                continue;
            };

            let (yaw_rate, pitch_rate, roll_rate) = match self.diagnostics.latest(joint) {
                Some(prev) if dt > 0.0 && self.frame_index > prev.frame => {
                    #[allow(clippy::cast_precision_loss)]
                    let elapsed = (self.frame_index - prev.frame) as f64 * dt;
                    (
                        (angles.yaw - prev.yaw) / elapsed,
                        (angles.pitch - prev.pitch) / elapsed,
                        (angles.roll - prev.roll) / elapsed,
                    )
                }
                _ => (0.0, 0.0, 0.0),
            };

            // Gravity torque about the joint, unit segment mass, decomposed
            // onto the frame axes.
            let joint_pos = self.particles[joint + 1].position;
            let child_center = Point3::from(
                (self.particles[joint + 1].position.coords
                    + self.particles[joint + 2].position.coords)
                    / 2.0,
            );
            let torque =
                (child_center - joint_pos).cross(&Vector3::new(0.0, 0.0, -self.config.gravity));

            samples.push(JointDiagnostics {
                joint,
                class,
                yaw: angles.yaw,
                pitch: angles.pitch,
                roll: angles.roll,
                yaw_rate,
                pitch_rate,
                roll_rate,
                torque_yaw: torque.dot(angles.tangent.as_ref()),
                torque_pitch: torque.dot(angles.binormal.as_ref()),
                torque_roll: torque.dot(angles.normal.as_ref()),
                frame: self.frame_index,
            });
        }

        for sample in samples {
            self.diagnostics.record(sample);
        }
    }

    /// Offset-adjusted yaw of link `link` relative to its predecessor, as
    /// measured by the relaxation constraint. `None` for the first link or
    /// degenerate geometry.
    #[must_use]
    pub fn link_yaw(&self, link: usize) -> Option<f64> {
        if link == 0 || link >= self.segments.len() {
            return None;
        }
        measured_yaw(&self.particles, link, self.segments.len())
    }

    /// Nearest particle within the pick threshold of a cursor-projected
    /// point.
    #[must_use]
    pub fn pick(&self, point: Point3<f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, particle) in self.particles.iter().enumerate() {
            let dist = (particle.position - point).norm();
            if dist > self.config.pick_threshold {
                continue;
            }
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((index, dist));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Interpolated position along the particle chain at parameter `t`
    /// (0 = head, 1 = tail).
    #[must_use]
    pub fn position_at(&self, t: f64) -> Point3<f64> {
        let n = self.particles.len();
        if n < 2 {
            return Point3::origin();
        }
        #[allow(clippy::cast_precision_loss)]
        let segment_t = t.clamp(0.0, 1.0) * (n - 1) as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment_idx = (segment_t.floor() as usize).min(n - 2);
        #[allow(clippy::cast_precision_loss)]
        let local_t = segment_t - segment_idx as f64;

        let p0 = self.particles[segment_idx].position;
        let p1 = self.particles[segment_idx + 1].position;
        p0 + (p1 - p0) * local_t
    }

    /// Tangent direction along the particle chain at parameter `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector3<f64> {
        let n = self.particles.len();
        if n < 2 {
            return -Vector3::z();
        }
        #[allow(clippy::cast_precision_loss)]
        let segment_t = t.clamp(0.0, 1.0) * (n - 1) as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment_idx = (segment_t.floor() as usize).min(n - 2);

        let dir = self.particles[segment_idx + 1].position - self.particles[segment_idx].position;
        let len = dir.norm();
        if len > DEGENERATE_EPS {
            dir / len
        } else {
            -Vector3::z()
        }
    }

    /// Axis-aligned bounds of the chain, inflated by the particle radius.
    #[must_use]
    pub fn bounding_box(&self) -> (Point3<f64>, Point3<f64>) {
        if self.particles.is_empty() {
            return (Point3::origin(), Point3::origin());
        }
        let r = self.config.particle_radius;
        let mut min = self.particles[0].position - Vector3::new(r, r, r);
        let mut max = self.particles[0].position + Vector3::new(r, r, r);
        for particle in &self.particles {
            let p = particle.position;
            min.x = min.x.min(p.x - r);
            min.y = min.y.min(p.y - r);
            min.z = min.z.min(p.z - r);
            max.x = max.x.max(p.x + r);
            max.y = max.y.max(p.y + r);
            max.z = max.z.max(p.z + r);
        }
        (min, max)
    }

    /// Export the current joint parameters and limits as a serializable
    /// snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CreatureSnapshot {
        let num_segments = self.segments.len();
        let joints = (0..self.num_joints())
            .map(|joint| {
                let class = JointClass::for_joint(joint, num_segments);
                let limits = *self.limits.class(class);
                let angles = joint_angles(
                    &self.states[joint].orientation,
                    &self.states[joint + 1].orientation,
                    &self.segments[joint].column,
                    Point3::from(self.segments[joint + 1].front_offset),
                    class.yaw_offset(),
                );
                let params = angles.map_or_else(ConnectionParams::default, |a| ConnectionParams {
                    position: limits.position.clamp(0.5),
                    yaw: a.yaw,
                    pitch: a.pitch,
                    roll: a.roll,
                });
                JointSnapshot {
                    class,
                    joint,
                    params,
                    limits,
                }
            })
            .collect();
        CreatureSnapshot { joints }
    }
}
