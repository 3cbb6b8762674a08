//! Drop a chain creature onto the floor, then walk a quadruped toward a
//! series of attractor points, printing foot plants as they happen.

use creature::prelude::*;
use nalgebra::{Point2, Point3};

fn main() {
    // --- Verlet chain: drop a dragon-style body onto the floor. ---
    let piece = |kind, length: f64| {
        BodyPieceDef::new(
            kind,
            Point3::new(0.0, 0.0, length / 2.0),
            Point3::new(0.0, 0.0, -length / 2.0),
        )
        .with_sphere(CollisionSphere::new(Point3::origin(), length * 0.4))
    };
    let pieces = PieceSet {
        head: piece(PieceKind::Head, 0.4),
        body: piece(PieceKind::Body, 0.3),
        tail: piece(PieceKind::Tail, 0.5),
    };

    let mut chain = VerletChain::new(pieces, LimitSet::default(), SimConfig::default(), 10)
        .expect("valid piece geometry");

    for _ in 0..240 {
        chain.step(&FrameInput::idle(1.0 / 60.0));
    }
    let (min, max) = chain.bounding_box();
    println!(
        "chain settled: {} segments, worst link error {:.2e}, bounds z [{:.2}, {:.2}]",
        chain.num_segments(),
        chain.stats().max_length_error,
        min.z,
        max.z,
    );

    // --- Legged rig: walk toward waypoints. ---
    let mut walker = Walker::new(WalkerParams::quadruped(), Point2::origin(), 0.0);
    let waypoints = [
        Point2::new(8.0, 0.0),
        Point2::new(8.0, 6.0),
        Point2::new(0.0, 6.0),
    ];

    let mut planted = vec![0_u64; walker.limbs().len()];
    for waypoint in waypoints {
        for _ in 0..360 {
            walker.update(1.0 / 60.0, waypoint);
            for (i, limb) in walker.limbs().iter().enumerate() {
                if limb.steps() != planted[i] {
                    planted[i] = limb.steps();
                    let foot = limb.foot();
                    println!("limb {i} planted at ({:.2}, {:.2})", foot.x, foot.y);
                }
            }
        }
    }
    let head = walker.spine().joint(0);
    println!("walker finished near ({:.2}, {:.2})", head.x, head.y);
}
