use super::chain::Chain;
use glam::{Quat, Vec3};

/// Rotations smaller than this are treated as no-ops; they carry no useful
/// correction and their axis is numerically unreliable.
const MIN_ROTATION_ANGLE: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct SolveResult {
    pub converged: bool,
    pub iterations: u32,
    pub final_distance: f32,
}

/// Cyclic Coordinate Descent solver.
///
/// Each iteration sweeps the joints from the second-to-last back to the
/// first (the end-effector has nothing distal to rotate), rotating each one
/// so the effector swings toward the target, and refreshing the downstream
/// poses before moving proximally. Partial convergence at the iteration cap
/// is an accepted terminal state, not a failure.
pub struct CcdSolver;

impl CcdSolver {
    pub fn solve(chain: &mut Chain, target: Vec3) -> SolveResult {
        let n = chain.joints.len();
        if n == 0 {
            return SolveResult {
                converged: true,
                iterations: 0,
                final_distance: 0.0,
            };
        }
        if n == 1 {
            // a lone joint has no links to rotate
            let distance = (chain.joints[0].position() - target).length();
            return SolveResult {
                converged: distance < chain.tolerance,
                iterations: 0,
                final_distance: distance,
            };
        }

        let tolerance = chain.tolerance;
        let max_iterations = chain.max_iterations;

        for iteration in 0..max_iterations {
            let end = chain.joints[n - 1].position();
            let distance = (end - target).length();
            if distance < tolerance {
                return SolveResult {
                    converged: true,
                    iterations: iteration,
                    final_distance: distance,
                };
            }

            for j in (0..n - 1).rev() {
                let joint_pos = chain.joints[j].position();
                let to_end = chain.joints[n - 1].position() - joint_pos;
                let to_target = target - joint_pos;

                // effector or target sitting on the joint: no direction to
                // rotate toward, skip
                if to_end.length_squared() < 1e-8 || to_target.length_squared() < 1e-8 {
                    continue;
                }

                let to_end = to_end.normalize();
                let to_target = to_target.normalize();

                let angle = to_end.dot(to_target).clamp(-1.0, 1.0).acos();
                if !angle.is_finite() || angle < MIN_ROTATION_ANGLE {
                    continue;
                }

                let axis = to_end.cross(to_target);
                if axis.length_squared() < 1e-8 {
                    // colinear vectors, degenerate axis
                    continue;
                }

                // Compose the correction in world space ahead of the joint's
                // current world rotation, then express it back in the parent
                // frame (the parent pose is untouched by this sweep step).
                let delta = Quat::from_axis_angle(axis.normalize(), angle);
                let parent_rot = if j == 0 {
                    chain.root.rotation
                } else {
                    chain.joints[j - 1].world.rotation
                };
                let world_rot = delta * chain.joints[j].world.rotation;
                chain.joints[j].rotation = (parent_rot.inverse() * world_rot).normalize();
                chain.update_world_poses_from(j);
            }
        }

        let final_distance = (chain.joints[n - 1].position() - target).length();
        SolveResult {
            converged: final_distance < tolerance,
            iterations: max_iterations,
            final_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CcdSolver;
    use crate::ik::Chain;
    use glam::Vec3;
    use rand::Rng;
    use rand_pcg::Pcg32;

    fn three_link_chain() -> Chain {
        Chain::builder()
            .add_joint(Vec3::ZERO)
            .add_joint(Vec3::new(0.0, 1.0, 0.0))
            .add_joint(Vec3::new(0.0, 2.0, 0.0))
            .add_joint(Vec3::new(0.0, 3.0, 0.0))
            .tolerance(0.05)
            .max_iterations(300)
            .build()
    }

    fn link_lengths_preserved(chain: &Chain) -> bool {
        let positions: Vec<Vec3> = chain.positions().collect();
        positions
            .windows(2)
            .zip(chain.link_lengths())
            .all(|(w, &len)| ((w[1] - w[0]).length() - len).abs() < 1e-3)
    }

    #[test]
    fn reachable_targets_converge() {
        let mut rng = Pcg32::new(0xcafe_f00d, 0xa02_bdbf_7bb3_c0a7);

        for _ in 0..25 {
            let mut chain = three_link_chain();
            // sample inside the reachable sphere, away from the base
            // singularity
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0f32),
                rng.gen_range(-1.0..1.0f32),
                rng.gen_range(-1.0..1.0f32),
            )
            .normalize_or_zero();
            if dir.length_squared() < 0.5 {
                continue;
            }
            let target = dir * rng.gen_range(0.8..2.8);

            let result = CcdSolver::solve(&mut chain, target);
            assert!(
                result.converged,
                "failed to reach {:?}, final distance {}",
                target, result.final_distance
            );
            assert!(result.final_distance < 0.05);
            assert!(link_lengths_preserved(&chain));
        }
    }

    #[test]
    fn unreachable_target_extends_chain_without_error() {
        let mut chain = three_link_chain();
        let target = Vec3::new(10.0, 0.0, 0.0);

        let result = CcdSolver::solve(&mut chain, target);

        assert!(!result.converged);
        assert_eq!(result.iterations, chain.max_iterations());
        // best possible distance is |target| - total length = 7
        assert!(result.final_distance < 7.0 + 0.2);
        assert!(link_lengths_preserved(&chain));
    }

    #[test]
    fn empty_chain_is_a_no_op() {
        let mut chain = Chain::builder().build();
        let result = CcdSolver::solve(&mut chain, Vec3::new(1.0, 1.0, 1.0));
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn single_joint_chain_does_not_move() {
        let mut chain = Chain::builder().add_joint(Vec3::new(1.0, 2.0, 3.0)).build();
        let before = chain.end_effector().unwrap();
        let result = CcdSolver::solve(&mut chain, Vec3::new(5.0, 5.0, 5.0));
        assert!(!result.converged);
        assert_eq!(chain.end_effector().unwrap(), before);
    }

    #[test]
    fn zero_iteration_cap_leaves_positions_untouched() {
        let mut chain = Chain::builder()
            .add_joint(Vec3::ZERO)
            .add_joint(Vec3::Y)
            .add_joint(Vec3::new(0.0, 2.0, 0.0))
            .max_iterations(0)
            .build();
        let before: Vec<Vec3> = chain.positions().collect();

        CcdSolver::solve(&mut chain, Vec3::new(1.0, 1.0, 0.0));

        let after: Vec<Vec3> = chain.positions().collect();
        for (b, a) in before.iter().zip(&after) {
            assert!((*b - *a).length() < 1e-6);
        }
    }

    #[test]
    fn target_at_joint_position_does_not_panic() {
        let mut chain = three_link_chain();
        // exactly on the second joint: degenerate axis cases must be skipped
        let target = chain.joints()[1].position();
        let result = CcdSolver::solve(&mut chain, target);
        assert!(result.final_distance.is_finite());
    }
}
