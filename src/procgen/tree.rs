use crate::math::Transform;
use glam::{EulerRot, Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_4, TAU};

/// Tuning for the recursive branching generator.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: u32,
    pub trunk_length: f32,
    pub base_radius: f32,
    /// How far child branches tilt away from their parent, radians.
    pub branch_pitch: f32,
    /// Random wobble added to child bearings and pitch, radians.
    pub jitter: f32,
    pub min_children: u32,
    /// Up to this many extra children on top of `min_children`.
    pub extra_children: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 5,
            trunk_length: 2.0,
            base_radius: 0.1,
            branch_pitch: FRAC_PI_4,
            jitter: 0.2,
            min_children: 2,
            extra_children: 2,
        }
    }
}

/// One branch: a tapered cylinder of `length` extending along the local +Y
/// of `transform`.
#[derive(Debug, Clone, Copy)]
pub struct BranchSegment {
    pub transform: Transform,
    pub length: f32,
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub depth: u32,
}

impl BranchSegment {
    /// World-space tip of this branch.
    pub fn tip(&self) -> Vec3 {
        self.transform.transform_point(Vec3::Y * self.length)
    }
}

/// A generated tree: branch poses plus leaf positions at the deepest tips.
/// Geometry only — meshing is up to the consumer.
#[derive(Debug, Clone, Default)]
pub struct TreeSkeleton {
    pub segments: Vec<BranchSegment>,
    pub leaves: Vec<Vec3>,
}

impl TreeSkeleton {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }
}

/// Grow a tree skeleton rooted at the origin. The same params and seed
/// always produce the same skeleton.
pub fn generate(params: &TreeParams, seed: u64) -> TreeSkeleton {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut skeleton = TreeSkeleton::default();
    grow(&mut skeleton, &mut rng, params, Transform::IDENTITY, 0);
    skeleton
}

fn grow(out: &mut TreeSkeleton, rng: &mut Pcg32, params: &TreeParams, pose: Transform, depth: u32) {
    let length = params.trunk_length / (depth + 1) as f32;
    let radius_top = params.base_radius * (1.0 - depth as f32 / params.max_depth.max(1) as f32);
    let radius_bottom = radius_top + 0.05;

    let segment = BranchSegment {
        transform: pose,
        length,
        radius_top,
        radius_bottom,
        depth,
    };
    let tip = segment.tip();
    out.segments.push(segment);

    if depth >= params.max_depth {
        out.leaves.push(tip);
        return;
    }

    let children = params.min_children + (rng.gen::<f32>() * params.extra_children as f32) as u32;
    for i in 0..children {
        let yaw = TAU * i as f32 / children as f32 + rng.gen::<f32>() * params.jitter;
        let pitch = -params.branch_pitch + rng.gen::<f32>() * params.jitter;
        let child = pose.mul(Transform::from_position_rotation(
            Vec3::Y * length,
            Quat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0),
        ));
        grow(out, rng, params, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, TreeParams};

    #[test]
    fn same_seed_is_deterministic() {
        let params = TreeParams::default();
        let a = generate(&params, 42);
        let b = generate(&params, 42);

        assert_eq!(a.segment_count(), b.segment_count());
        for (sa, sb) in a.segments.iter().zip(&b.segments) {
            assert_eq!(sa.transform, sb.transform);
            assert_eq!(sa.length, sb.length);
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let params = TreeParams::default();
        let a = generate(&params, 1);
        let b = generate(&params, 2);

        let same = a.segment_count() == b.segment_count()
            && a.segments
                .iter()
                .zip(&b.segments)
                .all(|(sa, sb)| sa.transform == sb.transform);
        assert!(!same);
    }

    #[test]
    fn depth_is_bounded_and_leaves_cap_the_deepest_tips() {
        let params = TreeParams {
            max_depth: 3,
            ..TreeParams::default()
        };
        let tree = generate(&params, 7);

        assert!(tree.segments.iter().all(|s| s.depth <= 3));
        let deepest = tree.segments.iter().filter(|s| s.depth == 3).count();
        assert_eq!(tree.leaf_count(), deepest);
        assert!(deepest > 0);
    }

    #[test]
    fn branches_shorten_and_taper_with_depth() {
        let params = TreeParams::default();
        let tree = generate(&params, 3);

        for s in &tree.segments {
            assert!((s.length - params.trunk_length / (s.depth + 1) as f32).abs() < 1e-6);
            assert!(s.radius_bottom > s.radius_top);
        }
        let trunk = &tree.segments[0];
        assert_eq!(trunk.depth, 0);
        assert_eq!(trunk.length, params.trunk_length);
    }
}
