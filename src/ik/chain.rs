use super::joint::Joint;
use crate::math::Transform;
use glam::{Quat, Vec3};

/// An ordered kinematic chain: one root, one end-effector.
///
/// Joints are stored as a flat array; joint `i`'s parent is joint `i - 1`
/// and the root pose parents joint 0. `link_lengths[i]` is the fixed bone
/// between joints `i` and `i + 1`, so the last joint carries no link — it is
/// the end-effector.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) joints: Vec<Joint>,
    pub(crate) link_lengths: Vec<f32>,
    pub(crate) root: Transform,
    pub(crate) tolerance: f32,
    pub(crate) max_iterations: u32,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn link_lengths(&self) -> &[f32] {
        &self.link_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.link_lengths.iter().sum()
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn root(&self) -> Transform {
        self.root
    }

    /// Re-anchor the chain and refresh every world pose.
    pub fn set_root(&mut self, root: Transform) {
        self.root = root;
        self.update_world_poses();
    }

    pub fn set_root_position(&mut self, position: Vec3) {
        self.root.position = position;
        self.update_world_poses();
    }

    /// End-effector world position (the last joint), if any joints exist.
    pub fn end_effector(&self) -> Option<Vec3> {
        self.joints.last().map(|j| j.position())
    }

    pub fn base(&self) -> Option<Vec3> {
        self.joints.first().map(|j| j.position())
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.joints.iter().map(|j| j.position())
    }

    /// Set a joint's local rotation and refresh the poses it affects.
    pub fn set_joint_rotation(&mut self, index: usize, rotation: Quat) {
        if index < self.joints.len() {
            self.joints[index].rotation = rotation;
            self.update_world_poses_from(index);
        }
    }

    /// Full forward-kinematics pass from the root.
    pub fn update_world_poses(&mut self) {
        self.update_world_poses_from(0);
    }

    /// Forward kinematics from `start` onward. Poses before `start` must
    /// already be valid.
    pub(crate) fn update_world_poses_from(&mut self, start: usize) {
        for i in start..self.joints.len() {
            let (parent_pos, parent_rot, offset) = if i == 0 {
                (self.root.position, self.root.rotation, Vec3::ZERO)
            } else {
                let parent = self.joints[i - 1].world;
                let offset = parent.rotation * (Vec3::Y * self.link_lengths[i - 1]);
                (parent.position, parent.rotation, offset)
            };
            self.joints[i].world = Transform::from_position_rotation(
                parent_pos + offset,
                parent_rot * self.joints[i].rotation,
            );
        }
    }
}

pub struct ChainBuilder {
    rest_positions: Vec<Vec3>,
    tolerance: f32,
    max_iterations: u32,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            rest_positions: Vec::new(),
            tolerance: 0.01,
            max_iterations: 50,
        }
    }

    pub fn add_joint(mut self, position: Vec3) -> Self {
        self.rest_positions.push(position);
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Build the chain. Link lengths come from consecutive rest positions;
    /// initial local rotations are chosen so the FK pass reproduces the rest
    /// pose exactly.
    pub fn build(self) -> Chain {
        let link_lengths: Vec<f32> = self
            .rest_positions
            .windows(2)
            .map(|w| (w[1] - w[0]).length())
            .collect();

        let root = self
            .rest_positions
            .first()
            .copied()
            .map(Transform::from_position)
            .unwrap_or(Transform::IDENTITY);

        let mut joints = Vec::with_capacity(self.rest_positions.len());
        let mut parent_world = root.rotation;
        for w in self.rest_positions.windows(2) {
            let dir = (w[1] - w[0]).normalize_or_zero();
            let world = if dir.length_squared() < 0.0001 {
                parent_world
            } else {
                Quat::from_rotation_arc(Vec3::Y, dir)
            };
            joints.push(Joint::new(parent_world.inverse() * world));
            parent_world = world;
        }
        if !self.rest_positions.is_empty() {
            // end-effector: no link, identity local rotation
            joints.push(Joint::default());
        }

        let mut chain = Chain {
            joints,
            link_lengths,
            root,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        };
        chain.update_world_poses();
        chain
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Chain;
    use glam::Vec3;

    #[test]
    fn build_reproduces_rest_positions() {
        let rest = [
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 2.0),
        ];
        let chain = Chain::builder()
            .add_joint(rest[0])
            .add_joint(rest[1])
            .add_joint(rest[2])
            .add_joint(rest[3])
            .build();

        for (joint, expected) in chain.joints().iter().zip(rest) {
            assert!(
                (joint.position() - expected).length() < 1e-4,
                "got {:?}, want {:?}",
                joint.position(),
                expected
            );
        }
        assert!((chain.total_length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn moving_root_carries_the_chain() {
        let mut chain = Chain::builder()
            .add_joint(Vec3::ZERO)
            .add_joint(Vec3::Y)
            .add_joint(Vec3::new(0.0, 2.0, 0.0))
            .build();

        chain.set_root_position(Vec3::new(5.0, 0.0, -3.0));
        let end = chain.end_effector().unwrap();
        assert!((end - Vec3::new(5.0, 2.0, -3.0)).length() < 1e-4);
    }

    #[test]
    fn empty_chain_has_no_effector() {
        let chain = Chain::builder().build();
        assert_eq!(chain.joint_count(), 0);
        assert!(chain.end_effector().is_none());
        assert_eq!(chain.total_length(), 0.0);
    }
}
