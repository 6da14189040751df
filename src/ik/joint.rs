use crate::math::Transform;
use glam::Quat;

/// A single joint in a kinematic chain.
///
/// `rotation` is the joint's orientation relative to its parent joint.
/// The link to the next joint extends along the joint's local +Y axis; link
/// lengths live on the chain and never change after construction.
///
/// `world` is the forward-kinematics cache, valid after the chain's last
/// `update_world_poses` call.
#[derive(Debug, Clone, Copy)]
pub struct Joint {
    pub rotation: Quat,
    pub(crate) world: Transform,
}

impl Joint {
    pub fn new(rotation: Quat) -> Self {
        Self {
            rotation,
            world: Transform::IDENTITY,
        }
    }

    /// World-space position of this joint as of the last FK pass.
    pub fn position(&self) -> glam::Vec3 {
        self.world.position
    }

    /// World-space pose of this joint as of the last FK pass.
    pub fn world_pose(&self) -> Transform {
        self.world
    }
}

impl Default for Joint {
    fn default() -> Self {
        Self::new(Quat::IDENTITY)
    }
}
