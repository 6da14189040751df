//! Math utilities module
//!
//! Provides the rigid transform used by forward kinematics, plus convenient
//! re-exports from glam.

mod transform;

pub use transform::Transform;

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec2, Vec3};
