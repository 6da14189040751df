use glam::{Mat4, Quat, Vec3};

/// Rigid pose: a rotation followed by a translation. No scale — nothing in
/// a kinematic chain scales, which keeps composition and inversion exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Compose with a child pose expressed in this pose's frame.
    /// `a.mul(b).transform_point(p) == a.transform_point(b.transform_point(p))`.
    pub fn mul(&self, child: Self) -> Self {
        Self {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
        }
    }

    pub fn inverse(&self) -> Self {
        let inv_rot = self.rotation.inverse();
        Self {
            position: inv_rot * -self.position,
            rotation: inv_rot,
        }
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use glam::{Quat, Vec3};

    #[test]
    fn composition_matches_nested_point_transform() {
        let a = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
        );
        let b = Transform::from_position_rotation(
            Vec3::new(-0.5, 0.0, 2.0),
            Quat::from_rotation_x(-0.3),
        );
        let p = Vec3::new(0.2, 1.1, -0.4);

        let composed = a.mul(b).transform_point(p);
        let nested = a.transform_point(b.transform_point(p));
        assert!((composed - nested).length() < 1e-5);
    }

    #[test]
    fn inverse_undoes_transform() {
        let t = Transform::from_position_rotation(
            Vec3::new(4.0, -1.0, 0.5),
            Quat::from_rotation_z(1.2),
        );
        let p = Vec3::new(3.0, 3.0, 3.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }
}
