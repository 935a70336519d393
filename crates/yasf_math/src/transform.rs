// Transform utilities for Mat4
//
// Extends glam::Mat4 with helpers used when flattening an instantiated scene.

use glam::{Mat4, Quat, Vec3};

use crate::Aabb;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }
        Aabb::enclosing(aabb.corners().iter().map(|&c| self.transform_point3(c)))
    }
}

/// Euler angles in degrees to a rotation, applied X then Y then Z on the
/// object's own axes (`Rx * Ry * Rz`).
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_rotation_x(degrees.x.to_radians())
        * Quat::from_rotation_y(degrees.y.to_radians())
        * Quat::from_rotation_z(degrees.z.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_empty_aabb_stays_empty() {
        let mat = Mat4::from_scale(Vec3::splat(2.0));
        assert!(mat.transform_aabb(&Aabb::EMPTY).is_empty());
    }

    #[test]
    fn test_euler_degrees_single_axis() {
        let q = euler_degrees_to_quat(Vec3::new(0.0, 0.0, 90.0));
        let v = q * Vec3::X;

        // X rotates onto Y around Z
        assert!((v - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_euler_degrees_matches_matrix_product() {
        let euler = Vec3::new(30.0, 45.0, 60.0);
        let expected = Mat4::from_rotation_x(30f32.to_radians())
            * Mat4::from_rotation_y(45f32.to_radians())
            * Mat4::from_rotation_z(60f32.to_radians());
        let actual = Mat4::from_quat(euler_degrees_to_quat(euler));

        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!((expected.transform_point3(p) - actual.transform_point3(p)).length() < 0.001);
    }
}
