//! Local transforms of scene nodes.

use glamx::{Mat3, Mat4, Quat, Vec3};

/// Euler angles, in radians, applied in `X`, then `Y`, then `Z` intrinsic order.
///
/// The rotation matrix is `Rx * Ry * Rz`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Euler {
    /// Rotation around the X axis.
    pub x: f32,
    /// Rotation around the Y axis.
    pub y: f32,
    /// Rotation around the Z axis.
    pub z: f32,
}

impl Euler {
    /// Creates the angles.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Euler { x, y, z }
    }

    /// The equivalent quaternion.
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_x(self.x) * Quat::from_rotation_y(self.y) * Quat::from_rotation_z(self.z)
    }

    /// Decomposes a rotation into `XYZ` angles.
    pub fn from_quat(q: Quat) -> Self {
        let m = Mat3::from_quat(q.normalize());
        // Row/column naming: mRC is row R, column C.
        let m11 = m.x_axis.x;
        let m12 = m.y_axis.x;
        let m13 = m.z_axis.x;
        let m22 = m.y_axis.y;
        let m23 = m.z_axis.y;
        let m32 = m.y_axis.z;
        let m33 = m.z_axis.z;

        let y = m13.clamp(-1.0, 1.0).asin();

        if m13.abs() < 0.9999999 {
            Euler::new((-m23).atan2(m33), y, (-m12).atan2(m11))
        } else {
            Euler::new(m32.atan2(m22), y, 0.0)
        }
    }
}

/// Position, rotation and scale of a node relative to its parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Rotation.
    pub rotation: Euler,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vec3::ZERO,
            rotation: Euler::default(),
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// The transform matrix: translation, then rotation, then scale applied to points.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.to_quat(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1.0e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn rotation_order_is_xyz() {
        // Rz first, then Ry, then Rx, when applied to a point.
        let e = Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0);
        let p = e.to_quat() * Vec3::X;
        // Ry(90°) maps X to -Z, then Rx(90°) maps -Z to Y.
        assert_close(p, Vec3::Y);
    }

    #[test]
    fn quaternion_decomposition_recovers_angles() {
        let e = Euler::new(0.3, -0.7, 1.1);
        let back = Euler::from_quat(e.to_quat());
        assert!((back.x - e.x).abs() < 1.0e-5);
        assert!((back.y - e.y).abs() < 1.0e-5);
        assert!((back.z - e.z).abs() < 1.0e-5);
    }

    #[test]
    fn transform_matrix_scales_then_rotates_then_translates() {
        let t = Transform {
            position: Vec3::new(3.0, 0.0, 0.0),
            rotation: Euler::new(0.0, 0.0, FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let p = t.to_mat4().transform_point3(Vec3::X);
        assert_close(p, Vec3::new(3.0, 2.0, 0.0));
    }
}
