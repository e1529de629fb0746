use glamx::{Mat4, Vec3};

use crate::camera::Camera3d;

/// A perspective camera looking at a target point.
///
/// Like most scene libraries, changing the aspect ratio or the field of view
/// does not take effect until [`PerspectiveCamera::update_projection_matrix`]
/// is called.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    fov: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    proj: Mat4,
}

impl PerspectiveCamera {
    /// Creates a camera at the origin looking down `-Z`.
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view, in degrees
    /// * `aspect` - Width over height of the viewport
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new(fov: f32, aspect: f32, znear: f32, zfar: f32) -> PerspectiveCamera {
        let mut res = PerspectiveCamera {
            fov,
            aspect,
            znear,
            zfar,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            proj: Mat4::IDENTITY,
        };
        res.update_projection_matrix();
        res
    }

    /// The vertical field of view, in degrees.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// The aspect ratio used by the next projection update.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the aspect ratio. Call [`Self::update_projection_matrix`] afterwards.
    #[inline]
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recomputes the projection matrix from the frustum parameters.
    pub fn update_projection_matrix(&mut self) {
        self.proj = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.znear, self.zfar);
    }

    /// The point the camera looks at.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The camera's up direction.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Moves the camera, keeping its target.
    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orients the camera towards `target`.
    #[inline]
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}

impl Camera3d for PerspectiveCamera {
    #[inline]
    fn eye(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    #[inline]
    fn projection(&self) -> Mat4 {
        self.proj
    }

    #[inline]
    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }
}
