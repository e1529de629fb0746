use glamx::{Mat4, Vec2, Vec3};

/// Trait that all camera implementations must implement.
///
/// Cameras control the viewpoint from which the scene is rendered. The renderer
/// only needs the eye position and the view and projection matrices.
pub trait Camera3d {
    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the view matrix, transforming world coordinates into camera space.
    fn view(&self) -> Mat4;

    /// Returns the projection matrix, transforming camera space into clip space.
    fn projection(&self) -> Mat4;

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Returns the combined projection and view transformation matrix.
    #[inline]
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Projects a 3D point in world coordinates to 2D screen coordinates.
    ///
    /// The result is in pixels, with the origin at the bottom-left corner.
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_normalized_coord = self.transformation() * world_coord.extend(1.0);
        let normalized_coord = h_normalized_coord.truncate() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 + normalized_coord.y) * size.y / 2.0,
        )
    }
}
