use std::f32::consts::{PI, TAU};

use glamx::{Vec2, Vec3};

use crate::camera::{Camera3d, PerspectiveCamera};
use crate::event::{Action, MouseButton, WindowEvent};
use crate::viewport::Viewport;

const EPS: f32 = 0.000001;

/// Damped orbit controls for a [`PerspectiveCamera`].
///
/// The camera orbits around a target point, expressed in spherical coordinates
/// relative to it. User input accumulates rotation, pan and zoom deltas which
/// are applied by [`OrbitControls::update`], once per frame. With damping
/// enabled only a fraction of the pending deltas is applied each frame, giving
/// the motion some inertia.
///
/// # Default Controls
/// - **Left mouse + drag**: orbit around the target
/// - **Right mouse + drag**: pan the target in the view plane
/// - **Mouse wheel**: dolly in and out
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
    min_distance: f32,
    max_distance: f32,
    min_polar_angle: f32,
    max_polar_angle: f32,

    // Pending deltas.
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,

    rotate_button: Option<MouseButton>,
    drag_button: Option<MouseButton>,
    rotating: bool,
    panning: bool,
    last_cursor_pos: Option<Vec2>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        OrbitControls::new(Vec3::ZERO)
    }
}

impl OrbitControls {
    /// Creates controls orbiting around `target`, with damping disabled.
    pub fn new(target: Vec3) -> OrbitControls {
        OrbitControls {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            rotate_button: Some(MouseButton::Button1),
            drag_button: Some(MouseButton::Button2),
            rotating: false,
            panning: false,
            last_cursor_pos: None,
        }
    }

    /// The point the camera orbits around.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Sets the point the camera orbits around.
    #[inline]
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Whether damping is enabled.
    #[inline]
    pub fn damping_enabled(&self) -> bool {
        self.enable_damping
    }

    /// Enables or disables damping.
    #[inline]
    pub fn set_damping_enabled(&mut self, enabled: bool) {
        self.enable_damping = enabled;
    }

    /// The fraction of the pending motion applied per update when damping.
    #[inline]
    pub fn damping_factor(&self) -> f32 {
        self.damping_factor
    }

    /// Sets the damping factor.
    #[inline]
    pub fn set_damping_factor(&mut self, factor: f32) {
        self.damping_factor = factor;
    }

    /// Limits the distance between the camera and its target.
    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min;
        self.max_distance = max;
    }

    /// Sets the button used to orbit. `None` disables orbiting.
    pub fn rebind_rotate_button(&mut self, new_button: Option<MouseButton>) {
        self.rotate_button = new_button;
    }

    /// Sets the button used to pan. `None` disables panning.
    pub fn rebind_drag_button(&mut self, new_button: Option<MouseButton>) {
        self.drag_button = new_button;
    }

    /// Whether rotation, pan or zoom motion remains to be applied.
    pub fn is_moving(&self) -> bool {
        self.theta_delta.abs() > EPS
            || self.phi_delta.abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
            || (self.scale - 1.0).abs() > EPS
    }

    /// Accumulates the motion requested by one input event.
    pub fn handle_event(
        &mut self,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        event: &WindowEvent,
    ) {
        match *event {
            WindowEvent::MouseButton(button, action) => {
                let pressed = action == Action::Press;

                if Some(button) == self.rotate_button {
                    self.rotating = pressed;
                }

                if Some(button) == self.drag_button {
                    self.panning = pressed;
                }
            }
            WindowEvent::CursorPos(x, y) => {
                let curr_pos = Vec2::new(x as f32, y as f32);

                if let Some(last) = self.last_cursor_pos {
                    let dpos = curr_pos - last;
                    let height = viewport.height().max(1) as f32;

                    if self.rotating {
                        self.handle_rotation(dpos, height);
                    }

                    if self.panning {
                        self.handle_pan(camera, dpos, height);
                    }
                }

                self.last_cursor_pos = Some(curr_pos);
            }
            WindowEvent::Scroll(_, off) => self.handle_scroll(off as f32),
            _ => {}
        }
    }

    fn handle_rotation(&mut self, dpos: Vec2, height: f32) {
        self.theta_delta -= TAU * dpos.x / height * self.rotate_speed;
        self.phi_delta -= TAU * dpos.y / height * self.rotate_speed;
    }

    fn handle_pan(&mut self, camera: &PerspectiveCamera, dpos: Vec2, height: f32) {
        let offset = camera.eye() - self.target;
        // Half of the visible height at the target's depth.
        let target_distance = offset.length() * (camera.fov().to_radians() / 2.0).tan();

        let forward = -offset.normalize_or_zero();
        let right = forward.cross(camera.up()).normalize_or_zero();
        let up = right.cross(forward);

        let dx = 2.0 * dpos.x * target_distance / height * self.pan_speed;
        let dy = 2.0 * dpos.y * target_distance / height * self.pan_speed;

        self.pan_offset += -right * dx + up * dy;
    }

    fn handle_scroll(&mut self, off: f32) {
        let zoom_scale = 0.95f32.powf(self.zoom_speed);

        if off > 0.0 {
            self.scale *= zoom_scale;
        } else if off < 0.0 {
            self.scale /= zoom_scale;
        }
    }

    /// Applies the pending motion to `camera`.
    ///
    /// Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.eye() - self.target;

        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius == 0.0 {
            0.0
        } else {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        };

        if self.enable_damping {
            theta += self.theta_delta * self.damping_factor;
            phi += self.phi_delta * self.damping_factor;
        } else {
            theta += self.theta_delta;
            phi += self.phi_delta;
        }

        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        let sin_phi_radius = phi.sin() * radius;
        let new_offset = Vec3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );

        let old_eye = camera.eye();
        camera.set_position(self.target + new_offset);
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }

        self.scale = 1.0;

        (camera.eye() - old_eye).length_squared() > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PerspectiveCamera, OrbitControls, Viewport) {
        let mut camera = PerspectiveCamera::new(25.0, 1.0, 0.1, 100.0);
        camera.set_position(Vec3::splat(7.0));
        camera.look_at(Vec3::ZERO);
        (camera, OrbitControls::new(Vec3::ZERO), Viewport::new(800, 600, 1.0))
    }

    fn drag(
        controls: &mut OrbitControls,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        button: MouseButton,
        from: (f64, f64),
        to: (f64, f64),
    ) {
        controls.handle_event(camera, viewport, &WindowEvent::CursorPos(from.0, from.1));
        controls.handle_event(camera, viewport, &WindowEvent::MouseButton(button, Action::Press));
        controls.handle_event(camera, viewport, &WindowEvent::CursorPos(to.0, to.1));
        controls.handle_event(camera, viewport, &WindowEvent::MouseButton(button, Action::Release));
    }

    #[test]
    fn update_without_input_keeps_the_camera_still() {
        let (mut camera, mut controls, _) = setup();
        controls.set_damping_enabled(true);
        assert!(!controls.update(&mut camera));
        assert!((camera.eye() - Vec3::splat(7.0)).length() < 1.0e-4);
    }

    #[test]
    fn orbiting_preserves_the_distance_to_the_target() {
        let (mut camera, mut controls, viewport) = setup();
        let distance = camera.eye().length();

        drag(&mut controls, &camera, &viewport, MouseButton::Button1, (100.0, 100.0), (160.0, 130.0));
        assert!(controls.update(&mut camera));

        assert!((camera.eye().length() - distance).abs() < 1.0e-4);
        assert!((camera.eye() - Vec3::splat(7.0)).length() > 0.1);
        assert_eq!(camera.target(), Vec3::ZERO);
    }

    #[test]
    fn damping_spreads_the_motion_over_several_frames() {
        let (mut damped_camera, mut damped, viewport) = setup();
        let (mut camera, mut controls, _) = setup();
        damped.set_damping_enabled(true);

        drag(&mut damped, &damped_camera, &viewport, MouseButton::Button1, (0.0, 0.0), (50.0, 0.0));
        drag(&mut controls, &camera, &viewport, MouseButton::Button1, (0.0, 0.0), (50.0, 0.0));

        controls.update(&mut camera);
        damped.update(&mut damped_camera);

        let full = (camera.eye() - Vec3::splat(7.0)).length();
        let first_step = (damped_camera.eye() - Vec3::splat(7.0)).length();
        assert!(first_step < full * 0.1);
        assert!(damped.is_moving());
        assert!(!controls.is_moving());

        // The remaining motion decays geometrically.
        for _ in 0..400 {
            damped.update(&mut damped_camera);
        }
        assert!(!damped.is_moving());
        assert!((damped_camera.eye() - camera.eye()).length() < 1.0e-2);
    }

    #[test]
    fn scrolling_up_dollies_in() {
        let (mut camera, mut controls, viewport) = setup();
        let distance = camera.eye().length();

        controls.handle_event(&camera, &viewport, &WindowEvent::Scroll(0.0, 1.0));
        controls.update(&mut camera);
        assert!((camera.eye().length() - distance * 0.95).abs() < 1.0e-4);

        controls.handle_event(&camera, &viewport, &WindowEvent::Scroll(0.0, -1.0));
        controls.update(&mut camera);
        assert!((camera.eye().length() - distance).abs() < 1.0e-4);
    }

    #[test]
    fn panning_moves_the_target() {
        let (mut camera, mut controls, viewport) = setup();

        drag(&mut controls, &camera, &viewport, MouseButton::Button2, (100.0, 100.0), (200.0, 100.0));
        controls.update(&mut camera);

        assert!(controls.target().length() > 0.1);
        assert_eq!(camera.target(), controls.target());
        assert!(((camera.eye() - camera.target()) - Vec3::splat(7.0)).length() < 1.0e-3);
    }

    #[test]
    fn polar_angle_never_reaches_the_poles() {
        let (mut camera, mut controls, viewport) = setup();

        drag(&mut controls, &camera, &viewport, MouseButton::Button1, (0.0, 0.0), (0.0, 5000.0));
        controls.update(&mut camera);

        let offset = camera.eye() - camera.target();
        assert!(offset.is_finite());
        assert!(offset.y > 0.0);
        assert!(offset.x.abs() + offset.z.abs() > 0.0);
        assert!(camera.view().is_finite());
    }

    #[test]
    fn motion_without_a_pressed_button_is_ignored() {
        let (mut camera, mut controls, viewport) = setup();
        controls.handle_event(&camera, &viewport, &WindowEvent::CursorPos(0.0, 0.0));
        controls.handle_event(&camera, &viewport, &WindowEvent::CursorPos(300.0, 300.0));
        assert!(!controls.update(&mut camera));
    }
}
