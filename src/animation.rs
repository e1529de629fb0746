//! Spin laws of the scene entities.
//!
//! Rotations are a pure function of the absolute elapsed time, not accumulated
//! per frame, so the animation is independent of the frame rate.

use web_time::Instant;

use crate::scene::SceneNode3d;

/// A rotation axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

/// Rotation of an entity, as angular rates (radians per second) around some axes.
///
/// Axes not named by the law keep whatever rotation they already have.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin(pub &'static [(Axis, f32)]);

/// Spin of the sphere.
pub const SPHERE_SPIN: Spin = Spin(&[(Axis::X, -0.1), (Axis::Y, 0.2)]);
/// Spin of the torus knot.
pub const TORUS_KNOT_SPIN: Spin = Spin(&[(Axis::X, -0.1), (Axis::Y, 0.2)]);
/// Spin of the loaded model.
pub const MODEL_SPIN: Spin = Spin(&[(Axis::Z, -0.1), (Axis::X, 0.01)]);

impl Spin {
    /// Sets the rotation of `node` at `elapsed` seconds.
    pub fn apply(&self, node: &mut SceneNode3d, elapsed: f32) {
        let mut rotation = node.rotation();

        for &(axis, rate) in self.0 {
            let angle = rate * elapsed;

            match axis {
                Axis::X => rotation.x = angle,
                Axis::Y => rotation.y = angle,
                Axis::Z => rotation.z = angle,
            }
        }

        node.set_rotation(rotation);
    }
}

/// Measures the time elapsed since its creation.
#[derive(Debug, Copy, Clone)]
pub struct Clock {
    start: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}

impl Clock {
    /// Starts a new clock.
    pub fn new() -> Clock {
        Clock {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock started.
    pub fn elapsed_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}
