use super::{utils, RenderMesh};
use glamx::Vec3;
use std::f32::consts::TAU;

/// Parameters of a `(p, q)` torus knot tube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusKnot {
    /// Radius of the knot curve.
    pub radius: f32,
    /// Radius of the tube around the curve.
    pub tube: f32,
    /// Number of subdivisions along the curve.
    pub tubular_segments: u32,
    /// Number of subdivisions around the tube.
    pub radial_segments: u32,
    /// How many times the curve winds around the torus axis of symmetry.
    pub p: u32,
    /// How many times the curve winds around the torus interior circle.
    pub q: u32,
}

impl Default for TorusKnot {
    fn default() -> Self {
        TorusKnot {
            radius: 1.0,
            tube: 0.4,
            tubular_segments: 64,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }
}

impl TorusKnot {
    /// Point of the knot curve at parameter `u`.
    pub fn curve_point(&self, u: f32) -> Vec3 {
        let p = self.p as f32;
        let q = self.q as f32;
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();

        Vec3::new(
            self.radius * (2.0 + cs) * 0.5 * u.cos(),
            self.radius * (2.0 + cs) * 0.5 * u.sin(),
            self.radius * qu_over_p.sin() * 0.5,
        )
    }

    /// Generates the tube mesh.
    pub fn mesh(&self) -> RenderMesh {
        let tubular = self.tubular_segments.max(3);
        let radial = self.radial_segments.max(3);

        let mut coords = Vec::new();
        let mut normals = Vec::new();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * self.p as f32 * TAU;

            // Frame of the curve, from a small finite difference.
            let p1 = self.curve_point(u);
            let p2 = self.curve_point(u + 0.01);
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n);
            let n = b.cross(t).normalize_or_zero();
            let b = b.normalize_or_zero();

            for j in 0..=radial {
                let v = j as f32 / radial as f32 * TAU;
                let cx = -self.tube * v.cos();
                let cy = self.tube * v.sin();

                let vertex = p1 + n * cx + b * cy;

                coords.push(vertex);
                normals.push((vertex - p1).normalize_or_zero());
            }
        }

        let mut indices = Vec::new();
        utils::push_grid_indices(tubular, radial, &mut indices);

        RenderMesh::new(coords, Some(normals), Some(indices))
    }
}

/// Generates a `(p, q)` torus knot tube.
///
/// # Arguments
/// * `radius` - Radius of the knot curve
/// * `tube` - Radius of the tube
/// * `tubular_segments` - Subdivisions along the curve
/// * `radial_segments` - Subdivisions around the tube
/// * `p` - Windings around the axis of rotational symmetry
/// * `q` - Windings around the interior circle of the torus
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> RenderMesh {
    TorusKnot {
        radius,
        tube,
        tubular_segments,
        radial_segments,
        p,
        q,
    }
    .mesh()
}
