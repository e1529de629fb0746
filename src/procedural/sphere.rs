use super::RenderMesh;
use glamx::Vec3;
use std::f32::consts::{PI, TAU};

/// Generates a UV sphere centered at the origin.
///
/// # Arguments
/// * `radius` - The sphere radius
/// * `width_segments` - Number of subdivisions around the Y axis (at least 3)
/// * `height_segments` - Number of subdivisions from pole to pole (at least 2)
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> RenderMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut coords = Vec::new();
    let mut normals = Vec::new();
    let mut grid = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0u32;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;

        let mut row = Vec::with_capacity(width_segments as usize + 1);

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;
            let theta = v * PI;

            let dir = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );

            coords.push(dir * radius);
            normals.push(dir.normalize_or_zero());
            row.push(index);
            index += 1;
        }

        grid.push(row);
    }

    let mut indices = Vec::new();

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 {
                indices.push([a, b, d]);
            }

            if iy != height_segments as usize - 1 {
                indices.push([b, c, d]);
            }
        }
    }

    RenderMesh::new(coords, Some(normals), Some(indices))
}

/// Generates a sphere of radius 1 with 32 by 16 subdivisions.
pub fn unit_sphere() -> RenderMesh {
    sphere(1.0, 32, 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_lie_on_the_sphere() {
        let mesh = sphere(2.0, 16, 8);
        assert_eq!(mesh.coords.len(), 17 * 9);
        for c in &mesh.coords {
            assert!((c.length() - 2.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn poles_are_single_triangles() {
        let mesh = unit_sphere();
        // Two rows of 32 pole triangles, 14 rows of 64 body triangles.
        assert_eq!(mesh.num_triangles(), 32 * 2 + 14 * 64);
    }

    #[test]
    fn faces_point_outwards() {
        let mesh = unit_sphere();
        for f in &mesh.indices {
            let [a, b, c] = f.map(|i| mesh.coords[i as usize]);
            let n = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(n.dot(center) > 0.0);
        }
    }
}
