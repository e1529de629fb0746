//! Utilities useful for various generations tasks.

use glamx::Vec3;

/// Pushes the two triangles of the quad `(a, b, c, d)` to a buffer.
///
/// The quad corners are given counterclockwise.
#[inline]
pub fn push_quad_indices(a: u32, b: u32, c: u32, d: u32, out: &mut Vec<[u32; 3]>) {
    out.push([a, b, d]);
    out.push([b, c, d]);
}

/// Pushes the indices of a `(rows + 1) x (columns + 1)` vertex grid, laid out
/// row by row, as triangles.
pub fn push_grid_indices(rows: u32, columns: u32, out: &mut Vec<[u32; 3]>) {
    let stride = columns + 1;

    for row in 1..=rows {
        for col in 1..=columns {
            let a = stride * (row - 1) + (col - 1);
            let b = stride * row + (col - 1);
            let c = stride * row + col;
            let d = stride * (row - 1) + col;

            push_quad_indices(a, b, c, d, out);
        }
    }
}

/// Computes the normals of a set of vertices.
///
/// Each vertex normal is the normalized mean of the normals of the faces it
/// belongs to. Vertices not referenced by any face get a zero normal.
#[inline]
pub fn compute_normals(coordinates: &[Vec3], faces: &[[u32; 3]], normals: &mut Vec<Vec3>) {
    normals.clear();
    normals.resize(coordinates.len(), Vec3::ZERO);

    for f in faces.iter() {
        let edge1 = coordinates[f[1] as usize] - coordinates[f[0] as usize];
        let edge2 = coordinates[f[2] as usize] - coordinates[f[0] as usize];
        let normal = edge1.cross(edge2).normalize_or_zero();

        normals[f[0] as usize] += normal;
        normals[f[1] as usize] += normal;
        normals[f[2] as usize] += normal;
    }

    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_quad_normals_point_up() {
        let coords = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let mut faces = Vec::new();
        push_quad_indices(0, 1, 2, 3, &mut faces);

        let mut normals = Vec::new();
        compute_normals(&coords, &faces, &mut normals);

        assert_eq!(normals.len(), 4);
        for n in normals {
            assert!((n - Vec3::Y).length() < 1.0e-6);
        }
    }

    #[test]
    fn grid_has_two_triangles_per_cell() {
        let mut faces = Vec::new();
        push_grid_indices(3, 4, &mut faces);
        assert_eq!(faces.len(), 3 * 4 * 2);
        assert!(faces.iter().flatten().all(|&i| i < 4 * 5));
    }
}
