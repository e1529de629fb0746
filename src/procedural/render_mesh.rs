use super::utils;
use glamx::Vec3;

/// Geometric description of a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMesh {
    /// Coordinates of the mesh vertices.
    pub coords: Vec<Vec3>,
    /// Normals of the mesh vertices.
    pub normals: Vec<Vec3>,
    /// Index buffer of the mesh.
    pub indices: Vec<[u32; 3]>,
}

impl RenderMesh {
    /// Creates a new mesh.
    ///
    /// If no `indices` are provided, trivial, sequential indices are generated.
    /// If no `normals` are provided, smooth normals are computed from the faces.
    pub fn new(
        coords: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        indices: Option<Vec<[u32; 3]>>,
    ) -> RenderMesh {
        let indices = indices.unwrap_or_else(|| {
            (0..coords.len() as u32 / 3)
                .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
                .collect()
        });

        let normals = match normals {
            Some(normals) if normals.len() == coords.len() => normals,
            _ => {
                let mut normals = Vec::new();
                utils::compute_normals(&coords, &indices, &mut normals);
                normals
            }
        };

        RenderMesh {
            coords,
            normals,
            indices,
        }
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RenderMesh {
        RenderMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, None)
    }

    #[test]
    fn sequential_indices_and_computed_normals() {
        let mesh = triangle();
        assert_eq!(mesh.indices, vec![[0, 1, 2]]);
        assert_eq!(mesh.normals.len(), 3);
        assert!((mesh.normals[0] - Vec3::Z).length() < 1.0e-6);
        assert_eq!(mesh.num_triangles(), 1);
    }
}
