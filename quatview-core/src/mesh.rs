/// Indexed triangle meshes
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::vector::Vec3;

/// Three vertex indices, in winding order.
pub type Face = [usize; 3];

/// Added to the edge cross-product length before dividing, so degenerate
/// faces produce a zero normal instead of NaNs.
pub const NORMAL_EPSILON: f64 = 1e-8;

/// An immutable triangle mesh.
///
/// The face list is reference counted: meshes derived from this one by moving
/// vertices (see [`crate::rotation::apply_rotation`]) share the same topology.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Arc<[Face]>,
}

impl Mesh {
    /// Build a mesh, checking that every face index points at a vertex.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self> {
        let vertex_count = vertices.len();
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            vertices,
            faces: faces.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Arc::from(Vec::new()),
        }
    }

    /// Same topology, new positions. `vertices` must match the current count.
    pub(crate) fn with_vertices(&self, vertices: Vec<Vec3>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            faces: Arc::clone(&self.faces),
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when both meshes hold the very same face list allocation.
    pub fn shares_faces_with(&self, other: &Mesh) -> bool {
        Arc::ptr_eq(&self.faces, &other.faces)
    }

    /// Corner positions of each face, in face order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces
            .iter()
            .map(move |f| [self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]])
    }

    /// Axis-aligned bounding box, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.vertices.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), v| (min.min(v), max.max(v)));
        Some(Bounds { min, max })
    }

    /// Create an axis-aligned cube centred on the origin, wound outward.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let faces: Vec<Face> = vec![
            // Front
            [4, 5, 6],
            [4, 6, 7],
            // Back
            [0, 2, 1],
            [0, 3, 2],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Right
            [1, 2, 6],
            [1, 6, 5],
            // Left
            [0, 4, 7],
            [0, 7, 3],
        ];

        Self {
            vertices,
            faces: faces.into(),
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::empty()
    }
}

/// Calculate a face normal from its three corners.
pub fn face_normal(corners: &[Vec3; 3]) -> Vec3 {
    let edge1 = corners[1] - corners[0];
    let edge2 = corners[2] - corners[0];
    let normal = edge1.cross(&edge2);
    normal.scale(1.0 / (normal.length() + NORMAL_EPSILON))
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Per-axis extent, `max - min`.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f64 {
        self.size().max_component()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_index() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let err = Mesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap_err();
        assert_eq!(
            err,
            Error::FaceIndexOutOfRange {
                face: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new(Vec::new(), Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::new(
            vec![Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, -2.0, 2.5)],
            Vec::new(),
        )
        .unwrap();
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 0.0, 2.5));
        assert_eq!(bounds.size(), Vec3::new(4.0, 2.0, 0.5));
        assert_eq!(bounds.max_extent(), 4.0);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12);

        for corners in cube.triangles() {
            let centroid = (corners[0] + corners[1] + corners[2]).scale(1.0 / 3.0);
            let normal = face_normal(&corners);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            assert!(normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let normal = face_normal(&[Vec3::X, Vec3::X, Vec3::X]);
        assert_eq!(normal, Vec3::ZERO);
    }

    #[test]
    fn test_with_vertices_shares_faces() {
        let cube = Mesh::cube(1.0);
        let moved = cube.with_vertices(cube.vertices().iter().map(|v| v.scale(2.0)).collect());
        assert!(moved.shares_faces_with(&cube));
        assert_eq!(cube.vertices()[6], Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(moved.vertices()[6], Vec3::new(1.0, 1.0, 1.0));
    }
}
