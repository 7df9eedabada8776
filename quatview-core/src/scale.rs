/// Automatic scene scaling
use crate::mesh::Mesh;

/// Side of the cube a loaded mesh is scaled to fit.
pub const CANONICAL_EXTENT: f64 = 2.0;

/// Uniform scale factor that fits `mesh` into a cube of side [`CANONICAL_EXTENT`].
///
/// Empty and zero-extent meshes get `1.0`.
pub fn compute_scale(mesh: &Mesh) -> f64 {
    let max_extent = match mesh.bounds() {
        Some(bounds) => bounds.max_extent(),
        None => return 1.0,
    };

    if max_extent > 0.0 {
        CANONICAL_EXTENT / max_extent
    } else {
        1.0
    }
}

/// Largest bounding-box extent after scaling, or `None` without a mesh.
pub(crate) fn scaled_extent(mesh: Option<&Mesh>, scale: f64) -> Option<f64> {
    mesh.and_then(Mesh::bounds)
        .map(|bounds| bounds.max_extent() * scale)
}
