/// Axis-angle rotation of whole meshes
use std::fmt;

use log::{debug, warn};

use crate::config::RotationConfig;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::quaternion::Quaternion;
use crate::vector::Vec3;

/// A rotation request: an axis (any length) and an angle in degrees.
///
/// Positive angles turn counter-clockwise when looking down the axis
/// towards the origin (right-hand rule).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationParams {
    pub axis: Vec3,
    pub angle_degrees: f64,
}

impl RotationParams {
    pub fn new(axis: impl Into<Vec3>, angle_degrees: f64) -> Self {
        Self {
            axis: axis.into(),
            angle_degrees,
        }
    }
}

impl fmt::Display for RotationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}° around {:.2}", self.angle_degrees, self.axis)
    }
}

impl Default for RotationParams {
    fn default() -> Self {
        Self::new(Vec3::X, 45.0)
    }
}

/// Builds rotation quaternions and maps them over mesh vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationEngine {
    config: RotationConfig,
}

impl RotationEngine {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// Unit quaternion for `params`, or `DegenerateAxis` when the axis is
    /// shorter than the configured tolerance.
    ///
    /// Angles outside `[-360, 360]` are accepted; rotation is periodic.
    /// Infinite and NaN angles are refused.
    pub fn quaternion(&self, params: &RotationParams) -> Result<Quaternion> {
        if !params.angle_degrees.is_finite() {
            warn!("refusing rotation by non-finite angle {}", params.angle_degrees);
            return Err(Error::NonFiniteAngle {
                angle: params.angle_degrees,
            });
        }

        let magnitude = params.axis.length();
        if magnitude < self.config.axis_tolerance {
            warn!("refusing rotation around near-zero axis {}", params.axis);
            return Err(Error::DegenerateAxis { magnitude });
        }

        let axis = params.axis.normalize();
        Ok(Quaternion::from_axis_angle(
            axis,
            params.angle_degrees.to_radians(),
        ))
    }

    /// Rotate every vertex of `mesh` about the origin.
    ///
    /// The result has the same vertex order and shares `mesh`'s face list;
    /// `mesh` itself is left untouched.
    pub fn apply(&self, mesh: &Mesh, params: &RotationParams) -> Result<Mesh> {
        let q = self.quaternion(params)?;
        debug!("rotating {} vertices by {} (q = {})", mesh.vertex_count(), params, q);
        Ok(rotate_mesh(mesh, &q))
    }
}

/// Map `q.rotate` over every vertex, keeping order and sharing the faces.
pub fn rotate_mesh(mesh: &Mesh, q: &Quaternion) -> Mesh {
    let vertices = mesh.vertices().iter().map(|&v| q.rotate(v)).collect();
    mesh.with_vertices(vertices)
}

/// Rotate `mesh` by `angle_degrees` around `axis` with the default tolerance.
pub fn apply_rotation(mesh: &Mesh, axis: impl Into<Vec3>, angle_degrees: f64) -> Result<Mesh> {
    RotationEngine::default().apply(mesh, &RotationParams::new(axis, angle_degrees))
}
