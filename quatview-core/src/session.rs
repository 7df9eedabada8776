/// Visualization session state
use log::{debug, info};

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::overlay::{Overlay, OverlayGenerator};
use crate::rotation::{rotate_mesh, RotationEngine, RotationParams};
use crate::scale::compute_scale;
use crate::vector::Vec3;

/// The state a view returns to on reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionDefaults {
    pub params: RotationParams,
    pub scale: f64,
}

/// Default rotation parameters and scale: 45° around +X at unit scale.
pub fn reset_session() -> SessionDefaults {
    SessionDefaults {
        params: RotationParams::default(),
        scale: 1.0,
    }
}

/// Owns the loaded mesh, its rotated copy, the current rotation parameters
/// and the scene scale.
///
/// Every field is replaced wholesale, never patched in place.
#[derive(Debug, Clone)]
pub struct Session {
    config: ViewerConfig,
    mesh: Option<Mesh>,
    rotated: Option<Mesh>,
    params: RotationParams,
    scale: f64,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        let defaults = reset_session();
        Self {
            config,
            mesh: None,
            rotated: None,
            params: defaults.params,
            scale: defaults.scale,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        &mut self.config
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn rotated_mesh(&self) -> Option<&Mesh> {
        self.rotated.as_ref()
    }

    pub fn params(&self) -> &RotationParams {
        &self.params
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Replace the mesh, drop any rotated copy and rescale the scene.
    pub fn load_mesh(&mut self, mesh: Mesh) {
        self.scale = compute_scale(&mesh);
        info!(
            "loaded mesh: {} vertices, {} faces, scale {:.4}",
            mesh.vertex_count(),
            mesh.face_count(),
            self.scale
        );
        self.mesh = Some(mesh);
        self.rotated = None;
    }

    /// Rotate the loaded mesh and remember the parameters for the overlay.
    ///
    /// A degenerate axis is refused and leaves the session untouched. Without
    /// a mesh the parameters are still recorded.
    pub fn rotate(&mut self, axis: impl Into<Vec3>, angle_degrees: f64) -> Result<Option<&Mesh>> {
        let params = RotationParams::new(axis, angle_degrees);
        let q = RotationEngine::new(self.config.rotation).quaternion(&params)?;

        self.rotated = self.mesh.as_ref().map(|mesh| rotate_mesh(mesh, &q));
        self.params = params;
        debug!("applied rotation: {}", params);
        Ok(self.rotated.as_ref())
    }

    /// Update the parameters the overlay shows without rotating anything.
    pub fn set_rotation_params(&mut self, axis: impl Into<Vec3>, angle_degrees: f64) {
        self.params = RotationParams::new(axis, angle_degrees);
    }

    /// Drop the rotated mesh and restore the default parameters.
    ///
    /// The scale returns to its default, or to the loaded mesh's scale if one
    /// is loaded.
    pub fn reset(&mut self) {
        let defaults = reset_session();
        self.rotated = None;
        self.params = defaults.params;
        self.scale = self.mesh.as_ref().map_or(defaults.scale, compute_scale);
        debug!("session reset");
    }

    pub fn overlay(&self) -> Overlay {
        OverlayGenerator::new(self.config.overlay).generate(self.mesh.as_ref(), self.scale, &self.params)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::overlay::Layer;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::default();
        assert!(session.mesh().is_none());
        assert_eq!(session.params().axis, Vec3::X);
        assert_eq!(session.params().angle_degrees, 45.0);
        assert_eq!(session.scale(), 1.0);
    }

    #[test]
    fn test_load_mesh_rescales() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(8.0));
        assert_eq!(session.scale(), 0.25);

        session.rotate(Vec3::Z, 90.0).unwrap();
        assert!(session.rotated_mesh().is_some());

        session.load_mesh(Mesh::cube(1.0));
        assert_eq!(session.scale(), 2.0);
        assert!(session.rotated_mesh().is_none());
    }

    #[test]
    fn test_rotate_records_params_without_mesh() {
        let mut session = Session::default();
        let rotated = session.rotate((0.0, 1.0, 0.0), 30.0).unwrap();
        assert!(rotated.is_none());
        assert_eq!(*session.params(), RotationParams::new(Vec3::Y, 30.0));
    }

    #[test]
    fn test_degenerate_rotation_leaves_state_untouched() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(2.0));
        session.rotate(Vec3::Y, 30.0).unwrap();
        let before = session.rotated_mesh().unwrap().vertices().to_vec();

        let err = session.rotate(Vec3::ZERO, 90.0).unwrap_err();
        assert!(matches!(err, Error::DegenerateAxis { .. }));
        assert_eq!(*session.params(), RotationParams::new(Vec3::Y, 30.0));
        assert_eq!(session.rotated_mesh().unwrap().vertices(), before.as_slice());
    }

    #[test]
    fn test_original_mesh_survives_rotation() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(2.0));
        session.rotate(Vec3::Z, 45.0).unwrap();
        assert_eq!(session.mesh().unwrap().vertices(), Mesh::cube(2.0).vertices());
    }

    #[test]
    fn test_reset() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(4.0));
        session.rotate(Vec3::Z, 120.0).unwrap();

        session.reset();
        assert!(session.rotated_mesh().is_none());
        assert_eq!(*session.params(), reset_session().params);
        assert_eq!(session.scale(), 0.5);

        let mut empty = Session::default();
        empty.set_rotation_params(Vec3::Y, 10.0);
        empty.reset();
        assert_eq!(empty.scale(), 1.0);
        assert_eq!(empty.params().angle_degrees, 45.0);
    }

    #[test]
    fn test_overlay_follows_preview_params() {
        let mut session = Session::default();
        session.set_rotation_params(Vec3::ZERO, 45.0);
        assert!(!session.overlay().has_layer(Layer::RotationAxis));

        session.set_rotation_params(Vec3::Z, 45.0);
        assert!(session.overlay().has_layer(Layer::RotationAxis));
    }

    #[test]
    fn test_non_finite_angle() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(2.0));

        session.set_rotation_params(Vec3::Z, f64::INFINITY);
        let overlay = session.overlay();
        assert!(overlay.has_layer(Layer::RotationAxis));
        assert!(!overlay.has_layer(Layer::AngleArc));

        session.set_rotation_params(Vec3::Z, 30.0);
        let err = session.rotate(Vec3::Z, f64::NAN).unwrap_err();
        assert!(matches!(err, Error::NonFiniteAngle { .. }));
        assert!(session.rotated_mesh().is_none());
        assert_eq!(session.params().angle_degrees, 30.0);
    }
}
