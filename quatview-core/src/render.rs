/// Render sink interface and per-frame draw ordering
use crate::mesh::{face_normal, Mesh};
use crate::overlay::{Batch, Rgb};
use crate::session::Session;
use crate::vector::Vec3;

pub const ORIGINAL_MESH_COLOR: Rgb = Rgb::new(0.8, 0.8, 0.9);
pub const ROTATED_MESH_COLOR: Rgb = Rgb::new(1.0, 0.3, 0.8);

/// Something that turns primitives into pixels (or characters).
///
/// Implementors own the graphics context; the core only describes what to draw.
pub trait RenderSink {
    /// Uniform model scale applied to everything drawn this frame.
    fn set_model_scale(&mut self, scale: f64);

    /// One mesh triangle with its face normal.
    fn triangle(&mut self, corners: [Vec3; 3], normal: Vec3, color: Rgb);

    /// One overlay batch of lines, strips or points.
    fn batch(&mut self, batch: &Batch);
}

/// Send every face of `mesh` to `sink` with a computed face normal.
pub fn draw_mesh<S: RenderSink + ?Sized>(sink: &mut S, mesh: &Mesh, color: Rgb) {
    for corners in mesh.triangles() {
        let normal = face_normal(&corners);
        sink.triangle(corners, normal, color);
    }
}

/// Draw one frame of `session`: axes and rotation axis first, then the
/// original and rotated meshes, then the angle annotations on top.
pub fn draw_frame<S: RenderSink + ?Sized>(sink: &mut S, session: &Session) {
    let overlay = session.overlay();
    let visibility = session.config().visibility;

    sink.set_model_scale(session.scale());

    for batch in overlay.batches.iter().filter(|b| !b.layer.is_annotation()) {
        sink.batch(batch);
    }

    if let (Some(mesh), true) = (session.mesh(), visibility.show_original) {
        draw_mesh(&mut *sink, mesh, ORIGINAL_MESH_COLOR);
    }
    if let (Some(mesh), true) = (session.rotated_mesh(), visibility.show_rotated) {
        draw_mesh(&mut *sink, mesh, ROTATED_MESH_COLOR);
    }

    for batch in overlay.batches.iter().filter(|b| b.layer.is_annotation()) {
        sink.batch(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Layer;

    #[derive(Debug, PartialEq)]
    enum Call {
        Scale(f64),
        Triangle(Rgb),
        Batch(Layer),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl RenderSink for Recorder {
        fn set_model_scale(&mut self, scale: f64) {
            self.calls.push(Call::Scale(scale));
        }

        fn triangle(&mut self, _corners: [Vec3; 3], normal: Vec3, color: Rgb) {
            assert!((normal.length() - 1.0).abs() < 1e-6);
            self.calls.push(Call::Triangle(color));
        }

        fn batch(&mut self, batch: &Batch) {
            self.calls.push(Call::Batch(batch.layer));
        }
    }

    #[test]
    fn test_frame_order() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(1.0));
        session.rotate(Vec3::Z, 30.0).unwrap();

        let mut recorder = Recorder::default();
        draw_frame(&mut recorder, &session);
        let calls = &recorder.calls;

        assert_eq!(calls[0], Call::Scale(2.0));
        let first_triangle = calls.iter().position(|c| matches!(c, Call::Triangle(_))).unwrap();
        let last_triangle = calls.iter().rposition(|c| matches!(c, Call::Triangle(_))).unwrap();

        assert!(calls[1..first_triangle]
            .iter()
            .all(|c| matches!(c, Call::Batch(l) if !l.is_annotation())));
        assert!(calls[last_triangle + 1..]
            .iter()
            .all(|c| matches!(c, Call::Batch(l) if l.is_annotation())));

        let original = calls.iter().filter(|c| **c == Call::Triangle(ORIGINAL_MESH_COLOR)).count();
        let rotated = calls.iter().filter(|c| **c == Call::Triangle(ROTATED_MESH_COLOR)).count();
        assert_eq!((original, rotated), (12, 12));
    }

    #[test]
    fn test_hidden_meshes_are_skipped() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(1.0));
        session.rotate(Vec3::Z, 30.0).unwrap();
        session.config_mut().visibility.show_original = false;

        let mut recorder = Recorder::default();
        draw_frame(&mut recorder, &session);
        assert!(!recorder.calls.contains(&Call::Triangle(ORIGINAL_MESH_COLOR)));
        assert!(recorder.calls.contains(&Call::Triangle(ROTATED_MESH_COLOR)));
    }
}
