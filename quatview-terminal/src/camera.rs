/// Orbit camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

const DEFAULT_DISTANCE: f32 = 5.0;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;
/// Degrees of orbit per unit of drag.
const DRAG_SENSITIVITY: f32 = 0.5;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// A camera orbiting the origin at `distance`, pitched then yawed (degrees).
#[derive(Debug, Clone)]
pub struct Camera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            pitch: 0.0,
            yaw: 0.0,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: Self::cell_aspect(width, height),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    fn cell_aspect(width: u32, height: u32) -> f32 {
        if height == 0 {
            return 1.0;
        }
        width as f32 / (height as f32 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::cell_aspect(width, height);
    }

    /// Orbit by a drag of `(dx, dy)`; pitch stays within ±90°.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * DRAG_SENSITIVITY;
        self.pitch = (self.pitch + dy * DRAG_SENSITIVITY).clamp(-90.0, 90.0);
    }

    /// Wheel step: positive deltas move the camera out by 10%, negative in.
    pub fn zoom(&mut self, delta: i32) {
        let factor = if delta > 0 { 1.1 } else { 0.9 };
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Back to the starting orbit. Projection mode and aspect are kept.
    pub fn reset(&mut self) {
        self.distance = DEFAULT_DISTANCE;
        self.pitch = 0.0;
        self.yaw = 0.0;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let pull_back = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.distance));
        let pitch = Matrix4::new_rotation(Vector3::new(self.pitch.to_radians(), 0.0, 0.0));
        let yaw = Matrix4::new_rotation(Vector3::new(0.0, self.yaw.to_radians(), 0.0));
        pull_back * pitch * yaw
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Project a point to screen space as `(x, y, depth)` through a precomputed
/// model-view-projection matrix.
///
/// Points behind the camera give `None`. Points off to the side are still
/// returned; clipping to the viewport is the rasterizer's job.
pub fn project(mvp: &Matrix4<f32>, point: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
    clip_to_screen(&(mvp * point.to_homogeneous()), width, height)
}

/// Trim a clip-space segment to the part in front of the near plane (`z >= -w`).
pub fn clip_near(a: Vector4<f32>, b: Vector4<f32>) -> Option<(Vector4<f32>, Vector4<f32>)> {
    let (da, db) = (a.z + a.w, b.z + b.w);
    match (da >= 0.0, db >= 0.0) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let cut = a + (b - a) * (da / (da - db));
            if a_in {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

/// Perspective divide and viewport mapping of a clip-space position.
pub fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
    // Prevent division by near-zero or negative w (behind the eye)
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(camera: &Camera, point: Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let mvp = camera.projection_matrix() * camera.view_matrix();
        project(&mvp, &point, width, height)
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 20);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(camera.distance, 5.0);
    }

    #[test]
    fn test_drag_clamps_pitch() {
        let mut camera = Camera::default();
        camera.drag(20.0, 400.0);
        assert_eq!(camera.yaw, 10.0);
        assert_eq!(camera.pitch, 90.0);
        camera.drag(0.0, -1000.0);
        assert_eq!(camera.pitch, -90.0);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = Camera::default();
        camera.zoom(1);
        assert!((camera.distance - 5.5).abs() < 1e-5);
        camera.zoom(-1);
        assert!((camera.distance - 4.95).abs() < 1e-5);

        for _ in 0..100 {
            camera.zoom(1);
        }
        assert_eq!(camera.distance, 50.0);
        for _ in 0..100 {
            camera.zoom(-1);
        }
        assert_eq!(camera.distance, 0.5);

        camera.reset();
        assert_eq!(camera.distance, 5.0);
    }

    #[test]
    fn test_origin_projects_to_centre() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(80, 20);
            camera.mode = mode;
            let (x, y, _) = screen(&camera, Point3::origin(), 80, 20).unwrap();
            assert!((x - 40.0).abs() < 1e-4);
            assert!((y - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::new(80, 20);
        let (_, y, _) = screen(&camera, Point3::new(0.0, 1.0, 0.0), 80, 20).unwrap();
        assert!(y < 10.0);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let camera = Camera::default();
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(screen(&camera, behind, 80, 24).is_none());
    }

    #[test]
    fn test_clip_near() {
        let camera = Camera::default();
        let mvp = camera.projection_matrix() * camera.view_matrix();
        let front = mvp * Point3::new(0.5, 0.0, 0.0).to_homogeneous();
        let behind = mvp * Point3::new(0.5, 0.0, 10.0).to_homogeneous();

        assert_eq!(clip_near(front, front), Some((front, front)));
        assert!(clip_near(behind, behind).is_none());

        let (kept, cut) = clip_near(front, behind).unwrap();
        assert_eq!(kept, front);
        // The cut lands on the near plane, in front of the eye
        assert!((cut.z + cut.w).abs() < 1e-4);
        assert!((cut.w - camera.near).abs() < 1e-4);
        assert!(clip_to_screen(&cut, 80, 24).is_some());

        let (cut, kept) = clip_near(behind, front).unwrap();
        assert_eq!(kept, front);
        assert!((cut.z + cut.w).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let eye_space = view.transform_point(&Point3::origin());
        assert!((eye_space.z + 5.0).abs() < 1e-6);
    }
}
