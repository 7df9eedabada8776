/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use quatview_core::{Batch, Primitive, RenderSink, Rgb, Vec3};
use std::io::Write;

use crate::camera::{clip_near, clip_to_screen, project, Camera};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const AMBIENT: f32 = 0.3;
const DIFFUSE: f32 = 0.7;

/// Lines are nudged towards the viewer so they win ties with the faces they lie on.
const LINE_DEPTH_BIAS: f32 = 1e-3;

/// Points at least this large are filled blocks (readout backdrops).
const BLOCK_POINT_SIZE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Rgb,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Rgb::BLACK,
};

/// ASCII renderer that converts meshes and overlay batches to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    view: Matrix4<f32>,
    view_projection: Matrix4<f32>,
    model: Matrix4<f32>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
            view: Matrix4::identity(),
            view_projection: Matrix4::identity(),
            model: Matrix4::identity(),
            light_dir: Vector3::new(0.5, 0.5, 1.0).normalize(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            light_dir: self.light_dir,
            ..Self::new(width, height)
        };
    }

    /// Clear the buffers and take the camera for the coming frame.
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
        self.view = camera.view_matrix();
        self.view_projection = camera.projection_matrix() * self.view;
        self.model = Matrix4::identity();
    }

    /// Character at `(x, y)`, for inspection.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    fn project(&self, v: Vec3) -> Option<(f32, f32, f32)> {
        let point = Point3::new(v.x as f32, v.y as f32, v.z as f32);
        project(
            &(self.view_projection * self.model),
            &point,
            self.width as u32,
            self.height as u32,
        )
    }

    fn to_clip(&self, v: Vec3) -> Vector4<f32> {
        let point = Point3::new(v.x as f32, v.y as f32, v.z as f32);
        self.view_projection * self.model * point.to_homogeneous()
    }

    /// Screen endpoints of the part of `a`-`b` in front of the near plane.
    fn project_segment(&self, a: Vec3, b: Vec3) -> Option<((f32, f32, f32), (f32, f32, f32))> {
        let (a, b) = clip_near(self.to_clip(a), self.to_clip(b))?;
        let (width, height) = (self.width as u32, self.height as u32);
        Some((clip_to_screen(&a, width, height)?, clip_to_screen(&b, width, height)?))
    }

    fn plot(&mut self, x: i32, y: i32, depth: Option<f32>, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        match depth {
            Some(depth) if depth >= self.depth_buffer[idx] => {}
            Some(depth) => {
                self.depth_buffer[idx] = depth;
                self.cells[idx] = cell;
            }
            None => self.cells[idx] = cell,
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, Some(depth), cell);
                    }
                }
            }
        }
    }

    fn rasterize_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32), color: Rgb, depth_test: bool) {
        let character = line_char(b.0 - a.0, b.1 - a.1);
        let Some((a, b)) = clip_segment(a, b, self.width as f32, self.height as f32) else {
            return;
        };
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + dx * t;
            let y = a.1 + dy * t;
            let depth = depth_test.then(|| a.2 + (b.2 - a.2) * t - LINE_DEPTH_BIAS);
            self.plot(x.floor() as i32, y.floor() as i32, depth, Cell { character, color });
        }
    }

    fn rasterize_point(&mut self, p: (f32, f32, f32), size: f32, color: Rgb, depth_test: bool) {
        let (character, reach) = if size >= BLOCK_POINT_SIZE {
            ('█', (size / 16.0) as i32)
        } else {
            ('o', 0)
        };
        let (cx, cy) = (p.0.floor() as i32, p.1.floor() as i32);
        let depth = depth_test.then_some(p.2 - LINE_DEPTH_BIAS);

        // Cells are about twice as tall as wide, so reach twice as far sideways.
        for y in cy - reach..=cy + reach {
            for x in cx - 2 * reach..=cx + 2 * reach {
                self.plot(x, y, depth, Cell { character, color });
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let color = to_color(cell.color);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderSink for AsciiRenderer {
    fn set_model_scale(&mut self, scale: f64) {
        self.model = Matrix4::new_scaling(scale as f32);
    }

    fn triangle(&mut self, corners: [Vec3; 3], normal: Vec3, color: Rgb) {
        let mut screen = [(0.0, 0.0, 0.0); 3];
        for (slot, corner) in screen.iter_mut().zip(corners) {
            match self.project(corner) {
                Some(p) => *slot = p,
                None => return, // Triangle is clipped
            }
        }

        // Shade with the normal in eye space so the light follows the camera
        let normal = self
            .view
            .transform_vector(&Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32));
        let brightness = AMBIENT + DIFFUSE * normal.dot(&self.light_dir).max(0.0);

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(
            &screen,
            Cell {
                character,
                color: color.shade(brightness),
            },
        );
    }

    fn batch(&mut self, batch: &Batch) {
        match batch.primitive {
            Primitive::Lines | Primitive::LineStrip => {
                for (a, b) in batch.segments() {
                    if let Some((a, b)) = self.project_segment(a, b) {
                        self.rasterize_line(a, b, batch.color, batch.depth_test);
                    }
                }
            }
            Primitive::Points => {
                for &p in &batch.points {
                    if let Some(p) = self.project(p) {
                        self.rasterize_point(p, batch.size, batch.color, batch.depth_test);
                    }
                }
            }
        }
    }
}

/// Clip a screen-space segment to `[0, width] x [0, height]` (Liang-Barsky),
/// interpolating depth along with position.
fn clip_segment(
    a: (f32, f32, f32),
    b: (f32, f32, f32),
    width: f32,
    height: f32,
) -> Option<((f32, f32, f32), (f32, f32, f32))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);

    for (p, q) in [(-dx, a.0), (dx, width - a.0), (-dy, a.1), (dy, height - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f32| (a.0 + dx * t, a.1 + dy * t, a.2 + (b.2 - a.2) * t);
    Some((at(t0), at(t1)))
}

/// Pick a stroke character for a screen-space direction (y grows downward).
fn line_char(dx: f32, dy: f32) -> char {
    // Cells are about twice as tall as wide
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ax > 2.0 * ay {
        '-'
    } else if ay > 2.0 * ax {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn to_color(rgb: Rgb) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(rgb.r),
        g: channel(rgb.g),
        b: channel(rgb.b),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quatview_core::{draw_frame, Layer, Mesh, Session};

    fn renderer() -> AsciiRenderer {
        let mut renderer = AsciiRenderer::new(80, 24);
        renderer.begin_frame(&Camera::new(80, 24));
        renderer
    }

    fn row(renderer: &AsciiRenderer, y: usize) -> String {
        (0..renderer.width()).filter_map(|x| renderer.char_at(x, y)).collect()
    }

    #[test]
    fn test_line_chars() {
        assert_eq!(line_char(10.0, 0.0), '-');
        assert_eq!(line_char(0.0, -5.0), '|');
        assert_eq!(line_char(4.0, 2.0), '\\');
        assert_eq!(line_char(4.0, -2.0), '/');
    }

    #[test]
    fn test_clip_segment() {
        let inside = clip_segment((1.0, 1.0, 0.0), (5.0, 5.0, 1.0), 10.0, 10.0);
        assert_eq!(inside, Some(((1.0, 1.0, 0.0), (5.0, 5.0, 1.0))));

        let (a, b) = clip_segment((-10.0, 5.0, 0.0), (20.0, 5.0, 3.0), 10.0, 10.0).unwrap();
        assert!(a.0.abs() < 1e-5);
        assert!((b.0 - 10.0).abs() < 1e-5);
        assert!((a.2 - 1.0).abs() < 1e-6);
        assert!((b.2 - 2.0).abs() < 1e-6);

        assert!(clip_segment((-5.0, -5.0, 0.0), (-1.0, 20.0, 0.0), 10.0, 10.0).is_none());
    }

    #[test]
    fn test_horizontal_line() {
        let mut renderer = renderer();
        let batch = Batch::new(Layer::CoordinateAxes, Primitive::Lines, Rgb::RED, 5.0)
            .with_points(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        renderer.batch(&batch);

        let centre_row = row(&renderer, 12);
        assert!(centre_row.contains("-----"));
        assert_eq!(renderer.char_at(40, 12), Some('-'));
        assert_eq!(row(&renderer, 3).trim(), "");
    }

    #[test]
    fn test_points() {
        let mut renderer = renderer();
        let batch = Batch::new(Layer::AngleArc, Primitive::Points, Rgb::YELLOW, 12.0)
            .on_top()
            .with_points(vec![Vec3::ZERO]);
        renderer.batch(&batch);
        assert_eq!(renderer.char_at(40, 12), Some('o'));
    }

    #[test]
    fn test_depth_test_and_on_top() {
        let mut renderer = renderer();
        let cube = Mesh::cube(2.0);
        quatview_core::draw_mesh(&mut renderer, &cube, Rgb::WHITE);
        let shaded = renderer.char_at(40, 12).unwrap();
        assert_ne!(shaded, ' ');

        // Behind the cube: hidden
        let hidden = Batch::new(Layer::RotationAxis, Primitive::Lines, Rgb::AMBER, 6.0)
            .with_points(vec![Vec3::new(-0.5, 0.0, -2.0), Vec3::new(0.5, 0.0, -2.0)]);
        renderer.batch(&hidden);
        assert_eq!(renderer.char_at(40, 12), Some(shaded));

        // Same line drawn on top: visible
        renderer.batch(&hidden.clone().on_top());
        assert_eq!(renderer.char_at(40, 12), Some('-'));
    }

    #[test]
    fn test_line_through_eye_is_clipped_not_dropped() {
        let mut camera = Camera::new(80, 24);
        camera.distance = 0.5;
        let mut renderer = AsciiRenderer::new(80, 24);
        renderer.begin_frame(&camera);

        // Runs from behind the eye (z = 3) to far in front of it (z = -3)
        let axis = Batch::new(Layer::RotationAxis, Primitive::Lines, Rgb::AMBER, 6.0)
            .with_points(vec![Vec3::new(0.2, 0.0, 3.0), Vec3::new(0.2, 0.0, -3.0)]);
        renderer.batch(&axis);

        let drawn = (0..24).map(|y| row(&renderer, y)).filter(|r| !r.trim().is_empty()).count();
        assert!(drawn > 0);

        // Entirely behind the eye: nothing
        let mut renderer = AsciiRenderer::new(80, 24);
        renderer.begin_frame(&camera);
        let behind = Batch::new(Layer::RotationAxis, Primitive::Lines, Rgb::AMBER, 6.0)
            .with_points(vec![Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0)]);
        renderer.batch(&behind);
        assert!((0..24).all(|y| row(&renderer, y).trim().is_empty()));
    }

    #[test]
    fn test_model_scale() {
        let mut renderer = renderer();
        renderer.set_model_scale(0.1);
        let batch = Batch::new(Layer::CoordinateAxes, Primitive::Lines, Rgb::RED, 5.0)
            .with_points(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        renderer.batch(&batch);
        let drawn = row(&renderer, 12).chars().filter(|&c| c == '-').count();
        assert!(drawn > 0 && drawn < 10);
    }

    #[test]
    fn test_draw_frame_output() {
        let mut session = Session::default();
        session.load_mesh(Mesh::cube(1.0));
        session.rotate(Vec3::Y, 45.0).unwrap();

        let mut renderer = renderer();
        draw_frame(&mut renderer, &session);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('@') || text.contains('%') || text.contains('#'));
    }
}
