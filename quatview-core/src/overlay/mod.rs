/// Orientation overlay geometry
///
/// Everything here is a pure function of the mesh bounds, the scene scale and
/// the current rotation parameters. The output is a list of primitive batches
/// for a render sink to draw; no graphics state is touched.

mod arc;
mod arrow;
mod axes;
pub mod digits;

use crate::config::OverlayConfig;
use crate::mesh::Mesh;
use crate::rotation::RotationParams;
use crate::scale::scaled_extent;
use crate::vector::Vec3;

pub use arrow::perpendicular_basis;

/// Linear RGB colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);
    pub const AMBER: Rgb = Rgb::new(1.0, 0.8, 0.0);
    pub const DARK_GREY: Rgb = Rgb::new(0.2, 0.2, 0.2);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Scale each channel by `k`, clamped to `[0, 1]`.
    pub fn shade(&self, k: f32) -> Rgb {
        let k = k.clamp(0.0, 1.0);
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }
}

/// How the points of a batch are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Independent segments, one per pair of points.
    Lines,
    /// One connected polyline through all points.
    LineStrip,
    Points,
}

/// Which part of the overlay a batch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    CoordinateAxes,
    AxisLabels,
    RotationAxis,
    AngleArc,
    AngleReadout,
}

impl Layer {
    /// Angle annotations go on top of the meshes; everything else is drawn first.
    pub fn is_annotation(&self) -> bool {
        matches!(self, Layer::AngleArc | Layer::AngleReadout)
    }
}

/// A run of points sharing one colour and primitive type.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub layer: Layer,
    pub primitive: Primitive,
    pub color: Rgb,
    /// Line width or point size, in pixels.
    pub size: f32,
    /// Whether the batch is occluded by geometry in front of it.
    pub depth_test: bool,
    pub points: Vec<Vec3>,
}

impl Batch {
    pub fn new(layer: Layer, primitive: Primitive, color: Rgb, size: f32) -> Self {
        Self {
            layer,
            primitive,
            color,
            size,
            depth_test: true,
            points: Vec::new(),
        }
    }

    pub fn on_top(mut self) -> Self {
        self.depth_test = false;
        self
    }

    pub fn with_points(mut self, points: Vec<Vec3>) -> Self {
        self.points = points;
        self
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3) {
        self.points.push(a);
        self.points.push(b);
    }

    /// Segment endpoints for `Lines`, consecutive pairs for `LineStrip`.
    pub fn segments(&self) -> Vec<(Vec3, Vec3)> {
        match self.primitive {
            Primitive::Lines => self.points.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
            Primitive::LineStrip => self.points.windows(2).map(|p| (p[0], p[1])).collect(),
            Primitive::Points => Vec::new(),
        }
    }
}

/// All overlay batches for one frame, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub batches: Vec<Batch>,
}

impl Overlay {
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &Batch> {
        self.batches.iter().filter(move |b| b.layer == layer)
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layer(layer).next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Generates overlay batches according to an [`OverlayConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayGenerator {
    config: OverlayConfig,
}

impl OverlayGenerator {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, mesh: Option<&Mesh>, scale: f64, params: &RotationParams) -> Overlay {
        let extent = scaled_extent(mesh, scale);
        let mut batches = Vec::new();

        if self.config.show_axes {
            let length = axes::axis_length(extent);
            batches.extend(axes::coordinate_axes(length));
            if self.config.show_axis_labels {
                batches.push(axes::axis_labels(length));
            }
        }

        // Degenerate axes are silently skipped here.
        if params.axis.length() < self.config.axis_tolerance || !self.config.show_rotation_axis {
            return Overlay { batches };
        }
        let axis = params.axis.normalize();

        batches.extend(arrow::rotation_axis(axis, extent));
        // An infinite or NaN angle has no arc to draw.
        if self.config.show_angle_label && params.angle_degrees.is_finite() {
            batches.extend(arc::angle_arc(axis, params.angle_degrees, extent));
        }

        Overlay { batches }
    }
}

/// Overlay for the given state with every layer enabled.
pub fn generate_overlay(mesh: Option<&Mesh>, scale: f64, axis: impl Into<Vec3>, angle_degrees: f64) -> Overlay {
    OverlayGenerator::default().generate(mesh, scale, &RotationParams::new(axis, angle_degrees))
}
