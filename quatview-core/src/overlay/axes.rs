/// Fixed RGB coordinate axes and their letter labels
use super::{Batch, Layer, Primitive, Rgb};
use crate::vector::Vec3;

const MIN_AXIS_LENGTH: f64 = 2.5;

/// Axes reach past the scaled mesh by half its extent, and never fall under 2.5.
pub(super) fn axis_length(scaled_extent: Option<f64>) -> f64 {
    scaled_extent.map_or(MIN_AXIS_LENGTH, |extent| MIN_AXIS_LENGTH.max(extent * 1.5))
}

/// Three segments from the origin along +X, +Y, +Z in red, green and blue.
pub(super) fn coordinate_axes(length: f64) -> Vec<Batch> {
    [(Vec3::X, Rgb::RED), (Vec3::Y, Rgb::GREEN), (Vec3::Z, Rgb::BLUE)]
        .into_iter()
        .map(|(direction, color)| {
            let mut batch = Batch::new(Layer::CoordinateAxes, Primitive::Lines, color, 5.0);
            batch.push_segment(Vec3::ZERO, direction.scale(length));
            batch
        })
        .collect()
}

/// "X", "Y" and "Z" glyphs just beyond each axis tip.
pub(super) fn axis_labels(length: f64) -> Batch {
    let o = length * 0.1;
    let tip = length + o;
    let mut batch = Batch::new(Layer::AxisLabels, Primitive::Lines, Rgb::WHITE, 3.0);

    // X: a cross in the XY plane
    batch.push_segment(Vec3::new(tip - o, -o, 0.0), Vec3::new(tip + o, o, 0.0));
    batch.push_segment(Vec3::new(tip - o, o, 0.0), Vec3::new(tip + o, -o, 0.0));

    // Y: two arms meeting above a stem
    let fork = Vec3::new(0.0, tip, 0.0);
    batch.push_segment(Vec3::new(-o, tip - o, 0.0), fork);
    batch.push_segment(Vec3::new(o, tip - o, 0.0), fork);
    batch.push_segment(fork, Vec3::new(0.0, tip + o, 0.0));

    // Z: top bar, diagonal, bottom bar in the XZ plane
    batch.push_segment(Vec3::new(-o, 0.0, tip - o), Vec3::new(o, 0.0, tip - o));
    batch.push_segment(Vec3::new(o, 0.0, tip - o), Vec3::new(-o, 0.0, tip + o));
    batch.push_segment(Vec3::new(-o, 0.0, tip + o), Vec3::new(o, 0.0, tip + o));

    batch
}
