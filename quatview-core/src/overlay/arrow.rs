/// The current rotation axis as a double-ended line with an arrowhead
use super::{Batch, Layer, Primitive, Rgb};
use crate::vector::Vec3;

const MIN_HALF_LENGTH: f64 = 3.0;
const ARROW_SIZE: f64 = 0.2;
const ARROW_BACK: f64 = 0.3;

/// Two unit vectors perpendicular to `unit_axis` and to each other.
///
/// The world X axis seeds the first one unless the rotation axis is nearly
/// parallel to X, in which case world Y is used. `second = axis × first`, so
/// `(first, second, axis)` is right-handed.
pub fn perpendicular_basis(unit_axis: Vec3) -> (Vec3, Vec3) {
    let seed = if unit_axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let first = (seed - unit_axis.scale(seed.dot(&unit_axis))).normalize();
    let second = unit_axis.cross(&first);
    (first, second)
}

pub(super) fn rotation_axis(unit_axis: Vec3, scaled_extent: Option<f64>) -> Vec<Batch> {
    let half_length = scaled_extent.map_or(MIN_HALF_LENGTH, |e| MIN_HALF_LENGTH.max(e * 2.0));
    let tip = unit_axis.scale(half_length);

    let mut line = Batch::new(Layer::RotationAxis, Primitive::Lines, Rgb::AMBER, 6.0);
    line.push_segment(-tip, tip);

    // Four barbs at 0°, 90°, 180° and 270° around the axis.
    let (p1, p2) = perpendicular_basis(unit_axis);
    let back = tip - unit_axis.scale(ARROW_BACK);
    let mut head = Batch::new(Layer::RotationAxis, Primitive::Lines, Rgb::AMBER, 6.0);
    for offset in [p1, p2, -p1, -p2] {
        head.push_segment(tip, back + offset.scale(ARROW_SIZE));
    }

    vec![line, head]
}
