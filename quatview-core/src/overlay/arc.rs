/// Angle arc swept around the rotation axis, plus the numeric readout
use super::digits::angle_readout;
use super::{perpendicular_basis, Batch, Layer, Primitive, Rgb};
use crate::vector::Vec3;

const MIN_SCALE: f64 = 1.5;
const MIN_SEGMENTS: usize = 12;
/// Four full turns at one segment per five degrees.
const MAX_SEGMENTS: usize = 72 * 4;
const DEGREES_PER_SEGMENT: f64 = 5.0;

/// Number of straight pieces used to draw an arc of `angle_degrees`.
pub(super) fn arc_segments(angle_degrees: f64) -> usize {
    ((angle_degrees.abs() / DEGREES_PER_SEGMENT) as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Arc, endpoint markers and readout for a rotation of `angle_degrees`
/// around `unit_axis`.
///
/// The arc lies in the plane spanned by [`perpendicular_basis`], centred
/// halfway out along the axis, and sweeps from the first basis vector towards
/// the second for positive angles, the other way for negative ones.
pub(super) fn angle_arc(unit_axis: Vec3, angle_degrees: f64, scaled_extent: Option<f64>) -> Vec<Batch> {
    let scale = scaled_extent.map_or(MIN_SCALE, |e| MIN_SCALE.max(e * 0.8));
    let radius = scale * 0.4;
    let center = unit_axis.scale(scale * 0.5);
    let (p1, p2) = perpendicular_basis(unit_axis);

    let sweep = angle_degrees.to_radians();
    let at = |theta: f64| center + (p1.scale(theta.cos()) + p2.scale(theta.sin())).scale(radius);

    let n = arc_segments(angle_degrees);
    let strip = (0..=n).map(|i| at(sweep * i as f64 / n as f64)).collect();
    let arc = Batch::new(Layer::AngleArc, Primitive::LineStrip, Rgb::YELLOW, 6.0)
        .on_top()
        .with_points(strip);
    let markers = Batch::new(Layer::AngleArc, Primitive::Points, Rgb::YELLOW, 12.0)
        .on_top()
        .with_points(vec![at(0.0), at(sweep)]);

    let mut batches = vec![arc, markers];
    batches.extend(angle_readout(center + p1.scale(radius * 1.8), angle_degrees));
    batches
}
