/// A seven-segment micro font for the angle readout
///
/// Digits are drawn as line segments in the world XY plane, so no text or font
/// machinery is needed by the renderer.
use super::{Batch, Layer, Primitive, Rgb};
use crate::vector::Vec3;

/// Half the height (and half the width) of a digit cell.
pub const DIGIT_SIZE: f64 = 0.08;
/// Horizontal distance between neighbouring digit centres.
pub const DIGIT_ADVANCE: f64 = 0.12;

const DEGREE_RADIUS: f64 = 0.03;
const DEGREE_POINTS: usize = 12;

/// The seven strokes of a digit, in pattern order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Top,
    UpperRight,
    LowerRight,
    Bottom,
    LowerLeft,
    UpperLeft,
    Middle,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::Top,
        Segment::UpperRight,
        Segment::LowerRight,
        Segment::Bottom,
        Segment::LowerLeft,
        Segment::UpperLeft,
        Segment::Middle,
    ];

    /// Stroke endpoints relative to the digit centre.
    fn endpoints(&self, s: f64) -> ((f64, f64), (f64, f64)) {
        match self {
            Segment::Top => ((-s, s), (s, s)),
            Segment::UpperRight => ((s, s), (s, 0.0)),
            Segment::LowerRight => ((s, 0.0), (s, -s)),
            Segment::Bottom => ((s, -s), (-s, -s)),
            Segment::LowerLeft => ((-s, -s), (-s, 0.0)),
            Segment::UpperLeft => ((-s, 0.0), (-s, s)),
            Segment::Middle => ((-s, 0.0), (s, 0.0)),
        }
    }
}

/// On/off pattern for each digit, indexed by [`Segment::ALL`] order.
pub const SEVEN_SEGMENT_PATTERNS: [[u8; 7]; 10] = [
    [1, 1, 1, 1, 1, 1, 0], // 0
    [0, 1, 1, 0, 0, 0, 0], // 1
    [1, 1, 0, 1, 1, 0, 1], // 2
    [1, 1, 1, 1, 0, 0, 1], // 3
    [0, 1, 1, 0, 0, 1, 1], // 4
    [1, 0, 1, 1, 0, 1, 1], // 5
    [1, 0, 1, 1, 1, 1, 1], // 6
    [1, 1, 1, 0, 0, 0, 0], // 7
    [1, 1, 1, 1, 1, 1, 1], // 8
    [1, 1, 1, 1, 0, 1, 1], // 9
];

/// Lit segments of `digit`, or `None` when it is not in `0..=9`.
pub fn lit_segments(digit: u8) -> Option<Vec<Segment>> {
    let pattern = SEVEN_SEGMENT_PATTERNS.get(digit as usize)?;
    Some(
        Segment::ALL
            .iter()
            .zip(pattern)
            .filter(|(_, on)| **on == 1)
            .map(|(&segment, _)| segment)
            .collect(),
    )
}

/// Append the strokes of `digit` centred at `center` to `batch`.
fn push_digit(batch: &mut Batch, center: Vec3, digit: u8) {
    let Some(segments) = lit_segments(digit) else {
        return;
    };
    let at = |(dx, dy): (f64, f64)| Vec3::new(center.x + dx, center.y + dy, center.z);
    for segment in segments {
        let (a, b) = segment.endpoints(DIGIT_SIZE);
        batch.push_segment(at(a), at(b));
    }
}

/// Text shown by the readout: the absolute angle rounded to whole degrees.
///
/// Formatted from the float, so angles past `u64::MAX` keep every digit.
pub fn readout_text(angle_degrees: f64) -> String {
    format!("{:.0}", angle_degrees.abs().round())
}

/// Batches for the numeric angle readout centred at `position`:
/// a dark backdrop, the digits, and a ring of points for the degree mark.
pub(super) fn angle_readout(position: Vec3, angle_degrees: f64) -> Vec<Batch> {
    let digits_shown: Vec<u8> = readout_text(angle_degrees)
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    let count = digits_shown.len().max(1);

    let backdrop = Batch::new(Layer::AngleReadout, Primitive::Points, Rgb::BLACK, 40.0)
        .on_top()
        .with_points(vec![position]);
    let plate = Batch::new(Layer::AngleReadout, Primitive::Points, Rgb::DARK_GREY, 35.0)
        .on_top()
        .with_points(vec![position]);

    let mut digits = Batch::new(Layer::AngleReadout, Primitive::Lines, Rgb::YELLOW, 4.0).on_top();
    let first = -((count - 1) as f64) * DIGIT_ADVANCE * 0.5;
    for (i, &digit) in digits_shown.iter().enumerate() {
        let center = position + Vec3::new(first + i as f64 * DIGIT_ADVANCE, 0.0, 0.0);
        push_digit(&mut digits, center, digit);
    }

    let ring_center = position + Vec3::new(count as f64 * 0.08, 0.1, 0.0);
    let ring = (0..DEGREE_POINTS)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / DEGREE_POINTS as f64;
            ring_center + Vec3::new(theta.cos(), theta.sin(), 0.0).scale(DEGREE_RADIUS)
        })
        .collect();
    let degree = Batch::new(Layer::AngleReadout, Primitive::Points, Rgb::YELLOW, 3.0)
        .on_top()
        .with_points(ring);

    vec![backdrop, plate, digits, degree]
}

#[cfg(test)]
mod tests {
    use super::*;
    use Segment::*;

    #[test]
    fn test_patterns() {
        let expected = [
            vec![Top, UpperRight, LowerRight, Bottom, LowerLeft, UpperLeft],
            vec![UpperRight, LowerRight],
            vec![Top, UpperRight, Bottom, LowerLeft, Middle],
            vec![Top, UpperRight, LowerRight, Bottom, Middle],
            vec![UpperRight, LowerRight, UpperLeft, Middle],
            vec![Top, LowerRight, Bottom, UpperLeft, Middle],
            vec![Top, LowerRight, Bottom, LowerLeft, UpperLeft, Middle],
            vec![Top, UpperRight, LowerRight],
            vec![Top, UpperRight, LowerRight, Bottom, LowerLeft, UpperLeft, Middle],
            vec![Top, UpperRight, LowerRight, Bottom, UpperLeft, Middle],
        ];
        for (digit, segments) in expected.iter().enumerate() {
            assert_eq!(&lit_segments(digit as u8).unwrap(), segments, "digit {}", digit);
        }
        assert!(lit_segments(10).is_none());
    }

    #[test]
    fn test_readout_text_rounds() {
        assert_eq!(readout_text(45.0), "45");
        assert_eq!(readout_text(-89.6), "90");
        assert_eq!(readout_text(0.4), "0");
        assert_eq!(readout_text(720.0), "720");
        assert_eq!(readout_text(-1e20), "100000000000000000000");
    }

    #[test]
    fn test_readout_of_huge_angle() {
        let batches = angle_readout(Vec3::ZERO, 1e20);
        // "1" followed by twenty "0"s
        assert_eq!(batches[2].segments().len(), 2 + 20 * 6);
    }

    #[test]
    fn test_readout_layout() {
        let batches = angle_readout(Vec3::ZERO, 18.0);
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|b| !b.depth_test));

        // "1" and "8" light 2 + 7 segments, centred on x = -0.06 and x = 0.06.
        let digits = &batches[2];
        assert_eq!(digits.segments().len(), 9);
        let xs: Vec<f64> = digits.points.iter().map(|p| p.x).collect();
        let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((min + 0.02).abs() < 1e-12);
        assert!((max - 0.14).abs() < 1e-12);

        let ring = &batches[3];
        assert_eq!(ring.primitive, Primitive::Points);
        assert_eq!(ring.points.len(), 12);
        for p in &ring.points {
            let d = *p - Vec3::new(0.16, 0.1, 0.0);
            assert!((d.length() - 0.03).abs() < 1e-12);
        }
    }
}
