//! Dot (pip) layouts for each die face.
//!
//! Offsets are relative to the die centre in units of the pip spacing, with
//! y pointing down (screen space). Renderers multiply by their own spacing.

use bevy_math::Vec2;

use crate::face::FaceValue;

/// Distance of the corner pips from the centre.
pub const DOT_SPACING: f32 = 0.8;

const S: f32 = DOT_SPACING;

const CENTER: Vec2 = Vec2::new(0.0, 0.0);
const LEFT_TOP: Vec2 = Vec2::new(-S, -S);
const RIGHT_BOTTOM: Vec2 = Vec2::new(S, S);
const LEFT_BOTTOM: Vec2 = Vec2::new(-S, S);
const RIGHT_TOP: Vec2 = Vec2::new(S, -S);
const LEFT_MIDDLE: Vec2 = Vec2::new(-S, 0.0);
const RIGHT_MIDDLE: Vec2 = Vec2::new(S, 0.0);

const ONE: [Vec2; 1] = [CENTER];
const TWO: [Vec2; 2] = [LEFT_TOP, RIGHT_BOTTOM];
const THREE: [Vec2; 3] = [LEFT_TOP, CENTER, RIGHT_BOTTOM];
const FOUR: [Vec2; 4] = [LEFT_TOP, RIGHT_BOTTOM, LEFT_BOTTOM, RIGHT_TOP];
const FIVE: [Vec2; 5] = [LEFT_TOP, RIGHT_BOTTOM, LEFT_BOTTOM, RIGHT_TOP, CENTER];
// Two columns of three.
const SIX: [Vec2; 6] = [
    LEFT_TOP,
    LEFT_MIDDLE,
    LEFT_BOTTOM,
    RIGHT_TOP,
    RIGHT_MIDDLE,
    RIGHT_BOTTOM,
];

/// Dot offsets for a face.
pub fn dot_pattern(value: FaceValue) -> &'static [Vec2] {
    match value.get() {
        2 => &TWO,
        3 => &THREE,
        4 => &FOUR,
        5 => &FIVE,
        6 => &SIX,
        _ => &ONE,
    }
}

/// Dot offsets for an arbitrary number, clamped into 1-6 first.
pub fn dot_pattern_for(value: f64) -> &'static [Vec2] {
    dot_pattern(FaceValue::clamped(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(v: u8) -> FaceValue {
        FaceValue::try_from(v).unwrap()
    }

    #[test]
    fn test_one_is_single_centered_dot() {
        assert_eq!(dot_pattern(face(1)), &[Vec2::ZERO]);
    }

    #[test]
    fn test_dot_count_matches_face() {
        for value in FaceValue::all() {
            assert_eq!(dot_pattern(value).len(), value.get() as usize);
        }
    }

    #[test]
    fn test_four_and_five_use_corners() {
        let corners = [LEFT_TOP, RIGHT_BOTTOM, LEFT_BOTTOM, RIGHT_TOP];
        assert_eq!(dot_pattern(face(4)), &corners);

        let five = dot_pattern(face(5));
        assert_eq!(&five[..4], &corners);
        assert_eq!(five[4], CENTER);
    }

    #[test]
    fn test_six_is_two_columns_without_duplicates() {
        let six = dot_pattern(face(6));
        assert_eq!(six.iter().filter(|d| d.x < 0.0).count(), 3);
        assert_eq!(six.iter().filter(|d| d.x > 0.0).count(), 3);
        for (i, a) in six.iter().enumerate() {
            for b in &six[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        assert_eq!(dot_pattern_for(0.0), dot_pattern(face(1)));
        assert_eq!(dot_pattern_for(9.0), dot_pattern(face(6)));
        assert_eq!(dot_pattern_for(2.9), dot_pattern(face(2)));
        assert_eq!(dot_pattern_for(f64::NAN), dot_pattern(face(1)));
    }
}
