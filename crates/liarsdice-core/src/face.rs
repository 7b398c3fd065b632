//! Face values
//!
//! `FaceValue` is the only way a die value is stored, so a face outside 1-6
//! can not exist anywhere in the engine.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::FaceValueError;

/// A six-sided die face, always in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FaceValue(u8);

impl FaceValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub const ONE: FaceValue = FaceValue(1);
    pub const SIX: FaceValue = FaceValue(6);

    /// Floor then clamp into `1..=6`.
    ///
    /// Never fails: NaN falls back to 1, infinities clamp to the nearest end.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ONE;
        }
        let floored = value.floor().clamp(Self::MIN as f64, Self::MAX as f64);
        Self(floored as u8)
    }

    /// Uniform random face.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Value 1 counts as every other value in the tally.
    pub fn is_wild(self) -> bool {
        self.0 == 1
    }

    /// All six faces in ascending order.
    pub fn all() -> impl Iterator<Item = FaceValue> {
        (Self::MIN..=Self::MAX).map(FaceValue)
    }

    /// Unicode die face glyph (U+2680..U+2685).
    pub fn glyph(self) -> char {
        const GLYPHS: [char; 6] = ['\u{2680}', '\u{2681}', '\u{2682}', '\u{2683}', '\u{2684}', '\u{2685}'];
        GLYPHS[(self.0 - 1) as usize]
    }
}

impl Default for FaceValue {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u8> for FaceValue {
    type Error = FaceValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FaceValueError::OutOfRange(value as i64))
        }
    }
}

impl From<FaceValue> for u8 {
    fn from(value: FaceValue) -> Self {
        value.0
    }
}

impl FromStr for FaceValue {
    type Err = FaceValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed: i64 = trimmed
            .parse()
            .map_err(|_| FaceValueError::NotANumber(trimmed.to_string()))?;
        u8::try_from(parsed)
            .map_err(|_| FaceValueError::OutOfRange(parsed))
            .and_then(FaceValue::try_from)
    }
}

impl fmt::Display for FaceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clamped_floors_then_clamps() {
        assert_eq!(FaceValue::clamped(0.0).get(), 1);
        assert_eq!(FaceValue::clamped(7.0).get(), 6);
        assert_eq!(FaceValue::clamped(3.7).get(), 3);
        assert_eq!(FaceValue::clamped(-2.5).get(), 1);
        assert_eq!(FaceValue::clamped(6.99).get(), 6);
        assert_eq!(FaceValue::clamped(1.0).get(), 1);
    }

    #[test]
    fn test_clamped_non_finite() {
        assert_eq!(FaceValue::clamped(f64::NAN).get(), 1);
        assert_eq!(FaceValue::clamped(f64::INFINITY).get(), 6);
        assert_eq!(FaceValue::clamped(f64::NEG_INFINITY).get(), 1);
    }

    #[test]
    fn test_try_from_u8() {
        assert_eq!(FaceValue::try_from(4).unwrap().get(), 4);
        assert_eq!(FaceValue::try_from(0), Err(FaceValueError::OutOfRange(0)));
        assert_eq!(FaceValue::try_from(7), Err(FaceValueError::OutOfRange(7)));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" 5 ".parse::<FaceValue>().unwrap().get(), 5);
        assert_eq!("9".parse::<FaceValue>(), Err(FaceValueError::OutOfRange(9)));
        assert_eq!("-1".parse::<FaceValue>(), Err(FaceValueError::OutOfRange(-1)));
        assert!(matches!("six".parse::<FaceValue>(), Err(FaceValueError::NotANumber(_))));
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let face = FaceValue::random(&mut rng);
            assert!((1..=6).contains(&face.get()));
        }
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(FaceValue::ONE.glyph(), '⚀');
        assert_eq!(FaceValue::SIX.glyph(), '⚅');
    }

    #[test]
    fn test_all_faces() {
        let faces: Vec<u8> = FaceValue::all().map(FaceValue::get).collect();
        assert_eq!(faces, vec![1, 2, 3, 4, 5, 6]);
    }
}
