use serde::{Deserialize, Serialize};

use crate::{ColorBand, Element, Zodiac};

/// A ball number in `[1, 49]`.
///
/// Construction is checked, so every `Number` has exactly one color band and one element.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{_0:02}")]
pub struct Number(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("number {value} is outside [1, 49]")]
pub struct NumberOutOfRange {
    pub value: u8,
}

impl Number {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 49;
    pub const COUNT: usize = 49;

    /// Numbers at or above this value are "big".
    pub const BIG_THRESHOLD: u8 = 25;

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the number at a zero-based index (`0` is `01`).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 49`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        assert!(index < Self::COUNT, "number index {index} out of range");
        Self(index as u8 + 1)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Ones digit.
    #[must_use]
    pub const fn tail_digit(self) -> u8 {
        self.0 % 10
    }

    /// Tens digit (`0..=4`).
    #[must_use]
    pub const fn head_digit(self) -> u8 {
        self.0 / 10
    }

    #[must_use]
    pub const fn digit_sum(self) -> u8 {
        self.head_digit() + self.tail_digit()
    }

    #[must_use]
    pub const fn size(self) -> Size {
        if self.0 >= Self::BIG_THRESHOLD {
            Size::Big
        } else {
            Size::Small
        }
    }

    #[must_use]
    pub const fn parity(self) -> Parity {
        if self.0 % 2 == 1 {
            Parity::Odd
        } else {
            Parity::Even
        }
    }

    #[must_use]
    pub const fn color_band(self) -> ColorBand {
        ColorBand::of(self)
    }

    #[must_use]
    pub const fn element(self) -> Element {
        Element::of(self)
    }

    /// Shifts the number by `delta`, wrapping around so the result stays in `[1, 49]`.
    ///
    /// ```
    /// # use drawcast_core::Number;
    /// let n = Number::new(45).unwrap();
    /// assert_eq!(n.offset(10).get(), 6);
    /// assert_eq!(Number::new(3).unwrap().offset(-10).get(), 42);
    /// ```
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        let count = i32::from(Self::MAX);
        let shifted = (i32::from(self.0) - 1 + delta).rem_euclid(count) + 1;
        Self(shifted as u8)
    }
}

impl TryFrom<u8> for Number {
    type Error = NumberOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(NumberOutOfRange { value })
    }
}

impl From<Number> for u8 {
    fn from(number: Number) -> Self {
        number.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    #[display("big")]
    Big,
    #[display("small")]
    Small,
}

impl Size {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Big => Self::Small,
            Self::Small => Self::Big,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    #[display("odd")]
    Odd,
    #[display("even")]
    Even,
}

impl Parity {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Odd => Self::Even,
            Self::Even => Self::Odd,
        }
    }
}

/// Every attribute derived from a number under a given zodiac mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberInfo {
    pub number: Number,
    pub zodiac: Zodiac,
    pub color_band: ColorBand,
    pub element: Element,
    pub size: Size,
    pub parity: Parity,
    pub digit_sum: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_checked() {
        assert!(Number::new(0).is_none());
        assert!(Number::new(50).is_none());
        assert_eq!(Number::new(1).map(Number::get), Some(1));
        assert_eq!(Number::new(49).map(Number::get), Some(49));
        assert_eq!(Number::all().count(), Number::COUNT);
    }

    #[test]
    fn test_offset_wraps_into_range() {
        let n = |v| Number::new(v).unwrap();
        assert_eq!(n(26).offset(1), n(27));
        assert_eq!(n(26).offset(-1), n(25));
        assert_eq!(n(26).offset(10), n(36));
        assert_eq!(n(26).offset(-10), n(16));
        assert_eq!(n(49).offset(1), n(1));
        assert_eq!(n(1).offset(-1), n(49));
        assert_eq!(n(40).offset(12), n(3));
        assert_eq!(n(5).offset(-12), n(42));
    }

    #[test]
    fn test_digit_attributes() {
        let n = Number::new(37).unwrap();
        assert_eq!(n.head_digit(), 3);
        assert_eq!(n.tail_digit(), 7);
        assert_eq!(n.digit_sum(), 10);
        assert_eq!(n.size(), Size::Big);
        assert_eq!(n.parity(), Parity::Odd);
        assert_eq!(Number::new(24).unwrap().size(), Size::Small);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let n: Number = serde_json::from_str("7").unwrap();
        assert_eq!(n.get(), 7);
        assert_eq!(serde_json::to_string(&n).unwrap(), "7");
        assert!(serde_json::from_str::<Number>("0").is_err());
        assert!(serde_json::from_str::<Number>("50").is_err());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(Number::new(7).unwrap().to_string(), "07");
    }
}
