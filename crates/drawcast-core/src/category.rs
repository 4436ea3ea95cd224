//! Category systems: zodiac signs, color bands and elements.
//!
//! Color bands and elements partition `1..=49` with fixed tables, looked up through
//! precomputed `const` arrays. Zodiac membership is configurable and lives in
//! [`ZodiacMap`](crate::ZodiacMap); this module only defines the signs and the relations between
//! them.
//!
//! # Relations
//!
//! ```text
//! element generates:  Metal → Water → Wood → Fire → Earth → Metal
//! element overcomes:  Metal → Wood → Earth → Water → Fire → Metal
//! zodiac harmony:     Rat–Ox, Tiger–Pig, Rabbit–Dog, Dragon–Rooster, Snake–Monkey, Horse–Goat
//! zodiac clash:       the opposite sign (index + 6)
//! zodiac triad:       the signs at index ± 4
//! ```

use serde::{Deserialize, Serialize};

use crate::Number;

/// The 12 zodiac signs, in declaration order Rat … Pig.
///
/// Declaration order is also the tie-break order wherever categories are ranked.
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
pub enum Zodiac {
    #[serde(rename = "鼠")]
    #[display("鼠")]
    Rat,
    #[serde(rename = "牛")]
    #[display("牛")]
    Ox,
    #[serde(rename = "虎")]
    #[display("虎")]
    Tiger,
    #[serde(rename = "兔")]
    #[display("兔")]
    Rabbit,
    #[serde(rename = "龙")]
    #[display("龙")]
    Dragon,
    #[serde(rename = "蛇")]
    #[display("蛇")]
    Snake,
    #[serde(rename = "马")]
    #[display("马")]
    Horse,
    #[serde(rename = "羊")]
    #[display("羊")]
    Goat,
    #[serde(rename = "猴")]
    #[display("猴")]
    Monkey,
    #[serde(rename = "鸡")]
    #[display("鸡")]
    Rooster,
    #[serde(rename = "狗")]
    #[display("狗")]
    Dog,
    #[serde(rename = "猪")]
    #[display("猪")]
    Pig,
}

impl Zodiac {
    pub const LEN: usize = 12;

    pub const ALL: [Self; Self::LEN] = [
        Self::Rat,
        Self::Ox,
        Self::Tiger,
        Self::Rabbit,
        Self::Dragon,
        Self::Snake,
        Self::Horse,
        Self::Goat,
        Self::Monkey,
        Self::Rooster,
        Self::Dog,
        Self::Pig,
    ];

    const SIMPLIFIED: [&str; Self::LEN] = [
        "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
    ];
    const TRADITIONAL: [&str; Self::LEN] = [
        "鼠", "牛", "虎", "兔", "龍", "蛇", "馬", "羊", "猴", "雞", "狗", "豬",
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// # Panics
    ///
    /// Panics if `index >= 12`.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        Self::SIMPLIFIED[self.index()]
    }

    /// Parses a single glyph, simplified or traditional.
    #[must_use]
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        let glyph = glyph.trim();
        Self::ALL
            .into_iter()
            .find(|z| Self::SIMPLIFIED[z.index()] == glyph || Self::TRADITIONAL[z.index()] == glyph)
    }

    /// Parses a single glyph character, simplified or traditional.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        let mut buf = [0; 4];
        Self::from_glyph(ch.encode_utf8(&mut buf))
    }

    /// Returns the sign `steps` positions later in the cycle (negative steps go back).
    #[expect(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    #[must_use]
    pub const fn shift(self, steps: isize) -> Self {
        let len = Self::LEN as isize;
        Self::ALL[(self.index() as isize + steps).rem_euclid(len) as usize]
    }

    /// Six-harmony (六合) partner.
    #[must_use]
    pub const fn harmony(self) -> Self {
        Self::ALL[(13 - self.index()) % Self::LEN]
    }

    /// Six-clash (六冲) opponent.
    #[must_use]
    pub const fn clash(self) -> Self {
        self.shift(6)
    }

    /// The two other members of this sign's three-harmony (三合) group.
    #[must_use]
    pub const fn triad(self) -> [Self; 2] {
        [self.shift(4), self.shift(8)]
    }
}

/// The three color bands.
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
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    #[display("红")]
    Red,
    #[display("蓝")]
    Blue,
    #[display("绿")]
    Green,
}

const RED_NUMBERS: [u8; 17] = [
    1, 2, 7, 8, 12, 13, 18, 19, 23, 24, 29, 30, 34, 35, 40, 45, 46,
];
const BLUE_NUMBERS: [u8; 16] = [
    3, 4, 9, 10, 14, 15, 20, 25, 26, 31, 36, 37, 41, 42, 47, 48,
];
const GREEN_NUMBERS: [u8; 16] = [
    5, 6, 11, 16, 17, 21, 22, 27, 28, 32, 33, 38, 39, 43, 44, 49,
];

const COLOR_TABLE: [ColorBand; Number::COUNT] = {
    let mut table = [ColorBand::Red; Number::COUNT];
    let mut i = 0;
    while i < BLUE_NUMBERS.len() {
        table[(BLUE_NUMBERS[i] - 1) as usize] = ColorBand::Blue;
        i += 1;
    }
    let mut i = 0;
    while i < GREEN_NUMBERS.len() {
        table[(GREEN_NUMBERS[i] - 1) as usize] = ColorBand::Green;
        i += 1;
    }
    table
};

impl ColorBand {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Red, Self::Blue, Self::Green];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn of(number: Number) -> Self {
        COLOR_TABLE[number.index()]
    }

    #[must_use]
    pub fn members(self) -> impl Iterator<Item = Number> {
        let values: &'static [u8] = match self {
            Self::Red => &RED_NUMBERS,
            Self::Blue => &BLUE_NUMBERS,
            Self::Green => &GREEN_NUMBERS,
        };
        values.iter().filter_map(|&v| Number::new(v))
    }
}

/// The five elements.
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
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[display("金")]
    Metal,
    #[display("木")]
    Wood,
    #[display("水")]
    Water,
    #[display("火")]
    Fire,
    #[display("土")]
    Earth,
}

const METAL_NUMBERS: [u8; 10] = [1, 2, 9, 10, 23, 24, 31, 32, 39, 40];
const WOOD_NUMBERS: [u8; 10] = [5, 6, 13, 14, 21, 22, 35, 36, 43, 44];
const WATER_NUMBERS: [u8; 9] = [11, 12, 19, 20, 27, 28, 41, 42, 49];
const FIRE_NUMBERS: [u8; 10] = [7, 8, 15, 16, 29, 30, 37, 38, 45, 46];
const EARTH_NUMBERS: [u8; 10] = [3, 4, 17, 18, 25, 26, 33, 34, 47, 48];

const ELEMENT_TABLE: [Element; Number::COUNT] = {
    const fn fill(table: &mut [Element; Number::COUNT], values: &[u8], element: Element) {
        let mut i = 0;
        while i < values.len() {
            table[(values[i] - 1) as usize] = element;
            i += 1;
        }
    }
    let mut table = [Element::Metal; Number::COUNT];
    fill(&mut table, &WOOD_NUMBERS, Element::Wood);
    fill(&mut table, &WATER_NUMBERS, Element::Water);
    fill(&mut table, &FIRE_NUMBERS, Element::Fire);
    fill(&mut table, &EARTH_NUMBERS, Element::Earth);
    table
};

impl Element {
    pub const LEN: usize = 5;
    pub const ALL: [Self; Self::LEN] = [
        Self::Metal,
        Self::Wood,
        Self::Water,
        Self::Fire,
        Self::Earth,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn of(number: Number) -> Self {
        ELEMENT_TABLE[number.index()]
    }

    /// The element this one generates (相生).
    #[must_use]
    pub const fn generates(self) -> Self {
        match self {
            Self::Metal => Self::Water,
            Self::Water => Self::Wood,
            Self::Wood => Self::Fire,
            Self::Fire => Self::Earth,
            Self::Earth => Self::Metal,
        }
    }

    /// The element this one overcomes (相克).
    #[must_use]
    pub const fn overcomes(self) -> Self {
        match self {
            Self::Metal => Self::Wood,
            Self::Wood => Self::Earth,
            Self::Earth => Self::Water,
            Self::Water => Self::Fire,
            Self::Fire => Self::Metal,
        }
    }

    #[must_use]
    pub fn members(self) -> impl Iterator<Item = Number> {
        let values: &'static [u8] = match self {
            Self::Metal => &METAL_NUMBERS,
            Self::Wood => &WOOD_NUMBERS,
            Self::Water => &WATER_NUMBERS,
            Self::Fire => &FIRE_NUMBERS,
            Self::Earth => &EARTH_NUMBERS,
        };
        values.iter().filter_map(|&v| Number::new(v))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_bands_partition_numbers() {
        let mut seen = HashSet::new();
        for band in ColorBand::ALL {
            for n in band.members() {
                assert!(seen.insert(n), "{n} listed twice");
                assert_eq!(ColorBand::of(n), band);
            }
        }
        assert_eq!(seen.len(), Number::COUNT);
    }

    #[test]
    fn test_elements_partition_numbers() {
        let mut seen = HashSet::new();
        for element in Element::ALL {
            for n in element.members() {
                assert!(seen.insert(n), "{n} listed twice");
                assert_eq!(Element::of(n), element);
            }
        }
        assert_eq!(seen.len(), Number::COUNT);
    }

    #[test]
    fn test_element_cycles_visit_every_element() {
        for start in Element::ALL {
            let mut generated = start;
            let mut overcome = start;
            for _ in 0..Element::LEN {
                generated = generated.generates();
                overcome = overcome.overcomes();
            }
            assert_eq!(generated, start);
            assert_eq!(overcome, start);
            assert_ne!(start.generates(), start.overcomes());
        }
        assert_eq!(Element::Metal.generates(), Element::Water);
        assert_eq!(Element::Fire.overcomes(), Element::Metal);
    }

    #[test]
    fn test_zodiac_relations() {
        assert_eq!(Zodiac::Rat.harmony(), Zodiac::Ox);
        assert_eq!(Zodiac::Tiger.harmony(), Zodiac::Pig);
        assert_eq!(Zodiac::Horse.harmony(), Zodiac::Goat);
        assert_eq!(Zodiac::Horse.clash(), Zodiac::Rat);
        assert_eq!(Zodiac::Snake.clash(), Zodiac::Pig);
        assert_eq!(Zodiac::Rat.triad(), [Zodiac::Dragon, Zodiac::Monkey]);
        assert_eq!(Zodiac::Horse.triad(), [Zodiac::Dog, Zodiac::Tiger]);
        for z in Zodiac::ALL {
            assert_eq!(z.harmony().harmony(), z);
            assert_eq!(z.clash().clash(), z);
        }
    }

    #[test]
    fn test_glyph_parsing_accepts_both_scripts() {
        assert_eq!(Zodiac::from_glyph("马"), Some(Zodiac::Horse));
        assert_eq!(Zodiac::from_glyph("馬"), Some(Zodiac::Horse));
        assert_eq!(Zodiac::from_char('豬'), Some(Zodiac::Pig));
        assert_eq!(Zodiac::from_glyph("猫"), None);
        for z in Zodiac::ALL {
            assert_eq!(Zodiac::from_glyph(z.glyph()), Some(z));
            assert_eq!(z.to_string(), z.glyph());
        }
    }
}
