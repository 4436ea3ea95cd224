//! Configurable number → zodiac partition.
//!
//! A [`ZodiacMap`] is always a complete partition: all 12 signs are present and each number in
//! `[1, 49]` belongs to exactly one of them. Both directions are precomputed, so
//! [`ZodiacMap::zodiac_of`] and [`ZodiacMap::numbers_of`] are constant-time and exact inverses of
//! each other.
//!
//! Operator overrides arrive as JSON objects mapping glyphs to number arrays:
//!
//! ```json
//! { "鼠": [7, 19, 31, 43], "牛": [6, 18, 30, 42], "...": [] }
//! ```
//!
//! [`ZodiacMap::resolve`] is the load path used by scoring cycles: a missing override yields the
//! fallback, an invalid one is rejected with a [`ZodiacConfigError`] and the fallback is kept.

use std::collections::BTreeMap;

use crate::{Number, NumberInfo, Zodiac};

/// The sign owning number `01` in the built-in cyclic assignment.
pub const DEFAULT_YEAR_SIGN: Zodiac = Zodiac::Horse;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ZodiacConfigError {
    #[display("zodiac config is not valid JSON: {source}")]
    InvalidJson { source: serde_json::Error },
    #[display("unknown zodiac glyph '{glyph}'")]
    UnknownZodiac { glyph: String },
    #[display("zodiac {zodiac} is listed more than once")]
    DuplicateZodiac { zodiac: Zodiac },
    #[display("zodiac config names {found} signs, expected 12")]
    MissingZodiacs { found: usize },
    #[display("zodiac {zodiac} lists {value}, which is outside [1, 49]")]
    NumberOutOfRange { zodiac: Zodiac, value: u8 },
    #[display("number {number} is assigned to more than one zodiac")]
    DuplicateNumber { number: Number },
    #[display("number {number} is not assigned to any zodiac")]
    UnassignedNumber { number: Number },
}

/// Outcome of loading the zodiac override from configuration.
#[derive(Debug, derive_more::IsVariant)]
pub enum ZodiacConfigStatus {
    /// No override is configured; the fallback map is in use.
    Missing,
    /// The override was valid and is in use.
    Accepted,
    /// The override was invalid; the fallback map is in use.
    Rejected(ZodiacConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZodiacMap {
    zodiac_of: [Zodiac; Number::COUNT],
    members: [Vec<Number>; Zodiac::LEN],
}

impl Default for ZodiacMap {
    fn default() -> Self {
        Self::cyclic(DEFAULT_YEAR_SIGN)
    }
}

impl ZodiacMap {
    /// Builds the cyclic assignment where `01` belongs to `year_sign`, `02` to the sign before
    /// it, and so on every 12 numbers.
    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn cyclic(year_sign: Zodiac) -> Self {
        Self::from_index(|n| year_sign.shift(-(n.index() as isize)))
    }

    fn from_index<F>(mut f: F) -> Self
    where
        F: FnMut(Number) -> Zodiac,
    {
        let zodiac_of: [Zodiac; Number::COUNT] = std::array::from_fn(|i| f(Number::from_index(i)));
        let mut members: [Vec<Number>; Zodiac::LEN] = std::array::from_fn(|_| vec![]);
        for n in Number::all() {
            members[zodiac_of[n.index()].index()].push(n);
        }
        Self { zodiac_of, members }
    }

    /// Builds a map from explicit groups, validating that they form a complete partition.
    pub fn from_groups<I>(groups: I) -> Result<Self, ZodiacConfigError>
    where
        I: IntoIterator<Item = (Zodiac, Vec<u8>)>,
    {
        let mut assigned: [Option<Zodiac>; Number::COUNT] = [None; Number::COUNT];
        let mut present = [false; Zodiac::LEN];
        for (zodiac, values) in groups {
            if std::mem::replace(&mut present[zodiac.index()], true) {
                return Err(ZodiacConfigError::DuplicateZodiac { zodiac });
            }
            for value in values {
                let number = Number::new(value)
                    .ok_or(ZodiacConfigError::NumberOutOfRange { zodiac, value })?;
                if assigned[number.index()].replace(zodiac).is_some() {
                    return Err(ZodiacConfigError::DuplicateNumber { number });
                }
            }
        }

        let found = present.iter().filter(|p| **p).count();
        if found != Zodiac::LEN {
            return Err(ZodiacConfigError::MissingZodiacs { found });
        }
        if let Some(number) = Number::all().find(|n| assigned[n.index()].is_none()) {
            return Err(ZodiacConfigError::UnassignedNumber { number });
        }

        Ok(Self::from_index(|n| {
            assigned[n.index()].expect("every number was checked to be assigned")
        }))
    }

    /// Parses and validates a JSON override.
    pub fn from_json(json: &str) -> Result<Self, ZodiacConfigError> {
        let raw: BTreeMap<String, Vec<u8>> = serde_json::from_str(json)
            .map_err(|source| ZodiacConfigError::InvalidJson { source })?;
        let groups = raw
            .into_iter()
            .map(|(glyph, values)| match Zodiac::from_glyph(&glyph) {
                Some(zodiac) => Ok((zodiac, values)),
                None => Err(ZodiacConfigError::UnknownZodiac { glyph }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_groups(groups)
    }

    /// Resolves an optional JSON override against the last valid map.
    #[must_use]
    pub fn resolve(config: Option<&str>, fallback: &Self) -> (Self, ZodiacConfigStatus) {
        match config {
            None => (fallback.clone(), ZodiacConfigStatus::Missing),
            Some(json) if json.trim().is_empty() => (fallback.clone(), ZodiacConfigStatus::Missing),
            Some(json) => match Self::from_json(json) {
                Ok(map) => (map, ZodiacConfigStatus::Accepted),
                Err(err) => (fallback.clone(), ZodiacConfigStatus::Rejected(err)),
            },
        }
    }

    /// The override representation of this map (glyph → ascending numbers).
    #[must_use]
    pub fn to_config(&self) -> BTreeMap<String, Vec<u8>> {
        Zodiac::ALL
            .into_iter()
            .map(|z| {
                let values = self.numbers_of(z).iter().map(|n| n.get()).collect();
                (z.glyph().to_owned(), values)
            })
            .collect()
    }

    #[must_use]
    pub fn zodiac_of(&self, number: Number) -> Zodiac {
        self.zodiac_of[number.index()]
    }

    /// Member numbers of a sign in ascending order.
    #[must_use]
    pub fn numbers_of(&self, zodiac: Zodiac) -> &[Number] {
        &self.members[zodiac.index()]
    }

    #[must_use]
    pub fn info(&self, number: Number) -> NumberInfo {
        NumberInfo {
            number,
            zodiac: self.zodiac_of(number),
            color_band: number.color_band(),
            element: number.element(),
            size: number.size(),
            parity: number.parity(),
            digit_sum: number.digit_sum(),
        }
    }
}
