use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Number, Zodiac, ZodiacMap};

/// Histories shorter than this are padded with random filler before prediction.
pub const COLD_START_MIN_DRAWS: usize = 5;

/// Length a cold-start history is padded to.
pub const COLD_START_FILLER_LEN: usize = 30;

/// Draw issue identifier. Monotonic across time.
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
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct IssueId(u64);

impl IssueId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The issue following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DrawError {
    #[display("plain number {number} appears more than once")]
    DuplicatePlainNumber { number: Number },
    #[display("special number {number} is also a plain number")]
    SpecialInPlain { number: Number },
}

/// One draw result: six plain numbers and a separately drawn special number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawRecord {
    issue: IssueId,
    numbers: [Number; DrawRecord::PLAIN_COUNT],
    special: Number,
    special_zodiac: Option<Zodiac>,
    drawn_at: DateTime<Utc>,
}

impl DrawRecord {
    pub const PLAIN_COUNT: usize = 6;

    pub fn new(
        issue: IssueId,
        numbers: [Number; Self::PLAIN_COUNT],
        special: Number,
        drawn_at: DateTime<Utc>,
    ) -> Result<Self, DrawError> {
        for (i, number) in numbers.iter().enumerate() {
            if numbers[..i].contains(number) {
                return Err(DrawError::DuplicatePlainNumber { number: *number });
            }
        }
        if numbers.contains(&special) {
            return Err(DrawError::SpecialInPlain { number: special });
        }
        Ok(Self {
            issue,
            numbers,
            special,
            special_zodiac: None,
            drawn_at,
        })
    }

    /// Records the zodiac announced alongside the special number.
    ///
    /// The announced sign takes precedence over the configured mapping.
    #[must_use]
    pub fn with_special_zodiac(mut self, zodiac: Zodiac) -> Self {
        self.special_zodiac = Some(zodiac);
        self
    }

    #[must_use]
    pub fn issue(&self) -> IssueId {
        self.issue
    }

    #[must_use]
    pub fn numbers(&self) -> &[Number; Self::PLAIN_COUNT] {
        &self.numbers
    }

    #[must_use]
    pub fn special(&self) -> Number {
        self.special
    }

    #[must_use]
    pub fn announced_zodiac(&self) -> Option<Zodiac> {
        self.special_zodiac
    }

    /// Zodiac of the special number: the announced sign if any, otherwise `map`'s.
    #[must_use]
    pub fn special_zodiac(&self, map: &ZodiacMap) -> Zodiac {
        self.special_zodiac
            .unwrap_or_else(|| map.zodiac_of(self.special))
    }

    #[must_use]
    pub fn drawn_at(&self) -> DateTime<Utc> {
        self.drawn_at
    }

    /// Generates a random draw with seven distinct numbers.
    pub fn random<R>(rng: &mut R, issue: IssueId, drawn_at: DateTime<Utc>) -> Self
    where
        R: Rng + ?Sized,
    {
        let picked = rand::seq::index::sample(rng, Number::COUNT, Self::PLAIN_COUNT + 1);
        let mut picked = picked.into_iter().map(Number::from_index);
        let numbers = std::array::from_fn(|_| picked.next().expect("sampled seven numbers"));
        let special = picked.next().expect("sampled seven numbers");
        Self {
            issue,
            numbers,
            special,
            special_zodiac: None,
            drawn_at,
        }
    }
}

impl fmt::Display for DrawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:", self.issue)?;
        for n in &self.numbers {
            write!(f, " {n}")?;
        }
        write!(f, " + {}", self.special)
    }
}

/// Draw history ordered newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    draws: Vec<DrawRecord>,
}

impl History {
    /// Wraps draws that are already ordered newest-first.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if issues are not strictly decreasing.
    #[must_use]
    pub fn from_newest_first(draws: Vec<DrawRecord>) -> Self {
        debug_assert!(
            draws.is_sorted_by(|a, b| a.issue > b.issue),
            "history must be ordered newest-first"
        );
        Self { draws }
    }

    /// Builds a history from draws in any order.
    #[must_use]
    pub fn from_unordered(mut draws: Vec<DrawRecord>) -> Self {
        draws.sort_by(|a, b| b.issue.cmp(&a.issue));
        draws.dedup_by_key(|d| d.issue);
        Self { draws }
    }

    #[must_use]
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DrawRecord> {
        self.draws.first()
    }

    /// Returns whether this history is too short to score without filler.
    #[must_use]
    pub fn is_cold(&self) -> bool {
        self.draws.len() < COLD_START_MIN_DRAWS
    }

    /// Pads a cold history with random draws older than every real draw.
    ///
    /// Histories with at least [`COLD_START_MIN_DRAWS`] draws are returned unchanged. Real draws
    /// always stay at the front, so "latest draw" heuristics still see the actual latest result.
    ///
    /// Filler takes the issues directly below the oldest real draw. When too few remain above
    /// zero, the real draws are renumbered upward (order kept) so that every issue in the padded
    /// history is unique and strictly decreasing. Take issue numbers from the unpadded history.
    #[must_use]
    pub fn with_cold_start_filler<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if !self.is_cold() {
            return self.clone();
        }
        let needed = (COLD_START_FILLER_LEN - self.draws.len()) as u64;
        let (oldest, mut drawn_at) = self
            .draws
            .last()
            .map_or((needed + 1, DateTime::UNIX_EPOCH), |d| {
                (d.issue.get(), d.drawn_at)
            });
        let shift = (needed + 1).saturating_sub(oldest);

        let mut draws: Vec<DrawRecord> = self
            .draws
            .iter()
            .map(|d| DrawRecord {
                issue: IssueId(d.issue.get().saturating_add(shift)),
                ..d.clone()
            })
            .collect();
        let mut issue = oldest + shift;
        while draws.len() < COLD_START_FILLER_LEN {
            issue -= 1;
            drawn_at -= Duration::days(1);
            draws.push(DrawRecord::random(rng, IssueId(issue), drawn_at));
        }
        Self { draws }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn n(value: u8) -> Number {
        Number::new(value).unwrap()
    }

    #[test]
    fn test_rejects_duplicates() {
        let at = DateTime::UNIX_EPOCH;
        let err = DrawRecord::new(
            IssueId(1),
            [n(1), n(2), n(3), n(3), n(5), n(6)],
            n(7),
            at,
        )
        .unwrap_err();
        assert_eq!(err, DrawError::DuplicatePlainNumber { number: n(3) });

        let err = DrawRecord::new(
            IssueId(1),
            [n(1), n(2), n(3), n(4), n(5), n(6)],
            n(6),
            at,
        )
        .unwrap_err();
        assert_eq!(err, DrawError::SpecialInPlain { number: n(6) });
    }

    #[test]
    fn test_announced_zodiac_overrides_mapping() {
        let map = ZodiacMap::default();
        let draw = DrawRecord::new(
            IssueId(1),
            [n(1), n(2), n(3), n(4), n(5), n(6)],
            n(13),
            DateTime::UNIX_EPOCH,
        )
        .unwrap();
        assert_eq!(draw.special_zodiac(&map), Zodiac::Horse);
        let draw = draw.with_special_zodiac(Zodiac::Pig);
        assert_eq!(draw.special_zodiac(&map), Zodiac::Pig);
    }

    #[test]
    fn test_random_draw_is_valid() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for i in 0..200 {
            let draw = DrawRecord::random(&mut rng, IssueId(i), DateTime::UNIX_EPOCH);
            let revalidated =
                DrawRecord::new(draw.issue(), *draw.numbers(), draw.special(), draw.drawn_at());
            assert_eq!(revalidated, Ok(draw));
        }
    }

    #[test]
    fn test_cold_start_filler_keeps_real_draws_first() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let real = DrawRecord::new(
            IssueId(100),
            [n(1), n(2), n(3), n(4), n(5), n(6)],
            n(26),
            DateTime::UNIX_EPOCH,
        )
        .unwrap();
        let history = History::from_newest_first(vec![real.clone()]);
        assert!(history.is_cold());

        let padded = history.with_cold_start_filler(&mut rng);
        assert_eq!(padded.len(), COLD_START_FILLER_LEN);
        assert_eq!(padded.latest(), Some(&real));
        assert!(!padded.is_cold());

        let empty = History::default().with_cold_start_filler(&mut rng);
        assert_eq!(empty.len(), COLD_START_FILLER_LEN);
    }

    #[test]
    fn test_cold_start_filler_issues_strictly_decrease() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let draw = |issue| {
            DrawRecord::new(
                IssueId(issue),
                [n(10), n(11), n(12), n(13), n(14), n(15)],
                n(issue.try_into().unwrap()),
                DateTime::UNIX_EPOCH,
            )
            .unwrap()
        };

        for real in [vec![draw(1)], vec![draw(4), draw(3)], vec![draw(40)], vec![]] {
            let history = History::from_newest_first(real.clone());
            let padded = history.with_cold_start_filler(&mut rng);
            assert_eq!(padded.len(), COLD_START_FILLER_LEN);
            assert!(padded.draws().is_sorted_by(|a, b| a.issue > b.issue));
            assert!(padded.draws().iter().all(|d| d.issue.get() > 0));
            for (kept, original) in padded.draws().iter().zip(&real) {
                assert_eq!(kept.special(), original.special());
            }
        }

        // enough room below the oldest draw: real issues are kept
        let history = History::from_newest_first(vec![draw(40)]);
        let padded = history.with_cold_start_filler(&mut rng);
        assert_eq!(padded.latest(), history.latest());
        assert_eq!(padded.draws()[COLD_START_FILLER_LEN - 1].issue, IssueId(11));
    }

    #[test]
    fn test_from_unordered_sorts_newest_first() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let draws = [5, 9, 1, 9]
            .into_iter()
            .map(|i| DrawRecord::random(&mut rng, IssueId(i), DateTime::UNIX_EPOCH))
            .collect();
        let history = History::from_unordered(draws);
        let issues: Vec<_> = history.draws().iter().map(|d| d.issue().get()).collect();
        assert_eq!(issues, [9, 5, 1]);
    }
}
