//! Digit affinity dimensions.

use drawcast_core::Number;

use crate::{
    dimension::{BoxedScoreDimension, DimensionScores, ScoreDimension},
    score_board::NumberScores,
    scoring_context::ScoringContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitKind {
    /// Ones digit (`0..=9`).
    Tail,
    /// Tens digit (`0..=4`).
    Head,
}

impl DigitKind {
    const fn digit(self, number: Number) -> u8 {
        match self {
            Self::Tail => number.tail_digit(),
            Self::Head => number.head_digit(),
        }
    }
}

/// Rewards numbers sharing the digits that dominated recent special numbers.
///
/// # Raw measurement
///
/// 1. Count each digit among the last `window` special numbers
/// 2. The `hot_count` most frequent digits are "hot" (ties favour the smaller digit; digits
///    never seen are never hot)
/// 3. Every number with a hot digit scores that digit's count
#[derive(Debug, Clone)]
pub struct DigitAffinity {
    kind: DigitKind,
    window: usize,
    hot_count: usize,
}

impl DigitAffinity {
    #[must_use]
    pub const fn new(kind: DigitKind, window: usize, hot_count: usize) -> Self {
        Self {
            kind,
            window,
            hot_count,
        }
    }

    /// Ones digits over the last 10 draws, top 3.
    #[must_use]
    pub const fn tail() -> Self {
        Self::new(DigitKind::Tail, 10, 3)
    }

    /// Tens digits over the last 20 draws, top 2.
    #[must_use]
    pub const fn head() -> Self {
        Self::new(DigitKind::Head, 20, 2)
    }

    /// Digit counts over the window and the hot digits, most frequent first.
    #[must_use]
    pub fn hot_digits(&self, ctx: &ScoringContext<'_>) -> ([u32; 10], Vec<u8>) {
        let mut counts = [0_u32; 10];
        for n in ctx.recent_specials(self.window) {
            counts[usize::from(self.kind.digit(n))] += 1;
        }
        let mut digits: Vec<u8> = (0..10).filter(|&d| counts[usize::from(d)] > 0).collect();
        digits.sort_by(|a, b| counts[usize::from(*b)].cmp(&counts[usize::from(*a)]));
        digits.truncate(self.hot_count);
        (counts, digits)
    }
}

impl ScoreDimension for DigitAffinity {
    fn id(&self) -> &'static str {
        match self.kind {
            DigitKind::Tail => "tail_digit",
            DigitKind::Head => "head_digit",
        }
    }
    fn name(&self) -> &'static str {
        match self.kind {
            DigitKind::Tail => "Tail-Digit Affinity",
            DigitKind::Head => "Head-Digit Affinity",
        }
    }
    fn clone_boxed(&self) -> BoxedScoreDimension {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract_raw(&self, ctx: &ScoringContext<'_>) -> DimensionScores {
        let (counts, hot) = self.hot_digits(ctx);
        let mut scores = NumberScores::default();
        for n in Number::all() {
            let digit = self.kind.digit(n);
            if hot.contains(&digit) {
                scores[n] += counts[usize::from(digit)] as f32;
            }
        }
        DimensionScores::Number(scores)
    }
}

#[cfg(test)]
mod tests {
    use drawcast_core::ZodiacMap;

    use super::*;
    use crate::dimension::test_util;

    fn n(value: u8) -> Number {
        Number::new(value).unwrap()
    }

    #[test]
    fn test_tail_hot_digits() {
        let map = ZodiacMap::default();
        let draws = test_util::specials(&[13, 23, 33, 7, 17, 4, 9, 19, 29, 39, 45]);
        let ctx = ScoringContext::new(&draws, &map);
        let affinity = DigitAffinity::tail();
        let (counts, hot) = affinity.hot_digits(&ctx);
        // the 11th draw (45) is outside the window
        assert_eq!(counts[5], 0);
        assert_eq!(hot, vec![9, 3, 7]);

        let DimensionScores::Number(scores) = affinity.extract_raw(&ctx) else {
            panic!("digit affinity scores numbers");
        };
        assert!((scores[n(49)] - 4.0).abs() < f32::EPSILON);
        assert!((scores[n(43)] - 3.0).abs() < f32::EPSILON);
        assert!((scores[n(27)] - 2.0).abs() < f32::EPSILON);
        assert!(scores[n(4)].abs() < f32::EPSILON);
    }

    #[test]
    fn test_head_hot_digits() {
        let map = ZodiacMap::default();
        let draws = test_util::specials(&[41, 42, 43, 11, 12, 30]);
        let ctx = ScoringContext::new(&draws, &map);
        let (_, hot) = DigitAffinity::head().hot_digits(&ctx);
        assert_eq!(hot, vec![4, 1]);
    }
}
