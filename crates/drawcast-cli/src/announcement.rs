//! Parser for the plain-text draw announcement.
//!
//! An announcement looks like
//!
//! ```text
//! 第 2024123 期 开奖结果
//! 08 15 22 31 40 47 26
//! 蛇 猪 马 鸡 鼠 羊 虎
//! ```
//!
//! - The issue comes from the `第 N 期` marker (spaces optional).
//! - Numbers are the two-digit tokens in `01..=49` after the marker. The first six are the plain
//!   numbers, the seventh the special number. Digit runs of any other length (years) are skipped.
//! - An optional line of zodiac glyphs, simplified or traditional, may follow. When it has at
//!   least seven glyphs, the seventh is recorded as the special number's announced sign.

use chrono::{DateTime, Utc};
use drawcast_core::{DrawError, DrawRecord, IssueId, Number, Zodiac};

const ISSUE_PREFIX: char = '第';
const ISSUE_SUFFIX: char = '期';
const NUMBERS_NEEDED: usize = DrawRecord::PLAIN_COUNT + 1;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnnouncementError {
    #[display("no `第 N 期` issue marker found")]
    MissingIssue,
    #[display("found {found} numbers in 01..=49, need {NUMBERS_NEEDED}")]
    TooFewNumbers { found: usize },
    #[display("announced numbers do not form a valid draw: {source}")]
    InvalidDraw { source: DrawError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub issue: IssueId,
    pub numbers: [Number; DrawRecord::PLAIN_COUNT],
    pub special: Number,
    pub special_zodiac: Option<Zodiac>,
}

impl Announcement {
    pub fn parse(text: &str) -> Result<Self, AnnouncementError> {
        let (issue, rest) = find_issue(text).ok_or(AnnouncementError::MissingIssue)?;

        let tokens: Vec<Number> = two_digit_tokens(rest).take(NUMBERS_NEEDED).collect();
        let Ok(drawn) = <[Number; NUMBERS_NEEDED]>::try_from(tokens.as_slice()) else {
            return Err(AnnouncementError::TooFewNumbers {
                found: tokens.len(),
            });
        };
        let [numbers @ .., special] = drawn;

        let special_zodiac = rest.lines().find_map(|line| {
            let glyphs: Vec<Zodiac> = line.chars().filter_map(Zodiac::from_char).collect();
            glyphs.get(NUMBERS_NEEDED - 1).copied()
        });

        let announcement = Self {
            issue,
            numbers,
            special,
            special_zodiac,
        };
        announcement
            .to_draw(DateTime::UNIX_EPOCH)
            .map_err(|source| AnnouncementError::InvalidDraw { source })?;
        Ok(announcement)
    }

    pub fn to_draw(&self, drawn_at: DateTime<Utc>) -> Result<DrawRecord, DrawError> {
        let draw = DrawRecord::new(self.issue, self.numbers, self.special, drawn_at)?;
        Ok(match self.special_zodiac {
            Some(zodiac) => draw.with_special_zodiac(zodiac),
            None => draw,
        })
    }
}

/// Finds the first `第 N 期` marker and returns the issue and the text after it.
fn find_issue(text: &str) -> Option<(IssueId, &str)> {
    for (start, _) in text.match_indices(ISSUE_PREFIX) {
        let after_prefix = &text[start + ISSUE_PREFIX.len_utf8()..];
        let body = after_prefix.trim_start();
        let digits_len = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        if digits_len == 0 {
            continue;
        }
        let tail = body[digits_len..].trim_start();
        let Some(rest) = tail.strip_prefix(ISSUE_SUFFIX) else {
            continue;
        };
        if let Ok(issue) = body[..digits_len].parse::<u64>() {
            return Some((IssueId::from(issue), rest));
        }
    }
    None
}

/// Maximal ASCII digit runs of exactly two digits that are valid numbers.
fn two_digit_tokens(text: &str) -> impl Iterator<Item = Number> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| run.len() == 2)
        .filter_map(|run| run.parse::<u8>().ok())
        .filter_map(Number::new)
}
