//! Kill list: signs forcibly excluded from the top of a ranking.

use arrayvec::ArrayVec;
use drawcast_core::Zodiac;
use serde::{Deserialize, Serialize};

use crate::{dimension::Omission, scoring_context::ScoringContext};

/// Upper bound on the number of killed signs.
pub const MAX_KILLED: usize = 3;

/// Rules deciding which signs get killed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillRules {
    /// Kill the sign clashing with the latest special number's sign.
    pub kill_clash: bool,
    /// Signs absent from this many recent specials are killed (`0` disables the rule).
    pub absence_window: usize,
    /// At most this many signs are killed, capped at [`MAX_KILLED`].
    pub max_killed: usize,
}

impl Default for KillRules {
    fn default() -> Self {
        Self {
            kill_clash: true,
            absence_window: 10,
            max_killed: MAX_KILLED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillList(ArrayVec<Zodiac, MAX_KILLED>);

impl KillList {
    /// Applies `rules` to the latest draws in `ctx`.
    ///
    /// 1. The clash partner of the latest sign
    /// 2. Signs absent from the last `absence_window` specials, longest overall gap first
    ///    (equal gaps keep declaration order)
    ///
    /// An empty history kills nothing.
    #[must_use]
    pub fn derive(ctx: &ScoringContext<'_>, rules: &KillRules) -> Self {
        let limit = rules.max_killed.min(MAX_KILLED);
        let mut list = ArrayVec::new();
        let Some(&latest) = ctx.special_zodiacs().first() else {
            return Self(list);
        };

        if rules.kill_clash && list.len() < limit {
            list.push(latest.clash());
        }

        if rules.absence_window > 0 {
            let zodiacs = ctx.special_zodiacs();
            let window = &zodiacs[..rules.absence_window.min(zodiacs.len())];
            let gaps = Omission::gaps(ctx);
            let mut absent: Vec<Zodiac> = Zodiac::ALL
                .into_iter()
                .filter(|z| !window.contains(z))
                .collect();
            absent.sort_by(|a, b| gaps[b.index()].cmp(&gaps[a.index()]));
            for z in absent {
                if list.len() >= limit {
                    break;
                }
                if !list.contains(&z) {
                    list.push(z);
                }
            }
        }

        Self(list)
    }

    /// Builds a list from explicit signs, ignoring duplicates and anything past [`MAX_KILLED`].
    #[must_use]
    pub fn from_zodiacs<I>(zodiacs: I) -> Self
    where
        I: IntoIterator<Item = Zodiac>,
    {
        let mut list = ArrayVec::new();
        for z in zodiacs {
            if list.is_full() {
                break;
            }
            if !list.contains(&z) {
                list.push(z);
            }
        }
        Self(list)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zodiac> {
        self.0.iter()
    }

    #[must_use]
    pub fn contains(&self, zodiac: Zodiac) -> bool {
        self.0.contains(&zodiac)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Zodiac] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
