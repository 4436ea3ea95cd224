//! Per-pass precomputation shared by every dimension.

use drawcast_core::{ColorBand, DrawRecord, Number, Zodiac, ZodiacMap};

/// A newest-first slice of draws together with the zodiac mapping in force.
///
/// The special number's zodiac is resolved once per draw (honouring announced signs), so
/// dimensions never repeat the lookup.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    draws: &'a [DrawRecord],
    zodiac_map: &'a ZodiacMap,
    special_zodiacs: Vec<Zodiac>,
}

impl<'a> ScoringContext<'a> {
    #[must_use]
    pub fn new(draws: &'a [DrawRecord], zodiac_map: &'a ZodiacMap) -> Self {
        let special_zodiacs = draws.iter().map(|d| d.special_zodiac(zodiac_map)).collect();
        Self {
            draws,
            zodiac_map,
            special_zodiacs,
        }
    }

    #[must_use]
    pub fn draws(&self) -> &'a [DrawRecord] {
        self.draws
    }

    #[must_use]
    pub fn zodiac_map(&self) -> &'a ZodiacMap {
        self.zodiac_map
    }

    #[must_use]
    pub fn latest(&self) -> Option<&'a DrawRecord> {
        self.draws.first()
    }

    /// Special-number zodiacs, aligned with [`Self::draws`].
    #[must_use]
    pub fn special_zodiacs(&self) -> &[Zodiac] {
        &self.special_zodiacs
    }

    /// Special numbers of the most recent `window` draws.
    pub fn recent_specials(&self, window: usize) -> impl Iterator<Item = Number> + 'a {
        self.draws.iter().take(window).map(DrawRecord::special)
    }

    /// Color band of the special number of draw `index`.
    #[must_use]
    pub fn special_color(&self, index: usize) -> ColorBand {
        self.draws[index].special().color_band()
    }
}
