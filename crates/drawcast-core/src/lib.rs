//! Domain model for draw scoring.
//!
//! This crate holds the value types every other crate builds on:
//!
//! - [`Number`] - a validated ball number in `[1, 49]` with its fixed derived attributes
//!   (color band, element, size, parity, digits)
//! - [`Zodiac`], [`ColorBand`], [`Element`] - the three category systems and their relation
//!   tables
//! - [`ZodiacMap`] - the configurable number → zodiac partition with a precomputed inverse index
//! - [`DrawRecord`] and [`History`] - draw results, ordered newest-first
//! - [`rng`] - the single seedable random source used across the workspace
//!
//! Color bands and elements are fixed constants. Only the zodiac partition can be replaced at
//! runtime, and only through [`ZodiacMap::from_json`] / [`ZodiacMap::from_groups`], which reject
//! anything that is not a complete 12-way partition of the numbers.

pub use self::{category::*, draw::*, number::*, zodiac_map::*};

pub mod category;
pub mod draw;
pub mod number;
pub mod rng;
pub mod zodiac_map;
