//! Persistence contracts for draw history and settings, with in-memory and SQLite backends.
//!
//! The engine only ever needs two things from storage:
//!
//! - a **settings store**: string values under string keys (see [`keys`])
//! - a **history store**: the most recent draws newest-first, the total draw count, and an
//!   append that ignores duplicate issues
//!
//! Values are opaque strings here; typed (JSON) encoding is the caller's concern.

use std::{io, path::PathBuf};

use drawcast_core::{DrawError, DrawRecord};

pub use self::{memory::MemoryStore, sqlite::SqliteStore};

mod memory;
mod sqlite;

/// Well-known settings keys.
pub mod keys {
    /// JSON array of genes.
    pub const POPULATION: &str = "population";
    /// Generations run against the current target issue, as a decimal integer.
    pub const GENERATION_COUNTER: &str = "generation_counter";
    /// JSON prediction produced by the latest evolution step.
    pub const STAGING_PREDICTION: &str = "staging_prediction";
    /// JSON prediction copied from staging by the publish action.
    pub const PUBLISHED_PREDICTION: &str = "published_prediction";
    /// Optional JSON zodiac → numbers override.
    pub const ZODIAC_CATEGORY_CONFIG: &str = "zodiac_category_config";
    /// `"0"` disables evolution; anything else (or absence) enables it.
    pub const EVOLUTION_ENABLED: &str = "evolution_enabled";
    /// JSON evolution state record, holding the busy flag.
    pub const EVOLUTION_STATE: &str = "evolution_state";
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("database error: {source}")]
    Database { source: rusqlite::Error },
    #[display("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[display("issue #{issue} does not fit the database")]
    IssueOutOfRange { issue: u64 },
    #[display("stored draw #{issue} is invalid: {source}")]
    InvalidDraw { issue: i64, source: DrawError },
    #[display("stored draw #{issue} has invalid field {field}")]
    CorruptDraw { issue: i64, field: &'static str },
}

impl From<rusqlite::Error> for StoreError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Database { source }
    }
}

pub trait SettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Atomically stores `value` if the current value equals `expected` (`None` meaning absent).
    ///
    /// Returns `false`, leaving the value untouched, when the current value differs.
    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, StoreError>;
}

pub trait HistoryStore {
    /// The most recent `limit` draws, newest first.
    fn recent_draws(&self, limit: usize) -> Result<Vec<DrawRecord>, StoreError>;

    fn draw_count(&self) -> Result<usize, StoreError>;

    /// Appends `draw`, returning `false` if its issue is already stored.
    fn append_draw(&mut self, draw: &DrawRecord) -> Result<bool, StoreError>;
}

impl<T> SettingsStore for &mut T
where
    T: SettingsStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_set(key, expected, value)
    }
}

impl<T> HistoryStore for &mut T
where
    T: HistoryStore + ?Sized,
{
    fn recent_draws(&self, limit: usize) -> Result<Vec<DrawRecord>, StoreError> {
        (**self).recent_draws(limit)
    }

    fn draw_count(&self) -> Result<usize, StoreError> {
        (**self).draw_count()
    }

    fn append_draw(&mut self, draw: &DrawRecord) -> Result<bool, StoreError> {
        (**self).append_draw(draw)
    }
}
