use std::collections::BTreeMap;

use drawcast_core::{DrawRecord, IssueId};

use crate::{HistoryStore, SettingsStore, StoreError};

/// Store kept entirely in memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    settings: BTreeMap<String, String>,
    draws: BTreeMap<IssueId, DrawRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_draws<I>(draws: I) -> Self
    where
        I: IntoIterator<Item = DrawRecord>,
    {
        let mut store = Self::default();
        for draw in draws {
            store.draws.entry(draw.issue()).or_insert(draw);
        }
        store
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.settings.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, StoreError> {
        if self.settings.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        self.settings.insert(key.to_owned(), value.to_owned());
        Ok(true)
    }
}

impl HistoryStore for MemoryStore {
    fn recent_draws(&self, limit: usize) -> Result<Vec<DrawRecord>, StoreError> {
        Ok(self.draws.values().rev().take(limit).cloned().collect())
    }

    fn draw_count(&self) -> Result<usize, StoreError> {
        Ok(self.draws.len())
    }

    fn append_draw(&mut self, draw: &DrawRecord) -> Result<bool, StoreError> {
        if self.draws.contains_key(&draw.issue()) {
            return Ok(false);
        }
        self.draws.insert(draw.issue(), draw.clone());
        Ok(true)
    }
}
