use std::{fs, path::Path, time::Duration};

use chrono::DateTime;
use drawcast_core::{DrawRecord, IssueId, Number, Zodiac};
use rusqlite::{Connection, OptionalExtension as _, Row, TransactionBehavior, params};

use crate::{HistoryStore, SettingsStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    issue           INTEGER PRIMARY KEY,
    n1              INTEGER NOT NULL,
    n2              INTEGER NOT NULL,
    n3              INTEGER NOT NULL,
    n4              INTEGER NOT NULL,
    n5              INTEGER NOT NULL,
    n6              INTEGER NOT NULL,
    special         INTEGER NOT NULL,
    special_zodiac  TEXT,
    drawn_at        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

const SELECT_SETTING: &str = "SELECT value FROM settings WHERE key = ?1";

const UPSERT_SETTING: &str = "
INSERT INTO settings (key, value) VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
";

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_DRAWS: &str = "
SELECT issue, n1, n2, n3, n4, n5, n6, special, special_zodiac, drawn_at
FROM draws ORDER BY issue DESC LIMIT ?1
";

/// Store backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and applies the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_owned(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl SettingsStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(SELECT_SETTING, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(UPSERT_SETTING, [key, value])?;
        Ok(())
    }

    fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, StoreError> {
        // write lock held from the read until commit
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current: Option<String> = tx
            .query_row(SELECT_SETTING, [key], |row| row.get(0))
            .optional()?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        tx.execute(UPSERT_SETTING, [key, value])?;
        tx.commit()?;
        Ok(true)
    }
}

impl HistoryStore for SqliteStore {
    fn recent_draws(&self, limit: usize) -> Result<Vec<DrawRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(SELECT_DRAWS)?;
        let rows = stmt
            .query_map([limit], RawDraw::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawDraw::into_record).collect()
    }

    fn draw_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn append_draw(&mut self, draw: &DrawRecord) -> Result<bool, StoreError> {
        let issue = draw.issue().get();
        let issue_sql =
            i64::try_from(issue).map_err(|_| StoreError::IssueOutOfRange { issue })?;
        let [n1, n2, n3, n4, n5, n6] = draw.numbers().map(Number::get);
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO draws
                 (issue, n1, n2, n3, n4, n5, n6, special, special_zodiac, drawn_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                issue_sql,
                n1,
                n2,
                n3,
                n4,
                n5,
                n6,
                draw.special().get(),
                draw.announced_zodiac().map(Zodiac::glyph),
                draw.drawn_at().timestamp_millis(),
            ],
        )?;
        if changed == 0 {
            tracing::debug!(issue, "draw already stored");
        }
        Ok(changed > 0)
    }
}

/// A `draws` row before validation.
struct RawDraw {
    issue: i64,
    numbers: [u8; DrawRecord::PLAIN_COUNT],
    special: u8,
    special_zodiac: Option<String>,
    drawn_at: i64,
}

impl RawDraw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            issue: row.get(0)?,
            numbers: [
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ],
            special: row.get(7)?,
            special_zodiac: row.get(8)?,
            drawn_at: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<DrawRecord, StoreError> {
        let issue = self.issue;
        let corrupt = |field| StoreError::CorruptDraw { issue, field };

        let issue_id = u64::try_from(issue).map_err(|_| corrupt("issue"))?;
        let numbers = self
            .numbers
            .iter()
            .map(|&v| Number::new(v))
            .collect::<Option<Vec<_>>>()
            .and_then(|v| <[Number; DrawRecord::PLAIN_COUNT]>::try_from(v).ok())
            .ok_or_else(|| corrupt("numbers"))?;
        let special = Number::new(self.special).ok_or_else(|| corrupt("special"))?;
        let drawn_at =
            DateTime::from_timestamp_millis(self.drawn_at).ok_or_else(|| corrupt("drawn_at"))?;

        let mut record = DrawRecord::new(IssueId::from(issue_id), numbers, special, drawn_at)
            .map_err(|source| StoreError::InvalidDraw { issue, source })?;
        if let Some(glyph) = self.special_zodiac {
            let zodiac = Zodiac::from_glyph(&glyph).ok_or_else(|| corrupt("special_zodiac"))?;
            record = record.with_special_zodiac(zodiac);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        keys,
        test_util::{draw, draw_with_zodiac},
    };

    #[test]
    fn test_insert_and_count() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.draw_count().unwrap(), 0);
        assert!(store.append_draw(&draw(1, 10)).unwrap());
        assert_eq!(store.draw_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.append_draw(&draw(1, 10)).unwrap());
        assert!(!store.append_draw(&draw(1, 20)).unwrap());
        assert_eq!(store.draw_count().unwrap(), 1);
        assert_eq!(store.recent_draws(5).unwrap()[0].special().get(), 10);
    }

    #[test]
    fn test_fetch_order_and_fields() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.append_draw(&draw(1, 10)).unwrap();
        store
            .append_draw(&draw_with_zodiac(3, 12, Zodiac::Dragon))
            .unwrap();
        store.append_draw(&draw(2, 11)).unwrap();

        let draws = store.recent_draws(10).unwrap();
        let issues: Vec<_> = draws.iter().map(|d| d.issue().get()).collect();
        assert_eq!(issues, vec![3, 2, 1]);
        assert_eq!(draws[0], draw_with_zodiac(3, 12, Zodiac::Dragon));
        assert_eq!(draws[1], draw(2, 11));

        assert_eq!(store.recent_draws(1).unwrap().len(), 1);
    }

    #[test]
    fn test_settings_upsert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get(keys::EVOLUTION_ENABLED).unwrap(), None);
        store.set(keys::EVOLUTION_ENABLED, "1").unwrap();
        store.set(keys::EVOLUTION_ENABLED, "0").unwrap();
        assert_eq!(
            store.get(keys::EVOLUTION_ENABLED).unwrap().as_deref(),
            Some("0")
        );
    }

    #[test]
    fn test_compare_and_set_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawcast.db");
        let mut first = SqliteStore::open(&path).unwrap();
        let mut second = SqliteStore::open(&path).unwrap();

        let observed = first.get(keys::EVOLUTION_STATE).unwrap();
        assert!(
            second
                .compare_and_set(keys::EVOLUTION_STATE, observed.as_deref(), "second")
                .unwrap()
        );
        // `first` acts on a stale read and must lose
        assert!(
            !first
                .compare_and_set(keys::EVOLUTION_STATE, observed.as_deref(), "first")
                .unwrap()
        );
        assert_eq!(
            first.get(keys::EVOLUTION_STATE).unwrap().as_deref(),
            Some("second")
        );
        assert!(
            first
                .compare_and_set(keys::EVOLUTION_STATE, Some("second"), "first")
                .unwrap()
        );
        assert_eq!(
            second.get(keys::EVOLUTION_STATE).unwrap().as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("drawcast.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.append_draw(&draw(5, 7)).unwrap();
            store.set(keys::GENERATION_COUNTER, "12").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.draw_count().unwrap(), 1);
        assert_eq!(
            store.get(keys::GENERATION_COUNTER).unwrap().as_deref(),
            Some("12")
        );
    }
}
