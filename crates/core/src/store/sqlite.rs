//! SQLite-backed genre/trend store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection};

use super::{Genre, NewTrend, StoreError, Trend, TrendStore, TrendWithGenre};

/// SQLite-backed trend store.
pub struct SqliteTrendStore {
    conn: Mutex<Connection>,
}

impl SqliteTrendStore {
    /// Open (or create) the database file and make sure the tables exist.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS genres (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            -- One live row per (genre_id, trend_name); collection overwrites in place
            CREATE TABLE IF NOT EXISTS trends (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                genre_id INTEGER NOT NULL REFERENCES genres(id),
                platform TEXT NOT NULL,
                trend_name TEXT NOT NULL,
                trend_description TEXT NOT NULL DEFAULT '',
                is_growing INTEGER NOT NULL DEFAULT 0,
                data_value REAL NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL,
                UNIQUE(genre_id, trend_name)
            );

            CREATE INDEX IF NOT EXISTS idx_trends_last_updated ON trends(last_updated);
            CREATE INDEX IF NOT EXISTS idx_trends_genre ON trends(genre_id, last_updated);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection mutex poisoned".to_string()))
    }

    /// Fixed-width RFC 3339 so that text ordering in SQL matches time ordering.
    fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    fn row_to_genre(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    /// Columns: id, genre_id, platform, trend_name, trend_description,
    /// is_growing, data_value, last_updated.
    fn row_to_trend(row: &rusqlite::Row) -> rusqlite::Result<Trend> {
        let last_updated_str: String = row.get(7)?;
        Ok(Trend {
            id: row.get(0)?,
            genre_id: row.get(1)?,
            platform: row.get(2)?,
            trend_name: row.get(3)?,
            trend_description: row.get(4)?,
            is_growing: row.get(5)?,
            data_value: row.get(6)?,
            last_updated: Self::parse_timestamp(7, &last_updated_str)?,
        })
    }
}

impl TrendStore for SqliteTrendStore {
    fn list_genres(&self) -> Result<Vec<Genre>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, name FROM genres ORDER BY name ASC")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_genre)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut genres = Vec::new();
        for row in rows {
            genres.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(genres)
    }

    fn get_genre_by_name(&self, name: &str) -> Result<Genre, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, name FROM genres WHERE name = ?",
            params![name],
            Self::row_to_genre,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(name.to_string()),
            _ => StoreError::Database(e.to_string()),
        })
    }

    fn ensure_genre(&self, name: &str) -> Result<Genre, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO genres (name, created_at) VALUES (?, ?)",
            params![name, Self::format_timestamp(&Utc::now())],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.query_row(
            "SELECT id, name FROM genres WHERE name = ?",
            params![name],
            Self::row_to_genre,
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn upsert_trends(&self, trends: &[NewTrend]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut written = 0;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO trends (genre_id, platform, trend_name, trend_description, is_growing, data_value, last_updated)
                     VALUES (?, ?, ?, ?, ?, ?, ?)
                     ON CONFLICT(genre_id, trend_name) DO UPDATE SET
                        platform = excluded.platform,
                        trend_description = excluded.trend_description,
                        is_growing = excluded.is_growing,
                        data_value = excluded.data_value,
                        last_updated = excluded.last_updated",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for trend in trends {
                written += stmt
                    .execute(params![
                        trend.genre_id,
                        &trend.platform,
                        &trend.trend_name,
                        &trend.trend_description,
                        trend.is_growing,
                        trend.data_value,
                        Self::format_timestamp(&trend.last_updated),
                    ])
                    .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        // Dropping an uncommitted transaction rolls it back, so an early
        // return above leaves the table unchanged.
        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(written)
    }

    fn list_trends_with_genre(&self) -> Result<Vec<TrendWithGenre>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.genre_id, t.platform, t.trend_name, t.trend_description,
                        t.is_growing, t.data_value, t.last_updated, g.name
                 FROM trends t
                 JOIN genres g ON g.id = t.genre_id
                 ORDER BY t.last_updated DESC, t.id DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TrendWithGenre {
                    trend: Self::row_to_trend(row)?,
                    genre_name: row.get(8)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut trends = Vec::new();
        for row in rows {
            trends.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(trends)
    }

    fn list_trends_for_genre(&self, genre_id: i64) -> Result<Vec<Trend>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, genre_id, platform, trend_name, trend_description,
                        is_growing, data_value, last_updated
                 FROM trends
                 WHERE genre_id = ?
                 ORDER BY last_updated DESC, id DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![genre_id], Self::row_to_trend)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut trends = Vec::new();
        for row in rows {
            trends.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(trends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn create_test_store() -> SqliteTrendStore {
        SqliteTrendStore::in_memory().unwrap()
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn new_trend(genre_id: i64, name: &str, at: DateTime<Utc>) -> NewTrend {
        NewTrend {
            genre_id,
            platform: "TikTok".to_string(),
            trend_name: name.to_string(),
            trend_description: format!("{} is spreading", name),
            is_growing: true,
            data_value: 8500.0,
            last_updated: at,
        }
    }

    #[test]
    fn test_list_genres_ordered_by_name() {
        let store = create_test_store();
        store.ensure_genre("Rock").unwrap();
        store.ensure_genre("Afrobeats").unwrap();
        store.ensure_genre("Jazz").unwrap();

        let names: Vec<String> = store
            .list_genres()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Afrobeats", "Jazz", "Rock"]);
    }

    #[test]
    fn test_ensure_genre_is_idempotent() {
        let store = create_test_store();
        let first = store.ensure_genre("Jazz").unwrap();
        let second = store.ensure_genre("Jazz").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_genres().unwrap().len(), 1);
    }

    #[test]
    fn test_get_genre_by_name_is_exact() {
        let store = create_test_store();
        store.ensure_genre("Hip Hop").unwrap();

        assert_eq!(store.get_genre_by_name("Hip Hop").unwrap().name, "Hip Hop");
        assert!(matches!(
            store.get_genre_by_name("hip hop"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_upsert_inserts_new_rows() {
        let store = create_test_store();
        let genre = store.ensure_genre("Jazz").unwrap();

        let written = store
            .upsert_trends(&[
                new_trend(genre.id, "Lo-fi revival", base_time()),
                new_trend(genre.id, "Jazz rap", base_time()),
            ])
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.list_trends_for_genre(genre.id).unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_overwrites_on_conflict() {
        let store = create_test_store();
        let genre = store.ensure_genre("Jazz").unwrap();

        store
            .upsert_trends(&[new_trend(genre.id, "Lo-fi revival", base_time())])
            .unwrap();

        let later = base_time() + Duration::hours(1);
        let mut updated = new_trend(genre.id, "Lo-fi revival", later);
        updated.platform = "Spotify".to_string();
        updated.is_growing = false;
        updated.data_value = 1200.0;
        updated.trend_description = "Cooling off".to_string();
        store.upsert_trends(&[updated]).unwrap();

        let trends = store.list_trends_for_genre(genre.id).unwrap();
        assert_eq!(trends.len(), 1);
        let trend = &trends[0];
        assert_eq!(trend.platform, "Spotify");
        assert!(!trend.is_growing);
        assert_eq!(trend.data_value, 1200.0);
        assert_eq!(trend.trend_description, "Cooling off");
        assert_eq!(trend.last_updated, later);
    }

    #[test]
    fn test_same_name_different_genres_are_distinct() {
        let store = create_test_store();
        let jazz = store.ensure_genre("Jazz").unwrap();
        let rock = store.ensure_genre("Rock").unwrap();

        store
            .upsert_trends(&[
                new_trend(jazz.id, "Vinyl sales", base_time()),
                new_trend(rock.id, "Vinyl sales", base_time()),
            ])
            .unwrap();

        assert_eq!(store.list_trends_with_genre().unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_is_atomic() {
        let store = create_test_store();
        let genre = store.ensure_genre("Jazz").unwrap();

        // Second row violates the foreign key, so the first must not persist.
        let result = store.upsert_trends(&[
            new_trend(genre.id, "Lo-fi revival", base_time()),
            new_trend(9999, "Orphan", base_time()),
        ]);
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.list_trends_for_genre(genre.id).unwrap().is_empty());
    }

    #[test]
    fn test_trends_listed_newest_first() {
        let store = create_test_store();
        let genre = store.ensure_genre("Jazz").unwrap();

        store
            .upsert_trends(&[
                new_trend(genre.id, "Oldest", base_time()),
                new_trend(genre.id, "Newest", base_time() + Duration::minutes(10)),
                new_trend(genre.id, "Middle", base_time() + Duration::minutes(5)),
            ])
            .unwrap();

        let names: Vec<String> = store
            .list_trends_for_genre(genre.id)
            .unwrap()
            .into_iter()
            .map(|t| t.trend_name)
            .collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let store = create_test_store();
        let genre = store.ensure_genre("Jazz").unwrap();

        store
            .upsert_trends(&[
                new_trend(genre.id, "First", base_time()),
                new_trend(genre.id, "Second", base_time()),
            ])
            .unwrap();

        let names: Vec<String> = store
            .list_trends_for_genre(genre.id)
            .unwrap()
            .into_iter()
            .map(|t| t.trend_name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_list_trends_with_genre_joins_name() {
        let store = create_test_store();
        let jazz = store.ensure_genre("Jazz").unwrap();
        let rock = store.ensure_genre("Rock").unwrap();

        store
            .upsert_trends(&[
                new_trend(jazz.id, "Lo-fi revival", base_time()),
                new_trend(rock.id, "Stadium tours", base_time() + Duration::minutes(1)),
            ])
            .unwrap();

        let rows = store.list_trends_with_genre().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].genre_name, "Rock");
        assert_eq!(rows[0].trend.trend_name, "Stadium tours");
        assert_eq!(rows[1].genre_name, "Jazz");
    }

    #[test]
    fn test_file_backed_store_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("trends.db");

        {
            let store = SqliteTrendStore::new(&db_path).unwrap();
            let genre = store.ensure_genre("Jazz").unwrap();
            store
                .upsert_trends(&[new_trend(genre.id, "Lo-fi revival", base_time())])
                .unwrap();
        }

        let store = SqliteTrendStore::new(&db_path).unwrap();
        let genre = store.get_genre_by_name("Jazz").unwrap();
        assert_eq!(store.list_trends_for_genre(genre.id).unwrap().len(), 1);
    }
}
