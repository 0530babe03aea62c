//! Durable key-value preferences.
//!
//! The only thing Forward Together remembers between runs is the interface
//! language. [`Preferences`] hides whether that lives in a WAL-mode SQLite
//! file or, when no database is available (tests, read-only home directory),
//! in process memory.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::error::StoreError;

/// Opens (or creates) the preference database at `path`, configures WAL mode,
/// and applies schema migrations.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL
/// configuration fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    conn.call(crate::schema::migrate).await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Where preferences are read from and written to.
pub enum Preferences {
    /// Persisted in the SQLite `preferences` table.
    Sqlite(Connection),
    /// Held for the lifetime of the process only.
    Memory(Mutex<HashMap<String, String>>),
}

impl Preferences {
    /// Opens the SQLite-backed store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrated.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self::Sqlite(open_db(path).await?))
    }

    /// An empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory(Mutex::new(HashMap::new()))
    }

    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the SQLite query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Preferences::Sqlite(conn) => {
                let key = key.to_owned();
                let value = conn
                    .call(move |db| {
                        db.query_row(
                            "SELECT value FROM preferences WHERE key = ?1",
                            rusqlite::params![&key],
                            |r| r.get::<_, String>(0),
                        )
                        .optional()
                    })
                    .await?;
                Ok(value)
            }
            Preferences::Memory(map) => {
                let map = map.lock().unwrap_or_else(PoisonError::into_inner);
                Ok(map.get(key).cloned())
            }
        }
    }

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// The SQLite path upserts inside `BEGIN IMMEDIATE` and stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write transaction fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Preferences::Sqlite(conn) => {
                let key = key.to_owned();
                let value = value.to_owned();
                conn.call(move |db| {
                    let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
                    tx.execute(
                        "INSERT INTO preferences (key, value, updated_at)
                         VALUES (?1, ?2, ?3)
                         ON CONFLICT(key)
                         DO UPDATE SET value = excluded.value,
                                       updated_at = excluded.updated_at",
                        rusqlite::params![&key, &value, now_secs()],
                    )?;
                    tx.commit()?;
                    Ok::<_, rusqlite::Error>(())
                })
                .await?;
                Ok(())
            }
            Preferences::Memory(map) => {
                let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
                map.insert(key.to_owned(), value.to_owned());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_overwrites() {
        let prefs = Preferences::memory();
        assert_eq!(prefs.get("language").await.unwrap(), None);
        prefs.set("language", "es").await.unwrap();
        prefs.set("language", "en").await.unwrap();
        assert_eq!(prefs.get("language").await.unwrap().as_deref(), Some("en"));
    }
}
