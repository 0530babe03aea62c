//! Integration test for the persisted language preference.
//!
//! Exercises: open_db, migrate, Preferences::{open, get, set},
//! LocaleResolver::{restore, set_locale}.

use std::sync::Arc;

use forward_together_core::{db, locale::LANGUAGE_KEY, ContentStore, Locale, LocaleResolver, Preferences};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("preferences.db");
    path.to_string_lossy().to_string()
}

fn content() -> Arc<ContentStore> {
    Arc::new(ContentStore::embedded().unwrap())
}

#[tokio::test]
async fn schema_and_wal_are_set_up() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let rows: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("SELECT COUNT(*) FROM preferences", [], |r| {
                r.get(0)
            })?)
        })
        .await
        .unwrap();
    assert_eq!(rows, 0, "a fresh database has no preferences");
    drop(conn);

    // Reopening does not re-run migrations.
    let conn = db::open_db(&path).await.unwrap();
    let versions: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("SELECT COUNT(*) FROM schema_version", [], |r| {
                r.get(0)
            })?)
        })
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn language_survives_restart() {
    let path = temp_db_path();

    {
        let prefs = Preferences::open(&path).await.unwrap();
        let mut resolver = LocaleResolver::restore(content(), prefs, Locale::En).await;
        assert_eq!(resolver.current(), Locale::En);
        assert!(resolver.set_locale("es").await);
    }

    let prefs = Preferences::open(&path).await.unwrap();
    assert_eq!(prefs.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("es"));
    let resolver = LocaleResolver::restore(content(), prefs, Locale::En).await;
    assert_eq!(resolver.current(), Locale::Es);
    assert_eq!(resolver.t("nav.home"), "Inicio");
}

#[tokio::test]
async fn overwrites_keep_a_single_row() {
    let path = temp_db_path();
    let prefs = Preferences::open(&path).await.unwrap();
    prefs.set(LANGUAGE_KEY, "es").await.unwrap();
    prefs.set(LANGUAGE_KEY, "en").await.unwrap();
    assert_eq!(prefs.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("en"));

    let Preferences::Sqlite(conn) = &prefs else {
        panic!("expected a SQLite-backed store");
    };
    let rows: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("SELECT COUNT(*) FROM preferences", [], |r| {
                r.get(0)
            })?)
        })
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn unsupported_persisted_value_falls_back_to_default() {
    let path = temp_db_path();
    let prefs = Preferences::open(&path).await.unwrap();
    prefs.set(LANGUAGE_KEY, "de").await.unwrap();

    let resolver = LocaleResolver::restore(content(), prefs, Locale::Es).await;
    assert_eq!(resolver.current(), Locale::Es);
}
