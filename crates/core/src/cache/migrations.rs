//! Versioned schema migrations for the key-value store.
//!
//! Applied versions are recorded in `_migrations`; only newer ones run.

use super::Error;
use tokio_rusqlite::{Connection, params, rusqlite};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Applied in order. Every statement uses `IF NOT EXISTS`.
const MIGRATIONS: &[Migration] = &[
    Migration { version: 1, name: "kv_store", sql: include_str!("../../migrations/001_kv_store.sql") },
    Migration {
        version: 2,
        name: "kv_store_updated_at_index",
        sql: include_str!("../../migrations/002_kv_store_updated_at_index.sql"),
    },
];

/// Newest schema version this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

fn applied_version(conn: &rusqlite::Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))
}

/// Bring the schema up to [`latest_version`].
///
/// A database written by a newer build is left alone and reported as an error.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current = applied_version(conn)?;
        if current > latest_version() {
            return Err(Error::MigrationFailed(format!(
                "database is at schema version {current}, this build supports up to {}",
                latest_version()
            )));
        }

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            tracing::debug!(version = migration.version, name = migration.name, "applying store migration");
            conn.execute_batch(migration.sql)
                .map_err(|e| Error::MigrationFailed(format!("{}: {e}", migration.name)))?;
            conn.execute(
                "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
                params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
            )?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

/// Schema version recorded in the database.
pub async fn current_version(conn: &Connection) -> Result<i64, Error> {
    conn.call(|conn| -> Result<i64, Error> { Ok(applied_version(conn)?) })
        .await
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        let has_kv_store: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='kv_store')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_kv_store);
        assert_eq!(current_version(&conn).await.unwrap(), latest_version());
    }

    #[tokio::test]
    async fn test_each_migration_recorded_once() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        let names: Vec<String> = conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT name FROM _migrations ORDER BY version")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await
            .unwrap();

        assert_eq!(names, vec!["kv_store", "kv_store_updated_at_index"]);
    }

    #[tokio::test]
    async fn test_newer_schema_rejected() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        let future = latest_version() + 1;
        conn.call(move |conn| {
            conn.execute(
                "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, 'future', '2030-01-01T00:00:00Z')",
                params![future],
            )
        })
        .await
        .unwrap();

        assert!(matches!(run(&conn).await, Err(Error::MigrationFailed(_))));
    }
}
