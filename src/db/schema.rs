// Database schema: table creation and migrations.
//
// Same approach as always: a `schema_version` table tracks which migrations
// have run, and each migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent, safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per SOS event, never updated after insert
        CREATE TABLE IF NOT EXISTS sos_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            timestamp INTEGER NOT NULL,        -- epoch milliseconds
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            speed REAL NOT NULL DEFAULT 0,     -- m/s
            accuracy REAL,                     -- meters
            danger_score INTEGER NOT NULL,     -- 0 to 100
            danger_level TEXT NOT NULL,        -- SAFE / CAUTION / HIGH
            danger_reasons TEXT NOT NULL,      -- JSON array, evaluation order
            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- People to alert, per user
        CREATE TABLE IF NOT EXISTS contacts (
            user_id TEXT NOT NULL,
            id TEXT NOT NULL,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            is_emergency INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (user_id, id)
        );
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: index the history lookup (per user, newest first).
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_sos_logs_user_time
                ON sos_logs(user_id, timestamp DESC);",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
