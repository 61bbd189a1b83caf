//! Ordered schema migrations for the local store.
//!
//! Each migration is a pure SQL step keyed by the schema version it
//! produces. At open time every step newer than the database's
//! `user_version` is applied in order, so an older on-disk schema is
//! upgraded before the first query runs.

use rusqlite::Connection;

use super::StoreError;

/// A single migration step.
pub struct Migration {
    /// Schema version this step upgrades the database to.
    pub version: u32,
    pub sql: &'static str,
}

/// All known migrations, ascending by version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: r#"
            -- Mirrored catalog tables, replaced wholesale on each sync.
            CREATE TABLE formulae (
                name TEXT PRIMARY KEY,
                desc TEXT,
                version TEXT NOT NULL,
                homepage TEXT NOT NULL,
                dependencies TEXT NOT NULL,
                deprecated INTEGER NOT NULL DEFAULT 0,
                disabled INTEGER NOT NULL DEFAULT 0,
                record TEXT NOT NULL
            );

            CREATE TABLE casks (
                token TEXT PRIMARY KEY,
                desc TEXT,
                version TEXT NOT NULL,
                homepage TEXT NOT NULL,
                dependencies TEXT NOT NULL,
                deprecated INTEGER NOT NULL DEFAULT 0,
                disabled INTEGER NOT NULL DEFAULT 0,
                record TEXT NOT NULL
            );

            -- User metadata, never touched by sync.
            CREATE TABLE favorites (
                id TEXT PRIMARY KEY,
                package_id TEXT NOT NULL,
                package_type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(package_id, package_type)
            );

            CREATE INDEX idx_favorites_type ON favorites(package_type);

            CREATE TABLE tags (
                id TEXT PRIMARY KEY,
                package_id TEXT NOT NULL,
                package_type TEXT NOT NULL,
                tag TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(package_id, package_type, tag)
            );

            CREATE INDEX idx_tags_package ON tags(package_id, package_type);

            CREATE TABLE meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
    },
    Migration {
        version: 2,
        sql: r#"
            -- Tag existence checks count remaining rows by text.
            CREATE INDEX idx_tags_tag ON tags(tag);
            "#,
    },
];

/// Latest schema version produced by [`MIGRATIONS`].
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Apply every migration newer than the database's current version.
pub fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::Database(e.to_string()))?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        conn.execute_batch(migration.sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        conn.pragma_update(None, "user_version", migration.version)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tracing::debug!("Applied store migration to version {}", migration.version);
    }

    Ok(())
}
