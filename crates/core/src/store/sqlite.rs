//! SQLite-backed package store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{apply_migrations, FavoriteRow, PackageStore, StoreError, TagRow, META_LAST_SYNC_TIME};
use crate::catalog::{Cask, Formula, PackageRecord, PackageType};

/// SQLite-backed package store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Live table, staging table and identity column for one catalog.
fn catalog_table(kind: PackageType) -> (&'static str, &'static str, &'static str) {
    match kind {
        PackageType::Formula => ("formulae", "formulae_staging", "name"),
        PackageType::Cask => ("casks", "casks_staging", "token"),
    }
}

fn catalog_table_ddl(table: &str, key_column: &str) -> String {
    format!(
        r#"CREATE TABLE {table} (
            {key_column} TEXT PRIMARY KEY,
            desc TEXT,
            version TEXT NOT NULL,
            homepage TEXT NOT NULL,
            dependencies TEXT NOT NULL,
            deprecated INTEGER NOT NULL DEFAULT 0,
            disabled INTEGER NOT NULL DEFAULT 0,
            record TEXT NOT NULL
        )"#
    )
}

impl SqliteStore {
    /// Open a store at the given path, creating the database file and
    /// running any pending schema migrations.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn stage_batch(
        &self,
        kind: PackageType,
        rows: Vec<(String, PackageRecord, String)>,
    ) -> Result<(), StoreError> {
        let (_, staging, key_column) = catalog_table(kind);
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT OR REPLACE INTO {staging}
                     ({key_column}, desc, version, homepage, dependencies, deprecated, disabled, record)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
                ))
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for (id, view, record_json) in &rows {
                let deps_json = serde_json::to_string(&view.dependencies)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                stmt.execute(params![
                    id,
                    &view.desc,
                    &view.version,
                    &view.homepage,
                    deps_json,
                    view.deprecated,
                    view.disabled,
                    record_json,
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    fn load_packages(
        conn: &Connection,
        kind: PackageType,
    ) -> Result<Vec<PackageRecord>, StoreError> {
        let (table, _, key_column) = catalog_table(kind);
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {key_column}, desc, version, homepage, dependencies, deprecated, disabled
                 FROM {table}"
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, bool>(6)?,
                ))
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, desc, version, homepage, deps_json, deprecated, disabled) =
                row.map_err(|e| StoreError::Database(e.to_string()))?;
            let dependencies = serde_json::from_str(&deps_json).map_err(|e| {
                StoreError::Corrupt(format!("dependencies of {kind} {id}: {e}"))
            })?;
            records.push(PackageRecord {
                id,
                package_type: kind,
                desc,
                version,
                homepage,
                dependencies,
                deprecated,
                disabled,
            });
        }
        Ok(records)
    }

    fn get_record_json(&self, kind: PackageType, id: &str) -> Result<Option<String>, StoreError> {
        let (table, _, key_column) = catalog_table(kind);
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT record FROM {table} WHERE {key_column} = ?"),
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn count(&self, kind: PackageType) -> Result<u64, StoreError> {
        let (table, _, _) = catalog_table(kind);
        let conn = self.conn.lock().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn row_to_favorite(row: &rusqlite::Row) -> rusqlite::Result<FavoriteRow> {
        let type_str: String = row.get(2)?;
        let package_type = PackageType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown package type: {type_str}").into(),
            )
        })?;
        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(FavoriteRow {
            id: row.get(0)?,
            package_id: row.get(1)?,
            package_type,
            created_at,
        })
    }

    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<TagRow> {
        let type_str: String = row.get(2)?;
        let package_type = PackageType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown package type: {type_str}").into(),
            )
        })?;
        let created_at_str: String = row.get(4)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(TagRow {
            id: row.get(0)?,
            package_id: row.get(1)?,
            package_type,
            tag: row.get(3)?,
            created_at,
        })
    }
}

impl PackageStore for SqliteStore {
    fn begin_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError> {
        let (_, staging, key_column) = catalog_table(kind);
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {staging}; {};",
            catalog_table_ddl(staging, key_column)
        ))
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn stage_formulae(&self, batch: &[Formula]) -> Result<(), StoreError> {
        let rows = batch
            .iter()
            .map(|f| {
                let record_json = serde_json::to_string(f)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok((f.name.clone(), PackageRecord::from(f), record_json))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.stage_batch(PackageType::Formula, rows)
    }

    fn stage_casks(&self, batch: &[Cask]) -> Result<(), StoreError> {
        let rows = batch
            .iter()
            .map(|c| {
                let record_json = serde_json::to_string(c)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                Ok((c.token.clone(), PackageRecord::from(c), record_json))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        self.stage_batch(PackageType::Cask, rows)
    }

    fn commit_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError> {
        let (table, staging, _) = catalog_table(kind);
        let mut conn = self.conn.lock().unwrap();
        // One transaction, so readers see either the old or the new
        // catalog; a failed swap rolls back and keeps the old table.
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.execute_batch(&format!(
            "DROP TABLE {table};
             ALTER TABLE {staging} RENAME TO {table};"
        ))
        .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    fn abort_catalog_replace(&self, kind: PackageType) -> Result<(), StoreError> {
        let (_, staging, _) = catalog_table(kind);
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {staging};"))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn all_packages(&self) -> Result<Vec<PackageRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut records = Self::load_packages(&conn, PackageType::Formula)?;
        records.extend(Self::load_packages(&conn, PackageType::Cask)?);
        Ok(records)
    }

    fn get_formula(&self, name: &str) -> Result<Option<Formula>, StoreError> {
        match self.get_record_json(PackageType::Formula, name)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(format!("formula {name}: {e}"))),
            None => Ok(None),
        }
    }

    fn get_cask(&self, token: &str) -> Result<Option<Cask>, StoreError> {
        match self.get_record_json(PackageType::Cask, token)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::Corrupt(format!("cask {token}: {e}"))),
            None => Ok(None),
        }
    }

    fn formula_count(&self) -> Result<u64, StoreError> {
        self.count(PackageType::Formula)
    }

    fn cask_count(&self) -> Result<u64, StoreError> {
        self.count(PackageType::Cask)
    }

    fn last_sync_time(&self) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?",
                params![META_LAST_SYNC_TIME],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(value.and_then(|v| v.parse().ok()))
    }

    fn set_last_sync_time(&self, millis: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?, ?)",
            params![META_LAST_SYNC_TIME, millis.to_string()],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn list_favorites(&self) -> Result<Vec<FavoriteRow>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, package_id, package_type, created_at FROM favorites")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_favorite)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(favorites)
    }

    fn insert_favorite(
        &self,
        package_id: &str,
        package_type: PackageType,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO favorites (id, package_id, package_type, created_at)
                 VALUES (?, ?, ?, ?)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    package_id,
                    package_type.as_str(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(inserted > 0)
    }

    fn delete_favorite(
        &self,
        package_id: &str,
        package_type: PackageType,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute(
                "DELETE FROM favorites WHERE package_id = ? AND package_type = ?",
                params![package_id, package_type.as_str()],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn list_tags(&self) -> Result<Vec<TagRow>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, package_id, package_type, tag, created_at FROM tags")
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_tag)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(tags)
    }

    fn insert_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO tags (id, package_id, package_type, tag, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    package_id,
                    package_type.as_str(),
                    tag,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(inserted > 0)
    }

    fn delete_tag(
        &self,
        package_id: &str,
        package_type: PackageType,
        tag: &str,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute(
                "DELETE FROM tags WHERE package_id = ? AND package_type = ? AND tag = ?",
                params![package_id, package_type.as_str(), tag],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn count_rows_with_tag(&self, tag: &str) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM tags WHERE tag = ?",
            params![tag],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn rename_tag_rows(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        // Single UPDATE, so the rename is all-or-nothing.
        let renamed = conn
            .execute("UPDATE tags SET tag = ? WHERE tag = ?", params![new, old])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(renamed as u64)
    }

    fn delete_tag_rows(&self, tag: &str) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM tags WHERE tag = ?", params![tag])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(deleted as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DependencyKind, FormulaVersions};

    fn create_test_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    fn sample_formula(name: &str, desc: &str) -> Formula {
        Formula {
            name: name.to_string(),
            full_name: name.to_string(),
            tap: "homebrew/core".to_string(),
            desc: Some(desc.to_string()),
            homepage: format!("https://example.com/{name}"),
            versions: FormulaVersions {
                stable: Some("1.0.0".to_string()),
                ..Default::default()
            },
            dependencies: vec!["openssl@3".to_string()],
            build_dependencies: vec!["pkgconf".to_string()],
            ..Default::default()
        }
    }

    fn sample_cask(token: &str, desc: &str) -> Cask {
        Cask {
            token: token.to_string(),
            full_token: token.to_string(),
            tap: "homebrew/cask".to_string(),
            desc: Some(desc.to_string()),
            homepage: format!("https://example.com/{token}"),
            version: "2.0.0".to_string(),
            ..Default::default()
        }
    }

    fn replace_formulae(store: &SqliteStore, formulae: &[Formula]) {
        store.begin_catalog_replace(PackageType::Formula).unwrap();
        store.stage_formulae(formulae).unwrap();
        store.commit_catalog_replace(PackageType::Formula).unwrap();
    }

    fn replace_casks(store: &SqliteStore, casks: &[Cask]) {
        store.begin_catalog_replace(PackageType::Cask).unwrap();
        store.stage_casks(casks).unwrap();
        store.commit_catalog_replace(PackageType::Cask).unwrap();
    }

    #[test]
    fn test_empty_store_counts() {
        let store = create_test_store();
        assert_eq!(store.formula_count().unwrap(), 0);
        assert_eq!(store.cask_count().unwrap(), 0);
        assert!(store.all_packages().unwrap().is_empty());
    }

    #[test]
    fn test_replace_and_read_back() {
        let store = create_test_store();
        replace_formulae(
            &store,
            &[
                sample_formula("wget", "Internet file retriever"),
                sample_formula("curl", "transfer a URL"),
            ],
        );
        replace_casks(&store, &[sample_cask("firefox", "Web browser")]);

        assert_eq!(store.formula_count().unwrap(), 2);
        assert_eq!(store.cask_count().unwrap(), 1);

        let formula = store.get_formula("wget").unwrap().unwrap();
        assert_eq!(formula.desc.as_deref(), Some("Internet file retriever"));
        assert_eq!(formula.tap, "homebrew/core");

        let cask = store.get_cask("firefox").unwrap().unwrap();
        assert_eq!(cask.version, "2.0.0");
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = create_test_store();
        assert!(store.get_formula("nonexistent").unwrap().is_none());
        assert!(store.get_cask("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_staged_records_invisible_until_commit() {
        let store = create_test_store();
        replace_formulae(&store, &[sample_formula("old", "old catalog")]);

        store.begin_catalog_replace(PackageType::Formula).unwrap();
        store
            .stage_formulae(&[sample_formula("new", "new catalog")])
            .unwrap();

        // Readers still see the previous catalog.
        assert_eq!(store.formula_count().unwrap(), 1);
        assert!(store.get_formula("old").unwrap().is_some());
        assert!(store.get_formula("new").unwrap().is_none());

        store.commit_catalog_replace(PackageType::Formula).unwrap();

        assert_eq!(store.formula_count().unwrap(), 1);
        assert!(store.get_formula("old").unwrap().is_none());
        assert!(store.get_formula("new").unwrap().is_some());
    }

    #[test]
    fn test_abort_leaves_live_catalog_intact() {
        let store = create_test_store();
        replace_formulae(&store, &[sample_formula("wget", "keeper")]);

        store.begin_catalog_replace(PackageType::Formula).unwrap();
        store
            .stage_formulae(&[sample_formula("doomed", "never committed")])
            .unwrap();
        store.abort_catalog_replace(PackageType::Formula).unwrap();

        assert_eq!(store.formula_count().unwrap(), 1);
        assert!(store.get_formula("wget").unwrap().is_some());
    }

    #[test]
    fn test_commit_without_begin_fails() {
        let store = create_test_store();
        let result = store.commit_catalog_replace(PackageType::Formula);
        assert!(matches!(result, Err(StoreError::Database(_))));
        // The failed batch must not have dropped the live table.
        assert_eq!(store.formula_count().unwrap(), 0);
    }

    #[test]
    fn test_replace_preserves_user_metadata() {
        let store = create_test_store();
        replace_formulae(&store, &[sample_formula("wget", "v1")]);
        store
            .insert_favorite("wget", PackageType::Formula)
            .unwrap();
        store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap();

        replace_formulae(&store, &[sample_formula("wget", "v2")]);

        assert_eq!(store.list_favorites().unwrap().len(), 1);
        assert_eq!(store.list_tags().unwrap().len(), 1);
    }

    #[test]
    fn test_all_packages_unified_view() {
        let store = create_test_store();
        replace_formulae(&store, &[sample_formula("wget", "Internet file retriever")]);
        replace_casks(&store, &[sample_cask("firefox", "Web browser")]);

        let mut packages = store.all_packages().unwrap();
        packages.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].id, "firefox");
        assert_eq!(packages[0].package_type, PackageType::Cask);
        assert_eq!(packages[1].id, "wget");
        assert_eq!(packages[1].dependencies.len(), 2);
        assert_eq!(packages[1].dependencies[0].kind, DependencyKind::Runtime);
        assert_eq!(packages[1].dependencies[1].kind, DependencyKind::Build);
    }

    #[test]
    fn test_last_sync_time_roundtrip() {
        let store = create_test_store();
        assert!(store.last_sync_time().unwrap().is_none());

        store.set_last_sync_time(1_722_000_000_000).unwrap();
        assert_eq!(store.last_sync_time().unwrap(), Some(1_722_000_000_000));

        store.set_last_sync_time(1_722_000_999_999).unwrap();
        assert_eq!(store.last_sync_time().unwrap(), Some(1_722_000_999_999));
    }

    #[test]
    fn test_favorite_insert_is_unique_per_package() {
        let store = create_test_store();
        assert!(store
            .insert_favorite("wget", PackageType::Formula)
            .unwrap());
        assert!(!store
            .insert_favorite("wget", PackageType::Formula)
            .unwrap());
        // Same id, different type, is a distinct favorite.
        assert!(store.insert_favorite("wget", PackageType::Cask).unwrap());

        assert_eq!(store.list_favorites().unwrap().len(), 2);
    }

    #[test]
    fn test_favorite_delete() {
        let store = create_test_store();
        store
            .insert_favorite("wget", PackageType::Formula)
            .unwrap();

        assert!(store
            .delete_favorite("wget", PackageType::Formula)
            .unwrap());
        assert!(!store
            .delete_favorite("wget", PackageType::Formula)
            .unwrap());
        assert!(store.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_tag_insert_is_unique_per_package_and_text() {
        let store = create_test_store();
        assert!(store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap());
        assert!(!store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap());
        // Tag text is case-sensitive in storage.
        assert!(store
            .insert_tag("wget", PackageType::Formula, "CLI")
            .unwrap());

        assert_eq!(store.list_tags().unwrap().len(), 2);
    }

    #[test]
    fn test_count_rows_with_tag() {
        let store = create_test_store();
        store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap();
        store
            .insert_tag("curl", PackageType::Formula, "cli")
            .unwrap();
        store
            .insert_tag("wget", PackageType::Formula, "net")
            .unwrap();

        assert_eq!(store.count_rows_with_tag("cli").unwrap(), 2);
        assert_eq!(store.count_rows_with_tag("net").unwrap(), 1);
        assert_eq!(store.count_rows_with_tag("missing").unwrap(), 0);
    }

    #[test]
    fn test_rename_tag_rows_rewrites_every_row() {
        let store = create_test_store();
        store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap();
        store
            .insert_tag("curl", PackageType::Formula, "cli")
            .unwrap();
        store
            .insert_tag("firefox", PackageType::Cask, "gui")
            .unwrap();

        let renamed = store.rename_tag_rows("cli", "cmdline").unwrap();
        assert_eq!(renamed, 2);
        assert_eq!(store.count_rows_with_tag("cli").unwrap(), 0);
        assert_eq!(store.count_rows_with_tag("cmdline").unwrap(), 2);
        assert_eq!(store.count_rows_with_tag("gui").unwrap(), 1);
    }

    #[test]
    fn test_delete_tag_rows() {
        let store = create_test_store();
        store
            .insert_tag("wget", PackageType::Formula, "cli")
            .unwrap();
        store
            .insert_tag("curl", PackageType::Formula, "cli")
            .unwrap();

        assert_eq!(store.delete_tag_rows("cli").unwrap(), 2);
        assert!(store.list_tags().unwrap().is_empty());
        assert_eq!(store.delete_tag_rows("cli").unwrap(), 0);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brewdex.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            replace_formulae(&store, &[sample_formula("wget", "persisted")]);
            store
                .insert_favorite("wget", PackageType::Formula)
                .unwrap();
            store.set_last_sync_time(42).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.formula_count().unwrap(), 1);
        assert_eq!(store.list_favorites().unwrap().len(), 1);
        assert_eq!(store.last_sync_time().unwrap(), Some(42));
    }
}
