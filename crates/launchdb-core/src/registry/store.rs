//! SQLite-backed store for known application paths.

use crate::config::{PathClass, RegistryConfig};
use crate::error::{LaunchError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// SQLite-backed durable set of application paths.
///
/// Uses WAL mode for safe concurrent access across processes and
/// `Arc<Mutex<Connection>>` for thread safety within a process.
pub struct RegistryStore {
    conn: Arc<Mutex<Connection>>,
}

impl RegistryStore {
    /// Open the store at the default platform location.
    ///
    /// Creates the database and parent directories if they don't exist.
    pub fn open() -> Result<Self> {
        let db_path = crate::platform::launch_db_path()?;
        Self::open_at(&db_path)
    }

    /// Open the store at a specific path.
    ///
    /// Creates the database and parent directories if they don't exist.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| LaunchError::Io {
                    message: format!(
                        "Failed to create registry directory: {}",
                        parent.display()
                    ),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let conn = Connection::open(db_path)?;
        Self::configure_connection(&conn)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_schema()?;

        Ok(store)
    }

    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA busy_timeout={};\n\
             PRAGMA synchronous=NORMAL;",
            RegistryConfig::BUSY_TIMEOUT_MS,
        ))?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| LaunchError::Database {
            message: "Failed to acquire registry connection lock".to_string(),
            source: None,
        })
    }

    /// Idempotently create the backing table.
    ///
    /// Returns whether this call performed the creation; `false` means the
    /// table already existed. Callers must not treat the return value as a
    /// health signal — a pre-existing table is the normal steady state.
    pub fn ensure_schema(&self) -> Result<bool> {
        let conn = self.lock_conn()?;

        let pre_existing: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'applications'",
                [],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS applications (
                path TEXT PRIMARY KEY
            );",
        )?;

        Ok(!pre_existing)
    }

    /// Insert a path into the registry.
    ///
    /// Idempotent: inserting an already-present path leaves the row in place
    /// and still reports success. The empty path is rejected and reports
    /// failure without touching the table.
    pub fn add(&self, path: &str) -> Result<bool> {
        if path.is_empty() {
            warn!("add application failed: path cannot be empty");
            return Ok(false);
        }

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO applications (path) VALUES (?1)",
            params![path],
        )?;

        Ok(true)
    }

    /// Remove a path from the registry.
    ///
    /// Returns `Ok(true)` only when the row existed and the delete executed;
    /// removing an absent path is a no-op reporting `Ok(false)`. The
    /// existence check deliberately precedes the delete rather than relying
    /// on the delete affecting zero rows, and both run under one connection
    /// lock so concurrent removers cannot both observe the row.
    pub fn remove(&self, path: &str) -> Result<bool> {
        let conn = self.lock_conn()?;

        let found: bool = conn
            .query_row(
                "SELECT 1 FROM applications WHERE path = ?1 LIMIT 1",
                params![path],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !found {
            return Ok(false);
        }

        conn.execute(
            "DELETE FROM applications WHERE path = ?1",
            params![path],
        )?;
        debug!("Removed application: {}", path);

        Ok(true)
    }

    /// Point lookup by exact path equality.
    ///
    /// No normalization is performed here; callers must canonicalize first.
    pub fn exists(&self, path: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let found: bool = conn
            .query_row(
                "SELECT 1 FROM applications WHERE path = ?1 LIMIT 1",
                params![path],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        Ok(found)
    }

    /// Total number of registered paths.
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    /// List every registered path, desktop entries last.
    ///
    /// Two passes over the table: everything not ending in `.desktop` first,
    /// then the `.desktop` rows. Desktop entries are a lower-priority
    /// fallback class of launchable, so they must always sort after bundle
    /// entries when a caller later picks the first result for a content
    /// type. Relative order within each group is engine-defined.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let pattern = format!("%{}", PathClass::DESKTOP_SUFFIX);

        let mut results = Vec::new();
        let mut stmt =
            conn.prepare("SELECT path FROM applications WHERE path NOT LIKE ?1")?;
        let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;
        for row in rows {
            results.push(row?);
        }
        drop(stmt);

        let mut stmt = conn.prepare("SELECT path FROM applications WHERE path LIKE ?1")?;
        let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }

    /// Unconditionally delete every row.
    pub fn remove_all(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM applications", [])?;
        debug!("Removed all applications from the registry");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (RegistryStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test-launch.db");
        let store = RegistryStore::open_at(&db_path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_add_then_exists() {
        let (store, _temp) = create_test_store();

        assert!(store.add("/Applications/Editor.app").unwrap());
        assert!(store.exists("/Applications/Editor.app").unwrap());
    }

    #[test]
    fn test_add_empty_path_fails() {
        let (store, _temp) = create_test_store();

        assert!(!store.add("").unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_add_duplicate_is_idempotent() {
        let (store, _temp) = create_test_store();

        assert!(store.add("/Applications/Editor.app").unwrap());
        assert!(store.add("/Applications/Editor.app").unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_absent_path_reports_false() {
        let (store, _temp) = create_test_store();

        assert!(!store.remove("/never/registered").unwrap());
        assert!(!store.exists("/never/registered").unwrap());
    }

    #[test]
    fn test_remove_then_exists_is_false() {
        let (store, _temp) = create_test_store();

        store.add("/Applications/Editor.app").unwrap();
        assert!(store.remove("/Applications/Editor.app").unwrap());
        assert!(!store.exists("/Applications/Editor.app").unwrap());
    }

    #[test]
    fn test_exists_is_exact_match_only() {
        let (store, _temp) = create_test_store();

        store.add("/Applications/Editor.app").unwrap();
        assert!(!store.exists("/Applications/Editor.app/").unwrap());
        assert!(!store.exists("/applications/editor.app").unwrap());
    }

    #[test]
    fn test_count_after_remove_all_is_zero() {
        let (store, _temp) = create_test_store();

        store.add("/a/x.desktop").unwrap();
        store.add("/a/y.app").unwrap();
        assert_eq!(store.count().unwrap(), 2);

        store.remove_all().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_all_sorts_desktop_entries_last() {
        let (store, _temp) = create_test_store();

        store.add("/a/x.desktop").unwrap();
        store.add("/a/y.app").unwrap();
        store.add("/a/z").unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 3);
        // Partition boundary: non-.desktop entries first, .desktop entries
        // last. Order within each group is engine-defined.
        assert!(listed[..2].contains(&"/a/y.app".to_string()));
        assert!(listed[..2].contains(&"/a/z".to_string()));
        assert_eq!(listed[2], "/a/x.desktop");
    }

    #[test]
    fn test_ensure_schema_reports_creation_once() {
        let (store, _temp) = create_test_store();

        // open_at already created the table
        assert!(!store.ensure_schema().unwrap());
    }

    #[test]
    fn test_schema_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("persist.db");

        {
            let store = RegistryStore::open_at(&db_path).unwrap();
            store.add("/a/y.app").unwrap();
        }

        let store = RegistryStore::open_at(&db_path).unwrap();
        assert!(store.exists("/a/y.app").unwrap());
    }

    #[test]
    fn test_concurrent_removers_only_one_observes_the_row() {
        let (store, _temp) = create_test_store();
        store.add("/Applications/Editor.app").unwrap();

        let store = std::sync::Arc::new(store);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.remove("/Applications/Editor.app").unwrap())
            })
            .collect();

        let removed: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&r| r)
            .count();

        // The check and the delete run under one lock, so exactly one
        // remover sees the row.
        assert_eq!(removed, 1);
        assert!(!store.exists("/Applications/Editor.app").unwrap());
    }

    #[test]
    fn test_two_stores_same_db_concurrent_access() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("shared.db");

        let store1 = RegistryStore::open_at(&db_path).unwrap();
        let store2 = RegistryStore::open_at(&db_path).unwrap();

        store1.add("/a/y.app").unwrap();
        assert!(store2.exists("/a/y.app").unwrap());
    }
}
