//! In-process attribute backend for tests and no-xattr platforms.

use super::AttributeStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum AttrValue {
    Bool(bool),
    Text(String),
}

/// Attribute store backed by an in-process map.
///
/// Counts reads and writes so tests can assert that cached markers are
/// never overwritten and that attribute I/O is skipped entirely when the
/// filesystem support flag is off. A store constructed with
/// [`rejecting_writes`] refuses every write, modelling a filesystem without
/// extended-attribute support.
///
/// [`rejecting_writes`]: MemoryAttributeStore::rejecting_writes
#[derive(Debug, Default)]
pub struct MemoryAttributeStore {
    entries: Mutex<HashMap<(PathBuf, String), AttrValue>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    reject_writes: bool,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store on which every write fails, as on a no-xattr filesystem.
    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    /// Total number of read attempts (bool and string), hits and misses.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Total number of successful writes (bool and string).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn insert(&self, path: &Path, key: &str, value: AttrValue) -> bool {
        if self.reject_writes {
            return false;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return false;
        };
        entries.insert((path.to_path_buf(), key.to_string()), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn lookup(&self, path: &Path, key: &str) -> Option<AttrValue> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .ok()?
            .get(&(path.to_path_buf(), key.to_string()))
            .cloned()
    }
}

impl AttributeStore for MemoryAttributeStore {
    fn get_bool(&self, path: &Path, key: &str) -> Option<bool> {
        match self.lookup(path, key)? {
            AttrValue::Bool(b) => Some(b),
            AttrValue::Text(_) => None,
        }
    }

    fn set_bool(&self, path: &Path, key: &str, value: bool) -> bool {
        self.insert(path, key, AttrValue::Bool(value))
    }

    fn get_string(&self, path: &Path, key: &str) -> Option<String> {
        match self.lookup(path, key)? {
            AttrValue::Text(s) => Some(s),
            AttrValue::Bool(_) => None,
        }
    }

    fn set_string(&self, path: &Path, key: &str, value: &str) -> bool {
        self.insert(path, key, AttrValue::Text(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_attribute_is_none() {
        let store = MemoryAttributeStore::new();
        assert_eq!(store.get_string(Path::new("/a"), "can-open"), None);
    }

    #[test]
    fn test_empty_string_is_distinguishable_from_absent() {
        let store = MemoryAttributeStore::new();
        assert!(store.set_string(Path::new("/a"), "can-open", ""));
        assert_eq!(
            store.get_string(Path::new("/a"), "can-open"),
            Some(String::new())
        );
    }

    #[test]
    fn test_false_bool_is_distinguishable_from_absent() {
        let store = MemoryAttributeStore::new();
        assert!(store.set_bool(Path::new("/a"), "flag", false));
        assert_eq!(store.get_bool(Path::new("/a"), "flag"), Some(false));
    }

    #[test]
    fn test_write_count_tracks_successful_writes() {
        let store = MemoryAttributeStore::new();
        store.set_string(Path::new("/a"), "can-open", "text/plain;");
        store.set_bool(Path::new("/b"), "flag", true);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_read_count_tracks_hits_and_misses() {
        let store = MemoryAttributeStore::new();
        store.set_string(Path::new("/a"), "can-open", "text/plain;");

        assert!(store.get_string(Path::new("/a"), "can-open").is_some());
        assert!(store.get_string(Path::new("/b"), "can-open").is_none());
        assert!(store.get_bool(Path::new("/a"), "flag").is_none());
        assert_eq!(store.read_count(), 3);
    }

    #[test]
    fn test_rejecting_store_fails_writes_and_counts_none() {
        let store = MemoryAttributeStore::rejecting_writes();
        assert!(!store.set_string(Path::new("/a"), "can-open", "x"));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get_string(Path::new("/a"), "can-open"), None);
    }
}
