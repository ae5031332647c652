//! Real attribute backend over Unix extended attributes.

use super::AttributeStore;
use std::path::Path;
use tracing::debug;

/// Attribute store backed by Unix extended attributes.
///
/// Keys are namespaced under `user.` as Linux requires for unprivileged
/// attributes. Booleans are encoded as `"1"`/`"0"` payloads; any other
/// payload reads as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct XattrStore;

impl XattrStore {
    pub fn new() -> Self {
        Self
    }

    fn qualified(key: &str) -> String {
        format!("user.{key}")
    }

    fn read_raw(path: &Path, key: &str) -> Option<Vec<u8>> {
        match xattr::get(path, Self::qualified(key)) {
            Ok(value) => value,
            Err(e) => {
                debug!("xattr read failed on {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_raw(path: &Path, key: &str, value: &[u8]) -> bool {
        match xattr::set(path, Self::qualified(key), value) {
            Ok(()) => true,
            Err(e) => {
                debug!("xattr write failed on {}: {}", path.display(), e);
                false
            }
        }
    }
}

impl AttributeStore for XattrStore {
    fn get_bool(&self, path: &Path, key: &str) -> Option<bool> {
        match Self::read_raw(path, key)?.as_slice() {
            b"1" => Some(true),
            b"0" => Some(false),
            _ => None,
        }
    }

    fn set_bool(&self, path: &Path, key: &str, value: bool) -> bool {
        Self::write_raw(path, key, if value { b"1" } else { b"0" })
    }

    fn get_string(&self, path: &Path, key: &str) -> Option<String> {
        let raw = Self::read_raw(path, key)?;
        String::from_utf8(raw).ok()
    }

    fn set_string(&self, path: &Path, key: &str, value: &str) -> bool {
        Self::write_raw(path, key, value.as_bytes())
    }
}
