//! Extended-attribute store abstraction.
//!
//! The registry consumes out-of-band key/value metadata on filesystem paths
//! as an opaque capability. The trait below is that seam: the real backend
//! writes extended attributes via the `xattr` crate, and an in-process map
//! backend serves tests and platforms without xattr support.

mod memory;
#[cfg(unix)]
mod xattr;

pub use memory::MemoryAttributeStore;
#[cfg(unix)]
pub use xattr::XattrStore;

use crate::config::AttrConfig;
use std::path::Path;
use tracing::debug;

/// Out-of-band key/value metadata attachable to a filesystem path.
///
/// All operations are synchronous and best-effort. A `None` read or a
/// `false` write means "attribute absent or the filesystem does not support
/// the operation" — distinguishable from a successful read of a false or
/// empty value.
pub trait AttributeStore: Send + Sync {
    /// Read a boolean attribute. `None` means absent or unsupported.
    fn get_bool(&self, path: &Path, key: &str) -> Option<bool>;

    /// Write a boolean attribute. Returns whether the write succeeded.
    fn set_bool(&self, path: &Path, key: &str, value: bool) -> bool;

    /// Read a string attribute. `None` means absent or unsupported.
    fn get_string(&self, path: &Path, key: &str) -> Option<String>;

    /// Write a string attribute. Returns whether the write succeeded.
    fn set_string(&self, path: &Path, key: &str, value: &str) -> bool;
}

/// Probe whether the filesystem supports extended attributes.
///
/// Writes the boolean probe key to the fixed well-known path once at
/// startup. The result is treated as immutable for the process lifetime and
/// consulted before every attribute read/write, so unsupported filesystems
/// (Live ISOs in particular) never pay for attribute operations.
pub fn probe_support(store: &dyn AttributeStore) -> bool {
    let probe_path = Path::new(AttrConfig::SUPPORT_PROBE_PATH);
    let supported = store.set_bool(probe_path, AttrConfig::SUPPORT_PROBE_KEY, true);
    if supported {
        debug!(
            "Extended attributes are supported on {}; using them",
            AttrConfig::SUPPORT_PROBE_PATH
        );
    } else {
        debug!(
            "Extended attributes are not supported on {} \
             or writing them needs elevated permissions; system will be slower",
            AttrConfig::SUPPORT_PROBE_PATH
        );
    }
    supported
}
