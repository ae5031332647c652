//! launchdb core - durable registry of launchable application locations.
//!
//! This crate maintains a persistent set of application paths (bundle
//! directories and desktop-entry files) and enriches each live entry with a
//! cached "can-open" capability marker describing the content types it
//! declares it can handle. The registry survives restarts, tolerates entries
//! whose backing files have disappeared, and degrades gracefully on
//! filesystems without extended-attribute support.
//!
//! # Example
//!
//! ```rust,ignore
//! use launchdb_core::LaunchRegistry;
//! use std::path::Path;
//!
//! fn main() -> launchdb_core::Result<()> {
//!     let registry = LaunchRegistry::open()?;
//!
//!     // Reconcile a path against the registry (adds or removes it, and
//!     // caches its can-open capability when the filesystem allows).
//!     registry.handle_application(Path::new("/Applications/Editor.app"));
//!
//!     // Bundle entries first, desktop entries last.
//!     for path in registry.all_applications() {
//!         println!("{path}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod attrs;
pub mod capability;
pub mod config;
pub mod error;
pub mod platform;
pub mod registry;

// Re-export commonly used types
pub use attrs::{probe_support, AttributeStore, MemoryAttributeStore};
#[cfg(unix)]
pub use attrs::XattrStore;
pub use capability::{resolve_capability_source, AppKind, CapabilitySource};
pub use error::{LaunchError, Result};
pub use registry::RegistryStore;

use config::AttrConfig;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A registered application, as reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationEntry {
    /// Canonical filesystem path; primary key of the registry.
    pub path: String,
    /// Path class, derived from the suffix.
    pub kind: AppKind,
}

/// Main entry point: the registry of launchable applications.
///
/// Wraps the durable [`RegistryStore`] and an [`AttributeStore`]
/// collaborator. Whether the filesystem supports extended attributes is
/// probed once when the registry is opened and treated as immutable for the
/// process lifetime; when unsupported, capability resolution is disabled
/// entirely and only the path registry is maintained.
///
/// All failures are local: operations log and report failure or return
/// empty results, and nothing escalates to a panic.
pub struct LaunchRegistry {
    store: RegistryStore,
    attrs: Arc<dyn AttributeStore>,
    extattr_supported: bool,
}

impl LaunchRegistry {
    /// Open the registry at the default platform location with the real
    /// attribute backend, probing extended-attribute support once.
    pub fn open() -> Result<Self> {
        let store = RegistryStore::open()?;
        Ok(Self::assemble(store))
    }

    /// Open the registry at a specific database path with the real
    /// attribute backend.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        let store = RegistryStore::open_at(db_path)?;
        Ok(Self::assemble(store))
    }

    /// Build a registry from explicit parts.
    ///
    /// Lets tests and embedders supply their own attribute store and
    /// support flag without touching the real filesystem.
    pub fn with_parts(
        store: RegistryStore,
        attrs: Arc<dyn AttributeStore>,
        extattr_supported: bool,
    ) -> Self {
        Self {
            store,
            attrs,
            extattr_supported,
        }
    }

    fn assemble(store: RegistryStore) -> Self {
        let attrs = Self::default_attribute_store();
        let extattr_supported = probe_support(attrs.as_ref());
        Self {
            store,
            attrs,
            extattr_supported,
        }
    }

    #[cfg(unix)]
    fn default_attribute_store() -> Arc<dyn AttributeStore> {
        Arc::new(XattrStore::new())
    }

    #[cfg(not(unix))]
    fn default_attribute_store() -> Arc<dyn AttributeStore> {
        // No extended-attribute backend off Unix; the probe will report
        // unsupported and capability resolution stays disabled.
        Arc::new(MemoryAttributeStore::rejecting_writes())
    }

    /// Whether the backing store is reachable.
    pub fn is_open(&self) -> bool {
        self.store.count().is_ok()
    }

    /// Whether the filesystem supports extended attributes.
    pub fn extattr_supported(&self) -> bool {
        self.extattr_supported
    }

    /// Reconcile one path against the registry.
    ///
    /// Canonicalizes the path, removes it from the registry when it no
    /// longer exists on disk, inserts it when it does, and — filesystem
    /// permitting — resolves and caches its "can-open" capability marker.
    /// Every outcome is logged; nothing is returned and no failure
    /// escalates.
    pub fn handle_application(&self, path: &Path) {
        let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let canonical_str = canonical.to_string_lossy().to_string();

        if !(canonical.is_dir() || canonical.is_file()) {
            debug!("{} does not exist, removing from the registry", canonical_str);
            if let Err(e) = self.store.remove(&canonical_str) {
                warn!("Failed to remove {}: {}", canonical_str, e);
            }
            return;
        }

        // Best-effort registration; a failure here must not block
        // capability resolution.
        if let Err(e) = self.store.add(&canonical_str) {
            warn!("Failed to register {}: {}", canonical_str, e);
        }

        // Without extended attributes there is nowhere to cache the
        // capability, so there is nothing else to be done here.
        if !self.extattr_supported {
            return;
        }

        if self
            .attrs
            .get_string(&canonical, AttrConfig::CAN_OPEN_KEY)
            .is_some()
        {
            return; // marker already cached
        }

        let kind = AppKind::classify(&canonical);
        match resolve_capability_source(&canonical, kind, self.attrs.as_ref()) {
            CapabilitySource::AlreadyCached => {}
            CapabilitySource::NotFound => {
                debug!("No can-open source: {}", canonical_str);
            }
            CapabilitySource::Found(mime) if mime.is_empty() => {
                debug!("Empty can-open source: {}", canonical_str);
            }
            CapabilitySource::Found(mime) => {
                if self
                    .attrs
                    .set_string(&canonical, AttrConfig::CAN_OPEN_KEY, &mime)
                {
                    debug!("Set can-open attribute on {}", canonical_str);
                } else {
                    warn!("Cannot set can-open attribute on {}", canonical_str);
                }
            }
        }
    }

    /// Every registered path, desktop entries last.
    ///
    /// Returns an empty list on store failure (logged).
    pub fn all_applications(&self) -> Vec<String> {
        match self.store.list_all() {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to list applications: {}", e);
                Vec::new()
            }
        }
    }

    /// Every registered path with its class, desktop entries last.
    pub fn all_entries(&self) -> Vec<ApplicationEntry> {
        self.all_applications()
            .into_iter()
            .map(|path| {
                let kind = AppKind::classify(Path::new(&path));
                ApplicationEntry { path, kind }
            })
            .collect()
    }

    /// Point lookup by exact path equality.
    pub fn application_exists(&self, path: &str) -> bool {
        match self.store.exists(path) {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Failed to check {}: {}", path, e);
                false
            }
        }
    }

    /// Total number of registered applications.
    pub fn count(&self) -> usize {
        match self.store.count() {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count applications: {}", e);
                0
            }
        }
    }

    /// Delete every registered application. Reports whether the delete
    /// executed.
    pub fn remove_all_applications(&self) -> bool {
        match self.store.remove_all() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove all applications: {}", e);
                false
            }
        }
    }
}
