//! Capability source lookup for launchable application paths.
//!
//! Determines the "can-open" mime list an application declares, reading it
//! from the declarative source appropriate to the path's class: a sidecar
//! file inside a bundle, or the `MimeType=` field of a desktop-entry file.

use crate::attrs::AttributeStore;
use crate::config::{AttrConfig, PathClass};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Class of a launchable application path, determined once from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    /// Directory-based application package (`.app`).
    Bundle,
    /// Declarative key=value launcher file (`.desktop`).
    DesktopEntry,
    /// Reserved for future bundle formats; no capability source yet.
    Unknown,
}

impl AppKind {
    /// Classify a canonical path by its suffix.
    pub fn classify(path: &Path) -> Self {
        let s = path.to_string_lossy();
        if s.ends_with(PathClass::BUNDLE_SUFFIX) {
            AppKind::Bundle
        } else if s.ends_with(PathClass::DESKTOP_SUFFIX) {
            AppKind::DesktopEntry
        } else {
            AppKind::Unknown
        }
    }
}

/// Outcome of a capability source lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilitySource {
    /// A capability string was read from the path's declarative source.
    /// May be empty when the source exists but declares nothing.
    Found(String),
    /// The attribute store already holds a marker for this path; the caller
    /// must skip caching. Not the same as no capability found.
    AlreadyCached,
    /// No capability source exists for this path.
    NotFound,
}

/// Resolve the "can-open" capability string for a canonical path.
///
/// Dispatches on the path's [`AppKind`]:
/// - Bundle: reads `Resources/can-open` relative to the bundle root and
///   returns its full contents verbatim (not line-parsed, not trimmed).
/// - Desktop entry: returns [`CapabilitySource::AlreadyCached`] when the
///   marker attribute is already set; otherwise scans the file line by
///   line and takes the value after the literal `MimeType=` prefix on the
///   last such line, verbatim including any trailing separators.
/// - Unknown: no capability.
pub fn resolve_capability_source(
    canonical_path: &Path,
    kind: AppKind,
    attrs: &dyn AttributeStore,
) -> CapabilitySource {
    match kind {
        AppKind::Bundle => read_bundle_sidecar(canonical_path),
        AppKind::DesktopEntry => read_desktop_entry(canonical_path, attrs),
        AppKind::Unknown => CapabilitySource::NotFound,
    }
}

fn read_bundle_sidecar(bundle: &Path) -> CapabilitySource {
    let sidecar = bundle.join(PathClass::BUNDLE_SIDECAR);
    if !sidecar.is_file() {
        return CapabilitySource::NotFound;
    }
    match std::fs::read_to_string(&sidecar) {
        Ok(contents) => CapabilitySource::Found(contents),
        Err(e) => {
            debug!("Unreadable can-open sidecar {}: {}", sidecar.display(), e);
            CapabilitySource::NotFound
        }
    }
}

fn read_desktop_entry(path: &Path, attrs: &dyn AttributeStore) -> CapabilitySource {
    if attrs.get_string(path, AttrConfig::CAN_OPEN_KEY).is_some() {
        return CapabilitySource::AlreadyCached;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("Unreadable desktop entry {}: {}", path.display(), e);
            return CapabilitySource::NotFound;
        }
    };

    // XDG treats ';' as a separator inside the value, so the value is taken
    // verbatim rather than ini-parsed. The last MimeType= line wins;
    // earlier matches are overwritten.
    let mut mime = String::new();
    for line in contents.lines() {
        if let Some(value) = line.trim().strip_prefix(PathClass::MIME_TYPE_PREFIX) {
            mime = value.to_string();
        }
    }

    CapabilitySource::Found(mime)
}
