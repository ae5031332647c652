//! Centralized configuration constants for launchdb.

/// Registry database location and connection parameters.
pub struct RegistryConfig;

impl RegistryConfig {
    /// Subdirectory of the platform data directory holding the database.
    pub const DB_DIR_NAME: &'static str = "launch";
    /// Database file name.
    pub const DB_FILENAME: &'static str = "launch.db";
    /// SQLite busy timeout for the shared connection.
    pub const BUSY_TIMEOUT_MS: u32 = 5_000;
}

/// Extended-attribute keys and the startup support probe.
pub struct AttrConfig;

impl AttrConfig {
    /// Attribute key holding the cached mime list for an application path.
    pub const CAN_OPEN_KEY: &'static str = "can-open";
    /// Boolean attribute written once at startup to detect xattr support.
    pub const SUPPORT_PROBE_KEY: &'static str = "filesystemSupportsExtattr";
    /// Well-known path the support probe is written to.
    pub const SUPPORT_PROBE_PATH: &'static str = "/usr";
}

/// Path classification constants for launchable application locations.
pub struct PathClass;

impl PathClass {
    /// Suffix of bundle-style application directories.
    pub const BUNDLE_SUFFIX: &'static str = ".app";
    /// Suffix of desktop-entry files. Desktop entries are the fallback
    /// class of launchable and always sort after bundle entries.
    pub const DESKTOP_SUFFIX: &'static str = ".desktop";
    /// Sidecar file inside a bundle declaring the mime types it can open.
    pub const BUNDLE_SIDECAR: &'static str = "Resources/can-open";
    /// Key prefix scanned for inside desktop-entry files.
    pub const MIME_TYPE_PREFIX: &'static str = "MimeType=";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_subpath_is_stable() {
        assert_eq!(RegistryConfig::DB_DIR_NAME, "launch");
        assert_eq!(RegistryConfig::DB_FILENAME, "launch.db");
    }

    #[test]
    fn test_suffixes_include_dot() {
        assert!(PathClass::BUNDLE_SUFFIX.starts_with('.'));
        assert!(PathClass::DESKTOP_SUFFIX.starts_with('.'));
    }
}
