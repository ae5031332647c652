//! Platform-specific path utilities.

use crate::config::RegistryConfig;
use crate::error::{LaunchError, Result};
use std::path::PathBuf;

/// Get the launch data directory.
///
/// This is the well-known location for cross-process shared state,
/// `{platform generic data dir}/launch`:
/// - **Linux**: `~/.local/share/launch` (XDG_DATA_HOME)
/// - **Windows**: `%APPDATA%\launch`
/// - **macOS**: `~/Library/Application Support/launch`
pub fn launch_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| LaunchError::Config {
        message: "Could not determine platform data directory".to_string(),
    })?;
    Ok(data_dir.join(RegistryConfig::DB_DIR_NAME))
}

/// Get the path to the application registry database.
///
/// Returns `{launch_data_dir}/launch.db`.
pub fn launch_db_path() -> Result<PathBuf> {
    Ok(launch_data_dir()?.join(RegistryConfig::DB_FILENAME))
}
