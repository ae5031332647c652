//! Platform abstraction layer.
//!
//! Centralizes the platform-conventional locations the registry depends on
//! so `#[cfg]`-free callers never have to reason about OS differences.

pub mod paths;

pub use paths::{launch_data_dir, launch_db_path};
