//! Durable registry of known application paths.
//!
//! This module provides a SQLite-backed table mapping a canonical filesystem
//! path to itself; the path is both key and sole payload, so the table is a
//! set rather than a mutable record store.
//!
//! # Location
//!
//! The registry database lives at a platform-standard data directory:
//! - **Linux**: `~/.local/share/launch/launch.db`
//! - **Windows**: `%APPDATA%\launch\launch.db`
//! - **macOS**: `~/Library/Application Support/launch/launch.db`

pub mod store;

pub use store::RegistryStore;
