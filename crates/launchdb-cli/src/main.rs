//! launchdb - command-line driver for the application registry.
//!
//! Reconciles application paths against the durable registry and queries
//! it, wrapping the launchdb-core library for shell and watcher callers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launchdb_core::LaunchRegistry;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "launchdb")]
#[command(about = "Registry of launchable applications")]
struct Args {
    /// Registry database path (defaults to the platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile one or more paths against the registry
    Handle {
        /// Application paths (bundles, desktop entries)
        paths: Vec<PathBuf>,
    },
    /// List every registered application, desktop entries last
    List {
        /// Emit JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },
    /// Check whether a path is registered
    Exists {
        /// Exact canonical path to look up
        path: String,
    },
    /// Print the number of registered applications
    Count,
    /// Remove every registered application
    Clear,
}

/// Execute one subcommand against an open registry.
///
/// Returns the process exit code so tests can drive the full command flow
/// without exiting the test harness.
fn run(command: Command, registry: &LaunchRegistry) -> Result<i32> {
    match command {
        Command::Handle { paths } => {
            for path in &paths {
                registry.handle_application(path);
            }
            info!("Handled {} path(s)", paths.len());
        }
        Command::List { json } => {
            if json {
                let entries = registry.all_entries();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for path in registry.all_applications() {
                    println!("{path}");
                }
            }
        }
        Command::Exists { path } => {
            let exists = registry.application_exists(&path);
            println!("{exists}");
            if !exists {
                return Ok(1);
            }
        }
        Command::Count => {
            println!("{}", registry.count());
        }
        Command::Clear => {
            if registry.remove_all_applications() {
                info!("Registry cleared");
            } else {
                anyhow::bail!("Failed to clear the registry");
            }
        }
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let registry = match &args.db {
        Some(db_path) => LaunchRegistry::open_at(db_path)
            .with_context(|| format!("Failed to open registry at {}", db_path.display()))?,
        None => LaunchRegistry::open().context("Failed to open registry")?,
    };

    let code = run(args.command, &registry)?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_test_registry(temp: &TempDir) -> LaunchRegistry {
        LaunchRegistry::open_at(&temp.path().join("launch.db")).unwrap()
    }

    #[test]
    fn test_args_parse_handle() {
        let args = Args::parse_from(["launchdb", "handle", "/a/Editor.app", "/a/x.desktop"]);
        match args.command {
            Command::Handle { paths } => assert_eq!(paths.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_parse_list_json_with_db_override() {
        let args = Args::parse_from(["launchdb", "--db", "/tmp/launch.db", "list", "--json"]);
        assert_eq!(args.db, Some(PathBuf::from("/tmp/launch.db")));
        match args.command {
            Command::List { json } => assert!(json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_handle_then_exists_round_trip() {
        let temp = TempDir::new().unwrap();
        let registry = open_test_registry(&temp);

        let bundle = temp.path().join("Editor.app");
        std::fs::create_dir_all(&bundle).unwrap();
        let canonical = std::fs::canonicalize(&bundle).unwrap();

        let code = run(Command::Handle { paths: vec![bundle] }, &registry).unwrap();
        assert_eq!(code, 0);

        let code = run(
            Command::Exists {
                path: canonical.to_string_lossy().to_string(),
            },
            &registry,
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_exists_reports_nonzero_for_unknown_path() {
        let temp = TempDir::new().unwrap();
        let registry = open_test_registry(&temp);

        let code = run(
            Command::Exists {
                path: "/never/registered".to_string(),
            },
            &registry,
        )
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_clear_empties_the_registry() {
        let temp = TempDir::new().unwrap();
        let registry = open_test_registry(&temp);

        let bundle = temp.path().join("Editor.app");
        std::fs::create_dir_all(&bundle).unwrap();
        run(Command::Handle { paths: vec![bundle] }, &registry).unwrap();
        assert_eq!(registry.count(), 1);

        let code = run(Command::Clear, &registry).unwrap();
        assert_eq!(code, 0);
        assert_eq!(registry.count(), 0);
    }
}
