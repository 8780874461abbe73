use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DB_FILENAME: &str = "wordmix.sqlite";

/// Resolves the portable data layout that lives next to the executable.
pub struct PortablePathManager;

impl PortablePathManager {
    /// Directory holding the executable, or the working directory as a fallback.
    pub fn root_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                #[cfg(debug_assertions)]
                {
                    // target/debug/<exe> during development: use the crate directory
                    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
                    if crate_dir.exists() {
                        return crate_dir;
                    }
                }
                path
            }
            Err(e) => {
                warn!("Failed to get current exe path: {}. Falling back to current_dir.", e);
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Main data directory (./data).
    pub fn data_dir() -> PathBuf {
        Self::root_dir().join("data")
    }

    /// Database directory (./data/db).
    pub fn db_dir() -> PathBuf {
        Self::data_dir().join("db")
    }

    /// Default location of the history database.
    pub fn default_db_path() -> PathBuf {
        Self::db_dir().join(DB_FILENAME)
    }

    /// Creates the directory that will hold `file` if it doesn't exist.
    pub fn ensure_parent_dir(file: &Path) -> Result<(), std::io::Error> {
        match file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                info!("Creating directory: {:?}", dir);
                fs::create_dir_all(dir)
            }
            _ => Ok(()),
        }
    }
}
