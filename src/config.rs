//! Runtime configuration
//!
//! Paths come from environment variables, falling back to directories
//! next to the project root.

use std::path::PathBuf;

/// Environment variable overriding the SQLite database file
pub const DATABASE_PATH_ENV: &str = "GS_DATABASE_PATH";
/// Environment variable overriding the PDF export directory
pub const EXPORT_DIR_ENV: &str = "GS_EXPORT_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root().join("data").join("gs_coach.db"));

        let export_dir = std::env::var(EXPORT_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root().join("exports"));

        Self {
            database_path,
            export_dir,
        }
    }
}

/// Directory holding the executable, minus a trailing `target/{debug,release}`
fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path
}
