//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific log directory for Stonefall
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/stonefall/logs`
/// - Linux: `~/.cache/stonefall/logs` (or `$XDG_CACHE_HOME/stonefall/logs`)
/// - Windows: `%LOCALAPPDATA%\stonefall\logs`
/// - Fallback: `/tmp/stonefall/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "stonefall")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/stonefall"))
        .join("logs")
}
