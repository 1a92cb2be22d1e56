// notesync-cli/src/config.rs
//
// Defines default configuration constants for the `notesync` application
// and the environment variables its options read from.

use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/notesync";
pub const DEFAULT_CACHE_DIR: &str = "~/.cache/notesync";

pub const CONFIG_DIR_ENV: &str = "NOTESYNC_CONFIG_DIR";
pub const CACHE_DIR_ENV: &str = "NOTESYNC_CACHE_DIR";

// --- Browser option group ---
pub const DEFAULT_HEADLESS_MODE: bool = true;
pub const DEFAULT_BROWSER_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_ERROR_ON_EMPTY_SOURCE: bool = false;

pub const HEADLESS_MODE_ENV: &str = "HEADLESS_MODE";
pub const BROWSER_TIMEOUT_SECONDS_ENV: &str = "BROWSER_TIMEOUT_SECONDS";
pub const ERROR_ON_EMPTY_SOURCE_ENV: &str = "ERROR_ON_EMPTY_SOURCE";

// --- Readwise destination ---
pub const READWISE_TOKEN_ENV: &str = "READWISE_TOKEN";

/// Expands a leading `~` against `HOME`. Paths without one, or a missing
/// `HOME`, are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
