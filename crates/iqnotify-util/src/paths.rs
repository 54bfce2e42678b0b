//! Default paths for iqnotify components
//!
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/iqnotify/config.toml` or `~/.config/iqnotify/config.toml`
//! - Data: `$XDG_DATA_HOME/iqnotify` or `~/.local/share/iqnotify`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const IQNOTIFY_CONFIG_ENV: &str = "IQNOTIFY_CONFIG";

/// Environment variable for overriding the data directory
pub const IQNOTIFY_DATA_DIR_ENV: &str = "IQNOTIFY_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "iqnotify";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Presence database filename within the data directory
const PRESENCE_DB_FILENAME: &str = "presence.db";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$IQNOTIFY_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/iqnotify/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/iqnotify/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(IQNOTIFY_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$IQNOTIFY_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/iqnotify` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/iqnotify` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(IQNOTIFY_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking IQNOTIFY_DATA_DIR env var.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Default location of the presence database read by the snapshot reader
pub fn default_presence_db_path() -> PathBuf {
    default_data_dir().join(PRESENCE_DB_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_toml() {
        let path = default_config_path();
        assert!(path.to_string_lossy().ends_with(".toml"));
    }

    #[test]
    fn data_dir_contains_app_name() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("iqnotify"));
    }

    #[test]
    fn presence_db_lives_in_data_dir() {
        let path = default_presence_db_path();
        assert_eq!(path.file_name().unwrap(), "presence.db");
    }
}
