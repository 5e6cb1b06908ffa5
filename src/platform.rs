// PageKeeper platform paths
// Linux:   $XDG_CONFIG_HOME/pagekeeper, $XDG_DATA_HOME/pagekeeper
// macOS:   ~/Library/Application Support/PageKeeper
// Windows: %APPDATA%/PageKeeper
//
// PAGEKEEPER_DATA_DIR and PAGEKEEPER_CONFIG override the defaults.

use std::env;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "PAGEKEEPER_DATA_DIR";
pub const CONFIG_ENV: &str = "PAGEKEEPER_CONFIG";
pub const API_BASE_ENV: &str = "PAGEKEEPER_API_BASE";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match non_empty_var(var) {
        Some(dir) => PathBuf::from(dir).join("pagekeeper"),
        None => fallback
            .iter()
            .fold(home_dir(), |p, part| p.join(part))
            .join("pagekeeper"),
    }
}

#[cfg(target_os = "macos")]
fn app_support_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("PageKeeper")
}

#[cfg(target_os = "windows")]
fn appdata_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"));
    appdata.join("PageKeeper")
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Directory holding the database. `PAGEKEEPER_DATA_DIR` wins when set.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = non_empty_var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "macos")]
    {
        app_support_dir()
    }
    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}

/// Settings file path. `PAGEKEEPER_CONFIG` wins when set.
pub fn get_settings_path() -> PathBuf {
    match non_empty_var(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => get_config_dir().join("settings.json"),
    }
}

/// Service base URL from the environment, if overridden.
pub fn api_base_override() -> Option<String> {
    non_empty_var(API_BASE_ENV)
}
