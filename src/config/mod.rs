//! Configuration module for Agrimarket
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use std::path::PathBuf;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "STOREFRONT_SETTINGS_PATH";

/// Load settings from the first file found, or use defaults.
///
/// Environment overrides are applied last and the result is validated.
/// Also returns the file the settings came from, if any.
pub fn load() -> Result<(Settings, Option<PathBuf>), SettingsError> {
    let path = find_settings_file();
    let mut settings = match &path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok((settings, path))
}

fn find_settings_file() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!("{} points at missing file {}", SETTINGS_PATH_VAR, path.display());
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/agrimarket/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("agrimarket/settings.yml"));
    }

    paths.into_iter().find(|path| path.exists())
}
