//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("dc.db"),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DC_*)
        figment = figment.merge(Env::prefixed("DC_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for dc.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dc"))
}

/// Returns the platform-specific data directory for dc.
///
/// On Linux: `~/.local/share/dc`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_returns_some() {
        assert!(dirs_data_path().is_some());
    }

    #[test]
    fn test_dirs_data_path_ends_with_dc() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "dc");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("dc.db"));
    }
}
