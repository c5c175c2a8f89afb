//! Session configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Number of size requests issued concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Configuration for a scan session.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct SessionConfig {
    /// Directory `go_home` navigates to.
    #[builder(default = "default_home()")]
    pub home: PathBuf,

    /// Size requests per batch.
    #[builder(default = "DEFAULT_BATCH_SIZE")]
    pub batch_size: usize,

    /// Move deleted items to the trash instead of removing them.
    #[builder(default = "false")]
    pub use_trash: bool,

    /// Follow symbolic links when sizing directories.
    #[builder(default = "false")]
    pub follow_symlinks: bool,
}

fn default_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.batch_size {
            return Err("Batch size must be at least 1".to_string());
        }
        if let Some(ref home) = self.home {
            if home.as_os_str().is_empty() {
                return Err("Home path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Create a new session config builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("swept").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`, or return defaults if it cannot be read.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .map(|content| Self::from_toml(&content))
            .unwrap_or_default()
    }

    /// Parse settings, falling back to defaults on malformed input.
    pub fn from_toml(content: &str) -> Self {
        match toml::from_str::<Self>(content) {
            Ok(config) if config.batch_size > 0 => config,
            Ok(_) => {
                tracing::warn!("Ignoring settings with a zero batch size");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;
        self.save_to(&path)
    }

    /// Write settings to `path`, creating its parent directories.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            batch_size: DEFAULT_BATCH_SIZE,
            use_trash: false,
            follow_symlinks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::builder()
            .home("/home/user")
            .batch_size(5usize)
            .use_trash(true)
            .build()
            .unwrap();

        assert_eq!(config.home, PathBuf::from("/home/user"));
        assert_eq!(config.batch_size, 5);
        assert!(config.use_trash);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = SessionConfig::builder().batch_size(0usize).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_batch_size() {
        assert_eq!(SessionConfig::default().batch_size, 3);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SessionConfig::from_toml("batch_size = 8\nuse_trash = true\n");
        assert_eq!(config.batch_size, 8);
        assert!(config.use_trash);
        assert_eq!(config.home, SessionConfig::default().home);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("swept").join("settings.toml");
        let config = SessionConfig::builder()
            .home("/srv/data")
            .batch_size(4usize)
            .follow_symlinks(true)
            .build()
            .unwrap();

        config.save_to(&path).unwrap();

        assert!(path.exists());
        assert_eq!(SessionConfig::load_from(&path), config);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = SessionConfig::load_from(&temp.path().join("absent.toml"));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_from_toml_malformed_falls_back() {
        assert_eq!(SessionConfig::from_toml("batch_size = \"many\""), SessionConfig::default());
        assert_eq!(SessionConfig::from_toml("batch_size = 0"), SessionConfig::default());
    }
}
