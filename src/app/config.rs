//! Persistent typesetting configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::typesetter::TypesetOptions;

/// Stored defaults for measuring and typesetting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile to use instead of detecting the terminal
    pub profile: Option<String>,
    pub typeset: TypesetOptions,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `~/.config/tty-typesetter/config.json`, or the defaults when it
    /// is missing or unreadable
    pub fn load_or_default() -> Self {
        match default_path() {
            Some(path) => Self::load_or_default_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            },
        }
    }
}

/// Location of the user configuration file
pub fn default_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("tty-typesetter")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesetter::AtomicClusters;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.profile, None);
        assert_eq!(config.typeset, TypesetOptions::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            profile: Some("kitty".to_string()),
            typeset: TypesetOptions {
                atomic_grapheme_clusters: AtomicClusters::Never,
                ..TypesetOptions::default().with_column_limit(72)
            },
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"typeset": {"tab_size": 4}}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.profile, None);
        assert_eq!(config.typeset.tab_size, Some(4));
        assert!(config.typeset.nice_wrap);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
        assert_eq!(Config::load_or_default_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(Config::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(Config::load_or_default_from(&path), Config::default());
    }
}
