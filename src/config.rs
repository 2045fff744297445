//! # Configuration Module
//!
//! Data directory layout and runtime settings for Libzy.
//!
//! ## Data Storage
//!
//! Libzy keeps its files in the platform-standard data directory:
//! - Linux: `~/.local/share/libzy/`
//! - macOS: `~/Library/Application Support/libzy/`
//! - Windows: `%APPDATA%\libzy\`
//!
//! Inside it, `library.db` holds the album library and the optional
//! `config.json` overrides runtime settings:
//!
//! ```json
//! { "relevance_threshold": 0.6 }
//! ```

use crate::algorithm::{RelevanceContext, DEFAULT_RELEVANCE_THRESHOLD};
use anyhow::{Context, Result};
use log::debug;
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "library.db";

/// Returns the Libzy data directory, creating it if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The libzy subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let libzy_dir = data_dir.join("libzy");
    fs::create_dir_all(&libzy_dir).with_context(|| {
        format!(
            "Failed to create Libzy data directory at {}. Please check file permissions.",
            libzy_dir.display()
        )
    })?;

    Ok(libzy_dir)
}

/// Returns the path of the library database inside the data directory.
///
/// ```no_run
/// use libzy::config::get_db_path;
///
/// let db_path = get_db_path()?;
/// println!("Library location: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(DB_FILE))
}

/// Make a user-supplied path absolute against the current directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = path
        .absolutize()
        .with_context(|| format!("Cannot resolve path {}", path.display()))?;
    Ok(absolute.into_owned())
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the library database
    pub db_path: PathBuf,
    /// Minimum relevance for an album to be recommended
    pub relevance_threshold: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            db_path: get_db_path().unwrap_or_else(|_| PathBuf::from(DB_FILE)),
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

impl RuntimeConfig {
    /// Load `config.json` from the data directory, or defaults if it is absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_data_dir()?.join(CONFIG_FILE))
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults.", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Create configuration with explicit database path
    pub fn with_db_path(mut self, db_path: &Path) -> Result<Self> {
        self.db_path = absolute_path(db_path)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_threshold(mut self, relevance_threshold: f64) -> Self {
        self.relevance_threshold = relevance_threshold;
        self
    }

    #[must_use]
    pub fn relevance_context(&self) -> RelevanceContext {
        RelevanceContext::with_threshold(self.relevance_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_structure() {
        let path = get_db_path().expect("Should get valid path");

        assert!(path.is_absolute(), "Database path should be absolute");
        assert_eq!(path.file_name().unwrap(), "library.db");
        let parent = path.parent().expect("Should have parent directory");
        assert_eq!(parent.file_name().unwrap(), "libzy");
        assert!(parent.is_dir());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config.relevance_threshold, 0.5);
        assert_eq!(config.relevance_context(), RelevanceContext::default());
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "relevance_threshold": 0.7 }"#).unwrap();

        let config = RuntimeConfig::load_from(&path).unwrap();
        assert_eq!(config.relevance_threshold, 0.7);
        assert_eq!(config.db_path, RuntimeConfig::default().db_path);
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "relevance_threshold = 0.7").unwrap();

        assert!(RuntimeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::default()
            .with_db_path(Path::new("some/library.db"))
            .unwrap()
            .with_threshold(0.25);

        assert!(config.db_path.is_absolute());
        assert!(config.db_path.ends_with("some/library.db"));
        assert_eq!(config.relevance_context().threshold, 0.25);
    }
}
