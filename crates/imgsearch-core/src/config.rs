//! Configuration management for imgsearch.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults; every section is optional in the file. The Clarifai API key is
//! deliberately NOT part of the config: it arrives as a CLI flag and is
//! passed to the classifier constructor explicitly.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Clarifai model-outputs endpoint (general model).
pub const DEFAULT_API_ENDPOINT: &str =
    "https://api.clarifai.com/v2/models/aaa03c23b3724a16a56b629203edc62c/outputs";

/// Default candidate image list.
pub const DEFAULT_LIST_URL: &str =
    "https://s3.amazonaws.com/clarifai-data/backend/api-take-home/images.txt";

/// Root configuration structure for imgsearch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier API settings
    pub classifier: ClassifierConfig,

    /// Index build settings
    pub build: BuildConfig,

    /// Index file location
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Classifier API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model-outputs endpoint URL
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_secs: 50,
        }
    }
}

/// What the builder does when a classifier call fails for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail the whole build on the first classifier error
    Abort,
    /// Log a warning and continue; the image contributes no entries
    Skip,
}

/// Index build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Candidate list URL used when the CLI supplies none
    pub list_url: String,

    /// Timeout for fetching the candidate list, in seconds
    pub fetch_timeout_secs: u64,

    /// Log progress every N images
    pub progress_interval: usize,

    /// Per-image failure handling
    pub error_policy: ErrorPolicy,

    /// Concurrent classifier calls; 1 means fully sequential
    pub workers: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            fetch_timeout_secs: 30,
            progress_interval: 20,
            error_policy: ErrorPolicy::Abort,
            workers: 1,
        }
    }
}

/// Index file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the persisted index, `~` expanded
    pub index_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_path: "./index.json".to_string(),
        }
    }
}

/// Logging settings consumed by the CLI's logging init.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level ("error", "warn", "info", "debug", "trace")
    pub level: String,

    /// Log format ("pretty" or "json")
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// ~/.imgsearch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "imgsearch", "imgsearch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".imgsearch").join("config.toml")
            })
    }

    /// Get the resolved index file path (with ~ expansion).
    pub fn index_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.index_path);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.timeout_secs must be > 0".into(),
            ));
        }
        if self.build.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "build.fetch_timeout_secs must be > 0".into(),
            ));
        }
        if self.build.progress_interval == 0 {
            return Err(ConfigError::ValidationError(
                "build.progress_interval must be > 0".into(),
            ));
        }
        if self.build.workers == 0 {
            return Err(ConfigError::ValidationError(
                "build.workers must be > 0".into(),
            ));
        }
        if self.storage.index_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.index_path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
