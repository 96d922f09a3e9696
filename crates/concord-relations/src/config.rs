//! Configuration for the relationship service
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relationship service configuration
///
/// # Examples
///
/// ```
/// use concord_relations::RelationsConfig;
///
/// let config = RelationsConfig::from_toml_str("max_tree_depth = 8").unwrap();
/// assert_eq!(config.max_tree_depth, 8);
/// assert!(config.warn_on_multiple_lieges);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationsConfig {
    /// Deepest level tree derivation will descend to before cutting off
    /// Default: 64
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,

    /// Most nodes a single vassal tree may contain
    /// Default: 4096
    #[serde(default = "default_max_tree_nodes")]
    pub max_tree_nodes: usize,

    /// Log a warning when a faction records more than one liege edge
    /// Default: true
    #[serde(default = "default_warn_on_multiple_lieges")]
    pub warn_on_multiple_lieges: bool,

    /// `EnvFilter` directive used by [`crate::logging::init`]
    /// Default: "info"
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_max_tree_depth() -> usize {
    64
}

fn default_max_tree_nodes() -> usize {
    4096
}

fn default_warn_on_multiple_lieges() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: default_max_tree_depth(),
            max_tree_nodes: default_max_tree_nodes(),
            warn_on_multiple_lieges: default_warn_on_multiple_lieges(),
            log_filter: default_log_filter(),
        }
    }
}

/// File layout accepting either a bare table or a `[relations]` section
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Sectioned { relations: RelationsConfig },
    Bare(RelationsConfig),
}

impl RelationsConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config = match toml::from_str::<ConfigFile>(contents)? {
            ConfigFile::Sectioned { relations } => relations,
            ConfigFile::Bare(config) => config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tree_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_tree_depth must be at least 1".to_string(),
            ));
        }
        if self.max_tree_nodes == 0 {
            return Err(ConfigError::Invalid(
                "max_tree_nodes must be at least 1".to_string(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log_filter must not be empty".to_string()));
        }
        Ok(())
    }
}
