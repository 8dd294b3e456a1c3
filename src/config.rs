//! Backup configuration loading and extension classification.
//!
//! The configuration maps file extensions to named categories and names the
//! backup root that category subdirectories live under.
//!
//! # Configuration File Format
//!
//! Configuration is stored in TOML format with the following structure:
//!
//! ```toml
//! default_directory = "/home/user/backup"
//!
//! [types.images]
//! extensions = [".jpg", ".jpeg", ".png"]
//!
//! [types.docs]
//! extensions = [".txt", ".pdf"]
//! ```
//!
//! Categories keep the order they appear in the file; when two categories
//! claim the same extension, the first one defined wins. Extensions are
//! matched case-insensitively, leading dot included.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    NotFound(PathBuf),
    /// Invalid TOML syntax.
    Parse(String),
    /// Required keys are absent or have the wrong shape.
    Invalid(String),
    /// IO error while reading configuration.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::Parse(msg) => write!(f, "Configuration is not valid TOML: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::Io(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raw deserialized shape, validated field by field so the error taxonomy
/// distinguishes parse failures from structural ones.
#[derive(Debug, Deserialize)]
struct RawConfig {
    default_directory: Option<Value>,
    types: Option<Value>,
}

/// A single category with its matching extension set.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Category name, also the subdirectory name under the backup root.
    pub name: String,
    /// Lowercased extensions, leading dot included (e.g. ".jpg").
    pub extensions: HashSet<String>,
}

/// Parsed backup configuration.
///
/// Loaded once per run and immutable thereafter. Categories are stored in
/// their defined order so classification can tie-break on first match.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Backup root that category subdirectories are created under.
    pub default_directory: PathBuf,
    /// Categories in the order they were defined.
    pub categories: Vec<CategoryRule>,
}

impl BackupConfig {
    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Parse` if it is not valid TOML, and
    /// `ConfigError::Invalid` if `default_directory` or `types` is missing
    /// or malformed. An empty `extensions` list is valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let raw: RawConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let default_directory = raw
            .default_directory
            .as_ref()
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ConfigError::Invalid("'default_directory' must be a string path".to_string())
            })?;

        let types = raw
            .types
            .as_ref()
            .and_then(Value::as_table)
            .ok_or_else(|| ConfigError::Invalid("'types' must be a table".to_string()))?;

        let mut categories = Vec::with_capacity(types.len());
        for (name, value) in types {
            let spec = value
                .as_table()
                .ok_or_else(|| ConfigError::Invalid(format!("type '{}' must be a table", name)))?;
            let extensions = spec
                .get("extensions")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("type '{}' must have an 'extensions' list", name))
                })?;

            let mut set = HashSet::with_capacity(extensions.len());
            for ext in extensions {
                let ext = ext.as_str().ok_or_else(|| {
                    ConfigError::Invalid(format!("extensions of type '{}' must be strings", name))
                })?;
                set.insert(ext.to_lowercase());
            }

            categories.push(CategoryRule {
                name: name.clone(),
                extensions: set,
            });
        }

        Ok(Self {
            default_directory: PathBuf::from(default_directory),
            categories,
        })
    }

    /// Load configuration with fallback to the per-user default location.
    ///
    /// An explicitly given path is used when it exists; a given-but-missing
    /// path falls back to `~/.config/typestash/config.toml` rather than
    /// erroring out.
    pub fn load_with_fallback(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && path.exists()
        {
            return Self::load(path);
        }
        Self::load(&Self::default_path())
    }

    /// The per-user default configuration path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typestash")
            .join("config.toml")
    }

    /// Returns the first-defined category whose extension set contains the
    /// given extension, compared case-insensitively. The extension is
    /// expected with its leading dot (e.g. ".jpg").
    pub fn category_for(&self, extension: &str) -> Option<&str> {
        let ext = extension.to_lowercase();
        self.categories
            .iter()
            .find(|rule| rule.extensions.contains(&ext))
            .map(|rule| rule.name.as_str())
    }
}
