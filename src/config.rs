//! Store options: where the theme is persisted and how it is applied.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Options can be built in code or read from YAML/JSON:
//!
//! ```rust
//! use themekeeper::StoreOptions;
//!
//! let options = StoreOptions::from_yaml_str("storage_key: site-theme\n").unwrap();
//! assert_eq!(options.storage_key, "site-theme");
//! assert_eq!(options.dark_class, "dark");
//! assert_eq!(options.variable_name("primary"), "--primary");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// Class toggled on the root element for dark mode.
pub const DEFAULT_DARK_CLASS: &str = "dark";

/// Prefix turning a color slot name into a CSS custom property name.
pub const DEFAULT_VARIABLE_PREFIX: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Key of the single persisted theme record.
    pub storage_key: String,
    /// Prefix for the CSS custom properties written per color slot.
    pub variable_prefix: String,
    /// Class marking the root element as dark.
    pub dark_class: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates options from YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_yaml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Parses and validates options from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }

    pub fn with_dark_class(mut self, class: impl Into<String>) -> Self {
        self.dark_class = class.into();
        self
    }

    /// Checks that every field is usable.
    ///
    /// The storage key and dark class must be non-empty, and the class must
    /// be a single token (no whitespace).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidOption {
                field: "storage_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.dark_class.is_empty() {
            return Err(ConfigError::InvalidOption {
                field: "dark_class",
                reason: "must not be empty".to_string(),
            });
        }
        if self.dark_class.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidOption {
                field: "dark_class",
                reason: format!("'{}' contains whitespace", self.dark_class),
            });
        }
        Ok(())
    }

    /// Name of the custom property for a color slot.
    pub fn variable_name(&self, slot: &str) -> String {
        format!("{}{}", self.variable_prefix, slot)
    }
}
