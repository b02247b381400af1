//! Error types.
//!
//! Only persistence and configuration can fail. Style application and OS
//! subscriptions are infallible under the platform contract, so they have no
//! error type of their own.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a [`ThemeStorage`](crate::ThemeStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend (e.g. path separators in a
    /// file-backed store).
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused the operation (quota exceeded, private mode, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by theme persistence.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A record exists under the key but does not parse as a theme.
    ///
    /// [`load`](crate::load) recovers from this by substituting the default
    /// theme; it is only visible through [`read_persisted`](crate::read_persisted).
    #[error("persisted theme under '{key}' is corrupt: {source}")]
    PersistedStateCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The theme could not be encoded for storage.
    #[error("failed to serialize theme: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error loading or validating [`StoreOptions`](crate::StoreOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML store options: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON store options: {0}")]
    Json(#[from] serde_json::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid option '{field}': {reason}")]
    InvalidOption { field: &'static str, reason: String },
}

/// The media element refused to start playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Playback was blocked, typically by an autoplay policy.
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// No source is loaded.
    #[error("no media source loaded")]
    NoSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_display() {
        let err = StorageError::InvalidKey("../etc".to_string());
        assert_eq!(err.to_string(), "invalid storage key '../etc'");
    }

    #[test]
    fn test_corrupt_state_display_names_key() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ThemeError::PersistedStateCorrupt {
            key: "theme".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("'theme'"));
        assert!(msg.contains("corrupt"));
    }

    #[test]
    fn test_storage_error_converts_into_theme_error() {
        let err: ThemeError = StorageError::Unavailable("quota exceeded".into()).into();
        assert!(matches!(err, ThemeError::Storage(_)));
        assert_eq!(err.to_string(), "storage unavailable: quota exceeded");
    }

    #[test]
    fn test_invalid_option_display() {
        let err = ConfigError::InvalidOption {
            field: "dark_class",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid option 'dark_class': must not be empty"
        );
    }
}
