//! Reading and writing the persisted theme record.

use crate::error::ThemeError;
use crate::storage::ThemeStorage;
use crate::theme::ThemeConfig;

/// Reads the record under `key`.
///
/// Returns `Ok(None)` when nothing is stored and
/// [`ThemeError::PersistedStateCorrupt`] when the record does not parse.
pub fn read_persisted<S: ThemeStorage + ?Sized>(
    storage: &S,
    key: &str,
) -> Result<Option<ThemeConfig>, ThemeError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ThemeError::PersistedStateCorrupt {
            key: key.to_string(),
            source,
        })
}

/// Loads the theme stored under `key`, falling back to the built-in default.
///
/// Never fails: an absent record, an unreadable backend and a corrupt record
/// all yield [`ThemeConfig::default`]. Failures are logged.
///
/// # Example
///
/// ```rust
/// use themekeeper::{load, MemoryStorage, ThemeConfig, ThemeStorage};
///
/// let storage = MemoryStorage::new();
/// storage.set_item("theme", "definitely not json").unwrap();
///
/// assert_eq!(load(&storage, "theme"), ThemeConfig::default());
/// ```
pub fn load<S: ThemeStorage + ?Sized>(storage: &S, key: &str) -> ThemeConfig {
    match read_persisted(storage, key) {
        Ok(Some(config)) => {
            tracing::debug!("loaded persisted theme from '{}'", key);
            config
        }
        Ok(None) => {
            tracing::debug!("no persisted theme under '{}', using default", key);
            ThemeConfig::default()
        }
        Err(e) => {
            tracing::warn!("{}; falling back to default theme", e);
            ThemeConfig::default()
        }
    }
}

/// Writes `config` under `key` as JSON.
pub fn persist<S: ThemeStorage + ?Sized>(
    storage: &S,
    key: &str,
    config: &ThemeConfig,
) -> Result<(), ThemeError> {
    let raw = serde_json::to_string(config).map_err(ThemeError::Serialize)?;
    storage.set_item(key, &raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use crate::theme::DarkModeConfig;

    struct BrokenStorage;

    impl ThemeStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_read_absent_is_none() {
        let storage = MemoryStorage::new();
        assert!(read_persisted(&storage, "theme").unwrap().is_none());
    }

    #[test]
    fn test_read_corrupt_is_classified() {
        let storage = MemoryStorage::new();
        storage.set_item("theme", "{\"colors\": 42").unwrap();
        let err = read_persisted(&storage, "theme").unwrap_err();
        assert!(matches!(err, ThemeError::PersistedStateCorrupt { ref key, .. } if key == "theme"));
    }

    #[test]
    fn test_load_corrupt_falls_back_to_default() {
        let storage = MemoryStorage::new();
        storage.set_item("theme", "<html>").unwrap();
        assert_eq!(load(&storage, "theme"), ThemeConfig::default());
    }

    #[test]
    fn test_load_wrong_shape_falls_back_to_default() {
        let storage = MemoryStorage::new();
        storage.set_item("theme", r#"{"darkMode": true}"#).unwrap();
        assert_eq!(load(&storage, "theme"), ThemeConfig::default());
    }

    #[test]
    fn test_load_unavailable_backend_falls_back_to_default() {
        assert_eq!(load(&BrokenStorage, "theme"), ThemeConfig::default());
    }

    #[test]
    fn test_persist_then_load() {
        let storage = MemoryStorage::new();
        let config = ThemeConfig::default()
            .with_name("night")
            .with_dark_mode(DarkModeConfig {
                enabled: true,
                default: true,
                auto: false,
            });

        persist(&storage, "theme", &config).unwrap();
        assert_eq!(load(&storage, "theme"), config);
    }

    #[test]
    fn test_persist_reports_backend_failure() {
        let err = persist(&BrokenStorage, "theme", &ThemeConfig::default()).unwrap_err();
        assert!(matches!(err, ThemeError::Storage(StorageError::Unavailable(_))));
    }
}
