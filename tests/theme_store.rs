//! Integration tests for the theme store lifecycle.
//!
//! A "reload" is simulated by building a second store over the same storage,
//! which is what a browser does with local storage across page loads.

use std::rc::Rc;

use proptest::prelude::*;
use tempfile::TempDir;
use themekeeper::{
    load, ColorMode, DarkModeConfig, DocumentRoot, FileStorage, ManualColorScheme, MemoryStorage,
    StyleSurface, ThemeColors, ThemeConfig, ThemeContext, ThemeStorage, ThemeStore,
};

fn manual(default: bool) -> DarkModeConfig {
    DarkModeConfig {
        enabled: true,
        default,
        auto: false,
    }
}

#[test]
fn test_default_theme_follows_dark_os_on_mount() {
    let storage = MemoryStorage::new();
    let root = DocumentRoot::new();
    let os = Rc::new(ManualColorScheme::new(ColorMode::Dark));

    let store = ThemeStore::new(storage.clone(), root.clone());
    let _sub = store.start(Rc::clone(&os));

    assert!(store.is_dark_mode());
    assert!(root.has_class("dark"));
    // Mount reconciliation never writes the record.
    assert!(storage.get_item("theme").unwrap().is_none());
    assert_eq!(store.theme(), ThemeConfig::default());
}

#[test]
fn test_corrupt_record_loads_default_on_mount() {
    let storage = MemoryStorage::new();
    storage.set_item("theme", "\u{0}garbage{{").unwrap();

    let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
    assert_eq!(store.theme(), ThemeConfig::default());
    // The corrupt record is left alone until the next explicit write.
    assert_eq!(
        storage.get_item("theme").unwrap().as_deref(),
        Some("\u{0}garbage{{")
    );
}

#[test]
fn test_manual_toggle_survives_reload() {
    let storage = MemoryStorage::new();
    let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
    store
        .set_theme(ThemeConfig::default().with_dark_mode(manual(false)))
        .unwrap();
    assert!(store.toggle_dark_mode().unwrap());

    let root = DocumentRoot::new();
    let reloaded = ThemeStore::new(storage, root.clone());
    assert!(reloaded.is_dark_mode());
    assert!(root.has_class("dark"));
}

#[test]
fn test_auto_toggle_does_not_survive_reload() {
    let storage = MemoryStorage::new();
    let os = Rc::new(ManualColorScheme::new(ColorMode::Light));
    let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
    let _sub = store.start(Rc::clone(&os));

    assert!(store.toggle_dark_mode().unwrap());

    let reloaded = ThemeStore::new(storage, DocumentRoot::new());
    let _sub = reloaded.start(Rc::clone(&os));
    assert!(!reloaded.is_dark_mode());
    assert!(reloaded.theme().dark_mode.auto);
    assert!(!reloaded.theme().dark_mode.default);
}

#[test]
fn test_auto_reenabled_after_reload_follows_os() {
    let storage = MemoryStorage::new();
    let os = Rc::new(ManualColorScheme::new(ColorMode::Dark));
    let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
    store
        .set_theme(ThemeConfig::default().with_dark_mode(manual(false)))
        .unwrap();

    let root = DocumentRoot::new();
    let reloaded = ThemeStore::new(storage, root.clone());
    let _sub = reloaded.start(Rc::clone(&os));
    assert!(!reloaded.is_dark_mode());

    reloaded.set_theme(ThemeConfig::default()).unwrap();
    assert!(reloaded.is_dark_mode());
    assert!(root.has_class("dark"));

    os.set_color_mode(ColorMode::Light);
    assert!(!reloaded.is_dark_mode());
    assert!(!root.has_class("dark"));
}

#[test]
fn test_double_toggle_restores_flag_and_record() {
    let storage = MemoryStorage::new();
    let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
    store
        .set_theme(ThemeConfig::default().with_dark_mode(manual(false)))
        .unwrap();

    for expected in [true, false] {
        assert_eq!(store.toggle_dark_mode().unwrap(), expected);
        assert_eq!(load(&storage, "theme").dark_mode.default, expected);
    }
    assert!(!store.is_dark_mode());
}

#[test]
fn test_independent_stores_do_not_share_state() {
    let a = ThemeStore::new(MemoryStorage::new(), DocumentRoot::new());
    let b = ThemeStore::new(MemoryStorage::new(), DocumentRoot::new());

    a.toggle_dark_mode().unwrap();
    assert!(a.is_dark_mode());
    assert!(!b.is_dark_mode());
}

#[test]
fn test_file_storage_persists_across_stores() {
    let dir = TempDir::new().unwrap();
    let config = ThemeConfig::default()
        .with_name("sepia")
        .with_dark_mode(manual(true));

    {
        let store = ThemeStore::new(FileStorage::new(dir.path()), DocumentRoot::new());
        store.set_theme(config.clone()).unwrap();
    }

    let store = ThemeStore::new(FileStorage::new(dir.path()), DocumentRoot::new());
    assert_eq!(store.theme(), config);
    assert!(store.is_dark_mode());
}

fn color() -> impl Strategy<Value = String> {
    (0u16..360, 0u8..=100, 0u8..=100).prop_map(|(h, s, l)| format!("{h} {s}% {l}%"))
}

fn theme_config() -> impl Strategy<Value = ThemeConfig> {
    (
        (color(), color(), color(), color(), color()),
        (any::<bool>(), any::<bool>(), any::<bool>()),
        proptest::option::of("[a-zA-Z0-9 _-]{0,16}"),
    )
        .prop_map(
            |((primary, secondary, accent, background, foreground), (enabled, default, auto), name)| {
                ThemeConfig {
                    colors: ThemeColors {
                        primary,
                        secondary,
                        accent,
                        background,
                        foreground,
                    },
                    dark_mode: DarkModeConfig {
                        enabled,
                        default,
                        auto,
                    },
                    name,
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_set_then_reload_returns_same_config(config in theme_config()) {
        let storage = MemoryStorage::new();
        let store = ThemeStore::new(storage.clone(), DocumentRoot::new());
        store.set_theme(config.clone()).unwrap();

        prop_assert_eq!(load(&storage, "theme"), config);
    }

    #[test]
    fn prop_arbitrary_record_never_breaks_load(raw in ".*") {
        let storage = MemoryStorage::new();
        storage.set_item("theme", &raw).unwrap();

        let store = ThemeStore::new(storage, DocumentRoot::new());
        // Either the record happened to be a valid theme or we got the default.
        let loaded = store.theme();
        prop_assert!(loaded == ThemeConfig::default() || serde_json::from_str::<ThemeConfig>(&raw).is_ok());
    }

    #[test]
    fn prop_applied_variables_match_colors(config in theme_config()) {
        let root = DocumentRoot::new();
        let store = ThemeStore::new(MemoryStorage::new(), root.clone());
        store.set_theme(config.clone()).unwrap();

        for (slot, value) in config.colors.slots() {
            let property = root.property(&format!("--{slot}"));
            prop_assert_eq!(property.as_deref(), Some(value));
        }
    }
}
