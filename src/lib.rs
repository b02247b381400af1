//! # Themekeeper - persisted theme state for content sites
//!
//! Themekeeper owns the client-side state of a content website's theming:
//! the active color palette, the dark-mode configuration, and the effective
//! dark-mode flag. It persists the configuration, applies it to a styling
//! surface as CSS custom properties plus a `dark` class, and keeps the flag in
//! sync with the operating system's color-scheme preference.
//!
//! The browser platform sits behind small traits so the same store runs in a
//! DOM binding, a desktop host, or a unit test:
//!
//! - [`ThemeStorage`]: key-value persistence (local storage, files, memory)
//! - [`StyleSurface`]: the document root receiving variables and classes
//! - [`ColorSchemeSource`]: the OS `prefers-color-scheme` signal
//!
//! With the `web` feature, the `web` module implements all
//! three over `localStorage`, `document.documentElement` and `matchMedia`.
//!
//! The crate also carries [`AudioPlayer`], the media controller behind the
//! site's audio stories.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use themekeeper::{
//!     ColorMode, DocumentRoot, ManualColorScheme, MemoryStorage, StyleSurface, ThemeContext,
//!     ThemeStore,
//! };
//!
//! let storage = MemoryStorage::new();
//! let root = DocumentRoot::new();
//! let os = Rc::new(ManualColorScheme::new(ColorMode::Dark));
//!
//! let store = ThemeStore::new(storage, root.clone());
//! let _subscription = store.start(Rc::clone(&os));
//!
//! // The default config follows the OS, which reports dark.
//! assert!(store.is_dark_mode());
//! assert!(root.has_class("dark"));
//! assert_eq!(root.property("--background").as_deref(), Some("0 0% 100%"));
//! ```
//!
//! ## Persistence
//!
//! The whole [`ThemeConfig`] is stored as one JSON record under one key
//! (`"theme"` unless [`StoreOptions`] says otherwise). A missing or corrupt
//! record is never an error for the caller: [`load`] falls back to the
//! built-in default and logs the corruption.
//!
//! ## Dark mode
//!
//! With `dark_mode.auto` off, [`ThemeContext::toggle_dark_mode`] persists the
//! choice into `dark_mode.default`. With `auto` on, the toggle is a transient
//! override that the next OS notification or reload replaces.

pub mod config;
pub mod error;
pub mod persist;
pub mod player;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod surface;
pub mod theme;
mod util;
#[cfg(feature = "web")]
pub mod web;

pub use config::StoreOptions;
pub use error::{ConfigError, PlaybackError, StorageError, ThemeError};
pub use persist::{load, persist, read_persisted};
pub use player::{AudioPlayer, MediaElement, SimulatedMedia, DEFAULT_SKIP_SECONDS};
pub use storage::{FileStorage, MemoryStorage, ThemeStorage};
pub use store::{ThemeContext, ThemeSnapshot, ThemeStore};
pub use subscription::{ListenerSet, Subscription};
pub use surface::{DocumentRoot, StyleSurface};
pub use theme::{
    ColorMode, ColorSchemeSource, DarkModeConfig, ManualColorScheme, OsColorScheme,
    ThemeColors, ThemeConfig, ThemeDetector,
};
pub use util::format_time;
#[cfg(feature = "web")]
pub use web::{DocumentElement, LocalStorage, MediaQueryScheme};
