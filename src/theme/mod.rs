//! Theme data model and color-scheme sources.
//!
//! This module provides:
//!
//! - [`ThemeConfig`]: the persisted palette plus dark-mode settings
//! - [`ThemeColors`] and [`DarkModeConfig`]: its two halves
//! - [`ColorMode`]: light or dark
//! - [`ColorSchemeSource`]: the OS color-scheme signal, with the
//!   [`OsColorScheme`] and [`ManualColorScheme`] implementations

mod adaptive;
#[allow(clippy::module_inception)]
mod theme;

pub use adaptive::{ColorMode, ColorSchemeSource, ManualColorScheme, OsColorScheme, ThemeDetector};
pub use theme::{DarkModeConfig, ThemeColors, ThemeConfig};
