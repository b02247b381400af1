//! The persisted theme record.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The five color slots of a site palette.
///
/// Values are opaque color strings. The built-in palette uses bare HSL
/// triplets (`"222.2 47.4% 11.2%"`) so stylesheets can wrap them as
/// `hsl(var(--primary))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub foreground: String,
}

impl ThemeColors {
    /// Slot names, in the order [`slots`](Self::slots) yields them.
    pub const SLOT_NAMES: [&'static str; 5] =
        ["primary", "secondary", "accent", "background", "foreground"];

    /// Returns `(slot name, value)` for every slot.
    pub fn slots(&self) -> [(&'static str, &str); 5] {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("accent", self.accent.as_str()),
            ("background", self.background.as_str()),
            ("foreground", self.foreground.as_str()),
        ]
    }
}

/// Dark-mode settings.
///
/// - `enabled`: whether dark mode is offered at all
/// - `default`: the last explicit user choice, used only when `auto` is off
/// - `auto`: follow the OS color-scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkModeConfig {
    pub enabled: bool,
    pub default: bool,
    pub auto: bool,
}

impl DarkModeConfig {
    /// True when the OS preference should drive the effective flag.
    pub fn follows_os(&self) -> bool {
        self.enabled && self.auto
    }
}

/// A complete theme: palette, dark-mode settings and an optional name.
///
/// This is the only persisted entity. It serializes as a single JSON object
/// with camelCase keys:
///
/// ```json
/// {"colors":{"primary":"...",...},"darkMode":{"enabled":true,"default":false,"auto":true},"name":"default"}
/// ```
///
/// # Example
///
/// ```rust
/// use themekeeper::{DarkModeConfig, ThemeConfig};
///
/// let theme = ThemeConfig::default()
///     .with_name("evening")
///     .with_dark_mode(DarkModeConfig { enabled: true, default: true, auto: false });
///
/// assert_eq!(theme.name.as_deref(), Some("evening"));
/// assert!(theme.dark_mode.default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub colors: ThemeColors,
    pub dark_mode: DarkModeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

static DEFAULT_THEME: Lazy<ThemeConfig> = Lazy::new(|| ThemeConfig {
    colors: ThemeColors {
        primary: "222.2 47.4% 11.2%".to_string(),
        secondary: "210 40% 96.1%".to_string(),
        accent: "210 40% 96.1%".to_string(),
        background: "0 0% 100%".to_string(),
        foreground: "222.2 84% 4.9%".to_string(),
    },
    dark_mode: DarkModeConfig {
        enabled: true,
        default: false,
        auto: true,
    },
    name: Some("default".to_string()),
});

impl ThemeConfig {
    pub fn new(colors: ThemeColors, dark_mode: DarkModeConfig) -> Self {
        Self {
            colors,
            dark_mode,
            name: None,
        }
    }

    /// The built-in theme used on first load and whenever the stored record
    /// is unusable.
    pub fn builtin() -> &'static ThemeConfig {
        &DEFAULT_THEME
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_colors(mut self, colors: ThemeColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_dark_mode(mut self, dark_mode: DarkModeConfig) -> Self {
        self.dark_mode = dark_mode;
        self
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        DEFAULT_THEME.clone()
    }
}
