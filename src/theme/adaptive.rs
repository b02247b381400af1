//! Color-scheme sources that report the user's light/dark preference.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use serde::{Deserialize, Serialize};

use crate::subscription::{ListenerSet, Subscription};

/// The user's preferred color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ColorMode::Dark)
    }
}

/// A source of the OS-level color-scheme preference.
///
/// Implementations report the current mode and deliver change notifications
/// to subscribers until the returned [`Subscription`] is released.
pub trait ColorSchemeSource {
    /// Reads the current preference.
    fn color_mode(&self) -> ColorMode;

    /// Registers `listener` for preference changes.
    fn subscribe(&self, listener: Box<dyn Fn(ColorMode)>) -> Subscription;
}

/// Detector used to determine whether the user prefers a light or dark theme.
pub type ThemeDetector = fn() -> ColorMode;

fn os_theme_detector() -> ColorMode {
    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        OsThemeMode::Light => ColorMode::Light,
    }
}

/// Native color-scheme source backed by the `dark-light` crate.
///
/// Desktop platforms have no portable change callback, so the host's event
/// loop calls [`poll`](Self::poll) (on focus, on a timer, ...) and listeners
/// hear about a change only when the detected mode actually differs from the
/// last one seen.
///
/// # Example
///
/// ```rust
/// use themekeeper::{ColorMode, ColorSchemeSource, OsColorScheme};
///
/// // Force a mode, e.g. for tests or a `--dark` flag.
/// let os = OsColorScheme::with_detector(|| ColorMode::Dark);
/// assert_eq!(os.color_mode(), ColorMode::Dark);
/// assert_eq!(os.poll(), None);
/// ```
pub struct OsColorScheme {
    detector: ThemeDetector,
    last: Cell<ColorMode>,
    listeners: ListenerSet<ColorMode>,
}

impl OsColorScheme {
    /// Creates a source that asks the operating system.
    pub fn new() -> Self {
        Self::with_detector(os_theme_detector)
    }

    /// Creates a source with a custom detector.
    pub fn with_detector(detector: ThemeDetector) -> Self {
        Self {
            detector,
            last: Cell::new(detector()),
            listeners: ListenerSet::new(),
        }
    }

    /// Re-runs detection, notifying listeners if the mode changed.
    ///
    /// Returns the new mode when a change was delivered.
    pub fn poll(&self) -> Option<ColorMode> {
        let mode = (self.detector)();
        if mode == self.last.get() {
            return None;
        }
        tracing::debug!("OS color scheme changed to {:?}", mode);
        self.last.set(mode);
        self.listeners.notify(&mode);
        Some(mode)
    }
}

impl Default for OsColorScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSchemeSource for OsColorScheme {
    fn color_mode(&self) -> ColorMode {
        (self.detector)()
    }

    fn subscribe(&self, listener: Box<dyn Fn(ColorMode)>) -> Subscription {
        self.listeners.subscribe(move |mode| listener(*mode))
    }
}

impl fmt::Debug for OsColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsColorScheme")
            .field("last", &self.last.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Color-scheme source driven by the host.
///
/// Useful when the preference arrives through another channel (a browser
/// binding forwarding `matchMedia` events, a settings screen) and in tests.
/// Clones share state, so one clone can be handed to the store while another
/// pushes changes.
#[derive(Clone)]
pub struct ManualColorScheme {
    mode: Rc<Cell<ColorMode>>,
    listeners: ListenerSet<ColorMode>,
}

impl ManualColorScheme {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode: Rc::new(Cell::new(mode)),
            listeners: ListenerSet::new(),
        }
    }

    /// Updates the preference. Listeners are notified only on an actual change.
    pub fn set_color_mode(&self, mode: ColorMode) {
        if self.mode.replace(mode) != mode {
            self.listeners.notify(&mode);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn color_mode(&self) -> ColorMode {
        self.mode.get()
    }

    fn subscribe(&self, listener: Box<dyn Fn(ColorMode)>) -> Subscription {
        self.listeners.subscribe(move |mode| listener(*mode))
    }
}

impl fmt::Debug for ManualColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualColorScheme")
            .field("mode", &self.mode.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
