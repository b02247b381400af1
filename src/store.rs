//! The theme store and the contract it offers to UI consumers.
//!
//! [`ThemeStore`] is the single writer of theme state. It owns the current
//! [`ThemeConfig`] and the effective dark-mode flag, persists the config
//! through a [`ThemeStorage`], mirrors state onto a [`StyleSurface`], and,
//! once [`started`](ThemeStore::start), follows a [`ColorSchemeSource`] while
//! the config asks for it.
//!
//! UI code reads and writes through [`ThemeContext`] and can
//! [`watch`](ThemeStore::watch) for changes.
//!
//! # Lifecycle
//!
//! 1. [`ThemeStore::new`] loads the persisted config (or the default) and
//!    applies it to the surface.
//! 2. [`ThemeStore::start`] hands the store a [`ColorSchemeSource`]. While
//!    the config has `dark_mode.enabled && dark_mode.auto`, the flag is read
//!    from the source and follows its change notifications, including after
//!    a [`set`](ThemeStore::set) that switches `auto` back on.
//! 3. Dropping the returned [`Subscription`] stops OS reconciliation.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use themekeeper::{
//!     ColorMode, DocumentRoot, ManualColorScheme, MemoryStorage, ThemeContext, ThemeStore,
//! };
//!
//! let os = Rc::new(ManualColorScheme::new(ColorMode::Light));
//! let store = ThemeStore::new(MemoryStorage::new(), DocumentRoot::new());
//! let subscription = store.start(Rc::clone(&os));
//!
//! os.set_color_mode(ColorMode::Dark);
//! assert!(store.is_dark_mode());
//!
//! drop(subscription);
//! os.set_color_mode(ColorMode::Light);
//! assert!(store.is_dark_mode());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::StoreOptions;
use crate::error::ThemeError;
use crate::persist::{load, persist};
use crate::storage::ThemeStorage;
use crate::subscription::{ListenerSet, Subscription};
use crate::surface::StyleSurface;
use crate::theme::{ColorMode, ColorSchemeSource, ThemeConfig};

/// Read/write interface exposed to UI consumers.
///
/// Consumers never touch state directly; the two actions are the only write
/// path.
pub trait ThemeContext {
    /// The current theme.
    fn theme(&self) -> ThemeConfig;

    /// Replaces, persists and applies a theme.
    ///
    /// In-memory state and the surface are updated even when persisting
    /// fails; the error only reports that the change will not survive a
    /// reload.
    fn set_theme(&self, config: ThemeConfig) -> Result<(), ThemeError>;

    /// Flips the effective dark-mode flag and returns the new value.
    ///
    /// When `dark_mode.auto` is off, the new value is persisted as
    /// `dark_mode.default`. When it is on, the flip is transient and is
    /// replaced by the next OS notification or reload.
    fn toggle_dark_mode(&self) -> Result<bool, ThemeError>;

    /// The effective dark-mode flag.
    fn is_dark_mode(&self) -> bool;
}

/// State delivered to [`ThemeStore::watch`] listeners after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub theme: ThemeConfig,
    pub is_dark_mode: bool,
}

#[derive(Debug)]
struct StoreState {
    config: ThemeConfig,
    is_dark: bool,
}

/// The color-scheme source handed to [`ThemeStore::start`].
///
/// `listener` is live only while the config follows the OS.
struct SchemeLink {
    generation: u64,
    source: Rc<dyn ColorSchemeSource>,
    listener: Option<Subscription>,
}

struct Inner<S, R> {
    storage: S,
    surface: R,
    options: StoreOptions,
    state: RefCell<StoreState>,
    watchers: ListenerSet<ThemeSnapshot>,
    scheme: RefCell<Option<SchemeLink>>,
    next_generation: Cell<u64>,
}

/// Owner of theme state.
///
/// A cheap, clonable, single-threaded handle; clones refer to the same store.
/// Construct one per UI tree and pass it to whatever needs it.
pub struct ThemeStore<S, R> {
    inner: Rc<Inner<S, R>>,
}

impl<S, R> Clone for ThemeStore<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, R> ThemeStore<S, R>
where
    S: ThemeStorage + 'static,
    R: StyleSurface + 'static,
{
    /// Creates a store with default [`StoreOptions`], loading and applying
    /// the persisted theme.
    pub fn new(storage: S, surface: R) -> Self {
        Self::with_options(storage, surface, StoreOptions::default())
    }

    /// Creates a store with explicit options.
    pub fn with_options(storage: S, surface: R, options: StoreOptions) -> Self {
        let config = load(&storage, &options.storage_key);
        let store = Self {
            inner: Rc::new(Inner {
                storage,
                surface,
                options,
                state: RefCell::new(StoreState {
                    config: config.clone(),
                    is_dark: false,
                }),
                watchers: ListenerSet::new(),
                scheme: RefCell::new(None),
                next_generation: Cell::new(0),
            }),
        };
        store.apply(&config);
        store
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub fn surface(&self) -> &R {
        &self.inner.surface
    }

    /// Current theme and flag.
    pub fn snapshot(&self) -> ThemeSnapshot {
        let state = self.inner.state.borrow();
        ThemeSnapshot {
            theme: state.config.clone(),
            is_dark_mode: state.is_dark,
        }
    }

    /// Replaces the theme, persists it and applies it.
    ///
    /// If a color-scheme source was [`start`](Self::start)ed and the new config
    /// follows the OS, the flag is re-read from the source right away.
    /// Watchers are notified once, after the surface is updated. The returned
    /// error only covers persistence.
    pub fn set(&self, config: ThemeConfig) -> Result<(), ThemeError> {
        tracing::debug!("setting theme {:?}", config.name);
        self.inner.state.borrow_mut().config = config.clone();

        let persisted = persist(
            &self.inner.storage,
            &self.inner.options.storage_key,
            &config,
        );
        self.apply(&config);
        self.follow_color_scheme();
        self.notify();

        if let Err(e) = &persisted {
            tracing::warn!("theme applied but not persisted: {}", e);
        }
        persisted
    }

    /// Forgets the persisted record and returns to the built-in theme.
    pub fn reset(&self) -> Result<(), ThemeError> {
        tracing::debug!("resetting theme to default");
        let config = ThemeConfig::default();
        self.inner.state.borrow_mut().config = config.clone();

        let removed = self
            .inner
            .storage
            .remove_item(&self.inner.options.storage_key);
        self.apply(&config);
        self.follow_color_scheme();
        self.notify();

        removed.map_err(ThemeError::from)
    }

    /// Starts OS-preference reconciliation against `source`.
    ///
    /// The store keeps `source` while the returned [`Subscription`] lives.
    /// Whenever the config has `dark_mode.enabled && dark_mode.auto`, now or
    /// after a later [`set`](Self::set), the flag is read from `source` and
    /// follows its change notifications. While the config does not follow the
    /// OS, no listener is registered on `source`.
    ///
    /// Starting again replaces the previous source; the older handle then
    /// releases nothing.
    pub fn start<C>(&self, source: Rc<C>) -> Subscription
    where
        C: ColorSchemeSource + 'static,
    {
        let generation = self.inner.next_generation.get();
        self.inner.next_generation.set(generation + 1);

        let previous = self.inner.scheme.replace(Some(SchemeLink {
            generation,
            source,
            listener: None,
        }));
        drop(previous);

        if self.follow_color_scheme() {
            self.notify();
        } else {
            tracing::debug!("theme does not follow the OS color scheme yet; not listening");
        }

        let weak: Weak<Inner<S, R>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let released = {
                let mut scheme = inner.scheme.borrow_mut();
                match scheme.as_ref() {
                    Some(link) if link.generation == generation => scheme.take(),
                    _ => None,
                }
            };
            drop(released);
        })
    }

    /// Registers a listener called with a fresh snapshot after every change.
    pub fn watch(&self, listener: impl Fn(&ThemeSnapshot) + 'static) -> Subscription {
        self.inner.watchers.subscribe(listener)
    }

    /// Writes `config` to the surface and settles the effective flag.
    ///
    /// Every color slot becomes a custom property. An explicit
    /// `dark_mode.default` marks the surface dark; with `default` off and
    /// `auto` off it is cleared. With `auto` on and `default` off, the flag is
    /// left for OS reconciliation to decide.
    fn apply(&self, config: &ThemeConfig) {
        let options = &self.inner.options;
        for (slot, value) in config.colors.slots() {
            self.inner
                .surface
                .set_property(&options.variable_name(slot), value);
        }

        let dark_mode = config.dark_mode;
        if dark_mode.default {
            self.mark_dark(true);
        } else if !dark_mode.auto {
            self.mark_dark(false);
        }
    }

    /// Brings the OS listener in line with the config and, when following,
    /// copies the source's current mode into the flag. Does not notify.
    ///
    /// Returns true if the flag was taken from the source.
    fn follow_color_scheme(&self) -> bool {
        let follows = self.inner.state.borrow().config.dark_mode.follows_os();
        let (mode, stale) = {
            let mut scheme = self.inner.scheme.borrow_mut();
            let Some(link) = scheme.as_mut() else {
                return false;
            };
            if !follows {
                (None, link.listener.take())
            } else {
                if link.listener.is_none() {
                    link.listener = Some(self.listen(&link.source));
                }
                (Some(link.source.color_mode()), None)
            }
        };
        drop(stale);

        match mode {
            Some(mode) => {
                tracing::debug!("reconciling dark mode with OS preference {:?}", mode);
                self.mark_dark(mode.is_dark());
                true
            }
            None => false,
        }
    }

    fn listen(&self, source: &Rc<dyn ColorSchemeSource>) -> Subscription {
        let weak: Weak<Inner<S, R>> = Rc::downgrade(&self.inner);
        source.subscribe(Box::new(move |mode: ColorMode| {
            if let Some(inner) = weak.upgrade() {
                ThemeStore { inner }.on_color_scheme_change(mode);
            }
        }))
    }

    fn on_color_scheme_change(&self, mode: ColorMode) {
        if self.inner.state.borrow().config.dark_mode.follows_os() {
            tracing::debug!("OS color scheme changed to {:?}", mode);
            self.mark_dark(mode.is_dark());
            self.notify();
        } else {
            tracing::debug!("ignoring OS color scheme change; auto mode is off");
        }
    }

    fn mark_dark(&self, dark: bool) {
        self.inner.state.borrow_mut().is_dark = dark;
        self.inner
            .surface
            .toggle_class(&self.inner.options.dark_class, dark);
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        self.inner.watchers.notify(&snapshot);
    }
}

impl<S, R> ThemeContext for ThemeStore<S, R>
where
    S: ThemeStorage + 'static,
    R: StyleSurface + 'static,
{
    fn theme(&self) -> ThemeConfig {
        self.inner.state.borrow().config.clone()
    }

    fn set_theme(&self, config: ThemeConfig) -> Result<(), ThemeError> {
        self.set(config)
    }

    fn toggle_dark_mode(&self) -> Result<bool, ThemeError> {
        let (next, to_persist) = {
            let mut state = self.inner.state.borrow_mut();
            let next = !state.is_dark;
            if state.config.dark_mode.auto {
                (next, None)
            } else {
                state.config.dark_mode.default = next;
                (next, Some(state.config.clone()))
            }
        };

        self.mark_dark(next);
        self.notify();
        tracing::debug!(
            "dark mode toggled to {} ({})",
            next,
            if to_persist.is_some() { "persisted" } else { "transient" }
        );

        if let Some(config) = to_persist {
            persist(
                &self.inner.storage,
                &self.inner.options.storage_key,
                &config,
            )?;
        }
        Ok(next)
    }

    fn is_dark_mode(&self) -> bool {
        self.inner.state.borrow().is_dark
    }
}

impl<S, R> fmt::Debug for ThemeStore<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ThemeStore")
            .field("options", &self.inner.options)
            .field("theme", &state.config.name)
            .field("is_dark", &state.is_dark)
            .field("watchers", &self.inner.watchers.len())
            .field("following_os", &self.inner.scheme.borrow().is_some())
            .finish()
    }
}
