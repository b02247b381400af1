//! Browser bindings for the store's platform traits.
//!
//! Enabled by the `web` feature. Each type wraps the DOM object it stands
//! for:
//!
//! - [`LocalStorage`]: `window.localStorage`
//! - [`DocumentElement`]: `document.documentElement` (`<html>`)
//! - [`MediaQueryScheme`]: `matchMedia("(prefers-color-scheme: dark)")`
//!
//! ```rust,ignore
//! use std::rc::Rc;
//!
//! use themekeeper::{DocumentElement, LocalStorage, MediaQueryScheme, ThemeStore};
//!
//! let store = ThemeStore::new(LocalStorage::new()?, DocumentElement::new()?);
//! let subscription = store.start(Rc::new(MediaQueryScheme::new()?));
//! ```

use std::fmt;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlElement, MediaQueryList, Storage, Window};

use crate::error::StorageError;
use crate::storage::ThemeStorage;
use crate::subscription::Subscription;
use crate::surface::StyleSurface;
use crate::theme::{ColorMode, ColorSchemeSource};

/// Media query matching an OS-level dark preference.
pub const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn window() -> Result<Window, StorageError> {
    web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))
}

fn js_error(context: &str, err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{context}: {err:?}"))
}

/// [`ThemeStorage`] over the browser's `localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Opens the window's local storage.
    ///
    /// Fails when there is no window or the browser blocks storage (private
    /// mode, disabled cookies).
    pub fn new() -> Result<Self, StorageError> {
        let storage = window()?
            .local_storage()
            .map_err(|e| js_error("localStorage", e))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))?;
        Ok(Self { storage })
    }
}

impl ThemeStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("getItem", e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("setItem", e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("removeItem", e))
    }
}

/// [`StyleSurface`] over the document's root element.
#[derive(Debug, Clone)]
pub struct DocumentElement {
    element: HtmlElement,
}

impl DocumentElement {
    /// Wraps `document.documentElement`.
    pub fn new() -> Result<Self, StorageError> {
        let element = window()?
            .document()
            .and_then(|document| document.document_element())
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| StorageError::Unavailable("no document element".into()))?;
        Ok(Self::from_element(element))
    }

    /// Wraps any element, e.g. a preview container.
    pub fn from_element(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl StyleSurface for DocumentElement {
    fn set_property(&self, name: &str, value: &str) {
        if let Err(e) = self.element.style().set_property(name, value) {
            tracing::warn!("failed to set {}: {:?}", name, e);
        }
    }

    fn toggle_class(&self, class: &str, present: bool) {
        if let Err(e) = self.element.class_list().toggle_with_force(class, present) {
            tracing::warn!("failed to toggle class {}: {:?}", class, e);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }
}

/// [`ColorSchemeSource`] over a `prefers-color-scheme` media query.
#[derive(Clone)]
pub struct MediaQueryScheme {
    query: MediaQueryList,
}

impl MediaQueryScheme {
    /// Evaluates [`DARK_QUERY`] against the window.
    pub fn new() -> Result<Self, StorageError> {
        let query = window()?
            .match_media(DARK_QUERY)
            .map_err(|e| js_error("matchMedia", e))?
            .ok_or_else(|| StorageError::Unavailable("matchMedia returned null".into()))?;
        Ok(Self { query })
    }
}

impl ColorSchemeSource for MediaQueryScheme {
    fn color_mode(&self) -> ColorMode {
        ColorMode::from_dark(self.query.matches())
    }

    fn subscribe(&self, listener: Box<dyn Fn(ColorMode)>) -> Subscription {
        let query = self.query.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            listener(ColorMode::from_dark(query.matches()));
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = self
            .query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to listen for color scheme changes: {:?}", e);
            return Subscription::new(|| {});
        }

        let query = self.query.clone();
        Subscription::new(move || {
            if let Err(e) = query
                .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            {
                tracing::warn!("failed to remove color scheme listener: {:?}", e);
            }
            drop(closure);
        })
    }
}

impl fmt::Debug for MediaQueryScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaQueryScheme")
            .field("media", &self.query.media())
            .field("matches", &self.query.matches())
            .finish()
    }
}
