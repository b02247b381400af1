//! The styling surface a theme is applied to.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// The element receiving theme variables and classes, usually the document
/// root (`<html>`).
///
/// Methods take `&self`: like a DOM node, the surface is shared and mutated
/// through a handle.
pub trait StyleSurface {
    /// Sets a custom property, e.g. `--primary`.
    fn set_property(&self, name: &str, value: &str);

    /// Adds (`present = true`) or removes a class.
    fn toggle_class(&self, class: &str, present: bool);

    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Default)]
struct RootState {
    properties: BTreeMap<String, String>,
    classes: Vec<String>,
}

/// In-memory model of the document root element.
///
/// Clones share the same element. Use it natively, in tests, or to render a
/// `style` attribute for server-side output.
///
/// # Example
///
/// ```rust
/// use themekeeper::{DocumentRoot, StyleSurface};
///
/// let root = DocumentRoot::new();
/// root.set_property("--primary", "222.2 47.4% 11.2%");
/// root.toggle_class("dark", true);
///
/// assert_eq!(root.to_style_attr(), "--primary: 222.2 47.4% 11.2%;");
/// assert_eq!(root.class_attr(), "dark");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentRoot {
    state: Rc<RefCell<RootState>>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, name: &str) -> Option<String> {
        self.state.borrow().properties.get(name).cloned()
    }

    /// Classes in insertion order.
    pub fn class_list(&self) -> Vec<String> {
        self.state.borrow().classes.clone()
    }

    /// The `class` attribute value.
    pub fn class_attr(&self) -> String {
        self.state.borrow().classes.join(" ")
    }

    /// The `style` attribute value, properties sorted by name.
    pub fn to_style_attr(&self) -> String {
        self.state
            .borrow()
            .properties
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StyleSurface for DocumentRoot {
    fn set_property(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .properties
            .insert(name.to_string(), value.to_string());
    }

    fn toggle_class(&self, class: &str, present: bool) {
        let mut state = self.state.borrow_mut();
        let existing = state.classes.iter().position(|c| c == class);
        match (existing, present) {
            (None, true) => state.classes.push(class.to_string()),
            (Some(index), false) => {
                state.classes.remove(index);
            }
            _ => {}
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.iter().any(|c| c == class)
    }
}
