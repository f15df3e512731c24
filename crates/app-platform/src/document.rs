//! Host document model
//!
//! [`HostDocument`] is the write surface the appearance layer patches:
//! classes on the root element, inline style properties on the root, body
//! and app container, and the `<meta>` hints in the document head.
//! [`Document`] is the in-memory implementation used for headless rendering
//! and tests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Element an inline style property is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StyleTarget {
    /// The document root (`<html>`)
    Root,
    /// The document body
    Body,
    /// The application mount container
    AppRoot,
}

/// A `<meta name=... content=...>` element in the document head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// Meta name attribute
    pub name: String,
    /// Meta content attribute
    pub content: String,
}

/// Inline style value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleValue {
    /// CSS value
    pub value: String,
    /// Whether the value is marked `!important`
    pub important: bool,
}

/// Write surface for appearance hints
pub trait HostDocument: Send {
    /// Add a class to the root element
    fn add_root_class(&mut self, class: &str);

    /// Remove a class from the root element
    fn remove_root_class(&mut self, class: &str);

    /// Check whether the root element carries a class
    fn has_root_class(&self, class: &str) -> bool;

    /// Set an inline style property on an element
    fn set_style_property(&mut self, target: StyleTarget, name: &str, value: &str, important: bool);

    /// Read an inline style property
    fn style_property(&self, target: StyleTarget, name: &str) -> Option<String>;

    /// Remove every meta element with the given name, returning how many were removed
    fn remove_meta(&mut self, name: &str) -> usize;

    /// Append a meta element to the head
    fn append_meta(&mut self, name: &str, content: &str);

    /// Contents of every meta element with the given name, in document order
    fn meta_contents(&self, name: &str) -> Vec<String>;

    /// Replace the viewport meta with a fresh copy so the host recomputes its chrome
    fn refresh_viewport(&mut self);
}

/// In-memory document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root_classes: BTreeSet<String>,
    styles: BTreeMap<(StyleTarget, String), StyleValue>,
    head: Vec<MetaTag>,
    viewport_refreshes: u32,
}

impl Document {
    /// An empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with a single `theme-color` meta, as served by the page template
    pub fn with_theme_color(content: &str) -> Self {
        let mut doc = Self::new();
        doc.append_meta("viewport", "width=device-width, initial-scale=1, viewport-fit=cover");
        doc.append_meta("theme-color", content);
        doc
    }

    /// Root element classes, sorted
    pub fn root_classes(&self) -> Vec<&str> {
        self.root_classes.iter().map(String::as_str).collect()
    }

    /// All meta elements in document order
    pub fn head(&self) -> &[MetaTag] {
        &self.head
    }

    /// Number of times the viewport meta was refreshed
    pub fn viewport_refreshes(&self) -> u32 {
        self.viewport_refreshes
    }

    /// Full inline style entry for an element property
    pub fn style_entry(&self, target: StyleTarget, name: &str) -> Option<&StyleValue> {
        self.styles.get(&(target, name.to_string()))
    }
}

impl HostDocument for Document {
    fn add_root_class(&mut self, class: &str) {
        self.root_classes.insert(class.to_string());
    }

    fn remove_root_class(&mut self, class: &str) {
        self.root_classes.remove(class);
    }

    fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    fn set_style_property(&mut self, target: StyleTarget, name: &str, value: &str, important: bool) {
        self.styles.insert(
            (target, name.to_string()),
            StyleValue { value: value.to_string(), important },
        );
    }

    fn style_property(&self, target: StyleTarget, name: &str) -> Option<String> {
        self.style_entry(target, name).map(|v| v.value.clone())
    }

    fn remove_meta(&mut self, name: &str) -> usize {
        let before = self.head.len();
        self.head.retain(|m| m.name != name);
        before - self.head.len()
    }

    fn append_meta(&mut self, name: &str, content: &str) {
        self.head.push(MetaTag { name: name.to_string(), content: content.to_string() });
    }

    fn meta_contents(&self, name: &str) -> Vec<String> {
        self.head
            .iter()
            .filter(|m| m.name == name)
            .map(|m| m.content.clone())
            .collect()
    }

    fn refresh_viewport(&mut self) {
        if let Some(pos) = self.head.iter().position(|m| m.name == "viewport") {
            let viewport = self.head.remove(pos);
            self.head.insert(pos, viewport);
            self.viewport_refreshes += 1;
        }
    }
}
