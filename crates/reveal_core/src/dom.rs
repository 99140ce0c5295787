//! Document seam
//!
//! The trigger controller and the style generator never touch a concrete DOM.
//! They talk to the host through these traits, which a browser binding or the
//! [`HeadlessHost`](crate::headless::HeadlessHost) implements.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// Element queries and class-list mutation
pub trait Document {
    /// Host element reference. Equality is element identity.
    type Element: Clone + Eq + Hash + Debug + 'static;

    /// All elements matching the CSS `selector` text, in document order.
    ///
    /// Malformed selectors fail with `InvalidSelector`. Hosts that cannot
    /// evaluate a well-formed selector fail with `UnsupportedSelector`.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// Add `class` to the element's class list (no-op if present)
    fn add_class(&self, element: &Self::Element, class: &str);

    /// Remove `class` from the element's class list (no-op if absent)
    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Whether the element's class list contains `class`
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
}

/// Identified `<style>` nodes in the document head
pub trait StyleHost {
    /// Text of the style node with the given id, if one exists
    fn style_text(&self, id: &str) -> Option<String>;

    /// Remove the style node with the given id. Returns true if one was removed.
    fn remove_style(&self, id: &str) -> bool;

    /// Create a style node with the given id and text and append it to the head
    fn append_style(&self, id: &str, css: &str);
}

impl<T: StyleHost + ?Sized> StyleHost for &T {
    fn style_text(&self, id: &str) -> Option<String> {
        (**self).style_text(id)
    }

    fn remove_style(&self, id: &str) -> bool {
        (**self).remove_style(id)
    }

    fn append_style(&self, id: &str, css: &str) {
        (**self).append_style(id, css)
    }
}
