//! The style registry: one identified `<style>` node holding the most
//! recently generated CSS

use reveal_core::StyleHost;

/// Id of the style node every generator writes to
pub const STYLE_ELEMENT_ID: &str = "scroll-trigger-animations";

/// Wholesale-replacing writer for a single style node
pub struct StyleRegistry<H: StyleHost> {
    host: H,
    id: String,
}

impl<H: StyleHost> StyleRegistry<H> {
    pub fn new(host: H) -> Self {
        Self::with_id(host, STYLE_ELEMENT_ID)
    }

    pub fn with_id(host: H, id: impl Into<String>) -> Self {
        Self {
            host,
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Remove any existing node, then append a fresh one holding `css`
    pub fn replace(&self, css: &str) {
        let replaced = self.host.remove_style(&self.id);
        self.host.append_style(&self.id, css);
        tracing::debug!(id = %self.id, replaced, bytes = css.len(), "style registry replaced");
    }

    /// Current CSS text, if the node exists
    pub fn text(&self) -> Option<String> {
        self.host.style_text(&self.id)
    }

    /// Remove the node. Returns true if one existed.
    pub fn clear(&self) -> bool {
        let removed = self.host.remove_style(&self.id);
        if removed {
            tracing::debug!(id = %self.id, "style registry cleared");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::headless::HeadlessHost;

    #[test]
    fn test_replace_keeps_single_node() {
        let host = HeadlessHost::new();
        let registry = StyleRegistry::new(&host);

        registry.replace(".a { color: red; }");
        registry.replace(".b { color: blue; }");

        assert_eq!(host.style_count(STYLE_ELEMENT_ID), 1);
        assert_eq!(registry.text().as_deref(), Some(".b { color: blue; }"));
    }

    #[test]
    fn test_clear() {
        let host = HeadlessHost::new();
        let registry = StyleRegistry::with_id(&host, "custom");
        assert!(!registry.clear());

        registry.replace("x");
        assert!(registry.clear());
        assert_eq!(registry.text(), None);
        assert_eq!(host.style_count("custom"), 0);
    }
}
