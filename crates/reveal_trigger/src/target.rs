//! Registration targets

use reveal_core::{Document, Result};

/// What `register` and `unregister` act on
#[derive(Clone, Debug, PartialEq)]
pub enum Target<'a, E> {
    /// A single element
    Element(E),
    /// A collection of elements
    Elements(Vec<E>),
    /// A selector resolved against the whole document
    Selector(&'a str),
}

impl<'a, E> From<&'a str> for Target<'a, E> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<'a, E> From<&'a String> for Target<'a, E> {
    fn from(selector: &'a String) -> Self {
        Target::Selector(selector.as_str())
    }
}

impl<E> From<Vec<E>> for Target<'_, E> {
    fn from(elements: Vec<E>) -> Self {
        Target::Elements(elements)
    }
}

impl<E: Clone> From<&[E]> for Target<'_, E> {
    fn from(elements: &[E]) -> Self {
        Target::Elements(elements.to_vec())
    }
}

impl<E, const N: usize> From<[E; N]> for Target<'_, E> {
    fn from(elements: [E; N]) -> Self {
        Target::Elements(elements.into())
    }
}

impl<E> Target<'_, E> {
    /// The elements this target denotes, in order. Selector text goes to the
    /// host's query, which rejects malformed input with `InvalidSelector`.
    pub fn resolve<D>(self, document: &D) -> Result<Vec<E>>
    where
        D: Document<Element = E> + ?Sized,
    {
        match self {
            Target::Element(element) => Ok(vec![element]),
            Target::Elements(elements) => Ok(elements),
            Target::Selector(selector) => document.query_selector_all(selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::headless::HeadlessHost;
    use reveal_core::RevealError;

    #[test]
    fn test_selector_resolves_in_document_order() {
        let host = HeadlessHost::new();
        let a = host.element("div").class("item").append_to(host.body());
        let b = host.element("div").class("item").append_to(host.body());

        let resolved = Target::from(".item").resolve(&host).unwrap();
        assert_eq!(resolved, vec![a, b]);
    }

    #[test]
    fn test_collections_pass_through() {
        let host = HeadlessHost::new();
        let a = host.element("p").append_to(host.body());
        let b = host.element("p").append_to(host.body());

        assert_eq!(Target::Element(a).resolve(&host).unwrap(), vec![a]);
        assert_eq!(Target::from([b, a]).resolve(&host).unwrap(), vec![b, a]);
        assert_eq!(Target::from(&[a][..]).resolve(&host).unwrap(), vec![a]);
    }

    #[test]
    fn test_malformed_selector() {
        let host = HeadlessHost::new();
        let result = Target::from("..broken").resolve(&host);
        assert!(matches!(result, Err(RevealError::InvalidSelector { .. })));
    }

    #[test]
    fn test_sibling_selector_resolves() {
        let host = HeadlessHost::new();
        let heading = host.element("h2").append_to(host.body());
        let lead = host.element("p").append_to(host.body());
        host.element("p").append_to(host.body());

        assert_eq!(Target::from("h2 + p").resolve(&host).unwrap(), vec![lead]);
        assert_eq!(Target::from(":not(p)").resolve(&host).unwrap().last(), Some(&heading));
    }
}
