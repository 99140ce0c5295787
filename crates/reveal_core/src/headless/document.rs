//! In-memory element tree with a selector matcher

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList, SelectorPart,
};

new_key_type! {
    /// Handle to an element in a headless document
    pub struct ElementId;
}

struct Node {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attributes: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: SmallVec::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
        }
    }
}

struct StyleNode {
    id: String,
    css: String,
}

/// Element tree plus the head's style nodes
pub(crate) struct DocumentState {
    nodes: SlotMap<ElementId, Node>,
    root: ElementId,
    body: ElementId,
    styles: Vec<StyleNode>,
}

impl DocumentState {
    pub(crate) fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("html"));
        let body = nodes.insert(Node::new("body"));
        nodes[body].parent = Some(root);
        nodes[root].children.push(body);
        Self {
            nodes,
            root,
            body,
            styles: Vec::new(),
        }
    }

    pub(crate) fn root(&self) -> ElementId {
        self.root
    }

    pub(crate) fn body(&self) -> ElementId {
        self.body
    }

    pub(crate) fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(element)
    }

    pub(crate) fn create(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Node::new(tag))
    }

    /// Returns false when either element is gone or `child` is `parent` or one
    /// of its ancestors.
    pub(crate) fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub(crate) fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element).and_then(|n| n.parent)
    }

    fn detach(&mut self, element: ElementId) {
        if let Some(parent) = self.nodes.get_mut(element).and_then(|n| n.parent.take()) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != element);
            }
        }
    }

    /// Remove an element and its subtree. The root and body cannot be removed.
    pub(crate) fn remove(&mut self, element: ElementId) {
        if element == self.root || element == self.body {
            return;
        }
        self.detach(element);
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
            }
        }
    }

    pub(crate) fn set_id(&mut self, element: ElementId, id: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.id = Some(id.to_string());
        }
    }

    pub(crate) fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(element) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        if let Some(slot) = node.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.to_string();
        } else {
            node.attributes.push((name, value.to_string()));
        }
    }

    pub(crate) fn classes(&self, element: ElementId) -> Vec<String> {
        self.nodes
            .get(element)
            .map(|n| n.classes.to_vec())
            .unwrap_or_default()
    }

    pub(crate) fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    pub(crate) fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    pub(crate) fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    // ========================================================================
    // Style nodes
    // ========================================================================

    pub(crate) fn style_text(&self, id: &str) -> Option<String> {
        self.styles.iter().find(|s| s.id == id).map(|s| s.css.clone())
    }

    pub(crate) fn style_count(&self, id: &str) -> usize {
        self.styles.iter().filter(|s| s.id == id).count()
    }

    pub(crate) fn remove_style(&mut self, id: &str) -> bool {
        match self.styles.iter().position(|s| s.id == id) {
            Some(index) => {
                self.styles.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn append_style(&mut self, id: &str, css: &str) {
        self.styles.push(StyleNode {
            id: id.to_string(),
            css: css.to_string(),
        });
    }

    // ========================================================================
    // Selector matching
    // ========================================================================

    /// All elements matching any selector of the list, in document order
    pub(crate) fn query(&self, list: &SelectorList) -> Vec<ElementId> {
        let mut matches = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if list.selectors().iter().any(|sel| self.matches_complex(id, sel)) {
                matches.push(id);
            }
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        matches
    }

    fn matches_complex(&self, element: ElementId, selector: &ComplexSelector) -> bool {
        match selector.segments.len() {
            0 => false,
            n => self.matches_from(element, &selector.segments, n - 1),
        }
    }

    /// Match segment `index` against `element`, then walk the tree for the
    /// segments to its left.
    fn matches_from(
        &self,
        element: ElementId,
        segments: &[(CompoundSelector, Option<Combinator>)],
        index: usize,
    ) -> bool {
        let (compound, _) = &segments[index];
        if !self.matches_compound(element, compound) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let parent = self.parent(element);
        let mut earlier = self.preceding_siblings(element).into_iter().rev();
        match segments[index - 1].1 {
            Some(Combinator::Child) => {
                parent.is_some_and(|p| self.matches_from(p, segments, index - 1))
            }
            Some(Combinator::NextSibling) => {
                earlier.next().is_some_and(|s| self.matches_from(s, segments, index - 1))
            }
            Some(Combinator::SubsequentSibling) => {
                earlier.any(|s| self.matches_from(s, segments, index - 1))
            }
            Some(Combinator::Descendant) | None => {
                let mut ancestor = parent;
                while let Some(a) = ancestor {
                    if self.matches_from(a, segments, index - 1) {
                        return true;
                    }
                    ancestor = self.parent(a);
                }
                false
            }
        }
    }

    fn siblings(&self, element: ElementId) -> &[ElementId] {
        self.parent(element)
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.children.as_slice())
            .unwrap_or_default()
    }

    /// Siblings before `element`, in document order
    fn preceding_siblings(&self, element: ElementId) -> Vec<ElementId> {
        let siblings = self.siblings(element);
        match siblings.iter().position(|c| *c == element) {
            Some(position) => siblings[..position].to_vec(),
            None => Vec::new(),
        }
    }

    fn matches_compound(&self, element: ElementId, compound: &CompoundSelector) -> bool {
        let Some(node) = self.nodes.get(element) else {
            return false;
        };
        compound.parts.iter().all(|part| match part {
            SelectorPart::Universal => true,
            SelectorPart::Type(tag) => node.tag == *tag,
            SelectorPart::Id(id) => node.id.as_deref() == Some(id.as_str()),
            SelectorPart::Class(class) => node.classes.iter().any(|c| c == class),
            SelectorPart::Attribute(attr) => node
                .attribute(&attr.name)
                .is_some_and(|value| attr.matcher.matches(&value, attr.case_insensitive)),
            SelectorPart::PseudoClass(pseudo) => self.matches_pseudo(node, element, pseudo),
            SelectorPart::PseudoElement(_) => false,
        })
    }

    fn matches_pseudo(&self, node: &Node, element: ElementId, pseudo: &PseudoClass) -> bool {
        match pseudo {
            PseudoClass::Root => element == self.root,
            PseudoClass::Empty => node.children.is_empty(),
            PseudoClass::Defined => true,
            PseudoClass::Not(list) => !list.iter().any(|sel| self.matches_complex(element, sel)),
            PseudoClass::Is(list) => list.iter().any(|sel| self.matches_complex(element, sel)),
            // No pointer, focus or form state in a headless document
            PseudoClass::State(_) => false,
            structural => self.matches_structural(node, element, structural),
        }
    }

    fn matches_structural(&self, node: &Node, element: ElementId, pseudo: &PseudoClass) -> bool {
        if node.parent.is_none() {
            return false;
        }
        let all = self.siblings(element);
        let same_type: Vec<ElementId> = all
            .iter()
            .copied()
            .filter(|s| self.nodes.get(*s).is_some_and(|n| n.tag == node.tag))
            .collect();

        // 1-based position from the start and from the end
        let place = |siblings: &[ElementId]| {
            siblings
                .iter()
                .position(|c| *c == element)
                .map(|at| (at + 1, siblings.len() - at))
        };
        let (Some((index, from_end)), Some((type_index, type_from_end))) =
            (place(all), place(same_type.as_slice()))
        else {
            return false;
        };

        match pseudo {
            PseudoClass::FirstChild => index == 1,
            PseudoClass::LastChild => from_end == 1,
            PseudoClass::OnlyChild => all.len() == 1,
            PseudoClass::FirstOfType => type_index == 1,
            PseudoClass::LastOfType => type_from_end == 1,
            PseudoClass::OnlyOfType => same_type.len() == 1,
            PseudoClass::NthChild(nth) => nth.matches(index),
            PseudoClass::NthLastChild(nth) => nth.matches(from_end),
            PseudoClass::NthOfType(nth) => nth.matches(type_index),
            PseudoClass::NthLastOfType(nth) => nth.matches(type_from_end),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(selector: &str) -> SelectorList {
        SelectorList::parse(selector).unwrap()
    }

    /// `<ul>` with `h2, p.a, p, span.b, p` children
    fn siblings_fixture() -> (DocumentState, Vec<ElementId>) {
        let mut doc = DocumentState::new();
        let ul = doc.create("ul");
        doc.append_child(doc.body(), ul);
        let mut items = Vec::new();
        for (tag, class) in [("h2", ""), ("p", "a"), ("p", ""), ("span", "b"), ("p", "")] {
            let item = doc.create(tag);
            if !class.is_empty() {
                doc.add_class(item, class);
            }
            doc.append_child(ul, item);
            items.push(item);
        }
        (doc, items)
    }

    #[test]
    fn test_sibling_combinators() {
        let (doc, items) = siblings_fixture();
        assert_eq!(doc.query(&list("h2 + p")), vec![items[1]]);
        assert_eq!(doc.query(&list("h2 ~ p")), vec![items[1], items[2], items[4]]);
        assert_eq!(doc.query(&list(".a ~ .b")), vec![items[3]]);
        assert_eq!(doc.query(&list(".a + .b")), Vec::<ElementId>::new());
    }

    #[test]
    fn test_typed_and_nth_pseudo_classes() {
        let (doc, items) = siblings_fixture();
        assert_eq!(doc.query(&list("p:first-of-type")), vec![items[1]]);
        assert_eq!(doc.query(&list("p:last-of-type")), vec![items[4]]);
        assert_eq!(doc.query(&list("ul > :only-of-type")), vec![items[0], items[3]]);
        assert_eq!(doc.query(&list("ul > :nth-child(2n)")), vec![items[1], items[3]]);
        assert_eq!(doc.query(&list("ul > :nth-last-child(1)")), vec![items[4]]);
        assert_eq!(doc.query(&list("p:nth-of-type(odd)")), vec![items[1], items[4]]);
    }

    #[test]
    fn test_logical_and_state_pseudo_classes() {
        let (doc, items) = siblings_fixture();
        assert_eq!(doc.query(&list("ul > p:not(.a)")), vec![items[2], items[4]]);
        assert_eq!(doc.query(&list("ul > :is(h2, .b)")), vec![items[0], items[3]]);
        assert!(doc.query(&list("p:hover")).is_empty());
        assert_eq!(doc.query(&list("ul > p:not(:hover)")).len(), 3);
        assert_eq!(doc.query(&list(":root")), vec![doc.root()]);
        assert!(doc.query(&list("p::before")).is_empty());
    }

    #[test]
    fn test_attribute_operators_and_escapes() {
        let mut doc = DocumentState::new();
        let link = doc.create("a");
        doc.set_attribute(link, "href", "/files/Report.PDF");
        doc.add_class(link, "md:flex");
        doc.append_child(doc.body(), link);

        assert_eq!(doc.query(&list("[href^='/files']")), vec![link]);
        assert_eq!(doc.query(&list("[href$='.pdf' i]")), vec![link]);
        assert!(doc.query(&list("[href$='.pdf']")).is_empty());
        assert_eq!(doc.query(&list("[class*=flex]")), vec![link]);
        assert_eq!(doc.query(&list(".md\\:flex")), vec![link]);
    }

    #[test]
    fn test_append_child_refuses_cycles() {
        let mut doc = DocumentState::new();
        let outer = doc.create("div");
        let inner = doc.create("div");
        assert!(doc.append_child(doc.body(), outer));
        assert!(doc.append_child(outer, inner));

        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));
        assert!(!doc.append_child(inner, doc.root()));
        assert_eq!(doc.parent(outer), Some(doc.body()));
        assert_eq!(doc.query(&list("body > div > div")), vec![inner]);
    }
}
