//! Headless host
//!
//! A single-threaded, in-memory implementation of every host seam: an element
//! tree with a selector matcher, identified head style nodes, manually driven
//! visibility observers, and a virtual-time scheduler.
//!
//! Tests and non-browser embedders drive it explicitly:
//!
//! ```rust
//! use std::time::Duration;
//! use reveal_core::headless::HeadlessHost;
//! use reveal_core::Document;
//!
//! let host = HeadlessHost::new();
//! let card = host.element("div").class("card").append_to(host.body());
//!
//! host.add_class(&card, "visible");
//! assert!(host.has_class(&card, "visible"));
//!
//! host.advance(Duration::from_millis(16));
//! assert_eq!(host.now(), Duration::from_millis(16));
//! ```
//!
//! `HeadlessHost` is a cheap handle; clones share the same document.

mod document;
mod observer;
mod timers;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub use document::ElementId;
pub use observer::HeadlessObserver;

use document::DocumentState;
use observer::{deliver, ObserverRegistry};
use timers::TimerQueue;

use crate::dom::{Document, StyleHost};
use crate::error::{Result, RevealError};
use crate::observer::{ObserverOptions, VisibilityCallback, VisibilityEntry, VisibilityHost};
use crate::scheduler::{Scheduler, Task};
use crate::selector::SelectorList;

/// Upper bound on tasks run by one [`HeadlessHost::run_until_idle`] call
const MAX_IDLE_TASKS: usize = 10_000;

/// In-memory host
#[derive(Clone)]
pub struct HeadlessHost {
    document: Rc<RefCell<DocumentState>>,
    observers: Rc<RefCell<ObserverRegistry>>,
    timers: Rc<RefCell<TimerQueue>>,
    visibility_supported: bool,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Create a host with an empty `<html><body></body></html>` document
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(DocumentState::new())),
            observers: Rc::new(RefCell::new(ObserverRegistry::default())),
            timers: Rc::new(RefCell::new(TimerQueue::default())),
            visibility_supported: true,
        }
    }

    /// Create a host that refuses to create visibility observers
    pub fn without_visibility_support() -> Self {
        Self {
            visibility_supported: false,
            ..Self::new()
        }
    }

    // ========================================================================
    // Document tree
    // ========================================================================

    /// The `<html>` element
    pub fn root(&self) -> ElementId {
        self.document.borrow().root()
    }

    /// The `<body>` element
    pub fn body(&self) -> ElementId {
        self.document.borrow().body()
    }

    /// Start building an element with the given tag
    pub fn element(&self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            host: self,
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.document.borrow_mut().create(tag)
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    /// Returns false, leaving the tree unchanged, if `child` is `parent` or
    /// one of its ancestors.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> bool {
        self.document.borrow_mut().append_child(parent, child)
    }

    /// Remove an element and its subtree from the document
    pub fn remove_element(&self, element: ElementId) {
        self.document.borrow_mut().remove(element);
    }

    /// Whether the element still exists
    pub fn contains(&self, element: ElementId) -> bool {
        self.document.borrow().contains(element)
    }

    pub fn set_id(&self, element: ElementId, id: &str) {
        self.document.borrow_mut().set_id(element, id);
    }

    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        self.document.borrow_mut().set_attribute(element, name, value);
    }

    /// Snapshot of the element's class list
    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.document.borrow().classes(element)
    }

    /// Number of head style nodes carrying `id`
    pub fn style_count(&self, id: &str) -> usize {
        self.document.borrow().style_count(id)
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Elements currently observed by any connected observer
    pub fn observed(&self) -> Vec<ElementId> {
        self.observers.borrow().observed()
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed().contains(&element)
    }

    /// Number of observers that have not been disconnected
    pub fn active_observers(&self) -> usize {
        self.observers.borrow().active_count()
    }

    /// Options of every connected observer, in creation order
    pub fn observer_options(&self) -> Vec<ObserverOptions> {
        self.observers.borrow().options()
    }

    /// Deliver raw transition records to the observers watching their targets
    pub fn emit(&self, entries: Vec<VisibilityEntry<ElementId>>) {
        let batches = self.observers.borrow().batches_for(&entries);
        deliver(batches);
    }

    /// Report the element as fully visible
    pub fn enter(&self, element: ElementId) {
        self.emit(vec![VisibilityEntry::entered(element)]);
    }

    /// Report the element as no longer visible
    pub fn exit(&self, element: ElementId) {
        self.emit(vec![VisibilityEntry::exited(element)]);
    }

    /// Set the element's visible fraction. Observers are notified only when the
    /// change crosses their threshold.
    pub fn set_visible_ratio(&self, element: ElementId, ratio: f32) {
        let batches = self
            .observers
            .borrow_mut()
            .crossings_for(element, ratio.clamp(0.0, 1.0));
        deliver(batches);
    }

    // ========================================================================
    // Virtual time
    // ========================================================================

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.borrow().now()
    }

    /// Number of scheduled tasks that have not run yet
    pub fn pending_tasks(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Advance virtual time, running every task that becomes due in order.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            let next = self.timers.borrow_mut().pop_due(Some(target));
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        self.timers.borrow_mut().settle_at(target);
        ran
    }

    /// Run scheduled tasks until none remain, advancing time as needed.
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while ran < MAX_IDLE_TASKS {
            let next = self.timers.borrow_mut().pop_due(None);
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
        tracing::warn!("run_until_idle stopped after {} tasks", MAX_IDLE_TASKS);
        ran
    }
}

/// Fluent element construction, see [`HeadlessHost::element`]
pub struct ElementBuilder<'a> {
    host: &'a HeadlessHost,
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
}

impl ElementBuilder<'_> {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Create the element detached from the tree
    pub fn build(self) -> ElementId {
        let mut doc = self.host.document.borrow_mut();
        let element = doc.create(&self.tag);
        if let Some(id) = &self.id {
            doc.set_id(element, id);
        }
        for class in &self.classes {
            doc.add_class(element, class);
        }
        for (name, value) in &self.attributes {
            doc.set_attribute(element, name, value);
        }
        element
    }

    /// Create the element as the last child of `parent`
    pub fn append_to(self, parent: ElementId) -> ElementId {
        let host = self.host;
        let element = self.build();
        host.append_child(parent, element);
        element
    }
}

// ============================================================================
// Host seam implementations
// ============================================================================

impl Document for HeadlessHost {
    type Element = ElementId;

    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.document.borrow().query(&list))
    }

    fn add_class(&self, element: &ElementId, class: &str) {
        self.document.borrow_mut().add_class(*element, class);
    }

    fn remove_class(&self, element: &ElementId, class: &str) {
        self.document.borrow_mut().remove_class(*element, class);
    }

    fn has_class(&self, element: &ElementId, class: &str) -> bool {
        self.document.borrow().has_class(*element, class)
    }
}

impl StyleHost for HeadlessHost {
    fn style_text(&self, id: &str) -> Option<String> {
        self.document.borrow().style_text(id)
    }

    fn remove_style(&self, id: &str) -> bool {
        self.document.borrow_mut().remove_style(id)
    }

    fn append_style(&self, id: &str, css: &str) {
        self.document.borrow_mut().append_style(id, css);
    }
}

impl VisibilityHost for HeadlessHost {
    type Observer = HeadlessObserver;

    fn create_observer(
        &self,
        callback: VisibilityCallback<ElementId>,
        options: &ObserverOptions,
    ) -> Result<HeadlessObserver> {
        if !self.visibility_supported {
            return Err(RevealError::MissingObservationSupport);
        }
        let id = self.observers.borrow_mut().create(callback, options.clone());
        Ok(HeadlessObserver::new(id, self.observers.clone()))
    }
}

impl Scheduler for HeadlessHost {
    fn schedule(&self, delay: Duration, task: Task) {
        self.timers.borrow_mut().push(delay, task);
    }
}
