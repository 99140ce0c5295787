//! Scroll trigger controller
//!
//! Each registered element moves through a small state machine:
//!
//! ```text
//! (unregistered) --register--> Watching --enter--> Pending --delay--> swap
//!                                  ^                                   |
//!                                  +------------- once = false --------+
//!                                                  once = true  -> Fired
//! ```
//!
//! Exit events are ignored, as are enter events for elements that are pending
//! or already fired. The class swap always runs once it has been scheduled; if
//! the element was unregistered (or the trigger torn down) in the meantime the
//! swap still updates the classes and calls `on_after_animate`, but it leaves
//! the watch list alone.
//!
//! User callbacks are never invoked while the controller's state is borrowed,
//! so they may freely call back into the controller.

use std::cell::RefCell;
use std::rc::Rc;

use reveal_core::{
    Result, RevealError, Scheduler, VisibilityEntry, VisibilityHost, VisibilityObserver,
};
use rustc_hash::FxHashMap;

use crate::options::TriggerOptions;
use crate::target::Target;

/// Where a registered element is in its reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    /// Observed, waiting to enter the viewport
    Watching,
    /// Entered; the class swap is scheduled
    Pending,
    /// Revealed with `once` set; no longer observed
    Fired,
}

struct WatchEntry {
    /// Distinguishes registrations of the same element
    generation: u64,
    state: TriggerState,
}

struct Inner<H: VisibilityHost> {
    host: H,
    options: Rc<TriggerOptions<H::Element>>,
    /// `None` once torn down
    observer: Option<H::Observer>,
    /// Bumped for every new subscription
    epoch: u64,
    next_generation: u64,
    entries: FxHashMap<H::Element, WatchEntry>,
}

type Shared<H> = Rc<RefCell<Inner<H>>>;

/// Watches elements and swaps their classes when they scroll into view
///
/// ```rust
/// use std::time::Duration;
/// use reveal_core::headless::HeadlessHost;
/// use reveal_core::Document;
/// use reveal_trigger::{ScrollTrigger, TriggerOptions};
///
/// let host = HeadlessHost::new();
/// let card = host.element("div").class("card").append_to(host.body());
///
/// let trigger = ScrollTrigger::new(host.clone(), TriggerOptions::default()).unwrap();
/// trigger.register(".card").unwrap();
/// assert!(host.has_class(&card, "scroll-animate-init"));
///
/// host.enter(card);
/// host.advance(Duration::ZERO);
/// assert!(host.has_class(&card, "scroll-animate"));
/// assert!(trigger.has_fired(&card));
/// ```
pub struct ScrollTrigger<H>
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    inner: Shared<H>,
    options: Rc<TriggerOptions<H::Element>>,
}

impl<H> ScrollTrigger<H>
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    /// Create a trigger and its visibility subscription.
    ///
    /// Fails with `InvalidThreshold` for a threshold outside `0.0..=1.0` and
    /// with `MissingObservationSupport` when the host cannot observe.
    pub fn new(host: H, options: TriggerOptions<H::Element>) -> Result<Self> {
        let threshold = options.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RevealError::InvalidThreshold(threshold));
        }

        let options = Rc::new(options);
        let inner = Rc::new(RefCell::new(Inner {
            host,
            options: options.clone(),
            observer: None,
            epoch: 0,
            next_generation: 0,
            entries: FxHashMap::default(),
        }));
        connect(&inner)?;

        tracing::debug!(
            threshold,
            delay_ms = options.delay_ms(),
            once = options.once,
            "scroll trigger created"
        );
        Ok(Self { inner, options })
    }

    pub fn options(&self) -> &TriggerOptions<H::Element> {
        &self.options
    }

    /// Start watching the target's elements. Elements already registered are
    /// skipped. Returns the number of newly registered elements.
    pub fn register<'a>(&self, target: impl Into<Target<'a, H::Element>>) -> Result<usize> {
        let mut state = self.inner.borrow_mut();
        if state.observer.is_none() {
            tracing::trace!("register on a torn-down trigger ignored");
            return Ok(0);
        }
        let target: Target<'a, H::Element> = target.into();
        let elements = target.resolve(&state.host)?;

        let Inner {
            host,
            options,
            observer,
            next_generation,
            entries,
            ..
        } = &mut *state;
        let Some(observer) = observer.as_ref() else {
            return Ok(0);
        };

        let mut added = 0;
        for element in elements {
            if entries.contains_key(&element) {
                continue;
            }
            if !options.initial_class.is_empty() {
                host.add_class(&element, &options.initial_class);
            }
            observer.observe(&element);

            *next_generation += 1;
            tracing::debug!(element = ?element, "element registered");
            entries.insert(
                element,
                WatchEntry {
                    generation: *next_generation,
                    state: TriggerState::Watching,
                },
            );
            added += 1;
        }
        Ok(added)
    }

    /// Stop watching the target's elements, whatever their state. Classes are
    /// left as they are. Returns the number of elements removed.
    pub fn unregister<'a>(&self, target: impl Into<Target<'a, H::Element>>) -> Result<usize> {
        let mut state = self.inner.borrow_mut();
        if state.observer.is_none() {
            tracing::trace!("unregister on a torn-down trigger ignored");
            return Ok(0);
        }
        let target: Target<'a, H::Element> = target.into();
        let elements = target.resolve(&state.host)?;

        let Inner {
            observer, entries, ..
        } = &mut *state;
        let Some(observer) = observer.as_ref() else {
            return Ok(0);
        };

        let mut removed = 0;
        for element in elements {
            if entries.remove(&element).is_some() {
                observer.unobserve(&element);
                tracing::debug!(element = ?element, "element unregistered");
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Disconnect the subscription and forget every element. Repeated calls
    /// do nothing.
    pub fn teardown(&self) {
        let observer = {
            let mut state = self.inner.borrow_mut();
            let observer = state.observer.take();
            if observer.is_some() {
                tracing::debug!(watched = state.entries.len(), "scroll trigger torn down");
                state.entries.clear();
            }
            observer
        };
        if let Some(observer) = observer {
            observer.disconnect();
        }
    }

    /// Tear down, then subscribe again with the same options. Previously
    /// watched elements are not restored.
    pub fn reinitialize(&self) -> Result<()> {
        self.teardown();
        connect(&self.inner)?;
        tracing::debug!("scroll trigger reinitialized");
        Ok(())
    }

    pub fn is_registered(&self, element: &H::Element) -> bool {
        self.inner.borrow().entries.contains_key(element)
    }

    /// Whether the element has been revealed and released (`once` only)
    pub fn has_fired(&self, element: &H::Element) -> bool {
        self.state(element) == Some(TriggerState::Fired)
    }

    pub fn state(&self, element: &H::Element) -> Option<TriggerState> {
        self.inner.borrow().entries.get(element).map(|e| e.state)
    }

    /// Number of registered elements
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.borrow().observer.is_none()
    }
}

impl<H> Drop for ScrollTrigger<H>
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Create a subscription for the current epoch
fn connect<H>(inner: &Shared<H>) -> Result<()>
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    let (host, observer_options, epoch) = {
        let mut state = inner.borrow_mut();
        state.epoch += 1;
        (
            state.host.clone(),
            state.options.observer_options(),
            state.epoch,
        )
    };

    let weak = Rc::downgrade(inner);
    let observer = host.create_observer(
        Box::new(move |entries: Vec<VisibilityEntry<H::Element>>| {
            if let Some(inner) = weak.upgrade() {
                on_visibility(&inner, epoch, entries);
            }
        }),
        &observer_options,
    )?;
    inner.borrow_mut().observer = Some(observer);
    Ok(())
}

fn on_visibility<H>(inner: &Shared<H>, epoch: u64, entries: Vec<VisibilityEntry<H::Element>>)
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    for entry in entries {
        if !entry.is_intersecting {
            tracing::trace!(element = ?entry.target, "exit ignored");
            continue;
        }

        let (host, options, generation) = {
            let mut state = inner.borrow_mut();
            if state.epoch != epoch || state.observer.is_none() {
                tracing::trace!(epoch, "stale subscription ignored");
                return;
            }
            let host = state.host.clone();
            let options = state.options.clone();
            match state.entries.get_mut(&entry.target) {
                Some(watch) if watch.state == TriggerState::Watching => {
                    watch.state = TriggerState::Pending;
                    (host, options, watch.generation)
                }
                Some(watch) => {
                    tracing::trace!(element = ?entry.target, state = ?watch.state, "enter ignored");
                    continue;
                }
                None => continue,
            }
        };

        let element = entry.target;
        if let Some(before) = &options.on_before_animate {
            before(&element);
        }

        tracing::debug!(
            element = ?element,
            delay_ms = options.delay_ms(),
            "class swap scheduled"
        );
        let weak = Rc::downgrade(inner);
        let task_host = host.clone();
        host.schedule(
            options.delay,
            Box::new(move || {
                swap_classes(&task_host, &options, &element);
                match weak.upgrade() {
                    Some(inner) => finish_swap(&inner, &element, generation),
                    None => tracing::trace!(element = ?element, "swap after trigger dropped"),
                }
            }),
        );
    }
}

fn swap_classes<H>(host: &H, options: &TriggerOptions<H::Element>, element: &H::Element)
where
    H: VisibilityHost,
{
    if !options.initial_class.is_empty() {
        host.remove_class(element, &options.initial_class);
    }
    if !options.animation_class.is_empty() {
        host.add_class(element, &options.animation_class);
    }
    tracing::debug!(element = ?element, "classes swapped");

    if let Some(after) = &options.on_after_animate {
        after(element);
    }
}

/// Settle the watch entry after a swap, unless it belongs to an older
/// registration
fn finish_swap<H>(inner: &Shared<H>, element: &H::Element, generation: u64)
where
    H: VisibilityHost + Scheduler + Clone + 'static,
{
    let mut state = inner.borrow_mut();
    let once = state.options.once;
    let Inner {
        observer, entries, ..
    } = &mut *state;

    match entries.get_mut(element) {
        Some(watch) if watch.generation == generation => {
            if once {
                watch.state = TriggerState::Fired;
                if let Some(observer) = observer.as_ref() {
                    observer.unobserve(element);
                }
            } else {
                watch.state = TriggerState::Watching;
            }
        }
        _ => tracing::trace!(element = ?element, "stale swap left watch list untouched"),
    }
}
