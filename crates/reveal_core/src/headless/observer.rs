//! Manually driven visibility observers

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use super::document::ElementId;
use crate::observer::{ObserverOptions, VisibilityCallback, VisibilityEntry, VisibilityObserver};

new_key_type! {
    pub(crate) struct ObserverId;
}

pub(crate) type SharedCallback = Rc<RefCell<VisibilityCallback<ElementId>>>;

struct ObserverSlot {
    callback: Option<SharedCallback>,
    options: ObserverOptions,
    targets: Vec<ElementId>,
    /// Last intersecting state reported per target, for threshold crossing
    reported: FxHashMap<ElementId, bool>,
}

impl ObserverSlot {
    fn is_connected(&self) -> bool {
        self.callback.is_some()
    }
}

/// All observers created by one headless host
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    slots: SlotMap<ObserverId, ObserverSlot>,
}

impl ObserverRegistry {
    pub(crate) fn create(
        &mut self,
        callback: VisibilityCallback<ElementId>,
        options: ObserverOptions,
    ) -> ObserverId {
        self.slots.insert(ObserverSlot {
            callback: Some(Rc::new(RefCell::new(callback))),
            options,
            targets: Vec::new(),
            reported: FxHashMap::default(),
        })
    }

    pub(crate) fn active_count(&self) -> usize {
        self.slots.values().filter(|s| s.is_connected()).count()
    }

    pub(crate) fn options(&self) -> Vec<ObserverOptions> {
        self.slots
            .values()
            .filter(|s| s.is_connected())
            .map(|s| s.options.clone())
            .collect()
    }

    /// Elements observed by any connected observer, deduplicated
    pub(crate) fn observed(&self) -> Vec<ElementId> {
        let mut all: Vec<ElementId> = Vec::new();
        for slot in self.slots.values().filter(|s| s.is_connected()) {
            for target in &slot.targets {
                if !all.contains(target) {
                    all.push(*target);
                }
            }
        }
        all
    }

    /// Route raw entries to the observers watching their targets
    pub(crate) fn batches_for(
        &self,
        entries: &[VisibilityEntry<ElementId>],
    ) -> Vec<(SharedCallback, Vec<VisibilityEntry<ElementId>>)> {
        self.slots
            .values()
            .filter_map(|slot| {
                let callback = slot.callback.as_ref()?;
                let batch: Vec<_> = entries
                    .iter()
                    .filter(|e| slot.targets.contains(&e.target))
                    .cloned()
                    .collect();
                (!batch.is_empty()).then(|| (callback.clone(), batch))
            })
            .collect()
    }

    /// Record a new visible ratio and produce entries for observers whose
    /// threshold was crossed.
    pub(crate) fn crossings_for(
        &mut self,
        element: ElementId,
        ratio: f32,
    ) -> Vec<(SharedCallback, Vec<VisibilityEntry<ElementId>>)> {
        let mut batches = Vec::new();
        for slot in self.slots.values_mut() {
            let Some(callback) = slot.callback.as_ref() else {
                continue;
            };
            if !slot.targets.contains(&element) {
                continue;
            }
            let threshold = slot.options.threshold;
            let intersecting = if threshold <= 0.0 {
                ratio > 0.0
            } else {
                ratio >= threshold
            };
            let previous = slot.reported.insert(element, intersecting).unwrap_or(false);
            if previous != intersecting {
                batches.push((
                    callback.clone(),
                    vec![VisibilityEntry {
                        target: element,
                        is_intersecting: intersecting,
                        intersection_ratio: ratio,
                    }],
                ));
            }
        }
        batches
    }

    fn observe(&mut self, id: ObserverId, element: ElementId) {
        if let Some(slot) = self.slots.get_mut(id).filter(|s| s.is_connected()) {
            if !slot.targets.contains(&element) {
                slot.targets.push(element);
            }
        }
    }

    fn unobserve(&mut self, id: ObserverId, element: ElementId) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.targets.retain(|t| *t != element);
            slot.reported.remove(&element);
        }
    }

    /// Returns the released callback so it can be dropped outside the borrow
    fn disconnect(&mut self, id: ObserverId) -> Option<SharedCallback> {
        let slot = self.slots.get_mut(id)?;
        slot.targets.clear();
        slot.reported.clear();
        slot.callback.take()
    }
}

/// Observer handle returned by [`HeadlessHost`](super::HeadlessHost)
pub struct HeadlessObserver {
    id: ObserverId,
    registry: Rc<RefCell<ObserverRegistry>>,
}

impl HeadlessObserver {
    pub(crate) fn new(id: ObserverId, registry: Rc<RefCell<ObserverRegistry>>) -> Self {
        Self { id, registry }
    }
}

impl VisibilityObserver<ElementId> for HeadlessObserver {
    fn observe(&self, element: &ElementId) {
        self.registry.borrow_mut().observe(self.id, *element);
    }

    fn unobserve(&self, element: &ElementId) {
        self.registry.borrow_mut().unobserve(self.id, *element);
    }

    fn disconnect(&self) {
        let released = self.registry.borrow_mut().disconnect(self.id);
        drop(released);
    }
}

/// Invoke each batch's callback with no registry borrow held
pub(crate) fn deliver(batches: Vec<(SharedCallback, Vec<VisibilityEntry<ElementId>>)>) {
    for (callback, entries) in batches {
        match callback.try_borrow_mut() {
            Ok(mut f) => (&mut *f)(entries),
            Err(_) => tracing::warn!(
                "dropping {} visibility entries: observer callback is already running",
                entries.len()
            ),
        }
    }
}
