//! Visibility observation seam
//!
//! Mirrors the host's intersection-observer primitive: one subscription per
//! callback, elements added and removed individually, and batched transition
//! records delivered whenever the host decides.

use crate::dom::Document;
use crate::error::Result;

/// Area that visibility is measured against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObserverRoot {
    /// The full viewport
    #[default]
    Viewport,
}

/// Options for a visibility subscription
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Area visibility is measured against
    pub root: ObserverRoot,
    /// CSS margin applied around the root (e.g. `"0px"`, `"0px 0px -10% 0px"`)
    pub root_margin: String,
    /// Fraction of the element (0.0 to 1.0) that must be visible to count as intersecting
    pub threshold: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root: ObserverRoot::Viewport,
            root_margin: "0px".to_string(),
            threshold: 0.0,
        }
    }
}

impl ObserverOptions {
    /// Viewport-rooted options with the given threshold
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }
}

/// One visibility transition record
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry<E> {
    /// The element whose visibility changed
    pub target: E,
    /// Whether the element is now intersecting the root
    pub is_intersecting: bool,
    /// Visible fraction of the element (0.0 to 1.0)
    pub intersection_ratio: f32,
}

impl<E> VisibilityEntry<E> {
    /// A fully visible, intersecting record
    pub fn entered(target: E) -> Self {
        Self {
            target,
            is_intersecting: true,
            intersection_ratio: 1.0,
        }
    }

    /// A non-intersecting record
    pub fn exited(target: E) -> Self {
        Self {
            target,
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

/// Callback invoked with a batch of transition records
pub type VisibilityCallback<E> = Box<dyn FnMut(Vec<VisibilityEntry<E>>)>;

/// Handle to a live visibility subscription
pub trait VisibilityObserver<E> {
    /// Start reporting transitions for `element`
    fn observe(&self, element: &E);

    /// Stop reporting transitions for `element`
    fn unobserve(&self, element: &E);

    /// Stop reporting transitions for every element and release the subscription
    fn disconnect(&self);
}

/// Hosts able to create visibility subscriptions
pub trait VisibilityHost: Document {
    type Observer: VisibilityObserver<Self::Element> + 'static;

    /// Create a subscription. Hosts without visibility observation return
    /// [`RevealError::MissingObservationSupport`](crate::RevealError::MissingObservationSupport).
    fn create_observer(
        &self,
        callback: VisibilityCallback<Self::Element>,
        options: &ObserverOptions,
    ) -> Result<Self::Observer>;
}
