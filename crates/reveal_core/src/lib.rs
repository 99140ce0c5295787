//! Reveal Core
//!
//! Host seam and shared plumbing for scroll-triggered CSS animations.
//!
//! # Features
//!
//! - **Host Seam**: `Document`, `StyleHost`, `VisibilityHost` and `Scheduler`
//!   traits stand in for the browser's DOM, intersection observer and timers
//! - **Selectors**: nom-based selector parsing with precise `InvalidSelector` errors
//! - **Headless Host**: an in-memory implementation of every seam, driven by
//!   virtual time, for tests and non-browser embedders

pub mod dom;
pub mod error;
pub mod headless;
pub mod observer;
pub mod scheduler;
pub mod selector;

pub use dom::{Document, StyleHost};
pub use error::{Result, RevealError};
pub use observer::{
    ObserverOptions, ObserverRoot, VisibilityCallback, VisibilityEntry, VisibilityHost,
    VisibilityObserver,
};
pub use scheduler::{Scheduler, Task};
pub use selector::SelectorList;
