//! Reveal Trigger
//!
//! Adds an "initial" class to registered elements and swaps it for an
//! "animation" class once they scroll into view.
//!
//! # Features
//!
//! - **ScrollTrigger**: per-instance watch list driven by the host's
//!   visibility observer, with optional delay and once-only reveals
//! - **Options**: `TriggerOptions` with lifecycle callbacks, plus a
//!   serde-backed `TriggerConfig` loadable from TOML or JSON
//! - **Targets**: single elements, collections, or selectors

pub mod config;
pub mod controller;
pub mod options;
pub mod target;

pub use config::TriggerConfig;
pub use controller::{ScrollTrigger, TriggerState};
pub use options::{ElementCallback, TriggerOptions};
pub use target::Target;
