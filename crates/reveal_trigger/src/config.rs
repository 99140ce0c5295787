//! Serialized trigger configuration
//!
//! The callback-free subset of [`TriggerOptions`], loadable from TOML or JSON:
//!
//! ```toml
//! initial_class = "reveal-hidden"
//! delay_ms = 150
//! threshold = 0.25
//! once = false
//! ```

use std::time::Duration;

use reveal_core::{Result, RevealError};
use serde::{Deserialize, Serialize};

use crate::options::TriggerOptions;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub initial_class: String,
    pub animation_class: String,
    /// Delay before the class swap, in milliseconds
    pub delay_ms: u64,
    pub threshold: f32,
    pub once: bool,
    pub root_margin: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::from_options(&TriggerOptions::<()>::default())
    }
}

impl TriggerConfig {
    /// Parse a TOML document
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| RevealError::Config(e.to_string()))
    }

    /// Parse a JSON object
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| RevealError::Config(e.to_string()))
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RevealError::Config(e.to_string()))
    }

    /// Capture the serializable fields of `options`
    pub fn from_options<E>(options: &TriggerOptions<E>) -> Self {
        Self {
            initial_class: options.initial_class.clone(),
            animation_class: options.animation_class.clone(),
            delay_ms: options.delay_ms(),
            threshold: options.threshold,
            once: options.once,
            root_margin: options.root_margin.clone(),
        }
    }

    /// Options with these settings and no callbacks
    pub fn into_options<E>(self) -> TriggerOptions<E> {
        TriggerOptions {
            initial_class: self.initial_class,
            animation_class: self.animation_class,
            delay: Duration::from_millis(self.delay_ms),
            threshold: self.threshold,
            once: self.once,
            root_margin: self.root_margin,
            on_before_animate: None,
            on_after_animate: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(TriggerConfig::from_toml("").unwrap(), TriggerConfig::default());
        assert_eq!(TriggerConfig::from_json("{}").unwrap(), TriggerConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TriggerConfig::from_toml(
            r#"
            delay_ms = 500
            once = false
            "#,
        )
        .unwrap();
        assert_eq!(config.delay_ms, 500);
        assert!(!config.once);
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.animation_class, "scroll-animate");

        let options: TriggerOptions<u32> = config.into_options();
        assert_eq!(options.delay, Duration::from_millis(500));
        assert_eq!(options.root_margin, "0px");
    }

    #[test]
    fn test_json() {
        let config = TriggerConfig::from_json(
            r#"{ "initial_class": "hidden", "animation_class": "shown", "threshold": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(config.initial_class, "hidden");
        assert_eq!(config.animation_class, "shown");
        assert_eq!(config.threshold, 0.5);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            TriggerConfig::from_toml("delay_ms = \"soon\""),
            Err(RevealError::Config(_))
        ));
        assert!(matches!(
            TriggerConfig::from_json("{ \"once\": 1 "),
            Err(RevealError::Config(_))
        ));
    }

    #[test]
    fn test_toml_output_reloads() {
        let config = TriggerConfig {
            delay_ms: 250,
            ..TriggerConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("delay_ms = 250"));
        assert_eq!(TriggerConfig::from_toml(&text).unwrap(), config);
    }
}
