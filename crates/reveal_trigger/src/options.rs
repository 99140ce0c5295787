//! Trigger options

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use reveal_core::ObserverOptions;

/// Lifecycle hook receiving the element being revealed
pub type ElementCallback<E> = Rc<dyn Fn(&E)>;

/// Configuration for a [`ScrollTrigger`](crate::ScrollTrigger)
///
/// Fields left at their defaults keep the default behavior; each `with_*`
/// call overrides a single field.
pub struct TriggerOptions<E> {
    /// Class applied on registration and removed on reveal. Empty skips it.
    pub initial_class: String,
    /// Class applied on reveal. Empty skips it.
    pub animation_class: String,
    /// Wait between the visibility event and the class swap
    pub delay: Duration,
    /// Visible fraction (0.0 to 1.0) that counts as entering
    pub threshold: f32,
    /// Stop observing an element after it has been revealed
    pub once: bool,
    /// Margin around the viewport, forwarded to the observer
    pub root_margin: String,
    /// Runs synchronously when an element enters
    pub on_before_animate: Option<ElementCallback<E>>,
    /// Runs right after the class swap
    pub on_after_animate: Option<ElementCallback<E>>,
}

impl<E> Default for TriggerOptions<E> {
    fn default() -> Self {
        Self {
            initial_class: "scroll-animate-init".to_string(),
            animation_class: "scroll-animate".to_string(),
            delay: Duration::ZERO,
            threshold: 0.1,
            once: true,
            root_margin: "0px".to_string(),
            on_before_animate: None,
            on_after_animate: None,
        }
    }
}

impl<E> Clone for TriggerOptions<E> {
    fn clone(&self) -> Self {
        Self {
            initial_class: self.initial_class.clone(),
            animation_class: self.animation_class.clone(),
            delay: self.delay,
            threshold: self.threshold,
            once: self.once,
            root_margin: self.root_margin.clone(),
            on_before_animate: self.on_before_animate.clone(),
            on_after_animate: self.on_after_animate.clone(),
        }
    }
}

impl<E> fmt::Debug for TriggerOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerOptions")
            .field("initial_class", &self.initial_class)
            .field("animation_class", &self.animation_class)
            .field("delay", &self.delay)
            .field("threshold", &self.threshold)
            .field("once", &self.once)
            .field("root_margin", &self.root_margin)
            .field("on_before_animate", &self.on_before_animate.is_some())
            .field("on_after_animate", &self.on_after_animate.is_some())
            .finish()
    }
}

impl<E> TriggerOptions<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_class(mut self, class: impl Into<String>) -> Self {
        self.initial_class = class.into();
        self
    }

    pub fn with_animation_class(mut self, class: impl Into<String>) -> Self {
        self.animation_class = class.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_delay_ms(self, millis: u64) -> Self {
        self.with_delay(Duration::from_millis(millis))
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn with_root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = margin.into();
        self
    }

    pub fn on_before_animate(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_before_animate = Some(Rc::new(callback));
        self
    }

    pub fn on_after_animate(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_after_animate = Some(Rc::new(callback));
        self
    }

    /// The delay in whole milliseconds, saturating at `u64::MAX`
    pub fn delay_ms(&self) -> u64 {
        self.delay.as_millis().try_into().unwrap_or(u64::MAX)
    }

    /// Subscription options derived from these settings
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: self.root_margin.clone(),
            ..ObserverOptions::with_threshold(self.threshold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::ObserverRoot;

    #[test]
    fn test_defaults() {
        let options = TriggerOptions::<u32>::default();
        assert_eq!(options.initial_class, "scroll-animate-init");
        assert_eq!(options.animation_class, "scroll-animate");
        assert_eq!(options.delay, Duration::ZERO);
        assert_eq!(options.threshold, 0.1);
        assert!(options.once);
        assert!(options.on_before_animate.is_none());
        assert!(options.on_after_animate.is_none());
    }

    #[test]
    fn test_overrides_are_individual() {
        let options = TriggerOptions::<u32>::new().with_delay_ms(500).with_once(false);
        assert_eq!(options.delay, Duration::from_millis(500));
        assert!(!options.once);
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.initial_class, "scroll-animate-init");
    }

    #[test]
    fn test_delay_ms_saturates() {
        assert_eq!(TriggerOptions::<u32>::new().with_delay_ms(250).delay_ms(), 250);
        let far = TriggerOptions::<u32>::new().with_delay(Duration::MAX);
        assert_eq!(far.delay_ms(), u64::MAX);
    }

    #[test]
    fn test_observer_options() {
        let observer = TriggerOptions::<u32>::new()
            .with_threshold(0.5)
            .with_root_margin("0px 0px -10% 0px")
            .observer_options();
        assert_eq!(observer.root, ObserverRoot::Viewport);
        assert_eq!(observer.threshold, 0.5);
        assert_eq!(observer.root_margin, "0px 0px -10% 0px");
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let options = TriggerOptions::<u32>::new().on_after_animate(|_| {});
        let text = format!("{:?}", options);
        assert!(text.contains("on_after_animate: true"));
        assert!(text.contains("on_before_animate: false"));
    }
}
