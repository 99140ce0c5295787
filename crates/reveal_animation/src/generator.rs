//! Style generator
//!
//! Renders presets (or caller-supplied CSS) and writes the result to the
//! style registry. Every call replaces the registry content wholesale.
//!
//! ```rust
//! use reveal_animation::{Animations, TimingOptions};
//! use reveal_core::headless::HeadlessHost;
//!
//! let host = HeadlessHost::new();
//! let animations = Animations::new(&host);
//!
//! let class = animations.fade_in(&TimingOptions::default().duration(0.8));
//! assert_eq!(class, "fade-in");
//! assert!(animations.registry().text().unwrap().contains("@keyframes scroll-fade-in"));
//! ```

use reveal_core::StyleHost;

use crate::descriptor::{AnimationDescriptor, ClassNames, StyleBody};
use crate::easing::Easing;
use crate::keyframe::{Declarations, Keyframes, Transform};
use crate::length::Length;
use crate::presets::{Direction, Preset};
use crate::registry::StyleRegistry;
use crate::timing::TimingOptions;

/// Duration of the base-style transitions, in seconds
const BASE_TRANSITION_SECS: f32 = 0.6;

/// CSS generator bound to a style host
pub struct Animations<H: StyleHost> {
    registry: StyleRegistry<H>,
    classes: ClassNames,
}

impl<H: StyleHost> Animations<H> {
    /// Generator writing to the default registry with the default class names
    pub fn new(host: H) -> Self {
        Self {
            registry: StyleRegistry::new(host),
            classes: ClassNames::default(),
        }
    }

    /// Scope preset rules under different class names
    pub fn with_classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    pub fn registry(&self) -> &StyleRegistry<H> {
        &self.registry
    }

    /// Write the plain reveal rules: `.initial` hidden with a transition,
    /// `.animation` shown. Defines no keyframes.
    pub fn apply_base_styles(&self, initial_class: &str, animation_class: &str) {
        let easing = Easing::STANDARD;
        let initial = Declarations::new()
            .opacity(0.0)
            .set("will-change", "transform, opacity")
            .set(
                "transition",
                format!(
                    "transform {secs}s {easing}, opacity {secs}s {easing}",
                    secs = BASE_TRANSITION_SECS,
                    easing = easing
                ),
            );
        let active = Declarations::new()
            .opacity(1.0)
            .set("transform", format!("{} !important", Transform::None));

        let css = format!(
            ".{} {{ {} }}\n.{} {{ {} }}\n",
            initial_class, initial, animation_class, active
        );
        self.registry.replace(&css);
    }

    // ========================================================================
    // Presets
    // ========================================================================

    pub fn fade_in(&self, timing: &TimingOptions) -> String {
        self.apply(&Preset::FadeIn, timing)
    }

    pub fn fade_in_down(&self, distance: Length, timing: &TimingOptions) -> String {
        self.fade_in_from(Direction::Down, distance, timing)
    }

    pub fn fade_in_up(&self, distance: Length, timing: &TimingOptions) -> String {
        self.fade_in_from(Direction::Up, distance, timing)
    }

    pub fn fade_in_left(&self, distance: Length, timing: &TimingOptions) -> String {
        self.fade_in_from(Direction::Left, distance, timing)
    }

    pub fn fade_in_right(&self, distance: Length, timing: &TimingOptions) -> String {
        self.fade_in_from(Direction::Right, distance, timing)
    }

    fn fade_in_from(&self, direction: Direction, distance: Length, timing: &TimingOptions) -> String {
        self.apply(
            &Preset::FadeInFrom {
                direction,
                distance,
            },
            timing,
        )
    }

    pub fn zoom_in(&self, scale: f32, timing: &TimingOptions) -> String {
        self.apply(&Preset::ZoomIn { scale }, timing)
    }

    pub fn zoom_out(&self, scale: f32, timing: &TimingOptions) -> String {
        self.apply(&Preset::ZoomOut { scale }, timing)
    }

    pub fn flip(&self, timing: &TimingOptions) -> String {
        self.apply(&Preset::Flip, timing)
    }

    pub fn bounce(&self, timing: &TimingOptions) -> String {
        self.apply(&Preset::Bounce, timing)
    }

    /// Write one preset and return its class name
    pub fn apply(&self, preset: &Preset, timing: &TimingOptions) -> String {
        self.write(&preset.descriptor(timing))
    }

    /// Write several presets as one block (still a single replacement) and
    /// return their class names in order
    pub fn apply_presets(&self, presets: &[Preset], timing: &TimingOptions) -> Vec<String> {
        let mut css = String::new();
        let mut names = Vec::with_capacity(presets.len());
        for preset in presets {
            css.push_str(&preset.descriptor(timing).to_css(&self.classes));
            names.push(preset.class_name().to_string());
        }
        self.registry.replace(&css);
        names
    }

    /// Write caller-supplied keyframes and initial declarations verbatim under
    /// `class_name`. The keyframe block is named `scroll-<class_name>`.
    pub fn custom(
        &self,
        class_name: &str,
        keyframes: &str,
        initial_styles: &str,
        timing: &TimingOptions,
    ) -> String {
        let descriptor = AnimationDescriptor {
            class_name: class_name.to_string(),
            keyframes: Keyframes::raw(format!("scroll-{}", class_name), keyframes),
            initial: StyleBody::Raw(initial_styles.to_string()),
            active: Declarations::new(),
            timing: timing.clone(),
        };
        self.write(&descriptor)
    }

    fn write(&self, descriptor: &AnimationDescriptor) -> String {
        self.registry.replace(&descriptor.to_css(&self.classes));
        tracing::debug!(
            class = %descriptor.class_name,
            keyframes = %descriptor.keyframe_name(),
            "animation styles written"
        );
        descriptor.class_name.clone()
    }
}
