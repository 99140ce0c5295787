//! Animation descriptors and their CSS rendering

use std::fmt;

use crate::keyframe::{Declarations, Keyframes};
use crate::timing::TimingOptions;

/// Class names rules are scoped under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassNames {
    /// Applied on registration, before the element is revealed
    pub initial: String,
    /// Applied once the element has been revealed
    pub animate: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            initial: "scroll-animate-init".to_string(),
            animate: "scroll-animate".to_string(),
        }
    }
}

impl ClassNames {
    pub fn new(initial: impl Into<String>, animate: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            animate: animate.into(),
        }
    }
}

/// Body of the initial-state rule
#[derive(Clone, Debug, PartialEq)]
pub enum StyleBody {
    Declarations(Declarations),
    Raw(String),
}

impl From<Declarations> for StyleBody {
    fn from(d: Declarations) -> Self {
        StyleBody::Declarations(d)
    }
}

impl fmt::Display for StyleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleBody::Declarations(d) => fmt::Display::fmt(d, f),
            StyleBody::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Everything needed to render one animation class
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDescriptor {
    pub class_name: String,
    pub keyframes: Keyframes,
    /// Visual state before the reveal
    pub initial: StyleBody,
    /// Extra declarations emitted before the `animation` shorthand
    pub active: Declarations,
    pub timing: TimingOptions,
}

impl AnimationDescriptor {
    pub fn keyframe_name(&self) -> &str {
        &self.keyframes.name
    }

    /// Render the keyframes plus the `.<initial>.<class>` and
    /// `.<animate>.<class>` rules
    pub fn to_css(&self, classes: &ClassNames) -> String {
        let mut active = String::new();
        if !self.active.is_empty() {
            active.push_str(&self.active.to_string());
            active.push(' ');
        }

        format!(
            "{keyframes}\n.{init}.{class} {{ {initial} }}\n.{animate}.{class} {{ {active}animation: {shorthand}; animation-name: {name}; }}\n",
            keyframes = self.keyframes,
            init = classes.initial,
            animate = classes.animate,
            class = self.class_name,
            initial = self.initial,
            active = active,
            shorthand = self.timing.shorthand(),
            name = self.keyframe_name(),
        )
    }
}
