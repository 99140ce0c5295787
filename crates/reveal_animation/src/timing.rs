//! Animation timing options and the `animation` shorthand

use std::fmt;
use std::str::FromStr;

use crate::easing::Easing;

/// CSS `animation-direction`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationDirection {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl fmt::Display for AnimationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnimationDirection::Normal => "normal",
            AnimationDirection::Reverse => "reverse",
            AnimationDirection::Alternate => "alternate",
            AnimationDirection::AlternateReverse => "alternate-reverse",
        })
    }
}

impl FromStr for AnimationDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(AnimationDirection::Normal),
            "reverse" => Ok(AnimationDirection::Reverse),
            "alternate" => Ok(AnimationDirection::Alternate),
            "alternate-reverse" => Ok(AnimationDirection::AlternateReverse),
            other => Err(format!("unknown animation direction '{}'", other)),
        }
    }
}

/// CSS `animation-fill-mode`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// No fill - reset to the element's own style after the animation
    None,
    /// Hold the final keyframe after the animation completes
    #[default]
    Forwards,
    /// Apply the first keyframe during the delay
    Backwards,
    /// Both forwards and backwards
    Both,
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillMode::None => "none",
            FillMode::Forwards => "forwards",
            FillMode::Backwards => "backwards",
            FillMode::Both => "both",
        })
    }
}

impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FillMode::None),
            "forwards" => Ok(FillMode::Forwards),
            "backwards" => Ok(FillMode::Backwards),
            "both" => Ok(FillMode::Both),
            other => Err(format!("unknown fill mode '{}'", other)),
        }
    }
}

/// CSS `animation-iteration-count`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IterationCount {
    Count(f32),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        IterationCount::Count(1.0)
    }
}

impl From<u32> for IterationCount {
    fn from(count: u32) -> Self {
        IterationCount::Count(count as f32)
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationCount::Count(n) => write!(f, "{}", n),
            IterationCount::Infinite => f.write_str("infinite"),
        }
    }
}

impl FromStr for IterationCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("infinite") {
            return Ok(IterationCount::Infinite);
        }
        match s.parse::<f32>() {
            Ok(n) if n >= 0.0 => Ok(IterationCount::Count(n)),
            _ => Err(format!("invalid iteration count '{}'", s)),
        }
    }
}

/// Timing shared by every preset
#[derive(Clone, Debug, PartialEq)]
pub struct TimingOptions {
    /// Duration in seconds
    pub duration: f32,
    /// Delay in seconds
    pub delay: f32,
    pub easing: Easing,
    pub iterations: IterationCount,
    pub direction: AnimationDirection,
    pub fill_mode: FillMode,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            duration: 0.6,
            delay: 0.0,
            easing: Easing::STANDARD,
            iterations: IterationCount::default(),
            direction: AnimationDirection::Normal,
            fill_mode: FillMode::Forwards,
        }
    }
}

impl TimingOptions {
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = easing.into();
        self
    }

    pub fn iterations(mut self, count: impl Into<IterationCount>) -> Self {
        self.iterations = count.into();
        self
    }

    pub fn infinite(mut self) -> Self {
        self.iterations = IterationCount::Infinite;
        self
    }

    pub fn direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// The `animation` shorthand value:
    /// `<duration>s <easing> <delay>s <iterations> <direction> <fill-mode>`
    pub fn shorthand(&self) -> String {
        format!(
            "{}s {} {}s {} {} {}",
            self.duration, self.easing, self.delay, self.iterations, self.direction, self.fill_mode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shorthand() {
        assert_eq!(
            TimingOptions::default().shorthand(),
            "0.6s cubic-bezier(0.25, 0.1, 0.25, 1.0) 0s 1 normal forwards"
        );
    }

    #[test]
    fn test_overrides_keep_other_defaults() {
        let timing = TimingOptions::default().duration(0.8).easing("ease-out");
        assert_eq!(timing.shorthand(), "0.8s ease-out 0s 1 normal forwards");
    }

    #[test]
    fn test_full_override() {
        let timing = TimingOptions::default()
            .duration(1.5)
            .delay(0.25)
            .easing(Easing::Linear)
            .infinite()
            .direction(AnimationDirection::AlternateReverse)
            .fill_mode(FillMode::Both);
        assert_eq!(
            timing.shorthand(),
            "1.5s linear 0.25s infinite alternate-reverse both"
        );
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!("alternate".parse(), Ok(AnimationDirection::Alternate));
        assert_eq!("BOTH".parse(), Ok(FillMode::Both));
        assert_eq!("infinite".parse(), Ok(IterationCount::Infinite));
        assert_eq!("2.5".parse(), Ok(IterationCount::Count(2.5)));
        assert!("sideways".parse::<AnimationDirection>().is_err());
        assert!("-1".parse::<IterationCount>().is_err());
    }
}
