//! Animation presets for common reveal effects
//!
//! Each preset maps to a class name (`fade-in-up`, `zoom-in`, ...) and a
//! keyframe block named `scroll-<class>`.

use crate::descriptor::{AnimationDescriptor, StyleBody};
use crate::keyframe::{Declarations, Keyframes, Transform};
use crate::length::Length;
use crate::timing::TimingOptions;

/// Default travel for the directional fades
pub const DEFAULT_DISTANCE: Length = Length::px(30.0);
/// Default starting scale for `zoom-in`
pub const DEFAULT_ZOOM_IN_SCALE: f32 = 0.8;
/// Default starting scale for `zoom-out`
pub const DEFAULT_ZOOM_OUT_SCALE: f32 = 1.2;

const FLIP_PERSPECTIVE: Length = Length::px(400.0);

/// Where a directional fade enters from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Moves down into place (starts above)
    Down,
    /// Moves up into place (starts below)
    Up,
    /// Moves right into place (starts to the left)
    Left,
    /// Moves left into place (starts to the right)
    Right,
}

impl Direction {
    /// Starting offset for the given travel distance
    fn offset(self, distance: Length) -> Transform {
        const ZERO: Length = Length::ZERO;
        match self {
            Direction::Down => Transform::Translate3d(ZERO, -distance, ZERO),
            Direction::Up => Transform::Translate3d(ZERO, distance, ZERO),
            Direction::Left => Transform::Translate3d(-distance, ZERO, ZERO),
            Direction::Right => Transform::Translate3d(distance, ZERO, ZERO),
        }
    }
}

/// Named reveal effects
#[derive(Clone, Debug, PartialEq)]
pub enum Preset {
    FadeIn,
    FadeInFrom {
        direction: Direction,
        distance: Length,
    },
    ZoomIn {
        scale: f32,
    },
    ZoomOut {
        scale: f32,
    },
    Flip,
    Bounce,
}

impl Preset {
    // ========================================================================
    // Constructors with default geometry
    // ========================================================================

    pub fn fade_in_down() -> Self {
        Preset::FadeInFrom {
            direction: Direction::Down,
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn fade_in_up() -> Self {
        Preset::FadeInFrom {
            direction: Direction::Up,
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn fade_in_left() -> Self {
        Preset::FadeInFrom {
            direction: Direction::Left,
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn fade_in_right() -> Self {
        Preset::FadeInFrom {
            direction: Direction::Right,
            distance: DEFAULT_DISTANCE,
        }
    }

    pub fn zoom_in() -> Self {
        Preset::ZoomIn {
            scale: DEFAULT_ZOOM_IN_SCALE,
        }
    }

    pub fn zoom_out() -> Self {
        Preset::ZoomOut {
            scale: DEFAULT_ZOOM_OUT_SCALE,
        }
    }

    /// Kebab-case class name the preset's rules are scoped under
    pub fn class_name(&self) -> &'static str {
        match self {
            Preset::FadeIn => "fade-in",
            Preset::FadeInFrom { direction, .. } => match direction {
                Direction::Down => "fade-in-down",
                Direction::Up => "fade-in-up",
                Direction::Left => "fade-in-left",
                Direction::Right => "fade-in-right",
            },
            Preset::ZoomIn { .. } => "zoom-in",
            Preset::ZoomOut { .. } => "zoom-out",
            Preset::Flip => "flip",
            Preset::Bounce => "bounce",
        }
    }

    pub fn keyframe_name(&self) -> String {
        format!("scroll-{}", self.class_name())
    }

    /// Keyframes and rules for this preset with the given timing
    pub fn descriptor(&self, timing: &TimingOptions) -> AnimationDescriptor {
        let name = self.keyframe_name();
        let (keyframes, initial, active) = match self {
            Preset::FadeIn => (
                Keyframes::new(name)
                    .stop(0.0, Declarations::new().opacity(0.0))
                    .stop(100.0, Declarations::new().opacity(1.0)),
                Declarations::new().opacity(0.0),
                Declarations::new(),
            ),
            Preset::FadeInFrom {
                direction,
                distance,
            } => {
                let start = direction.offset(distance.clone());
                let end = Transform::Translate3d(Length::ZERO, Length::ZERO, Length::ZERO);
                reveal_from(name, start, end)
            }
            Preset::ZoomIn { scale } | Preset::ZoomOut { scale } => {
                reveal_from(name, Transform::Scale(*scale), Transform::Scale(1.0))
            }
            Preset::Flip => reveal_from(
                name,
                Transform::PerspectiveRotateY {
                    perspective: FLIP_PERSPECTIVE,
                    degrees: 90.0,
                },
                Transform::PerspectiveRotateY {
                    perspective: FLIP_PERSPECTIVE,
                    degrees: 0.0,
                },
            ),
            Preset::Bounce => {
                let rest = Declarations::new().transform(Transform::TranslateY(Length::ZERO));
                (
                    Keyframes::new(name)
                        .stops(&[0.0, 20.0, 50.0, 80.0, 100.0], rest)
                        .stop(
                            40.0,
                            Declarations::new()
                                .transform(Transform::TranslateY(Length::px(-30.0))),
                        )
                        .stop(
                            60.0,
                            Declarations::new()
                                .transform(Transform::TranslateY(Length::px(-15.0))),
                        ),
                    Declarations::new().opacity(0.0),
                    Declarations::new().opacity(1.0),
                )
            }
        };

        AnimationDescriptor {
            class_name: self.class_name().to_string(),
            keyframes,
            initial: StyleBody::Declarations(initial),
            active,
            timing: timing.clone(),
        }
    }
}

/// Opacity 0 -> 1 paired with a transform from `start` to `end`; the initial
/// rule holds the starting frame
fn reveal_from(
    name: String,
    start: Transform,
    end: Transform,
) -> (Keyframes, Declarations, Declarations) {
    let first = Declarations::new().opacity(0.0).transform(start);
    let keyframes = Keyframes::new(name)
        .stop(0.0, first.clone())
        .stop(100.0, Declarations::new().opacity(1.0).transform(end));
    (keyframes, first, Declarations::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ClassNames;

    fn css(preset: Preset) -> String {
        preset
            .descriptor(&TimingOptions::default())
            .to_css(&ClassNames::default())
    }

    #[test]
    fn test_class_names() {
        assert_eq!(Preset::FadeIn.class_name(), "fade-in");
        assert_eq!(Preset::fade_in_left().class_name(), "fade-in-left");
        assert_eq!(Preset::zoom_out().class_name(), "zoom-out");
        assert_eq!(Preset::Bounce.keyframe_name(), "scroll-bounce");
    }

    #[test]
    fn test_fade_in() {
        let css = css(Preset::FadeIn);
        assert!(css.contains("@keyframes scroll-fade-in {"));
        assert!(css.contains("0% { opacity: 0; }"));
        assert!(css.contains("100% { opacity: 1; }"));
        assert!(css.contains(".scroll-animate-init.fade-in { opacity: 0; }"));
    }

    #[test]
    fn test_directional_offsets() {
        assert!(css(Preset::fade_in_down()).contains("translate3d(0, -30px, 0)"));
        assert!(css(Preset::fade_in_up()).contains("translate3d(0, 30px, 0)"));
        assert!(css(Preset::fade_in_left()).contains("translate3d(-30px, 0, 0)"));
        assert!(css(Preset::fade_in_right()).contains("translate3d(30px, 0, 0)"));

        let up = css(Preset::FadeInFrom {
            direction: Direction::Up,
            distance: Length::rem(2.0),
        });
        assert!(up.contains(".scroll-animate-init.fade-in-up { opacity: 0; transform: translate3d(0, 2rem, 0); }"));
        assert!(up.contains("transform: translate3d(0, 0, 0)"));
    }

    #[test]
    fn test_zoom_and_flip() {
        let zoom = css(Preset::zoom_in());
        assert!(zoom.contains("transform: scale(0.8)"));
        assert!(zoom.contains("transform: scale(1)"));
        assert!(css(Preset::zoom_out()).contains("transform: scale(1.2)"));

        let flip = css(Preset::Flip);
        assert!(flip.contains("perspective(400px) rotateY(90deg)"));
        assert!(flip.contains("perspective(400px) rotateY(0deg)"));
    }

    #[test]
    fn test_bounce() {
        let css = css(Preset::Bounce);
        assert!(css.contains("0%, 20%, 50%, 80%, 100% { transform: translateY(0); }"));
        assert!(css.contains("40% { transform: translateY(-30px); }"));
        assert!(css.contains("60% { transform: translateY(-15px); }"));
        assert!(css.contains(".scroll-animate-init.bounce { opacity: 0; }"));
        assert!(css.contains(".scroll-animate.bounce { opacity: 1; animation: "));
    }
}
