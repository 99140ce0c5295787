//! Easing functions as CSS timing-function values

use std::fmt;

/// CSS `<easing-function>`
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    StepStart,
    StepEnd,
    CubicBezier(f32, f32, f32, f32),
    /// Any other timing function, emitted verbatim (e.g. `steps(4, jump-end)`)
    Custom(String),
}

impl Easing {
    /// The curve used when no easing is given: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    pub const STANDARD: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);

    /// Parse a CSS timing function. Bare keywords become typed variants;
    /// functions such as `cubic-bezier(...)` are kept exactly as written.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "linear" => Easing::Linear,
            "ease" => Easing::Ease,
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "ease-in-out" => Easing::EaseInOut,
            "step-start" => Easing::StepStart,
            "step-end" => Easing::StepEnd,
            _ => Easing::Custom(trimmed.to_string()),
        }
    }
}

impl From<&str> for Easing {
    fn from(s: &str) -> Self {
        Easing::parse(s)
    }
}

impl From<String> for Easing {
    fn from(s: String) -> Self {
        Easing::parse(&s)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::StepStart => f.write_str("step-start"),
            Easing::StepEnd => f.write_str("step-end"),
            // Debug keeps the trailing `.0` on whole numbers
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({:?}, {:?}, {:?}, {:?})", x1, y1, x2, y2)
            }
            Easing::Custom(raw) => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_curve_text() {
        assert_eq!(
            Easing::STANDARD.to_string(),
            "cubic-bezier(0.25, 0.1, 0.25, 1.0)"
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Easing::parse("ease-out"), Easing::EaseOut);
        assert_eq!(Easing::parse(" LINEAR "), Easing::Linear);
        assert_eq!(Easing::parse("ease-out").to_string(), "ease-out");
    }

    #[test]
    fn test_functions_keep_source_text() {
        for text in [
            "cubic-bezier(0.000001, 0, .58, 1)",
            "cubic-bezier(0.4, 0, 0.2, 1)",
            "linear(0, 0.25 75%, 1)",
        ] {
            assert_eq!(Easing::parse(text).to_string(), text);
        }
        assert_eq!(
            Easing::CubicBezier(0.4, 0.0, 0.2, 1.0).to_string(),
            "cubic-bezier(0.4, 0.0, 0.2, 1.0)"
        );
    }

    #[test]
    fn test_unknown_functions_pass_through() {
        assert_eq!(
            Easing::parse("steps(4, jump-end)"),
            Easing::Custom("steps(4, jump-end)".to_string())
        );
        assert_eq!(Easing::parse("cubic-bezier(1, 2)").to_string(), "cubic-bezier(1, 2)");
    }
}
