//! CSS lengths used by preset geometry

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use reveal_core::RevealError;

/// Length unit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Cm,
    Mm,
    Q,
    In,
    Pt,
    Pc,
    Em,
    Rem,
    Ex,
    Ch,
    Cap,
    Ic,
    Lh,
    Rlh,
    Percent,
    Vw,
    Vh,
    Vi,
    Vb,
    Vmin,
    Vmax,
    Svw,
    Svh,
    Lvw,
    Lvh,
    Dvw,
    Dvh,
    Cqw,
    Cqh,
    Cqi,
    Cqb,
    Cqmin,
    Cqmax,
}

const UNITS: &[(LengthUnit, &str)] = &[
    (LengthUnit::Px, "px"),
    (LengthUnit::Cm, "cm"),
    (LengthUnit::Mm, "mm"),
    (LengthUnit::Q, "q"),
    (LengthUnit::In, "in"),
    (LengthUnit::Pt, "pt"),
    (LengthUnit::Pc, "pc"),
    (LengthUnit::Em, "em"),
    (LengthUnit::Rem, "rem"),
    (LengthUnit::Ex, "ex"),
    (LengthUnit::Ch, "ch"),
    (LengthUnit::Cap, "cap"),
    (LengthUnit::Ic, "ic"),
    (LengthUnit::Lh, "lh"),
    (LengthUnit::Rlh, "rlh"),
    (LengthUnit::Percent, "%"),
    (LengthUnit::Vw, "vw"),
    (LengthUnit::Vh, "vh"),
    (LengthUnit::Vi, "vi"),
    (LengthUnit::Vb, "vb"),
    (LengthUnit::Vmin, "vmin"),
    (LengthUnit::Vmax, "vmax"),
    (LengthUnit::Svw, "svw"),
    (LengthUnit::Svh, "svh"),
    (LengthUnit::Lvw, "lvw"),
    (LengthUnit::Lvh, "lvh"),
    (LengthUnit::Dvw, "dvw"),
    (LengthUnit::Dvh, "dvh"),
    (LengthUnit::Cqw, "cqw"),
    (LengthUnit::Cqh, "cqh"),
    (LengthUnit::Cqi, "cqi"),
    (LengthUnit::Cqb, "cqb"),
    (LengthUnit::Cqmin, "cqmin"),
    (LengthUnit::Cqmax, "cqmax"),
];

impl LengthUnit {
    fn suffix(self) -> &'static str {
        UNITS
            .iter()
            .find(|(unit, _)| *unit == self)
            .map(|(_, suffix)| *suffix)
            .unwrap_or("px")
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.to_ascii_lowercase();
        UNITS
            .iter()
            .find(|(_, s)| *s == suffix)
            .map(|(unit, _)| *unit)
    }
}

/// A CSS length
#[derive(Clone, Debug, PartialEq)]
pub enum Length {
    /// A number with a unit. Zero renders as a bare `0`.
    Dimension(f32, LengthUnit),
    /// Any other length expression (`calc(100% - 2rem)`, `var(--gap)`),
    /// emitted verbatim
    Raw(String),
}

impl Length {
    pub const ZERO: Length = Length::px(0.0);

    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Length::Dimension(value, unit)
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    pub const fn rem(value: f32) -> Self {
        Self::new(value, LengthUnit::Rem)
    }

    pub const fn em(value: f32) -> Self {
        Self::new(value, LengthUnit::Em)
    }

    pub const fn percent(value: f32) -> Self {
        Self::new(value, LengthUnit::Percent)
    }

    pub const fn vw(value: f32) -> Self {
        Self::new(value, LengthUnit::Vw)
    }

    pub const fn vh(value: f32) -> Self {
        Self::new(value, LengthUnit::Vh)
    }

    /// A length expression passed through as written
    pub fn raw(expression: impl Into<String>) -> Self {
        Length::Raw(expression.into().trim().to_string())
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Length {
        match self {
            Length::Dimension(value, unit) => Length::Dimension(-value, unit),
            Length::Raw(expression) => Length::Raw(format!("calc(-1 * {})", expression)),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Dimension(value, _) if *value == 0.0 => f.write_str("0"),
            Length::Dimension(value, unit) => write!(f, "{}{}", value, unit.suffix()),
            Length::Raw(expression) => f.write_str(expression),
        }
    }
}

/// `name( ... )` with balanced parentheses, e.g. `calc(100% - 2rem)`
fn is_function_call(s: &str) -> bool {
    let Some(open) = s.find('(') else {
        return false;
    };
    let name = &s[..open];
    let name_ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !name_ok || !s.ends_with(')') {
        return false;
    }

    let mut depth = 0usize;
    for (at, c) in s.char_indices().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && at + 1 != s.len() {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

impl FromStr for Length {
    type Err = RevealError;

    /// Parse `30px`, `2rem`, `10pt`, `5vmin`, a bare `0`, or a function such
    /// as `calc(100% - 2rem)` or `clamp(1rem, 5vw, 3rem)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if is_function_call(trimmed) {
            return Ok(Length::raw(trimmed));
        }

        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .unwrap_or(trimmed.len());
        let (number, suffix) = trimmed.split_at(split);
        let value = number
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RevealError::InvalidLength(s.to_string()))?;

        match (suffix, LengthUnit::from_suffix(suffix)) {
            ("", _) if value == 0.0 => Ok(Length::ZERO),
            (_, Some(unit)) if !suffix.is_empty() => Ok(Length::new(value, unit)),
            _ => Err(RevealError::InvalidLength(s.to_string())),
        }
    }
}
