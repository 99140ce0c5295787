//! Keyframe rules
//!
//! A small typed model of `@keyframes` blocks: declaration lists built with
//! chained setters, stops at one or more percentages, and a raw escape hatch
//! for caller-supplied bodies.

use std::fmt;

use smallvec::SmallVec;

use crate::length::Length;

/// Value of a `transform` declaration
#[derive(Clone, Debug, PartialEq)]
pub enum Transform {
    None,
    Translate3d(Length, Length, Length),
    TranslateY(Length),
    Scale(f32),
    /// `perspective(p) rotateY(deg)`
    PerspectiveRotateY { perspective: Length, degrees: f32 },
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::None => f.write_str("none"),
            Transform::Translate3d(x, y, z) => write!(f, "translate3d({}, {}, {})", x, y, z),
            Transform::TranslateY(y) => write!(f, "translateY({})", y),
            Transform::Scale(s) => write!(f, "scale({})", s),
            Transform::PerspectiveRotateY {
                perspective,
                degrees,
            } => write!(f, "perspective({}) rotateY({}deg)", perspective, degrees),
        }
    }
}

/// An ordered CSS declaration list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Declarations {
    entries: SmallVec<[(String, String); 4]>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `property: value`, replacing an earlier value in place
    pub fn set(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    pub fn opacity(self, opacity: f32) -> Self {
        self.set("opacity", opacity.to_string())
    }

    pub fn transform(self, transform: Transform) -> Self {
        self.set("transform", transform.to_string())
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Declarations {
    /// `a: 1; b: 2;`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

/// One keyframe selector, possibly shared by several percentages
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeStop {
    /// Percent offsets (0 to 100)
    pub percents: SmallVec<[f32; 5]>,
    pub declarations: Declarations,
}

impl fmt::Display for KeyframeStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, percent) in self.percents.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}%", percent)?;
        }
        write!(f, " {{ {} }}", self.declarations)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum KeyframeBody {
    Stops(Vec<KeyframeStop>),
    /// Literal CSS inserted verbatim between the braces
    Raw(String),
}

/// A named `@keyframes` block
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    pub name: String,
    pub body: KeyframeBody,
}

impl Keyframes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: KeyframeBody::Stops(Vec::new()),
        }
    }

    pub fn raw(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: KeyframeBody::Raw(body.into()),
        }
    }

    /// Add a stop at a single percentage
    pub fn stop(self, percent: f32, declarations: Declarations) -> Self {
        self.stops(&[percent], declarations)
    }

    /// Add a stop shared by several percentages (`0%, 20% { .. }`)
    pub fn stops(mut self, percents: &[f32], declarations: Declarations) -> Self {
        let stop = KeyframeStop {
            percents: percents.iter().copied().collect(),
            declarations,
        };
        match &mut self.body {
            KeyframeBody::Stops(stops) => stops.push(stop),
            // Adding typed stops discards a raw body
            KeyframeBody::Raw(_) => self.body = KeyframeBody::Stops(vec![stop]),
        }
        self
    }
}

impl fmt::Display for Keyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@keyframes {} {{ ", self.name)?;
        match &self.body {
            KeyframeBody::Stops(stops) => {
                for stop in stops {
                    write!(f, "{} ", stop)?;
                }
            }
            KeyframeBody::Raw(raw) => write!(f, "{} ", raw)?,
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_render_in_order() {
        let decls = Declarations::new()
            .opacity(0.0)
            .transform(Transform::Translate3d(Length::ZERO, Length::px(50.0), Length::ZERO));
        assert_eq!(
            decls.to_string(),
            "opacity: 0; transform: translate3d(0, 50px, 0);"
        );
    }

    #[test]
    fn test_set_replaces_existing_property() {
        let decls = Declarations::new().opacity(0.0).opacity(1.0);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls.get("opacity"), Some("1"));
    }

    #[test]
    fn test_transform_text() {
        assert_eq!(Transform::Scale(1.0).to_string(), "scale(1)");
        assert_eq!(Transform::Scale(0.5).to_string(), "scale(0.5)");
        assert_eq!(Transform::TranslateY(Length::ZERO).to_string(), "translateY(0)");
        assert_eq!(
            Transform::PerspectiveRotateY {
                perspective: Length::px(400.0),
                degrees: 90.0
            }
            .to_string(),
            "perspective(400px) rotateY(90deg)"
        );
        assert_eq!(Transform::None.to_string(), "none");
    }

    #[test]
    fn test_keyframes_block() {
        let kf = Keyframes::new("scroll-fade-in")
            .stop(0.0, Declarations::new().opacity(0.0))
            .stop(100.0, Declarations::new().opacity(1.0));
        assert_eq!(
            kf.to_string(),
            "@keyframes scroll-fade-in { 0% { opacity: 0; } 100% { opacity: 1; } }"
        );
    }

    #[test]
    fn test_shared_stop() {
        let kf = Keyframes::new("k").stops(
            &[0.0, 20.0, 50.0],
            Declarations::new().transform(Transform::TranslateY(Length::ZERO)),
        );
        assert!(kf
            .to_string()
            .contains("0%, 20%, 50% { transform: translateY(0); }"));
    }

    #[test]
    fn test_raw_body_is_verbatim() {
        let kf = Keyframes::raw("scroll-x", "from { top: 0 } to { top: 9px }");
        assert_eq!(
            kf.to_string(),
            "@keyframes scroll-x { from { top: 0 } to { top: 9px } }"
        );
    }
}
