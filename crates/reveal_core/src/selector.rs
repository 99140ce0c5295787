//! CSS selector parsing
//!
//! Hosts receive selector text verbatim and decide what it matches. A host
//! backed by a native query engine hands the text straight through; the
//! [`HeadlessHost`](crate::headless::HeadlessHost) parses it here first.
//!
//! Malformed input fails with [`RevealError::InvalidSelector`]. Well-formed
//! CSS that this matcher does not implement fails with
//! [`RevealError::UnsupportedSelector`].
//!
//! # Supported Syntax
//!
//! - Selector lists: `.a, .b`
//! - Type and universal selectors: `section`, `*`
//! - `#id`, `.class`, with CSS escapes (`.md\:flex`, `#\31 0`)
//! - Attributes: `[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`, `[a$=v]`,
//!   `[a*=v]`, quoted values and the `i`/`s` flags
//! - Combinators: descendant (whitespace), `>`, `+`, `~`
//! - Structural pseudo-classes: `:root`, `:empty`, `:first-child`,
//!   `:last-child`, `:only-child`, `:first-of-type`, `:last-of-type`,
//!   `:only-of-type`, and `:nth-child`, `:nth-last-child`, `:nth-of-type`,
//!   `:nth-last-of-type` with `An+B`, `odd`, `even`
//! - Logical pseudo-classes: `:not()`, `:is()`, `:where()`
//! - User-action and form-state pseudo-classes (`:hover`, `:checked`, ...)
//! - Pseudo-elements (`::before`, `:after`, ...), which never match elements
//!
//! Namespace prefixes, `:has()`, `:lang()`, `:dir()` and `:nth-child(An+B of S)`
//! are reported as unsupported.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{all_consuming, cut, map, opt},
    error::{context, ErrorKind, ParseError as NomParseError, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
    Finish, IResult,
};
use smallvec::SmallVec;

use crate::error::{Result, RevealError};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Marks a failure as well-formed CSS this matcher does not implement
const UNSUPPORTED: ErrorKind = ErrorKind::Verify;

/// User-action and form-state pseudo-classes
const STATE_PSEUDO_CLASSES: &[&str] = &[
    "active", "any-link", "autofill", "blank", "checked", "closed", "current", "default",
    "disabled", "enabled", "focus", "focus-visible", "focus-within", "fullscreen", "future",
    "hover", "in-range", "indeterminate", "invalid", "link", "local-link", "modal", "open",
    "optional", "out-of-range", "past", "paused", "placeholder-shown", "playing",
    "popover-open", "read-only", "read-write", "required", "target", "target-within",
    "user-invalid", "user-valid", "valid", "visited",
];

/// Pseudo-elements that may also be written with a single colon
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

const PSEUDO_ELEMENTS: &[&str] = &[
    "after", "backdrop", "before", "cue", "file-selector-button", "first-letter",
    "first-line", "grammar-error", "marker", "placeholder", "selection", "spelling-error",
];

/// `An+B` position pattern used by the `:nth-*` pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Whether the 1-based `position` is selected by this pattern
    pub fn matches(&self, position: usize) -> bool {
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        let offset = position as i64 - b;
        match a {
            0 => offset == 0,
            a => offset / a >= 0 && offset % a == 0,
        }
    }

    /// Parse the argument of an `:nth-*` pseudo-class
    fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim().to_ascii_lowercase();
        match arg.as_str() {
            "odd" => return Some(Self::new(2, 1)),
            "even" => return Some(Self::new(2, 0)),
            _ => {}
        }

        let Some(n_at) = arg.find('n') else {
            return integer(&arg).map(|b| Self::new(0, b));
        };

        let a = match &arg[..n_at] {
            "" | "+" => 1,
            "-" => -1,
            coefficient => integer(coefficient)?,
        };

        let tail = arg[n_at + 1..].trim_start();
        if tail.is_empty() {
            return Some(Self::new(a, 0));
        }
        let (sign, digits) = if let Some(rest) = tail.strip_prefix('+') {
            (1, rest.trim_start())
        } else if let Some(rest) = tail.strip_prefix('-') {
            (-1, rest.trim_start())
        } else {
            return None;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let b: i32 = digits.parse().ok()?;
        Some(Self::new(a, sign * b))
    }
}

/// Signed integer without embedded whitespace
fn integer(s: &str) -> Option<i32> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Pseudo-class selectors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// :root (also :scope at document level)
    Root,
    /// :empty
    Empty,
    /// :defined
    Defined,
    /// :first-child
    FirstChild,
    /// :last-child
    LastChild,
    /// :only-child
    OnlyChild,
    /// :first-of-type
    FirstOfType,
    /// :last-of-type
    LastOfType,
    /// :only-of-type
    OnlyOfType,
    /// :nth-child(An+B)
    NthChild(Nth),
    /// :nth-last-child(An+B)
    NthLastChild(Nth),
    /// :nth-of-type(An+B)
    NthOfType(Nth),
    /// :nth-last-of-type(An+B)
    NthLastOfType(Nth),
    /// :not(list)
    Not(Vec<ComplexSelector>),
    /// :is(list) and :where(list)
    Is(Vec<ComplexSelector>),
    /// User-action or form-state pseudo-class such as `hover`, stored lowercase
    State(String),
}

/// How an attribute selector compares the attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeMatch {
    /// `[name]`
    Exists,
    /// `[name=value]`
    Equals(String),
    /// `[name~=value]`: whitespace-separated word
    Includes(String),
    /// `[name|=value]`: exact or followed by `-`
    DashMatch(String),
    /// `[name^=value]`
    Prefix(String),
    /// `[name$=value]`
    Suffix(String),
    /// `[name*=value]`
    Substring(String),
}

impl AttributeMatch {
    /// Compare an attribute value, ASCII case-folded when `case_insensitive`
    pub fn matches(&self, value: &str, case_insensitive: bool) -> bool {
        let fold = |s: &str| {
            if case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let value = fold(value);
        match self {
            AttributeMatch::Exists => true,
            AttributeMatch::Equals(expected) => value == fold(expected),
            AttributeMatch::Includes(word) => {
                !word.is_empty()
                    && !word.contains(char::is_whitespace)
                    && value.split_ascii_whitespace().any(|w| w == fold(word))
            }
            AttributeMatch::DashMatch(expected) => {
                let expected = fold(expected);
                value == expected
                    || value
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeMatch::Prefix(p) => !p.is_empty() && value.starts_with(&fold(p)),
            AttributeMatch::Suffix(s) => !s.is_empty() && value.ends_with(&fold(s)),
            AttributeMatch::Substring(s) => !s.is_empty() && value.contains(&fold(s)),
        }
    }
}

/// `[name op value flag]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Attribute name, stored lowercase
    pub name: String,
    pub matcher: AttributeMatch,
    pub case_insensitive: bool,
}

/// A single simple selector inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorPart {
    /// `*`
    Universal,
    /// `div`, stored lowercase
    Type(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name]`, `[name=value]` and the other operators
    Attribute(AttributeSelector),
    /// `:first-child` and friends
    PseudoClass(PseudoClass),
    /// `::before` and friends, stored lowercase
    PseudoElement(String),
}

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `main .card`
    Descendant,
    /// Child combinator: `main > .card`
    Child,
    /// Next-sibling combinator: `h2 + p`
    NextSibling,
    /// Subsequent-sibling combinator: `h2 ~ p`
    SubsequentSibling,
}

/// A sequence of simple selectors with no combinator, e.g. `div.card[data-x]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundSelector {
    pub parts: SmallVec<[SelectorPart; 4]>,
}

impl CompoundSelector {
    pub fn has_pseudo_element(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, SelectorPart::PseudoElement(_)))
    }
}

/// A chain of compound selectors joined by combinators.
///
/// Each segment carries the combinator that links it to the NEXT segment; the
/// last segment (the subject) always has `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexSelector {
    pub segments: Vec<(CompoundSelector, Option<Combinator>)>,
}

impl ComplexSelector {
    /// The rightmost compound selector, which the matched element must satisfy
    pub fn subject(&self) -> Option<&CompoundSelector> {
        self.segments.last().map(|(compound, _)| compound)
    }

    /// Returns true if this is a single compound selector without combinators
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list.
    ///
    /// Fails with `InvalidSelector` on malformed input and with
    /// `UnsupportedSelector` on valid CSS outside the supported syntax.
    pub fn parse(source: &str) -> Result<Self> {
        match all_consuming(selector_list)(source).finish() {
            Ok((_, selectors)) => Ok(Self {
                source: source.trim().to_string(),
                selectors,
            }),
            Err(err) => {
                let reason = describe_error(source, &err);
                if is_unsupported(&err) {
                    tracing::debug!("unsupported selector '{}': {}", source, reason);
                    Err(RevealError::unsupported_selector(source, reason))
                } else {
                    tracing::debug!("rejected selector '{}': {}", source, reason);
                    Err(RevealError::invalid_selector(source, reason))
                }
            }
        }
    }

    /// The trimmed source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The individual selectors of the list
    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }
}

impl FromStr for SelectorList {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_unsupported(err: &VerboseError<&str>) -> bool {
    err.errors
        .iter()
        .any(|(_, kind)| matches!(kind, VerboseErrorKind::Nom(k) if *k == UNSUPPORTED))
}

fn describe_error(source: &str, err: &VerboseError<&str>) -> String {
    let fragment = err.errors.first().map(|(input, _)| *input).unwrap_or("");
    let column = source.len().saturating_sub(fragment.len()) + 1;
    let found = match fragment.chars().next() {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    };

    let expected = err.errors.iter().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some(*ctx),
        _ => None,
    });

    match expected {
        Some(ctx) if is_unsupported(err) => format!("{} at column {}", ctx, column),
        Some(ctx) => format!("expected {} at column {}, found {}", ctx, column, found),
        None => format!("unexpected {} at column {}", found, column),
    }
}

fn error_at<'a>(input: &'a str, ctx: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Failure(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context(ctx))],
    })
}

fn unsupported<'a>(input: &'a str, what: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Failure(VerboseError {
        errors: vec![
            (input, VerboseErrorKind::Nom(UNSUPPORTED)),
            (input, VerboseErrorKind::Context(what)),
        ],
    })
}

fn recoverable<'a>(input: &'a str, kind: ErrorKind) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Error(VerboseError::from_error_kind(input, kind))
}

// ============================================================================
// Identifiers and strings
// ============================================================================

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

fn starts_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some('-') => matches!(chars.next(), Some(c) if is_name_start(c) || c == '-' || c == '\\'),
        Some('\\') => !matches!(chars.next(), None | Some('\n' | '\r' | '\x0c')),
        Some(c) => is_name_start(c),
        None => false,
    }
}

/// Decode the escape following a backslash
fn escape(input: &str) -> ParseResult<char> {
    let hex_len = input
        .chars()
        .take(6)
        .take_while(|c| c.is_ascii_hexdigit())
        .count();
    if hex_len > 0 {
        let (digits, rest) = input.split_at(hex_len);
        let decoded = match u32::from_str_radix(digits, 16) {
            Ok(0) | Err(_) => char::REPLACEMENT_CHARACTER,
            Ok(code) => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
        };
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix(|c: char| c.is_ascii_whitespace()))
            .unwrap_or(rest);
        return Ok((rest, decoded));
    }

    let mut chars = input.chars();
    match chars.next() {
        Some(c) if !matches!(c, '\n' | '\r' | '\x0c') => Ok((chars.as_str(), c)),
        _ => Err(error_at(input, "an escaped character")),
    }
}

/// CSS identifier with escapes decoded. May not start with a digit.
fn identifier(input: &str) -> ParseResult<String> {
    if !starts_identifier(input) {
        return Err(recoverable(input, ErrorKind::Alpha));
    }

    let mut decoded = String::new();
    let mut rest = input;
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('\\') => {
                let (after, c) = escape(chars.as_str())?;
                decoded.push(c);
                rest = after;
            }
            Some(c) if is_name_char(c) => {
                decoded.push(c);
                rest = chars.as_str();
            }
            _ => return Ok((rest, decoded)),
        }
    }
}

fn quoted(input: &str) -> ParseResult<String> {
    let mut chars = input.chars();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(recoverable(input, ErrorKind::Char)),
    };

    let mut decoded = String::new();
    let mut rest = chars.as_str();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c == quote => return Ok((chars.as_str(), decoded)),
            Some('\\') => {
                let (after, c) = escape(chars.as_str())?;
                decoded.push(c);
                rest = after;
            }
            Some('\n' | '\r' | '\x0c') | None => {
                return Err(error_at(rest, "closing quote"));
            }
            Some(c) => {
                decoded.push(c);
                rest = chars.as_str();
            }
        }
    }
}

// ============================================================================
// Simple selectors
// ============================================================================

fn id_part(input: &str) -> ParseResult<SelectorPart> {
    map(
        preceded(char('#'), cut(context("identifier after '#'", identifier))),
        SelectorPart::Id,
    )(input)
}

fn class_part(input: &str) -> ParseResult<SelectorPart> {
    map(
        preceded(char('.'), cut(context("class name after '.'", identifier))),
        SelectorPart::Class,
    )(input)
}

fn attribute_operator(input: &str) -> ParseResult<fn(String) -> AttributeMatch> {
    let table: [(&str, fn(String) -> AttributeMatch); 6] = [
        ("~=", AttributeMatch::Includes),
        ("|=", AttributeMatch::DashMatch),
        ("^=", AttributeMatch::Prefix),
        ("$=", AttributeMatch::Suffix),
        ("*=", AttributeMatch::Substring),
        ("=", AttributeMatch::Equals),
    ];
    table
        .into_iter()
        .find_map(|(op, build)| input.strip_prefix(op).map(|rest| (rest, build)))
        .ok_or_else(|| recoverable(input, ErrorKind::Tag))
}

fn attribute_part(input: &str) -> ParseResult<SelectorPart> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    if input.starts_with(['*', '|']) {
        return Err(unsupported(input, "namespace prefixes are not supported"));
    }
    let (input, name) = cut(context("attribute name", identifier))(input)?;
    let (input, _) = multispace0(input)?;
    if input.starts_with('|') && !input.starts_with("|=") {
        return Err(unsupported(input, "namespace prefixes are not supported"));
    }

    let (input, operator) = opt(attribute_operator)(input)?;
    let (input, matcher, case_insensitive) = match operator {
        Some(build) => {
            let (input, _) = multispace0(input)?;
            let (input, value) = cut(context("attribute value", alt((quoted, identifier))))(input)?;
            let (input, _) = multispace0(input)?;
            let (input, flag) = opt(alt((char('i'), char('I'), char('s'), char('S'))))(input)?;
            let case_insensitive = matches!(flag, Some('i' | 'I'));
            (input, build(value), case_insensitive)
        }
        None => (input, AttributeMatch::Exists, false),
    };
    let (input, _) = cut(context("']'", preceded(multispace0, char(']'))))(input)?;

    Ok((
        input,
        SelectorPart::Attribute(AttributeSelector {
            name: name.to_ascii_lowercase(),
            matcher,
            case_insensitive,
        }),
    ))
}

// ============================================================================
// Pseudo-classes and pseudo-elements
// ============================================================================

/// Raw text up to the closing parenthesis
fn parenthesized_argument(input: &str) -> ParseResult<&str> {
    let (rest, _) = pair(char('('), multispace0)(input)?;
    let end = rest
        .find(')')
        .ok_or_else(|| error_at(rest, "')'"))?;
    Ok((&rest[end + 1..], &rest[..end]))
}

fn nth_argument<'a>(
    input: &'a str,
    allow_of: bool,
    build: fn(Nth) -> PseudoClass,
) -> ParseResult<'a, SelectorPart> {
    let (rest, arg) = cut(context("'(An+B)'", parenthesized_argument))(input)?;
    if allow_of && arg.split_ascii_whitespace().any(|w| w.eq_ignore_ascii_case("of")) {
        return Err(unsupported(input, "the 'of S' form of :nth-child is not supported"));
    }
    match Nth::parse(arg) {
        Some(nth) => Ok((rest, SelectorPart::PseudoClass(build(nth)))),
        None => Err(error_at(input, "an An+B expression")),
    }
}

fn nested_list(input: &str) -> ParseResult<Vec<ComplexSelector>> {
    cut(context(
        "a selector list in parentheses",
        delimited(char('('), selector_list, char(')')),
    ))(input)
}

fn is_pseudo_element(name: &str) -> bool {
    PSEUDO_ELEMENTS.contains(&name) || name.starts_with("-webkit-") || name.starts_with("-moz-")
}

fn pseudo(input: &str) -> ParseResult<SelectorPart> {
    let (rest, _) = char(':')(input)?;
    let (rest, double) = opt(char(':'))(rest)?;
    let (rest, name) = cut(context("pseudo-class name", identifier))(rest)?;
    let name = name.to_ascii_lowercase();
    let functional = rest.starts_with('(');

    if double.is_some() || (!functional && LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str())) {
        if functional {
            return Err(unsupported(input, "functional pseudo-elements are not supported"));
        }
        if !is_pseudo_element(&name) {
            return Err(error_at(input, "a known pseudo-element"));
        }
        return Ok((rest, SelectorPart::PseudoElement(name)));
    }

    if functional {
        return match name.as_str() {
            "nth-child" => nth_argument(rest, true, PseudoClass::NthChild),
            "nth-last-child" => nth_argument(rest, true, PseudoClass::NthLastChild),
            "nth-of-type" => nth_argument(rest, false, PseudoClass::NthOfType),
            "nth-last-of-type" => nth_argument(rest, false, PseudoClass::NthLastOfType),
            "not" => map(nested_list, |list| SelectorPart::PseudoClass(PseudoClass::Not(list)))(rest),
            "is" | "where" => {
                map(nested_list, |list| SelectorPart::PseudoClass(PseudoClass::Is(list)))(rest)
            }
            "has" | "lang" | "dir" | "host" | "host-context" | "state" | "nth-col"
            | "nth-last-col" => Err(unsupported(input, "this functional pseudo-class is not supported")),
            _ => Err(error_at(input, "a known functional pseudo-class")),
        };
    }

    let pseudo = match name.as_str() {
        "root" | "scope" => PseudoClass::Root,
        "empty" => PseudoClass::Empty,
        "defined" => PseudoClass::Defined,
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "only-child" => PseudoClass::OnlyChild,
        "first-of-type" => PseudoClass::FirstOfType,
        "last-of-type" => PseudoClass::LastOfType,
        "only-of-type" => PseudoClass::OnlyOfType,
        state if STATE_PSEUDO_CLASSES.contains(&state) => PseudoClass::State(state.to_string()),
        vendor if vendor.starts_with("-webkit-") || vendor.starts_with("-moz-") => {
            return Err(unsupported(input, "vendor-prefixed pseudo-classes are not supported"));
        }
        _ => return Err(error_at(input, "a known pseudo-class")),
    };

    Ok((rest, SelectorPart::PseudoClass(pseudo)))
}

// ============================================================================
// Compound and complex selectors
// ============================================================================

fn compound_selector(input: &str) -> ParseResult<CompoundSelector> {
    if input.starts_with('|') {
        return Err(unsupported(input, "namespace prefixes are not supported"));
    }
    let (rest, head) = opt(alt((
        map(char('*'), |_| SelectorPart::Universal),
        map(identifier, |tag: String| SelectorPart::Type(tag.to_ascii_lowercase())),
    )))(input)?;
    if head.is_some() && rest.starts_with('|') {
        return Err(unsupported(rest, "namespace prefixes are not supported"));
    }
    let (rest, tail) = many0(alt((id_part, class_part, attribute_part, pseudo)))(rest)?;

    let mut parts: SmallVec<[SelectorPart; 4]> = SmallVec::new();
    parts.extend(head);
    parts.extend(tail);

    if parts.is_empty() {
        return Err(recoverable(input, ErrorKind::Many1));
    }
    // Only user-action pseudo-classes may follow a pseudo-element
    if let Some(at) = parts
        .iter()
        .position(|p| matches!(p, SelectorPart::PseudoElement(_)))
    {
        let trailing_ok = parts[at + 1..]
            .iter()
            .all(|p| matches!(p, SelectorPart::PseudoClass(PseudoClass::State(_))));
        if !trailing_ok {
            return Err(error_at(rest, "a pseudo-element at the end of the selector"));
        }
    }

    Ok((rest, CompoundSelector { parts }))
}

fn combinator(input: &str) -> Option<(&str, Combinator)> {
    let trimmed = input.trim_start();
    let explicit = [
        ('>', Combinator::Child),
        ('+', Combinator::NextSibling),
        ('~', Combinator::SubsequentSibling),
    ];
    for (symbol, combinator) in explicit {
        if let Some(rest) = trimmed.strip_prefix(symbol) {
            return Some((rest.trim_start(), combinator));
        }
    }
    (trimmed.len() < input.len()).then_some((trimmed, Combinator::Descendant))
}

fn complex_selector(input: &str) -> ParseResult<ComplexSelector> {
    let mut segments = Vec::new();
    let (mut remaining, mut compound) = compound_selector(input)?;

    loop {
        let trimmed = remaining.trim_start();

        if trimmed.is_empty() || trimmed.starts_with([',', ')']) {
            segments.push((compound, None));
            return Ok((remaining, ComplexSelector { segments }));
        }

        let Some((rest, combinator)) = combinator(remaining) else {
            return Err(error_at(trimmed, "a combinator or end of selector"));
        };
        if compound.has_pseudo_element() {
            return Err(error_at(trimmed, "end of selector after a pseudo-element"));
        }

        let (rest, next) = cut(context("selector after combinator", compound_selector))(rest)?;
        segments.push((compound, Some(combinator)));
        compound = next;
        remaining = rest;
    }
}

fn selector_list(input: &str) -> ParseResult<Vec<ComplexSelector>> {
    delimited(
        multispace0,
        separated_list1(
            delimited(multispace0, char(','), multispace0),
            context("selector", complex_selector),
        ),
        multispace0,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_single(input: &str) -> ComplexSelector {
        let list = SelectorList::parse(input).unwrap();
        assert_eq!(list.selectors().len(), 1);
        list.selectors()[0].clone()
    }

    fn subject_parts(input: &str) -> Vec<SelectorPart> {
        parse_single(input).subject().unwrap().parts.to_vec()
    }

    #[test]
    fn test_class_selector() {
        let sel = parse_single(".test-element");
        assert!(sel.is_simple());
        assert_eq!(
            sel.subject().unwrap().parts.as_slice(),
            &[SelectorPart::Class("test-element".into())]
        );
    }

    #[test]
    fn test_compound_with_type_id_and_attribute() {
        let parts = subject_parts("DIV#hero.card[data-reveal=\"up\"]:first-child");
        assert_eq!(parts[0], SelectorPart::Type("div".into()));
        assert_eq!(parts[1], SelectorPart::Id("hero".into()));
        assert_eq!(parts[2], SelectorPart::Class("card".into()));
        assert_eq!(
            parts[3],
            SelectorPart::Attribute(AttributeSelector {
                name: "data-reveal".into(),
                matcher: AttributeMatch::Equals("up".into()),
                case_insensitive: false,
            })
        );
        assert_eq!(parts[4], SelectorPart::PseudoClass(PseudoClass::FirstChild));
    }

    #[test]
    fn test_combinators() {
        let sel = parse_single("main  > section .card + p~ span");
        let combinators: Vec<_> = sel.segments.iter().map(|(_, c)| *c).collect();
        assert_eq!(
            combinators,
            vec![
                Some(Combinator::Child),
                Some(Combinator::Descendant),
                Some(Combinator::NextSibling),
                Some(Combinator::SubsequentSibling),
                None,
            ]
        );
    }

    #[test]
    fn test_selector_list() {
        let list = SelectorList::parse("  .a, .b ,[data-x] ").unwrap();
        assert_eq!(list.selectors().len(), 3);
        assert_eq!(list.source(), ".a, .b ,[data-x]");
    }

    #[test]
    fn test_attribute_operators_and_flags() {
        let cases = [
            ("[a~=x]", AttributeMatch::Includes("x".into()), false),
            ("[a|=en]", AttributeMatch::DashMatch("en".into()), false),
            ("[class^=btn]", AttributeMatch::Prefix("btn".into()), false),
            ("[href$='.pdf' i]", AttributeMatch::Suffix(".pdf".into()), true),
            ("[ a *= \"mid\" s ]", AttributeMatch::Substring("mid".into()), false),
        ];
        for (input, matcher, case_insensitive) in cases {
            let parts = subject_parts(input);
            let SelectorPart::Attribute(attr) = &parts[0] else {
                panic!("{} did not parse as an attribute selector", input);
            };
            assert_eq!(attr.matcher, matcher, "{}", input);
            assert_eq!(attr.case_insensitive, case_insensitive, "{}", input);
        }
    }

    #[test]
    fn test_attribute_match_semantics() {
        assert!(AttributeMatch::Includes("b".into()).matches("a b c", false));
        assert!(!AttributeMatch::Includes("".into()).matches("a b", false));
        assert!(AttributeMatch::DashMatch("en".into()).matches("en-US", false));
        assert!(!AttributeMatch::DashMatch("en".into()).matches("english", false));
        assert!(!AttributeMatch::Prefix("".into()).matches("anything", false));
        assert!(AttributeMatch::Suffix(".PDF".into()).matches("a.pdf", true));
        assert!(!AttributeMatch::Suffix(".PDF".into()).matches("a.pdf", false));
    }

    #[test]
    fn test_escaped_identifiers() {
        assert_eq!(subject_parts(".md\\:flex"), vec![SelectorPart::Class("md:flex".into())]);
        assert_eq!(subject_parts("#\\31 0"), vec![SelectorPart::Id("10".into())]);
        assert_eq!(
            subject_parts(".w-1\\/2"),
            vec![SelectorPart::Class("w-1/2".into())]
        );
    }

    #[test]
    fn test_nth_expressions() {
        let cases = [
            ("3", Nth::new(0, 3)),
            ("odd", Nth::new(2, 1)),
            ("EVEN", Nth::new(2, 0)),
            ("2n", Nth::new(2, 0)),
            ("-n+3", Nth::new(-1, 3)),
            ("+n", Nth::new(1, 0)),
            ("3n - 2", Nth::new(3, -2)),
            (" 2n+1 ", Nth::new(2, 1)),
        ];
        for (arg, expected) in cases {
            assert_eq!(Nth::parse(arg), Some(expected), "{}", arg);
        }
        for bad in ["", "n+", "2 n", "x", "1.5", "+ 2", "3n+-1"] {
            assert_eq!(Nth::parse(bad), None, "{}", bad);
        }
    }

    #[test]
    fn test_nth_positions() {
        let select = |nth: Nth| (1..=8).filter(|p| nth.matches(*p)).collect::<Vec<_>>();
        assert_eq!(select(Nth::new(2, 1)), vec![1, 3, 5, 7]);
        assert_eq!(select(Nth::new(-1, 3)), vec![1, 2, 3]);
        assert_eq!(select(Nth::new(3, -2)), vec![1, 4, 7]);
        assert_eq!(select(Nth::new(0, 5)), vec![5]);
    }

    #[test]
    fn test_pseudo_classes() {
        assert_eq!(
            subject_parts("li:nth-child( 2n )")[1],
            SelectorPart::PseudoClass(PseudoClass::NthChild(Nth::new(2, 0)))
        );
        assert_eq!(
            subject_parts("div:first-of-type")[1],
            SelectorPart::PseudoClass(PseudoClass::FirstOfType)
        );
        assert_eq!(
            subject_parts("a:HOVER")[1],
            SelectorPart::PseudoClass(PseudoClass::State("hover".into()))
        );
        let parts = subject_parts("div:not(.a, p > b)");
        let SelectorPart::PseudoClass(PseudoClass::Not(inner)) = &parts[1] else {
            panic!("expected :not, got {:?}", parts[1]);
        };
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[1].segments.len(), 2);
    }

    #[test]
    fn test_pseudo_elements() {
        assert_eq!(
            subject_parts("p::before")[1],
            SelectorPart::PseudoElement("before".into())
        );
        assert_eq!(
            subject_parts("p:after")[1],
            SelectorPart::PseudoElement("after".into())
        );
        assert_eq!(subject_parts("a::before:hover").len(), 3);
    }

    #[test]
    fn test_valid_css_is_accepted() {
        for ok in [
            "div:hover", "a ~ b", ".a + .b", "div:not(.a)", "[class^=b]", ".md\\:flex",
            "div:nth-child(2n)", "div:first-of-type", ":is(h1, h2) + p", "*:where(.x)",
            "input:checked", ":root > body", "li:nth-last-of-type(odd)",
        ] {
            assert!(SelectorList::parse(ok).is_ok(), "{} should parse", ok);
        }
    }

    #[test]
    fn test_malformed_selectors_are_rejected() {
        for bad in [
            "", "   ", ".", "#", ".1abc", "div >", "> div", ".a,", ",.a", "[data-x",
            "div:bogus", "li:nth-child(x)", ".a..b", "div $", "a ~", "a + + b", "p::bogus",
            "p::before span", "div:not(", "[a=\"open]", ".a)",
        ] {
            match SelectorList::parse(bad) {
                Err(RevealError::InvalidSelector { selector, .. }) => assert_eq!(selector, bad),
                other => panic!("expected InvalidSelector for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_unsupported_selectors_are_distinct() {
        for unsupported in [
            "div:has(> img)", "svg|rect", "*|*", "[xlink|href]", "p:lang(en)",
            "li:nth-child(2 of .x)", "input:-webkit-autofill",
        ] {
            match SelectorList::parse(unsupported) {
                Err(RevealError::UnsupportedSelector { selector, .. }) => {
                    assert_eq!(selector, unsupported)
                }
                other => panic!("expected UnsupportedSelector for {:?}, got {:?}", unsupported, other),
            }
        }
    }

    #[test]
    fn test_error_reports_column() {
        let err = SelectorList::parse(".ok > ").unwrap_err();
        let RevealError::InvalidSelector { reason, .. } = err else {
            panic!("wrong error variant");
        };
        assert!(reason.contains("column"), "reason was: {}", reason);
    }
}
