//! Grammar node types produced by the parser.
//!
//! These are plain value types built fresh for every query call and
//! dropped when it returns; nothing here is cached across calls. A
//! selector list is a sequence of selectors, a selector a sequence of
//! factors, and a factor one combinator paired with one element.

use crate::combinator::Combinator;
use crate::filter::Filter;

/// The tag-name part of an element production: either the `*` wildcard
/// or a literal identifier.
#[derive(Debug, Clone)]
pub enum TagName {
    /// `*` — matches any element.
    Wildcard,
    /// A literal tag name, compared case-insensitively.
    Named(String),
}

impl TagName {
    /// Whether this tag production accepts the given element tag.
    #[must_use]
    pub fn accepts(&self, tag: &str) -> bool {
        match self {
            TagName::Wildcard => true,
            TagName::Named(name) => name.eq_ignore_ascii_case(tag),
        }
    }
}

/// One element production: a tag name plus the filters written after
/// it, in source order.
///
/// A filter-only element (`.x`, `#y`, `[z]`, `:w` with no tag) gets the
/// implicit wildcard tag. All filters must pass for a node to match
/// (logical AND).
#[derive(Debug, Clone)]
pub struct Element {
    /// The tag production, `*` when none was written.
    pub tag_name: TagName,
    /// Filters in the order they were written.
    pub filters: Vec<Filter>,
}

/// One combinator/element pair.
///
/// Every factor carries exactly one combinator; a selector's leading
/// element with no written combinator defaults to
/// [`Combinator::Descendant`].
#[derive(Debug, Clone)]
pub struct Factor {
    /// How this factor's candidates relate to the previous context set.
    pub combinator: Combinator,
    /// The element production candidates are matched against.
    pub element: Element,
}

/// A selector: a non-empty sequence of factors applied left to right.
#[derive(Debug, Clone)]
pub struct Selector {
    /// The factors, in source order.
    pub factors: Vec<Factor>,
}

/// A parsed selector list (`a, b.c, d > e`).
#[derive(Debug, Clone)]
pub struct SelectorList {
    /// The selectors, in source order.
    pub selectors: Vec<Selector>,
}
