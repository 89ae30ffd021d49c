//! Filters: predicates that narrow an element production's matches.
//!
//! Class, id, and attribute filters are pure structural comparisons
//! against node metadata. Pseudo-filters additionally see the node's
//! position within the candidate set that survived the preceding
//! filters, or re-enter the evaluator for sub-selector matching
//! (`:not`, `:has`, `:hasnt`).

use std::fmt;
use std::sync::Arc;

use thicket_dom::{DomTree, NodeId};

use crate::ast::SelectorList;
use crate::engine::eval;

/// Everything a user-defined pseudo-filter predicate gets to look at.
pub struct FilterContext<'a> {
    /// The tree being queried.
    pub tree: &'a DomTree,
    /// The node under test.
    pub node: NodeId,
    /// The parsed argument, if the filter was written with one.
    pub argument: &'a PseudoArgument,
    /// Zero-based position of the node within `candidates`.
    pub position: usize,
    /// The candidate set the node is being tested as part of.
    pub candidates: &'a [NodeId],
}

/// A user-supplied pseudo-filter predicate.
pub type PseudoPredicate = Arc<dyn Fn(&FilterContext<'_>) -> bool + Send + Sync>;

/// The parsed argument of a pseudo-filter.
#[derive(Debug, Clone)]
pub enum PseudoArgument {
    /// Written without parentheses.
    None,
    /// A `value` argument: quoted string, number, or identifier.
    Value(String),
    /// A nested selector list argument.
    Selectors(SelectorList),
}

impl PseudoArgument {
    /// The raw value string, or `""` when the argument is absent or a
    /// selector list.
    #[must_use]
    pub fn as_value(&self) -> &str {
        match self {
            PseudoArgument::Value(v) => v,
            _ => "",
        }
    }
}

/// How an attribute filter compares against the attribute's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOperator {
    /// `[attr]` — the attribute is present, any value.
    Exists,
    /// `[attr=value]` — exact value match.
    Equals(String),
    /// `[attr~=value]` — value is one of the attribute's
    /// whitespace-separated words.
    Includes(String),
}

/// An attribute filter: name plus comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrFilter {
    /// The attribute name.
    pub name: String,
    /// How the attribute's value is compared.
    pub op: AttrOperator,
}

impl AttrFilter {
    /// Whether the element's attributes satisfy this filter.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        match &self.op {
            AttrOperator::Exists => element.attrs.contains_key(&self.name),
            AttrOperator::Equals(value) => {
                element.attrs.get(&self.name).is_some_and(|v| v == value)
            }
            AttrOperator::Includes(value) => element
                .attrs
                .get(&self.name)
                .is_some_and(|v| v.split_whitespace().any(|word| word == value)),
        }
    }
}

/// The resolved behavior of a pseudo-filter occurrence.
///
/// Built-ins are a closed set of variants; filters registered at
/// runtime land in [`PseudoKind::User`] wrapping the caller's
/// predicate. Numeric arguments are validated at parse time, so the
/// variants here carry ready-to-use payloads.
#[derive(Clone)]
pub enum PseudoKind {
    /// `:first` — position 0 within the current candidate set.
    First,
    /// `:last` — the final position within the current candidate set.
    Last,
    /// `:eq(n)` / `:nth(n)` — zero-based candidate-set position equals
    /// `n`.
    Eq(i64),
    /// `:even` — even candidate-set position (0, 2, 4, ...).
    Even,
    /// `:odd` — odd candidate-set position.
    Odd,
    /// `:lt(n)` — candidate-set position strictly less than `n`.
    Lt(i64),
    /// `:gt(n)` — candidate-set position strictly greater than `n`.
    Gt(i64),
    /// `:nth-child(n)` — 1-based position among the node's element
    /// siblings equals `n`. Unlike `:eq`, this looks at the tree, not
    /// the candidate set, and there is no `an+b` formula support.
    NthChild(i64),
    /// `:first-child` — no preceding element sibling.
    FirstChild,
    /// `:not(list)` — the node matches no selector of the list when the
    /// list is evaluated with the node itself as root.
    Not(SelectorList),
    /// `:has(list)` — the list, rooted at the node, matches something.
    Has(SelectorList),
    /// `:hasnt(list)` — the list, rooted at the node, matches nothing.
    Hasnt(SelectorList),
    /// A pseudo-filter registered at runtime.
    User {
        /// The caller's predicate.
        predicate: PseudoPredicate,
        /// The parsed argument it receives.
        argument: PseudoArgument,
    },
}

impl PseudoKind {
    /// Evaluate this pseudo-filter for one candidate.
    ///
    /// `position` is the node's index within `candidates`, the set that
    /// survived the preceding filters of the same element production.
    #[must_use]
    pub fn test(
        &self,
        tree: &DomTree,
        node: NodeId,
        position: usize,
        candidates: &[NodeId],
    ) -> bool {
        match self {
            PseudoKind::First => position == 0,
            PseudoKind::Last => position + 1 == candidates.len(),
            PseudoKind::Eq(n) => position_is(position, *n),
            PseudoKind::Even => position % 2 == 0,
            PseudoKind::Odd => position % 2 == 1,
            PseudoKind::Lt(n) => i64::try_from(position).is_ok_and(|p| p < *n),
            PseudoKind::Gt(n) => i64::try_from(position).is_ok_and(|p| p > *n),
            PseudoKind::NthChild(n) => position_is(tree.element_sibling_index(node) + 1, *n),
            PseudoKind::FirstChild => tree.element_sibling_index(node) == 0,
            PseudoKind::Not(list) => !eval::evaluate_selector_list(list, tree, node).contains(&node),
            PseudoKind::Has(list) => !eval::evaluate_selector_list(list, tree, node).is_empty(),
            PseudoKind::Hasnt(list) => eval::evaluate_selector_list(list, tree, node).is_empty(),
            PseudoKind::User {
                predicate,
                argument,
            } => predicate(&FilterContext {
                tree,
                node,
                argument,
                position,
                candidates,
            }),
        }
    }
}

impl fmt::Debug for PseudoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoKind::First => f.write_str("First"),
            PseudoKind::Last => f.write_str("Last"),
            PseudoKind::Eq(n) => write!(f, "Eq({n})"),
            PseudoKind::Even => f.write_str("Even"),
            PseudoKind::Odd => f.write_str("Odd"),
            PseudoKind::Lt(n) => write!(f, "Lt({n})"),
            PseudoKind::Gt(n) => write!(f, "Gt({n})"),
            PseudoKind::NthChild(n) => write!(f, "NthChild({n})"),
            PseudoKind::FirstChild => f.write_str("FirstChild"),
            PseudoKind::Not(list) => f.debug_tuple("Not").field(list).finish(),
            PseudoKind::Has(list) => f.debug_tuple("Has").field(list).finish(),
            PseudoKind::Hasnt(list) => f.debug_tuple("Hasnt").field(list).finish(),
            PseudoKind::User { argument, .. } => {
                f.debug_struct("User").field("argument", argument).finish()
            }
        }
    }
}

/// A predicate narrowing an element production's matches.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `.name` — class list membership.
    Class(String),
    /// `#name` — id attribute equality.
    Id(String),
    /// `[name]`, `[name=v]`, `[name~=v]` — attribute comparison.
    Attr(AttrFilter),
    /// `:name` or `:name(arg)` — registry-resolved pseudo-filter.
    Pseudo(PseudoKind),
}

impl Filter {
    /// Evaluate this filter for one candidate node.
    #[must_use]
    pub fn test(
        &self,
        tree: &DomTree,
        node: NodeId,
        position: usize,
        candidates: &[NodeId],
    ) -> bool {
        match self {
            Filter::Class(class) => tree
                .as_element(node)
                .is_some_and(|e| e.classes().contains(class.as_str())),
            Filter::Id(id) => tree
                .as_element(node)
                .is_some_and(|e| e.id().is_some_and(|node_id| node_id == id)),
            Filter::Attr(attr) => attr.matches(tree, node),
            Filter::Pseudo(pseudo) => pseudo.test(tree, node, position, candidates),
        }
    }
}

/// Whether a (usize) position equals a signed filter argument.
fn position_is(position: usize, n: i64) -> bool {
    i64::try_from(position).is_ok_and(|p| p == n)
}
