//! Combinators: node-set transformers keyed by tree relationship.
//!
//! A combinator expands every node of a context set into its relevant
//! relatives and the union, deduplicated in first-occurrence order,
//! becomes the candidate set for the factor's element production. Only
//! element nodes are ever yielded; text and comment nodes cannot match
//! an element production and are skipped during traversal.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use thicket_dom::{DomTree, NodeId};

/// A user-supplied combinator: expands one context node into its
/// candidate relatives, in document order.
pub type CombinatorFn = Arc<dyn Fn(&DomTree, NodeId) -> Vec<NodeId> + Send + Sync>;

/// A node-set transformer based on tree relationship.
#[derive(Clone)]
pub enum Combinator {
    /// The implicit whitespace combinator: the context node itself
    /// followed by its element descendants in pre-order.
    ///
    /// Self-inclusion is deliberate (and diverges from CSS): it is what
    /// makes `*` rooted at `R` return `R` itself, and what makes
    /// `a:not(a)` empty for every tag `a`, since the sub-query rooted
    /// at a node must be able to see that node.
    Descendant,
    /// `>` — the element children of each context node.
    Child,
    /// `+` — the element sibling immediately following each context
    /// node, if any.
    Adjacent,
    /// `~` — all element siblings following each context node.
    General,
    /// A combinator registered at runtime under a custom token.
    UserDefined(CombinatorFn),
}

impl Combinator {
    /// Expand a single context node into its relatives for this
    /// combinator, in document order.
    #[must_use]
    pub fn expand(&self, tree: &DomTree, node: NodeId) -> Vec<NodeId> {
        match self {
            Combinator::Descendant => {
                let mut nodes = vec![node];
                nodes.extend(
                    tree.descendants(node)
                        .filter(|&id| tree.as_element(id).is_some()),
                );
                nodes
            }
            Combinator::Child => tree.element_children(node),
            Combinator::Adjacent => tree.next_element_sibling(node).into_iter().collect(),
            Combinator::General => tree.following_element_siblings(node).collect(),
            Combinator::UserDefined(expand) => expand(tree, node),
        }
    }

    /// Expand a whole context set, deduplicating while preserving the
    /// first occurrence of each node.
    ///
    /// Overlapping subtrees (nested context nodes under the descendant
    /// combinator, shared siblings under `~`) would otherwise produce
    /// the same node more than once and skew positional pseudo-filters.
    #[must_use]
    pub fn apply(&self, tree: &DomTree, context: &[NodeId]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for &node in context {
            for id in self.expand(tree, node) {
                if seen.insert(id) {
                    candidates.push(id);
                }
            }
        }
        candidates
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Descendant => f.write_str("Descendant"),
            Combinator::Child => f.write_str("Child"),
            Combinator::Adjacent => f.write_str("Adjacent"),
            Combinator::General => f.write_str("General"),
            Combinator::UserDefined(_) => f.write_str("UserDefined(..)"),
        }
    }
}
