//! Tree-matching evaluator for parsed selector lists.
//!
//! Evaluation is a pure function over the tree: factors are applied
//! left to right, each combinator expanding the context set into a
//! candidate set and each element production narrowing it. Document
//! order (the tree's pre-order) is preserved throughout; nothing is
//! re-sorted. Sub-selector pseudo-filters (`:not`, `:has`, `:hasnt`)
//! re-enter [`evaluate_selector_list`] with their candidate node as
//! root, so matching logic stays single-sourced.

use std::collections::HashSet;

use thicket_dom::{DomTree, NodeId};

use crate::ast::{Element, Selector, SelectorList};

/// Evaluate every selector of the list in order against `root` and
/// concatenate the results, deduplicating in first-occurrence order: a
/// node already produced by an earlier selector is not re-added by a
/// later one.
pub(crate) fn evaluate_selector_list(
    list: &SelectorList,
    tree: &DomTree,
    root: NodeId,
) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for selector in &list.selectors {
        for id in evaluate_selector(selector, tree, root) {
            if seen.insert(id) {
                matches.push(id);
            }
        }
    }
    matches
}

/// Run one selector's factor chain from the root context.
fn evaluate_selector(selector: &Selector, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
    let mut context = vec![root];
    for factor in &selector.factors {
        let candidates = factor.combinator.apply(tree, &context);
        context = narrow(&factor.element, tree, candidates);
        if context.is_empty() {
            break;
        }
    }
    context
}

/// Narrow a candidate set through an element production: first the tag
/// test (the wildcard accepts any element, never a text or comment
/// node), then each filter in written order.
///
/// Filters apply sequentially, each reducing the set the next one sees,
/// so a positional pseudo-filter indexes into the set that survived the
/// filters written before it (`.x:first` is the first node with class
/// `x`, not the first candidate overall).
fn narrow(element: &Element, tree: &DomTree, candidates: Vec<NodeId>) -> Vec<NodeId> {
    let mut set: Vec<NodeId> = candidates
        .into_iter()
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|e| element.tag_name.accepts(&e.tag_name))
        })
        .collect();

    for filter in &element.filters {
        set = set
            .iter()
            .enumerate()
            .filter(|&(position, &node)| filter.test(tree, node, position, &set))
            .map(|(_, &node)| node)
            .collect();
        if set.is_empty() {
            break;
        }
    }
    set
}
