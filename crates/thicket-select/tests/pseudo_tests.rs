//! Built-in pseudo-filter behavior: positional filters over the
//! candidate set, tree-positional filters, and sub-selector filters.

use thicket_dom::{DomTree, ElementData, NodeId, NodeType};
use thicket_select::engine::SelectorEngine;

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: attrs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, content: &str) {
    let id = tree.alloc(NodeType::Text(content.to_string()));
    tree.append_child(parent, id);
}

/// ```text
/// root
/// └── html
///     ├── div          ├─ p ── span
///     │                └─ p
///     ├── div ── p
///     ├── ul           "text", li.a, "text", li.x, li.x, li, li.x
///     ├── ul           li, li
///     └── div#grid     p.x ×3
/// ```
struct Doc {
    tree: DomTree,
    div1: NodeId,
    div2: NodeId,
    ul1: NodeId,
    li: [NodeId; 5],
    li6: NodeId,
    grid: NodeId,
    cells: [NodeId; 3],
}

fn sample_doc() -> Doc {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html", &[]);

    let div1 = element(&mut tree, html, "div", &[]);
    let p1 = element(&mut tree, div1, "p", &[]);
    let _span = element(&mut tree, p1, "span", &[]);
    let _p2 = element(&mut tree, div1, "p", &[]);

    let div2 = element(&mut tree, html, "div", &[]);
    let _p3 = element(&mut tree, div2, "p", &[]);

    let ul1 = element(&mut tree, html, "ul", &[]);
    text(&mut tree, ul1, "intro");
    let li1 = element(&mut tree, ul1, "li", &[("class", "a")]);
    text(&mut tree, ul1, "between");
    let li2 = element(&mut tree, ul1, "li", &[("class", "x")]);
    let li3 = element(&mut tree, ul1, "li", &[("class", "x")]);
    let li4 = element(&mut tree, ul1, "li", &[]);
    let li5 = element(&mut tree, ul1, "li", &[("class", "x")]);

    let ul2 = element(&mut tree, html, "ul", &[]);
    let li6 = element(&mut tree, ul2, "li", &[]);
    let _li7 = element(&mut tree, ul2, "li", &[]);

    let grid = element(&mut tree, html, "div", &[("id", "grid")]);
    let cells = [
        element(&mut tree, grid, "p", &[("class", "x")]),
        element(&mut tree, grid, "p", &[("class", "x")]),
        element(&mut tree, grid, "p", &[("class", "x")]),
    ];

    Doc {
        tree,
        div1,
        div2,
        ul1,
        li: [li1, li2, li3, li4, li5],
        li6,
        grid,
        cells,
    }
}

fn query(doc: &Doc, selector: &str, root: NodeId) -> Vec<NodeId> {
    SelectorEngine::new().query(selector, &doc.tree, root).unwrap()
}

// ========== candidate-set positional filters ==========

#[test]
fn test_first_and_last() {
    let doc = sample_doc();
    assert_eq!(query(&doc, "li:first", doc.ul1), vec![doc.li[0]]);
    assert_eq!(query(&doc, "li:last", doc.ul1), vec![doc.li[4]]);
}

#[test]
fn test_eq_is_zero_based() {
    let doc = sample_doc();
    assert_eq!(query(&doc, "li:eq(0)", doc.ul1), vec![doc.li[0]]);
    assert_eq!(query(&doc, "li:eq(2)", doc.ul1), vec![doc.li[2]]);
    assert!(query(&doc, "li:eq(5)", doc.ul1).is_empty());
    assert!(query(&doc, "li:eq(-1)", doc.ul1).is_empty());
}

#[test]
fn test_nth_is_an_alias_for_eq() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, "li:nth(3)", doc.ul1),
        query(&doc, "li:eq(3)", doc.ul1)
    );
}

#[test]
fn test_even_and_odd_positions() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, "li:even", doc.ul1),
        vec![doc.li[0], doc.li[2], doc.li[4]]
    );
    assert_eq!(
        query(&doc, "li:odd", doc.ul1),
        vec![doc.li[1], doc.li[3]]
    );
}

#[test]
fn test_lt_and_gt() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, "li:lt(2)", doc.ul1),
        vec![doc.li[0], doc.li[1]]
    );
    assert_eq!(
        query(&doc, "li:gt(2)", doc.ul1),
        vec![doc.li[3], doc.li[4]]
    );
    assert!(query(&doc, "li:lt(0)", doc.ul1).is_empty());
    assert_eq!(
        query(&doc, "li:gt(-1)", doc.ul1),
        query(&doc, "li", doc.ul1)
    );
}

#[test]
fn test_positional_filters_see_the_already_narrowed_set() {
    let doc = sample_doc();
    // `.x` reduces the candidates to li2/li3/li5 before `:first` runs
    assert_eq!(query(&doc, "li.x:first", doc.ul1), vec![doc.li[1]]);
    assert_eq!(query(&doc, "li.x:eq(1)", doc.ul1), vec![doc.li[2]]);
    assert_eq!(query(&doc, "li.x:last", doc.ul1), vec![doc.li[4]]);
}

#[test]
fn test_first_runs_once_over_the_whole_candidate_set() {
    let doc = sample_doc();
    // all seven li elements form one candidate set, so only the very
    // first survives, unlike `:first-child` below
    assert_eq!(query(&doc, "li:first", NodeId::ROOT), vec![doc.li[0]]);
}

// ========== tree-positional filters ==========

#[test]
fn test_nth_child_counts_element_siblings_one_based() {
    let doc = sample_doc();
    // text nodes inside the ul do not count
    assert_eq!(query(&doc, "li:nth-child(1)", doc.ul1), vec![doc.li[0]]);
    assert_eq!(query(&doc, "li:nth-child(2)", doc.ul1), vec![doc.li[1]]);
    assert!(query(&doc, "li:nth-child(0)", doc.ul1).is_empty());
    assert!(query(&doc, "li:nth-child(9)", doc.ul1).is_empty());
}

#[test]
fn test_nth_child_ignores_candidate_narrowing() {
    let doc = sample_doc();
    // li2 is the first candidate with class x but the second element
    // child of its parent
    assert_eq!(query(&doc, "li.x:eq(0)", doc.ul1), vec![doc.li[1]]);
    assert!(query(&doc, "li.x:nth-child(1)", doc.ul1).is_empty());
    assert_eq!(query(&doc, "li.x:nth-child(2)", doc.ul1), vec![doc.li[1]]);
}

#[test]
fn test_nth_child_1_with_uniform_children_keeps_only_the_first() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, ".x:nth-child(1)", doc.grid),
        vec![doc.cells[0]]
    );
}

#[test]
fn test_first_child_matches_per_parent() {
    let doc = sample_doc();
    // one hit per list, even with a leading text node in ul1
    assert_eq!(
        query(&doc, "li:first-child", NodeId::ROOT),
        vec![doc.li[0], doc.li6]
    );
}

// ========== sub-selector filters ==========

#[test]
fn test_not_excludes_sub_list_matches() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, "li:not(.x)", doc.ul1),
        vec![doc.li[0], doc.li[3]]
    );
    assert_eq!(
        query(&doc, "li:not(.x, .a)", doc.ul1),
        vec![doc.li[3]]
    );
}

#[test]
fn test_not_of_the_same_selector_is_empty() {
    let doc = sample_doc();
    assert!(query(&doc, "li:not(li)", NodeId::ROOT).is_empty());
    assert!(query(&doc, "*:not(*)", NodeId::ROOT).is_empty());
}

#[test]
fn test_has_requires_a_sub_list_match() {
    let doc = sample_doc();
    assert_eq!(query(&doc, "div:has(span)", NodeId::ROOT), vec![doc.div1]);
    // the sub-selector may itself use combinators
    assert_eq!(
        query(&doc, "div:has(p span)", NodeId::ROOT),
        vec![doc.div1]
    );
    assert!(query(&doc, "ul:has(span)", NodeId::ROOT).is_empty());
}

#[test]
fn test_hasnt_is_the_complement_of_has() {
    let doc = sample_doc();
    assert_eq!(
        query(&doc, "div:hasnt(span)", NodeId::ROOT),
        vec![doc.div2, doc.grid]
    );
}

#[test]
fn test_pseudo_filters_chain() {
    let doc = sample_doc();
    // narrow to the x-classed items, drop the first of them
    assert_eq!(
        query(&doc, "li.x:not(.a):gt(0)", doc.ul1),
        vec![doc.li[2], doc.li[4]]
    );
}
