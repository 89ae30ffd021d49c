//! CSS-selector query engine for thicket node trees.
//!
//! Compiles a CSS-like selector string into an abstract syntax tree and
//! evaluates it against a [`thicket_dom::DomTree`], producing the
//! ordered, duplicate-free set of matching nodes.
//!
//! # Grammar
//!
//! ```text
//! selectorList = selector {"," selector}
//! selector     = factor {factor}
//! factor       = combinator element | element
//! element      = ("*" | identifier) {filter}
//! filter       = classFilter | idFilter | attrFilter | pseudoFilter
//! classFilter  = "." identifier
//! idFilter     = "#" identifier
//! attrFilter   = "[" identifier [attrOperator value] "]"
//! pseudoFilter = ":" identifier ["(" argument ")"]
//! identifier   = ("_"|alnum) {"_"|"-"|alnum}
//! attrOperator = "=" | "~="
//! combinator   = ">" | "+" | "~" | ""
//! value        = quotedString | number | identifier
//! ```
//!
//! A bare element implies the descendant combinator; an element written
//! as filters alone (`.x`, `#y`, `[z]`, `:w`) carries the implicit
//! wildcard tag. The pseudo-filter argument grammar depends on the
//! registered filter: `value` for the positional built-ins, a nested
//! `selectorList` for `not`, `has`, and `hasnt`.
//!
//! # Extension
//!
//! The pseudo-filter and combinator vocabularies are open: see
//! [`engine::SelectorEngine::register_pseudo_filter`] and
//! [`engine::SelectorEngine::register_combinator`]. Registries are
//! per-engine values, not process globals; registration must finish
//! before an engine is shared for querying, which the `&mut self` /
//! `&self` split enforces within one engine.
//!
//! # Example
//!
//! ```
//! use thicket_dom::{AttributesMap, DomTree, ElementData, NodeType};
//! use thicket_select::engine::SelectorEngine;
//!
//! let mut tree = DomTree::new();
//! let list = tree.alloc(NodeType::Element(ElementData {
//!     tag_name: "ul".to_string(),
//!     attrs: AttributesMap::new(),
//! }));
//! tree.append_child(tree.root(), list);
//! for label in ["a", "b"] {
//!     let item = tree.alloc(NodeType::Element(ElementData {
//!         tag_name: "li".to_string(),
//!         attrs: [("class".to_string(), label.to_string())].into(),
//!     }));
//!     tree.append_child(list, item);
//! }
//!
//! let engine = SelectorEngine::new();
//! let items = engine.query("ul > li.b", &tree, tree.root()).unwrap();
//! assert_eq!(items.len(), 1);
//! ```

/// Grammar node types: elements, factors, selectors, selector lists.
pub mod ast;
/// Combinators: node-set transformers keyed by tree relationship.
pub mod combinator;
/// The selector engine: registry, parsing, and evaluation.
pub mod engine;
/// Errors surfaced by selector parsing.
pub mod error;
/// Filters: class, id, attribute, and pseudo-filter predicates.
pub mod filter;
/// Backtracking string cursor the grammar is driven over.
pub mod scanner;
