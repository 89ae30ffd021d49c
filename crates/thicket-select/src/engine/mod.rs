//! The selector engine: registry, parse entry point, and evaluator.
//!
//! A [`SelectorEngine`] owns the name registries for pseudo-filters and
//! combinators. Built-ins are pre-registered at construction; further
//! registrations are explicit, additive, and keyed by name (a later
//! registration for the same name overwrites the earlier one). There is
//! no hidden process-wide registry: engines with different vocabularies
//! can coexist, each scoped to its own value.
//!
//! Registration takes `&mut self` and querying takes `&self`, so within
//! one engine the borrow checker enforces the "register first, query
//! after" precondition. A fully registered engine can be shared behind
//! `&` across threads.

use std::collections::HashMap;
use std::fmt;

use thicket_common::warning::warn_once;
use thicket_dom::{DomTree, NodeId};

use crate::ast::SelectorList;
use crate::combinator::Combinator;
use crate::error::SelectorError;
use crate::filter::PseudoPredicate;

pub(crate) mod eval;
mod parser;

/// Maximum depth of sub-selector-list nesting (`:not(:not(...))`).
///
/// Parsing fails with [`SelectorError::NestingTooDeep`] beyond this, so
/// a pathological selector cannot grow the call stack without bound.
pub const MAX_NESTING_DEPTH: usize = 32;

/// The built-in pseudo-filter behaviors a name can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinPseudo {
    /// Position 0 in the candidate set (`:first`).
    First,
    /// Final position in the candidate set (`:last`).
    Last,
    /// Candidate-set position equality (`:eq(n)`, `:nth(n)`).
    Eq,
    /// Even candidate-set positions (`:even`).
    Even,
    /// Odd candidate-set positions (`:odd`).
    Odd,
    /// Candidate-set position below a threshold (`:lt(n)`).
    Lt,
    /// Candidate-set position above a threshold (`:gt(n)`).
    Gt,
    /// 1-based element-sibling position (`:nth-child(n)`).
    NthChild,
    /// No preceding element sibling (`:first-child`).
    FirstChild,
    /// Sub-selector non-match (`:not(list)`).
    Not,
    /// Sub-query yields something (`:has(list)`).
    Has,
    /// Sub-query yields nothing (`:hasnt(list)`).
    Hasnt,
}

/// What a registered pseudo-filter name resolves to.
#[derive(Clone)]
pub enum PseudoImplementation {
    /// One of the engine's built-in behaviors.
    Builtin(BuiltinPseudo),
    /// A caller-supplied predicate.
    User(PseudoPredicate),
}

impl fmt::Debug for PseudoImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoImplementation::Builtin(builtin) => {
                f.debug_tuple("Builtin").field(builtin).finish()
            }
            PseudoImplementation::User(_) => f.write_str("User(..)"),
        }
    }
}

/// Which sub-grammar the parser reads between a pseudo-filter's
/// parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgGrammar {
    /// A `value`: quoted string, number, or identifier.
    Value,
    /// A nested `selectorList`.
    SelectorList,
}

/// A registry entry for a pseudo-filter name.
#[derive(Debug, Clone)]
pub struct PseudoEntry {
    /// The behavior bound to the name.
    pub implementation: PseudoImplementation,
    /// The argument grammar the parser uses for it.
    pub arg_grammar: ArgGrammar,
}

/// Compiles selector text and evaluates it against a node tree.
///
/// # Example
///
/// ```
/// use thicket_dom::{AttributesMap, DomTree, ElementData, NodeType};
/// use thicket_select::engine::SelectorEngine;
///
/// let mut tree = DomTree::new();
/// let html = tree.alloc(NodeType::Element(ElementData {
///     tag_name: "html".to_string(),
///     attrs: AttributesMap::new(),
/// }));
/// tree.append_child(tree.root(), html);
///
/// let engine = SelectorEngine::new();
/// let matches = engine.query("html", &tree, tree.root()).unwrap();
/// assert_eq!(matches, vec![html]);
/// ```
#[derive(Debug, Clone)]
pub struct SelectorEngine {
    /// Pseudo-filter name registry.
    pseudo_filters: HashMap<String, PseudoEntry>,
    /// Combinator token registry. The descendant combinator is the
    /// grammar's default for a bare element and has no token here.
    combinators: HashMap<String, Combinator>,
}

impl SelectorEngine {
    /// Create an engine with the built-in vocabulary registered:
    /// pseudo-filters `first`, `last`, `eq`, `nth`, `even`, `odd`,
    /// `lt`, `gt`, `nth-child`, `not`, `has`, `hasnt`, `first-child`
    /// and combinators `>`, `+`, `~`.
    #[must_use]
    pub fn new() -> Self {
        let mut engine = SelectorEngine {
            pseudo_filters: HashMap::new(),
            combinators: HashMap::new(),
        };

        engine.insert_builtin("first", BuiltinPseudo::First, ArgGrammar::Value);
        engine.insert_builtin("last", BuiltinPseudo::Last, ArgGrammar::Value);
        engine.insert_builtin("eq", BuiltinPseudo::Eq, ArgGrammar::Value);
        engine.insert_builtin("nth", BuiltinPseudo::Eq, ArgGrammar::Value);
        engine.insert_builtin("even", BuiltinPseudo::Even, ArgGrammar::Value);
        engine.insert_builtin("odd", BuiltinPseudo::Odd, ArgGrammar::Value);
        engine.insert_builtin("lt", BuiltinPseudo::Lt, ArgGrammar::Value);
        engine.insert_builtin("gt", BuiltinPseudo::Gt, ArgGrammar::Value);
        engine.insert_builtin("nth-child", BuiltinPseudo::NthChild, ArgGrammar::Value);
        engine.insert_builtin("not", BuiltinPseudo::Not, ArgGrammar::SelectorList);
        engine.insert_builtin("has", BuiltinPseudo::Has, ArgGrammar::SelectorList);
        engine.insert_builtin("hasnt", BuiltinPseudo::Hasnt, ArgGrammar::SelectorList);
        engine.insert_builtin("first-child", BuiltinPseudo::FirstChild, ArgGrammar::Value);

        let _ = engine.combinators.insert(">".to_string(), Combinator::Child);
        let _ = engine.combinators.insert("+".to_string(), Combinator::Adjacent);
        let _ = engine.combinators.insert("~".to_string(), Combinator::General);

        engine
    }

    /// Register a pseudo-filter under `name`, replacing any earlier
    /// entry for that name. `arg_grammar` tells the parser what to read
    /// between the parentheses when the filter is written with an
    /// argument.
    ///
    /// Replacing a built-in binding is allowed but prints a one-time
    /// warning, since it changes the meaning of standard selector text
    /// for this engine.
    pub fn register_pseudo_filter(
        &mut self,
        name: &str,
        implementation: PseudoImplementation,
        arg_grammar: ArgGrammar,
    ) {
        let previous = self.pseudo_filters.insert(
            name.to_string(),
            PseudoEntry {
                implementation,
                arg_grammar,
            },
        );
        if previous.is_some_and(|e| matches!(e.implementation, PseudoImplementation::Builtin(_))) {
            warn_once(
                "selector",
                &format!("built-in pseudo-filter `{name}` replaced by a new registration"),
            );
        }
    }

    /// Register a combinator under `token`, replacing any earlier entry
    /// for that token. The token must be non-empty; the tokenless
    /// descendant combinator is the grammar's default and cannot be
    /// rebound.
    ///
    /// Replacing a built-in binding prints a one-time warning.
    pub fn register_combinator(&mut self, token: &str, combinator: Combinator) {
        let previous = self.combinators.insert(token.to_string(), combinator);
        if previous.is_some_and(|c| !matches!(c, Combinator::UserDefined(_))) {
            warn_once(
                "selector",
                &format!("built-in combinator `{token}` replaced by a new registration"),
            );
        }
    }

    /// Parse and evaluate a selector list against `tree`, starting from
    /// `root`, returning the matching nodes in document order with
    /// duplicates removed. An empty result is a normal outcome, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector text is malformed;
    /// the whole call fails, never a partial result.
    pub fn query(
        &self,
        selector_list: &str,
        tree: &DomTree,
        root: NodeId,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = self.compile(selector_list)?;
        Ok(self.evaluate(&list, tree, root))
    }

    /// Parse a selector list without evaluating it.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the selector text is malformed.
    pub fn compile(&self, selector_list: &str) -> Result<SelectorList, SelectorError> {
        parser::Parser::new(selector_list, self).parse()
    }

    /// Evaluate an already-parsed selector list against `tree`,
    /// starting from `root`.
    #[must_use]
    pub fn evaluate(&self, list: &SelectorList, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        eval::evaluate_selector_list(list, tree, root)
    }

    /// Look up a pseudo-filter registry entry.
    #[must_use]
    pub fn pseudo_filter(&self, name: &str) -> Option<&PseudoEntry> {
        self.pseudo_filters.get(name)
    }

    /// Look up a combinator by its token.
    #[must_use]
    pub fn combinator(&self, token: &str) -> Option<&Combinator> {
        self.combinators.get(token)
    }

    /// All registered combinator tokens, longest first so that a token
    /// never shadows another it is a prefix of.
    pub(crate) fn combinator_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.combinators.keys().cloned().collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens
    }

    /// Pre-registered, without the replacement warning.
    fn insert_builtin(&mut self, name: &str, builtin: BuiltinPseudo, arg_grammar: ArgGrammar) {
        let _ = self.pseudo_filters.insert(
            name.to_string(),
            PseudoEntry {
                implementation: PseudoImplementation::Builtin(builtin),
                arg_grammar,
            },
        );
    }
}

impl Default for SelectorEngine {
    fn default() -> Self {
        Self::new()
    }
}
