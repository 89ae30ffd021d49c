//! Recursive-descent driver over the selector grammar.
//!
//! One method per production. Each returns
//! `Result<Option<T>, SelectorError>`: `Ok(Some(_))` parsed and
//! advanced, `Ok(None)` means the rule is absent with the scanner
//! rolled back, and `Err(_)` means the rule started (a prefix token
//! such as `.`, `#`, `[`, `:`, or a combinator was consumed) but its
//! required continuation is missing or malformed. Only the last case
//! aborts the query.
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

use crate::ast::{Element, Factor, Selector, SelectorList, TagName};
use crate::combinator::Combinator;
use crate::error::SelectorError;
use crate::filter::{AttrFilter, AttrOperator, Filter, PseudoArgument, PseudoKind};
use crate::scanner::Scanner;

use super::{ArgGrammar, BuiltinPseudo, MAX_NESTING_DEPTH, PseudoImplementation, SelectorEngine};

/// Grammar driver for one parse call.
///
/// Owns the scanner for the duration of the call; the engine is only
/// consulted for registry lookups.
pub(crate) struct Parser<'a> {
    scanner: Scanner,
    engine: &'a SelectorEngine,
    /// Registered combinator tokens, longest first.
    combinator_tokens: Vec<String>,
    /// Current sub-selector-list nesting depth.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &str, engine: &'a SelectorEngine) -> Self {
        Parser {
            scanner: Scanner::new(source),
            engine,
            combinator_tokens: engine.combinator_tokens(),
            depth: 0,
        }
    }

    /// Parse the whole input as a selector list; trailing text that is
    /// not part of the grammar is a syntax error.
    pub(crate) fn parse(mut self) -> Result<SelectorList, SelectorError> {
        let list = self.selector_list()?;
        self.scanner.skip_whitespace();
        if !self.scanner.at_end() {
            return Err(SelectorError::Syntax {
                rule: "selector list",
                position: self.scanner.position(),
            });
        }
        Ok(list)
    }

    /// `selectorList = selector {"," selector}`
    ///
    /// An input with no leading selector yields an empty list; the
    /// caller decides whether that is acceptable (it is for a whole
    /// query, which then matches nothing, but not for a `:not(...)`
    /// argument).
    fn selector_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        let Some(first) = self.selector()? else {
            return Ok(SelectorList { selectors });
        };
        selectors.push(first);

        loop {
            let snapshot = self.scanner.position();
            self.scanner.skip_whitespace();
            if !self.scanner.try_literal(",") {
                self.scanner.set_position(snapshot);
                break;
            }
            let position = self.scanner.position();
            match self.selector()? {
                Some(selector) => selectors.push(selector),
                // comma consumed, so a selector is required
                None => {
                    return Err(SelectorError::Syntax {
                        rule: "selector",
                        position,
                    });
                }
            }
        }
        Ok(SelectorList { selectors })
    }

    /// `selector = factor {factor}`
    fn selector(&mut self) -> Result<Option<Selector>, SelectorError> {
        let Some(first) = self.factor()? else {
            return Ok(None);
        };
        let mut factors = vec![first];
        while let Some(factor) = self.factor()? {
            factors.push(factor);
        }
        Ok(Some(Selector { factors }))
    }

    /// `factor = combinator element | element`
    ///
    /// A bare element implies the descendant combinator.
    fn factor(&mut self) -> Result<Option<Factor>, SelectorError> {
        if let Some(combinator) = self.combinator() {
            let position = self.scanner.position();
            match self.element()? {
                Some(element) => Ok(Some(Factor {
                    combinator,
                    element,
                })),
                // the combinator token was consumed; an element must follow
                None => Err(SelectorError::Syntax {
                    rule: "element",
                    position,
                }),
            }
        } else if let Some(element) = self.element()? {
            Ok(Some(Factor {
                combinator: Combinator::Descendant,
                element,
            }))
        } else {
            Ok(None)
        }
    }

    /// `combinator = ">" | "+" | "~" | ...` — whatever tokens the
    /// registry holds; the empty descendant combinator is handled by
    /// `factor`, not matched here.
    fn combinator(&mut self) -> Option<Combinator> {
        let tokens: Vec<&str> = self.combinator_tokens.iter().map(String::as_str).collect();
        let index = self.scanner.attempt(|scanner| {
            scanner.skip_whitespace();
            scanner.try_one_of(&tokens)
        })?;
        self.engine.combinator(&self.combinator_tokens[index]).cloned()
    }

    /// `element = ("*" | identifier) {filter}`
    ///
    /// An element may also be written as filters alone (`.x`, `#y`,
    /// `[z]`, `:w`), in which case the tag is the implicit wildcard.
    fn element(&mut self) -> Result<Option<Element>, SelectorError> {
        let snapshot = self.scanner.position();
        self.scanner.skip_whitespace();

        let mut filters = Vec::new();
        let tag_name = if self.scanner.try_literal("*") {
            TagName::Wildcard
        } else if let Some(name) = self.scanner.try_identifier() {
            TagName::Named(name)
        } else if let Some(filter) = self.filter()? {
            filters.push(filter);
            TagName::Wildcard
        } else {
            self.scanner.set_position(snapshot);
            return Ok(None);
        };

        while let Some(filter) = self.filter()? {
            filters.push(filter);
        }
        Ok(Some(Element { tag_name, filters }))
    }

    /// `filter = classFilter | idFilter | attrFilter | pseudoFilter`
    fn filter(&mut self) -> Result<Option<Filter>, SelectorError> {
        if let Some(filter) = self.class_filter()? {
            return Ok(Some(filter));
        }
        if let Some(filter) = self.id_filter()? {
            return Ok(Some(filter));
        }
        if let Some(filter) = self.attr_filter()? {
            return Ok(Some(filter));
        }
        self.pseudo_filter()
    }

    /// `classFilter = "." identifier`
    fn class_filter(&mut self) -> Result<Option<Filter>, SelectorError> {
        if !self.scanner.try_literal(".") {
            return Ok(None);
        }
        let position = self.scanner.position();
        match self.scanner.try_identifier() {
            Some(name) => Ok(Some(Filter::Class(name))),
            None => Err(SelectorError::Syntax {
                rule: "identifier",
                position,
            }),
        }
    }

    /// `idFilter = "#" identifier`
    fn id_filter(&mut self) -> Result<Option<Filter>, SelectorError> {
        if !self.scanner.try_literal("#") {
            return Ok(None);
        }
        let position = self.scanner.position();
        match self.scanner.try_identifier() {
            Some(name) => Ok(Some(Filter::Id(name))),
            None => Err(SelectorError::Syntax {
                rule: "identifier",
                position,
            }),
        }
    }

    /// `attrFilter = "[" identifier [attrOperator value] "]"`
    fn attr_filter(&mut self) -> Result<Option<Filter>, SelectorError> {
        if !self.scanner.try_literal("[") {
            return Ok(None);
        }
        let position = self.scanner.position();
        let Some(name) = self.scanner.try_identifier() else {
            return Err(SelectorError::Syntax {
                rule: "identifier",
                position,
            });
        };

        let op = if self.scanner.try_literal("~=") {
            AttrOperator::Includes(self.required_value("attribute operator")?)
        } else if self.scanner.try_literal("=") {
            AttrOperator::Equals(self.required_value("attribute operator")?)
        } else {
            AttrOperator::Exists
        };

        if !self.scanner.try_literal("]") {
            return Err(SelectorError::Syntax {
                rule: "attribute filter",
                position: self.scanner.position(),
            });
        }
        Ok(Some(Filter::Attr(AttrFilter { name, op })))
    }

    /// `pseudoFilter = ":" identifier ["(" argument ")"]`
    ///
    /// The argument grammar comes from the registry entry: either a
    /// `value` or a nested `selectorList`.
    fn pseudo_filter(&mut self) -> Result<Option<Filter>, SelectorError> {
        if !self.scanner.try_literal(":") {
            return Ok(None);
        }
        let name_position = self.scanner.position();
        let Some(name) = self.scanner.try_identifier() else {
            return Err(SelectorError::Syntax {
                rule: "identifier",
                position: name_position,
            });
        };
        let Some(entry) = self.engine.pseudo_filter(&name).cloned() else {
            return Err(SelectorError::UnknownPseudoFilter {
                name,
                position: name_position,
            });
        };

        let mut argument = PseudoArgument::None;
        if self.scanner.try_literal("(") {
            argument = match entry.arg_grammar {
                ArgGrammar::Value => {
                    let position = self.scanner.position();
                    match self.value()? {
                        Some(value) => PseudoArgument::Value(value),
                        None => {
                            return Err(SelectorError::Syntax {
                                rule: "pseudo-filter argument",
                                position,
                            });
                        }
                    }
                }
                ArgGrammar::SelectorList => {
                    PseudoArgument::Selectors(self.nested_selector_list()?)
                }
            };
            self.scanner.skip_whitespace();
            if !self.scanner.try_literal(")") {
                return Err(SelectorError::Syntax {
                    rule: "pseudo-filter",
                    position: self.scanner.position(),
                });
            }
        }

        let kind = build_pseudo(&entry.implementation, argument, name_position)?;
        Ok(Some(Filter::Pseudo(kind)))
    }

    /// A sub-selector-list argument, depth-checked.
    fn nested_selector_list(&mut self) -> Result<SelectorList, SelectorError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SelectorError::NestingTooDeep {
                position: self.scanner.position(),
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let list = self.selector_list()?;
        self.depth -= 1;

        if list.selectors.is_empty() {
            return Err(SelectorError::Syntax {
                rule: "selector",
                position: self.scanner.position(),
            });
        }
        Ok(list)
    }

    /// `value = quotedString | identifier | number`
    ///
    /// The identifier is tried before the number so that values like
    /// `0015blah` stay whole; the number alternative picks up signed
    /// integers, which are not valid identifiers.
    fn value(&mut self) -> Result<Option<String>, SelectorError> {
        if matches!(self.scanner.peek(), Some('"' | '\'')) {
            let position = self.scanner.position();
            return match self.scanner.try_quoted_string() {
                Some(value) => Ok(Some(value)),
                // the quote is there, so the string is unterminated
                None => Err(SelectorError::Syntax {
                    rule: "quoted string",
                    position,
                }),
            };
        }
        if let Some(identifier) = self.scanner.try_identifier() {
            return Ok(Some(identifier));
        }
        Ok(self.scanner.try_number())
    }

    /// A `value` in a position where the grammar requires one.
    fn required_value(&mut self, rule: &'static str) -> Result<String, SelectorError> {
        let position = self.scanner.position();
        match self.value()? {
            Some(value) => Ok(value),
            None => Err(SelectorError::Syntax { rule, position }),
        }
    }
}

/// Resolve a registry implementation plus parsed argument into a
/// concrete [`PseudoKind`], validating the argument shape.
fn build_pseudo(
    implementation: &PseudoImplementation,
    argument: PseudoArgument,
    position: usize,
) -> Result<PseudoKind, SelectorError> {
    let builtin = match implementation {
        PseudoImplementation::User(predicate) => {
            return Ok(PseudoKind::User {
                predicate: predicate.clone(),
                argument,
            });
        }
        PseudoImplementation::Builtin(builtin) => *builtin,
    };

    match builtin {
        // argument, if any, is ignored
        BuiltinPseudo::First => Ok(PseudoKind::First),
        BuiltinPseudo::Last => Ok(PseudoKind::Last),
        BuiltinPseudo::Even => Ok(PseudoKind::Even),
        BuiltinPseudo::Odd => Ok(PseudoKind::Odd),
        BuiltinPseudo::FirstChild => Ok(PseudoKind::FirstChild),

        BuiltinPseudo::Eq => Ok(PseudoKind::Eq(numeric_argument(&argument, position)?)),
        BuiltinPseudo::Lt => Ok(PseudoKind::Lt(numeric_argument(&argument, position)?)),
        BuiltinPseudo::Gt => Ok(PseudoKind::Gt(numeric_argument(&argument, position)?)),
        BuiltinPseudo::NthChild => {
            Ok(PseudoKind::NthChild(numeric_argument(&argument, position)?))
        }

        BuiltinPseudo::Not | BuiltinPseudo::Has | BuiltinPseudo::Hasnt => match argument {
            PseudoArgument::Selectors(list) => Ok(match builtin {
                BuiltinPseudo::Not => PseudoKind::Not(list),
                BuiltinPseudo::Has => PseudoKind::Has(list),
                _ => PseudoKind::Hasnt(list),
            }),
            // registered with the wrong grammar, or written without
            // parentheses
            _ => Err(SelectorError::Syntax {
                rule: "pseudo-filter selector argument",
                position,
            }),
        },
    }
}

/// The numeric builtins take a required integer argument; a missing or
/// non-numeric one is a syntax error rather than a silent zero.
fn numeric_argument(argument: &PseudoArgument, position: usize) -> Result<i64, SelectorError> {
    match argument {
        PseudoArgument::Value(value) => value.parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(SelectorError::Syntax {
        rule: "numeric pseudo-filter argument",
        position,
    })
}
