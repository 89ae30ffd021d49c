//! Errors surfaced by selector parsing.
//!
//! All grammar-level failures are fatal for the current query call:
//! they abort parsing immediately and surface to the caller, with no
//! partial or best-effort result. Evaluation itself cannot fail; once a
//! selector list has parsed, matching is a pure function over the tree.

use thiserror::Error;

/// A fatal error raised while parsing a selector list.
///
/// Each variant carries the character offset into the selector text at which
/// the problem was detected, so callers can point at the offending spot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A grammar prefix token was consumed (`.`, `#`, `[`, `:`, `(`, a
    /// combinator) but the required continuation is absent or
    /// malformed. `rule` names the production that failed.
    #[error("syntax error at offset {position}: invalid {rule}")]
    Syntax {
        /// The grammar production that could not be completed.
        rule: &'static str,
        /// Character offset into the selector text.
        position: usize,
    },

    /// A pseudo-filter name that is not present in the registry.
    ///
    /// This is a specialization of the syntax error: the `:` prefix
    /// parsed and the identifier is well-formed, but nothing is
    /// registered under that name.
    #[error("unknown pseudo-filter `{name}` at offset {position}")]
    UnknownPseudoFilter {
        /// The unrecognized name as written.
        name: String,
        /// Character offset of the name in the selector text.
        position: usize,
    },

    /// Sub-selector nesting (`:not(:not(...))` and friends) exceeded
    /// the engine's depth limit. Bounding the depth keeps pathological
    /// selectors from growing the call stack without limit.
    #[error("selector nesting deeper than {limit} levels at offset {position}")]
    NestingTooDeep {
        /// Character offset at which the limit was crossed.
        position: usize,
        /// The configured maximum nesting depth.
        limit: usize,
    },
}

impl SelectorError {
    /// The character offset into the selector text at which the error was
    /// detected.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            SelectorError::Syntax { position, .. }
            | SelectorError::UnknownPseudoFilter { position, .. }
            | SelectorError::NestingTooDeep { position, .. } => *position,
        }
    }
}
