//! Backtracking string cursor the selector grammar is driven over.
//!
//! The scanner owns `{ source, position }` for the duration of one
//! query call and exposes "try a rule" primitives: every `try_*` method
//! advances the position only when it matches, and [`Scanner::attempt`]
//! snapshots the position, runs a closure, and restores the position if
//! the closure comes back empty. That save/restore discipline is how
//! the grammar distinguishes "rule absent" (roll back, try the next
//! alternative) from "rule present but malformed" (the parser raises a
//! hard error instead of backtracking).

/// Position-tracked cursor over the selector text.
///
/// Positions are character offsets into the source, suitable for error
/// reporting. A scanner is created fresh per query call and never
/// shared.
#[derive(Debug)]
pub struct Scanner {
    /// The input being scanned.
    input: Vec<char>,
    /// Current position in the input.
    position: usize,
}

impl Scanner {
    /// Create a new scanner over `source`, positioned at the start.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            position: 0,
        }
    }

    /// The current character offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Restore a position previously obtained from [`Scanner::position`].
    ///
    /// This is the rollback half of the backtracking discipline; prefer
    /// [`Scanner::attempt`] where the rule fits in a closure.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Whether the cursor has consumed the entire input.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Peek at the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Skip over any whitespace at the cursor.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Match an exact token, advancing past it on success only.
    pub fn try_literal(&mut self, token: &str) -> bool {
        let end = self.position + token.chars().count();
        if end > self.input.len() {
            return false;
        }
        if self.input[self.position..end].iter().copied().eq(token.chars()) {
            self.position = end;
            return true;
        }
        false
    }

    /// Match the first of `tokens` that applies, returning its index.
    ///
    /// Tokens are tried in the order given; where one token is a prefix
    /// of another, the caller lists the longer one first.
    pub fn try_one_of(&mut self, tokens: &[&str]) -> Option<usize> {
        tokens
            .iter()
            .position(|token| !token.is_empty() && self.try_literal(token))
    }

    /// Match an identifier: `("_"|alnum) {"_"|"-"|alnum}`.
    ///
    /// Identifiers may begin with a digit (`0015blah` is valid), which
    /// is wider than CSS proper but matches the grammar this engine
    /// implements.
    pub fn try_identifier(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_identifier_start) {
            return None;
        }
        let mut ident = String::new();
        while self.peek().is_some_and(is_identifier_char) {
            // consume() cannot fail here, peek just matched
            if let Some(c) = self.consume() {
                ident.push(c);
            }
        }
        Some(ident)
    }

    /// Match an integer with an optional leading sign.
    pub fn try_number(&mut self) -> Option<String> {
        self.attempt(|scanner| {
            let mut number = String::new();
            if scanner.peek() == Some('-') || scanner.peek() == Some('+') {
                if let Some(sign) = scanner.consume() {
                    number.push(sign);
                }
            }
            let digits_start = number.len();
            while scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
                if let Some(d) = scanner.consume() {
                    number.push(d);
                }
            }
            if number.len() == digits_start {
                return None;
            }
            Some(number)
        })
    }

    /// Match a single- or double-quoted string with backslash escapes,
    /// returning its unescaped contents.
    ///
    /// Returns `None` both when the cursor is not at a quote (no input
    /// consumed) and when the string is unterminated (position rolled
    /// back); callers that have already seen the opening quote via
    /// [`Scanner::peek`] treat the latter as a syntax error.
    pub fn try_quoted_string(&mut self) -> Option<String> {
        self.attempt(|scanner| {
            let quote = match scanner.peek() {
                Some(q @ ('"' | '\'')) => q,
                _ => return None,
            };
            let _ = scanner.consume();
            let mut value = String::new();
            while let Some(c) = scanner.consume() {
                match c {
                    c if c == quote => return Some(value),
                    '\\' => value.push(scanner.consume()?),
                    c => value.push(c),
                }
            }
            // ran off the end without a closing quote
            None
        })
    }

    /// Snapshot the position, run `rule`, and restore the position if
    /// it returns `None`.
    pub fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let snapshot = self.position;
        let result = rule(self);
        if result.is_none() {
            self.position = snapshot;
        }
        result
    }
}

/// Whether `c` can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Whether `c` can continue an identifier.
fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c == '-'
}
