//! Tests for the backtracking scanner primitives.

use thicket_select::scanner::Scanner;

// ========== literals ==========

#[test]
fn test_try_literal_advances_on_match() {
    let mut scanner = Scanner::new("div.x");
    assert!(scanner.try_literal("div"));
    assert_eq!(scanner.position(), 3);
    assert!(scanner.try_literal("."));
    assert!(!scanner.at_end());
}

#[test]
fn test_try_literal_no_advance_on_mismatch() {
    let mut scanner = Scanner::new("div");
    assert!(!scanner.try_literal("span"));
    assert_eq!(scanner.position(), 0);
    // a failed match longer than the remaining input is also a no-op
    assert!(!scanner.try_literal("division"));
    assert_eq!(scanner.position(), 0);
}

#[test]
fn test_try_one_of_first_match_wins() {
    let mut scanner = Scanner::new("~=rest");
    // longest-first ordering is the caller's duty
    assert_eq!(scanner.try_one_of(&["~=", "=", "~"]), Some(0));
    assert_eq!(scanner.position(), 2);
}

#[test]
fn test_try_one_of_skips_empty_tokens() {
    let mut scanner = Scanner::new("x");
    assert_eq!(scanner.try_one_of(&["", ">"]), None);
    assert_eq!(scanner.position(), 0);
}

// ========== identifiers and numbers ==========

#[test]
fn test_identifier_shapes() {
    let mut scanner = Scanner::new("nth-child");
    assert_eq!(scanner.try_identifier().as_deref(), Some("nth-child"));
    assert!(scanner.at_end());

    // digits may lead an identifier in this grammar
    let mut scanner = Scanner::new("0015blah rest");
    assert_eq!(scanner.try_identifier().as_deref(), Some("0015blah"));

    let mut scanner = Scanner::new("_x-1");
    assert_eq!(scanner.try_identifier().as_deref(), Some("_x-1"));

    let mut scanner = Scanner::new(".class");
    assert_eq!(scanner.try_identifier(), None);
    assert_eq!(scanner.position(), 0);
}

#[test]
fn test_number_with_sign() {
    let mut scanner = Scanner::new("-12]");
    assert_eq!(scanner.try_number().as_deref(), Some("-12"));
    assert_eq!(scanner.position(), 3);

    // a bare sign is not a number, and the sign is not consumed
    let mut scanner = Scanner::new("-x");
    assert_eq!(scanner.try_number(), None);
    assert_eq!(scanner.position(), 0);
}

// ========== quoted strings ==========

#[test]
fn test_quoted_string_both_quote_kinds() {
    let mut scanner = Scanner::new("'hello' tail");
    assert_eq!(scanner.try_quoted_string().as_deref(), Some("hello"));
    assert_eq!(scanner.position(), 7);

    let mut scanner = Scanner::new("\"hi\"");
    assert_eq!(scanner.try_quoted_string().as_deref(), Some("hi"));
    assert!(scanner.at_end());
}

#[test]
fn test_quoted_string_escapes() {
    let mut scanner = Scanner::new(r"'hello\'man'");
    assert_eq!(scanner.try_quoted_string().as_deref(), Some("hello'man"));
    assert!(scanner.at_end());

    let mut scanner = Scanner::new(r#""a\\b""#);
    assert_eq!(scanner.try_quoted_string().as_deref(), Some("a\\b"));
}

#[test]
fn test_quoted_string_unterminated_rolls_back() {
    let mut scanner = Scanner::new("'oops");
    assert_eq!(scanner.try_quoted_string(), None);
    assert_eq!(scanner.position(), 0);
}

#[test]
fn test_quoted_string_not_at_quote() {
    let mut scanner = Scanner::new("plain");
    assert_eq!(scanner.try_quoted_string(), None);
    assert_eq!(scanner.position(), 0);
}

// ========== backtracking ==========

#[test]
fn test_attempt_restores_position_on_failure() {
    let mut scanner = Scanner::new("a > b");
    let result: Option<()> = scanner.attempt(|s| {
        assert!(s.try_literal("a"));
        s.skip_whitespace();
        if s.try_literal("+") { Some(()) } else { None }
    });
    assert_eq!(result, None);
    assert_eq!(scanner.position(), 0);
}

#[test]
fn test_attempt_keeps_position_on_success() {
    let mut scanner = Scanner::new("a > b");
    let result = scanner.attempt(|s| {
        s.skip_whitespace();
        s.try_identifier()
    });
    assert_eq!(result.as_deref(), Some("a"));
    assert_eq!(scanner.position(), 1);
}

#[test]
fn test_skip_whitespace_and_at_end() {
    let mut scanner = Scanner::new("  \t\n");
    assert!(!scanner.at_end());
    scanner.skip_whitespace();
    assert!(scanner.at_end());
}
