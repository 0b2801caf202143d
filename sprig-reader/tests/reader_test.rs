// sprig-reader - Reader integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for reading source text into forms: escapes, dispatch
//! macros, error positions and whole-stream reading.

mod common;

use std::error::Error as _;

use common::*;

// =============================================================================
// Escapes
// =============================================================================

#[test]
fn test_string_unicode_escape() {
    assert_eq!(read_one(r#""\u0041""#), Value::string("A"));
    assert_eq!(read_one(r#""x\u00e9y""#), Value::string("x\u{e9}y"));
    // only four digits belong to the escape
    assert_eq!(read_one(r#""\u00411""#), Value::string("A1"));
}

#[test]
fn test_string_keeps_raw_newlines() {
    assert_eq!(read_one("\"line one\nline two\""), Value::string("line one\nline two"));
}

#[test]
fn test_char_literals() {
    assert_eq!(read_one("\\a"), Value::Char('a'));
    assert_eq!(read_one("\\u0041"), Value::Char('A'));
    assert_eq!(read_one("\\o101"), Value::Char('A'));
    assert_eq!(read_one("\\newline"), Value::Char('\n'));
    assert_eq!(read_one("\\space"), Value::Char(' '));
    assert_eq!(read_one("\\tab"), Value::Char('\t'));
    assert_eq!(read_one("\\return"), Value::Char('\r'));
    assert_eq!(read_one("\\backspace"), Value::Char('\x08'));
    assert_eq!(read_one("\\formfeed"), Value::Char('\x0C'));
}

#[test]
fn test_single_char_wins_over_names() {
    assert_eq!(read_one("\\u"), Value::Char('u'));
    assert_eq!(read_one("\\o"), Value::Char('o'));
    assert_eq!(read_one("\\("), Value::Char('('));
    assert_eq!(read_one("\\;"), Value::Char(';'));
}

#[test]
fn test_char_ends_at_delimiter() {
    assert_eq!(
        read_one("(\\a\\b)"),
        Value::list(vec![Value::Char('a'), Value::Char('b')])
    );
    assert_eq!(read_one("[\\x]"), Value::vector(vec![Value::Char('x')]));
}

#[test]
fn test_bad_char_constants() {
    assert_eq!(read_err_message("\\foo"), "invalid char constant \\foo");
    assert_eq!(read_err_message("\\o400"), "invalid char constant \\o400");
    assert_eq!(read_err_message("\\uD800"), "invalid char constant \\uD800");
    assert_eq!(read_err_message("\\u12345"), "invalid char constant \\u12345");
}

// =============================================================================
// Tokens
// =============================================================================

#[test]
fn test_qualified_symbols_and_keywords() {
    let Value::Symbol(sym) = read_one("my.app/run") else {
        panic!("expected a symbol");
    };
    assert_eq!(sym.namespace(), Some("my.app"));
    assert_eq!(sym.name(), "run");

    let Value::Keyword(kw) = read_one(":my.app/mode") else {
        panic!("expected a keyword");
    };
    assert_eq!(kw.namespace(), Some("my.app"));
    assert_eq!(kw.name(), "mode");
}

#[test]
fn test_auto_resolved_keyword_uses_reader_namespace() {
    let mut reader = Reader::new("::k").with_namespace("app.core");
    assert_eq!(
        reader.read().unwrap(),
        Some(Value::Keyword(Keyword::with_namespace("app.core", "k")))
    );
}

#[test]
fn test_signed_numbers_and_symbols() {
    assert_eq!(read_one("-0"), Value::Int(0));
    assert_eq!(read_one("+42"), Value::Int(42));
    assert_eq!(read_one("-"), Value::symbol("-"));
    assert_eq!(read_one("+a"), Value::symbol("+a"));
    assert_eq!(read_one("9223372036854775807"), Value::Int(i64::MAX));
    assert_eq!(read_one("-9223372036854775808"), Value::Int(i64::MIN));
}

#[test]
fn test_number_overflow_has_cause() {
    let err = read_err("9223372036854775808");
    assert_eq!(err.message, "invalid number: 9223372036854775808");
    assert!(err.source().is_some());
}

#[test]
fn test_commas_are_whitespace() {
    assert_eq!(
        read_one("[1,2,,3]"),
        Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn test_map_rejects_duplicate_keys() {
    let err = read_err("{:a 1\n :b 2\n :a 3}");
    assert_eq!(err.message, "duplicate key: :a");
    assert_eq!(err.line, 3);
    // key forms are compared as read, before any evaluation
    assert_eq!(read_err_message("{(f) 1 (f) 2}"), "duplicate key: (f)");
    assert_eq!(read_err_message("[{1 :x 1 :y}]"), "duplicate key: 1");
}

#[test]
fn test_map_distinct_keys() {
    assert_eq!(
        read_one("{(f) 1 (g) 2 [f] 3}"),
        Value::map(vec![
            (read_one("(f)"), Value::Int(1)),
            (read_one("(g)"), Value::Int(2)),
            (read_one("[f]"), Value::Int(3)),
        ])
    );
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_quote_skips_comments() {
    assert_eq!(
        read_one("' ; the symbol\n x"),
        Value::list(vec![Value::symbol("quote"), Value::symbol("x")])
    );
}

#[test]
fn test_nested_quotes() {
    assert_eq!(read_one("''a"), read_one("(quote (quote a))"));
}

#[test]
fn test_var_quote_of_qualified_symbol() {
    assert_eq!(
        read_one("#'core/list"),
        Value::list(vec![Value::symbol("var"), Value::symbol("core/list")])
    );
}

#[test]
fn test_discard_nests() {
    assert_eq!(read_all("#_ #_ 1 2 3").unwrap(), vec![Value::Int(3)]);
    assert_eq!(read_all("(a #_(b c) d)").unwrap(), vec![read_one("(a d)")]);
}

#[test]
fn test_quote_at_end_of_input() {
    assert_eq!(read_err_message("'"), "unexpected end of input while reading quoted form");
    assert_eq!(read_err_message("#'"), "unexpected end of input while reading quoted var");
    assert_eq!(read_err_message("#"), "unexpected end of input while reading hash macro");
}

// =============================================================================
// Positions
// =============================================================================

#[test]
fn test_error_reports_input_name_and_line() {
    let err = read_err("(ok)\n\n  }");
    assert_eq!(err.input_name, "test.sp");
    assert_eq!(err.line, 3);
    assert_eq!(err.column, 3);
    assert_eq!(err.to_string(), "test.sp:3:3: unmatched delimiter }");
}

#[test]
fn test_default_input_name() {
    let err = Reader::new("(").read().unwrap_err();
    assert_eq!(err.input_name, "<input>");
}

#[test]
fn test_position_tracking() {
    let mut reader = Reader::new("ab\ncd");
    reader.read().unwrap();
    assert_eq!((reader.line(), reader.column()), (1, 2));
    reader.read().unwrap();
    assert_eq!((reader.line(), reader.column()), (2, 2));
}

// =============================================================================
// Streams
// =============================================================================

#[test]
fn test_read_all_program() {
    let forms = read_all(
        "; a small program\n\
         (def x 1)\n\
         #_(def y 2)\n\
         (+ x 1) ; trailing\n",
    )
    .unwrap();
    assert_eq!(forms, vec![read_one("(def x 1)"), read_one("(+ x 1)")]);
}

#[test]
fn test_read_all_reports_first_error() {
    let err = read_all("1 2 (3").unwrap_err();
    assert_eq!(err.message, "unexpected end of input while reading list");
}

#[test]
fn test_comment_is_void_to_direct_reads() {
    let mut reader = Reader::new(";; only\n");
    assert_eq!(reader.read().unwrap(), Some(Value::Void));
    assert_eq!(reader.read().unwrap(), None);
}
