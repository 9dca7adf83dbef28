use super::{Lexer, TokenKind};
use crate::value::ErrorKind;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .expect("lex")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("let foo = null"),
        vec![
            TokenKind::Let,
            TokenKind::Ident("foo".to_string()),
            TokenKind::Assign,
            TokenKind::Null,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_with_fraction_exponent_and_separators() {
    assert_eq!(
        kinds("25 2.5 1e3 1.5e-2 25_000"),
        vec![
            TokenKind::Number(25.0),
            TokenKind::Number(2.5),
            TokenKind::Number(1000.0),
            TokenKind::Number(0.015),
            TokenKind::Number(25000.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn member_access_after_number_is_not_a_fraction() {
    // `25.foo` is member access on a numeric literal
    assert_eq!(
        kinds("25.foo"),
        vec![
            TokenKind::Number(25.0),
            TokenKind::Dot,
            TokenKind::Ident("foo".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        kinds("\"a\\nb\\\"c\""),
        vec![TokenKind::Str("a\nb\"c".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unterminated_string_is_a_parse_error() {
    let err = Lexer::new("\"abc").tokenize().unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::ParseGeneric));
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // comment\n/* block\ncomment */ 2"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
}

#[test]
fn two_char_operators() {
    assert_eq!(
        kinds("** <= >= == != && ||"),
        vec![
            TokenKind::StarStar,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn locations_track_lines_and_columns() {
    let tokens = Lexer::new("let a\nlet b").tokenize().expect("lex");
    assert_eq!(tokens[0].location.line, 1);
    assert_eq!(tokens[0].location.column, 1);
    assert_eq!(tokens[1].location.column, 5);
    assert_eq!(tokens[2].location.line, 2);
    assert_eq!(tokens[3].location.line, 2);
    assert_eq!(tokens[3].location.column, 5);
}

#[test]
fn unexpected_character_reports_location() {
    let err = Lexer::new("let @").tokenize().unwrap_err();
    assert_eq!(err.kind, Some(ErrorKind::ParseGeneric));
    assert_eq!(err.location.map(|l| l.column), Some(5));
}
