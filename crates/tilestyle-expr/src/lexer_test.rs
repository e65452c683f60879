use super::{tokenize, tokenize_with, LexError, OperatorTable, TokenKind};

#[test]
fn tokenizes_composite_expression() {
    let tokens = tokenize("czm_a.b[0] >= 10 && isClass('x')").expect("tokenize");
    let kinds = tokens.into_iter().map(|token| token.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LBracket,
            TokenKind::Number,
            TokenKind::RBracket,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::String,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn prefers_longest_operator() {
    let tokens = tokenize("a !== b").expect("tokenize");
    assert_eq!(tokens[1].lexeme, "!==");
    let tokens = tokenize("a >>> b").expect("tokenize");
    assert_eq!(tokens[1].lexeme, ">>>");
}

#[test]
fn registered_binary_ops_become_tokens() {
    assert!(tokenize("a =~ b").is_err());

    let mut operators = OperatorTable::default();
    operators.add_binary_op("=~", 6);
    operators.add_binary_op("!~", 6);
    let tokens = tokenize_with("a =~ b !~ c", &operators).expect("tokenize");
    let lexemes = tokens.iter().map(|token| token.lexeme.as_str()).collect::<Vec<_>>();
    assert_eq!(lexemes, vec!["a", "=~", "b", "!~", "c", ""]);
    assert_eq!(operators.binary_precedence("=~"), Some(6));
}

#[test]
fn lexes_number_forms() {
    let tokens = tokenize("1 2.5 .5 1e3 2.5E-3").expect("tokenize");
    let lexemes = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Number)
        .map(|token| token.lexeme.as_str())
        .collect::<Vec<_>>();
    assert_eq!(lexemes, vec!["1", "2.5", ".5", "1e3", "2.5E-3"]);
}

#[test]
fn trailing_dot_belongs_to_the_number() {
    let tokens = tokenize("1. + 2").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "1.");
    assert_eq!(tokens[1].lexeme, "+");

    assert!(tokenize("1.x").is_err());
}

#[test]
fn rejects_identifier_glued_to_number() {
    let err = tokenize("3abc").expect_err("must fail");
    assert!(matches!(err, LexError::InvalidNumber { pos: 0, .. }));
}

#[test]
fn decodes_string_escapes_and_keeps_unknown_ones() {
    let tokens = tokenize(r#"'a\tb' "q\"x" 'd\d'"#).expect("tokenize");
    assert_eq!(tokens[0].lexeme, "a\tb");
    assert_eq!(tokens[1].lexeme, "q\"x");
    assert_eq!(tokens[2].lexeme, "dd");
}

#[test]
fn reports_unterminated_string() {
    let err = tokenize("'abc").expect_err("must fail");
    assert_eq!(err, LexError::UnterminatedString { pos: 0 });
}
