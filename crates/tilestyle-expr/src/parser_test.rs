use super::{parse_expression, ParseError, Parser};
use crate::ast::{Literal, TokenTree};

#[test]
fn parses_operator_precedence() {
    let tree = parse_expression("1 + 2 * 3").expect("parse");
    let TokenTree::Binary { operator, left, right } = tree else {
        panic!("expected binary");
    };
    assert_eq!(operator, "+");
    assert_eq!(*left, TokenTree::Literal(Literal::Number(1.0)));
    let TokenTree::Binary { operator, .. } = *right else {
        panic!("expected nested binary");
    };
    assert_eq!(operator, "*");
}

#[test]
fn binary_operators_are_left_associative() {
    let tree = parse_expression("8 - 4 - 2").expect("parse");
    let TokenTree::Binary { left, right, .. } = tree else {
        panic!("expected binary");
    };
    assert!(matches!(*left, TokenTree::Binary { .. }));
    assert_eq!(*right, TokenTree::Literal(Literal::Number(2.0)));
}

#[test]
fn logical_operators_produce_logical_nodes() {
    let tree = parse_expression("a && b || c").expect("parse");
    let TokenTree::Logical { operator, left, .. } = tree else {
        panic!("expected logical");
    };
    assert_eq!(operator, "||");
    assert!(matches!(*left, TokenTree::Logical { ref operator, .. } if operator == "&&"));
}

#[test]
fn parses_member_call_and_index() {
    let tree = parse_expression("foo.bar(1, 2)[0]").expect("parse");
    let TokenTree::Member { object, computed, .. } = tree else {
        panic!("expected member");
    };
    assert!(computed);
    let TokenTree::Call { callee, arguments } = *object else {
        panic!("expected call");
    };
    assert_eq!(arguments.len(), 2);
    let TokenTree::Member { property, computed, .. } = *callee else {
        panic!("expected member");
    };
    assert!(!computed);
    assert_eq!(*property, TokenTree::Identifier("bar".to_string()));
}

#[test]
fn parses_conditional_expression() {
    let tree = parse_expression("a > 1 ? b : c").expect("parse");
    let TokenTree::Conditional { test, .. } = tree else {
        panic!("expected conditional");
    };
    assert_eq!(test.type_name(), "BinaryExpression");
}

#[test]
fn unary_binds_tighter_than_member_free_binary() {
    let tree = parse_expression("-a.b * 2").expect("parse");
    let TokenTree::Binary { left, .. } = tree else {
        panic!("expected binary");
    };
    let TokenTree::Unary { operator, argument } = *left else {
        panic!("expected unary");
    };
    assert_eq!(operator, "-");
    assert_eq!(argument.type_name(), "MemberExpression");
}

#[test]
fn multiple_or_empty_expressions_are_compound() {
    assert!(matches!(parse_expression("1, 2").expect("parse"), TokenTree::Compound(items) if items.len() == 2));
    assert!(matches!(parse_expression("1; 2").expect("parse"), TokenTree::Compound(items) if items.len() == 2));
    assert!(matches!(parse_expression("").expect("parse"), TokenTree::Compound(items) if items.is_empty()));
}

#[test]
fn parses_array_literal() {
    let tree = parse_expression("[1, 'a', true, null]").expect("parse");
    let TokenTree::Array(items) = tree else {
        panic!("expected array");
    };
    assert_eq!(items[3], TokenTree::Literal(Literal::Null));
}

#[test]
fn custom_binary_operator_uses_registered_precedence() {
    let mut parser = Parser::new();
    parser.add_binary_op("=~", 6).add_binary_op("!~", 6);
    let tree = parser.parse("a =~ b && c !~ d").expect("parse");
    let TokenTree::Logical { left, right, .. } = tree else {
        panic!("expected logical");
    };
    assert!(matches!(*left, TokenTree::Binary { ref operator, .. } if operator == "=~"));
    assert!(matches!(*right, TokenTree::Binary { ref operator, .. } if operator == "!~"));
}

#[test]
fn reports_unbalanced_parenthesis() {
    let err = parse_expression("(1 + 2").expect_err("must fail");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn nesting_is_bounded() {
    let shallow = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(
        parse_expression(&shallow).expect("parse"),
        TokenTree::Literal(Literal::Number(1.0))
    );

    let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(
        parse_expression(&deep),
        Err(ParseError::TooDeep { .. })
    ));

    let negations = format!("{}1", "-".repeat(10_000));
    assert!(matches!(
        parse_expression(&negations),
        Err(ParseError::TooDeep { .. })
    ));

    let sum = vec!["1"; 10_000].join(" + ");
    assert!(matches!(parse_expression(&sum), Err(ParseError::TooDeep { .. })));

    let members = format!("a{}", ".b".repeat(10_000));
    assert!(matches!(
        parse_expression(&members),
        Err(ParseError::TooDeep { .. })
    ));
}

#[test]
fn number_with_trailing_dot_parses() {
    assert_eq!(
        parse_expression("1.").expect("parse"),
        TokenTree::Literal(Literal::Number(1.0))
    );
}
