use crate::ast::{Literal, TokenTree};
use crate::lexer::{tokenize_with, LexError, OperatorTable, Token, TokenKind};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("unexpected token at {pos}: expected {expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        pos: usize,
    },
    #[error("invalid number literal at {pos}: {literal}")]
    InvalidNumber { literal: String, pos: usize },
    #[error("expression nested too deeply at {pos}")]
    TooDeep { pos: usize },
}

/// Deepest tree the parser will build; later passes recurse to the same depth.
pub const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, Default)]
pub struct Parser {
    operators: OperatorTable,
}

pub fn parse_expression(input: &str) -> Result<TokenTree, ParseError> {
    Parser::new().parse(input)
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary_op(&mut self, symbol: &str, precedence: u8) -> &mut Self {
        self.operators.add_binary_op(symbol, precedence);
        self
    }

    pub fn add_unary_op(&mut self, symbol: &str) -> &mut Self {
        self.operators.add_unary_op(symbol);
        self
    }

    pub fn parse(&self, input: &str) -> Result<TokenTree, ParseError> {
        let tokens = tokenize_with(input, &self.operators)?;
        let mut cursor = TokenCursor {
            tokens,
            index: 0,
            depth: 0,
            operators: &self.operators,
        };
        cursor.parse_compound()
    }
}

struct TokenCursor<'a> {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
    operators: &'a OperatorTable,
}

impl TokenCursor<'_> {
    fn parse_compound(&mut self) -> Result<TokenTree, ParseError> {
        let mut nodes = Vec::new();
        loop {
            if self.match_kind(TokenKind::Comma) || self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            if self.check(TokenKind::Eof) {
                break;
            }
            nodes.push(self.parse_conditional()?);
        }

        if nodes.len() == 1 {
            if let Some(node) = nodes.pop() {
                return Ok(node);
            }
        }
        Ok(TokenTree::Compound(nodes))
    }

    fn parse_conditional(&mut self) -> Result<TokenTree, ParseError> {
        self.descend()?;
        let test = self.parse_binary(0)?;
        if !self.match_kind(TokenKind::Question) {
            self.depth -= 1;
            return Ok(test);
        }
        let consequent = self.parse_conditional()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_conditional()?;
        self.depth -= 1;
        Ok(TokenTree::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<TokenTree, ParseError> {
        let mut node = self.parse_unary()?;
        let mut nested = 0;
        loop {
            let Some(precedence) = self.peek_binary_precedence() else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.descend()?;
            nested += 1;
            let operator = self.advance().lexeme;
            let right = self.parse_binary(precedence + 1)?;
            node = make_binary(operator, node, right);
        }
        self.depth -= nested;
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<TokenTree, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Operator && self.operators.is_unary(token.lexeme.as_str()) {
            self.descend()?;
            let operator = self.advance().lexeme;
            let argument = self.parse_unary()?;
            self.depth -= 1;
            return Ok(TokenTree::Unary {
                operator,
                argument: Box::new(argument),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<TokenTree, ParseError> {
        let mut node = self.parse_primary()?;
        let mut nested = 0;

        loop {
            if matches!(
                self.peek().kind,
                TokenKind::Dot | TokenKind::LBracket | TokenKind::LParen
            ) {
                self.descend()?;
                nested += 1;
            }
            if self.match_kind(TokenKind::Dot) {
                let token = self.expect(TokenKind::Identifier)?;
                node = TokenTree::Member {
                    object: Box::new(node),
                    property: Box::new(TokenTree::Identifier(token.lexeme)),
                    computed: false,
                };
                continue;
            }

            if self.match_kind(TokenKind::LBracket) {
                let property = self.parse_conditional()?;
                self.expect(TokenKind::RBracket)?;
                node = TokenTree::Member {
                    object: Box::new(node),
                    property: Box::new(property),
                    computed: true,
                };
                continue;
            }

            if self.match_kind(TokenKind::LParen) {
                let arguments = self.parse_list(TokenKind::RParen)?;
                node = TokenTree::Call {
                    callee: Box::new(node),
                    arguments,
                };
                continue;
            }

            break;
        }

        self.depth -= nested;
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<TokenTree, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Identifier => Ok(TokenTree::Identifier(token.lexeme)),
            TokenKind::Number => {
                let value = token.lexeme.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    literal: token.lexeme.clone(),
                    pos: token.pos,
                })?;
                Ok(TokenTree::Literal(Literal::Number(value)))
            }
            TokenKind::String => Ok(TokenTree::Literal(Literal::String(token.lexeme))),
            TokenKind::True => Ok(TokenTree::Literal(Literal::Bool(true))),
            TokenKind::False => Ok(TokenTree::Literal(Literal::Bool(false))),
            TokenKind::Null => Ok(TokenTree::Literal(Literal::Null)),
            TokenKind::LParen => {
                let expr = self.parse_conditional()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => Ok(TokenTree::Array(self.parse_list(TokenKind::RBracket)?)),
            _ => Err(ParseError::UnexpectedToken {
                expected: "primary expression".to_string(),
                found: describe(&token),
                pos: token.pos,
            }),
        }
    }

    fn parse_list(&mut self, close: TokenKind) -> Result<Vec<TokenTree>, ParseError> {
        let mut items = Vec::new();
        if !self.check(close.clone()) {
            loop {
                items.push(self.parse_conditional()?);
                if self.match_kind(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                pos: self.peek().pos,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn peek_binary_precedence(&self) -> Option<u8> {
        let token = self.peek();
        if token.kind != TokenKind::Operator {
            return None;
        }
        self.operators.binary_precedence(token.lexeme.as_str())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("{:?}", kind),
                found: describe(&token),
                pos: token.pos,
            })
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        token
    }
}

fn make_binary(operator: String, left: TokenTree, right: TokenTree) -> TokenTree {
    let left = Box::new(left);
    let right = Box::new(right);
    if operator == "&&" || operator == "||" {
        TokenTree::Logical {
            operator,
            left,
            right,
        }
    } else {
        TokenTree::Binary {
            operator,
            left,
            right,
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("`{}`", token.lexeme),
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
