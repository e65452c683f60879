use crate::ast::{Literal, TokenTree};
use crate::node::{
    BinaryMath, BinaryOp, ColorFn, GlobalVar, MemberAccess, MemberObject, Node, RegexMethod,
    TernaryFn, UnaryMath, UnaryOp, VectorArity,
};
use crate::parser::{ParseError, Parser};
use crate::preprocess::{
    is_variable, property_name, remove_backslashes, replace_variables, restore_backslashes,
    PreprocessError,
};
use crate::style_regex::{RegexError, StyleRegex};
use crate::value::format_number;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorClass {
    Syntax,
    Unsupported,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CompileError {
    #[error("syntax error: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error("syntax error: {0}")]
    InvalidRegex(#[from] RegexError),
    #[error("{0} is not defined")]
    UndefinedIdentifier(String),
    #[error("unexpected function call \"{0}\"")]
    UnexpectedFunctionCall(String),
    #[error("unexpected operator \"{0}\"")]
    UnexpectedOperator(String),
    #[error("{function} requires {expected}, got {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },
    #[error("invalid {function} constructor: too many arguments ({found})")]
    TooManyVectorArguments { function: String, found: usize },
    #[error("{0} is not a function")]
    NotAFunction(String),
    #[error("expected a single expression, found {0}")]
    Compound(usize),
}

impl CompileError {
    pub fn class(&self) -> CompileErrorClass {
        match self {
            CompileError::Preprocess(_) | CompileError::Parse(_) | CompileError::InvalidRegex(_) => {
                CompileErrorClass::Syntax
            }
            _ => CompileErrorClass::Unsupported,
        }
    }
}

const FEATURE_IDENTIFIER: &str = "feature";
const REGEX_MATCH_PRECEDENCE: u8 = 6;

pub fn style_parser() -> Parser {
    let mut parser = Parser::new();
    parser
        .add_binary_op("=~", REGEX_MATCH_PRECEDENCE)
        .add_binary_op("!~", REGEX_MATCH_PRECEDENCE);
    parser
}

pub fn compile_tree(source: &str) -> CompileResult<Node> {
    let preprocessed = replace_variables(&remove_backslashes(source))?;
    let tree = style_parser().parse(&preprocessed)?;
    build(&tree)
}

pub fn build(tree: &TokenTree) -> CompileResult<Node> {
    match tree {
        TokenTree::Literal(literal) => Ok(build_literal(literal)),
        TokenTree::Identifier(name) => build_identifier(name),
        TokenTree::Unary { operator, argument } => {
            let op = UnaryOp::from_operator(operator)
                .ok_or_else(|| CompileError::UnexpectedOperator(operator.clone()))?;
            Ok(Node::Unary {
                op,
                operand: Box::new(build(argument)?),
            })
        }
        TokenTree::Binary {
            operator,
            left,
            right,
        } => build_binary(operator, left, right),
        TokenTree::Logical {
            operator,
            left,
            right,
        } => match operator.as_str() {
            "&&" | "||" => build_binary(operator, left, right),
            _ => Err(CompileError::UnexpectedOperator(operator.clone())),
        },
        TokenTree::Conditional {
            test,
            consequent,
            alternate,
        } => Ok(Node::Conditional {
            test: Box::new(build(test)?),
            left: Box::new(build(consequent)?),
            right: Box::new(build(alternate)?),
        }),
        TokenTree::Member {
            object,
            property,
            computed,
        } => build_member(object, property, *computed),
        TokenTree::Array(elements) => Ok(Node::Array(build_all(elements)?)),
        TokenTree::Call { callee, arguments } => build_call(callee, arguments),
        TokenTree::Compound(items) => Err(CompileError::Compound(items.len())),
    }
}

fn build_all(trees: &[TokenTree]) -> CompileResult<Vec<Node>> {
    trees.iter().map(build).collect()
}

fn build_literal(literal: &Literal) -> Node {
    match literal {
        Literal::Null => Node::LiteralNull,
        Literal::Bool(value) => Node::LiteralBoolean(*value),
        Literal::Number(value) => Node::LiteralNumber(*value),
        Literal::String(text) if text.contains("${") => {
            Node::VariableInString(restore_backslashes(text))
        }
        Literal::String(text) => Node::LiteralString(restore_backslashes(text)),
    }
}

fn build_identifier(name: &str) -> CompileResult<Node> {
    if is_variable(name) {
        return Ok(Node::Variable(property_name(name).to_string()));
    }
    if let Some(global) = GlobalVar::from_keyword(name) {
        return Ok(Node::LiteralGlobal(global));
    }
    match name {
        "NaN" => Ok(Node::LiteralNumber(f64::NAN)),
        "Infinity" => Ok(Node::LiteralNumber(f64::INFINITY)),
        "undefined" => Ok(Node::LiteralUndefined),
        "PI" => Ok(Node::LiteralNumber(std::f64::consts::PI)),
        "E" => Ok(Node::LiteralNumber(std::f64::consts::E)),
        _ => Err(CompileError::UndefinedIdentifier(name.to_string())),
    }
}

fn build_binary(operator: &str, left: &TokenTree, right: &TokenTree) -> CompileResult<Node> {
    let op = BinaryOp::from_operator(operator)
        .ok_or_else(|| CompileError::UnexpectedOperator(operator.to_string()))?;
    Ok(Node::Binary {
        op,
        left: Box::new(build(left)?),
        right: Box::new(build(right)?),
    })
}

fn build_member(object: &TokenTree, property: &TokenTree, computed: bool) -> CompileResult<Node> {
    let object = match object.identifier_name() {
        Some(FEATURE_IDENTIFIER) => MemberObject::Feature,
        _ => MemberObject::Value(Box::new(build(object)?)),
    };

    if computed {
        return Ok(Node::Member {
            access: MemberAccess::Brackets,
            object,
            property: Box::new(build(property)?),
        });
    }

    let name = property
        .identifier_name()
        .ok_or_else(|| CompileError::UnexpectedOperator(".".to_string()))?;
    Ok(Node::Member {
        access: MemberAccess::Dot,
        object,
        property: Box::new(Node::LiteralString(name.to_string())),
    })
}

fn build_call(callee: &TokenTree, arguments: &[TokenTree]) -> CompileResult<Node> {
    match callee {
        TokenTree::Member {
            object,
            property,
            computed: false,
        } => {
            let name = property.identifier_name().unwrap_or_default();
            build_method_call(name, object, arguments)
        }
        TokenTree::Identifier(name) => build_function_call(name, arguments),
        other => Err(CompileError::NotAFunction(other.type_name().to_string())),
    }
}

fn build_method_call(name: &str, object: &TokenTree, arguments: &[TokenTree]) -> CompileResult<Node> {
    let method = RegexMethod::from_name(name)
        .ok_or_else(|| CompileError::UnexpectedFunctionCall(name.to_string()))?;

    if method == RegexMethod::ToString {
        return Ok(Node::FunctionCall {
            method,
            object: Box::new(build(object)?),
            argument: None,
        });
    }

    if !is_regexp_call(object) {
        return Err(CompileError::NotAFunction(name.to_string()));
    }
    let Some(argument) = arguments.first() else {
        return Ok(match method {
            RegexMethod::Test => Node::LiteralBoolean(false),
            _ => Node::LiteralNull,
        });
    };
    Ok(Node::FunctionCall {
        method,
        object: Box::new(build(object)?),
        argument: Some(Box::new(build(argument)?)),
    })
}

fn is_regexp_call(tree: &TokenTree) -> bool {
    matches!(tree, TokenTree::Call { callee, .. } if callee.identifier_name() == Some("regExp"))
}

fn build_function_call(name: &str, arguments: &[TokenTree]) -> CompileResult<Node> {
    let count = arguments.len();

    if let Some(func) = ColorFn::from_name(name) {
        let (valid, expected) = match func {
            ColorFn::Color => (count <= 2, "at most two arguments"),
            ColorFn::Rgb | ColorFn::Hsl => (count == 3, "exactly three arguments"),
            ColorFn::Rgba | ColorFn::Hsla => (count == 4, "exactly four arguments"),
        };
        if !valid {
            return Err(arity(name, expected, count));
        }
        return Ok(Node::LiteralColor {
            func,
            args: build_all(arguments)?,
        });
    }

    if let Some(arity_kind) = VectorArity::from_name(name) {
        if count == 0 {
            return Err(arity(name, "at least one argument", count));
        }
        if count > arity_kind.components() {
            return Err(CompileError::TooManyVectorArguments {
                function: name.to_string(),
                found: count,
            });
        }
        return Ok(Node::LiteralVector {
            arity: arity_kind,
            args: build_all(arguments)?,
        });
    }

    match name {
        "isNaN" | "isFinite" | "Boolean" | "Number" | "String" => {
            let Some(argument) = arguments.first() else {
                return Ok(match name {
                    "isNaN" => Node::LiteralBoolean(true),
                    "isFinite" | "Boolean" => Node::LiteralBoolean(false),
                    "Number" => Node::LiteralNumber(0.0),
                    _ => Node::LiteralString(String::new()),
                });
            };
            let op = match name {
                "isNaN" => UnaryOp::IsNaN,
                "isFinite" => UnaryOp::IsFinite,
                "Boolean" => UnaryOp::ToBoolean,
                "Number" => UnaryOp::ToNumber,
                _ => UnaryOp::ToString,
            };
            return unary(op, argument);
        }
        "isExactClass" | "isClass" => {
            let [argument] = arguments else {
                return Err(arity(name, "exactly one argument", count));
            };
            let op = if name == "isClass" {
                UnaryOp::IsClass
            } else {
                UnaryOp::IsExactClass
            };
            return unary(op, argument);
        }
        "getExactClassName" => {
            if count > 0 {
                return Err(arity(name, "no arguments", count));
            }
            return Ok(Node::ExactClassName);
        }
        "regExp" => return build_regex(arguments),
        _ => {}
    }

    if let Some(math) = UnaryMath::from_name(name) {
        let [argument] = arguments else {
            return Err(arity(name, "exactly one argument", count));
        };
        return unary(UnaryOp::Math(math), argument);
    }

    if let Some(math) = BinaryMath::from_name(name) {
        let [left, right] = arguments else {
            return Err(arity(name, "exactly two arguments", count));
        };
        return Ok(Node::Binary {
            op: BinaryOp::Math(math),
            left: Box::new(build(left)?),
            right: Box::new(build(right)?),
        });
    }

    if let Some(func) = TernaryFn::from_name(name) {
        let [left, right, test] = arguments else {
            return Err(arity(name, "exactly three arguments", count));
        };
        return Ok(Node::Ternary {
            func,
            left: Box::new(build(left)?),
            right: Box::new(build(right)?),
            test: Box::new(build(test)?),
        });
    }

    Err(CompileError::UnexpectedFunctionCall(name.to_string()))
}

fn unary(op: UnaryOp, argument: &TokenTree) -> CompileResult<Node> {
    Ok(Node::Unary {
        op,
        operand: Box::new(build(argument)?),
    })
}

fn arity(function: &str, expected: &'static str, found: usize) -> CompileError {
    CompileError::Arity {
        function: function.to_string(),
        expected,
        found,
    }
}

fn build_regex(arguments: &[TokenTree]) -> CompileResult<Node> {
    let Some(pattern) = arguments.first() else {
        return Ok(Node::LiteralRegex(StyleRegex::new("", "")?));
    };
    let pattern = build(pattern)?;
    let flags = arguments.get(1).map(build).transpose()?;

    let literal_flags = match &flags {
        Some(flags) => literal_text(flags),
        None => Some(String::new()),
    };
    if let (Some(source), Some(flags)) = (literal_text(&pattern), literal_flags) {
        return Ok(Node::LiteralRegex(StyleRegex::new(&source, &flags)?));
    }

    Ok(Node::Regex {
        pattern: Box::new(pattern),
        flags: flags.map(Box::new),
    })
}

fn literal_text(node: &Node) -> Option<String> {
    match node {
        Node::LiteralString(text) => Some(text.clone()),
        Node::LiteralNumber(value) => Some(format_number(*value)),
        Node::LiteralBoolean(value) => Some(value.to_string()),
        Node::LiteralNull => Some("null".to_string()),
        Node::LiteralUndefined => Some("undefined".to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
