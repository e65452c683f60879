pub mod ast;
pub mod builder;
pub mod color;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod pool;
pub mod preprocess;
pub mod shader;
pub mod style_regex;
pub mod subject;
pub mod value;

pub use ast::{Literal, TokenTree};
pub use builder::{compile_tree, CompileError, CompileErrorClass, CompileResult};
pub use color::Color;
pub use evaluator::{EvalError, EvalResult};
pub use expression::{Expression, ExpressionCache, ExpressionError};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use node::{Node, NodeKind};
pub use parser::{parse_expression, ParseError, Parser};
pub use pool::{PoolCapacity, ScratchPool};
pub use preprocess::PreprocessError;
pub use shader::{ShaderState, ShaderUnsupported};
pub use style_regex::{RegexError, StyleRegex};
pub use subject::{FeatureProperties, Subject};
pub use value::Value;
