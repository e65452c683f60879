#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Literal(Literal),
    Identifier(String),
    Call {
        callee: Box<TokenTree>,
        arguments: Vec<TokenTree>,
    },
    Unary {
        operator: String,
        argument: Box<TokenTree>,
    },
    Binary {
        operator: String,
        left: Box<TokenTree>,
        right: Box<TokenTree>,
    },
    Logical {
        operator: String,
        left: Box<TokenTree>,
        right: Box<TokenTree>,
    },
    Conditional {
        test: Box<TokenTree>,
        consequent: Box<TokenTree>,
        alternate: Box<TokenTree>,
    },
    Member {
        object: Box<TokenTree>,
        property: Box<TokenTree>,
        computed: bool,
    },
    Array(Vec<TokenTree>),
    Compound(Vec<TokenTree>),
}

impl TokenTree {
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenTree::Literal(_) => "Literal",
            TokenTree::Identifier(_) => "Identifier",
            TokenTree::Call { .. } => "CallExpression",
            TokenTree::Unary { .. } => "UnaryExpression",
            TokenTree::Binary { .. } => "BinaryExpression",
            TokenTree::Logical { .. } => "LogicalExpression",
            TokenTree::Conditional { .. } => "ConditionalExpression",
            TokenTree::Member { .. } => "MemberExpression",
            TokenTree::Array(_) => "ArrayExpression",
            TokenTree::Compound(_) => "Compound",
        }
    }

    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            TokenTree::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }
}
