use crate::style_regex::StyleRegex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    LiteralNull,
    LiteralUndefined,
    LiteralBoolean,
    LiteralNumber,
    LiteralString,
    LiteralGlobal,
    LiteralRegex,
    LiteralColor,
    LiteralVector,
    Variable,
    VariableInString,
    Unary,
    Binary,
    Ternary,
    Conditional,
    Member,
    Array,
    FunctionCall,
    Regex,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::LiteralNull => "LITERAL_NULL",
            NodeKind::LiteralUndefined => "LITERAL_UNDEFINED",
            NodeKind::LiteralBoolean => "LITERAL_BOOLEAN",
            NodeKind::LiteralNumber => "LITERAL_NUMBER",
            NodeKind::LiteralString => "LITERAL_STRING",
            NodeKind::LiteralGlobal => "LITERAL_GLOBAL",
            NodeKind::LiteralRegex => "LITERAL_REGEX",
            NodeKind::LiteralColor => "LITERAL_COLOR",
            NodeKind::LiteralVector => "LITERAL_VECTOR",
            NodeKind::Variable => "VARIABLE",
            NodeKind::VariableInString => "VARIABLE_IN_STRING",
            NodeKind::Unary => "UNARY",
            NodeKind::Binary => "BINARY",
            NodeKind::Ternary => "TERNARY",
            NodeKind::Conditional => "CONDITIONAL",
            NodeKind::Member => "MEMBER",
            NodeKind::Array => "ARRAY",
            NodeKind::FunctionCall => "FUNCTION_CALL",
            NodeKind::Regex => "REGEX",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalVar {
    TilesetTime,
}

impl GlobalVar {
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "TILES3D_TILESET_TIME" => Some(GlobalVar::TilesetTime),
            _ => None,
        }
    }

    pub fn uniform(self) -> &'static str {
        match self {
            GlobalVar::TilesetTime => "u_tilesetTime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryMath {
    Abs,
    Sqrt,
    Cos,
    Sin,
    Tan,
    Acos,
    Asin,
    Atan,
    Radians,
    Degrees,
}

impl UnaryMath {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => UnaryMath::Abs,
            "sqrt" => UnaryMath::Sqrt,
            "cos" => UnaryMath::Cos,
            "sin" => UnaryMath::Sin,
            "tan" => UnaryMath::Tan,
            "acos" => UnaryMath::Acos,
            "asin" => UnaryMath::Asin,
            "atan" => UnaryMath::Atan,
            "radians" => UnaryMath::Radians,
            "degrees" => UnaryMath::Degrees,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryMath::Abs => "abs",
            UnaryMath::Sqrt => "sqrt",
            UnaryMath::Cos => "cos",
            UnaryMath::Sin => "sin",
            UnaryMath::Tan => "tan",
            UnaryMath::Acos => "acos",
            UnaryMath::Asin => "asin",
            UnaryMath::Atan => "atan",
            UnaryMath::Radians => "radians",
            UnaryMath::Degrees => "degrees",
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryMath::Abs => x.abs(),
            UnaryMath::Sqrt => x.sqrt(),
            UnaryMath::Cos => x.cos(),
            UnaryMath::Sin => x.sin(),
            UnaryMath::Tan => x.tan(),
            UnaryMath::Acos => x.acos(),
            UnaryMath::Asin => x.asin(),
            UnaryMath::Atan => x.atan(),
            UnaryMath::Radians => x.to_radians(),
            UnaryMath::Degrees => x.to_degrees(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negative,
    Positive,
    IsNaN,
    IsFinite,
    IsExactClass,
    IsClass,
    ToBoolean,
    ToNumber,
    ToString,
    Math(UnaryMath),
}

impl UnaryOp {
    pub fn from_operator(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOp::Not),
            "-" => Some(UnaryOp::Negative),
            "+" => Some(UnaryOp::Positive),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negative => "-",
            UnaryOp::Positive => "+",
            UnaryOp::IsNaN => "isNaN",
            UnaryOp::IsFinite => "isFinite",
            UnaryOp::IsExactClass => "isExactClass",
            UnaryOp::IsClass => "isClass",
            UnaryOp::ToBoolean => "Boolean",
            UnaryOp::ToNumber => "Number",
            UnaryOp::ToString => "String",
            UnaryOp::Math(math) => math.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMath {
    Atan2,
    Pow,
    Min,
    Max,
}

impl BinaryMath {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "atan2" => Some(BinaryMath::Atan2),
            "pow" => Some(BinaryMath::Pow),
            "min" => Some(BinaryMath::Min),
            "max" => Some(BinaryMath::Max),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryMath::Atan2 => "atan2",
            BinaryMath::Pow => "pow",
            BinaryMath::Min => "min",
            BinaryMath::Max => "max",
        }
    }

    /// `min`/`max` propagate NaN from either side.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryMath::Atan2 => left.atan2(right),
            BinaryMath::Pow => left.powf(right),
            BinaryMath::Min if left.is_nan() || right.is_nan() => f64::NAN,
            BinaryMath::Max if left.is_nan() || right.is_nan() => f64::NAN,
            BinaryMath::Min => left.min(right),
            BinaryMath::Max => left.max(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    StrictEq,
    Eq,
    StrictNe,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
    RegexMatch,
    RegexNotMatch,
    Math(BinaryMath),
}

impl BinaryOp {
    pub fn from_operator(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "===" => BinaryOp::StrictEq,
            "==" => BinaryOp::Eq,
            "!==" => BinaryOp::StrictNe,
            "!=" => BinaryOp::Ne,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "=~" => BinaryOp::RegexMatch,
            "!~" => BinaryOp::RegexNotMatch,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::StrictEq => "===",
            BinaryOp::Eq => "==",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::RegexMatch => "=~",
            BinaryOp::RegexNotMatch => "!~",
            BinaryOp::Math(math) => math.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TernaryFn {
    Clamp,
    Mix,
}

impl TernaryFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clamp" => Some(TernaryFn::Clamp),
            "mix" => Some(TernaryFn::Mix),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TernaryFn::Clamp => "clamp",
            TernaryFn::Mix => "mix",
        }
    }

    pub fn apply(self, a: f64, b: f64, c: f64) -> f64 {
        match self {
            TernaryFn::Clamp => {
                if a < b {
                    b
                } else if a > c {
                    c
                } else {
                    a
                }
            }
            TernaryFn::Mix => (1.0 - c) * a + c * b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFn {
    Color,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
}

impl ColorFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "color" => Some(ColorFn::Color),
            "rgb" => Some(ColorFn::Rgb),
            "rgba" => Some(ColorFn::Rgba),
            "hsl" => Some(ColorFn::Hsl),
            "hsla" => Some(ColorFn::Hsla),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorFn::Color => "color",
            ColorFn::Rgb => "rgb",
            ColorFn::Rgba => "rgba",
            ColorFn::Hsl => "hsl",
            ColorFn::Hsla => "hsla",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorArity {
    Two,
    Three,
    Four,
}

impl VectorArity {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vec2" => Some(VectorArity::Two),
            "vec3" => Some(VectorArity::Three),
            "vec4" => Some(VectorArity::Four),
            _ => None,
        }
    }

    pub fn components(self) -> usize {
        match self {
            VectorArity::Two => 2,
            VectorArity::Three => 3,
            VectorArity::Four => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VectorArity::Two => "vec2",
            VectorArity::Three => "vec3",
            VectorArity::Four => "vec4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexMethod {
    Test,
    Exec,
    ToString,
}

impl RegexMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "test" => Some(RegexMethod::Test),
            "exec" => Some(RegexMethod::Exec),
            "toString" => Some(RegexMethod::ToString),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RegexMethod::Test => "test",
            RegexMethod::Exec => "exec",
            RegexMethod::ToString => "toString",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAccess {
    Dot,
    Brackets,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberObject {
    Feature,
    Value(Box<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    LiteralNull,
    LiteralUndefined,
    LiteralBoolean(bool),
    LiteralNumber(f64),
    LiteralString(String),
    LiteralGlobal(GlobalVar),
    LiteralRegex(StyleRegex),
    LiteralColor {
        func: ColorFn,
        args: Vec<Node>,
    },
    LiteralVector {
        arity: VectorArity,
        args: Vec<Node>,
    },
    Variable(String),
    VariableInString(String),
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    ExactClassName,
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Ternary {
        func: TernaryFn,
        left: Box<Node>,
        right: Box<Node>,
        test: Box<Node>,
    },
    Conditional {
        test: Box<Node>,
        left: Box<Node>,
        right: Box<Node>,
    },
    Member {
        access: MemberAccess,
        object: MemberObject,
        property: Box<Node>,
    },
    Array(Vec<Node>),
    FunctionCall {
        method: RegexMethod,
        object: Box<Node>,
        argument: Option<Box<Node>>,
    },
    Regex {
        pattern: Box<Node>,
        flags: Option<Box<Node>>,
    },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::LiteralNull => NodeKind::LiteralNull,
            Node::LiteralUndefined => NodeKind::LiteralUndefined,
            Node::LiteralBoolean(_) => NodeKind::LiteralBoolean,
            Node::LiteralNumber(_) => NodeKind::LiteralNumber,
            Node::LiteralString(_) => NodeKind::LiteralString,
            Node::LiteralGlobal(_) => NodeKind::LiteralGlobal,
            Node::LiteralRegex(_) => NodeKind::LiteralRegex,
            Node::LiteralColor { .. } => NodeKind::LiteralColor,
            Node::LiteralVector { .. } => NodeKind::LiteralVector,
            Node::Variable(_) => NodeKind::Variable,
            Node::VariableInString(_) => NodeKind::VariableInString,
            Node::Unary { .. } | Node::ExactClassName => NodeKind::Unary,
            Node::Binary { .. } => NodeKind::Binary,
            Node::Ternary { .. } => NodeKind::Ternary,
            Node::Conditional { .. } => NodeKind::Conditional,
            Node::Member { .. } => NodeKind::Member,
            Node::Array(_) => NodeKind::Array,
            Node::FunctionCall { .. } => NodeKind::FunctionCall,
            Node::Regex { .. } => NodeKind::Regex,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::LiteralNumber(value) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
