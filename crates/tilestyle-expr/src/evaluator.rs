use crate::color::Color;
use crate::node::{
    BinaryOp, ColorFn, GlobalVar, MemberObject, Node, RegexMethod, UnaryOp, VectorArity,
};
use crate::pool::{Pooled, ScratchPool, Slot};
use crate::style_regex::{RegexError, StyleRegex};
use crate::subject::Subject;
use crate::value::{format_number, parse_number, Value};
use glam::{Vec2, Vec3, Vec4};
use regex::Regex;
use std::borrow::Cow;
use std::ops::{Add, Div, Mul, Rem, Sub};
use std::sync::OnceLock;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Operation is undefined: `{operator}` expects booleans, got {found}")]
    UndefinedOperation {
        operator: &'static str,
        found: &'static str,
    },
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("invalid {function} constructor: {reason}")]
    VectorArity {
        function: &'static str,
        reason: String,
    },
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] RegexError),
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

pub fn evaluate(node: &Node, pool: &mut ScratchPool, subject: &dyn Subject) -> EvalResult<Value> {
    pool.reset();
    let mut evaluator = Evaluator { pool, subject };
    let term = evaluator.eval(node)?;
    Ok(evaluator.resolve(term))
}

pub fn evaluate_color(
    node: &Node,
    pool: &mut ScratchPool,
    subject: &dyn Subject,
) -> EvalResult<Color> {
    match evaluate(node, pool, subject)? {
        Value::Color(color) => Ok(color),
        other => Err(EvalError::TypeMismatch(format!(
            "expected a color, got {}",
            other.type_name()
        ))),
    }
}

#[derive(Debug, Clone)]
enum Term<'n> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Cow<'n, str>),
    RegExp(Cow<'n, StyleRegex>),
    Color(Slot<Color>),
    Vec2(Slot<Vec2>),
    Vec3(Slot<Vec3>),
    Vec4(Slot<Vec4>),
    Array(Vec<Term<'n>>),
}

impl Term<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Term::Undefined => "undefined",
            Term::Null => "null",
            Term::Bool(_) => "boolean",
            Term::Number(_) => "number",
            Term::Str(_) => "string",
            Term::RegExp(_) => "regExp",
            Term::Color(_) => "color",
            Term::Vec2(_) => "vec2",
            Term::Vec3(_) => "vec3",
            Term::Vec4(_) => "vec4",
            Term::Array(_) => "array",
        }
    }

    fn is_object(&self) -> bool {
        matches!(
            self,
            Term::RegExp(_)
                | Term::Color(_)
                | Term::Vec2(_)
                | Term::Vec3(_)
                | Term::Vec4(_)
                | Term::Array(_)
        )
    }

    fn is_nullish(&self) -> bool {
        matches!(self, Term::Undefined | Term::Null)
    }

    fn truthy(&self) -> bool {
        match self {
            Term::Undefined | Term::Null => false,
            Term::Bool(value) => *value,
            Term::Number(value) => *value != 0.0 && !value.is_nan(),
            Term::Str(text) => !text.is_empty(),
            _ => true,
        }
    }
}

trait Componentwise:
    Pooled
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
{
}

impl<T> Componentwise for T where
    T: Pooled
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Rem<Output = T>
        + Mul<f32, Output = T>
        + Div<f32, Output = T>
{
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{(.*?)\}").expect("valid regex"))
}

struct Evaluator<'e> {
    pool: &'e mut ScratchPool,
    subject: &'e dyn Subject,
}

impl Evaluator<'_> {
    fn eval<'n>(&mut self, node: &'n Node) -> EvalResult<Term<'n>> {
        match node {
            Node::LiteralNull => Ok(Term::Null),
            Node::LiteralUndefined => Ok(Term::Undefined),
            Node::LiteralBoolean(value) => Ok(Term::Bool(*value)),
            Node::LiteralNumber(value) => Ok(Term::Number(*value)),
            Node::LiteralString(text) => Ok(Term::Str(Cow::Borrowed(text.as_str()))),
            Node::LiteralGlobal(GlobalVar::TilesetTime) => {
                Ok(Term::Number(self.subject.time_since_load()))
            }
            Node::LiteralRegex(regex) => Ok(Term::RegExp(Cow::Borrowed(regex))),
            Node::LiteralColor { func, args } => self.eval_color(*func, args),
            Node::LiteralVector { arity, args } => self.eval_vector(*arity, args),
            Node::Variable(name) => Ok(self.property(name)),
            Node::VariableInString(template) => {
                Ok(Term::Str(Cow::Owned(self.interpolate(template))))
            }
            Node::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                self.eval_unary(*op, operand)
            }
            Node::ExactClassName => Ok(match self.subject.exact_class_name() {
                Some(name) => Term::Str(Cow::Owned(name)),
                None => Term::Undefined,
            }),
            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Ternary {
                func,
                left,
                right,
                test,
            } => {
                let a = self.eval(left)?;
                let b = self.eval(right)?;
                let c = self.eval(test)?;
                Ok(Term::Number(func.apply(
                    self.to_number(&a),
                    self.to_number(&b),
                    self.to_number(&c),
                )))
            }
            Node::Conditional { test, left, right } => {
                if self.eval(test)?.truthy() {
                    self.eval(left)
                } else {
                    self.eval(right)
                }
            }
            Node::Member {
                object, property, ..
            } => self.eval_member(object, property),
            Node::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(element)?);
                }
                Ok(Term::Array(items))
            }
            Node::FunctionCall {
                method,
                object,
                argument,
            } => self.eval_call(*method, object, argument.as_deref()),
            Node::Regex { pattern, flags } => {
                let pattern = self.eval(pattern)?;
                let flags = match flags {
                    Some(flags) => self.eval(flags)?,
                    None => Term::Undefined,
                };
                let pattern = if matches!(pattern, Term::Undefined) {
                    String::new()
                } else {
                    self.stringify(&pattern)
                };
                let flags = if matches!(flags, Term::Undefined) {
                    String::new()
                } else {
                    self.stringify(&flags)
                };
                let regex = StyleRegex::new(&pattern, &flags)?;
                Ok(Term::RegExp(Cow::Owned(regex)))
            }
        }
    }

    fn property(&mut self, name: &str) -> Term<'static> {
        match self.subject.property(name) {
            Some(value) => self.from_value(value),
            None => Term::Undefined,
        }
    }

    fn interpolate(&self, template: &str) -> String {
        placeholder_regex()
            .replace_all(template, |captures: &regex::Captures<'_>| {
                let name = captures.get(1).map_or("", |group| group.as_str());
                match self.subject.property(name) {
                    Some(value) if !value.is_nullish() => value.to_string(),
                    _ => String::new(),
                }
            })
            .into_owned()
    }

    fn eval_unary<'n>(&mut self, op: UnaryOp, operand: Term<'n>) -> EvalResult<Term<'n>> {
        let result = match op {
            UnaryOp::Not => Term::Bool(!operand.truthy()),
            UnaryOp::Negative => match operand {
                Term::Vec2(slot) => Term::Vec2(self.map_slot(slot, |v| -v)),
                Term::Vec3(slot) => Term::Vec3(self.map_slot(slot, |v| -v)),
                Term::Vec4(slot) => Term::Vec4(self.map_slot(slot, |v| -v)),
                other => Term::Number(-self.to_number(&other)),
            },
            UnaryOp::Positive => match operand {
                Term::Color(_) | Term::Vec2(_) | Term::Vec3(_) | Term::Vec4(_) => operand,
                other => Term::Number(self.to_number(&other)),
            },
            UnaryOp::IsNaN => Term::Bool(self.to_number(&operand).is_nan()),
            UnaryOp::IsFinite => Term::Bool(self.to_number(&operand).is_finite()),
            UnaryOp::IsExactClass => {
                Term::Bool(self.subject.is_exact_class(&self.stringify(&operand)))
            }
            UnaryOp::IsClass => Term::Bool(self.subject.is_class(&self.stringify(&operand))),
            UnaryOp::ToBoolean => Term::Bool(operand.truthy()),
            UnaryOp::ToNumber => Term::Number(self.to_number(&operand)),
            UnaryOp::ToString => match operand {
                Term::Str(text) => Term::Str(text),
                other => Term::Str(Cow::Owned(self.stringify(&other))),
            },
            UnaryOp::Math(math) => Term::Number(math.apply(self.to_number(&operand))),
        };
        Ok(result)
    }

    fn eval_binary<'n>(
        &mut self,
        op: BinaryOp,
        left: &'n Node,
        right: &'n Node,
    ) -> EvalResult<Term<'n>> {
        let result = match op {
            BinaryOp::And | BinaryOp::Or => {
                let left = expect_bool(op, self.eval(left)?)?;
                if left == (op == BinaryOp::Or) {
                    return Ok(Term::Bool(left));
                }
                Term::Bool(expect_bool(op, self.eval(right)?)?)
            }
            BinaryOp::Add => {
                let (left, right) = self.eval_pair(left, right)?;
                self.add(left, right)
            }
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                let (left, right) = self.eval_pair(left, right)?;
                match self.composite_arithmetic(op, &left, &right) {
                    Some(term) => term,
                    None => {
                        let (l, r) = (self.to_number(&left), self.to_number(&right));
                        Term::Number(match op {
                            BinaryOp::Sub => l - r,
                            BinaryOp::Mul => l * r,
                            BinaryOp::Div => l / r,
                            _ => l % r,
                        })
                    }
                }
            }
            BinaryOp::StrictEq | BinaryOp::StrictNe => {
                let (left, right) = self.eval_pair(left, right)?;
                Term::Bool(self.strict_eq(&left, &right) == (op == BinaryOp::StrictEq))
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let (left, right) = self.eval_pair(left, right)?;
                Term::Bool(self.loose_eq(&left, &right) == (op == BinaryOp::Eq))
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let (left, right) = self.eval_pair(left, right)?;
                Term::Bool(self.compare(op, &left, &right))
            }
            BinaryOp::RegexMatch | BinaryOp::RegexNotMatch => {
                let (left, right) = self.eval_pair(left, right)?;
                let matched = match (&left, &right) {
                    (Term::RegExp(regex), other) | (other, Term::RegExp(regex)) => {
                        Some(regex.test(&self.stringify(other)))
                    }
                    _ => None,
                };
                Term::Bool(match matched {
                    Some(matched) => matched == (op == BinaryOp::RegexMatch),
                    None => false,
                })
            }
            BinaryOp::Math(math) => {
                let (left, right) = self.eval_pair(left, right)?;
                Term::Number(math.apply(self.to_number(&left), self.to_number(&right)))
            }
        };
        Ok(result)
    }

    fn eval_pair<'n>(
        &mut self,
        left: &'n Node,
        right: &'n Node,
    ) -> EvalResult<(Term<'n>, Term<'n>)> {
        let left = self.eval(left)?;
        let right = self.eval(right)?;
        Ok((left, right))
    }

    fn add<'n>(&mut self, left: Term<'n>, right: Term<'n>) -> Term<'n> {
        if let Some(term) = self.composite_arithmetic(BinaryOp::Add, &left, &right) {
            return term;
        }
        let stringy = |term: &Term<'_>| matches!(term, Term::Str(_)) || term.is_object();
        if stringy(&left) || stringy(&right) {
            let mut text = self.stringify(&left);
            text.push_str(&self.stringify(&right));
            return Term::Str(Cow::Owned(text));
        }
        Term::Number(self.to_number(&left) + self.to_number(&right))
    }

    fn composite_arithmetic<'n>(
        &mut self,
        op: BinaryOp,
        left: &Term<'n>,
        right: &Term<'n>,
    ) -> Option<Term<'n>> {
        match (left, right) {
            (Term::Color(l), Term::Color(r)) => self.combine(op, *l, *r).map(Term::Color),
            (Term::Vec2(l), Term::Vec2(r)) => self.combine(op, *l, *r).map(Term::Vec2),
            (Term::Vec3(l), Term::Vec3(r)) => self.combine(op, *l, *r).map(Term::Vec3),
            (Term::Vec4(l), Term::Vec4(r)) => self.combine(op, *l, *r).map(Term::Vec4),
            (Term::Color(v), Term::Number(s)) => self.scale(op, *v, *s, false).map(Term::Color),
            (Term::Number(s), Term::Color(v)) => self.scale(op, *v, *s, true).map(Term::Color),
            (Term::Vec2(v), Term::Number(s)) => self.scale(op, *v, *s, false).map(Term::Vec2),
            (Term::Number(s), Term::Vec2(v)) => self.scale(op, *v, *s, true).map(Term::Vec2),
            (Term::Vec3(v), Term::Number(s)) => self.scale(op, *v, *s, false).map(Term::Vec3),
            (Term::Number(s), Term::Vec3(v)) => self.scale(op, *v, *s, true).map(Term::Vec3),
            (Term::Vec4(v), Term::Number(s)) => self.scale(op, *v, *s, false).map(Term::Vec4),
            (Term::Number(s), Term::Vec4(v)) => self.scale(op, *v, *s, true).map(Term::Vec4),
            _ => None,
        }
    }

    fn combine<T: Componentwise>(
        &mut self,
        op: BinaryOp,
        left: Slot<T>,
        right: Slot<T>,
    ) -> Option<Slot<T>> {
        let (l, r) = (self.pool.load(left), self.pool.load(right));
        let value = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Mod => l % r,
            _ => return None,
        };
        Some(self.pool.store(value))
    }

    /// Scalars multiply from either side but only divide from the right.
    fn scale<T: Componentwise>(
        &mut self,
        op: BinaryOp,
        vector: Slot<T>,
        scalar: f64,
        scalar_on_left: bool,
    ) -> Option<Slot<T>> {
        let vector = self.pool.load(vector);
        let scalar = scalar as f32;
        let value = match op {
            BinaryOp::Mul => vector * scalar,
            BinaryOp::Div if !scalar_on_left => vector / scalar,
            _ => return None,
        };
        Some(self.pool.store(value))
    }

    fn map_slot<T: Pooled>(&mut self, slot: Slot<T>, f: impl Fn(T) -> T) -> Slot<T> {
        let value = f(self.pool.load(slot));
        self.pool.store(value)
    }

    fn structural_eq(&self, left: &Term<'_>, right: &Term<'_>) -> Option<bool> {
        match (left, right) {
            (Term::Color(l), Term::Color(r)) => Some(self.pool.load(*l) == self.pool.load(*r)),
            (Term::Vec2(l), Term::Vec2(r)) => Some(self.pool.load(*l) == self.pool.load(*r)),
            (Term::Vec3(l), Term::Vec3(r)) => Some(self.pool.load(*l) == self.pool.load(*r)),
            (Term::Vec4(l), Term::Vec4(r)) => Some(self.pool.load(*l) == self.pool.load(*r)),
            _ => None,
        }
    }

    fn strict_eq(&self, left: &Term<'_>, right: &Term<'_>) -> bool {
        if let Some(equal) = self.structural_eq(left, right) {
            return equal;
        }
        match (left, right) {
            (Term::Undefined, Term::Undefined) | (Term::Null, Term::Null) => true,
            (Term::Bool(l), Term::Bool(r)) => l == r,
            (Term::Number(l), Term::Number(r)) => l == r,
            (Term::Str(l), Term::Str(r)) => l == r,
            _ => false,
        }
    }

    fn loose_eq(&self, left: &Term<'_>, right: &Term<'_>) -> bool {
        if let Some(equal) = self.structural_eq(left, right) {
            return equal;
        }
        match (left, right) {
            (l, r) if l.is_nullish() || r.is_nullish() => l.is_nullish() && r.is_nullish(),
            (Term::Bool(l), Term::Bool(r)) => l == r,
            (Term::Number(l), Term::Number(r)) => l == r,
            (Term::Str(l), Term::Str(r)) => l == r,
            (Term::Number(n), Term::Str(s)) | (Term::Str(s), Term::Number(n)) => {
                *n == parse_number(s)
            }
            (Term::Bool(b), other) | (other, Term::Bool(b)) => {
                self.loose_eq(&Term::Number(f64::from(u8::from(*b))), other)
            }
            (l, r) if l.is_object() && r.is_object() => false,
            (object, primitive) | (primitive, object) if object.is_object() => {
                let text = Term::Str(Cow::Owned(self.stringify(object)));
                self.loose_eq(&text, primitive)
            }
            _ => false,
        }
    }

    fn compare(&self, op: BinaryOp, left: &Term<'_>, right: &Term<'_>) -> bool {
        if let (Some(l), Some(r)) = (self.primitive_string(left), self.primitive_string(right)) {
            return match op {
                BinaryOp::Lt => l < r,
                BinaryOp::Le => l <= r,
                BinaryOp::Gt => l > r,
                _ => l >= r,
            };
        }
        let (l, r) = (self.to_number(left), self.to_number(right));
        match op {
            BinaryOp::Lt => l < r,
            BinaryOp::Le => l <= r,
            BinaryOp::Gt => l > r,
            _ => l >= r,
        }
    }

    fn primitive_string<'t>(&self, term: &'t Term<'_>) -> Option<Cow<'t, str>> {
        match term {
            Term::Str(text) => Some(Cow::Borrowed(text.as_ref())),
            other if other.is_object() => Some(Cow::Owned(self.stringify(other))),
            _ => None,
        }
    }

    fn to_number(&self, term: &Term<'_>) -> f64 {
        match term {
            Term::Undefined => f64::NAN,
            Term::Null => 0.0,
            Term::Bool(value) => f64::from(u8::from(*value)),
            Term::Number(value) => *value,
            Term::Str(text) => parse_number(text),
            other => parse_number(&self.stringify(other)),
        }
    }

    fn stringify(&self, term: &Term<'_>) -> String {
        match term {
            Term::Undefined => "undefined".to_string(),
            Term::Null => "null".to_string(),
            Term::Bool(value) => value.to_string(),
            Term::Number(value) => format_number(*value),
            Term::Str(text) => text.to_string(),
            other => self.resolve(other.clone()).to_string(),
        }
    }

    fn eval_member<'n>(
        &mut self,
        object: &'n MemberObject,
        property: &'n Node,
    ) -> EvalResult<Term<'n>> {
        let key = self.eval(property)?;
        let object = match object {
            MemberObject::Feature => return Ok(self.property(&self.stringify(&key))),
            MemberObject::Value(object) => self.eval(object)?,
        };
        if object.is_nullish() {
            return Ok(Term::Undefined);
        }
        Ok(self.member(object, &key))
    }

    fn member<'n>(&self, object: Term<'n>, key: &Term<'_>) -> Term<'n> {
        let index = member_index(key);
        let component_index = match key {
            Term::Str(name) => match name.as_ref() {
                "x" => Some(0),
                "y" => Some(1),
                "z" => Some(2),
                "w" => Some(3),
                _ => None,
            },
            Term::Number(_) => index,
            _ => None,
        };
        let component = |components: &[f32]| -> Term<'n> {
            component_index
                .and_then(|i| components.get(i))
                .map_or(Term::Undefined, |value| Term::Number(f64::from(*value)))
        };
        match object {
            Term::Color(slot) => {
                let color_index = match key {
                    Term::Str(name) => match name.as_ref() {
                        "red" => Some(0),
                        "green" => Some(1),
                        "blue" => Some(2),
                        "alpha" => Some(3),
                        _ => component_index,
                    },
                    _ => component_index,
                };
                let color = self.pool.load(slot);
                color_index
                    .and_then(|i| color.component(i))
                    .map_or(Term::Undefined, |value| Term::Number(f64::from(value)))
            }
            Term::Vec2(slot) => component(&self.pool.load(slot).to_array()),
            Term::Vec3(slot) => component(&self.pool.load(slot).to_array()),
            Term::Vec4(slot) => component(&self.pool.load(slot).to_array()),
            Term::Str(text) => {
                if is_length_key(key) {
                    return Term::Number(text.encode_utf16().count() as f64);
                }
                let units: Vec<u16> = text.encode_utf16().collect();
                match index.and_then(|i| units.get(i)) {
                    Some(unit) => Term::Str(Cow::Owned(String::from_utf16_lossy(&[*unit]))),
                    None => Term::Undefined,
                }
            }
            Term::Array(mut items) => {
                if is_length_key(key) {
                    return Term::Number(items.len() as f64);
                }
                match index.filter(|i| *i < items.len()) {
                    Some(i) => items.swap_remove(i),
                    None => Term::Undefined,
                }
            }
            _ => Term::Undefined,
        }
    }

    fn eval_call<'n>(
        &mut self,
        method: RegexMethod,
        object: &'n Node,
        argument: Option<&'n Node>,
    ) -> EvalResult<Term<'n>> {
        let receiver = self.eval(object)?;
        if method == RegexMethod::ToString {
            return match receiver {
                Term::RegExp(_) | Term::Color(_) | Term::Vec2(_) | Term::Vec3(_) | Term::Vec4(_) => {
                    Ok(Term::Str(Cow::Owned(self.stringify(&receiver))))
                }
                other => Err(EvalError::TypeMismatch(format!(
                    "toString is not available on {}",
                    other.type_name()
                ))),
            };
        }

        let regex = match receiver {
            Term::RegExp(regex) => regex,
            other => {
                return Err(EvalError::TypeMismatch(format!(
                    "{} requires a regExp receiver, got {}",
                    method.name(),
                    other.type_name()
                )))
            }
        };
        let input = match argument {
            Some(argument) => {
                let term = self.eval(argument)?;
                self.stringify(&term)
            }
            None => "undefined".to_string(),
        };
        Ok(match method {
            RegexMethod::Test => Term::Bool(regex.test(&input)),
            _ => match regex.exec(&input) {
                Some(Some(group)) => Term::Str(Cow::Owned(group.to_string())),
                Some(None) => Term::Undefined,
                None => Term::Null,
            },
        })
    }

    fn eval_color<'n>(&mut self, func: ColorFn, args: &'n [Node]) -> EvalResult<Term<'n>> {
        let color = match func {
            ColorFn::Color => match args {
                [] => Color::WHITE,
                [css, rest @ ..] => {
                    let css = self.eval(css)?;
                    let Term::Str(text) = &css else {
                        return Err(EvalError::InvalidColor(self.stringify(&css)));
                    };
                    let mut color = Color::from_css_str(text)
                        .ok_or_else(|| EvalError::InvalidColor(text.to_string()))?;
                    if let Some(alpha) = rest.first() {
                        color.alpha = self.number_arg(alpha)? as f32;
                    }
                    color
                }
            },
            ColorFn::Rgb | ColorFn::Rgba | ColorFn::Hsl | ColorFn::Hsla => {
                let mut channels = [1.0_f64; 4];
                for (channel, arg) in channels.iter_mut().zip(args) {
                    *channel = self.number_arg(arg)?;
                }
                let [a, b, c, alpha] = channels;
                match func {
                    ColorFn::Rgb => Color::from_bytes(a as f32, b as f32, c as f32, 255.0),
                    ColorFn::Rgba => {
                        Color::from_bytes(a as f32, b as f32, c as f32, (alpha * 255.0) as f32)
                    }
                    _ => Color::from_hsl(a, b, c, alpha),
                }
            }
        };
        Ok(Term::Color(self.pool.store(color)))
    }

    fn number_arg(&mut self, node: &Node) -> EvalResult<f64> {
        let term = self.eval(node)?;
        Ok(self.to_number(&term))
    }

    /// Flattens number and vector arguments into components. One component broadcasts, a
    /// single wider vector is truncated, and any other count mismatch is an error.
    fn eval_vector<'n>(&mut self, arity: VectorArity, args: &'n [Node]) -> EvalResult<Term<'n>> {
        let mut components = [0.0_f32; 16];
        let mut count = 0;
        for arg in args {
            let term = self.eval(arg)?;
            let (values, len) = match term {
                Term::Number(value) => ([value as f32, 0.0, 0.0, 0.0], 1),
                Term::Vec2(slot) => (self.pool.load(slot).extend(0.0).extend(0.0).to_array(), 2),
                Term::Vec3(slot) => (self.pool.load(slot).extend(0.0).to_array(), 3),
                Term::Vec4(slot) => (self.pool.load(slot).to_array(), 4),
                other => {
                    return Err(EvalError::TypeMismatch(format!(
                        "{} arguments must be numbers or vectors, got {}",
                        arity.name(),
                        other.type_name()
                    )))
                }
            };
            for value in &values[..len] {
                if let Some(component) = components.get_mut(count) {
                    *component = *value;
                }
                count += 1;
            }
        }

        let size = arity.components();
        if count == 1 {
            let first = components[0];
            components[..size].fill(first);
        } else if count > size && args.len() > 1 {
            return Err(EvalError::VectorArity {
                function: arity.name(),
                reason: format!("too many arguments ({count} components for {size})"),
            });
        } else if count < size {
            return Err(EvalError::VectorArity {
                function: arity.name(),
                reason: format!("not enough components ({count} for {size})"),
            });
        }

        let [x, y, z, w, ..] = components;
        Ok(match arity {
            VectorArity::Two => Term::Vec2(self.pool.store(Vec2::new(x, y))),
            VectorArity::Three => Term::Vec3(self.pool.store(Vec3::new(x, y, z))),
            VectorArity::Four => Term::Vec4(self.pool.store(Vec4::new(x, y, z, w))),
        })
    }

    fn from_value(&mut self, value: Value) -> Term<'static> {
        match value {
            Value::Undefined => Term::Undefined,
            Value::Null => Term::Null,
            Value::Bool(value) => Term::Bool(value),
            Value::Number(value) => Term::Number(value),
            Value::String(text) => Term::Str(Cow::Owned(text)),
            Value::RegExp(regex) => Term::RegExp(Cow::Owned(regex)),
            Value::Color(color) => Term::Color(self.pool.store(color)),
            Value::Vec2(v) => Term::Vec2(self.pool.store(v)),
            Value::Vec3(v) => Term::Vec3(self.pool.store(v)),
            Value::Vec4(v) => Term::Vec4(self.pool.store(v)),
            Value::Array(items) => {
                Term::Array(items.into_iter().map(|item| self.from_value(item)).collect())
            }
        }
    }

    fn resolve(&self, term: Term<'_>) -> Value {
        match term {
            Term::Undefined => Value::Undefined,
            Term::Null => Value::Null,
            Term::Bool(value) => Value::Bool(value),
            Term::Number(value) => Value::Number(value),
            Term::Str(text) => Value::String(text.into_owned()),
            Term::RegExp(regex) => Value::RegExp(regex.into_owned()),
            Term::Color(slot) => Value::Color(self.pool.load(slot)),
            Term::Vec2(slot) => Value::Vec2(self.pool.load(slot)),
            Term::Vec3(slot) => Value::Vec3(self.pool.load(slot)),
            Term::Vec4(slot) => Value::Vec4(self.pool.load(slot)),
            Term::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.resolve(item)).collect())
            }
        }
    }
}

fn expect_bool(op: BinaryOp, term: Term<'_>) -> EvalResult<bool> {
    match term {
        Term::Bool(value) => Ok(value),
        other => Err(EvalError::UndefinedOperation {
            operator: op.symbol(),
            found: other.type_name(),
        }),
    }
}

fn member_index(key: &Term<'_>) -> Option<usize> {
    match key {
        Term::Number(value) if *value >= 0.0 && value.fract() == 0.0 => Some(*value as usize),
        Term::Str(text) => text
            .parse::<usize>()
            .ok()
            .filter(|index| index.to_string() == text.as_ref()),
        _ => None,
    }
}

fn is_length_key(key: &Term<'_>) -> bool {
    matches!(key, Term::Str(name) if name == "length")
}

#[cfg(test)]
#[path = "evaluator_test.rs"]
mod tests;
