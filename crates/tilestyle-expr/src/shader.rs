use crate::color::Color;
use crate::node::{BinaryMath, BinaryOp, ColorFn, MemberObject, Node, UnaryOp};
use crate::value::format_number;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderState {
    pub translucent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not supported in shader: {reason}")]
pub struct ShaderUnsupported {
    pub reason: String,
}

pub type ShaderResult = Result<String, ShaderUnsupported>;

#[tracing::instrument(level = "debug", skip(node, state), fields(kind = %node.kind()))]
pub fn emit(node: &Node, attribute_prefix: &str, state: &mut ShaderState) -> ShaderResult {
    Emitter {
        prefix: attribute_prefix,
        state,
    }
    .emit(node)
}

fn unsupported(reason: impl Into<String>) -> ShaderUnsupported {
    let reason = reason.into();
    tracing::debug!(%reason, "expression has no shader form");
    ShaderUnsupported { reason }
}

struct Emitter<'s> {
    prefix: &'s str,
    state: &'s mut ShaderState,
}

impl Emitter<'_> {
    fn emit(&mut self, node: &Node) -> ShaderResult {
        match node {
            Node::LiteralNull => Err(unsupported("null")),
            Node::LiteralUndefined => Err(unsupported("undefined")),
            Node::LiteralBoolean(value) => Ok(value.to_string()),
            Node::LiteralNumber(value) => Ok(number_text(*value)),
            Node::LiteralString(text) => Err(unsupported(format!(
                "string literal '{text}' outside a color constructor"
            ))),
            Node::LiteralGlobal(global) => Ok(global.uniform().to_string()),
            Node::LiteralRegex(_) | Node::Regex { .. } => Err(unsupported("regular expressions")),
            Node::LiteralColor { func, args } => self.emit_color(*func, args),
            Node::LiteralVector { arity, args } => {
                Ok(format!("{}({})", arity.name(), self.emit_list(args)?.join(", ")))
            }
            Node::Variable(name) => Ok(format!("{}{name}", self.prefix)),
            Node::VariableInString(_) => Err(unsupported("converting a variable to a string")),
            Node::Unary { op, operand } => self.emit_unary(*op, operand),
            Node::ExactClassName => Err(unsupported("\"getExactClassName\"")),
            Node::Binary { op, left, right } => self.emit_binary(*op, left, right),
            Node::Ternary {
                func,
                left,
                right,
                test,
            } => {
                let left = self.emit(left)?;
                let right = self.emit(right)?;
                let test = self.emit(test)?;
                Ok(format!("{}({left}, {right}, {test})", func.name()))
            }
            Node::Conditional { test, left, right } => {
                let test = self.emit(test)?;
                let left = self.emit(left)?;
                let right = self.emit(right)?;
                Ok(format!("({test} ? {left} : {right})"))
            }
            Node::Member {
                object, property, ..
            } => self.emit_member(object, property),
            Node::Array(elements) => {
                let items = self.emit_list(elements)?;
                match items.len() {
                    2..=4 => Ok(format!("vec{}({})", items.len(), items.join(", "))),
                    len => Err(unsupported(format!(
                        "array of length {len}, expected 2, 3 or 4"
                    ))),
                }
            }
            Node::FunctionCall { method, .. } => {
                Err(unsupported(format!("\"{}\"", method.name())))
            }
        }
    }

    fn emit_list(&mut self, nodes: &[Node]) -> Result<Vec<String>, ShaderUnsupported> {
        nodes.iter().map(|node| self.emit(node)).collect()
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: &Node) -> ShaderResult {
        match op {
            UnaryOp::IsNaN
            | UnaryOp::IsFinite
            | UnaryOp::ToString
            | UnaryOp::IsExactClass
            | UnaryOp::IsClass => return Err(unsupported(format!("\"{}\"", op.name()))),
            _ => {}
        }
        let operand = self.emit(operand)?;
        Ok(match op {
            UnaryOp::ToBoolean => format!("bool({operand})"),
            UnaryOp::ToNumber => format!("float({operand})"),
            UnaryOp::Math(math) => format!("{}({operand})", math.name()),
            _ => format!("{}{operand}", op.name()),
        })
    }

    fn emit_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> ShaderResult {
        if matches!(op, BinaryOp::RegexMatch | BinaryOp::RegexNotMatch) {
            return Err(unsupported(format!("\"{}\"", op.symbol())));
        }
        let left = self.emit(left)?;
        let right = self.emit(right)?;
        Ok(match op {
            BinaryOp::Mod => format!("mod({left}, {right})"),
            BinaryOp::StrictEq => format!("({left} == {right})"),
            BinaryOp::StrictNe => format!("({left} != {right})"),
            BinaryOp::Math(BinaryMath::Atan2) => format!("atan({left}, {right})"),
            BinaryOp::Math(math) => format!("{}({left}, {right})", math.name()),
            _ => format!("({left} {} {right})", op.symbol()),
        })
    }

    fn emit_member(&mut self, object: &MemberObject, property: &Node) -> ShaderResult {
        let object = match object {
            MemberObject::Feature => {
                return match property {
                    Node::LiteralString(name) => Ok(format!("{}{name}", self.prefix)),
                    _ => Err(unsupported("computed feature property")),
                };
            }
            MemberObject::Value(object) => self.emit(object)?,
        };
        if let Some(index) = component_index(property) {
            return Ok(format!("{object}[{index}]"));
        }
        let property = self.emit(property)?;
        Ok(format!("{object}[int({property})]"))
    }

    fn emit_color(&mut self, func: ColorFn, args: &[Node]) -> ShaderResult {
        let channels = match func {
            ColorFn::Color => args
                .iter()
                .enumerate()
                .map(|(position, arg)| match arg {
                    Node::LiteralString(text) if position == 0 => css_color_text(text),
                    _ => self.emit(arg),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => self.emit_list(args)?,
        };

        match func {
            ColorFn::Color => match channels.as_slice() {
                [] => Ok("vec4(1.0)".to_string()),
                [rgb] => Ok(format!("vec4({rgb}, 1.0)")),
                [rgb, alpha, ..] => {
                    self.mark_alpha(alpha);
                    Ok(format!("vec4({rgb}, {alpha})"))
                }
            },
            ColorFn::Rgb | ColorFn::Rgba => {
                let alpha = channels.get(3).map_or("1.0", String::as_str);
                if func == ColorFn::Rgba {
                    self.mark_alpha(alpha);
                }
                if let Some([r, g, b, a]) = literal_channels(args) {
                    let color = Color::from_bytes(r as f32, g as f32, b as f32, 255.0);
                    let alpha = if func == ColorFn::Rgba {
                        number_text(a)
                    } else {
                        "1.0".to_string()
                    };
                    return Ok(format!(
                        "vec4({}, {}, {}, {alpha})",
                        channel_text(color.red),
                        channel_text(color.green),
                        channel_text(color.blue)
                    ));
                }
                Ok(format!(
                    "vec4({} / 255.0, {} / 255.0, {} / 255.0, {alpha})",
                    channels[0], channels[1], channels[2]
                ))
            }
            ColorFn::Hsl | ColorFn::Hsla => {
                if let Some([h, s, l, a]) = literal_channels(args) {
                    let alpha = if func == ColorFn::Hsla { a } else { 1.0 };
                    let color = Color::from_hsl(h, s, l, alpha);
                    if color.alpha != 1.0 {
                        self.state.translucent = true;
                    }
                    return Ok(vec4_text(color));
                }
                let alpha = channels.get(3).map_or("1.0", String::as_str);
                self.mark_alpha(alpha);
                Ok(format!(
                    "vec4(czm_HSLToRGB(vec3({}, {}, {})), {alpha})",
                    channels[0], channels[1], channels[2]
                ))
            }
        }
    }

    fn mark_alpha(&mut self, alpha: &str) {
        if alpha != "1.0" {
            self.state.translucent = true;
        }
    }
}

fn literal_channels(args: &[Node]) -> Option<[f64; 4]> {
    let mut channels = [1.0; 4];
    for (slot, arg) in channels.iter_mut().zip(args) {
        *slot = arg.as_number()?;
    }
    (args.len() >= 3).then_some(channels)
}

fn component_index(property: &Node) -> Option<usize> {
    match property {
        Node::LiteralString(name) => match name.as_str() {
            "red" | "x" => Some(0),
            "green" | "y" => Some(1),
            "blue" | "z" => Some(2),
            "alpha" | "w" => Some(3),
            _ => None,
        },
        Node::LiteralNumber(value) if value.fract() == 0.0 && (0.0..=3.0).contains(value) => {
            Some(*value as usize)
        }
        _ => None,
    }
}

fn css_color_text(text: &str) -> ShaderResult {
    let color = Color::from_css_str(text)
        .ok_or_else(|| unsupported(format!("'{text}' is not a CSS color")))?;
    Ok(format!(
        "vec3({}, {}, {})",
        channel_text(color.red),
        channel_text(color.green),
        channel_text(color.blue)
    ))
}

fn vec4_text(color: Color) -> String {
    format!(
        "vec4({}, {}, {}, {})",
        channel_text(color.red),
        channel_text(color.green),
        channel_text(color.blue),
        channel_text(color.alpha)
    )
}

fn number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.1}")
    } else {
        format_number(value)
    }
}

fn channel_text(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "shader_test.rs"]
mod tests;
