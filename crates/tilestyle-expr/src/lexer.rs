#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    True,
    False,
    Null,
    Operator,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,
    Question,
    Colon,
    Eof,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },
    #[error("unterminated string at {pos}")]
    UnterminatedString { pos: usize },
    #[error("invalid number literal at {pos}: {literal}")]
    InvalidNumber { literal: String, pos: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable {
    unary: Vec<String>,
    binary: Vec<(String, u8)>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        let binary = [
            ("||", 1),
            ("&&", 2),
            ("|", 3),
            ("^", 4),
            ("&", 5),
            ("==", 6),
            ("!=", 6),
            ("===", 6),
            ("!==", 6),
            ("<", 7),
            (">", 7),
            ("<=", 7),
            (">=", 7),
            ("<<", 8),
            (">>", 8),
            (">>>", 8),
            ("+", 9),
            ("-", 9),
            ("*", 10),
            ("/", 10),
            ("%", 10),
        ];
        Self {
            unary: ["-", "!", "~", "+"].iter().map(|op| op.to_string()).collect(),
            binary: binary
                .iter()
                .map(|(op, precedence)| (op.to_string(), *precedence))
                .collect(),
        }
    }
}

impl OperatorTable {
    pub fn add_binary_op(&mut self, symbol: &str, precedence: u8) {
        if let Some(entry) = self.binary.iter_mut().find(|(op, _)| op == symbol) {
            entry.1 = precedence;
            return;
        }
        self.binary.push((symbol.to_string(), precedence));
    }

    pub fn add_unary_op(&mut self, symbol: &str) {
        if !self.is_unary(symbol) {
            self.unary.push(symbol.to_string());
        }
    }

    pub fn is_unary(&self, symbol: &str) -> bool {
        self.unary.iter().any(|op| op == symbol)
    }

    pub fn binary_precedence(&self, symbol: &str) -> Option<u8> {
        self.binary
            .iter()
            .find(|(op, _)| op == symbol)
            .map(|(_, precedence)| *precedence)
    }

    fn symbols_longest_first(&self) -> Vec<Vec<char>> {
        let mut symbols = self
            .unary
            .iter()
            .chain(self.binary.iter().map(|(op, _)| op))
            .map(|op| op.chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        symbols.sort_by(|left, right| right.len().cmp(&left.len()));
        symbols.dedup();
        symbols
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(input, &OperatorTable::default())
}

pub fn tokenize_with(input: &str, operators: &OperatorTable) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = input.chars().collect();
    let symbols = operators.symbols_longest_first();
    let mut index = 0usize;
    let mut tokens = Vec::new();

    while index < chars.len() {
        let ch = chars[index];
        if ch.is_whitespace() {
            index += 1;
            continue;
        }

        if is_identifier_start(ch) {
            tokens.push(consume_identifier(&chars, &mut index));
            continue;
        }

        if ch.is_ascii_digit() || (ch == '.' && next_is_digit(&chars, index)) {
            tokens.push(consume_number(&chars, &mut index)?);
            continue;
        }

        if ch == '\'' || ch == '"' {
            tokens.push(consume_string(&chars, &mut index)?);
            continue;
        }

        if let Some(token) = punctuation(ch, index) {
            tokens.push(token);
            index += 1;
            continue;
        }

        let token = consume_operator(&chars, &mut index, &symbols)?;
        tokens.push(token);
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        pos: chars.len(),
    });

    Ok(tokens)
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$' || (ch as u32) >= 128
}

fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit()
}

fn next_is_digit(chars: &[char], index: usize) -> bool {
    chars.get(index + 1).is_some_and(|ch| ch.is_ascii_digit())
}

fn consume_identifier(chars: &[char], index: &mut usize) -> Token {
    let start = *index;
    *index += 1;
    while *index < chars.len() && is_identifier_part(chars[*index]) {
        *index += 1;
    }
    let lexeme: String = chars[start..*index].iter().collect();
    let kind = match lexeme.as_str() {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Identifier,
    };
    Token {
        kind,
        lexeme,
        pos: start,
    }
}

fn consume_number(chars: &[char], index: &mut usize) -> Result<Token, LexError> {
    let start = *index;
    while *index < chars.len() && chars[*index].is_ascii_digit() {
        *index += 1;
    }

    if *index < chars.len() && chars[*index] == '.' {
        *index += 1;
        while *index < chars.len() && chars[*index].is_ascii_digit() {
            *index += 1;
        }
    }

    if *index < chars.len() && (chars[*index] == 'e' || chars[*index] == 'E') {
        *index += 1;
        if *index < chars.len() && (chars[*index] == '+' || chars[*index] == '-') {
            *index += 1;
        }
        if *index >= chars.len() || !chars[*index].is_ascii_digit() {
            return Err(LexError::InvalidNumber {
                literal: chars[start..*index].iter().collect(),
                pos: start,
            });
        }
        while *index < chars.len() && chars[*index].is_ascii_digit() {
            *index += 1;
        }
    }

    let lexeme: String = chars[start..*index].iter().collect();
    if *index < chars.len() && is_identifier_start(chars[*index]) {
        return Err(LexError::InvalidNumber {
            literal: format!("{lexeme}{}", chars[*index]),
            pos: start,
        });
    }

    Ok(Token {
        kind: TokenKind::Number,
        lexeme,
        pos: start,
    })
}

fn consume_string(chars: &[char], index: &mut usize) -> Result<Token, LexError> {
    let quote = chars[*index];
    let start = *index;
    *index += 1;
    let mut out = String::new();
    let mut terminated = false;

    while *index < chars.len() {
        let current = chars[*index];
        if current == quote {
            *index += 1;
            terminated = true;
            break;
        }
        if current == '\\' {
            *index += 1;
            if *index >= chars.len() {
                return Err(LexError::UnterminatedString { pos: start });
            }
            out.push(decode_escape(chars[*index]));
            *index += 1;
            continue;
        }
        out.push(current);
        *index += 1;
    }

    if !terminated {
        return Err(LexError::UnterminatedString { pos: start });
    }

    Ok(Token {
        kind: TokenKind::String,
        lexeme: out,
        pos: start,
    })
}

fn decode_escape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'v' => '\u{b}',
        other => other,
    }
}

fn punctuation(ch: char, pos: usize) -> Option<Token> {
    let kind = match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        '.' => TokenKind::Dot,
        '?' => TokenKind::Question,
        ':' => TokenKind::Colon,
        _ => return None,
    };
    Some(Token {
        kind,
        lexeme: ch.to_string(),
        pos,
    })
}

fn consume_operator(chars: &[char], index: &mut usize, symbols: &[Vec<char>]) -> Result<Token, LexError> {
    let pos = *index;
    let rest = &chars[pos..];
    let Some(symbol) = symbols.iter().find(|symbol| rest.starts_with(symbol)) else {
        return Err(LexError::UnexpectedCharacter { ch: chars[pos], pos });
    };
    *index += symbol.len();
    Ok(Token {
        kind: TokenKind::Operator,
        lexeme: symbol.iter().collect(),
        pos,
    })
}

#[cfg(test)]
#[path = "lexer_test.rs"]
mod tests;
