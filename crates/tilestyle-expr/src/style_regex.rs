use regex::{Regex, RegexBuilder};
use std::fmt;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("invalid regular expression flags `{0}`")]
    InvalidFlags(String),
    #[error("invalid regular expression /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[derive(Debug, Clone)]
pub struct StyleRegex {
    source: String,
    flags: String,
    regex: Regex,
}

impl StyleRegex {
    pub fn new(pattern: &str, flags: &str) -> Result<Self, RegexError> {
        let mut builder = RegexBuilder::new(pattern);
        let mut seen = String::with_capacity(flags.len());
        for flag in flags.chars() {
            if seen.contains(flag) {
                return Err(RegexError::InvalidFlags(flags.to_string()));
            }
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'y' | 'u' => {}
                _ => return Err(RegexError::InvalidFlags(flags.to_string())),
            }
            seen.push(flag);
        }

        let regex = builder.build().map_err(|err| RegexError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn test(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// Returns `None` when nothing matched, `Some(None)` when the first capture group did not
    /// participate, otherwise the text of the first capture group.
    pub fn exec<'h>(&self, haystack: &'h str) -> Option<Option<&'h str>> {
        let captures = self.regex.captures(haystack)?;
        Some(captures.get(1).map(|group| group.as_str()))
    }
}

impl PartialEq for StyleRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Display for StyleRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.source.is_empty() {
            "(?:)"
        } else {
            self.source.as_str()
        };
        write!(f, "/{source}/{}", self.flags)
    }
}

#[cfg(test)]
#[path = "style_regex_test.rs"]
mod tests;
