//! Glob-style `MATCH` patterns for hash scans.
//!
//! Supports the Redis glob dialect: `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and
//! `\` to escape the next character. As in Redis, a `[` without a closing
//! `]` opens a class that runs to the end of the pattern. Patterns are
//! translated once into an anchored regular expression.

use regex::Regex;

use crate::error::{StoreError, StoreResult};

/// Pattern matching every field.
pub const MATCH_ALL: &str = "*";

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// `None` for [`MATCH_ALL`], which needs no regex.
    regex: Option<Regex>,
}

impl Pattern {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPattern`] if the translated expression
    /// does not compile (e.g. a reversed character range).
    pub fn new(glob: &str) -> StoreResult<Self> {
        if glob == MATCH_ALL {
            return Ok(Self { regex: None });
        }
        let regex = Regex::new(&glob_to_regex(glob))
            .map_err(|err| StoreError::InvalidPattern(err.to_string()))?;
        Ok(Self { regex: Some(regex) })
    }

    /// Returns `true` if `text` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.as_ref().map_or(true, |re| re.is_match(text))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push_str("(?s)^");

    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => push_literal(&mut out, escaped),
                None => push_literal(&mut out, '\\'),
            },
            '[' => {
                // An unterminated class runs to the end of the pattern.
                let mut class = String::new();
                if chars.peek() == Some(&'^') {
                    chars.next();
                    class.push('^');
                }
                while let Some(inner) = chars.next() {
                    match inner {
                        ']' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                push_class_literal(&mut class, escaped);
                            }
                        }
                        '-' => class.push('-'),
                        other => push_class_literal(&mut class, other),
                    }
                }
                if class.is_empty() {
                    // `[]` matches nothing
                    out.push_str("[^\\s\\S]");
                } else if class == "^" {
                    // `[^]` matches any one character
                    out.push('.');
                } else {
                    out.push('[');
                    out.push_str(&class);
                    out.push(']');
                }
            }
            other => push_literal(&mut out, other),
        }
    }

    out.push('$');
    out
}

fn push_literal(out: &mut String, c: char) {
    out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '[' | ']' | '\\' | '^' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}
