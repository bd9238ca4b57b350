//! Mask compiler
//!
//! Turns a path template ("mask") into an anchored regex that matches a request
//! path and captures its named parameters.
//!
//! ## Grammar
//!
//! - literal text is matched verbatim
//! - `{name}` captures one or more characters other than `/`
//! - `{name:pattern}` captures with a caller-supplied regex instead
//! - `[...]` makes the enclosed sequence optional; brackets nest
//!
//! ```rust
//! use maskrouter::router::MaskPattern;
//!
//! let mask = MaskPattern::compile("/post/[{id:\\d+}]").unwrap();
//! assert!(mask.captures("/post/").unwrap().is_empty());
//! assert_eq!(mask.captures("/post/99").unwrap()[0].1, "99");
//! assert!(mask.captures("/post/abc").is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::core::ParamVec;
use super::error::MalformedMaskError;

/// Default sub-pattern for `{name}`: one or more non-slash characters
pub const DEFAULT_SEGMENT_PATTERN: &str = "[^/]+";

// `{name}` / `{name:pattern}` or a single bracket. Neither part may contain braces.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{([^{}:]*)(?::([^{}]*))?\}|\[|\]").expect("mask token regex is valid")
});

/// One lexical element of a mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskToken {
    /// Text matched verbatim
    Literal(String),
    /// Named capture, with an optional custom sub-pattern
    Param {
        name: String,
        pattern: Option<String>,
    },
    /// `[`
    OptionalStart,
    /// `]`
    OptionalEnd,
}

impl fmt::Display for MaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(text) => write!(f, "literal({})", text),
            MaskToken::Param {
                name,
                pattern: Some(pattern),
            } => write!(f, "param({}:{})", name, pattern),
            MaskToken::Param {
                name,
                pattern: None,
            } => write!(f, "param({})", name),
            MaskToken::OptionalStart => f.write_str("optional["),
            MaskToken::OptionalEnd => f.write_str("]optional"),
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Mask without parameters or brackets; plain string equality
    Literal,
    Pattern {
        regex: Regex,
        param_names: Vec<Arc<str>>,
    },
}

/// A compiled mask
#[derive(Debug, Clone)]
pub struct MaskPattern {
    mask: String,
    tokens: Vec<MaskToken>,
    matcher: Matcher,
}

impl MaskPattern {
    /// Compile a mask
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMaskError`] when brackets do not balance, a brace
    /// appears outside a parameter token, a parameter name is not an
    /// identifier, or a custom sub-pattern is not a valid regex.
    pub fn compile(mask: &str) -> Result<Self, MalformedMaskError> {
        let tokens = tokenize(mask)?;
        let pattern = build_pattern(mask, &tokens)?;

        // No parameter token: the path must equal the mask byte for byte,
        // brackets included.
        let is_literal = !tokens.iter().any(|t| matches!(t, MaskToken::Param { .. }));
        if is_literal {
            return Ok(Self {
                mask: mask.to_string(),
                tokens,
                matcher: Matcher::Literal,
            });
        }

        let regex = Regex::new(&pattern).map_err(|e| MalformedMaskError::InvalidPattern {
            mask: mask.to_string(),
            reason: e.to_string(),
        })?;
        let param_names = regex.capture_names().flatten().map(Arc::from).collect();

        Ok(Self {
            mask: mask.to_string(),
            tokens,
            matcher: Matcher::Pattern { regex, param_names },
        })
    }

    /// The source mask
    #[must_use]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    #[must_use]
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// True when the mask has no parameter tokens
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal)
    }

    /// The generated regex source, `None` for literal masks
    #[must_use]
    pub fn regex_source(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Literal => None,
            Matcher::Pattern { regex, .. } => Some(regex.as_str()),
        }
    }

    /// Parameter names in mask order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        let names: &[Arc<str>] = match &self.matcher {
            Matcher::Literal => &[],
            Matcher::Pattern { param_names, .. } => param_names,
        };
        names.iter().map(|n| n.as_ref())
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => self.mask == path,
            Matcher::Pattern { regex, .. } => regex.is_match(path),
        }
    }

    /// Match `path` against the mask and return the captured parameters.
    ///
    /// `None` means no match. Optional parameters that did not participate in
    /// the match are absent from the result.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        match &self.matcher {
            Matcher::Literal => (self.mask == path).then(ParamVec::new),
            Matcher::Pattern { regex, param_names } => {
                let caps = regex.captures(path)?;
                let mut params = ParamVec::new();
                for name in param_names {
                    if let Some(value) = caps.name(name) {
                        params.push((Arc::clone(name), value.as_str().to_string()));
                    }
                }
                Some(params)
            }
        }
    }
}

impl fmt::Display for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mask)
    }
}

/// Split a mask into tokens.
///
/// # Errors
///
/// Fails on stray braces and on parameter names that are not identifiers.
pub fn tokenize(mask: &str) -> Result<Vec<MaskToken>, MalformedMaskError> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(mask) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_literal(mask, &mask[last..whole.start()], &mut tokens)?;
        last = whole.end();

        match whole.as_str() {
            "[" => tokens.push(MaskToken::OptionalStart),
            "]" => tokens.push(MaskToken::OptionalEnd),
            _ => {
                let name = caps.get(1).map_or("", |m| m.as_str()).trim();
                if !is_identifier(name) {
                    return Err(MalformedMaskError::InvalidParameterName {
                        mask: mask.to_string(),
                        name: name.to_string(),
                    });
                }
                let pattern = match caps.get(2) {
                    None => None,
                    Some(p) if p.as_str().trim().is_empty() => {
                        return Err(MalformedMaskError::UnexpectedToken {
                            mask: mask.to_string(),
                            token: whole.as_str().to_string(),
                        });
                    }
                    Some(p) => Some(p.as_str().trim().to_string()),
                };
                tokens.push(MaskToken::Param {
                    name: name.to_string(),
                    pattern,
                });
            }
        }
    }
    push_literal(mask, &mask[last..], &mut tokens)?;

    Ok(tokens)
}

fn push_literal(
    mask: &str,
    text: &str,
    tokens: &mut Vec<MaskToken>,
) -> Result<(), MalformedMaskError> {
    if text.is_empty() {
        return Ok(());
    }
    if text.contains(['{', '}']) {
        return Err(MalformedMaskError::UnexpectedToken {
            mask: mask.to_string(),
            token: text.to_string(),
        });
    }
    tokens.push(MaskToken::Literal(text.to_string()));
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build the anchored regex source for a token sequence.
///
/// Tokens are walked from the end of the mask towards the start so that each
/// `[` wraps everything already emitted up to its matching `]`. Walking
/// backwards, `]` opens a level and `[` closes it; the depth may never go
/// below zero and must be zero at the start of the mask.
fn build_pattern(mask: &str, tokens: &[MaskToken]) -> Result<String, MalformedMaskError> {
    let unbalanced = || MalformedMaskError::UnbalancedBrackets {
        mask: mask.to_string(),
    };

    let mut depth: usize = 0;
    let mut parts: Vec<String> = Vec::with_capacity(tokens.len() + 2);
    parts.push("$".to_string());

    for token in tokens.iter().rev() {
        match token {
            MaskToken::Literal(text) => parts.push(regex::escape(text)),
            MaskToken::OptionalEnd => {
                depth += 1;
                parts.push(")?".to_string());
            }
            MaskToken::OptionalStart => {
                depth = depth.checked_sub(1).ok_or_else(unbalanced)?;
                parts.push("(?:".to_string());
            }
            MaskToken::Param { name, pattern } => {
                let pattern = pattern.as_deref().unwrap_or(DEFAULT_SEGMENT_PATTERN);
                parts.push(format!("(?P<{}>{})", name, pattern));
            }
        }
    }

    if depth != 0 {
        return Err(unbalanced());
    }

    parts.push("^".to_string());
    parts.reverse();
    Ok(parts.concat())
}
