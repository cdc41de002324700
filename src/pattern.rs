//! Route pattern compilation.
//!
//! Patterns are compiled into anchored regular expressions:
//! ```ignore
//!  Syntax       Type
//!  :name        named parameter, matches up to the next delimiter
//!  :name(re)    named parameter with a custom expression
//!  (re)         unnamed parameter, keyed by its position (0, 1, ...)
//!  :name?       optional parameter
//!  :name+       one or more segments
//!  :name*       zero or more segments
//!  \c           the literal character `c`
//! ```
//!
//! A `/` or `.` directly before a parameter is that parameter's prefix. It is
//! only required when the parameter is present:
//! ```ignore
//!  Pattern: /posts/:id?
//!
//!  /posts        match: id=None
//!  /posts/1      match: id="1"
//! ```
use crate::error::PatternError;

use regex::{Captures, Regex, RegexBuilder};

const DEFAULT_DELIMITER: char = '/';
const DELIMITERS: &[char] = &['.', '/'];

// Bounds the memory a single route pattern may take once compiled.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// How much of a pathname a pattern must consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The pattern must match the entire remaining pathname.
    Terminal,
    /// The pattern must match a leading portion of the pathname, ending at a
    /// segment boundary.
    Prefix,
}

/// Metadata for a single capture group of a compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamKey {
    name: String,
    prefix: String,
    delimiter: char,
    optional: bool,
    repeat: bool,
    pattern: String,
}

impl ParamKey {
    /// The parameter name. Unnamed groups are named by their position.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The delimiter character consumed before the parameter, if any.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The character repeated captures are split on.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Whether the parameter may be absent.
    pub fn optional(&self) -> bool {
        self.optional
    }

    /// Whether the parameter captures one or more delimited segments.
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    /// The expression a single segment of this parameter must match.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[derive(Debug)]
enum Token {
    Literal(String),
    Param { key: ParamKey, partial: bool },
}

/// A compiled route pattern.
///
/// ```rust
/// use routeit::{Mode, Pattern};
///
/// let pattern = Pattern::new("/users/:id", Mode::Prefix).unwrap();
/// assert_eq!(pattern.keys()[0].name(), "id");
/// assert!(pattern.regex().is_match("/users/1/posts"));
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
    keys: Vec<ParamKey>,
}

impl Pattern {
    /// Compiles a case-insensitive pattern.
    pub fn new(source: &str, mode: Mode) -> Result<Pattern, PatternError> {
        Pattern::compile(source, mode, false)
    }

    /// Compiles a pattern, optionally matching case-sensitively.
    pub fn compile(source: &str, mode: Mode, case_sensitive: bool) -> Result<Pattern, PatternError> {
        let tokens = parse(source)?;

        let mut route = String::new();
        let mut keys = Vec::new();
        let mut end_delimited = tokens.is_empty();

        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Literal(text) => {
                    route.push_str(&regex::escape(text));
                    end_delimited = i == tokens.len() - 1 && text.ends_with(DELIMITERS);
                }
                Token::Param { key, partial } => {
                    let capture = if key.repeat {
                        format!(
                            "(?:{p})(?:{d}(?:{p}))*",
                            p = key.pattern,
                            d = regex::escape(&key.delimiter.to_string())
                        )
                    } else {
                        key.pattern.clone()
                    };

                    let prefix = regex::escape(&key.prefix);
                    match (key.optional, *partial) {
                        (true, true) => route.push_str(&format!("{prefix}({capture})?")),
                        (true, false) => route.push_str(&format!("(?:{prefix}({capture}))?")),
                        (false, _) => route.push_str(&format!("{prefix}({capture})")),
                    }

                    keys.push(key.clone());
                }
            }
        }

        // group 1 is always the matched text, parameters follow in order
        let delimiter = regex::escape(&DEFAULT_DELIMITER.to_string());
        let expr = match mode {
            Mode::Terminal => format!("^({route}{delimiter}?)$"),
            Mode::Prefix if end_delimited => format!("^({route}(?:{delimiter}$)?)"),
            Mode::Prefix => format!("^({route}(?:{delimiter}$)?)(?:{delimiter}|$)"),
        };

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(!case_sensitive)
            .size_limit(MAX_REGEX_SIZE)
            .dfa_size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|err| PatternError::InvalidRegex(err.to_string()))?;

        Ok(Pattern { regex, keys })
    }

    /// The capture metadata, in the order parameters appear in the pattern.
    pub fn keys(&self) -> &[ParamKey] {
        &self.keys
    }

    /// The underlying regular expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    // Returns the matched text and the raw capture for every key.
    pub(crate) fn exec<'p>(&self, pathname: &'p str) -> Option<Exec<'p>> {
        self.regex.captures(pathname).map(|captures| Exec { captures })
    }
}

pub(crate) struct Exec<'p> {
    captures: Captures<'p>,
}

impl<'p> Exec<'p> {
    pub(crate) fn matched(&self) -> &'p str {
        self.captures.get(1).map_or("", |m| m.as_str())
    }

    pub(crate) fn value(&self, key_index: usize) -> Option<&'p str> {
        self.captures.get(key_index + 2).map(|m| m.as_str())
    }
}

fn parse(source: &str) -> Result<Vec<Token>, PatternError> {
    let chars = source.char_indices().collect::<Vec<_>>();

    let mut tokens = Vec::new();
    let mut path = String::new();
    // whether the last character of `path` was escaped
    let mut path_escaped = false;
    let mut unnamed = 0;
    let mut i = 0;

    while let Some(&(_, c)) = chars.get(i) {
        let (name, mut j) = match c {
            '\\' => {
                match chars.get(i + 1) {
                    Some(&(_, escaped)) => {
                        path.push(escaped);
                        path_escaped = true;
                        i += 2;
                    }
                    None => {
                        path.push(c);
                        path_escaped = false;
                        i += 1;
                    }
                }
                continue;
            }
            ':' => {
                let len = chars[i + 1..]
                    .iter()
                    .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
                    .count();

                // a colon without a name is a literal
                if len == 0 {
                    path.push(c);
                    path_escaped = false;
                    i += 1;
                    continue;
                }

                let name: String = chars[i + 1..i + 1 + len].iter().map(|(_, c)| c).collect();
                (Some(name), i + 1 + len)
            }
            '(' => (None, i),
            _ => {
                path.push(c);
                path_escaped = false;
                i += 1;
                continue;
            }
        };

        let mut group = None;
        if let Some(&(_, '(')) = chars.get(j) {
            let (expr, end) = parse_group(&chars, j)?;
            group = Some(expr);
            j = end;
        }

        let name = match name {
            Some(name) => name,
            None => {
                unnamed += 1;
                (unnamed - 1).to_string()
            }
        };

        let modifier = match chars.get(j) {
            Some(&(_, m @ ('?' | '*' | '+'))) => {
                j += 1;
                Some(m)
            }
            _ => None,
        };

        let mut prefix = None;
        if !path_escaped {
            if let Some(last) = path.chars().last().filter(|c| DELIMITERS.contains(c)) {
                path.pop();
                prefix = Some(last);
            }
        }

        if !path.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut path)));
        }
        path_escaped = false;

        let next = chars.get(j).map(|&(_, c)| c);
        let partial = matches!((prefix, next), (Some(p), Some(n)) if n != p);
        let delimiter = prefix.unwrap_or(DEFAULT_DELIMITER);

        let pattern = group.unwrap_or_else(|| {
            format!("[^{}]+?", regex::escape(&delimiter.to_string()))
        });

        tokens.push(Token::Param {
            key: ParamKey {
                name,
                prefix: prefix.map(String::from).unwrap_or_default(),
                delimiter,
                optional: matches!(modifier, Some('?' | '*')),
                repeat: matches!(modifier, Some('+' | '*')),
                pattern,
            },
            partial,
        });

        i = j;
    }

    if !path.is_empty() {
        tokens.push(Token::Literal(path));
    }

    Ok(tokens)
}

// Parses a `(...)` group starting at `start`, returning the expression and
// the index just past the closing parenthesis.
fn parse_group(chars: &[(usize, char)], start: usize) -> Result<(String, usize), PatternError> {
    let open = chars[start].0;
    let mut expr = String::new();
    let mut i = start + 1;

    loop {
        match chars.get(i) {
            None => return Err(PatternError::UnclosedGroup(open)),
            Some(&(_, '\\')) => match chars.get(i + 1) {
                Some(&(_, escaped)) => {
                    expr.push('\\');
                    expr.push(escaped);
                    i += 2;
                }
                None => return Err(PatternError::UnclosedGroup(open)),
            },
            Some(&(offset, '(')) => return Err(PatternError::NestedGroup(offset)),
            Some(&(_, ')')) => break,
            Some(&(_, c)) => {
                expr.push(c);
                i += 1;
            }
        }
    }

    if expr.is_empty() {
        return Err(PatternError::EmptyGroup(open));
    }

    Ok((expr, i + 1))
}
