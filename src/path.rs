use crate::cache::PatternCache;
use crate::error::PatternError;
use crate::params::{ParamValue, Params};
use crate::pattern::{Mode, ParamKey};

use percent_encoding::percent_decode_str;

/// The result of matching a single route pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PathMatch {
    /// The portion of the pathname consumed by the pattern.
    pub(crate) path: String,
    /// Parent keys followed by this pattern's keys.
    pub(crate) keys: Vec<ParamKey>,
    /// Parent parameters merged with this pattern's captures.
    pub(crate) params: Params,
}

/// Matches a route pattern against the start of `pathname`.
///
/// A capture replaces an inherited parameter of the same name only if it
/// captured something, so optional parameters that did not participate in
/// the match leave the parent's value in place.
pub(crate) fn match_path(
    cache: &PatternCache,
    pattern: &str,
    mode: Mode,
    pathname: &str,
    parent_keys: &[ParamKey],
    parent_params: &Params,
) -> Result<Option<PathMatch>, PatternError> {
    let compiled = cache.get(pattern, mode)?;

    let exec = match compiled.exec(pathname) {
        Some(exec) => exec,
        None => return Ok(None),
    };

    let mut params = parent_params.clone();
    for (i, key) in compiled.keys().iter().enumerate() {
        let value = exec.value(i);

        if value.is_none() && params.contains(key.name()) {
            continue;
        }

        let value = match value {
            _ if key.repeat() => ParamValue::Repeated(match value {
                Some(value) if !value.is_empty() => {
                    value.split(key.delimiter()).map(decode).collect()
                }
                _ => Vec::new(),
            }),
            Some(value) => ParamValue::Single(decode(value)),
            None => continue,
        };

        params.insert(key.name(), value);
    }

    let mut path = exec.matched();

    // the separator is left for the children to match
    if mode == Mode::Prefix {
        path = path.strip_suffix('/').unwrap_or(path);
    }

    let mut keys = parent_keys.to_vec();
    keys.extend_from_slice(compiled.keys());

    Ok(Some(PathMatch {
        path: path.to_owned(),
        keys,
        params,
    }))
}

// Percent-decodes a captured value, keeping the raw text if it contains a
// malformed escape or does not decode to valid UTF-8.
fn decode(value: &str) -> String {
    if !well_formed(value) {
        return value.to_owned();
    }

    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_owned(),
    }
}

// Every `%` must start a two hex digit escape.
fn well_formed(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().filter(|(_, &b)| b == b'%').all(|(i, _)| {
        matches!(bytes.get(i + 1..i + 3), Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
    })
}
