use std::{fmt, slice};

/// The value captured for a single route parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamValue {
    /// A parameter captured once, e.g. `:id`.
    Single(String),
    /// A repeated parameter split on its delimiter, e.g. `:path*`.
    Repeated(Vec<String>),
}

impl ParamValue {
    /// Returns the value if this is a single capture.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            ParamValue::Repeated(_) => None,
        }
    }

    /// Returns the segments if this is a repeated capture.
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            ParamValue::Single(_) => None,
            ParamValue::Repeated(values) => Some(values),
        }
    }
}

/// Repeated values are joined with `/`, whatever delimiter they were split
/// on. Use [`ParamValue::as_slice`] to get at the individual segments.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Single(value) => f.write_str(value),
            ParamValue::Repeated(values) => f.write_str(&values.join("/")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for ParamValue {
    fn from(values: Vec<S>) -> Self {
        ParamValue::Repeated(values.into_iter().map(Into::into).collect())
    }
}

/// The parameters captured along a chain of matched routes.
///
/// Parameters are kept in the order they were first captured, ancestors
/// before descendants. A descendant that captures a name again replaces
/// the value in place.
///
/// ```rust
/// # use routeit::{Outcome, Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router: Router<String> = Router::new(
///     Route::new("/users/:id").action(|_, params| {
///         // Get a specific value by name.
///         let id = params.get("id").and_then(|v| v.as_str()).unwrap_or_default();
///
///         // Iterate through the keys and values.
///         for (key, value) in params.iter() {
///             println!("key: {}, value: {}", key, value);
///         }
///
///         Ok(Outcome::Produced(id.to_owned()))
///     }),
/// )?;
///
/// assert_eq!(router.resolve("/users/1")?, "1");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters in the list.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a value is registered under the given name.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.get(name).is_some()
    }

    /// Returns the value registered under the given name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&ParamValue> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns an iterator over the parameters in the list.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter {
            inner: self.entries.iter(),
        }
    }

    // Inserts a value, replacing an existing one with the same name in place.
    pub(crate) fn insert(&mut self, name: &str, value: ParamValue) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_owned(), value)),
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = ParamsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the names and values of a route's [parameters](crate::Params).
pub struct ParamsIter<'ps> {
    inner: slice::Iter<'ps, (String, ParamValue)>,
}

impl<'ps> Iterator for ParamsIter<'ps> {
    type Item = (&'ps str, &'ps ParamValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }
}

impl ExactSizeIterator for ParamsIter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order() {
        let mut params = Params::new();
        params.insert("hello", "hello".into());
        params.insert("world", "world".into());
        params.insert("hello", "again".into());

        let got = params
            .iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            got,
            vec![("hello", "again".to_owned()), ("world", "world".to_owned())]
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn repeated_values() {
        let mut params = Params::new();
        params.insert("path", vec!["a", "b", "c"].into());

        let value = params.get("path").unwrap();
        assert_eq!(value.as_slice(), Some(&["a".to_owned(), "b".into(), "c".into()][..]));
        assert_eq!(value.as_str(), None);
        assert_eq!(value.to_string(), "a/b/c");
    }

    #[test]
    fn missing() {
        let params = Params::new();
        assert!(params.get("").is_none());
        assert!(!params.contains("id"));
        assert!(params.is_empty());
    }
}
