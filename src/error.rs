use std::error::Error as StdError;

/// Represents errors that can occur when building a [`Router`](crate::Router).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A route was registered with a pattern that cannot be compiled.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// Why the pattern was rejected.
        source: PatternError,
    },
}

/// Represents errors that can occur when compiling a route pattern.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// A parameter group was opened with `(` but never closed.
    #[error("unclosed parameter group starting at offset {0}")]
    UnclosedGroup(usize),
    /// A parameter group contains another group.
    #[error("nested parameter group at offset {0}")]
    NestedGroup(usize),
    /// A parameter group has no expression, e.g. `:id()`.
    #[error("empty parameter group at offset {0}")]
    EmptyGroup(usize),
    /// The generated expression was rejected by the regex engine.
    #[error("{0}")]
    InvalidRegex(String),
}

/// A failed resolution.
///
/// ```
/// use routeit::{Error, Outcome, Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router: Router<&str> = Router::new(
///     Route::new("/home").action(|_, _| Ok(Outcome::Produced("Welcome!"))),
/// )?;
///
/// // no routes match
/// let err = router.resolve("/foobar").unwrap_err();
/// assert!(matches!(err, Error::NotFound { .. }));
/// assert_eq!(err.status(), Some(404));
/// # Ok(())
/// # }
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No route produced a value for the pathname.
    #[error("route not found: '{pathname}'")]
    NotFound {
        /// The pathname that was being resolved.
        pathname: String,
    },
    /// A pattern failed to compile while matching.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// An action or resolve hook failed.
    #[error(transparent)]
    Handler(Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary failure raised by an action or resolve hook.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error::Handler(err.into())
    }

    /// The HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub(crate) fn not_found(pathname: &str) -> Self {
        Error::NotFound {
            pathname: pathname.to_owned(),
        }
    }
}
