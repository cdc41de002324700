use crate::error::Error;
use crate::matches::Match;
use crate::params::Params;
use crate::pattern::ParamKey;
use crate::route::RouteRef;
use crate::router::Router;
use crate::tree::RouteId;

/// How to continue a resolution from within an action.
///
/// ```rust
/// use routeit::{Continuation, Outcome, Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router: Router<String> = Router::new(vec![
///     Route::new("/admin").children([
///         Route::new("/users").action(|_, _| Ok(Outcome::Produced("users".to_owned()))),
///     ]).action(|ctx, _| {
///         // only look below "/admin"
///         let scope = ctx.route().id();
///         match ctx.next_with(Continuation::peek(scope))? {
///             Some(page) => Ok(Outcome::Produced(format!("admin > {}", page))),
///             None => Ok(Outcome::Produced("admin".to_owned())),
///         }
///     }),
/// ])?;
///
/// assert_eq!(router.resolve("/admin/users")?, "admin > users");
/// assert_eq!(router.resolve("/admin")?, "admin");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Continuation {
    pub(crate) resume: bool,
    pub(crate) scope: Option<RouteId>,
    pub(crate) skip_current: bool,
}

impl Continuation {
    /// Looks for the next candidate that produces a value, but only among the
    /// descendants of `scope`.
    ///
    /// The first candidate outside of the scope is kept for the rest of the
    /// resolution, and the continuation yields `None`.
    pub fn peek(scope: RouteId) -> Self {
        Continuation {
            resume: false,
            scope: Some(scope),
            skip_current: false,
        }
    }

    /// Continues the resolution with the next candidate, wherever it is in the
    /// tree. Fails with [`Error::NotFound`] if no candidate produces a value.
    pub fn resume() -> Self {
        Continuation {
            resume: true,
            scope: None,
            skip_current: false,
        }
    }

    /// Abandons the subtree of the most recently matched route before
    /// pulling the next candidate.
    pub fn skip_current(mut self) -> Self {
        self.skip_current = true;
        self
    }
}

// The resolution state shared by every context of a single `resolve` call.
pub(crate) trait Driver<T> {
    fn step(&mut self, continuation: Continuation) -> Result<Option<T>, Error>;
}

/// The state of a resolution, handed to the action of each candidate route.
pub struct Context<'a, T, C = ()> {
    router: &'a Router<T, C>,
    data: &'a C,
    pathname: &'a str,
    matched: Match,
    driver: &'a mut dyn Driver<T>,
}

impl<'a, T, C> Context<'a, T, C> {
    pub(crate) fn new(
        router: &'a Router<T, C>,
        data: &'a C,
        pathname: &'a str,
        matched: Match,
        driver: &'a mut dyn Driver<T>,
    ) -> Self {
        Context {
            router,
            data,
            pathname,
            matched,
            driver,
        }
    }

    /// The router performing the resolution.
    pub fn router(&self) -> &'a Router<T, C> {
        self.router
    }

    /// The caller's context data.
    pub fn data(&self) -> &'a C {
        self.data
    }

    /// The full pathname being resolved, including the base URL.
    pub fn pathname(&self) -> &'a str {
        self.pathname
    }

    /// The route being tried.
    pub fn route(&self) -> RouteRef<'a, T, C> {
        RouteRef {
            router: self.router,
            id: self.matched.route(),
        }
    }

    /// Everything matched by the route's ancestors, including the router's
    /// base URL.
    pub fn base_url(&self) -> &str {
        self.matched.base_url()
    }

    /// The portion of the pathname matched by the route.
    pub fn path(&self) -> &str {
        self.matched.path()
    }

    /// The parameter keys of the route and its ancestors.
    pub fn keys(&self) -> &[ParamKey] {
        self.matched.keys()
    }

    /// The parameters captured by the route and its ancestors.
    pub fn params(&self) -> &Params {
        self.matched.params()
    }

    /// The match this context was built for.
    pub fn matched(&self) -> &Match {
        &self.matched
    }

    /// Resolves the next candidate among the descendants of this route.
    ///
    /// Returns `None` if none of them produce a value; resolution then
    /// carries on after this route returns.
    pub fn next(&mut self) -> Result<Option<T>, Error> {
        let scope = self.matched.route();
        self.driver.step(Continuation::peek(scope))
    }

    /// Resolves the next candidate anywhere in the tree.
    pub fn resume(&mut self) -> Result<T, Error> {
        match self.driver.step(Continuation::resume())? {
            Some(value) => Ok(value),
            None => Err(Error::not_found(self.pathname)),
        }
    }

    /// Resolves the next candidate as described by `continuation`.
    pub fn next_with(&mut self, continuation: Continuation) -> Result<Option<T>, Error> {
        self.driver.step(continuation)
    }
}
