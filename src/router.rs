//! `Router` resolves a pathname against a tree of routes and dispatches it to
//! the first route, in pre-order, whose action produces a value.
//!
//! Here is a simple example:
//! ```rust
//! use routeit::{Outcome, Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router: Router<String> = Router::new(vec![
//!     Route::new("/").action(|_, _| Ok(Outcome::Produced("Welcome!".to_owned()))),
//!     Route::new("/hello/:user").action(|_, params| {
//!         let user = params.get("user").map(ToString::to_string).unwrap_or_default();
//!         Ok(Outcome::Produced(format!("Hello, {}", user)))
//!     }),
//! ])?;
//!
//! assert_eq!(router.resolve("/hello/ferris")?, "Hello, ferris");
//! # Ok(())
//! # }
//! ```
//!
//! Routes with children only need to match a prefix of the pathname; the rest
//! is matched against their children:
//! ```ignore
//!  Route: /blog
//!    Route: /:category
//!      Route: /:post
//!
//!  /blog/rust/request-routers     candidates: /blog, /:category, /:post
//!  /blog/rust                     candidates: /blog, /:category
//!  /blog/rust/a/b                 candidates: /blog, /:category
//! ```
//!
//! Each candidate's action decides what happens next. Producing a value ends
//! the resolution. [`Outcome::Continue`] moves on to the next candidate,
//! which is the route's first matching child if it has one.
//! [`Outcome::Skip`] moves on as well, but never considers the route's
//! descendants. An action can also resolve the remaining candidates itself
//! through [`Context::next`] and decide what to do with the result.
use crate::cache::PatternCache;
use crate::context::{Context, Continuation, Driver};
use crate::error::{BuildError, Error};
use crate::handler::{DefaultResolver, Outcome, Resolve};
use crate::matches::{Match, Matches};
use crate::params::Params;
use crate::route::{Route, RouteRef};
use crate::tree::{Actions, RouteId, Tree};

use std::fmt;

type ErrorHandler<T, C> = dyn Fn(Error, &ErrorContext<'_, C>) -> Result<T, Error> + Send + Sync;

/// What was known about a resolution when it failed.
#[derive(Debug)]
pub struct ErrorContext<'a, C = ()> {
    /// The pathname being resolved.
    pub pathname: &'a str,
    /// The caller's context data.
    pub data: &'a C,
    /// The last candidate handed to an action, if any.
    pub matched: Option<&'a Match>,
}

/// A tree of routes and the options used to resolve pathnames against it.
pub struct Router<T, C = ()> {
    pub(crate) tree: Tree,
    pub(crate) actions: Actions<T, C>,
    cache: PatternCache,
    base_url: String,
    context: C,
    resolver: Box<dyn Resolve<T, C>>,
    error_handler: Option<Box<ErrorHandler<T, C>>>,
}

impl<T> Router<T, ()> {
    /// Builds a router with the default options.
    ///
    /// `routes` is either a single root route or a list of top-level routes.
    pub fn new(routes: impl Into<Route<T>>) -> Result<Self, BuildError> {
        Router::builder(routes).build()
    }
}

impl<T, C> Router<T, C> {
    /// Starts building a router whose context data defaults to `C::default()`.
    pub fn builder(routes: impl Into<Route<T, C>>) -> RouterBuilder<T, C>
    where
        C: Default,
    {
        Router::with_context(routes, C::default())
    }

    /// Starts building a router with the given context data, which is handed
    /// to every action through [`Context::data`].
    pub fn with_context(routes: impl Into<Route<T, C>>, context: C) -> RouterBuilder<T, C> {
        RouterBuilder {
            root: routes.into(),
            base_url: String::new(),
            context,
            case_sensitive: false,
            resolver: None,
            error_handler: None,
        }
    }

    /// Resolves a pathname with the router's context data.
    pub fn resolve(&self, pathname: &str) -> Result<T, Error> {
        self.dispatch(pathname, &self.context)
    }

    /// Resolves a pathname, handing `context` to the actions instead of the
    /// router's context data.
    pub fn resolve_with(&self, pathname: &str, context: &C) -> Result<T, Error> {
        self.dispatch(pathname, context)
    }

    /// The prefix stripped from every pathname before matching.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The router's context data.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The root route.
    pub fn root(&self) -> RouteRef<'_, T, C> {
        RouteRef {
            router: self,
            id: RouteId::ROOT,
        }
    }

    /// Looks up a route by id.
    pub fn route(&self, id: RouteId) -> Option<RouteRef<'_, T, C>> {
        self.tree
            .contains(id)
            .then(|| RouteRef { router: self, id })
    }

    /// The number of distinct patterns compiled so far.
    ///
    /// Patterns are compiled the first time they are matched against, once
    /// per pattern and mode.
    pub fn compiled_patterns(&self) -> usize {
        self.cache.len()
    }

    fn dispatch(&self, pathname: &str, data: &C) -> Result<T, Error> {
        let (result, matched) = match pathname.strip_prefix(self.base_url.as_str()) {
            Some(remaining) => {
                let mut walk = Walk {
                    router: self,
                    data,
                    pathname,
                    matches: Matches::new(
                        &self.tree,
                        &self.cache,
                        RouteId::ROOT,
                        self.base_url.clone(),
                        remaining.to_owned(),
                        Vec::new(),
                        Params::new(),
                    ),
                    current: None,
                    lookahead: None,
                    last: None,
                };

                let result = match walk.step(Continuation::resume()) {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => Err(Error::not_found(pathname)),
                    Err(err) => Err(err),
                };

                (result, walk.last)
            }
            None => {
                debug!("'{}' is outside of base url '{}'", pathname, self.base_url);
                (Err(Error::not_found(pathname)), None)
            }
        };

        match (result, &self.error_handler) {
            (Err(err), Some(handler)) => {
                debug!("handling error for '{}': {}", pathname, err);
                let context = ErrorContext {
                    pathname,
                    data,
                    matched: matched.as_ref(),
                };
                handler(err, &context)
            }
            (result, _) => result,
        }
    }
}

impl<T, C> fmt::Debug for Router<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.tree.len())
            .field("base_url", &self.base_url)
            .field("has_error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// Configures a [`Router`].
///
/// ```rust
/// use routeit::{Error, Outcome, Route, Router};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router: Router<Option<String>> = Router::builder(Route::new("/:id").action(|_, params| {
///     Ok(Outcome::Produced(params.get("id").map(ToString::to_string)))
/// }))
/// .base_url("/app")
/// .error_handler(|err, _| match err {
///     Error::NotFound { .. } => Ok(None),
///     err => Err(err),
/// })
/// .build()?;
///
/// assert_eq!(router.resolve("/app/7")?, Some("7".to_owned()));
/// assert_eq!(router.resolve("/app/7/8")?, None);
/// # Ok(())
/// # }
/// ```
pub struct RouterBuilder<T, C = ()> {
    root: Route<T, C>,
    base_url: String,
    context: C,
    case_sensitive: bool,
    resolver: Option<Box<dyn Resolve<T, C>>>,
    error_handler: Option<Box<ErrorHandler<T, C>>>,
}

impl<T, C> RouterBuilder<T, C> {
    /// Sets a prefix that is stripped from every pathname before matching.
    ///
    /// Pathnames that do not start with it are not found.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the context data handed to every action.
    pub fn context(mut self, context: C) -> Self {
        self.context = context;
        self
    }

    /// Makes pattern literals match case-sensitively. Defaults to `false`.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Replaces the hook that invokes a matched route's action.
    pub fn resolve_route<F>(self, resolver: F) -> Self
    where
        F: Fn(&mut Context<'_, T, C>, &Params) -> Result<Outcome<T>, Error> + Send + Sync + 'static,
    {
        self.resolver(resolver)
    }

    /// Replaces the hook that invokes a matched route's action with a
    /// [`Resolve`] implementation.
    pub fn resolver(mut self, resolver: impl Resolve<T, C> + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Sets a handler for failed resolutions. It may recover with a value or
    /// return an error.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Error, &ErrorContext<'_, C>) -> Result<T, Error> + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Validates the routes and builds the router.
    pub fn build(self) -> Result<Router<T, C>, BuildError> {
        let (tree, actions) = Tree::build(self.root)?;

        Ok(Router {
            tree,
            actions,
            cache: PatternCache::new(self.case_sensitive),
            base_url: self.base_url,
            context: self.context,
            resolver: self
                .resolver
                .unwrap_or_else(|| Box::new(DefaultResolver)),
            error_handler: self.error_handler,
        })
    }
}

// The state of a single `resolve` call.
struct Walk<'r, T, C> {
    router: &'r Router<T, C>,
    data: &'r C,
    pathname: &'r str,
    matches: Matches<'r>,
    // the route of the most recently pulled candidate
    current: Option<RouteId>,
    // a candidate pulled by a scoped continuation that fell outside its scope
    lookahead: Option<Option<Match>>,
    // the last candidate handed to the resolver
    last: Option<Match>,
}

impl<'r, T: 'r, C: 'r> Driver<T> for Walk<'r, T, C> {
    fn step(&mut self, continuation: Continuation) -> Result<Option<T>, Error> {
        // a pending lookahead is handed out before any skip applies
        let mut skip = if continuation.skip_current {
            self.current
        } else {
            None
        };

        loop {
            let pulled = match self.lookahead.take() {
                Some(pulled) => pulled,
                None => self.matches.next(skip)?,
            };
            self.current = pulled.as_ref().map(Match::route);

            if !continuation.resume {
                let in_scope = match (&pulled, continuation.scope) {
                    (Some(found), Some(scope)) => self.router.tree.is_descendant(scope, found.route()),
                    _ => false,
                };

                if !in_scope {
                    self.lookahead = Some(pulled);
                    return Ok(None);
                }
            }

            let found = match pulled {
                Some(found) => found,
                None => {
                    debug!("no route found for '{}'", self.pathname);
                    return Err(Error::not_found(self.pathname));
                }
            };

            trace!(
                "trying route '{}' ({:?}) for '{}'",
                self.router.tree.pattern(found.route()),
                found.route(),
                self.pathname
            );

            let tried = found.route();
            let (router, data, pathname) = (self.router, self.data, self.pathname);
            let params = found.params().clone();
            self.last = Some(found.clone());

            let outcome = {
                let mut context = Context::new(router, data, pathname, found, self);
                router.resolver.resolve(&mut context, &params)?
            };

            match outcome {
                Outcome::Produced(value) => return Ok(Some(value)),
                Outcome::Continue => skip = None,
                // nested continuations may have moved `current` below `tried`
                Outcome::Skip => skip = Some(tried),
            }
        }
    }
}
