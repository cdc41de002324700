use crate::context::Context;
use crate::error::Error;
use crate::handler::{Action, Outcome};
use crate::params::Params;
use crate::pattern::Mode;
use crate::router::Router;
use crate::tree::RouteId;

use std::fmt;

/// A route definition: a pattern, an optional action, and ordered children.
///
/// Children are tried in the order they are added. A route that was given
/// children (even an empty list) only needs to match a prefix of the
/// pathname; a route without children must match all of it.
///
/// ```rust
/// use routeit::{Outcome, Route, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let router: Router<String> = Router::new(
///     Route::new("/users").child(
///         Route::new("/:id").action(|ctx, _| Ok(Outcome::Produced(ctx.path().to_owned()))),
///     ),
/// )?;
///
/// assert_eq!(router.resolve("/users/42")?, "/42");
/// # Ok(())
/// # }
/// ```
pub struct Route<T, C = ()> {
    pub(crate) pattern: String,
    pub(crate) action: Option<Box<dyn Action<T, C>>>,
    pub(crate) children: Option<Vec<Route<T, C>>>,
}

impl<T, C> Route<T, C> {
    /// Creates a route matching the given pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Route {
            pattern: pattern.into(),
            action: None,
            children: None,
        }
    }

    /// Sets the closure invoked when this route matches.
    pub fn action<F>(self, action: F) -> Self
    where
        F: Fn(&mut Context<'_, T, C>, &Params) -> Result<Outcome<T>, Error> + Send + Sync + 'static,
    {
        self.with_action(action)
    }

    /// Sets the [`Action`] invoked when this route matches.
    pub fn with_action(mut self, action: impl Action<T, C> + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Appends a child route.
    pub fn child(mut self, route: Route<T, C>) -> Self {
        self.children.get_or_insert_with(Vec::new).push(route);
        self
    }

    /// Appends child routes, in order.
    pub fn children(mut self, routes: impl IntoIterator<Item = Route<T, C>>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(routes);
        self
    }

    pub(crate) fn mode(&self) -> Mode {
        match self.children {
            Some(_) => Mode::Prefix,
            None => Mode::Terminal,
        }
    }
}

// A list of top-level routes is nested under a root with an empty pattern.
impl<T, C> From<Vec<Route<T, C>>> for Route<T, C> {
    fn from(routes: Vec<Route<T, C>>) -> Self {
        Route::new("").children(routes)
    }
}

impl<T, C, const N: usize> From<[Route<T, C>; N]> for Route<T, C> {
    fn from(routes: [Route<T, C>; N]) -> Self {
        Route::new("").children(routes)
    }
}

impl<T, C> fmt::Debug for Route<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("has_action", &self.action.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// A reference to a route registered in a [`Router`].
pub struct RouteRef<'r, T, C = ()> {
    pub(crate) router: &'r Router<T, C>,
    pub(crate) id: RouteId,
}

impl<'r, T, C> RouteRef<'r, T, C> {
    /// The route's identifier, its position in a pre-order walk of the tree.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The pattern the route was registered with.
    pub fn pattern(&self) -> &'r str {
        self.router.tree.pattern(self.id)
    }

    /// Whether the route must match the remaining pathname fully.
    pub fn mode(&self) -> Mode {
        self.router.tree.mode(self.id)
    }

    /// The route's parent, `None` for the root.
    pub fn parent(&self) -> Option<RouteRef<'r, T, C>> {
        self.router.tree.parent(self.id).map(|id| RouteRef {
            router: self.router,
            id,
        })
    }

    /// The route's children, in priority order.
    pub fn children(&self) -> impl Iterator<Item = RouteRef<'r, T, C>> + 'r {
        let router = self.router;
        router
            .tree
            .children(self.id)
            .iter()
            .map(move |&id| RouteRef { router, id })
    }

    /// The action attached to the route.
    pub fn action(&self) -> Option<&'r dyn Action<T, C>> {
        self.router.actions[self.id.index()].as_deref()
    }

    /// Returns `true` if this route is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: RouteId) -> bool {
        self.router.tree.is_descendant(ancestor, self.id)
    }
}

impl<T, C> Clone for RouteRef<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for RouteRef<'_, T, C> {}

impl<T, C> fmt::Debug for RouteRef<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRef")
            .field("id", &self.id)
            .field("pattern", &self.pattern())
            .finish()
    }
}
