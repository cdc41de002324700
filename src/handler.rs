use crate::context::Context;
use crate::error::Error;
use crate::params::Params;

/// The result of invoking a route's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    /// The route handled the pathname; resolution stops with this value.
    Produced(T),
    /// The route declined. The next candidate is tried, starting with the
    /// route's own children.
    Continue,
    /// The route declined, and none of its descendants should be tried either.
    Skip,
}

impl<T> Outcome<T> {
    /// Returns `true` if the outcome carries a value.
    pub fn is_produced(&self) -> bool {
        matches!(self, Outcome::Produced(_))
    }

    /// Converts the outcome into the produced value, if any.
    pub fn produced(self) -> Option<T> {
        match self {
            Outcome::Produced(value) => Some(value),
            Outcome::Continue | Outcome::Skip => None,
        }
    }

    /// Maps the produced value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Produced(value) => Outcome::Produced(f(value)),
            Outcome::Continue => Outcome::Continue,
            Outcome::Skip => Outcome::Skip,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Produced(value),
            None => Outcome::Continue,
        }
    }
}

/// The work attached to a single route.
///
/// Implemented for any `Fn(&mut Context<T, C>, &Params) -> Result<Outcome<T>, Error>`.
pub trait Action<T, C = ()>: Send + Sync {
    /// Handles a matched route.
    fn call(&self, context: &mut Context<'_, T, C>, params: &Params) -> Result<Outcome<T>, Error>;
}

impl<F, T, C> Action<T, C> for F
where
    F: Fn(&mut Context<'_, T, C>, &Params) -> Result<Outcome<T>, Error> + Send + Sync,
{
    fn call(&self, context: &mut Context<'_, T, C>, params: &Params) -> Result<Outcome<T>, Error> {
        (self)(context, params)
    }
}

/// A router-wide hook deciding what a matched route produces.
///
/// Implemented for any `Fn(&mut Context<T, C>, &Params) -> Result<Outcome<T>, Error>`.
pub trait Resolve<T, C = ()>: Send + Sync {
    /// Produces a value for the matched route, or declines.
    fn resolve(&self, context: &mut Context<'_, T, C>, params: &Params)
        -> Result<Outcome<T>, Error>;
}

impl<F, T, C> Resolve<T, C> for F
where
    F: Fn(&mut Context<'_, T, C>, &Params) -> Result<Outcome<T>, Error> + Send + Sync,
{
    fn resolve(
        &self,
        context: &mut Context<'_, T, C>,
        params: &Params,
    ) -> Result<Outcome<T>, Error> {
        (self)(context, params)
    }
}

/// Invokes the matched route's action, or continues if it has none.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResolver;

impl<T, C> Resolve<T, C> for DefaultResolver {
    fn resolve(
        &self,
        context: &mut Context<'_, T, C>,
        params: &Params,
    ) -> Result<Outcome<T>, Error> {
        match context.route().action() {
            Some(action) => action.call(context, params),
            None => Ok(Outcome::Continue),
        }
    }
}
