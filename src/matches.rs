use crate::cache::PatternCache;
use crate::error::PatternError;
use crate::params::Params;
use crate::path::{match_path, PathMatch};
use crate::pattern::ParamKey;
use crate::tree::{RouteId, Tree};

/// A route whose pattern matched, along with the state accumulated on the
/// way down to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    route: RouteId,
    base_url: String,
    path: String,
    keys: Vec<ParamKey>,
    params: Params,
}

impl Match {
    /// The matched route.
    pub fn route(&self) -> RouteId {
        self.route
    }

    /// Everything matched by the route's ancestors, including the router's
    /// base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The portion of the pathname matched by this route.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The parameter keys of this route and its ancestors, ancestors first.
    pub fn keys(&self) -> &[ParamKey] {
        &self.keys
    }

    /// The parameters captured by this route and its ancestors.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

enum State {
    Pending,
    Matched(PathMatch),
    Unmatched,
}

/// A lazy, pre-order walk over the routes of a subtree that match a pathname.
///
/// A route is yielded before any of its descendants, and descendants are
/// only visited if the route itself matched. The walk can't be restarted.
pub(crate) struct Matches<'r> {
    tree: &'r Tree,
    cache: &'r PatternCache,
    route: RouteId,
    base_url: String,
    pathname: String,
    parent_keys: Vec<ParamKey>,
    parent_params: Params,
    state: State,
    child_index: usize,
    child: Option<Box<Matches<'r>>>,
}

impl<'r> Matches<'r> {
    pub(crate) fn new(
        tree: &'r Tree,
        cache: &'r PatternCache,
        route: RouteId,
        base_url: String,
        pathname: String,
        parent_keys: Vec<ParamKey>,
        parent_params: Params,
    ) -> Self {
        Matches {
            tree,
            cache,
            route,
            base_url,
            pathname,
            parent_keys,
            parent_params,
            state: State::Pending,
            child_index: 0,
            child: None,
        }
    }

    /// Returns the next matching route.
    ///
    /// If `skip` is a route within this walk, that route's subtree is
    /// abandoned and the walk continues after it.
    pub(crate) fn next(&mut self, skip: Option<RouteId>) -> Result<Option<Match>, PatternError> {
        if skip == Some(self.route) {
            return Ok(None);
        }

        if let State::Pending = self.state {
            let matched = match_path(
                self.cache,
                self.tree.pattern(self.route),
                self.tree.mode(self.route),
                &self.pathname,
                &self.parent_keys,
                &self.parent_params,
            )?;

            return Ok(match matched {
                Some(matched) => {
                    let found = Match {
                        route: self.route,
                        base_url: self.base_url.clone(),
                        path: matched.path.clone(),
                        keys: matched.keys.clone(),
                        params: matched.params.clone(),
                    };
                    self.state = State::Matched(matched);
                    Some(found)
                }
                None => {
                    self.state = State::Unmatched;
                    None
                }
            });
        }

        let matched = match &self.state {
            State::Matched(matched) => matched,
            State::Pending | State::Unmatched => return Ok(None),
        };

        let children = self.tree.children(self.route);
        while let Some(&child) = children.get(self.child_index) {
            let (tree, cache) = (self.tree, self.cache);
            let (base_url, pathname) = (&self.base_url, &self.pathname);

            let walk = self.child.get_or_insert_with(|| {
                Box::new(Matches::new(
                    tree,
                    cache,
                    child,
                    format!("{}{}", base_url, matched.path),
                    pathname[matched.path.len()..].to_owned(),
                    matched.keys.clone(),
                    matched.params.clone(),
                ))
            });

            if let Some(found) = walk.next(skip)? {
                return Ok(Some(found));
            }

            self.child = None;
            self.child_index += 1;
        }

        Ok(None)
    }
}
