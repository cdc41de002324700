use crate::error::BuildError;
use crate::handler::Action;
use crate::pattern::{Mode, Pattern};
use crate::route::Route;

/// Identifies a route within a [`Router`](crate::Router).
///
/// Routes are numbered in pre-order, so the root is always `0` and a parent
/// always has a smaller id than its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    pub(crate) const ROOT: RouteId = RouteId(0);

    /// The route's position in a pre-order walk of the tree.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    pattern: String,
    mode: Mode,
    parent: Option<RouteId>,
    children: Vec<RouteId>,
}

/// An immutable, flattened route tree.
///
/// Parent links are recorded once at construction so ancestry checks never
/// touch the routes themselves.
#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

// The actions of a tree, indexed by `RouteId`.
pub(crate) type Actions<T, C> = Vec<Option<Box<dyn Action<T, C>>>>;

impl Tree {
    /// Flattens a route definition, validating every pattern.
    pub(crate) fn build<T, C>(root: Route<T, C>) -> Result<(Tree, Actions<T, C>), BuildError> {
        let mut tree = Tree { nodes: Vec::new() };
        let mut actions = Vec::new();
        tree.insert(root, None, &mut actions)?;
        Ok((tree, actions))
    }

    fn insert<T, C>(
        &mut self,
        route: Route<T, C>,
        parent: Option<RouteId>,
        actions: &mut Actions<T, C>,
    ) -> Result<RouteId, BuildError> {
        let mode = route.mode();
        let Route {
            pattern,
            action,
            children,
        } = route;

        if let Err(source) = Pattern::new(&pattern, mode) {
            return Err(BuildError::InvalidPattern { pattern, source });
        }

        let id = RouteId(self.nodes.len());
        self.nodes.push(Node {
            pattern,
            mode,
            parent,
            children: Vec::new(),
        });
        actions.push(action);

        for child in children.into_iter().flatten() {
            let child = self.insert(child, Some(id), actions)?;
            self.nodes[id.0].children.push(child);
        }

        Ok(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn contains(&self, id: RouteId) -> bool {
        id.0 < self.nodes.len()
    }

    pub(crate) fn pattern(&self, id: RouteId) -> &str {
        &self.nodes[id.0].pattern
    }

    pub(crate) fn mode(&self, id: RouteId) -> Mode {
        self.nodes[id.0].mode
    }

    pub(crate) fn parent(&self, id: RouteId) -> Option<RouteId> {
        self.nodes[id.0].parent
    }

    pub(crate) fn children(&self, id: RouteId) -> &[RouteId] {
        &self.nodes[id.0].children
    }

    /// Returns `true` if `id` is a strict descendant of `ancestor`.
    pub(crate) fn is_descendant(&self, ancestor: RouteId, id: RouteId) -> bool {
        let mut current = self.parent(id);
        while let Some(route) = current {
            if route == ancestor {
                return true;
            }
            current = self.parent(route);
        }
        false
    }
}
