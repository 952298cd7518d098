//! The route pool.

use std::collections::HashSet;

use crate::models::{NodeId, Route};

/// Columns found so far, in insertion order.
///
/// # Examples
///
/// ```
/// use u_colgen::colgen::RoutePool;
/// use u_colgen::models::{NodeId, Route};
///
/// let nodes = vec![NodeId::Source, NodeId::Customer(3), NodeId::Sink];
/// let mut pool = RoutePool::new();
/// assert!(pool.insert(Route::new(nodes.clone(), 8.0).unwrap()));
/// // same node sequence, rejected
/// assert!(!pool.insert(Route::new(nodes.clone(), 8.0).unwrap()));
/// assert!(pool.contains(&nodes));
/// assert!(pool.covers(3));
/// assert_eq!(pool.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutePool {
    routes: Vec<Route>,
    index: HashSet<Vec<NodeId>>,
}

impl RoutePool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route unless one with the same node sequence is present.
    pub fn insert(&mut self, route: Route) -> bool {
        if !self.index.insert(route.nodes().to_vec()) {
            return false;
        }
        self.routes.push(route);
        true
    }

    /// Returns `true` if a route with this node sequence is pooled.
    pub fn contains(&self, nodes: &[NodeId]) -> bool {
        self.index.contains(nodes)
    }

    /// Returns `true` if some route visits `customer`.
    pub fn covers(&self, customer: usize) -> bool {
        self.routes.iter().any(|r| r.covers(customer))
    }

    /// Routes in insertion order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of pooled routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the pool holds no route.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
