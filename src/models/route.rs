//! Routes (columns) exchanged with the master problem.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// A Source→…→Sink path through distinct customers with its true cost.
///
/// Routes are immutable once built: the pricing driver creates them with
/// undualized edge costs and the route pool owns them for the rest of the
/// column generation run.
///
/// # Examples
///
/// ```
/// use u_colgen::models::{NodeId, Route};
///
/// let route = Route::new(
///     vec![NodeId::Source, NodeId::Customer(9), NodeId::Sink],
///     42.5,
/// )
/// .unwrap();
/// assert_eq!(route.num_customers(), 1);
/// assert!(route.covers(9));
///
/// // Repeated customers are rejected.
/// assert!(Route::new(
///     vec![NodeId::Source, NodeId::Customer(1), NodeId::Customer(1), NodeId::Sink],
///     1.0,
/// )
/// .is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    nodes: Vec<NodeId>,
    cost: f64,
}

impl Route {
    /// Creates a route.
    ///
    /// Returns `None` unless the sequence starts at `Source`, ends at `Sink`,
    /// and visits only distinct customers in between.
    pub fn new(nodes: Vec<NodeId>, cost: f64) -> Option<Self> {
        if nodes.len() < 2
            || nodes.first() != Some(&NodeId::Source)
            || nodes.last() != Some(&NodeId::Sink)
        {
            return None;
        }
        let inner = &nodes[1..nodes.len() - 1];
        if inner.iter().any(|n| n.is_depot()) {
            return None;
        }
        let mut seen: Vec<usize> = inner.iter().filter_map(|n| n.customer()).collect();
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return None;
        }
        Some(Self { nodes, cost })
    }

    /// Full node sequence, Source and Sink included.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Customer ids in visiting order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| n.customer())
    }

    /// Number of customers visited.
    pub fn num_customers(&self) -> usize {
        self.nodes.len() - 2
    }

    /// True (undualized) cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns `true` if the route visits the given customer.
    pub fn covers(&self, customer: usize) -> bool {
        self.customers().any(|c| c == customer)
    }

    /// Returns `true` for the Source→Sink route without customers.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 2
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.nodes.iter().map(|n| n.to_string()).collect();
        write!(f, "{} (cost {:.2})", names.join(" -> "), self.cost)
    }
}
