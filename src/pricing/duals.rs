//! Dual values keyed by customer.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::graph::CustomerGraph;
use crate::models::NodeId;

/// Covering-constraint duals from the master, one per customer.
///
/// The depot aliases and customers without an entry have dual 0.
///
/// # Examples
///
/// ```
/// use u_colgen::models::NodeId;
/// use u_colgen::pricing::Duals;
///
/// let duals: Duals = [(1, 12.5), (2, 3.0)].into_iter().collect();
/// assert_eq!(duals.get(NodeId::Customer(1)), 12.5);
/// assert_eq!(duals.get(NodeId::Source), 0.0);
/// assert_eq!(duals.get(NodeId::Customer(7)), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Duals(HashMap<usize, f64>);

impl Duals {
    /// Empty duals: every node prices at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dual of a customer.
    pub fn insert(&mut self, customer: usize, value: f64) {
        self.0.insert(customer, value);
    }

    /// Dual of a node.
    pub fn get(&self, node: NodeId) -> f64 {
        node.customer()
            .and_then(|id| self.0.get(&id).copied())
            .unwrap_or(0.0)
    }

    /// Number of customers with an explicit dual.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no dual was set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(customer, dual)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(&id, &v)| (id, v))
    }

    /// Duals laid out by graph arena index.
    ///
    /// Entries for customers not in the graph are ignored.
    pub fn by_index(&self, graph: &CustomerGraph) -> Vec<f64> {
        let mut out = vec![0.0; graph.num_nodes()];
        for (id, value) in self.iter() {
            match graph.index_of(NodeId::Customer(id)) {
                Some(idx) => out[idx] = value,
                None => debug!("ignoring dual for unknown customer {id}"),
            }
        }
        out
    }
}

impl FromIterator<(usize, f64)> for Duals {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_by_index_skips_unknown() {
        let mut g = CustomerGraph::new(TimeWindow::open());
        let a = g.add_customer(4, 1.0, TimeWindow::open()).expect("added");
        let duals: Duals = [(4, 2.5), (99, 7.0)].into_iter().collect();
        let v = duals.by_index(&g);
        assert_eq!(v.len(), 3);
        assert_eq!(v[a], 2.5);
        assert_eq!(v[crate::graph::SOURCE], 0.0);
        assert_eq!(v[crate::graph::SINK], 0.0);
    }
}
