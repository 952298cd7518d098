//! Joined Source→Sink paths and the bounded best-k collection.

use std::cmp::Ordering;

use crate::graph::CustomerGraph;
use crate::models::NodeId;
use crate::resources::ResourceVector;

/// Relative tolerance under which two reduced costs count as a tie.
const COST_TIE_TOLERANCE: f64 = 1e-9;

/// Returns `true` if two accumulated costs differ only by summation noise.
pub(crate) fn same_cost(a: f64, b: f64) -> bool {
    (a - b).abs() <= COST_TIE_TOLERANCE * a.abs().max(1.0)
}

/// A complete Source→Sink path produced by the join step.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPath {
    /// Graph arena indices from Source to Sink.
    pub nodes: Vec<usize>,
    /// Node ids along `nodes`.
    pub ids: Vec<NodeId>,
    /// Sum of dualized edge costs.
    pub reduced_cost: f64,
    /// Resources at Sink from replaying the forward recurrence.
    pub resources: ResourceVector,
}

impl JoinedPath {
    /// Path over arena indices of `graph`, ids looked up from the graph.
    pub fn new(
        graph: &CustomerGraph,
        nodes: Vec<usize>,
        reduced_cost: f64,
        resources: ResourceVector,
    ) -> Self {
        let ids = nodes.iter().map(|&i| graph.node(i).id()).collect();
        Self {
            nodes,
            ids,
            reduced_cost,
            resources,
        }
    }

    /// Number of customers on the path.
    pub fn num_stops(&self) -> usize {
        self.nodes.len().saturating_sub(2)
    }

    /// Ranking: lower reduced cost, then fewer stops, then the
    /// lexicographically smaller [`NodeId`] sequence.
    ///
    /// Reduced costs within a relative `1e-9` of each other tie, so the
    /// order in which edge costs were summed cannot decide the ranking.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        let by_cost = if same_cost(self.reduced_cost, other.reduced_cost) {
            Ordering::Equal
        } else {
            self.reduced_cost.total_cmp(&other.reduced_cost)
        };
        by_cost
            .then_with(|| self.nodes.len().cmp(&other.nodes.len()))
            .then_with(|| self.ids.cmp(&other.ids))
    }
}

/// The best `limit` distinct paths seen so far, kept in rank order.
///
/// # Examples
///
/// ```
/// use u_colgen::labeling::{BestPaths, JoinedPath};
/// use u_colgen::models::NodeId;
/// use u_colgen::resources::ResourceVector;
///
/// let path = |nodes: Vec<usize>, reduced_cost| JoinedPath {
///     ids: vec![NodeId::Source, NodeId::Customer(nodes[1]), NodeId::Sink],
///     nodes,
///     reduced_cost,
///     resources: ResourceVector::zeros(),
/// };
/// let mut best = BestPaths::new(2);
/// best.offer(path(vec![0, 3, 1], -2.0));
/// best.offer(path(vec![0, 2, 1], -5.0));
/// best.offer(path(vec![0, 4, 1], -1.0));
///
/// let kept: Vec<_> = best.into_paths().into_iter().map(|p| p.nodes).collect();
/// assert_eq!(kept, vec![vec![0, 2, 1], vec![0, 3, 1]]);
/// ```
#[derive(Debug, Clone)]
pub struct BestPaths {
    limit: usize,
    paths: Vec<JoinedPath>,
}

impl BestPaths {
    /// Keeps at most `limit` paths; a limit of 0 is treated as 1.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            paths: Vec::with_capacity(limit),
        }
    }

    /// Returns `true` if a path with this reduced cost could still enter.
    ///
    /// Ties with the current worst are admitted since the other ranking keys
    /// may favour the newcomer.
    pub fn admits(&self, reduced_cost: f64) -> bool {
        self.paths.len() < self.limit
            || self.paths.last().is_some_and(|worst| {
                reduced_cost <= worst.reduced_cost || same_cost(reduced_cost, worst.reduced_cost)
            })
    }

    /// Offers a path. Returns `true` if it was kept.
    pub fn offer(&mut self, path: JoinedPath) -> bool {
        if self.paths.iter().any(|p| p.nodes == path.nodes) {
            return false;
        }
        let pos = self
            .paths
            .partition_point(|p| p.rank_cmp(&path) == Ordering::Less);
        if pos >= self.limit {
            return false;
        }
        self.paths.insert(pos, path);
        self.paths.truncate(self.limit);
        true
    }

    /// Best path so far.
    pub fn best(&self) -> Option<&JoinedPath> {
        self.paths.first()
    }

    /// Number of paths kept.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if nothing was kept.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in rank order.
    pub fn into_paths(self) -> Vec<JoinedPath> {
        self.paths
    }
}
