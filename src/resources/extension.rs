//! Resource extension functions (REFs).
//!
//! Forward labels grow from Source with every slot at its minimum. Backward
//! labels shrink from Sink with every slot at its maximum, so a backward
//! value is "what is still available" and a forward value is "what has been
//! consumed". Both directions update the same slots: every forward increment
//! has a backward decrement, which keeps joined totals equal to the sum of
//! the two halves.

use crate::error::PricingError;
use crate::graph::{CustomerGraph, Edge, SINK, SOURCE};
use crate::models::TimeWindow;

use super::{Resource, ResourceBounds, ResourceVector};

/// Bounds plus the per-slot update rules for one pricing run.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::CustomerGraph;
/// use u_colgen::models::{NodeId, TimeWindow};
/// use u_colgen::resources::{Resource, ResourceBounds, ResourceModel, ResourceVector};
///
/// let mut g = CustomerGraph::new(TimeWindow::new(0.0, 100.0).unwrap());
/// g.add_customer(1, 4.0, TimeWindow::new(20.0, 30.0).unwrap()).unwrap();
/// let e = g.add_edge(NodeId::Source, NodeId::Customer(1), 3.0, 5.0).unwrap();
///
/// let bounds = ResourceBounds::new(
///     ResourceVector::zeros(),
///     ResourceVector::new([10.0, 10.0, 10.0, 101.0, 0.0, 0.0]),
/// );
/// let model = ResourceModel::new(&g, bounds, true, true);
/// let next = model.extend_forward(&model.forward_root(), &g.edges()[e]);
///
/// // Arrives at 5, waits until the window opens at 20.
/// assert_eq!(next[Resource::Time], 20.0);
/// assert_eq!(next[Resource::Load], 4.0);
/// assert!(model.is_feasible(&next));
/// ```
#[derive(Debug, Clone)]
pub struct ResourceModel<'a> {
    graph: &'a CustomerGraph,
    bounds: ResourceBounds,
    time_windows: bool,
    load: bool,
    max_feasible_arrival: f64,
}

impl<'a> ResourceModel<'a> {
    /// Creates a model.
    ///
    /// `time_windows` activates node windows in the time recurrence and the
    /// violation flag; `load` activates demand accumulation. Inactive slots
    /// keep their root value.
    pub fn new(
        graph: &'a CustomerGraph,
        bounds: ResourceBounds,
        time_windows: bool,
        load: bool,
    ) -> Self {
        let mut max_feasible_arrival = bounds.max[Resource::Time];
        if time_windows {
            // Latest arrival at Sink any direct predecessor can still achieve.
            let latest = graph
                .incoming(SINK)
                .map(|e| graph.node(e.tail).window().upper() + e.time)
                .fold(f64::NEG_INFINITY, f64::max);
            max_feasible_arrival = max_feasible_arrival
                .min(latest)
                .min(graph.node(SINK).window().upper());
        }

        Self {
            graph,
            bounds,
            time_windows,
            load,
            max_feasible_arrival,
        }
    }

    /// The graph this model extends over.
    pub fn graph(&self) -> &'a CustomerGraph {
        self.graph
    }

    /// Bounds of this run.
    pub fn bounds(&self) -> &ResourceBounds {
        &self.bounds
    }

    /// Latest start of service at Sink a backward label may assume.
    pub fn max_feasible_arrival(&self) -> f64 {
        self.max_feasible_arrival
    }

    fn window(&self, node: usize) -> TimeWindow {
        if self.time_windows {
            self.graph.node(node).window()
        } else {
            TimeWindow::open()
        }
    }

    /// Resources of the root forward label at Source.
    pub fn forward_root(&self) -> ResourceVector {
        let mut root = self.bounds.min;
        root[Resource::Time] = root[Resource::Time].max(self.window(SOURCE).lower());
        root[Resource::TimeWindowViolation] = 0.0;
        root[Resource::Elementarity] = 0.0;
        root
    }

    /// Resources of the root backward label at Sink.
    pub fn backward_root(&self) -> ResourceVector {
        let mut root = self.bounds.max;
        root[Resource::Time] = self.max_feasible_arrival;
        root[Resource::TimeWindowViolation] = 0.0;
        root[Resource::Elementarity] = 0.0;
        root
    }

    /// Checks that the empty path at Source lies within bounds.
    ///
    /// A backward root outside the bounds only means Sink cannot be reached
    /// in time; the search reports that as an infeasible run instead.
    pub fn validate_root(&self) -> Result<(), PricingError> {
        let root = self.forward_root();
        match self.bounds.first_violation(&root) {
            None => Ok(()),
            Some(r) => Err(PricingError::InfeasibleRoot {
                resource: r,
                value: root[r],
                min: self.bounds.min[r],
                max: self.bounds.max[r],
            }),
        }
    }

    /// Returns `true` if every slot lies within bounds.
    pub fn is_feasible(&self, res: &ResourceVector) -> bool {
        self.bounds.contains(res)
    }

    /// Extends resources at `edge.tail` across the edge to `edge.head`.
    ///
    /// The result may violate the bounds; callers discard such extensions.
    pub fn extend_forward(&self, res: &ResourceVector, edge: &Edge) -> ResourceVector {
        let head = self.graph.node(edge.head);
        let window = self.window(edge.head);
        let mut next = *res;

        next[Resource::Arcs] += 1.0;
        next[Resource::Stops] += 1.0;
        if self.load {
            next[Resource::Load] += head.demand();
        }
        next[Resource::Time] = window.start_of_service(res[Resource::Time] + edge.time);
        next[Resource::TimeWindowViolation] = if next[Resource::Time] <= window.upper() {
            0.0
        } else {
            1.0
        };
        // repeats are detected on the label's visited set
        next[Resource::Elementarity] = 0.0;
        next
    }

    /// Extends resources at `edge.head` backward across the edge to `edge.tail`.
    ///
    /// The time slot holds the latest start of service at the current node
    /// that still reaches Sink in time. Going back over an edge subtracts the
    /// travel time and clamps at the tail's upper bound; starting before the
    /// tail's lower bound raises the violation flag.
    pub fn extend_backward(&self, res: &ResourceVector, edge: &Edge) -> ResourceVector {
        let tail = self.graph.node(edge.tail);
        let window = self.window(edge.tail);
        let mut next = *res;

        next[Resource::Arcs] -= 1.0;
        next[Resource::Stops] -= 1.0;
        if self.load {
            next[Resource::Load] -= tail.demand();
        }
        next[Resource::Time] = (res[Resource::Time] - edge.time).min(window.upper());
        next[Resource::TimeWindowViolation] = if next[Resource::Time] >= window.lower() {
            0.0
        } else {
            1.0
        };
        next[Resource::Elementarity] = 0.0;
        next
    }

    /// Combines a forward label at `edge.tail` with a backward label at
    /// `edge.head`.
    ///
    /// Returns the totals of the joined path for arcs, stops and load (the
    /// forward half, plus the edge, plus what the backward half consumed)
    /// and the start of service at the head, or `None` if the halves are not
    /// compatible.
    pub fn join(
        &self,
        forward: &ResourceVector,
        edge: &Edge,
        backward: &ResourceVector,
    ) -> Option<ResourceVector> {
        let step = self.extend_forward(forward, edge);
        if !self.is_feasible(&step) {
            return None;
        }

        let root = self.backward_root();
        let mut total = step;
        for r in [Resource::Arcs, Resource::Stops, Resource::Load] {
            total[r] += root[r] - backward[r];
        }
        if self.load {
            // head demand is counted by both halves
            total[Resource::Load] -= self.graph.node(edge.head).demand();
        }

        if step[Resource::Time] > backward[Resource::Time] || !self.is_feasible(&total) {
            return None;
        }
        Some(total)
    }

    /// Replays the forward recurrence along a full node path.
    ///
    /// Returns the resources at the last node, or `None` if an edge is
    /// missing or any prefix leaves the bounds.
    pub fn replay(&self, path: &[usize]) -> Option<ResourceVector> {
        let mut res = self.forward_root();
        if path.first() != Some(&SOURCE) {
            return None;
        }
        for pair in path.windows(2) {
            let edge = self.graph.edge(pair[0], pair[1])?;
            res = self.extend_forward(&res, edge);
            if !self.is_feasible(&res) {
                return None;
            }
        }
        Some(res)
    }
}
