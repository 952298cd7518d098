//! The bidirectional search: INIT → EXPAND → JOIN → DONE.

use std::collections::VecDeque;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::graph::{Edge, SINK, SOURCE};
use crate::resources::{Resource, ResourceModel};

use super::{BestPaths, Direction, JoinedPath, Label, LabelStore, NodeSet};

/// Monotone resource whose midpoint splits the work between the two
/// directions.
///
/// A forward label is extended while its value is at most the midpoint
/// between the forward and backward roots; a backward label while its value
/// is above it. Labels past the midpoint are parked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfwayResource {
    /// Start of service.
    #[default]
    Time,
    /// Arcs traversed.
    Arcs,
    /// Stops made.
    Stops,
}

impl HalfwayResource {
    /// The resource slot this maps to.
    pub fn resource(self) -> Resource {
        match self {
            HalfwayResource::Time => Resource::Time,
            HalfwayResource::Arcs => Resource::Arcs,
            HalfwayResource::Stops => Resource::Stops,
        }
    }
}

/// Phase of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Not started.
    Init,
    /// Labels are being extended.
    Expand,
    /// Forward and backward halves are being combined.
    Join,
    /// Finished; the outcome was returned.
    Done,
}

/// Result of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best joined paths in rank order. Empty if no feasible Source→Sink
    /// path exists under the bounds.
    pub paths: Vec<JoinedPath>,
    /// Forward labels accepted during the run.
    pub forward_labels: usize,
    /// Backward labels accepted during the run.
    pub backward_labels: usize,
    /// Best reduced cost among joined paths that visit a customer twice.
    ///
    /// Such paths are never returned. Only a non-elementary run can meet
    /// them, and only those good enough to enter the best paths count.
    pub cyclic_reduced_cost: Option<f64>,
}

impl SearchOutcome {
    /// Best path, if any.
    pub fn best(&self) -> Option<&JoinedPath> {
        self.paths.first()
    }
}

/// Shared, read-only inputs of one expansion.
struct Expansion<'a, 'g> {
    model: &'a ResourceModel<'g>,
    duals: &'a [f64],
    halfway: Resource,
    threshold: f64,
    elementary: bool,
}

impl<'a, 'g> Expansion<'a, 'g> {
    fn new(
        model: &'a ResourceModel<'g>,
        duals: &'a [f64],
        halfway: HalfwayResource,
        elementary: bool,
    ) -> Self {
        let halfway = halfway.resource();
        let threshold = (model.forward_root()[halfway] + model.backward_root()[halfway]) / 2.0;
        Self {
            model,
            duals,
            halfway,
            threshold,
            elementary,
        }
    }

    fn reduced_cost(&self, edge: &Edge) -> f64 {
        edge.cost - self.duals.get(edge.tail).copied().unwrap_or(0.0)
    }

    /// Roots are always extended; other labels stop at the midpoint.
    fn extends(&self, label: &Label) -> bool {
        if label.parent.is_none() {
            return true;
        }
        let value = label.resources[self.halfway];
        match label.direction {
            Direction::Forward => value <= self.threshold,
            Direction::Backward => value > self.threshold,
        }
    }

    fn run(&self, store: &mut LabelStore) {
        let direction = store.direction();
        let graph = self.model.graph();
        let root = match direction {
            Direction::Forward => Label::root(SOURCE, direction, self.model.forward_root()),
            Direction::Backward => Label::root(SINK, direction, self.model.backward_root()),
        };
        if !self.model.is_feasible(&root.resources) {
            debug!("{direction:?} root outside bounds, nothing to expand");
            return;
        }

        let mut frontier = VecDeque::new();
        frontier.extend(store.insert(root));

        while let Some(id) = frontier.pop_front() {
            if !store.is_alive(id) {
                continue;
            }
            let label = store.get(id).clone();
            if !self.extends(&label) {
                continue;
            }

            let edges: Vec<&Edge> = match direction {
                Direction::Forward => graph
                    .outgoing(label.node)
                    .filter(|e| e.head != SINK)
                    .collect(),
                Direction::Backward => graph
                    .incoming(label.node)
                    .filter(|e| e.tail != SOURCE)
                    .collect(),
            };

            for edge in edges {
                let (next, resources) = match direction {
                    Direction::Forward => {
                        (edge.head, self.model.extend_forward(&label.resources, edge))
                    }
                    Direction::Backward => {
                        (edge.tail, self.model.extend_backward(&label.resources, edge))
                    }
                };
                if self.elementary && label.visited.contains(next) {
                    continue;
                }
                if !self.model.is_feasible(&resources) {
                    continue;
                }

                let mut visited = label.visited;
                visited.insert(next);
                let child = Label {
                    node: next,
                    direction,
                    resources,
                    cost: label.cost + self.reduced_cost(edge),
                    visited,
                    parent: Some(id),
                };
                frontier.extend(store.insert(child));
            }
        }

        trace!(
            "{direction:?} expansion: {} labels, {} alive, {} discarded",
            store.len(),
            store.num_alive(),
            store.num_discarded()
        );
    }
}

/// One bidirectional labeling run over a resource model and node duals.
///
/// `duals[i]` is the dual value of graph node `i`; missing entries count as
/// zero. The reduced cost of an edge is its cost minus the dual of its tail,
/// computed on the fly so the graph is never modified.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::CustomerGraph;
/// use u_colgen::labeling::{BidirectionalSearch, HalfwayResource, SearchState};
/// use u_colgen::models::{NodeId, TimeWindow};
/// use u_colgen::resources::{ResourceBounds, ResourceModel, ResourceVector};
///
/// let mut g = CustomerGraph::new(TimeWindow::open());
/// let c = g.add_customer(1, 1.0, TimeWindow::open()).unwrap();
/// g.add_edge(NodeId::Source, NodeId::Customer(1), 2.0, 1.0).unwrap();
/// g.add_edge(NodeId::Customer(1), NodeId::Sink, 2.0, 1.0).unwrap();
///
/// let bounds = ResourceBounds::new(
///     ResourceVector::zeros(),
///     ResourceVector::new([10.0, 10.0, 10.0, 100.0, 0.0, 0.0]),
/// );
/// let model = ResourceModel::new(&g, bounds, false, true);
/// let mut duals = vec![0.0; g.num_nodes()];
/// duals[c] = 10.0;
///
/// let mut search = BidirectionalSearch::new(&model, duals, HalfwayResource::Arcs, true);
/// let outcome = search.run();
/// assert_eq!(search.state(), SearchState::Done);
/// let best = outcome.best().unwrap();
/// assert_eq!(best.reduced_cost, -6.0);
/// assert_eq!(best.num_stops(), 1);
/// ```
pub struct BidirectionalSearch<'a, 'g> {
    model: &'a ResourceModel<'g>,
    duals: Vec<f64>,
    halfway: HalfwayResource,
    elementary: bool,
    max_paths: usize,
    state: SearchState,
}

impl<'a, 'g> BidirectionalSearch<'a, 'g> {
    /// Creates a search returning the single best path.
    pub fn new(
        model: &'a ResourceModel<'g>,
        duals: Vec<f64>,
        halfway: HalfwayResource,
        elementary: bool,
    ) -> Self {
        Self {
            model,
            duals,
            halfway,
            elementary,
            max_paths: 1,
            state: SearchState::Init,
        }
    }

    /// Keeps the best `k` distinct paths instead of one.
    pub fn with_max_paths(mut self, k: usize) -> Self {
        self.max_paths = k.max(1);
        self
    }

    /// Current phase.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Runs the search to completion.
    ///
    /// Each call starts from fresh label stores, so running twice gives the
    /// same outcome.
    pub fn run(&mut self) -> SearchOutcome {
        self.state = SearchState::Init;
        let (mut forward, mut backward) = self.stores();
        let expansion = Expansion::new(self.model, &self.duals, self.halfway, self.elementary);

        self.state = SearchState::Expand;
        #[cfg(feature = "parallel")]
        rayon::join(
            || expansion.run(&mut forward),
            || expansion.run(&mut backward),
        );
        #[cfg(not(feature = "parallel"))]
        {
            expansion.run(&mut forward);
            expansion.run(&mut backward);
        }

        self.state = SearchState::Join;
        let (paths, cyclic_reduced_cost) = self.join(&expansion, &forward, &backward);

        self.state = SearchState::Done;
        debug!(
            "labeling done: {} forward, {} backward labels, {} paths, best {:?}",
            forward.len(),
            backward.len(),
            paths.len(),
            paths.first().map(|p| p.reduced_cost)
        );
        SearchOutcome {
            paths,
            forward_labels: forward.len(),
            backward_labels: backward.len(),
            cyclic_reduced_cost,
        }
    }

    /// Empty forward and backward stores ranking nodes by id.
    fn stores(&self) -> (LabelStore, LabelStore) {
        let graph = self.model.graph();
        let mut order: Vec<usize> = (0..graph.num_nodes()).collect();
        order.sort_by_key(|&i| graph.node(i).id());
        let mut rank = vec![0; order.len()];
        for (r, i) in order.into_iter().enumerate() {
            rank[i] = r;
        }

        let n = graph.num_nodes();
        let forward =
            LabelStore::new(Direction::Forward, n, self.elementary).with_node_rank(rank.clone());
        let backward = LabelStore::new(Direction::Backward, n, self.elementary).with_node_rank(rank);
        (forward, backward)
    }

    /// Combines every extended forward label with every live backward label
    /// across the edges leaving it.
    ///
    /// Returns the ranked paths and, for non-elementary runs, the best
    /// reduced cost of a candidate that repeated a customer.
    fn join(
        &self,
        expansion: &Expansion<'_, '_>,
        forward: &LabelStore,
        backward: &LabelStore,
    ) -> (Vec<JoinedPath>, Option<f64>) {
        let graph = self.model.graph();
        let mut best = BestPaths::new(self.max_paths);
        let mut cyclic: Option<f64> = None;

        for node in 0..graph.num_nodes() {
            for (fid, f) in forward.alive_at(node) {
                if !expansion.extends(f) {
                    continue;
                }
                for edge in graph.outgoing(node) {
                    let step_cost = f.cost + expansion.reduced_cost(edge);
                    for (bid, b) in backward.alive_at(edge.head) {
                        if self.elementary && !f.visited.is_disjoint(&b.visited) {
                            continue;
                        }
                        let reduced_cost = step_cost + b.cost;
                        if !best.admits(reduced_cost) {
                            continue;
                        }
                        if self.model.join(&f.resources, edge, &b.resources).is_none() {
                            continue;
                        }

                        let mut nodes = forward.path(fid);
                        nodes.extend(backward.path(bid));
                        if !self.elementary && repeats_node(&nodes) {
                            if cyclic.is_none_or(|c| reduced_cost < c) {
                                cyclic = Some(reduced_cost);
                            }
                            continue;
                        }
                        match self.model.replay(&nodes) {
                            Some(resources) => {
                                best.offer(JoinedPath::new(graph, nodes, reduced_cost, resources));
                            }
                            None => trace!("joined path {nodes:?} failed replay"),
                        }
                    }
                }
            }
        }

        if let Some(c) = cyclic {
            trace!("best cyclic candidate {c} was not returned");
        }
        (best.into_paths(), cyclic)
    }
}

fn repeats_node(nodes: &[usize]) -> bool {
    let mut seen = NodeSet::new();
    for &i in nodes {
        if seen.contains(i) {
            return true;
        }
        seen.insert(i);
    }
    false
}
