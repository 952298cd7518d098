//! Arena-indexed directed graph with Source and Sink.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::models::{Customer, NodeId, TimeWindow};
use crate::resources::RESOURCE_COUNT;

use super::TravelMatrix;

/// Arena index of the Source node.
pub const SOURCE: usize = 0;
/// Arena index of the Sink node.
pub const SINK: usize = 1;
/// Largest node count (depot aliases included) a graph may hold.
pub const MAX_NODES: usize = 256;

/// A graph node: identity, demand, and time window.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    demand: f64,
    window: TimeWindow,
}

impl Node {
    /// Node identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Demand (0 for the depot aliases).
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Time window for the start of service.
    pub fn window(&self) -> TimeWindow {
        self.window
    }
}

/// A directed edge between two arena indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Arena index of the tail.
    pub tail: usize,
    /// Arena index of the head.
    pub head: usize,
    /// Cost counted in the objective.
    pub cost: f64,
    /// Travel time, service at the tail included.
    pub time: f64,
}

/// Directed customer graph with a single Source and Sink.
///
/// Source sits at arena index [`SOURCE`], Sink at [`SINK`], customers follow
/// in insertion order. Edges may leave Source and enter Sink but never the
/// reverse, so every Source→Sink walk is a candidate route.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::CustomerGraph;
/// use u_colgen::models::{NodeId, TimeWindow};
///
/// let mut g = CustomerGraph::new(TimeWindow::new(0.0, 100.0).unwrap())
///     .with_vehicle_capacity(10.0);
/// g.add_customer(1, 4.0, TimeWindow::new(5.0, 20.0).unwrap()).unwrap();
/// g.add_edge(NodeId::Source, NodeId::Customer(1), 3.0, 3.0).unwrap();
/// g.add_edge(NodeId::Customer(1), NodeId::Sink, 3.0, 3.0).unwrap();
/// g.add_edge(NodeId::Source, NodeId::Sink, 0.0, 0.0).unwrap();
///
/// assert_eq!(g.num_nodes(), 3);
/// assert_eq!(g.num_edges(), 3);
/// assert_eq!(g.vehicle_capacity(), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct CustomerGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(usize, usize), usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    vehicle_capacity: Option<f64>,
}

impl CustomerGraph {
    /// Creates a graph holding only Source and Sink, both with the depot window.
    pub fn new(depot_window: TimeWindow) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            vehicle_capacity: None,
        };
        graph.push_node(NodeId::Source, 0.0, depot_window);
        graph.push_node(NodeId::Sink, 0.0, depot_window);
        graph
    }

    /// Sets the vehicle capacity graph attribute.
    pub fn with_vehicle_capacity(mut self, capacity: f64) -> Self {
        self.vehicle_capacity = Some(capacity);
        self
    }

    fn push_node(&mut self, id: NodeId, demand: f64, window: TimeWindow) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node { id, demand, window });
        self.index.insert(id, idx);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Adds a customer and returns its arena index.
    pub fn add_customer(
        &mut self,
        id: usize,
        demand: f64,
        window: TimeWindow,
    ) -> Result<usize, GraphError> {
        let node = NodeId::Customer(id);
        if self.index.contains_key(&node) {
            return Err(GraphError::DuplicateCustomer(id));
        }
        if !demand.is_finite() || demand < 0.0 {
            return Err(GraphError::InvalidDemand {
                customer: id,
                demand,
            });
        }
        if self.nodes.len() >= MAX_NODES {
            return Err(GraphError::TooManyNodes {
                nodes: self.nodes.len() + 1,
                limit: MAX_NODES,
            });
        }
        Ok(self.push_node(node, demand, window))
    }

    /// Adds the edge `tail → head` and returns its index.
    pub fn add_edge(
        &mut self,
        tail: NodeId,
        head: NodeId,
        cost: f64,
        time: f64,
    ) -> Result<usize, GraphError> {
        let t = self.index_of(tail).ok_or(GraphError::UnknownNode(tail))?;
        let h = self.index_of(head).ok_or(GraphError::UnknownNode(head))?;
        if t == h {
            return Err(GraphError::SelfLoop(tail));
        }
        if t == SINK || h == SOURCE {
            return Err(GraphError::DepotOrientation(tail, head));
        }
        if !time.is_finite() || time < 0.0 {
            return Err(GraphError::InvalidTravelTime { tail, head, time });
        }
        if self.edge_index.contains_key(&(t, h)) {
            return Err(GraphError::DuplicateEdge(tail, head));
        }

        let e = self.edges.len();
        self.edges.push(Edge {
            tail: t,
            head: h,
            cost,
            time,
        });
        self.edge_index.insert((t, h), e);
        self.outgoing[t].push(e);
        self.incoming[h].push(e);
        Ok(e)
    }

    /// Builds the complete graph over `customers` from dense matrices.
    ///
    /// Matrix index 0 is the depot, index `i` is `customers[i - 1]`. Travel
    /// times are taken as given, so any service time must already be folded
    /// in. The result holds every edge between customers and the depot
    /// aliases except self loops, plus the direct Source→Sink edge.
    pub fn from_matrices(
        depot_window: TimeWindow,
        customers: &[Customer],
        costs: &TravelMatrix,
        times: &TravelMatrix,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(depot_window);
        for c in customers {
            graph.add_customer(c.id(), c.demand(), c.time_window())?;
        }

        let ids: Vec<NodeId> = customers.iter().map(|c| NodeId::Customer(c.id())).collect();
        graph.add_edge(NodeId::Source, NodeId::Sink, costs.get(0, 0), times.get(0, 0))?;
        for (i, &from) in ids.iter().enumerate() {
            graph.add_edge(NodeId::Source, from, costs.get(0, i + 1), times.get(0, i + 1))?;
            graph.add_edge(from, NodeId::Sink, costs.get(i + 1, 0), times.get(i + 1, 0))?;
            for (j, &to) in ids.iter().enumerate() {
                if i != j {
                    graph.add_edge(from, to, costs.get(i + 1, j + 1), times.get(i + 1, j + 1))?;
                }
            }
        }
        Ok(graph)
    }

    /// Builds the complete graph from located customers.
    ///
    /// Edge cost is the Euclidean distance; travel time is that distance plus
    /// the service time of the tail.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_colgen::graph::CustomerGraph;
    /// use u_colgen::models::{Customer, NodeId};
    ///
    /// let depot = Customer::new(0, 0.0, 0.0, 0.0);
    /// let customers = vec![
    ///     Customer::new(1, 3.0, 4.0, 5.0).with_service_time(10.0),
    ///     Customer::new(2, 6.0, 8.0, 5.0),
    /// ];
    /// let g = CustomerGraph::from_customers(&depot, &customers).unwrap();
    ///
    /// // 2 customers: 2 * 1 inner edges, 2 out of Source, 2 into Sink, Source→Sink.
    /// assert_eq!(g.num_edges(), 7);
    /// let e = g.edge_between(NodeId::Customer(1), NodeId::Customer(2)).unwrap();
    /// assert!((e.cost - 5.0).abs() < 1e-9);
    /// assert!((e.time - 15.0).abs() < 1e-9);
    /// ```
    pub fn from_customers(depot: &Customer, customers: &[Customer]) -> Result<Self, GraphError> {
        let mut locations = Vec::with_capacity(customers.len() + 1);
        locations.push(depot);
        locations.extend(customers.iter());

        let costs = TravelMatrix::euclidean(&locations);
        let mut times = costs.clone();
        for (i, from) in locations.iter().enumerate() {
            for j in 0..locations.len() {
                if i != j {
                    times.set(i, j, costs.get(i, j) + from.service_time());
                }
            }
        }
        Self::from_matrices(depot.time_window(), customers, &costs, &times)
    }

    /// Arena index of a node identity.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Node at an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes, depot aliases included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of customers.
    pub fn num_customers(&self) -> usize {
        self.nodes.len() - 2
    }

    /// Customer ids in arena order.
    pub fn customer_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|n| n.id.customer())
    }

    /// All edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving the node at `idx`.
    pub fn outgoing(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[idx].iter().map(move |&e| &self.edges[e])
    }

    /// Edges entering the node at `idx`.
    pub fn incoming(&self, idx: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[idx].iter().map(move |&e| &self.edges[e])
    }

    /// Edge between two arena indices, if present.
    pub fn edge(&self, tail: usize, head: usize) -> Option<&Edge> {
        self.edge_index.get(&(tail, head)).map(|&e| &self.edges[e])
    }

    /// Edge between two node identities, if present.
    pub fn edge_between(&self, tail: NodeId, head: NodeId) -> Option<&Edge> {
        self.edge(self.index_of(tail)?, self.index_of(head)?)
    }

    /// Vehicle capacity attribute.
    pub fn vehicle_capacity(&self) -> Option<f64> {
        self.vehicle_capacity
    }

    /// Number of resources tracked per label.
    pub fn num_resources(&self) -> usize {
        RESOURCE_COUNT
    }

    /// Sum of all demands.
    pub fn total_demand(&self) -> f64 {
        self.nodes.iter().map(|n| n.demand).sum()
    }

    /// Sum of all travel times.
    pub fn total_time(&self) -> f64 {
        self.edges.iter().map(|e| e.time).sum()
    }
}
