//! Timetables of routes and the constraint violations found on them.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// One node of a timetabled route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Node visited.
    pub node: NodeId,
    /// Start of service.
    pub arrival: f64,
    /// Latest time the vehicle can leave without delaying the next node.
    pub departure: f64,
    /// Cumulative demand after this node.
    pub load: f64,
}

/// Arrival and departure times along one route.
///
/// # Examples
///
/// ```
/// use u_colgen::models::{NodeId, Schedule, Visit};
///
/// let schedule = Schedule::new(vec![
///     Visit { node: NodeId::Source, arrival: 0.0, departure: 2.0, load: 0.0 },
///     Visit { node: NodeId::Customer(4), arrival: 10.0, departure: 10.0, load: 3.0 },
///     Visit { node: NodeId::Sink, arrival: 25.0, departure: 25.0, load: 3.0 },
/// ]);
/// assert_eq!(schedule.arrival(NodeId::Customer(4)), Some(10.0));
/// assert_eq!(schedule.departure(NodeId::Source), Some(2.0));
/// assert_eq!(schedule.total_load(), 3.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    visits: Vec<Visit>,
}

impl Schedule {
    /// Schedule from visits in route order.
    pub fn new(visits: Vec<Visit>) -> Self {
        Self { visits }
    }

    /// Visits in route order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of visits, depot included.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if there are no visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Visit of a node, if on the route.
    pub fn visit(&self, node: NodeId) -> Option<&Visit> {
        self.visits.iter().find(|v| v.node == node)
    }

    /// Arrival time at a node, if on the route.
    pub fn arrival(&self, node: NodeId) -> Option<f64> {
        self.visit(node).map(|v| v.arrival)
    }

    /// Departure time from a node, if on the route.
    pub fn departure(&self, node: NodeId) -> Option<f64> {
        self.visit(node).map(|v| v.departure)
    }

    /// Load at the end of the route.
    pub fn total_load(&self) -> f64 {
        self.visits.last().map_or(0.0, |v| v.load)
    }

    /// Start of service at Sink.
    pub fn duration(&self) -> f64 {
        self.visits.last().map_or(0.0, |v| v.arrival)
    }
}

/// A type of constraint violation on a route.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Node not in the graph.
    UnknownNode(NodeId),
    /// Consecutive nodes with no edge between them.
    MissingEdge {
        /// Tail of the missing edge.
        tail: NodeId,
        /// Head of the missing edge.
        head: NodeId,
    },
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Total demand on the route.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// Service starts after the node's window closes.
    TimeWindowViolated {
        /// Node where service starts late.
        node: NodeId,
        /// Start of service.
        arrival: f64,
        /// Window upper bound.
        upper: f64,
    },
    /// Arrival at Sink after the maximum duration.
    DurationExceeded {
        /// Arrival at Sink.
        duration: f64,
        /// Maximum allowed duration.
        max_duration: f64,
    },
    /// More customers than the stop limit.
    TooManyStops {
        /// Customers on the route.
        stops: usize,
        /// Stop limit.
        max_stops: usize,
    },
}

/// A constraint violation on a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Violation of the given kind.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}
