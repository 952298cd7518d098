//! Error types for graph construction, pricing, and column generation.

use std::fmt;

use crate::models::NodeId;
use crate::resources::Resource;

/// An error raised while assembling a [`CustomerGraph`](crate::graph::CustomerGraph).
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A customer with this id was already added.
    DuplicateCustomer(usize),
    /// An edge refers to a node that is not part of the graph.
    UnknownNode(NodeId),
    /// Tail and head of an edge are the same node.
    SelfLoop(NodeId),
    /// An edge was declared twice.
    DuplicateEdge(NodeId, NodeId),
    /// Edges may not enter Source or leave Sink.
    DepotOrientation(NodeId, NodeId),
    /// Travel times must be finite and non-negative.
    InvalidTravelTime { tail: NodeId, head: NodeId, time: f64 },
    /// Demands must be finite and non-negative.
    InvalidDemand { customer: usize, demand: f64 },
    /// The visited-set bitset holds at most this many nodes.
    TooManyNodes { nodes: usize, limit: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateCustomer(id) => write!(f, "customer {id} added twice"),
            GraphError::UnknownNode(node) => write!(f, "edge refers to unknown node {node}"),
            GraphError::SelfLoop(node) => write!(f, "self loop at {node}"),
            GraphError::DuplicateEdge(tail, head) => {
                write!(f, "edge ({tail}, {head}) declared twice")
            }
            GraphError::DepotOrientation(tail, head) => {
                write!(f, "edge ({tail}, {head}) enters Source or leaves Sink")
            }
            GraphError::InvalidTravelTime { tail, head, time } => {
                write!(f, "edge ({tail}, {head}) has invalid travel time {time}")
            }
            GraphError::InvalidDemand { customer, demand } => {
                write!(f, "customer {customer} has invalid demand {demand}")
            }
            GraphError::TooManyNodes { nodes, limit } => {
                write!(f, "graph has {nodes} nodes, at most {limit} are supported")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// An error raised by a pricing call.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// The configured constraints make the root labels' bounds inconsistent.
    InfeasibleResourceBounds {
        /// Offending resource slot.
        resource: Resource,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A root label starts outside the configured window of a resource.
    InfeasibleRoot {
        /// Offending resource slot.
        resource: Resource,
        /// Root value of the resource.
        value: f64,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InfeasibleResourceBounds { resource, min, max } => write!(
                f,
                "inconsistent bounds for resource {resource}: min {min} > max {max}"
            ),
            PricingError::InfeasibleRoot {
                resource,
                value,
                min,
                max,
            } => write!(
                f,
                "root value {value} of resource {resource} outside [{min}, {max}]"
            ),
        }
    }
}

impl std::error::Error for PricingError {}

/// An error raised by a master relaxation.
#[derive(Debug, Clone, PartialEq)]
pub enum MasterError {
    /// Some customer is covered by no column, so the relaxation has no solution.
    Uncovered(usize),
    /// Covering columns must have non-negative cost.
    NegativeRouteCost(f64),
    /// The LP solver rejected the relaxation.
    Solver(String),
}

impl fmt::Display for MasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasterError::Uncovered(id) => write!(f, "customer {id} is not covered by any route"),
            MasterError::NegativeRouteCost(cost) => {
                write!(f, "route cost {cost} is negative")
            }
            MasterError::Solver(reason) => write!(f, "LP solver failed: {reason}"),
        }
    }
}

impl std::error::Error for MasterError {}

/// A terminal failure of the column generation loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ColGenError {
    /// Pricing found no feasible Source→Sink path under the configured bounds.
    PricingInfeasible,
    /// A customer cannot be served even by a direct Source→customer→Sink route.
    UncoverableCustomer(usize),
    /// An initial route is not a Source→…→Sink path over known, distinct customers.
    InvalidInitialRoute(Vec<NodeId>),
    /// Pricing failed.
    Pricing(PricingError),
    /// The master relaxation failed.
    Master(MasterError),
}

impl fmt::Display for ColGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColGenError::PricingInfeasible => {
                write!(f, "no feasible Source to Sink path under the configured bounds")
            }
            ColGenError::UncoverableCustomer(id) => {
                write!(f, "customer {id} cannot be served by any feasible route")
            }
            ColGenError::InvalidInitialRoute(nodes) => {
                write!(f, "invalid initial route {nodes:?}")
            }
            ColGenError::Pricing(e) => write!(f, "pricing failed: {e}"),
            ColGenError::Master(e) => write!(f, "master relaxation failed: {e}"),
        }
    }
}

impl std::error::Error for ColGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ColGenError::Pricing(e) => Some(e),
            ColGenError::Master(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PricingError> for ColGenError {
    fn from(e: PricingError) -> Self {
        ColGenError::Pricing(e)
    }
}

impl From<MasterError> for ColGenError {
    fn from(e: MasterError) -> Self {
        ColGenError::Master(e)
    }
}
