//! Node identities of the customer graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a node in the customer graph.
///
/// The depot appears twice: as `Source` (every route starts there) and as
/// `Sink` (every route ends there). The derived ordering places `Source`
/// first, customers by id, and `Sink` last, which is the order used to break
/// ties between routes of equal reduced cost.
///
/// # Examples
///
/// ```
/// use u_colgen::models::NodeId;
///
/// assert!(NodeId::Source < NodeId::Customer(0));
/// assert!(NodeId::Customer(7) < NodeId::Customer(12));
/// assert!(NodeId::Customer(1_000) < NodeId::Sink);
/// assert_eq!(NodeId::Customer(3).customer(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeId {
    /// Depot alias every route leaves from.
    Source,
    /// A customer, identified by its external id.
    Customer(usize),
    /// Depot alias every route returns to.
    Sink,
}

impl NodeId {
    /// Returns the customer id, or `None` for the depot aliases.
    pub fn customer(&self) -> Option<usize> {
        match self {
            NodeId::Customer(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` for `Source` and `Sink`.
    pub fn is_depot(&self) -> bool {
        !matches!(self, NodeId::Customer(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Source => write!(f, "Source"),
            NodeId::Customer(id) => write!(f, "{id}"),
            NodeId::Sink => write!(f, "Sink"),
        }
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId::Customer(id)
    }
}
