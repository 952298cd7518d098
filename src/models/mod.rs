//! Domain model types for VRPTW column generation.
//!
//! Provides node identities (customers plus the two depot aliases), time
//! windows, located customers used by instance builders, routes (the
//! columns exchanged with the master problem) and their timetables.

mod customer;
mod node;
mod route;
mod schedule;

pub use customer::{Customer, TimeWindow};
pub use node::NodeId;
pub use route::Route;
pub use schedule::{Schedule, Violation, ViolationType, Visit};
