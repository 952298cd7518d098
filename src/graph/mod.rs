//! Customer graph consumed read-only by pricing.
//!
//! A directed graph with a single Source and a single Sink standing for the
//! depot. Nodes carry demand and time windows, edges carry cost and travel
//! time. Instances are assembled edge by edge, from dense matrices, or from
//! located customers.

mod customer_graph;
pub mod generator;
mod matrix;

pub use customer_graph::{CustomerGraph, Edge, Node, MAX_NODES, SINK, SOURCE};
pub use matrix::TravelMatrix;
