//! Bidirectional labeling for the elementary shortest path with resource
//! constraints.
//!
//! Forward labels grow from Source, backward labels from Sink. Each side is
//! pruned by dominance and stops extending once it crosses the halfway value
//! of a chosen monotone resource; the two sides are then joined across
//! edges into complete Source→Sink paths.
//!
//! - [`NodeSet`] — fixed-width visited set
//! - [`Label`], [`LabelStore`] — arena of labels with dominance pruning
//! - [`BidirectionalSearch`] — INIT → EXPAND → JOIN → DONE
//! - [`BestPaths`] — the k best joined paths under the tie-break policy

mod engine;
mod label;
mod nodeset;
mod paths;

pub use engine::{BidirectionalSearch, HalfwayResource, SearchOutcome, SearchState};
pub use label::{Direction, Label, LabelId, LabelStore};
pub use nodeset::NodeSet;
pub use paths::{BestPaths, JoinedPath};
