//! # u-colgen
//!
//! Column generation for the vehicle routing problem with time windows:
//! a bidirectional labeling pricer for the elementary shortest path with
//! resource constraints, driven against a linear master relaxation.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (NodeId, TimeWindow, Customer, Route, Schedule)
//! - [`graph`] — Customer graph with Source and Sink, travel matrices, random instances
//! - [`resources`] — Resource vectors, bounds, and extension functions
//! - [`labeling`] — Labels, dominance, and the bidirectional search
//! - [`pricing`] — Pricing driver, duals, and the exhaustive reference pricer
//! - [`colgen`] — Master relaxation, route pool, and the column generation loop
//! - [`evaluation`] — Route timetables and feasibility checking
//! - [`error`] — Error types
//!
//! ## Features
//!
//! - `parallel` — run the forward and backward expansions on the rayon pool

pub mod colgen;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod labeling;
pub mod models;
pub mod pricing;
pub mod resources;
