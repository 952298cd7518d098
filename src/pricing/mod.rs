//! Pricing: finding routes of negative reduced cost for the current duals.
//!
//! The [`PricingDriver`] turns a [`PricingConfig`] into resource bounds and
//! runs the bidirectional labeling search over the graph; reduced costs are
//! computed from the base edge costs and the [`Duals`] at traversal time, so
//! the graph is never rewritten. [`ExhaustivePricer`] enumerates every
//! elementary path under the same bounds and serves as a reference oracle.

mod config;
mod driver;
mod duals;
mod exhaustive;

pub use config::{PricingConfig, REDUCED_COST_TOLERANCE};
pub use driver::{
    load_capacity, price, resource_bounds, resource_model, Pricer, PricingDriver, PricingOutcome,
};
pub use duals::Duals;
pub use exhaustive::ExhaustivePricer;
