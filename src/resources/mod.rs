//! Resource model of the pricing subproblem.
//!
//! Every label carries a fixed-width vector with one slot per constraint
//! kind. Each slot owns its extension rule and its `[min, max]` bound, and a
//! constraint that is not configured leaves its slot inert instead of
//! changing the recurrence. Adding a constraint kind means adding a slot.

mod extension;
mod vector;

pub use extension::ResourceModel;
pub use vector::{Resource, ResourceBounds, ResourceVector, RESOURCE_COUNT};
