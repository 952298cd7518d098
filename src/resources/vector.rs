//! Resource slots, vectors, and bounds.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Number of resource slots per label.
pub const RESOURCE_COUNT: usize = 6;

/// A slot of the resource vector, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Arcs traversed. Monotone.
    Arcs,
    /// Stops made, bounded by the max-stops constraint.
    Stops,
    /// Cumulative demand, bounded by vehicle capacity.
    Load,
    /// Start of service at the current node.
    Time,
    /// 1 if service starts after the node's upper bound.
    TimeWindowViolation,
    /// 1 if the path repeats a customer.
    Elementarity,
}

impl Resource {
    /// All slots in vector order.
    pub const ALL: [Resource; RESOURCE_COUNT] = [
        Resource::Arcs,
        Resource::Stops,
        Resource::Load,
        Resource::Time,
        Resource::TimeWindowViolation,
        Resource::Elementarity,
    ];

    /// Position in the vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Arcs => "arcs",
            Resource::Stops => "stops",
            Resource::Load => "load",
            Resource::Time => "time",
            Resource::TimeWindowViolation => "time windows",
            Resource::Elementarity => "elementarity",
        };
        f.write_str(name)
    }
}

/// Fixed-width resource vector, indexed by [`Resource`].
///
/// # Examples
///
/// ```
/// use u_colgen::resources::{Resource, ResourceVector};
///
/// let mut v = ResourceVector::zeros();
/// v[Resource::Load] += 30.0;
/// assert_eq!(v[Resource::Load], 30.0);
/// assert_eq!(v.as_array()[2], 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceVector([f64; RESOURCE_COUNT]);

impl ResourceVector {
    /// All slots zero.
    pub fn zeros() -> Self {
        Self([0.0; RESOURCE_COUNT])
    }

    /// Wraps raw slot values.
    pub fn new(values: [f64; RESOURCE_COUNT]) -> Self {
        Self(values)
    }

    /// Raw slot values.
    pub fn as_array(&self) -> &[f64; RESOURCE_COUNT] {
        &self.0
    }
}

impl Index<Resource> for ResourceVector {
    type Output = f64;

    fn index(&self, r: Resource) -> &f64 {
        &self.0[r.index()]
    }
}

impl IndexMut<Resource> for ResourceVector {
    fn index_mut(&mut self, r: Resource) -> &mut f64 {
        &mut self.0[r.index()]
    }
}

/// Per-slot `[min, max]` bounds, fixed for one labeling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceBounds {
    /// Lower bound per slot.
    pub min: ResourceVector,
    /// Upper bound per slot.
    pub max: ResourceVector,
}

impl ResourceBounds {
    /// Creates bounds.
    pub fn new(min: ResourceVector, max: ResourceVector) -> Self {
        Self { min, max }
    }

    /// Checks that every slot has `min <= max`.
    pub fn validate(&self) -> Result<(), PricingError> {
        for r in Resource::ALL {
            let (min, max) = (self.min[r], self.max[r]);
            // NaN fails the comparison as well
            if !(min <= max) {
                return Err(PricingError::InfeasibleResourceBounds { resource: r, min, max });
            }
        }
        Ok(())
    }

    /// Returns `true` if every slot of `v` lies within its bound.
    pub fn contains(&self, v: &ResourceVector) -> bool {
        Resource::ALL
            .iter()
            .all(|&r| v[r] >= self.min[r] && v[r] <= self.max[r])
    }

    /// First slot of `v` outside its bound.
    pub fn first_violation(&self, v: &ResourceVector) -> Option<Resource> {
        Resource::ALL
            .iter()
            .copied()
            .find(|&r| !(v[r] >= self.min[r] && v[r] <= self.max[r]))
    }
}
