//! Pricing configuration.

use serde::{Deserialize, Serialize};

use crate::labeling::HalfwayResource;

/// A route improves the master iff its reduced cost is below `-REDUCED_COST_TOLERANCE`.
pub const REDUCED_COST_TOLERANCE: f64 = 1e-5;

/// Constraints and search settings for one pricing call.
///
/// Each active constraint bounds one resource slot:
/// - `num_stops`: at most this many customers per route
/// - `load_capacity`: cumulative demand; falls back to the graph's vehicle
///   capacity, and load is not tracked if neither is set
/// - `duration`: latest start of service at Sink
/// - `time_windows`: every start of service within its node's window
///
/// # Examples
///
/// ```
/// use u_colgen::labeling::HalfwayResource;
/// use u_colgen::pricing::PricingConfig;
///
/// let config = PricingConfig::default()
///     .with_load_capacity(200.0)
///     .with_time_windows(true)
///     .with_halfway(HalfwayResource::Arcs)
///     .with_max_routes(5);
/// assert!(config.elementary);
/// assert_eq!(config.num_stops, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Maximum number of customers per route.
    pub num_stops: Option<usize>,

    /// Vehicle capacity.
    pub load_capacity: Option<f64>,

    /// Maximum route duration.
    pub duration: Option<f64>,

    /// Enforce node time windows.
    pub time_windows: bool,

    /// Forbid repeated customers.
    ///
    /// Without it the visited set is ignored by dominance and the join, and
    /// only the resource bounds limit path length.
    pub elementary: bool,

    /// Resource splitting forward from backward work.
    pub halfway: HalfwayResource,

    /// Negative-reduced-cost routes returned per call.
    pub max_routes: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            num_stops: None,
            load_capacity: None,
            duration: None,
            time_windows: false,
            elementary: true,
            halfway: HalfwayResource::default(),
            max_routes: 1,
        }
    }
}

impl PricingConfig {
    /// Limits customers per route.
    pub fn with_num_stops(mut self, n: usize) -> Self {
        self.num_stops = Some(n);
        self
    }

    /// Sets the vehicle capacity.
    pub fn with_load_capacity(mut self, capacity: f64) -> Self {
        self.load_capacity = Some(capacity);
        self
    }

    /// Sets the latest start of service at Sink.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Enables or disables time windows.
    pub fn with_time_windows(mut self, enabled: bool) -> Self {
        self.time_windows = enabled;
        self
    }

    /// Requires or relaxes elementary routes.
    pub fn with_elementary(mut self, enabled: bool) -> Self {
        self.elementary = enabled;
        self
    }

    /// Sets the halfway resource.
    pub fn with_halfway(mut self, halfway: HalfwayResource) -> Self {
        self.halfway = halfway;
        self
    }

    /// Sets the number of routes per call; 0 is treated as 1.
    pub fn with_max_routes(mut self, n: usize) -> Self {
        self.max_routes = n.max(1);
        self
    }
}
