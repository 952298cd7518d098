//! Time windows and located customers.

use serde::{Deserialize, Serialize};

/// Interval `[lower, upper]` in which service at a node may start.
///
/// Arriving before `lower` means waiting; starting after `upper` is
/// infeasible.
///
/// # Examples
///
/// ```
/// use u_colgen::models::TimeWindow;
///
/// let tw = TimeWindow::new(65.0, 146.0).unwrap();
/// assert_eq!(tw.start_of_service(30.0), 65.0);
/// assert_eq!(tw.start_of_service(100.0), 100.0);
/// assert!(tw.contains(146.0));
/// assert!(TimeWindow::new(10.0, 5.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    lower: f64,
    upper: f64,
}

impl TimeWindow {
    /// Creates a window.
    ///
    /// Returns `None` unless `0 <= lower <= upper` and both are finite.
    pub fn new(lower: f64, upper: f64) -> Option<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower < 0.0 || lower > upper {
            return None;
        }
        Some(Self { lower, upper })
    }

    /// The window `[0, +inf)`, used for nodes without a time restriction.
    pub fn open() -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// Earliest start of service.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Latest start of service.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `time` lies inside the window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.lower && time <= self.upper
    }

    /// Start of service for a vehicle arriving at `arrival` (waits if early).
    pub fn start_of_service(&self, arrival: f64) -> f64 {
        arrival.max(self.lower)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::open()
    }
}

/// A customer with planar coordinates, as found in benchmark instances.
///
/// Only instance builders such as
/// [`CustomerGraph::from_customers`](crate::graph::CustomerGraph::from_customers)
/// use coordinates; pricing works on the graph's edge attributes.
///
/// # Examples
///
/// ```
/// use u_colgen::models::{Customer, TimeWindow};
///
/// let c = Customer::new(3, 42.0, 66.0, 10.0)
///     .with_service_time(90.0)
///     .with_time_window(TimeWindow::new(65.0, 146.0).unwrap());
/// assert_eq!(c.id(), 3);
/// assert_eq!(c.time_window().lower(), 65.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: f64,
    service_time: f64,
    time_window: TimeWindow,
}

impl Customer {
    /// Creates a customer without service time or time window.
    pub fn new(id: usize, x: f64, y: f64, demand: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_time: 0.0,
            time_window: TimeWindow::open(),
        }
    }

    /// Sets the service duration, folded into the travel time of outgoing edges.
    pub fn with_service_time(mut self, service_time: f64) -> Self {
        self.service_time = service_time;
        self
    }

    /// Sets the time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }

    /// External customer id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand to be served.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Service duration.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Time window (open if none was set).
    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}
