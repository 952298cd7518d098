//! Seeded random VRPTW instances.
//!
//! Customers are scattered over a 100×100 square around a central depot.
//! Every customer gets a window that a direct Source→customer→Sink trip can
//! meet, so each instance admits a covering set of routes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::GraphError;
use crate::models::{Customer, TimeWindow};

use super::CustomerGraph;

/// Depot time horizon of generated instances.
pub const HORIZON: f64 = 400.0;

const SERVICE_TIME: f64 = 5.0;

/// Generates the depot and `num_customers` customers with ids `1..=n`.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::generator::random_customers;
///
/// let (depot, customers) = random_customers(5, 7);
/// assert_eq!(customers.len(), 5);
/// assert_eq!(depot.demand(), 0.0);
///
/// // Same seed, same instance.
/// let (_, again) = random_customers(5, 7);
/// assert_eq!(customers, again);
/// ```
pub fn random_customers(num_customers: usize, seed: u64) -> (Customer, Vec<Customer>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let depot = Customer::new(0, 50.0, 50.0, 0.0)
        .with_time_window(TimeWindow::new(0.0, HORIZON).unwrap_or_default());

    let customers = (1..=num_customers)
        .map(|id| {
            let x = rng.random_range(0.0..100.0);
            let y = rng.random_range(0.0..100.0);
            let demand = f64::from(rng.random_range(1u32..=20));
            let from_depot = depot.distance_to(x, y);
            let width = rng.random_range(20.0..80.0);
            let lower: f64 = rng.random_range(0.0..220.0);
            let upper = (lower + width).max(from_depot);
            Customer::new(id, x, y, demand)
                .with_service_time(SERVICE_TIME)
                .with_time_window(TimeWindow::new(lower, upper).unwrap_or_default())
        })
        .collect();

    (depot, customers)
}

/// Generates a complete customer graph with the given vehicle capacity.
pub fn random_instance(
    num_customers: usize,
    capacity: f64,
    seed: u64,
) -> Result<CustomerGraph, GraphError> {
    let (depot, customers) = random_customers(num_customers, seed);
    Ok(CustomerGraph::from_customers(&depot, &customers)?.with_vehicle_capacity(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeId;

    #[test]
    fn test_direct_trips_meet_windows() {
        let g = random_instance(12, 50.0, 3).expect("valid");
        let sink_upper = g.node(crate::graph::SINK).window().upper();
        for id in g.customer_ids() {
            let c = g.index_of(NodeId::Customer(id)).expect("present");
            let out = g.edge(crate::graph::SOURCE, c).expect("present");
            let back = g.edge(c, crate::graph::SINK).expect("present");
            let window = g.node(c).window();
            let start = window.start_of_service(out.time);
            assert!(start <= window.upper());
            assert!(start + back.time <= sink_upper);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let (_, a) = random_customers(6, 1);
        let (_, b) = random_customers(6, 2);
        assert_ne!(a, b);
    }
}
