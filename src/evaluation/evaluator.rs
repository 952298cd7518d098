//! Route evaluator that computes timing, load, and feasibility.

use crate::graph::{CustomerGraph, SINK, SOURCE};
use crate::models::{Route, Schedule, Violation, ViolationType, Visit};
use crate::pricing::{load_capacity, PricingConfig};

/// Recomputes start of service, departure and load along a route and checks
/// it against the constraints of a [`PricingConfig`].
///
/// Travel times already include service at the tail. Each visit's arrival is
/// its start of service; its departure is the latest time the vehicle can
/// leave without delaying the next start of service, capped at the node's
/// upper bound and never before the arrival.
///
/// # Examples
///
/// ```
/// use u_colgen::evaluation::RouteEvaluator;
/// use u_colgen::graph::CustomerGraph;
/// use u_colgen::models::{NodeId, Route, TimeWindow};
/// use u_colgen::pricing::PricingConfig;
///
/// let mut g = CustomerGraph::new(TimeWindow::new(0.0, 100.0).unwrap());
/// g.add_customer(1, 5.0, TimeWindow::new(20.0, 30.0).unwrap()).unwrap();
/// g.add_edge(NodeId::Source, NodeId::Customer(1), 4.0, 4.0).unwrap();
/// g.add_edge(NodeId::Customer(1), NodeId::Sink, 4.0, 6.0).unwrap();
///
/// let config = PricingConfig::default().with_time_windows(true);
/// let evaluator = RouteEvaluator::new(&g, &config);
/// let route = Route::new(vec![NodeId::Source, NodeId::Customer(1), NodeId::Sink], 8.0).unwrap();
/// let (schedule, violations) = evaluator.evaluate(&route);
///
/// assert!(violations.is_empty());
/// // waits at the customer until the window opens
/// assert_eq!(schedule.arrival(NodeId::Customer(1)), Some(20.0));
/// // leaving Source at 16 still reaches the customer at 20
/// assert_eq!(schedule.departure(NodeId::Source), Some(16.0));
/// assert_eq!(schedule.arrival(NodeId::Sink), Some(26.0));
/// ```
pub struct RouteEvaluator<'a> {
    graph: &'a CustomerGraph,
    config: &'a PricingConfig,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given graph and constraints.
    pub fn new(graph: &'a CustomerGraph, config: &'a PricingConfig) -> Self {
        Self { graph, config }
    }

    fn window_upper(&self, idx: usize) -> f64 {
        if self.config.time_windows {
            self.graph.node(idx).window().upper()
        } else {
            f64::INFINITY
        }
    }

    fn window_lower(&self, idx: usize) -> f64 {
        if self.config.time_windows {
            self.graph.node(idx).window().lower()
        } else {
            0.0
        }
    }

    /// Builds the timetable of a route.
    ///
    /// Returns the schedule and any constraint violations found. Unknown
    /// nodes and missing edges are reported and contribute no travel time.
    pub fn evaluate(&self, route: &Route) -> (Schedule, Vec<Violation>) {
        let mut violations = Vec::new();

        let mut indices = Vec::with_capacity(route.nodes().len());
        for &id in route.nodes() {
            match self.graph.index_of(id) {
                Some(idx) => indices.push(idx),
                None => violations.push(Violation::new(ViolationType::UnknownNode(id))),
            }
        }
        if !violations.is_empty() {
            return (Schedule::default(), violations);
        }

        // travel time into each node, 0 for Source
        let mut travel = vec![0.0; indices.len()];
        for (i, pair) in indices.windows(2).enumerate() {
            match self.graph.edge(pair[0], pair[1]) {
                Some(edge) => travel[i + 1] = edge.time,
                None => violations.push(Violation::new(ViolationType::MissingEdge {
                    tail: self.graph.node(pair[0]).id(),
                    head: self.graph.node(pair[1]).id(),
                })),
            }
        }

        let mut arrivals = Vec::with_capacity(indices.len());
        let mut loads = Vec::with_capacity(indices.len());
        let mut current_time = self.window_lower(SOURCE);
        let mut current_load = 0.0;
        for (i, &idx) in indices.iter().enumerate() {
            let node = self.graph.node(idx);
            if i > 0 {
                current_time = (current_time + travel[i]).max(self.window_lower(idx));
            }
            let upper = self.window_upper(idx);
            if current_time > upper {
                violations.push(Violation::new(ViolationType::TimeWindowViolated {
                    node: node.id(),
                    arrival: current_time,
                    upper,
                }));
            }
            current_load += node.demand();
            arrivals.push(current_time);
            loads.push(current_load);
        }

        let last = indices.len() - 1;
        let visits = indices
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let arrival = arrivals[i];
                let departure = if i == last || idx == SINK {
                    arrival
                } else {
                    (arrivals[i + 1] - travel[i + 1])
                        .min(self.window_upper(idx))
                        .max(arrival)
                };
                Visit {
                    node: self.graph.node(idx).id(),
                    arrival,
                    departure,
                    load: loads[i],
                }
            })
            .collect();
        let schedule = Schedule::new(visits);

        // Check capacity
        if let Some(capacity) = load_capacity(self.graph, self.config) {
            if schedule.total_load() > capacity {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    load: schedule.total_load(),
                    capacity,
                }));
            }
        }

        // Check max duration
        if let Some(max_duration) = self.config.duration {
            if schedule.duration() > max_duration {
                violations.push(Violation::new(ViolationType::DurationExceeded {
                    duration: schedule.duration(),
                    max_duration,
                }));
            }
        }

        if let Some(max_stops) = self.config.num_stops {
            if route.num_customers() > max_stops {
                violations.push(Violation::new(ViolationType::TooManyStops {
                    stops: route.num_customers(),
                    max_stops,
                }));
            }
        }

        (schedule, violations)
    }

    /// Returns `true` if the route breaks no constraint.
    pub fn is_feasible(&self, route: &Route) -> bool {
        self.evaluate(route).1.is_empty()
    }

    /// Timetables of several routes, in order.
    pub fn schedules<'r>(&self, routes: impl IntoIterator<Item = &'r Route>) -> Vec<Schedule> {
        routes.into_iter().map(|r| self.evaluate(r).0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeId, TimeWindow};

    fn tw(lower: f64, upper: f64) -> TimeWindow {
        TimeWindow::new(lower, upper).expect("valid")
    }

    // Source -> 1 -> 2 -> Sink, travel 10 per hop
    fn setup() -> CustomerGraph {
        let mut g = CustomerGraph::new(tw(0.0, 100.0)).with_vehicle_capacity(25.0);
        g.add_customer(1, 10.0, tw(0.0, 40.0)).expect("added");
        g.add_customer(2, 20.0, tw(35.0, 50.0)).expect("added");
        let ids = [NodeId::Source, NodeId::Customer(1), NodeId::Customer(2), NodeId::Sink];
        for pair in ids.windows(2) {
            g.add_edge(pair[0], pair[1], 10.0, 10.0).expect("added");
        }
        g.add_edge(NodeId::Source, NodeId::Customer(2), 15.0, 15.0)
            .expect("added");
        g
    }

    fn route(customers: &[usize]) -> Route {
        let mut nodes = vec![NodeId::Source];
        nodes.extend(customers.iter().map(|&c| NodeId::Customer(c)));
        nodes.push(NodeId::Sink);
        Route::new(nodes, 0.0).expect("valid route")
    }

    #[test]
    fn test_timing_chain() {
        let g = setup();
        let config = PricingConfig::default().with_time_windows(true).with_load_capacity(50.0);
        let eval = RouteEvaluator::new(&g, &config);
        let (schedule, violations) = eval.evaluate(&route(&[1, 2]));
        assert!(violations.is_empty());
        let arrivals: Vec<f64> = schedule.visits().iter().map(|v| v.arrival).collect();
        // 1 at 10, 2 opens at 35, Sink at 45
        assert_eq!(arrivals, vec![0.0, 10.0, 35.0, 45.0]);
        let departures: Vec<f64> = schedule.visits().iter().map(|v| v.departure).collect();
        // Source may leave until 0 (1 opens at 0), 1 may leave until 25
        assert_eq!(departures, vec![0.0, 25.0, 35.0, 45.0]);
        assert_eq!(schedule.total_load(), 30.0);
    }

    #[test]
    fn test_windows_within_bounds() {
        let g = setup();
        let config = PricingConfig::default().with_time_windows(true).with_load_capacity(50.0);
        let eval = RouteEvaluator::new(&g, &config);
        let (schedule, _) = eval.evaluate(&route(&[1, 2]));
        for visit in schedule.visits() {
            let w = g.node(g.index_of(visit.node).expect("known")).window();
            assert!(w.contains(visit.arrival));
            assert!(w.contains(visit.departure));
            assert!(visit.departure >= visit.arrival);
        }
    }

    #[test]
    fn test_capacity_falls_back_to_graph() {
        let g = setup();
        let config = PricingConfig::default();
        let eval = RouteEvaluator::new(&g, &config);
        let (_, violations) = eval.evaluate(&route(&[1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].kind,
            ViolationType::CapacityExceeded {
                load: 30.0,
                capacity: 25.0
            }
        );
    }

    #[test]
    fn test_time_window_violated() {
        let mut g = CustomerGraph::new(tw(0.0, 100.0));
        g.add_customer(1, 0.0, tw(0.0, 3.0)).expect("added");
        g.add_edge(NodeId::Source, NodeId::Customer(1), 5.0, 5.0)
            .expect("added");
        g.add_edge(NodeId::Customer(1), NodeId::Sink, 5.0, 5.0)
            .expect("added");
        let config = PricingConfig::default().with_time_windows(true);
        let eval = RouteEvaluator::new(&g, &config);
        let (_, violations) = eval.evaluate(&route(&[1]));
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationType::TimeWindowViolated {
                node: NodeId::Customer(1),
                ..
            }
        ));

        // ignored when windows are off
        let relaxed = PricingConfig::default();
        assert!(RouteEvaluator::new(&g, &relaxed).is_feasible(&route(&[1])));
    }

    #[test]
    fn test_missing_edge_and_unknown_node() {
        let g = setup();
        let config = PricingConfig::default().with_load_capacity(100.0);
        let eval = RouteEvaluator::new(&g, &config);
        let (_, violations) = eval.evaluate(&route(&[2, 1]));
        assert!(violations.iter().any(|v| v.kind
            == ViolationType::MissingEdge {
                tail: NodeId::Customer(2),
                head: NodeId::Customer(1)
            }));

        let (schedule, violations) = eval.evaluate(&route(&[7]));
        assert!(schedule.is_empty());
        assert_eq!(violations[0].kind, ViolationType::UnknownNode(NodeId::Customer(7)));
    }

    #[test]
    fn test_duration_and_stops() {
        let g = setup();
        let config = PricingConfig::default()
            .with_load_capacity(100.0)
            .with_duration(20.0)
            .with_num_stops(1);
        let eval = RouteEvaluator::new(&g, &config);
        let (_, violations) = eval.evaluate(&route(&[1, 2]));
        assert!(violations
            .iter()
            .any(|v| matches!(v.kind, ViolationType::DurationExceeded { .. })));
        assert!(violations.iter().any(|v| v.kind
            == ViolationType::TooManyStops {
                stops: 2,
                max_stops: 1
            }));
    }
}
