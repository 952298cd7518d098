//! The pricing driver: constraints → bounds → labeling → routes.

use log::debug;

use crate::error::PricingError;
use crate::graph::CustomerGraph;
use crate::labeling::{BidirectionalSearch, JoinedPath, SearchOutcome};
use crate::models::Route;
use crate::resources::{Resource, ResourceBounds, ResourceModel, ResourceVector};

use super::{Duals, PricingConfig, REDUCED_COST_TOLERANCE};

/// Verdict of one pricing call.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingOutcome {
    /// At least one route with reduced cost below the tolerance.
    Improving {
        /// Routes in rank order, true costs attached.
        routes: Vec<Route>,
        /// Reduced cost of the first route.
        reduced_cost: f64,
    },
    /// Feasible paths exist but none improves the master.
    NoImprovingRoute {
        /// Smallest reduced cost found.
        reduced_cost: f64,
    },
    /// No Source→Sink path satisfies the bounds.
    Infeasible,
}

impl PricingOutcome {
    /// Improving routes, empty for the other verdicts.
    pub fn routes(&self) -> &[Route] {
        match self {
            PricingOutcome::Improving { routes, .. } => routes,
            _ => &[],
        }
    }

    /// Best reduced cost, if any path was feasible.
    pub fn reduced_cost(&self) -> Option<f64> {
        match self {
            PricingOutcome::Improving { reduced_cost, .. }
            | PricingOutcome::NoImprovingRoute { reduced_cost } => Some(*reduced_cost),
            PricingOutcome::Infeasible => None,
        }
    }

    /// Returns `true` for [`PricingOutcome::Improving`].
    pub fn is_improving(&self) -> bool {
        matches!(self, PricingOutcome::Improving { .. })
    }
}

/// A pricing oracle.
///
/// Implementations must be pure: the same graph and duals give the same
/// outcome.
pub trait Pricer {
    /// Constraints this pricer applies.
    fn config(&self) -> &PricingConfig;

    /// Searches for routes of negative reduced cost.
    fn price(&self, graph: &CustomerGraph, duals: &Duals) -> Result<PricingOutcome, PricingError>;
}

/// Capacity in force: the configured one, else the graph attribute.
pub fn load_capacity(graph: &CustomerGraph, config: &PricingConfig) -> Option<f64> {
    config.load_capacity.or(graph.vehicle_capacity())
}

/// Resource bounds implied by the configured constraints.
///
/// Minimums are all zero. Inactive constraints get a bound no path can
/// reach, so they never prune.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::generator::random_instance;
/// use u_colgen::pricing::{resource_bounds, PricingConfig};
/// use u_colgen::resources::Resource;
///
/// let g = random_instance(4, 30.0, 1).unwrap();
/// let config = PricingConfig::default().with_num_stops(2).with_time_windows(true);
/// let bounds = resource_bounds(&g, &config);
///
/// assert_eq!(bounds.max[Resource::Stops], 3.0);
/// assert_eq!(bounds.max[Resource::Load], 30.0);
/// assert_eq!(bounds.max[Resource::TimeWindowViolation], 0.0);
/// ```
pub fn resource_bounds(graph: &CustomerGraph, config: &PricingConfig) -> ResourceBounds {
    let mut max = ResourceVector::zeros();
    max[Resource::Arcs] = graph.num_edges() as f64;
    // one arc per customer plus the arc into Sink
    max[Resource::Stops] = match config.num_stops {
        Some(n) => (n + 1) as f64,
        None => graph.num_nodes() as f64,
    };
    max[Resource::Load] = load_capacity(graph, config).unwrap_or_else(|| graph.total_demand());
    max[Resource::Time] = match (config.duration, config.time_windows) {
        (Some(d), _) => d,
        (None, true) => 1.0 + graph.node(crate::graph::SINK).window().upper(),
        (None, false) => graph.total_time(),
    };
    max[Resource::TimeWindowViolation] = if config.time_windows { 0.0 } else { 1.0 };
    max[Resource::Elementarity] = if config.elementary { 0.0 } else { 1.0 };

    ResourceBounds::new(ResourceVector::zeros(), max)
}

/// Builds the resource model for a call, rejecting inconsistent bounds.
pub fn resource_model<'g>(
    graph: &'g CustomerGraph,
    config: &PricingConfig,
) -> Result<ResourceModel<'g>, PricingError> {
    let bounds = resource_bounds(graph, config);
    bounds.validate()?;
    let model = ResourceModel::new(
        graph,
        bounds,
        config.time_windows,
        load_capacity(graph, config).is_some(),
    );
    model.validate_root()?;
    debug!(
        "pricing bounds {:?}, latest arrival at Sink {}",
        bounds.max.as_array(),
        model.max_feasible_arrival()
    );
    Ok(model)
}

/// Turns ranked joined paths into a verdict with true-cost routes.
///
/// Paths that do not form a valid route are dropped before the verdict, so
/// `NoImprovingRoute` never carries a reduced cost below the tolerance.
pub(super) fn classify(graph: &CustomerGraph, paths: &[JoinedPath]) -> PricingOutcome {
    let ranked: Vec<(f64, Route)> = paths
        .iter()
        .filter_map(|p| materialize(graph, p).map(|route| (p.reduced_cost, route)))
        .collect();
    let Some(&(reduced_cost, _)) = ranked.first() else {
        return PricingOutcome::Infeasible;
    };

    let routes: Vec<Route> = ranked
        .into_iter()
        .take_while(|(rc, _)| *rc < -REDUCED_COST_TOLERANCE)
        .map(|(_, route)| route)
        .collect();
    if routes.is_empty() {
        debug!("no improving route, best reduced cost {reduced_cost}");
        return PricingOutcome::NoImprovingRoute { reduced_cost };
    }

    for route in &routes {
        debug!("improving route {route}");
    }
    PricingOutcome::Improving {
        routes,
        reduced_cost,
    }
}

/// Returns `true` if a non-elementary run cannot settle the verdict.
///
/// Returned paths never repeat a customer. A withheld cyclic candidate
/// below the tolerance means the elementary best may be missing, as does a
/// run whose only complete paths were cyclic.
fn needs_elementary_rerun(outcome: &SearchOutcome) -> bool {
    let Some(cyclic) = outcome.cyclic_reduced_cost else {
        return false;
    };
    match outcome.best() {
        None => true,
        Some(best) => {
            cyclic < -REDUCED_COST_TOLERANCE && best.reduced_cost >= -REDUCED_COST_TOLERANCE
        }
    }
}

/// Route with the undualized edge costs summed along the path.
fn materialize(graph: &CustomerGraph, path: &JoinedPath) -> Option<Route> {
    let mut cost = 0.0;
    for pair in path.nodes.windows(2) {
        cost += graph.edge(pair[0], pair[1])?.cost;
    }
    let route = Route::new(path.ids.clone(), cost);
    if route.is_none() {
        debug!("path {:?} is not an elementary route, skipped", path.ids);
    }
    route
}

/// Pricing with the bidirectional labeling search.
///
/// # Examples
///
/// ```
/// use u_colgen::graph::generator::random_instance;
/// use u_colgen::models::NodeId;
/// use u_colgen::pricing::{Duals, Pricer, PricingConfig, PricingDriver, PricingOutcome};
///
/// let g = random_instance(6, 40.0, 11).unwrap();
/// let driver = PricingDriver::new(PricingConfig::default().with_time_windows(true));
///
/// // Zero duals: nothing beats the empty route.
/// let outcome = driver.price(&g, &Duals::new()).unwrap();
/// assert!(matches!(outcome, PricingOutcome::NoImprovingRoute { .. }));
///
/// // Generous duals make every direct trip attractive.
/// let duals: Duals = g.customer_ids().map(|id| (id, 1000.0)).collect();
/// let outcome = driver.price(&g, &duals).unwrap();
/// let route = &outcome.routes()[0];
/// assert_eq!(route.nodes().first(), Some(&NodeId::Source));
/// assert!(route.num_customers() >= 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PricingDriver {
    config: PricingConfig,
}

impl PricingDriver {
    /// Creates a driver applying `config` to every call.
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }
}

impl Pricer for PricingDriver {
    fn config(&self) -> &PricingConfig {
        &self.config
    }

    fn price(&self, graph: &CustomerGraph, duals: &Duals) -> Result<PricingOutcome, PricingError> {
        let model = resource_model(graph, &self.config)?;
        let duals = duals.by_index(graph);
        let search = |elementary: bool| {
            BidirectionalSearch::new(&model, duals.clone(), self.config.halfway, elementary)
                .with_max_paths(self.config.max_routes)
                .run()
        };

        let mut outcome = search(self.config.elementary);
        if !self.config.elementary && needs_elementary_rerun(&outcome) {
            debug!(
                "cyclic candidate {:?} beats every elementary path, searching elementary paths",
                outcome.cyclic_reduced_cost
            );
            outcome = search(true);
        }
        Ok(classify(graph, &outcome.paths))
    }
}

/// Prices once with a [`PricingDriver`] built from `config`.
pub fn price(
    graph: &CustomerGraph,
    duals: &Duals,
    config: &PricingConfig,
) -> Result<PricingOutcome, PricingError> {
    PricingDriver::new(config.clone()).price(graph, duals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generator::random_instance;
    use crate::graph::{SINK, SOURCE};
    use crate::labeling::HalfwayResource;
    use crate::models::{NodeId, TimeWindow};
    use crate::pricing::ExhaustivePricer;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn tw(lower: f64, upper: f64) -> TimeWindow {
        TimeWindow::new(lower, upper).expect("valid")
    }

    fn random_duals(graph: &CustomerGraph, seed: u64, scale: f64) -> Duals {
        let mut rng = StdRng::seed_from_u64(seed);
        graph
            .customer_ids()
            .map(|id| (id, rng.random_range(0.0..scale)))
            .collect()
    }

    // Complete graph over the customers in insertion order, unit costs and times.
    fn complete(ids: &[usize]) -> CustomerGraph {
        let mut g = CustomerGraph::new(TimeWindow::open());
        for &id in ids {
            g.add_customer(id, 1.0, TimeWindow::open()).expect("added");
        }
        let mut nodes = vec![NodeId::Source, NodeId::Sink];
        nodes.extend(ids.iter().map(|&id| NodeId::Customer(id)));
        for &a in &nodes {
            for &b in &nodes {
                if a != b && a != NodeId::Sink && b != NodeId::Source {
                    g.add_edge(a, b, 1.0, 1.0).expect("added");
                }
            }
        }
        g
    }

    // Leaving and re-entering customer 1 through 2 is cheap; visiting it once is not.
    fn detour_graph() -> CustomerGraph {
        let mut g = CustomerGraph::new(TimeWindow::open());
        g.add_customer(1, 1.0, TimeWindow::open()).expect("added");
        g.add_customer(2, 1.0, TimeWindow::open()).expect("added");
        let c1 = NodeId::Customer(1);
        let c2 = NodeId::Customer(2);
        for (a, b, cost) in [
            (NodeId::Source, c1, 6.0),
            (c1, NodeId::Sink, 6.0),
            (c1, c2, 1.0),
            (c2, c1, 1.0),
            (NodeId::Source, c2, 5.0),
            (c2, NodeId::Sink, 5.0),
        ] {
            g.add_edge(a, b, cost, 1.0).expect("added");
        }
        g
    }

    fn outcome_with(best: Option<f64>, cyclic: Option<f64>) -> SearchOutcome {
        let g = complete(&[1]);
        SearchOutcome {
            paths: best
                .map(|rc| JoinedPath::new(&g, vec![SOURCE, SINK], rc, ResourceVector::zeros()))
                .into_iter()
                .collect(),
            forward_labels: 1,
            backward_labels: 1,
            cyclic_reduced_cost: cyclic,
        }
    }

    #[test]
    fn test_non_elementary_keeps_elementary_best() {
        let g = complete(&[1, 2]);
        let duals: Duals = [(1, 10.0)].into_iter().collect();
        let config = PricingConfig::default().with_elementary(false);
        let outcome = price(&g, &duals, &config).expect("priced");
        assert_eq!(outcome.reduced_cost(), Some(-8.0));
        assert_eq!(
            outcome.routes()[0].nodes(),
            &[NodeId::Source, NodeId::Customer(1), NodeId::Sink]
        );
    }

    #[test]
    fn test_non_elementary_cycle_does_not_fake_optimality() {
        let g = detour_graph();
        let duals: Duals = [(1, 10.0)].into_iter().collect();
        // 1 → 2 → 1 earns the dual of 1 twice, every elementary route costs 2
        let config = PricingConfig::default().with_elementary(false);
        let relaxed = price(&g, &duals, &config).expect("priced");
        assert_eq!(relaxed, PricingOutcome::NoImprovingRoute { reduced_cost: 2.0 });
        let exact = price(&g, &duals, &config.with_elementary(true)).expect("priced");
        assert_eq!(relaxed, exact);
    }

    #[test]
    fn test_elementary_rerun_decision() {
        assert!(!needs_elementary_rerun(&outcome_with(Some(-1.0), None)));
        assert!(!needs_elementary_rerun(&outcome_with(Some(-1.0), Some(-9.0))));
        assert!(!needs_elementary_rerun(&outcome_with(Some(3.0), Some(1.0))));
        assert!(needs_elementary_rerun(&outcome_with(Some(3.0), Some(-9.0))));
        assert!(needs_elementary_rerun(&outcome_with(None, Some(4.0))));
        assert!(!needs_elementary_rerun(&outcome_with(None, None)));
    }

    #[test]
    fn test_classify_skips_cyclic_paths() {
        let g = detour_graph();
        let c1 = g.index_of(NodeId::Customer(1)).expect("present");
        let c2 = g.index_of(NodeId::Customer(2)).expect("present");
        let paths = [
            JoinedPath::new(&g, vec![SOURCE, c1, c2, c1, SINK], -6.0, ResourceVector::zeros()),
            JoinedPath::new(&g, vec![SOURCE, c1, SINK], 2.0, ResourceVector::zeros()),
        ];
        assert_eq!(
            classify(&g, &paths),
            PricingOutcome::NoImprovingRoute { reduced_cost: 2.0 }
        );
        assert_eq!(classify(&g, &paths[..1]), PricingOutcome::Infeasible);
    }

    #[test]
    fn test_ties_follow_customer_ids_not_insertion() {
        let g = complete(&[3, 2, 1]);
        let duals: Duals = g.customer_ids().map(|id| (id, 5.0)).collect();
        let expected = [
            NodeId::Source,
            NodeId::Customer(1),
            NodeId::Customer(2),
            NodeId::Customer(3),
            NodeId::Sink,
        ];
        for halfway in [HalfwayResource::Time, HalfwayResource::Arcs, HalfwayResource::Stops] {
            let config = PricingConfig::default().with_halfway(halfway);
            let fast = price(&g, &duals, &config).expect("priced");
            let slow = ExhaustivePricer::new(config).price(&g, &duals).expect("priced");
            assert_eq!(fast.routes()[0].nodes(), &expected, "{halfway:?}");
            assert_eq!(slow.routes()[0].nodes(), &expected);
            assert_eq!(fast.reduced_cost(), Some(-11.0));
        }
    }

    #[test]
    fn test_bounds_without_constraints() {
        let g = random_instance(3, 10.0, 5).expect("valid");
        let config = PricingConfig::default().with_elementary(false);
        let bounds = resource_bounds(&g, &config);
        assert_eq!(bounds.max[Resource::Arcs], g.num_edges() as f64);
        assert_eq!(bounds.max[Resource::Stops], g.num_nodes() as f64);
        assert_eq!(bounds.max[Resource::Time], g.total_time());
        assert_eq!(bounds.max[Resource::TimeWindowViolation], 1.0);
        assert_eq!(bounds.max[Resource::Elementarity], 1.0);
        assert_eq!(bounds.min, ResourceVector::zeros());
    }

    #[test]
    fn test_duration_overrides_sink_window() {
        let g = random_instance(3, 10.0, 5).expect("valid");
        let config = PricingConfig::default()
            .with_time_windows(true)
            .with_duration(150.0);
        assert_eq!(resource_bounds(&g, &config).max[Resource::Time], 150.0);
        let config = PricingConfig::default().with_time_windows(true);
        let upper = g.node(crate::graph::SINK).window().upper();
        assert_eq!(resource_bounds(&g, &config).max[Resource::Time], upper + 1.0);
    }

    #[test]
    fn test_negative_capacity_is_fatal() {
        let g = random_instance(3, 10.0, 5).expect("valid");
        let config = PricingConfig::default().with_load_capacity(-1.0);
        assert!(matches!(
            price(&g, &Duals::new(), &config),
            Err(PricingError::InfeasibleResourceBounds {
                resource: Resource::Load,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_route_never_improving() {
        let g = random_instance(5, 50.0, 9).expect("valid");
        let config = PricingConfig::default().with_time_windows(true);
        let outcome = price(&g, &Duals::new(), &config).expect("priced");
        match outcome {
            PricingOutcome::NoImprovingRoute { reduced_cost } => assert!(reduced_cost >= 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_routes_carry_true_costs() {
        let g = random_instance(6, 60.0, 21).expect("valid");
        let duals = random_duals(&g, 4, 400.0);
        let config = PricingConfig::default()
            .with_time_windows(true)
            .with_max_routes(3);
        let outcome = price(&g, &duals, &config).expect("priced");
        assert!(outcome.is_improving());
        for route in outcome.routes() {
            let true_cost: f64 = route
                .nodes()
                .windows(2)
                .map(|w| g.edge_between(w[0], w[1]).expect("edge").cost)
                .sum();
            assert!((route.cost() - true_cost).abs() < 1e-9);
            let dual_sum: f64 = route.nodes().iter().map(|&n| duals.get(n)).sum();
            assert!(route.cost() - dual_sum < -REDUCED_COST_TOLERANCE);
        }
        assert!(outcome.routes().len() <= 3);
    }

    #[test]
    fn test_unreachable_sink_is_infeasible() {
        let mut g = CustomerGraph::new(tw(0.0, 10.0));
        g.add_customer(1, 1.0, tw(0.0, 50.0)).expect("added");
        g.add_edge(NodeId::Source, NodeId::Customer(1), 1.0, 20.0)
            .expect("added");
        g.add_edge(NodeId::Customer(1), NodeId::Sink, 1.0, 20.0)
            .expect("added");
        let duals: Duals = [(1, 100.0)].into_iter().collect();
        let config = PricingConfig::default().with_time_windows(true);
        assert_eq!(price(&g, &duals, &config), Ok(PricingOutcome::Infeasible));
    }

    #[test]
    fn test_num_stops_caps_route_length() {
        let g = random_instance(6, 1000.0, 13).expect("valid");
        let duals: Duals = g.customer_ids().map(|id| (id, 500.0)).collect();
        let config = PricingConfig::default().with_num_stops(2).with_max_routes(4);
        let outcome = price(&g, &duals, &config).expect("priced");
        assert!(!outcome.routes().is_empty());
        for route in outcome.routes() {
            assert!(route.num_customers() <= 2);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_matches_exhaustive(
            n in 2usize..7,
            seed in 0u64..1000,
            capacity in 10.0f64..60.0,
            windows in any::<bool>(),
            num_stops in proptest::option::of(1usize..4),
            duration in proptest::option::of(150.0f64..450.0),
            elementary in any::<bool>(),
            halfway in prop_oneof![
                Just(HalfwayResource::Time),
                Just(HalfwayResource::Arcs),
                Just(HalfwayResource::Stops),
            ],
        ) {
            let g = random_instance(n, capacity, seed).expect("valid");
            let duals = random_duals(&g, seed + 1, 120.0);
            let mut config = PricingConfig::default()
                .with_time_windows(windows)
                .with_elementary(elementary)
                .with_halfway(halfway);
            config.num_stops = num_stops;
            config.duration = duration;
            let fast = PricingDriver::new(config.clone()).price(&g, &duals).expect("priced");
            let slow = ExhaustivePricer::new(config).price(&g, &duals).expect("priced");
            prop_assert_eq!(fast.is_improving(), slow.is_improving());
            match (fast.reduced_cost(), slow.reduced_cost()) {
                // the exhaustive pricer is always elementary and exact
                (Some(a), Some(b)) if elementary => {
                    prop_assert!((a - b).abs() < 1e-6, "{} vs {}", a, b)
                }
                (Some(a), Some(b)) => prop_assert!(a >= b - 1e-6, "{} below {}", a, b),
                (a, b) => prop_assert_eq!(a, b),
            }
            for route in fast.routes() {
                let dual_sum: f64 = route.nodes().iter().map(|&id| duals.get(id)).sum();
                prop_assert!(route.cost() - dual_sum < -REDUCED_COST_TOLERANCE);
            }
        }

        #[test]
        fn prop_pricing_is_idempotent(n in 2usize..8, seed in 0u64..1000) {
            let g = random_instance(n, 40.0, seed).expect("valid");
            let duals = random_duals(&g, seed, 100.0);
            let config = PricingConfig::default().with_time_windows(true).with_max_routes(3);
            let first = price(&g, &duals, &config).expect("priced");
            let second = price(&g, &duals, &config).expect("priced");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_routes_replay_within_bounds(n in 2usize..8, seed in 0u64..1000) {
            let g = random_instance(n, 40.0, seed).expect("valid");
            let duals = random_duals(&g, seed, 150.0);
            let config = PricingConfig::default().with_time_windows(true).with_max_routes(5);
            let model = resource_model(&g, &config).expect("consistent");
            let outcome = price(&g, &duals, &config).expect("priced");
            for route in outcome.routes() {
                let path: Vec<usize> = route
                    .nodes()
                    .iter()
                    .map(|&id| g.index_of(id).expect("known"))
                    .collect();
                // replay checks every prefix against the bounds
                prop_assert!(model.replay(&path).is_some());
            }
        }
    }
}
