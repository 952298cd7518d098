//! The column generation loop.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ColGenError;
use crate::evaluation::RouteEvaluator;
use crate::graph::{CustomerGraph, SINK, SOURCE};
use crate::models::{NodeId, Route, Schedule};
use crate::pricing::{
    resource_model, Duals, Pricer, PricingConfig, PricingDriver, PricingOutcome,
    REDUCED_COST_TOLERANCE,
};

use super::{CoveringRelaxation, MasterProblem, MasterSolution, RoutePool};

/// Primal values at or below this count as zero when reporting.
const VALUE_EPS: f64 = 1e-6;

/// Consecutive near-tolerance iterations before warning.
const NEAR_TOLERANCE_STREAK: usize = 2;

/// Budgets and starting columns for a run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_colgen::colgen::ColGenConfig;
/// use u_colgen::models::NodeId;
///
/// let config = ColGenConfig::default()
///     .with_max_iterations(500)
///     .with_time_limit(Duration::from_secs(30))
///     .with_initial_route(vec![NodeId::Source, NodeId::Customer(1), NodeId::Sink]);
/// assert_eq!(config.initial_routes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColGenConfig {
    /// Maximum number of pricing calls.
    pub max_iterations: Option<usize>,

    /// Wall-clock budget, checked after each master solve.
    pub time_limit: Option<Duration>,

    /// Routes placed in the pool before the first master solve.
    pub initial_routes: Vec<Vec<NodeId>>,
}

impl ColGenConfig {
    /// Caps the number of pricing calls.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Adds one initial route.
    pub fn with_initial_route(mut self, nodes: Vec<NodeId>) -> Self {
        self.initial_routes.push(nodes);
        self
    }

    /// Replaces the initial routes.
    pub fn with_initial_routes(mut self, routes: Vec<Vec<NodeId>>) -> Self {
        self.initial_routes = routes;
        self
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColGenStatus {
    /// Pricing proved no improving route exists.
    Optimal,
    /// The iteration budget ran out.
    IterationLimit,
    /// The time budget ran out.
    TimeLimit,
    /// Pricing only returned routes already in the pool.
    Stalled,
}

/// Outcome of a column generation run.
#[derive(Debug, Clone)]
pub struct ColGenResult {
    /// Relaxation objective over the final pool.
    pub objective: f64,
    /// Why the loop stopped.
    pub status: ColGenStatus,
    /// Pricing calls made.
    pub iterations: usize,
    /// Every column generated or seeded.
    pub pool: RoutePool,
    /// Primal value per pool route.
    pub values: Vec<f64>,
    /// Duals of the final master solve.
    pub duals: Duals,
}

impl ColGenResult {
    /// Every pooled route, in insertion order.
    pub fn routes(&self) -> &[Route] {
        self.pool.routes()
    }

    /// Routes with positive value in the final relaxation.
    pub fn best_routes(&self) -> Vec<(&Route, f64)> {
        self.pool
            .iter()
            .zip(self.values.iter().copied())
            .filter(|&(_, x)| x > VALUE_EPS)
            .collect()
    }

    /// Arrival and departure tables of the best routes.
    pub fn timetable(&self, graph: &CustomerGraph, config: &PricingConfig) -> Vec<(Route, Schedule)> {
        let evaluator = RouteEvaluator::new(graph, config);
        self.best_routes()
            .into_iter()
            .map(|(route, _)| (route.clone(), evaluator.evaluate(route).0))
            .collect()
    }
}

/// Route over `nodes` with edge costs summed from the graph.
fn route_from_nodes(graph: &CustomerGraph, nodes: Vec<NodeId>) -> Option<Route> {
    let mut cost = 0.0;
    for pair in nodes.windows(2) {
        cost += graph.edge_between(pair[0], pair[1])?.cost;
    }
    Route::new(nodes, cost)
}

/// Drives a pricer against a master until no improving route remains.
///
/// # Examples
///
/// ```
/// use u_colgen::colgen::{ColGenConfig, ColGenStatus, ColumnGeneration, CoveringRelaxation};
/// use u_colgen::graph::generator::random_instance;
/// use u_colgen::pricing::{PricingConfig, PricingDriver};
///
/// let g = random_instance(8, 40.0, 3).unwrap();
/// let pricer = PricingDriver::new(PricingConfig::default().with_time_windows(true));
/// let master = CoveringRelaxation::for_graph(&g);
///
/// let mut colgen = ColumnGeneration::new(pricer, master, ColGenConfig::default());
/// let result = colgen.run(&g).unwrap();
/// assert_eq!(result.status, ColGenStatus::Optimal);
/// assert!(!result.best_routes().is_empty());
/// ```
pub struct ColumnGeneration<P, M> {
    pricer: P,
    master: M,
    config: ColGenConfig,
}

impl<P: Pricer, M: MasterProblem> ColumnGeneration<P, M> {
    /// Creates a runner from a pricer, a master and loop settings.
    pub fn new(pricer: P, master: M, config: ColGenConfig) -> Self {
        Self {
            pricer,
            master,
            config,
        }
    }

    /// The pricing oracle.
    pub fn pricer(&self) -> &P {
        &self.pricer
    }

    /// The master relaxation.
    pub fn master(&self) -> &M {
        &self.master
    }

    /// Loop settings.
    pub fn config(&self) -> &ColGenConfig {
        &self.config
    }

    fn add(&mut self, pool: &mut RoutePool, route: Route) -> bool {
        if pool.contains(route.nodes()) {
            return false;
        }
        self.master.add_route(&route);
        pool.insert(route)
    }

    /// Fills the pool with the initial routes, then a direct route for every
    /// customer they leave uncovered.
    fn seed(&mut self, graph: &CustomerGraph, pool: &mut RoutePool) -> Result<(), ColGenError> {
        for nodes in self.config.initial_routes.clone() {
            let route = route_from_nodes(graph, nodes.clone())
                .ok_or(ColGenError::InvalidInitialRoute(nodes))?;
            self.add(pool, route);
        }

        let model = resource_model(graph, self.pricer.config())?;
        let uncovered: Vec<usize> = graph.customer_ids().filter(|&c| !pool.covers(c)).collect();
        for id in uncovered {
            let direct = vec![NodeId::Source, NodeId::Customer(id), NodeId::Sink];
            let feasible = graph
                .index_of(NodeId::Customer(id))
                .and_then(|idx| model.replay(&[SOURCE, idx, SINK]))
                .is_some();
            let route = route_from_nodes(graph, direct)
                .filter(|_| feasible)
                .ok_or(ColGenError::UncoverableCustomer(id))?;
            debug!("seeding direct route {route}");
            self.add(pool, route);
        }
        Ok(())
    }

    /// Runs the loop to completion or budget.
    pub fn run(&mut self, graph: &CustomerGraph) -> Result<ColGenResult, ColGenError> {
        let start = Instant::now();
        let mut pool = RoutePool::new();
        self.seed(graph, &mut pool)?;
        info!(
            "column generation on {} customers, {} initial routes",
            graph.num_customers(),
            pool.len()
        );

        let mut iterations = 0;
        let mut near_tolerance = 0;
        let (solution, status): (MasterSolution, ColGenStatus) = loop {
            let solution = self.master.solve(pool.routes())?;
            debug!(
                "iteration {iterations}: objective {:.4}, {} routes",
                solution.objective,
                pool.len()
            );

            if self.config.max_iterations.is_some_and(|max| iterations >= max) {
                break (solution, ColGenStatus::IterationLimit);
            }
            if self
                .config
                .time_limit
                .is_some_and(|limit| start.elapsed() >= limit)
            {
                break (solution, ColGenStatus::TimeLimit);
            }

            let outcome = self.pricer.price(graph, &solution.duals)?;
            iterations += 1;
            match outcome {
                PricingOutcome::Infeasible => return Err(ColGenError::PricingInfeasible),
                PricingOutcome::NoImprovingRoute { reduced_cost } => {
                    debug!("best reduced cost {reduced_cost}, pool is optimal");
                    break (solution, ColGenStatus::Optimal);
                }
                PricingOutcome::Improving {
                    routes,
                    reduced_cost,
                } => {
                    if reduced_cost > -10.0 * REDUCED_COST_TOLERANCE {
                        near_tolerance += 1;
                        if near_tolerance >= NEAR_TOLERANCE_STREAK {
                            warn!(
                                "reduced cost {reduced_cost:e} near tolerance for {near_tolerance} iterations"
                            );
                        }
                    } else {
                        near_tolerance = 0;
                    }

                    let mut added = 0;
                    for route in routes {
                        if pool.contains(route.nodes()) {
                            debug!("duplicate route {route} skipped");
                            continue;
                        }
                        if self.add(&mut pool, route) {
                            added += 1;
                        }
                    }
                    if added == 0 {
                        warn!("pricing returned only pooled routes (reduced cost {reduced_cost:e}), stopping");
                        break (solution, ColGenStatus::Stalled);
                    }
                }
            }
        };

        info!(
            "column generation stopped ({status:?}) after {iterations} iterations: objective {:.4}, {} routes",
            solution.objective,
            pool.len()
        );
        Ok(ColGenResult {
            objective: solution.objective,
            status,
            iterations,
            pool,
            values: solution.values,
            duals: solution.duals,
        })
    }
}

/// Solves the linear relaxation with the bidirectional pricer and the
/// covering master.
pub fn solve(
    graph: &CustomerGraph,
    pricing: PricingConfig,
    config: ColGenConfig,
) -> Result<ColGenResult, ColGenError> {
    let master = CoveringRelaxation::for_graph(graph);
    ColumnGeneration::new(PricingDriver::new(pricing), master, config).run(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generator::random_instance;
    use crate::models::TimeWindow;
    use crate::pricing::ExhaustivePricer;

    fn tw(lower: f64, upper: f64) -> TimeWindow {
        TimeWindow::new(lower, upper).expect("valid")
    }

    #[test]
    fn test_converges_to_optimal() {
        let g = random_instance(7, 35.0, 42).expect("valid");
        let config = PricingConfig::default().with_time_windows(true).with_max_routes(3);
        let result = solve(&g, config.clone(), ColGenConfig::default()).expect("solved");
        assert_eq!(result.status, ColGenStatus::Optimal);
        assert_eq!(result.values.len(), result.pool.len());

        // no elementary route prices out negatively at the final duals
        let check = ExhaustivePricer::new(config).price(&g, &result.duals).expect("priced");
        assert!(!check.is_improving());

        let primal: f64 = result
            .best_routes()
            .iter()
            .map(|(r, x)| r.cost() * x)
            .sum();
        assert!((primal - result.objective).abs() < 1e-6);
    }

    #[test]
    fn test_initial_routes_kept_and_completed() {
        let g = random_instance(5, 100.0, 8).expect("valid");
        let first = vec![NodeId::Source, NodeId::Customer(1), NodeId::Sink];
        let config = ColGenConfig::default()
            .with_max_iterations(0)
            .with_initial_route(first.clone());
        let result = solve(&g, PricingConfig::default(), config).expect("solved");
        assert_eq!(result.status, ColGenStatus::IterationLimit);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.routes()[0].nodes(), first.as_slice());
        assert_eq!(result.pool.len(), 5);
        for c in g.customer_ids() {
            assert!(result.pool.covers(c));
        }
    }

    #[test]
    fn test_invalid_initial_route() {
        let g = random_instance(3, 100.0, 8).expect("valid");
        let bad = vec![NodeId::Source, NodeId::Customer(9), NodeId::Sink];
        let config = ColGenConfig::default().with_initial_route(bad.clone());
        assert_eq!(
            solve(&g, PricingConfig::default(), config).map(|r| r.objective),
            Err(ColGenError::InvalidInitialRoute(bad))
        );
    }

    #[test]
    fn test_uncoverable_customer() {
        let mut g = CustomerGraph::new(tw(0.0, 100.0));
        g.add_customer(1, 5.0, TimeWindow::open()).expect("added");
        g.add_customer(2, 50.0, TimeWindow::open()).expect("added");
        for id in 1..=2 {
            g.add_edge(NodeId::Source, NodeId::Customer(id), 1.0, 1.0)
                .expect("added");
            g.add_edge(NodeId::Customer(id), NodeId::Sink, 1.0, 1.0)
                .expect("added");
        }
        let pricing = PricingConfig::default().with_load_capacity(10.0);
        assert_eq!(
            solve(&g, pricing, ColGenConfig::default()).map(|r| r.objective),
            Err(ColGenError::UncoverableCustomer(2))
        );
    }

    #[test]
    fn test_timetable_of_best_routes() {
        let g = random_instance(6, 30.0, 17).expect("valid");
        let config = PricingConfig::default().with_time_windows(true);
        let result = solve(&g, config.clone(), ColGenConfig::default()).expect("solved");
        let table = result.timetable(&g, &config);
        assert_eq!(table.len(), result.best_routes().len());
        for (route, schedule) in &table {
            assert_eq!(schedule.len(), route.nodes().len());
            for visit in schedule.visits() {
                let w = g.node(g.index_of(visit.node).expect("known")).window();
                assert!(w.contains(visit.arrival), "{route}: {visit:?}");
                assert!(w.contains(visit.departure), "{route}: {visit:?}");
            }
        }
    }

    struct Repeating(Route, PricingConfig);

    impl Pricer for Repeating {
        fn config(&self) -> &PricingConfig {
            &self.1
        }

        fn price(
            &self,
            _graph: &CustomerGraph,
            _duals: &Duals,
        ) -> Result<PricingOutcome, crate::error::PricingError> {
            Ok(PricingOutcome::Improving {
                routes: vec![self.0.clone()],
                reduced_cost: -1.0,
            })
        }
    }

    #[test]
    fn test_stalls_on_duplicate_routes() {
        let g = random_instance(2, 100.0, 1).expect("valid");
        let direct = route_from_nodes(&g, vec![NodeId::Source, NodeId::Customer(1), NodeId::Sink])
            .expect("route");
        let pricer = Repeating(direct, PricingConfig::default());
        let mut colgen = ColumnGeneration::new(
            pricer,
            CoveringRelaxation::for_graph(&g),
            ColGenConfig::default(),
        );
        let result = colgen.run(&g).expect("ran");
        assert_eq!(result.status, ColGenStatus::Stalled);
        assert_eq!(result.iterations, 1);
    }
}
