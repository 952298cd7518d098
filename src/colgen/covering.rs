//! Set-covering relaxation solved with an LP solver.
//!
//! The primal is `min Σ c_r x_r` subject to every customer being covered at
//! least once, `x ≥ 0`. Its dual is `max Σ π_i` subject to
//! `Σ_{i∈r} π_i ≤ c_r` for every route and `π ≥ 0`. Both are handed to
//! `microlp` through `good_lp`: the primal for the route values, the dual for
//! the customer duals. Strong duality makes the two objectives agree.

use good_lp::{constraint, microlp, variable, Expression, ProblemVariables, Solution, SolverModel};
use log::trace;

use crate::error::MasterError;
use crate::graph::CustomerGraph;
use crate::models::Route;
use crate::pricing::Duals;

use super::{MasterProblem, MasterSolution};

/// Reference master: the linear relaxation of set covering over customers.
///
/// # Examples
///
/// ```
/// use u_colgen::colgen::{CoveringRelaxation, MasterProblem};
/// use u_colgen::models::{NodeId, Route};
///
/// let route = |ids: &[usize], cost| {
///     let mut nodes = vec![NodeId::Source];
///     nodes.extend(ids.iter().map(|&c| NodeId::Customer(c)));
///     nodes.push(NodeId::Sink);
///     Route::new(nodes, cost).unwrap()
/// };
/// let routes = vec![route(&[1, 2], 1.0), route(&[2, 3], 1.0), route(&[1, 3], 1.0)];
///
/// let mut master = CoveringRelaxation::new([1, 2, 3]);
/// let solution = master.solve(&routes).unwrap();
/// assert!((solution.objective - 1.5).abs() < 1e-6);
/// assert!(solution.values.iter().all(|&x| (x - 0.5).abs() < 1e-6));
/// ```
#[derive(Debug, Clone)]
pub struct CoveringRelaxation {
    customers: Vec<usize>,
}

impl CoveringRelaxation {
    /// Covering constraints for the given customer ids.
    pub fn new(customers: impl IntoIterator<Item = usize>) -> Self {
        let mut customers: Vec<usize> = customers.into_iter().collect();
        customers.sort_unstable();
        customers.dedup();
        Self { customers }
    }

    /// Covering constraints for every customer of a graph.
    pub fn for_graph(graph: &CustomerGraph) -> Self {
        Self::new(graph.customer_ids())
    }

    /// Customer ids with a covering constraint, ascending.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Route values of `min Σ c_r x_r` over the covering constraints.
    fn solve_primal(&self, routes: &[Route]) -> Result<Vec<f64>, MasterError> {
        let mut vars = ProblemVariables::new();
        let x: Vec<_> = routes.iter().map(|_| vars.add(variable().min(0.0))).collect();
        let objective: Expression = routes.iter().zip(&x).map(|(r, &v)| r.cost() * v).sum();

        let mut model = vars.minimise(objective).using(microlp);
        for &c in &self.customers {
            let covering: Expression = routes
                .iter()
                .zip(&x)
                .filter(|(r, _)| r.covers(c))
                .map(|(_, &v)| Expression::from(v))
                .sum();
            model.add_constraint(constraint!(covering >= 1.0));
        }
        let solution = model.solve().map_err(|e| MasterError::Solver(e.to_string()))?;
        Ok(x.iter().map(|&v| solution.value(v).max(0.0)).collect())
    }

    /// Customer duals from `max Σ π_i` over one packing row per route.
    fn solve_dual(&self, routes: &[Route]) -> Result<Duals, MasterError> {
        let mut vars = ProblemVariables::new();
        let pi: Vec<_> = self
            .customers
            .iter()
            .map(|_| vars.add(variable().min(0.0)))
            .collect();
        let objective: Expression = pi.iter().map(|&p| Expression::from(p)).sum();

        let mut model = vars.maximise(objective).using(microlp);
        for route in routes.iter().filter(|r| !r.is_empty()) {
            let packing: Expression = route
                .customers()
                .filter_map(|c| self.customers.binary_search(&c).ok())
                .map(|j| Expression::from(pi[j]))
                .sum();
            model.add_constraint(constraint!(packing <= route.cost()));
        }
        let solution = model.solve().map_err(|e| MasterError::Solver(e.to_string()))?;
        Ok(self
            .customers
            .iter()
            .zip(&pi)
            .map(|(&c, &p)| (c, solution.value(p).max(0.0)))
            .collect())
    }
}

impl MasterProblem for CoveringRelaxation {
    fn solve(&mut self, routes: &[Route]) -> Result<MasterSolution, MasterError> {
        if let Some(r) = routes.iter().find(|r| r.cost() < 0.0) {
            return Err(MasterError::NegativeRouteCost(r.cost()));
        }
        if let Some(&c) = self
            .customers
            .iter()
            .find(|&&c| !routes.iter().any(|r| r.covers(c)))
        {
            return Err(MasterError::Uncovered(c));
        }

        let values = self.solve_primal(routes)?;
        let duals = self.solve_dual(routes)?;
        let objective: f64 = routes.iter().zip(&values).map(|(r, x)| r.cost() * x).sum();
        let dual_objective: f64 = duals.iter().map(|(_, v)| v).sum();
        trace!(
            "covering relaxation: {} routes, primal {objective:.6}, dual {dual_objective:.6}",
            routes.len()
        );

        Ok(MasterSolution {
            duals,
            objective,
            values,
        })
    }
}
