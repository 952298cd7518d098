//! The master relaxation seam.

use crate::error::MasterError;
use crate::models::Route;
use crate::pricing::Duals;

/// Solution of the master relaxation over the current pool.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterSolution {
    /// One dual per customer covering constraint.
    pub duals: Duals,
    /// Objective value of the relaxation.
    pub objective: f64,
    /// Primal value per route, aligned with the routes passed to `solve`.
    pub values: Vec<f64>,
}

/// A linear relaxation over a set of routes.
pub trait MasterProblem {
    /// Solves the relaxation restricted to `routes`.
    fn solve(&mut self, routes: &[Route]) -> Result<MasterSolution, MasterError>;

    /// Notifies the master of a column entering the pool.
    ///
    /// Masters that rebuild from the route slice on every `solve` can ignore it.
    fn add_route(&mut self, _route: &Route) {}
}
