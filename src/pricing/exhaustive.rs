//! Reference pricer enumerating every elementary path.

use crate::error::PricingError;
use crate::graph::{CustomerGraph, SINK, SOURCE};
use crate::labeling::{BestPaths, JoinedPath, NodeSet};
use crate::resources::{ResourceModel, ResourceVector};

use super::driver::{classify, resource_model};
use super::{Duals, Pricer, PricingConfig, PricingOutcome};

/// Depth-first enumeration of elementary Source→Sink paths under the same
/// bounds as [`PricingDriver`](super::PricingDriver).
///
/// Exponential in the number of customers; meant for small instances and
/// as a cross-check. Paths are always elementary, whatever
/// `config.elementary` says.
#[derive(Debug, Clone, Default)]
pub struct ExhaustivePricer {
    config: PricingConfig,
}

impl ExhaustivePricer {
    /// Creates an enumerator applying `config`.
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }
}

struct Dfs<'a, 'g> {
    model: &'a ResourceModel<'g>,
    duals: Vec<f64>,
    best: BestPaths,
    path: Vec<usize>,
    visited: NodeSet,
}

impl Dfs<'_, '_> {
    fn visit(&mut self, node: usize, resources: ResourceVector, cost: f64) {
        let graph = self.model.graph();
        for edge in graph.outgoing(node) {
            let next = edge.head;
            if next == SOURCE || self.visited.contains(next) {
                continue;
            }
            let res = self.model.extend_forward(&resources, edge);
            if !self.model.is_feasible(&res) {
                continue;
            }
            let next_cost = cost + edge.cost - self.duals[edge.tail];

            self.path.push(next);
            if next == SINK {
                if self.best.admits(next_cost) {
                    self.best
                        .offer(JoinedPath::new(graph, self.path.clone(), next_cost, res));
                }
            } else {
                self.visited.insert(next);
                self.visit(next, res, next_cost);
                self.visited.remove(next);
            }
            self.path.pop();
        }
    }
}

impl Pricer for ExhaustivePricer {
    fn config(&self) -> &PricingConfig {
        &self.config
    }

    fn price(&self, graph: &CustomerGraph, duals: &Duals) -> Result<PricingOutcome, PricingError> {
        let model = resource_model(graph, &self.config)?;
        let mut dfs = Dfs {
            model: &model,
            duals: duals.by_index(graph),
            best: BestPaths::new(self.config.max_routes),
            path: vec![SOURCE],
            visited: NodeSet::new(),
        };
        dfs.visit(SOURCE, model.forward_root(), 0.0);
        let paths = dfs.best.into_paths();
        Ok(classify(graph, &paths))
    }
}
