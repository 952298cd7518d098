//! Labels and the dominance-pruned label arena.

use serde::{Deserialize, Serialize};

use crate::resources::{Resource, ResourceVector};

use super::paths::same_cost;
use super::NodeSet;

/// Index of a label in its [`LabelStore`].
pub type LabelId = usize;

/// Side of the search a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Grows from Source along outgoing edges.
    Forward,
    /// Grows from Sink along incoming edges.
    Backward,
}

/// A partial path: node, resources, accumulated reduced cost, visited set.
///
/// The path itself lives in the arena as a parent chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Graph arena index of the current node.
    pub node: usize,
    /// Side of the search.
    pub direction: Direction,
    /// Resources at `node`.
    pub resources: ResourceVector,
    /// Accumulated reduced cost.
    pub cost: f64,
    /// Customers on the partial path, `node` included.
    pub visited: NodeSet,
    /// Label this one was extended from.
    pub parent: Option<LabelId>,
}

impl Label {
    /// Root label with no parent.
    pub fn root(node: usize, direction: Direction, resources: ResourceVector) -> Self {
        Self {
            node,
            direction,
            resources,
            cost: 0.0,
            visited: NodeSet::new(),
            parent: None,
        }
    }

    /// `self` is no worse than `other` in cost, every resource and, if
    /// `compare_visited`, the visited set.
    ///
    /// "No worse" is `<=` for forward labels and `>=` for backward ones,
    /// whose resources count down from the maximum.
    ///
    /// Costs within summation noise of each other count as equal.
    pub fn weakly_dominates(&self, other: &Label, compare_visited: bool) -> bool {
        if self.node != other.node || self.direction != other.direction {
            return false;
        }
        if self.cost > other.cost && !same_cost(self.cost, other.cost) {
            return false;
        }
        let resources_ok = Resource::ALL.iter().all(|&r| match self.direction {
            Direction::Forward => self.resources[r] <= other.resources[r],
            Direction::Backward => self.resources[r] >= other.resources[r],
        });
        resources_ok && (!compare_visited || self.visited.is_subset(&other.visited))
    }

    /// `self` is strictly better than `other` in at least one component.
    fn strictly_better(&self, other: &Label, compare_visited: bool) -> bool {
        (self.cost < other.cost && !same_cost(self.cost, other.cost))
            || Resource::ALL.iter().any(|&r| match self.direction {
                Direction::Forward => self.resources[r] < other.resources[r],
                Direction::Backward => self.resources[r] > other.resources[r],
            })
            || (compare_visited && self.visited != other.visited)
    }
}

/// Arena of labels for one direction, bucketed by node.
///
/// A label is kept only while no other live label at the same node
/// dominates it. Labels identical in every component are ordered by their
/// node sequence, so the surviving set does not depend on insertion order.
/// Sequences compare by node rank, which defaults to the arena index.
#[derive(Debug, Clone)]
pub struct LabelStore {
    direction: Direction,
    compare_visited: bool,
    rank: Vec<usize>,
    labels: Vec<Label>,
    alive: Vec<bool>,
    buckets: Vec<Vec<LabelId>>,
    discarded: usize,
}

impl LabelStore {
    /// Creates an empty store for a graph with `num_nodes` nodes.
    ///
    /// `compare_visited` makes the visited set part of dominance, which is
    /// required when paths must be elementary.
    pub fn new(direction: Direction, num_nodes: usize, compare_visited: bool) -> Self {
        Self {
            direction,
            compare_visited,
            rank: (0..num_nodes).collect(),
            labels: Vec::new(),
            alive: Vec::new(),
            buckets: vec![Vec::new(); num_nodes],
            discarded: 0,
        }
    }

    /// Orders node sequences by `rank[i]` instead of arena index `i`.
    ///
    /// `rank` needs one entry per node.
    pub fn with_node_rank(mut self, rank: Vec<usize>) -> Self {
        self.rank = rank;
        self
    }

    /// Direction of every label in this store.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Label by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`insert`](Self::insert).
    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id]
    }

    /// Returns `true` while no later label has dominated `id`.
    pub fn is_alive(&self, id: LabelId) -> bool {
        self.alive[id]
    }

    /// Labels ever accepted.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no label was ever accepted.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels currently alive.
    pub fn num_alive(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Candidates rejected on arrival because an existing label dominated them.
    pub fn num_discarded(&self) -> usize {
        self.discarded
    }

    /// Live labels at a node, oldest first.
    pub fn alive_at(&self, node: usize) -> impl Iterator<Item = (LabelId, &Label)> + '_ {
        self.buckets[node].iter().map(move |&id| (id, &self.labels[id]))
    }

    /// Node sequence of a stored label in travel order: Source→node for
    /// forward labels, node→Sink for backward ones.
    pub fn path(&self, id: LabelId) -> Vec<usize> {
        self.path_of(&self.labels[id])
    }

    fn path_of(&self, label: &Label) -> Vec<usize> {
        let mut nodes = vec![label.node];
        let mut cursor = label.parent;
        while let Some(id) = cursor {
            nodes.push(self.labels[id].node);
            cursor = self.labels[id].parent;
        }
        if self.direction == Direction::Forward {
            nodes.reverse();
        }
        nodes
    }

    fn ranked_path(&self, label: &Label) -> Vec<usize> {
        self.path_of(label).into_iter().map(|i| self.rank[i]).collect()
    }

    /// Strict dominance: `a` is no worse than `b` everywhere and either
    /// strictly better somewhere or equal with a smaller node sequence.
    ///
    /// Both labels must belong to this store's direction; their parents,
    /// if any, must be stored here.
    pub fn dominates(&self, a: &Label, b: &Label) -> bool {
        a.weakly_dominates(b, self.compare_visited)
            && (a.strictly_better(b, self.compare_visited) || self.ranked_path(a) < self.ranked_path(b))
    }

    fn dominates_or_equals(&self, a: &Label, b: &Label) -> bool {
        a.weakly_dominates(b, self.compare_visited)
            && (a.strictly_better(b, self.compare_visited) || self.ranked_path(a) <= self.ranked_path(b))
    }

    /// Inserts `label` unless a live label at its node dominates it.
    ///
    /// Live labels the new one dominates are retired. Returns the new id, or
    /// `None` if the label was discarded.
    pub fn insert(&mut self, label: Label) -> Option<LabelId> {
        let node = label.node;
        if self.buckets[node]
            .iter()
            .any(|&id| self.dominates_or_equals(&self.labels[id], &label))
        {
            self.discarded += 1;
            return None;
        }

        let retired: Vec<LabelId> = self.buckets[node]
            .iter()
            .copied()
            .filter(|&id| self.dominates(&label, &self.labels[id]))
            .collect();
        if !retired.is_empty() {
            self.buckets[node].retain(|id| !retired.contains(id));
            for id in retired {
                self.alive[id] = false;
            }
        }

        let id = self.labels.len();
        self.labels.push(label);
        self.alive.push(true);
        self.buckets[node].push(id);
        Some(id)
    }
}
