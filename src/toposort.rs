//! Batched topological sort over a dependency graph with disabled nodes.
//!
//! Nodes are emitted level by level: every node in a batch has all of its
//! dependencies in earlier batches, and no two nodes in one batch depend on
//! each other. A disabled node is never emitted, and neither is anything
//! that depends on it, directly or transitively. Those nodes are dropped
//! rather than reported as a cycle.

use crate::error::CircularDependencyError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Node -> set of nodes it depends on.
pub type Graph<N> = HashMap<N, HashSet<N>>;

/// A set of mutually independent nodes that are ready together.
pub type Batch<N> = HashSet<N>;

/// Sort `graph` into dependency-ordered batches, skipping `disabled` nodes
/// and their dependents.
///
/// The caller's graph is never mutated. Batches are computed one at a time
/// as the returned iterator is advanced; if progress stalls while nodes
/// remain, the iterator yields a single [`CircularDependencyError`] and is
/// then exhausted.
pub fn toposort<N>(graph: &Graph<N>, disabled: &HashSet<N>) -> Toposort<N>
where
    N: Eq + Hash + Clone,
{
    Toposort::new(graph, disabled)
}

/// Sort and concatenate all batches into a single order.
///
/// With `sort` set, each batch is sorted before it is appended, which makes
/// the result deterministic.
pub fn toposort_flatten<N>(
    graph: &Graph<N>,
    disabled: &HashSet<N>,
    sort: bool,
) -> Result<Vec<N>, CircularDependencyError<N>>
where
    N: Eq + Hash + Clone + Ord,
{
    let mut result = Vec::new();
    for batch in toposort(graph, disabled) {
        let mut batch: Vec<N> = batch?.into_iter().collect();
        if sort {
            batch.sort();
        }
        result.extend(batch);
    }
    Ok(result)
}

/// Lazy iterator over the batches of a tolerant topological sort.
#[derive(Debug, Clone)]
pub struct Toposort<N> {
    /// Unsatisfied dependency count for every node not yet emitted
    in_degree: HashMap<N, usize>,
    /// Reverse edges: dependency -> nodes waiting on it
    dependents: HashMap<N, Vec<N>>,
    /// The next batch, already at in-degree zero
    ready: Vec<N>,
    finished: bool,
}

impl<N> Toposort<N>
where
    N: Eq + Hash + Clone,
{
    /// Build the working copy of `graph` and seed the first batch.
    pub fn new(graph: &Graph<N>, disabled: &HashSet<N>) -> Self {
        let mut working: Graph<N> = HashMap::with_capacity(graph.len());

        for (node, deps) in graph {
            // Self-dependency is not a cycle condition
            let deps: HashSet<N> = deps.iter().filter(|dep| *dep != node).cloned().collect();
            for dep in &deps {
                working.entry(dep.clone()).or_default();
            }
            working.entry(node.clone()).or_default().extend(deps);
        }

        let excluded = excluded_nodes(&working, disabled);
        trace!(
            nodes = working.len(),
            excluded = excluded.len(),
            "Preprocessed dependency graph"
        );
        working.retain(|node, _| !excluded.contains(node));

        // Anything depending on an excluded node was excluded with it, so the
        // surviving dependency sets only reference surviving nodes.
        let mut in_degree: HashMap<N, usize> = HashMap::with_capacity(working.len());
        let mut dependents: HashMap<N, Vec<N>> = HashMap::new();
        for (node, deps) in &working {
            in_degree.insert(node.clone(), deps.len());
            for dep in deps {
                dependents.entry(dep.clone()).or_default().push(node.clone());
            }
        }

        let ready = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| node.clone())
            .collect();

        Self {
            in_degree,
            dependents,
            ready,
            finished: false,
        }
    }

    /// Number of nodes that have not been emitted yet.
    pub fn remaining(&self) -> usize {
        self.in_degree.len()
    }
}

impl<N> Iterator for Toposort<N>
where
    N: Eq + Hash + Clone,
{
    type Item = Result<Batch<N>, CircularDependencyError<N>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.ready.is_empty() {
            self.finished = true;
            if self.in_degree.is_empty() {
                return None;
            }
            let remaining: HashSet<N> = self.in_degree.drain().map(|(node, _)| node).collect();
            debug!(remaining = remaining.len(), "No progress possible, cycle detected");
            return Some(Err(CircularDependencyError::new(remaining)));
        }

        let batch: Batch<N> = std::mem::take(&mut self.ready).into_iter().collect();
        let mut next_ready = Vec::new();

        for node in &batch {
            self.in_degree.remove(node);
            let Some(waiting) = self.dependents.remove(node) else {
                continue;
            };
            for dependent in waiting {
                if let Some(degree) = self.in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        next_ready.push(dependent);
                    }
                }
            }
        }

        self.ready = next_ready;
        debug!(
            size = batch.len(),
            remaining = self.in_degree.len(),
            "Emitting batch"
        );
        Some(Ok(batch))
    }
}

impl<N> FusedIterator for Toposort<N> where N: Eq + Hash + Clone {}

/// Disabled nodes plus everything that transitively depends on one of them.
fn excluded_nodes<N>(working: &Graph<N>, disabled: &HashSet<N>) -> HashSet<N>
where
    N: Eq + Hash + Clone,
{
    if disabled.is_empty() {
        return HashSet::new();
    }

    let mut dependents: HashMap<&N, Vec<&N>> = HashMap::new();
    for (node, deps) in working {
        for dep in deps {
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut excluded: HashSet<N> = HashSet::new();
    let mut queue: VecDeque<&N> = disabled.iter().collect();
    while let Some(node) = queue.pop_front() {
        if !excluded.insert(node.clone()) {
            continue;
        }
        if let Some(waiting) = dependents.get(node) {
            queue.extend(waiting.iter().filter(|n| !excluded.contains(**n)));
        }
    }

    excluded
}
