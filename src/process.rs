//! Fixed-point driver for processing a graph whose disabled nodes are only
//! discovered while processing.
//!
//! Each pass sorts the graph with the disabled nodes known so far and
//! processes every batch in parallel. When a node turns out to be unusable
//! the pass is abandoned, the node is added to the disabled set and the sort
//! restarts. Nodes processed in earlier passes are never processed again.

use crate::error::CircularDependencyError;
use crate::toposort::{Graph, toposort};
use rayon::prelude::*;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, info};

/// Result of processing a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    /// The node is unusable and must be treated as disabled
    Disabled,
}

/// Work performed on each node once its dependencies are satisfied.
///
/// Nodes of one batch are processed concurrently, so implementations must
/// be `Sync`.
pub trait Processor<N>: Sync {
    fn process(&self, node: &N) -> Outcome;
}

impl<N, F> Processor<N> for F
where
    F: Fn(&N) -> Outcome + Sync,
{
    fn process(&self, node: &N) -> Outcome {
        self(node)
    }
}

/// Accumulated state once no further disabled nodes are discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport<N: Eq + Hash> {
    pub processed: HashSet<N>,
    /// The caller's disabled nodes plus every node that reported `Disabled`
    pub disabled: HashSet<N>,
    /// Number of sort passes, including the final one
    pub passes: usize,
}

/// Process every node of `graph` in dependency order until a fixed point.
///
/// A cycle among the enabled nodes aborts the run with the cycle error.
pub fn process_graph<N, P>(
    graph: &Graph<N>,
    disabled: &HashSet<N>,
    processor: &P,
) -> Result<ProcessReport<N>, CircularDependencyError<N>>
where
    N: Eq + Hash + Clone + Send + Sync,
    P: Processor<N> + ?Sized,
{
    let mut report = ProcessReport {
        processed: HashSet::new(),
        disabled: disabled.clone(),
        passes: 0,
    };

    loop {
        report.passes += 1;
        let discovered = run_pass(graph, processor, &mut report)?;
        if discovered.is_empty() {
            info!(
                passes = report.passes,
                processed = report.processed.len(),
                disabled = report.disabled.len(),
                "Processing reached a fixed point"
            );
            return Ok(report);
        }

        info!(
            pass = report.passes,
            newly_disabled = discovered.len(),
            "Restarting sort with newly disabled nodes"
        );
        report.disabled.extend(discovered);
    }
}

/// One sort pass. Returns the nodes discovered to be disabled, stopping at
/// the first batch that produced any.
fn run_pass<N, P>(
    graph: &Graph<N>,
    processor: &P,
    report: &mut ProcessReport<N>,
) -> Result<HashSet<N>, CircularDependencyError<N>>
where
    N: Eq + Hash + Clone + Send + Sync,
    P: Processor<N> + ?Sized,
{
    for batch in toposort(graph, &report.disabled) {
        let pending: Vec<N> = batch?
            .into_iter()
            .filter(|node| !report.processed.contains(node))
            .collect();
        if pending.is_empty() {
            continue;
        }

        debug!(pass = report.passes, size = pending.len(), "Processing batch");
        let outcomes: Vec<(N, Outcome)> = pending
            .into_par_iter()
            .map(|node| {
                let outcome = processor.process(&node);
                (node, outcome)
            })
            .collect();

        let mut discovered = HashSet::new();
        for (node, outcome) in outcomes {
            match outcome {
                Outcome::Processed => {
                    report.processed.insert(node);
                }
                Outcome::Disabled => {
                    discovered.insert(node);
                }
            }
        }

        if !discovered.is_empty() {
            return Ok(discovered);
        }
    }

    Ok(HashSet::new())
}
