use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Raised when the sort can make no further progress but nodes remain.
///
/// The payload is every unresolved node: the cyclic component(s) plus
/// anything blocked behind them. It is not necessarily the minimal cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependencies exist among these nodes: {remaining:?}")]
pub struct CircularDependencyError<N: Eq + Hash> {
    remaining: HashSet<N>,
}

impl<N: Eq + Hash> CircularDependencyError<N> {
    pub fn new(remaining: HashSet<N>) -> Self {
        Self { remaining }
    }

    /// The nodes that could not be resolved.
    pub fn nodes(&self) -> &HashSet<N> {
        &self.remaining
    }

    pub fn into_nodes(self) -> HashSet<N> {
        self.remaining
    }
}

impl<N: Eq + Hash + Ord + Clone> CircularDependencyError<N> {
    /// Unresolved nodes in ascending order, for stable reporting.
    pub fn sorted_nodes(&self) -> Vec<N> {
        let mut nodes: Vec<N> = self.remaining.iter().cloned().collect();
        nodes.sort();
        nodes
    }
}

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Circular dependencies exist among these nodes: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CircularDependencyError<String>> for Error {
    fn from(err: CircularDependencyError<String>) -> Self {
        Error::Cycle(err.sorted_nodes())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
