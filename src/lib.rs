//! # tolerant_toposort
//!
//! Topological sorting into batches of mutually independent nodes, where
//! some nodes may be disabled. Disabled nodes, and everything that depends
//! on them, are left out of the order instead of blocking it.

pub mod cli;
pub mod cli_handlers;
pub mod error;
pub mod process;
pub mod toposort;

pub use error::{CircularDependencyError, Error, Result};
pub use process::{Outcome, ProcessReport, Processor, process_graph};
pub use toposort::{Batch, Graph, Toposort, toposort, toposort_flatten};
