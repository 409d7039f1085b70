use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::toposort::{Graph, toposort};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Sort result; serializes as a bare JSON array
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SortOutput {
    Batches(Vec<Vec<String>>),
    Order(Vec<String>),
}

/// Handle a sort invocation
pub fn handle_sort(cli: &Cli) -> Result<()> {
    let input = match &cli.graph {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let graph = parse_graph(&input)?;
    let disabled: HashSet<String> = cli.disabled.iter().cloned().collect();
    debug!(
        nodes = graph.len(),
        disabled = disabled.len(),
        "Loaded dependency graph"
    );

    let batches = sorted_batches(&graph, &disabled)?;
    let output = if cli.flatten {
        SortOutput::Order(batches.into_iter().flatten().collect())
    } else {
        SortOutput::Batches(batches)
    };

    if cli.json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print!("{}", render_text(&output));
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Parse a `{"node": ["dep", ...]}` JSON object into a graph.
pub fn parse_graph(input: &str) -> Result<Graph<String>> {
    let graph: Graph<String> = serde_json::from_str(input)?;

    for (node, deps) in &graph {
        if node.is_empty() {
            return Err(Error::InvalidGraph("node names must not be empty".into()));
        }
        if deps.iter().any(String::is_empty) {
            return Err(Error::InvalidGraph(format!(
                "node {node:?} has an empty dependency name"
            )));
        }
    }

    Ok(graph)
}

/// Run the sort and order each batch by name.
pub fn sorted_batches(
    graph: &Graph<String>,
    disabled: &HashSet<String>,
) -> Result<Vec<Vec<String>>> {
    let mut batches = Vec::new();
    for batch in toposort(graph, disabled) {
        let mut batch: Vec<String> = batch?.into_iter().collect();
        batch.sort();
        batches.push(batch);
    }
    Ok(batches)
}

/// Batches one per line, nodes space-separated; a flat order one per line.
pub fn render_text(output: &SortOutput) -> String {
    let lines: Vec<String> = match output {
        SortOutput::Batches(batches) => batches.iter().map(|batch| batch.join(" ")).collect(),
        SortOutput::Order(order) => order.clone(),
    };

    lines.into_iter().map(|line| line + "\n").collect()
}
