use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tolerant-toposort")]
#[command(about = "Sort a dependency graph into batches, tolerating disabled nodes")]
#[command(version)]
pub struct Cli {
    /// JSON file mapping each node to its dependencies (stdin if omitted)
    pub graph: Option<PathBuf>,

    /// Treat a node as disabled; repeat for several
    #[arg(long = "disable", value_name = "NODE")]
    pub disabled: Vec<String>,

    /// Print one flattened order instead of batches
    #[arg(long)]
    pub flatten: bool,

    /// Emit JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}
