use clap::Parser;
use std::process;
use tolerant_toposort::cli::Cli;
use tolerant_toposort::cli_handlers;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli_handlers::handle_sort(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
