mod adapter;
mod commands;
mod config;
mod json;

use crate::config::WorkbenchConfig;
use crate::config::cli::{CliOpt, Command};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Log to stderr so scripts and JSON on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = CliOpt::parse();
    let config = WorkbenchConfig::from(&options);

    match &options.command {
        Command::Plan => commands::print_plan(&config),
        Command::Graph => commands::write_graph(&config),
        Command::Routes(routes) => commands::print_routes(&config, routes.json),
        Command::Script => commands::write_script(&config),
    }
}
