//! Typedep CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "typedep")]
#[command(about = "Type dependency graph for C and C++ sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan source trees and write the nodes and edges files
    Scan {
        /// Directories or files to scan
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Config file (defaults to ./typedep.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of worker threads
        #[arg(short, long)]
        workers: Option<usize>,

        /// Nodes output file
        #[arg(long)]
        nodes: Option<PathBuf>,

        /// Edges output file
        #[arg(long)]
        edges: Option<PathBuf>,
    },
    /// Re-validate a previously written graph
    Check {
        nodes: PathBuf,
        edges: PathBuf,
    },
    /// Show what a type depends on and what depends on it
    Deps {
        name: String,

        #[arg(long, default_value = "types.txt")]
        nodes: PathBuf,

        #[arg(long, default_value = "type-dependencies.txt")]
        edges: PathBuf,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "typedep={0},typedep_core={0},typedep_indexer={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Scan {
            roots,
            config,
            workers,
            nodes,
            edges,
        } => commands::scan(
            roots,
            commands::ScanOverrides {
                config,
                workers,
                nodes,
                edges,
            },
        ),
        Commands::Check { nodes, edges } => commands::check(&nodes, &edges),
        Commands::Deps { name, nodes, edges } => commands::deps(&name, &nodes, &edges),
        Commands::Version => {
            println!("typedep v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
