//! CLI command implementations

use anyhow::Context;
use std::path::{Path, PathBuf};
use typedep_core::{load_graph, save_graph, TypeGraph};
use typedep_indexer::{Coordinator, ScanConfig};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct ScanOverrides {
    pub config: Option<PathBuf>,
    pub workers: Option<usize>,
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
}

pub fn scan(roots: Vec<PathBuf>, overrides: ScanOverrides) -> anyhow::Result<()> {
    let mut config = ScanConfig::resolve(overrides.config.as_deref()).context("Failed to load config")?;
    if let Some(workers) = overrides.workers {
        config.workers = workers;
    }
    if let Some(nodes) = overrides.nodes {
        config.output.nodes_file = nodes;
    }
    if let Some(edges) = overrides.edges {
        config.output.edges_file = edges;
    }

    for root in &roots {
        tracing::info!("Scanning {}", root.display());
    }
    let coordinator = Coordinator::new(config);
    let outcome = coordinator.run_full_index(&roots).context("Scan failed")?;

    let output = &coordinator.config().output;
    save_graph(&outcome.graph, &output.nodes_file, &output.edges_file).with_context(|| {
        format!(
            "Failed to write {} and {}",
            output.nodes_file.display(),
            output.edges_file.display()
        )
    })?;

    let report = &outcome.report;
    tracing::info!(
        "Wrote {} types to {} and {} references to {}",
        report.node_count,
        output.nodes_file.display(),
        report.edge_count,
        output.edges_file.display()
    );
    for (kind, count) in &report.kind_counts {
        tracing::info!("  {}: {}", kind, count);
    }
    Ok(())
}

pub fn check(nodes: &Path, edges: &Path) -> anyhow::Result<()> {
    let graph = load(nodes, edges)?;
    let report = graph.validate().context("Validation failed")?;
    println!(
        "{} types, {} references, {} unreferenced",
        report.node_count,
        report.edge_count,
        report.unreferenced.len()
    );
    Ok(())
}

pub fn deps(name: &str, nodes: &Path, edges: &Path) -> anyhow::Result<()> {
    let graph = load(nodes, edges)?;
    let node = graph
        .find_node_by_name(name)
        .with_context(|| format!("No type named {}", name))?;

    println!("{}", node);
    let dependencies = graph.dependencies(node);
    println!("depends on ({}):", dependencies.len());
    for (callee, kind) in dependencies {
        println!("  {} [{}]", callee, kind);
    }
    let dependents = graph.dependents(node);
    println!("used by ({}):", dependents.len());
    for (caller, kind) in dependents {
        println!("  {} [{}]", caller, kind);
    }
    Ok(())
}

fn load(nodes: &Path, edges: &Path) -> anyhow::Result<TypeGraph> {
    tracing::debug!("Loading {} and {}", nodes.display(), edges.display());
    load_graph(nodes, edges)
        .with_context(|| format!("Failed to read {} and {}", nodes.display(), edges.display()))
}
