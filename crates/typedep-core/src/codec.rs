//! Line-delimited JSON encoding of nodes and edges
//!
//! One JSON value per line. Nodes are encoded as
//! `{"name","classifier","sourceName","sourceType"}`; edges carry full nested
//! node objects for both endpoints plus `refType`, so either file can be
//! decoded without the other.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Result, TypeGraphError};
use crate::graph::TypeGraph;
use crate::model::{ReferenceEdge, TypeDeclaration};

pub fn encode_node(node: &TypeDeclaration) -> Result<String> {
    Ok(serde_json::to_string(node)?)
}

pub fn decode_node(line: &str) -> Result<TypeDeclaration> {
    decode(line)
}

pub fn encode_edge(edge: &ReferenceEdge) -> Result<String> {
    Ok(serde_json::to_string(edge)?)
}

pub fn decode_edge(line: &str) -> Result<ReferenceEdge> {
    decode(line)
}

fn decode<T: DeserializeOwned>(line: &str) -> Result<T> {
    serde_json::from_str(line).map_err(|e| TypeGraphError::Decode(e.to_string()))
}

/// Write one JSON value per line.
pub fn write_lines<'a, W, T, I>(writer: &mut W, items: I) -> Result<()>
where
    W: Write,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for item in items {
        serde_json::to_writer(&mut *writer, item)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Read one JSON value per line, skipping blank lines.
pub fn read_lines<R: BufRead, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line)
            .map_err(|e| TypeGraphError::Decode(format!("line {}: {}", number + 1, e)))?;
        items.push(item);
    }
    Ok(items)
}

/// Write the graph's nodes and edges to two files.
///
/// Each file is staged next to its destination and only renamed into place
/// once fully written. If the edges file cannot be put in place, the nodes
/// file is put back the way it was, so the pair never disagrees.
pub fn save_graph(graph: &TypeGraph, nodes_path: &Path, edges_path: &Path) -> Result<()> {
    for path in [nodes_path, edges_path] {
        if path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("{} is a directory", path.display()),
            )
            .into());
        }
    }

    let nodes = stage(nodes_path, |w| write_lines(w, graph.nodes()))?;
    let edges = stage(edges_path, |w| write_lines(w, graph.edges()))?;

    let previous_nodes = match fs::read(nodes_path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    nodes.persist(nodes_path).map_err(|e| e.error)?;
    if let Err(e) = edges.persist(edges_path) {
        restore(nodes_path, previous_nodes);
        return Err(e.error.into());
    }
    info!("Saved nodes to {}", nodes_path.display());
    info!("Saved edges to {}", edges_path.display());
    Ok(())
}

/// Put `path` back to `previous`, or remove it if it did not exist.
fn restore(path: &Path, previous: Option<Vec<u8>>) {
    let outcome = match previous {
        Some(bytes) => fs::write(path, bytes),
        None => fs::remove_file(path),
    };
    if let Err(e) = outcome {
        warn!("Cannot restore {}: {}", path.display(), e);
    }
}

fn stage<F>(destination: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut staged);
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(staged)
}

/// Rebuild a graph from previously saved node and edge files.
pub fn load_graph(nodes_path: &Path, edges_path: &Path) -> Result<TypeGraph> {
    let nodes: Vec<TypeDeclaration> = read_lines(BufReader::new(File::open(nodes_path)?))?;
    let edges: Vec<ReferenceEdge> = read_lines(BufReader::new(File::open(edges_path)?))?;

    let mut graph = TypeGraph::new();
    for node in nodes {
        graph.add_node(node);
    }
    for edge in edges {
        graph.add_edge(edge);
    }
    info!(
        "Loaded {} nodes, {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        nodes_path.display()
    );
    Ok(graph)
}
