//! Error types shared across the pipeline

use std::path::PathBuf;

use crate::model::RefKind;

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum TypeGraphError {
    #[error("Cannot read scan root {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Name conflict: {name} declared in both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Edge {caller} -> {callee} ({kind}) references a type outside the node set")]
    DanglingEdge {
        caller: String,
        callee: String,
        kind: RefKind,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TypeGraphError>;
